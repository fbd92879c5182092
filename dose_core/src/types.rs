//! Core value types shared across the crate

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A dosing regimen: what is given, how much, how often, for how long.
///
/// Used both as the reference protocol supplied by content and as the
/// prescription supplied by the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Protocol {
    /// Drug identifier from the catalog
    pub substance_id: String,
    /// Amount per dose (mg)
    pub dose_units: f64,
    /// Hours between doses
    pub interval_hours: f64,
    /// Treatment length in days
    pub duration_days: u32,
}

impl Protocol {
    pub fn new(
        substance_id: impl Into<String>,
        dose_units: f64,
        interval_hours: f64,
        duration_days: u32,
    ) -> Self {
        Protocol {
            substance_id: substance_id.into(),
            dose_units,
            interval_hours,
            duration_days,
        }
    }

    /// Doses administered per day (0 for a non-positive interval)
    pub fn doses_per_day(&self) -> f64 {
        if self.interval_hours <= 0.0 {
            return 0.0;
        }
        24.0 / self.interval_hours
    }
}

/// Error parsing a `#rrggbb` color
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid hex color: {0}")]
pub struct ColorParseError(pub String);

/// Display color carried by content and particles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::WHITE
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError(s.to_string()))?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ColorParseError(s.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| ColorParseError(s.to_string()))
        };
        Ok(Rgb {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A single drug in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drug {
    pub id: String,
    pub name: String,
    /// Effectiveness against susceptible organisms, shown in the prescription preview
    #[serde(default)]
    pub base_damage: u32,
    /// Intrinsic toxicity rating, 0 to 10
    pub nephrotoxicity: u32,
    /// Resistance cost, shown in the prescription preview
    #[serde(default)]
    pub cost: u32,
}

/// Drugs grouped by pharmacological family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugFamily {
    pub id: String,
    pub name: String,
    pub drugs: Vec<Drug>,
}

/// A textbook chapter; each playable case belongs to one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextbookChapter {
    pub id: String,
    pub title: String,
}

/// A group of chapters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextbookSection {
    pub id: String,
    pub title: String,
    pub chapters: Vec<TextbookChapter>,
}

/// A playable case: one infection with its gold-standard protocol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disease {
    pub id: String,
    pub chapter_id: String,
    pub name: String,
    pub description: String,
    pub pathogen: String,
    pub color: Rgb,
    /// Drug ids that clear this infection
    #[serde(default)]
    pub susceptible_to: Vec<String>,
    /// Drug ids known to fail against this infection; catalog data the game rules do not read
    #[serde(default)]
    pub resistant_to: Vec<String>,
    /// Gold-standard protocol
    pub reference: Protocol,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_parse_and_display() {
        let color: Rgb = "#ef4444".parse().unwrap();
        assert_eq!(color, Rgb::new(0xef, 0x44, 0x44));
        assert_eq!(color.to_string(), "#ef4444");
    }

    #[test]
    fn test_rgb_rejects_garbage() {
        assert!("ef4444".parse::<Rgb>().is_err());
        assert!("#ef44".parse::<Rgb>().is_err());
        assert!("#zz4444".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_doses_per_day() {
        let rx = Protocol::new("amox", 1000.0, 8.0, 5);
        assert!((rx.doses_per_day() - 3.0).abs() < f64::EPSILON);

        let broken = Protocol::new("amox", 1000.0, 0.0, 5);
        assert_eq!(broken.doses_per_day(), 0.0);
    }
}
