//! Content catalog loading

use super::ConfigError;
use crate::catalog::Catalog;
use std::path::Path;

/// Load a catalog from a TOML file
pub fn load_catalog(path: &Path) -> Result<Catalog, ConfigError> {
    let catalog: Catalog = super::load_toml(path)?;
    catalog.validate()?;
    Ok(catalog)
}

/// Load a catalog from a TOML string
pub fn parse_catalog(content: &str) -> Result<Catalog, ConfigError> {
    let catalog: Catalog = super::parse_toml(content)?;
    catalog.validate()?;
    Ok(catalog)
}

/// The catalog bundled with the crate
pub fn default_catalog() -> Catalog {
    let toml = include_str!("../../config/catalog.toml");
    parse_catalog(toml).unwrap_or_else(|err| {
        tracing::error!(error = %err, "bundled catalog failed to load");
        Catalog::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_loads_all() {
        let catalog = default_catalog();

        assert_eq!(catalog.families.len(), 18);
        assert_eq!(
            catalog.families.iter().map(|f| f.drugs.len()).sum::<usize>(),
            49
        );
        assert_eq!(catalog.sections.len(), 9);
        assert_eq!(catalog.diseases.len(), 18);
        assert_eq!(catalog.options.intervals, vec![4.0, 6.0, 8.0, 12.0, 24.0, 48.0]);
        assert_eq!(catalog.options.durations.first(), Some(&1));
        assert_eq!(catalog.options.durations.last(), Some(&56));
    }

    #[test]
    fn test_parse_catalog() {
        let toml = r##"
[options]
doses = [500.0]
intervals = [12.0]
durations = [7]

[[families]]
id = "aminopenicillins"
name = "Aminopenicillins"

[[families.drugs]]
id = "amox"
name = "Amoxicillin"
nephrotoxicity = 1

[[sections]]
id = "resp"
title = "Respiratory"

[[sections.chapters]]
id = "resp_1"
title = "CAP"

[[diseases]]
id = "cap"
chapter_id = "resp_1"
name = "CAP"
description = "Cough"
pathogen = "S. pneumoniae"
color = "#22d3ee"
susceptible_to = ["amox"]

[diseases.reference]
substance_id = "amox"
dose_units = 1000.0
interval_hours = 8.0
duration_days = 5
"##;

        let catalog = parse_catalog(toml).unwrap();
        let cap = catalog.disease("cap").unwrap();
        assert!(cap.resistant_to.is_empty());
        assert_eq!(cap.color.to_string(), "#22d3ee");
        assert_eq!(catalog.drug("amox").unwrap().cost, 0);
    }

    #[test]
    fn test_parse_catalog_rejects_bad_color() {
        let toml = r#"
[options]
doses = []
intervals = []
durations = []

[[families]]
id = "f"
name = "F"
drugs = []

[[sections]]
id = "s"
title = "S"
chapters = [{ id = "c", title = "C" }]

[[diseases]]
id = "d"
chapter_id = "c"
name = "D"
description = ""
pathogen = ""
color = "red"
reference = { substance_id = "x", dose_units = 1.0, interval_hours = 1.0, duration_days = 1 }
"#;

        assert!(matches!(
            parse_catalog(toml),
            Err(ConfigError::ParseError(_))
        ));
    }
}
