//! Read-only content catalog: drugs, textbook chapters and playable cases

use crate::config::ConfigError;
use crate::types::{Disease, Drug, DrugFamily, TextbookChapter, TextbookSection};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The fixed option lists a prescription is built from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrescriptionOptions {
    /// Dose choices in mg
    pub doses: Vec<f64>,
    /// Interval choices in hours
    pub intervals: Vec<f64>,
    /// Duration choices in days
    pub durations: Vec<u32>,
}

/// Everything the game reads but never writes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub options: PrescriptionOptions,
    pub families: Vec<DrugFamily>,
    pub sections: Vec<TextbookSection>,
    /// Playable cases in campaign order
    pub diseases: Vec<Disease>,
}

impl Catalog {
    /// Find a drug by id across all families
    pub fn drug(&self, id: &str) -> Option<&Drug> {
        self.families
            .iter()
            .flat_map(|family| family.drugs.iter())
            .find(|drug| drug.id == id)
    }

    /// Display name of a drug, or the id itself if unknown
    pub fn drug_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.drug(id).map(|drug| drug.name.as_str()).unwrap_or(id)
    }

    pub fn family(&self, id: &str) -> Option<&DrugFamily> {
        self.families.iter().find(|family| family.id == id)
    }

    pub fn disease(&self, id: &str) -> Option<&Disease> {
        self.diseases.iter().find(|disease| disease.id == id)
    }

    /// Position of a case in campaign order
    pub fn disease_index(&self, id: &str) -> Option<usize> {
        self.diseases.iter().position(|disease| disease.id == id)
    }

    pub fn chapter(&self, id: &str) -> Option<&TextbookChapter> {
        self.sections
            .iter()
            .flat_map(|section| section.chapters.iter())
            .find(|chapter| chapter.id == id)
    }

    /// Cases filed under a chapter
    pub fn diseases_in_chapter<'a>(&'a self, chapter_id: &'a str) -> impl Iterator<Item = &'a Disease> + 'a {
        self.diseases
            .iter()
            .filter(move |disease| disease.chapter_id == chapter_id)
    }

    /// Check cross references and protocol sanity
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut drug_ids = HashSet::new();
        for drug in self.families.iter().flat_map(|family| family.drugs.iter()) {
            if drug.nephrotoxicity > 10 {
                return Err(ConfigError::ValidationError(format!(
                    "drug '{}' has toxicity rating {} outside 0-10",
                    drug.id, drug.nephrotoxicity
                )));
            }
            if !drug_ids.insert(drug.id.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate drug id '{}'",
                    drug.id
                )));
            }
        }

        let mut disease_ids = HashSet::new();
        for disease in &self.diseases {
            if !disease_ids.insert(disease.id.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate disease id '{}'",
                    disease.id
                )));
            }
            if self.chapter(&disease.chapter_id).is_none() {
                return Err(ConfigError::ValidationError(format!(
                    "disease '{}' references unknown chapter '{}'",
                    disease.id, disease.chapter_id
                )));
            }
            if !drug_ids.contains(disease.reference.substance_id.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "disease '{}' references unknown drug '{}'",
                    disease.id, disease.reference.substance_id
                )));
            }
            if disease.reference.interval_hours <= 0.0 || disease.reference.duration_days == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "disease '{}' has a non-positive interval or duration",
                    disease.id
                )));
            }
        }

        if self.options.intervals.iter().any(|interval| *interval <= 0.0)
            || self.options.durations.contains(&0)
        {
            return Err(ConfigError::ValidationError(
                "prescription options must have positive intervals and durations".to_string(),
            ));
        }

        Ok(())
    }
}
