//! Catalog of biller names offered to makers.
//!
//! The catalog is advisory: bill creation does not reject names that are
//! missing from it. A JSON file may list plain names or `{ "name": ... }`
//! objects.

use std::path::Path;

use serde::Deserialize;

use crate::error::BillflowError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillerCatalog {
    names: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BillerRecord {
    Name(String),
    Object { name: String },
}

impl BillerRecord {
    fn into_name(self) -> String {
        match self {
            BillerRecord::Name(name) | BillerRecord::Object { name } => name,
        }
    }
}

impl Default for BillerCatalog {
    fn default() -> Self {
        Self::new(
            [
                "Bangalore Electricity Supply Company Ltd (BESCOM) - Karnataka (LT)",
                "Maharashtra State Electricity Distribution Company Ltd (MSEDCL) - Maharashtra (HT)",
                "BSES Rajdhani Power Ltd (BRPL) - Delhi (LT)",
            ]
            .map(String::from),
        )
    }
}

impl BillerCatalog {
    /// Builds a catalog, dropping blanks and duplicates while keeping order.
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        let mut unique: Vec<String> = Vec::new();
        for name in names {
            let name = name.trim().to_string();
            if !name.is_empty() && !unique.contains(&name) {
                unique.push(name);
            }
        }
        Self { names: unique }
    }

    pub fn from_json(json: &str) -> Result<Self, BillflowError> {
        let records: Vec<BillerRecord> = serde_json::from_str(json)?;
        Ok(Self::new(records.into_iter().map(BillerRecord::into_name)))
    }

    pub fn load(path: &Path) -> Result<Self, BillflowError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name.trim())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
