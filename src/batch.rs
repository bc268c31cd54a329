//! Scripted operations applied in order against an engine.
//!
//! A batch file is TOML or JSON (picked by extension) holding an `ops`
//! list. Each op is either a bill creation or a transition:
//!
//! ```toml
//! [[ops]]
//! op = "create"
//! branch = "Pune"
//! biller = "MSEDCL"
//! consumer_number = "CN777"
//! amount = "1200"
//! due_date = "2025-12-01"
//!
//! [[ops]]
//! op = "transition"
//! bill = "TXN1004"
//! event = "submit"
//! role = "Maker"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BillflowError, WorkflowError};
use crate::workflow::{Bill, BillDraft, BillId, Event, Role, WorkflowEngine};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Operation {
    Create(BillDraft),
    Transition {
        bill: BillId,
        event: Event,
        role: Role,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    #[serde(default)]
    pub ops: Vec<Operation>,
}

/// What happened to one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub op: Operation,
    pub result: Result<Bill, WorkflowError>,
}

impl Batch {
    pub fn from_toml(text: &str) -> Result<Self, BillflowError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_json(text: &str) -> Result<Self, BillflowError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads a batch file; `.json` is parsed as JSON, anything else as TOML.
    pub fn load(path: &Path) -> Result<Self, BillflowError> {
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&text)
        } else {
            Self::from_toml(&text)
        }
    }

    /// Runs every op regardless of earlier failures and reports each result.
    pub fn apply(&self, engine: &WorkflowEngine) -> Vec<Outcome> {
        self.ops
            .iter()
            .map(|op| {
                let result = match op {
                    Operation::Create(draft) => engine.create(draft),
                    Operation::Transition { bill, event, role } => {
                        engine.transition(*bill, *event, *role)
                    }
                };
                Outcome {
                    op: op.clone(),
                    result,
                }
            })
            .collect()
    }
}
