use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::confusion::ConfusionMatrix;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfusionMatrices {
    pub bins: Vec<i64>,
    pub labels: Vec<String>,
    pub cosmics: ConfusionMatrix,
    pub non_cosmics: ConfusionMatrix,
}

/// One kept event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub index: u64,
    pub file: String,
    pub checkpoint: String,
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
    pub confusion_matrices: ConfusionMatrices,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DropReason {
    LengthMismatch {
        true_labels: usize,
        cosmic_origin: usize,
        predicted_labels: usize,
        ghost: usize,
    },
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DropReason::LengthMismatch {
                true_labels,
                cosmic_origin,
                predicted_labels,
                ghost,
            } => write!(
                f,
                "lengths didn't match (true_labels={true_labels}, cosmic_origin={cosmic_origin}, predicted_labels={predicted_labels}, ghost={ghost})"
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedEvent {
    pub index: u64,
    pub file: String,
    pub checkpoint: String,
    pub reason: DropReason,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResultCollection {
    pub events: Vec<EventRecord>,
    #[serde(default)]
    pub dropped: Vec<DroppedEvent>,
}

/// On-disk shapes accepted when loading: the current object form, or a bare
/// array of kept records.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum StoredCollection {
    Full(ResultCollection),
    Events(Vec<EventRecord>),
}

impl From<StoredCollection> for ResultCollection {
    fn from(stored: StoredCollection) -> Self {
        match stored {
            StoredCollection::Full(c) => c,
            StoredCollection::Events(events) => ResultCollection {
                events,
                dropped: Vec::new(),
            },
        }
    }
}
