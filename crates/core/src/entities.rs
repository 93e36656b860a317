//! Extracted entities and merge semantics
//!
//! The extractor captures every match in an utterance, ordered by position.
//! When merged into conversation context, the most recent value per kind
//! wins. Absence of a kind is normal and never an error.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kinds of entities the extractor understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Discount or uplift percentage, requires an explicit `%`
    Percentage,
    /// Currency amount, `k`/`m` suffixes normalized
    Currency,
    /// Customer segment (enterprise, mid-market, SMB)
    Segment,
    /// Deal type (new business, renewal, expansion, pilot)
    DealType,
    /// Sales region
    Region,
    /// Urgency keywords
    Urgency,
    /// Timeframe phrases ("by end of quarter", "within 2 weeks")
    Timeframe,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Percentage => "percentage",
            EntityKind::Currency => "currency",
            EntityKind::Segment => "segment",
            EntityKind::DealType => "deal_type",
            EntityKind::Region => "region",
            EntityKind::Urgency => "urgency",
            EntityKind::Timeframe => "timeframe",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single extracted value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityValue {
    /// Numeric value (percentages, normalized currency amounts)
    Number(f64),
    /// Categorical or free-text value
    Text(String),
}

impl EntityValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            EntityValue::Number(n) => Some(*n),
            EntityValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            EntityValue::Text(s) => Some(s),
            EntityValue::Number(_) => None,
        }
    }
}

impl std::fmt::Display for EntityValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityValue::Number(n) => write!(f, "{}", n),
            EntityValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One match within an utterance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedEntity {
    pub kind: EntityKind,
    pub value: EntityValue,
    /// Byte offset of the match within the utterance
    pub position: usize,
    /// Source text span
    pub source_text: String,
}

/// All entities extracted from a single utterance
///
/// Immutable once produced for a turn. Values per kind are stored in
/// positional order; [`ExtractedEntities::latest`] returns the last
/// (most recent) occurrence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedEntities {
    entities: Vec<ExtractedEntity>,
}

impl ExtractedEntities {
    pub fn new(mut entities: Vec<ExtractedEntity>) -> Self {
        entities.sort_by_key(|e| e.position);
        Self { entities }
    }

    /// All values of a kind, in positional order
    pub fn all(&self, kind: EntityKind) -> Vec<&EntityValue> {
        self.entities
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| &e.value)
            .collect()
    }

    /// Most recent (last-mentioned) value of a kind
    pub fn latest(&self, kind: EntityKind) -> Option<&EntityValue> {
        self.entities
            .iter()
            .rev()
            .find(|e| e.kind == kind)
            .map(|e| &e.value)
    }

    /// Most recent numeric value of a kind
    pub fn latest_number(&self, kind: EntityKind) -> Option<f64> {
        self.latest(kind).and_then(|v| v.as_number())
    }

    /// Most recent textual value of a kind
    pub fn latest_text(&self, kind: EntityKind) -> Option<&str> {
        self.latest(kind).and_then(|v| v.as_text())
    }

    pub fn contains(&self, kind: EntityKind) -> bool {
        self.entities.iter().any(|e| e.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExtractedEntity> {
        self.entities.iter()
    }

    /// Collapse to the latest value per kind, for merging into context
    pub fn latest_per_kind(&self) -> HashMap<EntityKind, EntityValue> {
        let mut map = HashMap::new();
        for entity in &self.entities {
            map.insert(entity.kind, entity.value.clone());
        }
        map
    }
}
