//! Audit entry data structures
//!
//! One entry per create, update or delete applied by the service layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Pk, Record};

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

/// Types of records that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Category,
    Expense,
    Budget,
    Other,
}

impl EntityType {
    /// Entity type of a record, derived from its table name
    pub fn of<T: Record>() -> Self {
        match T::schema().table {
            "category" => Self::Category,
            "expense" => Self::Expense,
            "budget" => Self::Budget,
            _ => Self::Other,
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Category => write!(f, "Category"),
            EntityType::Expense => write!(f, "Expense"),
            EntityType::Budget => write!(f, "Budget"),
            EntityType::Other => write!(f, "Record"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    /// Identity of the affected record
    pub entity_id: Pk,

    /// Record state before the operation (updates and deletes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    /// Record state after the operation (creates and updates)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    /// Short human-readable summary, e.g. "amount: 100 -> 150"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl AuditEntry {
    pub fn create<T: Record + Serialize>(record: &T) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Create,
            entity_type: EntityType::of::<T>(),
            entity_id: record.pk(),
            before: None,
            after: serde_json::to_value(record).ok(),
            summary: None,
        }
    }

    pub fn update<T: Record + Serialize>(before: &T, after: &T, summary: Option<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Update,
            entity_type: EntityType::of::<T>(),
            entity_id: after.pk(),
            before: serde_json::to_value(before).ok(),
            after: serde_json::to_value(after).ok(),
            summary,
        }
    }

    pub fn delete<T: Record + Serialize>(record: &T) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Delete,
            entity_type: EntityType::of::<T>(),
            entity_id: record.pk(),
            before: serde_json::to_value(record).ok(),
            after: None,
            summary: None,
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} #{}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(summary) = &self.summary {
            output.push_str(&format!("\n  Changes: {}", summary));
        }

        output
    }
}
