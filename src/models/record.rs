//! Record capability shared by every persisted model
//!
//! A record exposes a single integer identity (`pk`) and an explicit,
//! ordered list of its non-identity fields. Repositories map records onto
//! storage purely through this description: one table per record type,
//! one column per declared field, in declared order.

use std::fmt;

use crate::error::{BookkeeperError, BookkeeperResult};

/// Store-assigned record identity
pub type Pk = i64;

/// Identity carried by records that have not been persisted yet
pub const UNSAVED_PK: Pk = 0;

/// Access to the identity field of a persisted record
pub trait HasIdentity {
    fn pk(&self) -> Pk;
    fn set_pk(&mut self, pk: Pk);

    /// Whether the record has been assigned an identity by a repository
    fn is_saved(&self) -> bool {
        self.pk() != UNSAVED_PK
    }
}

/// A single declared column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub ordinal: usize,
}

impl FieldDescriptor {
    pub const fn new(name: &'static str, ordinal: usize) -> Self {
        Self { name, ordinal }
    }
}

/// Table layout of a record type
///
/// Field order must match the column order of the backing table exactly.
#[derive(Debug)]
pub struct Schema {
    pub table: &'static str,
    pub fields: &'static [FieldDescriptor],
}

impl Schema {
    /// Column names in declared order
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    /// Ordinal of the named field, if declared
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.ordinal)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Reject any filter field the record does not declare
    pub fn check_filter(&self, filter: &Filter) -> BookkeeperResult<()> {
        for (field, _) in filter.iter() {
            if !self.contains(field) {
                return Err(BookkeeperError::UnknownField {
                    table: self.table,
                    field: field.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// A single column value as exchanged with storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Null,
    Integer(i64),
    Text(String),
}

impl FieldValue {
    /// Substring containment on the textual form of the value
    ///
    /// `Null` never matches.
    pub fn matches_like(&self, needle: &FieldValue) -> bool {
        match (self.as_text(), needle.as_text()) {
            (Some(haystack), Some(needle)) => haystack.contains(needle.as_str()),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Integer(i) => Some(i.to_string()),
            Self::Text(s) => Some(s.clone()),
        }
    }

    pub fn into_integer(self, field: &str) -> BookkeeperResult<i64> {
        match self {
            Self::Integer(i) => Ok(i),
            other => Err(type_mismatch(field, "integer", &other)),
        }
    }

    pub fn into_optional_integer(self, field: &str) -> BookkeeperResult<Option<i64>> {
        match self {
            Self::Null => Ok(None),
            Self::Integer(i) => Ok(Some(i)),
            other => Err(type_mismatch(field, "integer or null", &other)),
        }
    }

    pub fn into_text(self, field: &str) -> BookkeeperResult<String> {
        match self {
            Self::Text(s) => Ok(s),
            other => Err(type_mismatch(field, "text", &other)),
        }
    }
}

fn type_mismatch(field: &str, expected: &str, got: &FieldValue) -> BookkeeperError {
    BookkeeperError::Storage(format!(
        "Column '{}' expected {}, found {:?}",
        field, expected, got
    ))
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<Option<i64>> for FieldValue {
    fn from(value: Option<i64>) -> Self {
        value.map_or(Self::Null, Self::Integer)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Conjunction of `field -> value` conditions
///
/// Used for exact matching by `get_all` and as substring needles by
/// `get_all_like`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    conditions: Vec<(String, FieldValue)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition on `field`
    pub fn field(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.conditions.iter().map(|(f, v)| (f.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }
}

/// A plain domain record persisted one-per-row
pub trait Record: HasIdentity + Clone + fmt::Debug + Send + Sync + 'static {
    /// Table and column layout
    fn schema() -> &'static Schema;

    /// Non-identity field values in declared order
    fn to_values(&self) -> Vec<FieldValue>;

    /// Rebuild a record from stored column values and its row identity
    fn from_values(pk: Pk, values: Vec<FieldValue>) -> BookkeeperResult<Self>;
}

/// Split a stored row into exactly `N` values, failing on an arity mismatch
pub(crate) fn take_values<const N: usize>(
    schema: &Schema,
    values: Vec<FieldValue>,
) -> BookkeeperResult<[FieldValue; N]> {
    let got = values.len();
    values.try_into().map_err(|_| {
        BookkeeperError::Storage(format!(
            "Table '{}' row has {} columns, expected {}",
            schema.table, got, N
        ))
    })
}
