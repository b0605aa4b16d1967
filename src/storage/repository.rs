//! Repository abstraction
//!
//! A repository stores records of one type, assigning each an identity on
//! `add`. Returned records are independent copies: changing one has no
//! effect on storage until it is passed to `update`.

use crate::error::BookkeeperResult;
use crate::models::{Filter, Pk, Record};

/// CRUD and predicate queries over one record type
pub trait Repository<T: Record>: Send + Sync {
    /// Store a new record and write the generated identity back into it
    ///
    /// # Errors
    ///
    /// `InvalidState` if the record already carries a nonzero identity.
    fn add(&self, obj: &mut T) -> BookkeeperResult<Pk>;

    /// Fetch a record by identity, `None` when absent
    fn get(&self, pk: Pk) -> BookkeeperResult<Option<T>>;

    /// Fetch every record, or only those equal to `filter` on every given field
    ///
    /// Results are ordered by identity.
    fn get_all(&self, filter: Option<&Filter>) -> BookkeeperResult<Vec<T>>;

    /// Fetch records whose fields each contain the corresponding filter value
    fn get_all_like(&self, filter: &Filter) -> BookkeeperResult<Vec<T>>;

    /// Overwrite the stored record with the same identity
    ///
    /// # Errors
    ///
    /// `NotFound` if no stored record has `obj`'s identity (including 0).
    fn update(&self, obj: &T) -> BookkeeperResult<()>;

    /// Remove a record
    ///
    /// # Errors
    ///
    /// `NotFound` if no stored record has that identity.
    fn delete(&self, pk: Pk) -> BookkeeperResult<()>;
}

/// Human-readable entity name for error messages, e.g. "Category"
pub(crate) fn entity_name<T: Record>() -> &'static str {
    match T::schema().table {
        "category" => "Category",
        "expense" => "Expense",
        "budget" => "Budget",
        other => other,
    }
}
