//! Repository factory
//!
//! Binds a backend and its configuration once, then hands out a repository
//! for any record type on request. Callers stay backend-agnostic: they only
//! ever ask for `factory.make::<Category>()`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::memory::MemoryRepository;
use super::repository::Repository;
use super::sqlite::SqliteRepository;
use crate::error::{BookkeeperError, BookkeeperResult};
use crate::models::Record;

/// Available repository backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Persistent SQLite database file
    #[default]
    Sqlite,
    /// Process memory, lost on exit
    Memory,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlite => write!(f, "sqlite"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = BookkeeperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            other => Err(BookkeeperError::Config(format!("Unknown backend '{}'", other))),
        }
    }
}

/// A backend with its configuration bound
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryFactory {
    Memory,
    Sqlite { db_file: PathBuf },
}

impl RepositoryFactory {
    /// Bind a backend to its configuration
    ///
    /// # Errors
    ///
    /// `Config` if the SQLite backend is requested without a database file.
    pub fn new(kind: BackendKind, db_file: Option<PathBuf>) -> BookkeeperResult<Self> {
        match (kind, db_file) {
            (BackendKind::Memory, _) => Ok(Self::Memory),
            (BackendKind::Sqlite, Some(db_file)) => Ok(Self::Sqlite { db_file }),
            (BackendKind::Sqlite, None) => Err(BookkeeperError::Config(
                "The sqlite backend requires a database file".into(),
            )),
        }
    }

    pub fn memory() -> Self {
        Self::Memory
    }

    pub fn sqlite(db_file: impl Into<PathBuf>) -> Self {
        Self::Sqlite {
            db_file: db_file.into(),
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Memory => BackendKind::Memory,
            Self::Sqlite { .. } => BackendKind::Sqlite,
        }
    }

    /// Database file of a persistent backend
    pub fn db_file(&self) -> Option<&Path> {
        match self {
            Self::Memory => None,
            Self::Sqlite { db_file } => Some(db_file),
        }
    }

    /// Build a repository for `T`
    ///
    /// Memory repositories are independent: two calls never share records.
    pub fn make<T: Record>(&self) -> Box<dyn Repository<T>> {
        tracing::debug!(backend = %self.kind(), table = T::schema().table, "creating repository");
        match self {
            Self::Memory => Box::new(MemoryRepository::<T>::new()),
            Self::Sqlite { db_file } => Box::new(SqliteRepository::<T>::new(db_file.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Filter};
    use crate::storage::init::initialize_schema;
    use tempfile::TempDir;

    fn exercise(repo: &dyn Repository<Category>) {
        let mut category = Category::new("books", None);
        let pk = repo.add(&mut category).unwrap();
        assert_eq!(repo.get(pk).unwrap().unwrap(), category);

        category.name = "novels".into();
        repo.update(&category).unwrap();
        let found = repo
            .get_all(Some(&Filter::new().field("name", "novels")))
            .unwrap();
        assert_eq!(found, vec![category.clone()]);

        repo.delete(pk).unwrap();
        assert!(repo.get(pk).unwrap().is_none());
    }

    #[test]
    fn test_memory_factory() {
        let factory = RepositoryFactory::new(BackendKind::Memory, None).unwrap();
        assert_eq!(factory.kind(), BackendKind::Memory);
        exercise(factory.make::<Category>().as_ref());
    }

    #[test]
    fn test_memory_repositories_are_independent() {
        let factory = RepositoryFactory::memory();
        let first = factory.make::<Category>();
        let second = factory.make::<Category>();

        let mut category = Category::new("books", None);
        first.add(&mut category).unwrap();
        assert!(second.get_all(None).unwrap().is_empty());
    }

    #[test]
    fn test_sqlite_factory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("factory.db");
        initialize_schema(&path).unwrap();

        let factory = RepositoryFactory::new(BackendKind::Sqlite, Some(path.clone())).unwrap();
        assert_eq!(factory.db_file(), Some(path.as_path()));
        exercise(factory.make::<Category>().as_ref());
    }

    #[test]
    fn test_sqlite_requires_location() {
        let err = RepositoryFactory::new(BackendKind::Sqlite, None).unwrap_err();
        assert!(matches!(err, BookkeeperError::Config(_)));
    }

    #[test]
    fn test_backend_kind_parse() {
        assert_eq!("SQLite".parse::<BackendKind>().unwrap(), BackendKind::Sqlite);
        assert_eq!("memory".parse::<BackendKind>().unwrap(), BackendKind::Memory);
        assert!("postgres".parse::<BackendKind>().is_err());
        assert_eq!(BackendKind::default(), BackendKind::Sqlite);
    }
}
