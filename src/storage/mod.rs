//! Storage layer for Bookkeeper
//!
//! Generic repositories over the record types, an in-memory and an SQLite
//! backend, and the factory that binds a backend to its configuration.

pub mod factory;
pub mod init;
pub mod memory;
pub mod repository;
pub mod sqlite;

pub use factory::{BackendKind, RepositoryFactory};
pub use init::{initialize_schema, seed_defaults};
pub use memory::MemoryRepository;
pub use repository::Repository;
pub use sqlite::SqliteRepository;

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger};
use crate::config::paths::BookkeeperPaths;
use crate::config::settings::Settings;
use crate::error::BookkeeperResult;
use crate::models::{Budget, Category, Expense, Record};

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    backend: BackendKind,
    pub categories: Box<dyn Repository<Category>>,
    pub expenses: Box<dyn Repository<Expense>>,
    pub budgets: Box<dyn Repository<Budget>>,
    audit: Option<AuditLogger>,
}

impl Storage {
    /// Build one repository per record type from `factory`
    pub fn new(factory: &RepositoryFactory) -> Self {
        Self {
            backend: factory.kind(),
            categories: factory.make::<Category>(),
            expenses: factory.make::<Expense>(),
            budgets: factory.make::<Budget>(),
            audit: None,
        }
    }

    /// Open storage as configured by `settings`
    ///
    /// Creates the data directories and, for the SQLite backend, any missing
    /// tables. Auditing is enabled when the settings ask for it.
    pub fn open(paths: &BookkeeperPaths, settings: &Settings) -> BookkeeperResult<Self> {
        paths.ensure_directories()?;

        let factory = RepositoryFactory::new(settings.backend, Some(paths.database_file()))?;
        if let Some(db_file) = factory.db_file() {
            initialize_schema(db_file)?;
        }
        tracing::debug!(backend = %factory.kind(), "opening storage");

        let storage = Self::new(&factory);
        Ok(if settings.audit_enabled {
            storage.with_audit(AuditLogger::new(paths.audit_log()))
        } else {
            storage
        })
    }

    /// Record service-level mutations in `logger`
    pub fn with_audit(mut self, logger: AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    pub fn backend(&self) -> BackendKind {
        self.backend
    }

    pub fn audit(&self) -> Option<&AuditLogger> {
        self.audit.as_ref()
    }

    pub fn log_create<T: Record + Serialize>(&self, record: &T) {
        self.log(|| AuditEntry::create(record))
    }

    pub fn log_update<T: Record + Serialize>(
        &self,
        before: &T,
        after: &T,
        summary: Option<String>,
    ) {
        self.log(|| AuditEntry::update(before, after, summary))
    }

    pub fn log_delete<T: Record + Serialize>(&self, record: &T) {
        self.log(|| AuditEntry::delete(record))
    }

    /// Append to the audit log, if enabled
    ///
    /// A failed write never fails the mutation being recorded: it is logged
    /// and the workflow carries on.
    fn log(&self, entry: impl FnOnce() -> AuditEntry) {
        if let Some(logger) = &self.audit {
            let entry = entry();
            if let Err(e) = logger.log(&entry) {
                tracing::warn!(
                    operation = %entry.operation,
                    entity = %entry.entity_type,
                    id = entry.entity_id,
                    error = %e,
                    "failed to write audit entry"
                );
            }
        }
    }
}
