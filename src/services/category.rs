//! Category service
//!
//! Provides business logic for category management: name normalization,
//! duplicate and cycle checks, the delete cascade and outline import.

use std::collections::HashMap;

use super::budget::{BudgetService, BudgetStatus};
use crate::error::{BookkeeperError, BookkeeperResult};
use crate::models::{read_tree, Category, Filter, Pk};
use crate::storage::Storage;

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

/// Normalize a user-supplied category name
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

impl<'a> CategoryService<'a> {
    /// Create a new category service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// All categories in identity order
    pub fn list(&self) -> BookkeeperResult<Vec<Category>> {
        self.storage.categories.get_all(None)
    }

    /// Find a category by name (case-insensitive)
    pub fn find(&self, name: &str) -> BookkeeperResult<Option<Category>> {
        let found = self
            .storage
            .categories
            .get_all(Some(&Filter::new().field("name", normalize_name(name))))?;
        Ok(found.into_iter().next())
    }

    /// Resolve a user-supplied category name, failing when it does not exist
    pub fn check_category(&self, name: &str) -> BookkeeperResult<Category> {
        self.find(name)?.ok_or_else(|| {
            BookkeeperError::Validation(format!("Category '{}' does not exist", normalize_name(name)))
        })
    }

    /// Create a new category
    pub fn add_category(&self, name: &str, parent: Option<&str>) -> BookkeeperResult<Category> {
        let name = self.check_new_name(name)?;
        let parent = match parent {
            Some(parent) => Some(self.check_category(parent)?.pk),
            None => None,
        };

        let mut category = Category::new(name, parent);
        self.storage.categories.add(&mut category)?;
        self.storage.log_create(&category);
        tracing::info!(category = category.pk, name = %category.name, "added category");

        Ok(category)
    }

    /// Rename a category and set its parent
    ///
    /// `new_parent == None` makes the category a root. The new parent may be
    /// neither the category itself nor one of its descendants.
    pub fn modify_category(
        &self,
        name: &str,
        new_name: &str,
        new_parent: Option<&str>,
    ) -> BookkeeperResult<Category> {
        let before = self.check_category(name)?;

        let new_name = if normalize_name(new_name) == before.name {
            before.name.clone()
        } else {
            self.check_new_name(new_name)?
        };

        let parent = match new_parent {
            Some(parent) => {
                let parent = self.check_category(parent)?;
                if parent.pk == before.pk
                    || before
                        .get_subcategories(self.storage.categories.as_ref())?
                        .iter()
                        .any(|c| c.pk == parent.pk)
                {
                    return Err(BookkeeperError::Validation(format!(
                        "Category '{}' cannot be placed under '{}'",
                        before.name, parent.name
                    )));
                }
                Some(parent.pk)
            }
            None => None,
        };

        let mut category = before.clone();
        category.name = new_name;
        category.parent = parent;
        self.storage.categories.update(&category)?;
        self.storage.log_update(&before, &category, None);
        tracing::info!(category = category.pk, name = %category.name, "modified category");

        Ok(category)
    }

    /// Delete a category
    ///
    /// Children move up to the deleted category's parent and expenses in the
    /// category lose it. Each step is a separate write, so a failure partway
    /// leaves the earlier steps applied.
    pub fn delete_category(&self, name: &str) -> BookkeeperResult<BudgetStatus> {
        let category = self.check_category(name)?;

        self.storage.categories.delete(category.pk)?;
        self.storage.log_delete(&category);
        tracing::info!(category = category.pk, name = %category.name, "deleted category");

        self.cascade_delete(&category).inspect_err(|e| {
            tracing::error!(category = category.pk, error = %e, "category delete cascade interrupted");
        })?;

        BudgetService::new(self.storage).refresh()
    }

    fn cascade_delete(&self, category: &Category) -> BookkeeperResult<()> {
        let children = self
            .storage
            .categories
            .get_all(Some(&Filter::new().field("parent", category.pk)))?;
        for before in children {
            let mut child = before.clone();
            child.parent = category.parent;
            self.storage.categories.update(&child)?;
            self.storage
                .log_update(&before, &child, Some(format!("parent '{}' deleted", category.name)));
        }

        let expenses = self
            .storage
            .expenses
            .get_all(Some(&Filter::new().field("category", category.pk)))?;
        for before in expenses {
            let mut expense = before.clone();
            expense.category = None;
            self.storage.expenses.update(&expense)?;
            self.storage
                .log_update(&before, &expense, Some(format!("category '{}' deleted", category.name)));
        }

        Ok(())
    }

    /// Import an indented outline of category names
    ///
    /// Names that already exist are skipped; new names nested under them are
    /// attached to the existing category.
    pub fn import_tree(&self, text: &str) -> BookkeeperResult<Vec<Category>> {
        let forest = read_tree(text.lines())?;
        let mut pks: HashMap<String, Pk> = HashMap::new();
        let mut created = Vec::new();

        for (name, parent) in forest {
            let name = normalize_name(&name);
            if let Some(existing) = self.find(&name)? {
                pks.insert(name, existing.pk);
                continue;
            }

            let parent = match parent.map(|p| normalize_name(&p)) {
                Some(parent) => match pks.get(&parent) {
                    Some(pk) => Some(*pk),
                    None => Some(self.check_category(&parent)?.pk),
                },
                None => None,
            };

            let mut category = Category::new(name.clone(), parent);
            self.storage.categories.add(&mut category)?;
            self.storage.log_create(&category);
            pks.insert(name, category.pk);
            created.push(category);
        }

        tracing::info!(created = created.len(), "imported categories");
        Ok(created)
    }

    fn check_new_name(&self, name: &str) -> BookkeeperResult<String> {
        let name = normalize_name(name);
        if name.is_empty() {
            return Err(BookkeeperError::Validation("Category name cannot be empty".into()));
        }
        if self.find(&name)?.is_some() {
            return Err(BookkeeperError::Validation(format!(
                "Category '{}' already exists",
                name
            )));
        }
        Ok(name)
    }
}
