//! Category model
//!
//! Categories form a forest: each category optionally references the
//! identity of its parent. The repository does not enforce that references
//! resolve; the category service does.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::record::{take_values, FieldDescriptor, Filter, FieldValue, HasIdentity, Pk, Record, Schema, UNSAVED_PK};
use crate::error::{BookkeeperError, BookkeeperResult};
use crate::storage::Repository;

static CATEGORY_SCHEMA: Schema = Schema {
    table: "category",
    fields: &[
        FieldDescriptor::new("name", 0),
        FieldDescriptor::new("parent", 1),
    ],
};

/// An expense category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category name (unique by convention, enforced by the service layer)
    pub name: String,

    /// Identity of the parent category, `None` for a root
    pub parent: Option<Pk>,

    /// Store-assigned identity, 0 while unsaved
    pub pk: Pk,
}

impl Category {
    /// Create a new unsaved category
    pub fn new(name: impl Into<String>, parent: Option<Pk>) -> Self {
        Self {
            name: name.into(),
            parent,
            pk: UNSAVED_PK,
        }
    }

    /// Fetch the parent category, if any
    pub fn get_parent(&self, repo: &dyn Repository<Category>) -> BookkeeperResult<Option<Category>> {
        match self.parent {
            Some(parent) => repo.get(parent),
            None => Ok(None),
        }
    }

    /// All ancestors, nearest first
    pub fn get_all_parents(&self, repo: &dyn Repository<Category>) -> BookkeeperResult<Vec<Category>> {
        let mut parents = Vec::new();
        let mut seen = HashSet::from([self.pk]);
        let mut current = self.get_parent(repo)?;

        while let Some(parent) = current {
            if !seen.insert(parent.pk) {
                break;
            }
            current = parent.get_parent(repo)?;
            parents.push(parent);
        }

        Ok(parents)
    }

    /// All descendants, breadth-first
    pub fn get_subcategories(&self, repo: &dyn Repository<Category>) -> BookkeeperResult<Vec<Category>> {
        let mut result = Vec::new();
        let mut seen = HashSet::from([self.pk]);
        let mut queue = VecDeque::from([self.pk]);

        while let Some(pk) = queue.pop_front() {
            for child in repo.get_all(Some(&Filter::new().field("parent", pk)))? {
                if seen.insert(child.pk) {
                    queue.push_back(child.pk);
                    result.push(child);
                }
            }
        }

        Ok(result)
    }

    /// Persist a forest given as `(name, parent name)` pairs
    ///
    /// Pairs must be ordered so every parent precedes its children, which is
    /// what [`read_tree`](super::outline::read_tree) produces. No
    /// deduplication is done against names already in the repository.
    pub fn create_from_tree(
        tree: &[(String, Option<String>)],
        repo: &dyn Repository<Category>,
    ) -> BookkeeperResult<Vec<Category>> {
        let mut created: Vec<Category> = Vec::with_capacity(tree.len());
        let mut by_name: HashMap<&str, Pk> = HashMap::new();

        for (name, parent) in tree {
            let parent_pk = match parent {
                Some(parent) => Some(*by_name.get(parent.as_str()).ok_or_else(|| {
                    BookkeeperError::Validation(format!(
                        "Parent '{}' of '{}' appears before it is defined",
                        parent, name
                    ))
                })?),
                None => None,
            };

            let mut category = Category::new(name.clone(), parent_pk);
            repo.add(&mut category)?;
            by_name.insert(name.as_str(), category.pk);
            created.push(category);
        }

        Ok(created)
    }
}

impl HasIdentity for Category {
    fn pk(&self) -> Pk {
        self.pk
    }

    fn set_pk(&mut self, pk: Pk) {
        self.pk = pk;
    }
}

impl Record for Category {
    fn schema() -> &'static Schema {
        &CATEGORY_SCHEMA
    }

    fn to_values(&self) -> Vec<FieldValue> {
        vec![self.name.clone().into(), self.parent.into()]
    }

    fn from_values(pk: Pk, values: Vec<FieldValue>) -> BookkeeperResult<Self> {
        let [name, parent] = take_values(&CATEGORY_SCHEMA, values)?;
        Ok(Self {
            name: name.into_text("name")?,
            parent: parent.into_optional_integer("parent")?,
            pk,
        })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
