//! Category CLI commands
//!
//! Implements CLI commands for managing the category tree.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::display::{format_category_tree, format_exceeded_warning};
use crate::error::{BookkeeperError, BookkeeperResult};
use crate::services::CategoryService;
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// Show all categories as a tree
    List,

    /// Create a new category
    Add {
        /// Category name
        name: String,
        /// Parent category name
        #[arg(short, long)]
        parent: Option<String>,
    },

    /// Rename a category or move it in the tree
    Edit {
        /// Category name
        category: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New parent category name
        #[arg(short, long, conflicts_with = "root")]
        parent: Option<String>,
        /// Make the category a root
        #[arg(long)]
        root: bool,
    },

    /// Delete a category (children move up, expenses lose the category)
    Delete {
        /// Category name
        category: String,
    },

    /// Import an indented outline of category names
    Import {
        /// Outline file, or '-' for stdin
        file: PathBuf,
    },
}

/// Handle a category command
pub fn handle_category_command(storage: &Storage, cmd: CategoryCommands) -> BookkeeperResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::List => {
            let categories = service.list()?;
            print!("{}", format_category_tree(&categories));
        }

        CategoryCommands::Add { name, parent } => {
            let category = service.add_category(&name, parent.as_deref())?;
            println!("Created category: {}", category.name);
            if let Some(parent) = parent {
                println!("  Parent: {}", parent.trim().to_lowercase());
            }
            println!("  ID: {}", category.pk);
        }

        CategoryCommands::Edit {
            category,
            name,
            parent,
            root,
        } => {
            if name.is_none() && parent.is_none() && !root {
                println!("No changes specified. Use --name, --parent, or --root.");
                return Ok(());
            }

            let current = service.check_category(&category)?;
            let new_parent = if root {
                None
            } else if parent.is_some() {
                parent
            } else {
                current
                    .get_parent(storage.categories.as_ref())?
                    .map(|p| p.name)
            };
            let new_name = name.unwrap_or_else(|| current.name.clone());

            let updated = service.modify_category(&category, &new_name, new_parent.as_deref())?;
            println!("Updated category: {}", updated.name);
        }

        CategoryCommands::Delete { category } => {
            let status = service.delete_category(&category)?;
            println!("Deleted category: {}", category.trim().to_lowercase());
            eprint!("{}", format_exceeded_warning(&status.exceeded()));
        }

        CategoryCommands::Import { file } => {
            let text = read_outline(&file)?;
            let created = service.import_tree(&text)?;
            println!("Imported {} categories", created.len());
        }
    }

    Ok(())
}

fn read_outline(file: &Path) -> BookkeeperResult<String> {
    if file.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| BookkeeperError::Io(format!("Failed to read stdin: {}", e)))?;
        return Ok(text);
    }

    std::fs::read_to_string(file).map_err(|e| {
        BookkeeperError::Io(format!("Failed to read '{}': {}", file.display(), e))
    })
}
