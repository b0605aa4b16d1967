//! Category display formatting
//!
//! Formats the category forest for terminal output.

use std::collections::{HashMap, HashSet};

use crate::models::{Category, Pk};

/// Format categories as an indented tree
///
/// Categories whose parent is missing from `categories` are shown as roots.
pub fn format_category_tree(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nRun 'bookkeeper init' to create default categories.\n"
            .to_string();
    }

    let known: HashSet<Pk> = categories.iter().map(|c| c.pk).collect();
    let mut children: HashMap<Option<Pk>, Vec<&Category>> = HashMap::new();
    for category in categories {
        let parent = category.parent.filter(|p| known.contains(p));
        children.entry(parent).or_default().push(category);
    }

    let mut output = String::new();
    let mut visited = HashSet::new();
    let roots = children.get(&None).cloned().unwrap_or_default();
    for (i, root) in roots.iter().enumerate() {
        output.push_str(&format!("{}\n", root.name));
        visited.insert(root.pk);
        push_children(&mut output, &children, root.pk, "", &mut visited);

        if i < roots.len() - 1 {
            output.push('\n');
        }
    }

    // Anything left over sits on a parent cycle
    for category in categories {
        if !visited.contains(&category.pk) {
            output.push_str(&format!("{} (unreachable)\n", category.name));
        }
    }

    output
}

fn push_children(
    output: &mut String,
    children: &HashMap<Option<Pk>, Vec<&Category>>,
    parent: Pk,
    indent: &str,
    visited: &mut HashSet<Pk>,
) {
    let Some(kids) = children.get(&Some(parent)) else {
        return;
    };

    for (j, child) in kids.iter().enumerate() {
        if !visited.insert(child.pk) {
            continue;
        }
        let is_last = j == kids.len() - 1;
        let prefix = if is_last { "└── " } else { "├── " };
        output.push_str(&format!("{}{}{}\n", indent, prefix, child.name));

        let next_indent = format!("{}{}", indent, if is_last { "    " } else { "│   " });
        push_children(output, children, child.pk, &next_indent, visited);
    }
}

/// Map category identities to names for expense listings
pub fn category_names(categories: &[Category]) -> HashMap<Pk, String> {
    categories.iter().map(|c| (c.pk, c.name.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(pk: Pk, name: &str, parent: Option<Pk>) -> Category {
        let mut c = Category::new(name, parent);
        c.pk = pk;
        c
    }

    #[test]
    fn test_empty_tree() {
        assert!(format_category_tree(&[]).starts_with("No categories found."));
    }

    #[test]
    fn test_tree_layout() {
        let categories = vec![
            category(1, "groceries", None),
            category(2, "meat", Some(1)),
            category(3, "raw meat", Some(2)),
            category(4, "sweets", Some(1)),
            category(5, "books", None),
        ];

        let output = format_category_tree(&categories);
        assert_eq!(
            output,
            "groceries\n├── meat\n│   └── raw meat\n└── sweets\n\nbooks\n"
        );
    }

    #[test]
    fn test_dangling_parent_shown_as_root() {
        let categories = vec![category(2, "orphan", Some(99))];
        assert_eq!(format_category_tree(&categories), "orphan\n");
    }
}
