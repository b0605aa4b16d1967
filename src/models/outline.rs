//! Indented outline parsing
//!
//! Turns text such as
//!
//! ```text
//! groceries
//!     meat
//!         raw meat
//!     sweets
//! books
//! ```
//!
//! into `(name, parent name)` pairs in document order, the shape consumed by
//! [`Category::create_from_tree`](super::Category::create_from_tree).

use crate::error::{BookkeeperError, BookkeeperResult};

/// A parsed outline: every entry's parent precedes it
pub type Forest = Vec<(String, Option<String>)>;

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// Parse an indented outline
///
/// Blank lines are skipped. Deeper indentation nests under the previous
/// line; an unindent must return to a level used by an enclosing entry.
pub fn read_tree<I, S>(lines: I) -> BookkeeperResult<Forest>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    // (name, indent) of every open ancestor; the root sentinel has no name
    let mut parents: Vec<(Option<String>, Option<usize>)> = Vec::new();
    let mut last: (Option<String>, Option<usize>) = (None, None);
    let mut result = Vec::new();

    for (line_no, line) in lines.into_iter().enumerate() {
        let line = line.as_ref();
        if line.trim().is_empty() {
            continue;
        }
        let indent = indent_of(line);
        let name = line.trim().to_string();

        if last.1.map_or(true, |last_indent| indent > last_indent) {
            parents.push(last.clone());
        } else if let Some(mut last_indent) = last.1 {
            while indent < last_indent {
                let (_, popped) = parents.pop().ok_or_else(|| unindent_error(line_no, line))?;
                last_indent = popped.ok_or_else(|| unindent_error(line_no, line))?;
            }
            if indent != last_indent {
                return Err(unindent_error(line_no, line));
            }
        }

        let parent = parents.last().and_then(|(name, _)| name.clone());
        result.push((name.clone(), parent));
        last = (Some(name), Some(indent));
    }

    Ok(result)
}

fn unindent_error(line_no: usize, line: &str) -> BookkeeperError {
    BookkeeperError::Validation(format!(
        "Unindent does not match any outer indentation level at line {}: '{}'",
        line_no + 1,
        line.trim()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(name: &str, parent: Option<&str>) -> (String, Option<String>) {
        (name.to_string(), parent.map(str::to_string))
    }

    #[test]
    fn test_flat_list() {
        let forest = read_tree(["books", "clothes"]).unwrap();
        assert_eq!(forest, vec![pair("books", None), pair("clothes", None)]);
    }

    #[test]
    fn test_nested_outline() {
        let text = "
groceries
    meat
        raw meat
        meat products
    sweets
books
clothes
";
        let forest = read_tree(text.lines()).unwrap();
        assert_eq!(
            forest,
            vec![
                pair("groceries", None),
                pair("meat", Some("groceries")),
                pair("raw meat", Some("meat")),
                pair("meat products", Some("meat")),
                pair("sweets", Some("groceries")),
                pair("books", None),
                pair("clothes", None),
            ]
        );
    }

    #[test]
    fn test_common_leading_indent() {
        let forest = read_tree(["    a", "        b", "    c"]).unwrap();
        assert_eq!(forest, vec![pair("a", None), pair("b", Some("a")), pair("c", None)]);
    }

    #[test]
    fn test_bad_unindent() {
        let err = read_tree(["a", "    b", "  c"]).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_empty_input() {
        assert!(read_tree(Vec::<String>::new()).unwrap().is_empty());
    }
}
