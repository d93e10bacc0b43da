//! Fixed-path element extraction
//!
//! Pages on the job board are addressed by fixed structural paths such as
//! `/html/body/section/div/div[3]`. This module implements that small path
//! language on top of `scraper`:
//!
//! - a step is a tag name, optionally followed by a 1-based position `[n]`
//!   counted among the element children with that tag
//! - a step without a position matches every child with that tag
//! - paths starting with `/` are resolved from the document root, others
//!   relative to an element
//!
//! Lookups never fail on missing content: absent nodes yield `None` or an
//! empty string, and callers decide what an empty value means.

use scraper::html::Select;
use scraper::{ElementRef, Html, Selector};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while compiling paths or selectors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Invalid path '{path}': {message}")]
    InvalidPath { path: String, message: String },

    #[error("Invalid CSS selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    tag: String,
    position: Option<usize>,
}

/// A compiled fixed structural path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XPath {
    absolute: bool,
    steps: Vec<Step>,
}

impl XPath {
    /// Returns true if the path is resolved from the document root
    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    /// Resolves the path against a document
    ///
    /// Relative paths are resolved against the root `<html>` element.
    pub fn select_document<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        let root = document.root_element();

        if !self.absolute {
            return self.select(root);
        }

        let Some((first, rest)) = self.steps.split_first() else {
            return Vec::new();
        };

        if root.value().name() != first.tag || first.position.is_some_and(|n| n != 1) {
            return Vec::new();
        }

        walk(vec![root], rest)
    }

    /// Resolves the path relative to an element
    pub fn select<'a>(&self, node: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        walk(vec![node], &self.steps)
    }
}

fn walk<'a>(mut nodes: Vec<ElementRef<'a>>, steps: &[Step]) -> Vec<ElementRef<'a>> {
    for step in steps {
        let mut next = Vec::new();
        for node in nodes {
            let mut matching = node
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|child| child.value().name() == step.tag);

            match step.position {
                Some(n) => next.extend(matching.nth(n - 1)),
                None => next.extend(matching),
            }
        }

        if next.is_empty() {
            return next;
        }
        nodes = next;
    }
    nodes
}

impl FromStr for XPath {
    type Err = ExtractError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let invalid = |message: &str| ExtractError::InvalidPath {
            path: path.to_string(),
            message: message.to_string(),
        };

        let trimmed = path.trim();
        let (absolute, body) = match trimmed.strip_prefix('/') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        if body.is_empty() {
            return Err(invalid("path has no steps"));
        }

        let mut steps = Vec::new();
        for segment in body.split('/') {
            if segment.is_empty() {
                return Err(invalid("empty step (descendant '//' is not supported)"));
            }

            let (tag, position) = match segment.split_once('[') {
                Some((tag, index)) => {
                    let digits = index
                        .strip_suffix(']')
                        .ok_or_else(|| invalid("unterminated position predicate"))?;
                    let n: usize = digits
                        .parse()
                        .map_err(|_| invalid("position predicate must be a number"))?;
                    if n == 0 {
                        return Err(invalid("positions are 1-based"));
                    }
                    (tag, Some(n))
                }
                None => (segment, None),
            };

            if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                return Err(invalid("step must be a plain tag name"));
            }

            steps.push(Step {
                tag: tag.to_ascii_lowercase(),
                position,
            });
        }

        Ok(Self { absolute, steps })
    }
}

impl fmt::Display for XPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.absolute {
            write!(f, "/")?;
        }
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            write!(f, "{}", step.tag)?;
            if let Some(n) = step.position {
                write!(f, "[{}]", n)?;
            }
        }
        Ok(())
    }
}

/// Compiles a CSS selector, keeping the parser message
pub fn compile_selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::InvalidSelector {
        selector: css.to_string(),
        message: format!("{:?}", e),
    })
}

/// Resolves a structural path to the first matching node of a document
pub fn extract_by_path<'a>(document: &'a Html, path: &XPath) -> Option<ElementRef<'a>> {
    path.select_document(document).into_iter().next()
}

/// Returns the trimmed text of the first node at `path` below `node`, or `""`
pub fn child_text(node: ElementRef<'_>, path: &XPath) -> String {
    path.select(node)
        .into_iter()
        .next()
        .map(element_text)
        .unwrap_or_default()
}

/// Returns attribute `attr` of the first node at `path` below `node`, or `""`
pub fn child_attr(node: ElementRef<'_>, path: &XPath, attr: &str) -> String {
    path.select(node)
        .into_iter()
        .find_map(|element| element.value().attr(attr))
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

/// Enumerates every element of the document matching a CSS selector
///
/// The iterator is lazy; calling this again restarts the enumeration.
pub fn select_all<'a, 'b>(document: &'a Html, selector: &'b Selector) -> Select<'a, 'b> {
    document.select(selector)
}

/// Concatenated text of every descendant of `node` matching `selector`, trimmed
pub fn descendant_text(node: ElementRef<'_>, selector: &Selector) -> String {
    node.select(selector)
        .flat_map(|element| element.text())
        .collect::<String>()
        .trim()
        .to_string()
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
