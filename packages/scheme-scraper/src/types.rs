//! Scheme records and the response envelope.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Link value used when a record has no resolvable href.
pub const PLACEHOLDER_LINK: &str = "#";

/// Title prefix for records standing in for a failed scrape.
pub const ERROR_TITLE_PREFIX: &str = "Error fetching data: ";

/// Which upstream a listing came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Central,
    Karnataka,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Central => "central",
            Self::Karnataka => "karnataka",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row of the national scheme table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CentralScheme {
    pub title: String,
    #[serde(default)]
    pub date: String,
    pub link: String,
}

/// A node of the regional scheme menu.
///
/// Children are owned, so the tree mirrors the nesting of the source
/// document exactly and can never contain cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionalScheme {
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub children: Vec<RegionalScheme>,
}

impl RegionalScheme {
    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    /// Depth of this subtree; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Self::depth).max().unwrap_or(0)
    }
}

/// Records that can stand in for a failed scrape.
pub trait ErrorPlaceholder: Sized {
    fn error_placeholder(message: &str) -> Self;
}

impl ErrorPlaceholder for CentralScheme {
    fn error_placeholder(message: &str) -> Self {
        Self {
            title: format!("{ERROR_TITLE_PREFIX}{message}"),
            date: String::new(),
            link: PLACEHOLDER_LINK.to_string(),
        }
    }
}

impl ErrorPlaceholder for RegionalScheme {
    fn error_placeholder(message: &str) -> Self {
        Self {
            title: format!("{ERROR_TITLE_PREFIX}{message}"),
            link: PLACEHOLDER_LINK.to_string(),
            children: Vec::new(),
        }
    }
}

/// `{category, schemes}` envelope returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeListing<T> {
    pub category: Category,
    pub schemes: Vec<T>,
}

impl<T> SchemeListing<T> {
    pub fn new(category: Category, schemes: Vec<T>) -> Self {
        Self { category, schemes }
    }
}

impl<T: ErrorPlaceholder> SchemeListing<T> {
    /// Single-record listing describing a failure.
    pub fn failed(category: Category, error: &impl fmt::Display) -> Self {
        Self {
            category,
            schemes: vec![T::error_placeholder(&error.to_string())],
        }
    }
}
