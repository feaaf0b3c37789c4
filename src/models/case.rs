//! Test case definitions
//!
//! A test case is data: a name plus a [`Check`] describing where to navigate,
//! what to wait for, and what to assert. Cases can come from the built-in
//! suite or from a config file.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Page content that indicates the route is not served
pub const DEFAULT_FORBIDDEN: &[&str] = &["Cannot GET", "404"];

/// One independent assertion scenario
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,

    #[serde(default)]
    pub description: String,

    pub check: Check,
}

impl TestCase {
    pub fn new(name: impl Into<String>, check: Check) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            check,
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.check)
    }
}

/// What a test case navigates to and asserts
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Check {
    /// Body element present and the document title non-empty
    TitlePresent { path: String },

    /// Current URL contains `expected` after navigation settles
    UrlContains { path: String, expected: String },

    /// Current URL contains the base URL's `host:port`
    ServedFromBase { path: String },

    /// None of the pages contain any forbidden substring
    NoErrorContent {
        paths: Vec<String>,
        #[serde(default = "default_forbidden")]
        forbidden: Vec<String>,
    },
}

fn default_forbidden() -> Vec<String> {
    DEFAULT_FORBIDDEN.iter().map(|s| s.to_string()).collect()
}

impl Check {
    pub fn title_present(path: impl Into<String>) -> Self {
        Check::TitlePresent { path: path.into() }
    }

    pub fn url_contains(path: impl Into<String>, expected: impl Into<String>) -> Self {
        Check::UrlContains {
            path: path.into(),
            expected: expected.into(),
        }
    }

    pub fn served_from_base(path: impl Into<String>) -> Self {
        Check::ServedFromBase { path: path.into() }
    }

    pub fn no_error_content<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Check::NoErrorContent {
            paths: paths.into_iter().map(Into::into).collect(),
            forbidden: default_forbidden(),
        }
    }

    /// Short kind label
    pub fn kind(&self) -> &'static str {
        match self {
            Check::TitlePresent { .. } => "title",
            Check::UrlContains { .. } => "url",
            Check::ServedFromBase { .. } => "host",
            Check::NoErrorContent { .. } => "content",
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::TitlePresent { path } => write!(f, "{path} has a title"),
            Check::UrlContains { path, expected } => {
                write!(f, "{path} lands on a URL containing '{expected}'")
            }
            Check::ServedFromBase { path } => write!(f, "{path} stays on the base host"),
            Check::NoErrorContent { paths, .. } => {
                write!(f, "{} render without error pages", paths.join(", "))
            }
        }
    }
}

/// Result of evaluating a check
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckOutcome {
    Pass,
    Fail(String),
}
