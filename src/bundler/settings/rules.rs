//! Rule configuration: which loaders apply to which files.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One or more regular expressions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Patterns {
    /// A single expression
    One(String),
    /// A list of expressions
    Many(Vec<String>),
}

impl Patterns {
    /// Returns the expressions as a slice.
    pub fn as_slice(&self) -> &[String] {
        match self {
            Patterns::One(pattern) => std::slice::from_ref(pattern),
            Patterns::Many(patterns) => patterns,
        }
    }
}

impl From<&str> for Patterns {
    fn from(pattern: &str) -> Self {
        Patterns::One(pattern.to_string())
    }
}

/// A loader reference inside a rule's `use` list.
///
/// Either a bare loader name (`"copy-loader"`) or an object with options
/// (`{ "loader": "banner-loader", "options": { "text": "..." } }`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LoaderUse {
    /// Loader referenced by name, no options
    Name(String),
    /// Loader with an options payload
    Configured {
        /// Loader name in the registry
        loader: String,
        /// Opaque options handed to the loader
        #[serde(default)]
        options: Value,
    },
}

impl LoaderUse {
    /// Returns the loader name.
    pub fn loader(&self) -> &str {
        match self {
            LoaderUse::Name(name) => name,
            LoaderUse::Configured { loader, .. } => loader,
        }
    }

    /// Returns the options payload (`null` when none was given).
    pub fn options(&self) -> Value {
        match self {
            LoaderUse::Name(_) => Value::Null,
            LoaderUse::Configured { options, .. } => options.clone(),
        }
    }
}

/// A rule from `.npmbundlerrc`.
///
/// A rule applies to a file when the file's project-relative path matches
/// any `test` expression, any `include` expression (if given) and no
/// `exclude` expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSettings {
    /// Expressions selecting files
    pub test: Patterns,

    /// Optional further restriction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Patterns>,

    /// Optional exclusions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Patterns>,

    /// Loaders to run, in order
    #[serde(rename = "use")]
    pub uses: Vec<LoaderUse>,
}
