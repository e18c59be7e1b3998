//! Path rewriting between the watcher's and Jellyfin's view of the filesystem.
//!
//! Rules are regexes applied in configured order; the first rule that matches
//! rewrites the path and the rest are ignored. Replacements may refer to
//! capture groups (`$1`, `${name}`).
//!
//! ```toml
//! [[jellyfin.rewrite]]
//! from = "^/mnt/unionfs/Media/"
//! to = "/data/"
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};

/// A single configured rewrite rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRule {
    /// Regex matched against the incoming path
    pub from: String,
    /// Replacement text
    pub to: String,
}

impl RewriteRule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Compiled rewrite rules.
#[derive(Debug, Clone, Default)]
pub struct Rewriter {
    rules: Vec<(Regex, String)>,
}

impl Rewriter {
    /// Compile the rules, failing on the first invalid pattern.
    pub fn new(rules: &[RewriteRule]) -> Result<Self, RewriteError> {
        let rules = rules
            .iter()
            .map(|rule| {
                Regex::new(&rule.from)
                    .map(|re| (re, rule.to.clone()))
                    .map_err(|e| RewriteError::InvalidPattern {
                        pattern: rule.from.clone(),
                        message: e.to_string(),
                    })
            })
            .collect::<Result<_, _>>()?;

        Ok(Self { rules })
    }

    /// Rewrite a path with the first matching rule, or return it unchanged.
    pub fn rewrite(&self, path: &str) -> String {
        self.rules
            .iter()
            .find(|(re, _)| re.is_match(path))
            .map(|(re, to)| re.replace_all(path, to.as_str()).into_owned())
            .unwrap_or_else(|| path.to_string())
    }
}

/// Rewrite rule errors
#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    #[error("Invalid rewrite pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },
}
