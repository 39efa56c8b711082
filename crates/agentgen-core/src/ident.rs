//! Identifier normalizer - graph node identifiers to source-code identifiers.
//!
//! Every IRI that reaches generated code passes through [`normalize`]. The
//! result is always a valid identifier in the languages we target:
//! `^[A-Za-z_][A-Za-z0-9_]*$`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Substitute for identifiers that normalize to nothing.
pub const UNNAMED: &str = "unnamed";

/// Case-folding policy. Each emitter target states one and applies it to
/// every name it produces in a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CasePolicy {
    #[default]
    Preserve,
    Lower,
}

impl fmt::Display for CasePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preserve => write!(f, "preserve"),
            Self::Lower => write!(f, "lower"),
        }
    }
}

/// A normalized, always-valid identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SafeName(String);

impl SafeName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// The same name with a trailing underscore, for reserved words.
    pub fn with_underscore(&self) -> SafeName {
        SafeName(format!("{}_", self.0))
    }
}

impl fmt::Display for SafeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SafeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Last `/`- or `#`-delimited segment of an identifier.
pub fn local_segment(identifier: &str) -> &str {
    let after_slash = identifier.rsplit('/').next().unwrap_or(identifier);
    after_slash.rsplit('#').next().unwrap_or(after_slash)
}

/// Normalize a graph identifier into a source-code identifier.
pub fn normalize(identifier: &str, case: CasePolicy) -> SafeName {
    let segment = local_segment(identifier);

    let mut name = String::with_capacity(segment.len());
    for c in segment.chars() {
        let c = if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' };
        // collapse runs of underscores as we go
        if c == '_' && name.ends_with('_') {
            continue;
        }
        name.push(c);
    }

    let trimmed = name.trim_matches('_');
    let mut name = if trimmed.is_empty() {
        UNNAMED.to_string()
    } else if trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", trimmed)
    } else {
        trimmed.to_string()
    };

    if case == CasePolicy::Lower {
        name.make_ascii_lowercase();
    }
    SafeName(name)
}
