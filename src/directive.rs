/// Directive detection in target documents.
use regex::Regex;

use crate::error::Error;
use crate::types::ChunkQuery;

/// Sentinel used when neither the config nor the command line sets one.
pub const DEFAULT_SENTINEL: &str = "%DOCWEAVE";

/// Compiled directive pattern: sentinel, whitespace, then a chunk name or a
/// parenthesized group tag, alone on its line.
#[derive(Debug, Clone)]
pub struct DirectivePattern {
    /// Captures the directive payload.
    regex: Regex,
}

impl DirectivePattern {
    /// Compile the pattern for a sentinel token.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDirective` for an empty or whitespace-bearing sentinel.
    pub fn new(sentinel: &str) -> Result<Self, Error> {
        let invalid = |reason: &str| {
            return Error::InvalidDirective {
                reason: reason.to_string(),
                sentinel: sentinel.to_string(),
            };
        };
        if sentinel.is_empty() {
            return Err(invalid("sentinel is empty"));
        }
        if sentinel.chars().any(char::is_whitespace) {
            return Err(invalid("sentinel contains whitespace"));
        }
        let pattern = format!(r"^\s*{}\s+(\S.*?)\s*$", regex::escape(sentinel));
        let regex = Regex::new(&pattern).map_err(|e| return invalid(&e.to_string()))?;
        return Ok(Self { regex });
    }

    /// The query a document line asks for, or `None` if it is ordinary text.
    pub fn detect(&self, line: &str) -> Option<ChunkQuery> {
        let payload = self.regex.captures(line)?.get(1)?.as_str();
        let group = payload
            .strip_prefix('(')
            .and_then(|rest| return rest.strip_suffix(')'))
            .map(str::trim)
            .filter(|tag| return !tag.is_empty());
        return Some(match group {
            Some(tag) => ChunkQuery::Group(tag.to_string()),
            None => ChunkQuery::Name(payload.to_string()),
        });
    }
}
