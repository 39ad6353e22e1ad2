use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::sync::LazyLock;
use uuid::Uuid;

use crate::error::ConvertError;

static SIMPLE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[0-9a-f]{32}").expect("simple id pattern is valid"));

static HYPHENATED_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
        .expect("hyphenated id pattern is valid")
});

/// Identifier of a Notion block (pages are blocks too).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct BlockId(Uuid);

impl BlockId {
    pub fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Resolve a raw block id or a Notion URL into a canonical block id.
    ///
    /// URLs are searched for the first embedded 32-hex-digit identifier, e.g.
    /// `https://www.notion.so/team/Title-cec1568190834e1fa0ae72d268507aab`,
    /// falling back to a hyphenated UUID anywhere in the URL.
    /// Anything else must already be a UUID in simple or hyphenated form.
    pub fn resolve(input: &str) -> Result<Self, ConvertError> {
        let trimmed = input.trim();
        let candidate = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            SIMPLE_ID
                .find(trimmed)
                .or_else(|| HYPHENATED_ID.find(trimmed))
                .map(|m| m.as_str())
                .ok_or_else(|| ConvertError::Resolution(input.to_string()))?
        } else {
            trimmed
        };

        Uuid::try_parse(candidate)
            .map(Self)
            .map_err(|_| ConvertError::Resolution(input.to_string()))
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}
