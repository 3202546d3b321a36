use std::fmt;
use std::str::FromStr;
use crate::errors::AppError;

// @module: Video identifier validation

/// Literal prefix every public video identifier carries
pub const BV_PREFIX: &str = "BV";

/// A validated BV video identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bvid(String);

impl Bvid {
    /// Validate raw user input, trimming surrounding whitespace
    ///
    /// At least one character must follow the `BV` prefix, so a bare `BV` is rejected.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let trimmed = raw.trim();
        if trimmed.len() <= BV_PREFIX.len() || !trimmed.starts_with(BV_PREFIX) {
            return Err(AppError::InvalidIdentifier(trimmed.to_string()));
        }
        Ok(Bvid(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Bvid {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Bvid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Bvid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
