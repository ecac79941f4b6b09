//! Common AWS type definitions shared across the workspace.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ConfigError;

/// The standard commercial regions onboarded when no region list is given.
pub const DEFAULT_REGIONS: &[&str] = &[
    "us-east-2",
    "us-east-1",
    "us-west-1",
    "us-west-2",
    "ap-south-1",
    "ap-northeast-3",
    "ap-northeast-2",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-northeast-1",
    "ca-central-1",
    "eu-central-1",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "eu-north-1",
    "sa-east-1",
];

static REGION_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z]{2}(-gov|-iso[a-z]?)?-[a-z]+-\d+$").expect("region pattern is valid")
});

/// AWS Account ID (12-digit string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Create a new account ID from a string.
    ///
    /// # Errors
    /// Returns an error if the account ID is not a 12-digit numeric string.
    pub fn new(id: impl Into<String>) -> Result<Self, ConfigError> {
        let id = id.into();
        if id.len() != 12 || !id.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::InvalidAccountId(id));
        }
        Ok(Self(id))
    }

    /// Get the account ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// AWS Region identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AwsRegion(String);

impl AwsRegion {
    /// Create a region without validating its format.
    #[must_use]
    pub fn new(region: impl Into<String>) -> Self {
        Self(region.into())
    }

    /// Parse a region code, rejecting anything that does not look like one
    /// (`us-east-1`, `us-gov-west-1`, ...).
    pub fn parse(region: &str) -> Result<Self, ConfigError> {
        let region = region.trim();
        if REGION_CODE.is_match(region) {
            Ok(Self(region.to_owned()))
        } else {
            Err(ConfigError::InvalidRegion(region.to_owned()))
        }
    }

    /// Whether the identifier looks like a region code.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        REGION_CODE.is_match(&self.0)
    }

    /// The default region list as owned values.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        DEFAULT_REGIONS.iter().map(|r| Self::new(*r)).collect()
    }

    /// Get the region as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AwsRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
