//! Onboarding configuration.
//!
//! [`OnboardConfig`] carries everything the driver needs. The binary fills it
//! from CLI flags; tests build it directly.

use std::path::PathBuf;

use typed_builder::TypedBuilder;

use crate::error::ConfigError;
use crate::types::{AccountId, AwsRegion};

/// Sink (and StackSet) name used when none is given.
pub const DEFAULT_SINK_NAME: &str = "Centralized-Monitoring";

/// Progress log path used when none is given.
pub const DEFAULT_LOG_FILE: &str = "log.txt";

/// Description attached to every StackSet created by the driver.
pub const STACK_SET_DESCRIPTION: &str = "Source Account Links To Enable Cross-Account Monitoring";

/// Configuration for one onboarding run.
///
/// # Examples
///
/// ```
/// use oamstack_core::OnboardConfig;
///
/// let config = OnboardConfig::builder()
///     .organization("o-abc123")
///     .organization_unit("ou-abcd-12345678")
///     .build();
/// assert_eq!(config.sink_name, "Centralized-Monitoring");
/// assert_eq!(config.regions.len(), 17);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, TypedBuilder)]
pub struct OnboardConfig {
    /// AWS Organization ID allowed to link to the sinks.
    #[builder(setter(into))]
    pub organization: String,

    /// Organizational unit whose accounts receive stack instances.
    #[builder(setter(into))]
    pub organization_unit: String,

    /// Name for newly created sinks and their StackSets.
    #[builder(default = String::from(DEFAULT_SINK_NAME), setter(into))]
    pub sink_name: String,

    /// Named credential profile for the management account.
    #[builder(default, setter(strip_option, into))]
    pub profile: Option<String>,

    /// Regions to onboard, processed in order.
    #[builder(default = AwsRegion::defaults())]
    pub regions: Vec<AwsRegion>,

    /// Accounts in the organizational unit that must not receive a link.
    #[builder(default)]
    pub excluded_accounts: Vec<AccountId>,

    /// Append-only record of completed regions.
    #[builder(default = PathBuf::from(DEFAULT_LOG_FILE), setter(into))]
    pub log_file: PathBuf,

    /// Replacement for the built-in link template.
    #[builder(default, setter(strip_option, into))]
    pub template_file: Option<PathBuf>,
}

impl OnboardConfig {
    /// Check the invariants the driver relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.organization.trim().is_empty() {
            return Err(ConfigError::MissingOrganization);
        }
        if self.organization_unit.trim().is_empty() {
            return Err(ConfigError::MissingOrganizationUnit);
        }
        if self.sink_name.trim().is_empty() {
            return Err(ConfigError::MissingSinkName);
        }
        if self.regions.is_empty() {
            return Err(ConfigError::EmptyRegionList);
        }
        if let Some(region) = self.regions.iter().find(|r| !r.is_valid()) {
            return Err(ConfigError::InvalidRegion(region.to_string()));
        }
        Ok(())
    }
}

/// Split a comma-separated list, trimming entries and dropping empty ones.
fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Parse a comma-separated region list such as `"us-east-1, eu-west-1"`.
pub fn parse_regions(raw: &str) -> Result<Vec<AwsRegion>, ConfigError> {
    let regions = split_list(raw)
        .map(AwsRegion::parse)
        .collect::<Result<Vec<_>, _>>()?;
    if regions.is_empty() {
        return Err(ConfigError::EmptyRegionList);
    }
    Ok(regions)
}

/// Parse a comma-separated list of 12-digit account IDs.
pub fn parse_accounts(raw: &str) -> Result<Vec<AccountId>, ConfigError> {
    split_list(raw).map(AccountId::new).collect()
}
