//! Core types, configuration, and the onboarding driver for oamstack.
//!
//! oamstack onboards the accounts of an AWS Organization into centralized
//! CloudWatch cross-account monitoring. In every target region of the
//! monitoring account it creates (or reuses) an Observability Access Manager
//! sink, attaches a policy letting organization members link to it, and
//! deploys a service-managed StackSet that creates the link in each member
//! account of an organizational unit.
//!
//! This crate has no AWS SDK dependency: the driver talks to the cloud
//! through the traits in [`provider`], implemented for real in
//! `oamstack-aws`.
//!
//! # Modules
//!
//! - [`config`] - Run configuration and list parsing
//! - [`driver`] - The per-region onboarding sequence
//! - [`error`] - Error taxonomy
//! - [`policy`] - Sink resource policy
//! - [`progress`] - Append-only progress log
//! - [`provider`] - Capability traits and request types
//! - [`template`] - Link template rendering
//! - [`types`] - Account and region identifiers

pub mod config;
pub mod driver;
pub mod error;
pub mod policy;
pub mod progress;
pub mod provider;
pub mod template;
pub mod types;

pub use config::{OnboardConfig, parse_accounts, parse_regions};
pub use driver::{OnboardReport, Onboarder, RegionStatus};
pub use error::{ConfigError, OnboardError, OnboardResult, ProviderError, TemplateError};
pub use progress::ProgressLog;
pub use provider::{IdentityOps, Provider, SinkOps, StackSetOps};
pub use template::LinkTemplate;
pub use types::{AccountId, AwsRegion, DEFAULT_REGIONS};
