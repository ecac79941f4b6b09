//! AWS SDK backed provider for the oamstack onboarding driver.
//!
//! [`AwsProvider`] implements the `oamstack-core` provider traits with the
//! OAM, CloudFormation and STS SDK clients. Credentials come from the
//! standard AWS configuration chain, optionally pinned to a named profile;
//! clients are built once per region and reused.

pub mod client;
pub mod provider;

pub use client::{ClientCache, RegionClients, load_sdk_config};
pub use provider::AwsProvider;
