//! Capability traits between the onboarding driver and AWS.
//!
//! The driver only talks to these traits. `oamstack-aws` implements them on
//! top of the AWS SDK; tests implement them with in-memory fakes.
//!
//! The traits use `#[async_trait]` because the driver holds the provider as a
//! trait object.

use serde::Serialize;

use crate::error::ProviderError;
use crate::types::{AccountId, AwsRegion};

/// Result type for provider calls.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// An OAM sink as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sink {
    /// Sink ARN.
    pub arn: String,
    /// Human-friendly sink name.
    pub name: String,
}

/// How the accounts of the target organizational units are filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountFilterType {
    /// Deploy to every account in the organizational units.
    None,
    /// Deploy to every account in the organizational units except the listed ones.
    Difference,
}

impl AccountFilterType {
    /// CloudFormation wire value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Difference => "DIFFERENCE",
        }
    }
}

/// Where stack instances are deployed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeploymentTargets {
    /// Target organizational units.
    pub organizational_unit_ids: Vec<String>,
    /// Account filter applied within the organizational units.
    pub account_filter_type: AccountFilterType,
    /// Accounts the filter applies to.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub accounts: Vec<String>,
}

impl DeploymentTargets {
    /// Target every account of `organization_unit` except `excluded`.
    ///
    /// An empty exclusion list means no filter at all.
    #[must_use]
    pub fn for_organization_unit(organization_unit: &str, excluded: &[AccountId]) -> Self {
        let account_filter_type = if excluded.is_empty() {
            AccountFilterType::None
        } else {
            AccountFilterType::Difference
        };
        Self {
            organizational_unit_ids: vec![organization_unit.to_owned()],
            account_filter_type,
            accounts: excluded.iter().map(|a| a.as_str().to_owned()).collect(),
        }
    }
}

/// Order in which a StackSet operation visits regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RegionConcurrency {
    /// One region at a time.
    Sequential,
}

impl RegionConcurrency {
    /// CloudFormation wire value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sequential => "SEQUENTIAL",
        }
    }
}

/// StackSet operation preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OperationPreferences {
    /// Region ordering.
    pub region_concurrency_type: RegionConcurrency,
    /// Maximum number of accounts processed concurrently.
    pub max_concurrent_count: i32,
}

impl Default for OperationPreferences {
    /// Sequential regions, one account at a time.
    fn default() -> Self {
        Self {
            region_concurrency_type: RegionConcurrency::Sequential,
            max_concurrent_count: 1,
        }
    }
}

/// Parameters of a service-managed, auto-deploying StackSet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateStackSetRequest {
    /// StackSet name.
    pub name: String,
    /// StackSet description.
    pub description: String,
    /// Rendered CloudFormation template.
    pub template_body: String,
    /// Keep member stacks when an account leaves the organizational unit.
    pub retain_stacks_on_account_removal: bool,
}

/// Parameters for deploying stack instances of an existing StackSet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateStackInstancesRequest {
    /// StackSet name or ID.
    pub stack_set: String,
    /// Accounts to deploy to.
    pub deployment_targets: DeploymentTargets,
    /// Regions to deploy to.
    pub regions: Vec<AwsRegion>,
    /// Rollout preferences.
    pub operation_preferences: OperationPreferences,
}

/// OAM sink management.
#[async_trait::async_trait]
pub trait SinkOps: Send + Sync {
    /// List every sink in `region`, following pagination.
    async fn list_sinks(&self, region: &AwsRegion) -> ProviderResult<Vec<Sink>>;

    /// Create a sink named `name` in `region`.
    async fn create_sink(&self, region: &AwsRegion, name: &str) -> ProviderResult<Sink>;

    /// Replace the resource policy of the sink `sink_arn`.
    async fn put_sink_policy(
        &self,
        region: &AwsRegion,
        sink_arn: &str,
        policy: &str,
    ) -> ProviderResult<()>;
}

/// Caller identity lookup.
#[async_trait::async_trait]
pub trait IdentityOps: Send + Sync {
    /// Account ID of the credentials in use.
    async fn caller_account_id(&self, region: &AwsRegion) -> ProviderResult<AccountId>;
}

/// CloudFormation StackSet management.
#[async_trait::async_trait]
pub trait StackSetOps: Send + Sync {
    /// Whether an active StackSet named `name` exists in `region`.
    async fn stack_set_exists(&self, region: &AwsRegion, name: &str) -> ProviderResult<bool>;

    /// Create a StackSet and return its ID.
    async fn create_stack_set(
        &self,
        region: &AwsRegion,
        request: CreateStackSetRequest,
    ) -> ProviderResult<String>;

    /// Start deploying stack instances and return the operation ID.
    async fn create_stack_instances(
        &self,
        region: &AwsRegion,
        request: CreateStackInstancesRequest,
    ) -> ProviderResult<String>;
}

/// Everything the onboarding driver needs from AWS.
pub trait Provider: SinkOps + IdentityOps + StackSetOps {}

impl<T: SinkOps + IdentityOps + StackSetOps> Provider for T {}
