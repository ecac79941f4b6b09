//! [`AwsProvider`]: the SDK-backed implementation of the provider traits.

use aws_sdk_cloudformation::operation::describe_stack_set::DescribeStackSetError;
use aws_sdk_cloudformation::types::{
    AccountFilterType, AutoDeployment, DeploymentTargets, PermissionModels, RegionConcurrencyType,
    StackSetOperationPreferences, StackSetStatus,
};
use aws_sdk_oam::error::DisplayErrorContext;
use tracing::{debug, warn};

use oamstack_core::provider::{
    self, CreateStackInstancesRequest, CreateStackSetRequest, OperationPreferences,
    ProviderResult, Sink,
};
use oamstack_core::{AccountId, AwsRegion, IdentityOps, ProviderError, SinkOps, StackSetOps};

use crate::client::ClientCache;

/// Provider calling OAM, CloudFormation and STS in the monitoring account.
#[derive(Debug, Default)]
pub struct AwsProvider {
    clients: ClientCache,
}

impl AwsProvider {
    /// Create a provider using the named credential profile, or the default
    /// credential chain when `profile` is `None`.
    #[must_use]
    pub fn new(profile: Option<String>) -> Self {
        Self {
            clients: ClientCache::new(profile),
        }
    }

    /// Create a provider from an explicit SDK configuration, e.g. one with a
    /// custom endpoint or static credentials.
    #[must_use]
    pub fn from_sdk_config(config: aws_config::SdkConfig) -> Self {
        Self {
            clients: ClientCache::from_sdk_config(config),
        }
    }
}

/// Flatten an SDK error into a [`ProviderError`], keeping it as the source.
fn sdk_error<E>(operation: &str, err: E) -> ProviderError
where
    E: std::error::Error + Send + Sync + 'static,
{
    ProviderError::with_source(format!("{operation}: {}", DisplayErrorContext(&err)), err)
}

fn missing_field(operation: &str, field: &str) -> ProviderError {
    ProviderError::new(format!("{operation} response missing {field}"))
}

/// Convert deployment targets into the SDK shape.
fn to_sdk_targets(targets: provider::DeploymentTargets) -> DeploymentTargets {
    let accounts = (!targets.accounts.is_empty()).then_some(targets.accounts);
    DeploymentTargets::builder()
        .set_organizational_unit_ids(Some(targets.organizational_unit_ids))
        .account_filter_type(AccountFilterType::from(
            targets.account_filter_type.as_str(),
        ))
        .set_accounts(accounts)
        .build()
}

/// Convert operation preferences into the SDK shape.
fn to_sdk_preferences(prefs: OperationPreferences) -> StackSetOperationPreferences {
    StackSetOperationPreferences::builder()
        .region_concurrency_type(RegionConcurrencyType::from(
            prefs.region_concurrency_type.as_str(),
        ))
        .max_concurrent_count(prefs.max_concurrent_count)
        .build()
}

#[async_trait::async_trait]
impl SinkOps for AwsProvider {
    async fn list_sinks(&self, region: &AwsRegion) -> ProviderResult<Vec<Sink>> {
        let oam = self.clients.get(region).await.oam;
        let mut sinks = Vec::new();
        let mut next_token = None;

        loop {
            let resp = oam
                .list_sinks()
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| sdk_error("oam:ListSinks", e))?;

            for item in resp.items() {
                match (item.arn(), item.name()) {
                    (Some(arn), Some(name)) => sinks.push(Sink {
                        arn: arn.to_owned(),
                        name: name.to_owned(),
                    }),
                    _ => warn!(%region, ?item, "ignoring sink without ARN or name"),
                }
            }

            match resp.next_token() {
                Some(token) => next_token = Some(token.to_owned()),
                None => break,
            }
        }

        debug!(%region, count = sinks.len(), "listed sinks");
        Ok(sinks)
    }

    async fn create_sink(&self, region: &AwsRegion, name: &str) -> ProviderResult<Sink> {
        let oam = self.clients.get(region).await.oam;
        let resp = oam
            .create_sink()
            .name(name)
            .send()
            .await
            .map_err(|e| sdk_error("oam:CreateSink", e))?;

        let arn = resp
            .arn()
            .ok_or_else(|| missing_field("oam:CreateSink", "Arn"))?;
        Ok(Sink {
            arn: arn.to_owned(),
            name: resp.name().unwrap_or(name).to_owned(),
        })
    }

    async fn put_sink_policy(
        &self,
        region: &AwsRegion,
        sink_arn: &str,
        policy: &str,
    ) -> ProviderResult<()> {
        let oam = self.clients.get(region).await.oam;
        oam.put_sink_policy()
            .sink_identifier(sink_arn)
            .policy(policy)
            .send()
            .await
            .map_err(|e| sdk_error("oam:PutSinkPolicy", e))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl IdentityOps for AwsProvider {
    async fn caller_account_id(&self, region: &AwsRegion) -> ProviderResult<AccountId> {
        let sts = self.clients.get(region).await.sts;
        let caller = sts
            .get_caller_identity()
            .send()
            .await
            .map_err(|e| sdk_error("sts:GetCallerIdentity", e))?;

        let account = caller
            .account()
            .ok_or_else(|| missing_field("sts:GetCallerIdentity", "Account"))?;
        AccountId::new(account)
            .map_err(|e| ProviderError::with_source("sts:GetCallerIdentity returned a bad account", e))
    }
}

#[async_trait::async_trait]
impl StackSetOps for AwsProvider {
    async fn stack_set_exists(&self, region: &AwsRegion, name: &str) -> ProviderResult<bool> {
        let cfn = self.clients.get(region).await.cloudformation;
        match cfn.describe_stack_set().stack_set_name(name).send().await {
            Ok(resp) => Ok(resp
                .stack_set()
                .is_some_and(|s| s.status() != Some(&StackSetStatus::Deleted))),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(DescribeStackSetError::is_stack_set_not_found_exception) =>
            {
                Ok(false)
            }
            Err(err) => Err(sdk_error("cloudformation:DescribeStackSet", err)),
        }
    }

    async fn create_stack_set(
        &self,
        region: &AwsRegion,
        request: CreateStackSetRequest,
    ) -> ProviderResult<String> {
        let cfn = self.clients.get(region).await.cloudformation;
        let auto_deployment = AutoDeployment::builder()
            .enabled(true)
            .retain_stacks_on_account_removal(request.retain_stacks_on_account_removal)
            .build();

        let resp = cfn
            .create_stack_set()
            .stack_set_name(request.name)
            .description(request.description)
            .template_body(request.template_body)
            .permission_model(PermissionModels::ServiceManaged)
            .auto_deployment(auto_deployment)
            .send()
            .await
            .map_err(|e| sdk_error("cloudformation:CreateStackSet", e))?;

        resp.stack_set_id()
            .map(ToOwned::to_owned)
            .ok_or_else(|| missing_field("cloudformation:CreateStackSet", "StackSetId"))
    }

    async fn create_stack_instances(
        &self,
        region: &AwsRegion,
        request: CreateStackInstancesRequest,
    ) -> ProviderResult<String> {
        let cfn = self.clients.get(region).await.cloudformation;
        let regions = request.regions.iter().map(ToString::to_string).collect();

        let resp = cfn
            .create_stack_instances()
            .stack_set_name(request.stack_set)
            .deployment_targets(to_sdk_targets(request.deployment_targets))
            .set_regions(Some(regions))
            .operation_preferences(to_sdk_preferences(request.operation_preferences))
            .send()
            .await
            .map_err(|e| sdk_error("cloudformation:CreateStackInstances", e))?;

        resp.operation_id()
            .map(ToOwned::to_owned)
            .ok_or_else(|| missing_field("cloudformation:CreateStackInstances", "OperationId"))
    }
}
