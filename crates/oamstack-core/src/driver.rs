//! The onboarding driver.
//!
//! [`Onboarder::onboard`] walks the configured regions strictly in order. For
//! each region not yet in the progress log it resolves a sink, (re)attaches
//! the organization-scoped policy, makes sure a StackSet deploying the link
//! template exists, and finally records the region. The first failure aborts
//! the run; regions recorded before it stay recorded.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::{OnboardConfig, STACK_SET_DESCRIPTION};
use crate::error::{OnboardError, OnboardResult};
use crate::policy::sink_policy;
use crate::progress::ProgressLog;
use crate::provider::{
    CreateStackInstancesRequest, CreateStackSetRequest, DeploymentTargets, OperationPreferences,
    Provider, Sink,
};
use crate::template::LinkTemplate;
use crate::types::AwsRegion;

/// How far a region has progressed. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RegionStatus {
    /// Nothing done yet.
    Unprocessed,
    /// A sink exists (found or created).
    SinkResolved,
    /// The link policy is attached to the sink.
    PolicyAttached,
    /// A StackSet for the sink exists (found or created).
    StackSetResolved,
    /// The region is in the progress log.
    Logged,
}

impl RegionStatus {
    fn advance(&mut self, region: &AwsRegion, next: Self) {
        debug_assert!(next > *self, "region status must move forward");
        debug!(%region, from = ?*self, to = ?next, "region status");
        *self = next;
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnboardReport {
    /// Regions onboarded during this run.
    pub processed: Vec<AwsRegion>,
    /// Regions skipped because they were already recorded.
    pub skipped: Vec<AwsRegion>,
}

/// Drives onboarding of every configured region.
pub struct Onboarder {
    provider: Arc<dyn Provider>,
    config: OnboardConfig,
    template: LinkTemplate,
}

impl std::fmt::Debug for Onboarder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Onboarder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Onboarder {
    /// Create a driver.
    #[must_use]
    pub fn new(provider: Arc<dyn Provider>, config: OnboardConfig, template: LinkTemplate) -> Self {
        Self {
            provider,
            config,
            template,
        }
    }

    /// Onboard every configured region that is not yet in the progress log.
    pub async fn onboard(&self) -> OnboardResult<OnboardReport> {
        self.config.validate()?;
        let mut log = ProgressLog::open(&self.config.log_file).await?;
        let mut report = OnboardReport::default();

        info!("========== STARTING ==========");
        for region in &self.config.regions {
            if log.contains(region) {
                info!(%region, "already processed {region}, skipping...");
                report.skipped.push(region.clone());
                continue;
            }

            let mut status = self.onboard_region(region).await?;
            log.record(region).await?;
            status.advance(region, RegionStatus::Logged);
            report.processed.push(region.clone());
        }
        info!(
            processed = report.processed.len(),
            skipped = report.skipped.len(),
            "========== COMPLETED =========="
        );

        Ok(report)
    }

    async fn onboard_region(&self, region: &AwsRegion) -> OnboardResult<RegionStatus> {
        let mut status = RegionStatus::Unprocessed;

        let sink = self.resolve_sink(region).await?;
        status.advance(region, RegionStatus::SinkResolved);

        info!(%region, sink = %sink.name, "attaching policy to sink {} in {region}", sink.name);
        self.provider
            .put_sink_policy(region, &sink.arn, &sink_policy(&self.config.organization))
            .await
            .map_err(|source| OnboardError::PolicyAttachment {
                region: region.clone(),
                source,
            })?;
        info!(%region, "successfully attached policy to sink in {region}");
        status.advance(region, RegionStatus::PolicyAttached);

        info!(%region, "creating stackset and stacks in {region}");
        let exists = self
            .provider
            .stack_set_exists(region, &sink.name)
            .await
            .map_err(|source| OnboardError::StackSetLookup {
                region: region.clone(),
                source,
            })?;
        if exists {
            info!(%region, stack_set = %sink.name, "stackset {} already exists in {region}", sink.name);
        } else {
            self.create_stack_set(region, &sink).await?;
            info!(%region, "successfully created stackset and stacks in {region}");
        }
        status.advance(region, RegionStatus::StackSetResolved);

        Ok(status)
    }

    async fn resolve_sink(&self, region: &AwsRegion) -> OnboardResult<Sink> {
        info!(%region, "checking if sink exists in {region}");
        let sinks = self
            .provider
            .list_sinks(region)
            .await
            .map_err(|source| OnboardError::SinkLookup {
                region: region.clone(),
                source,
            })?;

        if let Some(sink) = select_sink(&sinks, &self.config.sink_name) {
            info!(%region, sink = %sink.name, "sink {} already exists in {region}", sink.name);
            return Ok(sink.clone());
        }

        info!(%region, "creating sink in {region}");
        let sink = self
            .provider
            .create_sink(region, &self.config.sink_name)
            .await
            .map_err(|source| OnboardError::SinkCreation {
                region: region.clone(),
                source,
            })?;
        info!(%region, sink = %sink.arn, "successfully created sink in {region}");
        Ok(sink)
    }

    async fn create_stack_set(&self, region: &AwsRegion, sink: &Sink) -> OnboardResult<()> {
        let account_id = self
            .provider
            .caller_account_id(region)
            .await
            .map_err(|source| OnboardError::IdentityLookup {
                region: region.clone(),
                source,
            })?;

        let template_body = self
            .template
            .render(account_id.as_str(), &sink.arn)
            .map_err(|source| OnboardError::TemplateRender {
                region: region.clone(),
                source,
            })?;

        let stack_set_id = self
            .provider
            .create_stack_set(
                region,
                CreateStackSetRequest {
                    name: sink.name.clone(),
                    description: STACK_SET_DESCRIPTION.to_owned(),
                    template_body,
                    retain_stacks_on_account_removal: false,
                },
            )
            .await
            .map_err(|source| OnboardError::StackSetCreation {
                region: region.clone(),
                source,
            })?;
        debug!(%region, %stack_set_id, "created stackset");

        let deployment_targets = DeploymentTargets::for_organization_unit(
            &self.config.organization_unit,
            &self.config.excluded_accounts,
        );
        let operation_id = self
            .provider
            .create_stack_instances(
                region,
                CreateStackInstancesRequest {
                    stack_set: stack_set_id,
                    deployment_targets,
                    regions: vec![region.clone()],
                    operation_preferences: OperationPreferences::default(),
                },
            )
            .await
            .map_err(|source| OnboardError::StackInstanceCreation {
                region: region.clone(),
                source,
            })?;
        debug!(%region, %operation_id, "started stack instance deployment");

        Ok(())
    }
}

/// Pick the sink to reuse among those already in a region.
///
/// A sink named `preferred` wins; otherwise the first listed sink is used.
fn select_sink<'a>(sinks: &'a [Sink], preferred: &str) -> Option<&'a Sink> {
    if sinks.len() > 1 {
        let names: Vec<&str> = sinks.iter().map(|s| s.name.as_str()).collect();
        warn!(?names, preferred, "multiple sinks found");
    }
    sinks
        .iter()
        .find(|s| s.name == preferred)
        .or_else(|| sinks.first())
}
