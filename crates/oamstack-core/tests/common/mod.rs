//! Recording fake provider shared by the driver tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use oamstack_core::provider::{
    CreateStackInstancesRequest, CreateStackSetRequest, DeploymentTargets, ProviderResult, Sink,
};
use oamstack_core::{AccountId, AwsRegion, IdentityOps, ProviderError, SinkOps, StackSetOps};

/// Monitoring account returned by the fake identity lookup.
pub const MONITORING_ACCOUNT: &str = "123456789012";

/// Provider operations the fake can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    ListSinks,
    CreateSink,
    PutSinkPolicy,
    CallerAccountId,
    StackSetExists,
    CreateStackSet,
    CreateStackInstances,
}

/// One recorded provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListSinks(String),
    CreateSink { region: String, name: String },
    PutSinkPolicy { region: String, sink_arn: String },
    CallerAccountId(String),
    StackSetExists { region: String, name: String },
    CreateStackSet { region: String, name: String },
    CreateStackInstances {
        region: String,
        stack_set: String,
        targets: DeploymentTargets,
    },
}

impl Call {
    pub fn op(&self) -> Op {
        match self {
            Self::ListSinks(_) => Op::ListSinks,
            Self::CreateSink { .. } => Op::CreateSink,
            Self::PutSinkPolicy { .. } => Op::PutSinkPolicy,
            Self::CallerAccountId(_) => Op::CallerAccountId,
            Self::StackSetExists { .. } => Op::StackSetExists,
            Self::CreateStackSet { .. } => Op::CreateStackSet,
            Self::CreateStackInstances { .. } => Op::CreateStackInstances,
        }
    }

    pub fn region(&self) -> &str {
        match self {
            Self::ListSinks(region) | Self::CallerAccountId(region) => region,
            Self::CreateSink { region, .. }
            | Self::PutSinkPolicy { region, .. }
            | Self::StackSetExists { region, .. }
            | Self::CreateStackSet { region, .. }
            | Self::CreateStackInstances { region, .. } => region,
        }
    }
}

#[derive(Debug, Default)]
struct State {
    sinks: HashMap<String, Vec<Sink>>,
    stack_sets: HashSet<(String, String)>,
    failures: HashSet<(Op, String)>,
    calls: Vec<Call>,
    policies: Vec<String>,
    stack_set_requests: Vec<CreateStackSetRequest>,
    instance_requests: Vec<CreateStackInstancesRequest>,
}

/// In-memory provider that records every call and mutates its own state the
/// way AWS would.
#[derive(Debug, Default)]
pub struct FakeProvider {
    state: Mutex<State>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend a sink already exists in `region`.
    pub fn with_sink(self, region: &str, name: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .sinks
            .entry(region.to_owned())
            .or_default()
            .push(sink_for(region, name));
        self
    }

    /// Pretend a StackSet named `name` already exists in `region`.
    pub fn with_stack_set(self, region: &str, name: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .stack_sets
            .insert((region.to_owned(), name.to_owned()));
        self
    }

    /// Make `op` fail in `region`.
    pub fn failing(self, op: Op, region: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert((op, region.to_owned()));
        self
    }

    /// Stop failing every operation.
    pub fn heal(&self) {
        self.state.lock().unwrap().failures.clear();
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn ops(&self) -> Vec<Op> {
        self.calls().iter().map(Call::op).collect()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn policies(&self) -> Vec<String> {
        self.state.lock().unwrap().policies.clone()
    }

    pub fn stack_set_requests(&self) -> Vec<CreateStackSetRequest> {
        self.state.lock().unwrap().stack_set_requests.clone()
    }

    pub fn instance_requests(&self) -> Vec<CreateStackInstancesRequest> {
        self.state.lock().unwrap().instance_requests.clone()
    }

    fn record(&self, call: Call) -> ProviderResult<()> {
        let mut state = self.state.lock().unwrap();
        let key = (call.op(), call.region().to_owned());
        state.calls.push(call);
        if state.failures.contains(&key) {
            return Err(ProviderError::new(format!(
                "injected failure: {:?} in {}",
                key.0, key.1
            )));
        }
        Ok(())
    }
}

pub fn sink_for(region: &str, name: &str) -> Sink {
    Sink {
        arn: format!("arn:aws:oam:{region}:{MONITORING_ACCOUNT}:sink/{name}"),
        name: name.to_owned(),
    }
}

#[async_trait::async_trait]
impl SinkOps for FakeProvider {
    async fn list_sinks(&self, region: &AwsRegion) -> ProviderResult<Vec<Sink>> {
        self.record(Call::ListSinks(region.to_string()))?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .sinks
            .get(region.as_str())
            .cloned()
            .unwrap_or_default())
    }

    async fn create_sink(&self, region: &AwsRegion, name: &str) -> ProviderResult<Sink> {
        self.record(Call::CreateSink {
            region: region.to_string(),
            name: name.to_owned(),
        })?;
        let sink = sink_for(region.as_str(), name);
        self.state
            .lock()
            .unwrap()
            .sinks
            .entry(region.to_string())
            .or_default()
            .push(sink.clone());
        Ok(sink)
    }

    async fn put_sink_policy(
        &self,
        region: &AwsRegion,
        sink_arn: &str,
        policy: &str,
    ) -> ProviderResult<()> {
        self.record(Call::PutSinkPolicy {
            region: region.to_string(),
            sink_arn: sink_arn.to_owned(),
        })?;
        self.state.lock().unwrap().policies.push(policy.to_owned());
        Ok(())
    }
}

#[async_trait::async_trait]
impl IdentityOps for FakeProvider {
    async fn caller_account_id(&self, region: &AwsRegion) -> ProviderResult<AccountId> {
        self.record(Call::CallerAccountId(region.to_string()))?;
        AccountId::new(MONITORING_ACCOUNT).map_err(|e| ProviderError::with_source("bad id", e))
    }
}

#[async_trait::async_trait]
impl StackSetOps for FakeProvider {
    async fn stack_set_exists(&self, region: &AwsRegion, name: &str) -> ProviderResult<bool> {
        self.record(Call::StackSetExists {
            region: region.to_string(),
            name: name.to_owned(),
        })?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .stack_sets
            .contains(&(region.to_string(), name.to_owned())))
    }

    async fn create_stack_set(
        &self,
        region: &AwsRegion,
        request: CreateStackSetRequest,
    ) -> ProviderResult<String> {
        self.record(Call::CreateStackSet {
            region: region.to_string(),
            name: request.name.clone(),
        })?;
        let id = format!("{}:0f1e2d3c", request.name);
        let mut state = self.state.lock().unwrap();
        state
            .stack_sets
            .insert((region.to_string(), request.name.clone()));
        state.stack_set_requests.push(request);
        Ok(id)
    }

    async fn create_stack_instances(
        &self,
        region: &AwsRegion,
        request: CreateStackInstancesRequest,
    ) -> ProviderResult<String> {
        self.record(Call::CreateStackInstances {
            region: region.to_string(),
            stack_set: request.stack_set.clone(),
            targets: request.deployment_targets.clone(),
        })?;
        self.state.lock().unwrap().instance_requests.push(request);
        Ok("op-1".to_owned())
    }
}
