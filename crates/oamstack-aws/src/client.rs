//! Per-region SDK clients.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use dashmap::DashMap;
use tracing::debug;

use oamstack_core::AwsRegion;

/// The three service clients used in one region.
#[derive(Debug, Clone)]
pub struct RegionClients {
    /// Observability Access Manager.
    pub oam: aws_sdk_oam::Client,
    /// CloudFormation.
    pub cloudformation: aws_sdk_cloudformation::Client,
    /// Security Token Service.
    pub sts: aws_sdk_sts::Client,
}

impl RegionClients {
    /// Build all clients from one shared SDK configuration.
    #[must_use]
    pub fn from_conf(config: &SdkConfig) -> Self {
        Self {
            oam: aws_sdk_oam::Client::new(config),
            cloudformation: aws_sdk_cloudformation::Client::new(config),
            sts: aws_sdk_sts::Client::new(config),
        }
    }
}

/// Lazily builds and caches [`RegionClients`] for a credential profile.
#[derive(Debug, Default)]
pub struct ClientCache {
    profile: Option<String>,
    base: Option<SdkConfig>,
    clients: DashMap<AwsRegion, RegionClients>,
}

impl ClientCache {
    /// Create a cache resolving credentials from `profile`, or from the
    /// default chain when `None`.
    #[must_use]
    pub fn new(profile: Option<String>) -> Self {
        Self {
            profile,
            base: None,
            clients: DashMap::new(),
        }
    }

    /// Create a cache deriving every region's configuration from `base`.
    ///
    /// Credentials, endpoint and retry settings are taken from `base`; only
    /// the region is replaced.
    #[must_use]
    pub fn from_sdk_config(base: SdkConfig) -> Self {
        Self {
            profile: None,
            base: Some(base),
            clients: DashMap::new(),
        }
    }

    /// Clients for `region`, loading the SDK configuration on first use.
    pub async fn get(&self, region: &AwsRegion) -> RegionClients {
        if let Some(clients) = self.clients.get(region) {
            return clients.clone();
        }

        let config = match &self.base {
            Some(base) => base
                .to_builder()
                .region(Region::new(region.to_string()))
                .build(),
            None => load_sdk_config(self.profile.as_deref(), region).await,
        };
        let clients = RegionClients::from_conf(&config);
        self.clients.insert(region.clone(), clients.clone());
        clients
    }
}

/// Resolve credentials and settings for `region` from the standard AWS
/// configuration sources.
pub async fn load_sdk_config(profile: Option<&str>, region: &AwsRegion) -> SdkConfig {
    debug!(%region, profile = profile.unwrap_or("default"), "loading AWS configuration");
    let mut loader =
        aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_string()));
    if let Some(profile) = profile {
        loader = loader.profile_name(profile);
    }
    loader.load().await
}
