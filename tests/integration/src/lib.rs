//! Integration tests for the AWS-backed provider.
//!
//! Tests that talk to a real AWS account are marked `#[ignore]` so they don't
//! run during normal `cargo test`. They only issue read calls and need
//! credentials for the monitoring account (`AWS_PROFILE` or the default
//! chain).
//!
//! Run them with:
//! ```text
//! OAMSTACK_TEST_REGION=eu-west-1 cargo test -p oamstack-integration -- --ignored
//! ```

use std::sync::Once;

use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;
use aws_credential_types::provider::SharedCredentialsProvider;
use oamstack_aws::AwsProvider;
use oamstack_core::AwsRegion;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Region the live tests run against.
#[must_use]
pub fn test_region() -> AwsRegion {
    AwsRegion::new(std::env::var("OAMSTACK_TEST_REGION").unwrap_or_else(|_| "us-east-1".to_owned()))
}

/// Provider using the ambient credential chain.
#[must_use]
pub fn live_provider() -> AwsProvider {
    init_tracing();
    AwsProvider::new(std::env::var("AWS_PROFILE").ok())
}

/// Provider whose every request goes to a closed local port with static
/// credentials and no retries, so each call fails fast without network access.
#[must_use]
pub fn unreachable_provider() -> AwsProvider {
    init_tracing();

    let creds = Credentials::new("test", "test", None, None, "integration-test");
    let config = SdkConfig::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(SharedCredentialsProvider::new(creds))
        .endpoint_url("http://127.0.0.1:1")
        .retry_config(RetryConfig::disabled())
        .build();

    AwsProvider::from_sdk_config(config)
}

/// Generate a name no real sink or StackSet will have.
#[must_use]
pub fn unused_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("oamstack-test-{prefix}-{id}")
}

mod test_identity;
mod test_sink;
mod test_stack_set;
