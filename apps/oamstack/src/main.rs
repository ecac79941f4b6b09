//! oamstack - onboard AWS accounts into centralized CloudWatch monitoring.
//!
//! Run from the management (monitoring) account. For every target region the
//! tool creates or reuses an OAM sink, attaches a policy allowing members of
//! the organization to link to it, and deploys a StackSet that creates the
//! link in each account of the organizational unit.
//!
//! # Usage
//!
//! ```text
//! oamstack --organization o-abc123 --organization-unit ou-abcd-12345678 \
//!     --regions us-east-1,eu-west-1 --excluded-accounts 111111111111
//! ```
//!
//! Completed regions are appended to `log.txt` (see `--log-file`); re-running
//! skips them.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |
//! | `AWS_PROFILE` | *(unset)* | Credential profile when `--profile` is not given |

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use oamstack_aws::AwsProvider;
use oamstack_core::config::{DEFAULT_LOG_FILE, DEFAULT_SINK_NAME};
use oamstack_core::{LinkTemplate, OnboardConfig, Onboarder, parse_accounts, parse_regions};

/// Version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Command-line flags.
#[derive(Debug, Parser)]
#[command(name = "oamstack", version, about, long_about = None)]
struct Cli {
    /// Unique identifier of your AWS Organization.
    #[arg(long)]
    organization: String,

    /// Organizational unit to centralize monitoring for.
    #[arg(long)]
    organization_unit: String,

    /// Human-friendly sink (and StackSet) name.
    #[arg(long, default_value = DEFAULT_SINK_NAME)]
    sink_name: String,

    /// AWS config profile of the management account; the default
    /// credential chain is used when omitted.
    #[arg(long)]
    profile: Option<String>,

    /// Comma-separated regions to onboard; defaults to the 17 standard regions.
    #[arg(long)]
    regions: Option<String>,

    /// Comma-separated account IDs to exclude (suspended accounts must be excluded).
    #[arg(long)]
    excluded_accounts: Option<String>,

    /// File recording regions that finished onboarding.
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// CloudFormation template to use instead of the built-in link template.
    #[arg(long)]
    template_file: Option<PathBuf>,

    /// Log level filter.
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `--log-level` value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    Ok(())
}

/// Turn parsed flags into a validated [`OnboardConfig`].
fn build_config(cli: Cli) -> Result<OnboardConfig> {
    let mut config = OnboardConfig::builder()
        .organization(cli.organization)
        .organization_unit(cli.organization_unit)
        .sink_name(cli.sink_name)
        .log_file(cli.log_file)
        .build();

    if let Some(raw) = cli.regions.as_deref() {
        config.regions = parse_regions(raw).context("invalid --regions")?;
    }
    if let Some(raw) = cli.excluded_accounts.as_deref() {
        config.excluded_accounts =
            parse_accounts(raw).context("invalid --excluded-accounts")?;
    }
    config.profile = cli.profile;
    config.template_file = cli.template_file;

    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Load the link template named in the config, or the built-in one.
fn load_template(config: &OnboardConfig) -> Result<LinkTemplate> {
    match &config.template_file {
        Some(path) => LinkTemplate::from_path(path).context("cannot load --template-file"),
        None => Ok(LinkTemplate::default()),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    let config = build_config(cli)?;
    let template = load_template(&config)?;

    info!(
        organization = %config.organization,
        organization_unit = %config.organization_unit,
        sink_name = %config.sink_name,
        profile = config.profile.as_deref().unwrap_or("default"),
        regions = config.regions.len(),
        excluded_accounts = config.excluded_accounts.len(),
        log_file = %config.log_file.display(),
        version = VERSION,
        "starting oamstack",
    );

    let provider = Arc::new(AwsProvider::new(config.profile.clone()));
    let report = Onboarder::new(provider, config, template)
        .onboard()
        .await
        .context("onboarding aborted")?;

    info!(
        processed = ?report.processed,
        skipped = ?report.skipped,
        "onboarding finished",
    );
    Ok(())
}
