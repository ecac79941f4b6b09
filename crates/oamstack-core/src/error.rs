//! Error types for the onboarding workflow.
//!
//! [`OnboardError`] names the phase that failed and the region it failed in,
//! and keeps the underlying cause as its source so the binary can print the
//! whole chain.

use std::path::PathBuf;

use crate::types::AwsRegion;

/// Invalid configuration, detected before any AWS call is made.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The organization ID was empty.
    #[error("organization ID must not be empty")]
    MissingOrganization,

    /// The organizational unit ID was empty.
    #[error("organizational unit ID must not be empty")]
    MissingOrganizationUnit,

    /// The sink name was empty.
    #[error("sink name must not be empty")]
    MissingSinkName,

    /// No regions were left to process.
    #[error("region list must not be empty")]
    EmptyRegionList,

    /// A region code did not have the expected shape.
    #[error("invalid AWS region code: {0:?}")]
    InvalidRegion(String),

    /// An account ID was not a 12-digit numeric string.
    #[error("invalid AWS account ID: {0} (must be 12-digit numeric string)")]
    InvalidAccountId(String),
}

/// Template loading or rendering failure.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// The template file could not be read.
    #[error("failed to read template {path}")]
    Read {
        /// Path of the template file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The template references a placeholder no value was supplied for.
    #[error("unresolved placeholder {{{{ {0} }}}}")]
    UnresolvedPlaceholder(String),

    /// A `{{` was opened but never closed.
    #[error("unterminated placeholder at byte {0}")]
    UnterminatedPlaceholder(usize),
}

/// Failure reported by a provider call.
///
/// Provider implementations flatten SDK errors into a readable message and
/// keep the original error as the source.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ProviderError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl ProviderError {
    /// Create an error with only a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create an error with a message and an underlying cause.
    #[must_use]
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// The human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Error aborting an onboarding run.
#[derive(Debug, thiserror::Error)]
pub enum OnboardError {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Listing existing sinks failed.
    #[error("checking if sink exists in {region}")]
    SinkLookup {
        /// Region being processed.
        region: AwsRegion,
        /// Underlying cause.
        #[source]
        source: ProviderError,
    },

    /// Creating the sink failed.
    #[error("creating sink in {region}")]
    SinkCreation {
        /// Region being processed.
        region: AwsRegion,
        /// Underlying cause.
        #[source]
        source: ProviderError,
    },

    /// Attaching the link policy to the sink failed.
    #[error("attaching policy to sink in {region}")]
    PolicyAttachment {
        /// Region being processed.
        region: AwsRegion,
        /// Underlying cause.
        #[source]
        source: ProviderError,
    },

    /// Looking up the monitoring account ID failed.
    #[error("getting monitoring account id in {region}")]
    IdentityLookup {
        /// Region being processed.
        region: AwsRegion,
        /// Underlying cause.
        #[source]
        source: ProviderError,
    },

    /// Rendering the link template failed.
    #[error("rendering link template for {region}")]
    TemplateRender {
        /// Region being processed.
        region: AwsRegion,
        /// Underlying cause.
        #[source]
        source: TemplateError,
    },

    /// Checking for an existing StackSet failed.
    #[error("checking if stackset exists in {region}")]
    StackSetLookup {
        /// Region being processed.
        region: AwsRegion,
        /// Underlying cause.
        #[source]
        source: ProviderError,
    },

    /// Creating the StackSet failed.
    #[error("creating stackset in {region}")]
    StackSetCreation {
        /// Region being processed.
        region: AwsRegion,
        /// Underlying cause.
        #[source]
        source: ProviderError,
    },

    /// Creating the stack instances failed.
    #[error("creating stack instances in {region}")]
    StackInstanceCreation {
        /// Region being processed.
        region: AwsRegion,
        /// Underlying cause.
        #[source]
        source: ProviderError,
    },

    /// Reading or appending the progress log failed.
    #[error("progress log {path}")]
    ProgressLog {
        /// Path of the progress log.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl OnboardError {
    /// The region the error occurred in, if it is tied to one.
    #[must_use]
    pub fn region(&self) -> Option<&AwsRegion> {
        match self {
            Self::SinkLookup { region, .. }
            | Self::SinkCreation { region, .. }
            | Self::PolicyAttachment { region, .. }
            | Self::IdentityLookup { region, .. }
            | Self::TemplateRender { region, .. }
            | Self::StackSetLookup { region, .. }
            | Self::StackSetCreation { region, .. }
            | Self::StackInstanceCreation { region, .. } => Some(region),
            Self::Config(_) | Self::ProgressLog { .. } => None,
        }
    }
}

/// Convenience result type for onboarding operations.
pub type OnboardResult<T> = Result<T, OnboardError>;
