//! CloudFormation template for the member-account links.
//!
//! The template is plain YAML with `{{ Name }}` placeholders. Only two names
//! are defined: `MonitoringAccountID` and `SinkARN`. Rendering fails on any
//! other placeholder.

use std::path::Path;

use crate::error::TemplateError;

/// Built-in link template.
const LINK_TEMPLATE: &str = include_str!("../templates/link-cfn-template.yaml");

/// Placeholder for the monitoring (management) account ID.
pub const MONITORING_ACCOUNT_ID: &str = "MonitoringAccountID";

/// Placeholder for the sink ARN.
pub const SINK_ARN: &str = "SinkARN";

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// A link template ready to be rendered for one region.
#[derive(Debug, Clone)]
pub struct LinkTemplate {
    source: String,
}

impl Default for LinkTemplate {
    fn default() -> Self {
        Self::new(LINK_TEMPLATE)
    }
}

impl LinkTemplate {
    /// Wrap a template body.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Load a template body from disk.
    pub fn from_path(path: &Path) -> Result<Self, TemplateError> {
        let source = std::fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(source))
    }

    /// Raw template body.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Substitute the monitoring account ID and sink ARN.
    pub fn render(
        &self,
        monitoring_account_id: &str,
        sink_arn: &str,
    ) -> Result<String, TemplateError> {
        substitute(
            &self.source,
            &[
                (MONITORING_ACCOUNT_ID, monitoring_account_id),
                (SINK_ARN, sink_arn),
            ],
        )
    }
}

fn substitute(source: &str, vars: &[(&str, &str)]) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;
    let mut offset = 0;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + OPEN.len()..];
        let end = after_open
            .find(CLOSE)
            .ok_or(TemplateError::UnterminatedPlaceholder(offset + start))?;

        let name = after_open[..end].trim();
        let value = vars
            .iter()
            .find_map(|(k, v)| (*k == name).then_some(*v))
            .ok_or_else(|| TemplateError::UnresolvedPlaceholder(name.to_owned()))?;
        out.push_str(value);

        let consumed = start + OPEN.len() + end + CLOSE.len();
        offset += consumed;
        rest = &rest[consumed..];
    }
    out.push_str(rest);

    Ok(out)
}
