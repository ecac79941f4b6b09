//! Resource policy attached to every sink.

use serde_json::json;

/// Resource types member accounts may share through their links.
pub const SHARED_RESOURCE_TYPE: &str = "AWS::CloudWatch::Metric";

/// Build the sink policy allowing any principal in `organization_id` to
/// create or update a metrics-only link to the sink.
#[must_use]
pub fn sink_policy(organization_id: &str) -> String {
    json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Effect": "Allow",
            "Principal": "*",
            "Action": ["oam:CreateLink", "oam:UpdateLink"],
            "Resource": "*",
            "Condition": {
                "ForAllValues:StringEquals": {
                    "oam:ResourceTypes": SHARED_RESOURCE_TYPE
                },
                "ForAnyValue:StringEquals": {
                    "aws:PrincipalOrgID": organization_id
                }
            }
        }]
    })
    .to_string()
}
