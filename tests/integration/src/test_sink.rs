//! OAM sink integration tests.

#[cfg(test)]
mod tests {
    use oamstack_core::SinkOps;

    use crate::{live_provider, test_region};

    #[tokio::test]
    #[ignore = "requires AWS credentials"]
    async fn test_should_list_sinks_with_arns_in_region() {
        let provider = live_provider();
        let region = test_region();

        let sinks = provider.list_sinks(&region).await.unwrap();

        for sink in &sinks {
            assert!(sink.arn.starts_with("arn:aws"), "unexpected ARN {}", sink.arn);
            assert!(sink.arn.contains(region.as_str()));
            assert!(!sink.name.is_empty());
        }
    }
}
