//! CloudFormation StackSet integration tests.

#[cfg(test)]
mod tests {
    use oamstack_core::StackSetOps;

    use crate::{live_provider, test_region, unused_name};

    #[tokio::test]
    #[ignore = "requires AWS credentials"]
    async fn test_should_report_missing_stack_set_as_absent() {
        let provider = live_provider();

        let exists = provider
            .stack_set_exists(&test_region(), &unused_name("absent"))
            .await
            .unwrap();

        assert!(!exists);
    }
}
