//! STS identity integration tests.

#[cfg(test)]
mod tests {
    use oamstack_core::IdentityOps;

    use crate::{live_provider, test_region};

    #[tokio::test]
    #[ignore = "requires AWS credentials"]
    async fn test_should_resolve_caller_account() {
        let provider = live_provider();

        let account = provider.caller_account_id(&test_region()).await.unwrap();

        assert_eq!(account.as_str().len(), 12);
    }

    #[tokio::test]
    #[ignore = "requires AWS credentials"]
    async fn test_should_resolve_same_account_in_every_region() {
        let provider = live_provider();
        let first = provider
            .caller_account_id(&oamstack_core::AwsRegion::new("us-east-1"))
            .await
            .unwrap();
        let second = provider
            .caller_account_id(&oamstack_core::AwsRegion::new("eu-west-1"))
            .await
            .unwrap();

        assert_eq!(first, second);
    }
}
