//! Test-only service-account key pair.

use crate::cdn::ServiceAccountKey;

pub const TEST_PRIVATE_KEY_PEM: &str =
    include_str!("../../tests/fixtures/keys/service_account_private.pem");
pub const TEST_PUBLIC_KEY_PEM: &str =
    include_str!("../../tests/fixtures/keys/service_account_public.pem");

/// A service-account key signed with the fixture key, exchanging at `token_uri`.
pub fn test_service_account(token_uri: &str) -> ServiceAccountKey {
    ServiceAccountKey {
        key_type: "service_account".to_string(),
        project_id: Some("modkit-tests".to_string()),
        private_key_id: Some("test-key-id".to_string()),
        private_key: TEST_PRIVATE_KEY_PEM.to_string(),
        client_email: "uploader@modkit-tests.iam.gserviceaccount.com".to_string(),
        token_uri: token_uri.to_string(),
    }
}
