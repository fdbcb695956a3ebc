use async_trait::async_trait;
use neynar_client::{NeynarClient, SignerRecord};

/// Signer issuance and status endpoints
#[async_trait]
pub trait SignerApi: Send + Sync {
    async fn issue_signer(&self) -> neynar_client::Result<SignerRecord>;

    async fn signer_status(&self, credential_id: &str) -> neynar_client::Result<SignerRecord>;
}

#[async_trait]
impl SignerApi for NeynarClient {
    async fn issue_signer(&self) -> neynar_client::Result<SignerRecord> {
        self.create_signer().await
    }

    async fn signer_status(&self, credential_id: &str) -> neynar_client::Result<SignerRecord> {
        self.lookup_signer(credential_id).await
    }
}
