//! SubmissionTransport trait - how encoded batches leave the process

use bytes::Bytes;

use crate::ContractError;

/// Delivers an encoded submission to the collector
#[trait_variant::make(SubmissionTransport: Send)]
pub trait LocalSubmissionTransport {
    /// Transport name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Send `body` with the given media type
    ///
    /// # Errors
    /// Returns a transport error when the collector did not acknowledge
    async fn post(&self, body: Bytes, content_type: &str) -> Result<(), ContractError>;
}
