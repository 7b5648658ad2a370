//! LogTransport - logs submission summary via tracing

use bytes::Bytes;
use codec::decode_struct;
use contracts::{ContractError, NativeAppSubmission, SubmissionTransport};
use tracing::{info, instrument, warn};

/// Transport that acknowledges without sending, for dry runs
pub struct LogTransport {
    name: String,
}

impl LogTransport {
    /// Create a new LogTransport with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn log_submission(&self, body: &Bytes, content_type: &str) {
        match decode_struct::<NativeAppSubmission>(body.clone()) {
            Ok(submission) => info!(
                transport = %self.name,
                bytes = body.len(),
                content_type,
                device_id = %submission.device_id,
                events = submission.events.len(),
                "Submission received"
            ),
            Err(e) => warn!(
                transport = %self.name,
                bytes = body.len(),
                error = %e,
                "Submission received but not decodable"
            ),
        }
    }
}

impl SubmissionTransport for LogTransport {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "log_transport_post",
        skip(self, body),
        fields(transport = %self.name, bytes = body.len())
    )]
    async fn post(&self, body: Bytes, content_type: &str) -> Result<(), ContractError> {
        self.log_submission(&body, content_type);
        Ok(())
    }
}
