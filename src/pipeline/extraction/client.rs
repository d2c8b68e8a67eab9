use crate::models::DocumentKind;
use crate::pipeline::decode::{decode, RawExtraction};

use super::prompt::{build_extraction_prompt, EXTRACTION_SYSTEM_PROMPT};
use super::{ExtractionError, OracleClient};

/// Requests a structured extraction for one document from the oracle and
/// decodes whatever comes back.
///
/// The oracle is called exactly once per document: no retry, no backoff.
/// Errors surface only when the call itself fails or returns no usable text;
/// malformed content is the decoder's problem and degrades to a fallback
/// payload instead of erroring.
pub struct ExtractionClient {
    oracle: Box<dyn OracleClient>,
    model: String,
}

impl ExtractionClient {
    pub fn new(oracle: Box<dyn OracleClient>, model: &str) -> Self {
        Self {
            oracle,
            model: model.to_string(),
        }
    }

    pub fn extract(
        &self,
        kind: DocumentKind,
        source_text: &str,
    ) -> Result<RawExtraction, ExtractionError> {
        let prompt = build_extraction_prompt(kind, source_text);

        let completion = self
            .oracle
            .complete(&self.model, &prompt, EXTRACTION_SYSTEM_PROMPT)?;

        tracing::debug!(
            kind = kind.as_str(),
            completion_len = completion.len(),
            "Oracle completion received"
        );

        Ok(decode(&completion))
    }
}
