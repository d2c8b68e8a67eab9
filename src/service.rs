//! Request orchestration: one stateless pipeline invocation per document.

use std::sync::Arc;

use uuid::Uuid;

use crate::config::ServiceConfig;
use crate::ledger::{EntityResolver, JsonRpcLedgerStore, LedgerStore};
use crate::models::{CreatedRecord, DocumentKind};
use crate::pipeline::assemble::assemble;
use crate::pipeline::extraction::{ExtractionClient, HttpOracleClient};
use crate::pipeline::IntakeError;

/// Document intake service. Holds the injected extraction client and ledger
/// store; carries no per-request state, so concurrent invocations are fully
/// independent.
pub struct IntakeService {
    extraction: ExtractionClient,
    store: Arc<dyn LedgerStore>,
}

impl IntakeService {
    pub fn new(extraction: ExtractionClient, store: Arc<dyn LedgerStore>) -> Self {
        Self { extraction, store }
    }

    /// Build a service from configuration: HTTP oracle client plus JSON-RPC
    /// ledger store, both constructed per process (no ambient globals).
    pub fn from_config(config: &ServiceConfig) -> Result<Self, IntakeError> {
        let oracle = HttpOracleClient::new(
            &config.oracle.base_url,
            config.oracle.api_key.as_deref(),
            config.oracle.timeout_secs,
        )?;
        let extraction = ExtractionClient::new(Box::new(oracle), &config.oracle.model);

        let store = JsonRpcLedgerStore::new(
            &config.ledger.base_url,
            &config.ledger.database,
            config.ledger.timeout_secs,
        )?;
        if let (Some(login), Some(password)) =
            (config.ledger.login.as_deref(), config.ledger.password.as_deref())
        {
            store.authenticate(login, password)?;
        }

        Ok(Self::new(extraction, Arc::new(store)))
    }

    /// Run the full pipeline for one document: extract, assemble, submit.
    /// The draft reaches the ledger exactly once, fully assembled; there is
    /// no partial persistence to roll back.
    pub fn process(
        &self,
        kind: DocumentKind,
        source_text: &str,
    ) -> Result<CreatedRecord, IntakeError> {
        let request_id = Uuid::new_v4();
        let _span = tracing::info_span!(
            "process_document",
            request_id = %request_id,
            kind = kind.as_str()
        )
        .entered();

        if source_text.trim().is_empty() {
            return Err(IntakeError::Validation("document text".into()));
        }

        let raw = self.extraction.extract(kind, source_text)?;
        tracing::debug!(keys = raw.len(), "Extraction decoded");

        let resolver = EntityResolver::new(self.store.as_ref());
        let draft = assemble(kind, &raw, &resolver)?;
        tracing::info!(
            number = %draft.document_number,
            counterparty = %draft.counterparty.name,
            lines = draft.lines.len(),
            "Draft assembled"
        );

        let created = self.store.create_document(&draft)?;
        tracing::info!(id = created.id, name = %created.name, "Document created in ledger");
        Ok(created)
    }
}
