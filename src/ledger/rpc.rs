//! JSON-RPC client for an Odoo-style ledger store.
//!
//! Registry lookups go through `/web/dataset/search_read`; creations go
//! through `/web/dataset/call_kw` with the usual `(0, 0, vals)` line tuples
//! and `(6, 0, ids)` tax links on the document payload.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::models::{CreatedRecord, DocumentDraft, DocumentKind};

use super::{EntityRecord, LedgerError, LedgerStore, TaxRecord};

const SEARCH_LIMIT: u32 = 50;

pub struct JsonRpcLedgerStore {
    base_url: String,
    database: String,
    client: reqwest::blocking::Client,
}

impl JsonRpcLedgerStore {
    pub fn new(base_url: &str, database: &str, timeout_secs: u64) -> Result<Self, LedgerError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .cookie_store(true)
            .build()
            .map_err(|e| LedgerError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            database: database.to_string(),
            client,
        })
    }

    /// Authenticate the underlying session. The session cookie is held by
    /// the HTTP client's cookie store.
    pub fn authenticate(&self, login: &str, password: &str) -> Result<(), LedgerError> {
        let _: Value = self.call(
            "/web/session/authenticate",
            json!({
                "db": self.database,
                "login": login,
                "password": password,
            }),
        )?;
        Ok(())
    }

    fn call<T: DeserializeOwned>(&self, path: &str, params: Value) -> Result<T, LedgerError> {
        #[derive(Deserialize)]
        struct RpcEnvelope<T> {
            result: Option<T>,
            error: Option<RpcFault>,
        }

        #[derive(Deserialize)]
        struct RpcFault {
            message: String,
        }

        let url = format!("{}{}", self.base_url, path);
        let body = json!({
            "jsonrpc": "2.0",
            "method": "call",
            "params": params,
        });

        let response = self.client.post(&url).json(&body).send().map_err(|e| {
            if e.is_connect() {
                LedgerError::Connection(self.base_url.clone())
            } else {
                LedgerError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LedgerError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: RpcEnvelope<T> = response
            .json()
            .map_err(|e| LedgerError::ResponseParsing(e.to_string()))?;

        if let Some(fault) = envelope.error {
            return Err(LedgerError::Rpc(fault.message));
        }
        envelope
            .result
            .ok_or_else(|| LedgerError::ResponseParsing("missing result".into()))
    }

    fn search_read(
        &self,
        model: &str,
        domain: Value,
        fields: &[&str],
    ) -> Result<Vec<Value>, LedgerError> {
        #[derive(Deserialize)]
        struct SearchReadResult {
            records: Vec<Value>,
        }

        let result: SearchReadResult = self.call(
            "/web/dataset/search_read",
            json!({
                "model": model,
                "domain": domain,
                "fields": fields,
                "limit": SEARCH_LIMIT,
                "sort": "id asc",
            }),
        )?;
        Ok(result.records)
    }

    fn create(&self, model: &str, vals: Value) -> Result<i64, LedgerError> {
        self.call(
            "/web/dataset/call_kw",
            json!({
                "model": model,
                "method": "create",
                "args": [vals],
                "kwargs": {},
            }),
        )
    }

    fn read_name(&self, model: &str, id: i64) -> Result<String, LedgerError> {
        let records = self.search_read(model, json!([["id", "=", id]]), &["name"])?;
        Ok(records
            .first()
            .and_then(|r| r.get("name"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string())
    }

    fn search_entities(&self, model: &str, query: &str) -> Result<Vec<EntityRecord>, LedgerError> {
        let records = self.search_read(
            model,
            json!([["name", "ilike", query.trim()]]),
            &["id", "name"],
        )?;
        Ok(records
            .into_iter()
            .filter_map(|r| {
                Some(EntityRecord {
                    id: r.get("id")?.as_i64()?,
                    name: r.get("name")?.as_str()?.to_string(),
                })
            })
            .collect())
    }
}

/// Build the creation payload for a draft, matching the ledger's per-kind
/// model and line field names.
fn document_vals(draft: &DocumentDraft) -> (&'static str, Value) {
    let date = draft.document_date.format("%Y-%m-%d").to_string();

    match draft.kind {
        DocumentKind::Invoice => {
            let lines: Vec<Value> = draft
                .lines
                .iter()
                .map(|line| {
                    let mut vals = json!({
                        "name": line.description,
                        "quantity": line.quantity,
                        "price_unit": line.unit_price,
                    });
                    if let Some(tax) = &line.resolved_tax {
                        vals["tax_ids"] = json!([[6, 0, [tax.id]]]);
                    }
                    json!([0, 0, vals])
                })
                .collect();

            let mut vals = json!({
                "move_type": "out_invoice",
                "partner_id": draft.counterparty.id,
                "invoice_date": date,
                "invoice_line_ids": lines,
            });
            if let Some(due) = draft.due_or_expected_date {
                vals["invoice_date_due"] = json!(due.format("%Y-%m-%d").to_string());
            }
            if let Some(reference) = &draft.reference {
                vals["ref"] = json!(reference);
            }
            ("account.move", vals)
        }
        DocumentKind::PurchaseOrder | DocumentKind::SalesOrder => {
            let qty_field = match draft.kind {
                DocumentKind::PurchaseOrder => "product_qty",
                _ => "product_uom_qty",
            };
            let lines: Vec<Value> = draft
                .lines
                .iter()
                .map(|line| {
                    let mut vals = json!({
                        "name": line.description,
                        "price_unit": line.unit_price,
                    });
                    vals[qty_field] = json!(line.quantity);
                    if let Some(product) = &line.resolved_product {
                        vals["product_id"] = json!(product.id);
                    }
                    // Per-line scheduled dates exist only on purchase order
                    // lines; the sale model rejects unknown keys in create vals.
                    if draft.kind == DocumentKind::PurchaseOrder {
                        if let Some(expected) = line.expected_date {
                            vals["date_planned"] = json!(expected.format("%Y-%m-%d").to_string());
                        }
                    }
                    json!([0, 0, vals])
                })
                .collect();

            let mut vals = json!({
                "partner_id": draft.counterparty.id,
                "date_order": date,
                "order_line": lines,
            });
            if let Some(reference) = &draft.reference {
                vals["partner_ref"] = json!(reference);
            }
            let model = match draft.kind {
                DocumentKind::PurchaseOrder => "purchase.order",
                _ => "sale.order",
            };
            (model, vals)
        }
    }
}

impl LedgerStore for JsonRpcLedgerStore {
    fn search_partners(&self, query: &str) -> Result<Vec<EntityRecord>, LedgerError> {
        self.search_entities("res.partner", query)
    }

    fn search_products(&self, query: &str) -> Result<Vec<EntityRecord>, LedgerError> {
        self.search_entities("product.product", query)
    }

    fn create_product(&self, name: &str) -> Result<EntityRecord, LedgerError> {
        let id = self.create("product.product", json!({"name": name}))?;
        Ok(EntityRecord {
            id,
            name: name.to_string(),
        })
    }

    fn search_taxes(&self) -> Result<Vec<TaxRecord>, LedgerError> {
        let records = self.search_read("account.tax", json!([]), &["id", "name", "amount"])?;
        Ok(records
            .into_iter()
            .filter_map(|r| {
                Some(TaxRecord {
                    id: r.get("id")?.as_i64()?,
                    name: r.get("name")?.as_str()?.to_string(),
                    amount: r.get("amount")?.as_f64()?,
                })
            })
            .collect())
    }

    fn create_document(&self, draft: &DocumentDraft) -> Result<CreatedRecord, LedgerError> {
        let (model, vals) = document_vals(draft);
        let id = self.create(model, vals)?;
        let name = self.read_name(model, id)?;
        tracing::info!(model, id, "Ledger document created");
        Ok(CreatedRecord { id, name })
    }
}
