use crate::models::DocumentKind;

pub const EXTRACTION_SYSTEM_PROMPT: &str = r#"
You are a business document extraction assistant. Your ONLY role is to convert
raw document text into a structured JSON payload. You extract information that
is explicitly present in the document.

RULES — ABSOLUTE, NO EXCEPTIONS:
1. Extract ONLY information explicitly stated in the document.
2. NEVER invent numbers, dates, names or totals that are not written.
3. If a field is unclear or missing, output null for that field.
4. Preserve amounts and dates verbatim as they appear in the document.
5. Output MUST be a single valid JSON object and nothing else.
"#;

/// Build the extraction prompt for one document: the kind-specific target
/// schema followed by the source text.
pub fn build_extraction_prompt(kind: DocumentKind, source_text: &str) -> String {
    format!(
        r#"Extract the fields below from the document. For any field not present, use null.

```json
{schema}
```

<document>
{source_text}
</document>
"#,
        schema = schema_for(kind),
    )
}

/// Target schema per document kind. Orders mirror the invoice shape with
/// their own number, counterparty and expected-date fields.
fn schema_for(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::Invoice => {
            r#"{
  "invoice_number": "string or null",
  "invoice_date": "date as written or null",
  "due_date": "date as written or null",
  "supplier": {"name": "string or null", "address": "string or null", "vat": "string or null"},
  "client": {"name": "string or null", "address": "string or null"},
  "lines": [
    {"name": "line description", "quantity": "as written", "unit_price": "as written", "tax_rate": "as written or null"}
  ],
  "totals": {"untaxed": "as written", "tva": "as written", "total": "as written"},
  "payment_terms": "string or null",
  "reference": "string or null"
}"#
        }
        DocumentKind::PurchaseOrder => {
            r#"{
  "po_number": "string or null",
  "po_date": "date as written or null",
  "expected_date": "date as written or null",
  "vendor": {"name": "string or null", "address": "string or null"},
  "lines": [
    {"name": "line description", "quantity": "as written", "unit_price": "as written", "tax_rate": "as written or null", "expected_date": "date as written or null"}
  ],
  "totals": {"untaxed": "as written", "tva": "as written", "total": "as written"},
  "payment_terms": "string or null",
  "reference": "string or null"
}"#
        }
        DocumentKind::SalesOrder => {
            r#"{
  "so_number": "string or null",
  "so_date": "date as written or null",
  "expected_date": "date as written or null",
  "customer": {"name": "string or null", "address": "string or null"},
  "lines": [
    {"name": "line description", "quantity": "as written", "unit_price": "as written", "tax_rate": "as written or null", "expected_date": "date as written or null"}
  ],
  "totals": {"untaxed": "as written", "tva": "as written", "total": "as written"},
  "payment_terms": "string or null",
  "reference": "string or null"
}"#
        }
    }
}
