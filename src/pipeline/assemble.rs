//! Draft assembly: raw extraction → validated `DocumentDraft`.
//!
//! One parameterized path serves all three document kinds; the per-kind
//! field names come from `DocumentKind`. Identity fields (counterparty,
//! document number) are mandatory; everything else degrades to documented
//! defaults. Extracted totals are passed through without cross-validation
//! against the line sum; trusting one source over the other is a stated
//! design choice, not an oversight.

use serde::Deserialize;
use serde_json::Value;

use crate::ledger::EntityResolver;
use crate::models::{DocumentDraft, DocumentKind, LineItem, Totals};

use super::decode::RawExtraction;
use super::normalize::{normalize_amount, normalize_date};
use super::IntakeError;

/// Typed view of one extracted line. Every field is optional; defaults are
/// applied during assembly.
#[derive(Debug, Deserialize, Default)]
struct ExtractedLine {
    name: Option<String>,
    description: Option<String>,
    quantity: Option<Value>,
    unit_price: Option<Value>,
    tax_rate: Option<Value>,
    expected_date: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct ExtractedTotals {
    untaxed: Option<Value>,
    tva: Option<Value>,
    total: Option<Value>,
}

/// Assemble a validated draft from a raw extraction, resolving entities as
/// it goes. The returned draft always carries at least one line.
pub fn assemble(
    kind: DocumentKind,
    raw: &RawExtraction,
    resolver: &EntityResolver,
) -> Result<DocumentDraft, IntakeError> {
    let counterparty_name = counterparty_name(raw, kind.counterparty_field())
        .ok_or_else(|| IntakeError::Validation(kind.counterparty_field().to_string()))?;

    let document_number = get_string(raw, kind.number_field())
        .ok_or_else(|| IntakeError::Validation(kind.number_field().to_string()))?;

    let counterparty = resolver.resolve_partner(&counterparty_name)?;

    let document_date = normalize_date(get_string(raw, kind.date_field()).as_deref());
    let due_or_expected_date = get_string(raw, kind.secondary_date_field())
        .map(|s| normalize_date(Some(&s)));

    let extracted_lines = parse_lines(raw);
    let totals_in: ExtractedTotals = raw
        .get("totals")
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or_default();

    let mut lines = Vec::with_capacity(extracted_lines.len().max(1));
    for line in &extracted_lines {
        lines.push(build_line(kind, line, resolver)?);
    }

    if lines.is_empty() {
        // No detail lines extracted: one synthetic line carries the
        // aggregate untaxed total so the draft is never empty.
        let untaxed = totals_in
            .untaxed
            .as_ref()
            .map(value_to_amount)
            .unwrap_or(0.0);
        lines.push(LineItem {
            description: format!("{} total", kind.as_str()),
            quantity: 1.0,
            unit_price: untaxed,
            tax_rate: 0.0,
            resolved_product: None,
            resolved_tax: None,
            expected_date: None,
        });
    }

    if lines.is_empty() {
        return Err(IntakeError::Assembly("no lines after synthesis".into()));
    }

    let untaxed = match &totals_in.untaxed {
        Some(v) => value_to_amount(v),
        None => lines.iter().map(|l| l.quantity * l.unit_price).sum(),
    };
    let tax = totals_in.tva.as_ref().map(value_to_amount).unwrap_or(0.0);
    let total = match &totals_in.total {
        Some(v) => value_to_amount(v),
        None => untaxed + tax,
    };

    Ok(DocumentDraft {
        kind,
        counterparty,
        document_number,
        document_date,
        due_or_expected_date,
        payment_terms: get_string(raw, "payment_terms"),
        reference: get_string(raw, "reference"),
        lines,
        totals: Totals {
            untaxed,
            tax,
            total,
        },
    })
}

fn build_line(
    kind: DocumentKind,
    line: &ExtractedLine,
    resolver: &EntityResolver,
) -> Result<LineItem, IntakeError> {
    let description = line
        .name
        .as_deref()
        .or(line.description.as_deref())
        .unwrap_or("Line")
        .to_string();

    let mut quantity = line.quantity.as_ref().map(value_to_amount).unwrap_or(0.0);
    if quantity <= 0.0 {
        quantity = 1.0;
    }
    let unit_price = line.unit_price.as_ref().map(value_to_amount).unwrap_or(0.0);
    let tax_rate = line.tax_rate.as_ref().map(value_to_amount).unwrap_or(0.0);

    // Invoices stay free-text; only orders resolve against the catalog.
    let resolved_product = if kind.tracks_products() {
        Some(resolver.resolve_product(&description)?)
    } else {
        None
    };

    let resolved_tax = resolver.resolve_tax(tax_rate)?;

    let expected_date = line
        .expected_date
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| normalize_date(Some(s)));

    Ok(LineItem {
        description,
        quantity,
        unit_price,
        tax_rate,
        resolved_product,
        resolved_tax,
        expected_date,
    })
}

/// Parse the lines array leniently: items that fail to deserialize are
/// skipped rather than failing the document.
fn parse_lines(raw: &RawExtraction) -> Vec<ExtractedLine> {
    match raw.get("lines") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| serde_json::from_value(v.clone()).ok())
            .collect(),
        _ => Vec::new(),
    }
}

/// Read a string-valued field, treating null/blank as absent.
fn get_string(raw: &RawExtraction, key: &str) -> Option<String> {
    raw.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Counterparty may arrive as a bare string or as an object with a `name`.
fn counterparty_name(raw: &RawExtraction, key: &str) -> Option<String> {
    match raw.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Object(obj) => obj
            .get("name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        _ => None,
    }
}

/// Amounts arrive as JSON strings or numbers; both run through the locale
/// normalizer's rules.
fn value_to_amount(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().map(|v| v.max(0.0)).unwrap_or(0.0),
        Value::String(s) => normalize_amount(s),
        _ => 0.0,
    }
}
