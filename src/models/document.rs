use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::DocumentKind;

/// A resolved registry entity (partner, product or tax). The ledger owns the
/// record; the pipeline only ever holds this reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityReference {
    pub id: i64,
    pub name: String,
}

/// One line of a draft document. Quantity defaults to 1 when the extraction
/// omits it or reads zero; amounts are never negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub tax_rate: f64,
    pub resolved_product: Option<EntityReference>,
    pub resolved_tax: Option<EntityReference>,
    pub expected_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Totals {
    pub untaxed: f64,
    pub tax: f64,
    pub total: f64,
}

/// Fully assembled, validated document ready for a single ledger submission.
/// `lines` is never empty: when the extraction yields no detail lines, a
/// single synthetic line carries the aggregate untaxed total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentDraft {
    pub kind: DocumentKind,
    pub counterparty: EntityReference,
    pub document_number: String,
    pub document_date: NaiveDate,
    pub due_or_expected_date: Option<NaiveDate>,
    pub payment_terms: Option<String>,
    pub reference: Option<String>,
    pub lines: Vec<LineItem>,
    pub totals: Totals,
}

impl DocumentDraft {
    /// Sum of quantity x unit price over all lines.
    pub fn line_total(&self) -> f64 {
        self.lines.iter().map(|l| l.quantity * l.unit_price).sum()
    }
}

/// Identifier and display name the ledger hands back after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedRecord {
    pub id: i64,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_total_sums_lines() {
        let draft = DocumentDraft {
            kind: DocumentKind::Invoice,
            counterparty: EntityReference {
                id: 1,
                name: "Acme".into(),
            },
            document_number: "INV-1".into(),
            document_date: NaiveDate::from_ymd_opt(2025, 11, 28).unwrap(),
            due_or_expected_date: None,
            payment_terms: None,
            reference: None,
            lines: vec![
                LineItem {
                    description: "Widget".into(),
                    quantity: 2.0,
                    unit_price: 10.5,
                    tax_rate: 0.0,
                    resolved_product: None,
                    resolved_tax: None,
                    expected_date: None,
                },
                LineItem {
                    description: "Bolt".into(),
                    quantity: 4.0,
                    unit_price: 0.25,
                    tax_rate: 0.0,
                    resolved_product: None,
                    resolved_tax: None,
                    expected_date: None,
                },
            ],
            totals: Totals::default(),
        };
        assert!((draft.line_total() - 22.0).abs() < f64::EPSILON);
    }
}
