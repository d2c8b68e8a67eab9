use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
#[error("Unknown document kind: {0}")]
pub struct UnknownKind(pub String);

/// The three document kinds the pipeline can ingest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    Invoice,
    PurchaseOrder,
    SalesOrder,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::PurchaseOrder => "purchase_order",
            Self::SalesOrder => "sales_order",
        }
    }

    /// Key holding the document number in a raw extraction.
    pub fn number_field(&self) -> &'static str {
        match self {
            Self::Invoice => "invoice_number",
            Self::PurchaseOrder => "po_number",
            Self::SalesOrder => "so_number",
        }
    }

    /// Key holding the document date in a raw extraction.
    pub fn date_field(&self) -> &'static str {
        match self {
            Self::Invoice => "invoice_date",
            Self::PurchaseOrder => "po_date",
            Self::SalesOrder => "so_date",
        }
    }

    /// Key holding the due date (invoices) or expected delivery date (orders).
    pub fn secondary_date_field(&self) -> &'static str {
        match self {
            Self::Invoice => "due_date",
            Self::PurchaseOrder | Self::SalesOrder => "expected_date",
        }
    }

    /// Key holding the counterparty (string or object with a `name` key).
    pub fn counterparty_field(&self) -> &'static str {
        match self {
            Self::Invoice => "client",
            Self::PurchaseOrder => "vendor",
            Self::SalesOrder => "customer",
        }
    }

    /// Orders track catalog products per line; invoices stay free-text.
    pub fn tracks_products(&self) -> bool {
        matches!(self, Self::PurchaseOrder | Self::SalesOrder)
    }
}

impl std::str::FromStr for DocumentKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "invoice" => Ok(Self::Invoice),
            "purchase_order" | "po" => Ok(Self::PurchaseOrder),
            "sales_order" | "so" => Ok(Self::SalesOrder),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}
