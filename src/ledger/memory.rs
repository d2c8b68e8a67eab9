//! In-memory ledger store. Backs the test suite and lets the service run
//! without an ERP behind it.

use std::sync::Mutex;

use crate::models::{CreatedRecord, DocumentDraft};

use super::{EntityRecord, LedgerError, LedgerStore, TaxRecord};

#[derive(Default)]
struct Registry {
    partners: Vec<EntityRecord>,
    products: Vec<EntityRecord>,
    taxes: Vec<TaxRecord>,
    documents: Vec<CreatedRecord>,
    next_id: i64,
}

pub struct MemoryLedger {
    inner: Mutex<Registry>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Registry {
                next_id: 1,
                ..Registry::default()
            }),
        }
    }

    pub fn with_partner(self, name: &str) -> Self {
        {
            let mut reg = self.inner.lock().unwrap();
            let id = reg.next_id;
            reg.next_id += 1;
            reg.partners.push(EntityRecord {
                id,
                name: name.to_string(),
            });
        }
        self
    }

    pub fn with_product(self, name: &str) -> Self {
        {
            let mut reg = self.inner.lock().unwrap();
            let id = reg.next_id;
            reg.next_id += 1;
            reg.products.push(EntityRecord {
                id,
                name: name.to_string(),
            });
        }
        self
    }

    pub fn with_tax(self, name: &str, amount: f64) -> Self {
        {
            let mut reg = self.inner.lock().unwrap();
            let id = reg.next_id;
            reg.next_id += 1;
            reg.taxes.push(TaxRecord {
                id,
                name: name.to_string(),
                amount,
            });
        }
        self
    }

    pub fn product_count(&self) -> usize {
        self.inner.lock().unwrap().products.len()
    }

    pub fn document_count(&self) -> usize {
        self.inner.lock().unwrap().documents.len()
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

fn name_matches(record_name: &str, query: &str) -> bool {
    record_name.to_lowercase().contains(&query.trim().to_lowercase())
}

impl LedgerStore for MemoryLedger {
    fn search_partners(&self, query: &str) -> Result<Vec<EntityRecord>, LedgerError> {
        let reg = self.inner.lock().unwrap();
        Ok(reg
            .partners
            .iter()
            .filter(|p| name_matches(&p.name, query))
            .cloned()
            .collect())
    }

    fn search_products(&self, query: &str) -> Result<Vec<EntityRecord>, LedgerError> {
        let reg = self.inner.lock().unwrap();
        Ok(reg
            .products
            .iter()
            .filter(|p| name_matches(&p.name, query))
            .cloned()
            .collect())
    }

    fn create_product(&self, name: &str) -> Result<EntityRecord, LedgerError> {
        let mut reg = self.inner.lock().unwrap();
        let id = reg.next_id;
        reg.next_id += 1;
        let record = EntityRecord {
            id,
            name: name.to_string(),
        };
        reg.products.push(record.clone());
        Ok(record)
    }

    fn search_taxes(&self) -> Result<Vec<TaxRecord>, LedgerError> {
        Ok(self.inner.lock().unwrap().taxes.clone())
    }

    fn create_document(&self, draft: &DocumentDraft) -> Result<CreatedRecord, LedgerError> {
        let mut reg = self.inner.lock().unwrap();
        let id = reg.next_id;
        reg.next_id += 1;
        let record = CreatedRecord {
            id,
            name: format!("{}/{}", draft.kind.as_str(), draft.document_number),
        };
        reg.documents.push(record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_is_case_insensitive_substring() {
        let ledger = MemoryLedger::new().with_partner("Acme Industries");
        assert_eq!(ledger.search_partners("acme").unwrap().len(), 1);
        assert_eq!(ledger.search_partners("INDUSTRIES").unwrap().len(), 1);
        assert!(ledger.search_partners("globex").unwrap().is_empty());
    }

    #[test]
    fn create_product_assigns_increasing_ids() {
        let ledger = MemoryLedger::new();
        let a = ledger.create_product("Widget").unwrap();
        let b = ledger.create_product("Bolt").unwrap();
        assert!(b.id > a.id);
        assert_eq!(ledger.product_count(), 2);
    }
}
