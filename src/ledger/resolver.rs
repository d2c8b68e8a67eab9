//! Free-text entity resolution against the ledger registries.
//!
//! Matching is a case-insensitive substring match over the candidates'
//! names, with ties broken by ascending identifier so the same input always
//! resolves to the same record. The creation policy is deliberately
//! asymmetric: unknown counterparties fail, unknown products are created.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::models::EntityReference;
use crate::pipeline::IntakeError;

use super::{EntityRecord, LedgerStore, TaxRecord};

const TAX_RATE_EPSILON: f64 = 1e-6;

/// Resolves free-text names to registry references for one request.
///
/// One resolver is built per pipeline invocation; its product cache
/// guarantees a name auto-created once is reused for every later line of the
/// same request. Cross-request deduplication stays with the ledger store.
pub struct EntityResolver<'a> {
    store: &'a dyn LedgerStore,
    product_cache: RefCell<HashMap<String, EntityReference>>,
    tax_cache: RefCell<Option<Vec<TaxRecord>>>,
}

impl<'a> EntityResolver<'a> {
    pub fn new(store: &'a dyn LedgerStore) -> Self {
        Self {
            store,
            product_cache: RefCell::new(HashMap::new()),
            tax_cache: RefCell::new(None),
        }
    }

    /// Resolve a counterparty name. Unknown counterparties are an error,
    /// never silently created.
    pub fn resolve_partner(&self, name: &str) -> Result<EntityReference, IntakeError> {
        let candidates = self.store.search_partners(name)?;
        best_match(candidates, name)
            .ok_or_else(|| IntakeError::EntityNotFound(name.to_string()))
    }

    /// Resolve a product name, creating a minimal record when the catalog
    /// has no match.
    pub fn resolve_product(&self, name: &str) -> Result<EntityReference, IntakeError> {
        let key = name.trim().to_lowercase();
        if let Some(cached) = self.product_cache.borrow().get(&key) {
            return Ok(cached.clone());
        }

        let candidates = self.store.search_products(name)?;
        let resolved = match best_match(candidates, name) {
            Some(found) => found,
            None => {
                tracing::info!(product = name, "Product not in catalog, creating");
                let created = self.store.create_product(name.trim())?;
                EntityReference {
                    id: created.id,
                    name: created.name,
                }
            }
        };

        self.product_cache.borrow_mut().insert(key, resolved.clone());
        Ok(resolved)
    }

    /// Resolve a tax rate to a registry reference. No exact match is a valid
    /// outcome: the line is then recorded without a tax assignment.
    ///
    /// The tax registry is fetched once per resolver and reused for every
    /// line of the request.
    pub fn resolve_tax(&self, rate: f64) -> Result<Option<EntityReference>, IntakeError> {
        let mut cache = self.tax_cache.borrow_mut();
        if cache.is_none() {
            let mut taxes = self.store.search_taxes()?;
            taxes.sort_by_key(|t| t.id);
            *cache = Some(taxes);
        }
        Ok(cache
            .as_deref()
            .unwrap_or_default()
            .iter()
            .find(|t| (t.amount - rate).abs() < TAX_RATE_EPSILON)
            .map(|t| EntityReference {
                id: t.id,
                name: t.name.clone(),
            }))
    }
}

/// First case-insensitive substring match under ascending-id ordering.
fn best_match(mut candidates: Vec<EntityRecord>, name: &str) -> Option<EntityReference> {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    candidates.sort_by_key(|c| c.id);
    candidates
        .into_iter()
        .find(|c| c.name.to_lowercase().contains(&needle))
        .map(|c| EntityReference {
            id: c.id,
            name: c.name,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MemoryLedger;

    #[test]
    fn partner_resolves_by_substring() {
        let ledger = MemoryLedger::new().with_partner("Acme Industries SA");
        let resolver = EntityResolver::new(&ledger);

        let found = resolver.resolve_partner("acme").unwrap();
        assert_eq!(found.name, "Acme Industries SA");
    }

    #[test]
    fn unknown_partner_is_an_error() {
        let ledger = MemoryLedger::new().with_partner("Acme");
        let resolver = EntityResolver::new(&ledger);

        let result = resolver.resolve_partner("Globex");
        assert!(matches!(result, Err(IntakeError::EntityNotFound(_))));
    }

    #[test]
    fn ambiguous_partner_match_takes_lowest_id() {
        let ledger = MemoryLedger::new()
            .with_partner("Acme East")
            .with_partner("Acme West");
        let resolver = EntityResolver::new(&ledger);

        // Both match "acme"; the earlier record wins deterministically.
        let found = resolver.resolve_partner("acme").unwrap();
        assert_eq!(found.name, "Acme East");
    }

    #[test]
    fn unknown_product_is_created_once_per_request() {
        let ledger = MemoryLedger::new();
        let resolver = EntityResolver::new(&ledger);

        let first = resolver.resolve_product("Flux Capacitor").unwrap();
        let second = resolver.resolve_product("flux capacitor").unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(ledger.product_count(), 1);
    }

    #[test]
    fn existing_product_is_not_duplicated() {
        let ledger = MemoryLedger::new().with_product("Widget Deluxe");
        let resolver = EntityResolver::new(&ledger);

        let found = resolver.resolve_product("widget").unwrap();
        assert_eq!(found.name, "Widget Deluxe");
        assert_eq!(ledger.product_count(), 1);
    }

    #[test]
    fn tax_requires_exact_rate() {
        let ledger = MemoryLedger::new().with_tax("TVA 20%", 20.0);
        let resolver = EntityResolver::new(&ledger);

        let hit = resolver.resolve_tax(20.0).unwrap();
        assert_eq!(hit.unwrap().name, "TVA 20%");

        assert!(resolver.resolve_tax(19.6).unwrap().is_none());
    }

    #[test]
    fn blank_partner_name_never_matches() {
        let ledger = MemoryLedger::new().with_partner("Acme");
        let resolver = EntityResolver::new(&ledger);
        assert!(resolver.resolve_partner("   ").is_err());
    }

    #[test]
    fn tax_registry_is_fetched_once_per_resolver() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        use crate::ledger::LedgerError;
        use crate::models::{CreatedRecord, DocumentDraft};

        struct CountingLedger {
            inner: MemoryLedger,
            tax_searches: AtomicUsize,
        }

        impl LedgerStore for CountingLedger {
            fn search_partners(&self, query: &str) -> Result<Vec<EntityRecord>, LedgerError> {
                self.inner.search_partners(query)
            }
            fn search_products(&self, query: &str) -> Result<Vec<EntityRecord>, LedgerError> {
                self.inner.search_products(query)
            }
            fn create_product(&self, name: &str) -> Result<EntityRecord, LedgerError> {
                self.inner.create_product(name)
            }
            fn search_taxes(&self) -> Result<Vec<TaxRecord>, LedgerError> {
                self.tax_searches.fetch_add(1, Ordering::SeqCst);
                self.inner.search_taxes()
            }
            fn create_document(&self, draft: &DocumentDraft) -> Result<CreatedRecord, LedgerError> {
                self.inner.create_document(draft)
            }
        }

        let ledger = CountingLedger {
            inner: MemoryLedger::new().with_tax("TVA 20%", 20.0).with_tax("TVA 10%", 10.0),
            tax_searches: AtomicUsize::new(0),
        };
        let resolver = EntityResolver::new(&ledger);

        assert!(resolver.resolve_tax(20.0).unwrap().is_some());
        assert!(resolver.resolve_tax(10.0).unwrap().is_some());
        assert!(resolver.resolve_tax(5.5).unwrap().is_none());
        assert_eq!(ledger.tax_searches.load(Ordering::SeqCst), 1);
    }
}
