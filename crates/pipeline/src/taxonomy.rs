use std::collections::HashMap;

/// What the engine needs to know about a languoid. The catalog's internal
/// graph (family trees, macroareas per node) stays behind this record.
#[derive(Debug, Clone, Default)]
pub struct CatalogEntry {
    pub code: Option<String>,
    pub name: Option<String>,
    pub family: Option<String>,
    pub macroarea: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Read-only languoid lookup. A miss is a normal condition; callers fall
/// back to the raw identifier's own prefix.
pub trait Catalog {
    fn lookup(&self, raw_id: &str) -> Option<&CatalogEntry>;
}

/// Flat in-memory catalog, keyed by raw language id. Used by the io loader
/// and as a test fixture.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    entries: HashMap<String, CatalogEntry>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, raw_id: impl Into<String>, entry: CatalogEntry) {
        self.entries.insert(raw_id.into(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Catalog for MemoryCatalog {
    fn lookup(&self, raw_id: &str) -> Option<&CatalogEntry> {
        self.entries.get(raw_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_miss_is_none() {
        let catalog = MemoryCatalog::new();
        assert!(catalog.lookup("abcd1234").is_none());
    }

    #[test]
    fn lookup_returns_inserted_entry() {
        let mut catalog = MemoryCatalog::new();
        catalog.insert(
            "abcd1234",
            CatalogEntry {
                code: Some("efgh5678".into()),
                name: Some("Example".into()),
                ..Default::default()
            },
        );
        let entry = catalog.lookup("abcd1234").unwrap();
        assert_eq!(entry.code.as_deref(), Some("efgh5678"));
        assert_eq!(entry.name.as_deref(), Some("Example"));
        assert!(entry.family.is_none());
    }
}
