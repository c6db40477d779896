use std::collections::HashMap;

use crate::model::{CodeChange, RawLanguage, ID_SEP};
use crate::taxonomy::Catalog;

/// Raw-id → canonical-id mapping, built once per run.
///
/// Canonical ids are `{code}-{seq}` where `code` is the catalog's
/// classification code for the language (or, on a lookup miss, the raw id's
/// own prefix) and `seq` is the 1-based rank of the raw id among all raw
/// ids sharing that code, in source-listing order. Distinct raw ids can
/// therefore never collide on output.
#[derive(Debug, Default)]
pub struct RemapTable {
    map: HashMap<String, String>,
}

impl RemapTable {
    pub fn canonical(&self, raw_id: &str) -> Option<&str> {
        self.map.get(raw_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Remap table plus the informational events observed while building it.
#[derive(Debug, Default)]
pub struct RemapOutcome {
    pub table: RemapTable,
    /// Languages whose catalog code differs from their raw-id prefix.
    pub code_changes: Vec<CodeChange>,
    /// Languages with no catalog code at all (prefix fallback used).
    pub unclassified: Vec<String>,
}

/// The portion of a raw id before the first separator. For ids carrying a
/// sequence suffix (`abcd1234-2`) this is the bare code; ids without a
/// suffix pass through whole.
pub fn raw_prefix(raw_id: &str) -> &str {
    raw_id.split(ID_SEP).next().unwrap_or(raw_id)
}

/// Build the remap table for the given source listing. A catalog miss is
/// not fatal; the raw-id prefix stands in as the classification code.
pub fn build(languages: &[RawLanguage], catalog: &dyn Catalog) -> RemapOutcome {
    let mut outcome = RemapOutcome::default();
    let mut seq_by_code: HashMap<String, u32> = HashMap::new();

    for lang in languages {
        let prefix = raw_prefix(&lang.id);
        let catalog_code = catalog.lookup(&lang.id).and_then(|e| e.code.clone());

        let code = match catalog_code {
            Some(code) => {
                if code != prefix {
                    outcome.code_changes.push(CodeChange {
                        raw_id: lang.id.clone(),
                        prefix_code: prefix.to_string(),
                        catalog_code: code.clone(),
                    });
                }
                code
            }
            None => {
                outcome.unclassified.push(lang.id.clone());
                prefix.to_string()
            }
        };

        let seq = seq_by_code.entry(code.clone()).or_insert(0);
        *seq += 1;
        outcome
            .table
            .map
            .insert(lang.id.clone(), format!("{code}{ID_SEP}{seq}"));
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::{CatalogEntry, MemoryCatalog};

    fn lang(id: &str) -> RawLanguage {
        RawLanguage {
            id: id.into(),
            name: id.to_uppercase(),
            ..Default::default()
        }
    }

    fn coded(raw_id: &str, code: &str) -> (String, CatalogEntry) {
        (
            raw_id.to_string(),
            CatalogEntry {
                code: Some(code.into()),
                ..Default::default()
            },
        )
    }

    #[test]
    fn shared_code_gets_sequence_by_first_appearance() {
        let mut catalog = MemoryCatalog::new();
        for (id, entry) in [coded("abc1234", "ABC"), coded("abc1234-2", "ABC")] {
            catalog.insert(id, entry);
        }
        let langs = vec![lang("abc1234"), lang("abc1234-2")];
        let outcome = build(&langs, &catalog);

        assert_eq!(outcome.table.canonical("abc1234"), Some("ABC-1"));
        assert_eq!(outcome.table.canonical("abc1234-2"), Some("ABC-2"));
    }

    #[test]
    fn distinct_raw_ids_never_collide() {
        let mut catalog = MemoryCatalog::new();
        for id in ["a1", "b2", "c3"] {
            let (k, v) = coded(id, "shared123");
            catalog.insert(k, v);
        }
        let langs = vec![lang("a1"), lang("b2"), lang("c3")];
        let outcome = build(&langs, &catalog);

        let mut seen: Vec<&str> = langs
            .iter()
            .map(|l| outcome.table.canonical(&l.id).unwrap())
            .collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), langs.len());
    }

    #[test]
    fn lookup_miss_falls_back_to_prefix() {
        let catalog = MemoryCatalog::new();
        let langs = vec![lang("zulu1241-1")];
        let outcome = build(&langs, &catalog);

        assert_eq!(outcome.table.canonical("zulu1241-1"), Some("zulu1241-1"));
        assert_eq!(outcome.unclassified, vec!["zulu1241-1"]);
        assert!(outcome.code_changes.is_empty());
    }

    #[test]
    fn code_change_is_recorded() {
        let mut catalog = MemoryCatalog::new();
        let (k, v) = coded("stal1234", "nucl1235");
        catalog.insert(k, v);
        let langs = vec![lang("stal1234")];
        let outcome = build(&langs, &catalog);

        assert_eq!(outcome.table.canonical("stal1234"), Some("nucl1235-1"));
        assert_eq!(outcome.code_changes.len(), 1);
        assert_eq!(outcome.code_changes[0].prefix_code, "stal1234");
        assert_eq!(outcome.code_changes[0].catalog_code, "nucl1235");
        assert!(outcome.unclassified.is_empty());
    }

    #[test]
    fn matching_code_is_not_a_change() {
        let mut catalog = MemoryCatalog::new();
        let (k, v) = coded("abcd1234-1", "abcd1234");
        catalog.insert(k, v);
        let outcome = build(&[lang("abcd1234-1")], &catalog);

        assert!(outcome.code_changes.is_empty());
        assert_eq!(outcome.table.canonical("abcd1234-1"), Some("abcd1234-1"));
    }

    #[test]
    fn rebuild_is_reproducible() {
        let mut catalog = MemoryCatalog::new();
        for id in ["x1", "x2", "x3"] {
            let (k, v) = coded(id, "xxxx1234");
            catalog.insert(k, v);
        }
        let langs = vec![lang("x1"), lang("x2"), lang("x3")];
        let a = build(&langs, &catalog);
        let b = build(&langs, &catalog);
        for l in &langs {
            assert_eq!(a.table.canonical(&l.id), b.table.canonical(&l.id));
        }
    }
}
