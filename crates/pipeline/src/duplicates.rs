use std::collections::{BTreeMap, HashSet};

use sha2::{Digest, Sha256};

use crate::config::DuplicateConfig;
use crate::model::{DuplicateGroup, FingerprintScheme};
use crate::normalize::slug;

/// Unit separator between forms inside a fingerprint, so that
/// `["ab", "c"]` and `["a", "bc"]` hash differently.
const FORM_SEP: &str = "\u{1f}";

/// Hex digest over a language's forms in processing order.
pub fn fingerprint<'a>(forms: impl IntoIterator<Item = &'a str>) -> String {
    let mut hasher = Sha256::new();
    for form in forms {
        hasher.update(form.as_bytes());
        hasher.update(FORM_SEP.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

/// Detect languages with unintentionally identical datasets. Two schemes:
/// exact forms, and slug-folded forms to catch cosmetic near-duplicates.
/// Purely diagnostic; output is unaffected.
///
/// A group is reported unless its sorted, comma-joined language ids appear
/// in the suppression list. Slug groups that only restate an exact group
/// are dropped.
pub fn detect(
    forms_by_language: &BTreeMap<String, Vec<String>>,
    config: &DuplicateConfig,
) -> Vec<DuplicateGroup> {
    let suppressed = config.suppressed();
    let mut reported: Vec<DuplicateGroup> = Vec::new();
    let mut seen_sets: HashSet<String> = HashSet::new();

    for (scheme, fold) in [
        (FingerprintScheme::Exact, false),
        (FingerprintScheme::Slug, true),
    ] {
        // BTreeMap keeps group membership in language order.
        let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (language, forms) in forms_by_language {
            let digest = if fold {
                let folded: Vec<String> = forms.iter().map(|f| slug(f)).collect();
                fingerprint(folded.iter().map(String::as_str))
            } else {
                fingerprint(forms.iter().map(String::as_str))
            };
            groups.entry(digest).or_default().push(language.clone());
        }

        for (_, mut languages) in groups {
            if languages.len() < 2 {
                continue;
            }
            languages.sort();
            let key = languages.join(",");
            if suppressed.contains(key.as_str()) || !seen_sets.insert(key) {
                continue;
            }
            reported.push(DuplicateGroup { scheme, languages });
        }
    }

    reported
}
