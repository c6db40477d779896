use crate::config::{AllowlistConfig, ClassifierConfig};
use crate::model::{Diagnostics, LexicalEntry, StaleAllowlistEntry};

/// A defect-pattern rule. Any match flags the entry; the chain
/// short-circuits at the first hit. New rules are appended, never
/// reordered.
pub struct Rule {
    pub name: &'static str,
    pub check: fn(&str) -> bool,
}

pub const RULE_CHAIN: &[Rule] = &[
    Rule {
        name: "bracketed-material",
        check: |form| form.contains('[') || form.contains(']'),
    },
    Rule {
        name: "brace-residue",
        check: |form| form.contains('{') || form.contains('}'),
    },
    Rule {
        name: "markup-residue",
        check: |form| form.contains('<') || form.contains('>'),
    },
    Rule {
        name: "uncertainty-marker",
        check: |form| form.contains('?') || form.contains('*'),
    },
    Rule {
        name: "placeholder",
        check: |form| {
            form.contains("...") || (!form.is_empty() && form.chars().all(|c| c == '-' || c == '_'))
        },
    },
    Rule {
        name: "unresolved-alternates",
        check: |form| form.contains(" / ") || form.contains(';'),
    },
];

/// Name of the first rule matching `form`, if any. Exposed for reporting;
/// `classify` only needs the boolean.
pub fn first_match(form: &str) -> Option<&'static str> {
    RULE_CHAIN
        .iter()
        .find(|rule| (rule.check)(form))
        .map(|rule| rule.name)
}

/// Flag an entry as problematic. The secondary form, when present and
/// carrying the configured marker, flags the entry regardless of the
/// form-based chain.
pub fn classify(form: &str, other_form: Option<&str>, config: &ClassifierConfig) -> bool {
    if let Some(other) = other_form {
        if other.contains(config.other_form_marker) {
            return true;
        }
    }
    first_match(form).is_some()
}

/// Retroactively clear problematic flags for allow-listed entries. An
/// entry only clears when both the id and the exact live form match; a
/// stale pair keeps the flag and is reported instead.
pub fn apply_allowlist(
    entries: &mut [LexicalEntry],
    allowlist: &AllowlistConfig,
    diags: &mut Diagnostics,
) {
    for wanted in &allowlist.problematic {
        let Some(entry) = entries.iter_mut().find(|e| e.id == wanted.id) else {
            continue;
        };
        if !entry.problematic {
            continue;
        }
        if entry.form == wanted.form {
            entry.problematic = false;
        } else {
            diags.stale_allowlist.push(StaleAllowlistEntry {
                id: wanted.id.clone(),
                expected_form: wanted.form.clone(),
                actual_form: entry.form.clone(),
            });
        }
    }
}
