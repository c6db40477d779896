use std::collections::{HashMap, HashSet};

use crate::classify::classify;
use crate::config::{ClassifierConfig, IngestConfig};
use crate::model::{
    CollidingId, Diagnostics, LexicalEntry, MisalignedRows, RawRow, StructuralAnomaly,
    SuspiciousForm, UnknownReference, ID_SEP,
};
use crate::normalize::normalize;

/// Lookup context shared by every `ingest_rows` call of a run.
pub struct IngestContext<'a> {
    pub ingest: &'a IngestConfig,
    pub classifier: &'a ClassifierConfig,
    /// Raw → canonical id of every accepted language.
    pub accepted: &'a HashMap<String, String>,
    /// Raw ids dropped by the exclusion list (overrides already carved out).
    pub excluded: &'a HashSet<String>,
    pub known_parameters: &'a HashSet<String>,
}

/// Stream one language's source rows into accepted lexical entries.
/// Anomalies land in `diags`; nothing here aborts the run.
pub fn ingest_rows(
    canonical_language: &str,
    rows: &[RawRow],
    ctx: &IngestContext<'_>,
    diags: &mut Diagnostics,
) -> Vec<LexicalEntry> {
    let mut entries = Vec::with_capacity(rows.len());
    let mut misaligned = 0usize;
    let mut seen_ids: HashSet<String> = HashSet::new();

    for (row_no, row) in rows.iter().enumerate() {
        // Excluded references are dropped without comment.
        if ctx.excluded.contains(&row.language_id) {
            continue;
        }

        let Some(language_id) = ctx.accepted.get(&row.language_id) else {
            bump(&mut diags.unknown_languages, &row.language_id);
            continue;
        };

        let parameter_id = row.parameter_id.trim();
        if !ctx.known_parameters.contains(parameter_id) {
            bump(&mut diags.unknown_parameters, parameter_id);
            continue;
        }

        let form = normalize(&row.form);
        let value = normalize(&row.value);
        if form.is_empty() || form == ctx.ingest.missing_sentinel {
            continue;
        }

        if row.column_count != ctx.ingest.expected_columns {
            diags.structural_anomalies.push(StructuralAnomaly {
                language: canonical_language.to_string(),
                row: row_no + 1,
                columns: row.column_count,
                expected: ctx.ingest.expected_columns,
            });
        }

        let (loan, variant, well_formed) = parse_aux(&row.loan, &row.variant_id);
        if !well_formed {
            misaligned += 1;
        }

        let id = format!("{language_id}{ID_SEP}{parameter_id}{ID_SEP}{variant}");

        // Composed ids are the output's primary key. A later row landing on
        // an already-taken (parameter, variant) slot is dropped; the first
        // row wins.
        if !seen_ids.insert(id.clone()) {
            if let Some(existing) = diags.colliding_ids.iter_mut().find(|c| c.id == id) {
                existing.rows += 1;
            } else {
                diags.colliding_ids.push(CollidingId { id, rows: 1 });
            }
            continue;
        }

        if suspicious(&form, &value) {
            diags.suspicious_forms.push(SuspiciousForm {
                id: id.clone(),
                form: form.clone(),
                value: value.clone(),
            });
        }

        let other_form = row
            .other_form
            .as_deref()
            .map(normalize)
            .filter(|s| !s.is_empty());
        let problematic = classify(&form, other_form.as_deref(), ctx.classifier);

        entries.push(LexicalEntry {
            id,
            language_id: language_id.clone(),
            parameter_id: parameter_id.to_string(),
            value,
            form,
            other_form,
            comment: row
                .comment
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from),
            loan,
            variant,
            problematic,
        });
    }

    if misaligned > 0 {
        diags.misaligned_rows.push(MisalignedRows {
            language: canonical_language.to_string(),
            rows: misaligned,
        });
    }

    entries
}

/// Auxiliary-field integrity: the loan flag must be a spelled-out boolean
/// (minimum length covers "True"/"False"), the variant index a positive
/// integer. Malformed fields fall back to defaults and count as misaligned.
fn parse_aux(loan: &str, variant_id: &str) -> (bool, u32, bool) {
    let loan_str = loan.trim();
    let variant_str = variant_id.trim();

    let loan_ok = loan_str.len() >= 4
        && (loan_str.eq_ignore_ascii_case("true") || loan_str.eq_ignore_ascii_case("false"));
    let variant = variant_str.parse::<u32>().ok().filter(|v| *v >= 1);

    (
        loan_str.eq_ignore_ascii_case("true"),
        variant.unwrap_or(1),
        loan_ok && !variant_str.is_empty() && variant.is_some(),
    )
}

/// A form implausibly longer than its value, or carrying brackets, likely
/// still contains an unextracted annotation.
fn suspicious(form: &str, value: &str) -> bool {
    let form_len = form.chars().count();
    let value_len = value.chars().count();
    form_len > value_len + 1 || form.contains('[') || form.contains(']')
}

fn bump(bucket: &mut Vec<UnknownReference>, id: &str) {
    if let Some(existing) = bucket.iter_mut().find(|r| r.id == id) {
        existing.rows += 1;
    } else {
        bucket.push(UnknownReference {
            id: id.to_string(),
            rows: 1,
        });
    }
}
