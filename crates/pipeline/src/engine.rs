use std::collections::{BTreeMap, HashMap, HashSet};

use crate::classify::apply_allowlist;
use crate::config::RunConfig;
use crate::duplicates;
use crate::error::PipelineError;
use crate::ingest::{ingest_rows, IngestContext};
use crate::model::{Dataset, Diagnostics, LanguageRecord, LexicalEntry, PipelineInput, RunMeta};
use crate::overrides::{choose, DataPath};
use crate::remap;
use crate::sort::sort_by_id;
use crate::taxonomy::Catalog;

/// Run the full curation pipeline. Returns the sorted dataset and the
/// accumulated diagnostics report. Only input-shape errors abort; every
/// data-quality condition lands in the report instead.
pub fn run(
    config: &RunConfig,
    catalog: &dyn Catalog,
    input: &PipelineInput,
) -> Result<(Dataset, Diagnostics), PipelineError> {
    check_input_shape(input)?;

    let mut diags = Diagnostics {
        meta: RunMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        ..Default::default()
    };

    // Identifier reconciliation runs first; everything downstream speaks
    // canonical ids.
    let remapped = remap::build(&input.languages, catalog);
    diags.code_changes = remapped.code_changes;
    diags.unclassified_languages = remapped.unclassified;

    // Language table: listing order, overrides replacing listing rows,
    // exclusions dropping languages unless an override re-curates them.
    let mut languages: Vec<LanguageRecord> = Vec::new();
    let mut accepted: HashMap<String, String> = HashMap::new();
    let mut excluded: HashSet<String> = HashSet::new();

    for lang in &input.languages {
        if config.exclusions.contains(&lang.id) && !input.overrides.is_active(&lang.id) {
            excluded.insert(lang.id.clone());
            continue;
        }
        let Some(canonical) = remapped.table.canonical(&lang.id) else {
            continue;
        };
        let effective = input.overrides.languages.get(&lang.id).unwrap_or(lang);
        let entry = catalog.lookup(&lang.id);

        let name = if effective.name.is_empty() {
            entry
                .and_then(|e| e.name.clone())
                .unwrap_or_else(|| lang.id.clone())
        } else {
            effective.name.clone()
        };

        languages.push(LanguageRecord {
            id: canonical.to_string(),
            name,
            glottocode: entry.and_then(|e| e.code.clone()),
            iso639p3: effective.iso639p3.clone(),
            family: entry.and_then(|e| e.family.clone()),
            macroarea: entry.and_then(|e| e.macroarea.clone()),
            latitude: entry.and_then(|e| e.latitude),
            longitude: entry.and_then(|e| e.longitude),
            source_file: effective.source_file.clone(),
            contributor: effective.contributor.clone(),
            base: effective.base.clone(),
            comment: effective.comment.clone(),
        });
        accepted.insert(lang.id.clone(), canonical.to_string());
    }

    // Ingest per language, override table winning over the base snapshot.
    let known_parameters: HashSet<String> =
        input.parameters.iter().map(|p| p.id.clone()).collect();
    let ctx = IngestContext {
        ingest: &config.ingest,
        classifier: &config.classifier,
        accepted: &accepted,
        excluded: &excluded,
        known_parameters: &known_parameters,
    };

    let mut forms: Vec<LexicalEntry> = Vec::new();
    let mut forms_by_language: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for lang in &input.languages {
        let Some(canonical) = accepted.get(&lang.id) else {
            continue;
        };
        let rows = match choose(
            &lang.id,
            input.base.get(&lang.id).map(Vec::as_slice),
            &input.overrides,
        ) {
            DataPath::Override(rows) => {
                diags.overrides_applied += 1;
                rows
            }
            DataPath::Base(rows) => rows,
            DataPath::Missing => {
                diags.no_data_languages.push(canonical.clone());
                continue;
            }
        };

        let entries = ingest_rows(canonical, rows, &ctx, &mut diags);
        forms_by_language
            .entry(canonical.clone())
            .or_default()
            .extend(entries.iter().map(|e| e.form.clone()));
        forms.extend(entries);
    }

    diags.duplicate_groups = duplicates::detect(&forms_by_language, &config.duplicates);

    apply_allowlist(&mut forms, &config.allowlist, &mut diags);

    let mut parameters = input.parameters.clone();
    sort_by_id(&mut languages, |l| &l.id);
    sort_by_id(&mut parameters, |p| &p.id);
    sort_by_id(&mut forms, |f| &f.id);

    tidy(&mut diags);

    Ok((
        Dataset {
            languages,
            parameters,
            forms,
        },
        diags,
    ))
}

/// Fatal input-shape checks. Either condition would silently misattribute
/// rows downstream, so the run aborts instead.
fn check_input_shape(input: &PipelineInput) -> Result<(), PipelineError> {
    let mut seen: HashSet<&str> = HashSet::new();
    for lang in &input.languages {
        if !seen.insert(&lang.id) {
            return Err(PipelineError::DuplicateRawId(lang.id.clone()));
        }
    }
    for key in input.overrides.forms.keys().chain(input.overrides.languages.keys()) {
        if !seen.contains(key.as_str()) {
            return Err(PipelineError::OrphanOverride(key.clone()));
        }
    }
    Ok(())
}

/// Group and sort the report buckets for readability. Does not change
/// their content.
fn tidy(diags: &mut Diagnostics) {
    diags.unknown_languages.sort_by(|a, b| a.id.cmp(&b.id));
    sort_by_id(&mut diags.unknown_parameters, |r| &r.id);
    diags.misaligned_rows.sort_by(|a, b| a.language.cmp(&b.language));
    diags
        .structural_anomalies
        .sort_by(|a, b| (&a.language, a.row).cmp(&(&b.language, b.row)));
    sort_by_id(&mut diags.suspicious_forms, |s| &s.id);
    sort_by_id(&mut diags.colliding_ids, |c| &c.id);
    diags
        .duplicate_groups
        .sort_by(|a, b| a.languages.cmp(&b.languages));
    diags.no_data_languages.sort();
    diags.code_changes.sort_by(|a, b| a.raw_id.cmp(&b.raw_id));
    diags.unclassified_languages.sort();
    diags.stale_allowlist.sort_by(|a, b| a.id.cmp(&b.id));
}
