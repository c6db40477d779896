use std::collections::HashMap;

use serde::Serialize;

/// Separator used when composing and splitting record identifiers.
pub const ID_SEP: char = '-';

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A language row as it appears in the source listing, before identifier
/// reconciliation. `id` is the raw identifier, unique within the snapshot.
#[derive(Debug, Clone, Default)]
pub struct RawLanguage {
    pub id: String,
    pub name: String,
    pub iso639p3: Option<String>,
    pub source_file: Option<String>,
    pub contributor: Option<String>,
    pub base: Option<String>,
    pub comment: Option<String>,
}

/// One raw form-table row. Field values are untrimmed, as read from disk;
/// `column_count` is the number of fields the physical row actually had.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub language_id: String,
    pub parameter_id: String,
    pub value: String,
    pub form: String,
    pub other_form: Option<String>,
    pub loan: String,
    pub variant_id: String,
    pub comment: Option<String>,
    pub column_count: usize,
}

/// A numeral concept (parameter). `id` is the numeric concept id as a string.
#[derive(Debug, Clone, Serialize)]
pub struct Concept {
    pub id: String,
    pub name: String,
}

/// Manually curated replacements, keyed by raw language id. A forms entry
/// fully supersedes the base rows for that language; a languages entry fully
/// supersedes the listing row. Never merged field-by-field.
#[derive(Debug, Default)]
pub struct OverrideSet {
    pub forms: HashMap<String, Vec<RawRow>>,
    pub languages: HashMap<String, RawLanguage>,
}

impl OverrideSet {
    /// An override is "active" for a raw id if either table mentions it.
    /// Active overrides exempt the language from the exclusion list.
    pub fn is_active(&self, raw_id: &str) -> bool {
        self.forms.contains_key(raw_id) || self.languages.contains_key(raw_id)
    }
}

/// Pre-loaded snapshot handed to the engine.
#[derive(Debug, Default)]
pub struct PipelineInput {
    /// Source listing, in file order. Order drives canonical id assignment.
    pub languages: Vec<RawLanguage>,
    /// Known concepts (parameter registry).
    pub parameters: Vec<Concept>,
    /// Base form rows per raw language id.
    pub base: HashMap<String, Vec<RawRow>>,
    pub overrides: OverrideSet,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// An accepted language after reconciliation and override merge. `id` is the
/// canonical, collision-free identifier. Geographic and classification
/// fields are uniformly optional.
#[derive(Debug, Clone, Serialize)]
pub struct LanguageRecord {
    pub id: String,
    pub name: String,
    pub glottocode: Option<String>,
    pub iso639p3: Option<String>,
    pub family: Option<String>,
    pub macroarea: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub source_file: Option<String>,
    pub contributor: Option<String>,
    pub base: Option<String>,
    pub comment: Option<String>,
}

/// An accepted lexical entry. `id` is `{language}-{parameter}-{variant}`
/// and is globally unique after reconciliation.
#[derive(Debug, Clone, Serialize)]
pub struct LexicalEntry {
    pub id: String,
    pub language_id: String,
    pub parameter_id: String,
    pub value: String,
    pub form: String,
    pub other_form: Option<String>,
    pub comment: Option<String>,
    pub loan: bool,
    pub variant: u32,
    pub problematic: bool,
}

/// The normalized dataset: three tables, each sorted by the composite
/// natural key of its `id` column.
#[derive(Debug, Default, Serialize)]
pub struct Dataset {
    pub languages: Vec<LanguageRecord>,
    pub parameters: Vec<Concept>,
    pub forms: Vec<LexicalEntry>,
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
}

/// Rows rejected because a reference did not resolve, aggregated per
/// referenced id.
#[derive(Debug, Clone, Serialize)]
pub struct UnknownReference {
    pub id: String,
    pub rows: usize,
}

/// Per-language count of rows whose auxiliary fields (loan flag, variant
/// index) were missing or malformed.
#[derive(Debug, Clone, Serialize)]
pub struct MisalignedRows {
    pub language: String,
    pub rows: usize,
}

/// A physical row with an unexpected field count.
#[derive(Debug, Clone, Serialize)]
pub struct StructuralAnomaly {
    pub language: String,
    pub row: usize,
    pub columns: usize,
    pub expected: usize,
}

/// A form that is implausibly longer than its value, or carries bracket
/// characters, likely an unextracted annotation.
#[derive(Debug, Clone, Serialize)]
pub struct SuspiciousForm {
    pub id: String,
    pub form: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FingerprintScheme {
    Exact,
    Slug,
}

/// Languages whose form sequences hash identically under a scheme.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateGroup {
    pub scheme: FingerprintScheme,
    pub languages: Vec<String>,
}

/// A language whose catalog code differs from the code implied by its raw
/// id prefix.
#[derive(Debug, Clone, Serialize)]
pub struct CodeChange {
    pub raw_id: String,
    pub prefix_code: String,
    pub catalog_code: String,
}

/// A problematic-entry allow-list item that no longer matches the live
/// form. The flag was kept.
#[derive(Debug, Clone, Serialize)]
pub struct StaleAllowlistEntry {
    pub id: String,
    pub expected_form: String,
    pub actual_form: String,
}

/// Later rows dropped because their composed id collided with an earlier
/// row of the same language. The first row wins.
#[derive(Debug, Clone, Serialize)]
pub struct CollidingId {
    pub id: String,
    pub rows: usize,
}

/// Structured warning/info report returned alongside the dataset. Nothing
/// in here blocks a run.
#[derive(Debug, Default, Serialize)]
pub struct Diagnostics {
    pub meta: RunMeta,
    pub unknown_languages: Vec<UnknownReference>,
    pub unknown_parameters: Vec<UnknownReference>,
    pub misaligned_rows: Vec<MisalignedRows>,
    pub structural_anomalies: Vec<StructuralAnomaly>,
    pub suspicious_forms: Vec<SuspiciousForm>,
    pub colliding_ids: Vec<CollidingId>,
    pub duplicate_groups: Vec<DuplicateGroup>,
    pub no_data_languages: Vec<String>,
    pub code_changes: Vec<CodeChange>,
    pub unclassified_languages: Vec<String>,
    pub stale_allowlist: Vec<StaleAllowlistEntry>,
    pub overrides_applied: usize,
}

impl Diagnostics {
    /// True when every bucket is empty. `overrides_applied` is
    /// informational and does not count.
    pub fn is_clean(&self) -> bool {
        self.unknown_languages.is_empty()
            && self.unknown_parameters.is_empty()
            && self.misaligned_rows.is_empty()
            && self.structural_anomalies.is_empty()
            && self.suspicious_forms.is_empty()
            && self.colliding_ids.is_empty()
            && self.duplicate_groups.is_empty()
            && self.no_data_languages.is_empty()
            && self.code_changes.is_empty()
            && self.unclassified_languages.is_empty()
            && self.stale_allowlist.is_empty()
    }
}
