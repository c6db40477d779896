use std::collections::HashSet;

use serde::Deserialize;

use crate::error::PipelineError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Run configuration. Every hand-curated list the pipeline consults lives
/// here, not in module constants, so tests can substitute fixtures.
#[derive(Debug, Deserialize)]
pub struct RunConfig {
    pub name: String,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub exclusions: ExclusionConfig,
    #[serde(default)]
    pub allowlist: AllowlistConfig,
    #[serde(default)]
    pub duplicates: DuplicateConfig,
    #[serde(default)]
    pub index: IndexConfig,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    /// Forms equal to this token after normalization are dropped silently.
    #[serde(default = "default_missing_sentinel")]
    pub missing_sentinel: String,
    /// Expected physical field count of a form-table row.
    #[serde(default = "default_expected_columns")]
    pub expected_columns: usize,
}

fn default_missing_sentinel() -> String {
    "NA".into()
}

fn default_expected_columns() -> usize {
    10
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            missing_sentinel: default_missing_sentinel(),
            expected_columns: default_expected_columns(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    /// A secondary form containing this marker flags the entry regardless
    /// of the form-based rules.
    #[serde(default = "default_other_form_marker")]
    pub other_form_marker: char,
}

fn default_other_form_marker() -> char {
    '<'
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            other_form_marker: default_other_form_marker(),
        }
    }
}

/// Raw language ids dropped from output. A language with an active override
/// is never excluded; the override wins.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExclusionConfig {
    #[serde(default)]
    pub languages: Vec<String>,
}

impl ExclusionConfig {
    pub fn contains(&self, raw_id: &str) -> bool {
        self.languages.iter().any(|l| l == raw_id)
    }
}

/// Entries whose problematic flag may be cleared at output time. Clearing
/// requires the id and the exact live form to match.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AllowlistConfig {
    #[serde(default)]
    pub problematic: Vec<AllowlistEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AllowlistEntry {
    pub id: String,
    pub form: String,
}

/// Duplicate-group suppression. Each entry is the sorted, comma-joined set
/// of canonical language ids of a known-legitimate near-identical group
/// (e.g. dialects sharing a source).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DuplicateConfig {
    #[serde(default)]
    pub suppress: Vec<String>,
}

impl DuplicateConfig {
    pub fn suppressed(&self) -> HashSet<&str> {
        self.suppress.iter().map(String::as_str).collect()
    }
}

/// Settings for the per-family raw index (io-side feature).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexConfig {
    /// Families that get their own directory; everything else lands under
    /// `Other`.
    #[serde(default)]
    pub families: Vec<String>,
    /// Base URL of the upstream source pages linked from the index.
    #[serde(default)]
    pub source_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl RunConfig {
    pub fn from_toml(input: &str) -> Result<Self, PipelineError> {
        let config: RunConfig =
            toml::from_str(input).map_err(|e| PipelineError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.name.is_empty() {
            return Err(PipelineError::ConfigValidation("name must not be empty".into()));
        }

        if self.ingest.missing_sentinel.is_empty() {
            return Err(PipelineError::ConfigValidation(
                "ingest.missing_sentinel must not be empty".into(),
            ));
        }

        if self.ingest.expected_columns == 0 {
            return Err(PipelineError::ConfigValidation(
                "ingest.expected_columns must be at least 1".into(),
            ));
        }

        // Suppression keys must be canonical: sorted, comma-joined, no blanks.
        for key in &self.duplicates.suppress {
            let parts: Vec<&str> = key.split(',').collect();
            if parts.len() < 2 || parts.iter().any(|p| p.trim() != *p || p.is_empty()) {
                return Err(PipelineError::ConfigValidation(format!(
                    "duplicates.suppress entry '{key}' must be two or more ids joined by ','"
                )));
            }
            if !parts.windows(2).all(|w| w[0] <= w[1]) {
                return Err(PipelineError::ConfigValidation(format!(
                    "duplicates.suppress entry '{key}' must list ids in sorted order"
                )));
            }
        }

        for entry in &self.allowlist.problematic {
            if entry.id.is_empty() || entry.form.is_empty() {
                return Err(PipelineError::ConfigValidation(
                    "allowlist.problematic entries need both id and form".into(),
                ));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
name = "numerals"

[ingest]
missing_sentinel = "NA"
expected_columns = 10

[classifier]
other_form_marker = "<"

[exclusions]
languages = ["fake1234", "test1111"]

[[allowlist.problematic]]
id = "engl1234-1-5-1"
form = "five?"

[duplicates]
suppress = ["bosn1245-1,croa1245-1"]

[index]
families = ["Austronesian", "Indo-European"]
source_url = "https://numerals.example.org/"
"#;

    #[test]
    fn parse_valid() {
        let config = RunConfig::from_toml(VALID).unwrap();
        assert_eq!(config.name, "numerals");
        assert_eq!(config.ingest.missing_sentinel, "NA");
        assert_eq!(config.ingest.expected_columns, 10);
        assert_eq!(config.classifier.other_form_marker, '<');
        assert!(config.exclusions.contains("fake1234"));
        assert!(!config.exclusions.contains("real1234"));
        assert_eq!(config.allowlist.problematic.len(), 1);
        assert!(config.duplicates.suppressed().contains("bosn1245-1,croa1245-1"));
        assert_eq!(config.index.families.len(), 2);
    }

    #[test]
    fn defaults_fill_in() {
        let config = RunConfig::from_toml("name = \"numerals\"").unwrap();
        assert_eq!(config.ingest.missing_sentinel, "NA");
        assert_eq!(config.ingest.expected_columns, 10);
        assert_eq!(config.classifier.other_form_marker, '<');
        assert!(config.exclusions.languages.is_empty());
        assert!(config.duplicates.suppress.is_empty());
        assert!(config.index.source_url.is_none());
    }

    #[test]
    fn reject_unsorted_suppression_key() {
        let input = r#"
name = "numerals"
[duplicates]
suppress = ["croa1245-1,bosn1245-1"]
"#;
        let err = RunConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("sorted order"));
    }

    #[test]
    fn reject_single_id_suppression_key() {
        let input = r#"
name = "numerals"
[duplicates]
suppress = ["bosn1245-1"]
"#;
        let err = RunConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("two or more ids"));
    }

    #[test]
    fn reject_empty_allowlist_form() {
        let input = r#"
name = "numerals"
[[allowlist.problematic]]
id = "engl1234-1-5-1"
form = ""
"#;
        let err = RunConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("allowlist"));
    }

    #[test]
    fn reject_empty_sentinel() {
        let input = r#"
name = "numerals"
[ingest]
missing_sentinel = ""
"#;
        assert!(RunConfig::from_toml(input).is_err());
    }
}
