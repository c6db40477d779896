use crate::model::{OverrideSet, RawRow};

/// The effective data source for one language. Decided per-language, never
/// per-row: an override table fully supersedes the base rows.
#[derive(Debug, PartialEq, Eq)]
pub enum DataPath<'a> {
    Override(&'a [RawRow]),
    Base(&'a [RawRow]),
    /// Present in neither source. The language keeps its (already added)
    /// record but contributes zero forms; surfaced in diagnostics.
    Missing,
}

/// Pick the data path for `raw_id`, preferring the curated override.
pub fn choose<'a>(
    raw_id: &str,
    base: Option<&'a [RawRow]>,
    overrides: &'a OverrideSet,
) -> DataPath<'a> {
    if let Some(rows) = overrides.forms.get(raw_id) {
        return DataPath::Override(rows);
    }
    match base {
        Some(rows) => DataPath::Base(rows),
        None => DataPath::Missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(language_id: &str, parameter_id: &str, form: &str) -> RawRow {
        RawRow {
            language_id: language_id.into(),
            parameter_id: parameter_id.into(),
            value: form.into(),
            form: form.into(),
            other_form: None,
            loan: "False".into(),
            variant_id: "1".into(),
            comment: None,
            column_count: 10,
        }
    }

    #[test]
    fn override_supersedes_base() {
        let base = vec![row("abcd1234", "1", "one")];
        let mut overrides = OverrideSet::default();
        overrides
            .forms
            .insert("abcd1234".into(), vec![row("abcd1234", "1", "uno")]);

        match choose("abcd1234", Some(&base), &overrides) {
            DataPath::Override(rows) => assert_eq!(rows[0].form, "uno"),
            other => panic!("expected override path, got {other:?}"),
        }
    }

    #[test]
    fn base_used_without_override() {
        let base = vec![row("abcd1234", "1", "one")];
        let overrides = OverrideSet::default();

        match choose("abcd1234", Some(&base), &overrides) {
            DataPath::Base(rows) => assert_eq!(rows[0].form, "one"),
            other => panic!("expected base path, got {other:?}"),
        }
    }

    #[test]
    fn data_paths_compare_by_their_rows() {
        let base = vec![row("abcd1234", "1", "one")];
        let overrides = OverrideSet::default();

        assert_eq!(
            choose("abcd1234", Some(&base), &overrides),
            DataPath::Base(&base)
        );
        assert_ne!(choose("abcd1234", Some(&base), &overrides), DataPath::Missing);
    }

    #[test]
    fn neither_source_is_missing() {
        let overrides = OverrideSet::default();
        assert_eq!(choose("abcd1234", None, &overrides), DataPath::Missing);
    }

    #[test]
    fn language_record_override_alone_is_active_but_not_a_form_path() {
        let mut overrides = OverrideSet::default();
        overrides
            .languages
            .insert("abcd1234".into(), Default::default());

        assert!(overrides.is_active("abcd1234"));
        assert_eq!(choose("abcd1234", None, &overrides), DataPath::Missing);
    }
}
