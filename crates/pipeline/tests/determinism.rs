//! End-to-end pipeline runs over a small but full-featured snapshot:
//! overrides, exclusions, allow-lists, duplicate suppression, catalog
//! misses. Checks the output is byte-stable across repeated runs.

use std::collections::HashMap;

use numbank_pipeline::model::{Concept, OverrideSet, PipelineInput, RawLanguage, RawRow};
use numbank_pipeline::taxonomy::{CatalogEntry, MemoryCatalog};
use numbank_pipeline::{run, RunConfig};

fn lang(id: &str, name: &str) -> RawLanguage {
    RawLanguage {
        id: id.into(),
        name: name.into(),
        source_file: Some(format!("{name}.htm")),
        ..Default::default()
    }
}

fn row(language_id: &str, parameter_id: &str, value: &str, form: &str) -> RawRow {
    RawRow {
        language_id: language_id.into(),
        parameter_id: parameter_id.into(),
        value: value.into(),
        form: form.into(),
        other_form: None,
        loan: "False".into(),
        variant_id: "1".into(),
        comment: None,
        column_count: 10,
    }
}

fn fixture() -> (RunConfig, MemoryCatalog, PipelineInput) {
    let config = RunConfig::from_toml(
        r#"
name = "numerals"

[exclusions]
languages = ["junk1234-1", "redo5678-1"]

[[allowlist.problematic]]
id = "lith1251-1-5-1"
form = "penki?"

[duplicates]
suppress = ["bosn1245-1,croa1245-1"]
"#,
    )
    .unwrap();

    let mut catalog = MemoryCatalog::new();
    for (raw, code, family) in [
        ("lith1251-1", "lith1251", "Indo-European"),
        ("bosn1245-1", "bosn1245", "Indo-European"),
        ("croa1245-1", "croa1245", "Indo-European"),
        ("redo5678-1", "redo5678", "Austronesian"),
    ] {
        catalog.insert(
            raw,
            CatalogEntry {
                code: Some(code.into()),
                family: Some(family.into()),
                macroarea: Some("Eurasia".into()),
                ..Default::default()
            },
        );
    }

    let languages = vec![
        lang("lith1251-1", "Lithuanian"),
        lang("bosn1245-1", "Bosnian"),
        lang("croa1245-1", "Croatian"),
        lang("junk1234-1", "Scan Artifact"),
        lang("redo5678-1", "Recollected"),
        lang("nocode99", "Unlisted Variety"),
    ];

    let mut base: HashMap<String, Vec<RawRow>> = HashMap::new();
    base.insert(
        "lith1251-1".into(),
        vec![
            row("lith1251-1", "1", "vienas", "vienas"),
            row("lith1251-1", "2", "du", "du"),
            row("lith1251-1", "5", "penki", "penki?"),
        ],
    );
    for id in ["bosn1245-1", "croa1245-1"] {
        base.insert(
            id.into(),
            vec![row(id, "1", "jedan", "jedan"), row(id, "2", "dva", "dva")],
        );
    }
    base.insert(
        "junk1234-1".into(),
        vec![row("junk1234-1", "1", "one", "one")],
    );
    base.insert(
        "redo5678-1".into(),
        vec![row("redo5678-1", "1", "stale", "stale")],
    );

    let mut overrides = OverrideSet::default();
    overrides.forms.insert(
        "redo5678-1".into(),
        vec![
            row("redo5678-1", "1", "tahi", "tahi"),
            row("redo5678-1", "2", "rua", "rua"),
        ],
    );

    let input = PipelineInput {
        languages,
        parameters: (1..=10)
            .map(|i| Concept {
                id: i.to_string(),
                name: format!("numeral-{i}"),
            })
            .collect(),
        base,
        overrides,
    };

    (config, catalog, input)
}

#[test]
fn repeated_runs_are_byte_identical() {
    let (config, catalog, input) = fixture();

    let (first, _) = run(&config, &catalog, &input).unwrap();
    let (second, _) = run(&config, &catalog, &input).unwrap();

    let a = serde_json::to_string(&first).unwrap();
    let b = serde_json::to_string(&second).unwrap();
    assert_eq!(a, b);
}

#[test]
fn full_run_honors_every_curation_layer() {
    let (config, catalog, input) = fixture();
    let (dataset, diags) = run(&config, &catalog, &input).unwrap();

    // Excluded scan artifact is gone; overridden language survived its
    // exclusion with curated rows only.
    assert!(dataset.languages.iter().all(|l| l.name != "Scan Artifact"));
    let redo_forms: Vec<&str> = dataset
        .forms
        .iter()
        .filter(|f| f.language_id == "redo5678-1")
        .map(|f| f.form.as_str())
        .collect();
    assert_eq!(redo_forms, ["tahi", "rua"]);
    assert!(!dataset.forms.iter().any(|f| f.form == "stale"));
    assert_eq!(diags.overrides_applied, 1);

    // Allow-list cleared the flagged Lithuanian entry.
    let penki = dataset
        .forms
        .iter()
        .find(|f| f.id == "lith1251-1-5-1")
        .unwrap();
    assert_eq!(penki.form, "penki?");
    assert!(!penki.problematic);
    assert!(diags.stale_allowlist.is_empty());

    // Bosnian/Croatian twin datasets are suppressed, not reported.
    assert!(diags.duplicate_groups.is_empty());

    // Catalog miss fell back to the raw-id prefix.
    assert!(dataset.languages.iter().any(|l| l.id == "nocode99-1"));
    assert_eq!(
        diags.unclassified_languages,
        vec!["junk1234-1", "nocode99"]
    );
    assert_eq!(diags.no_data_languages, vec!["nocode99-1"]);

    // Every form resolves to an emitted language.
    for form in &dataset.forms {
        assert!(dataset.languages.iter().any(|l| l.id == form.language_id));
    }
}
