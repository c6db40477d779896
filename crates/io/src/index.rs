use std::fmt::Write as _;
use std::path::Path;

use numbank_pipeline::config::IndexConfig;
use numbank_pipeline::model::{Dataset, LexicalEntry};

use crate::error::IoError;

/// Split the (already sorted) form table into per-language runs, keeping
/// form order within each run.
pub fn split_forms(dataset: &Dataset) -> Vec<(&str, Vec<&LexicalEntry>)> {
    let mut split: Vec<(&str, Vec<&LexicalEntry>)> = Vec::new();
    for form in &dataset.forms {
        match split.last_mut() {
            Some((language, run)) if *language == form.language_id => run.push(form),
            _ => split.push((form.language_id.as_str(), vec![form])),
        }
    }
    split
}

/// Write the per-family raw split: one CSV per language under its family
/// directory (`Other` for anything outside the configured major families),
/// plus a fresh `index.md` linking every file.
pub fn write_index(dir: &Path, dataset: &Dataset, config: &IndexConfig) -> Result<(), IoError> {
    std::fs::create_dir_all(dir).map_err(|e| IoError::io(dir, e))?;
    let mut index = String::new();

    for (language_id, entries) in split_forms(dataset) {
        let record = dataset.languages.iter().find(|l| l.id == language_id);

        let family = record
            .and_then(|r| r.family.as_deref())
            .filter(|f| config.families.iter().any(|major| major == f))
            .unwrap_or("Other");
        let family_dir = dir.join(family);
        std::fs::create_dir_all(&family_dir).map_err(|e| IoError::io(&family_dir, e))?;

        let file = family_dir.join(format!("{language_id}.csv"));
        write_language_csv(&file, &entries)?;

        let rel = format!("{family}/{language_id}.csv");
        index.push_str(&index_link(&rel));
        if let (Some(url), Some(source)) = (
            config.source_url.as_deref(),
            record.and_then(|r| r.source_file.as_deref()),
        ) {
            index.push_str(&source_link(source, url));
        }
        index.push_str(&name_suffix(record.map(|r| r.name.as_str()).unwrap_or("")));
        if entries.iter().any(|e| e.problematic) {
            index.push_str(" **(Problems)**");
        }
        index.push('\n');
    }

    let index_path = dir.join("index.md");
    std::fs::write(&index_path, index).map_err(|e| IoError::io(&index_path, e))
}

fn write_language_csv(path: &Path, entries: &[&LexicalEntry]) -> Result<(), IoError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| IoError::io(path, e))?;
    writer
        .write_record(["ID", "Parameter_ID", "Value", "Form", "Problematic"])
        .map_err(|e| IoError::io(path, e))?;
    for entry in entries {
        writer
            .write_record([
                entry.id.as_str(),
                entry.parameter_id.as_str(),
                entry.value.as_str(),
                entry.form.as_str(),
                if entry.problematic { "True" } else { "False" },
            ])
            .map_err(|e| IoError::io(path, e))?;
    }
    writer.flush().map_err(|e| IoError::io(path, e))
}

/// Markdown bullet linking a raw file; spaces are percent-encoded in the
/// target only.
pub fn index_link(rel: &str) -> String {
    let mut out = String::new();
    let _ = write!(out, "* [{rel}]({})", rel.replace(' ', "%20"));
    out
}

/// Link to the upstream source page a language was scraped from.
pub fn source_link(source_file: &str, base_url: &str) -> String {
    format!(" ([Source]({base_url}{}))", source_file.replace(' ', "%20"))
}

pub fn name_suffix(name: &str) -> String {
    if name.is_empty() {
        String::new()
    } else {
        format!(" ({name})")
    }
}
