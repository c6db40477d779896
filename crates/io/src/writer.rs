use std::collections::HashSet;
use std::path::Path;

use numbank_pipeline::model::Dataset;

use crate::error::IoError;

/// Write the normalized dataset as three CSV tables plus a JSON schema
/// descriptor. Referential integrity is enforced before the first byte is
/// written; a violation fails the whole run.
pub fn write_dataset(dir: &Path, dataset: &Dataset) -> Result<(), IoError> {
    validate(dataset)?;
    std::fs::create_dir_all(dir).map_err(|e| IoError::io(dir, e))?;

    write_languages(&dir.join("languages.csv"), dataset)?;
    write_parameters(&dir.join("parameters.csv"), dataset)?;
    write_forms(&dir.join("forms.csv"), dataset)?;
    write_metadata(&dir.join("metadata.json"), dataset)?;
    Ok(())
}

/// Every id must be unique within its table, and every form must reference
/// an emitted language and a known parameter.
pub fn validate(dataset: &Dataset) -> Result<(), IoError> {
    let mut languages: HashSet<&str> = HashSet::with_capacity(dataset.languages.len());
    for lang in &dataset.languages {
        if !languages.insert(lang.id.as_str()) {
            return Err(IoError::Integrity(format!(
                "duplicate language id '{}'",
                lang.id
            )));
        }
    }
    let mut parameters: HashSet<&str> = HashSet::with_capacity(dataset.parameters.len());
    for concept in &dataset.parameters {
        if !parameters.insert(concept.id.as_str()) {
            return Err(IoError::Integrity(format!(
                "duplicate parameter id '{}'",
                concept.id
            )));
        }
    }

    let mut form_ids: HashSet<&str> = HashSet::with_capacity(dataset.forms.len());
    for form in &dataset.forms {
        if !form_ids.insert(form.id.as_str()) {
            return Err(IoError::Integrity(format!(
                "duplicate form id '{}'",
                form.id
            )));
        }
        if !languages.contains(form.language_id.as_str()) {
            return Err(IoError::Integrity(format!(
                "form '{}' references unknown language '{}'",
                form.id, form.language_id
            )));
        }
        if !parameters.contains(form.parameter_id.as_str()) {
            return Err(IoError::Integrity(format!(
                "form '{}' references unknown parameter '{}'",
                form.id, form.parameter_id
            )));
        }
    }
    Ok(())
}

fn write_languages(path: &Path, dataset: &Dataset) -> Result<(), IoError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| IoError::io(path, e))?;
    writer
        .write_record([
            "ID",
            "Name",
            "Glottocode",
            "ISO639P3code",
            "Family",
            "Macroarea",
            "Latitude",
            "Longitude",
            "SourceFile",
            "Contributor",
            "Base",
            "Comment",
        ])
        .map_err(|e| IoError::io(path, e))?;

    for lang in &dataset.languages {
        writer
            .write_record([
                lang.id.as_str(),
                lang.name.as_str(),
                lang.glottocode.as_deref().unwrap_or(""),
                lang.iso639p3.as_deref().unwrap_or(""),
                lang.family.as_deref().unwrap_or(""),
                lang.macroarea.as_deref().unwrap_or(""),
                &lang.latitude.map(|v| v.to_string()).unwrap_or_default(),
                &lang.longitude.map(|v| v.to_string()).unwrap_or_default(),
                lang.source_file.as_deref().unwrap_or(""),
                lang.contributor.as_deref().unwrap_or(""),
                lang.base.as_deref().unwrap_or(""),
                lang.comment.as_deref().unwrap_or(""),
            ])
            .map_err(|e| IoError::io(path, e))?;
    }
    writer.flush().map_err(|e| IoError::io(path, e))
}

fn write_parameters(path: &Path, dataset: &Dataset) -> Result<(), IoError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| IoError::io(path, e))?;
    writer
        .write_record(["ID", "Name"])
        .map_err(|e| IoError::io(path, e))?;
    for concept in &dataset.parameters {
        writer
            .write_record([concept.id.as_str(), concept.name.as_str()])
            .map_err(|e| IoError::io(path, e))?;
    }
    writer.flush().map_err(|e| IoError::io(path, e))
}

fn write_forms(path: &Path, dataset: &Dataset) -> Result<(), IoError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| IoError::io(path, e))?;
    writer
        .write_record([
            "ID",
            "Language_ID",
            "Parameter_ID",
            "Value",
            "Form",
            "Other_Form",
            "Loan",
            "Variant_ID",
            "Problematic",
            "Comment",
        ])
        .map_err(|e| IoError::io(path, e))?;

    for form in &dataset.forms {
        writer
            .write_record([
                form.id.as_str(),
                form.language_id.as_str(),
                form.parameter_id.as_str(),
                form.value.as_str(),
                form.form.as_str(),
                form.other_form.as_deref().unwrap_or(""),
                bool_field(form.loan),
                &form.variant.to_string(),
                bool_field(form.problematic),
                form.comment.as_deref().unwrap_or(""),
            ])
            .map_err(|e| IoError::io(path, e))?;
    }
    writer.flush().map_err(|e| IoError::io(path, e))
}

/// Booleans are spelled out to match the source convention.
fn bool_field(v: bool) -> &'static str {
    if v {
        "True"
    } else {
        "False"
    }
}

fn write_metadata(path: &Path, dataset: &Dataset) -> Result<(), IoError> {
    let metadata = serde_json::json!({
        "tables": [
            {
                "url": "languages.csv",
                "primary_key": "ID",
                "rows": dataset.languages.len(),
            },
            {
                "url": "parameters.csv",
                "primary_key": "ID",
                "rows": dataset.parameters.len(),
            },
            {
                "url": "forms.csv",
                "primary_key": "ID",
                "rows": dataset.forms.len(),
                "foreign_keys": [
                    { "column": "Language_ID", "references": "languages.csv" },
                    { "column": "Parameter_ID", "references": "parameters.csv" },
                ],
            },
        ],
    });
    let json = serde_json::to_string_pretty(&metadata)
        .map_err(|e| IoError::io(path, e))?;
    std::fs::write(path, json).map_err(|e| IoError::io(path, e))
}
