use std::collections::HashMap;
use std::path::{Path, PathBuf};

use numbank_pipeline::model::{Concept, OverrideSet, PipelineInput, RawLanguage, RawRow};

use crate::error::IoError;
use crate::read::read_file_as_utf8;

/// Stem pattern an override file must match: a bare raw language id,
/// lowercase alphanumeric with an optional numeric suffix. Anything else
/// (spare copies, renamed exports) would be silently misattributed, so it
/// aborts the load.
const OVERRIDE_STEM: &str = r"^[a-z0-9]+(-[0-9]+)?$";

/// Load the full snapshot: the language listing, the concept registry, and
/// every per-language form table found under `forms/` (family
/// subdirectories welcome). `overrides_dir`, when given, fills the
/// override set.
pub fn load_snapshot(dir: &Path, overrides_dir: Option<&Path>) -> Result<PipelineInput, IoError> {
    let languages = load_languages(&dir.join("languages.csv"))?;
    let parameters = load_concepts(&dir.join("parameters.csv"))?;

    let mut base: HashMap<String, Vec<RawRow>> = HashMap::new();
    let forms_dir = dir.join("forms");
    if forms_dir.is_dir() {
        for file in collect_csv_files(&forms_dir)? {
            let raw_id = stem(&file);
            if base.contains_key(&raw_id) {
                return Err(IoError::DuplicateStem {
                    stem: raw_id,
                    path: file,
                });
            }
            base.insert(raw_id, load_form_rows(&file)?);
        }
    }

    let overrides = match overrides_dir {
        Some(dir) if dir.is_dir() => load_overrides(dir)?,
        _ => OverrideSet::default(),
    };

    Ok(PipelineInput {
        languages,
        parameters,
        base,
        overrides,
    })
}

/// Load the curated override directory: `<raw_id>.csv` form tables plus an
/// optional `languages.csv` of replacement listing rows.
pub fn load_overrides(dir: &Path) -> Result<OverrideSet, IoError> {
    let stem_re = regex::Regex::new(OVERRIDE_STEM).expect("static pattern");
    let mut overrides = OverrideSet::default();

    for file in collect_csv_files(dir)? {
        let raw_id = stem(&file);
        if raw_id == "languages" {
            for lang in load_languages(&file)? {
                overrides.languages.insert(lang.id.clone(), lang);
            }
            continue;
        }
        if !stem_re.is_match(&raw_id) {
            return Err(IoError::BadOverrideName(file));
        }
        if overrides.forms.contains_key(&raw_id) {
            return Err(IoError::DuplicateStem {
                stem: raw_id,
                path: file,
            });
        }
        overrides.forms.insert(raw_id, load_form_rows(&file)?);
    }

    Ok(overrides)
}

pub fn load_languages(path: &Path) -> Result<Vec<RawLanguage>, IoError> {
    let content = read_file_as_utf8(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers = header_index(path, &mut reader)?;
    let id = require(path, &headers, "ID")?;
    let name = require(path, &headers, "Name")?;

    let mut languages = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IoError::parse(path, e))?;
        let field = |col: &str| {
            headers
                .get(col)
                .and_then(|&i| record.get(i))
                .map(str::to_string)
        };
        let opt = |col: &str| field(col).filter(|s| !s.is_empty());

        languages.push(RawLanguage {
            id: record.get(id).unwrap_or("").to_string(),
            name: record.get(name).unwrap_or("").to_string(),
            iso639p3: opt("ISO639P3code"),
            source_file: opt("SourceFile"),
            contributor: opt("Contributor"),
            base: opt("Base"),
            comment: opt("Comment"),
        });
    }
    Ok(languages)
}

pub fn load_concepts(path: &Path) -> Result<Vec<Concept>, IoError> {
    let content = read_file_as_utf8(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers = header_index(path, &mut reader)?;
    let id = require(path, &headers, "ID")?;
    let name = require(path, &headers, "Name")?;

    let mut concepts = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IoError::parse(path, e))?;
        concepts.push(Concept {
            id: record.get(id).unwrap_or("").to_string(),
            name: record.get(name).unwrap_or("").to_string(),
        });
    }
    Ok(concepts)
}

/// Load one per-language form table. The reader is flexible on purpose:
/// rows with the wrong field count are carried through with their actual
/// `column_count` so the engine can report them instead of dying here.
pub fn load_form_rows(path: &Path) -> Result<Vec<RawRow>, IoError> {
    let content = read_file_as_utf8(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = header_index(path, &mut reader)?;
    let language = require(path, &headers, "Language_ID")?;
    let parameter = require(path, &headers, "Parameter_ID")?;
    let value = require(path, &headers, "Value")?;
    let form = require(path, &headers, "Form")?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IoError::parse(path, e))?;
        let field = |col: &str| -> String {
            headers
                .get(col)
                .and_then(|&i| record.get(i))
                .unwrap_or("")
                .to_string()
        };
        let opt = |col: &str| -> Option<String> {
            headers
                .get(col)
                .and_then(|&i| record.get(i))
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        rows.push(RawRow {
            language_id: record.get(language).unwrap_or("").to_string(),
            parameter_id: record.get(parameter).unwrap_or("").to_string(),
            value: record.get(value).unwrap_or("").to_string(),
            form: record.get(form).unwrap_or("").to_string(),
            other_form: opt("Other_Form"),
            loan: field("Loan"),
            variant_id: field("Variant_ID"),
            comment: opt("Comment"),
            column_count: record.len(),
        });
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn header_index(
    path: &Path,
    reader: &mut csv::Reader<&[u8]>,
) -> Result<HashMap<String, usize>, IoError> {
    Ok(reader
        .headers()
        .map_err(|e| IoError::parse(path, e))?
        .iter()
        .enumerate()
        .map(|(i, h)| (h.to_string(), i))
        .collect())
}

fn require(
    path: &Path,
    headers: &HashMap<String, usize>,
    column: &str,
) -> Result<usize, IoError> {
    headers
        .get(column)
        .copied()
        .ok_or_else(|| IoError::MissingColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
        })
}

/// All `.csv` files under `dir`, recursively, in sorted path order so the
/// load is reproducible across filesystems.
fn collect_csv_files(dir: &Path) -> Result<Vec<PathBuf>, IoError> {
    let mut files = Vec::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(current) = stack.pop() {
        let entries = std::fs::read_dir(&current).map_err(|e| IoError::io(&current, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| IoError::io(&current, e))?;
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().is_some_and(|ext| ext == "csv") {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
