use std::path::Path;

use numbank_pipeline::taxonomy::{CatalogEntry, MemoryCatalog};

use crate::error::IoError;
use crate::read::read_file_as_utf8;

/// Load a flat languoid catalog export. Columns: `ID` (raw language id),
/// `Glottocode`, `Name`, `Family`, `Macroarea`, `Latitude`, `Longitude`.
/// Everything past `ID` is optional per row.
pub fn load_catalog(path: &Path) -> Result<MemoryCatalog, IoError> {
    let content = read_file_as_utf8(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| IoError::parse(path, e))?
        .iter()
        .map(str::to_string)
        .collect();
    let idx = |name: &str| headers.iter().position(|h| h == name);
    let Some(id_idx) = idx("ID") else {
        return Err(IoError::MissingColumn {
            path: path.to_path_buf(),
            column: "ID".into(),
        });
    };
    let code_idx = idx("Glottocode");
    let name_idx = idx("Name");
    let family_idx = idx("Family");
    let macroarea_idx = idx("Macroarea");
    let lat_idx = idx("Latitude");
    let lon_idx = idx("Longitude");

    let mut catalog = MemoryCatalog::new();
    for record in reader.records() {
        let record = record.map_err(|e| IoError::parse(path, e))?;
        let get = |i: Option<usize>| {
            i.and_then(|i| record.get(i))
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let num = |i: Option<usize>| {
            i.and_then(|i| record.get(i))
                .and_then(|s| s.parse::<f64>().ok())
        };

        let Some(raw_id) = record.get(id_idx).filter(|s| !s.is_empty()) else {
            continue;
        };
        catalog.insert(
            raw_id,
            CatalogEntry {
                code: get(code_idx),
                name: get(name_idx),
                family: get(family_idx),
                macroarea: get(macroarea_idx),
                latitude: num(lat_idx),
                longitude: num(lon_idx),
            },
        );
    }
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use numbank_pipeline::taxonomy::Catalog;

    #[test]
    fn loads_entries_with_optional_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.csv");
        std::fs::write(
            &path,
            "ID,Glottocode,Name,Family,Macroarea,Latitude,Longitude\n\
             lith1251-1,lith1251,Lithuanian,Indo-European,Eurasia,55.1,23.9\n\
             mystery-1,,,,,,\n",
        )
        .unwrap();

        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.len(), 2);

        let lith = catalog.lookup("lith1251-1").unwrap();
        assert_eq!(lith.code.as_deref(), Some("lith1251"));
        assert_eq!(lith.family.as_deref(), Some("Indo-European"));
        assert_eq!(lith.latitude, Some(55.1));

        let mystery = catalog.lookup("mystery-1").unwrap();
        assert!(mystery.code.is_none());
        assert!(mystery.latitude.is_none());
    }

    #[test]
    fn id_column_is_required() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.csv");
        std::fs::write(&path, "Glottocode,Name\nlith1251,Lithuanian\n").unwrap();
        let err = load_catalog(&path).unwrap_err();
        assert!(matches!(err, IoError::MissingColumn { ref column, .. } if column == "ID"));
    }
}
