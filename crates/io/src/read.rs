use std::io::Read;
use std::path::Path;

use crate::error::IoError;

/// Read a file and convert to UTF-8 if needed. Upstream scrapes arrive in
/// mixed encodings; non-UTF-8 content falls back to Windows-1252.
pub fn read_file_as_utf8(path: &Path) -> Result<String, IoError> {
    let mut file = std::fs::File::open(path).map_err(|e| IoError::io(path, e))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| IoError::io(path, e))?;

    // Try UTF-8 first; on failure, recover the buffer from the error
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_plain_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.csv");
        std::fs::write(&path, "vienas,du,try\u{10d}ia").unwrap();
        assert_eq!(read_file_as_utf8(&path).unwrap(), "vienas,du,try\u{10d}ia");
    }

    #[test]
    fn falls_back_to_windows_1252() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        // "café" in Windows-1252: 0xE9 is not valid UTF-8 on its own
        f.write_all(&[b'c', b'a', b'f', 0xE9]).unwrap();
        drop(f);
        assert_eq!(read_file_as_utf8(&path).unwrap(), "caf\u{e9}");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = read_file_as_utf8(Path::new("/no/such/file.csv")).unwrap_err();
        assert!(matches!(err, IoError::Io { .. }));
    }
}
