use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum IoError {
    /// File read/write error.
    Io { path: PathBuf, message: String },
    /// CSV parse error.
    Parse { path: PathBuf, message: String },
    /// A required header column is missing.
    MissingColumn { path: PathBuf, column: String },
    /// An override file name does not match the expected identifier
    /// pattern. Fatal: the rows could not be attributed to a language.
    BadOverrideName(PathBuf),
    /// Two files in the same load share a stem (raw language id). One
    /// would silently shadow the other, so the load aborts.
    DuplicateStem { stem: String, path: PathBuf },
    /// A form references a language or parameter absent from the dataset.
    /// Detected by the sink before anything is written; aborts the run.
    Integrity(String),
}

impl IoError {
    pub fn io(path: impl Into<PathBuf>, err: impl fmt::Display) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub fn parse(path: impl Into<PathBuf>, err: impl fmt::Display) -> Self {
        Self::Parse {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "{}: {message}", path.display()),
            Self::Parse { path, message } => {
                write!(f, "{}: parse error: {message}", path.display())
            }
            Self::MissingColumn { path, column } => {
                write!(f, "{}: missing column '{column}'", path.display())
            }
            Self::BadOverrideName(path) => write!(
                f,
                "override file '{}' does not match the expected '<raw_id>.csv' pattern",
                path.display()
            ),
            Self::DuplicateStem { stem, path } => write!(
                f,
                "'{}' repeats the file stem '{stem}' already seen in this load",
                path.display()
            ),
            Self::Integrity(msg) => write!(f, "referential integrity violation: {msg}"),
        }
    }
}

impl std::error::Error for IoError {}
