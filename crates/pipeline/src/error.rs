use std::fmt;

#[derive(Debug)]
pub enum PipelineError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (unsorted suppression key, empty rule data, etc.).
    ConfigValidation(String),
    /// The source listing repeats a raw language identifier. Canonical id
    /// assignment would be silently wrong, so this aborts the run.
    DuplicateRawId(String),
    /// An override was supplied for an identifier absent from the source
    /// listing. Its rows could never be reached.
    OrphanOverride(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::DuplicateRawId(id) => {
                write!(f, "raw language id '{id}' appears more than once in the source listing")
            }
            Self::OrphanOverride(id) => {
                write!(f, "override for '{id}' matches no language in the source listing")
            }
        }
    }
}

impl std::error::Error for PipelineError {}
