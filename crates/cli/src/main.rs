// numbank CLI - headless numeral dataset curation
// See docs for the build/validate/index command contracts

mod exit_codes;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use numbank_io::{catalog, index, snapshot, writer, IoError};
use numbank_pipeline::{Diagnostics, PipelineError, RunConfig};

use exit_codes::{
    EXIT_BUILD_CONFIG, EXIT_BUILD_DIRTY, EXIT_BUILD_INTEGRITY, EXIT_BUILD_SNAPSHOT, EXIT_ERROR,
    EXIT_SUCCESS, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "numbank")]
#[command(about = "Cross-linguistic numeral dataset curation pipeline")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the normalized dataset from a raw snapshot
    #[command(after_help = "\
Examples:
  numbank build numerals.toml --snapshot raw/ --catalog glottolog.csv -o cldf/
  numbank build numerals.toml --snapshot raw/ --catalog glottolog.csv \\
      --overrides overrides/ -o cldf/ --report report.json
  numbank build numerals.toml --snapshot raw/ --catalog glottolog.csv -o cldf/ --strict")]
    Build {
        /// Path to the run config TOML file
        config: PathBuf,

        /// Raw snapshot directory (languages.csv, parameters.csv, forms/)
        #[arg(long)]
        snapshot: PathBuf,

        /// Languoid catalog CSV export
        #[arg(long)]
        catalog: PathBuf,

        /// Curated override directory
        #[arg(long)]
        overrides: Option<PathBuf>,

        /// Output directory for the normalized tables
        #[arg(long, short = 'o')]
        out: PathBuf,

        /// Print the diagnostics report as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Write the diagnostics report as JSON to a file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Fail if the diagnostics report is not clean
        #[arg(long)]
        strict: bool,
    },

    /// Validate a run config without building
    #[command(after_help = "\
Examples:
  numbank validate numerals.toml")]
    Validate {
        /// Path to the run config TOML file
        config: PathBuf,
    },

    /// Write the per-family raw split and its markdown index
    #[command(after_help = "\
Examples:
  numbank index numerals.toml --snapshot raw/ --catalog glottolog.csv -o raw_split/")]
    Index {
        /// Path to the run config TOML file
        config: PathBuf,

        /// Raw snapshot directory (languages.csv, parameters.csv, forms/)
        #[arg(long)]
        snapshot: PathBuf,

        /// Languoid catalog CSV export
        #[arg(long)]
        catalog: PathBuf,

        /// Curated override directory
        #[arg(long)]
        overrides: Option<PathBuf>,

        /// Output directory for the split and index.md
        #[arg(long, short = 'o')]
        out: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build {
            config,
            snapshot,
            catalog,
            overrides,
            out,
            json,
            report,
            strict,
        } => cmd_build(config, snapshot, catalog, overrides, out, json, report, strict),
        Commands::Validate { config } => cmd_validate(config),
        Commands::Index {
            config,
            snapshot,
            catalog,
            overrides,
            out,
        } => cmd_index(config, snapshot, catalog, overrides, out),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

// =============================================================================
// Commands
// =============================================================================

#[allow(clippy::too_many_arguments)]
fn cmd_build(
    config_path: PathBuf,
    snapshot_dir: PathBuf,
    catalog_path: PathBuf,
    overrides_dir: Option<PathBuf>,
    out_dir: PathBuf,
    json_output: bool,
    report_file: Option<PathBuf>,
    strict: bool,
) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    let (dataset, diags) = run_pipeline(&config, &snapshot_dir, &catalog_path, overrides_dir.as_deref())?;

    writer::write_dataset(&out_dir, &dataset).map_err(CliError::from_io)?;

    let report_json = serde_json::to_string_pretty(&diags)
        .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = report_file {
        std::fs::write(path, &report_json)
            .map_err(|e| CliError::general(format!("cannot write report: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{report_json}");
    }

    print_summary(&config, &dataset, &diags);

    if strict && !diags.is_clean() {
        return Err(CliError {
            code: EXIT_BUILD_DIRTY,
            message: "diagnostics report is not clean".into(),
            hint: Some("run with --report to inspect the buckets".into()),
        });
    }

    Ok(())
}

fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    eprintln!(
        "valid: '{}' with {} exclusion(s), {} allow-list entries, {} suppressed group(s)",
        config.name,
        config.exclusions.languages.len(),
        config.allowlist.problematic.len(),
        config.duplicates.suppress.len(),
    );
    Ok(())
}

fn cmd_index(
    config_path: PathBuf,
    snapshot_dir: PathBuf,
    catalog_path: PathBuf,
    overrides_dir: Option<PathBuf>,
    out_dir: PathBuf,
) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    let (dataset, _diags) = run_pipeline(&config, &snapshot_dir, &catalog_path, overrides_dir.as_deref())?;

    index::write_index(&out_dir, &dataset, &config.index).map_err(CliError::from_io)?;
    eprintln!(
        "indexed {} language file(s) under {}",
        index::split_forms(&dataset).len(),
        out_dir.display(),
    );
    Ok(())
}

// =============================================================================
// Helpers
// =============================================================================

fn load_config(path: &Path) -> Result<RunConfig, CliError> {
    let config_str = std::fs::read_to_string(path).map_err(|e| CliError {
        code: EXIT_USAGE,
        message: format!("cannot read config: {e}"),
        hint: None,
    })?;
    RunConfig::from_toml(&config_str).map_err(CliError::from_pipeline)
}

fn run_pipeline(
    config: &RunConfig,
    snapshot_dir: &Path,
    catalog_path: &Path,
    overrides_dir: Option<&Path>,
) -> Result<(numbank_pipeline::Dataset, Diagnostics), CliError> {
    let input = snapshot::load_snapshot(snapshot_dir, overrides_dir).map_err(CliError::from_io)?;
    let taxonomy = catalog::load_catalog(catalog_path).map_err(CliError::from_io)?;
    numbank_pipeline::run(config, &taxonomy, &input).map_err(CliError::from_pipeline)
}

/// Human summary to stderr. Machine output goes to stdout via --json.
fn print_summary(config: &RunConfig, dataset: &numbank_pipeline::Dataset, diags: &Diagnostics) {
    eprintln!(
        "'{}': {} languages, {} parameters, {} forms",
        config.name,
        dataset.languages.len(),
        dataset.parameters.len(),
        dataset.forms.len(),
    );
    eprintln!(
        "diagnostics: {} unknown refs, {} misaligned, {} anomalies, {} suspicious, \
         {} colliding ids, {} duplicate groups, {} without data, {} code changes, \
         {} unclassified, {} stale allow-list, {} override(s) applied",
        diags.unknown_languages.len() + diags.unknown_parameters.len(),
        diags.misaligned_rows.len(),
        diags.structural_anomalies.len(),
        diags.suspicious_forms.len(),
        diags.colliding_ids.len(),
        diags.duplicate_groups.len(),
        diags.no_data_languages.len(),
        diags.code_changes.len(),
        diags.unclassified_languages.len(),
        diags.stale_allowlist.len(),
        diags.overrides_applied,
    );
}

fn long_version() -> String {
    format!(
        "{} (commit {})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_COMMIT_HASH"),
    )
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    /// Failures outside the build-specific ranges (output writing,
    /// serialization).
    fn general(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_ERROR,
            message: msg.into(),
            hint: None,
        }
    }

    fn from_pipeline(err: PipelineError) -> Self {
        let code = match err {
            PipelineError::ConfigParse(_) | PipelineError::ConfigValidation(_) => EXIT_BUILD_CONFIG,
            PipelineError::DuplicateRawId(_) | PipelineError::OrphanOverride(_) => {
                EXIT_BUILD_SNAPSHOT
            }
        };
        Self {
            code,
            message: err.to_string(),
            hint: None,
        }
    }

    fn from_io(err: IoError) -> Self {
        let code = match err {
            IoError::Integrity(_) => EXIT_BUILD_INTEGRITY,
            _ => EXIT_BUILD_SNAPSHOT,
        };
        Self {
            code,
            message: err.to_string(),
            hint: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_map_to_config_code() {
        let err = CliError::from_pipeline(PipelineError::ConfigValidation("bad".into()));
        assert_eq!(err.code, EXIT_BUILD_CONFIG);
    }

    #[test]
    fn input_shape_errors_map_to_snapshot_code() {
        let err = CliError::from_pipeline(PipelineError::DuplicateRawId("abcd1234".into()));
        assert_eq!(err.code, EXIT_BUILD_SNAPSHOT);
    }

    #[test]
    fn integrity_violations_get_their_own_code() {
        let err = CliError::from_io(IoError::Integrity("dangling form".into()));
        assert_eq!(err.code, EXIT_BUILD_INTEGRITY);
        let err = CliError::from_io(IoError::io("/tmp/x", "gone"));
        assert_eq!(err.code, EXIT_BUILD_SNAPSHOT);
    }
}
