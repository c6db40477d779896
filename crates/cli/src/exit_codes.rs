//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, missing file) |
//! | 3-9     | build            | Pipeline build codes                     |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Build (3-9)
// =============================================================================

/// Run config failed to parse or validate.
pub const EXIT_BUILD_CONFIG: u8 = 3;

/// Snapshot, catalog, or override load error. Covers missing files, CSV
/// parse failures, misnamed override files, and duplicate or orphaned
/// identifiers in the input shape.
pub const EXIT_BUILD_SNAPSHOT: u8 = 4;

/// Referential integrity violation detected by the writer. Nothing was
/// written.
pub const EXIT_BUILD_INTEGRITY: u8 = 5;

/// `--strict` was set and the diagnostics report is not clean.
pub const EXIT_BUILD_DIRTY: u8 = 6;
