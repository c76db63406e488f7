//! Purpose: Shared data-directory resolution helpers.
//! Exports: `default_data_dir`.
//! Role: Keep CLI and API loader overlay semantics aligned from one source.
//! Invariants: An explicit `--data-dir` flag always wins over `CANONKIT_DATA_DIR`.
//! Invariants: No directory means embedded datasets only.

use std::path::PathBuf;

pub(crate) fn default_data_dir() -> Option<PathBuf> {
    std::env::var_os("CANONKIT_DATA_DIR").map(PathBuf::from)
}
