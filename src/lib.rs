//! Purpose: Shared library crate used by the `canonkit` CLI and tests.
//! Exports: `api` (registries, export, validation) and `core` (tables, errors).
//! Role: Library backing the binary; `api` is the intended public boundary.
//! Invariants: Embedded datasets load and validate cleanly at all times.
//! Invariants: Core modules prefer explicit inputs/outputs over hidden state.
pub mod api;
pub mod core;

mod data_paths;
