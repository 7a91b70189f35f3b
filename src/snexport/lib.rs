//! # Snexport Architecture
//!
//! Snexport turns Supernote handwritten notes into files inside a notes vault:
//! a Markdown transcript of the recognized text, one PNG per page, or a
//! searchable PDF. It is a library first; the `snexport` binary is one client.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Owns vault, decoder and rasterizer for its lifetime      │
//! │  - Loads configuration per call, returns CmdResult          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Export orchestration, inspection, classification         │
//! │  - Operates on Rust types, returns Rust types               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Building blocks                                            │
//! │  - pattern, paths, unique: where artifacts go               │
//! │  - assemble: what goes in them                              │
//! │  - decode, raster, store: the outside world, behind traits  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Export pipeline
//!
//! `decode -> resolve paths -> [render + write images] -> assemble -> persist`.
//! Each export request runs start to finish on the calling thread and owns
//! everything it creates; nothing is carried over between requests except the
//! files in the vault.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`pattern`]: Date-pattern compiler used to spot daily notes
//! - [`paths`]: Per-artifact destination folders, including categorization
//! - [`unique`]: Collision-free file naming
//! - [`assemble`]: Markdown and PDF builders
//! - [`decode`] / [`raster`]: Note decoding and page rendering interfaces
//! - [`store`]: Vault abstraction and implementations
//! - [`dictionary`]: Corrections applied to recognized text
//! - [`model`], [`config`], [`error`]: Shared types
//! - `cli`: Argument parsing and printing for the binary (not part of the lib API)

pub mod api;
pub mod assemble;
pub mod commands;
pub mod config;
pub mod decode;
pub mod dictionary;
pub mod error;
pub mod model;
pub mod paths;
pub mod pattern;
pub mod raster;
pub mod store;
pub mod unique;
