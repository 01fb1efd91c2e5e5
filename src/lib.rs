//! Stricture - cross-service static analysis and contract-conformance engine.
//!
//! Stricture reads source files across multiple languages, extracts exported
//! symbols, handler bindings, and typed data shapes, then evaluates them
//! against intra-repo convention rules and an optional cross-service
//! manifest describing HTTP and message-queue contracts.
//!
//! ## Module Structure
//!
//! - `adapters`: language adapters that build a language-neutral `FileModel` (C1)
//! - `rules`: rule registry and built-in `CONV-*` convention rules (C2/C3)
//! - `manifest`: manifest document model, parsing, and strictness computation (C4)
//! - `conformance`: manifest/code conformance and strictness-parity rules (C5)
//! - `engine`: file discovery, scope selection, and the scheduler (C6)
//! - `baseline`: baseline fingerprinting and diff mode (C7)
//! - `suppression`: in-source suppression directives (C7)
//! - `filter`: severity floor and `--max-violations` truncation (C7)
//! - `reporter`: text/JSON report rendering (C8)
//! - `config`: per-project `.stricture.yml` loading
//! - `vcs`: git subprocess helpers for `--changed`/`--staged`
//! - `error`: the operational error taxonomy surfaced at the CLI boundary
//! - `cli`: command-line interface layer

pub mod adapters;
pub mod baseline;
pub mod cli;
pub mod conformance;
pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod manifest;
pub mod model;
pub mod reporter;
pub mod rules;
pub mod suppression;
pub mod vcs;
