//! `EnvelopeBoard` - the core of a personal finance dashboard
//!
//! This crate provides the balance-reconciliation core behind an envelope
//! budgeting board: transactions are recorded as credits and debits,
//! allocated into named envelopes, and every envelope's cached balance is
//! kept consistent with the signed sum of the transactions referencing it.
//! The stored balance is derived state: it is recomputed from scratch after
//! every mutation rather than adjusted incrementally, so transient staleness
//! always self-heals. Cross-envelope transfers are expressed as a pair of
//! linked transactions so history survives as an audit trail.

// Deny the most critical lints that could lead to bugs or security issues
#![deny(
    // Security and correctness
    unsafe_code,
    unsafe_op_in_unsafe_fn,

    // Code quality - things that are almost always bugs
    unreachable_code,
    unreachable_patterns,
    unused_must_use,

    // Documentation - broken links are bugs
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
)]
// Warn on things that should be fixed but aren't necessarily bugs
#![warn(
    missing_docs,

    // Clippy categories for overall code quality
    clippy::all,
    clippy::pedantic,
    clippy::nursery,

    // Performance
    clippy::inefficient_to_string,
    clippy::large_types_passed_by_value,
    clippy::needless_pass_by_value,
    clippy::unnecessary_wraps,

    // Correctness
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::exit,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,

    // Complexity and readability
    clippy::cognitive_complexity,
    clippy::large_enum_variant,
    clippy::match_same_arms,
    clippy::too_many_lines,

    // Style consistency
    clippy::enum_glob_use,
    clippy::inconsistent_struct_constructor,
    clippy::must_use_candidate,
    clippy::redundant_closure_for_method_calls,
    clippy::semicolon_if_nothing_returned,
    clippy::wildcard_imports,

    // Future compatibility
    future_incompatible,
    rust_2018_idioms,
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,  // Common pattern in Rust
    clippy::missing_errors_doc,        // Will add gradually
    clippy::missing_panics_doc,        // Will add gradually
)]

/// Configuration management for database and envelope seeding
pub mod config;
/// Core business logic - envelope, transaction, and synchronization operations
pub mod core;
/// Unified error types and result handling
pub mod errors;
/// Application-layer data model with signed amounts
pub mod models;

// The entities and store accessors stay crate-private: the cached envelope
// balance must only be writable through `core::sync`.
pub(crate) mod db;
pub(crate) mod entities;

#[cfg(test)]
pub mod test_utils;
