//! Domain model and rules for the agency operations dashboard.
//!
//! Everything here is pure: collections are passed in by reference and
//! mutated in place, with no I/O. Persistence and sessions live in the
//! `cliqa-db`, `cliqa-api` and `cliqa-session` crates.

pub mod access;
pub mod activity;
pub mod checklist;
pub mod client;
pub mod dashboard;
pub mod department;
pub mod error;
pub mod project;
pub mod settings;
pub mod store;
pub mod types;
pub mod user;
