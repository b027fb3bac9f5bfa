//! # Lockbox Migrate
//!
//! Schema migration runner for the Lockbox vault database, usable both as a
//! standalone binary and as a library.
//!
//! The crate bundles the Lockbox schema history — an ordered list of
//! timestamped change-sets, each with a forward operation and either a
//! reverse operation or an explicit forward-only marker — and an engine that
//! applies pending change-sets transactionally, one ledger row per applied
//! change-set, under a cross-process advisory lock.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! lockbox-migrate = { version = "0.0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use lockbox_migrate::config::Settings;
//! use lockbox_migrate::history;
//! use lockbox_migrate::runner::Runner;
//!
//! let mut runner = Runner::open("./data/lockbox.db", history::history(), Settings::default())?;
//! let summary = runner.up(None)?;
//! println!("applied {} change-sets", summary.changesets.len());
//! ```
//!
//! Custom histories work the same way: pass your own `&[ChangeSet]` slice to
//! [`runner::Runner::open`] instead of the bundled one.
//!
//! ## Feature Flags
//!
//! - `cli` (default): Includes the `lockbox-migrate` binary's dependencies.
//!   Disable with `default-features = false`.

pub mod changeset;
pub mod config;
pub mod error;
pub mod history;
pub mod ledger;
pub mod lock;
pub mod runner;
pub mod scripts;
