//! Day/night shift roster for a 31-day period.
//!
//! [`roster::RosterStore`] owns employees, per-day preferences, slot
//! capacities and the schedule grid. [`schedule::generate_schedule`] fills the
//! grid in two passes: exact preferences first, then a greedy load-balanced
//! backfill. The remaining modules are the outer surfaces: JSON persistence,
//! CSV/text output, configuration and an HTTP API.

pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod roster;
pub mod schedule;
pub mod storage;
pub mod web;

pub use error::{Result, RosterError};
pub use roster::RosterStore;
