//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`source`] - Scripted [`Source`](crate::source::Source) implementations:
//!   `StaticSource`, `ScriptedSource`, `FailingSource`, `SlowSource`,
//!   `PanickingSource`.
//! - [`sink`] - `RecordingSink`, an alert sink that keeps what it receives.
//! - [`domain`] - Builders for raw and normalized listings.

pub mod domain;
pub mod sink;
pub mod source;
