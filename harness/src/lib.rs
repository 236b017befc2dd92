//! Scenario harness for the PetFriends API.
//!
//! # Overview
//! Each scenario follows the same steps: acquire an auth key, optionally
//! seed state, run the operation under test, assert on status and body, and
//! optionally re-query to confirm the state change. This crate supplies the
//! pieces those steps share:
//!
//! - [`HarnessConfig`]: credentials and base URL, injected or read from the
//!   environment instead of baked into test bodies.
//! - [`Session`]: an authenticated client plus helpers for listing and
//!   seeding pets.
//! - [`DisposablePet`]: a pet created at setup and deleted on drop, so
//!   scenarios do not depend on what the account already owns.
//! - [`fixture_path`]: resolves the image fixtures under `tests/`.
//!
//! The scenarios themselves live in `tests/`.

pub mod config;
pub mod error;
pub mod fixtures;
pub mod session;

pub use config::HarnessConfig;
pub use error::HarnessError;
pub use fixtures::{fixture_path, CAT_JPG, CAT_PNG, CAT_TIFF};
pub use session::{expect_ok, DisposablePet, Session};
