//! Shared test utilities for the wiki repository workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`repo`] — [`TestRepository`](repo::TestRepository) builder for base/shadow trees
//! - [`fixtures`] — checked-in repository trees under `test-fixtures/repos`

pub mod fixtures;
pub mod repo;

pub use repo::TestRepository;
