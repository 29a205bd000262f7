//! Jobs domain activities - entry-point business logic
//!
//! Activities depend on the kernel's Base* traits only, so they run the same
//! against Adzuna and Postgres as against the mocks in tests.

pub mod ingest;
