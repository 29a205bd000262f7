//! Enrichment domain activities

pub mod enrich;
