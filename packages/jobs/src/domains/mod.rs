// Business domains
pub mod enrichment;
pub mod jobs;
