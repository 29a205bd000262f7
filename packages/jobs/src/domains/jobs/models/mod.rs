pub mod adzuna_job;

pub use adzuna_job::{AdzunaJob, AdzunaJobRow, CREATE_TABLE_SQL, INSERT_SQL};
