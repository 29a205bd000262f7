pub mod job_extraction;

pub use job_extraction::{
    Classification, JobExtraction, JobPostingExtraction, PostingForEnrichment,
    CREATE_EXTRACTIONS_TABLE_SQL,
};
