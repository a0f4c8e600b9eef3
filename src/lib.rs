// Declare all our modules
pub mod audit;
mod error;
mod extractor;
mod models;
pub mod page;
pub mod parsers;
mod sink;

// Publicly export the parts of our library that users will need
pub use audit::{
    DescriptionAudit, EmailIssue, EmailIssueKind, audit_email, audit_record_emails,
    classify_description, clean_records,
};
pub use error::{ExtractError, Result};
pub use extractor::{
    DISMISS_SELECTOR, ExperienceExtractor, SEE_DETAILS_SELECTOR, describe_latest_experience,
    extract_latest_experience,
};
pub use models::*;
pub use page::PageHandle;
pub use sink::{FileSink, ProfileSink};
