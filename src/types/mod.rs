//! Core data types: the raw upstream payload and the normalized output
//! contract.

mod raw;
mod record;

pub use raw::RawVideoInfo;
pub use record::{AuthorInfo, Description, NormalizedRecord, RelatedItem};
