//! Sources of answers from the system under evaluation

pub mod http;
pub mod recorded;
pub mod traits;

pub use http::{extract_answer, HttpResponder};
pub use recorded::RecordedResponses;
pub use traits::{clean_response, ResponseSource, SourceError, SourceResult};
