pub mod progress;
pub mod response;

pub use progress::{ImportJobProgress, ImportJobState, PollState, ProgressQueryResponse};
pub use response::ImportSubmitResponse;
