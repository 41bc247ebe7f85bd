//! Type definitions module
//!
//! Request and feedback types shared by the retrieval and generation sides.

pub mod feedback;
pub mod request;

// Re-export commonly used types
pub use feedback::{FeedbackOutput, Scores};
pub use request::{non_blank, RetrievalRequest};
