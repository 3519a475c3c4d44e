pub mod adaptation;
pub mod collector;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod served;

pub use collector::{FeedbackCollector, FeedbackConfig};
pub use error::FeedbackError;
