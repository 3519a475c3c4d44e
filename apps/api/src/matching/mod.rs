pub mod error;
pub mod handlers;
pub mod index;
pub mod jobs;
pub mod profiles;
pub mod ranking;
pub mod reasons;
pub mod scoring;
pub mod signature;
pub mod suggestions;
pub mod types;
pub mod weights;

#[cfg(test)]
pub(crate) mod test_support;
