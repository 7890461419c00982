pub mod config;
pub mod deck;
pub mod error;
pub mod session;
pub mod stats;
pub mod store;

// Re-export common error type
pub use error::SpotaiError;
