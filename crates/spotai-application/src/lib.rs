//! Application layer: async orchestration around the core game session.

pub mod controller;
pub mod event;
pub mod stats_service;
pub mod submission;
pub mod timer;

#[cfg(test)]
mod testing;

pub use controller::GameController;
pub use event::{GameEvent, GameUpdate};
pub use stats_service::StatsService;
pub use submission::{ResultSubmitter, SubmissionReport};
pub use timer::CountdownTimer;
