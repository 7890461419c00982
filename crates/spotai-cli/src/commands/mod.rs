pub mod deck;
pub mod init;
pub mod play;
pub mod stats;
