/// Command-line parsing and command orchestration
pub mod cli;
/// Analysis constants and runtime defaults
pub mod configuration;
/// Error types and helpers
pub mod error;
/// Progress display for long lag passes
pub mod progress;
/// CSV table loading and saving
pub mod table;
