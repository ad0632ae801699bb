pub mod config;

pub use config::{Config, LastAnswers, WatchConfig};
