//! Tally server: receives a text payload over UDP, replies with word,
//! character and per-character frequency counts.

pub mod config;
pub mod report;
pub mod serve;
pub mod stats;

pub use config::ServerConfig;
pub use report::Report;
