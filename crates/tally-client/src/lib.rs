//! Tally client: sends a file's contents to a tally server over UDP and
//! prints the statistics report it sends back.

pub mod config;
pub mod error;
pub mod exchange;
pub mod menu;

pub use config::ClientConfig;
pub use error::ClientError;
pub use exchange::{exchange, send_file};
pub use menu::{MenuExit, run_menu};
