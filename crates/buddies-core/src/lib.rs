pub mod clock;
pub mod client;
pub mod config;
pub mod constants;
pub mod digest;
pub mod error;
pub mod fanout;
pub mod io;
pub mod mailer;
pub mod parser;
pub mod paths;
pub mod profile;
pub mod progress;
pub mod status;
pub mod step;
pub mod types;
pub mod voter;

pub use error::{BuddiesError, Result};
