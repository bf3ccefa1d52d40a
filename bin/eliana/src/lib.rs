mod config;
mod error;
mod report;
mod service;

pub use config::Config;
pub use error::Error;
pub use report::{describe, report};
pub use service::{Node, Readings, Service, WARM_UP_DELAY};

pub type Result<T> = std::result::Result<T, Error>;
