pub mod aqi;

mod client;
mod error;
mod payload;

pub use aqi::{calc_aqi, calc_aqi_by_key, calc_epa_conversion, Category};
pub use client::{local_url, Client, SensorApi};
pub use error::Error;
pub use payload::{Field, Reading, SensorPayload};

pub type Result<T> = std::result::Result<T, Error>;
