use std::fmt;

#[derive(Debug)]
pub enum Error {
    PurpleAir(purple_air::Error),
    Json(serde_json::Error),
    SensorMismatch { expected: String, actual: String },
    MissingEnv(&'static str),
    InvalidEnv(&'static str, String),
}

impl From<purple_air::Error> for Error {
    fn from(err: purple_air::Error) -> Self {
        Self::PurpleAir(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PurpleAir(err) => write!(f, "purple air error: {err}"),
            Self::Json(err) => write!(f, "json error: {err}"),
            Self::SensorMismatch { expected, actual } => {
                write!(f, "expected sensor {expected}, got {actual}")
            }
            Self::MissingEnv(name) => write!(f, "set ENV variable {name}"),
            Self::InvalidEnv(name, value) => write!(f, "invalid value of {name}: {value}"),
        }
    }
}

impl std::error::Error for Error {}
