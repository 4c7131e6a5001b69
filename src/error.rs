//! Startup errors
//!
//! Nothing inside a tick returns an error; these only surface while loading
//! settings and assembling the prototype catalog.

use thiserror::Error;

use crate::catalog::ModelName;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("failed to read settings from {path}: {source}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings JSON: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    InvalidSettings(&'static str),

    #[error("prototype {0:?} is missing from the catalog")]
    MissingPrototype(ModelName),

    #[error("catalog has no {0} prototypes")]
    EmptyCatalog(&'static str),

    #[error("prototype {0:?} has no vertices")]
    EmptyPrototype(ModelName),
}

pub type Result<T> = std::result::Result<T, SimError>;
