use incull_unit::UnitError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{unit}: {source}")]
    Parse {
        unit: String,
        #[source]
        source: UnitError,
    },

    #[error("duplicate unit id: {0}")]
    DuplicateUnit(String),

    #[error("{unit}: local directive {directive:?} does not resolve to any known unit")]
    UnresolvedLocal { unit: String, directive: String },
}
