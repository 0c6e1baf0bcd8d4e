use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("dependency cycle detected at {unit}")]
    Cycle { unit: String },

    #[error("{unit} does not compile with its current directive set")]
    BaselineFailed { unit: String },

    #[error("{unit} failed re-verification after minimization")]
    ReverifyFailed { unit: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Graph(#[from] incull_graph::GraphError),

    #[error("{0}")]
    Oracle(#[from] incull_oracle::OracleError),

    #[error("{0}")]
    Unit(#[from] incull_unit::UnitError),
}
