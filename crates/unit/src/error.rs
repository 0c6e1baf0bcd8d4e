use thiserror::Error;

pub type Result<T> = std::result::Result<T, UnitError>;

#[derive(Error, Debug)]
pub enum UnitError {
    #[error("malformed directive line: {line:?}")]
    MalformedDirective { line: String },

    #[error("{unit}: directive block is not contiguous (second block starts at line {line})")]
    SplitDirectiveBlock { unit: String, line: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
