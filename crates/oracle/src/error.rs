use thiserror::Error;

pub type Result<T> = std::result::Result<T, OracleError>;

#[derive(Error, Debug)]
pub enum OracleError {
    /// The build command could not be started at all. Distinct from a normal
    /// compile failure, which is an ordinary `false` verdict.
    #[error("failed to invoke build command {command:?}: {source}")]
    Invocation {
        command: String,
        #[source]
        source: std::io::Error,
    },
}
