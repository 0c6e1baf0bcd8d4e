//! # incull-oracle
//!
//! The build oracle: the external authority that decides whether a unit
//! compiles with a given directive set. The production implementation shells
//! out to the real toolchain through a configurable command template; the
//! trait boundary lets tests substitute a deterministic fake.

mod error;
mod oracle;

pub use error::{OracleError, Result};
pub use oracle::{BuildOracle, CommandOracle, DEFAULT_COMPILE_TEMPLATE};
