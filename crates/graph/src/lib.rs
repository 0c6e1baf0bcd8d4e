//! # incull-graph
//!
//! Dependency graph over source units.
//!
//! ```text
//! Project root
//!     │
//!     ├──> File Scanner (suffix allow-list, dotfiles skipped)
//!     │      └─> root-relative unit ids
//!     │
//!     └──> Unit Graph (petgraph arena)
//!            ├─ Nodes: parsed SourceUnits
//!            ├─ Edges: A -> B for every local directive of A resolving to B
//!            └─ Dependents of B: incoming neighbors of B
//! ```
//!
//! Every local directive must resolve to a known unit; an unresolved
//! reference is a fatal configuration error.

mod error;
mod graph;
mod scanner;

pub use error::{GraphError, Result};
pub use graph::UnitGraph;
pub use petgraph::graph::NodeIndex;
pub use scanner::FileScanner;
