//! # incull-engine
//!
//! The optimization core: a depth-first, memoized minimizer over the unit
//! graph that uses the build oracle as ground truth.
//!
//! ```text
//! optimize(unit)
//!     │
//!     ├─ Finalized?  done        InProgress?  fatal cycle
//!     ├─ baseline compile check (a unit that never compiled cannot be culled)
//!     ├─ recurse into local dependencies (post-order)
//!     ├─ canonicalize, then left-to-right per directive:
//!     │      remove ──> splice (local only) ──> keep
//!     │      each accepted removal/splice is pushed onto all dependents
//!     └─ re-verify, persist, Finalized
//! ```
//!
//! Strictly single-threaded and synchronous: every trial overwrites the unit
//! on disk before the oracle runs, so trials are inherently sequential.

mod engine;
mod error;
mod policy;
mod stats;

pub use engine::Optimizer;
pub use error::{EngineError, Result};
pub use policy::KeepPolicy;
pub use stats::CullStats;
