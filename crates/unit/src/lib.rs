//! # incull-unit
//!
//! Source unit model for include minimization.
//!
//! A *unit* is one parsed source or header file: its body lines, the position
//! of its single contiguous `#include` block, and the directives in that
//! block. This crate owns the directive value type with its ordering rules,
//! the canonicalizer (deterministic sort + dedup with the unit's own
//! counterpart header pinned first), and the serialization used for both
//! trial materialization and final persistence.

mod canon;
mod directive;
mod error;
mod unit;

pub use canon::{canonicalize, primary_for};
pub use directive::{Directive, DirectiveKind, DIRECTIVE_TOKEN};
pub use error::{Result, UnitError};
pub use unit::{SourceUnit, UnitState};
