use crate::error::{Result, UnitError};
use std::cmp::Ordering;

/// Token opening every directive line.
pub const DIRECTIVE_TOKEN: &str = "#include";

/// Whether a dependency reference points inside or outside the project graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DirectiveKind {
    /// `"header.h"`: references another unit inside the project.
    Local,

    /// `<header>`: references something outside the graph, assumed always
    /// available and never recursed into.
    Foreign,
}

/// One dependency directive: the reference kind and the identifier between
/// the delimiters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Directive {
    pub kind: DirectiveKind,
    pub identifier: String,
}

impl Directive {
    pub fn local(identifier: impl Into<String>) -> Self {
        Self {
            kind: DirectiveKind::Local,
            identifier: identifier.into(),
        }
    }

    pub fn foreign(identifier: impl Into<String>) -> Self {
        Self {
            kind: DirectiveKind::Foreign,
            identifier: identifier.into(),
        }
    }

    /// Parse one directive line. The identifier must be delimited by angle
    /// brackets (foreign) or double quotes (local); anything else is fatal.
    pub fn parse(line: &str) -> Result<Self> {
        let malformed = || UnitError::MalformedDirective {
            line: line.to_string(),
        };

        let rest = line.strip_prefix(DIRECTIVE_TOKEN).ok_or_else(malformed)?;
        let rest = rest.trim_start();

        let (kind, close) = match rest.chars().next() {
            Some('<') => (DirectiveKind::Foreign, '>'),
            Some('"') => (DirectiveKind::Local, '"'),
            _ => return Err(malformed()),
        };

        let inner = &rest[1..];
        let end = inner.find(close).ok_or_else(malformed)?;
        let identifier = &inner[..end];
        if identifier.is_empty() {
            return Err(malformed());
        }

        Ok(Self {
            kind,
            identifier: identifier.to_string(),
        })
    }

    /// Render back to its source-text form.
    pub fn render(&self) -> String {
        match self.kind {
            DirectiveKind::Local => format!("{DIRECTIVE_TOKEN} \"{}\"", self.identifier),
            DirectiveKind::Foreign => format!("{DIRECTIVE_TOKEN} <{}>", self.identifier),
        }
    }

    pub fn is_local(&self) -> bool {
        self.kind == DirectiveKind::Local
    }
}

/// Lines that open with the directive token followed by a delimiter (or
/// whitespace before it) belong to the directive block.
pub(crate) fn is_directive_line(line: &str) -> bool {
    line.strip_prefix(DIRECTIVE_TOKEN)
        .is_some_and(|rest| rest.starts_with([' ', '\t', '<', '"']))
}

fn segment_separators(identifier: &str) -> usize {
    identifier.bytes().filter(|b| *b == b'.').count()
}

impl Ord for Directive {
    /// Local before Foreign; within a kind, fewer segment separators first;
    /// ties broken lexicographically.
    fn cmp(&self, other: &Self) -> Ordering {
        self.kind
            .cmp(&other.kind)
            .then_with(|| {
                segment_separators(&self.identifier).cmp(&segment_separators(&other.identifier))
            })
            .then_with(|| self.identifier.cmp(&other.identifier))
    }
}

impl PartialOrd for Directive {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
