use globset::{Glob, GlobSet, GlobSetBuilder};

/// Do-not-touch predicate: a directive whose identifier matches any
/// configured pattern is never a removal or splice candidate and is kept
/// verbatim wherever it appears.
#[derive(Debug, Clone, Default)]
pub struct KeepPolicy {
    set: Option<GlobSet>,
}

impl KeepPolicy {
    pub fn new(patterns: &[String]) -> std::result::Result<Self, globset::Error> {
        if patterns.is_empty() {
            return Ok(Self::default());
        }
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            builder.add(Glob::new(pattern)?);
        }
        Ok(Self {
            set: Some(builder.build()?),
        })
    }

    pub fn matches(&self, identifier: &str) -> bool {
        self.set.as_ref().is_some_and(|set| set.is_match(identifier))
    }
}
