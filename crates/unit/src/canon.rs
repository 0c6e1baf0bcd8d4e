use crate::directive::Directive;

/// Derive the unit's own counterpart header name from its file name:
/// `src/widget.cpp` -> `widget.h`.
pub fn primary_for(unit_id: &str) -> String {
    let file = unit_id.rsplit('/').next().unwrap_or(unit_id);
    let stem = file.split('.').next().unwrap_or(file);
    format!("{stem}.h")
}

/// Deterministic order for a directive list: the primary counterpart header
/// pinned first, then the `Directive` comparator; equal entries deduped.
/// Idempotent, and invoked before every materialization so that the oracle
/// and storage only ever see canonical order.
pub fn canonicalize(directives: &mut Vec<Directive>, primary: &str) {
    directives.sort_by(|a, b| {
        let a_primary = a.identifier == primary;
        let b_primary = b.identifier == primary;
        b_primary.cmp(&a_primary).then_with(|| a.cmp(b))
    });
    directives.dedup();
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn primary_derivation() {
        assert_eq!(primary_for("widget.cpp"), "widget.h");
        assert_eq!(primary_for("src/widget.cpp"), "widget.h");
        assert_eq!(primary_for("core.float.cc"), "core.h");
        assert_eq!(primary_for("noext"), "noext.h");
    }

    #[test]
    fn primary_is_pinned_first() {
        let mut list = vec![
            Directive::foreign("map"),
            Directive::local("audio.h"),
            Directive::local("widget.h"),
        ];
        canonicalize(&mut list, "widget.h");
        assert_eq!(
            list,
            vec![
                Directive::local("widget.h"),
                Directive::local("audio.h"),
                Directive::foreign("map"),
            ]
        );
    }

    #[test]
    fn duplicates_are_removed() {
        let mut list = vec![
            Directive::foreign("map"),
            Directive::local("audio.h"),
            Directive::foreign("map"),
        ];
        canonicalize(&mut list, "widget.h");
        assert_eq!(
            list,
            vec![Directive::local("audio.h"), Directive::foreign("map")]
        );
    }

    #[test]
    fn canonicalize_is_idempotent() {
        let mut once = vec![
            Directive::foreign("sys/types.h"),
            Directive::local("b.h"),
            Directive::foreign("map"),
            Directive::local("a.h"),
            Directive::local("a.h"),
        ];
        canonicalize(&mut once, "a.h");
        let mut twice = once.clone();
        canonicalize(&mut twice, "a.h");
        assert_eq!(once, twice);
    }
}
