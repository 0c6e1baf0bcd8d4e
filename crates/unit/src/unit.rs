use crate::canon;
use crate::directive::{is_directive_line, Directive};
use crate::error::{Result, UnitError};
use std::fs;
use std::path::Path;

/// Lifecycle of a unit during an optimization run. The state is only ever
/// advanced by the optimization engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitState {
    Unvisited,
    InProgress,
    Finalized,
}

/// Parsed representation of one source file: body lines, the position of the
/// directive block within the body, and the directives themselves.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    /// Root-relative, '/'-separated path.
    pub id: String,

    /// All non-directive lines, in order.
    pub body: Vec<String>,

    /// Body offset where the directive block is re-inserted on render.
    pub block_pos: Option<usize>,

    /// Canonicalized directive list.
    pub directives: Vec<Directive>,

    pub state: UnitState,
}

impl SourceUnit {
    /// Parse stored content. Exactly one contiguous run of directive lines is
    /// supported; blank lines do not break the run, a second disjoint run is
    /// fatal.
    pub fn parse(id: impl Into<String>, content: &str) -> Result<Self> {
        let id = id.into();
        let mut body = Vec::new();
        let mut directives = Vec::new();
        let mut block_pos = None;
        // 0 = block not seen yet, 1 = inside the block, 2 = past it
        let mut phase = 0u8;

        for (line_no, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                body.push(line.to_string());
            } else if is_directive_line(line) {
                if phase == 2 {
                    return Err(UnitError::SplitDirectiveBlock {
                        unit: id,
                        line: line_no + 1,
                    });
                }
                if phase == 0 {
                    block_pos = Some(body.len());
                    phase = 1;
                }
                directives.push(Directive::parse(line)?);
            } else {
                if phase == 1 {
                    phase = 2;
                }
                body.push(line.to_string());
            }
        }

        let primary = canon::primary_for(&id);
        canon::canonicalize(&mut directives, &primary);

        log::debug!(
            "{id}: {} body lines, {} directives at offset {:?}",
            body.len(),
            directives.len(),
            block_pos
        );

        Ok(Self {
            id,
            body,
            block_pos,
            directives,
            state: UnitState::Unvisited,
        })
    }

    /// The unit's own counterpart header name, pinned first when serialized.
    pub fn primary(&self) -> String {
        canon::primary_for(&self.id)
    }

    /// Sort and dedup the directive list in place.
    pub fn canonicalize(&mut self) {
        let primary = self.primary();
        canon::canonicalize(&mut self.directives, &primary);
    }

    pub fn local_directives(&self) -> impl Iterator<Item = &Directive> {
        self.directives.iter().filter(|d| d.is_local())
    }

    /// Materialize the unit's text with `directives` in place of its block.
    /// Trial and final serialization both go through here.
    pub fn render(&self, directives: &[Directive]) -> String {
        let pos = self.block_pos.unwrap_or(0);
        let mut out = String::new();
        let mut emitted = directives.is_empty();

        for (i, line) in self.body.iter().enumerate() {
            if i == pos && !emitted {
                for d in directives {
                    out.push_str(&d.render());
                    out.push('\n');
                }
                emitted = true;
            }
            out.push_str(line);
            out.push('\n');
        }
        if !emitted {
            for d in directives {
                out.push_str(&d.render());
                out.push('\n');
            }
        }
        out
    }

    /// Write the unit's current in-memory state back to its storage location.
    pub fn persist(&self, root: &Path) -> Result<()> {
        fs::write(root.join(&self.id), self.render(&self.directives))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const WIDGET: &str = "\
// widget impl

#include \"widget.h\"
#include <map>

#include \"util.h\"

int widget() { return 1; }
";

    #[test]
    fn parses_block_position_and_directives() {
        let unit = SourceUnit::parse("widget.cpp", WIDGET).unwrap();
        // comment line + blank line precede the block
        assert_eq!(unit.block_pos, Some(2));
        assert_eq!(
            unit.directives,
            vec![
                Directive::local("widget.h"),
                Directive::local("util.h"),
                Directive::foreign("map"),
            ]
        );
        assert_eq!(unit.state, UnitState::Unvisited);
        // blank line inside the block stays in the body
        assert_eq!(unit.body.len(), 5);
    }

    #[test]
    fn blank_lines_do_not_split_the_block() {
        let content = "#include <map>\n\n\n#include <set>\nint x;\n";
        let unit = SourceUnit::parse("a.cpp", content).unwrap();
        assert_eq!(unit.directives.len(), 2);
    }

    #[test]
    fn disjoint_blocks_are_fatal() {
        let content = "#include <map>\nint x;\n#include <set>\n";
        let err = SourceUnit::parse("a.cpp", content).unwrap_err();
        assert!(matches!(
            err,
            UnitError::SplitDirectiveBlock { line: 3, .. }
        ));
    }

    #[test]
    fn malformed_directive_is_fatal() {
        let err = SourceUnit::parse("a.cpp", "#include oops\n").unwrap_err();
        assert!(matches!(err, UnitError::MalformedDirective { .. }));
    }

    #[test]
    fn render_inserts_block_at_original_position() {
        let unit = SourceUnit::parse("widget.cpp", WIDGET).unwrap();
        let rendered = unit.render(&unit.directives);
        assert_eq!(
            rendered,
            "\
// widget impl

#include \"widget.h\"
#include \"util.h\"
#include <map>


int widget() { return 1; }
"
        );
        // rendering is stable under re-parsing
        let again = SourceUnit::parse("widget.cpp", &rendered).unwrap();
        assert_eq!(again.directives, unit.directives);
        assert_eq!(again.render(&again.directives), rendered);
    }

    #[test]
    fn render_with_empty_list_drops_the_block() {
        let unit = SourceUnit::parse("a.cpp", "#include <map>\nint x;\n").unwrap();
        assert_eq!(unit.render(&[]), "int x;\n");
    }

    #[test]
    fn unit_without_block_renders_unchanged() {
        let unit = SourceUnit::parse("a.cpp", "int x;\nint y;\n").unwrap();
        assert_eq!(unit.block_pos, None);
        assert_eq!(unit.render(&unit.directives), "int x;\nint y;\n");
    }

    #[test]
    fn persist_writes_through() {
        let temp = tempfile::tempdir().unwrap();
        let unit = SourceUnit::parse("widget.cpp", WIDGET).unwrap();
        unit.persist(temp.path()).unwrap();
        let on_disk = std::fs::read_to_string(temp.path().join("widget.cpp")).unwrap();
        assert_eq!(on_disk, unit.render(&unit.directives));
    }
}
