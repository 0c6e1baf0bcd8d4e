use crate::error::{GraphError, Result};
use crate::scanner::FileScanner;
use incull_unit::SourceUnit;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Arena of parsed units plus the local-dependency edges between them.
///
/// The graph exclusively owns all units for the run's duration; everything
/// else addresses them by `NodeIndex`, so cycle detection is a state check
/// and no live references are invalidated by mutation.
#[derive(Debug)]
pub struct UnitGraph {
    graph: DiGraph<SourceUnit, ()>,
    index: HashMap<String, NodeIndex>,
}

impl UnitGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            index: HashMap::new(),
        }
    }

    /// Scan `root`, parse every discovered unit and link local edges.
    pub fn load(root: &Path) -> Result<Self> {
        let scanner = FileScanner::new(root);
        let mut this = Self::new();

        for id in scanner.scan() {
            let content = fs::read_to_string(root.join(&id))?;
            let unit = SourceUnit::parse(id.clone(), &content)
                .map_err(|source| GraphError::Parse { unit: id, source })?;
            this.add_unit(unit)?;
        }

        this.link()?;
        Ok(this)
    }

    pub fn add_unit(&mut self, unit: SourceUnit) -> Result<NodeIndex> {
        if self.index.contains_key(&unit.id) {
            return Err(GraphError::DuplicateUnit(unit.id));
        }
        let id = unit.id.clone();
        let idx = self.graph.add_node(unit);
        self.index.insert(id, idx);
        Ok(idx)
    }

    /// Resolve every local directive and record the dependency edges, built
    /// once after all units are parsed. Dependents fall out as incoming
    /// neighbors.
    pub fn link(&mut self) -> Result<()> {
        let mut edges = Vec::new();
        for idx in self.graph.node_indices() {
            let unit = &self.graph[idx];
            for d in unit.local_directives() {
                let target = self.resolve(&unit.id, &d.identifier).ok_or_else(|| {
                    GraphError::UnresolvedLocal {
                        unit: unit.id.clone(),
                        directive: d.identifier.clone(),
                    }
                })?;
                edges.push((idx, target));
            }
        }
        for (a, b) in edges {
            if self.graph.find_edge(a, b).is_none() {
                self.graph.add_edge(a, b, ());
            }
        }
        log::info!(
            "Linked unit graph: {} units, {} edges",
            self.graph.node_count(),
            self.graph.edge_count()
        );
        Ok(())
    }

    /// Two-step local resolution: strip leading up-level segments by walking
    /// the referencing unit's directory upward, resolve the remainder there,
    /// then fall back to looking the remainder up at the project root.
    /// Stripping past the root collapses both steps into the root lookup.
    pub fn resolve(&self, from: &str, identifier: &str) -> Option<NodeIndex> {
        let mut dir: Vec<&str> = from.split('/').collect();
        dir.pop(); // the referencing file itself

        let mut rest = identifier;
        while let Some(stripped) = rest.strip_prefix("../") {
            rest = stripped;
            if dir.pop().is_none() {
                break;
            }
        }

        if !dir.is_empty() {
            let candidate = format!("{}/{}", dir.join("/"), rest);
            if let Some(&idx) = self.index.get(&candidate) {
                return Some(idx);
            }
        }

        self.index.get(rest).copied()
    }

    pub fn get(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    pub fn unit(&self, idx: NodeIndex) -> &SourceUnit {
        &self.graph[idx]
    }

    pub fn unit_mut(&mut self, idx: NodeIndex) -> &mut SourceUnit {
        &mut self.graph[idx]
    }

    /// Units that hold a local directive resolving to `idx`. Non-owning
    /// back-references, used only for propagation lookups.
    pub fn dependents(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.graph
            .neighbors_directed(idx, Direction::Incoming)
            .collect()
    }

    /// All node indices in insertion (scan) order.
    pub fn node_indices(&self) -> Vec<NodeIndex> {
        self.graph.node_indices().collect()
    }

    pub fn unit_count(&self) -> usize {
        self.graph.node_count()
    }
}

impl Default for UnitGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn write(root: &Path, id: &str, content: &str) {
        let path = root.join(id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn loads_and_links_a_flat_project() {
        let temp = tempdir().unwrap();
        write(temp.path(), "util.h", "int util();\n");
        write(
            temp.path(),
            "app.cpp",
            "#include \"util.h\"\nint main() { return util(); }\n",
        );

        let graph = UnitGraph::load(temp.path()).unwrap();
        assert_eq!(graph.unit_count(), 2);

        let app = graph.get("app.cpp").unwrap();
        let util = graph.get("util.h").unwrap();
        assert_eq!(graph.dependents(util), vec![app]);
        assert!(graph.dependents(app).is_empty());
    }

    #[test]
    fn resolves_relative_to_the_referencing_directory() {
        let temp = tempdir().unwrap();
        write(temp.path(), "src/gfx/draw.h", "");
        write(
            temp.path(),
            "src/gfx/draw.cpp",
            "#include \"draw.h\"\nint d;\n",
        );

        let graph = UnitGraph::load(temp.path()).unwrap();
        let from = "src/gfx/draw.cpp";
        let target = graph.resolve(from, "draw.h").unwrap();
        assert_eq!(graph.unit(target).id, "src/gfx/draw.h");
    }

    #[test]
    fn walks_up_level_segments() {
        let temp = tempdir().unwrap();
        write(temp.path(), "util/os.h", "");
        write(
            temp.path(),
            "src/app.cpp",
            "#include \"../util/os.h\"\nint m;\n",
        );

        let graph = UnitGraph::load(temp.path()).unwrap();
        let target = graph.resolve("src/app.cpp", "../util/os.h").unwrap();
        assert_eq!(graph.unit(target).id, "util/os.h");
    }

    #[test]
    fn up_levels_past_the_root_resolve_at_the_root() {
        let temp = tempdir().unwrap();
        write(temp.path(), "util/os.h", "");
        write(
            temp.path(),
            "src/app.cpp",
            "#include \"../../util/os.h\"\nint m;\n",
        );

        // one level too many; the remainder still names a root-relative unit
        let graph = UnitGraph::load(temp.path()).unwrap();
        let target = graph.resolve("src/app.cpp", "../../util/os.h").unwrap();
        assert_eq!(graph.unit(target).id, "util/os.h");
    }

    #[test]
    fn falls_back_to_project_root() {
        let temp = tempdir().unwrap();
        write(temp.path(), "util/os.h", "");
        write(
            temp.path(),
            "src/app.cpp",
            "#include \"util/os.h\"\nint m;\n",
        );

        let graph = UnitGraph::load(temp.path()).unwrap();
        let target = graph.resolve("src/app.cpp", "util/os.h").unwrap();
        assert_eq!(graph.unit(target).id, "util/os.h");
    }

    #[test]
    fn unresolved_local_reference_is_fatal() {
        let temp = tempdir().unwrap();
        write(temp.path(), "app.cpp", "#include \"ghost.h\"\nint m;\n");

        let err = UnitGraph::load(temp.path()).unwrap_err();
        assert!(matches!(
            err,
            GraphError::UnresolvedLocal { ref unit, ref directive }
                if unit == "app.cpp" && directive == "ghost.h"
        ));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut graph = UnitGraph::new();
        let unit = SourceUnit::parse("a.h", "").unwrap();
        graph.add_unit(unit.clone()).unwrap();
        let err = graph.add_unit(unit).unwrap_err();
        assert!(matches!(err, GraphError::DuplicateUnit(id) if id == "a.h"));
    }

    #[test]
    fn parse_errors_carry_the_unit_id() {
        let temp = tempdir().unwrap();
        write(temp.path(), "bad.cpp", "#include nope\n");

        let err = UnitGraph::load(temp.path()).unwrap_err();
        assert!(err.to_string().starts_with("bad.cpp:"));
    }
}
