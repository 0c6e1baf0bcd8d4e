use crate::error::{EngineError, Result};
use crate::policy::KeepPolicy;
use crate::stats::CullStats;
use incull_graph::{GraphError, NodeIndex, UnitGraph};
use incull_oracle::BuildOracle;
use incull_unit::{canonicalize, Directive, UnitState};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

/// Depth-first, memoized minimizer. Children are reduced to their own fixed
/// point before the parent begins, and every accepted removal or splice is
/// pushed onto the unit's dependents so they stay compilable.
pub struct Optimizer<O: BuildOracle> {
    graph: UnitGraph,
    oracle: O,
    root: PathBuf,
    keep: KeepPolicy,
    stats: CullStats,
}

impl<O: BuildOracle> Optimizer<O> {
    pub fn new(graph: UnitGraph, oracle: O, root: impl Into<PathBuf>, keep: KeepPolicy) -> Self {
        Self {
            graph,
            oracle,
            root: root.into(),
            keep,
            stats: CullStats::new(),
        }
    }

    /// Optimize every unit in the graph, consuming the optimizer. Any fatal
    /// condition aborts the run, leaving the tree in its last-written trial
    /// state.
    pub fn run(mut self) -> Result<(UnitGraph, CullStats)> {
        let start = Instant::now();

        log::info!("verifying baseline for {} units", self.graph.unit_count());
        self.verify_baseline()?;

        for idx in self.graph.node_indices() {
            self.optimize(idx)?;
        }

        self.stats.time_ms = start.elapsed().as_millis() as u64;
        log::info!(
            "run complete: {} units, {} removed, {} spliced, {} trials",
            self.stats.units,
            self.stats.removed,
            self.stats.spliced,
            self.stats.trials
        );
        Ok((self.graph, self.stats))
    }

    /// Every unit must compile with its untouched directive set before any
    /// optimization starts. This is also the baseline write: storage holds
    /// the canonical ordering from here on.
    fn verify_baseline(&mut self) -> Result<()> {
        for idx in self.graph.node_indices() {
            let current = self.graph.unit(idx).directives.clone();
            if !self.trial(idx, &current)? {
                return Err(EngineError::BaselineFailed {
                    unit: self.graph.unit(idx).id.clone(),
                });
            }
        }
        Ok(())
    }

    fn optimize(&mut self, idx: NodeIndex) -> Result<()> {
        match self.graph.unit(idx).state {
            UnitState::Finalized => return Ok(()),
            UnitState::InProgress => {
                return Err(EngineError::Cycle {
                    unit: self.graph.unit(idx).id.clone(),
                });
            }
            UnitState::Unvisited => {}
        }

        let id = self.graph.unit(idx).id.clone();
        log::info!("optimizing {id}");

        // A unit that never compiled cannot be minimized.
        let current = self.graph.unit(idx).directives.clone();
        if !self.trial(idx, &current)? {
            return Err(EngineError::BaselineFailed { unit: id });
        }

        self.graph.unit_mut(idx).state = UnitState::InProgress;

        // Children first: each local dependency reaches its own fixed point
        // before this unit is examined.
        for d in current.iter().filter(|d| d.is_local()) {
            let child = self.resolve_required(idx, d)?;
            self.optimize(child)?;
        }

        self.graph.unit_mut(idx).canonicalize();
        let mut working = self.graph.unit(idx).directives.clone();

        let mut i = 0;
        while i < working.len() {
            let d = working[i].clone();

            if self.protected(idx, &d) {
                log::debug!("{id}: keeping {} (do-not-touch)", d.identifier);
                self.stats.kept += 1;
                i += 1;
                continue;
            }

            // Remove
            let mut candidate = working.clone();
            candidate.remove(i);
            if self.trial(idx, &candidate)? {
                // a splice can leave an equal entry behind; dropping that
                // copy is dedup, not a removal the dependents must absorb
                let duplicate = candidate.contains(&d);
                working = candidate;
                self.commit(idx, &working);
                if duplicate {
                    log::debug!("{id}: dropped duplicate {}", d.identifier);
                } else {
                    log::debug!("{id}: removed {}", d.identifier);
                    self.propagate(idx, &d)?;
                    self.stats.removed += 1;
                }
                // the list shrank; index i now holds the next entry
                continue;
            }

            // Splice: replace a local directive with its target's own
            // finalized list, flattening one level of indirection.
            if d.is_local() {
                let child = self.resolve_required(idx, &d)?;
                let spliced = self.reanchored_directives(child)?;
                let mut candidate = working.clone();
                candidate.remove(i);
                for (k, nd) in spliced.into_iter().enumerate() {
                    candidate.insert(i + k, nd);
                }
                if self.trial(idx, &candidate)? {
                    log::debug!("{id}: spliced {}", d.identifier);
                    working = candidate;
                    self.commit(idx, &working);
                    self.propagate(idx, &d)?;
                    self.stats.spliced += 1;
                    // re-examine from the spliced-in entries
                    continue;
                }
            }

            self.stats.kept += 1;
            i += 1;
        }

        // Defensive re-confirmation of the final set before it sticks.
        self.graph.unit_mut(idx).canonicalize();
        let fin = self.graph.unit(idx).directives.clone();
        if !self.trial(idx, &fin)? {
            return Err(EngineError::ReverifyFailed { unit: id });
        }
        self.persist(idx)?;

        self.graph.unit_mut(idx).state = UnitState::Finalized;
        self.stats.units += 1;
        Ok(())
    }

    /// Materialize `candidate` at the unit's storage location (the oracle
    /// reads from disk, not memory) and ask the oracle for a verdict.
    fn trial(&mut self, idx: NodeIndex, candidate: &[Directive]) -> Result<bool> {
        let (id, ordered, content) = {
            let unit = self.graph.unit(idx);
            let mut ordered = candidate.to_vec();
            canonicalize(&mut ordered, &unit.primary());
            let content = unit.render(&ordered);
            (unit.id.clone(), ordered, content)
        };
        fs::write(self.root.join(&id), content)?;
        self.stats.trials += 1;
        Ok(self.oracle.try_compile(&id, &ordered)?)
    }

    /// Removal contract: every currently-known dependent must carry `d`
    /// itself immediately, or it could lose the effect it was obtaining
    /// transitively through this unit.
    fn propagate(&mut self, idx: NodeIndex, d: &Directive) -> Result<()> {
        let d = self.reanchor(idx, d)?;

        for dep in self.graph.dependents(idx) {
            let (present, state, dep_id) = {
                let unit = self.graph.unit(dep);
                (unit.directives.contains(&d), unit.state, unit.id.clone())
            };
            if present {
                continue;
            }

            self.graph.unit_mut(dep).directives.push(d.clone());
            log::debug!("propagated {} to {dep_id}", d.identifier);

            if state == UnitState::Finalized {
                // Post-order traversal should make this unreachable, but a
                // Finalized dependent has already been persisted and will
                // never be revisited: write the appended directive through
                // instead of dropping it.
                log::warn!(
                    "{dep_id} was already finalized when {} propagated into it; re-persisting",
                    d.identifier
                );
                self.graph.unit_mut(dep).canonicalize();
                self.persist(dep)?;
            }
        }
        Ok(())
    }

    /// A local directive's text is written relative to the unit that holds
    /// it. Before it moves into another unit (splice or propagation), rewrite
    /// it as the target's root-relative id so any holder can resolve it.
    fn reanchor(&self, from: NodeIndex, d: &Directive) -> Result<Directive> {
        if !d.is_local() {
            return Ok(d.clone());
        }
        let target = self.resolve_required(from, d)?;
        Ok(Directive::local(self.graph.unit(target).id.clone()))
    }

    fn reanchored_directives(&self, child: NodeIndex) -> Result<Vec<Directive>> {
        self.graph
            .unit(child)
            .directives
            .clone()
            .iter()
            .map(|d| self.reanchor(child, d))
            .collect()
    }

    fn resolve_required(&self, idx: NodeIndex, d: &Directive) -> Result<NodeIndex> {
        let unit = self.graph.unit(idx);
        self.graph
            .resolve(&unit.id, &d.identifier)
            .ok_or_else(|| {
                GraphError::UnresolvedLocal {
                    unit: unit.id.clone(),
                    directive: d.identifier.clone(),
                }
                .into()
            })
    }

    fn protected(&self, idx: NodeIndex, d: &Directive) -> bool {
        if self.keep.matches(&d.identifier) {
            return true;
        }
        if d.is_local() {
            if let Some(target) = self.graph.resolve(&self.graph.unit(idx).id, &d.identifier) {
                return self.keep.matches(&self.graph.unit(target).id);
            }
        }
        false
    }

    fn commit(&mut self, idx: NodeIndex, directives: &[Directive]) {
        self.graph.unit_mut(idx).directives = directives.to_vec();
    }

    fn persist(&self, idx: NodeIndex) -> Result<()> {
        let unit = self.graph.unit(idx);
        log::debug!("persisting {}", unit.id);
        unit.persist(&self.root)?;
        Ok(())
    }
}
