//! Validation engine

use crate::checks;
use crate::issue::{ValidationIssue, ValidationReport};
use ecb_reflect::TypeRegistry;
use ecb_scene::{NodeId, SceneError, SceneGraph, Traversal, Visit, Visitor};

/// Runs the checks as a traversal visitor
#[derive(Debug, Clone, Copy)]
pub struct ValidationEngine<'r> {
    registry: &'r TypeRegistry,
    traversal: Traversal,
}

struct Collector<'r> {
    registry: &'r TypeRegistry,
    findings: Vec<ValidationIssue>,
}

impl Visitor for Collector<'_> {
    fn visit(&mut self, visit: Visit<'_>) {
        checks::check_node(visit, self.registry, &mut self.findings);
    }
}

impl<'r> ValidationEngine<'r> {
    #[inline]
    #[must_use]
    pub fn new(registry: &'r TypeRegistry, max_depth: usize) -> Self {
        Self {
            registry,
            traversal: Traversal::new(max_depth),
        }
    }

    /// Validate every registered root, plus the detached-root check
    pub fn validate(&self, graph: &SceneGraph) -> Result<ValidationReport, SceneError> {
        let mut collector = self.collector();
        let stats = self.traversal.walk(graph, &mut collector)?;
        checks::detached_roots(graph, &mut collector.findings);
        Ok(self.finish(stats.visited, collector))
    }

    /// Validate the subtree rooted at `start`
    pub fn validate_subtree(&self, graph: &SceneGraph, start: NodeId) -> Result<ValidationReport, SceneError> {
        let mut collector = self.collector();
        let stats = self.traversal.walk_from(graph, start, &mut collector)?;
        Ok(self.finish(stats.visited, collector))
    }

    fn collector(&self) -> Collector<'r> {
        Collector {
            registry: self.registry,
            findings: Vec::new(),
        }
    }

    fn finish(&self, visited: usize, collector: Collector<'_>) -> ValidationReport {
        let report = ValidationReport::from_findings(visited, collector.findings);
        tracing::debug!(
            visited,
            issues = report.issues.len(),
            warnings = report.warnings.len(),
            valid = report.valid,
            "validation finished"
        );
        report
    }
}
