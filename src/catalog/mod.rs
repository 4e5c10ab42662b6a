// src/catalog/mod.rs
use std::collections::BTreeMap;
use tracing::warn;
use crate::config::{DecisionTree, GuidedWorkflow, TestDefinition, TreeReport};

pub mod builtin;
pub mod resolver;

pub use resolver::{normalize, resolver_for, ExactResolver, FuzzyResolver, TestResolver};

/// Test definitions from the catalog file plus the embedded decision tree
/// and guided workflows.
#[derive(Debug, Clone)]
pub struct Catalog {
    tests: Vec<TestDefinition>,
    tree: DecisionTree,
    workflows: BTreeMap<String, GuidedWorkflow>,
}

impl Catalog {
    /// Catalog with no tests yet; tree and workflows are usable immediately.
    pub fn empty() -> Self {
        Self::with_tests(Vec::new())
    }

    pub fn with_tests(tests: Vec<TestDefinition>) -> Self {
        let tree = builtin::decision_tree();
        report_tree(&tree);
        Self {
            tests,
            tree,
            workflows: builtin::workflows(),
        }
    }

    pub fn tests(&self) -> &[TestDefinition] {
        &self.tests
    }

    pub fn test(&self, index: usize) -> Option<&TestDefinition> {
        self.tests.get(index)
    }

    pub fn replace_tests(&mut self, tests: Vec<TestDefinition>) {
        self.tests = tests;
    }

    pub fn tree(&self) -> &DecisionTree {
        &self.tree
    }

    pub fn workflow(&self, key: &str) -> Option<&GuidedWorkflow> {
        self.workflows.get(key)
    }

    /// Indices of tests whose title contains `term`, ignoring case.
    pub fn filter_titles(&self, term: &str) -> Vec<usize> {
        let term = term.trim().to_lowercase();
        self.tests.iter()
            .enumerate()
            .filter(|(_, test)| term.is_empty() || test.title.to_lowercase().contains(&term))
            .map(|(idx, _)| idx)
            .collect()
    }
}

/// Logs every structural problem in the decision tree. A broken tree still
/// loads; the navigator falls back to the first question on a bad edge.
fn report_tree(tree: &DecisionTree) -> TreeReport {
    let report = tree.validate();
    for (from, target) in &report.dangling {
        warn!(node = %from, target = %target, "decision option points at a missing question");
    }
    for id in &report.unreachable {
        warn!(node = %id, "question cannot be reached from the first question");
    }
    if report.has_cycle {
        warn!("decision tree contains a cycle");
    }
    report
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::config::TestDefinition;

    pub const SAMPLE_CATALOG: &str = include_str!("../../data/catalog.json");

    pub fn sample_tests() -> Vec<TestDefinition> {
        serde_json::from_str(SAMPLE_CATALOG).expect("sample catalog parses")
    }
}
