// src/config/tree.rs
use std::collections::{BTreeMap, HashSet};
use petgraph::algo::is_cyclic_directed;
use petgraph::graphmap::DiGraphMap;
use petgraph::visit::Dfs;

pub const ROOT_NODE: &str = "start";

/// Where a decision option leads. Exactly one target per option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionTarget {
    Next(String),
    Workflow(String),
    Result(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionOption {
    pub text: String,
    pub target: OptionTarget,
}

impl DecisionOption {
    pub fn next(text: &str, node: &str) -> Self {
        Self { text: text.to_string(), target: OptionTarget::Next(node.to_string()) }
    }

    pub fn workflow(text: &str, key: &str) -> Self {
        Self { text: text.to_string(), target: OptionTarget::Workflow(key.to_string()) }
    }

    pub fn result(text: &str, title: &str) -> Self {
        Self { text: text.to_string(), target: OptionTarget::Result(title.to_string()) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionNode {
    pub question: String,
    pub options: Vec<DecisionOption>,
}

#[derive(Debug, Clone, Default)]
pub struct DecisionTree {
    nodes: BTreeMap<String, DecisionNode>,
}

/// Structural problems found by [`DecisionTree::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeReport {
    /// (from node, missing target) pairs.
    pub dangling: Vec<(String, String)>,
    pub unreachable: Vec<String>,
    pub has_cycle: bool,
}

impl TreeReport {
    pub fn is_clean(&self) -> bool {
        self.dangling.is_empty() && self.unreachable.is_empty() && !self.has_cycle
    }
}

impl DecisionTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: &str, question: &str, options: Vec<DecisionOption>) {
        self.nodes.insert(
            id.to_string(),
            DecisionNode { question: question.to_string(), options },
        );
    }

    pub fn node(&self, id: &str) -> Option<&DecisionNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn validate(&self) -> TreeReport {
        let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
        let mut report = TreeReport::default();

        for id in self.nodes.keys() {
            graph.add_node(id.as_str());
        }

        for (id, node) in &self.nodes {
            for option in &node.options {
                if let OptionTarget::Next(next) = &option.target {
                    if self.nodes.contains_key(next) {
                        graph.add_edge(id.as_str(), next.as_str(), ());
                    } else {
                        report.dangling.push((id.clone(), next.clone()));
                    }
                }
            }
        }

        report.has_cycle = is_cyclic_directed(&graph);

        let mut reached = HashSet::new();
        if graph.contains_node(ROOT_NODE) {
            let mut dfs = Dfs::new(&graph, ROOT_NODE);
            while let Some(id) = dfs.next(&graph) {
                reached.insert(id);
            }
        }
        report.unreachable = self.nodes.keys()
            .filter(|id| !reached.contains(id.as_str()))
            .cloned()
            .collect();

        report
    }
}
