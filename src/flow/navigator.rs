// src/flow/navigator.rs
use tracing::{debug, warn};
use crate::config::{DecisionNode, DecisionTree, OptionTarget, ROOT_NODE};
use crate::error::GuideError;

/// What choosing an option leads to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    GoTo(String),
    EnterWorkflow(String),
    ShowResult(String),
}

/// Position in the decision tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionNavigator {
    current: String,
}

impl Default for DecisionNavigator {
    fn default() -> Self {
        Self { current: ROOT_NODE.to_string() }
    }
}

impl DecisionNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_id(&self) -> &str {
        &self.current
    }

    pub fn current<'t>(&self, tree: &'t DecisionTree) -> Option<&'t DecisionNode> {
        tree.node(&self.current)
    }

    pub fn at_root(&self) -> bool {
        self.current == ROOT_NODE
    }

    pub fn reset(&mut self) {
        self.current = ROOT_NODE.to_string();
    }

    /// Follows option `index` of the current node. An index past the end is
    /// ignored. A current or next node missing from the tree sends the
    /// navigator back to the root.
    pub fn advance(&mut self, tree: &DecisionTree, index: usize) -> Option<Transition> {
        let Some(node) = tree.node(&self.current) else {
            warn!("{}, restarting", GuideError::MissingNode(self.current.clone()));
            self.reset();
            return Some(Transition::GoTo(ROOT_NODE.to_string()));
        };

        let option = node.options.get(index)?;
        let transition = match &option.target {
            OptionTarget::Next(next) if tree.contains(next) => {
                self.current = next.clone();
                Transition::GoTo(next.clone())
            }
            OptionTarget::Next(next) => {
                warn!(node = %self.current, "{}, restarting", GuideError::MissingNode(next.clone()));
                self.reset();
                Transition::GoTo(ROOT_NODE.to_string())
            }
            OptionTarget::Workflow(key) => Transition::EnterWorkflow(key.clone()),
            OptionTarget::Result(title) => Transition::ShowResult(title.clone()),
        };

        debug!(node = %self.current, ?transition, "decision option chosen");
        Some(transition)
    }
}
