// src/config/mod.rs
pub mod test;
pub mod tree;
pub mod workflow;
pub mod settings;

// Re-export commonly used types
pub use test::{
    Assumption, AssumptionDetail, CodeStep, DataShape, ExampleCell, ExampleOutput, Highlight,
    Hypotheses, PivotConfig, TestDefinition,
};
pub use tree::{DecisionNode, DecisionOption, DecisionTree, OptionTarget, TreeReport, ROOT_NODE};
pub use workflow::{GuidedWorkflow, WorkflowBranch};
pub use settings::{MatchPolicy, SelectionPolicy, Settings};
