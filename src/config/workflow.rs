// src/config/workflow.rs
use super::test::CodeStep;

/// A diagnostic procedure run before the final test is known.
#[derive(Debug, Clone, PartialEq)]
pub struct GuidedWorkflow {
    pub title: String,
    pub description: String,
    pub steps: Vec<CodeStep>,
    pub final_question: String,
    pub branches: Vec<WorkflowBranch>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowBranch {
    pub text: String,
    pub target_test_title: String,
}

impl WorkflowBranch {
    pub fn new(text: &str, target_test_title: &str) -> Self {
        Self {
            text: text.to_string(),
            target_test_title: target_test_title.to_string(),
        }
    }
}
