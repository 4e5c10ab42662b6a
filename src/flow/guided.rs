// src/flow/guided.rs
use tracing::info;
use crate::catalog::TestResolver;
use crate::config::{DataShape, GuidedWorkflow, PivotConfig, TestDefinition};

/// Columns offered while the final test is still unknown.
pub const GENERIC_COLUMNS: [&str; 3] = ["ID", "Grupo", "Valor"];

pub const GENERIC_PIVOT: PivotConfig = PivotConfig {
    allowed: true,
    default_column_count: 2,
};

pub fn generic_shape() -> DataShape {
    DataShape::new(&GENERIC_COLUMNS, Vec::new())
}

/// Where a final-question answer leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchOutcome {
    /// Index of the resolved test in the catalog.
    Test(usize),
    /// The branch names a test the catalog does not have.
    InConstruction(String),
}

/// Resolves branch `index` of `workflow`. `None` when there is no such branch.
pub fn choose_branch(
    workflow: &GuidedWorkflow,
    index: usize,
    tests: &[TestDefinition],
    resolver: &dyn TestResolver,
) -> Option<BranchOutcome> {
    let branch = workflow.branches.get(index)?;
    let outcome = match resolver.resolve(tests, &branch.target_test_title) {
        Some(found) => BranchOutcome::Test(found),
        None => BranchOutcome::InConstruction(branch.target_test_title.clone()),
    };
    info!(workflow = %workflow.title, title = %branch.target_test_title, ?outcome, "workflow branch chosen");
    Some(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin::workflows;
    use crate::catalog::fixtures::sample_tests;
    use crate::catalog::FuzzyResolver;

    #[test]
    fn generic_shape_has_three_columns() {
        assert_eq!(generic_shape().columns, vec!["ID", "Grupo", "Valor"]);
        assert!(GENERIC_PIVOT.allowed);
    }

    #[test]
    fn branches_resolve_against_catalog() {
        let tests = sample_tests();
        let workflows = workflows();
        let workflow = &workflows["guide_2_indep"];

        let Some(BranchOutcome::Test(idx)) = choose_branch(workflow, 1, &tests, &FuzzyResolver) else {
            panic!("Mann-Whitney should resolve");
        };
        assert_eq!(tests[idx].title, "Teste de Mann-Whitney U");
        assert_eq!(choose_branch(workflow, 2, &tests, &FuzzyResolver), None);
    }

    #[test]
    fn empty_catalog_is_in_construction() {
        let workflows = workflows();
        let outcome = choose_branch(&workflows["guide_correlacao"], 0, &[], &FuzzyResolver);
        assert_eq!(outcome, Some(BranchOutcome::InConstruction("Correlação de Pearson".to_string())));
    }
}
