// src/catalog/builtin.rs
use std::collections::BTreeMap;
use crate::config::{CodeStep, DecisionOption, DecisionTree, GuidedWorkflow, WorkflowBranch, ROOT_NODE};

pub fn decision_tree() -> DecisionTree {
    let mut tree = DecisionTree::new();

    tree.insert(ROOT_NODE, "Qual é o objetivo principal da sua análise?", vec![
        DecisionOption::next("Comparar Médias/Grupos", "compare_groups"),
        DecisionOption::next("Ver Associação/Correlação", "association"),
        DecisionOption::next("Verificar Normalidade", "normality"),
    ]);

    tree.insert("compare_groups", "Quantos grupos você quer comparar?", vec![
        DecisionOption::next("2 Grupos", "two_groups"),
        DecisionOption::next("3 ou mais Grupos", "three_groups"),
    ]);

    tree.insert("two_groups", "Os grupos são independentes ou pareados?", vec![
        DecisionOption::workflow("Independentes", "guide_2_indep"),
        DecisionOption::workflow("Pareados (Mesmos sujeitos)", "guide_2_paired"),
    ]);

    tree.insert("three_groups", "Os grupos são independentes ou pareados?", vec![
        DecisionOption::workflow("Independentes", "guide_3_indep"),
        DecisionOption::result("Pareados (Medidas Repetidas)", "ANOVA de Medidas Repetidas"),
    ]);

    tree.insert("association", "Qual o tipo das suas variáveis?", vec![
        DecisionOption::workflow("Numérica vs Numérica", "guide_correlacao"),
        DecisionOption::result("Categórica vs Categórica", "Teste Qui-Quadrado de Independência"),
    ]);

    tree.insert("normality", "Você quer testar se seus dados seguem uma Curva Normal?", vec![
        DecisionOption::result("Sim", "Teste de Normalidade de Shapiro-Wilk"),
    ]);

    tree
}

pub fn workflows() -> BTreeMap<String, GuidedWorkflow> {
    let mut workflows = BTreeMap::new();

    workflows.insert("guide_2_indep".to_string(), GuidedWorkflow {
        title: "Comparação de 2 Grupos Independentes".to_string(),
        description: "Antes de escolher o teste final, precisamos analisar a distribuição dos seus dados.".to_string(),
        steps: vec![
            CodeStep::new(
                "1. Análise Descritiva Visual",
                "library(ggplot2)\n# Boxplot para ver distribuição e outliers\nggplot({{df}}, aes(x = {{x}}, y = {{y}}, fill = {{x}})) + geom_boxplot() + theme_minimal()",
            ),
            CodeStep::new(
                "2. Teste os Pressupostos (Normalidade e Variância)",
                "# Normalidade (Shapiro-Wilk)\ntapply({{df}}${{y}}, {{df}}${{x}}, shapiro.test)\n\n# Homogeneidade (Levene)\nlibrary(car)\nleveneTest({{y}} ~ {{x}}, data = {{df}})",
            ),
        ],
        final_question: "Observe os resultados acima (p-valor > 0.05 indica normalidade/homogeneidade). Seus dados seguem a distribuição Normal e possuem variâncias iguais?".to_string(),
        branches: vec![
            WorkflowBranch::new("Sim (Tudo Normal)", "Teste t de Student para Amostras Independentes (Não Pareado)"),
            WorkflowBranch::new("Não (Violou pressupostos)", "Teste de Mann-Whitney U"),
        ],
    });

    workflows.insert("guide_2_paired".to_string(), GuidedWorkflow {
        title: "Comparação de 2 Grupos Pareados".to_string(),
        description: "Para testes pareados, o mais importante é a normalidade da DIFERENÇA entre os momentos.".to_string(),
        steps: vec![
            CodeStep::new(
                "1. Calcular a Diferença",
                "# Crie uma coluna de diferenças (exemplo genérico)\ndiferenca <- {{df}}$pos - {{df}}$pre\n\n# Visualize\nhist(diferenca, col='skyblue', main='Histograma das Diferenças')",
            ),
            CodeStep::new("2. Teste de Normalidade na Diferença", "shapiro.test(diferenca)"),
        ],
        final_question: "O teste de Shapiro-Wilk na diferença deu p > 0.05 (Normal)?".to_string(),
        branches: vec![
            WorkflowBranch::new("Sim (Normal)", "Teste t Pareado"),
            WorkflowBranch::new("Não (Não Normal)", "Teste de Postos com Sinais de Wilcoxon (Wilcoxon Signed-Rank Test)"),
        ],
    });

    workflows.insert("guide_3_indep".to_string(), GuidedWorkflow {
        title: "Comparação de 3+ Grupos Independentes".to_string(),
        description: "Vamos verificar a normalidade dos resíduos e a homogeneidade das variâncias.".to_string(),
        steps: vec![
            CodeStep::new(
                "1. Ajuste do Modelo e Pressupostos",
                "modelo <- aov({{y}} ~ {{x}}, data = {{df}})\n\n# Normalidade dos resíduos\nshapiro.test(resid(modelo))\n\n# Homogeneidade (Levene)\nlibrary(car); leveneTest({{y}} ~ {{x}}, data = {{df}})",
            ),
        ],
        final_question: "Os resíduos são normais E as variâncias homogêneas (ambos p > 0.05)?".to_string(),
        branches: vec![
            WorkflowBranch::new("Sim (Atende tudo)", "ANOVA de uma via (One-Way ANOVA)"),
            WorkflowBranch::new("Não (Falhou)", "Teste de Kruskal-Wallis"),
        ],
    });

    workflows.insert("guide_correlacao".to_string(), GuidedWorkflow {
        title: "Associação entre Variáveis Numéricas".to_string(),
        description: "Para correlação, olhamos a normalidade de ambas as variáveis e a linearidade.".to_string(),
        steps: vec![
            CodeStep::new("1. Teste de Normalidade", "shapiro.test({{df}}${{var1}})\nshapiro.test({{df}}${{var2}})"),
            CodeStep::new("2. Visualizar Linearidade", "plot({{df}}${{var1}}, {{df}}${{var2}}, main='Scatterplot')"),
        ],
        final_question: "As duas variáveis são normais e a relação parece linear?".to_string(),
        branches: vec![
            WorkflowBranch::new("Sim (Linear e Normal)", "Correlação de Pearson"),
            WorkflowBranch::new("Não (Monotônica/Não-Normal)", "Correlação de Spearman"),
        ],
    });

    workflows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OptionTarget;

    #[test]
    fn embedded_tree_is_structurally_sound() {
        let report = decision_tree().validate();
        assert!(report.is_clean(), "{:?}", report);
    }

    #[test]
    fn every_tree_workflow_is_defined() {
        let tree = decision_tree();
        let workflows = workflows();
        for id in ["start", "compare_groups", "two_groups", "three_groups", "association", "normality"] {
            let node = tree.node(id).unwrap();
            for option in &node.options {
                if let OptionTarget::Workflow(key) = &option.target {
                    assert!(workflows.contains_key(key), "missing workflow {}", key);
                }
            }
        }
    }

    #[test]
    fn workflows_have_two_branches_each() {
        for (key, workflow) in workflows() {
            assert_eq!(workflow.branches.len(), 2, "{}", key);
            assert!(!workflow.steps.is_empty(), "{}", key);
        }
    }
}
