// src/render/chart.rs
use rand::Rng;
use crate::catalog::normalize;

const SCATTER_POINTS: usize = 25;

/// Illustration picked for a test from its title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConceptChart {
    Scatter { rising: bool },
    GroupComparison { groups: usize },
    NormalCurve,
    None,
}

impl ConceptChart {
    pub fn for_title(title: &str) -> Self {
        let title = normalize(title);
        let has = |keys: &[&str]| keys.iter().any(|key| title.contains(key));

        if has(&["correlacao", "regressao"]) {
            ConceptChart::Scatter { rising: title.contains("pearson") }
        } else if has(&["comparacao", "t de student", "anova", "mann", "kruskal", "wilcoxon"]) {
            let groups = if has(&["anova", "kruskal"]) { 3 } else { 2 };
            ConceptChart::GroupComparison { groups }
        } else if has(&["normalidade", "shapiro"]) {
            ConceptChart::NormalCurve
        } else {
            ConceptChart::None
        }
    }
}

/// Noisy points along a diagonal on a 0..100 plane.
pub fn scatter_points<R: Rng>(rising: bool, rng: &mut R) -> Vec<(f64, f64)> {
    (0..SCATTER_POINTS)
        .map(|_| {
            let x = rng.gen_range(10.0..90.0);
            let trend = if rising { x } else { 100.0 - x };
            let y: f64 = trend + rng.gen_range(-15.0..15.0);
            (x, y.clamp(0.0, 100.0))
        })
        .collect()
}

/// Standard normal density sampled over [-3, 3], scaled to a 0..100 plane.
pub fn normal_curve(samples: usize) -> Vec<(f64, f64)> {
    let samples = samples.max(2);
    (0..samples)
        .map(|i| {
            let z = -3.0 + 6.0 * i as f64 / (samples - 1) as f64;
            let density = (-0.5 * z * z).exp();
            ((z + 3.0) / 6.0 * 100.0, density * 100.0)
        })
        .collect()
}
