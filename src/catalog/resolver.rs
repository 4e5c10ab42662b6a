// src/catalog/resolver.rs
use unicode_normalization::UnicodeNormalization;
use crate::config::{MatchPolicy, TestDefinition};

/// Folds accents and case: NFD, drop combining diacritics, lowercase.
pub fn normalize(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

/// Maps a free-text title or tag to a catalog index.
pub trait TestResolver: std::fmt::Debug {
    fn resolve(&self, tests: &[TestDefinition], query: &str) -> Option<usize>;
}

/// Bidirectional substring match on titles, then tag containment.
/// First match in catalog order wins.
#[derive(Debug, Default)]
pub struct FuzzyResolver;

impl TestResolver for FuzzyResolver {
    fn resolve(&self, tests: &[TestDefinition], query: &str) -> Option<usize> {
        let target = normalize(query.trim());
        if target.is_empty() {
            return None;
        }

        tests.iter()
            .position(|test| {
                let title = normalize(&test.title);
                !title.is_empty() && (title.contains(&target) || target.contains(&title))
            })
            .or_else(|| {
                tests.iter().position(|test| {
                    test.tags.iter()
                        .map(|tag| normalize(tag.trim()))
                        .any(|tag| !tag.is_empty() && target.contains(&tag))
                })
            })
    }
}

/// Normalized equality on titles, then on tags.
#[derive(Debug, Default)]
pub struct ExactResolver;

impl TestResolver for ExactResolver {
    fn resolve(&self, tests: &[TestDefinition], query: &str) -> Option<usize> {
        let target = normalize(query.trim());
        if target.is_empty() {
            return None;
        }

        tests.iter()
            .position(|test| normalize(test.title.trim()) == target)
            .or_else(|| {
                tests.iter().position(|test| {
                    test.tags.iter().any(|tag| normalize(tag.trim()) == target)
                })
            })
    }
}

pub fn resolver_for(policy: MatchPolicy) -> Box<dyn TestResolver> {
    match policy {
        MatchPolicy::Fuzzy => Box::new(FuzzyResolver),
        MatchPolicy::Exact => Box::new(ExactResolver),
    }
}
