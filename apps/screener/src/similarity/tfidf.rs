//! Local pairwise TF-IDF: the "corpus" is exactly the two texts being compared,
//! so document frequency is 1 or 2 for every term.

use std::collections::{BTreeMap, HashSet};

use regex::Regex;

use crate::errors::AppError;
use crate::similarity::stop_words::ENGLISH_STOP_WORDS;

const TOKEN_PATTERN: &str = r"\b\w\w+\b";

/// Lowercases, tokenizes on runs of two or more word characters and drops
/// English stop words.
pub struct Analyzer {
    token: Regex,
    stop_words: HashSet<&'static str>,
}

impl Analyzer {
    pub fn new() -> Result<Self, AppError> {
        Ok(Self {
            token: Regex::new(TOKEN_PATTERN)?,
            stop_words: ENGLISH_STOP_WORDS.iter().copied().collect(),
        })
    }

    pub fn analyze(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.token
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|t| !self.stop_words.contains(t))
            .map(String::from)
            .collect()
    }
}

type Row = BTreeMap<String, f64>;

/// L2-normalised TF-IDF rows for a candidate/requirement pair.
#[derive(Debug, Clone)]
pub struct PairwiseTfIdf {
    candidate: Row,
    requirement: Row,
}

impl PairwiseTfIdf {
    pub fn fit(analyzer: &Analyzer, candidate_text: &str, requirement_text: &str) -> Self {
        let candidate_counts = term_counts(analyzer.analyze(candidate_text));
        let requirement_counts = term_counts(analyzer.analyze(requirement_text));

        let idf = |term: &str| {
            let df = usize::from(candidate_counts.contains_key(term))
                + usize::from(requirement_counts.contains_key(term));
            // smoothed: ln((1 + n) / (1 + df)) + 1 with n = 2
            (3.0 / (1.0 + df as f64)).ln() + 1.0
        };

        let weigh = |counts: &Row| -> Row {
            let mut row: Row = counts
                .iter()
                .map(|(term, count)| (term.clone(), count * idf(term)))
                .collect();
            normalize(&mut row);
            row
        };

        Self {
            candidate: weigh(&candidate_counts),
            requirement: weigh(&requirement_counts),
        }
    }

    /// Multiplies the weight of each listed term in both rows.
    pub fn boost<S: AsRef<str>>(&mut self, terms: &[S], factor: f64) {
        let terms: HashSet<&str> = terms.iter().map(AsRef::as_ref).collect();
        for row in [&mut self.candidate, &mut self.requirement] {
            for (term, weight) in row.iter_mut() {
                if terms.contains(term.as_str()) {
                    *weight *= factor;
                }
            }
        }
    }

    /// Cosine similarity in [0, 1]; 0.0 when either row is empty or the
    /// weights are not finite.
    pub fn cosine(&self) -> f64 {
        let norm_c = norm(&self.candidate);
        let norm_r = norm(&self.requirement);
        if norm_c == 0.0 || norm_r == 0.0 {
            return 0.0;
        }
        let dot: f64 = self
            .candidate
            .iter()
            .filter_map(|(term, w)| self.requirement.get(term).map(|v| w * v))
            .sum();
        let cosine = dot / (norm_c * norm_r);
        if cosine.is_finite() {
            cosine.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

fn term_counts(tokens: Vec<String>) -> Row {
    let mut counts = Row::new();
    for token in tokens {
        *counts.entry(token).or_insert(0.0) += 1.0;
    }
    counts
}

fn norm(row: &Row) -> f64 {
    row.values().map(|w| w * w).sum::<f64>().sqrt()
}

fn normalize(row: &mut Row) {
    let n = norm(row);
    if n > 0.0 {
        row.values_mut().for_each(|w| *w /= n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> Analyzer {
        Analyzer::new().unwrap()
    }

    #[test]
    fn test_analyzer_drops_stop_words_and_short_tokens() {
        let tokens = analyzer().analyze("I have a B.Tech and 2 years of Python in the AI team");
        assert_eq!(tokens, vec!["tech", "years", "python", "ai", "team"]);
    }

    #[test]
    fn test_analyzer_splits_symbols() {
        assert_eq!(analyzer().analyze("Node.js C++"), vec!["node", "js"]);
    }

    #[test]
    fn test_identical_texts_score_one() {
        let text = "Python SQL Django 2 years B.Tech";
        let tfidf = PairwiseTfIdf::fit(&analyzer(), text, text);
        assert!((tfidf.cosine() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_disjoint_texts_score_zero() {
        let tfidf = PairwiseTfIdf::fit(&analyzer(), "python django", "java spring");
        assert_eq!(tfidf.cosine(), 0.0);
    }

    #[test]
    fn test_empty_side_scores_zero() {
        let tfidf = PairwiseTfIdf::fit(&analyzer(), "", "python django");
        assert_eq!(tfidf.cosine(), 0.0);
        let tfidf = PairwiseTfIdf::fit(&analyzer(), "the and of", "python");
        assert_eq!(tfidf.cosine(), 0.0);
    }

    #[test]
    fn test_known_pairwise_value() {
        // shared "python" has idf 1; "java"/"sql" have idf ln(1.5)+1
        let tfidf = PairwiseTfIdf::fit(&analyzer(), "python java", "python sql");
        let unique = 1.5f64.ln() + 1.0;
        let expected = 1.0 / (1.0 + unique * unique);
        assert!((tfidf.cosine() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_boost_raises_shared_skill_weight() {
        let a = analyzer();
        let plain = PairwiseTfIdf::fit(&a, "python java", "python sql");
        let mut boosted = plain.clone();
        boosted.boost(&["python"], 5.0);
        assert!(boosted.cosine() > plain.cosine());
        assert!(boosted.cosine() <= 1.0);
    }

    #[test]
    fn test_non_finite_boost_scores_zero() {
        let mut tfidf = PairwiseTfIdf::fit(&analyzer(), "python java", "python sql");
        tfidf.boost(&["python"], f64::NAN);
        assert_eq!(tfidf.cosine(), 0.0);
    }

    #[test]
    fn test_boost_of_absent_term_is_noop() {
        let a = analyzer();
        let plain = PairwiseTfIdf::fit(&a, "python java", "python sql");
        let mut boosted = plain.clone();
        boosted.boost(&["rust"], 5.0);
        assert_eq!(boosted.cosine(), plain.cosine());
    }
}
