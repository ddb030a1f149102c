//! Rule chain for candidate ordering.
//!
//! Rules are compared in sequence: the next rule is consulted only when
//! the previous ones tie. Sorting is stable, so workers tied on every rule
//! keep their input order unless a final tie-breaker is configured.

use std::cmp::Ordering;
use std::sync::Arc;

use super::{rules, RankScore, RankingRule};
use crate::models::{Site, Worker};

/// How ties are broken after all rules are exhausted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TieBreaker {
    /// Keep input order (default).
    #[default]
    Stable,
    /// Deterministic by worker ID (lexicographic).
    ById,
}

/// A composable candidate ranker.
///
/// # Example
/// ```
/// use u_staffing::ranking::{Ranker, TieBreaker};
///
/// let ranker = Ranker::standard().with_tie_breaker(TieBreaker::ById);
/// assert_eq!(ranker.rule_names(), vec!["CONTRACT", "PROXIMITY"]);
/// ```
#[derive(Clone)]
pub struct Ranker {
    rules: Vec<Arc<dyn RankingRule>>,
    tie_breaker: TieBreaker,
    epsilon: f64,
}

impl Ranker {
    /// Creates a ranker with no rules (input order is kept).
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            tie_breaker: TieBreaker::Stable,
            epsilon: 1e-9,
        }
    }

    /// Contract preference, then proximity.
    pub fn standard() -> Self {
        Self::new()
            .with_rule(rules::ContractPreference)
            .with_rule(rules::Proximity)
    }

    /// Appends a rule to the chain.
    pub fn with_rule<R: RankingRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Sets the final tie-breaking strategy.
    pub fn with_tie_breaker(mut self, tie_breaker: TieBreaker) -> Self {
        self.tie_breaker = tie_breaker;
        self
    }

    /// Names of the configured rules, in order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Orders candidates, best first.
    pub fn rank<'a>(&self, mut candidates: Vec<&'a Worker>, site: &Site) -> Vec<&'a Worker> {
        candidates.sort_by(|a, b| self.compare(a, b, site));
        candidates
    }

    /// Orders indices into `workers`, best first.
    pub fn rank_indices(&self, workers: &[Worker], candidates: &[usize], site: &Site) -> Vec<usize> {
        let mut order = candidates.to_vec();
        order.sort_by(|&a, &b| self.compare(&workers[a], &workers[b], site));
        order
    }

    /// Scores from each rule, in chain order.
    pub fn evaluate(&self, worker: &Worker, site: &Site) -> Vec<RankScore> {
        self.rules.iter().map(|r| r.score(worker, site)).collect()
    }

    fn compare(&self, a: &Worker, b: &Worker, site: &Site) -> Ordering {
        for rule in &self.rules {
            let score_a = rule.score(a, site);
            let score_b = rule.score(b, site);

            // INF - INF is NaN, which falls through as a tie
            if (score_a - score_b).abs() > self.epsilon {
                return score_a.partial_cmp(&score_b).unwrap_or(Ordering::Equal);
            }
        }

        match self.tie_breaker {
            TieBreaker::Stable => Ordering::Equal,
            TieBreaker::ById => a.id.cmp(&b.id),
        }
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for Ranker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ranker")
            .field("rules", &self.rule_names())
            .field("tie_breaker", &self.tie_breaker)
            .finish()
    }
}
