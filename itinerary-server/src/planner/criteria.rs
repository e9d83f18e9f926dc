//! Optimality criteria for route ranking.
//!
//! Each criterion keeps its own accumulator: the best score seen so far and
//! every path that reached it. Criteria are fed completed paths by
//! [`ItineraryGraph::search_optimal_paths`](crate::graph::ItineraryGraph::search_optimal_paths)
//! and never look at each other.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::domain::{Priced, Scheduled};
use crate::graph::{Decision, OptimalCriterion, Path};

/// Weights of the blended criterion. Lower blended scores are better.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Weights {
    /// Weight per unit of total cost
    #[serde(default)]
    pub cost: f64,
    /// Weight per leg
    #[serde(default)]
    pub legs: f64,
    /// Weight per hour of elapsed time
    #[serde(default)]
    pub time: f64,
}

/// The closed set of ranking criteria.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CriterionKind {
    MinCost,
    MaxCost,
    MinTime,
    MaxTime,
    Weighted(Weights),
}

impl CriterionKind {
    pub const MIN_COST: &'static str = "minCost";
    pub const MAX_COST: &'static str = "maxCost";
    pub const MIN_TIME: &'static str = "minTime";
    pub const MAX_TIME: &'static str = "maxTime";
    pub const WEIGHTED: &'static str = "optimal";

    /// Name used in requests and responses.
    pub fn name(&self) -> &'static str {
        match self {
            CriterionKind::MinCost => Self::MIN_COST,
            CriterionKind::MaxCost => Self::MAX_COST,
            CriterionKind::MinTime => Self::MIN_TIME,
            CriterionKind::MaxTime => Self::MAX_TIME,
            CriterionKind::Weighted(_) => Self::WEIGHTED,
        }
    }

    /// Look a criterion up by name.
    ///
    /// The weighted criterion is only available when weights are given.
    ///
    /// # Examples
    ///
    /// ```
    /// use itinerary_server::planner::{CriterionKind, Weights};
    ///
    /// assert_eq!(CriterionKind::from_name("minCost", None), Some(CriterionKind::MinCost));
    /// assert_eq!(CriterionKind::from_name("optimal", None), None);
    ///
    /// let w = Weights { cost: 1.0, legs: 50.0, time: 10.0 };
    /// assert_eq!(CriterionKind::from_name("optimal", Some(w)), Some(CriterionKind::Weighted(w)));
    /// ```
    pub fn from_name(name: &str, weights: Option<Weights>) -> Option<Self> {
        match name {
            Self::MIN_COST => Some(CriterionKind::MinCost),
            Self::MAX_COST => Some(CriterionKind::MaxCost),
            Self::MIN_TIME => Some(CriterionKind::MinTime),
            Self::MAX_TIME => Some(CriterionKind::MaxTime),
            Self::WEIGHTED => weights.map(CriterionKind::Weighted),
            _ => None,
        }
    }

    /// The criteria evaluated when a request names none: the four min/max
    /// criteria, plus the weighted one if weights are given.
    pub fn defaults(weights: Option<Weights>) -> Vec<Self> {
        let mut kinds = vec![
            CriterionKind::MinCost,
            CriterionKind::MaxCost,
            CriterionKind::MinTime,
            CriterionKind::MaxTime,
        ];
        kinds.extend(weights.map(CriterionKind::Weighted));
        kinds
    }

    fn goal(&self) -> Goal {
        match self {
            CriterionKind::MinCost | CriterionKind::MinTime | CriterionKind::Weighted(_) => {
                Goal::Minimize
            }
            CriterionKind::MaxCost | CriterionKind::MaxTime => Goal::Maximize,
        }
    }
}

/// Value a criterion assigns to a path.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum Score {
    /// Total cost or blended score
    Amount(f64),
    /// Time from first departure to last arrival
    Elapsed(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Goal {
    Minimize,
    Maximize,
}

impl Goal {
    fn is_worse(self, value: Score, best: Score) -> bool {
        match self {
            Goal::Minimize => value > best,
            Goal::Maximize => value < best,
        }
    }
}

/// Best score so far and every path that reached it.
///
/// # Invariants
///
/// `paths` holds exactly the accepted paths whose score equals `best`.
#[derive(Debug)]
pub struct Accumulator<'g, E> {
    best: Option<Score>,
    paths: Vec<Path<'g, E>>,
}

impl<'g, E> Accumulator<'g, E> {
    pub fn new() -> Self {
        Self {
            best: None,
            paths: Vec::new(),
        }
    }

    /// Record a path that is at least as good as the current best.
    ///
    /// Callers reject worse paths first; anything not equal to the best is
    /// treated as an improvement.
    pub fn accept(&mut self, value: Score, path: &Path<'g, E>) -> Decision {
        if self.best == Some(value) {
            self.paths.push(path.clone());
            return Decision::Tied;
        }

        self.best = Some(value);
        self.paths.clear();
        self.paths.push(path.clone());
        Decision::Improved
    }

    pub fn best(&self) -> Option<Score> {
        self.best
    }

    pub fn paths(&self) -> &[Path<'g, E>] {
        &self.paths
    }

    pub fn into_paths(self) -> Vec<Path<'g, E>> {
        self.paths
    }
}

impl<E> Default for Accumulator<'_, E> {
    fn default() -> Self {
        Self::new()
    }
}

/// A criterion with its accumulator.
#[derive(Debug)]
pub struct Criterion<'g, E> {
    kind: CriterionKind,
    acc: Accumulator<'g, E>,
}

impl<'g, E: Scheduled + Priced> Criterion<'g, E> {
    pub fn new(kind: CriterionKind) -> Self {
        Self {
            kind,
            acc: Accumulator::new(),
        }
    }

    pub fn kind(&self) -> CriterionKind {
        self.kind
    }

    /// Best score reached, or `None` if no path has been evaluated.
    pub fn best_so_far(&self) -> Option<Score> {
        self.acc.best()
    }

    /// Every path tied at the best score.
    pub fn paths(&self) -> &[Path<'g, E>] {
        self.acc.paths()
    }

    pub fn into_paths(self) -> Vec<Path<'g, E>> {
        self.acc.into_paths()
    }

    /// Scores a path. Returns `None` when the minimum-cost sum already
    /// exceeds the best partway through the legs.
    fn score(&self, path: &Path<'g, E>) -> Option<Score> {
        let score = match self.kind {
            CriterionKind::MinCost => return self.bounded_cost(path),
            CriterionKind::MaxCost => Score::Amount(path.total_cost()),
            CriterionKind::MinTime | CriterionKind::MaxTime => Score::Elapsed(path.elapsed()),
            CriterionKind::Weighted(w) => {
                let hours = path.elapsed().num_seconds() as f64 / 3600.0;
                Score::Amount(w.cost * path.total_cost() + w.legs * path.len() as f64 + w.time * hours)
            }
        };
        Some(score)
    }

    /// Cost sum that gives up as soon as it passes the current best.
    fn bounded_cost(&self, path: &Path<'g, E>) -> Option<Score> {
        let bound = match self.acc.best() {
            Some(Score::Amount(best)) => Some(best),
            _ => None,
        };

        let mut total = 0.0;
        for amount in path.values().filter_map(|v| v.total_amount()) {
            total += amount;
            if bound.is_some_and(|best| total > best) {
                return None;
            }
        }
        Some(Score::Amount(total))
    }
}

impl<'g, E: Scheduled + Priced> OptimalCriterion<'g, E> for Criterion<'g, E> {
    fn evaluate(&mut self, path: &Path<'g, E>) -> Decision {
        let Some(value) = self.score(path) else {
            return Decision::Rejected;
        };

        if let Some(best) = self.acc.best() {
            if self.kind.goal().is_worse(value, best) {
                return Decision::Rejected;
            }
        }

        self.acc.accept(value, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Timestamp;
    use crate::graph::ItineraryGraph;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    /// Payload with minute-offset times and an optional fare.
    #[derive(Debug, Clone)]
    struct Fare {
        id: usize,
        dep: Timestamp,
        arr: Timestamp,
        amount: Option<f64>,
    }

    impl Scheduled for Fare {
        fn departure(&self) -> Timestamp {
            self.dep
        }

        fn arrival(&self) -> Timestamp {
            self.arr
        }
    }

    impl Priced for Fare {
        fn total_amount(&self) -> Option<f64> {
            self.amount
        }
    }

    fn at(mins: i64) -> Timestamp {
        let midnight = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Timestamp::new(midnight) + Duration::minutes(mins)
    }

    fn fare(id: usize, dep: i64, arr: i64, amount: Option<f64>) -> Fare {
        Fare {
            id,
            dep: at(dep),
            arr: at(arr),
            amount,
        }
    }

    fn graph() -> ItineraryGraph<Fare> {
        ItineraryGraph::new(Duration::minutes(60))
    }

    fn ids(paths: &[Path<'_, Fare>]) -> Vec<Vec<usize>> {
        let mut ids: Vec<Vec<usize>> = paths
            .iter()
            .map(|p| p.values().map(|f| f.id).collect())
            .collect();
        ids.sort();
        ids
    }

    /// A->C direct (cheap, slow) plus A->B->C (pricey, quick) and a tie.
    fn sample() -> ItineraryGraph<Fare> {
        let mut g = graph();
        g.add_edge("A", "C", fare(1, 0, 600, Some(100.0)));
        g.add_edge("A", "B", fare(2, 0, 60, Some(150.0)));
        g.add_edge("B", "C", fare(3, 120, 180, Some(150.0)));
        g.add_edge("A", "C", fare(4, 60, 660, Some(100.0)));
        g
    }

    fn run(g: &ItineraryGraph<Fare>, kind: CriterionKind) -> (Option<Score>, Vec<Vec<usize>>) {
        let mut criteria = [Criterion::new(kind)];
        g.search_optimal_paths("A", "C", 0, &mut criteria);
        let [criterion] = criteria;
        (criterion.best_so_far(), ids(criterion.paths()))
    }

    #[test]
    fn names_round_trip() {
        let w = Weights {
            cost: 1.0,
            legs: 2.0,
            time: 3.0,
        };
        for kind in CriterionKind::defaults(Some(w)) {
            assert_eq!(CriterionKind::from_name(kind.name(), Some(w)), Some(kind));
        }
        assert_eq!(CriterionKind::from_name("cheapest", None), None);
        assert_eq!(CriterionKind::defaults(None).len(), 4);
    }

    #[test]
    fn min_cost_keeps_ties() {
        let (best, paths) = run(&sample(), CriterionKind::MinCost);
        assert_eq!(best, Some(Score::Amount(100.0)));
        assert_eq!(paths, vec![vec![1], vec![4]]);
    }

    #[test]
    fn max_cost() {
        let (best, paths) = run(&sample(), CriterionKind::MaxCost);
        assert_eq!(best, Some(Score::Amount(300.0)));
        assert_eq!(paths, vec![vec![2, 3]]);
    }

    #[test]
    fn min_time() {
        let (best, paths) = run(&sample(), CriterionKind::MinTime);
        assert_eq!(best, Some(Score::Elapsed(Duration::minutes(180))));
        assert_eq!(paths, vec![vec![2, 3]]);
    }

    #[test]
    fn max_time_keeps_ties() {
        let (best, paths) = run(&sample(), CriterionKind::MaxTime);
        assert_eq!(best, Some(Score::Elapsed(Duration::minutes(600))));
        assert_eq!(paths, vec![vec![1], vec![4]]);
    }

    #[test]
    fn weighted_blend() {
        // Direct: 100 + 1*50 + 10h*10 = 250. Connection: 300 + 2*50 + 3h*10 = 430.
        let w = Weights {
            cost: 1.0,
            legs: 50.0,
            time: 10.0,
        };
        let (best, paths) = run(&sample(), CriterionKind::Weighted(w));
        assert_eq!(best, Some(Score::Amount(250.0)));
        assert_eq!(paths, vec![vec![1], vec![4]]);

        // Weighting time heavily flips the choice.
        let w = Weights {
            cost: 0.0,
            legs: 0.0,
            time: 1.0,
        };
        let (best, paths) = run(&sample(), CriterionKind::Weighted(w));
        assert_eq!(best, Some(Score::Amount(3.0)));
        assert_eq!(paths, vec![vec![2, 3]]);
    }

    #[test]
    fn unpriced_legs_add_nothing() {
        let mut g = graph();
        g.add_edge("A", "C", fare(1, 0, 600, None));
        g.add_edge("A", "C", fare(2, 0, 600, Some(10.0)));

        let (best, paths) = run(&g, CriterionKind::MinCost);
        assert_eq!(best, Some(Score::Amount(0.0)));
        assert_eq!(paths, vec![vec![1]]);
    }

    #[test]
    fn no_route_leaves_criterion_empty() {
        let mut g = graph();
        g.add_edge("A", "B", fare(1, 0, 60, Some(1.0)));
        g.add_edge("C", "D", fare(2, 0, 60, Some(1.0)));

        for kind in CriterionKind::defaults(None) {
            let (best, paths) = run(&g, kind);
            assert_eq!(best, None);
            assert!(paths.is_empty());
        }
    }

    #[test]
    fn evaluate_decisions() {
        let g = sample();
        let paths = g.get_paths("A", "C", 0);
        // BFS order: [1], [4], [2, 3]
        let mut min_cost = Criterion::new(CriterionKind::MinCost);

        assert_eq!(min_cost.evaluate(&paths[0]), Decision::Improved);
        assert_eq!(min_cost.evaluate(&paths[1]), Decision::Tied);
        assert_eq!(min_cost.evaluate(&paths[2]), Decision::Rejected);
        assert_eq!(min_cost.paths().len(), 2);

        let mut max_cost = Criterion::new(CriterionKind::MaxCost);
        assert_eq!(max_cost.evaluate(&paths[0]), Decision::Improved);
        assert_eq!(max_cost.evaluate(&paths[2]), Decision::Improved);
        assert_eq!(max_cost.evaluate(&paths[1]), Decision::Rejected);
        assert_eq!(max_cost.kind(), CriterionKind::MaxCost);
        assert_eq!(max_cost.into_paths().len(), 1);
    }

    #[test]
    fn improvement_discards_previous_paths() {
        let g = sample();
        let paths = g.get_paths("A", "C", 0);
        let mut acc = Accumulator::new();

        assert_eq!(acc.accept(Score::Amount(5.0), &paths[0]), Decision::Improved);
        assert_eq!(acc.accept(Score::Amount(5.0), &paths[1]), Decision::Tied);
        assert_eq!(acc.paths().len(), 2);

        assert_eq!(acc.accept(Score::Amount(3.0), &paths[2]), Decision::Improved);
        assert_eq!(acc.paths().len(), 1);
        assert_eq!(acc.best(), Some(Score::Amount(3.0)));
    }

    // ========== properties against brute force ==========

    fn fares_strategy() -> impl Strategy<Value = Vec<(usize, usize, i64, i64, Option<u8>)>> {
        prop::collection::vec(
            (
                0usize..4,
                0usize..4,
                0i64..900,
                30i64..200,
                prop::option::weighted(0.9, 0u8..5),
            ),
            0..12,
        )
    }

    const LABELS: [&str; 4] = ["A", "B", "C", "D"];

    fn build(fares: &[(usize, usize, i64, i64, Option<u8>)]) -> ItineraryGraph<Fare> {
        let mut g = graph();
        for (id, &(from, to, dep, dur, amount)) in fares.iter().enumerate() {
            // Whole-number fares keep float sums exact.
            let amount = amount.map(|a| f64::from(a) * 50.0);
            g.add_edge(LABELS[from], LABELS[to], fare(id, dep, dep + dur, amount));
        }
        g
    }

    fn optimal_by<K: PartialOrd + Copy>(
        paths: &[Path<'_, Fare>],
        key: impl Fn(&Path<'_, Fare>) -> K,
        prefer_low: bool,
    ) -> Vec<Vec<usize>> {
        let Some(best) = paths.iter().map(&key).reduce(|a, b| {
            let b_better = if prefer_low { b < a } else { b > a };
            if b_better { b } else { a }
        }) else {
            return Vec::new();
        };
        let winners: Vec<Path<'_, Fare>> = paths.iter().filter(|p| key(p) == best).cloned().collect();
        ids(&winners)
    }

    proptest! {
        #[test]
        fn criteria_match_brute_force(
            fares in fares_strategy(),
            max_legs in 0usize..4,
        ) {
            let g = build(&fares);
            let all = g.get_paths("A", "C", max_legs);

            let mut criteria: Vec<Criterion<'_, Fare>> = CriterionKind::defaults(None)
                .into_iter()
                .map(Criterion::new)
                .collect();
            g.search_optimal_paths("A", "C", max_legs, &mut criteria);

            let cost = |p: &Path<'_, Fare>| p.total_cost();
            let elapsed = |p: &Path<'_, Fare>| p.elapsed();

            prop_assert_eq!(ids(criteria[0].paths()), optimal_by(&all, cost, true));
            prop_assert_eq!(ids(criteria[1].paths()), optimal_by(&all, cost, false));
            prop_assert_eq!(ids(criteria[2].paths()), optimal_by(&all, elapsed, true));
            prop_assert_eq!(ids(criteria[3].paths()), optimal_by(&all, elapsed, false));

            prop_assert_eq!(all.is_empty(), criteria[0].paths().is_empty());
        }

        #[test]
        fn weighted_matches_brute_force(
            fares in fares_strategy(),
            max_legs in 0usize..4,
            raw in (0u8..4, 0u8..4, 0u8..4),
        ) {
            let (cost, legs, time) = raw;
            let weights = Weights {
                cost: f64::from(cost),
                legs: f64::from(legs),
                time: f64::from(time),
            };
            let g = build(&fares);
            let all = g.get_paths("A", "C", max_legs);

            let mut criteria = [Criterion::new(CriterionKind::Weighted(weights))];
            g.search_optimal_paths("A", "C", max_legs, &mut criteria);

            let blended = |p: &Path<'_, Fare>| {
                let hours = p.elapsed().num_seconds() as f64 / 3600.0;
                weights.cost * p.total_cost() + weights.legs * p.len() as f64 + weights.time * hours
            };

            prop_assert_eq!(ids(criteria[0].paths()), optimal_by(&all, blended, true));
            if let Some(best) = criteria[0].best_so_far() {
                prop_assert!(all.iter().all(|p| Score::Amount(blended(p)) >= best));
            }
        }
    }
}
