//! BFS path search.
//!
//! Both path listing and optimal-path search share one traversal: a FIFO
//! frontier of partial paths, each carrying its own visited set so that
//! sibling branches never hide nodes from each other. An edge extends a
//! partial path only if its leg can be caught after the previous leg lands
//! (see [`Scheduled::is_reachable_from`]).

use std::collections::VecDeque;

use tracing::{debug, trace};

use super::{Edge, ItineraryGraph, OptimalCriterion, Path};
use crate::domain::Scheduled;

/// Counters from one traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Partial paths popped from the frontier.
    pub explored: usize,
    /// Paths that reached the destination.
    pub completed: usize,
    /// Branches cut by the leg limit.
    pub truncated: usize,
}

/// A partial path on the frontier.
struct Partial<'g, E> {
    edges: Vec<&'g Edge<E>>,
    /// Nodes already on this path. Owned per path, never shared.
    visited: Vec<bool>,
}

impl<E: Scheduled> ItineraryGraph<E> {
    /// Returns every path from `from` to `to`.
    ///
    /// `max_legs == 0` means no limit on path length. Unknown labels, or
    /// `from == to`, give an empty result.
    pub fn get_paths(&self, from: &str, to: &str, max_legs: usize) -> Vec<Path<'_, E>> {
        let mut paths = Vec::new();
        let stats = self.traverse(from, to, max_legs, |path| paths.push(path));

        debug!(
            from,
            to,
            max_legs,
            paths = paths.len(),
            explored = stats.explored,
            "Path search complete"
        );

        paths
    }

    /// Presents every path from `from` to `to` to each criterion.
    ///
    /// Enumerates the same paths as [`get_paths`](Self::get_paths) but never
    /// collects them; criteria keep whatever they need.
    pub fn search_optimal_paths<'g, C>(
        &'g self,
        from: &str,
        to: &str,
        max_legs: usize,
        criteria: &mut [C],
    ) -> SearchStats
    where
        C: OptimalCriterion<'g, E>,
    {
        let stats = self.traverse(from, to, max_legs, |path| {
            for criterion in criteria.iter_mut() {
                criterion.evaluate(&path);
            }
        });

        debug!(
            from,
            to,
            max_legs,
            criteria = criteria.len(),
            completed = stats.completed,
            explored = stats.explored,
            "Optimal path search complete"
        );

        stats
    }

    fn traverse<'g, F>(&'g self, from: &str, to: &str, max_legs: usize, mut emit: F) -> SearchStats
    where
        F: FnMut(Path<'g, E>),
    {
        let mut stats = SearchStats::default();

        if from == to {
            return stats;
        }
        let (Some(origin), Some(target)) = (self.node_index(from), self.node_index(to)) else {
            return stats;
        };

        let mut frontier: VecDeque<Partial<'g, E>> = self
            .edges_from(origin)
            .iter()
            .map(|edge| {
                let mut visited = vec![false; self.node_count()];
                visited[origin.0] = true;
                Partial {
                    edges: vec![edge],
                    visited,
                }
            })
            .collect();

        while let Some(mut partial) = frontier.pop_front() {
            stats.explored += 1;

            let last: &'g Edge<E> = partial.edges[partial.edges.len() - 1];

            if last.to == target {
                stats.completed += 1;
                emit(Path::from_edges(partial.edges));
                continue;
            }

            if max_legs > 0 && partial.edges.len() >= max_legs {
                stats.truncated += 1;
                continue;
            }

            partial.visited[last.to.0] = true;
            self.extend(&partial, last, &mut frontier);
        }

        stats
    }

    /// Push every feasible one-edge extension of `partial` onto the frontier.
    fn extend<'g>(
        &'g self,
        partial: &Partial<'g, E>,
        last: &'g Edge<E>,
        frontier: &mut VecDeque<Partial<'g, E>>,
    ) {
        for edge in self.edges_from(last.to) {
            if partial.visited[edge.to.0] {
                continue;
            }
            if !edge.value.is_reachable_from(&last.value, self.transfer_window) {
                trace!(
                    at = self.label(last.to).unwrap_or_default(),
                    next = self.label(edge.to).unwrap_or_default(),
                    "Connection too tight"
                );
                continue;
            }

            let mut edges = Vec::with_capacity(partial.edges.len() + 1);
            edges.extend_from_slice(&partial.edges);
            edges.push(edge);

            frontier.push_back(Partial {
                edges,
                visited: partial.visited.clone(),
            });
        }
    }
}
