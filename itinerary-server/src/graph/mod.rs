//! Directed itinerary graph.
//!
//! Nodes are location labels, interned to dense indices the first time they
//! appear. Edges carry a payload (normally a `FlightItem`) and are stored in
//! an adjacency list indexed by source node. Parallel edges are expected:
//! many flights connect the same pair of airports.
//!
//! The graph is built once per dataset and is read-only afterwards. Paths
//! returned from a search borrow their edges from it.

mod search;

use std::collections::HashMap;

use chrono::Duration;
use tracing::debug;

use crate::domain::{Dataset, FlightItem, Priced, Scheduled, Timestamp};

pub use search::SearchStats;

/// Dense index of a node within one graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub usize);

/// A directed edge with its payload.
#[derive(Debug, Clone)]
pub struct Edge<E> {
    pub from: NodeIndex,
    pub to: NodeIndex,
    pub value: E,
}

/// Outcome of presenting a completed path to a criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The path is worse than the current best.
    Rejected,
    /// The path set a new best; previously collected paths were dropped.
    Improved,
    /// The path equals the current best and was added alongside it.
    Tied,
}

/// A rule that scores completed paths and keeps the optimal ones.
///
/// The graph calls `evaluate` once per completed path during
/// [`ItineraryGraph::search_optimal_paths`].
pub trait OptimalCriterion<'g, E> {
    fn evaluate(&mut self, path: &Path<'g, E>) -> Decision;
}

impl<'g, E, C> OptimalCriterion<'g, E> for &mut C
where
    C: OptimalCriterion<'g, E> + ?Sized,
{
    fn evaluate(&mut self, path: &Path<'g, E>) -> Decision {
        (**self).evaluate(path)
    }
}

/// An ordered, non-empty chain of edges borrowed from a graph.
///
/// # Invariants
///
/// - At least one edge
/// - `edges[i].to == edges[i + 1].from`
#[derive(Debug)]
pub struct Path<'g, E> {
    edges: Vec<&'g Edge<E>>,
}

impl<E> Clone for Path<'_, E> {
    fn clone(&self) -> Self {
        Self {
            edges: self.edges.clone(),
        }
    }
}

impl<'g, E> Path<'g, E> {
    pub(crate) fn from_edges(edges: Vec<&'g Edge<E>>) -> Self {
        debug_assert!(!edges.is_empty());
        Self { edges }
    }

    /// Returns the edges in order.
    pub fn edges(&self) -> &[&'g Edge<E>] {
        &self.edges
    }

    /// Returns the edge payloads in order.
    pub fn values(&self) -> impl Iterator<Item = &'g E> + '_ {
        self.edges.iter().map(|e| &e.value)
    }

    /// Number of edges (legs).
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Always false: paths have at least one edge.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Returns the nodes visited, origin first.
    pub fn nodes(&self) -> Vec<NodeIndex> {
        let mut nodes = Vec::with_capacity(self.edges.len() + 1);
        nodes.push(self.edges[0].from);
        nodes.extend(self.edges.iter().map(|e| e.to));
        nodes
    }

    fn first_value(&self) -> &'g E {
        &self.edges[0].value
    }

    fn last_value(&self) -> &'g E {
        &self.edges[self.edges.len() - 1].value
    }
}

impl<E: Scheduled> Path<'_, E> {
    /// Departure time of the first leg.
    pub fn departure(&self) -> Timestamp {
        self.first_value().departure()
    }

    /// Arrival time of the last leg.
    pub fn arrival(&self) -> Timestamp {
        self.last_value().arrival()
    }

    /// Time from first departure to last arrival.
    pub fn elapsed(&self) -> Duration {
        self.arrival().signed_duration_since(self.departure())
    }
}

impl<E: Priced> Path<'_, E> {
    /// Sum of every priced leg's total. Unpriced legs add nothing.
    pub fn total_cost(&self) -> f64 {
        self.values().filter_map(|v| v.total_amount()).sum()
    }
}

/// Directed multigraph over location labels.
#[derive(Debug, Clone)]
pub struct ItineraryGraph<E> {
    /// Outgoing edges, indexed by source node.
    edges: Vec<Vec<Edge<E>>>,
    /// Label of each node, indexed by node.
    labels: Vec<String>,
    /// Label to node lookup.
    indices: HashMap<String, NodeIndex>,
    /// Minimum time between landing and the next departure.
    transfer_window: Duration,
}

impl<E: Scheduled> ItineraryGraph<E> {
    /// Create an empty graph.
    pub fn new(transfer_window: Duration) -> Self {
        Self {
            edges: Vec::new(),
            labels: Vec::new(),
            indices: HashMap::new(),
            transfer_window,
        }
    }

    /// Add a directed edge, creating either node if it doesn't exist yet.
    ///
    /// Self-loops (`from == to`) are dropped.
    pub fn add_edge(&mut self, from: &str, to: &str, value: E) {
        if from == to {
            return;
        }

        let u = self.intern(from);
        let v = self.intern(to);
        self.edges[u.0].push(Edge {
            from: u,
            to: v,
            value,
        });
    }

    fn intern(&mut self, label: &str) -> NodeIndex {
        if let Some(&idx) = self.indices.get(label) {
            return idx;
        }
        let idx = NodeIndex(self.labels.len());
        self.labels.push(label.to_string());
        self.indices.insert(label.to_string(), idx);
        self.edges.push(Vec::new());
        idx
    }

    /// Returns the index of a label, if the graph knows it.
    pub fn node_index(&self, label: &str) -> Option<NodeIndex> {
        self.indices.get(label).copied()
    }

    /// Returns the label of a node.
    pub fn label(&self, node: NodeIndex) -> Option<&str> {
        self.labels.get(node.0).map(String::as_str)
    }

    /// Returns true if the label is a node of this graph.
    pub fn contains(&self, label: &str) -> bool {
        self.indices.contains_key(label)
    }

    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    /// Returns the outgoing edges of a node.
    pub fn edges_from(&self, node: NodeIndex) -> &[Edge<E>] {
        self.edges.get(node.0).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn transfer_window(&self) -> Duration {
        self.transfer_window
    }
}

impl ItineraryGraph<FlightItem> {
    /// Build the flight graph of a dataset.
    ///
    /// Every leg becomes an edge from its source to its destination. Legs
    /// that land where they took off are skipped.
    pub fn from_dataset(dataset: &Dataset, transfer_window: Duration) -> Self {
        let mut graph = Self::new(transfer_window);
        let mut loops = 0usize;
        for item in dataset.flight_items() {
            if item.flight.is_loop() {
                loops += 1;
                continue;
            }
            let (from, to) = (item.source().to_string(), item.destination().to_string());
            graph.add_edge(&from, &to, item);
        }

        debug!(
            legs = dataset.leg_count(),
            loops,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Built itinerary graph"
        );

        graph
    }
}
