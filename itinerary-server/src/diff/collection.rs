//! Keyed collections the diff engine compares.

use std::collections::HashMap;
use std::collections::hash_map;

use serde::Serialize;

use crate::domain::{Dataset, FlightItem, Route};

/// An item the diff engine can match up and compare.
pub trait Diffable: Serialize + Clone + Send + Sync + 'static {
    /// Identity key. Items with equal keys in two collections are compared.
    fn key(&self) -> String;

    /// Returns true if the pair should be sent to a worker at all.
    fn needs_comparison(&self, other: &Self) -> bool;

    /// Returns true if a compared pair is reported even when its changelog
    /// comes back empty.
    fn report_empty_changelog(&self) -> bool;
}

impl Diffable for FlightItem {
    fn key(&self) -> String {
        FlightItem::key(self)
    }

    fn needs_comparison(&self, other: &Self) -> bool {
        self.flight != other.flight || self.pricing != other.pricing
    }

    fn report_empty_changelog(&self) -> bool {
        true
    }
}

impl Diffable for Route {
    fn key(&self) -> String {
        Route::key(self)
    }

    fn needs_comparison(&self, _other: &Self) -> bool {
        true
    }

    fn report_empty_changelog(&self) -> bool {
        false
    }
}

/// Items indexed by their [`Diffable::key`].
///
/// When two items share a key the later one wins.
#[derive(Debug, Clone)]
pub struct KeyedCollection<T> {
    items: HashMap<String, T>,
}

/// Every leg of a dataset, by flight key.
pub type FlightsList = KeyedCollection<FlightItem>;

/// Routes, by route key.
pub type RoutesList = KeyedCollection<Route>;

impl<T: Diffable> KeyedCollection<T> {
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
        }
    }

    /// Insert an item, replacing any item with the same key.
    pub fn insert(&mut self, item: T) -> Option<T> {
        self.items.insert(item.key(), item)
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.items.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over `(key, item)` pairs in arbitrary order.
    pub fn iter(&self) -> hash_map::Iter<'_, String, T> {
        self.items.iter()
    }
}

impl<T: Diffable> Default for KeyedCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Diffable> FromIterator<T> for KeyedCollection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut collection = Self::new();
        for item in iter {
            collection.insert(item);
        }
        collection
    }
}

impl FlightsList {
    /// Every leg of every group in the dataset.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        dataset.flight_items().into_iter().collect()
    }
}
