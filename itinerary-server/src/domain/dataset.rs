//! Parsed fare-search datasets.
//!
//! A dataset is a list of itinerary groups. Each group has onward legs,
//! optional return legs, and one price breakdown that applies to the whole
//! group.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{DomainError, Flight, FlightItem, Pricing};

/// One priced itinerary group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricedItinerary {
    #[serde(default)]
    pub onward: Vec<Flight>,
    #[serde(default, rename = "return")]
    pub return_legs: Vec<Flight>,
    #[serde(default)]
    pub pricing: Option<Pricing>,
}

impl PricedItinerary {
    /// Returns the group's legs as records sharing one pricing block.
    ///
    /// Onward legs come first, then return legs.
    pub fn flight_items(&self) -> Vec<FlightItem> {
        let pricing = self.pricing.clone().map(Arc::new);
        self.onward
            .iter()
            .chain(&self.return_legs)
            .map(|flight| FlightItem::new(Arc::new(flight.clone()), pricing.clone()))
            .collect()
    }
}

/// A whole parsed fare-search response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub itineraries: Vec<PricedItinerary>,
}

impl Dataset {
    /// Parse a dataset from its JSON rendition.
    pub fn from_json(s: &str) -> Result<Self, DomainError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Read and parse a dataset file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Returns every leg of every group, in document order.
    pub fn flight_items(&self) -> Vec<FlightItem> {
        self.itineraries
            .iter()
            .flat_map(PricedItinerary::flight_items)
            .collect()
    }

    /// Total number of legs across all groups.
    pub fn leg_count(&self) -> usize {
        self.itineraries
            .iter()
            .map(|i| i.onward.len() + i.return_legs.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::flight::fixtures::flight;
    use crate::domain::pricing::fixtures::priced;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "itineraries": [
            {
                "onward": [
                    {
                        "carrier": { "name": "AA", "id": "AA" },
                        "flightNumber": "100",
                        "source": "SEA",
                        "destination": "ORD",
                        "departureTimeStamp": "2024-05-01T1000",
                        "arrivalTimeStamp": "2024-05-01T1300",
                        "class": "Y",
                        "fareBasis": "Q1"
                    }
                ],
                "return": [
                    {
                        "carrier": { "name": "AA" },
                        "flightNumber": "101",
                        "source": "ORD",
                        "destination": "SEA",
                        "departureTimeStamp": "2024-05-03T0900",
                        "arrivalTimeStamp": "2024-05-03T1130",
                        "class": "Y",
                        "fareBasis": "Q1"
                    }
                ],
                "pricing": {
                    "currency": "USD",
                    "serviceCharges": [
                        { "amount": 320.5, "type": "SingleAdult", "chargeType": "TotalAmount" }
                    ]
                }
            },
            { "onward": [] }
        ]
    }"#;

    #[test]
    fn parse_sample() {
        let dataset = Dataset::from_json(SAMPLE).unwrap();
        assert_eq!(dataset.itineraries.len(), 2);
        assert_eq!(dataset.leg_count(), 2);

        let items = dataset.flight_items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].flight.flight_number, "100");
        assert_eq!(items[1].flight.flight_number, "101");
        assert!(dataset.itineraries[1].pricing.is_none());
    }

    #[test]
    fn group_legs_share_pricing() {
        let group = PricedItinerary {
            onward: vec![flight("1", "SEA", "ORD", "0900", "1200")],
            return_legs: vec![flight("2", "ORD", "SEA", "1400", "1700")],
            pricing: Some(priced(99.0)),
        };

        let items = group.flight_items();
        let first = items[0].pricing.as_ref().unwrap();
        let second = items[1].pricing.as_ref().unwrap();
        assert!(Arc::ptr_eq(first, second));
    }

    #[test]
    fn invalid_json_rejected() {
        assert!(matches!(
            Dataset::from_json("{\"itineraries\": 3}"),
            Err(DomainError::InvalidDataset(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let dataset = Dataset::from_path(file.path()).unwrap();
        assert_eq!(dataset.leg_count(), 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Dataset::from_path(dir.path().join("absent.json"));
        assert!(matches!(result, Err(DomainError::Io(_))));
    }
}
