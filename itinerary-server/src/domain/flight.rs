//! Flight leg types.

use serde::{Deserialize, Serialize};

use super::Timestamp;

/// The operating carrier of a flight.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Carrier {
    /// Carrier display name (e.g. "AirIndia")
    pub name: String,
    /// Carrier code (e.g. "AI")
    #[serde(default)]
    pub id: String,
}

/// One scheduled flight segment.
///
/// Field names on the wire follow the upstream fare-search response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub carrier: Carrier,
    pub flight_number: String,
    pub source: String,
    pub destination: String,
    #[serde(rename = "departureTimeStamp")]
    pub departure: Timestamp,
    #[serde(rename = "arrivalTimeStamp")]
    pub arrival: Timestamp,
    pub class: String,
    #[serde(default)]
    pub number_of_stops: u32,
    pub fare_basis: String,
    #[serde(default)]
    pub warning_text: String,
    #[serde(default)]
    pub ticket_type: String,
}

impl Flight {
    /// Identity key used to match the same leg across datasets.
    ///
    /// Built from carrier name, flight number, departure date and fare
    /// basis. Two distinct legs can share a key in pathological inputs;
    /// the later one wins wherever keys index a collection.
    ///
    /// # Examples
    ///
    /// ```
    /// use itinerary_server::domain::{Carrier, Flight, Timestamp};
    ///
    /// let flight = Flight {
    ///     carrier: Carrier { name: "AA".into(), id: "AA".into() },
    ///     flight_number: "100".into(),
    ///     source: "SEA".into(),
    ///     destination: "ORD".into(),
    ///     departure: Timestamp::parse("2024-05-01T1000").unwrap(),
    ///     arrival: Timestamp::parse("2024-05-01T1300").unwrap(),
    ///     class: "Y".into(),
    ///     number_of_stops: 0,
    ///     fare_basis: "Q1".into(),
    ///     warning_text: String::new(),
    ///     ticket_type: "E".into(),
    /// };
    ///
    /// assert_eq!(flight.key(), "AA:100:05-01-2024:Q1");
    /// ```
    pub fn key(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.carrier.name,
            self.flight_number,
            self.departure.date_key(),
            self.fare_basis
        )
    }

    /// Returns true if the flight departs and lands at the same location.
    pub fn is_loop(&self) -> bool {
        self.source == self.destination
    }
}
