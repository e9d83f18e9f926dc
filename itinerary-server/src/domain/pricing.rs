//! Price breakdown shared by the legs of an itinerary group.

use serde::{Deserialize, Serialize};

/// Charge type carrying the full fare.
pub const TOTAL_AMOUNT: &str = "TotalAmount";

/// Fare class the totals are reported for.
pub const SINGLE_ADULT: &str = "SingleAdult";

/// One line of a price breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCharge {
    pub amount: f64,
    /// Passenger fare class, e.g. "SingleAdult"
    #[serde(rename = "type")]
    pub fare_class: String,
    /// Charge type, e.g. "BaseFare" or "TotalAmount"
    pub charge_type: String,
}

/// Price breakdown for an itinerary group.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    pub currency: String,
    #[serde(default)]
    pub service_charges: Vec<ServiceCharge>,
}

impl Pricing {
    /// Returns the single-adult total fare, if the breakdown has one.
    ///
    /// Amounts are taken at face value; currencies are never converted.
    pub fn total_amount(&self) -> Option<f64> {
        self.service_charges
            .iter()
            .find(|c| c.charge_type == TOTAL_AMOUNT && c.fare_class == SINGLE_ADULT)
            .map(|c| c.amount)
    }
}

/// Returns the total fare of an optional pricing block.
pub fn total_amount_of(pricing: Option<&Pricing>) -> Option<f64> {
    pricing.and_then(Pricing::total_amount)
}
