//! Quantities: `{"quantity": n, "unit": "..."}` on the wire.

use serde::{Deserialize, Serialize};

use super::enums::Unit;
use crate::error::ApiError;

/// Currency amount in the smallest unit. Quantity is never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "AmountWire")]
pub struct Amount {
    pub quantity: u64,
    pub unit: Unit,
}

#[derive(Deserialize)]
struct AmountWire {
    quantity: u64,
    unit: Unit,
}

impl TryFrom<AmountWire> for Amount {
    type Error = String;
    fn try_from(wire: AmountWire) -> Result<Self, Self::Error> {
        if wire.unit != Unit::Entropic {
            return Err(format!("amount unit must be '{}', got '{}'", Unit::Entropic, wire.unit));
        }
        Ok(Amount { quantity: wire.quantity, unit: wire.unit })
    }
}

impl Amount {
    /// Build from a signed caller-side quantity; negatives are rejected.
    pub fn new(quantity: i64, unit: Unit) -> Result<Self, ApiError> {
        if quantity < 0 {
            return Err(ApiError::InvalidAmount(format!("quantity must be >= 0, got {quantity}")));
        }
        if unit != Unit::Entropic {
            return Err(ApiError::InvalidAmount(format!("amounts are denominated in '{}', got '{}'", Unit::Entropic, unit)));
        }
        Ok(Self { quantity: quantity as u64, unit })
    }

    pub fn entropic(quantity: u64) -> Self { Self { quantity, unit: Unit::Entropic } }
}

/// Non-currency measurement (progress, heights, durations).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity<Q> {
    pub quantity: Q,
    pub unit: Unit,
}

impl<Q> Quantity<Q> {
    pub fn new(quantity: Q, unit: Unit) -> Self { Self { quantity, unit } }
}
