//! Properties
//!
//! Catalog entries that can be placed into an order. Properties are never
//! removed; they are deactivated and then hidden from listings and carts.

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::uuids::TypedUuid;

/// Property UUID
pub type PropertyUuid = TypedUuid<Property>;

/// Decimal places allowed on prices and areas.
pub const MONEY_SCALE: u32 = 2;

/// Property category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    /// Flat in a multi-storey building.
    Apartment,
    /// Detached house.
    House,
    /// Office or retail space.
    Commercial,
    /// Land plot.
    Land,
}

impl PropertyKind {
    /// Storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Apartment => "apartment",
            Self::House => "house",
            Self::Commercial => "commercial",
            Self::Land => "land",
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised enum value read from storage or user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownVariant {
    /// Which enum was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl FromStr for PropertyKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "apartment" => Ok(Self::Apartment),
            "house" => Ok(Self::House),
            "commercial" => Ok(Self::Commercial),
            "land" => Ok(Self::Land),
            other => Err(UnknownVariant {
                kind: "property kind",
                value: other.to_string(),
            }),
        }
    }
}

/// Property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub uuid: PropertyUuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub area: Decimal,
    pub address: String,
    pub rooms: u32,
    pub floor: Option<u32>,
    pub total_floors: Option<u32>,
    pub kind: PropertyKind,
    pub active: bool,
    pub image_key: Option<String>,
}

/// New Property
#[derive(Debug, Clone, PartialEq)]
pub struct NewProperty {
    pub uuid: PropertyUuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub area: Decimal,
    pub address: String,
    pub rooms: u32,
    pub floor: Option<u32>,
    pub total_floors: Option<u32>,
    pub kind: PropertyKind,
    pub image_key: Option<String>,
}

/// Reasons a property definition is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    /// Property name was blank.
    #[error("property name cannot be empty")]
    EmptyName,

    /// Price was negative.
    #[error("price cannot be negative: {0}")]
    NegativePrice(Decimal),

    /// Price had more than two decimal places.
    #[error("price has too many decimal places: {0}")]
    PricePrecision(Decimal),

    /// Area was negative.
    #[error("area cannot be negative: {0}")]
    NegativeArea(Decimal),

    /// Area had more than two decimal places.
    #[error("area has too many decimal places: {0}")]
    AreaPrecision(Decimal),

    /// Floor numbers start at one.
    #[error("floor numbers must be positive")]
    NonPositiveFloor,
}

impl NewProperty {
    /// Check the invariants a catalog entry must hold before it is stored.
    ///
    /// # Errors
    ///
    /// Returns the first [`PropertyError`] found.
    pub fn validate(&self) -> Result<(), PropertyError> {
        if self.name.trim().is_empty() {
            return Err(PropertyError::EmptyName);
        }

        if self.price < Decimal::ZERO {
            return Err(PropertyError::NegativePrice(self.price));
        }

        if !fits_scale(self.price) {
            return Err(PropertyError::PricePrecision(self.price));
        }

        if self.area < Decimal::ZERO {
            return Err(PropertyError::NegativeArea(self.area));
        }

        if !fits_scale(self.area) {
            return Err(PropertyError::AreaPrecision(self.area));
        }

        if matches!(self.floor, Some(0)) || matches!(self.total_floors, Some(0)) {
            return Err(PropertyError::NonPositiveFloor);
        }

        Ok(())
    }

    /// Build the stored entity. New properties start active.
    pub fn into_property(self) -> Property {
        Property {
            uuid: self.uuid,
            name: self.name,
            description: self.description,
            price: self.price,
            area: self.area,
            address: self.address,
            rooms: self.rooms,
            floor: self.floor,
            total_floors: self.total_floors,
            kind: self.kind,
            active: true,
            image_key: self.image_key,
        }
    }
}

/// Whether `value` has at most [`MONEY_SCALE`] significant decimal places.
pub(crate) fn fits_scale(value: Decimal) -> bool {
    value.normalize().scale() <= MONEY_SCALE
}
