//! Order Model

use std::{fmt, str::FromStr};

use jiff::{Timestamp, civil::Date};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    access::UserUuid, orders::status::OrderStatus, properties::UnknownVariant, uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// How the buyer intends to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Mortgage,
    Installment,
}

impl PaymentMethod {
    /// Storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Mortgage => "mortgage",
            Self::Installment => "installment",
        }
    }

    /// Factor applied once to the order subtotal.
    pub fn multiplier(self) -> Decimal {
        match self {
            Self::Cash => Decimal::new(95, 2),
            Self::Mortgage => Decimal::new(98, 2),
            Self::Installment => Decimal::ONE,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(Self::Cash),
            "mortgage" => Ok(Self::Mortgage),
            "installment" => Ok(Self::Installment),
            other => Err(UnknownVariant {
                kind: "payment method",
                value: other.to_string(),
            }),
        }
    }
}

/// Buyer contact details and payment choice, filled in while drafting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientDetails {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub payment_method: Option<PaymentMethod>,
}

/// Fields that must be present before an order can be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredField {
    ClientName,
    ClientPhone,
    ClientEmail,
    PaymentMethod,
    /// At least one property line.
    Lines,
}

/// Client fields checked at submission, in reporting order.
pub const REQUIRED_CLIENT_FIELDS: [RequiredField; 4] = [
    RequiredField::ClientName,
    RequiredField::ClientPhone,
    RequiredField::ClientEmail,
    RequiredField::PaymentMethod,
];

impl RequiredField {
    /// Field name as shown to users.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ClientName => "client_name",
            Self::ClientPhone => "client_phone",
            Self::ClientEmail => "client_email",
            Self::PaymentMethod => "payment_method",
            Self::Lines => "lines",
        }
    }

    /// Whether `details` carries a non-empty value for this field.
    /// Whitespace is a value; only `None` and `""` are missing.
    /// [`RequiredField::Lines`] is not a client field and is never present.
    pub fn is_present(self, details: &ClientDetails) -> bool {
        let text = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.is_empty());

        match self {
            Self::ClientName => text(&details.name),
            Self::ClientPhone => text(&details.phone),
            Self::ClientEmail => text(&details.email),
            Self::PaymentMethod => details.payment_method.is_some(),
            Self::Lines => false,
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every field missing from a submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingFields(pub Vec<RequiredField>);

impl MissingFields {
    /// Collect every missing client field plus the line requirement.
    pub fn check(details: &ClientDetails, line_count: usize) -> Self {
        let mut missing: Vec<RequiredField> = REQUIRED_CLIENT_FIELDS
            .into_iter()
            .filter(|field| !field.is_present(details))
            .collect();

        if line_count == 0 {
            missing.push(RequiredField::Lines);
        }

        Self(missing)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: RequiredField) -> bool {
        self.0.contains(&field)
    }
}

impl fmt::Display for MissingFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(field.as_str())?;
        }

        Ok(())
    }
}

/// Order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub uuid: OrderUuid,
    pub status: OrderStatus,
    pub created_at: Timestamp,
    pub formed_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub creator: UserUuid,
    pub moderator: Option<UserUuid>,
    pub client: ClientDetails,
    pub total_price: Decimal,
    pub estimated_delivery_date: Option<Date>,
}

impl Order {
    /// A fresh, empty draft owned by `creator`.
    pub fn draft(creator: UserUuid, now: Timestamp) -> Self {
        Self {
            uuid: OrderUuid::new(),
            status: OrderStatus::Draft,
            created_at: now,
            formed_at: None,
            completed_at: None,
            creator,
            moderator: None,
            client: ClientDetails::default(),
            total_price: Decimal::ZERO,
            estimated_delivery_date: None,
        }
    }

    pub fn payment_method(&self) -> Option<PaymentMethod> {
        self.client.payment_method
    }
}
