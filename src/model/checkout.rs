//! # Checkout Dialogue
//!
//! The finite-state machine that collects order details over several user turns:
//!
//! ```text
//! None ──checkout (cart not empty)──▶ AskName ──name──▶ AskPhone ──valid phone──▶ AskDelivery
//! AskDelivery ──pickup──▶ Confirm            AskDelivery ──courier──▶ AskAddress ──address──▶ Confirm
//! Confirm ──confirm──▶ None (order placed)   any ──cancel──▶ None
//! ```
//!
//! Invalid input leaves the state untouched so the same question can be asked again.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;
use thiserror::Error;

/// Minimum number of digits in a phone number, after an optional leading `+`.
pub const MIN_PHONE_DIGITS: usize = 11;

/// Minimum length of a trimmed delivery address, in characters.
pub const MIN_ADDRESS_CHARS: usize = 5;

/// Address recorded for orders collected in store.
pub const PICKUP_ADDRESS: &str = "Pickup";

/// Which field the dialogue is waiting for, or `None` when no checkout is running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckoutState {
    #[default]
    None,
    AskName,
    AskPhone,
    AskDelivery,
    AskAddress,
    Confirm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeliveryMethod {
    Pickup,
    Courier,
}

impl DeliveryMethod {
    /// Token used inside `checkout:delivery:<token>` actions.
    pub fn token(self) -> &'static str {
        match self {
            DeliveryMethod::Pickup => "pickup",
            DeliveryMethod::Courier => "courier",
        }
    }
}

impl FromStr for DeliveryMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pickup" => Ok(DeliveryMethod::Pickup),
            "courier" => Ok(DeliveryMethod::Courier),
            other => Err(ValidationError::UnknownDelivery(other.to_string())),
        }
    }
}

impl Display for DeliveryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryMethod::Pickup => f.write_str("Pickup"),
            DeliveryMethod::Courier => f.write_str("Courier"),
        }
    }
}

/// Rejected free-text or button input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("phone number must have at least 11 digits and an optional leading '+'")]
    InvalidPhone,
    #[error("address must have at least 5 characters")]
    AddressTooShort,
    #[error("unknown delivery method: {0}")]
    UnknownDelivery(String),
}

/// Why the dialogue refused to move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("the cart is empty")]
    EmptyCart,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("input does not apply while in state {0:?}")]
    UnexpectedInput(CheckoutState),
    #[error("checkout details are incomplete")]
    Incomplete,
}

pub fn validate_name(text: &str) -> Result<String, ValidationError> {
    let name = text.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(name.to_string())
}

/// Accepts `+79991234567` and `89991234567`; rejects anything with non-digits or fewer than
/// [`MIN_PHONE_DIGITS`] digits.
pub fn validate_phone(text: &str) -> Result<String, ValidationError> {
    let phone = text.trim();
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    if digits.len() < MIN_PHONE_DIGITS || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidPhone);
    }
    Ok(phone.to_string())
}

pub fn validate_address(text: &str) -> Result<String, ValidationError> {
    let address = text.trim();
    if address.chars().count() < MIN_ADDRESS_CHARS {
        return Err(ValidationError::AddressTooShort);
    }
    Ok(address.to_string())
}

/// Order fields collected so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutData {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub delivery: Option<DeliveryMethod>,
    pub address: Option<String>,
}

/// A fully filled-in [`CheckoutData`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutDetails {
    pub name: String,
    pub phone: String,
    pub delivery: DeliveryMethod,
    pub address: String,
}

impl CheckoutData {
    pub fn complete(&self) -> Option<CheckoutDetails> {
        Some(CheckoutDetails {
            name: self.name.clone()?,
            phone: self.phone.clone()?,
            delivery: self.delivery?,
            address: self.address.clone()?,
        })
    }
}

/// The dialogue state plus the data gathered so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkout {
    state: CheckoutState,
    data: CheckoutData,
}

impl Checkout {
    pub fn state(&self) -> CheckoutState {
        self.state
    }

    pub fn data(&self) -> &CheckoutData {
        &self.data
    }

    pub fn is_active(&self) -> bool {
        self.state != CheckoutState::None
    }

    /// Starts (or restarts) the dialogue. Refused while the cart is empty.
    pub fn start(&mut self, cart_count: u32) -> Result<CheckoutState, CheckoutError> {
        if cart_count == 0 {
            return Err(CheckoutError::EmptyCart);
        }
        self.data = CheckoutData::default();
        self.state = CheckoutState::AskName;
        Ok(self.state)
    }

    /// Back to `None` with empty data. Used for cancel, completion and defensive resets.
    pub fn reset(&mut self) {
        self.state = CheckoutState::None;
        self.data = CheckoutData::default();
    }

    /// Feeds a free-text message to the dialogue and returns the state now awaiting input.
    ///
    /// Text is only consumed by `AskName`, `AskPhone` and `AskAddress`; in every other state it
    /// is ignored and the current state is returned unchanged.
    pub fn submit_text(&mut self, text: &str) -> Result<CheckoutState, CheckoutError> {
        match self.state {
            CheckoutState::AskName => {
                self.data.name = Some(validate_name(text)?);
                self.state = CheckoutState::AskPhone;
            }
            CheckoutState::AskPhone => {
                self.data.phone = Some(validate_phone(text)?);
                self.state = CheckoutState::AskDelivery;
            }
            CheckoutState::AskAddress => {
                self.data.address = Some(validate_address(text)?);
                self.state = CheckoutState::Confirm;
            }
            CheckoutState::None | CheckoutState::AskDelivery | CheckoutState::Confirm => {}
        }
        Ok(self.state)
    }

    /// Records the delivery method. Only valid while waiting for it.
    pub fn choose_delivery(
        &mut self,
        method: DeliveryMethod,
    ) -> Result<CheckoutState, CheckoutError> {
        if self.state != CheckoutState::AskDelivery {
            return Err(CheckoutError::UnexpectedInput(self.state));
        }
        self.data.delivery = Some(method);
        self.state = match method {
            DeliveryMethod::Pickup => {
                self.data.address = Some(PICKUP_ADDRESS.to_string());
                CheckoutState::Confirm
            }
            DeliveryMethod::Courier => CheckoutState::AskAddress,
        };
        Ok(self.state)
    }

    /// Details to finalize with; requires `Confirm` and every field present.
    pub fn ready(&self) -> Result<CheckoutDetails, CheckoutError> {
        if self.state != CheckoutState::Confirm {
            return Err(CheckoutError::Incomplete);
        }
        self.data.complete().ok_or(CheckoutError::Incomplete)
    }
}
