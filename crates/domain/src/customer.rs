//! Customer records captured at checkout.

use common::{CartId, CustomerId};
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, require_text};

/// A customer captured against a cart.
///
/// Record-only: no accounts, no authentication. The cart reference ties
/// the purchase summary to what was actually bought.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Unique identifier.
    pub id: CustomerId,

    /// The cart this customer checked out.
    pub cart_id: CartId,

    /// First name.
    pub name: String,

    /// Family name.
    pub surname: String,

    /// Postal address.
    pub address: String,

    /// Email address the purchase summary goes to.
    pub email: String,

    /// Contact phone number.
    pub phone: String,
}

/// Input for capturing a customer.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCustomer {
    /// The cart being checked out.
    pub cart: CartId,

    /// First name.
    pub name: String,

    /// Family name.
    pub surname: String,

    /// Postal address.
    pub address: String,

    /// Email address.
    pub email: String,

    /// Contact phone number.
    pub phone: String,
}

impl Customer {
    /// Creates a customer from validated input.
    pub fn create(input: NewCustomer) -> Result<Self, ValidationError> {
        require_text("name", &input.name)?;
        require_text("surname", &input.surname)?;
        require_text("address", &input.address)?;
        require_text("phone", &input.phone)?;
        validate_email(&input.email)?;

        Ok(Self {
            id: CustomerId::new(),
            cart_id: input.cart,
            name: input.name,
            surname: input.surname,
            address: input.address,
            email: input.email,
            phone: input.phone,
        })
    }
}

/// Checks the minimal address shape: one `@` with text on both sides.
fn validate_email(email: &str) -> Result<(), ValidationError> {
    require_text("email", email)?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ValidationError::new(
            "email",
            "must be an email address like name@example.com",
        )),
    }
}
