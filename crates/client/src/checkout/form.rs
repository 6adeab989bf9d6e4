//! Checkout address form and its validation.
//!
//! Validation is synchronous, field-local, and re-run in full on every
//! submit attempt: every violated field reports simultaneously, nothing
//! short-circuits, and nothing reaches the network while any error stands.

use std::collections::BTreeMap;

use serde::Serialize;

use clementine_core::Email;

/// Shipping and contact details collected at checkout.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl Default for AddressForm {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            country: "India".to_owned(),
        }
    }
}

/// A form field, for attaching errors to inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    FirstName,
    LastName,
    Email,
    Phone,
    Address,
    City,
    State,
    ZipCode,
}

impl Field {
    /// The field's wire/DOM name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Address => "address",
            Self::City => "city",
            Self::State => "state",
            Self::ZipCode => "zipCode",
        }
    }
}

/// Field-scoped validation errors; at most one message per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    /// Whether any field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The message for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// All errors, in field order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    fn require(&mut self, field: Field, value: &str, message: &str) -> bool {
        if value.trim().is_empty() {
            self.0.insert(field, message.to_owned());
            false
        } else {
            true
        }
    }
}

/// Validate the whole form. Fields validate independently, so a single
/// pass reports every violation at once.
pub fn validate(form: &AddressForm) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();

    errors.require(Field::FirstName, &form.first_name, "First name is required");
    errors.require(Field::LastName, &form.last_name, "Last name is required");
    errors.require(Field::Address, &form.address, "Address is required");
    errors.require(Field::City, &form.city, "City is required");
    errors.require(Field::State, &form.state, "State is required");

    if errors.require(Field::Email, &form.email, "Email is required")
        && Email::parse(form.email.trim()).is_err()
    {
        errors
            .0
            .insert(Field::Email, "Enter a valid email address".to_owned());
    }

    if errors.require(Field::Phone, &form.phone, "Phone number is required")
        && !is_exact_digits(form.phone.trim(), 10)
    {
        errors
            .0
            .insert(Field::Phone, "Phone number must be 10 digits".to_owned());
    }

    if errors.require(Field::ZipCode, &form.zip_code, "ZIP code is required")
        && !is_exact_digits(form.zip_code.trim(), 6)
    {
        errors
            .0
            .insert(Field::ZipCode, "ZIP code must be 6 digits".to_owned());
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn is_exact_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> AddressForm {
        AddressForm {
            first_name: "Asha".to_owned(),
            last_name: "Rao".to_owned(),
            email: "asha@example.com".to_owned(),
            phone: "9876543210".to_owned(),
            address: "12 MG Road".to_owned(),
            city: "Bengaluru".to_owned(),
            state: "Karnataka".to_owned(),
            zip_code: "560001".to_owned(),
            country: "India".to_owned(),
        }
    }

    #[test]
    fn filled_form_passes() {
        assert!(validate(&filled_form()).is_ok());
    }

    #[test]
    fn country_is_defaulted_and_never_validated() {
        let mut form = filled_form();
        form.country = String::new();
        assert!(validate(&form).is_ok());
        assert_eq!(AddressForm::default().country, "India");
    }

    #[test]
    fn phone_must_be_exactly_ten_digits() {
        let mut form = filled_form();

        form.phone = "12345".to_owned();
        let errors = validate(&form).unwrap_err();
        assert_eq!(errors.get(Field::Phone), Some("Phone number must be 10 digits"));

        form.phone = "1234567890".to_owned();
        assert!(validate(&form).is_ok());

        form.phone = "12345678901".to_owned();
        assert!(validate(&form).is_err());

        form.phone = "123456789x".to_owned();
        assert!(validate(&form).is_err());
    }

    #[test]
    fn zip_must_be_exactly_six_digits() {
        let mut form = filled_form();

        form.zip_code = "12345".to_owned();
        let errors = validate(&form).unwrap_err();
        assert_eq!(errors.get(Field::ZipCode), Some("ZIP code must be 6 digits"));

        form.zip_code = "123456".to_owned();
        assert!(validate(&form).is_ok());
    }

    #[test]
    fn email_must_look_like_a_mailbox() {
        let mut form = filled_form();
        form.email = "not-an-email".to_owned();
        let errors = validate(&form).unwrap_err();
        assert_eq!(errors.get(Field::Email), Some("Enter a valid email address"));
    }

    #[test]
    fn all_violations_report_simultaneously() {
        let errors = validate(&AddressForm::default()).unwrap_err();
        assert_eq!(errors.iter().count(), 8);
        assert_eq!(errors.get(Field::Email), Some("Email is required"));
    }

    #[test]
    fn whitespace_only_fields_are_empty() {
        let mut form = filled_form();
        form.city = "   ".to_owned();
        let errors = validate(&form).unwrap_err();
        assert_eq!(errors.get(Field::City), Some("City is required"));
    }
}
