//! Form payloads and their validation

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::remote::Registration;

/// Field name to error message
pub type FieldErrors = BTreeMap<&'static str, String>;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if self.name.trim().is_empty() {
            errors.insert("name", "Please enter your name".to_string());
        }
        if !is_valid_email(self.email.trim()) {
            errors.insert("email", "Please enter a valid email address".to_string());
        }
        if !self.phone.trim().is_empty() && !is_valid_phone(&self.phone) {
            errors.insert("phone", "Phone number must have 9 to 15 digits".to_string());
        }
        if self.password.chars().count() < 8 {
            errors.insert("password", "Password must be at least 8 characters".to_string());
        }
        if self.password != self.confirm_password {
            errors.insert("confirm_password", "Passwords do not match".to_string());
        }

        errors
    }

    pub fn to_registration(&self) -> Registration {
        let phone = self.phone.trim();
        Registration {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            phone: (!phone.is_empty()).then(|| phone.to_string()),
        }
    }
}

/// Tests a customer can book
pub const BOOKABLE_SERVICES: &[(&str, &str)] = &[
    ("paternity", "Paternity test"),
    ("maternity", "Maternity test"),
    ("sibling", "Sibling relationship test"),
    ("ancestry", "Ancestry test"),
    ("legal-paternity", "Legal paternity test (court admissible)"),
];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BookingForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub appointment_date: String,
    #[serde(default)]
    pub collection: String,
    #[serde(default)]
    pub notes: String,
}

impl BookingForm {
    /// Check the form; `today` is passed in so the date rule stays testable
    pub fn validate(&self, today: NaiveDate) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if self.full_name.trim().is_empty() {
            errors.insert("full_name", "Please enter the full name".to_string());
        }
        if !is_valid_phone(&self.phone) {
            errors.insert("phone", "Phone number must have 9 to 15 digits".to_string());
        }
        if !BOOKABLE_SERVICES.iter().any(|(value, _)| *value == self.service) {
            errors.insert("service", "Please choose a test".to_string());
        }
        match NaiveDate::parse_from_str(self.appointment_date.trim(), "%Y-%m-%d") {
            Ok(date) if date < today => {
                errors.insert(
                    "appointment_date",
                    "Appointment date cannot be in the past".to_string(),
                );
            }
            Ok(_) => {}
            Err(_) => {
                errors.insert("appointment_date", "Please pick a date".to_string());
            }
        }
        if !matches!(self.collection.as_str(), "home" | "clinic") {
            errors.insert("collection", "Choose home kit or clinic visit".to_string());
        }

        errors
    }

    /// Body sent to the remote `bookings` collection
    pub fn to_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "fullName": self.full_name.trim(),
            "phone": normalize_phone(&self.phone),
            "service": self.service,
            "appointmentDate": self.appointment_date.trim(),
            "collectionMethod": self.collection,
            "notes": self.notes.trim(),
        })
    }
}

fn is_valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        _ => false,
    }
}

/// Strip spaces and dashes, keep an optional leading `+`
fn normalize_phone(phone: &str) -> String {
    phone
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-'))
        .collect()
}

fn is_valid_phone(phone: &str) -> bool {
    let normalized = normalize_phone(phone);
    let digits = normalized.strip_prefix('+').unwrap_or(&normalized);
    (9..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}
