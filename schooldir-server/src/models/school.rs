//! School records
//!
//! `SchoolForm` is the raw submission, `NewSchool` the trimmed and validated
//! candidate, `School` the persisted row.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::ValidationError;

/// Server-assigned record identifier
pub type SchoolId = i64;

/// `local@domain.tld` with no whitespace and a single `@`
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid email regex"));

/// Exactly ten ASCII digits
static CONTACT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("invalid contact regex"));

/// Persisted school row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct School {
    pub id: SchoolId,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub contact: String,
    pub email: String,
    #[sqlx(rename = "imagePath")]
    pub image_path: Option<String>,
    #[sqlx(rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Raw text fields of a registration, as submitted
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchoolForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub email: String,
}

impl SchoolForm {
    /// Assign a named form field. Returns false for names that aren't part
    /// of a registration.
    pub fn set(&mut self, field: &str, value: String) -> bool {
        let slot = match field {
            "name" => &mut self.name,
            "address" => &mut self.address,
            "city" => &mut self.city,
            "state" => &mut self.state,
            "contact" => &mut self.contact,
            "email" => &mut self.email,
            _ => return false,
        };
        *slot = value;
        true
    }
}

/// Validated, trimmed school candidate ready for insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSchool {
    name: String,
    address: String,
    city: String,
    state: String,
    contact: String,
    email: String,
}

impl NewSchool {
    /// Trim and validate a submission.
    ///
    /// # Rules
    /// - name, address, city, state, contact, email are required, checked
    ///   in that order; the first empty one is reported
    /// - email must look like `local@domain.tld`
    /// - contact must be exactly 10 digits
    ///
    /// # Example
    /// ```
    /// use schooldir_server::models::{NewSchool, SchoolForm};
    ///
    /// let form = SchoolForm {
    ///     name: " Green Valley High ".into(),
    ///     address: "123 Park Ave".into(),
    ///     city: "Delhi".into(),
    ///     state: "Delhi".into(),
    ///     contact: "9999999999".into(),
    ///     email: "gvh@example.com".into(),
    /// };
    /// let school = NewSchool::from_form(form).unwrap();
    /// assert_eq!(school.name(), "Green Valley High");
    /// ```
    pub fn from_form(form: SchoolForm) -> Result<Self, ValidationError> {
        let school = Self {
            name: required("name", &form.name)?,
            address: required("address", &form.address)?,
            city: required("city", &form.city)?,
            state: required("state", &form.state)?,
            contact: required("contact", &form.contact)?,
            email: required("email", &form.email)?,
        };

        if !EMAIL_RE.is_match(&school.email) {
            return Err(ValidationError::InvalidFormat {
                field: "email",
                reason: "Invalid email format.",
            });
        }

        if !CONTACT_RE.is_match(&school.contact) {
            return Err(ValidationError::InvalidFormat {
                field: "contact",
                reason: "Contact must be 10 digits.",
            });
        }

        Ok(school)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn contact(&self) -> &str {
        &self.contact
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Missing { field });
    }
    Ok(trimmed.to_owned())
}
