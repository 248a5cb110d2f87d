use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ParseError;

/// An image attached to a contact (scanned card front, back, PDF page...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub name: String,
    pub path: String,
}

/// A named free-form note. The raw OCR text is stored as one of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEntry {
    pub name: String,
    pub content: String,
}

/// Structured contact record.
///
/// Scalar fields are plain strings where `""` means unset. `images` and
/// `notes` keep display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactFields {
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub job_title: String,
    pub email: String,
    pub mobile_phone: String,
    pub business_phone: String,
    /// Street line and city/state/zip line joined by `\n`
    pub address: String,
    pub images: Vec<ImageRef>,
    pub notes: Vec<NoteEntry>,
}

impl ContactFields {
    pub fn get(&self, field: ContactField) -> &str {
        match field {
            ContactField::FirstName => &self.first_name,
            ContactField::LastName => &self.last_name,
            ContactField::Company => &self.company,
            ContactField::JobTitle => &self.job_title,
            ContactField::Email => &self.email,
            ContactField::MobilePhone => &self.mobile_phone,
            ContactField::BusinessPhone => &self.business_phone,
            ContactField::Address => &self.address,
        }
    }

    pub fn set(&mut self, field: ContactField, value: impl Into<String>) {
        let slot = match field {
            ContactField::FirstName => &mut self.first_name,
            ContactField::LastName => &mut self.last_name,
            ContactField::Company => &mut self.company,
            ContactField::JobTitle => &mut self.job_title,
            ContactField::Email => &mut self.email,
            ContactField::MobilePhone => &mut self.mobile_phone,
            ContactField::BusinessPhone => &mut self.business_phone,
            ContactField::Address => &mut self.address,
        };
        *slot = value.into();
    }

    /// True for a freshly created manual-entry record
    pub fn is_blank(&self) -> bool {
        ContactField::ALL
            .iter()
            .all(|field| self.get(*field).trim().is_empty())
            && self.images.is_empty()
            && self.notes.is_empty()
    }

    /// Fields that currently hold a non-empty value, in declaration order
    pub fn filled_fields(&self) -> Vec<ContactField> {
        ContactField::ALL
            .iter()
            .copied()
            .filter(|field| !self.get(*field).trim().is_empty())
            .collect()
    }
}

/// Scalar field of a [`ContactFields`] record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    FirstName,
    LastName,
    Company,
    JobTitle,
    Email,
    MobilePhone,
    BusinessPhone,
    Address,
}

impl ContactField {
    pub const ALL: [ContactField; 8] = [
        ContactField::FirstName,
        ContactField::LastName,
        ContactField::Company,
        ContactField::JobTitle,
        ContactField::Email,
        ContactField::MobilePhone,
        ContactField::BusinessPhone,
        ContactField::Address,
    ];

    /// Fields compared during a merge. Names are excluded: they are what the
    /// duplicate match was made on.
    pub const COMPARABLE: [ContactField; 6] = [
        ContactField::Company,
        ContactField::JobTitle,
        ContactField::Email,
        ContactField::MobilePhone,
        ContactField::BusinessPhone,
        ContactField::Address,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContactField::FirstName => "first_name",
            ContactField::LastName => "last_name",
            ContactField::Company => "company",
            ContactField::JobTitle => "job_title",
            ContactField::Email => "email",
            ContactField::MobilePhone => "mobile_phone",
            ContactField::BusinessPhone => "business_phone",
            ContactField::Address => "address",
        }
    }
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactField {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        ContactField::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == normalized)
            .ok_or_else(|| ParseError::UnknownField(s.to_string()))
    }
}
