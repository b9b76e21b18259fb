//! Customer profile and its editable draft.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::id::UserId;

/// A customer profile as owned by the identity provider.
///
/// Every attribute is optional because the provider may omit any of them.
/// Attributes this crate does not model are kept in `extra` so that replacing
/// the profile after an update never drops them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    /// Account status (e.g., `active`). Not editable by the customer.
    pub status: Option<String>,
    /// When the account was created. Not editable by the customer.
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserProfile {
    /// Returns a copy of this profile with every draft field applied.
    ///
    /// Identity and server-owned attributes (`id`, `status`, `createdAt` and
    /// anything in `extra`) are carried over unchanged.
    #[must_use]
    pub fn with_draft(&self, draft: &ProfileDraft) -> Self {
        Self {
            name: Some(draft.name.clone()),
            email: Some(draft.email.clone()),
            phone: Some(draft.phone.clone()),
            address: Some(draft.address.clone()),
            city: Some(draft.city.clone()),
            state: Some(draft.state.clone()),
            zip_code: Some(draft.zip_code.clone()),
            country: Some(draft.country.clone()),
            date_of_birth: Some(draft.date_of_birth.clone()),
            gender: Some(draft.gender.clone()),
            ..self.clone()
        }
    }
}

/// Editable profile fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    Name,
    Email,
    Phone,
    Address,
    City,
    State,
    ZipCode,
    Country,
    DateOfBirth,
    Gender,
}

impl ProfileField {
    /// All editable fields in form order.
    pub const ALL: [Self; 10] = [
        Self::Name,
        Self::Email,
        Self::Phone,
        Self::Address,
        Self::City,
        Self::State,
        Self::ZipCode,
        Self::Country,
        Self::DateOfBirth,
        Self::Gender,
    ];

    /// Field name as it appears on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Address => "address",
            Self::City => "city",
            Self::State => "state",
            Self::ZipCode => "zipCode",
            Self::Country => "country",
            Self::DateOfBirth => "dateOfBirth",
            Self::Gender => "gender",
        }
    }
}

impl std::fmt::Display for ProfileField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("invalid profile field: {s}"))
    }
}

/// Locally held, possibly unsaved copy of the editable profile fields.
///
/// Serializes to the body of the profile update request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub date_of_birth: String,
    pub gender: String,
}

impl ProfileDraft {
    /// Seed a draft from a profile.
    ///
    /// Missing attributes become empty strings, except `country` which falls
    /// back to `default_country`. A full timestamp in `dateOfBirth` is cut to
    /// its calendar date.
    #[must_use]
    pub fn seeded_from(user: &UserProfile, default_country: &str) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        let date_of_birth = user
            .date_of_birth
            .as_deref()
            .map(|dob| dob.split_once('T').map_or(dob, |(date, _)| date))
            .unwrap_or_default()
            .to_owned();

        Self {
            name: text(&user.name),
            email: text(&user.email),
            phone: text(&user.phone),
            address: text(&user.address),
            city: text(&user.city),
            state: text(&user.state),
            zip_code: text(&user.zip_code),
            country: user
                .country
                .clone()
                .unwrap_or_else(|| default_country.to_owned()),
            date_of_birth,
            gender: text(&user.gender),
        }
    }

    /// Current value of a field.
    #[must_use]
    pub fn get(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::Name => &self.name,
            ProfileField::Email => &self.email,
            ProfileField::Phone => &self.phone,
            ProfileField::Address => &self.address,
            ProfileField::City => &self.city,
            ProfileField::State => &self.state,
            ProfileField::ZipCode => &self.zip_code,
            ProfileField::Country => &self.country,
            ProfileField::DateOfBirth => &self.date_of_birth,
            ProfileField::Gender => &self.gender,
        }
    }

    /// Replace one field, leaving the others untouched.
    pub fn set(&mut self, field: ProfileField, value: impl Into<String>) {
        let slot = match field {
            ProfileField::Name => &mut self.name,
            ProfileField::Email => &mut self.email,
            ProfileField::Phone => &mut self.phone,
            ProfileField::Address => &mut self.address,
            ProfileField::City => &mut self.city,
            ProfileField::State => &mut self.state,
            ProfileField::ZipCode => &mut self.zip_code,
            ProfileField::Country => &mut self.country,
            ProfileField::DateOfBirth => &mut self.date_of_birth,
            ProfileField::Gender => &mut self.gender,
        };
        *slot = value.into();
    }

    /// First required field (`name`, then `email`) that is blank.
    #[must_use]
    pub fn missing_required(&self) -> Option<ProfileField> {
        [ProfileField::Name, ProfileField::Email]
            .into_iter()
            .find(|field| self.get(*field).trim().is_empty())
    }
}
