use serde::{Deserialize, Serialize};

use crate::domain::{
    phone::{self, PhoneError},
    Field,
};

/// A single directory entry.
///
/// Every field is free text. Only the two phone fields carry a rule, and that
/// rule is checked when a contact is written through the store, not when it
/// is constructed or loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Contact {
    /// Family name.
    pub surname: String,
    /// First name.
    pub given_name: String,
    /// Patronymic (middle) name.
    pub patronymic: String,
    /// Employer or other organization.
    pub organization: String,
    /// Work phone number.
    pub work_phone: String,
    /// Personal phone number.
    pub personal_phone: String,
}

impl Contact {
    /// Returns the value held in the given field.
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Surname => &self.surname,
            Field::GivenName => &self.given_name,
            Field::Patronymic => &self.patronymic,
            Field::Organization => &self.organization,
            Field::WorkPhone => &self.work_phone,
            Field::PersonalPhone => &self.personal_phone,
        }
    }

    /// Replaces the value held in the given field.
    pub fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::Surname => &mut self.surname,
            Field::GivenName => &mut self.given_name,
            Field::Patronymic => &mut self.patronymic,
            Field::Organization => &mut self.organization,
            Field::WorkPhone => &mut self.work_phone,
            Field::PersonalPhone => &mut self.personal_phone,
        };
        *slot = value;
    }

    /// The six values in column order.
    #[must_use]
    pub fn values(&self) -> [&str; 6] {
        Field::ALL.map(|field| self.get(field))
    }

    /// Builds a contact from six values in column order.
    #[must_use]
    pub fn from_values(
        [surname, given_name, patronymic, organization, work_phone, personal_phone]: [String; 6],
    ) -> Self {
        Self {
            surname,
            given_name,
            patronymic,
            organization,
            work_phone,
            personal_phone,
        }
    }

    /// Checks both phone fields, work phone first.
    ///
    /// # Errors
    ///
    /// Returns the first phone field that breaks the phone number rule.
    pub fn validate(&self) -> Result<(), PhoneError> {
        for field in [Field::WorkPhone, Field::PersonalPhone] {
            phone::validate(self.get(field)).map_err(|rule| PhoneError { field, rule })?;
        }
        Ok(())
    }
}
