use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// One of the six columns of the contact table.
///
/// The declaration order is the column order, both in memory and on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    /// Family name.
    Surname,
    /// First name.
    GivenName,
    /// Patronymic (middle) name.
    Patronymic,
    /// Employer or other organization.
    Organization,
    /// Work phone number.
    WorkPhone,
    /// Personal phone number.
    PersonalPhone,
}

impl Field {
    /// Every field, in column order.
    pub const ALL: [Self; 6] = [
        Self::Surname,
        Self::GivenName,
        Self::Patronymic,
        Self::Organization,
        Self::WorkPhone,
        Self::PersonalPhone,
    ];

    /// The canonical column name, as written to the header row.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Surname => "Surname",
            Self::GivenName => "GivenName",
            Self::Patronymic => "Patronymic",
            Self::Organization => "Organization",
            Self::WorkPhone => "WorkPhone",
            Self::PersonalPhone => "PersonalPhone",
        }
    }

    /// The column name used by older versions of the data file.
    #[must_use]
    pub const fn legacy_name(self) -> &'static str {
        match self {
            Self::Surname => "Фамилия",
            Self::GivenName => "Имя",
            Self::Patronymic => "Отчество",
            Self::Organization => "Организация",
            Self::WorkPhone => "Рабочий телефон",
            Self::PersonalPhone => "Личный телефон",
        }
    }

    /// A human readable label for prompts and table headers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Surname => "Surname",
            Self::GivenName => "Given name",
            Self::Patronymic => "Patronymic",
            Self::Organization => "Organization",
            Self::WorkPhone => "Work phone",
            Self::PersonalPhone => "Personal phone",
        }
    }

    /// Whether this field holds a phone number.
    #[must_use]
    pub const fn is_phone(self) -> bool {
        matches!(self, Self::WorkPhone | Self::PersonalPhone)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = InvalidFieldError;

    /// Parses a canonical or legacy column name. Matching is exact.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.name() == s || field.legacy_name() == s)
            .ok_or_else(|| InvalidFieldError(s.to_string()))
    }
}

/// Error returned when a string does not name one of the six fields.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("invalid search field '{0}': expected one of Surname, GivenName, Patronymic, Organization, WorkPhone, PersonalPhone")]
pub struct InvalidFieldError(pub String);
