use std::collections::BTreeMap;

use crate::domain::{Contact, Field};

/// Filters for a multi-field search.
///
/// Each field maps to at most one filter value. A field with no filter, or
/// with an empty filter, places no constraint on the result. All remaining
/// filters must match exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    filters: BTreeMap<Field, String>,
}

impl Criteria {
    /// Criteria with no filters. Matches every contact.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the filter for a field.
    #[must_use]
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Sets (or replaces) the filter for a field.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.filters.insert(field, value.into());
    }

    /// The filter for a field, if it constrains the result.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.filters
            .get(&field)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Returns `true` if no field is constrained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        Field::ALL.into_iter().all(|field| self.get(field).is_none())
    }

    /// Returns `true` if the contact satisfies every active filter.
    #[must_use]
    pub fn matches(&self, contact: &Contact) -> bool {
        Field::ALL.into_iter().all(|field| {
            self.get(field)
                .is_none_or(|expected| contact.get(field) == expected)
        })
    }
}

impl<S: Into<String>> FromIterator<(Field, S)> for Criteria {
    fn from_iter<I: IntoIterator<Item = (Field, S)>>(iter: I) -> Self {
        let mut criteria = Self::new();
        for (field, value) in iter {
            criteria.set(field, value);
        }
        criteria
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(surname: &str, organization: &str) -> Contact {
        Contact {
            surname: surname.to_string(),
            organization: organization.to_string(),
            ..Contact::default()
        }
    }

    #[test]
    fn empty_criteria_match_everything() {
        let criteria = Criteria::new();
        assert!(criteria.is_empty());
        assert!(criteria.matches(&contact("Smith", "Acme")));
        assert!(criteria.matches(&Contact::default()));
    }

    #[test]
    fn empty_values_are_ignored() {
        let criteria = Criteria::new()
            .with(Field::Surname, "")
            .with(Field::Organization, "Acme");

        assert!(!criteria.is_empty());
        assert_eq!(criteria.get(Field::Surname), None);
        assert!(criteria.matches(&contact("Smith", "Acme")));
        assert!(criteria.matches(&contact("Jones", "Acme")));
        assert!(!criteria.matches(&contact("Smith", "Initech")));
    }

    #[test]
    fn filters_are_anded() {
        let criteria: Criteria = [(Field::Surname, "Smith"), (Field::Organization, "Acme")]
            .into_iter()
            .collect();

        assert!(criteria.matches(&contact("Smith", "Acme")));
        assert!(!criteria.matches(&contact("Smith", "Initech")));
        assert!(!criteria.matches(&contact("Jones", "Acme")));
    }

    #[test]
    fn matching_is_exact() {
        let criteria = Criteria::new().with(Field::Surname, "Smith");
        assert!(!criteria.matches(&contact("Smithson", "")));
        assert!(!criteria.matches(&contact("smith", "")));
    }

    #[test]
    fn later_filters_replace_earlier_ones() {
        let criteria = Criteria::new()
            .with(Field::Surname, "Smith")
            .with(Field::Surname, "Jones");
        assert_eq!(criteria.get(Field::Surname), Some("Jones"));
    }
}
