use phonebook::{Contact, Criteria, Field};

/// Per-field flags shared by `add`, `edit` and `find`.
#[derive(Debug, Default, Clone, clap::Args)]
pub struct FieldArgs {
    /// Surname
    #[arg(long)]
    surname: Option<String>,

    /// Given name
    #[arg(long)]
    given_name: Option<String>,

    /// Patronymic
    #[arg(long)]
    patronymic: Option<String>,

    /// Organization
    #[arg(long)]
    organization: Option<String>,

    /// Work phone (digits only)
    #[arg(long)]
    work_phone: Option<String>,

    /// Personal phone (digits only)
    #[arg(long)]
    personal_phone: Option<String>,
}

impl FieldArgs {
    fn into_values(self) -> [(Field, Option<String>); 6] {
        [
            (Field::Surname, self.surname),
            (Field::GivenName, self.given_name),
            (Field::Patronymic, self.patronymic),
            (Field::Organization, self.organization),
            (Field::WorkPhone, self.work_phone),
            (Field::PersonalPhone, self.personal_phone),
        ]
    }

    /// A new contact. Omitted fields are empty.
    pub fn into_contact(self) -> Contact {
        let mut contact = Contact::default();
        self.apply(&mut contact);
        contact
    }

    /// Overwrites the fields that were given, keeping the rest.
    pub fn apply(self, contact: &mut Contact) {
        for (field, value) in self.into_values() {
            if let Some(value) = value {
                contact.set(field, value);
            }
        }
    }

    /// Exact-match criteria for the fields that were given.
    pub fn into_criteria(self) -> Criteria {
        self.into_values()
            .into_iter()
            .filter_map(|(field, value)| value.map(|value| (field, value)))
            .collect()
    }
}

#[cfg(test)]
impl FieldArgs {
    pub fn with(mut self, field: Field, value: &str) -> Self {
        let slot = match field {
            Field::Surname => &mut self.surname,
            Field::GivenName => &mut self.given_name,
            Field::Patronymic => &mut self.patronymic,
            Field::Organization => &mut self.organization,
            Field::WorkPhone => &mut self.work_phone,
            Field::PersonalPhone => &mut self.personal_phone,
        };
        *slot = Some(value.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_fields_are_empty_in_new_contact() {
        let contact = FieldArgs::default()
            .with(Field::Surname, "Smith")
            .with(Field::WorkPhone, "123")
            .into_contact();

        assert_eq!(contact.surname, "Smith");
        assert_eq!(contact.work_phone, "123");
        assert_eq!(contact.given_name, "");
        assert_eq!(contact.personal_phone, "");
    }

    #[test]
    fn apply_keeps_omitted_fields() {
        let mut contact = Contact {
            surname: "Smith".to_string(),
            organization: "Acme".to_string(),
            ..Contact::default()
        };

        FieldArgs::default()
            .with(Field::Organization, "Globex")
            .apply(&mut contact);

        assert_eq!(contact.surname, "Smith");
        assert_eq!(contact.organization, "Globex");
    }

    #[test]
    fn criteria_only_use_given_fields() {
        let criteria = FieldArgs::default()
            .with(Field::Organization, "Acme")
            .into_criteria();

        assert_eq!(criteria.get(Field::Organization), Some("Acme"));
        assert_eq!(criteria.get(Field::Surname), None);
    }
}
