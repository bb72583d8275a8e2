use phonebook::{Field, Phonebook};
use tracing::instrument;

use crate::cli::{
    fields::FieldArgs,
    list::{self, OutputFormat},
    terminal::Colorize,
};

/// Parse a field name as typed on the command line.
///
/// Accepts the canonical and legacy column names, and the kebab-case flag
/// spelling (`work-phone`).
pub fn parse_field(s: &str) -> Result<Field, String> {
    s.parse().or_else(|error| {
        Field::ALL
            .into_iter()
            .find(|field| kebab_case(field.name()) == s.to_ascii_lowercase())
            .ok_or_else(|| format!("{error}"))
    })
}

fn kebab_case(name: &str) -> String {
    let mut out = String::new();
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            out.push('-');
        }
        out.push(c.to_ascii_lowercase());
    }
    out
}

/// Command arguments for `phonebook search`.
#[derive(Debug, clap::Parser)]
pub struct Search {
    /// The field to search (e.g. Surname, Organization, work-phone)
    #[arg(value_parser = parse_field)]
    field: Field,

    /// The exact value to look for. An empty string matches empty fields.
    value: String,

    /// Output format (default: table).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl Search {
    #[instrument(skip(phonebook))]
    pub fn run(self, phonebook: &Phonebook) -> anyhow::Result<()> {
        let rows = phonebook.search_positions(self.field, &self.value);
        render_matches(&rows, self.output)
    }
}

/// Command arguments for `phonebook find`.
///
/// Every given field must match exactly. Empty values are ignored.
#[derive(Debug, clap::Parser)]
pub struct Find {
    #[command(flatten)]
    fields: FieldArgs,

    /// Output format (default: table).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl Find {
    #[instrument(skip(phonebook))]
    pub fn run(self, phonebook: &Phonebook) -> anyhow::Result<()> {
        let criteria = self.fields.into_criteria();
        if criteria.is_empty() && self.output == OutputFormat::Table {
            println!("{}", "No filters given, showing every contact".dim());
        }
        let rows = phonebook.search_all_positions(&criteria);
        render_matches(&rows, self.output)
    }
}

pub fn render_matches(
    rows: &[(usize, &phonebook::Contact)],
    output: OutputFormat,
) -> anyhow::Result<()> {
    if rows.is_empty() && output == OutputFormat::Table {
        println!("{}", "No matching contacts".dim());
        return Ok(());
    }
    list::render(rows, output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_field_names() {
        assert_eq!(parse_field("Surname"), Ok(Field::Surname));
        assert_eq!(parse_field("Отчество"), Ok(Field::Patronymic));
    }

    #[test]
    fn parses_flag_style_field_names() {
        assert_eq!(parse_field("work-phone"), Ok(Field::WorkPhone));
        assert_eq!(parse_field("given-name"), Ok(Field::GivenName));
        assert_eq!(parse_field("organization"), Ok(Field::Organization));
    }

    #[test]
    fn rejects_unknown_fields() {
        let error = parse_field("nickname").unwrap_err();
        assert!(error.starts_with("invalid search field 'nickname'"));
    }

    #[test]
    fn kebab_case_splits_words() {
        assert_eq!(kebab_case("PersonalPhone"), "personal-phone");
        assert_eq!(kebab_case("Surname"), "surname");
    }
}
