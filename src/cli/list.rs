use std::fmt;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use phonebook::{Config, Contact, Field, Phonebook};
use serde::Serialize;
use tracing::instrument;

use crate::cli::terminal::{self, Colorize};

/// Command arguments for `phonebook list`.
#[derive(Debug, Parser)]
pub struct List {
    /// Zero-based page to show.
    #[arg(long, default_value_t = 0)]
    page: usize,

    /// Contacts per page (defaults to the configured page size).
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    page_size: Option<u64>,

    /// Show every contact instead of a single page.
    #[arg(long, conflicts_with_all = ["page", "page_size"])]
    all: bool,

    /// Output format (default: table).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl List {
    #[instrument(skip(phonebook))]
    pub fn run(self, phonebook: &Phonebook, config: &Config) -> anyhow::Result<()> {
        if self.all {
            let rows: Vec<_> = phonebook.contacts().iter().enumerate().collect();
            return render(&rows, self.output);
        }

        let page_size = self
            .page_size
            .and_then(|size| usize::try_from(size).ok())
            .unwrap_or_else(|| config.page_size().get());

        let rows = page_rows(phonebook, self.page, page_size);
        if rows.is_empty() && self.output == OutputFormat::Table {
            println!("{}", empty_page_message(phonebook, self.page, page_size).dim());
            return Ok(());
        }

        render(&rows, self.output)
    }
}

/// The contacts on a page, paired with their positions.
pub fn page_rows(phonebook: &Phonebook, page: usize, page_size: usize) -> Vec<(usize, &Contact)> {
    let first = page.saturating_mul(page_size);
    phonebook
        .page(page, page_size)
        .iter()
        .enumerate()
        .map(|(offset, contact)| (first + offset, contact))
        .collect()
}

pub fn empty_page_message(phonebook: &Phonebook, page: usize, page_size: usize) -> String {
    if phonebook.is_empty() {
        "The directory is empty".to_string()
    } else {
        format!(
            "No contacts on page {page} (pages 0 to {} hold {} contact(s))",
            phonebook.page_count(page_size).saturating_sub(1),
            phonebook.len()
        )
    }
}

/// Supported output formats.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Table => "table",
            Self::Json => "json",
        })
    }
}

/// Prints contacts with their positions.
pub fn render(rows: &[(usize, &Contact)], output: OutputFormat) -> anyhow::Result<()> {
    match output {
        OutputFormat::Table if terminal::is_narrow() => {
            print!("{}", format_blocks(rows));
            Ok(())
        }
        OutputFormat::Table => {
            print!("{}", format_table(rows));
            Ok(())
        }
        OutputFormat::Json => render_json(rows),
    }
}

#[derive(Serialize)]
struct SerializableRow<'a> {
    position: usize,
    #[serde(flatten)]
    contact: &'a Contact,
}

fn render_json(rows: &[(usize, &Contact)]) -> anyhow::Result<()> {
    let rows_out: Vec<_> = rows
        .iter()
        .map(|&(position, contact)| SerializableRow { position, contact })
        .collect();

    serde_json::to_writer_pretty(std::io::stdout(), &rows_out)
        .context("failed to render json output")?;
    println!();
    Ok(())
}

/// Line breaks would break the table layout.
fn cell(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}

fn format_table(rows: &[(usize, &Contact)]) -> String {
    let headers: Vec<String> = std::iter::once("#".to_string())
        .chain(Field::ALL.map(|field| field.label().to_string()))
        .collect();

    let data: Vec<Vec<String>> = rows
        .iter()
        .map(|(position, contact)| {
            std::iter::once(position.to_string())
                .chain(contact.values().map(cell))
                .collect()
        })
        .collect();

    // Determine column widths for alignment.
    let widths = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            data.iter()
                .map(|row| row[idx].chars().count())
                .max()
                .unwrap_or(0)
                .max(header.chars().count())
        })
        .collect::<Vec<_>>();

    let format_line = |cells: &[String]| {
        let line = cells
            .iter()
            .zip(&widths)
            .map(|(value, width)| format!("{value:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        format!("{}\n", line.trim_end())
    };

    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    std::iter::once(format_line(&headers))
        .chain(std::iter::once(format_line(&rule)))
        .chain(data.iter().map(|row| format_line(row)))
        .collect()
}

fn format_blocks(rows: &[(usize, &Contact)]) -> String {
    let label_width = Field::ALL
        .iter()
        .map(|field| field.label().chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (position, contact) in rows {
        out.push_str(&format!("#{position}\n"));
        for field in Field::ALL {
            out.push_str(&format!(
                "  {:<label_width$}  {}\n",
                field.label(),
                cell(contact.get(field))
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn contact(surname: &str, phone: &str) -> Contact {
        Contact {
            surname: surname.to_string(),
            given_name: "Ann".to_string(),
            work_phone: phone.to_string(),
            personal_phone: phone.to_string(),
            ..Contact::default()
        }
    }

    fn seeded(count: usize) -> (TempDir, Phonebook) {
        let tmp = TempDir::new().unwrap();
        let mut phonebook = Phonebook::open(tmp.path().join("phonebook.csv")).unwrap();
        for i in 0..count {
            phonebook
                .add(contact(&format!("S{i}"), &i.to_string()))
                .unwrap();
        }
        (tmp, phonebook)
    }

    #[test]
    fn page_rows_carry_table_positions() {
        let (_tmp, phonebook) = seeded(7);

        let positions: Vec<_> = page_rows(&phonebook, 1, 5)
            .into_iter()
            .map(|(position, _)| position)
            .collect();

        assert_eq!(positions, vec![5, 6]);
    }

    #[test]
    fn page_rows_past_the_end_are_empty() {
        let (_tmp, phonebook) = seeded(3);
        assert!(page_rows(&phonebook, 1, 5).is_empty());
        assert_eq!(page_rows(&phonebook, 0, 5).len(), 3);
    }

    #[test]
    fn empty_page_message_describes_range() {
        let (_tmp, phonebook) = seeded(7);
        assert_eq!(
            empty_page_message(&phonebook, 4, 5),
            "No contacts on page 4 (pages 0 to 1 hold 7 contact(s))"
        );

        let (_tmp, empty) = seeded(0);
        assert_eq!(empty_page_message(&empty, 0, 5), "The directory is empty");
    }

    #[test]
    fn table_aligns_columns() {
        let first = contact("Smith", "1");
        let second = contact("Ivanova-Petrova", "5550100");
        let table = format_table(&[(0, &first), (1, &second)]);
        let lines: Vec<_> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("#  Surname          Given name"));
        assert!(lines[1].starts_with("-  ---------------  ----------"));
        assert!(lines[2].starts_with("0  Smith            Ann"));
        assert!(lines[3].starts_with("1  Ivanova-Petrova  Ann"));
    }

    #[test]
    fn table_aligns_non_ascii_values_by_character() {
        let first = contact("Иванов", "1");
        let second = contact("Li", "2");
        let table = format_table(&[(0, &first), (1, &second)]);
        let lines: Vec<_> = table.lines().collect();

        assert!(lines[2].starts_with("0  Иванов   Ann"));
        assert!(lines[3].starts_with("1  Li       Ann"));
    }

    #[test]
    fn table_flattens_line_breaks() {
        let mut multiline = contact("Smith", "1");
        multiline.organization = "Acme\nLabs".to_string();

        let table = format_table(&[(0, &multiline)]);
        assert_eq!(table.lines().count(), 3);
        assert!(table.contains("Acme Labs"));
    }

    #[test]
    fn blocks_list_every_field() {
        let only = contact("Smith", "42");
        let blocks = format_blocks(&[(3, &only)]);
        let lines: Vec<_> = blocks.lines().collect();

        assert_eq!(lines[0], "#3");
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[1], "  Surname         Smith");
        assert_eq!(lines[6], "  Personal phone  42");
    }

    #[test]
    fn json_rows_flatten_contact_fields() {
        let only = contact("Smith", "42");
        let row = SerializableRow {
            position: 2,
            contact: &only,
        };

        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["position"], 2);
        assert_eq!(value["Surname"], "Smith");
        assert_eq!(value["WorkPhone"], "42");
    }
}
