//! The interactive menu shown when no subcommand is given.

use std::fmt;

use dialoguer::{Confirm, Input, Select};
use phonebook::{Contact, Field, Phonebook, StoreError};
use tracing::instrument;

use crate::cli::{list, search, terminal::Colorize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Show,
    Add,
    Edit,
    Search,
    Delete,
    Exit,
}

impl Action {
    const ALL: [Self; 6] = [
        Self::Show,
        Self::Add,
        Self::Edit,
        Self::Search,
        Self::Delete,
        Self::Exit,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Show => "Show contacts",
            Self::Add => "Add contact",
            Self::Edit => "Edit contact",
            Self::Search => "Search contacts",
            Self::Delete => "Delete contact",
            Self::Exit => "Exit",
        })
    }
}

pub struct Menu<'a> {
    phonebook: &'a mut Phonebook,
    page_size: usize,
}

impl<'a> Menu<'a> {
    pub const fn new(phonebook: &'a mut Phonebook, page_size: usize) -> Self {
        Self {
            phonebook,
            page_size,
        }
    }

    /// Runs until the user picks "Exit".
    ///
    /// Errors from the directory are reported and the menu carries on.
    /// Terminal errors end the loop.
    #[instrument(skip(self))]
    pub fn run(mut self) -> anyhow::Result<()> {
        loop {
            let choice = Select::new()
                .with_prompt("Phone directory")
                .items(&Action::ALL)
                .default(0)
                .interact()?;

            let outcome = match Action::ALL[choice] {
                Action::Show => self.show(),
                Action::Add => self.add(),
                Action::Edit => self.edit(),
                Action::Search => self.search(),
                Action::Delete => self.delete(),
                Action::Exit => break,
            };

            if let Err(error) = outcome {
                eprintln!("{}", Report::from_error(error)?);
            }
        }

        println!("Goodbye");
        Ok(())
    }

    fn show(&mut self) -> anyhow::Result<()> {
        let page: usize = Input::new()
            .with_prompt("Page number (from 0)")
            .default(0)
            .interact_text()?;

        let rows = list::page_rows(self.phonebook, page, self.page_size);
        if rows.is_empty() {
            println!(
                "{}",
                list::empty_page_message(self.phonebook, page, self.page_size).dim()
            );
            return Ok(());
        }
        list::render(&rows, list::OutputFormat::Table)
    }

    fn add(&mut self) -> anyhow::Result<()> {
        let contact = prompt_contact(&Contact::default())?;
        let position = self.phonebook.add(contact)?;
        println!(
            "{}",
            format!("✅ Added contact at position {position}").success()
        );
        Ok(())
    }

    fn edit(&mut self) -> anyhow::Result<()> {
        let position = self.prompt_position("Position of the contact to edit")?;
        let current = self.existing(position)?.clone();

        let contact = prompt_contact(&current)?;
        self.phonebook.edit(position, contact)?;
        println!(
            "{}",
            format!("✅ Edited contact at position {position}").success()
        );
        Ok(())
    }

    fn search(&mut self) -> anyhow::Result<()> {
        let labels = Field::ALL.map(Field::label);
        let choice = Select::new()
            .with_prompt("Field to search")
            .items(&labels)
            .default(0)
            .interact()?;
        let field = Field::ALL[choice];

        let value: String = Input::new()
            .with_prompt(format!("{} (exact match)", field.label()))
            .allow_empty(true)
            .interact_text()?;

        let rows = self.phonebook.search_positions(field, &value);
        search::render_matches(&rows, list::OutputFormat::Table)
    }

    fn delete(&mut self) -> anyhow::Result<()> {
        let position = self.prompt_position("Position of the contact to delete")?;
        let contact = self.existing(position)?;
        list::render(&[(position, contact)], list::OutputFormat::Table)?;

        if !Confirm::new()
            .with_prompt("Delete this contact?")
            .default(false)
            .interact()?
        {
            println!("{}", "Cancelled".dim());
            return Ok(());
        }

        self.phonebook.delete(position)?;
        println!(
            "{}",
            format!("✅ Deleted contact at position {position}").success()
        );
        Ok(())
    }

    fn prompt_position(&self, prompt: &str) -> anyhow::Result<usize> {
        if self.phonebook.is_empty() {
            anyhow::bail!(StoreError::IndexOutOfRange {
                position: 0,
                len: 0
            });
        }

        Ok(Input::new()
            .with_prompt(format!(
                "{prompt} (0 to {})",
                self.phonebook.len() - 1
            ))
            .interact_text()?)
    }

    fn existing(&self, position: usize) -> Result<&Contact, StoreError> {
        self.phonebook
            .get(position)
            .ok_or(StoreError::IndexOutOfRange {
                position,
                len: self.phonebook.len(),
            })
    }
}

/// A failed action the menu reports before carrying on.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Report {
    /// The backing file is at fault rather than the request.
    storage: bool,
    message: String,
}

impl Report {
    /// Turns directory errors into a report and hands back anything else.
    fn from_error(error: anyhow::Error) -> anyhow::Result<Self> {
        let Some(store_error) = error.downcast_ref::<StoreError>() else {
            return Err(error);
        };
        tracing::debug!("menu action failed: {store_error:?}");
        Ok(Self {
            storage: store_error.is_storage(),
            message: format!("⚠️  {store_error}"),
        })
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.storage {
            write!(f, "{}", self.message.failure())
        } else {
            write!(f, "{}", self.message.warning())
        }
    }
}

/// Prompts for all six fields, offering the current values as defaults.
fn prompt_contact(current: &Contact) -> anyhow::Result<Contact> {
    let mut contact = Contact::default();
    for field in Field::ALL {
        let prompt = if field.is_phone() {
            format!("{} (digits only)", field.label())
        } else {
            field.label().to_string()
        };

        let value: String = Input::new()
            .with_prompt(prompt)
            .with_initial_text(current.get(field))
            .allow_empty(true)
            .interact_text()?;
        contact.set(field, value);
    }
    Ok(contact)
}

#[cfg(test)]
mod tests {
    use std::{io, path::PathBuf};

    use phonebook::domain::{PhoneError, PhoneRule};

    use super::*;

    #[test]
    fn storage_errors_are_reported_as_failures() {
        let error = anyhow::Error::from(StoreError::StorageUnavailable {
            path: PathBuf::from("phonebook.csv"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        });

        let report = Report::from_error(error).unwrap();
        assert!(report.storage);
        assert!(report.message.contains("phonebook.csv is unavailable"));
    }

    #[test]
    fn request_errors_are_reported_as_warnings() {
        let invalid_phone = StoreError::ValidationFailed(PhoneError {
            field: Field::WorkPhone,
            rule: PhoneRule::Empty,
        });
        let out_of_range = StoreError::IndexOutOfRange {
            position: 3,
            len: 1,
        };

        for error in [invalid_phone, out_of_range] {
            let report = Report::from_error(error.into()).unwrap();
            assert!(!report.storage);
        }
    }

    #[test]
    fn context_does_not_hide_store_errors() {
        let error = anyhow::Error::from(StoreError::IndexOutOfRange {
            position: 0,
            len: 0,
        })
        .context("while editing");

        assert!(Report::from_error(error).is_ok());
    }

    #[test]
    fn terminal_errors_end_the_menu() {
        let error = anyhow::Error::from(io::Error::other("terminal closed"));

        let error = Report::from_error(error).unwrap_err();
        assert_eq!(error.to_string(), "terminal closed");
    }
}
