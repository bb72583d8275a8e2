use dialoguer::Confirm;
use phonebook::{Phonebook, StoreError};
use tracing::instrument;

use crate::cli::{list, terminal::Colorize};

/// Command arguments for `phonebook delete`.
#[derive(Debug, clap::Parser)]
pub struct Command {
    /// Zero-based position of the contact to delete
    position: usize,

    /// Skip the confirmation prompt
    #[arg(long, short)]
    yes: bool,
}

impl Command {
    #[instrument(skip(phonebook))]
    pub fn run(self, phonebook: &mut Phonebook) -> anyhow::Result<()> {
        let Some(contact) = phonebook.get(self.position) else {
            return Err(StoreError::IndexOutOfRange {
                position: self.position,
                len: phonebook.len(),
            }
            .into());
        };

        if !self.yes {
            println!("Will delete:");
            list::render(&[(self.position, contact)], list::OutputFormat::Table)?;

            if !Confirm::new()
                .with_prompt("Proceed?")
                .default(false)
                .interact()?
            {
                println!("{}", "Cancelled".dim());
                return Ok(());
            }
        }

        phonebook.delete(self.position)?;
        println!(
            "{}",
            format!("✅ Deleted contact at position {}", self.position).success()
        );
        Ok(())
    }
}
