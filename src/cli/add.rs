use phonebook::{Phonebook, StoreError};
use tracing::instrument;

use crate::cli::{fields::FieldArgs, terminal::Colorize};

/// Command arguments for `phonebook add`.
#[derive(Debug, clap::Parser)]
pub struct Command {
    #[command(flatten)]
    fields: FieldArgs,
}

impl Command {
    #[instrument(skip(phonebook))]
    pub fn run(self, phonebook: &mut Phonebook) -> Result<usize, StoreError> {
        let position = phonebook.add(self.fields.into_contact())?;
        println!(
            "{}",
            format!("✅ Added contact at position {position}").success()
        );
        Ok(position)
    }
}
