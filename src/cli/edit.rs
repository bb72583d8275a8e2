use phonebook::{Phonebook, StoreError};
use tracing::instrument;

use crate::cli::{fields::FieldArgs, terminal::Colorize};

/// Command arguments for `phonebook edit`.
///
/// Fields that are not given keep their current value.
#[derive(Debug, clap::Parser)]
pub struct Command {
    /// Zero-based position of the contact to edit
    position: usize,

    #[command(flatten)]
    fields: FieldArgs,
}

impl Command {
    #[instrument(skip(phonebook))]
    pub fn run(self, phonebook: &mut Phonebook) -> Result<(), StoreError> {
        let mut contact = phonebook
            .get(self.position)
            .cloned()
            .ok_or(StoreError::IndexOutOfRange {
                position: self.position,
                len: phonebook.len(),
            })?;

        self.fields.apply(&mut contact);
        phonebook.edit(self.position, contact)?;

        println!(
            "{}",
            format!("✅ Edited contact at position {}", self.position).success()
        );
        Ok(())
    }
}
