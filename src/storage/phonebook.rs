//! A file backed store of contacts
//!
//! The [`Phonebook`] owns the contact table and the path of the file it was
//! loaded from. Every mutation is validated first, applied in memory, and
//! then written through to disk.

use std::{
    fs,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

use crate::{
    domain::{Criteria, Field, InvalidFieldError, PhoneError},
    storage::csv,
    Contact,
};

/// A contact table backed by a delimited text file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phonebook {
    /// The backing file.
    path: PathBuf,
    contacts: Vec<Contact>,
}

impl Phonebook {
    /// Opens the contact table stored at `path`.
    ///
    /// A missing file is created containing only the header row. A file with
    /// no data rows gives an empty table, even if it is completely empty or its
    /// header cannot be read.
    ///
    /// Cell values are loaded as-is; phone numbers are not validated.
    ///
    /// # Errors
    ///
    /// This method can fail if:
    ///
    /// - the file exists but cannot be read, or is missing and cannot be
    ///   created
    /// - the file is not valid UTF-8
    /// - the file has data rows and one of them, or the header, does not have
    ///   exactly six columns, or a quoted field after the first data row is
    ///   never closed
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("Creating contact file at {}", path.display());
                let phonebook = Self {
                    path,
                    contacts: Vec::new(),
                };
                phonebook.persist()?;
                return Ok(phonebook);
            }
            Err(error) if error.kind() == io::ErrorKind::InvalidData => {
                return Err(StoreError::Malformed {
                    path,
                    line: 1,
                    reason: "file is not valid UTF-8".to_string(),
                });
            }
            Err(source) => return Err(StoreError::StorageUnavailable { path, source }),
        };

        let contacts = parse_table(&text).map_err(|(line, reason)| StoreError::Malformed {
            path: path.clone(),
            line,
            reason,
        })?;

        tracing::debug!(
            "Loaded {} contact(s) from {}",
            contacts.len(),
            path.display()
        );

        Ok(Self { path, contacts })
    }

    /// The file this table is stored in.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All contacts, in table order.
    #[must_use]
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// The number of contacts in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    /// Returns `true` if the table holds no contacts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// The contact at `position`, if there is one.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Contact> {
        self.contacts.get(position)
    }

    /// Writes the whole table to the backing file.
    ///
    /// The table is written to a temporary file in the same directory, which
    /// then replaces the backing file. If writing fails the previous contents
    /// are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::StorageUnavailable`] if the file cannot be
    /// written.
    pub fn persist(&self) -> Result<(), StoreError> {
        self.write_table().map_err(|source| StoreError::StorageUnavailable {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(
            "Wrote {} contact(s) to {}",
            self.contacts.len(),
            self.path.display()
        );
        Ok(())
    }

    fn write_table(&self) -> io::Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut file = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(file.as_file_mut());
            csv::write_record(&mut writer, Field::ALL.map(Field::name))?;
            for contact in &self.contacts {
                csv::write_record(&mut writer, contact.values())?;
            }
            writer.flush()?;
        }
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|error| error.error)?;
        Ok(())
    }

    /// The contacts on the given zero-based page.
    ///
    /// Pages past the end of the table are empty. A `page_size` of zero always
    /// gives an empty page.
    #[must_use]
    pub fn page(&self, page: usize, page_size: usize) -> &[Contact] {
        let len = self.contacts.len();
        let start = page.saturating_mul(page_size).min(len);
        let end = start.saturating_add(page_size).min(len);
        &self.contacts[start..end]
    }

    /// The number of pages needed to show every contact.
    #[must_use]
    pub fn page_count(&self, page_size: usize) -> usize {
        if page_size == 0 {
            0
        } else {
            self.contacts.len().div_ceil(page_size)
        }
    }

    /// Appends a contact to the end of the table.
    ///
    /// # Errors
    ///
    /// This method can fail if:
    ///
    /// - either phone number is invalid, in which case the table is unchanged
    /// - the table cannot be written to disk, in which case the contact is
    ///   still added in memory
    pub fn add(&mut self, contact: Contact) -> Result<usize, StoreError> {
        contact.validate()?;

        let position = self.contacts.len();
        self.contacts.push(contact);
        tracing::info!("Added contact at position {position}");

        self.persist()?;
        Ok(position)
    }

    /// Replaces the contact at `position`.
    ///
    /// # Errors
    ///
    /// This method can fail if:
    ///
    /// - either phone number is invalid
    /// - there is no contact at `position`
    /// - the table cannot be written to disk, in which case the edit is still
    ///   applied in memory
    pub fn edit(&mut self, position: usize, contact: Contact) -> Result<(), StoreError> {
        contact.validate()?;

        let len = self.contacts.len();
        let slot = self
            .contacts
            .get_mut(position)
            .ok_or(StoreError::IndexOutOfRange { position, len })?;
        *slot = contact;
        tracing::info!("Edited contact at position {position}");

        self.persist()
    }

    /// Removes the contact at `position` and returns it.
    ///
    /// Contacts after `position` move down by one, so positions stay
    /// contiguous.
    ///
    /// # Errors
    ///
    /// This method can fail if:
    ///
    /// - there is no contact at `position`
    /// - the table cannot be written to disk, in which case the contact is
    ///   still removed in memory
    pub fn delete(&mut self, position: usize) -> Result<Contact, StoreError> {
        let len = self.contacts.len();
        if position >= len {
            return Err(StoreError::IndexOutOfRange { position, len });
        }

        let removed = self.contacts.remove(position);
        tracing::info!("Deleted contact at position {position}");

        self.persist()?;
        Ok(removed)
    }

    /// All contacts whose `field` is exactly `value`, in table order.
    ///
    /// Matching is case-sensitive. An empty `value` matches contacts whose
    /// field is empty.
    #[must_use]
    pub fn search(&self, field: Field, value: &str) -> Vec<&Contact> {
        self.search_positions(field, value)
            .into_iter()
            .map(|(_, contact)| contact)
            .collect()
    }

    /// Like [`Phonebook::search`], but paired with each contact's position.
    #[must_use]
    pub fn search_positions(&self, field: Field, value: &str) -> Vec<(usize, &Contact)> {
        self.contacts
            .iter()
            .enumerate()
            .filter(|(_, contact)| contact.get(field) == value)
            .collect()
    }

    /// Searches a field given by name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidField`] if `field` is not one of the six
    /// field names.
    pub fn search_by_name(&self, field: &str, value: &str) -> Result<Vec<&Contact>, StoreError> {
        let field: Field = field.parse()?;
        Ok(self.search(field, value))
    }

    /// All contacts satisfying every non-empty filter, in table order.
    ///
    /// With no non-empty filters, every contact is returned.
    #[must_use]
    pub fn search_all(&self, criteria: &Criteria) -> Vec<&Contact> {
        self.search_all_positions(criteria)
            .into_iter()
            .map(|(_, contact)| contact)
            .collect()
    }

    /// Like [`Phonebook::search_all`], but paired with each contact's
    /// position.
    #[must_use]
    pub fn search_all_positions(&self, criteria: &Criteria) -> Vec<(usize, &Contact)> {
        self.contacts
            .iter()
            .enumerate()
            .filter(|(_, contact)| criteria.matches(contact))
            .collect()
    }
}

/// Parses the file contents into contacts.
///
/// A file without data rows is an empty table, whatever its header looks
/// like. On failure returns the offending line and a description.
fn parse_table(text: &str) -> Result<Vec<Contact>, (usize, String)> {
    let records = match csv::parse(text) {
        Ok(records) => records,
        Err(error) if error.complete <= 1 => {
            tracing::warn!("Unreadable contact file ({error}); starting with an empty table");
            return Ok(Vec::new());
        }
        Err(error) => return Err((error.line, error.to_string())),
    };
    let mut records = records.into_iter();

    let Some(header) = records.next() else {
        return Ok(Vec::new());
    };
    if records.as_slice().is_empty() {
        check_header(&header);
        return Ok(Vec::new());
    }
    if header.fields.len() != Field::ALL.len() {
        return Err((
            header.line,
            format!(
                "header has {} columns, expected {}",
                header.fields.len(),
                Field::ALL.len()
            ),
        ));
    }
    check_header(&header);

    let mut contacts = Vec::with_capacity(records.len());
    for record in records {
        let line = record.line;
        let count = record.fields.len();
        let values: [String; 6] = record.fields.try_into().map_err(|_| {
            (
                line,
                format!("expected {} columns, found {count}", Field::ALL.len()),
            )
        })?;
        contacts.push(Contact::from_values(values));
    }

    Ok(contacts)
}

/// Warns about header names that are neither canonical nor legacy.
fn check_header(header: &csv::Record) {
    let recognised = header.fields.len() == Field::ALL.len()
        && Field::ALL.iter().zip(&header.fields).all(|(field, name)| {
            name.trim() == field.name() || name.trim() == field.legacy_name()
        });
    if !recognised {
        tracing::warn!(
            "Unrecognised column names {:?}; reading columns in the order {}",
            header.fields,
            Field::ALL.map(Field::name).join(", ")
        );
    }
}

/// Errors returned by [`Phonebook`] operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing file could not be read, created or written.
    #[error("contact file {} is unavailable: {source}", .path.display())]
    StorageUnavailable {
        /// The backing file.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// The backing file was read but its contents are not a contact table.
    #[error("contact file {} is malformed at line {line}: {reason}", .path.display())]
    Malformed {
        /// The backing file.
        path: PathBuf,
        /// The one-based line the problem was found on.
        line: usize,
        /// What is wrong.
        reason: String,
    },

    /// A phone number broke the phone number rule. Nothing was changed.
    #[error(transparent)]
    ValidationFailed(#[from] PhoneError),

    /// There is no contact at the requested position.
    #[error("no contact at position {position} (the directory holds {len})")]
    IndexOutOfRange {
        /// The requested position.
        position: usize,
        /// The number of contacts at the time of the request.
        len: usize,
    },

    /// A search named a field that does not exist.
    #[error(transparent)]
    InvalidField(#[from] InvalidFieldError),
}

impl StoreError {
    /// Returns `true` for errors about the backing file rather than the
    /// request.
    #[must_use]
    pub const fn is_storage(&self) -> bool {
        matches!(
            self,
            Self::StorageUnavailable { .. } | Self::Malformed { .. }
        )
    }
}
