//! Plain-text Contact Directory
//!
//! Contacts are rows of a comma-separated file, managed through a
//! [`Phonebook`].

pub mod domain;
pub use domain::{Config, Contact, Criteria, Field, PhoneError};

/// File storage for the contact table.
pub mod storage;
pub use storage::{Phonebook, StoreError};
