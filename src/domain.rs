//! Domain models for the contact directory.
//!
//! This module contains the contact record, the closed set of fields it is
//! made of, the phone number rule, search criteria and configuration.

/// The contact record.
pub mod contact;
pub use contact::Contact;

mod config;
pub use config::{Config, DEFAULT_PAGE_SIZE};

mod criteria;
pub use criteria::Criteria;

/// The six contact fields.
pub mod field;
pub use field::{Field, InvalidFieldError};

/// Phone number validation.
pub mod phone;
pub use phone::{PhoneError, PhoneRule, MAX_PHONE_LEN};
