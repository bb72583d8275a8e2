pub mod csv;
pub mod phonebook;

pub use phonebook::{Phonebook, StoreError};
