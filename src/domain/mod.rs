pub mod error;
pub mod inference;
pub mod table;
