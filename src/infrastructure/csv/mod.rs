pub mod table_parser;

pub use table_parser::TableParser;
