// Loading price history supplied by the caller. Nothing here talks to a provider.
pub mod csv_parser;

pub use csv_parser::PriceCsvParser;
