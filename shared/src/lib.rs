// Result models shared between the analytics engine and whatever presents its output.
pub mod models;
