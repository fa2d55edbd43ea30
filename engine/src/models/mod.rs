// Engine-side data models. Result types handed to callers live in `shared::models`.
pub mod time_series;

pub use time_series::TimeSeries;
