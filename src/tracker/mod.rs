pub mod day;

pub use day::{load_today, save};
