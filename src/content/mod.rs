pub mod cache;
pub mod clock;
pub mod error;
pub mod gemini;
pub mod provider;
pub mod store;

pub use cache::{DailyContentCache, SlotState};
pub use clock::{Clock, SystemClock};
pub use error::ContentError;
pub use gemini::GeminiProvider;
pub use provider::{challenge_schema, validate_challenge, ContentProvider};
pub use store::KeyValueStore;
