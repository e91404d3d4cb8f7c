use log::{debug, warn};
use serde_json::Value;

use crate::content::{
    challenge_schema, validate_challenge, Clock, ContentError, ContentProvider, KeyValueStore,
};
use crate::models::ChallengePayload;

pub const FALLBACK_INSPIRATION: &str =
    "Seek help from Allah and do not give up. Allah will bring about ease after hardship.";

const INSPIRATION_PROMPT: &str = "Give me a very short, simple message of faith to motivate me \
     today. Keep it direct and calm, without ornament or many emoji.";
const INSPIRATION_SYSTEM: &str = "You are a gentle companion inside a worship tracker. Spread \
     hope and tranquillity in simple words that are close to the heart.";

fn challenge_prompt(user_points: u64) -> String {
    format!(
        "Suggest one simple act of worship for today (a neglected Sunnah, a good deed or a \
         specific dhikr) for a user who has {} points. It must be specific and doable today.",
        user_points
    )
}

pub const DEFAULT_TEMPERATURE: f64 = 0.7;

struct Slot {
    payload_key: &'static str,
    date_key: &'static str,
}

const INSPIRATION: Slot = Slot {
    payload_key: "cached_inspiration_v1",
    date_key: "cached_inspiration_date",
};

const CHALLENGE: Slot = Slot {
    payload_key: "cached_challenge_v1",
    date_key: "cached_challenge_date",
};

/// Where a slot stands relative to today.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotState {
    Cold,
    Stale(String),
    Fresh(String),
}

impl SlotState {
    fn classify(payload: Option<String>, cached_date: Option<String>, today: &str) -> Self {
        match payload {
            None => SlotState::Cold,
            Some(p) if cached_date.as_deref() == Some(today) => SlotState::Fresh(p),
            Some(p) => SlotState::Stale(p),
        }
    }

    fn into_cached(self) -> Option<String> {
        match self {
            SlotState::Cold => None,
            SlotState::Stale(p) | SlotState::Fresh(p) => Some(p),
        }
    }
}

/// Serves one inspiration and one challenge per calendar day. Every public
/// call resolves to usable content; provider and store failures are logged
/// and absorbed.
pub struct DailyContentCache<P, S, C> {
    provider: P,
    store: S,
    clock: C,
    temperature: f64,
}

impl<P: ContentProvider, S: KeyValueStore, C: Clock> DailyContentCache<P, S, C> {
    pub fn new(provider: P, store: S, clock: C) -> Self {
        Self {
            provider,
            store,
            clock,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn inspiration_state(&self) -> SlotState {
        self.read_slot(&INSPIRATION, &self.clock.today_iso())
    }

    pub fn challenge_state(&self) -> SlotState {
        self.read_slot(&CHALLENGE, &self.clock.today_iso())
    }

    pub async fn fetch_daily_inspiration(&self) -> String {
        let today = self.clock.today_iso();
        let cached = match self.read_slot(&INSPIRATION, &today) {
            SlotState::Fresh(text) => {
                debug!("inspiration cache hit for {}", today);
                return text;
            }
            other => other.into_cached(),
        };

        let result = self
            .provider
            .generate_text(INSPIRATION_PROMPT, INSPIRATION_SYSTEM, self.temperature)
            .await
            .and_then(|text| {
                let text = text.trim();
                if text.is_empty() {
                    Err(ContentError::MalformedResponse("empty inspiration".to_string()))
                } else {
                    Ok(text.to_string())
                }
            });

        match result {
            Ok(text) => {
                self.write_slot(&INSPIRATION, &text, &today);
                text
            }
            Err(e) => {
                warn!("daily inspiration unavailable: {}", e);
                cached.unwrap_or_else(|| FALLBACK_INSPIRATION.to_string())
            }
        }
    }

    pub async fn fetch_daily_challenge(&self, user_points: u64) -> ChallengePayload {
        let today = self.clock.today_iso();
        let cached = match self.read_slot(&CHALLENGE, &today) {
            SlotState::Fresh(json) => match parse_cached(&json) {
                Some(payload) => {
                    debug!("challenge cache hit for {}", today);
                    return payload;
                }
                None => None,
            },
            other => other.into_cached().and_then(|json| parse_cached(&json)),
        };

        let result = self
            .provider
            .generate_structured(&challenge_prompt(user_points), &challenge_schema())
            .await
            .and_then(|value| validate_challenge(&value));

        match result {
            Ok(payload) => {
                match serde_json::to_string(&payload) {
                    Ok(json) => self.write_slot(&CHALLENGE, &json, &today),
                    Err(e) => warn!("could not serialize challenge: {}", e),
                }
                payload
            }
            Err(e) => {
                warn!("daily challenge unavailable: {}", e);
                cached.unwrap_or_else(ChallengePayload::fallback)
            }
        }
    }

    fn read_slot(&self, slot: &Slot, today: &str) -> SlotState {
        let read = |key: &str| match self.store.get(key) {
            Ok(v) => v,
            Err(e) => {
                warn!("reading {} failed: {}", key, e);
                None
            }
        };
        SlotState::classify(read(slot.payload_key), read(slot.date_key), today)
    }

    fn write_slot(&self, slot: &Slot, payload: &str, today: &str) {
        if let Err(e) = self.store.set(slot.payload_key, payload) {
            warn!("writing {} failed: {}", slot.payload_key, e);
            return;
        }
        if let Err(e) = self.store.set(slot.date_key, today) {
            warn!("writing {} failed: {}", slot.date_key, e);
        }
    }
}

/// A cached challenge that no longer validates counts as absent.
fn parse_cached(json: &str) -> Option<ChallengePayload> {
    let parsed = serde_json::from_str::<Value>(json)
        .map_err(ContentError::from)
        .and_then(|v| validate_challenge(&v));
    match parsed {
        Ok(payload) => Some(payload),
        Err(e) => {
            warn!("ignoring cached challenge: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::clock::FixedClock;
    use crate::content::store::memory::MemoryStore;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;

    #[derive(Default)]
    struct ScriptedProvider {
        texts: RefCell<VecDeque<Result<String, ContentError>>>,
        objects: RefCell<VecDeque<Result<Value, ContentError>>>,
        calls: Cell<usize>,
    }

    impl ScriptedProvider {
        fn texts(items: Vec<Result<String, ContentError>>) -> Self {
            Self {
                texts: RefCell::new(items.into()),
                ..Default::default()
            }
        }

        fn objects(items: Vec<Result<Value, ContentError>>) -> Self {
            Self {
                objects: RefCell::new(items.into()),
                ..Default::default()
            }
        }
    }

    fn offline() -> ContentError {
        ContentError::ProviderUnavailable("offline".to_string())
    }

    impl ContentProvider for ScriptedProvider {
        async fn generate_text(
            &self,
            _prompt: &str,
            _system_instruction: &str,
            _temperature: f64,
        ) -> Result<String, ContentError> {
            self.calls.set(self.calls.get() + 1);
            self.texts.borrow_mut().pop_front().unwrap_or_else(|| Err(offline()))
        }

        async fn generate_structured(
            &self,
            _prompt: &str,
            _schema: &Value,
        ) -> Result<Value, ContentError> {
            self.calls.set(self.calls.get() + 1);
            self.objects.borrow_mut().pop_front().unwrap_or_else(|| Err(offline()))
        }
    }

    fn day(d: u32) -> FixedClock {
        FixedClock(NaiveDate::from_ymd_opt(2025, 3, d).unwrap())
    }

    #[tokio::test]
    async fn inspiration_is_fetched_once_per_day() {
        let provider = ScriptedProvider::texts(vec![Ok("Be patient.".to_string())]);
        let store = MemoryStore::default();
        let cache = DailyContentCache::new(&provider, &store, day(10));

        assert_eq!(cache.inspiration_state(), SlotState::Cold);
        let first = cache.fetch_daily_inspiration().await;
        let second = cache.fetch_daily_inspiration().await;

        assert_eq!(first, "Be patient.");
        assert_eq!(first, second);
        assert_eq!(provider.calls.get(), 1);
        assert_eq!(cache.inspiration_state(), SlotState::Fresh("Be patient.".to_string()));
        assert_eq!(store.raw("cached_inspiration_date").as_deref(), Some("2025-03-10"));
    }

    #[tokio::test]
    async fn stale_inspiration_is_refreshed_on_a_new_day() {
        let provider = ScriptedProvider::texts(vec![Ok("New day.".to_string())]);
        let store = MemoryStore::with(&[
            ("cached_inspiration_v1", "Old day."),
            ("cached_inspiration_date", "2025-03-09"),
        ]);
        let cache = DailyContentCache::new(&provider, &store, day(10));

        assert_eq!(cache.inspiration_state(), SlotState::Stale("Old day.".to_string()));
        assert_eq!(cache.fetch_daily_inspiration().await, "New day.");
        assert_eq!(provider.calls.get(), 1);
    }

    #[tokio::test]
    async fn failed_refresh_serves_stale_inspiration() {
        let provider = ScriptedProvider::texts(vec![Err(offline())]);
        let store = MemoryStore::with(&[
            ("cached_inspiration_v1", "Old day."),
            ("cached_inspiration_date", "2025-03-09"),
        ]);
        let cache = DailyContentCache::new(&provider, &store, day(10));

        assert_eq!(cache.fetch_daily_inspiration().await, "Old day.");
        // still stale, so the next call tries again
        assert_eq!(store.raw("cached_inspiration_date").as_deref(), Some("2025-03-09"));
    }

    #[tokio::test]
    async fn failed_cold_inspiration_uses_builtin_text() {
        let provider = ScriptedProvider::texts(vec![Err(offline())]);
        let store = MemoryStore::default();
        let cache = DailyContentCache::new(&provider, &store, day(10));

        assert_eq!(cache.fetch_daily_inspiration().await, FALLBACK_INSPIRATION);
        assert_eq!(cache.inspiration_state(), SlotState::Cold);
    }

    #[tokio::test]
    async fn blank_inspiration_is_not_cached() {
        let provider = ScriptedProvider::texts(vec![Ok("   ".to_string())]);
        let store = MemoryStore::default();
        let cache = DailyContentCache::new(&provider, &store, day(10));

        assert_eq!(cache.fetch_daily_inspiration().await, FALLBACK_INSPIRATION);
        assert_eq!(store.raw("cached_inspiration_v1"), None);
    }

    #[tokio::test]
    async fn unreadable_store_still_returns_content() {
        let provider = ScriptedProvider::texts(vec![Ok("Fresh words.".to_string())]);
        let store = MemoryStore::failing_reads();
        let cache = DailyContentCache::new(&provider, &store, day(10));

        assert_eq!(cache.fetch_daily_inspiration().await, "Fresh words.");
    }

    #[tokio::test]
    async fn challenge_falls_back_to_default_when_cold_and_offline() {
        let provider = ScriptedProvider::objects(vec![Err(offline())]);
        let store = MemoryStore::default();
        let cache = DailyContentCache::new(&provider, &store, day(10));

        let challenge = cache.fetch_daily_challenge(500).await;
        assert_eq!(challenge, ChallengePayload::fallback());
        assert_eq!(challenge.points, 100);
    }

    #[tokio::test]
    async fn incomplete_challenge_is_rejected_and_not_cached() {
        let provider = ScriptedProvider::objects(vec![Ok(json!({ "title": "X" }))]);
        let store = MemoryStore::default();
        let cache = DailyContentCache::new(&provider, &store, day(10));

        assert_eq!(cache.fetch_daily_challenge(0).await, ChallengePayload::fallback());
        assert_eq!(store.raw("cached_challenge_v1"), None);
        assert_eq!(store.raw("cached_challenge_date"), None);
    }

    #[tokio::test]
    async fn valid_challenge_is_cached_for_the_day() {
        let provider = ScriptedProvider::objects(vec![Ok(json!({
            "title": "Fast Monday",
            "description": "Fast this Monday following the Sunnah.",
            "points": 250
        }))]);
        let store = MemoryStore::default();
        let cache = DailyContentCache::new(&provider, &store, day(10));

        let first = cache.fetch_daily_challenge(1_000).await;
        let second = cache.fetch_daily_challenge(1_000).await;

        assert_eq!(first.title, "Fast Monday");
        assert_eq!(first, second);
        assert_eq!(provider.calls.get(), 1);
    }

    #[tokio::test]
    async fn failed_refresh_serves_stale_challenge() {
        let stale = r#"{"title":"Old","description":"Yesterday's challenge","points":40}"#;
        let provider = ScriptedProvider::objects(vec![Err(offline())]);
        let store = MemoryStore::with(&[
            ("cached_challenge_v1", stale),
            ("cached_challenge_date", "2025-03-09"),
        ]);
        let cache = DailyContentCache::new(&provider, &store, day(10));

        let challenge = cache.fetch_daily_challenge(0).await;
        assert_eq!(challenge.title, "Old");
        assert_eq!(challenge.points, 40);
    }

    #[tokio::test]
    async fn corrupt_fresh_cache_is_treated_as_cold() {
        let provider = ScriptedProvider::objects(vec![Ok(json!({
            "title": "Call your parents",
            "description": "Phone your mother or father today.",
            "points": 120
        }))]);
        let store = MemoryStore::with(&[
            ("cached_challenge_v1", "{not json"),
            ("cached_challenge_date", "2025-03-10"),
        ]);
        let cache = DailyContentCache::new(&provider, &store, day(10));

        let challenge = cache.fetch_daily_challenge(0).await;
        assert_eq!(challenge.title, "Call your parents");
        assert_eq!(provider.calls.get(), 1);
    }

    #[tokio::test]
    async fn slots_refresh_independently() {
        let provider = ScriptedProvider {
            texts: RefCell::new(vec![Ok("Today's words.".to_string())].into()),
            objects: RefCell::new(
                vec![Ok(json!({
                    "title": "Today",
                    "description": "Today's challenge",
                    "points": 10
                }))]
                .into(),
            ),
            calls: Cell::new(0),
        };
        let store = MemoryStore::with(&[
            ("cached_challenge_v1", r#"{"title":"Old","description":"Old one","points":5}"#),
            ("cached_challenge_date", "2025-03-09"),
        ]);
        let cache = DailyContentCache::new(&provider, &store, day(10));

        cache.fetch_daily_inspiration().await;
        // refreshing the inspiration must not make yesterday's challenge look fresh
        let challenge = cache.fetch_daily_challenge(0).await;
        assert_eq!(challenge.title, "Today");
        assert_eq!(provider.calls.get(), 2);
    }
}
