use serde::{Deserialize, Serialize};

/// The three fields a provider must return for a challenge. Construct it from
/// untrusted JSON with `content::validate_challenge`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengePayload {
    pub title: String,
    pub description: String,
    pub points: u32,
}

impl ChallengePayload {
    pub fn fallback() -> Self {
        Self {
            title: "Spread greetings".to_string(),
            description: "Greet 10 people today, known or strangers, intending the Sunnah."
                .to_string(),
            points: 100,
        }
    }
}

/// Today's active challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyChallenge {
    pub title: String,
    pub description: String,
    pub points: u32,
    #[serde(default)]
    pub completed: bool,
}

impl DailyChallenge {
    /// Returns false if it was already completed.
    pub fn complete(&mut self) -> bool {
        if self.completed {
            return false;
        }
        self.completed = true;
        true
    }
}

impl From<ChallengePayload> for DailyChallenge {
    fn from(p: ChallengePayload) -> Self {
        Self {
            title: p.title,
            description: p.description,
            points: p.points,
            completed: false,
        }
    }
}
