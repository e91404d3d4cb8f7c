/// Why a provider call produced nothing usable. Never leaves the cache.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for ContentError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ContentError::MalformedResponse(e.to_string())
        } else {
            ContentError::ProviderUnavailable(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ContentError {
    fn from(e: serde_json::Error) -> Self {
        ContentError::MalformedResponse(e.to_string())
    }
}
