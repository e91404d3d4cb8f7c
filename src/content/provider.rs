use serde_json::{json, Value};

use crate::content::ContentError;
use crate::models::ChallengePayload;

/// A remote model that writes text. Both calls are fallible and may be slow.
pub trait ContentProvider {
    async fn generate_text(
        &self,
        prompt: &str,
        system_instruction: &str,
        temperature: f64,
    ) -> Result<String, ContentError>;

    async fn generate_structured(&self, prompt: &str, schema: &Value)
        -> Result<Value, ContentError>;
}

impl<P: ContentProvider + ?Sized> ContentProvider for &P {
    async fn generate_text(
        &self,
        prompt: &str,
        system_instruction: &str,
        temperature: f64,
    ) -> Result<String, ContentError> {
        (**self).generate_text(prompt, system_instruction, temperature).await
    }

    async fn generate_structured(&self, prompt: &str, schema: &Value)
        -> Result<Value, ContentError> {
        (**self).generate_structured(prompt, schema).await
    }
}

/// Response schema for a challenge, in the provider's OpenAPI subset.
pub fn challenge_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "description": { "type": "STRING" },
            "points": { "type": "NUMBER" }
        },
        "required": ["title", "description", "points"]
    })
}

/// Check a structured response before anything is cached.
pub fn validate_challenge(value: &Value) -> Result<ChallengePayload, ContentError> {
    let obj = value
        .as_object()
        .ok_or_else(|| ContentError::MalformedResponse("challenge is not an object".into()))?;

    let text_field = |name: &str| -> Result<String, ContentError> {
        match obj.get(name).and_then(Value::as_str).map(str::trim) {
            Some(s) if !s.is_empty() => Ok(s.to_string()),
            Some(_) => Err(ContentError::MalformedResponse(format!("empty `{}`", name))),
            None => Err(ContentError::MalformedResponse(format!("missing `{}`", name))),
        }
    };

    let title = text_field("title")?;
    let description = text_field("description")?;
    let points = obj
        .get("points")
        .and_then(Value::as_f64)
        .ok_or_else(|| ContentError::MalformedResponse("missing `points`".into()))?;
    if !points.is_finite() || points < 0.0 || points > u32::MAX as f64 {
        return Err(ContentError::MalformedResponse(format!(
            "points out of range: {}",
            points
        )));
    }

    Ok(ChallengePayload {
        title,
        description,
        points: points.round() as u32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_complete_payload() {
        let payload = validate_challenge(&json!({
            "title": "Pray Duha",
            "description": "Pray two rak'ahs after sunrise.",
            "points": 150
        }))
        .unwrap();
        assert_eq!(payload.title, "Pray Duha");
        assert_eq!(payload.points, 150);
    }

    #[test]
    fn rejects_missing_fields() {
        let err = validate_challenge(&json!({ "title": "X" })).unwrap_err();
        assert!(matches!(err, ContentError::MalformedResponse(_)));
        assert!(err.to_string().contains("description"));
    }

    #[test]
    fn rejects_wrong_types_and_negative_points() {
        assert!(validate_challenge(&json!({
            "title": "X", "description": "Y", "points": "100"
        }))
        .is_err());
        assert!(validate_challenge(&json!({
            "title": "X", "description": "Y", "points": -5
        }))
        .is_err());
        assert!(validate_challenge(&json!({
            "title": "  ", "description": "Y", "points": 5
        }))
        .is_err());
        assert!(validate_challenge(&json!(["X", "Y", 5])).is_err());
    }

    #[test]
    fn fractional_points_round() {
        let payload = validate_challenge(&json!({
            "title": "X", "description": "Y", "points": 99.6
        }))
        .unwrap();
        assert_eq!(payload.points, 100);
    }
}
