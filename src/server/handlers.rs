//! Route handlers

use super::{ApiError, AppState};
use crate::error::ServiceError;
use axum::{body::Bytes, extract::State, Json};
use serde_json::{json, Value};
use std::time::Instant;
use tracing::{info, Instrument};
use uuid::Uuid;

const NO_TEXT: &str = "No text provided";
const TEXT_NOT_STRING: &str = "Field 'text' must be a string";
const PREVIEW_CHARS: usize = 50;

/// `GET /`
pub async fn index(State(state): State<AppState>) -> Json<Value> {
    let model_type = if state.settings().use_enhanced_model {
        "transformer-based"
    } else {
        "rule-based"
    };
    Json(json!({
        "service": "Sentiment Analysis API",
        "version": env!("CARGO_PKG_VERSION"),
        "model_type": model_type,
        "endpoints": {
            "/analyze": "POST - Analyze text sentiment",
            "/health": "GET - Check service health",
        },
    }))
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "sentiment-analysis",
        "enhanced_model": state.settings().use_enhanced_model,
    }))
}

/// `POST /analyze`
pub async fn analyze(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>, ApiError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("analyze", %request_id);

    async move {
        let text = extract_text(&body)?;
        let started = Instant::now();

        let preview: String = text.chars().take(PREVIEW_CHARS).collect();
        info!(text = %preview, "Received request to analyze text");

        let analyzer = state.analyzer().await?;
        let naming = state
            .settings()
            .response_shape
            .resolve(analyzer.native_naming());

        let result = tokio::task::spawn_blocking(move || analyzer.predict(&text))
            .await
            .map_err(|e| ServiceError::Internal(format!("prediction task failed: {}", e)))?;

        info!(
            label = %result.label,
            score = result.score,
            "Processing time: {:.2}s",
            started.elapsed().as_secs_f64()
        );

        let body = result.to_json(naming).map_err(ServiceError::from)?;
        Ok::<_, ApiError>(Json(body))
    }
    .instrument(span)
    .await
}

/// Pull `text` out of a request body.
///
/// Unparseable bodies, non-objects and a missing or null `text` all count
/// as "no text".
pub fn extract_text(body: &[u8]) -> Result<String, ServiceError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|_| ServiceError::InvalidRequest(NO_TEXT.to_string()))?;

    match value.get("text") {
        None | Some(Value::Null) => Err(ServiceError::InvalidRequest(NO_TEXT.to_string())),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(_) => Err(ServiceError::InvalidRequest(TEXT_NOT_STRING.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text() {
        assert_eq!(extract_text(br#"{"text": "hello"}"#).unwrap(), "hello");
        assert_eq!(extract_text(br#"{"text": ""}"#).unwrap(), "");
        assert_eq!(
            extract_text(br#"{"text": "hi", "extra": 1}"#).unwrap(),
            "hi"
        );
    }

    #[test]
    fn test_extract_text_missing() {
        for body in [
            &br#"{}"#[..],
            br#"{"text": null}"#,
            br#"{"content": "hello"}"#,
            br#"["text"]"#,
            br#""text""#,
            b"not json",
            b"",
        ] {
            let err = extract_text(body).unwrap_err();
            assert_eq!(err.to_string(), "Invalid request: No text provided");
        }
    }

    #[test]
    fn test_extract_text_wrong_type() {
        for body in [&br#"{"text": 42}"#[..], br#"{"text": ["a"]}"#, br#"{"text": {}}"#] {
            let err = extract_text(body).unwrap_err();
            assert!(matches!(err, ServiceError::InvalidRequest(ref m) if m == TEXT_NOT_STRING));
        }
    }
}
