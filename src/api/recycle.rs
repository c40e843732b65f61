//! Recycling analysis and audio endpoints

use std::sync::Arc;

use axum::{
    Json, RequestExt, Router,
    extract::{Multipart, Request, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};

use super::{ApiState, error::ApiError};
use crate::config::AudioMode;

/// Build the recycling router; `/api/generate-audio` exists in split mode only
pub fn router(state: Arc<ApiState>) -> Router {
    let mut router = Router::new().route("/api/recycle", post(recycle));
    if state.audio_mode == AudioMode::Split {
        router = router.route("/api/generate-audio", post(generate_audio));
    }
    router.with_state(state)
}

/// Guidance-only response (split mode)
#[derive(Debug, Serialize)]
pub struct RecycleResponse {
    pub result: String,
}

/// Analyze an uploaded photo
///
/// Expects `multipart/form-data` with an `image` file field.
async fn recycle(State(state): State<Arc<ApiState>>, req: Request) -> Result<Response, ApiError> {
    state.pipeline.require_guidance()?;

    let upload = read_image_field(req).await?;
    tracing::info!(bytes = upload.len(), mode = %state.audio_mode, "analyzing upload");

    match state.audio_mode {
        AudioMode::Inline => {
            let outcome = state.pipeline.analyze_with_audio(upload).await?;
            Ok(Json(outcome).into_response())
        }
        AudioMode::Split => {
            let result = state.pipeline.analyze(upload).await?;
            Ok(Json(RecycleResponse { result }).into_response())
        }
    }
}

/// Pull the bytes of the `image` file field out of a multipart request
async fn read_image_field(req: Request) -> Result<Vec<u8>, ApiError> {
    let Ok(mut multipart) = req.extract::<Multipart, _>().await else {
        return Err(ApiError::bad_request("No image provided"));
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError {
            status: e.status(),
            message: e.body_text(),
        })?
    {
        if field.name() != Some("image") {
            continue;
        }

        match field.file_name() {
            None => continue,
            Some("") => return Err(ApiError::bad_request("No image selected")),
            Some(_) => {}
        }

        let bytes = field.bytes().await.map_err(|e| ApiError {
            status: e.status(),
            message: e.body_text(),
        })?;
        return Ok(bytes.to_vec());
    }

    Err(ApiError::bad_request("No image provided"))
}

/// Audio generation request
#[derive(Debug, Deserialize)]
pub struct GenerateAudioRequest {
    pub text: Option<String>,
}

/// Audio generation response
#[derive(Debug, Serialize)]
pub struct GenerateAudioResponse {
    pub audio: String,
}

/// Summarize a guidance report and synthesize it
async fn generate_audio(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<GenerateAudioRequest>, JsonRejection>,
) -> Result<Json<GenerateAudioResponse>, ApiError> {
    if !state.pipeline.audio_available() {
        return Err(crate::Error::MissingApiKey {
            service: "ElevenLabs",
        }
        .into());
    }

    let text = payload
        .ok()
        .and_then(|Json(body)| body.text)
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("No text provided"))?;

    let audio = state.pipeline.generate_audio(&text).await?;
    Ok(Json(GenerateAudioResponse { audio }))
}
