//! Shared test utilities

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use recycle_guide::api::ApiServerBuilder;
use recycle_guide::{
    AudioMode, DeterministicExtraction, Error, GuidanceModel, ImagePayload, RecyclePipeline,
    Result, SpeechService, SpeechSynthesizer, Voice,
};

pub const BOUNDARY: &str = "recycle-test-boundary";

/// Report shaped like the reasoning service's answer
pub const SAMPLE_REPORT: &str = "## Recycling Instructions
1. Empty and rinse the can.
2. Leave the tab attached.

## Materials Breakdown
- ♻️ Aluminium

## Eco-Friendly Tips
1. Crush cans to save bin space.
2. Buy multipacks without plastic rings.
3. Return cans with a deposit.

## Environmental Impact
🌍 Did you know? Recycling one can saves enough energy to run a TV for three hours.";

/// Reasoning service that records what it was sent
#[derive(Default)]
pub struct FakeGuidance {
    pub images: Mutex<Vec<ImagePayload>>,
}

#[async_trait]
impl GuidanceModel for FakeGuidance {
    async fn generate(&self, _prompt: &str, image: Option<&ImagePayload>) -> Result<String> {
        if let Some(image) = image {
            self.images.lock().unwrap().push(image.clone());
        }
        Ok(SAMPLE_REPORT.to_string())
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Reasoning service that analyzes photos but rejects text-only requests
pub struct QuotaLimitedGuidance;

#[async_trait]
impl GuidanceModel for QuotaLimitedGuidance {
    async fn generate(&self, _prompt: &str, image: Option<&ImagePayload>) -> Result<String> {
        match image {
            Some(_) => Ok(SAMPLE_REPORT.to_string()),
            None => Err(Error::Guidance("quota exceeded".to_string())),
        }
    }

    fn name(&self) -> &'static str {
        "quota-limited"
    }
}

/// Speech service returning the synthesized text as "audio"
pub struct FakeSpeech {
    pub catalog: Vec<Voice>,
    pub requests: Mutex<Vec<(String, String)>>,
}

impl FakeSpeech {
    pub fn with_voices(names: &[(&str, &str)]) -> Self {
        Self {
            catalog: names
                .iter()
                .map(|(id, name)| Voice {
                    voice_id: (*id).to_string(),
                    name: (*name).to_string(),
                })
                .collect(),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SpeechService for FakeSpeech {
    async fn voices(&self) -> Result<Vec<Voice>> {
        Ok(self.catalog.clone())
    }

    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Vec<u8>> {
        self.requests
            .lock()
            .unwrap()
            .push((text.to_string(), voice_id.to_string()));
        Ok(text.as_bytes().to_vec())
    }
}

/// Build a test API router
pub fn build_test_router(
    mode: AudioMode,
    guidance: Option<Arc<FakeGuidance>>,
    speech: Option<Arc<FakeSpeech>>,
) -> axum::Router {
    let guidance = guidance.map(|g| g as Arc<dyn GuidanceModel>);
    let speech = speech.map(|s| s as Arc<dyn SpeechService>);

    let pipeline = RecyclePipeline::new(
        guidance,
        Arc::new(DeterministicExtraction),
        SpeechSynthesizer::with_default_voices(speech),
    );

    build_router(pipeline, mode, None)
}

/// Build a router around an assembled pipeline, optionally serving a static dir
pub fn build_router(
    pipeline: RecyclePipeline,
    mode: AudioMode,
    static_dir: Option<PathBuf>,
) -> axum::Router {
    ApiServerBuilder::new(pipeline)
        .audio_mode(mode)
        .static_dir(static_dir)
        .build()
        .router()
}

/// Encode a small JPEG photo
pub fn sample_jpeg() -> Vec<u8> {
    let img = image::RgbImage::from_fn(16, 16, |x, y| {
        image::Rgb([(x * 16) as u8, (y * 16) as u8, 128])
    });
    let mut out = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Jpeg)
        .expect("failed to encode test jpeg");
    out
}

/// A multipart part: (field name, optional file name, bytes)
pub type Part<'a> = (&'a str, Option<&'a str>, &'a [u8]);

/// Build a `multipart/form-data` body
pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, filename, data) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match filename {
            Some(file) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file}\"\r\n\
                     Content-Type: image/jpeg\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// POST a multipart upload to `/api/recycle`
pub fn recycle_request(parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/recycle")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

/// POST a JSON body
pub fn json_request(uri: &str, json: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

/// Read a response body as JSON
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
