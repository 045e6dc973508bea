use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{EDIT_GUIDANCE_SCALE, EDIT_INFERENCE_STEPS, MAX_IMAGE_BYTES};
use crate::error::{StudioError, StudioResult};
use crate::images::TaskKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditKind {
    Clothing,
    Car,
    Person,
}

impl EditKind {
    pub fn task(self) -> TaskKind {
        match self {
            EditKind::Clothing => TaskKind::ClothingEdit,
            EditKind::Car => TaskKind::CarEdit,
            EditKind::Person => TaskKind::PersonEdit,
        }
    }

    /// Rewrites an edit instruction into a plain scene description, for
    /// providers that can only generate from scratch.
    pub fn describe(self, instruction: &str) -> String {
        match self {
            EditKind::Clothing => format!(
                "Professional fashion photograph of a person wearing {}, studio lighting, detailed fabric texture, high quality",
                instruction
            ),
            EditKind::Car => format!(
                "Professional automotive photograph of {}, dramatic lighting, glossy reflections, high quality",
                instruction
            ),
            EditKind::Person => format!(
                "Professional portrait photograph of {}, natural lighting, sharp focus, high quality",
                instruction
            ),
        }
    }
}

impl fmt::Display for EditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.task().as_str())
    }
}

impl FromStr for EditKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<TaskKind>()
            .ok()
            .and_then(TaskKind::edit_kind)
            .ok_or_else(|| format!("unknown edit kind: {} (expected clothing, car or person)", s))
    }
}

/// An uploaded image, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    mime: String,
    data: String,
}

impl SourceImage {
    pub fn from_bytes(bytes: &[u8], mime: &str) -> StudioResult<Self> {
        if bytes.is_empty() {
            return Err(StudioError::MissingImage);
        }
        check_mime(mime)?;
        check_size(bytes.len())?;
        Ok(Self {
            mime: mime.to_string(),
            data: base64::encode(bytes),
        })
    }

    /// Accepts `data:<mime>;base64,<payload>`.
    pub fn from_data_url(data_url: &str) -> StudioResult<Self> {
        let data_url = data_url.trim();
        if data_url.is_empty() {
            return Err(StudioError::MissingImage);
        }
        let rest = data_url
            .strip_prefix("data:")
            .ok_or_else(|| StudioError::InvalidImage("expected a data: URL".to_string()))?;
        let (meta, payload) = rest
            .split_once(',')
            .ok_or_else(|| StudioError::InvalidImage("data URL has no payload".to_string()))?;
        let mime = meta
            .strip_suffix(";base64")
            .ok_or_else(|| StudioError::InvalidImage("data URL is not base64".to_string()))?;

        let bytes = base64::decode(payload)
            .map_err(|e| StudioError::InvalidImage(format!("bad base64 payload: {}", e)))?;
        Self::from_bytes(&bytes, mime)
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.data)
    }
}

fn check_mime(mime: &str) -> StudioResult<()> {
    if mime.starts_with("image/") {
        Ok(())
    } else {
        Err(StudioError::InvalidImage(format!(
            "{} is not an image type",
            mime
        )))
    }
}

fn check_size(len: usize) -> StudioResult<()> {
    if len > MAX_IMAGE_BYTES {
        Err(StudioError::InvalidImage(
            "File size must be less than 5MB".to_string(),
        ))
    } else {
        Ok(())
    }
}

pub fn mime_for_path(path: &str) -> &'static str {
    let ext = path
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Serialize)]
pub struct PredictionRequest {
    pub version: String,
    pub input: PredictionInput,
}

#[derive(Debug, Serialize)]
pub struct PredictionInput {
    pub image: String,
    pub prompt: String,
    pub num_inference_steps: u32,
    pub guidance_scale: f32,
}

impl PredictionRequest {
    pub fn new(version: &str, image: &SourceImage, prompt: &str) -> Self {
        Self {
            version: version.to_string(),
            input: PredictionInput {
                image: image.to_data_url(),
                prompt: prompt.to_string(),
                num_inference_steps: EDIT_INFERENCE_STEPS,
                guidance_scale: EDIT_GUIDANCE_SCALE,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Prediction {
    #[serde(default)]
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub output: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub urls: Option<PredictionUrls>,
}

#[derive(Debug, Deserialize)]
pub struct PredictionUrls {
    pub get: Option<String>,
}

impl Prediction {
    pub fn is_terminal(&self) -> bool {
        matches!(self.status.as_str(), "succeeded" | "failed" | "canceled")
    }

    pub fn succeeded(&self) -> bool {
        self.status == "succeeded"
    }

    /// `output[0]`, or `output` itself when the model returns a single URL.
    pub fn first_output(&self) -> Option<String> {
        let output = self.output.as_ref()?;
        let url = match output {
            Value::Array(items) => items.first()?.as_str()?,
            Value::String(url) => url.as_str(),
            _ => return None,
        };
        if url.is_empty() {
            None
        } else {
            Some(url.to_string())
        }
    }

    pub fn poll_url(&self) -> Option<&str> {
        self.urls.as_ref()?.get.as_deref()
    }

    pub fn error_detail(&self) -> String {
        match &self.error {
            Some(Value::String(msg)) => msg.clone(),
            Some(other) => other.to_string(),
            None => format!("prediction {}", self.status),
        }
    }
}
