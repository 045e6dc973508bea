use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::Serialize;
use url::Url;

use crate::config::ProviderConfig;
use crate::constants::{
    IMAGE_PROMPT_PATH, SEED_RANGE, SYSTEM_PROMPT_CAR, SYSTEM_PROMPT_CLOTHING, SYSTEM_PROMPT_IMAGE,
    SYSTEM_PROMPT_PERSON, SYSTEM_PROMPT_VIDEO, VIDEO_STYLE_SUFFIX,
};
use crate::edit::EditKind;
use crate::error::{StudioError, StudioResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Image,
    Video,
    ClothingEdit,
    CarEdit,
    PersonEdit,
}

impl TaskKind {
    pub const ALL: [TaskKind; 5] = [
        TaskKind::Image,
        TaskKind::Video,
        TaskKind::ClothingEdit,
        TaskKind::CarEdit,
        TaskKind::PersonEdit,
    ];

    pub fn system_prompt(self) -> &'static str {
        match self {
            TaskKind::Image => SYSTEM_PROMPT_IMAGE,
            TaskKind::Video => SYSTEM_PROMPT_VIDEO,
            TaskKind::ClothingEdit => SYSTEM_PROMPT_CLOTHING,
            TaskKind::CarEdit => SYSTEM_PROMPT_CAR,
            TaskKind::PersonEdit => SYSTEM_PROMPT_PERSON,
        }
    }

    pub fn dimensions(self) -> Dimensions {
        match self {
            TaskKind::Video => Dimensions::WIDESCREEN,
            _ => Dimensions::SQUARE,
        }
    }

    pub fn style_suffix(self) -> Option<&'static str> {
        match self {
            TaskKind::Video => Some(VIDEO_STYLE_SUFFIX),
            _ => None,
        }
    }

    pub fn edit_kind(self) -> Option<EditKind> {
        match self {
            TaskKind::ClothingEdit => Some(EditKind::Clothing),
            TaskKind::CarEdit => Some(EditKind::Car),
            TaskKind::PersonEdit => Some(EditKind::Person),
            TaskKind::Image | TaskKind::Video => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::Image => "image",
            TaskKind::Video => "video",
            TaskKind::ClothingEdit => "clothing",
            TaskKind::CarEdit => "car",
            TaskKind::PersonEdit => "person",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskKind::ALL
            .iter()
            .copied()
            .find(|task| task.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown task kind: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const SQUARE: Dimensions = Dimensions {
        width: 1024,
        height: 1024,
    };
    pub const WIDESCREEN: Dimensions = Dimensions {
        width: 1920,
        height: 1080,
    };
}

pub fn random_seed() -> u32 {
    rand::thread_rng().gen_range(0..SEED_RANGE)
}

/// One user action, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    raw_prompt: String,
    task: TaskKind,
    seed: u32,
    dimensions: Dimensions,
}

impl GenerationRequest {
    pub fn new(raw_prompt: &str, task: TaskKind) -> Self {
        Self {
            raw_prompt: raw_prompt.to_string(),
            task,
            seed: random_seed(),
            dimensions: task.dimensions(),
        }
    }

    pub fn raw_prompt(&self) -> &str {
        &self.raw_prompt
    }

    pub fn task(&self) -> TaskKind {
        self.task
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }
}

/// A fully formed image URL; fetching it is what triggers generation.
#[derive(Debug, Clone)]
pub struct ImageUrlRequest {
    pub url: Url,
    pub prompt: String,
    pub seed: u32,
    pub dimensions: Dimensions,
}

#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_endpoint: String,
    model: String,
}

impl RequestBuilder {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            base_endpoint: config.base_endpoint.clone(),
            model: config.model.clone(),
        }
    }

    pub fn build(
        &self,
        prompt: &str,
        dimensions: Dimensions,
        style_suffix: Option<&str>,
    ) -> StudioResult<ImageUrlRequest> {
        self.build_seeded(prompt, dimensions, style_suffix, random_seed())
    }

    pub fn build_seeded(
        &self,
        prompt: &str,
        dimensions: Dimensions,
        style_suffix: Option<&str>,
        seed: u32,
    ) -> StudioResult<ImageUrlRequest> {
        let prompt = match style_suffix {
            Some(suffix) => format!("{}, {}", prompt, suffix),
            None => prompt.to_string(),
        };
        // URL parsers collapse these as relative path segments.
        if prompt == "." || prompt == ".." {
            return Err(StudioError::EmptyPrompt);
        }

        let mut url = Url::parse(&self.base_endpoint).map_err(|source| {
            StudioError::InvalidEndpoint {
                endpoint: self.base_endpoint.clone(),
                source,
            }
        })?;
        url.path_segments_mut()
            .map_err(|_| StudioError::InvalidEndpoint {
                endpoint: self.base_endpoint.clone(),
                source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
            })?
            .pop_if_empty()
            .push(IMAGE_PROMPT_PATH)
            .push(&prompt);
        url.query_pairs_mut()
            .append_pair("width", &dimensions.width.to_string())
            .append_pair("height", &dimensions.height.to_string())
            .append_pair("seed", &seed.to_string())
            .append_pair("model", &self.model)
            .append_pair("nologo", "true")
            .append_pair("enhance", "true");

        Ok(ImageUrlRequest {
            url,
            prompt,
            seed,
            dimensions,
        })
    }
}
