//! Prompt enhancement and provider fallback for AI image, video-frame and
//! image-edit generation.
//!
//! A [`Studio`] is built once from a [`Config`] and then serves any number of
//! independent requests. Each capability enhances the user's prompt, builds a
//! provider request and walks an ordered [`ProviderChain`] until something
//! renderable comes back.

pub mod chat;
pub mod config;
pub mod constants;
pub mod edit;
pub mod enhancer;
pub mod error;
pub mod fetch;
pub mod health;
pub mod images;
pub mod orchestrator;
pub mod placeholder;
pub mod print_help;
pub mod providers;
pub mod utils;


pub use config::{Config, ProviderConfig};
pub use edit::{EditKind, SourceImage};
pub use enhancer::PromptEnhancer;
pub use error::{StudioError, StudioResult};
pub use fetch::{fetch_with_timeout, retry_with_backoff, FetchedResponse, RetryPolicy};
pub use health::HealthReport;
pub use images::{Dimensions, GenerationRequest, RequestBuilder, TaskKind};
pub use orchestrator::{GenerationResult, Studio};
pub use providers::{GenerationJob, GenerationProvider, ProviderChain, ProviderOutput};
