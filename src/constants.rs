use std::time::Duration;

pub const TEXT_PROVIDER_NAME: &str = "groq";
pub const TEXT_API_URL: &str = "https://api.groq.com/openai/v1";
pub const TEXT_MODEL: &str = "llama3-8b-8192";
pub const TEXT_COMPLETIONS_PATH: &str = "chat/completions";
pub const TEXT_PROBE_PATH: &str = "models";
pub const TEXT_TEMPERATURE: f32 = 0.7;
pub const TEXT_MAX_TOKENS: u32 = 100;
pub const TEXT_TIMEOUT: Duration = Duration::from_secs(10);

pub const IMAGE_PROVIDER_NAME: &str = "pollinations";
pub const IMAGE_API_URL: &str = "https://image.pollinations.ai";
pub const IMAGE_MODEL: &str = "flux";
pub const IMAGE_PROMPT_PATH: &str = "prompt";
pub const IMAGE_TIMEOUT: Duration = Duration::from_secs(15);

pub const EDIT_PROVIDER_NAME: &str = "replicate";
pub const EDIT_API_URL: &str = "https://api.replicate.com/v1";
// timothybrooks/instruct-pix2pix
pub const EDIT_MODEL_VERSION: &str =
    "30c1d0b916a6f8efce20493f5d61ee27491ab2a60437c13c588468b9810ec23f";
pub const EDIT_PREDICTIONS_PATH: &str = "predictions";
pub const EDIT_PROBE_PATH: &str = "account";
pub const EDIT_INFERENCE_STEPS: u32 = 50;
pub const EDIT_GUIDANCE_SCALE: f32 = 7.5;
pub const EDIT_TIMEOUT: Duration = Duration::from_secs(300);

pub const PLACEHOLDER_PROVIDER_NAME: &str = "placeholder";

pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);
pub const SEED_RANGE: u32 = 100_000;
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

pub const VIDEO_STYLE_SUFFIX: &str = "cinematic shot, 4k, film grain, professional cinematography";
pub const VIDEO_NOTE: &str = "Real-time video generation requires GPU infrastructure. This is a high-quality cinematic frame.";
pub const REGENERATION_NOTE: &str = "Generated new image based on your instruction. True image-to-image editing requires dedicated GPU infrastructure.";
pub const PLACEHOLDER_NOTE: &str =
    "All generation providers were unavailable. This is a locally rendered placeholder.";

pub const SYSTEM_PROMPT_IMAGE: &str = "You are an expert prompt engineer for FLUX image generation. Enhance this prompt to be highly detailed and artistic. Keep under 50 words. Return only the enhanced prompt, no explanation.";
pub const SYSTEM_PROMPT_VIDEO: &str = "You are an expert at describing cinematic scenes. Enhance this prompt with camera angles, lighting, and motion details. Keep under 50 words. Return only the enhanced prompt.";
pub const SYSTEM_PROMPT_CLOTHING: &str = "Convert this into a clear image editing instruction for changing clothing. Example: 'Replace the shirt with a red leather jacket'. Keep it under 15 words. Return only the instruction.";
pub const SYSTEM_PROMPT_CAR: &str = "Convert this into a clear image editing instruction for changing a car. Example: 'Replace the car with a red Ferrari 488'. Keep it under 15 words. Return only the instruction.";
pub const SYSTEM_PROMPT_PERSON: &str = "Convert this into a clear image editing instruction for replacing a person. Example: 'Replace the person with a futuristic cyborg'. Keep it under 15 words. Return only the instruction.";

pub const CMD_IMAGE: &str = "i";
pub const CMD_VIDEO: &str = "v";
pub const CMD_EDIT: &str = "e";
pub const CMD_ENHANCE: &str = "p";
pub const CMD_HEALTH: &str = "health";
