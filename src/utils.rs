use crate::constants::{CMD_EDIT, CMD_ENHANCE, CMD_HEALTH, CMD_IMAGE, CMD_VIDEO};
use crate::edit::{mime_for_path, EditKind, SourceImage};
use crate::error::{StudioError, StudioResult};
use crate::health::HealthReport;
use crate::images::TaskKind;
use crate::orchestrator::{GenerationResult, Studio};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use std::error::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Image(String),
    Video(String),
    Edit {
        kind: EditKind,
        image_path: String,
        instruction: String,
    },
    Enhance {
        task: TaskKind,
        prompt: String,
    },
    Health,
}

pub fn build_headers(token: &str) -> StudioResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    let bearer = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|_| StudioError::Config("credential is not a valid header value".to_string()))?;
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

pub fn create_spinner(color: &str, message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template(&format!("{{spinner:.{}}} {{msg}}", color)),
    );
    spinner.enable_steady_tick(100);
    spinner.set_message(message);

    spinner
}

/// Loads an image from a file path, or decodes it when given a `data:` URL.
pub async fn encode_image(image_path: &str) -> StudioResult<SourceImage> {
    if image_path.trim().is_empty() {
        return Err(StudioError::MissingImage);
    }
    if image_path.starts_with("data:") {
        return SourceImage::from_data_url(image_path);
    }
    let bytes = tokio::fs::read(image_path)
        .await
        .map_err(|_| StudioError::InvalidImage(format!("Failed to open image file: {}", image_path)))?;
    SourceImage::from_bytes(&bytes, mime_for_path(image_path))
}

pub fn parse_command(args: &[String]) -> Result<Command, Box<dyn Error>> {
    let rest = |from: usize| args.get(from..).map(|a| a.join(" ")).unwrap_or_default();

    let command = match args.get(1).map(String::as_str) {
        Some(CMD_IMAGE) => Command::Image(rest(2)),
        Some(CMD_VIDEO) => Command::Video(rest(2)),
        Some(CMD_EDIT) => {
            let kind = args
                .get(2)
                .ok_or("edit needs a kind: clothing, car or person")?
                .parse::<EditKind>()?;
            Command::Edit {
                kind,
                image_path: args.get(3).cloned().unwrap_or_default(),
                instruction: rest(4),
            }
        }
        Some(CMD_ENHANCE) => {
            let task = args
                .get(2)
                .ok_or("enhance needs a task kind")?
                .parse::<TaskKind>()?;
            Command::Enhance {
                task,
                prompt: rest(3),
            }
        }
        Some(CMD_HEALTH) => Command::Health,
        _ => Command::Image(rest(1)),
    };
    Ok(command)
}

pub fn print_result(result: &GenerationResult) {
    if result.success {
        println!("{} {}", "Output:".bold().green(), result.output);
    } else {
        println!(
            "{} {}",
            "Failed:".bold().red(),
            result.error.as_deref().unwrap_or("unknown error")
        );
    }
    println!("{} {}", "Prompt:".bold(), result.enhanced_prompt);
    let provider = if result.used_fallback {
        format!("{} (fallback)", result.provider).yellow()
    } else {
        result.provider.normal()
    };
    println!("{} {}", "Provider:".bold(), provider);
    if let Some(seed) = result.seed {
        println!("{} {}", "Seed:".bold(), seed);
    }
    if let Some(note) = &result.note {
        println!("{} {}", "Note:".bold().cyan(), note);
    }
}

pub fn print_health(report: &HealthReport) {
    let status = |ok: bool| if ok { "up".green() } else { "down".red() };
    println!("{:<18}{}", "text completion", status(report.text_completion));
    println!("{:<18}{}", "image generation", status(report.image_generation));
    println!("{:<18}{}", "image edit", status(report.image_edit));
}

/// Input errors are reported to the user; anything else is returned.
fn report_invalid_input(err: StudioError) -> Result<(), Box<dyn Error>> {
    if err.is_validation() {
        println!("{} {}", "Invalid input:".bold().yellow(), err);
        Ok(())
    } else {
        Err(err.into())
    }
}

pub async fn process_command(studio: &Studio, args: &[String]) -> Result<(), Box<dyn Error>> {
    let command = parse_command(args)?;
    let spinner_color = match &command {
        Command::Image(_) => "green",
        Command::Video(_) => "magenta",
        Command::Edit { .. } => "red",
        Command::Enhance { .. } => "cyan",
        Command::Health => "blue",
    };

    // Load the image before the spinner starts so a bad path fails fast.
    let image = match &command {
        Command::Edit { image_path, .. } => match encode_image(image_path).await {
            Ok(image) => Some(image),
            Err(err) => return report_invalid_input(err),
        },
        _ => None,
    };

    let spinner = create_spinner(spinner_color, "Processing request...".to_string());
    let result = match (command, image) {
        (Command::Image(prompt), _) => studio.generate_image(&prompt).await,
        (Command::Video(prompt), _) => studio.generate_video(&prompt).await,
        (Command::Edit { kind, instruction, .. }, Some(image)) => {
            studio.edit_image(&image, &instruction, kind).await
        }
        (Command::Edit { .. }, None) => Err(StudioError::MissingImage),
        (Command::Enhance { task, prompt }, _) => {
            spinner.finish_and_clear();
            if prompt.trim().is_empty() {
                return report_invalid_input(StudioError::EmptyPrompt);
            }
            let enhanced = studio.enhance(&prompt, task).await;
            println!("{}", enhanced);
            return Ok(());
        }
        (Command::Health, _) => {
            let report = studio.check_health().await;
            spinner.finish_and_clear();
            print_health(&report);
            return Ok(());
        }
    };
    spinner.finish_and_clear();

    match result {
        Ok(result) => {
            print_result(&result);
            Ok(())
        }
        Err(err) => report_invalid_input(err),
    }
}
