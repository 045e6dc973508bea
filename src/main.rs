use genstudio::print_help::print_help;
use genstudio::utils::process_command;
use genstudio::{Config, Studio};
use std::{env, error::Error};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.iter().any(|arg| arg == "-help" || arg == "-h") {
        print_help();
        return Ok(());
    }

    let config = Config::from_env()?;
    let client = reqwest::Client::builder()
        .timeout(config.edit.timeout)
        .build()?;
    let studio = Studio::new(client, config);

    process_command(&studio, &args).await
}
