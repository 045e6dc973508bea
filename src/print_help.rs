use colored::Colorize;

pub fn print_help() {
    println!("{:━^60}", " GENSTUDIO ".yellow());
    println!("Usage:");
    println!("  {} [command] <argument>", "genstudio".bold().green());
    println!("\nCommands:");
    println!("  {}       Generate an image (default).", "i".bold().green());
    println!(
        "  {}       Generate a cinematic video frame.",
        "v".bold().magenta()
    );
    println!(
        "  {}       Edit an image: clothing, car or person.",
        "e".bold().red()
    );
    println!("  {}       Enhance a prompt only.", "p".bold().cyan());
    println!("  {}  Check provider availability.", "health".bold().blue());
    println!(
        "  {} Display this help message.",
        "-h, -help".bold().blue()
    );
    println!("\nEnvironment:");
    println!("  {}        Enables prompt enhancement.", "GROQ_API_KEY".bold());
    println!(
        "  {} Enables true image editing.",
        "REPLICATE_API_TOKEN".bold()
    );
    println!("  {}            Log verbosity, e.g. info.", "RUST_LOG".bold());
    println!("\nExamples:");
    println!(
        "  {} A cyberpunk street at night with neon rain",
        "genstudio i".bold().green()
    );
    println!(
        "  {} A drone shot of a futuristic city at sunset",
        "genstudio v".bold().magenta()
    );
    println!(
        "  {} me.jpg a red leather jacket",
        "genstudio e clothing".bold().red()
    );
    println!(
        "  {} a lighthouse in a storm",
        "genstudio p image".bold().cyan()
    );
    println!("{:━^60}", "".yellow());
}
