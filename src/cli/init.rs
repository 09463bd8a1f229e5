use owo_colors::OwoColorize;
use std::error::Error;
use std::path::Path;
use std::process::Command;
use trim_studio::config::Config;

pub fn handle_init() -> Result<(), Box<dyn Error>> {
    // Check if already initialized
    if Config::exists()? {
        return Err("trim-studio is already initialized. Use 'trim config set <key> <value>' to change settings.".into());
    }

    let config = Config::new();

    println!("Checking media tools...");
    report_tool("ffmpeg", &config.ffmpeg());
    report_tool("ffprobe", &config.ffprobe());

    config.save()?;

    println!("trim-studio initialized successfully!");
    println!(
        "Configuration saved to: {}",
        Config::config_path()?.display()
    );

    Ok(())
}

fn report_tool(name: &str, path: &Path) {
    match tool_version(path) {
        Some(version) => println!("  {} {name}: {version}", "✓".green()),
        None => {
            println!(
                "  {} {name} not found at '{}'",
                "✗".red(),
                path.display()
            );
            println!("    Set it with: trim config set {name}_path <path>");
        }
    }
}

/// First line of `<tool> -version`, if the tool runs.
fn tool_version(path: &Path) -> Option<String> {
    let output = Command::new(path).arg("-version").output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|line| line.trim().to_string())
}
