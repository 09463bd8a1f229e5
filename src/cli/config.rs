use std::error::Error;
use std::process::Command;
use trim_studio::config::Config;

pub fn handle_config_view() -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;

    println!("Current trim-studio configuration:");
    println!("  ffmpeg_path: {}", config.ffmpeg_path);
    println!("  ffprobe_path: {}", config.ffprobe_path);
    println!(
        "  output_dir: {}",
        config.output_dir.as_deref().unwrap_or("(current directory)")
    );
    println!("  max_load_retries: {}", config.max_load_retries);
    println!("  load_retry_delay_ms: {}", config.load_retry_delay_ms);
    println!(
        "  recreate_engine_on_retry: {}",
        config.recreate_engine_on_retry
    );
    println!("  repair_delay_ms: {}", config.repair_delay_ms);
    println!("  reload_on_stale_resume: {}", config.reload_on_stale_resume);

    Ok(())
}

pub fn handle_config_set(key: &str, value: &str) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load()?;

    config.set_value(key, value)?;
    config.save()?;

    println!("Configuration updated: {key} = {value}");

    Ok(())
}

pub fn handle_config_edit() -> Result<(), Box<dyn Error>> {
    // Ensure config exists
    if !Config::exists()? {
        return Err("trim-studio not initialized. Run 'trim init' first.".into());
    }

    let config_path = Config::config_path()?;
    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());

    println!("Opening {} in {}", config_path.display(), editor);

    let status = Command::new(&editor)
        .arg(&config_path)
        .status()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                format!("Editor '{editor}' not found. Set $EDITOR to a valid editor path.")
            } else {
                format!("Failed to launch editor '{editor}': {e}")
            }
        })?;

    if !status.success() {
        return Err(format!("Editor '{editor}' exited with error").into());
    }

    // Validate the config after editing
    match Config::load() {
        Ok(_) => println!("Configuration saved successfully"),
        Err(e) => {
            return Err(format!("Configuration validation failed: {e}").into());
        }
    }

    Ok(())
}
