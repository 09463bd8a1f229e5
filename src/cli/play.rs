use std::error::Error;
use std::path::Path;

use trim_studio::utils::validation::validate_mp3_file;

pub fn handle_play(file: &str) -> Result<(), Box<dyn Error>> {
    let path = Path::new(file);
    validate_mp3_file(path)?;

    #[cfg(feature = "player")]
    {
        let config = trim_studio::config::Config::load()?;
        crate::player::run(path, &config)
    }

    #[cfg(not(feature = "player"))]
    {
        print_player_unavailable();
        Ok(())
    }
}

#[cfg(not(feature = "player"))]
pub fn print_player_unavailable() {
    use owo_colors::OwoColorize;
    println!("{} {}", "🎵".cyan(), "Audio Player".bold());
    println!();
    println!(
        "{} The audio player requires the 'player' feature to be enabled.",
        "Note:".yellow()
    );
    println!();
    println!("To enable it, install with:");
    println!("  {}", "cargo install trim-studio --features player".cyan());
    println!();
    println!("Or if building from source:");
    println!("  {}", "cargo build --release --features player".cyan());
}
