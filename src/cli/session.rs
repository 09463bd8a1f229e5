//! Interactive trim session: pick a file, edit the range, choose where the
//! result goes, extract, and optionally listen to it.

use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};
use owo_colors::OwoColorize;
use std::error::Error;
use std::path::{Path, PathBuf};

use trim_studio::config::Config;
use trim_studio::extraction::ExtractionState;
use trim_studio::media::{DurationProbe, Transcoder};
use trim_studio::playback::EngineFactory;
use trim_studio::timecode;
use trim_studio::utils::progress::with_spinner;
use trim_studio::utils::scan::collect_mp3_files;
use trim_studio::utils::validation::validate_directory;
use trim_studio::workbench::{PickedFile, StatusKind, Workbench};

pub fn handle_session(dir: &str) -> Result<(), Box<dyn Error>> {
    if !console::user_attended() {
        return Err(
            "The session command needs an interactive terminal. Use 'trim trim' in scripts."
                .into(),
        );
    }

    let dir = PathBuf::from(shellexpand::tilde(dir).as_ref());
    validate_directory(&dir)?;

    let config = Config::load()?;
    let files = with_spinner(format!("Scanning {}", dir.display()), || {
        collect_mp3_files(&dir)
    })?;
    if files.is_empty() {
        return Err(format!("No MP3 files found in {}", dir.display()).into());
    }

    let theme = ColorfulTheme::default();
    let mut bench = super::workbench(&config);

    let picked = pick_file(&theme, &dir, &files)?;
    let selected = with_spinner("Reading duration...", || bench.select_file(picked));
    print_status(&bench);
    if !selected {
        return Ok(());
    }

    edit_range(&theme, &mut bench)?;

    let out_dir = choose_output_dir(&theme, &config, bench.session().selected_path())?;
    if let Some(dir) = &out_dir
        && let Some(planned) = bench.planned_output(dir)
    {
        println!("{} {}", "Writing:".bold(), planned.display());
    }

    let state = with_spinner("Extracting audio...", || {
        bench.extract_to(out_dir.as_deref()).clone()
    });
    if let ExtractionState::Error { message } = state {
        return Err(message.into());
    }
    print_status(&bench);

    if matches!(state, ExtractionState::Success { .. })
        && Confirm::with_theme(&theme)
            .with_prompt("Play the trimmed file now?")
            .default(true)
            .interact()?
    {
        super::trim::play_result(bench)?;
    }

    Ok(())
}

fn pick_file(
    theme: &ColorfulTheme,
    dir: &Path,
    files: &[PathBuf],
) -> Result<Option<PickedFile>, Box<dyn Error>> {
    let labels: Vec<String> = files
        .iter()
        .map(|file| file.strip_prefix(dir).unwrap_or(file).display().to_string())
        .collect();

    let choice = Select::with_theme(theme)
        .with_prompt("Select an MP3 file (Esc to cancel)")
        .items(&labels[..])
        .default(0)
        .interact_opt()?;

    Ok(choice.map(|index| PickedFile::from_path(files[index].clone())))
}

/// Prompt for start and end until the session accepts each value.
fn edit_range<P, T, F>(
    theme: &ColorfulTheme,
    bench: &mut Workbench<P, T, F>,
) -> Result<(), Box<dyn Error>>
where
    P: DurationProbe,
    T: Transcoder,
    F: EngineFactory,
{
    loop {
        let current = timecode::format(bench.session().range().start);
        let text: String = Input::<String>::with_theme(theme)
            .with_prompt("Start")
            .default(current)
            .interact_text()?;
        if bench.set_start_text(&text) {
            break;
        }
        println!(
            "{} start must not be negative and must come before the end ({})",
            "Rejected:".yellow(),
            timecode::format(bench.session().range().end)
        );
    }

    loop {
        let current = timecode::format(bench.session().range().end);
        let text: String = Input::<String>::with_theme(theme)
            .with_prompt("End")
            .default(current)
            .interact_text()?;
        if bench.set_end_text(&text) {
            break;
        }
        println!(
            "{} end must come after the start ({}) and not pass {}",
            "Rejected:".yellow(),
            timecode::format(bench.session().range().start),
            timecode::format(bench.session().file().duration_seconds)
        );
    }

    let range = bench.session().range();
    println!(
        "{} {} → {} ({})",
        "Range:".bold(),
        timecode::format(range.start),
        timecode::format(range.end),
        timecode::format(range.length())
    );
    Ok(())
}

/// Ask where the trimmed file goes. `None` means the user backed out.
fn choose_output_dir(
    theme: &ColorfulTheme,
    config: &Config,
    source: Option<&Path>,
) -> Result<Option<PathBuf>, Box<dyn Error>> {
    let mut choices: Vec<(String, Option<PathBuf>)> = Vec::new();

    let default_dir = super::default_output_dir(config)?;
    choices.push((
        format!("Export folder ({})", default_dir.display()),
        Some(default_dir),
    ));
    if let Some(parent) = source.and_then(Path::parent)
        && !parent.as_os_str().is_empty()
    {
        choices.push((
            format!("Next to the source ({})", parent.display()),
            Some(parent.to_path_buf()),
        ));
    }
    choices.push(("Another folder...".to_string(), None));

    let labels: Vec<&str> = choices.iter().map(|(label, _)| label.as_str()).collect();
    let Some(index) = Select::with_theme(theme)
        .with_prompt("Save the trimmed file to (Esc to cancel)")
        .items(&labels[..])
        .default(0)
        .interact_opt()?
    else {
        return Ok(None);
    };

    if let Some(dir) = &choices[index].1 {
        return Ok(Some(dir.clone()));
    }

    let typed: String = Input::<String>::with_theme(theme)
        .with_prompt("Folder")
        .interact_text()?;
    let dir = PathBuf::from(shellexpand::tilde(typed.trim()).as_ref());
    validate_directory(&dir)?;
    Ok(Some(dir))
}

fn print_status<P, T, F>(bench: &Workbench<P, T, F>)
where
    P: DurationProbe,
    T: Transcoder,
    F: EngineFactory,
{
    let Some(status) = bench.status() else {
        return;
    };
    match status.kind {
        StatusKind::Info => println!("{} {}", "•".cyan(), status.text),
        StatusKind::Success => println!("{} {}", "✓".green(), status.text),
        StatusKind::Error => println!("{} {}", "✗".red(), status.text),
    }
}
