use owo_colors::OwoColorize;
use std::error::Error;
use std::path::{Path, PathBuf};

use trim_studio::config::Config;
use trim_studio::extraction::ExtractionState;
use trim_studio::media::{DurationProbe, Transcoder};
use trim_studio::playback::EngineFactory;
use trim_studio::timecode;
use trim_studio::utils::progress::with_spinner;
use trim_studio::utils::validation::{validate_directory, validate_mp3_file};
use trim_studio::workbench::{PickedFile, Workbench};

pub struct TrimArgs<'a> {
    pub file: &'a str,
    pub start: Option<&'a str>,
    pub end: Option<&'a str>,
    pub out_dir: Option<&'a str>,
    pub play: bool,
}

pub fn handle_trim(args: TrimArgs<'_>) -> Result<(), Box<dyn Error>> {
    let source = Path::new(args.file);
    validate_mp3_file(source)?;

    let config = Config::load()?;
    let out_dir = match args.out_dir {
        Some(dir) => PathBuf::from(shellexpand::tilde(dir).as_ref()),
        None => super::default_output_dir(&config)?,
    };
    validate_directory(&out_dir)?;

    let mut bench = super::workbench(&config);

    with_spinner(format!("Reading {}", source.display()), || {
        bench.select_file(Some(PickedFile::from_path(source.to_path_buf())))
    });
    let duration = bench.session().file().duration_seconds;
    println!(
        "{} {} ({})",
        "Source:".bold(),
        source.display(),
        timecode::format(duration).cyan()
    );

    apply_range(&mut bench, args.start, args.end)?;

    let state = extract(&mut bench, &out_dir)?;
    println!("{} {}", "✓".green(), state.message());

    if args.play {
        play_result(bench)?;
    }

    Ok(())
}

/// Apply the requested start and end, in that order, failing on the first
/// value the session rejects.
pub fn apply_range<P, T, F>(
    bench: &mut Workbench<P, T, F>,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<(), Box<dyn Error>>
where
    P: DurationProbe,
    T: Transcoder,
    F: EngineFactory,
{
    if let Some(start) = start
        && !bench.set_start_text(start)
    {
        let range = bench.session().range();
        return Err(format!(
            "Start {start} rejected: it must be at least 0:00.0 and before the end ({})",
            timecode::format(range.end)
        )
        .into());
    }

    if let Some(end) = end
        && !bench.set_end_text(end)
    {
        let range = bench.session().range();
        let duration = bench.session().file().duration_seconds;
        return Err(format!(
            "End {end} rejected: it must be after the start ({}) and no later than {}",
            timecode::format(range.start),
            timecode::format(duration)
        )
        .into());
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

/// Run the extraction into `out_dir` and turn a failed one into an error.
pub fn extract<P, T, F>(
    bench: &mut Workbench<P, T, F>,
    out_dir: &Path,
) -> Result<ExtractionState, Box<dyn Error>>
where
    P: DurationProbe,
    T: Transcoder,
    F: EngineFactory,
{
    let state = with_spinner("Extracting audio...", || {
        bench.extract_to(Some(out_dir)).clone()
    });

    match state {
        ExtractionState::Error { message } => Err(message.into()),
        state => Ok(state),
    }
}

/// Load the extracted file and hand it to the terminal player.
pub fn play_result<P, T, F>(bench: Workbench<P, T, F>) -> Result<(), Box<dyn Error>>
where
    P: DurationProbe,
    T: Transcoder,
    F: EngineFactory,
{
    #[cfg(feature = "player")]
    {
        let mut bench = bench;
        bench.load_result();
        crate::player::app::run(bench.into_playback())
    }

    #[cfg(not(feature = "player"))]
    {
        drop(bench);
        super::play::print_player_unavailable();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use trim_studio::media::{TranscodeOutcome, TranscodeRequest};
    use trim_studio::playback::{EngineResult, EventSink, PlaybackEngine, RecoveryPolicy};

    struct FixedProbe;

    impl DurationProbe for FixedProbe {
        fn probe_duration(&self, _path: &Path) -> f64 {
            90.0
        }
    }

    struct NeverTranscode;

    impl Transcoder for NeverTranscode {
        fn transcode(
            &self,
            _request: &TranscodeRequest,
        ) -> Result<TranscodeOutcome, Box<dyn Error>> {
            Err("not used".into())
        }
    }

    struct SilentEngine;

    impl PlaybackEngine for SilentEngine {
        fn subscribe(&mut self, _sink: EventSink) {}

        fn unsubscribe(&mut self) {}

        fn load(&mut self, _path: &Path) -> EngineResult<()> {
            Ok(())
        }

        fn play(&mut self) -> EngineResult<()> {
            Ok(())
        }

        fn pause(&mut self) -> EngineResult<()> {
            Ok(())
        }

        fn seek(&mut self, _position: Duration) -> EngineResult<()> {
            Ok(())
        }
    }

    fn bench() -> Workbench<FixedProbe, NeverTranscode, impl EngineFactory + use<>> {
        let mut bench = Workbench::new(
            FixedProbe,
            NeverTranscode,
            || -> EngineResult<SilentEngine> { Ok(SilentEngine) },
            RecoveryPolicy::immediate(),
        );
        bench.select_file(Some(PickedFile::from_path(PathBuf::from("/music/take.mp3"))));
        bench
    }

    #[test]
    fn test_apply_range_accepts_valid_range() {
        let mut bench = bench();
        apply_range(&mut bench, Some("0:15"), Some("1:00.5")).unwrap();

        let range = bench.session().range();
        assert_eq!((range.start, range.end), (15.0, 60.5));
    }

    #[test]
    fn test_apply_range_rejects_end_past_duration() {
        let mut bench = bench();
        let err = apply_range(&mut bench, None, Some("2:00")).unwrap_err();

        assert!(err.to_string().contains("End 2:00 rejected"));
        assert_eq!(bench.session().range().end, 90.0);
    }

    #[cfg(not(feature = "player"))]
    #[test]
    fn test_play_result_without_player_consumes_bench() {
        assert!(play_result(bench()).is_ok());
    }
}
