pub mod config;
pub mod init;
pub mod play;
pub mod probe;
pub mod session;
pub mod trim;

use std::env;
use std::error::Error;
use std::path::PathBuf;

use trim_studio::config::Config;
use trim_studio::media::{FfmpegProbe, FfmpegTranscoder};
use trim_studio::playback::EngineFactory;
use trim_studio::workbench::Workbench;

#[cfg(feature = "player")]
pub fn engine_factory(config: &Config) -> impl EngineFactory + use<> {
    crate::player::engine_factory(config)
}

#[cfg(not(feature = "player"))]
pub fn engine_factory(_config: &Config) -> impl EngineFactory + use<> {
    || -> trim_studio::playback::EngineResult<disabled::NoPlayback> {
        Err("trim-studio was built without the 'player' feature".into())
    }
}

#[cfg(not(feature = "player"))]
mod disabled {
    use std::path::Path;
    use std::time::Duration;
    use trim_studio::playback::{EngineResult, EventSink, PlaybackEngine};

    /// Stand-in engine type for builds without audio output. Never constructed.
    pub struct NoPlayback;

    impl PlaybackEngine for NoPlayback {
        fn subscribe(&mut self, _sink: EventSink) {}

        fn unsubscribe(&mut self) {}

        fn load(&mut self, _path: &Path) -> EngineResult<()> {
            Err("playback unavailable".into())
        }

        fn play(&mut self) -> EngineResult<()> {
            Err("playback unavailable".into())
        }

        fn pause(&mut self) -> EngineResult<()> {
            Err("playback unavailable".into())
        }

        fn seek(&mut self, _position: Duration) -> EngineResult<()> {
            Err("playback unavailable".into())
        }
    }
}

pub fn workbench(
    config: &Config,
) -> Workbench<FfmpegProbe, FfmpegTranscoder, impl EngineFactory + use<>> {
    Workbench::new(
        FfmpegProbe::new(config.ffprobe(), config.ffmpeg()),
        FfmpegTranscoder::new(config.ffmpeg()),
        engine_factory(config),
        config.recovery_policy(),
    )
}

/// Configured export folder, or the working directory.
pub fn default_output_dir(config: &Config) -> Result<PathBuf, Box<dyn Error>> {
    match config.output_dir_path() {
        Some(dir) => Ok(dir),
        None => Ok(env::current_dir()?),
    }
}
