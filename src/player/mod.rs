pub mod app;
pub mod engine;
pub mod ui;

use std::error::Error;
use std::path::Path;

use trim_studio::config::Config;
use trim_studio::media::FfmpegProbe;
use trim_studio::playback::{EngineResult, PlaybackController, RecoveryPolicy};

use engine::RodioEngine;

/// Builds rodio engines that fall back to ffprobe for durations.
pub fn engine_factory(config: &Config) -> impl FnMut() -> EngineResult<RodioEngine> + use<> {
    let probe = FfmpegProbe::new(config.ffprobe(), config.ffmpeg());
    move || RodioEngine::new(probe.clone())
}

pub fn controller(
    config: &Config,
    policy: RecoveryPolicy,
) -> PlaybackController<impl FnMut() -> EngineResult<RodioEngine> + use<>> {
    PlaybackController::new(engine_factory(config), policy)
}

pub fn run(path: &Path, config: &Config) -> Result<(), Box<dyn Error>> {
    let mut playback = controller(config, config.recovery_policy());
    // A failed load is shown in the UI, where it can be repaired
    playback.load(path);
    app::run(playback)
}
