use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::error::Error;
use std::fs::File;
use std::path::PathBuf;

pub fn log_file_path() -> PathBuf {
    std::env::temp_dir().join("trim-studio.log")
}

/// Debug output always goes to the log file. Commands that take over the
/// terminal pass `terminal = false` so nothing is written over their screen.
pub fn init_logging(verbose: bool, terminal: bool) -> Result<(), Box<dyn Error>> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![WriteLogger::new(
        LevelFilter::Debug,
        Config::default(),
        File::create(log_file_path())?,
    )];

    if terminal {
        let level = if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        };
        loggers.push(TermLogger::new(
            level,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }

    CombinedLogger::init(loggers)?;
    Ok(())
}
