pub mod config;
pub mod constants;
pub mod extraction;
pub mod media;
pub mod notify;
pub mod output;
pub mod playback;
pub mod session;
pub mod timecode;
pub mod trim;
pub mod utils;
pub mod workbench;
