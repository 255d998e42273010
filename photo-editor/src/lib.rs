//! Photo Editor
//!
//! Loads one image from disk or over HTTP, previews one of the filters from
//! `image-filter` on it, and keeps or discards the result before saving.
//!
//! # Architecture
//! - [`source`]: turns a path or URL into a validated local image file
//! - [`session`]: the single-image edit state machine
//! - [`command`]: text commands driving a session, used by the shell binary
//! - [`config`]: persistent TOML settings in the platform config dir

#[macro_use]
extern crate derivative;

pub mod command;
pub mod config;
pub mod error;
pub mod session;
pub mod source;

pub use command::{Command, Outcome};
pub use error::{EditorError, EditorResult};
pub use session::{EditorSession, SessionState};
pub use source::ImageSource;

/// Initializes the logger.
///
/// Each line carries a local timestamp, the level, the source file name and
/// line. `RUST_LOG` overrides `level` when set.
pub fn init_logger(level: log::LevelFilter) {
    use std::io::Write;

    env_logger::builder()
        .filter_level(level)
        .filter_module("reqwest", log::LevelFilter::Warn)
        .filter_module("hyper_util", log::LevelFilter::Warn)
        .parse_default_env()
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            let ts = chrono::Local::now().format("%H:%M:%S");

            writeln!(
                buf,
                "[{} {style}{}{style:#} {} {}] {}",
                ts,
                record.level(),
                record
                    .file()
                    .unwrap_or("None")
                    .split('/')
                    .next_back()
                    .unwrap_or("None"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}
