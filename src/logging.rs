//! Logger setup, following the teacher binary's `fern` dispatch to stderr.

use crate::cli::LogLevelArg;

pub fn init(level: LogLevelArg) {
    let filter = match level {
        LogLevelArg::Error => log::LevelFilter::Error,
        LogLevelArg::Info => log::LevelFilter::Info,
        LogLevelArg::Debug => log::LevelFilter::Debug,
    };

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{}] {}: {}", record.level(), record.target(), message))
        })
        .level(filter)
        .chain(std::io::stderr())
        .apply()
        .unwrap();
}
