use crate::limits::limit_error::{LimitError, LimitResult};
use simplelog::*;

/// Maps a loglevel name to a filter; `None` means the default `info`.
pub fn level_filter(loglevel: Option<&str>) -> LimitResult<LevelFilter> {
    let Some(level) = loglevel else {
        return Ok(LevelFilter::Info);
    };
    match level.trim().to_lowercase().as_str() {
        "trace" => Ok(LevelFilter::Trace),
        "debug" => Ok(LevelFilter::Debug),
        "info" => Ok(LevelFilter::Info),
        "warn" => Ok(LevelFilter::Warn),
        "error" => Ok(LevelFilter::Error),
        "off" | "none" => Ok(LevelFilter::Off),
        other => Err(LimitError::Config(format!(
            "loglevel must be trace, debug, info, warn, error, off or none, got '{}'",
            other
        ))),
    }
}

/// Installs a terminal logger with the given level.
///
/// A logger that is already installed is kept, so calling this twice is harmless.
pub fn init_logger(loglevel: Option<&str>) -> LimitResult<()> {
    let log_option = level_filter(loglevel)?;
    if log_option == LevelFilter::Off {
        return Ok(());
    }
    let logger_instance = CombinedLogger::init(vec![TermLogger::new(
        log_option,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
    match logger_instance {
        Ok(()) => {
            log::info!("logger started with loglevel: {}", log_option);
            Ok(())
        }
        Err(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_filter() {
        assert_eq!(level_filter(None).unwrap(), LevelFilter::Info);
        assert_eq!(level_filter(Some("debug")).unwrap(), LevelFilter::Debug);
        assert_eq!(level_filter(Some(" WARN ")).unwrap(), LevelFilter::Warn);
        assert_eq!(level_filter(Some("none")).unwrap(), LevelFilter::Off);
        assert!(matches!(
            level_filter(Some("loud")),
            Err(LimitError::Config(_))
        ));
    }

    #[test]
    fn test_init_logger_twice() {
        assert!(init_logger(Some("error")).is_ok());
        assert!(init_logger(Some("error")).is_ok());
        assert!(init_logger(Some("off")).is_ok());
        assert!(init_logger(Some("verbose")).is_err());
    }
}
