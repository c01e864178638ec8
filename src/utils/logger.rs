use crate::utils::constants::RESULT_LOG;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::Once;
use std::sync::OnceLock;

// 전역 결과 로그 파일
static LOGGER: OnceLock<Mutex<Option<File>>> = OnceLock::new();
static INIT: Once = Once::new();

/// Console logger that mirrors every line into `<output_dir>/iotrace_result.log`.
///
/// Until `init` is called messages only go to the console.
pub struct Logger;

impl Logger {
    pub fn init(output_dir: &Path) {
        INIT.call_once(|| {
            let log_path = Self::log_path(output_dir);

            // 디렉토리가 없으면 생성
            if let Some(dir) = log_path.parent() {
                if !dir.as_os_str().is_empty() && !dir.exists() {
                    if let Err(e) = fs::create_dir_all(dir) {
                        eprintln!("Cannot create log directory {}: {e}", dir.display());
                        LOGGER.get_or_init(|| Mutex::new(None));
                        return;
                    }
                }
            }

            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&log_path);

            match file {
                Ok(file) => {
                    LOGGER.get_or_init(|| Mutex::new(Some(file)));
                }
                Err(e) => {
                    eprintln!("Cannot open log file {}: {e}", log_path.display());
                    LOGGER.get_or_init(|| Mutex::new(None));
                }
            }
        });
    }

    pub fn log_path(output_dir: &Path) -> PathBuf {
        output_dir.join(RESULT_LOG)
    }

    pub fn log(message: &str) {
        println!("{message}");
        Self::write_to_file("", message);
    }

    pub fn log_error(message: &str) {
        eprintln!("{message}");
        Self::write_to_file("ERROR: ", message);
    }

    pub fn log_fmt(args: std::fmt::Arguments<'_>) {
        let message = args.to_string();
        Self::log(&message);
    }

    fn write_to_file(prefix: &str, message: &str) {
        if let Some(logger) = LOGGER.get() {
            if let Ok(mut file_guard) = logger.lock() {
                if let Some(file) = file_guard.as_mut() {
                    if let Err(e) = writeln!(file, "{prefix}{message}") {
                        eprintln!("Failed to write result log: {e}");
                    }
                }
            }
        }
    }

    pub fn flush() -> std::io::Result<()> {
        if let Some(logger) = LOGGER.get() {
            if let Ok(mut file_guard) = logger.lock() {
                if let Some(file) = file_guard.as_mut() {
                    file.flush()?;
                }
            }
        }
        Ok(())
    }
}

#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {{
        $crate::utils::Logger::log_fmt(format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::utils::Logger::log_error(&message);
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_path() {
        let path = Logger::log_path(Path::new("out"));
        assert_eq!(path, Path::new("out").join("iotrace_result.log"));
    }

    #[test]
    fn test_log_before_init_does_not_panic() {
        Logger::log("console only");
        Logger::log_error("console only error");
        assert!(Logger::flush().is_ok());
    }
}
