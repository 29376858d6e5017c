use std::ffi::CString;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

pub trait AsCString {
    fn as_c_string(&self) -> CString;
}

impl AsCString for String {
    fn as_c_string(&self) -> CString {
        CString::new(self.clone()).unwrap_or_default()
    }
}

impl AsCString for &str {
    fn as_c_string(&self) -> CString {
        self.to_string().as_c_string()
    }
}

/// Writes `s` to the attached debugger. Debug builds only.
#[cfg(windows)]
pub fn print_debug_string(s: &str) {
    use windows::{core::PCSTR, Win32::System::Diagnostics::Debug::OutputDebugStringA};

    if cfg!(debug_assertions) {
        let message = s.as_c_string();
        unsafe {
            OutputDebugStringA(PCSTR(message.as_ptr() as _));
        }
    }
}

#[cfg(not(windows))]
pub fn print_debug_string(s: &str) {
    if cfg!(debug_assertions) {
        eprint!("{s}");
    }
}

/// `log` backend for windowed binaries, which have no console.
///
/// Every record goes to [`print_debug_string`] as `LEVEL file:line message`.
pub struct DebugStringLogger {
    level: LevelFilter,
}

impl DebugStringLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self { level }
    }
}

impl Log for DebugStringLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            print_debug_string(&format_record(record));
        }
    }

    fn flush(&self) {}
}

fn format_record(record: &Record) -> String {
    format!(
        "{:<5} {}:{} {}\n",
        record.level(),
        record.file().unwrap_or("<unknown>"),
        record.line().unwrap_or(0),
        record.args()
    )
}

/// Installs [`DebugStringLogger`] as the global logger.
pub fn init_logging(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(DebugStringLogger::new(level)))?;
    log::set_max_level(level);
    Ok(())
}
