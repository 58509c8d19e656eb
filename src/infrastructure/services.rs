use crate::domain::logging::{get_time_provider, LogEntry, LogLevel, Logger, TimeProvider};

/// Console logger: browser console on wasm32, stderr elsewhere
pub struct ConsoleLogger {
    min_level: LogLevel,
}

impl ConsoleLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }

    pub fn new_development() -> Self {
        Self::new(LogLevel::Debug)
    }

    fn format_log_entry(&self, entry: &LogEntry) -> String {
        let timestamp = get_time_provider().format_timestamp(entry.timestamp);
        format!("[{}] {} {} | {}", timestamp, entry.level, entry.component, entry.message)
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, entry: LogEntry) {
        if entry.level < self.min_level {
            return;
        }
        let formatted = self.format_log_entry(&entry);

        #[cfg(target_arch = "wasm32")]
        {
            let line = wasm_bindgen::JsValue::from_str(&formatted);
            match entry.level {
                LogLevel::Trace | LogLevel::Debug => web_sys::console::debug_1(&line),
                LogLevel::Info => web_sys::console::info_1(&line),
                LogLevel::Warn => web_sys::console::warn_1(&line),
                LogLevel::Error => web_sys::console::error_1(&line),
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        eprintln!("{}", formatted);
    }
}

/// Wall clock from `Date.now()`
#[derive(Debug, Default)]
pub struct BrowserTimeProvider;

impl BrowserTimeProvider {
    pub fn new() -> Self {
        Self
    }
}

impl TimeProvider for BrowserTimeProvider {
    fn current_timestamp(&self) -> u64 {
        js_sys::Date::now() as u64
    }

    fn format_timestamp(&self, timestamp: u64) -> String {
        let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(timestamp as f64));
        format!(
            "{:02}:{:02}:{:02}.{:03}",
            date.get_hours(),
            date.get_minutes(),
            date.get_seconds(),
            date.get_milliseconds()
        )
    }
}

/// Wall clock for native hosts
#[derive(Debug, Default)]
pub struct SystemTimeProvider;

impl SystemTimeProvider {
    pub fn new() -> Self {
        Self
    }
}

impl TimeProvider for SystemTimeProvider {
    fn current_timestamp(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    fn format_timestamp(&self, timestamp: u64) -> String {
        let millis = timestamp % 1000;
        let secs = timestamp / 1000;
        format!("{:02}:{:02}:{:02}.{:03}", (secs / 3600) % 24, (secs / 60) % 60, secs % 60, millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::logging::LogComponent;

    #[test]
    fn system_time_format() {
        let provider = SystemTimeProvider::new();
        assert_eq!(provider.format_timestamp(3_723_004), "01:02:03.004");
        assert!(provider.current_timestamp() > 0);
    }

    #[test]
    fn entry_line_names_level_and_component() {
        let logger = ConsoleLogger::new(LogLevel::Warn);
        let entry = LogEntry::new(LogLevel::Warn, LogComponent::Application("ZoomScheduler"), "ignored");
        assert!(logger.format_log_entry(&entry).ends_with("]  WARN APP:ZoomScheduler | ignored"));
    }
}
