use poststream_core::StreamConfig;
use serde::Deserialize;

/// High-level app configuration; deserializable from TOML.
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub theme: ThemeMode,
    #[serde(default = "crate::config::defaults::default_font_size")]
    pub font_size: u32,
    #[serde(default = "crate::config::defaults::default_window_width")]
    pub window_width: f32,
    #[serde(default = "crate::config::defaults::default_window_height")]
    pub window_height: f32,
    #[serde(default = "crate::config::defaults::default_log_level")]
    pub log_level: LogLevel,
    /// Simulated fetch latency of the fixture source.
    #[serde(default = "crate::config::defaults::default_load_latency_ms")]
    pub load_latency_ms: u64,
    /// Fail every Nth page request; 0 disables injected failures.
    #[serde(default)]
    pub fail_every_nth: u64,
    #[serde(default = "crate::config::defaults::default_synthetic_post_count")]
    pub synthetic_post_count: usize,
    #[serde(default = "crate::config::defaults::default_key_next_post")]
    pub key_next_post: String,
    #[serde(default = "crate::config::defaults::default_key_prev_post")]
    pub key_prev_post: String,
    #[serde(default = "crate::config::defaults::default_key_first_post")]
    pub key_first_post: String,
    #[serde(default = "crate::config::defaults::default_key_last_post")]
    pub key_last_post: String,
    #[serde(default = "crate::config::defaults::default_key_reply")]
    pub key_reply: String,
    #[serde(default = "crate::config::defaults::default_key_new_post")]
    pub key_new_post: String,
    #[serde(default = "crate::config::defaults::default_key_toggle_theme")]
    pub key_toggle_theme: String,
    #[serde(default = "crate::config::defaults::default_key_safe_quit")]
    pub key_safe_quit: String,
    #[serde(default)]
    pub stream: StreamConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            theme: ThemeMode::Night,
            font_size: crate::config::defaults::default_font_size(),
            window_width: crate::config::defaults::default_window_width(),
            window_height: crate::config::defaults::default_window_height(),
            log_level: crate::config::defaults::default_log_level(),
            load_latency_ms: crate::config::defaults::default_load_latency_ms(),
            fail_every_nth: 0,
            synthetic_post_count: crate::config::defaults::default_synthetic_post_count(),
            key_next_post: crate::config::defaults::default_key_next_post(),
            key_prev_post: crate::config::defaults::default_key_prev_post(),
            key_first_post: crate::config::defaults::default_key_first_post(),
            key_last_post: crate::config::defaults::default_key_last_post(),
            key_reply: crate::config::defaults::default_key_reply(),
            key_new_post: crate::config::defaults::default_key_new_post(),
            key_toggle_theme: crate::config::defaults::default_key_toggle_theme(),
            key_safe_quit: crate::config::defaults::default_key_safe_quit(),
            stream: StreamConfig::default(),
        }
    }
}

impl AppConfig {
    /// Clamp every field into the range the UI can work with.
    pub fn clamped(mut self) -> Self {
        fn normalize_key_binding(value: &mut String, fallback: String) {
            let normalized = value.trim().to_ascii_lowercase();
            if normalized.is_empty() {
                *value = fallback;
            } else {
                *value = normalized;
            }
        }

        self.font_size = self.font_size.clamp(10, 40);
        self.window_width = finite_or(self.window_width, 1024.0).clamp(320.0, 7680.0);
        self.window_height = finite_or(self.window_height, 768.0).clamp(240.0, 4320.0);
        self.load_latency_ms = self.load_latency_ms.min(10_000);
        self.synthetic_post_count = self.synthetic_post_count.min(1_000_000);
        self.stream = self.stream.clamped();

        use crate::config::defaults::*;
        normalize_key_binding(&mut self.key_next_post, default_key_next_post());
        normalize_key_binding(&mut self.key_prev_post, default_key_prev_post());
        normalize_key_binding(&mut self.key_first_post, default_key_first_post());
        normalize_key_binding(&mut self.key_last_post, default_key_last_post());
        normalize_key_binding(&mut self.key_reply, default_key_reply());
        normalize_key_binding(&mut self.key_new_post, default_key_new_post());
        normalize_key_binding(&mut self.key_toggle_theme, default_key_toggle_theme());
        normalize_key_binding(&mut self.key_safe_quit, default_key_safe_quit());
        self
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

/// Theme mode.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeMode {
    Day,
    #[default]
    Night,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Day => ThemeMode::Night,
            ThemeMode::Night => ThemeMode::Day,
        }
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ThemeMode::Day => "Day",
            ThemeMode::Night => "Night",
        };
        write!(f, "{}", label)
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    #[default]
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
