pub(crate) fn default_font_size() -> u32 {
    16
}

pub(crate) fn default_window_width() -> f32 {
    1024.0
}

pub(crate) fn default_window_height() -> f32 {
    768.0
}

pub(crate) fn default_log_level() -> crate::config::LogLevel {
    crate::config::LogLevel::Debug
}

pub(crate) fn default_load_latency_ms() -> u64 {
    350
}

pub(crate) fn default_synthetic_post_count() -> usize {
    1200
}

pub(crate) fn default_key_next_post() -> String {
    "j".to_string()
}

pub(crate) fn default_key_prev_post() -> String {
    "k".to_string()
}

pub(crate) fn default_key_first_post() -> String {
    "g".to_string()
}

pub(crate) fn default_key_last_post() -> String {
    "shift+g".to_string()
}

pub(crate) fn default_key_reply() -> String {
    "r".to_string()
}

pub(crate) fn default_key_new_post() -> String {
    "n".to_string()
}

pub(crate) fn default_key_toggle_theme() -> String {
    "ctrl+t".to_string()
}

pub(crate) fn default_key_safe_quit() -> String {
    "q".to_string()
}
