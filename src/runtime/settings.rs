use crate::config::Settings;

/// Load settings, falling back to defaults when the file is unreadable or invalid.
///
/// Config is optional, so a bad one never stops startup. The returned message
/// says why the defaults are in use.
pub fn load_settings() -> (Settings, Option<String>) {
    let loaded = Settings::load().map_err(|e| format!("failed to load config, using defaults: {e}"));
    let checked = loaded.and_then(|s| match s.validate() {
        Ok(()) => Ok(s),
        Err(msg) => Err(format!("invalid config, using defaults: {msg}")),
    });

    match checked {
        Ok(s) => (s, None),
        Err(msg) => (Settings::default(), Some(msg)),
    }
}
