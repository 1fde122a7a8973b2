use std::{fs, path::PathBuf, time::Duration};

use chatter_autocomplete::{AutocompleteOptions, Dispatch};

const MAX_RESULTS_LIMIT: usize = 64;
const MIN_TIMEOUT_MS: u64 = 10;
const MAX_TIMEOUT_MS: u64 = 60_000;
const MIN_POPOVER_WIDTH: u32 = 100;
const MAX_POPOVER_WIDTH: u32 = 2_000;

const DEFAULT_CONFIG: &str = "# Autocomplete settings\n\
# Characters typed after the trigger before searching\n\
# autocomplete_min_length = 1\n\
# Give up on a search after this many milliseconds\n\
# autocomplete_timeout_ms = 500\n\
# Maximum number of suggestions shown (1-64)\n\
# autocomplete_max_results = 8\n\
# Cancel the running search whenever the text changes\n\
# autocomplete_cancel_on_change = false\n\
# Run searchers off the event loop\n\
# autocomplete_background = false\n\
# Minimum popover width in pixels\n\
# autocomplete_popover_width = 250\n";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub autocomplete: AutocompleteOptions,
}

impl AppConfig {
    pub fn load_or_create() -> Self {
        let mut config = Self::default();
        let Some(path) = ensure_config_file() else {
            return config;
        };

        match fs::read_to_string(&path) {
            Ok(contents) => config = Self::from_contents(&contents),
            Err(err) => log::warn!("Failed to read {}: {}", path.display(), err),
        }

        config
    }

    fn from_contents(contents: &str) -> Self {
        let mut config = Self::default();
        let options = &mut config.autocomplete;

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            if key.eq_ignore_ascii_case("autocomplete_min_length") {
                if let Ok(min_length) = value.parse::<usize>() {
                    options.min_length = min_length;
                }
            }

            if key.eq_ignore_ascii_case("autocomplete_timeout_ms") {
                if let Ok(timeout) = value.parse::<u64>() {
                    options.timeout =
                        Duration::from_millis(timeout.clamp(MIN_TIMEOUT_MS, MAX_TIMEOUT_MS));
                }
            }

            if key.eq_ignore_ascii_case("autocomplete_max_results") {
                if let Ok(max_results) = value.parse::<usize>() {
                    options.max_results = max_results.clamp(1, MAX_RESULTS_LIMIT);
                }
            }

            if key.eq_ignore_ascii_case("autocomplete_cancel_on_change") {
                if let Some(cancel) = parse_bool(value) {
                    options.cancel_on_change = cancel;
                }
            }

            if key.eq_ignore_ascii_case("autocomplete_background") {
                if let Some(background) = parse_bool(value) {
                    options.dispatch = if background {
                        Dispatch::Background
                    } else {
                        Dispatch::Inline
                    };
                }
            }

            if key.eq_ignore_ascii_case("autocomplete_popover_width") {
                if let Ok(width) = value.parse::<u32>() {
                    options.popover_width = width.clamp(MIN_POPOVER_WIDTH, MAX_POPOVER_WIDTH);
                }
            }
        }

        config
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn ensure_config_file() -> Option<PathBuf> {
    let path = config_path()?;
    if !path.exists() {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        let _ = fs::write(&path, DEFAULT_CONFIG);
    }
    Some(path)
}

fn config_path() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        dirs::config_dir().map(|p| p.join("chatter").join("config.txt"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        dirs::home_dir().map(|p| p.join(".config").join("chatter").join("config.txt"))
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, DEFAULT_CONFIG, parse_bool};
    use chatter_autocomplete::{AutocompleteOptions, Dispatch};
    use std::time::Duration;

    #[test]
    fn default_file_parses_to_defaults() {
        let config = AppConfig::from_contents(DEFAULT_CONFIG);
        assert_eq!(config.autocomplete, AutocompleteOptions::default());
    }

    #[test]
    fn autocomplete_options_parse() {
        let config = AppConfig::from_contents(
            "autocomplete_min_length = 2\n\
             autocomplete_timeout_ms = 1500\n\
             autocomplete_max_results = 12\n\
             AUTOCOMPLETE_CANCEL_ON_CHANGE = yes\n\
             autocomplete_background = on\n\
             autocomplete_popover_width = 320\n",
        );

        let options = config.autocomplete;
        assert_eq!(options.min_length, 2);
        assert_eq!(options.timeout, Duration::from_millis(1500));
        assert_eq!(options.max_results, 12);
        assert!(options.cancel_on_change);
        assert_eq!(options.dispatch, Dispatch::Background);
        assert_eq!(options.popover_width, 320);
    }

    #[test]
    fn max_results_parses_and_clamps() {
        let clamped_low = AppConfig::from_contents("autocomplete_max_results = 0\n");
        assert_eq!(clamped_low.autocomplete.max_results, 1);

        let clamped_high = AppConfig::from_contents("autocomplete_max_results = 500\n");
        assert_eq!(clamped_high.autocomplete.max_results, 64);
    }

    #[test]
    fn invalid_values_keep_defaults() {
        let config = AppConfig::from_contents(
            "autocomplete_min_length = lots\n\
             autocomplete_background = maybe\n\
             unknown_key = 3\n\
             not a setting\n",
        );
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn timeout_and_width_clamp() {
        let config = AppConfig::from_contents(
            "autocomplete_timeout_ms = 0\n\
             autocomplete_popover_width = 5\n",
        );
        assert_eq!(config.autocomplete.timeout, Duration::from_millis(10));
        assert_eq!(config.autocomplete.popover_width, 100);
    }

    #[test]
    fn bools_accept_common_spellings() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" off "), Some(false));
        assert_eq!(parse_bool("sure"), None);
    }
}
