use crate::facet::TypeMatchPolicy;
use crate::logging::LogLevel;

const DEFAULT_TYPE_MATCH: TypeMatchPolicy = TypeMatchPolicy::Substring;
const DEFAULT_FADE_DELAY_MS: u32 = 10;
const DEFAULT_PRESS_REVERT_MS: u32 = 150;
const DEFAULT_HEADER_THRESHOLD_PX: u32 = 50;
const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;

const FADE_DELAY_MS_BOUNDS: (u32, u32) = (0, 1_000);
const PRESS_REVERT_MS_BOUNDS: (u32, u32) = (0, 2_000);
const HEADER_THRESHOLD_PX_BOUNDS: (u32, u32) = (0, 2_000);

#[cfg(not(target_arch = "wasm32"))]
const ENV_PREFIX: &str = "REEL_";

/// Frontend settings. In the browser they come from `data-*` attributes on
/// the `#app` mount element (`data-type-match="exact"`); the native
/// catalog check reads `REEL_*` environment variables instead.
#[derive(Clone, Debug, PartialEq)]
pub struct ReelConfig {
    pub type_match: TypeMatchPolicy,
    pub fade_delay_ms: u32,
    pub press_revert_ms: u32,
    pub header_threshold_px: u32,
    pub log_level: LogLevel,
}

impl Default for ReelConfig {
    fn default() -> Self {
        Self {
            type_match: DEFAULT_TYPE_MATCH,
            fade_delay_ms: DEFAULT_FADE_DELAY_MS,
            press_revert_ms: DEFAULT_PRESS_REVERT_MS,
            header_threshold_px: DEFAULT_HEADER_THRESHOLD_PX,
            log_level: DEFAULT_LOG_LEVEL,
        }
    }
}

impl ReelConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let type_match = parse_non_empty(&lookup, "type-match")
            .and_then(|value| TypeMatchPolicy::from_str(&value.to_ascii_lowercase()))
            .unwrap_or(DEFAULT_TYPE_MATCH);
        let fade_delay_ms = parse_u32_with_bounds(&lookup, "fade-delay-ms", DEFAULT_FADE_DELAY_MS, FADE_DELAY_MS_BOUNDS);
        let press_revert_ms = parse_u32_with_bounds(
            &lookup,
            "press-revert-ms",
            DEFAULT_PRESS_REVERT_MS,
            PRESS_REVERT_MS_BOUNDS,
        );
        let header_threshold_px = parse_u32_with_bounds(
            &lookup,
            "header-threshold-px",
            DEFAULT_HEADER_THRESHOLD_PX,
            HEADER_THRESHOLD_PX_BOUNDS,
        );
        let log_level = parse_non_empty(&lookup, "log-level")
            .and_then(|value| LogLevel::from_str(&value.to_ascii_lowercase()))
            .unwrap_or(DEFAULT_LOG_LEVEL);

        Self {
            type_match,
            fade_delay_ms,
            press_revert_ms,
            header_threshold_px,
            log_level,
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(env_key(key)).ok())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn env_key(key: &str) -> String {
    format!("{ENV_PREFIX}{}", key.replace('-', "_").to_ascii_uppercase())
}

fn parse_non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_u32_with_bounds(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: u32,
    bounds: (u32, u32),
) -> u32 {
    parse_non_empty(lookup, key)
        .and_then(|value| value.parse::<u32>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}
