//! Presentational contracts: every inline style the page writes is computed
//! here from plain values so the browser glue only has to apply strings.

pub const HEADER_RAISED_BACKGROUND: &str = "rgba(0, 0, 0, 0.95)";
pub const HEADER_RAISED_BACKDROP: &str = "blur(10px)";
pub const HEADER_RESTING_BACKGROUND: &str = "#000000";

const CARD_FADE_TRANSITION: &str = "opacity 0.5s ease, transform 0.3s ease";
const CARD_FADE_HOVER_TRANSITION: &str = "opacity 0.5s ease, transform 0.3s ease, box-shadow 0.3s ease";
const CARD_HOVER_TRANSITION: &str = "transform 0.3s ease, box-shadow 0.3s ease";
const CARD_RAISED_Z_INDEX: u8 = 10;
const CARD_RESTING_Z_INDEX: u8 = 1;
const BUTTON_PRESSED_SCALE: &str = "scale(0.95)";
const BUTTON_RELEASED_SCALE: &str = "scale(1)";

/// No hysteresis: strictly above the threshold is raised.
pub fn header_is_raised(scroll_y: f64, threshold_px: u32) -> bool {
    scroll_y > f64::from(threshold_px)
}

pub fn header_style(raised: bool) -> String {
    if raised {
        format!("background-color: {HEADER_RAISED_BACKGROUND}; backdrop-filter: {HEADER_RAISED_BACKDROP};")
    } else {
        format!("background-color: {HEADER_RESTING_BACKGROUND}; backdrop-filter: none;")
    }
}

/// In-page link target, or `None` for a bare `#` or an external link.
pub fn anchor_fragment(href: &str) -> Option<&str> {
    match href.strip_prefix('#') {
        Some(fragment) if !fragment.is_empty() => Some(href),
        _ => None,
    }
}

/// Scroll destination that keeps the target clear of the fixed header.
pub fn scroll_target(offset_top: f64, header_height: f64) -> f64 {
    offset_top - header_height
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PressPhase {
    #[default]
    Idle,
    Pressed,
    Released,
}

pub fn button_style(active: bool, press: PressPhase) -> String {
    let colors = if active {
        "background-color: #000000; color: #ffffff;"
    } else {
        "background-color: transparent; color: #000000;"
    };

    match press {
        PressPhase::Idle => colors.to_string(),
        PressPhase::Pressed => format!("{colors} transform: {BUTTON_PRESSED_SCALE};"),
        PressPhase::Released => format!("{colors} transform: {BUTTON_RELEASED_SCALE};"),
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FadePhase {
    #[default]
    Pending,
    Revealed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HoverPhase {
    #[default]
    Resting,
    Raised,
    Lowered,
}

pub fn card_style(visible: bool, fade: FadePhase, hover: HoverPhase) -> String {
    if !visible {
        return "display: none;".to_string();
    }

    let z_index = match hover {
        HoverPhase::Resting => None,
        HoverPhase::Raised => Some(CARD_RAISED_Z_INDEX),
        HoverPhase::Lowered => Some(CARD_RESTING_Z_INDEX),
    };

    // A single transition declaration so a hover never drops the fade.
    let (opacity, transition) = match (fade, z_index) {
        (FadePhase::Pending, None) => (0, None),
        (FadePhase::Pending, Some(_)) => (0, Some(CARD_HOVER_TRANSITION)),
        (FadePhase::Revealed, None) => (1, Some(CARD_FADE_TRANSITION)),
        (FadePhase::Revealed, Some(_)) => (1, Some(CARD_FADE_HOVER_TRANSITION)),
    };

    let mut style = format!("display: block; opacity: {opacity};");
    if let Some(z_index) = z_index {
        style.push_str(&format!(" z-index: {z_index};"));
    }
    if let Some(transition) = transition {
        style.push_str(&format!(" transition: {transition};"));
    }

    style
}

pub fn notice_style(shown: bool) -> &'static str {
    if shown {
        "display: block;"
    } else {
        "display: none;"
    }
}
