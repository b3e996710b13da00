//! Carousel display settings.
//!
//! Banners persist a [`SettingsOverride`], where every field is optional.
//! Before anything is rendered the override is resolved against the
//! process-wide default [`Settings`], so the widget always receives a fully
//! populated value.

use serde::{Deserialize, Serialize};

// =============================================================================
// Default Values
// =============================================================================

/// Default autoplay interval in milliseconds.
pub const DEFAULT_AUTOPLAY_SPEED: u64 = 5000;

/// Default slide transition duration in milliseconds.
pub const DEFAULT_ANIMATION_SPEED: u64 = 500;

/// Default number of visible slides. Fractional on purpose: the next slide
/// peeks in from the edge.
pub const DEFAULT_SLIDES_TO_SHOW: f64 = 1.2;

/// Viewport width at or below which the default mobile override applies.
pub const DEFAULT_MOBILE_BREAKPOINT: u32 = 768;

// =============================================================================
// Settings
// =============================================================================

/// Fully resolved carousel settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Advance slides automatically
    pub autoplay: bool,

    /// Interval between automatic advances (ms)
    pub autoplay_speed: u64,

    /// Duration of an animated slide transition (ms)
    pub animation_speed: u64,

    /// Pause autoplay while the pointer is over the carousel
    pub pause_on_hover: bool,

    /// Wrap around at either end instead of stopping
    pub infinite_loop: bool,

    /// Render previous/next buttons
    pub show_arrows: bool,

    /// Render one dot indicator per slide
    pub show_dots: bool,

    /// Number of slides visible at once, may be fractional (>= 1)
    pub slides_to_show: f64,

    /// Size slides by their intrinsic width instead of a fixed percentage
    pub variable_width: bool,

    /// Breakpoint overrides, scanned in order, first match wins
    #[serde(default)]
    pub responsive: Vec<Breakpoint>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            autoplay: true,
            autoplay_speed: DEFAULT_AUTOPLAY_SPEED,
            animation_speed: DEFAULT_ANIMATION_SPEED,
            pause_on_hover: true,
            infinite_loop: true,
            show_arrows: true,
            show_dots: false,
            slides_to_show: DEFAULT_SLIDES_TO_SHOW,
            variable_width: true,
            responsive: vec![Breakpoint {
                breakpoint: DEFAULT_MOBILE_BREAKPOINT,
                settings: SettingsOverride {
                    slides_to_show: Some(1.0),
                    variable_width: Some(false),
                    ..SettingsOverride::default()
                },
            }],
        }
    }
}

impl Settings {
    /// Apply an override on top of these settings.
    ///
    /// Fields present in `over` win. `responsive` is replaced as a whole when
    /// present, never merged entry by entry.
    pub fn merged(&self, over: &SettingsOverride) -> Settings {
        Settings {
            autoplay: over.autoplay.unwrap_or(self.autoplay),
            autoplay_speed: over.autoplay_speed.unwrap_or(self.autoplay_speed),
            animation_speed: over.animation_speed.unwrap_or(self.animation_speed),
            pause_on_hover: over.pause_on_hover.unwrap_or(self.pause_on_hover),
            infinite_loop: over.infinite_loop.unwrap_or(self.infinite_loop),
            show_arrows: over.show_arrows.unwrap_or(self.show_arrows),
            show_dots: over.show_dots.unwrap_or(self.show_dots),
            slides_to_show: over.slides_to_show.unwrap_or(self.slides_to_show),
            variable_width: over.variable_width.unwrap_or(self.variable_width),
            responsive: over
                .responsive
                .clone()
                .unwrap_or_else(|| self.responsive.clone()),
        }
    }

    /// Find the breakpoint override for a viewport width.
    ///
    /// Returns the first breakpoint whose threshold is >= `viewport_width`.
    pub fn breakpoint_for(&self, viewport_width: f64) -> Option<&Breakpoint> {
        self.responsive
            .iter()
            .find(|bp| viewport_width <= f64::from(bp.breakpoint))
    }
}

/// A responsive override applied at or below a viewport width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    /// Maximum viewport width (px) this override applies to
    pub breakpoint: u32,

    /// Fields to override
    #[serde(default)]
    pub settings: SettingsOverride,
}

// =============================================================================
// SettingsOverride
// =============================================================================

/// Partial settings, as stored with a banner or attached to a breakpoint.
///
/// `null` and missing fields both deserialize to `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoplay: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoplay_speed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation_speed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pause_on_hover: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub infinite_loop: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_arrows: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_dots: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slides_to_show: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_width: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsive: Option<Vec<Breakpoint>>,
}

impl SettingsOverride {
    /// An override that pins every field to the given settings.
    pub fn pinned(settings: &Settings) -> Self {
        Self {
            autoplay: Some(settings.autoplay),
            autoplay_speed: Some(settings.autoplay_speed),
            animation_speed: Some(settings.animation_speed),
            pause_on_hover: Some(settings.pause_on_hover),
            infinite_loop: Some(settings.infinite_loop),
            show_arrows: Some(settings.show_arrows),
            show_dots: Some(settings.show_dots),
            slides_to_show: Some(settings.slides_to_show),
            variable_width: Some(settings.variable_width),
            responsive: Some(settings.responsive.clone()),
        }
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == SettingsOverride::default()
    }
}

// =============================================================================
// Tests
// =============================================================================
