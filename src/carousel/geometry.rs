//! Slide sizing and strip positioning.
//!
//! Slides sit side by side in a horizontal strip. Moving to a slide
//! translates the strip so that slide is centered in the container.

use serde::{Deserialize, Serialize};

use crate::banner::Settings;

/// How every slide in the strip is sized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlideSizing {
    /// Fixed share of the container width, in percent
    Percent(f64),
    /// Intrinsic width of the slide's image
    Auto,
}

impl SlideSizing {
    /// Sizing implied by a settings value.
    ///
    /// `variable_width` wins over `slides_to_show`. Non-positive
    /// `slides_to_show` falls back to one slide per view.
    pub fn for_settings(settings: &Settings) -> Self {
        if settings.variable_width {
            return SlideSizing::Auto;
        }
        let per_view = if settings.slides_to_show > 0.0 {
            settings.slides_to_show
        } else {
            1.0
        };
        SlideSizing::Percent(100.0 / per_view)
    }

    /// Inline style for a slide under this sizing.
    pub fn style(&self) -> SlideStyle {
        match self {
            SlideSizing::Percent(percent) => SlideStyle {
                flex: format!("0 0 {}%", format_number(*percent)),
                width: None,
            },
            SlideSizing::Auto => SlideStyle {
                flex: "0 0 auto".to_string(),
                width: Some("auto".to_string()),
            },
        }
    }
}

/// Inline layout style applied to one slide element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideStyle {
    pub flex: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
}

/// Measures the strip: container width plus each slide's intrinsic width.
#[derive(Debug, Clone)]
pub struct Strip {
    container_width: f64,
    intrinsic_widths: Vec<Option<f64>>,
}

impl Strip {
    pub fn new(container_width: f64, intrinsic_widths: Vec<Option<f64>>) -> Self {
        Self {
            container_width,
            intrinsic_widths,
        }
    }

    pub fn container_width(&self) -> f64 {
        self.container_width
    }

    pub fn set_container_width(&mut self, width: f64) {
        self.container_width = width;
    }

    /// Rendered width of one slide.
    ///
    /// An auto-sized slide whose image has no known width fills the container.
    pub fn slide_width(&self, index: usize, sizing: SlideSizing) -> f64 {
        match sizing {
            SlideSizing::Percent(percent) => self.container_width * percent / 100.0,
            SlideSizing::Auto => self
                .intrinsic_widths
                .get(index)
                .copied()
                .flatten()
                .unwrap_or(self.container_width),
        }
    }

    /// Leading edge of a slide relative to the start of the strip.
    pub fn slide_left(&self, index: usize, sizing: SlideSizing) -> f64 {
        (0..index).map(|i| self.slide_width(i, sizing)).sum()
    }

    /// Strip offset that centers a slide in the container.
    pub fn centered_offset(&self, index: usize, sizing: SlideSizing) -> f64 {
        let width = self.slide_width(index, sizing);
        self.slide_left(index, sizing) - (self.container_width - width) / 2.0
    }
}

/// CSS transform that shifts the strip left by `offset` pixels.
pub fn transform_for(offset: f64) -> String {
    format!("translateX({}px)", format_number(-offset))
}

/// Format a CSS number with at most four decimals and no trailing zeros.
pub fn format_number(value: f64) -> String {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    // Avoid "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let text = format!("{:.4}", rounded);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::banner::Settings;

    #[test]
    fn test_sizing_from_settings() {
        let mut settings = Settings::default();
        assert_eq!(SlideSizing::for_settings(&settings), SlideSizing::Auto);

        settings.variable_width = false;
        settings.slides_to_show = 1.0;
        assert_eq!(
            SlideSizing::for_settings(&settings),
            SlideSizing::Percent(100.0)
        );

        settings.slides_to_show = 0.0;
        assert_eq!(
            SlideSizing::for_settings(&settings),
            SlideSizing::Percent(100.0)
        );
    }

    #[test]
    fn test_styles() {
        assert_eq!(
            SlideSizing::Percent(100.0 / 1.2).style(),
            SlideStyle {
                flex: "0 0 83.3333%".to_string(),
                width: None
            }
        );
        assert_eq!(
            SlideSizing::Auto.style(),
            SlideStyle {
                flex: "0 0 auto".to_string(),
                width: Some("auto".to_string())
            }
        );
    }

    #[test]
    fn test_centered_offset_fixed_width() {
        let strip = Strip::new(1000.0, vec![None; 3]);
        let sizing = SlideSizing::Percent(50.0);
        assert_eq!(strip.slide_width(1, sizing), 500.0);
        assert_eq!(strip.slide_left(2, sizing), 1000.0);
        // Slide 1 spans 500..1000, centering it shifts the strip by 250
        assert_eq!(strip.centered_offset(1, sizing), 250.0);
        // The first slide is pulled right of the container edge
        assert_eq!(strip.centered_offset(0, sizing), -250.0);
    }

    #[test]
    fn test_centered_offset_auto_width() {
        let strip = Strip::new(800.0, vec![Some(600.0), Some(400.0), None]);
        assert_eq!(strip.slide_left(1, SlideSizing::Auto), 600.0);
        assert_eq!(strip.centered_offset(1, SlideSizing::Auto), 400.0);
        // Unknown width fills the container
        assert_eq!(strip.slide_width(2, SlideSizing::Auto), 800.0);
        assert_eq!(strip.centered_offset(2, SlideSizing::Auto), 1000.0);
    }

    #[test]
    fn test_transform_and_numbers() {
        assert_eq!(transform_for(250.0), "translateX(-250px)");
        assert_eq!(transform_for(-80.5), "translateX(80.5px)");
        assert_eq!(transform_for(0.0), "translateX(0px)");
        assert_eq!(format_number(33.333333), "33.3333");
        assert_eq!(format_number(100.0), "100");
    }
}
