/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use app_units::Au;

/// The font a run of text is measured with. Resolving this to an actual face
/// is the job of the font backend.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct FontDescriptor {
    pub family: String,
    pub size: Au,
    pub weight: u16,
    pub italic: bool,
}

impl Default for FontDescriptor {
    fn default() -> Self {
        FontDescriptor {
            family: "serif".to_owned(),
            size: Au::from_px(16),
            weight: 400,
            italic: false,
        }
    }
}

/// Measures text for line breaking.
///
/// Implementations must be deterministic: the same font and text always
/// produce the same width, or incremental re-wrapping would disagree with a
/// full wrap. A backend that fails to load a face is expected to fall back to
/// some other face rather than report an error here.
pub trait FontMetricsProvider {
    fn text_width(&self, font: &FontDescriptor, text: &str) -> Au;
    fn ascent(&self, font: &FontDescriptor) -> Au;
    fn descent(&self, font: &FontDescriptor) -> Au;

    fn space_width(&self, font: &FontDescriptor) -> Au {
        self.text_width(font, " ")
    }

    fn hyphen_width(&self, font: &FontDescriptor) -> Au {
        self.text_width(font, "-")
    }
}

/// Metrics of an idealised monospace face: every character advances by the
/// same fraction of the font size. Used for headless layout and tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonospaceMetrics {
    pub char_advance: f32,
    pub space_advance: f32,
    pub ascent: f32,
    pub descent: f32,
}

impl MonospaceMetrics {
    pub fn new(char_advance: f32, space_advance: f32) -> Self {
        MonospaceMetrics {
            char_advance,
            space_advance,
            ascent: 0.8,
            descent: 0.2,
        }
    }
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self::new(0.6, 0.6)
    }
}

impl FontMetricsProvider for MonospaceMetrics {
    fn text_width(&self, font: &FontDescriptor, text: &str) -> Au {
        let advance = font.size.scale_by(self.char_advance);
        advance * text.chars().count() as i32
    }

    fn ascent(&self, font: &FontDescriptor) -> Au {
        font.size.scale_by(self.ascent)
    }

    fn descent(&self, font: &FontDescriptor) -> Au {
        font.size.scale_by(self.descent)
    }

    fn space_width(&self, font: &FontDescriptor) -> Au {
        font.size.scale_by(self.space_advance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monospace_widths_scale_with_character_count() {
        let metrics = MonospaceMetrics::new(1.0, 0.1);
        let font = FontDescriptor {
            size: Au::from_px(10),
            ..FontDescriptor::default()
        };
        assert_eq!(metrics.text_width(&font, "abcd"), Au::from_px(40));
        assert_eq!(metrics.text_width(&font, ""), Au(0));
        assert_eq!(metrics.space_width(&font), Au::from_px(1));
        assert_eq!(metrics.hyphen_width(&font), Au::from_px(10));
        assert_eq!(
            metrics.ascent(&font) + metrics.descent(&font),
            Au::from_px(10)
        );
    }
}
