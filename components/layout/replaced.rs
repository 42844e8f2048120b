/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use app_units::Au;
use euclid::default::Size2D;
use layout_api::ComputedStyle;
use layout_api::style::LengthPercentageOrAuto;

use crate::geom::{Extremes, Requisition};

/// A leaf with an intrinsic size, standing in for images and embedded
/// controls. The intrinsic size may change later, e.g. when an image has
/// been decoded.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct ReplacedContent {
    pub intrinsic_size: Size2D<Au>,
}

impl ReplacedContent {
    pub fn new(intrinsic_size: Size2D<Au>) -> Self {
        ReplacedContent { intrinsic_size }
    }

    /// The content box size for `available` width. A specified width without
    /// a specified height keeps the aspect ratio.
    fn used_size(&self, style: &ComputedStyle, available: Option<Au>) -> Size2D<Au> {
        let intrinsic = self.intrinsic_size;
        let width = style.width.resolve(available);
        let height = style.height.resolve(None);
        match (width, height) {
            (Some(width), Some(height)) => Size2D::new(width, height),
            (Some(width), None) if intrinsic.width > Au(0) => {
                let height = intrinsic.height.0 as i64 * width.0 as i64 / intrinsic.width.0 as i64;
                Size2D::new(width, Au(height as i32))
            },
            (Some(width), None) => Size2D::new(width, intrinsic.height),
            (None, Some(height)) if intrinsic.height > Au(0) => {
                let width = intrinsic.width.0 as i64 * height.0 as i64 / intrinsic.height.0 as i64;
                Size2D::new(Au(width as i32), height)
            },
            (None, Some(height)) => Size2D::new(intrinsic.width, height),
            (None, None) => intrinsic,
        }
    }

    /// Replaced content sits on the baseline with its bottom margin edge.
    pub fn requisition(&self, style: &ComputedStyle, available: Au) -> Requisition {
        let size = self.used_size(style, Some(available));
        let insets = style.box_insets();
        Requisition::new(
            size.width + insets.horizontal(),
            insets.top + size.height + insets.bottom,
            Au(0),
        )
    }

    pub fn extremes(&self, style: &ComputedStyle) -> Extremes {
        let insets = style.box_insets().horizontal();
        let width = self.used_size(style, None).width;
        let min_width = match style.width {
            // Percentages of an unknown width may end up as small as nothing.
            LengthPercentageOrAuto::Percentage(_) => Au(0),
            _ => width,
        };
        Extremes::new(min_width, width).inflate(insets)
    }
}

#[cfg(test)]
mod tests {
    use layout_api::style::{Percentage, Sides};

    use super::*;

    fn image() -> ReplacedContent {
        ReplacedContent::new(Size2D::new(Au::from_px(40), Au::from_px(20)))
    }

    #[test]
    fn intrinsic_size_with_margins() {
        let style = ComputedStyle {
            margin: Sides::all(Au::from_px(2)),
            ..ComputedStyle::initial()
        };
        let requisition = image().requisition(&style, Au::from_px(100));
        assert_eq!(requisition.width, Au::from_px(44));
        assert_eq!(requisition.ascent, Au::from_px(24));
        assert_eq!(requisition.descent, Au(0));
    }

    #[test]
    fn specified_width_keeps_aspect_ratio() {
        let style = ComputedStyle {
            width: LengthPercentageOrAuto::Percentage(Percentage(0.5)),
            ..ComputedStyle::initial()
        };
        let requisition = image().requisition(&style, Au::from_px(100));
        assert_eq!(requisition.width, Au::from_px(50));
        assert_eq!(requisition.height(), Au::from_px(25));

        let extremes = image().extremes(&style);
        assert_eq!(extremes.min_width, Au(0));
        assert_eq!(extremes.max_width, Au::from_px(40));
    }
}
