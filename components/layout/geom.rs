/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::fmt;

use app_units::Au;
use euclid::default::{Point2D, Rect, Size2D};
use layout_api::style::Sides;

/// The size a node asks for. Heights are split at the baseline.
///
/// For every node the requisition covers the margin box.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Requisition {
    pub width: Au,
    pub ascent: Au,
    pub descent: Au,
}

impl Requisition {
    pub fn new(width: Au, ascent: Au, descent: Au) -> Self {
        Requisition {
            width,
            ascent,
            descent,
        }
    }

    pub fn height(&self) -> Au {
        self.ascent + self.descent
    }
}

/// The narrowest and the widest a node can usefully be.
///
/// `min_width` is the width of the widest unbreakable unit and `max_width`
/// the width without any optional line break.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Extremes {
    pub min_width: Au,
    pub max_width: Au,
}

impl Extremes {
    pub fn new(min_width: Au, max_width: Au) -> Self {
        Extremes {
            min_width,
            max_width: max_width.max(min_width),
        }
    }

    /// Both extremes widened by `amount`, e.g. by margins, borders and padding.
    pub fn inflate(&self, amount: Au) -> Extremes {
        Extremes::new(self.min_width + amount, self.max_width + amount)
    }

    /// The shrink-to-fit width for `available` space:
    /// `min(max(min_width, available), max_width)`.
    pub fn shrink_to_fit(&self, available: Au) -> Au {
        available.max(self.min_width).min(self.max_width)
    }
}

/// The final geometry of a node's margin box in canvas coordinates.
///
/// `y` is the top edge, the baseline sits `ascent` below it.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Allocation {
    pub x: Au,
    pub y: Au,
    pub width: Au,
    pub ascent: Au,
    pub descent: Au,
}

impl Allocation {
    pub fn new(origin: Point2D<Au>, width: Au, ascent: Au, descent: Au) -> Self {
        Allocation {
            x: origin.x,
            y: origin.y,
            width,
            ascent,
            descent,
        }
    }

    pub fn from_requisition(origin: Point2D<Au>, requisition: &Requisition) -> Self {
        Allocation::new(
            origin,
            requisition.width,
            requisition.ascent,
            requisition.descent,
        )
    }

    pub fn height(&self) -> Au {
        self.ascent + self.descent
    }

    pub fn origin(&self) -> Point2D<Au> {
        Point2D::new(self.x, self.y)
    }

    pub fn rect(&self) -> Rect<Au> {
        Rect::new(self.origin(), Size2D::new(self.width, self.height()))
    }

    /// The box that remains after removing `insets` from every side.
    pub fn deflate(&self, insets: &Sides<Au>) -> Rect<Au> {
        Rect::new(
            Point2D::new(self.x + insets.left, self.y + insets.top),
            Size2D::new(
                (self.width - insets.horizontal()).max(Au(0)),
                (self.height() - insets.vertical()).max(Au(0)),
            ),
        )
    }

    pub fn translate(&self, dx: Au, dy: Au) -> Allocation {
        Allocation {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

impl fmt::Display for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}x{}+{}+{}",
            self.width.to_f32_px(),
            self.height().to_f32_px(),
            self.x.to_f32_px(),
            self.y.to_f32_px()
        )
    }
}
