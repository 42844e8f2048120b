/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Resolved style values.
//!
//! Everything here has already gone through the cascade: lengths are either
//! absolute app units, percentages of some reference box, or `auto`. Layout
//! reads these values and never writes them.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use app_units::Au;

use crate::fonts::FontDescriptor;

/// A percentage, stored as a fraction (`0.5` is `50%`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Percentage(pub f32);

impl Eq for Percentage {}

impl Hash for Percentage {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state)
    }
}

impl Percentage {
    pub fn of(&self, basis: Au) -> Au {
        basis.scale_by(self.0)
    }
}

/// `<length-percentage> | auto`
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum LengthPercentageOrAuto {
    #[default]
    Auto,
    Length(Au),
    Percentage(Percentage),
}

impl LengthPercentageOrAuto {
    /// Resolves against `basis`. Percentages of an indefinite basis behave as `auto`.
    pub fn resolve(&self, basis: Option<Au>) -> Option<Au> {
        match *self {
            LengthPercentageOrAuto::Auto => None,
            LengthPercentageOrAuto::Length(length) => Some(length),
            LengthPercentageOrAuto::Percentage(percentage) => {
                basis.map(|basis| percentage.of(basis))
            },
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, LengthPercentageOrAuto::Auto)
    }
}

/// A value for each physical side of a box.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Sides<T> {
    pub top: T,
    pub right: T,
    pub bottom: T,
    pub left: T,
}

impl<T: Copy> Sides<T> {
    pub fn all(value: T) -> Self {
        Sides {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

impl Sides<Au> {
    pub fn horizontal(&self) -> Au {
        self.left + self.right
    }

    pub fn vertical(&self) -> Au {
        self.top + self.bottom
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Display {
    #[default]
    Inline,
    Block,
    InlineBlock,
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Float {
    #[default]
    None,
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Clear {
    #[default]
    None,
    Left,
    Right,
    Both,
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Position {
    #[default]
    Static,
    Relative,
    Absolute,
    Fixed,
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Overflow {
    #[default]
    Visible,
    Hidden,
    Scroll,
    Auto,
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum TextAlign {
    #[default]
    Left,
    Right,
    Center,
    Justify,
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum WhiteSpace {
    #[default]
    Normal,
    NoWrap,
}

/// The subset of computed values the layout engine consumes.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ComputedStyle {
    pub display: Display,
    pub float: Float,
    pub clear: Clear,
    pub position: Position,
    pub overflow: Overflow,
    pub text_align: TextAlign,
    pub white_space: WhiteSpace,
    pub margin: Sides<Au>,
    pub border_width: Sides<Au>,
    pub padding: Sides<Au>,
    pub width: LengthPercentageOrAuto,
    pub height: LengthPercentageOrAuto,
    /// `top`, `right`, `bottom` and `left`.
    pub box_offsets: Sides<LengthPercentageOrAuto>,
    pub text_indent: Au,
    /// Added to the font's space width.
    pub word_spacing: Au,
    /// Whether words may be hyphenated automatically (`hyphens: auto`).
    pub hyphens: bool,
    pub font: Arc<FontDescriptor>,
}

impl ComputedStyle {
    /// The initial values of every property.
    pub fn initial() -> Self {
        ComputedStyle {
            display: Display::Inline,
            float: Float::None,
            clear: Clear::None,
            position: Position::Static,
            overflow: Overflow::Visible,
            text_align: TextAlign::Left,
            white_space: WhiteSpace::Normal,
            margin: Sides::default(),
            border_width: Sides::default(),
            padding: Sides::default(),
            width: LengthPercentageOrAuto::Auto,
            height: LengthPercentageOrAuto::Auto,
            box_offsets: Sides::default(),
            text_indent: Au(0),
            word_spacing: Au(0),
            hyphens: false,
            font: Arc::new(FontDescriptor::default()),
        }
    }

    /// Margin, border and padding combined, per side.
    pub fn box_insets(&self) -> Sides<Au> {
        Sides {
            top: self.margin.top + self.border_width.top + self.padding.top,
            right: self.margin.right + self.border_width.right + self.padding.right,
            bottom: self.margin.bottom + self.border_width.bottom + self.padding.bottom,
            left: self.margin.left + self.border_width.left + self.padding.left,
        }
    }

    pub fn is_floating(&self) -> bool {
        self.float != Float::None
    }

    pub fn is_absolutely_positioned(&self) -> bool {
        matches!(self.position, Position::Absolute | Position::Fixed)
    }

    /// Floats and absolutely positioned boxes are taken out of the normal flow.
    pub fn is_out_of_flow(&self) -> bool {
        self.is_absolutely_positioned() || self.is_floating()
    }

    pub fn is_block_level(&self) -> bool {
        self.display == Display::Block && !self.is_out_of_flow()
    }
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self::initial()
    }
}
