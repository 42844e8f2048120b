/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::fmt;
use std::ops::RangeInclusive;

use app_units::Au;

/// A line of a flow: the words `first_word..=last_word`.
///
/// Vertical offsets are relative to the top of the flow's content box. The
/// border metrics leave out the vertical margins of block-level children,
/// the margin metrics include them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Line {
    pub first_word: usize,
    pub last_word: usize,
    pub top: Au,
    pub border_ascent: Au,
    pub border_descent: Au,
    pub margin_ascent: Au,
    pub margin_descent: Au,
    /// Space requested below the line by a paragraph break.
    pub break_space: Au,
    /// Float intrusions from the left and the right.
    pub left_offset: Au,
    pub right_offset: Au,
    /// First-line indentation.
    pub indent: Au,
    /// Width available to the words of this line.
    pub available_width: Au,
    /// Width of the words and spaces, as wrapped.
    pub content_width: Au,
    /// The line is the last one and may still grow as words are appended.
    pub provisional: bool,
}

impl Line {
    pub fn words(&self) -> RangeInclusive<usize> {
        self.first_word..=self.last_word
    }

    pub fn border_height(&self) -> Au {
        self.border_ascent + self.border_descent
    }

    pub fn bottom(&self) -> Au {
        self.top + self.border_height()
    }

    pub fn baseline(&self) -> Au {
        self.top + self.border_ascent
    }

    /// Margin of block-level children sticking out above the line.
    pub fn margin_above(&self) -> Au {
        (self.margin_ascent - self.border_ascent).max(Au(0))
    }

    /// Space the line wants below it: margins of block-level children or a
    /// paragraph break, whichever is larger. The two collapse.
    pub fn space_below(&self) -> Au {
        (self.margin_descent - self.border_descent)
            .max(self.break_space)
            .max(Au(0))
    }

    /// The top of a line following `previous`, whose own margin above is
    /// `margin_above`.
    pub fn top_after(previous: Option<&Line>, margin_above: Au) -> Au {
        match previous {
            Some(previous) => previous.bottom() + previous.space_below().max(margin_above),
            None => margin_above,
        }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[{}, {}] top={} height={} insets=({}, {}){}",
            self.first_word,
            self.last_word,
            self.top.to_f32_px(),
            self.border_height().to_f32_px(),
            self.left_offset.to_f32_px(),
            self.right_offset.to_f32_px(),
            if self.provisional { " (provisional)" } else { "" }
        )
    }
}
