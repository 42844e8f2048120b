/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use app_units::Au;

use crate::flow::word::{WordContent, WordFlags};
use crate::flow::LineBreaker;
use crate::geom::Extremes;
use crate::tree::LayoutTree;

impl LineBreaker {
    /// The extremes of the content, without the flow's own margins, borders
    /// and padding.
    ///
    /// Each paragraph, i.e. each run of words between forced breaks, is
    /// measured on its own. Its minimum width is that of its widest
    /// unbreakable unit, its maximum width that of the whole paragraph on one
    /// line. Words split by the hyphenator still count as one unit, so the
    /// result does not depend on how the content was wrapped before.
    pub(crate) fn content_extremes(&self, tree: &mut LayoutTree) -> Extremes {
        let mut min_width = Au(0);
        let mut max_width = Au(0);
        let mut unit_width = Au(0);
        let mut line_width = Au(0);
        let mut at_paragraph_start = true;

        for (index, word) in self.words.iter().enumerate() {
            let (word_min, word_max) = match word.content {
                WordContent::Node(child) => {
                    let extremes = tree.measure_extremes(child);
                    if at_paragraph_start && !tree.style(child).is_block_level() {
                        unit_width = self.text_indent;
                        line_width = self.text_indent;
                    }
                    (extremes.min_width, extremes.max_width)
                },
                WordContent::OutOfFlowRef { .. } => (Au(0), Au(0)),
                WordContent::Text(_) | WordContent::Break(_) => {
                    if at_paragraph_start {
                        unit_width = self.text_indent;
                        line_width = self.text_indent;
                    }
                    (word.size.width, word.size.width)
                },
            };
            at_paragraph_start = false;

            unit_width += word_min;
            line_width += word_max;
            max_width = max_width.max(line_width);

            let penalty = word.penalties[0];
            let is_last = index + 1 == self.words.len();
            if penalty.forces_break() || is_last {
                min_width = min_width.max(unit_width);
                unit_width = Au(0);
                line_width = Au(0);
                at_paragraph_start = penalty.forces_break();
                continue;
            }
            if penalty.allows_break() &&
                !word.flags.contains(WordFlags::UNBREAKABLE_FOR_MIN_WIDTH)
            {
                let hyphen = if word.flags.contains(WordFlags::DIV_CHAR_AT_EOL) {
                    word.hyphen_width
                } else {
                    Au(0)
                };
                min_width = min_width.max(unit_width + hyphen);
                unit_width = Au(0);
            } else {
                unit_width += word.orig_space;
            }
            line_width += word.orig_space;
        }

        Extremes::new(min_width, max_width)
    }
}
