/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use app_units::Au;
use euclid::default::{Point2D, Vector2D};
use layout_api::style::TextAlign;
use log::debug;

use crate::flow::word::WordContent;
use crate::flow::LineBreaker;
use crate::geom::Allocation;
use crate::oof::OofKind;
use crate::tree::{LayoutTree, NodeId};

impl LineBreaker {
    /// Positions the words of every line, and allocates the child nodes.
    /// `content_origin` is the top left corner of the flow's content box in
    /// canvas coordinates.
    pub(crate) fn allocate_lines(
        &mut self,
        tree: &mut LayoutTree,
        flow: NodeId,
        content_origin: Point2D<Au>,
    ) {
        debug!(
            "LineBreaker: allocating {} lines of {:?} at {:?}",
            self.lines.len(),
            flow,
            content_origin
        );
        for line_index in 0..self.lines.len() {
            let line = self.lines[line_index].clone();
            for word in &mut self.words[line.words()] {
                word.eff_space = word.orig_space;
            }

            let starts_with_block = match self.words[line.first_word].content {
                WordContent::Node(child) => tree.style(child).is_block_level(),
                _ => false,
            };
            let mut x = line.left_offset + line.indent;
            if starts_with_block {
                // Block-level children avoid floats with their own lines.
                x = Au(0);
            } else {
                let free = line.available_width - line.content_width;
                match self.text_align {
                    TextAlign::Left => {},
                    TextAlign::Right => x += free.max(Au(0)),
                    TextAlign::Center => x += (free / 2).max(Au(0)),
                    TextAlign::Justify => {
                        let ends_paragraph = line.provisional ||
                            self.words[line.last_word].is_break() ||
                            line_index + 1 == self.lines.len();
                        if !ends_paragraph {
                            self.justify(line_index, free);
                        }
                    },
                }
            }

            for index in line.words() {
                let word = &mut self.words[index];
                word.x = x;
                let advance = word.size.width + word.eff_space;
                match word.content {
                    WordContent::Node(child) => {
                        let origin = content_origin +
                            Vector2D::new(x, line.baseline() - word.size.ascent);
                        let allocation = Allocation::from_requisition(origin, &word.size);
                        tree.allocate(child, allocation);
                    },
                    WordContent::OutOfFlowRef { node, handle } if handle.kind != OofKind::Float => {
                        tree.set_static_position(node, content_origin + Vector2D::new(x, line.top));
                    },
                    _ => {},
                }
                x += advance;
            }
        }
    }

    /// Distributes `extra_space` over the spaces inside line `line_index`, in
    /// proportion to how far each of them can stretch, or, when
    /// `extra_space` is negative, removes it in proportion to how far each
    /// can shrink. The space after the last word is left alone.
    pub fn justify(&mut self, line_index: usize, extra_space: Au) {
        let line = &self.lines[line_index];
        let inner = line.first_word..line.last_word;
        let stretching = extra_space > Au(0);
        let capacity_of = |word: &crate::flow::Word| -> i64 {
            if stretching {
                word.stretch.0 as i64
            } else {
                word.shrink.0 as i64
            }
        };

        let capacity: i64 = self.words[inner.clone()].iter().map(capacity_of).sum();
        if capacity == 0 || extra_space == Au(0) {
            return;
        }
        let extra = if stretching {
            extra_space.0 as i64
        } else {
            (extra_space.0 as i64).max(-capacity)
        };

        let mut cumulative_capacity = 0;
        let mut distributed = 0;
        for word in &mut self.words[inner] {
            cumulative_capacity += capacity_of(word);
            let target = extra * cumulative_capacity / capacity;
            word.eff_space = word.orig_space + Au((target - distributed) as i32);
            distributed = target;
        }
    }
}
