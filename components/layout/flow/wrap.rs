/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Greedy line breaking.
//!
//! Words are added to the line being built one at a time, keeping prefix sums
//! of their widths and of the stretchability and shrinkability of the spaces
//! between them, so that the cost of breaking after any word of the line is
//! known in constant time. A line is ended when a word forces a break, or
//! when a word makes the line too tight while an earlier break is possible.
//! The break is then taken after the cheapest candidate, the later one on
//! ties.
//!
//! The width available to a line depends on the floats that intrude into it,
//! which in turn depends on the height of the line. Whenever the line grows
//! or a float is generated on it, the intrusions are queried again and, if
//! they changed, the prefix sums of the line are recomputed.

use app_units::Au;
use layout_api::style::Clear;
use log::{debug, trace};
use smallvec::SmallVec;

use crate::flow::badness::BadnessAndPenalty;
use crate::flow::line::Line;
use crate::flow::word::{self, Accumulated, Penalty, WordContent, WordFlags};
use crate::flow::{LineBreaker, WrapState};
use crate::oof::OofKind;
use crate::tree::{LayoutTree, NodeId};

/// The line currently being built.
#[derive(Clone, Debug)]
struct PendingLine {
    first_word: usize,
    top: Au,
    left_offset: Au,
    right_offset: Au,
    indent: Au,
    available_width: Au,
    /// The line height the float intrusions were last queried for.
    queried_height: Au,
    /// `1` when the previous line ended with a hyphen.
    penalty_index: usize,
}

impl LineBreaker {
    /// Brings the lines up to date for a content width of `width`.
    pub(crate) fn rewrap(&mut self, tree: &mut LayoutTree, flow: NodeId, width: Au) {
        if self.wrapped_width != Some(width) {
            if self.wrapped_width.is_some() {
                debug!(
                    "LineBreaker: width of {:?} changed from {:?} to {:?}",
                    flow, self.wrapped_width, width
                );
            }
            self.wrapped_width = Some(width);
            self.schedule_wrap(0);
        }
        let WrapState::WrapPending { from_line } = self.state else {
            return;
        };
        self.wrap(tree, flow, width, from_line);
        self.state = WrapState::Clean;
        tree.note_wrapped(flow);
    }

    /// Wraps all words from the first word of line `from_line` on. Lines
    /// before `from_line` are kept as they are.
    fn wrap(&mut self, tree: &mut LayoutTree, flow: NodeId, width: Au, from_line: usize) {
        self.lines.truncate(from_line);
        if self.lines.last().is_some_and(|line| line.provisional) {
            self.lines.pop();
        }
        let start = self.lines.last().map_or(0, |line| line.last_word + 1);
        debug!(
            "LineBreaker: wrapping {:?} from line {} (word {} of {}) to width {:?}",
            flow,
            self.lines.len(),
            start,
            self.words.len(),
            width
        );

        let mut pending = self.start_line(tree, flow, width, start);
        let mut index = start;
        while index < self.words.len() {
            index = self.wrap_word(tree, flow, width, &mut pending, index);
        }
        if pending.first_word < self.words.len() {
            self.add_line(tree, &pending, self.words.len() - 1, true);
        }
    }

    /// Adds word `index` to the pending line, ending the line when needed.
    /// Returns the index of the next word to add.
    fn wrap_word(
        &mut self,
        tree: &mut LayoutTree,
        flow: NodeId,
        width: Au,
        pending: &mut PendingLine,
        index: usize,
    ) -> usize {
        self.accumulate_word(tree, flow, width, pending, index);

        loop {
            let first = pending.first_word;
            let badness = self.words[index].accumulated.badness;
            let search_until = if badness.line_must_be_broken() {
                index
            } else if badness.line_too_tight() {
                if self.hyphenate_word(tree, flow, index) {
                    // Continue with the first piece of the hyphenated word.
                    self.accumulate_word(tree, flow, width, pending, index);
                    continue;
                }
                if index == first || !self.can_break_before(first, index, pending.penalty_index) {
                    // Nowhere to break, the word overflows.
                    return index + 1;
                }
                index - 1
            } else {
                return index + 1;
            };

            let break_pos = self.best_breakpoint(first, search_until);
            self.add_line(tree, pending, break_pos, false);
            *pending = self.start_line(tree, flow, width, break_pos + 1);
            if break_pos == index {
                return index + 1;
            }
            for moved in break_pos + 1..=index {
                self.accumulate_word(tree, flow, width, pending, moved);
            }
        }
    }

    fn can_break_before(&self, first: usize, index: usize, penalty_index: usize) -> bool {
        self.words[first..index]
            .iter()
            .any(|word| word.penalties[penalty_index].allows_break())
    }

    /// The cheapest word to break after among `first..=until`.
    fn best_breakpoint(&self, first: usize, until: usize) -> usize {
        let mut best = first;
        for index in first + 1..=until {
            let candidate = &self.words[index].accumulated.badness;
            if candidate
                .compare_to(&self.words[best].accumulated.badness)
                .is_le()
            {
                best = index;
            }
        }
        debug!(
            "LineBreaker: breaking after word {} of {}..={} ({})",
            best, first, until, self.words[best].accumulated.badness
        );
        best
    }

    fn start_line(
        &self,
        tree: &mut LayoutTree,
        flow: NodeId,
        width: Au,
        first_word: usize,
    ) -> PendingLine {
        let previous = self.lines.last();
        let penalty_index = previous
            .is_some_and(|line| self.words[line.last_word].ends_with_hyphen())
            as usize;
        let mut top = Line::top_after(previous, Au(0));
        let mut indent = Au(0);

        if let Some(word) = self.words.get(first_word) {
            match word.content {
                WordContent::Node(child) if tree.style(child).is_block_level() => {
                    let clear = tree.style(child).clear;
                    if clear != Clear::None {
                        if let Some(bottom) = tree.clear_position(flow, clear, first_word) {
                            debug!("LineBreaker: clearing {:?} down to {:?}", child, bottom);
                            top = top.max(bottom);
                        }
                    }
                },
                _ if self.starts_paragraph(first_word) => indent = self.text_indent,
                _ => {},
            }
        }

        let mut pending = PendingLine {
            first_word,
            top,
            left_offset: Au(0),
            right_offset: Au(0),
            indent,
            available_width: (width - indent).max(Au(0)),
            queried_height: Au(0),
            penalty_index,
        };
        if first_word < self.words.len() {
            Self::query_float_offsets(tree, flow, width, &mut pending, first_word, Au(0));
        }
        pending
    }

    /// Queries the float intrusions for the pending line, taking floats
    /// generated before word `before_index` into account. Returns whether
    /// the available width changed.
    fn query_float_offsets(
        tree: &mut LayoutTree,
        flow: NodeId,
        width: Au,
        pending: &mut PendingLine,
        before_index: usize,
        height: Au,
    ) -> bool {
        pending.queried_height = height;
        let (left, right) = tree.float_offsets(flow, pending.top, height, before_index, width);
        if (left, right) == (pending.left_offset, pending.right_offset) {
            return false;
        }
        trace!(
            "LineBreaker: float offsets at {:?}+{:?}: {:?} / {:?}",
            pending.top, height, left, right
        );
        pending.left_offset = left;
        pending.right_offset = right;
        pending.available_width = (width - left - right - pending.indent).max(Au(0));
        true
    }

    /// Measures word `index` and adds it to the prefix sums of the pending
    /// line.
    fn accumulate_word(
        &mut self,
        tree: &mut LayoutTree,
        flow: NodeId,
        width: Au,
        pending: &mut PendingLine,
        index: usize,
    ) {
        let mut float_placed = false;
        match self.words[index].content {
            WordContent::Node(child) => {
                self.words[index].size = tree.measure(child);
            },
            WordContent::OutOfFlowRef { node, handle } if handle.kind == OofKind::Float => {
                tree.float_position_requested(node, pending.top);
                float_placed = true;
            },
            _ => {},
        }
        self.sum_word(pending, index);

        let accumulated = self.words[index].accumulated;
        let height = accumulated.max_ascent + accumulated.max_descent;
        if height > pending.queried_height || float_placed {
            let height = height.max(pending.queried_height);
            if Self::query_float_offsets(tree, flow, width, pending, index + 1, height) {
                for word in pending.first_word..=index {
                    self.sum_word(pending, word);
                }
            }
        }
    }

    /// Computes the prefix sums and the cost of breaking after word `index`.
    fn sum_word(&mut self, pending: &PendingLine, index: usize) {
        let word = &self.words[index];
        let mut accumulated = if index == pending.first_word {
            Accumulated {
                total_width: word.size.width,
                max_ascent: word.size.ascent,
                max_descent: word.size.descent,
                ..Accumulated::default()
            }
        } else {
            let previous = &self.words[index - 1];
            let sums = &previous.accumulated;
            Accumulated {
                total_width: sums.total_width + previous.orig_space + word.size.width,
                max_ascent: sums.max_ascent.max(word.size.ascent),
                max_descent: sums.max_descent.max(word.size.descent),
                total_stretch: sums.total_stretch + previous.stretch,
                total_shrink: sums.total_shrink + previous.shrink,
                badness: BadnessAndPenalty::default(),
            }
        };

        let line_width = accumulated.total_width - word.size.width + word.width_at_line_end();
        accumulated.badness.calc_badness(
            line_width,
            pending.available_width,
            accumulated.total_stretch,
            accumulated.total_shrink,
        );
        accumulated
            .badness
            .set_penalty(word.penalties[pending.penalty_index]);
        trace!(
            "LineBreaker: word {} ({:?}): width {:?} of {:?}, {}",
            index, word.content, line_width, pending.available_width, accumulated.badness
        );
        self.words[index].accumulated = accumulated;
    }

    fn add_line(
        &mut self,
        tree: &mut LayoutTree,
        pending: &PendingLine,
        last_word: usize,
        provisional: bool,
    ) {
        let first_word = pending.first_word;
        let mut border_ascent = Au(0);
        let mut border_descent = Au(0);
        let mut margin_ascent = Au(0);
        let mut margin_descent = Au(0);
        for word in &self.words[first_word..=last_word] {
            let (margin_top, margin_bottom) = match word.content {
                WordContent::Node(child) => {
                    let style = tree.style(child);
                    if style.is_block_level() {
                        (style.margin.top, style.margin.bottom)
                    } else {
                        (Au(0), Au(0))
                    }
                },
                _ => (Au(0), Au(0)),
            };
            margin_ascent = margin_ascent.max(word.size.ascent);
            margin_descent = margin_descent.max(word.size.descent);
            border_ascent = border_ascent.max(word.size.ascent - margin_top);
            border_descent = border_descent.max(word.size.descent - margin_bottom);
        }

        let last = &self.words[last_word];
        let break_space = match last.content {
            WordContent::Break(word::BreakKind::Paragraph { space }) => space,
            _ => Au(0),
        };
        let top = Line::top_after(self.lines.last(), (margin_ascent - border_ascent).max(Au(0)))
            .max(pending.top);
        let content_width =
            last.accumulated.total_width - last.size.width + last.width_at_line_end();

        let line = Line {
            first_word,
            last_word,
            top,
            border_ascent,
            border_descent,
            margin_ascent,
            margin_descent,
            break_space,
            left_offset: pending.left_offset,
            right_offset: pending.right_offset,
            indent: pending.indent,
            available_width: pending.available_width,
            content_width,
            provisional,
        };
        let line_index = self.lines.len();
        for word in &self.words[first_word..=last_word] {
            if let WordContent::Node(child) = word.content {
                tree.set_line_of_child(child, line_index);
            }
        }
        debug!("LineBreaker: line {}: {}", line_index, line);
        self.lines.push(line);
    }

    /// Splits word `index` at its hyphenation points. Returns whether the
    /// word was split.
    fn hyphenate_word(&mut self, tree: &mut LayoutTree, flow: NodeId, index: usize) -> bool {
        let word = &self.words[index];
        if !word.flags.contains(WordFlags::CAN_BE_HYPHENATED) ||
            !tree.context().prefs.layout_hyphenation_enabled
        {
            return false;
        }
        let Some(text) = word.text() else {
            return false;
        };

        let context = tree.context();
        let mut breaks: SmallVec<[usize; 4]> = context.hyphenator.hyphenate(text);
        let mut previous = 0;
        breaks.retain(|offset| {
            let valid =
                *offset > previous && *offset < text.len() && text.is_char_boundary(*offset);
            if valid {
                previous = *offset;
            }
            valid
        });
        if breaks.is_empty() {
            self.words[index].flags.remove(WordFlags::CAN_BE_HYPHENATED);
            return false;
        }

        let hyphen = [
            Penalty::value(context.prefs.penalty_hyphen),
            Penalty::value(context.prefs.penalty_hyphen_2),
        ];
        let kept_flags = word.flags - WordFlags::CAN_BE_HYPHENATED;
        let mut pieces = Vec::with_capacity(breaks.len() + 1);
        let mut start = 0;
        for (piece_index, end) in breaks.iter().copied().chain(Some(text.len())).enumerate() {
            let is_first = piece_index == 0;
            let is_last = end == text.len();
            let mut flags = kept_flags;
            if !is_first {
                flags.remove(WordFlags::WORD_START);
            }
            let penalties = if is_last {
                word.penalties
            } else {
                flags.remove(WordFlags::WORD_END | WordFlags::PERM_DIV_CHAR);
                flags.insert(
                    WordFlags::DIV_CHAR_AT_EOL |
                        WordFlags::DRAW_AS_ONE_TEXT |
                        WordFlags::UNBREAKABLE_FOR_MIN_WIDTH,
                );
                hyphen
            };
            let mut piece = word::text_word(
                &text[start..end],
                flags,
                penalties,
                &word.style,
                &*context.font_metrics,
            );
            if is_last {
                piece.orig_space = word.orig_space;
                piece.eff_space = word.orig_space;
                piece.stretch = word.stretch;
                piece.shrink = word.shrink;
            }
            piece.highlight = word.highlight.as_ref().and_then(|range| {
                let (from, to) = (range.start.max(start), range.end.min(end));
                (from < to).then(|| from - start..to - start)
            });
            pieces.push(piece);
            start = end;
        }

        debug!(
            "LineBreaker: hyphenating word {} {:?} into {} pieces",
            index,
            text,
            pieces.len()
        );
        let shift = pieces.len() - 1;
        self.words.splice(index..=index, pieces);

        let moved: Vec<(usize, NodeId)> = self
            .child_nodes()
            .filter(|(word_index, _)| *word_index > index + shift)
            .collect();
        tree.refresh_tree_positions(flow, &moved);
        true
    }
}
