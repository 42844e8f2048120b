/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Flow nodes: containers that wrap their inline content into lines.
//!
//! Content is a growing sequence of [`Word`]s. Words are only ever appended,
//! except that hyphenation may split one word into several in place. The
//! [`Line`]s are derived from the words by a greedy, TeX-like breaker (see
//! `wrap.rs`) and are re-derived incrementally, starting at the first line
//! that may have changed.

use std::ops::Range;
use std::sync::Arc;

use app_units::Au;
use flowbox_config::prefs::Preferences;
use layout_api::style::{TextAlign, WhiteSpace};
use layout_api::{ComputedStyle, FontMetricsProvider};
use log::debug;

use crate::geom::Requisition;
use crate::oof::OofHandle;
use crate::tree::NodeId;

mod allocate;
pub mod badness;
mod extremes;
mod line;
mod word;
mod wrap;

pub use line::Line;
pub use word::{BreakKind, Penalty, Word, WordContent, WordFlags};

/// Whether the lines of a [`LineBreaker`] are up to date.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WrapState {
    Clean,
    /// Lines from `from_line` on have to be wrapped again.
    WrapPending { from_line: usize },
}

/// The words and lines of one flow node.
#[derive(Debug)]
pub struct LineBreaker {
    words: Vec<Word>,
    lines: Vec<Line>,
    state: WrapState,
    text_align: TextAlign,
    text_indent: Au,
    /// The content width the lines were wrapped to.
    wrapped_width: Option<Au>,
}

impl LineBreaker {
    pub fn new(style: &ComputedStyle) -> Self {
        LineBreaker {
            words: Vec::new(),
            lines: Vec::new(),
            state: WrapState::Clean,
            text_align: style.text_align,
            text_indent: style.text_indent,
            wrapped_width: None,
        }
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn state(&self) -> WrapState {
        self.state
    }

    /// The line `index` was placed on, if it has been wrapped.
    pub fn line_of_word(&self, index: usize) -> Option<usize> {
        let line = self.lines.partition_point(|line| line.last_word < index);
        self.lines
            .get(line)
            .filter(|line| line.first_word <= index)
            .map(|_| line)
    }

    /// The height of the lines, including the bottom margin of a block-level
    /// last child.
    pub fn content_height(&self) -> Au {
        self.lines.last().map_or(Au(0), |line| {
            line.bottom() + (line.margin_descent - line.border_descent).max(Au(0))
        })
    }

    /// The baseline of the first line, relative to the content box.
    pub fn first_baseline(&self) -> Option<Au> {
        self.lines.first().map(Line::baseline)
    }

    /// The in-flow and out-of-flow child nodes, with the index of the word
    /// that refers to them.
    pub fn child_nodes(&self) -> impl Iterator<Item = (usize, NodeId)> + '_ {
        self.words
            .iter()
            .enumerate()
            .filter_map(|(index, word)| word.node().map(|node| (index, node)))
    }

    pub(crate) fn words_mut(&mut self) -> &mut [Word] {
        &mut self.words
    }

    /// Asks for the lines from `from_line` on to be wrapped again.
    pub(crate) fn schedule_wrap(&mut self, from_line: usize) {
        self.state = match self.state {
            WrapState::Clean => WrapState::WrapPending { from_line },
            WrapState::WrapPending { from_line: pending } => WrapState::WrapPending {
                from_line: pending.min(from_line),
            },
        };
    }

    /// A child on line `line` changed its size.
    pub(crate) fn child_changed(&mut self, line: usize) {
        self.schedule_wrap(line);
    }

    /// The word at `index` changed its size or what it refers to.
    pub(crate) fn word_changed(&mut self, index: usize) {
        let line = self
            .line_of_word(index)
            .unwrap_or_else(|| self.first_unfinished_line());
        self.schedule_wrap(line);
    }

    /// The first line that may still change when words are appended.
    fn first_unfinished_line(&self) -> usize {
        match self.lines.last() {
            Some(line) if line.provisional => self.lines.len() - 1,
            _ => self.lines.len(),
        }
    }

    fn push_word(&mut self, word: Word) -> usize {
        let index = self.words.len();
        self.words.push(word);
        self.schedule_wrap(self.first_unfinished_line());
        index
    }

    /// Appends a run of text without spaces. Returns the range of words it
    /// was split into.
    pub(crate) fn add_text(
        &mut self,
        text: &str,
        style: &Arc<ComputedStyle>,
        metrics: &dyn FontMetricsProvider,
        prefs: &Preferences,
    ) -> Range<usize> {
        let start = self.words.len();
        if text.is_empty() {
            return start..start;
        }
        for piece in word::split_text(text, prefs) {
            let mut flags = piece.flags;
            if style.hyphens {
                flags.insert(WordFlags::CAN_BE_HYPHENATED);
            }
            self.push_word(word::text_word(
                piece.text,
                flags,
                piece.penalties,
                style,
                metrics,
            ));
        }
        start..self.words.len()
    }

    /// Adds a breakable space after the last word. Spaces after breaks and
    /// at the very start are dropped.
    pub(crate) fn add_space(
        &mut self,
        style: &ComputedStyle,
        metrics: &dyn FontMetricsProvider,
        prefs: &Preferences,
    ) {
        let justify = self.text_align == TextAlign::Justify;
        let Some(index) = self.words.len().checked_sub(1) else {
            return;
        };
        let word = &mut self.words[index];
        if word.is_break() {
            return;
        }
        let space = metrics.space_width(&style.font) + style.word_spacing;
        word.set_space(space, prefs.stretchability_factor, justify);
        if style.white_space != WhiteSpace::NoWrap {
            word.penalties = word::BREAK_ALLOWED;
        }
        self.word_changed(index);
    }

    /// Allows a break after the last word without adding a space.
    pub(crate) fn add_break_option(&mut self) {
        let Some(index) = self.words.len().checked_sub(1) else {
            return;
        };
        let word = &mut self.words[index];
        if !word.penalties[0].allows_break() {
            word.penalties = word::BREAK_ALLOWED;
            self.word_changed(index);
        }
    }

    pub(crate) fn add_line_break(
        &mut self,
        style: &Arc<ComputedStyle>,
        metrics: &dyn FontMetricsProvider,
    ) -> usize {
        let size = Requisition::new(
            Au(0),
            metrics.ascent(&style.font),
            metrics.descent(&style.font),
        );
        let mut word = Word::new(WordContent::Break(BreakKind::Line), size, style.clone());
        word.penalties = word::BREAK_FORCED;
        self.push_word(word)
    }

    /// Ends the paragraph. Consecutive paragraph breaks collapse into one
    /// with the largest space, and a flow never starts with one.
    pub(crate) fn add_paragraph_break(
        &mut self,
        space: Au,
        style: &Arc<ComputedStyle>,
    ) -> Option<usize> {
        let last = self.words.len().checked_sub(1)?;
        if let WordContent::Break(BreakKind::Paragraph { space: existing }) =
            self.words[last].content
        {
            if space > existing {
                self.words[last].content = WordContent::Break(BreakKind::Paragraph { space });
                self.word_changed(last);
            }
            return Some(last);
        }
        let mut word = Word::new(
            WordContent::Break(BreakKind::Paragraph { space }),
            Requisition::default(),
            style.clone(),
        );
        word.penalties = word::BREAK_FORCED;
        Some(self.push_word(word))
    }

    pub(crate) fn add_node(&mut self, node: NodeId, style: &Arc<ComputedStyle>) -> usize {
        self.push_word(Word::new(
            WordContent::Node(node),
            Requisition::default(),
            style.clone(),
        ))
    }

    pub(crate) fn add_out_of_flow_ref(
        &mut self,
        node: NodeId,
        handle: OofHandle,
        style: &Arc<ComputedStyle>,
    ) -> usize {
        self.push_word(Word::new(
            WordContent::OutOfFlowRef { node, handle },
            Requisition::default(),
            style.clone(),
        ))
    }

    /// Forgets the wrapped lines, e.g. after the available width changed.
    pub(crate) fn invalidate(&mut self) {
        debug!("LineBreaker: invalidating all {} lines", self.lines.len());
        self.wrapped_width = None;
        self.schedule_wrap(0);
    }

    /// Whether a paragraph starts at word `index`.
    fn starts_paragraph(&self, index: usize) -> bool {
        index == 0 || self.words[index - 1].is_paragraph_break()
    }
}
