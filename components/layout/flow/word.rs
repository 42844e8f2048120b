/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::ops::Range;
use std::sync::Arc;

use app_units::Au;
use bitflags::bitflags;
use flowbox_config::prefs::Preferences;
use layout_api::{ComputedStyle, FontMetricsProvider};
use smallvec::SmallVec;

use crate::flow::badness::BadnessAndPenalty;
use crate::geom::Requisition;
use crate::oof::OofHandle;
use crate::tree::NodeId;

const SOFT_HYPHEN: char = '\u{ad}';
const EM_DASH: char = '\u{2014}';

bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct WordFlags: u16 {
        /// The word may be split by the hyphenator when a line is too tight.
        const CAN_BE_HYPHENATED = 1 << 0;
        /// A hyphen is drawn after the word when the line is broken after it.
        const DIV_CHAR_AT_EOL = 1 << 1;
        /// The word ends with a hyphen that is part of the text.
        const PERM_DIV_CHAR = 1 << 2;
        /// The word is drawn together with the next one, as a single run.
        const DRAW_AS_ONE_TEXT = 1 << 3;
        /// The word is the first piece of a logical word.
        const WORD_START = 1 << 4;
        /// The word is the last piece of a logical word.
        const WORD_END = 1 << 5;
        /// Breaking after the word does not count when computing the minimum width.
        const UNBREAKABLE_FOR_MIN_WIDTH = 1 << 6;
    }
}

/// The cost of breaking a line after a word.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Penalty {
    ForceBreak,
    ProhibitBreak,
    Value(i32),
}

impl Penalty {
    /// Finite penalties are limited to this magnitude so that they can never
    /// be confused with the infinite ones.
    pub const MAX_VALUE: i32 = 10_000;

    pub fn value(value: i32) -> Penalty {
        Penalty::Value(value.clamp(-Self::MAX_VALUE, Self::MAX_VALUE))
    }

    pub fn allows_break(&self) -> bool {
        *self != Penalty::ProhibitBreak
    }

    pub fn forces_break(&self) -> bool {
        *self == Penalty::ForceBreak
    }
}

/// Penalties per penalty index. Index `1` applies when the previous line
/// ended with a hyphen.
pub type Penalties = [Penalty; 2];

pub(crate) const BREAK_ALLOWED: Penalties = [Penalty::Value(0), Penalty::Value(0)];
pub(crate) const BREAK_PROHIBITED: Penalties = [Penalty::ProhibitBreak, Penalty::ProhibitBreak];
pub(crate) const BREAK_FORCED: Penalties = [Penalty::ForceBreak, Penalty::ForceBreak];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BreakKind {
    /// Ends the line, the next word starts a new one in the same paragraph.
    Line,
    /// Ends the paragraph and asks for at least `space` below it.
    Paragraph { space: Au },
}

#[derive(Clone, Debug, PartialEq)]
pub enum WordContent {
    Text(Box<str>),
    /// An in-flow child node.
    Node(NodeId),
    /// Marks where an out-of-flow box was generated. Takes no space.
    OutOfFlowRef { node: NodeId, handle: OofHandle },
    Break(BreakKind),
}

/// Prefix sums from the first word of the line up to and including a word.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Accumulated {
    /// Words and the spaces between them, without the space after this word.
    pub total_width: Au,
    pub max_ascent: Au,
    pub max_descent: Au,
    pub total_stretch: Au,
    pub total_shrink: Au,
    pub badness: BadnessAndPenalty,
}

#[derive(Clone, Debug)]
pub struct Word {
    pub content: WordContent,
    /// For child nodes this is the margin box.
    pub size: Requisition,
    /// The space after the word, as measured.
    pub orig_space: Au,
    /// The space after the word once the line has been justified.
    pub eff_space: Au,
    pub stretch: Au,
    pub shrink: Au,
    pub hyphen_width: Au,
    pub flags: WordFlags,
    pub penalties: Penalties,
    pub style: Arc<ComputedStyle>,
    /// Left edge relative to the content box of the flow, set by allocation.
    pub x: Au,
    /// Byte range of the text that is selected.
    pub highlight: Option<Range<usize>>,
    pub(crate) accumulated: Accumulated,
}

impl Word {
    pub(crate) fn new(content: WordContent, size: Requisition, style: Arc<ComputedStyle>) -> Self {
        Word {
            content,
            size,
            orig_space: Au(0),
            eff_space: Au(0),
            stretch: Au(0),
            shrink: Au(0),
            hyphen_width: Au(0),
            flags: WordFlags::empty(),
            penalties: BREAK_PROHIBITED,
            style,
            x: Au(0),
            highlight: None,
            accumulated: Accumulated::default(),
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self.content {
            WordContent::Text(ref text) => Some(text),
            _ => None,
        }
    }

    pub fn node(&self) -> Option<NodeId> {
        match self.content {
            WordContent::Node(node) | WordContent::OutOfFlowRef { node, .. } => Some(node),
            _ => None,
        }
    }

    pub fn is_break(&self) -> bool {
        matches!(self.content, WordContent::Break(_))
    }

    pub fn is_paragraph_break(&self) -> bool {
        matches!(self.content, WordContent::Break(BreakKind::Paragraph { .. }))
    }

    pub fn is_out_of_flow_ref(&self) -> bool {
        matches!(self.content, WordContent::OutOfFlowRef { .. })
    }

    /// Whether the line is broken after this word at a division character.
    pub fn ends_with_hyphen(&self) -> bool {
        self.flags
            .intersects(WordFlags::DIV_CHAR_AT_EOL | WordFlags::PERM_DIV_CHAR)
    }

    /// The width the word takes at the end of a line.
    pub fn width_at_line_end(&self) -> Au {
        if self.flags.contains(WordFlags::DIV_CHAR_AT_EOL) {
            self.size.width + self.hyphen_width
        } else {
            self.size.width
        }
    }

    /// Sets the space after the word, replacing any previous one.
    pub(crate) fn set_space(&mut self, space: Au, stretchability_factor: i32, justify: bool) {
        self.orig_space = space;
        self.eff_space = space;
        self.stretch = Au(((space.0 as i64 * stretchability_factor as i64) / 100) as i32);
        self.shrink = if justify { space / 3 } else { Au(0) };
    }
}

/// A piece of a text run, before it is measured.
#[derive(Debug, Eq, PartialEq)]
pub(crate) struct TextPiece<'a> {
    pub text: &'a str,
    pub flags: WordFlags,
    pub penalties: Penalties,
}

/// Splits one logical word at soft hyphens, after hyphens and around em
/// dashes. Soft hyphens are dropped from the text.
///
/// The last piece prohibits breaking after it: whether the word may be
/// broken after depends on what the builder appends next.
pub(crate) fn split_text<'a>(text: &'a str, prefs: &Preferences) -> SmallVec<[TextPiece<'a>; 2]> {
    let hyphen = [Penalty::value(prefs.penalty_hyphen), Penalty::value(prefs.penalty_hyphen_2)];
    let mut pieces: SmallVec<[TextPiece<'a>; 2]> = SmallVec::new();
    let mut start = 0;

    for (offset, ch) in text.char_indices() {
        let end = offset + ch.len_utf8();
        match ch {
            SOFT_HYPHEN => {
                if offset > start {
                    pieces.push(TextPiece {
                        text: &text[start..offset],
                        flags: WordFlags::DIV_CHAR_AT_EOL,
                        penalties: hyphen,
                    });
                }
                start = end;
            },
            '-' if offset > start && end < text.len() => {
                pieces.push(TextPiece {
                    text: &text[start..end],
                    flags: WordFlags::PERM_DIV_CHAR,
                    penalties: hyphen,
                });
                start = end;
            },
            EM_DASH => {
                if offset > start {
                    let left = Penalty::value(prefs.penalty_em_dash_left);
                    pieces.push(TextPiece {
                        text: &text[start..offset],
                        flags: WordFlags::empty(),
                        penalties: [left, left],
                    });
                }
                if end < text.len() {
                    pieces.push(TextPiece {
                        text: &text[offset..end],
                        flags: WordFlags::empty(),
                        penalties: [
                            Penalty::value(prefs.penalty_em_dash_right),
                            Penalty::value(prefs.penalty_em_dash_right_2),
                        ],
                    });
                    start = end;
                } else {
                    start = offset;
                }
            },
            _ => {},
        }
    }

    if start < text.len() || pieces.is_empty() {
        pieces.push(TextPiece {
            text: &text[start..],
            flags: WordFlags::empty(),
            penalties: BREAK_PROHIBITED,
        });
    } else if let Some(last) = pieces.last_mut() {
        // A trailing soft hyphen.
        last.flags.remove(WordFlags::DIV_CHAR_AT_EOL);
        last.penalties = BREAK_PROHIBITED;
    }

    let count = pieces.len();
    for (index, piece) in pieces.iter_mut().enumerate() {
        if index == 0 {
            piece.flags.insert(WordFlags::WORD_START);
        }
        if index + 1 == count {
            piece.flags.insert(WordFlags::WORD_END);
        } else {
            piece.flags.insert(WordFlags::DRAW_AS_ONE_TEXT);
        }
    }
    pieces
}

/// Measures one piece of text as a word.
pub(crate) fn text_word(
    text: &str,
    flags: WordFlags,
    penalties: Penalties,
    style: &Arc<ComputedStyle>,
    metrics: &dyn FontMetricsProvider,
) -> Word {
    let font = &*style.font;
    let size = Requisition::new(
        metrics.text_width(font, text),
        metrics.ascent(font),
        metrics.descent(font),
    );
    let mut word = Word::new(WordContent::Text(text.into()), size, style.clone());
    word.flags = flags;
    word.penalties = penalties;
    if flags.contains(WordFlags::DIV_CHAR_AT_EOL) {
        word.hyphen_width = metrics.hyphen_width(font);
    }
    word
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts<'a>(pieces: &[TextPiece<'a>]) -> Vec<&'a str> {
        pieces.iter().map(|piece| piece.text).collect()
    }

    #[test]
    fn plain_word_is_one_piece() {
        let pieces = split_text("word", &Preferences::default());
        assert_eq!(texts(&pieces), ["word"]);
        assert_eq!(pieces[0].flags, WordFlags::WORD_START | WordFlags::WORD_END);
        assert_eq!(pieces[0].penalties, BREAK_PROHIBITED);
    }

    #[test]
    fn soft_hyphens_are_dropped() {
        let prefs = Preferences::default();
        let pieces = split_text("hy\u{ad}phen\u{ad}ation", &prefs);
        assert_eq!(texts(&pieces), ["hy", "phen", "ation"]);
        assert!(pieces[0].flags.contains(WordFlags::DIV_CHAR_AT_EOL));
        assert!(pieces[0].flags.contains(WordFlags::DRAW_AS_ONE_TEXT));
        assert_eq!(pieces[1].penalties[0], Penalty::Value(prefs.penalty_hyphen));
        assert_eq!(pieces[1].penalties[1], Penalty::Value(prefs.penalty_hyphen_2));
        assert!(pieces[2].flags.contains(WordFlags::WORD_END));
        assert!(!pieces[2].flags.contains(WordFlags::DIV_CHAR_AT_EOL));
    }

    #[test]
    fn explicit_hyphens_stay_in_the_text() {
        let pieces = split_text("well-known", &Preferences::default());
        assert_eq!(texts(&pieces), ["well-", "known"]);
        assert!(pieces[0].flags.contains(WordFlags::PERM_DIV_CHAR));

        let pieces = split_text("-5", &Preferences::default());
        assert_eq!(texts(&pieces), ["-5"]);
    }

    #[test]
    fn em_dashes_form_their_own_piece() {
        let prefs = Preferences::default();
        let pieces = split_text("yes\u{2014}no", &prefs);
        assert_eq!(texts(&pieces), ["yes", "\u{2014}", "no"]);
        assert_eq!(pieces[0].penalties[0], Penalty::Value(prefs.penalty_em_dash_left));
        assert_eq!(pieces[1].penalties[0], Penalty::Value(prefs.penalty_em_dash_right));
        assert_eq!(
            pieces[1].penalties[1],
            Penalty::Value(prefs.penalty_em_dash_right_2)
        );
    }

    #[test]
    fn penalties_are_clamped() {
        assert_eq!(Penalty::value(i32::MAX), Penalty::Value(Penalty::MAX_VALUE));
        assert_eq!(Penalty::value(i32::MIN), Penalty::Value(-Penalty::MAX_VALUE));
    }
}
