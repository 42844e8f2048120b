/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Walking laid out content, and the selection and find-in-page surface
//! built on top of it.

use std::ops::Range;

use bitflags::bitflags;
use euclid::default::Vector2D;
use log::debug;

use crate::flow::{BreakKind, WordContent};
use crate::geom::Allocation;
use crate::tree::{LayoutTree, NodeId};
use crate::tree_position::TreePosition;

bitflags! {
    /// Which kinds of content an iterator reports.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct ContentMask: u8 {
        const TEXT = 1 << 0;
        const NODE_IN_FLOW = 1 << 1;
        const NODE_OUT_OF_FLOW = 1 << 2;
        const BREAK = 1 << 3;
    }
}

/// One item of a flow's content.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Content<'a> {
    Text(&'a str),
    Node(NodeId),
    OutOfFlow(NodeId),
    Break(BreakKind),
}

impl Content<'_> {
    fn mask(&self) -> ContentMask {
        match self {
            Content::Text(_) => ContentMask::TEXT,
            Content::Node(_) => ContentMask::NODE_IN_FLOW,
            Content::OutOfFlow(_) => ContentMask::NODE_OUT_OF_FLOW,
            Content::Break(_) => ContentMask::BREAK,
        }
    }
}

/// A point in the content: a word of a flow, and a byte offset into its text.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ContentPosition {
    pub flow: NodeId,
    pub word: usize,
    pub offset: usize,
}

impl ContentPosition {
    pub fn new(flow: NodeId, word: usize, offset: usize) -> Self {
        ContentPosition { flow, word, offset }
    }

    fn document_position(&self, tree: &LayoutTree) -> TreePosition {
        tree.tree_position(self.flow).child(self.word)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ContentItem<'a> {
    pub position: ContentPosition,
    pub content: Content<'a>,
    /// Where the item was put, once its flow has been allocated.
    pub allocation: Option<Allocation>,
}

fn content_item(tree: &LayoutTree, flow: NodeId, index: usize) -> ContentItem<'_> {
    let line_breaker = tree.flow(flow);
    let word = &line_breaker.words()[index];
    let content = match word.content {
        WordContent::Text(ref text) => Content::Text(text),
        WordContent::Node(node) => Content::Node(node),
        WordContent::OutOfFlowRef { node, .. } => Content::OutOfFlow(node),
        WordContent::Break(kind) => Content::Break(kind),
    };
    let allocation = match content {
        Content::Node(node) | Content::OutOfFlow(node) => tree.allocation(node),
        Content::Text(_) | Content::Break(_) => {
            let line = line_breaker
                .line_of_word(index)
                .map(|line| &line_breaker.lines()[line]);
            match (line, tree.content_origin(flow)) {
                (Some(line), Some(origin)) => Some(Allocation::from_requisition(
                    origin + Vector2D::new(word.x, line.baseline() - word.size.ascent),
                    &word.size,
                )),
                _ => None,
            }
        },
    };
    ContentItem {
        position: ContentPosition::new(flow, index, 0),
        content,
        allocation,
    }
}

/// Iterates over the content of one flow, in both directions.
pub struct ContentIterator<'a> {
    tree: &'a LayoutTree,
    flow: NodeId,
    mask: ContentMask,
    front: usize,
    back: usize,
}

impl<'a> ContentIterator<'a> {
    pub fn new(tree: &'a LayoutTree, flow: NodeId, mask: ContentMask) -> Self {
        ContentIterator {
            tree,
            flow,
            mask,
            front: 0,
            back: tree.words(flow).len(),
        }
    }

    /// Starts at the word of `position`; iterating backwards yields the words
    /// before it.
    pub fn at(tree: &'a LayoutTree, position: ContentPosition, mask: ContentMask) -> Self {
        let mut iterator = ContentIterator::new(tree, position.flow, mask);
        iterator.front = position.word.min(iterator.back);
        iterator
    }

    /// Turns the remaining front part into a backwards walk from the current
    /// position.
    pub fn before(mut self) -> Self {
        self.back = self.front;
        self.front = 0;
        self
    }
}

impl<'a> Iterator for ContentIterator<'a> {
    type Item = ContentItem<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.front < self.back {
            let index = self.front;
            self.front += 1;
            let item = content_item(self.tree, self.flow, index);
            if self.mask.intersects(item.content.mask()) {
                return Some(item);
            }
        }
        None
    }
}

impl DoubleEndedIterator for ContentIterator<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        while self.front < self.back {
            self.back -= 1;
            let item = content_item(self.tree, self.flow, self.back);
            if self.mask.intersects(item.content.mask()) {
                return Some(item);
            }
        }
        None
    }
}

/// Iterates over the content of a flow and of all flows nested in it, in
/// document order. In-flow child nodes are reported before their content.
pub struct DeepContentIterator<'a> {
    tree: &'a LayoutTree,
    mask: ContentMask,
    stack: Vec<(NodeId, usize)>,
}

impl<'a> DeepContentIterator<'a> {
    pub fn new(tree: &'a LayoutTree, flow: NodeId, mask: ContentMask) -> Self {
        DeepContentIterator {
            tree,
            mask,
            stack: vec![(flow, 0)],
        }
    }
}

impl<'a> Iterator for DeepContentIterator<'a> {
    type Item = ContentItem<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (flow, next) = self.stack.last_mut()?;
            let (flow, index) = (*flow, *next);
            if index >= self.tree.words(flow).len() {
                self.stack.pop();
                continue;
            }
            *next += 1;

            let item = content_item(self.tree, flow, index);
            if let Content::Node(child) = item.content {
                if self.tree.is_flow(child) {
                    self.stack.push((child, 0));
                }
            }
            if self.mask.intersects(item.content.mask()) {
                return Some(item);
            }
        }
    }
}

/// A highlighted range of text, from one content position to another.
///
/// Only the flows holding highlighted words are remembered: hyphenation may
/// split a word after it was highlighted, which shifts the indices of the
/// words after it.
#[derive(Debug, Default)]
pub struct Selection {
    flows: Vec<NodeId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    /// Highlights the text between `start` and `end`, in whichever order they
    /// come in the document, replacing what was highlighted before.
    pub fn highlight(
        &mut self,
        tree: &mut LayoutTree,
        start: ContentPosition,
        end: ContentPosition,
    ) {
        self.unhighlight(tree);
        let Some(root) = tree.root() else {
            return;
        };
        let (start, end) = if end.document_position(tree) < start.document_position(tree) {
            (end, start)
        } else {
            (start, end)
        };
        let first = start.document_position(tree);
        let last = end.document_position(tree);

        let mut ranges: Vec<(NodeId, usize, Range<usize>)> = Vec::new();
        for item in DeepContentIterator::new(tree, root, ContentMask::TEXT) {
            let Content::Text(text) = item.content else {
                continue;
            };
            let position = item.position.document_position(tree);
            if position < first || position > last {
                continue;
            }
            let (flow, word) = (item.position.flow, item.position.word);
            let from = if (flow, word) == (start.flow, start.word) {
                start.offset.min(text.len())
            } else {
                0
            };
            let to = if (flow, word) == (end.flow, end.word) {
                end.offset.min(text.len())
            } else {
                text.len()
            };
            if from < to {
                ranges.push((flow, word, from..to));
            }
        }

        debug!("Selection: highlighting {} words", ranges.len());
        for (flow, word, range) in ranges {
            if let Some(line_breaker) = tree.flow_mut(flow) {
                line_breaker.words_mut()[word].highlight = Some(range);
                if !self.flows.contains(&flow) {
                    self.flows.push(flow);
                }
            }
        }
    }

    pub fn unhighlight(&mut self, tree: &mut LayoutTree) {
        for flow in self.flows.drain(..) {
            if let Some(line_breaker) = tree.flow_mut(flow) {
                for word in line_breaker.words_mut() {
                    word.highlight = None;
                }
            }
        }
    }
}

/// Every occurrence of `needle` within a single word below `flow`, in
/// document order.
pub fn find_text(tree: &LayoutTree, flow: NodeId, needle: &str) -> Vec<ContentPosition> {
    if needle.is_empty() {
        return Vec::new();
    }
    DeepContentIterator::new(tree, flow, ContentMask::TEXT)
        .flat_map(|item| {
            let Content::Text(text) = item.content else {
                return Vec::new();
            };
            text.match_indices(needle)
                .map(|(offset, _)| ContentPosition { offset, ..item.position })
                .collect()
        })
        .collect()
}
