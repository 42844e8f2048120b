/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

mod common;

use std::sync::Arc;

use app_units::Au;
use euclid::default::{Point2D, Size2D};
use layout::flow::BreakKind;
use layout::{
    find_text, Content, ContentIterator, ContentMask, ContentPosition, DeepContentIterator,
    LayoutTree, NodeId, Selection,
};
use layout_api::style::{Display, Float};
use layout_api::{ComputedStyle, ExplicitHyphenator};

use common::*;

struct Document {
    tree: LayoutTree,
    root: NodeId,
    inline_block: NodeId,
    float: NodeId,
}

/// "aaaa bbbb", a line break, an inline block holding "cc" and a float.
fn document() -> Document {
    let mut tree = tree(200, 100);
    let style = tree.intern_style(text_style());
    let root = tree.create_root(style.clone());
    tree.append_words(root, "aaaa bbbb", &style);
    tree.append_line_break(root, &style);
    let inline_block_style = tree.intern_style(ComputedStyle {
        display: Display::InlineBlock,
        ..text_style()
    });
    let inline_block = tree.append_child(root, inline_block_style);
    tree.append_text(inline_block, "cc", &style);
    let float_style = tree.intern_style(float_style(Float::Left, 30, 20));
    let float = tree.append_child(root, float_style);
    Document {
        tree,
        root,
        inline_block,
        float,
    }
}

fn texts<'a>(items: impl Iterator<Item = layout::ContentItem<'a>>) -> Vec<&'a str> {
    items
        .filter_map(|item| match item.content {
            Content::Text(text) => Some(text),
            _ => None,
        })
        .collect()
}

#[test]
fn the_mask_selects_the_kinds_of_content() {
    let Document {
        tree,
        root,
        inline_block,
        float,
    } = document();

    assert_eq!(
        texts(ContentIterator::new(&tree, root, ContentMask::TEXT)),
        vec!["aaaa", "bbbb"]
    );

    let nodes: Vec<Content> = ContentIterator::new(
        &tree,
        root,
        ContentMask::NODE_IN_FLOW | ContentMask::NODE_OUT_OF_FLOW,
    )
    .map(|item| item.content)
    .collect();
    assert_eq!(
        nodes,
        vec![Content::Node(inline_block), Content::OutOfFlow(float)]
    );

    let breaks: Vec<_> = ContentIterator::new(&tree, root, ContentMask::BREAK).collect();
    assert_eq!(breaks.len(), 1);
    assert_eq!(breaks[0].content, Content::Break(BreakKind::Line));
    assert_eq!(breaks[0].position, ContentPosition::new(root, 2, 0));

    assert_eq!(ContentIterator::new(&tree, root, ContentMask::empty()).count(), 0);
}

#[test]
fn iterating_backwards() {
    let Document { tree, root, .. } = document();

    assert_eq!(
        texts(ContentIterator::new(&tree, root, ContentMask::TEXT).rev()),
        vec!["bbbb", "aaaa"]
    );

    let position = ContentPosition::new(root, 1, 0);
    assert_eq!(
        texts(ContentIterator::at(&tree, position, ContentMask::TEXT)),
        vec!["bbbb"]
    );
    assert_eq!(
        texts(ContentIterator::at(&tree, position, ContentMask::TEXT).before().rev()),
        vec!["aaaa"]
    );
}

#[test]
fn deep_iteration_descends_into_in_flow_children() {
    let Document {
        tree,
        root,
        inline_block,
        float,
    } = document();

    assert_eq!(
        texts(DeepContentIterator::new(&tree, root, ContentMask::TEXT)),
        vec!["aaaa", "bbbb", "cc"]
    );

    let all: Vec<Content> = DeepContentIterator::new(&tree, root, ContentMask::all())
        .map(|item| item.content)
        .collect();
    assert_eq!(
        all,
        vec![
            Content::Text("aaaa"),
            Content::Text("bbbb"),
            Content::Break(BreakKind::Line),
            Content::Node(inline_block),
            Content::Text("cc"),
            Content::OutOfFlow(float),
        ]
    );
}

#[test]
fn items_know_where_they_were_put() {
    let Document { mut tree, root, .. } = document();
    let before: Vec<_> = ContentIterator::new(&tree, root, ContentMask::TEXT).collect();
    assert!(before.iter().all(|item| item.allocation.is_none()));

    tree.layout();
    let bbbb = ContentIterator::new(&tree, root, ContentMask::TEXT)
        .nth(1)
        .unwrap()
        .allocation
        .unwrap();
    assert_eq!(bbbb.origin(), Point2D::new(px(41), Au(0)));
    assert_eq!(bbbb.width, px(40));
    assert_eq!(bbbb.height(), px(10));
}

#[test]
fn find_text_reports_every_occurrence() {
    let Document {
        tree,
        root,
        inline_block,
        ..
    } = document();

    let found = find_text(&tree, root, "bb");
    assert_eq!(
        found,
        vec![
            ContentPosition::new(root, 1, 0),
            ContentPosition::new(root, 1, 2),
        ]
    );
    assert_eq!(
        find_text(&tree, root, "cc"),
        vec![ContentPosition::new(inline_block, 0, 0)]
    );
    assert!(find_text(&tree, root, "xyz").is_empty());
    assert!(find_text(&tree, root, "").is_empty());
}

#[test]
fn selection_highlights_across_flows() {
    let Document {
        mut tree,
        root,
        inline_block,
        ..
    } = document();
    let start = ContentPosition::new(root, 0, 2);
    let end = ContentPosition::new(inline_block, 0, 1);

    let mut selection = Selection::new();
    assert!(selection.is_empty());
    selection.highlight(&mut tree, end, start);
    assert!(!selection.is_empty());
    assert_eq!(tree.words(root)[0].highlight, Some(2..4));
    assert_eq!(tree.words(root)[1].highlight, Some(0..4));
    assert_eq!(tree.words(inline_block)[0].highlight, Some(0..1));

    selection.highlight(&mut tree, start, ContentPosition::new(root, 1, 1));
    assert_eq!(tree.words(root)[1].highlight, Some(0..1));
    assert_eq!(tree.words(inline_block)[0].highlight, None);

    selection.unhighlight(&mut tree);
    assert!(selection.is_empty());
    assert!(tree.words(root).iter().all(|word| word.highlight.is_none()));
}

#[test]
fn highlight_follows_a_word_split_by_hyphenation() {
    let hyphenator: ExplicitHyphenator = ["hy-phen-ation"].into_iter().collect();
    let mut tree = LayoutTree::new(context_with(200, 100, Arc::new(hyphenator)));
    let style = tree.intern_style(ComputedStyle {
        hyphens: true,
        ..text_style()
    });
    let root = tree.create_root(style.clone());
    tree.append_words(root, "aaaa hyphenation", &style);
    tree.layout();
    assert_eq!(tree.words(root).len(), 2);

    let mut selection = Selection::new();
    selection.highlight(
        &mut tree,
        ContentPosition::new(root, 0, 2),
        ContentPosition::new(root, 1, 8),
    );
    tree.set_viewport(Size2D::new(px(100), px(100)));
    tree.layout();

    assert_eq!(
        line_texts(&tree, root),
        vec![vec!["aaaa", "hy"], vec!["phen", "ation"]]
    );
    let highlights: Vec<_> = tree
        .words(root)
        .iter()
        .map(|word| word.highlight.clone())
        .collect();
    assert_eq!(
        highlights,
        vec![Some(2..4), Some(0..2), Some(0..4), Some(0..2)]
    );

    selection.unhighlight(&mut tree);
    assert!(tree.words(root).iter().all(|word| word.highlight.is_none()));
}
