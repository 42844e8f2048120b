/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

mod common;

use std::sync::Arc;

use app_units::Au;
use euclid::default::Size2D;
use layout::flow::WrapState;
use layout::{Extremes, LayoutContext, LayoutTree};
use layout_api::style::TextAlign;
use layout_api::{ComputedStyle, ExplicitHyphenator, MonospaceMetrics, NoHyphenation};

use common::*;

fn aligned(text_align: TextAlign) -> ComputedStyle {
    ComputedStyle {
        text_align,
        ..text_style()
    }
}

#[test]
fn words_wrap_at_the_last_fitting_space() {
    let mut tree = tree(100, 100);
    let style = tree.intern_style(text_style());
    let root = tree.create_root(style.clone());
    tree.append_words(root, "aaaa bbbb cccc", &style);
    tree.layout();

    assert_eq!(
        line_texts(&tree, root),
        vec![vec!["aaaa", "bbbb"], vec!["cccc"]]
    );
    let lines = tree.lines(root);
    assert_eq!(lines[0].content_width, px(81));
    assert_eq!(lines[1].top, px(10));
    assert_eq!(tree.allocation(root).unwrap().height(), px(20));
    assert!(!tree.damage(root).intersects(LAID_OUT));
}

#[test]
fn forced_line_break() {
    let mut tree = tree(100, 100);
    let style = tree.intern_style(text_style());
    let root = tree.create_root(style.clone());
    tree.append_text(root, "aa", &style);
    tree.append_line_break(root, &style);
    tree.append_text(root, "bb", &style);
    tree.layout();

    assert_eq!(tree.lines(root).len(), 2);
    assert_eq!(tree.flow(root).line_of_word(2), Some(1));
    assert_eq!(line_texts(&tree, root), vec![vec!["aa"], vec!["bb"]]);
}

#[test]
fn paragraph_break_adds_space_below_the_line() {
    let mut tree = tree(100, 100);
    let style = tree.intern_style(text_style());
    let root = tree.create_root(style.clone());
    tree.append_text(root, "aa", &style);
    tree.append_paragraph_break(root, px(5), &style);
    tree.append_text(root, "bb", &style);
    tree.layout();

    let lines = tree.lines(root);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1].top, px(15));
}

#[test]
fn too_wide_words_are_hyphenated() {
    let hyphenator: ExplicitHyphenator = ["hy-phen-ation"].into_iter().collect();
    let mut tree = LayoutTree::new(context_with(100, 100, Arc::new(hyphenator)));
    let style = tree.intern_style(ComputedStyle {
        hyphens: true,
        ..text_style()
    });
    let root = tree.create_root(style.clone());
    tree.append_words(root, "aaaaa hyphenation", &style);
    tree.layout();

    assert_eq!(
        line_texts(&tree, root),
        vec![vec!["aaaaa", "hy"], vec!["phen", "ation"]]
    );
    let words = tree.words(root);
    assert_eq!(words.len(), 4);
    assert_eq!(words[1].text(), Some("hy"));
    assert!(words[1].ends_with_hyphen());
}

#[test]
fn a_word_wider_than_the_line_is_hyphenated() {
    let hyphenator: ExplicitHyphenator = ["hy-phen-ation"].into_iter().collect();
    let mut tree = LayoutTree::new(context_with(50, 100, Arc::new(hyphenator)));
    let style = tree.intern_style(ComputedStyle {
        hyphens: true,
        ..text_style()
    });
    let root = tree.create_root(style.clone());
    tree.append_words(root, "hyphenation", &style);
    tree.layout();

    assert_eq!(
        line_texts(&tree, root),
        vec![vec!["hy"], vec!["phen"], vec!["ation"]]
    );
    let lines = tree.lines(root);
    assert_eq!(lines[0].content_width, px(30));
    assert_eq!(lines[1].content_width, px(50));
    assert!(lines.iter().all(|line| line.content_width <= px(50)));
}

#[test]
fn a_second_hyphen_in_a_row_costs_more() {
    let mut context = context(100, 100);
    context.prefs.penalty_hyphen = -1000;
    context.prefs.penalty_hyphen_2 = 1000;
    let mut tree = LayoutTree::new(context);
    let style = tree.intern_style(text_style());
    let root = tree.create_root(style.clone());
    tree.append_words(root, "aaaaaaaa\u{ad}bbbb c d\u{ad}eeeeeeee", &style);
    tree.layout();

    // The first line takes the cheap hyphen break. The second one could end
    // at "d-" too, but after a hyphenated line the space before it wins.
    assert_eq!(
        line_texts(&tree, root),
        vec![vec!["aaaaaaaa"], vec!["bbbb", "c"], vec!["d", "eeeeeeee"]]
    );
    let words = tree.words(root);
    assert!(words[0].ends_with_hyphen());
    assert!(!words[2].ends_with_hyphen());
}

#[test]
fn words_without_hyphens_are_not_split() {
    let hyphenator: ExplicitHyphenator = ["hy-phen-ation"].into_iter().collect();
    let mut tree = LayoutTree::new(context_with(100, 100, Arc::new(hyphenator)));
    let style = tree.intern_style(text_style());
    let root = tree.create_root(style.clone());
    tree.append_words(root, "aaaaa hyphenation", &style);
    tree.layout();

    assert_eq!(tree.words(root).len(), 2);
    assert_eq!(
        line_texts(&tree, root),
        vec![vec!["aaaaa"], vec!["hyphenation"]]
    );
}

#[test]
fn justified_lines_stretch_their_spaces() {
    let mut tree = tree(100, 100);
    let style = tree.intern_style(aligned(TextAlign::Justify));
    let root = tree.create_root(style.clone());
    tree.append_words(root, "aaaa bbbb cccc", &style);
    tree.layout();

    let words = tree.words(root);
    assert_eq!(words[0].eff_space, px(20));
    assert_eq!(words[1].x, px(60));
    // The last line keeps its natural spacing.
    assert_eq!(words[2].x, Au(0));
}

#[test]
fn right_and_center_alignment() {
    let mut tree = tree(100, 100);
    let style = tree.intern_style(aligned(TextAlign::Right));
    let root = tree.create_root(style.clone());
    tree.append_words(root, "aaaa bbbb cccc", &style);
    tree.layout();

    let words = tree.words(root);
    assert_eq!(words[0].x, px(19));
    assert_eq!(words[2].x, px(60));

    let mut tree = common::tree(100, 100);
    let style = tree.intern_style(aligned(TextAlign::Center));
    let root = tree.create_root(style.clone());
    tree.append_words(root, "aaaa bbbb cccc", &style);
    tree.layout();

    let words = tree.words(root);
    assert_eq!(words[0].x, Au::from_f32_px(9.5));
    assert_eq!(words[2].x, px(30));
}

#[test]
fn appending_only_rewraps_the_last_line() {
    let mut tree = tree(100, 100);
    let style = tree.intern_style(text_style());
    let root = tree.create_root(style.clone());
    tree.append_words(root, "aaaa bbbb cccc ", &style);
    tree.layout();
    let first_line = tree.lines(root)[0].clone();

    tree.append_words(root, "dd", &style);
    assert_eq!(
        tree.flow(root).state(),
        WrapState::WrapPending { from_line: 1 }
    );
    assert!(tree.damage(root).intersects(LAID_OUT));

    tree.layout();
    assert_eq!(tree.flow(root).state(), WrapState::Clean);
    assert_eq!(tree.lines(root)[0], first_line);
    assert_eq!(
        line_texts(&tree, root),
        vec![vec!["aaaa", "bbbb"], vec!["cccc", "dd"]]
    );
}

#[test]
fn relayout_at_the_same_width_gives_the_same_lines() {
    let mut tree = tree(100, 100);
    let style = tree.intern_style(text_style());
    let root = tree.create_root(style.clone());
    tree.append_words(root, "aaaa bbbb cccc dddd eeeeee ff", &style);
    tree.layout();
    let narrow = tree.lines(root).to_vec();

    tree.set_viewport(Size2D::new(px(200), px(100)));
    tree.layout();
    assert!(tree.lines(root).len() < narrow.len());

    tree.set_viewport(Size2D::new(px(100), px(100)));
    tree.layout();
    assert_eq!(tree.lines(root), &narrow[..]);
}

#[test]
fn extremes_of_a_flow() {
    let context = LayoutContext::new(
        Arc::new(MonospaceMetrics::new(1.0, 0.0)),
        Arc::new(NoHyphenation),
        Size2D::new(px(100), px(100)),
    );
    let mut tree = LayoutTree::new(context);
    let style = tree.intern_style(text_style());
    let root = tree.create_root(style.clone());
    tree.append_text(root, "aaaa", &style);
    tree.append_break_option(root);
    tree.append_text(root, "bbbbbb", &style);
    tree.append_break_option(root);
    tree.append_text(root, "cc", &style);

    assert_eq!(tree.measure_extremes(root), Extremes::new(px(60), px(120)));
}

#[test]
fn resetting_forgets_the_document() {
    let mut tree = tree(100, 100);
    let style = tree.intern_style(text_style());
    let root = tree.create_root(style.clone());
    tree.append_words(root, "aaaa", &style);
    tree.layout();
    assert_eq!(tree.len(), 1);

    tree.reset();
    assert!(tree.is_empty());
    assert_eq!(tree.root(), None);
}

#[test]
fn soft_hyphens_are_drawn_only_when_broken() {
    let mut tree = tree(100, 100);
    let style = tree.intern_style(text_style());
    let root = tree.create_root(style.clone());
    tree.append_text(root, "aaaaaa\u{ad}bbbbbb", &style);
    tree.layout();

    assert_eq!(
        line_texts(&tree, root),
        vec![vec!["aaaaaa"], vec!["bbbbbb"]]
    );
    let lines = tree.lines(root);
    assert_eq!(lines[0].content_width, px(70));
    assert!(tree.words(root)[0].ends_with_hyphen());

    tree.set_viewport(Size2D::new(px(200), px(100)));
    tree.layout();
    assert_eq!(line_texts(&tree, root), vec![vec!["aaaaaa", "bbbbbb"]]);
    assert_eq!(tree.lines(root)[0].content_width, px(120));
}
