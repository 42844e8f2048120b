/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

mod common;

use app_units::Au;
use layout_api::style::{Display, Float};
use layout_api::ComputedStyle;
use quickcheck::{QuickCheck, TestResult};

use common::*;

/// Every line holding more than one word fits its available width.
fn lines_fit_their_width(word_lengths: Vec<u8>, width: u8) -> TestResult {
    if word_lengths.is_empty() {
        return TestResult::discard();
    }
    let width = 20 + i32::from(width);
    let text: Vec<String> = word_lengths
        .iter()
        .map(|length| "x".repeat(1 + usize::from(*length % 12)))
        .collect();

    let mut tree = tree(width, 100);
    let style = tree.intern_style(text_style());
    let root = tree.create_root(style.clone());
    tree.append_words(root, &text.join(" "), &style);
    tree.layout();

    let lines = tree.lines(root);
    let words_on_lines: usize = lines.iter().map(|line| line.words().count()).sum();
    if words_on_lines != tree.words(root).len() {
        return TestResult::failed();
    }
    for line in lines {
        if line.available_width != px(width) {
            return TestResult::failed();
        }
        if line.first_word != line.last_word && line.content_width > line.available_width {
            return TestResult::failed();
        }
    }
    TestResult::passed()
}

#[test]
fn line_width_is_bounded() {
    QuickCheck::new()
        .tests(200)
        .quickcheck(lines_fit_their_width as fn(Vec<u8>, u8) -> TestResult);
}

/// Floats never overlap earlier floats on the same side, nor floats on the
/// other side they run into, whether or not they were generated by the same
/// flow. A nested float goes into a block child of the root, consecutive
/// nested floats share one block.
fn floats_do_not_overlap(mut floats: Vec<(bool, bool, u8, u8)>, band: u8) -> TestResult {
    if floats.is_empty() {
        return TestResult::discard();
    }
    floats.truncate(12);
    let mut tree = tree(100, 100);
    let style = tree.intern_style(text_style());
    let root = tree.create_root(style);
    let block_style = tree.intern_style(ComputedStyle {
        display: Display::Block,
        ..text_style()
    });

    let mut block = None;
    let mut nodes = Vec::with_capacity(floats.len());
    for &(nested, left, width, height) in &floats {
        let generator = if nested {
            *block.get_or_insert_with(|| tree.append_child(root, block_style.clone()))
        } else {
            block = None;
            root
        };
        let side = if left { Float::Left } else { Float::Right };
        let width = 10 + i32::from(width % 71);
        let height = 1 + i32::from(height % 30);
        let float_style = tree.intern_style(float_style(side, width, height));
        nodes.push(tree.append_child(generator, float_style));
    }
    tree.layout();

    let rects: Vec<_> = nodes
        .iter()
        .map(|&node| tree.allocation(node).map(|allocation| allocation.rect()))
        .collect();
    let Some(rects) = rects.into_iter().collect::<Option<Vec<_>>>() else {
        return TestResult::failed();
    };
    for (index, rect) in rects.iter().enumerate() {
        if rect.min_x() < Au(0) || rect.max_x() > px(100) {
            return TestResult::failed();
        }
        for other in &rects[..index] {
            if rect.intersects(other) {
                return TestResult::failed();
            }
        }
    }

    let end = tree.words(root).len();
    let y = px(i32::from(band));
    let left = tree.left_border(root, y, px(1), end);
    let right = tree.right_border(root, y, px(1), end);
    TestResult::from_bool(left >= Au(0) && right >= Au(0) && left + right <= px(100))
}

#[test]
fn floats_are_disjoint() {
    QuickCheck::new()
        .tests(200)
        .quickcheck(floats_do_not_overlap as fn(Vec<(bool, bool, u8, u8)>, u8) -> TestResult);
}
