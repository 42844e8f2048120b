/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

#![allow(dead_code)]

use std::sync::Arc;

use app_units::Au;
use euclid::default::Size2D;
use layout::{LayoutContext, LayoutTree};
use layout_api::style::{Float, LengthPercentageOrAuto};
use layout_api::{
    ComputedStyle, FontDescriptor, Hyphenator, LayoutDamage, MonospaceMetrics, NoHyphenation,
};

/// Damage a laid out node no longer carries.
pub const LAID_OUT: LayoutDamage = LayoutDamage::NEEDS_RESIZE.union(LayoutDamage::NEEDS_ALLOCATE);

pub fn px(value: i32) -> Au {
    Au::from_px(value)
}

pub fn length(value: i32) -> LengthPercentageOrAuto {
    LengthPercentageOrAuto::Length(px(value))
}

/// Every character is 10px wide and a space is 1px wide.
pub fn context(width: i32, height: i32) -> LayoutContext {
    context_with(width, height, Arc::new(NoHyphenation))
}

pub fn context_with(
    width: i32,
    height: i32,
    hyphenator: Arc<dyn Hyphenator + Send + Sync>,
) -> LayoutContext {
    let _ = env_logger::builder().is_test(true).try_init();
    LayoutContext::new(
        Arc::new(MonospaceMetrics::new(1.0, 0.1)),
        hyphenator,
        Size2D::new(px(width), px(height)),
    )
}

pub fn tree(width: i32, height: i32) -> LayoutTree {
    LayoutTree::new(context(width, height))
}

/// The initial style with a 10px font.
pub fn text_style() -> ComputedStyle {
    ComputedStyle {
        font: Arc::new(FontDescriptor {
            size: px(10),
            ..FontDescriptor::default()
        }),
        ..ComputedStyle::initial()
    }
}

pub fn float_style(float: Float, width: i32, height: i32) -> ComputedStyle {
    ComputedStyle {
        float,
        width: length(width),
        height: length(height),
        ..text_style()
    }
}

/// The text of every line of `flow`.
pub fn line_texts(tree: &LayoutTree, flow: layout::NodeId) -> Vec<Vec<String>> {
    let words = tree.words(flow);
    tree.lines(flow)
        .iter()
        .map(|line| {
            words[line.words()]
                .iter()
                .filter_map(|word| word.text().map(str::to_owned))
                .collect()
        })
        .collect()
}
