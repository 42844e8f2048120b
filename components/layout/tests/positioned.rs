/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

mod common;

use app_units::Au;
use euclid::default::{Point2D, Size2D};
use layout::OofKind;
use layout_api::style::{
    Display, LengthPercentageOrAuto, Percentage, Position, Sides,
};
use layout_api::ComputedStyle;

use common::*;

fn positioned(position: Position, box_offsets: Sides<LengthPercentageOrAuto>) -> ComputedStyle {
    ComputedStyle {
        position,
        box_offsets,
        width: length(20),
        height: length(10),
        ..text_style()
    }
}

fn offsets(top: i32, right: i32, bottom: i32, left: i32) -> Sides<LengthPercentageOrAuto> {
    let side = |value: i32| {
        if value < 0 {
            LengthPercentageOrAuto::Auto
        } else {
            length(value)
        }
    };
    Sides {
        top: side(top),
        right: side(right),
        bottom: side(bottom),
        left: side(left),
    }
}

#[test]
fn absolute_box_is_placed_against_the_padding_box_of_its_containing_block() {
    let mut tree = tree(200, 100);
    let style = tree.intern_style(text_style());
    let root = tree.create_root(style);
    let container_style = tree.intern_style(ComputedStyle {
        display: Display::Block,
        position: Position::Relative,
        margin: Sides::all(px(10)),
        ..text_style()
    });
    let container = tree.append_child(root, container_style);
    let absolute_style = tree.intern_style(positioned(Position::Absolute, offsets(7, -1, -1, 5)));
    let absolute = tree.append_child(container, absolute_style);
    tree.layout();

    assert_eq!(tree.containing_block(container, OofKind::Absolute), container);
    assert_eq!(tree.parent(absolute), Some(container));
    assert_eq!(tree.content_width(container), Some(px(180)));

    let allocation = tree.allocation(absolute).unwrap();
    assert_eq!(allocation.origin(), Point2D::new(px(15), px(17)));
    assert_eq!(allocation.width, px(20));
    assert_eq!(allocation.height(), px(10));
    // Positioned boxes take no space in the flow.
    assert_eq!(tree.allocation(container).unwrap().height(), px(20));
}

#[test]
fn absolute_box_without_offsets_stays_at_its_static_position() {
    let mut tree = tree(200, 100);
    let style = tree.intern_style(text_style());
    let root = tree.create_root(style.clone());
    tree.append_words(root, "aaaa ", &style);
    let absolute_style = tree.intern_style(positioned(Position::Absolute, offsets(-1, -1, -1, -1)));
    let absolute = tree.append_child(root, absolute_style);
    tree.layout();

    assert_eq!(tree.static_position(absolute), Some(Point2D::new(px(41), Au(0))));
    assert_eq!(
        tree.allocation(absolute).unwrap().origin(),
        Point2D::new(px(41), Au(0))
    );
}

#[test]
fn percentage_offsets_resolve_against_the_containing_block() {
    let mut tree = tree(200, 100);
    let style = tree.intern_style(text_style());
    let root = tree.create_root(style);
    let mut box_offsets = offsets(0, -1, -1, -1);
    box_offsets.left = LengthPercentageOrAuto::Percentage(Percentage(0.5));
    let absolute_style = tree.intern_style(positioned(Position::Absolute, box_offsets));
    let absolute = tree.append_child(root, absolute_style);
    tree.layout();

    assert_eq!(
        tree.allocation(absolute).unwrap().origin(),
        Point2D::new(px(100), Au(0))
    );
}

#[test]
fn fixed_box_is_placed_against_the_viewport() {
    let mut tree = tree(200, 100);
    let style = tree.intern_style(text_style());
    let root = tree.create_root(style.clone());
    tree.append_words(root, "aaaa", &style);
    let fixed_style = tree.intern_style(positioned(Position::Fixed, offsets(-1, 0, 0, -1)));
    let fixed = tree.append_child(root, fixed_style);
    tree.layout();

    assert_eq!(
        tree.allocation(fixed).unwrap().origin(),
        Point2D::new(px(180), px(90))
    );

    tree.set_viewport(Size2D::new(px(300), px(200)));
    tree.layout();
    assert_eq!(
        tree.allocation(fixed).unwrap().origin(),
        Point2D::new(px(280), px(190))
    );
}

#[test]
fn top_and_bottom_stretch_an_auto_height() {
    let mut tree = tree(200, 100);
    let style = tree.intern_style(text_style());
    let root = tree.create_root(style);
    let fixed_style = tree.intern_style(ComputedStyle {
        height: LengthPercentageOrAuto::Auto,
        ..positioned(Position::Fixed, offsets(0, -1, 0, 0))
    });
    let fixed = tree.append_child(root, fixed_style);
    tree.layout();

    let allocation = tree.allocation(fixed).unwrap();
    assert_eq!(allocation.origin(), Point2D::zero());
    assert_eq!(allocation.height(), px(100));
}

#[test]
fn relative_box_is_shifted_but_keeps_its_space() {
    let mut tree = tree(200, 100);
    let style = tree.intern_style(text_style());
    let root = tree.create_root(style.clone());
    let relative_style = tree.intern_style(ComputedStyle {
        display: Display::Block,
        ..positioned(Position::Relative, offsets(5, -1, -1, 10))
    });
    let relative = tree.append_child(root, relative_style);
    let sibling_style = tree.intern_style(ComputedStyle {
        display: Display::Block,
        height: length(10),
        ..text_style()
    });
    let sibling = tree.append_child(root, sibling_style);
    tree.layout();

    assert_eq!(
        tree.allocation(relative).unwrap().origin(),
        Point2D::new(px(10), px(5))
    );
    assert_eq!(
        tree.allocation(sibling).unwrap().origin(),
        Point2D::new(Au(0), px(10))
    );

    // Laying out the parent again does not shift the box twice.
    tree.append_words(root, "aaaa", &style);
    tree.layout();
    assert_eq!(
        tree.allocation(relative).unwrap().origin(),
        Point2D::new(px(10), px(5))
    );
    assert_eq!(tree.allocation(root).unwrap().height(), px(30));
}
