/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use app_units::Au;
use euclid::default::{Point2D, Rect};
use log::debug;

use super::{OofHandle, OofKind};
use crate::geom::Allocation;
use crate::tree::{LayoutTree, NodeId};

#[derive(Clone, Copy, Debug)]
struct PositionedChild {
    node: NodeId,
    generator: NodeId,
}

/// Places absolutely positioned boxes against the padding box of their
/// containing block, and fixed positioned boxes against the viewport.
#[derive(Debug)]
pub(crate) struct PositionedManager {
    kind: OofKind,
    children: Vec<PositionedChild>,
}

impl PositionedManager {
    pub fn new(kind: OofKind) -> Self {
        debug_assert!(matches!(kind, OofKind::Absolute | OofKind::Fixed));
        PositionedManager {
            kind,
            children: Vec::new(),
        }
    }

    pub fn add_child(&mut self, node: NodeId, generator: NodeId) -> OofHandle {
        self.children.push(PositionedChild { node, generator });
        OofHandle {
            kind: self.kind,
            index: self.children.len() - 1,
        }
    }

    pub fn allocate_all(&mut self, tree: &mut LayoutTree, container: NodeId) {
        let Some(reference) = tree.positioning_rect(container, self.kind) else {
            return;
        };
        for child in &self.children {
            let requisition = tree.measure(child.node);
            let style = tree.style(child.node).clone();
            let offsets = &style.box_offsets;
            let left = offsets.left.resolve(Some(reference.size.width));
            let right = offsets.right.resolve(Some(reference.size.width));
            let top = offsets.top.resolve(Some(reference.size.height));
            let bottom = offsets.bottom.resolve(Some(reference.size.height));
            let static_position = tree
                .static_position(child.node)
                .unwrap_or(reference.origin);

            let width = requisition.width;
            let mut height = requisition.height();
            if let (Some(top), Some(bottom), true) = (top, bottom, style.height.is_auto()) {
                height = (reference.size.height - top - bottom).max(height);
            }

            let x = match (left, right) {
                (Some(left), _) => reference.origin.x + left,
                (None, Some(right)) => reference.max_x() - right - width,
                (None, None) => static_position.x,
            };
            let y = match (top, bottom) {
                (Some(top), _) => reference.origin.y + top,
                (None, Some(bottom)) => reference.max_y() - bottom - height,
                (None, None) => static_position.y,
            };

            let allocation = Allocation::new(Point2D::new(x, y), width, height, Au(0));
            debug!(
                "PositionedManager: {:?} {:?} of {:?} at {}",
                self.kind, child.node, child.generator, allocation
            );
            tree.allocate(child.node, allocation);
        }
    }
}

impl LayoutTree {
    /// The rectangle positioned boxes of `kind` are placed against, in canvas
    /// coordinates.
    pub(crate) fn positioning_rect(&self, container: NodeId, kind: OofKind) -> Option<Rect<Au>> {
        match kind {
            OofKind::Fixed => Some(Rect::new(Point2D::zero(), self.context.viewport)),
            _ => {
                let node = self.node(container);
                let allocation = node.allocation?;
                let style = &node.style;
                let margin_and_border = layout_api::style::Sides {
                    top: style.margin.top + style.border_width.top,
                    right: style.margin.right + style.border_width.right,
                    bottom: style.margin.bottom + style.border_width.bottom,
                    left: style.margin.left + style.border_width.left,
                };
                Some(allocation.deflate(&margin_and_border))
            },
        }
    }
}
