/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use app_units::Au;
use euclid::default::Vector2D;
use log::debug;

use super::{OofHandle, OofKind};
use crate::geom::Allocation;
use crate::tree::{LayoutTree, NodeId};

#[derive(Clone, Copy, Debug)]
struct RelativeChild {
    node: NodeId,
    /// The allocation this manager gave the node, and the shift it applied.
    shifted: Option<(Allocation, Vector2D<Au>)>,
}

/// Shifts relatively positioned boxes away from where the normal flow put
/// them. The boxes keep their in-flow space.
#[derive(Debug, Default)]
pub(crate) struct RelativeManager {
    children: Vec<RelativeChild>,
}

impl RelativeManager {
    pub fn add_child(&mut self, node: NodeId) -> OofHandle {
        self.children.push(RelativeChild {
            node,
            shifted: None,
        });
        OofHandle {
            kind: OofKind::Relative,
            index: self.children.len() - 1,
        }
    }

    pub fn allocate_all(&mut self, tree: &mut LayoutTree, container: NodeId) {
        let basis = tree.content_width(container);
        for child in &mut self.children {
            let Some(current) = tree.allocation(child.node) else {
                continue;
            };
            // The parent did not allocate the node again since it was
            // shifted, so undo the shift to get the in-flow allocation.
            let in_flow = match child.shifted {
                Some((shifted, shift)) if shifted == current => {
                    current.translate(-shift.x, -shift.y)
                },
                _ => current,
            };

            let offsets = &tree.style(child.node).box_offsets;
            let dx = match (offsets.left.resolve(basis), offsets.right.resolve(basis)) {
                (Some(left), _) => left,
                (None, Some(right)) => -right,
                (None, None) => Au(0),
            };
            let dy = match (offsets.top.resolve(None), offsets.bottom.resolve(None)) {
                (Some(top), _) => top,
                (None, Some(bottom)) => -bottom,
                (None, None) => Au(0),
            };
            let shift = Vector2D::new(dx, dy);
            let shifted = in_flow.translate(dx, dy);
            child.shifted = Some((shifted, shift));
            if shifted != current {
                debug!(
                    "RelativeManager: shifting {:?} by {:?} to {}",
                    child.node, shift, shifted
                );
                tree.allocate(child.node, shifted);
            }
        }
    }
}
