/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Floats.
//!
//! A float is placed by the flow that generated it, while that flow wraps the
//! line holding the float's reference word. Positions are kept in the
//! generator's content coordinates. Floats of different generators are only
//! compared once the offsets of both generators within the containing block
//! are known, which is after the containing block has been allocated; the
//! flows affected are then wrapped again on the next layout pass.

use app_units::Au;
use euclid::default::{Point2D, Rect, Size2D, Vector2D};
use layout_api::style::{Clear, Float};
use log::debug;
use smallvec::SmallVec;

use super::{intervals_overlap, OofHandle, OofKind, Requeue};
use crate::geom::{Allocation, Extremes};
use crate::tree::{LayoutTree, NodeId};
use crate::tree_position::TreePosition;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FloatSide {
    Left,
    Right,
}

impl FloatSide {
    fn is_cleared_by(self, clear: Clear) -> bool {
        matches!(
            (self, clear),
            (_, Clear::Both) | (FloatSide::Left, Clear::Left) | (FloatSide::Right, Clear::Right)
        )
    }
}

#[derive(Clone, Debug)]
struct FloatInfo {
    node: NodeId,
    generator: NodeId,
    side: FloatSide,
    clear: Clear,
    requested_y: Option<Au>,
    /// The top left corner of the margin box, in generator coordinates.
    position: Option<Point2D<Au>>,
    size: Size2D<Au>,
    /// The generator width the position was resolved for.
    generator_width: Au,
    /// The epoch right after the position was resolved.
    placed_epoch: u64,
    /// Set when the float changed its size since it was placed.
    dirty: bool,
}

/// A flow whose lines avoid the floats of this manager.
#[derive(Clone, Debug)]
struct Querier {
    flow: NodeId,
    /// Offset of its content box from the containing block's content box.
    offset: Option<Vector2D<Au>>,
    /// The epoch of the manager when the flow was last wrapped.
    wrapped_epoch: Option<u64>,
}

#[derive(Debug, Default)]
pub(crate) struct FloatsManager {
    floats: Vec<FloatInfo>,
    queriers: Vec<Querier>,
    /// Incremented whenever a float is added or moves.
    epoch: u64,
    /// The size contribution last reported to the containing block.
    contribution: (Au, Au),
}

impl FloatsManager {
    pub fn add_generator(&mut self, flow: NodeId) {
        if self.queriers.iter().all(|querier| querier.flow != flow) {
            self.queriers.push(Querier {
                flow,
                offset: None,
                wrapped_epoch: None,
            });
        }
    }

    pub fn add_float(&mut self, tree: &LayoutTree, node: NodeId, generator: NodeId) -> OofHandle {
        let style = tree.style(node);
        let side = match style.float {
            Float::Left => FloatSide::Left,
            Float::Right => FloatSide::Right,
            Float::None => panic!("{:?} does not float", node),
        };
        self.floats.push(FloatInfo {
            node,
            generator,
            side,
            clear: style.clear,
            requested_y: None,
            position: None,
            size: Size2D::zero(),
            generator_width: Au(0),
            placed_epoch: 0,
            dirty: true,
        });
        self.add_generator(generator);
        self.epoch += 1;
        OofHandle {
            kind: OofKind::Float,
            index: self.floats.len() - 1,
        }
    }

    pub fn note_wrapped(&mut self, flow: NodeId) {
        let epoch = self.epoch;
        if let Some(querier) = self.queriers.iter_mut().find(|querier| querier.flow == flow) {
            querier.wrapped_epoch = Some(epoch);
        }
    }

    pub fn set_contribution(&mut self, contribution: (Au, Au)) {
        self.contribution = contribution;
    }

    /// A float changed its size. Returns its generator, which has to wrap
    /// the float's line again.
    pub fn child_changed(&mut self, handle: OofHandle) -> (NodeId, NodeId) {
        let float = &mut self.floats[handle.index];
        float.dirty = true;
        (float.generator, float.node)
    }

    /// The offset that converts `from` content coordinates into `to` content
    /// coordinates.
    fn offset_between(&self, from: NodeId, to: NodeId) -> Option<Vector2D<Au>> {
        if from == to {
            return Some(Vector2D::zero());
        }
        let offset_of = |flow: NodeId| {
            self.queriers
                .iter()
                .find(|querier| querier.flow == flow)
                .and_then(|querier| querier.offset)
        };
        Some(offset_of(from)? - offset_of(to)?)
    }

    /// The margin box of a placed float in `flow` content coordinates.
    fn rect_in(&self, float: &FloatInfo, flow: NodeId) -> Option<Rect<Au>> {
        let position = float.position?;
        let offset = self.offset_between(float.generator, flow)?;
        Some(Rect::new(position + offset, float.size))
    }

    /// The generator wants float `handle` on a line starting at `y`.
    pub fn requested_position_changed(&mut self, tree: &mut LayoutTree, handle: OofHandle, y: Au) {
        let index = handle.index;
        let (node, generator) = (self.floats[index].node, self.floats[index].generator);
        let generator_width = tree.content_width(generator).unwrap_or(Au(0));
        {
            let float = &self.floats[index];
            if !float.dirty &&
                float.requested_y == Some(y) &&
                float.generator_width == generator_width &&
                float.placed_epoch == self.epoch
            {
                return;
            }
        }

        let requisition = tree.measure(node);
        let size = Size2D::new(requisition.width, requisition.height());
        {
            let float = &mut self.floats[index];
            float.requested_y = Some(y);
            float.generator_width = generator_width;
            float.dirty = false;
        }
        let position = self.resolve_position(tree, index, y, size, generator_width);

        let float = &mut self.floats[index];
        if float.position != Some(position) || float.size != size {
            debug!(
                "FloatsManager: {:?} float {:?} of {:?} requested at {:?}, placed at {:?} ({:?})",
                float.side, node, generator, y, position, size
            );
            float.position = Some(position);
            float.size = size;
            self.epoch += 1;
        }
        self.floats[index].placed_epoch = self.epoch;
    }

    /// Moves a float down until it neither overlaps an earlier float on the
    /// same side nor an earlier float on the opposite side it would run into.
    fn resolve_position(
        &self,
        tree: &LayoutTree,
        index: usize,
        y: Au,
        size: Size2D<Au>,
        generator_width: Au,
    ) -> Point2D<Au> {
        let float = &self.floats[index];
        let own_position = tree.tree_position(float.node);
        let x = match float.side {
            FloatSide::Left => Au(0),
            FloatSide::Right => (generator_width - size.width).max(Au(0)),
        };

        let mut preceding: SmallVec<[(&TreePosition, FloatSide, Rect<Au>); 8]> = self
            .floats
            .iter()
            .enumerate()
            .filter(|&(other, _)| other != index)
            .filter_map(|(_, other)| {
                let position = tree.tree_position(other.node);
                if position >= own_position {
                    return None;
                }
                let rect = self.rect_in(other, float.generator)?;
                Some((position, other.side, rect))
            })
            .collect();
        preceding.sort_by(|a, b| a.0.cmp(b.0));

        // No float starts above an earlier one.
        let mut y = preceding
            .iter()
            .map(|&(_, _, rect)| rect.min_y())
            .fold(y, Au::max);
        if float.clear != Clear::None {
            for &(_, side, rect) in &preceding {
                if side.is_cleared_by(float.clear) {
                    y = y.max(rect.max_y());
                }
            }
        }

        loop {
            let mut moved = false;
            for &(_, side, rect) in &preceding {
                if side == float.side &&
                    intervals_overlap(y, y + size.height, rect.min_y(), rect.max_y())
                {
                    y = rect.max_y();
                    moved = true;
                }
            }
            for &(_, side, rect) in preceding.iter().rev() {
                if side == float.side {
                    continue;
                }
                if !intervals_overlap(y, y + size.height, rect.min_y(), rect.max_y()) {
                    break;
                }
                if intervals_overlap(x, x + size.width, rect.min_x(), rect.max_x()) {
                    y = rect.max_y();
                    moved = true;
                    break;
                }
            }
            if !moved {
                break;
            }
        }
        Point2D::new(x, y)
    }

    /// The left and right insets for a line of `querier` at
    /// `[y, y + height)`, from floats generated before word `before_index`.
    /// A line of no height still has to avoid the floats it starts in.
    pub fn borders(
        &self,
        tree: &LayoutTree,
        querier: NodeId,
        y: Au,
        height: Au,
        before_index: usize,
        width: Au,
    ) -> (Au, Au) {
        let flow_position = tree.tree_position(querier);
        let y_end = y + height.max(Au(1));
        let mut left = Au(0);
        let mut right = Au(0);
        for float in &self.floats {
            if !tree
                .tree_position(float.node)
                .is_before(flow_position, before_index)
            {
                continue;
            }
            let Some(rect) = self.rect_in(float, querier) else {
                continue;
            };
            if !intervals_overlap(y, y_end, rect.min_y(), rect.max_y()) {
                continue;
            }
            match float.side {
                FloatSide::Left => left = left.max(rect.max_x()),
                FloatSide::Right => right = right.max(width - rect.min_x()),
            }
        }
        let left = left.max(Au(0)).min(width);
        let right = right.max(Au(0)).min(width - left);
        (left, right)
    }

    /// The bottom of the lowest float `clear` applies to among those
    /// generated before word `before_index` of `querier`.
    pub fn clear_position(
        &self,
        tree: &LayoutTree,
        querier: NodeId,
        clear: Clear,
        before_index: usize,
    ) -> Option<Au> {
        let flow_position = tree.tree_position(querier);
        self.floats
            .iter()
            .filter(|float| float.side.is_cleared_by(clear))
            .filter(|float| {
                tree.tree_position(float.node)
                    .is_before(flow_position, before_index)
            })
            .filter_map(|float| self.rect_in(float, querier))
            .map(|rect| rect.max_y())
            .max()
    }

    /// Floats enlarge an auto height containing block so that they fit, and
    /// a shrink-to-fit one so that they fit side by side with the content.
    pub fn size_contribution(
        &self,
        tree: &LayoutTree,
        container: NodeId,
        content_width: Au,
        content_height: Au,
    ) -> (Au, Au) {
        let mut bottom = Au(0);
        let mut right = Au(0);
        for float in &self.floats {
            if let Some(rect) = self.rect_in(float, container) {
                bottom = bottom.max(rect.max_y());
                right = right.max(rect.max_x());
            }
        }
        let extra_width = if tree.shrinks_to_fit(container) {
            (right - content_width).max(Au(0))
        } else {
            Au(0)
        };
        (extra_width, (bottom - content_height).max(Au(0)))
    }

    /// Any float may end up next to the widest line, and all of them next to
    /// each other.
    pub fn extremes(&self, tree: &mut LayoutTree, content: Extremes) -> Extremes {
        let mut min_width = content.min_width;
        let mut float_max = Au(0);
        for float in &self.floats {
            let extremes = tree.measure_extremes(float.node);
            min_width = min_width.max(extremes.min_width);
            float_max += extremes.max_width;
        }
        Extremes::new(min_width, content.max_width + float_max)
    }

    /// Allocates every placed float, then finds out which flows have to be
    /// wrapped again because floats of other generators moved relative to
    /// them.
    pub fn allocate_all(&mut self, tree: &mut LayoutTree, container: NodeId) -> Requeue {
        let mut requeue = Requeue::default();
        let Some(origin) = tree.content_origin(container) else {
            return requeue;
        };

        let mut offsets_changed = false;
        for querier in &mut self.queriers {
            let offset = tree.content_origin(querier.flow).map(|point| point - origin);
            if offset != querier.offset {
                offsets_changed = true;
                querier.offset = offset;
            }
        }
        if offsets_changed {
            // Floats of other generators may have come into view, so every
            // float has to be resolved again.
            self.epoch += 1;
        }

        for float in &self.floats {
            let Some(position) = float.position else {
                continue;
            };
            let Some(generator_origin) = tree.content_origin(float.generator) else {
                continue;
            };
            let requisition = tree.measure(float.node);
            tree.allocate(
                float.node,
                Allocation::from_requisition(generator_origin + position.to_vector(), &requisition),
            );
        }

        for querier in &self.queriers {
            let sees_others = self
                .floats
                .iter()
                .any(|float| float.generator != querier.flow);
            if sees_others && (offsets_changed || querier.wrapped_epoch != Some(self.epoch)) {
                requeue.flows.push(querier.flow);
            }
        }

        let content_width = tree.content_width(container).unwrap_or(Au(0));
        let content_height = tree.flow(container).content_height();
        let contribution = self.size_contribution(tree, container, content_width, content_height);
        if contribution != self.contribution {
            self.contribution = contribution;
            requeue.container = true;
        }
        requeue
    }
}
