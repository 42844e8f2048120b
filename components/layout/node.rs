/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The size negotiation every node takes part in.
//!
//! A parent first measures a child ([`LayoutTree::measure`], and
//! [`LayoutTree::measure_extremes`] for shrink-to-fit sizing), and then
//! allocates it. Results are cached per node; a node whose content changed
//! is marked with [`LayoutDamage`] and notifies its parent, handing back the
//! [`ParentRef`] the parent gave it, so that the parent redoes only the part
//! of its layout the child is on.

use app_units::Au;
use euclid::default::Point2D;
use layout_api::LayoutDamage;
use log::{debug, trace, warn};

use crate::geom::{Allocation, Extremes, Requisition};
use crate::oof::OofKind;
use crate::tree::{Deferred, LayoutTree, NodeId, NodeKind, ParentRef};

/// What a node's width is measured against.
#[derive(Clone, Copy, Debug, PartialEq)]
struct WidthBasis {
    /// What percentages resolve against.
    reference: Au,
    /// The width the margin box may take.
    available: Au,
}

impl LayoutTree {
    /// Lays out the whole tree against the viewport. Allocating floats may
    /// find that flows have to be wrapped again, in which case this runs
    /// another pass, up to the `layout.max_passes` preference.
    pub fn layout(&mut self) {
        let Some(root) = self.root() else {
            return;
        };
        let max_passes = self.context.prefs.layout_max_passes.max(1);
        for pass in 0..max_passes {
            if !self.needs_layout(root) {
                return;
            }
            let requisition = self.measure(root);
            debug!(
                "LayoutTree: pass {}, root requisition {:?}",
                pass, requisition
            );
            self.allocate(
                root,
                Allocation::from_requisition(Point2D::zero(), &requisition),
            );
        }
        if self.needs_layout(root) {
            warn!(
                "LayoutTree: layout did not settle after {} passes ({})",
                max_passes,
                self.damage(root)
            );
        }
    }

    fn needs_layout(&self, root: NodeId) -> bool {
        let node = self.node(root);
        node.allocation.is_none() ||
            node.damage
                .intersects(LayoutDamage::NEEDS_RESIZE | LayoutDamage::NEEDS_ALLOCATE)
    }

    /// The preferred size of a node's margin box.
    pub fn measure(&mut self, id: NodeId) -> Requisition {
        let basis = self.width_basis(id);
        let node = self.node(id);
        if !node.damage.contains(LayoutDamage::NEEDS_RESIZE) &&
            node.available_width == Some(basis.available)
        {
            return node.requisition;
        }

        self.node_mut(id).damage.remove(LayoutDamage::NEEDS_RESIZE);
        let node = self.node(id);
        let replaced = match node.kind {
            NodeKind::Replaced(ref content) => {
                Some(content.requisition(&node.style, basis.available))
            },
            NodeKind::Flow(_) => None,
        };
        let requisition = match replaced {
            Some(requisition) => requisition,
            None => self.measure_flow(id, basis),
        };
        trace!("Node: {:?} measured {:?} in {:?}", id, requisition, basis.available);

        let node = self.node_mut(id);
        node.requisition = requisition;
        node.available_width = Some(basis.available);
        requisition
    }

    /// The narrowest and widest a node's margin box may be.
    pub fn measure_extremes(&mut self, id: NodeId) -> Extremes {
        let node = self.node(id);
        if !node.damage.contains(LayoutDamage::EXTREMES_CHANGED) {
            return node.extremes;
        }

        self.node_mut(id).damage.remove(LayoutDamage::EXTREMES_CHANGED);
        let style = self.style(id).clone();
        let replaced = match self.node(id).kind {
            NodeKind::Replaced(ref content) => Some(content.extremes(&style)),
            NodeKind::Flow(_) => None,
        };
        let extremes = match replaced {
            Some(extremes) => extremes,
            None => {
                let content = self.with_flow(id, |tree, flow| flow.content_extremes(tree));
                let content = self.out_of_flow_extremes(id, content);
                let content = match style.width.resolve(None) {
                    Some(width) => Extremes::new(width, width),
                    None => content,
                };
                content.inflate(style.box_insets().horizontal())
            },
        };
        trace!("Node: {:?} extremes {:?}", id, extremes);
        self.node_mut(id).extremes = extremes;
        extremes
    }

    /// Gives a node its final geometry, in canvas coordinates, and lays out
    /// its content accordingly.
    pub fn allocate(&mut self, id: NodeId, allocation: Allocation) {
        let node = self.node_mut(id);
        if node.allocation == Some(allocation) &&
            !node.damage.contains(LayoutDamage::NEEDS_ALLOCATE)
        {
            return;
        }
        node.allocation = Some(allocation);
        node.damage.remove(LayoutDamage::NEEDS_ALLOCATE);
        trace!("Node: allocating {:?} at {}", id, allocation);

        if !self.is_flow(id) {
            return;
        }
        let content = allocation.deflate(&self.node(id).style.box_insets());
        let content_width = match self.node(id).content_width {
            Some(width) => width,
            None => {
                self.node_mut(id).content_width = Some(content.size.width);
                content.size.width
            },
        };
        self.with_flow(id, |tree, flow| {
            flow.rewrap(tree, id, content_width);
            flow.allocate_lines(tree, id, content.origin);
        });
        self.allocate_out_of_flow(id);
    }

    /// Marks a node as needing to be measured again, and notifies its
    /// parent. `extremes_changed` tells whether the extremes may be stale
    /// as well.
    pub fn queue_resize(&mut self, id: NodeId, extremes_changed: bool) {
        self.node_mut(id).damage |= LayoutDamage::for_resize(extremes_changed);
        self.notify_parent(id, extremes_changed);
    }

    fn notify_parent(&mut self, id: NodeId, extremes_changed: bool) {
        let node = self.node(id);
        if let Some(parent) = node.parent {
            let token = node.parent_ref;
            self.child_changed(parent, token, extremes_changed);
        }
    }

    /// A child of `parent`, identified by the token `parent` gave it, changed
    /// its size.
    pub(crate) fn child_changed(
        &mut self,
        parent: NodeId,
        token: ParentRef,
        extremes_changed: bool,
    ) {
        self.schedule_child_layout(parent, token, extremes_changed);
        self.mark_damaged(parent, extremes_changed);
    }

    /// Lets `parent` know which part of its layout has to be redone.
    pub(crate) fn schedule_child_layout(
        &mut self,
        parent: NodeId,
        token: ParentRef,
        extremes_changed: bool,
    ) {
        match token {
            ParentRef::Root => {},
            ParentRef::InFlow { line } => match self.flow_mut(parent) {
                Some(flow) => flow.child_changed(line),
                None => self.deferred.push(Deferred::ChildChanged {
                    parent,
                    token,
                    extremes_changed,
                }),
            },
            ParentRef::OutOfFlow(handle) => {
                self.out_of_flow_child_changed(parent, handle, extremes_changed);
            },
        }
    }

    /// Adds resize damage to `id` and its ancestors, stopping at the first
    /// one that already has it.
    pub(crate) fn mark_damaged(&mut self, id: NodeId, extremes_changed: bool) {
        let damage = LayoutDamage::for_resize(extremes_changed);
        let node = self.node_mut(id);
        if node.damage.contains(damage) {
            return;
        }
        node.damage |= damage;
        self.notify_parent(id, extremes_changed);
    }

    /// Whether a node takes the width of its content rather than the width
    /// available to it.
    pub(crate) fn shrinks_to_fit(&self, id: NodeId) -> bool {
        let node = self.node(id);
        if node.parent.is_none() {
            return false;
        }
        let style = &node.style;
        if style.is_absolutely_positioned() {
            let offsets = &style.box_offsets;
            return offsets.left.is_auto() || offsets.right.is_auto();
        }
        style.is_out_of_flow() || !style.is_block_level()
    }

    fn width_basis(&mut self, id: NodeId) -> WidthBasis {
        let viewport = self.context.viewport.width;
        let node = self.node(id);
        let (parent, parent_ref) = (node.parent, node.parent_ref);
        let Some(parent) = parent else {
            return WidthBasis {
                reference: viewport,
                available: viewport,
            };
        };

        let (kind, reference) = match parent_ref {
            ParentRef::Root => unreachable!("{:?} has a parent", id),
            ParentRef::InFlow { .. } => (None, self.resolve_content_width(parent)),
            ParentRef::OutOfFlow(handle) => match handle.kind {
                OofKind::Float => {
                    let generator = self
                        .generator(id)
                        .unwrap_or_else(|| panic!("float {:?} has no generator", id));
                    (None, self.resolve_content_width(generator))
                },
                OofKind::Fixed => (Some(OofKind::Fixed), viewport),
                OofKind::Absolute | OofKind::Relative => {
                    let style = self.style(parent).clone();
                    let padding = style.padding.horizontal();
                    (
                        Some(OofKind::Absolute),
                        self.resolve_content_width(parent) + padding,
                    )
                },
            },
        };

        let available = match kind {
            Some(_) => {
                let offsets = &self.style(id).box_offsets;
                let left = offsets.left.resolve(Some(reference)).unwrap_or(Au(0));
                let right = offsets.right.resolve(Some(reference)).unwrap_or(Au(0));
                (reference - left - right).max(Au(0))
            },
            None => reference,
        };
        WidthBasis {
            reference,
            available,
        }
    }

    /// The content width of a flow, resolving it if the flow has not been
    /// measured yet.
    fn resolve_content_width(&mut self, flow: NodeId) -> Au {
        if let Some(width) = self.node(flow).content_width {
            return width;
        }
        let basis = self.width_basis(flow);
        let width = self.content_width_for(flow, basis);
        self.node_mut(flow).content_width = Some(width);
        width
    }

    fn content_width_for(&mut self, id: NodeId, basis: WidthBasis) -> Au {
        let style = self.style(id).clone();
        if let Some(width) = style.width.resolve(Some(basis.reference)) {
            return width;
        }
        let insets = style.box_insets().horizontal();
        let margin_box = if self.shrinks_to_fit(id) {
            self.measure_extremes(id).shrink_to_fit(basis.available)
        } else {
            basis.available
        };
        (margin_box - insets).max(Au(0))
    }

    fn measure_flow(&mut self, id: NodeId, basis: WidthBasis) -> Requisition {
        let style = self.style(id).clone();
        let content_width = self.content_width_for(id, basis);
        self.node_mut(id).content_width = Some(content_width);
        self.with_flow(id, |tree, flow| flow.rewrap(tree, id, content_width));

        let flow = self.flow(id);
        let (content_height, first_baseline) = (flow.content_height(), flow.first_baseline());
        let (extra_width, extra_height) =
            self.out_of_flow_size_contribution(id, content_width, content_height);

        let height = style
            .height
            .resolve(None)
            .unwrap_or(content_height + extra_height);
        let insets = style.box_insets();
        let total = insets.top + height + insets.bottom;
        let ascent = insets.top + first_baseline.map_or(height, |baseline| baseline.min(height));
        Requisition::new(
            content_width + extra_width + insets.horizontal(),
            ascent,
            total - ascent,
        )
    }
}
