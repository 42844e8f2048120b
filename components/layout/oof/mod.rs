/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Out-of-flow boxes.
//!
//! Floats and absolutely, fixed and relatively positioned boxes are owned by
//! a manager of their *containing block* rather than by the flow that
//! generated them. Every node resolves its four containing blocks once, when
//! it is attached, and a containing block creates each of its managers when
//! the first box of that kind shows up.
//!
//! The floats manager also answers the border queries the line breaker makes
//! to find the width left over by floats at some vertical position.

use std::fmt;
use std::mem;

use app_units::Au;
use layout_api::style::{Clear, Display, Overflow, Position};
use layout_api::ComputedStyle;
use log::{debug, trace};
use smallvec::SmallVec;

use crate::geom::Extremes;
use crate::tree::{Deferred, LayoutTree, NodeId, ParentRef};

mod float;
mod positioned;
mod relative;

pub use float::FloatSide;
use float::FloatsManager;
use positioned::PositionedManager;
use relative::RelativeManager;

/// The kinds of out-of-flow boxes. Each has its own containing block.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum OofKind {
    Float,
    Absolute,
    Fixed,
    Relative,
}

impl OofKind {
    pub const ALL: [OofKind; 4] = [
        OofKind::Float,
        OofKind::Absolute,
        OofKind::Fixed,
        OofKind::Relative,
    ];

    /// The order managers allocate their boxes in after their containing
    /// block has been allocated. Positioned boxes come last, since their
    /// static position may be inside a float.
    pub(crate) const ALLOCATION_ORDER: [OofKind; 4] = [
        OofKind::Relative,
        OofKind::Float,
        OofKind::Absolute,
        OofKind::Fixed,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// The kind of box that is taken out of the normal flow for `style`.
    /// Relatively positioned boxes stay in flow and yield `None`.
    pub fn for_style(style: &ComputedStyle) -> Option<OofKind> {
        match style.position {
            Position::Absolute => Some(OofKind::Absolute),
            Position::Fixed => Some(OofKind::Fixed),
            Position::Static | Position::Relative if style.is_floating() => Some(OofKind::Float),
            Position::Static | Position::Relative => None,
        }
    }

    /// Whether a flow (other than the root) with `style` is the containing
    /// block for boxes of this kind.
    pub fn establishes(self, style: &ComputedStyle) -> bool {
        match self {
            OofKind::Float => {
                style.display == Display::InlineBlock ||
                    style.is_floating() ||
                    style.is_absolutely_positioned() ||
                    style.overflow != Overflow::Visible
            },
            OofKind::Absolute | OofKind::Relative => style.position != Position::Static,
            OofKind::Fixed => false,
        }
    }
}

/// Identifies an out-of-flow box within the manager of its containing
/// block.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct OofHandle {
    pub kind: OofKind,
    pub index: usize,
}

impl fmt::Display for OofHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}#{}", self.kind, self.index)
    }
}

/// The containing block of a node for each out-of-flow kind.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ContainingBlocks([NodeId; 4]);

impl ContainingBlocks {
    pub(crate) fn of_root(root: NodeId) -> Self {
        ContainingBlocks([root; 4])
    }

    /// A node is its own containing block where it qualifies, and inherits
    /// its parent's everywhere else.
    pub(crate) fn resolve(
        id: NodeId,
        style: &ComputedStyle,
        is_flow: bool,
        parent: &ContainingBlocks,
    ) -> Self {
        let mut blocks = *parent;
        if is_flow {
            for kind in OofKind::ALL {
                if kind.establishes(style) {
                    blocks.0[kind.index()] = id;
                }
            }
        }
        blocks
    }

    pub fn get(&self, kind: OofKind) -> NodeId {
        self.0[kind.index()]
    }
}

pub(crate) enum OutOfFlowManager {
    Floats(FloatsManager),
    Positioned(PositionedManager),
    Relative(RelativeManager),
}

impl OutOfFlowManager {
    fn new(kind: OofKind) -> Self {
        match kind {
            OofKind::Float => OutOfFlowManager::Floats(FloatsManager::default()),
            OofKind::Absolute | OofKind::Fixed => {
                OutOfFlowManager::Positioned(PositionedManager::new(kind))
            },
            OofKind::Relative => OutOfFlowManager::Relative(RelativeManager::default()),
        }
    }

    fn add_out_of_flow(&mut self, tree: &LayoutTree, node: NodeId, generator: NodeId) -> OofHandle {
        match self {
            OutOfFlowManager::Floats(floats) => floats.add_float(tree, node, generator),
            OutOfFlowManager::Positioned(positioned) => positioned.add_child(node, generator),
            OutOfFlowManager::Relative(relative) => relative.add_child(node),
        }
    }

    fn floats(&self) -> &FloatsManager {
        match self {
            OutOfFlowManager::Floats(floats) => floats,
            _ => panic!("not a floats manager"),
        }
    }

    fn floats_mut(&mut self) -> &mut FloatsManager {
        match self {
            OutOfFlowManager::Floats(floats) => floats,
            _ => panic!("not a floats manager"),
        }
    }

    /// How much the boxes enlarge their containing block's content box.
    /// Only floats do.
    fn size_contribution(
        &self,
        tree: &LayoutTree,
        container: NodeId,
        content_width: Au,
        content_height: Au,
    ) -> (Au, Au) {
        match self {
            OutOfFlowManager::Floats(floats) => {
                floats.size_contribution(tree, container, content_width, content_height)
            },
            OutOfFlowManager::Positioned(_) | OutOfFlowManager::Relative(_) => (Au(0), Au(0)),
        }
    }
}

#[derive(Default)]
pub(crate) enum ManagerSlot {
    #[default]
    Vacant,
    Present(Box<OutOfFlowManager>),
    /// Borrowed out of the tree while it works on its boxes.
    Lent,
}

/// The managers a containing block owns, one slot per kind.
#[derive(Default)]
pub(crate) struct OofManagers([ManagerSlot; 4]);

impl OofManagers {
    fn slot(&self, kind: OofKind) -> &ManagerSlot {
        &self.0[kind.index()]
    }

    fn slot_mut(&mut self, kind: OofKind) -> &mut ManagerSlot {
        &mut self.0[kind.index()]
    }

    fn get(&self, kind: OofKind) -> Option<&OutOfFlowManager> {
        match self.slot(kind) {
            ManagerSlot::Present(manager) => Some(manager),
            ManagerSlot::Vacant | ManagerSlot::Lent => None,
        }
    }

    fn is_lent(&self, kind: OofKind) -> bool {
        matches!(self.slot(kind), ManagerSlot::Lent)
    }
}

impl LayoutTree {
    fn ensure_manager(&mut self, container: NodeId, kind: OofKind) {
        let slot = self.node_mut(container).managers.slot_mut(kind);
        if let ManagerSlot::Vacant = slot {
            debug!("OutOfFlow: creating {:?} manager of {:?}", kind, container);
            *slot = ManagerSlot::Present(Box::new(OutOfFlowManager::new(kind)));
        }
    }

    /// Lends the `kind` manager of `container` to `f`. Returns `None` when
    /// there is no such manager, or when it is already lent.
    fn with_manager<R>(
        &mut self,
        container: NodeId,
        kind: OofKind,
        f: impl FnOnce(&mut LayoutTree, &mut OutOfFlowManager) -> R,
    ) -> Option<R> {
        let slot = self.node_mut(container).managers.slot_mut(kind);
        let mut manager = match mem::replace(slot, ManagerSlot::Lent) {
            ManagerSlot::Present(manager) => manager,
            other => {
                *slot = other;
                return None;
            },
        };
        let result = f(self, &mut *manager);
        *self.node_mut(container).managers.slot_mut(kind) = ManagerSlot::Present(manager);
        self.replay_deferred();
        Some(result)
    }

    /// Hands `node` to the `kind` manager of `container`.
    pub(crate) fn add_out_of_flow(
        &mut self,
        container: NodeId,
        kind: OofKind,
        node: NodeId,
        generator: NodeId,
    ) -> OofHandle {
        self.ensure_manager(container, kind);
        self.with_manager(container, kind, |tree, manager| {
            manager.add_out_of_flow(tree, node, generator)
        })
        .unwrap_or_else(|| panic!("{:?} manager of {:?} is in use", kind, container))
    }

    /// Makes a flow known to the floats manager it queries for borders.
    pub(crate) fn register_float_querier(&mut self, flow: NodeId) {
        let container = self.containing_block(flow, OofKind::Float);
        self.ensure_manager(container, OofKind::Float);
        let registered = self.with_manager(container, OofKind::Float, |_, manager| {
            manager.floats_mut().add_generator(flow)
        });
        if registered.is_none() {
            panic!("floats manager of {:?} is in use", container);
        }
    }

    /// Called when `flow` has been wrapped, so that the floats manager can
    /// tell whether the floats the flow saw are still current.
    pub(crate) fn note_wrapped(&mut self, flow: NodeId) {
        let container = self.containing_block(flow, OofKind::Float);
        if let ManagerSlot::Present(ref mut manager) =
            *self.node_mut(container).managers.slot_mut(OofKind::Float)
        {
            manager.floats_mut().note_wrapped(flow);
        }
    }

    /// The float `node` is generated on a line starting at `y` in its
    /// generator. Resolves its actual position.
    pub(crate) fn float_position_requested(&mut self, node: NodeId, y: Au) {
        let ParentRef::OutOfFlow(handle) = self.parent_ref(node) else {
            panic!("{:?} is not out of flow", node);
        };
        let Some(container) = self.parent(node) else {
            panic!("{:?} has no containing block", node);
        };
        let placed = self.with_manager(container, OofKind::Float, |tree, manager| {
            manager
                .floats_mut()
                .requested_position_changed(tree, handle, y)
        });
        if placed.is_none() {
            let Some(generator) = self.generator(node) else {
                panic!("{:?} has no generator", node);
            };
            debug!(
                "OutOfFlow: floats manager of {:?} busy, wrapping {:?} again later",
                container, generator
            );
            self.deferred.push(Deferred::Rewrap { flow: generator });
        }
    }

    /// The insets floats cause on the content box of `flow` for the band
    /// `[y, y + height)`, counting only floats generated before word
    /// `before_index` of `flow`. `width` is the content width of `flow`.
    pub(crate) fn float_offsets(
        &self,
        flow: NodeId,
        y: Au,
        height: Au,
        before_index: usize,
        width: Au,
    ) -> (Au, Au) {
        let container = self.containing_block(flow, OofKind::Float);
        match self.node(container).managers.get(OofKind::Float) {
            Some(manager) => manager
                .floats()
                .borders(self, flow, y, height, before_index, width),
            None => (Au(0), Au(0)),
        }
    }

    /// Where a box of `flow` that clears `clear` may start, or `None` if no
    /// float before word `before_index` is in the way.
    pub(crate) fn clear_position(
        &self,
        flow: NodeId,
        clear: Clear,
        before_index: usize,
    ) -> Option<Au> {
        let container = self.containing_block(flow, OofKind::Float);
        self.node(container)
            .managers
            .get(OofKind::Float)
            .and_then(|manager| {
                manager
                    .floats()
                    .clear_position(self, flow, clear, before_index)
            })
    }

    /// The left inset floats cause for a line of `flow` at `[y, y + height)`,
    /// considering the floats generated before word `before_index`.
    pub fn left_border(&self, flow: NodeId, y: Au, height: Au, before_index: usize) -> Au {
        self.float_borders(flow, y, height, before_index).0
    }

    /// The right counterpart of [`left_border`](Self::left_border).
    pub fn right_border(&self, flow: NodeId, y: Au, height: Au, before_index: usize) -> Au {
        self.float_borders(flow, y, height, before_index).1
    }

    fn float_borders(&self, flow: NodeId, y: Au, height: Au, before_index: usize) -> (Au, Au) {
        let width = self.content_width(flow).unwrap_or(Au(0));
        self.float_offsets(flow, y, height, before_index, width)
    }

    /// The extremes of a containing block's content combined with those of
    /// its floats: floats may sit side by side with the widest line.
    pub(crate) fn out_of_flow_extremes(
        &mut self,
        container: NodeId,
        content: Extremes,
    ) -> Extremes {
        self.with_manager(container, OofKind::Float, |tree, manager| {
            manager.floats().extremes(tree, content)
        })
        .unwrap_or(content)
    }

    pub(crate) fn out_of_flow_size_contribution(
        &mut self,
        container: NodeId,
        content_width: Au,
        content_height: Au,
    ) -> (Au, Au) {
        let node = self.node(container);
        let (mut width, mut height) = (Au(0), Au(0));
        for kind in OofKind::ALL {
            if let Some(manager) = node.managers.get(kind) {
                let (extra_width, extra_height) =
                    manager.size_contribution(self, container, content_width, content_height);
                width = width.max(extra_width);
                height = height.max(extra_height);
            }
        }
        if let ManagerSlot::Present(ref mut manager) =
            *self.node_mut(container).managers.slot_mut(OofKind::Float)
        {
            manager.floats_mut().set_contribution((width, height));
        }
        (width, height)
    }

    /// Runs every manager of `container` after it has been allocated.
    pub(crate) fn allocate_out_of_flow(&mut self, container: NodeId) {
        for kind in OofKind::ALLOCATION_ORDER {
            let requeue = self.with_manager(container, kind, |tree, manager| match manager {
                OutOfFlowManager::Floats(floats) => floats.allocate_all(tree, container),
                OutOfFlowManager::Positioned(positioned) => {
                    positioned.allocate_all(tree, container);
                    Requeue::default()
                },
                OutOfFlowManager::Relative(relative) => {
                    relative.allocate_all(tree, container);
                    Requeue::default()
                },
            });
            let Some(requeue) = requeue else {
                continue;
            };
            for flow in requeue.flows {
                debug!("OutOfFlow: floats seen by {:?} moved, wrapping it again", flow);
                self.request_rewrap(flow);
            }
            if requeue.container {
                debug!("OutOfFlow: floats of {:?} changed its size", container);
                self.queue_resize(container, false);
            }
        }
    }

    /// Delivers a size change of an out-of-flow child to the manager owning
    /// it. Returns `false` if the manager is in use.
    pub(crate) fn out_of_flow_child_changed(
        &mut self,
        container: NodeId,
        handle: OofHandle,
        extremes_changed: bool,
    ) -> bool {
        if self.node(container).managers.is_lent(handle.kind) {
            self.deferred.push(Deferred::ChildChanged {
                parent: container,
                token: ParentRef::OutOfFlow(handle),
                extremes_changed,
            });
            return false;
        }
        let generator = self
            .with_manager(container, handle.kind, |_, manager| match manager {
                OutOfFlowManager::Floats(floats) => Some(floats.child_changed(handle)),
                OutOfFlowManager::Positioned(_) | OutOfFlowManager::Relative(_) => None,
            })
            .flatten();
        if let Some((generator, node)) = generator {
            trace!("OutOfFlow: float {:?} of {:?} changed", node, generator);
            if let Some(word) = self.node(node).word_index {
                self.flow_word_changed(generator, word);
            }
            self.mark_damaged(generator, extremes_changed);
        }
        true
    }
}

/// Follow-up work a floats manager asks for after allocating its floats.
#[derive(Debug, Default)]
pub(crate) struct Requeue {
    /// Flows to be wrapped again because floats they avoid moved.
    pub flows: SmallVec<[NodeId; 4]>,
    /// Whether the containing block has to be measured again.
    pub container: bool,
}

/// Whether the half-open intervals `[a, a_end)` and `[b, b_end)` intersect.
pub(crate) fn intervals_overlap(a: Au, a_end: Au, b: Au, b_end: Au) -> bool {
    a < b_end && b < a_end
}
