/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The node arena and the surface documents are built through.

use std::fmt;
use std::mem;
use std::sync::Arc;

use app_units::Au;
use euclid::default::{Point2D, Size2D};
use layout_api::{ComputedStyle, LayoutDamage, StyleSharingCache};
use log::debug;

use crate::context::LayoutContext;
use crate::flow::{Line, LineBreaker, Word};
use crate::geom::{Allocation, Extremes, Requisition};
use crate::oof::{ContainingBlocks, OofHandle, OofKind, OofManagers};
use crate::replaced::ReplacedContent;
use crate::tree_position::TreePosition;

/// Identifies a node of one [`LayoutTree`].
///
/// Ids of a tree that has been [reset](LayoutTree::reset) are stale, using
/// one is a programming error and panics.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.index)?;
        if self.generation > 0 {
            write!(f, "@{}", self.generation)?;
        }
        Ok(())
    }
}

/// The token a parent hands to a child when the child is inserted. The child
/// passes it back when its size changes, so that the parent can resume its
/// layout at the right point.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParentRef {
    Root,
    /// The line of the parent flow the child was last placed on.
    InFlow { line: usize },
    /// The slot of the child in its containing block's manager.
    OutOfFlow(OofHandle),
}

pub(crate) enum NodeKind {
    /// `None` while the line breaker is borrowed out of the tree for wrapping
    /// or allocation.
    Flow(Option<Box<LineBreaker>>),
    Replaced(ReplacedContent),
}

pub(crate) struct Node {
    pub style: Arc<ComputedStyle>,
    /// The in-flow parent, or the containing block of an out-of-flow node.
    pub parent: Option<NodeId>,
    /// The flow that generated an out-of-flow node.
    pub generator: Option<NodeId>,
    pub parent_ref: ParentRef,
    pub kind: NodeKind,
    pub damage: LayoutDamage,
    pub requisition: Requisition,
    pub extremes: Extremes,
    pub allocation: Option<Allocation>,
    /// The available width the cached requisition was computed for.
    pub available_width: Option<Au>,
    /// The content width of a flow, once resolved. Children sized against
    /// their parent read it while the parent's line breaker is borrowed.
    pub content_width: Option<Au>,
    /// The word of the parent (or generator) flow referring to this node.
    pub word_index: Option<usize>,
    pub tree_position: TreePosition,
    pub containing_blocks: ContainingBlocks,
    pub managers: OofManagers,
    /// Set for relatively positioned nodes.
    pub relative: Option<OofHandle>,
    /// Where an absolutely or fixed positioned node would have been placed
    /// in normal flow, in canvas coordinates.
    pub static_position: Option<Point2D<Au>>,
}

impl Node {
    fn new(
        style: Arc<ComputedStyle>,
        kind: NodeKind,
        tree_position: TreePosition,
        blocks: ContainingBlocks,
    ) -> Self {
        Node {
            style,
            parent: None,
            generator: None,
            parent_ref: ParentRef::Root,
            kind,
            damage: LayoutDamage::all(),
            requisition: Requisition::default(),
            extremes: Extremes::default(),
            allocation: None,
            available_width: None,
            content_width: None,
            word_index: None,
            tree_position,
            containing_blocks: blocks,
            managers: OofManagers::default(),
            relative: None,
            static_position: None,
        }
    }
}

/// A change notification that could not be delivered because its target was
/// borrowed out of the tree at the time.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Deferred {
    ChildChanged {
        parent: NodeId,
        token: ParentRef,
        extremes_changed: bool,
    },
    WordChanged {
        flow: NodeId,
        word: usize,
    },
    Rewrap {
        flow: NodeId,
    },
}

/// The layout tree of one document.
pub struct LayoutTree {
    nodes: Vec<Node>,
    generation: u32,
    root: Option<NodeId>,
    pub(crate) context: LayoutContext,
    styles: StyleSharingCache,
    pub(crate) deferred: Vec<Deferred>,
}

impl LayoutTree {
    pub fn new(context: LayoutContext) -> Self {
        LayoutTree {
            nodes: Vec::new(),
            generation: 0,
            root: None,
            context,
            styles: StyleSharingCache::new(),
            deferred: Vec::new(),
        }
    }

    /// Drops every node, e.g. when navigating to another document. Ids handed
    /// out before become stale.
    pub fn reset(&mut self) {
        debug!(
            "LayoutTree: dropping {} nodes of generation {}",
            self.nodes.len(),
            self.generation
        );
        self.nodes.clear();
        self.root = None;
        self.deferred.clear();
        self.styles = StyleSharingCache::new();
        self.generation += 1;
    }

    pub fn context(&self) -> &LayoutContext {
        &self.context
    }

    /// Changes the viewport, which is the available width of the root.
    pub fn set_viewport(&mut self, viewport: Size2D<Au>) {
        if self.context.viewport == viewport {
            return;
        }
        self.context.viewport = viewport;
        if let Some(root) = self.root {
            self.queue_resize(root, false);
        }
    }

    /// Shares equal styles between nodes and words.
    pub fn intern_style(&mut self, style: ComputedStyle) -> Arc<ComputedStyle> {
        self.styles.intern(style)
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        assert_eq!(
            id.generation, self.generation,
            "stale {:?} used with a tree of generation {}",
            id, self.generation
        );
        &self.nodes[id.index as usize]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        assert_eq!(
            id.generation, self.generation,
            "stale {:?} used with a tree of generation {}",
            id, self.generation
        );
        &mut self.nodes[id.index as usize]
    }

    fn push_node(&mut self, node: Node) -> NodeId {
        let id = NodeId {
            index: self.nodes.len() as u32,
            generation: self.generation,
        };
        self.nodes.push(node);
        id
    }

    pub fn style(&self, id: NodeId) -> &Arc<ComputedStyle> {
        &self.node(id).style
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn generator(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).generator
    }

    pub fn parent_ref(&self, id: NodeId) -> ParentRef {
        self.node(id).parent_ref
    }

    pub fn damage(&self, id: NodeId) -> LayoutDamage {
        self.node(id).damage
    }

    pub fn tree_position(&self, id: NodeId) -> &TreePosition {
        &self.node(id).tree_position
    }

    pub fn containing_block(&self, id: NodeId, kind: OofKind) -> NodeId {
        self.node(id).containing_blocks.get(kind)
    }

    /// Where an absolutely or fixed positioned node would have been placed
    /// in normal flow, once its generator has been allocated.
    pub fn static_position(&self, id: NodeId) -> Option<Point2D<Au>> {
        self.node(id).static_position
    }

    /// The final geometry of a node, or `None` before its first allocation.
    pub fn allocation(&self, id: NodeId) -> Option<Allocation> {
        self.node(id).allocation
    }

    /// The top left corner of a node's content box in canvas coordinates.
    pub fn content_origin(&self, id: NodeId) -> Option<Point2D<Au>> {
        let node = self.node(id);
        node.allocation
            .map(|allocation| allocation.deflate(&node.style.box_insets()).origin)
    }

    /// The content width a flow was last wrapped to.
    pub fn content_width(&self, id: NodeId) -> Option<Au> {
        self.node(id).content_width
    }

    pub fn is_flow(&self, id: NodeId) -> bool {
        matches!(self.node(id).kind, NodeKind::Flow(_))
    }

    /// The line breaker of a flow node.
    ///
    /// Panics if the node is not a flow or is being laid out.
    pub fn flow(&self, id: NodeId) -> &LineBreaker {
        match self.node(id).kind {
            NodeKind::Flow(Some(ref flow)) => &**flow,
            NodeKind::Flow(None) => panic!("line breaker of {:?} is in use", id),
            NodeKind::Replaced(_) => panic!("{:?} is not a flow", id),
        }
    }

    pub(crate) fn flow_mut(&mut self, id: NodeId) -> Option<&mut LineBreaker> {
        match self.node_mut(id).kind {
            NodeKind::Flow(Some(ref mut flow)) => Some(&mut **flow),
            NodeKind::Flow(None) => None,
            NodeKind::Replaced(_) => panic!("{:?} is not a flow", id),
        }
    }

    pub fn words(&self, id: NodeId) -> &[Word] {
        self.flow(id).words()
    }

    pub fn lines(&self, id: NodeId) -> &[Line] {
        self.flow(id).lines()
    }

    /// Lends the line breaker of `id` to `f`. Notifications that reach the
    /// flow meanwhile are delivered once it is back.
    pub(crate) fn with_flow<R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut LayoutTree, &mut LineBreaker) -> R,
    ) -> R {
        let mut flow = match self.node_mut(id).kind {
            NodeKind::Flow(ref mut flow) => flow
                .take()
                .unwrap_or_else(|| panic!("line breaker of {:?} is already in use", id)),
            NodeKind::Replaced(_) => panic!("{:?} is not a flow", id),
        };
        let result = f(self, &mut *flow);
        if let NodeKind::Flow(ref mut slot) = self.node_mut(id).kind {
            *slot = Some(flow);
        }
        self.replay_deferred();
        result
    }

    /// Delivers notifications whose targets are available again.
    pub(crate) fn replay_deferred(&mut self) {
        if self.deferred.is_empty() {
            return;
        }
        for deferred in mem::take(&mut self.deferred) {
            match deferred {
                Deferred::ChildChanged {
                    parent,
                    token,
                    extremes_changed,
                } => self.schedule_child_layout(parent, token, extremes_changed),
                Deferred::WordChanged { flow, word } => self.flow_word_changed(flow, word),
                Deferred::Rewrap { flow } => self.request_rewrap(flow),
            }
        }
    }

    /// Schedules re-wrapping the line that holds word `word` of `flow`.
    pub(crate) fn flow_word_changed(&mut self, flow: NodeId, word: usize) {
        match self.flow_mut(flow) {
            Some(line_breaker) => line_breaker.word_changed(word),
            None => self.deferred.push(Deferred::WordChanged { flow, word }),
        }
    }

    /// Schedules re-wrapping all lines of `flow`, e.g. because floats of
    /// another generator moved.
    pub(crate) fn request_rewrap(&mut self, flow: NodeId) {
        match self.flow_mut(flow) {
            Some(line_breaker) => line_breaker.schedule_wrap(0),
            None => {
                self.deferred.push(Deferred::Rewrap { flow });
                return;
            },
        }
        self.queue_resize(flow, false);
    }

    /// Records the line an in-flow child was placed on.
    pub(crate) fn set_line_of_child(&mut self, child: NodeId, line: usize) {
        let node = self.node_mut(child);
        if let ParentRef::InFlow { line: ref mut current } = node.parent_ref {
            *current = line;
        }
    }

    pub(crate) fn set_static_position(&mut self, node: NodeId, position: Point2D<Au>) {
        self.node_mut(node).static_position = Some(position);
    }

    /// Updates the tree positions of the children of `flow` whose words
    /// moved, and of all their descendants.
    pub(crate) fn refresh_tree_positions(&mut self, flow: NodeId, moved: &[(usize, NodeId)]) {
        let base = self.node(flow).tree_position.clone();
        for &(index, child) in moved {
            self.node_mut(child).word_index = Some(index);
            self.set_tree_position(child, base.child(index));
        }
    }

    fn set_tree_position(&mut self, id: NodeId, position: TreePosition) {
        let children: Vec<(usize, NodeId)> = match self.node(id).kind {
            NodeKind::Flow(Some(ref flow)) => flow.child_nodes().collect(),
            _ => Vec::new(),
        };
        for (index, child) in children {
            self.set_tree_position(child, position.child(index));
        }
        self.node_mut(id).tree_position = position;
    }

    /// Creates the root flow.
    pub fn create_root(&mut self, style: Arc<ComputedStyle>) -> NodeId {
        assert!(self.root.is_none(), "the layout tree already has a root");
        let flow = LineBreaker::new(&style);
        let id = NodeId {
            index: self.nodes.len() as u32,
            generation: self.generation,
        };
        self.push_node(Node::new(
            style,
            NodeKind::Flow(Some(Box::new(flow))),
            TreePosition::root(),
            ContainingBlocks::of_root(id),
        ));
        self.root = Some(id);
        self.register_float_querier(id);
        id
    }

    /// Appends a run of text without spaces to `flow`.
    pub fn append_text(&mut self, flow: NodeId, text: &str, style: &Arc<ComputedStyle>) {
        let appended = self.with_flow(flow, |tree, line_breaker| {
            line_breaker.add_text(
                text,
                style,
                &*tree.context.font_metrics,
                &tree.context.prefs,
            )
        });
        if !appended.is_empty() {
            self.queue_resize(flow, true);
        }
    }

    /// Appends whitespace separated words, with a breakable space between
    /// any two of them and after trailing whitespace.
    pub fn append_words(&mut self, flow: NodeId, text: &str, style: &Arc<ComputedStyle>) {
        for (index, word) in text.split_whitespace().enumerate() {
            if index > 0 {
                self.append_space(flow, style);
            }
            self.append_text(flow, word, style);
        }
        if text.ends_with(char::is_whitespace) {
            self.append_space(flow, style);
        }
    }

    pub fn append_space(&mut self, flow: NodeId, style: &Arc<ComputedStyle>) {
        self.with_flow(flow, |tree, line_breaker| {
            line_breaker.add_space(style, &*tree.context.font_metrics, &tree.context.prefs)
        });
        self.queue_resize(flow, true);
    }

    /// Allows breaking the line after the last word, without a space.
    pub fn append_break_option(&mut self, flow: NodeId) {
        self.with_flow(flow, |_, line_breaker| line_breaker.add_break_option());
        self.queue_resize(flow, true);
    }

    pub fn append_line_break(&mut self, flow: NodeId, style: &Arc<ComputedStyle>) {
        self.with_flow(flow, |tree, line_breaker| {
            line_breaker.add_line_break(style, &*tree.context.font_metrics)
        });
        self.queue_resize(flow, true);
    }

    pub fn append_paragraph_break(&mut self, flow: NodeId, space: Au, style: &Arc<ComputedStyle>) {
        self.with_flow(flow, |_, line_breaker| {
            line_breaker.add_paragraph_break(space, style)
        });
        self.queue_resize(flow, true);
    }

    /// Appends a child flow. Depending on its style, the child is placed in
    /// normal flow (as a block or inline block), or handed to the manager of
    /// its containing block as a float or positioned box.
    pub fn append_child(&mut self, parent: NodeId, style: Arc<ComputedStyle>) -> NodeId {
        let flow = LineBreaker::new(&style);
        self.attach(parent, style, NodeKind::Flow(Some(Box::new(flow))))
    }

    /// Appends a replaced leaf of the given intrinsic size.
    pub fn append_replaced(
        &mut self,
        parent: NodeId,
        style: Arc<ComputedStyle>,
        intrinsic_size: Size2D<Au>,
    ) -> NodeId {
        self.attach(
            parent,
            style,
            NodeKind::Replaced(ReplacedContent::new(intrinsic_size)),
        )
    }

    /// Changes the intrinsic size of a replaced node, e.g. once an image has
    /// been loaded.
    pub fn set_intrinsic_size(&mut self, id: NodeId, intrinsic_size: Size2D<Au>) {
        match self.node_mut(id).kind {
            NodeKind::Replaced(ref mut content) => {
                if content.intrinsic_size == intrinsic_size {
                    return;
                }
                content.intrinsic_size = intrinsic_size;
            },
            NodeKind::Flow(_) => panic!("{:?} is not a replaced node", id),
        }
        self.queue_resize(id, true);
    }

    fn attach(&mut self, parent: NodeId, style: Arc<ComputedStyle>, kind: NodeKind) -> NodeId {
        assert!(self.is_flow(parent), "cannot append children to {:?}", parent);
        let is_flow = matches!(kind, NodeKind::Flow(_));
        let out_of_flow = OofKind::for_style(&style);
        let block_level = out_of_flow.is_none() && style.is_block_level();

        if block_level {
            self.with_flow(parent, |_, flow| flow.add_paragraph_break(Au(0), &style));
        }

        let word_index = self.flow(parent).words().len();
        let parent_node = self.node(parent);
        let tree_position = parent_node.tree_position.child(word_index);
        let parent_blocks = parent_node.containing_blocks;
        let id = NodeId {
            index: self.nodes.len() as u32,
            generation: self.generation,
        };
        let blocks = ContainingBlocks::resolve(id, &style, is_flow, &parent_blocks);
        self.push_node(Node::new(style.clone(), kind, tree_position, blocks));
        self.node_mut(id).word_index = Some(word_index);

        match out_of_flow {
            Some(kind) => {
                let container = parent_blocks.get(kind);
                let handle = self.add_out_of_flow(container, kind, id, parent);
                let node = self.node_mut(id);
                node.parent = Some(container);
                node.generator = Some(parent);
                node.parent_ref = ParentRef::OutOfFlow(handle);
                self.with_flow(parent, |_, flow| flow.add_out_of_flow_ref(id, handle, &style));
                debug!(
                    "LayoutTree: {:?} generated {:?} ({:?}) in {:?}",
                    parent, id, kind, container
                );
            },
            None => {
                let line = self.flow(parent).lines().len();
                let node = self.node_mut(id);
                node.parent = Some(parent);
                node.parent_ref = ParentRef::InFlow { line };
                self.with_flow(parent, |_, flow| flow.add_node(id, &style));
                if style.position == layout_api::style::Position::Relative {
                    let container = parent_blocks.get(OofKind::Relative);
                    let handle = self.add_out_of_flow(container, OofKind::Relative, id, parent);
                    self.node_mut(id).relative = Some(handle);
                }
                if block_level {
                    self.with_flow(parent, |_, flow| flow.add_paragraph_break(Au(0), &style));
                }
            },
        }

        if is_flow {
            self.register_float_querier(id);
        }
        self.queue_resize(parent, true);
        id
    }
}
