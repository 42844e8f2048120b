/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! An incremental box layout engine.
//!
//! A document is a [`LayoutTree`] of nodes. Every node takes part in the same
//! two-phase size negotiation: its parent first asks for a [`Requisition`]
//! (and, for shrink-to-fit sizing, for its [`Extremes`]), and then hands it a
//! final [`Allocation`]. Mutations only mark the changed node and its
//! ancestors as damaged, so the next [`LayoutTree::layout`] recomputes as
//! little as it can.
//!
//! Inline content is wrapped into lines by the [`flow::LineBreaker`] owned by
//! every flow node. Floats, absolutely and fixed positioned boxes and
//! relatively positioned boxes are placed by per-containing-block managers,
//! see [`oof`].

#![deny(unsafe_code)]

mod context;
pub mod flow;
mod geom;
pub mod iterator;
mod node;
pub mod oof;
mod replaced;
mod tree;
mod tree_position;

pub use context::LayoutContext;
pub use geom::{Allocation, Extremes, Requisition};
pub use iterator::{
    find_text, Content, ContentItem, ContentIterator, ContentMask, ContentPosition,
    DeepContentIterator, Selection,
};
pub use oof::{OofHandle, OofKind};
pub use tree::{LayoutTree, NodeId, ParentRef};
pub use tree_position::TreePosition;
