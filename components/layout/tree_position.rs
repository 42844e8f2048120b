/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::cmp::Ordering;
use std::fmt;
use std::iter;

use smallvec::SmallVec;

/// The position of a node in document order: the word indices on the path
/// from the root flow down to the word that refers to the node.
///
/// Comparing two positions lexicographically compares the nodes in document
/// order, an ancestor coming before all of its descendants. Positions are
/// refreshed whenever a word is split, since splitting shifts the index of
/// every later word in the same flow.
#[derive(Clone, Default, Eq, Hash, PartialEq)]
pub struct TreePosition(SmallVec<[u32; 8]>);

impl TreePosition {
    pub fn root() -> Self {
        TreePosition(SmallVec::new())
    }

    /// The position of the node referred to by word `index` of the flow at `self`.
    pub fn child(&self, index: usize) -> Self {
        let mut path = self.0.clone();
        path.push(index as u32);
        TreePosition(path)
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    /// Whether `self` comes before word `index` of the flow at `flow`.
    pub fn is_before(&self, flow: &TreePosition, index: usize) -> bool {
        let other = flow.0.iter().copied().chain(iter::once(index as u32));
        self.0.iter().copied().cmp(other) == Ordering::Less
    }
}

impl Ord for TreePosition {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.as_slice().cmp(other.0.as_slice())
    }
}

impl PartialOrd for TreePosition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for TreePosition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "/")?;
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", index)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ancestors_precede_descendants() {
        let root = TreePosition::root();
        let block = root.child(3);
        let float = block.child(0);
        assert!(root < block);
        assert!(block < float);
        assert!(float < root.child(4));
        assert!(float.is_before(&root, 4));
        assert!(!float.is_before(&root, 3));
        assert!(float.is_before(&block, 1));
        assert!(!float.is_before(&block, 0));
        assert_eq!(format!("{:?}", float), "/3.0");
    }
}
