/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use bitflags::bitflags;

bitflags! {
    /// The layout work that is outstanding for a node after a mutation.
    #[derive(Clone, Copy, Default, Debug, Eq, PartialEq)]
    pub struct LayoutDamage: u8 {
        /// The cached requisition is stale.
        const NEEDS_RESIZE = 1 << 0;
        /// The cached extremes are stale. Implies `NEEDS_RESIZE`.
        const EXTREMES_CHANGED = 1 << 1;
        /// The node has to be allocated again, even if its allocation does not change.
        const NEEDS_ALLOCATE = 1 << 2;
    }
}

impl LayoutDamage {
    /// The damage a child notification leaves on each ancestor.
    pub fn for_resize(extremes_changed: bool) -> LayoutDamage {
        if extremes_changed {
            LayoutDamage::all()
        } else {
            LayoutDamage::NEEDS_RESIZE | LayoutDamage::NEEDS_ALLOCATE
        }
    }
}

impl std::fmt::Display for LayoutDamage {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        let mut first_elem = true;

        let to_iter = [
            (LayoutDamage::NEEDS_RESIZE, "Resize"),
            (LayoutDamage::EXTREMES_CHANGED, "Extremes"),
            (LayoutDamage::NEEDS_ALLOCATE, "Allocate"),
        ];

        for &(damage, damage_str) in &to_iter {
            if self.contains(damage) {
                if !first_elem {
                    write!(f, " | ")?;
                }
                write!(f, "{}", damage_str)?;
                first_elem = false;
            }
        }

        if first_elem {
            write!(f, "NoDamage")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_each_flag() {
        assert_eq!(LayoutDamage::empty().to_string(), "NoDamage");
        assert_eq!(
            LayoutDamage::for_resize(false).to_string(),
            "Resize | Allocate"
        );
        assert_eq!(
            LayoutDamage::for_resize(true).to_string(),
            "Resize | Extremes | Allocate"
        );
    }
}
