/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::sync::Arc;

use log::debug;
use rustc_hash::FxHashSet;

use crate::style::ComputedStyle;

/// De-duplicates computed styles so that nodes and words with equal styles
/// share one allocation.
///
/// A cache belongs to exactly one document. It is created with the document's
/// layout tree and dropped with it, so interned styles never outlive the page
/// that produced them.
#[derive(Debug, Default)]
pub struct StyleSharingCache {
    styles: FxHashSet<Arc<ComputedStyle>>,
}

impl StyleSharingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, style: ComputedStyle) -> Arc<ComputedStyle> {
        if let Some(shared) = self.styles.get(&style) {
            return shared.clone();
        }
        let shared = Arc::new(style);
        self.styles.insert(shared.clone());
        shared
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Drops every interned style that is no longer referenced from outside
    /// the cache.
    pub fn purge(&mut self) {
        let before = self.styles.len();
        self.styles.retain(|style| Arc::strong_count(style) > 1);
        debug!(
            "StyleSharingCache: purged {} unused styles",
            before - self.styles.len()
        );
    }
}
