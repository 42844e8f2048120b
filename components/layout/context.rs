/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Data needed by every layout pass of a document.

use std::fmt;
use std::sync::Arc;

use app_units::Au;
use euclid::default::Size2D;
use flowbox_config::prefs::{self, Preferences};
use layout_api::{FontMetricsProvider, Hyphenator, MonospaceMetrics, NoHyphenation};

/// The collaborators of a layout tree and the preferences it was created with.
pub struct LayoutContext {
    /// Measures text.
    pub font_metrics: Arc<dyn FontMetricsProvider + Send + Sync>,

    /// Finds hyphenation points in words that may be hyphenated.
    pub hyphenator: Arc<dyn Hyphenator + Send + Sync>,

    /// The size of the viewport, which is the containing block of fixed
    /// positioned boxes and the available width of the root.
    pub viewport: Size2D<Au>,

    /// A snapshot of the process-wide preferences.
    pub prefs: Preferences,
}

impl LayoutContext {
    pub fn new(
        font_metrics: Arc<dyn FontMetricsProvider + Send + Sync>,
        hyphenator: Arc<dyn Hyphenator + Send + Sync>,
        viewport: Size2D<Au>,
    ) -> Self {
        LayoutContext {
            font_metrics,
            hyphenator,
            viewport,
            prefs: prefs::get().clone(),
        }
    }

    /// A context that measures text with [`MonospaceMetrics`] and never
    /// hyphenates.
    pub fn headless(viewport: Size2D<Au>) -> Self {
        LayoutContext::new(
            Arc::new(MonospaceMetrics::default()),
            Arc::new(NoHyphenation),
            viewport,
        )
    }
}

impl fmt::Debug for LayoutContext {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("LayoutContext")
            .field("viewport", &self.viewport)
            .field("prefs", &self.prefs)
            .finish_non_exhaustive()
    }
}
