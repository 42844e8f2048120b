/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Layout preferences.
//!
//! There is one set of preferences per process. Layout trees take a snapshot
//! when they are created, so changing a preference affects documents loaded
//! afterwards, never a layout in progress.

use std::io::Read;
use std::sync::{RwLock, RwLockReadGuard};

use log::debug;
use serde::{Deserialize, Serialize};

static PREFERENCES: RwLock<Preferences> = RwLock::new(Preferences::const_default());

#[inline]
pub fn get() -> RwLockReadGuard<'static, Preferences> {
    PREFERENCES
        .read()
        .expect("Preferences lock should never be poisoned")
}

pub fn set(preferences: Preferences) {
    debug!("Setting layout preferences: {:?}", preferences);
    *PREFERENCES
        .write()
        .expect("Preferences lock should never be poisoned") = preferences;
}

/// Restores every preference to its default value.
pub fn reset() {
    set(Preferences::default());
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Preferences {
    /// Penalty for breaking a line at a hyphenation point or after a hyphen.
    pub penalty_hyphen: i32,
    /// Penalty for breaking at a hyphenation point when the previous line
    /// already ended with a hyphen.
    pub penalty_hyphen_2: i32,
    /// Penalty for breaking a line before an em dash.
    pub penalty_em_dash_left: i32,
    /// Penalty for breaking a line after an em dash.
    pub penalty_em_dash_right: i32,
    /// Like `penalty_em_dash_right`, when the previous line ended with a hyphen.
    pub penalty_em_dash_right_2: i32,
    /// How far inter-word spaces may stretch, in percent of their width.
    pub stretchability_factor: i32,
    /// Upper bound of measure/allocate rounds per `layout()` call. Floats of
    /// one generator affect lines of another only once both have been
    /// allocated, which may take more than one round.
    pub layout_max_passes: u32,
    /// Whether words are hyphenated automatically when a line is too tight.
    pub layout_hyphenation_enabled: bool,
}

impl Preferences {
    const fn const_default() -> Self {
        Preferences {
            penalty_hyphen: 100,
            penalty_hyphen_2: 800,
            penalty_em_dash_left: 800,
            penalty_em_dash_right: 100,
            penalty_em_dash_right_2: 800,
            stretchability_factor: 100,
            layout_max_passes: 4,
            layout_hyphenation_enabled: true,
        }
    }

    /// Parses preferences from JSON. Missing keys keep their default value.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self::const_default()
    }
}
