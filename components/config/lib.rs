/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

#![deny(unsafe_code)]

pub mod prefs;

/// Reads a single preference from the process-wide [`prefs::Preferences`].
#[macro_export]
macro_rules! pref {
    ($name: ident) => {
        $crate::prefs::get().$name.clone()
    };
}

/// Overrides a single preference in the process-wide [`prefs::Preferences`].
#[macro_export]
macro_rules! set_pref {
    ($name: ident, $value: expr) => {{
        let mut preferences = $crate::prefs::get().clone();
        preferences.$name = $value;
        $crate::prefs::set(preferences);
    }};
}
