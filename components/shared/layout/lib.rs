/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The interface between the layout engine and the subsystems it treats as
//! external collaborators: resolved style values, font metrics and
//! hyphenation.

#![deny(unsafe_code)]

mod fonts;
mod hyphenation;
mod layout_damage;
pub mod style;
mod style_cache;

pub use fonts::{FontDescriptor, FontMetricsProvider, MonospaceMetrics};
pub use hyphenation::{ExplicitHyphenator, Hyphenator, NoHyphenation};
pub use layout_damage::LayoutDamage;
pub use style::ComputedStyle;
pub use style_cache::StyleSharingCache;
