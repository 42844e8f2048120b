/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Finds the points at which a word may be hyphenated.
pub trait Hyphenator {
    /// Byte offsets into `word`, strictly increasing, each on a character
    /// boundary and neither at `0` nor at `word.len()`. A hyphen is drawn at
    /// the end of the line when a break is taken at one of them.
    fn hyphenate(&self, word: &str) -> SmallVec<[usize; 4]>;
}

/// Never hyphenates.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHyphenation;

impl Hyphenator for NoHyphenation {
    fn hyphenate(&self, _word: &str) -> SmallVec<[usize; 4]> {
        SmallVec::new()
    }
}

/// A dictionary of words given in hyphenated form, e.g. `"hy-phen-ation"`.
/// Lookups ignore case.
#[derive(Clone, Debug, Default)]
pub struct ExplicitHyphenator {
    words: FxHashMap<String, SmallVec<[usize; 4]>>,
}

impl ExplicitHyphenator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, hyphenated: &str) {
        let mut offsets = SmallVec::new();
        let mut word = String::with_capacity(hyphenated.len());
        for part in hyphenated.split('-') {
            if !word.is_empty() && !part.is_empty() {
                offsets.push(word.len());
            }
            word.push_str(part);
        }
        self.words.insert(word.to_lowercase(), offsets);
    }
}

impl<'a> FromIterator<&'a str> for ExplicitHyphenator {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut hyphenator = ExplicitHyphenator::new();
        for word in iter {
            hyphenator.insert(word);
        }
        hyphenator
    }
}

impl Hyphenator for ExplicitHyphenator {
    fn hyphenate(&self, word: &str) -> SmallVec<[usize; 4]> {
        self.words
            .get(&word.to_lowercase())
            .cloned()
            .unwrap_or_default()
    }
}
