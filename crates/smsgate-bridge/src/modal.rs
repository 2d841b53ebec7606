// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Locating the surface a new modal can be presented from.
//
// A view controller that is already presenting something refuses a second
// presentation, so the composer has to go on top of whatever is showing.

/// Deepest chain of nested modals followed before giving up.
pub const MAX_MODAL_DEPTH: usize = 16;

/// Follow `presented` from `root` to the surface currently on top.
///
/// Stops after [`MAX_MODAL_DEPTH`] hops so a malformed chain cannot spin.
pub fn topmost_presenter<T>(root: T, mut presented: impl FnMut(&T) -> Option<T>) -> T {
    let mut top = root;
    for _ in 0..MAX_MODAL_DEPTH {
        match presented(&top) {
            Some(next) => top = next,
            None => break,
        }
    }
    top
}
