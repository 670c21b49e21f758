//! Loop-boundary reconciliation.
//!
//! The session re-evaluates the boundary poll on every change to the active
//! reference, the section collection, or the player identity. The decision
//! of whether a poll should run, and over which bounds, is this pure
//! function; the session owns arming and cancelling the poll task itself.

use crate::section::Section;

/// Bounds the boundary poll enforces while a loopable section is active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopBounds {
    pub start: f64,
    pub end: f64,
}

/// Decide whether the active section warrants a boundary poll.
///
/// `active` is the section the active-loop reference currently resolves to,
/// if any. A stale reference (deleted section) resolves to `None` upstream.
/// Sections missing a bound or with `end <= start` stay selectable but arm
/// no poll.
#[must_use]
pub fn loop_plan(active: Option<&Section>) -> Option<LoopBounds> {
    let section = active?;
    if !section.is_loopable() {
        return None;
    }
    match (section.start_time, section.end_time) {
        (Some(start), Some(end)) => Some(LoopBounds { start, end }),
        _ => None,
    }
}
