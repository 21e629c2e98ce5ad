//! Delegation parsing: turning a main-agent response into work items.
//!
//! The grammar is a handful of tags: `@TOOLS:`, `@CODE:` and `@TEXT:`
//! (case-insensitive, whitespace allowed before the colon). A delegation's
//! task is everything after its marker up to the next marker or the end of
//! the response.
//!
//! Parsing is two passes. [`scan_markers`] walks the text once, left to
//! right, and records where every marker starts and where its body begins.
//! [`parse_delegations`] then slices the text between consecutive markers.
//! Markers never overlap (each begins with `@` and contains no other `@`),
//! and a repeated tag always starts a new delegation.

use agentrelay_core::agent::DelegationKind;

/// One parsed unit of work for a sub-agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delegation {
    pub kind: DelegationKind,

    /// Task text, trimmed and never empty
    pub task: String,
}

impl Delegation {
    pub fn new(kind: DelegationKind, task: impl Into<String>) -> Self {
        Self {
            kind,
            task: task.into(),
        }
    }
}

/// Position of a marker in the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub kind: DelegationKind,

    /// Byte offset of the `@`
    pub start: usize,

    /// Byte offset just past the `:`
    pub body_start: usize,
}

/// Find every delegation marker, in source order.
pub fn scan_markers(text: &str) -> Vec<Marker> {
    let mut markers = Vec::new();
    let mut pos = 0;

    while let Some(offset) = text[pos..].find('@') {
        let at = pos + offset;
        match match_marker(text, at) {
            Some(marker) => {
                pos = marker.body_start;
                markers.push(marker);
            }
            None => pos = at + 1,
        }
    }

    markers
}

/// Try to read a marker starting at the `@` at byte offset `at`.
fn match_marker(text: &str, at: usize) -> Option<Marker> {
    let rest = &text[at + 1..];

    DelegationKind::ALL.into_iter().find_map(|kind| {
        let tag = kind.tag();
        let head = rest.get(..tag.len())?;
        if !head.eq_ignore_ascii_case(tag) {
            return None;
        }

        let after_colon = rest[tag.len()..].trim_start().strip_prefix(':')?;
        Some(Marker {
            kind,
            start: at,
            body_start: text.len() - after_colon.len(),
        })
    })
}

/// Raw, untrimmed task spans between consecutive markers.
pub fn task_spans(text: &str) -> Vec<(DelegationKind, &str)> {
    let markers = scan_markers(text);

    markers
        .iter()
        .enumerate()
        .map(|(i, marker)| {
            let end = markers.get(i + 1).map_or(text.len(), |next| next.start);
            (marker.kind, &text[marker.body_start..end])
        })
        .collect()
}

/// Extract the ordered delegations from a main-agent response.
///
/// Text before the first marker is ignored, as is any unknown tag such as
/// `@DEPLOY:`, which simply stays part of the surrounding task text.
/// Delegations whose task trims to nothing are dropped.
pub fn parse_delegations(response: &str) -> Vec<Delegation> {
    task_spans(response)
        .into_iter()
        .filter_map(|(kind, span)| {
            let task = span.trim();
            (!task.is_empty()).then(|| Delegation::new(kind, task))
        })
        .collect()
}
