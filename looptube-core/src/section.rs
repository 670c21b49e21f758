//! Named time ranges over a video and the ordered collection holding them.

use rand::distr::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Length of generated section identifiers.
const SECTION_ID_LEN: usize = 12;

/// Opaque unique identifier for a [`Section`].
///
/// Stable for the section's lifetime and never reused. Identifiers decoded
/// from share tokens are accepted verbatim, so the inner form is an
/// unconstrained string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        let id = rand::rng()
            .sample_iter(Alphanumeric)
            .take(SECTION_ID_LEN)
            .map(char::from)
            .collect();
        Self(id)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A named, optionally-bounded time range over a video.
///
/// No ordering is enforced between `start_time` and `end_time` here; the
/// table editor may store temporarily inconsistent values. Only the mark
/// workflow validates ordering at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: SectionId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub start_time: Option<f64>,
    #[serde(default)]
    pub end_time: Option<f64>,
}

impl Section {
    /// Create a section with a fresh id and empty name.
    #[must_use]
    pub fn new(start_time: Option<f64>, end_time: Option<f64>) -> Self {
        Self {
            id: SectionId::generate(),
            name: String::new(),
            start_time,
            end_time,
        }
    }

    /// Whether the loop controller can enforce this section's boundary:
    /// both bounds present and `end > start`.
    #[must_use]
    pub fn is_loopable(&self) -> bool {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => end > start,
            _ => false,
        }
    }
}

/// Which time bound of a section a mutation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeField {
    Start,
    End,
}

/// Ordered collection of sections.
///
/// Insertion order is display and keyboard-shortcut order (index 0 binds to
/// shortcut "1"/"Q"). Mutations referencing unknown ids are silent no-ops.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionList {
    sections: Vec<Section>,
}

impl SectionList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new section with a fresh id, returning its id.
    pub fn add(&mut self, start_time: Option<f64>, end_time: Option<f64>) -> SectionId {
        let section = Section::new(start_time, end_time);
        let id = section.id.clone();
        self.sections.push(section);
        id
    }

    /// Set a section's name to the trimmed input. Trimming to the empty
    /// string is allowed and stored as empty.
    pub fn rename(&mut self, id: &SectionId, name: &str) {
        if let Some(section) = self.sections.iter_mut().find(|s| &s.id == id) {
            section.name = name.trim().to_string();
        }
    }

    /// Set one time bound of a section. No cross-field validation happens
    /// here; the loop controller treats inconsistent bounds as non-loopable.
    pub fn set_time(&mut self, id: &SectionId, field: TimeField, value: Option<f64>) {
        if let Some(section) = self.sections.iter_mut().find(|s| &s.id == id) {
            match field {
                TimeField::Start => section.start_time = value,
                TimeField::End => section.end_time = value,
            }
        }
    }

    /// Delete the section with the given id. Returns whether a section was
    /// removed. Order of the remaining sections is preserved.
    pub fn remove(&mut self, id: &SectionId) -> bool {
        let before = self.sections.len();
        self.sections.retain(|s| &s.id != id);
        self.sections.len() != before
    }

    /// Replace the whole collection (hydration from a share token).
    pub fn replace_all(&mut self, sections: Vec<Section>) {
        self.sections = sections;
    }

    #[must_use]
    pub fn get(&self, id: &SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| &s.id == id)
    }

    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    #[must_use]
    pub fn contains(&self, id: &SectionId) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Section] {
        &self.sections
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let mut list = SectionList::new();
        let a = list.add(None, None);
        let b = list.add(None, None);
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), SECTION_ID_LEN);
    }

    #[test]
    fn test_add_appends_one() {
        let mut list = SectionList::new();
        assert!(list.is_empty());
        list.add(Some(10.0), Some(20.0));
        assert_eq!(list.len(), 1);
        list.add(None, None);
        assert_eq!(list.len(), 2);
        // Insertion order preserved
        assert_eq!(list.get_by_index(0).map(|s| s.start_time), Some(Some(10.0)));
    }

    #[test]
    fn test_rename_trims() {
        let mut list = SectionList::new();
        let id = list.add(None, None);
        list.rename(&id, "  Chorus  ");
        assert_eq!(list.get(&id).map(|s| s.name.as_str()), Some("Chorus"));
        list.rename(&id, "   ");
        assert_eq!(list.get(&id).map(|s| s.name.as_str()), Some(""));
    }

    #[test]
    fn test_set_time_no_cross_validation() {
        let mut list = SectionList::new();
        let id = list.add(Some(30.0), Some(40.0));
        // The table editor may store end < start; it just becomes non-loopable.
        list.set_time(&id, TimeField::End, Some(10.0));
        let section = list.get(&id).cloned();
        assert_eq!(section.as_ref().and_then(|s| s.end_time), Some(10.0));
        assert!(!section.is_some_and(|s| s.is_loopable()));
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut list = SectionList::new();
        let a = list.add(Some(1.0), None);
        let b = list.add(Some(2.0), None);
        let c = list.add(Some(3.0), None);
        assert!(list.remove(&b));
        assert_eq!(list.len(), 2);
        assert_eq!(list.get_by_index(0).map(|s| s.id.clone()), Some(a));
        assert_eq!(list.get_by_index(1).map(|s| s.id.clone()), Some(c));
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let mut list = SectionList::new();
        list.add(None, None);
        let ghost = SectionId::from("missing");
        list.rename(&ghost, "nope");
        list.set_time(&ghost, TimeField::Start, Some(1.0));
        assert!(!list.remove(&ghost));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_loopable_conditions() {
        let loopable = Section {
            id: SectionId::from("a"),
            name: String::new(),
            start_time: Some(10.0),
            end_time: Some(20.0),
        };
        assert!(loopable.is_loopable());

        let reversed = Section {
            end_time: Some(5.0),
            ..loopable.clone()
        };
        assert!(!reversed.is_loopable());

        let degenerate = Section {
            end_time: Some(10.0),
            ..loopable.clone()
        };
        assert!(!degenerate.is_loopable());

        let unbounded = Section {
            start_time: None,
            ..loopable
        };
        assert!(!unbounded.is_loopable());
    }
}
