//! Display containers and the per-session display context.
//!
//! The display engine consumes a tree of named containers: one
//! [`ElementList`] per event item, holding one [`StraightLineSet`] per
//! detector element. Lists live in a [`DisplayContext`] that is passed
//! explicitly to every builder and torn down at the end of the session.

use std::fmt;

use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DisplayError, DisplayResult};
use crate::projector::LineSegment;

/// RGB colour of a drawn element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Pure red, the conventional colour for muon-system items.
    pub const RED: Self = Self::rgb(255, 0, 0);

    /// Creates a colour from its channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A named set of straight lines drawn with one width and colour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StraightLineSet {
    /// Element name.
    pub name: String,
    /// Line width in pixels.
    pub line_width: u8,
    /// Colour of every line.
    pub color: Color,
    /// Lines in insertion order.
    pub lines: Vec<LineSegment>,
}

impl StraightLineSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new(name: impl Into<String>, line_width: u8, color: Color) -> Self {
        Self {
            name: name.into(),
            line_width,
            color,
            lines: Vec::new(),
        }
    }

    /// Adds a line between two global points.
    pub fn add_line(&mut self, inner: Point3<f64>, outer: Point3<f64>) {
        self.lines.push(LineSegment::new(inner, outer));
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if the set has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Top-level container for everything drawn for one event item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementList {
    /// Element name, usually the event item's name.
    pub name: String,
    /// Descriptive title.
    pub title: String,
    /// Main colour, inherited by children unless they override it.
    pub color: Color,
    /// Child line sets.
    pub children: Vec<StraightLineSet>,
}

impl ElementList {
    /// Creates an empty list.
    #[must_use]
    pub fn new(name: impl Into<String>, title: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            color,
            children: Vec::new(),
        }
    }

    /// Appends a child set.
    pub fn add_element(&mut self, child: StraightLineSet) {
        self.children.push(child);
    }

    /// Removes every child, keeping name, title and colour.
    pub fn destroy_elements(&mut self) {
        self.children.clear();
    }

    /// Total number of lines across all children.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.children.iter().map(StraightLineSet::len).sum()
    }
}

/// Handle to an [`ElementList`] owned by a [`DisplayContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementListId(usize);

impl ElementListId {
    /// Builds a handle from a raw slot index.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Raw slot index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ElementListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Element lists of one display session.
///
/// Slots are never reused within a session, so a handle to a removed list
/// stays invalid instead of aliasing a newer list.
#[derive(Debug, Default)]
pub struct DisplayContext {
    slots: Vec<Option<ElementList>>,
}

impl DisplayContext {
    /// Opens an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a top-level list and returns its handle.
    pub fn add_element_list(&mut self, list: ElementList) -> ElementListId {
        let id = ElementListId(self.slots.len());
        debug!(list = %list.name, id = %id, "adding element list");
        self.slots.push(Some(list));
        id
    }

    /// Shared access to a list.
    #[must_use]
    pub fn element_list(&self, id: ElementListId) -> Option<&ElementList> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    /// Mutable access to a list.
    ///
    /// # Errors
    ///
    /// Returns [`DisplayError::UnknownElementList`] if the handle was removed
    /// or belongs to another session.
    pub fn element_list_mut(&mut self, id: ElementListId) -> DisplayResult<&mut ElementList> {
        self.slots
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(DisplayError::UnknownElementList(id))
    }

    /// Removes a list, returning it.
    pub fn remove(&mut self, id: ElementListId) -> Option<ElementList> {
        self.slots.get_mut(id.0).and_then(Option::take)
    }

    /// Number of live lists.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Returns true if no list is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live lists in registration order.
    pub fn lists(&self) -> impl Iterator<Item = (ElementListId, &ElementList)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|list| (ElementListId(idx), list)))
    }

    /// Ends the session, dropping every list and invalidating all handles.
    pub fn teardown(self) -> usize {
        let live = self.len();
        debug!(lists = live, "tearing down display context");
        live
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn list_with_lines(n: usize) -> ElementList {
        let mut list = ElementList::new("item", "title", Color::RED);
        let mut set = StraightLineSet::new("chamber0", 3, Color::RED);
        for i in 0..n {
            #[allow(clippy::cast_precision_loss)]
            let x = i as f64;
            set.add_line(Point3::new(x, 0.0, -1.0), Point3::new(x, 0.0, 1.0));
        }
        list.add_element(set);
        list
    }

    #[test]
    fn line_count_sums_children() {
        let mut list = list_with_lines(2);
        list.add_element(StraightLineSet::new("chamber1", 3, Color::RED));
        assert_eq!(list.line_count(), 2);
        assert_eq!(list.children.len(), 2);
    }

    #[test]
    fn destroy_elements_keeps_identity() {
        let mut list = list_with_lines(3);
        list.destroy_elements();
        assert!(list.children.is_empty());
        assert_eq!(list.name, "item");
        assert_eq!(list.color, Color::RED);
    }

    #[test]
    fn context_add_get_remove() {
        let mut ctx = DisplayContext::new();
        let a = ctx.add_element_list(list_with_lines(1));
        let b = ctx.add_element_list(list_with_lines(2));
        assert_eq!(ctx.len(), 2);
        assert_eq!(ctx.element_list(b).unwrap().line_count(), 2);

        assert!(ctx.remove(a).is_some());
        assert!(ctx.element_list(a).is_none());
        assert!(matches!(
            ctx.element_list_mut(a),
            Err(DisplayError::UnknownElementList(id)) if id == a
        ));
        assert_eq!(ctx.lists().count(), 1);
    }

    #[test]
    fn slots_are_not_reused() {
        let mut ctx = DisplayContext::new();
        let a = ctx.add_element_list(list_with_lines(0));
        ctx.remove(a);
        let b = ctx.add_element_list(list_with_lines(0));
        assert_ne!(a, b);
        assert!(ctx.element_list(a).is_none());
    }

    #[test]
    fn teardown_reports_live_lists() {
        let mut ctx = DisplayContext::new();
        ctx.add_element_list(list_with_lines(0));
        let gone = ctx.add_element_list(list_with_lines(0));
        ctx.remove(gone);
        assert_eq!(ctx.teardown(), 1);
    }
}
