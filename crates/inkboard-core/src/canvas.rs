//! The drawing document: elements in draw order.

use crate::shapes::{ElementId, ElementRef};
use kurbo::Rect;

/// An ordered sequence of elements, back to front.
#[derive(Debug, Clone, Default)]
pub struct Document {
    elements: Vec<ElementRef>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element on top of everything else.
    pub fn add(&mut self, element: ElementRef) {
        log::debug!("document add {} {}", element.kind_name(), element.id());
        self.elements.push(element);
    }

    /// Remove the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn remove_at(&mut self, index: usize) -> ElementRef {
        let element = self.elements.remove(index);
        log::debug!("document remove {} at {index}", element.id());
        element
    }

    /// Elements in render order.
    pub fn elements(&self) -> &[ElementRef] {
        &self.elements
    }

    /// Install a sequence produced by the history.
    pub fn replace(&mut self, elements: Vec<ElementRef>) {
        self.elements = elements;
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ElementRef> {
        self.elements.iter()
    }

    /// Position of an element in draw order.
    pub fn position(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id() == id)
    }

    /// Get an element by ID.
    pub fn get(&self, id: ElementId) -> Option<&ElementRef> {
        self.elements.iter().find(|e| e.id() == id)
    }

    /// Union of all element bounds.
    pub fn bounds(&self) -> Option<Rect> {
        self.elements
            .iter()
            .map(|e| e.bounds())
            .reduce(|acc, b| acc.union(b))
    }
}
