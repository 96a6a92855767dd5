//!
//! The input element a mask is attached to.
//!
//! Provides the MaskElement trait to connect the mask with whatever
//! holds the text: a DOM input, a terminal line, a widget state.
//!
//! There is an in-memory implementation [LocalField] that can simulate
//! typing. It's used for the tests and can serve as a model for a
//! host specific implementation.
//!

use crate::{grapheme_len, upos_type};
use rustc_hash::FxHashMap;
use std::borrow::Cow;
use std::cmp::{max, min};
use std::fmt::Debug;
use unicode_segmentation::UnicodeSegmentation;

/// Access to the input element.
///
/// Positions are grapheme indices.
pub trait MaskElement: Debug {
    /// Current value.
    fn value(&self) -> Cow<'_, str>;

    /// Replace the value.
    fn set_value(&mut self, value: &str);

    /// Caret position. If there is a selection, this is the end
    /// of the selection.
    fn caret(&self) -> upos_type;

    /// Collapse the selection and place the caret.
    /// Positions after the end of the value are clamped.
    fn set_caret(&mut self, pos: upos_type);

    /// Attribute value.
    fn attribute(&self, name: &str) -> Option<Cow<'_, str>>;

    /// Set an attribute.
    fn set_attribute(&mut self, name: &str, value: &str);

    /// Remove an attribute.
    fn remove_attribute(&mut self, name: &str);

    /// Add a class marker.
    fn add_class(&mut self, class: &str);

    /// Remove a class marker.
    fn remove_class(&mut self, class: &str);

    /// Has the class marker.
    fn has_class(&self, class: &str) -> bool;
}

impl<E: MaskElement + ?Sized> MaskElement for Box<E> {
    fn value(&self) -> Cow<'_, str> {
        self.as_ref().value()
    }

    fn set_value(&mut self, value: &str) {
        self.as_mut().set_value(value)
    }

    fn caret(&self) -> upos_type {
        self.as_ref().caret()
    }

    fn set_caret(&mut self, pos: upos_type) {
        self.as_mut().set_caret(pos)
    }

    fn attribute(&self, name: &str) -> Option<Cow<'_, str>> {
        self.as_ref().attribute(name)
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        self.as_mut().set_attribute(name, value)
    }

    fn remove_attribute(&mut self, name: &str) {
        self.as_mut().remove_attribute(name)
    }

    fn add_class(&mut self, class: &str) {
        self.as_mut().add_class(class)
    }

    fn remove_class(&mut self, class: &str) {
        self.as_mut().remove_class(class)
    }

    fn has_class(&self, class: &str) -> bool {
        self.as_ref().has_class(class)
    }
}

/// In-memory element.
/// A string with a caret in disguise.
#[derive(Debug, Default, Clone)]
pub struct LocalField {
    value: String,
    anchor: upos_type,
    caret: upos_type,
    attributes: FxHashMap<String, String>,
    classes: Vec<String>,
}

impl LocalField {
    pub fn new() -> Self {
        Self::default()
    }

    /// With an initial value. The caret is at the end.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self.caret = grapheme_len(&self.value);
        self.anchor = self.caret;
        self
    }

    /// With an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Length in graphemes.
    pub fn len(&self) -> upos_type {
        grapheme_len(&self.value)
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// The native placeholder.
    pub fn placeholder(&self) -> Option<&str> {
        self.attributes.get("placeholder").map(|v| v.as_str())
    }

    /// Select a range. The caret is at `caret`.
    pub fn set_selection(&mut self, anchor: upos_type, caret: upos_type) {
        let len = self.len();
        self.anchor = min(anchor, len);
        self.caret = min(caret, len);
    }

    /// Has a selection.
    pub fn has_selection(&self) -> bool {
        self.anchor != self.caret
    }

    /// Type a char. Replaces the selection.
    pub fn type_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.type_str(c.encode_utf8(&mut buf));
    }

    /// Type or paste some text. Replaces the selection.
    pub fn type_str(&mut self, s: &str) {
        self.delete_selection();
        let b = self.byte_at(self.caret);
        self.value.insert_str(b, s);
        self.caret += grapheme_len(s);
        self.anchor = self.caret;
    }

    /// Backspace key. Removes the selection or the grapheme before the caret.
    pub fn backspace(&mut self) {
        if self.has_selection() {
            self.delete_selection();
        } else if self.caret > 0 {
            let start = self.byte_at(self.caret - 1);
            let end = self.byte_at(self.caret);
            self.value.replace_range(start..end, "");
            self.caret -= 1;
            self.anchor = self.caret;
        }
    }

    /// Delete key. Removes the selection or the grapheme after the caret.
    pub fn delete(&mut self) {
        if self.has_selection() {
            self.delete_selection();
        } else if self.caret < self.len() {
            let start = self.byte_at(self.caret);
            let end = self.byte_at(self.caret + 1);
            self.value.replace_range(start..end, "");
        }
    }

    fn delete_selection(&mut self) {
        if self.has_selection() {
            let lo = min(self.anchor, self.caret);
            let hi = max(self.anchor, self.caret);
            let start = self.byte_at(lo);
            let end = self.byte_at(hi);
            self.value.replace_range(start..end, "");
            self.caret = lo;
            self.anchor = lo;
        }
    }

    // grapheme position to byte position.
    fn byte_at(&self, pos: upos_type) -> usize {
        self.value
            .grapheme_indices(true)
            .nth(pos as usize)
            .map(|(b, _)| b)
            .unwrap_or(self.value.len())
    }
}

impl MaskElement for LocalField {
    fn value(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.value.as_str())
    }

    fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        // like a dom input the caret goes to the end.
        self.caret = grapheme_len(&self.value);
        self.anchor = self.caret;
    }

    fn caret(&self) -> upos_type {
        self.caret
    }

    fn set_caret(&mut self, pos: upos_type) {
        self.caret = min(pos, self.len());
        self.anchor = self.caret;
    }

    fn attribute(&self, name: &str) -> Option<Cow<'_, str>> {
        self.attributes.get(name).map(|v| Cow::Borrowed(v.as_str()))
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&mut self, name: &str) {
        self.attributes.remove(name);
    }

    fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    fn remove_class(&mut self, class: &str) {
        self.classes.retain(|v| v != class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|v| v == class)
    }
}
