//!
//! Parsed mask pattern.
//!
//! Every grapheme of the mask is either a slot, if it's a symbol of the
//! [MaskRegistry], or a literal that is copied to the value as is.
//! Positions are grapheme indices.
//!

use crate::definition::MaskRegistry;
use crate::{upos_type, MaskError};
use std::fmt;
use std::fmt::{Display, Formatter};
use unicode_segmentation::UnicodeSegmentation;

/// One grapheme of the mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskToken {
    /// Editable position. Contains the mask symbol.
    Slot(Box<str>),
    /// Fixed text.
    Literal(Box<str>),
}

impl MaskToken {
    /// Is an editable position.
    #[inline]
    pub fn is_slot(&self) -> bool {
        matches!(self, MaskToken::Slot(_))
    }

    /// Is a fixed position.
    #[inline]
    pub fn is_literal(&self) -> bool {
        matches!(self, MaskToken::Literal(_))
    }

    /// Symbol or literal text.
    #[inline]
    pub fn as_str(&self) -> &str {
        match self {
            MaskToken::Slot(s) => s.as_ref(),
            MaskToken::Literal(s) => s.as_ref(),
        }
    }
}

/// Mask as a sequence of slots and literals.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MaskPattern {
    source: String,
    tokens: Vec<MaskToken>,
    // leading literals
    prefix_len: upos_type,
}

impl Display for MaskPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl MaskPattern {
    /// Classify the mask against the registry.
    pub fn parse(mask: &str, registry: &MaskRegistry) -> Self {
        let tokens = mask
            .graphemes(true)
            .map(|g| {
                if registry.is_slot(g) {
                    MaskToken::Slot(Box::from(g))
                } else {
                    MaskToken::Literal(Box::from(g))
                }
            })
            .collect::<Vec<_>>();
        let prefix_len = tokens.iter().take_while(|v| v.is_literal()).count() as upos_type;

        Self {
            source: mask.to_string(),
            tokens,
            prefix_len,
        }
    }

    /// The mask as given.
    #[inline]
    pub fn as_str(&self) -> &str {
        self.source.as_str()
    }

    /// Length in graphemes. This is the maximum length of the value.
    #[inline]
    pub fn len(&self) -> upos_type {
        self.tokens.len() as upos_type
    }

    /// No mask. Nothing will be validated.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[inline]
    pub fn tokens(&self) -> &[MaskToken] {
        &self.tokens
    }

    /// Token at the position.
    #[inline]
    pub fn token(&self, pos: upos_type) -> Option<&MaskToken> {
        self.tokens.get(pos as usize)
    }

    /// Is an editable position.
    #[inline]
    pub fn is_slot_at(&self, pos: upos_type) -> bool {
        self.token(pos).is_some_and(|v| v.is_slot())
    }

    /// Number of editable positions.
    pub fn slot_count(&self) -> upos_type {
        self.tokens.iter().filter(|v| v.is_slot()).count() as upos_type
    }

    /// Length of the literals before the first slot.
    #[inline]
    pub fn literal_prefix_len(&self) -> upos_type {
        self.prefix_len
    }

    /// Literals before the first slot.
    pub fn literal_prefix(&self) -> String {
        let mut buf = String::new();
        for t in &self.tokens[..self.prefix_len as usize] {
            buf.push_str(t.as_str());
        }
        buf
    }

    /// The mask with every slot replaced by its placeholder glyph.
    pub fn placeholder(&self, glyphs: &CharPlaceholder) -> String {
        let mut buf = String::new();
        for (i, t) in self.tokens.iter().enumerate() {
            buf.push_str(self.placeholder_at(i as upos_type, t, glyphs));
        }
        buf
    }

    #[inline]
    pub(crate) fn placeholder_at<'a>(
        &self,
        pos: upos_type,
        token: &'a MaskToken,
        glyphs: &'a CharPlaceholder,
    ) -> &'a str {
        match token {
            MaskToken::Slot(_) => glyphs.glyph(pos),
            MaskToken::Literal(s) => s.as_ref(),
        }
    }
}

/// Glyphs shown for empty slots.
///
/// A single glyph is used for every slot. With more than one glyph
/// each mask position uses the glyph with the same index, if the
/// glyphs run out the last one is repeated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharPlaceholder {
    glyphs: Vec<Box<str>>,
}

impl Default for CharPlaceholder {
    fn default() -> Self {
        Self {
            glyphs: vec![Box::from("_")],
        }
    }
}

impl Display for CharPlaceholder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for g in &self.glyphs {
            write!(f, "{}", g)?;
        }
        Ok(())
    }
}

impl CharPlaceholder {
    /// Split into glyphs. Must not be empty.
    pub fn new(glyphs: &str) -> Result<Self, MaskError> {
        let glyphs = glyphs.graphemes(true).map(Box::from).collect::<Vec<_>>();
        if glyphs.is_empty() {
            return Err(MaskError::EmptyPlaceholder);
        }
        Ok(Self { glyphs })
    }

    /// Glyph for the mask position.
    pub fn glyph(&self, pos: upos_type) -> &str {
        // never empty
        match self.glyphs.get(pos as usize) {
            Some(g) if self.glyphs.len() > 1 => g.as_ref(),
            _ => self.glyphs[self.glyphs.len() - 1].as_ref(),
        }
    }
}
