//!
//! Validates a candidate value against the mask.
//!
//! The result is always the longest prefix of the candidate that fits
//! the mask. Literals of the mask are filled in regardless of the input
//! at that position, the first grapheme that doesn't pass its slot ends
//! the value. Nothing here ever fails, rejected input is just dropped.
//!

use crate::_private::NonExhaustive;
use crate::definition::MaskRegistry;
use crate::pattern::{CharPlaceholder, MaskPattern, MaskToken};
use crate::{grapheme_len, upos_type};
use log::{debug, trace};
use std::borrow::Cow;
use std::cmp::{max, min, Ordering};
use unicode_segmentation::UnicodeSegmentation;

/// What kind of edit led to the candidate value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    /// The value got longer.
    Insert,
    /// The value got shorter.
    Delete,
    /// Same length, but different content. Happens when a selection
    /// is replaced.
    Replace,
}

/// State of the field before the edit.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EditContext<'a> {
    /// Value before the edit.
    pub previous: &'a str,
    /// Current placeholder text.
    pub placeholder_text: &'a str,
    /// Caret as reported by the element after the edit.
    pub caret: upos_type,
}

/// Result of a validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validated {
    /// The validated part of the value.
    pub clean: String,
    /// Clean value followed by the placeholder rest, if the inline
    /// placeholder is active. This is written back to the field.
    pub display: String,
    /// Every slot is filled.
    pub is_completed: bool,
    /// No slot is filled. There may be literals.
    pub is_empty: bool,
    /// New caret position.
    pub caret: upos_type,
    /// Kind of the edit.
    pub edit: EditKind,

    pub non_exhaustive: NonExhaustive,
}

/// Validation of values for one mask.
#[derive(Debug, Clone, Copy)]
pub struct MaskValidator<'a> {
    pub pattern: &'a MaskPattern,
    pub registry: &'a MaskRegistry,
    pub glyphs: &'a CharPlaceholder,
    /// Show the placeholder for the rest of the mask while editing.
    pub mask_placeholder: bool,
}

impl MaskValidator<'_> {
    /// Validate the candidate after an edit.
    pub fn validate(&self, candidate: &str, ctx: &EditContext<'_>) -> Validated {
        let cand_len = grapheme_len(candidate);
        let edit = match cand_len.cmp(&grapheme_len(ctx.previous)) {
            Ordering::Less => EditKind::Delete,
            Ordering::Greater => EditKind::Insert,
            Ordering::Equal => EditKind::Replace,
        };

        if self.pattern.is_empty() {
            return Validated {
                clean: candidate.to_string(),
                display: candidate.to_string(),
                is_completed: false,
                is_empty: candidate.is_empty(),
                caret: min(ctx.caret, cand_len),
                edit,
                non_exhaustive: NonExhaustive,
            };
        }

        // the first keystroke gets the literals at the start of the mask.
        let first = if self.mask_placeholder {
            cand_len.checked_sub(grapheme_len(ctx.placeholder_text)) == Some(1) && ctx.caret == 1
        } else {
            cand_len == 1
        };
        let prepend =
            edit != EditKind::Delete && first && self.pattern.literal_prefix_len() > 0;
        let candidate = if prepend {
            Cow::Owned(self.pattern.literal_prefix() + candidate)
        } else {
            Cow::Borrowed(candidate)
        };

        let (clean, len, filled) = self.walk(candidate.as_ref());

        let caret = match edit {
            // never in front of the literal prefix.
            EditKind::Delete => max(
                len - self.trailing_literals(len),
                self.pattern.literal_prefix_len(),
            ),
            EditKind::Insert => len,
            EditKind::Replace if prepend => len,
            EditKind::Replace => min(ctx.caret, len),
        };

        trace!(
            "validate {:?} '{}' -> '{}' caret {}",
            edit,
            candidate,
            clean,
            caret
        );

        self.finish(clean, len, filled, edit, caret, ctx.placeholder_text)
    }

    /// Run the input through the mask as if it was typed grapheme by
    /// grapheme at the end of the field. Rejected graphemes are skipped.
    ///
    /// Accepts both the formatted value and just the slot contents.
    pub fn conform(&self, input: &str) -> Validated {
        if self.pattern.is_empty() {
            return self.validate(input, &EditContext::default());
        }

        let mut clean = String::new();
        let mut len = 0;
        let mut filled = 0;
        for g in input.graphemes(true) {
            if len >= self.pattern.len() {
                break;
            }
            let candidate = if len == 0 {
                self.pattern.literal_prefix() + g
            } else {
                format!("{}{}", clean, g)
            };
            (clean, len, filled) = self.walk(&candidate);
        }

        self.finish(clean, len, filled, EditKind::Insert, len, "")
    }

    /// Only the graphemes at slot positions of a clean value.
    pub fn unmask(&self, clean: &str) -> String {
        if self.pattern.is_empty() {
            return clean.to_string();
        }
        clean
            .graphemes(true)
            .zip(self.pattern.tokens())
            .filter(|(_, t)| t.is_slot())
            .map(|(g, _)| g)
            .collect()
    }

    /// Walk the mask and collect the valid prefix.
    /// Returns the prefix, its length and the number of filled slots.
    fn walk(&self, candidate: &str) -> (String, upos_type, upos_type) {
        let mut input = candidate.graphemes(true);
        let mut clean = String::new();
        let mut len = 0;
        let mut filled = 0;

        for token in self.pattern.tokens() {
            let g = input.next().unwrap_or("");
            match token {
                MaskToken::Slot(symbol) => {
                    if self
                        .registry
                        .validator_for(symbol)
                        .is_some_and(|v| v.is_valid(g))
                    {
                        clean.push_str(g);
                        filled += 1;
                    } else {
                        if !g.is_empty() {
                            debug!("reject '{}' for '{}' at {}", g, symbol, len);
                        }
                        break;
                    }
                }
                MaskToken::Literal(literal) => {
                    clean.push_str(literal);
                }
            }
            len += 1;
        }

        (clean, len, filled)
    }

    /// Number of literals at the end of a prefix of the given length.
    /// The caret jumps over them when deleting.
    fn trailing_literals(&self, len: upos_type) -> upos_type {
        self.pattern.tokens()[..len as usize]
            .iter()
            .rev()
            .take_while(|v| v.is_literal())
            .count() as upos_type
    }

    fn finish(
        &self,
        clean: String,
        len: upos_type,
        filled: upos_type,
        edit: EditKind,
        caret: upos_type,
        placeholder_text: &str,
    ) -> Validated {
        let mut display = clean.clone();
        if self.mask_placeholder {
            let mut placeholder = placeholder_text.graphemes(true).skip(len as usize);
            for (i, token) in self.pattern.tokens().iter().enumerate().skip(len as usize) {
                match placeholder.next() {
                    Some(g) => display.push_str(g),
                    None => display.push_str(self.pattern.placeholder_at(
                        i as upos_type,
                        token,
                        self.glyphs,
                    )),
                }
            }
        }

        Validated {
            clean,
            display,
            is_completed: len == self.pattern.len(),
            is_empty: filled == 0,
            caret,
            edit,
            non_exhaustive: NonExhaustive,
        }
    }
}
