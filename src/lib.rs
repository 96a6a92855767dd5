#![doc = include_str!("../readme.md")]
#![allow(clippy::uninlined_format_args)]
use std::error::Error;
use std::fmt::{Display, Formatter};
use unicode_segmentation::UnicodeSegmentation;

pub mod definition;
pub mod element;
pub mod input_mask;
pub mod options;
pub mod pattern;
pub mod validate;

pub use definition::{CharValidator, MaskDefinition, MaskRegistry};
pub use element::{LocalField, MaskElement};
pub use input_mask::{handle_events, FieldSession, FieldState, InputMaskState};
pub use options::{MaskConfig, MaskOptions};
pub use pattern::{CharPlaceholder, MaskPattern, MaskToken};
pub use validate::{EditContext, EditKind, MaskValidator, Validated};

pub mod event {
    //!
    //! Event-handler traits and the events/outcomes of a masked field.
    //!

    use std::cmp::max;

    /// All the regular event-handling of a masked field.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct Regular;

    ///
    /// Event handler trait.
    ///
    /// * Event - The actual event type.
    /// * Qualifier - Selects one of several event-handlers for the same state.
    /// * Return - Result of event-handling. There should be one value that
    ///   indicates 'I don't know this event', see [ConsumedEvent].
    ///
    pub trait HandleEvent<Event, Qualifier, Return>
    where
        Return: ConsumedEvent,
    {
        /// Handle an event.
        fn handle(&mut self, event: &Event, qualifier: Qualifier) -> Return;
    }

    /// When calling multiple event-handlers, the minimum information required
    /// from the result is consumed the event/didn't consume the event.
    pub trait ConsumedEvent {
        /// Is this the 'consumed' result.
        fn is_consumed(&self) -> bool;

        /// Or-Else chaining with `is_consumed()` as the split.
        #[inline(always)]
        fn or_else<F>(self, f: F) -> Self
        where
            F: FnOnce() -> Self,
            Self: Sized,
        {
            if self.is_consumed() {
                self
            } else {
                f()
            }
        }

        /// Then-chaining. Returns max(self, f()).
        #[inline(always)]
        fn and<F>(self, f: F) -> Self
        where
            Self: Sized + Ord,
            F: FnOnce() -> Self,
        {
            max(self, f())
        }
    }

    /// The events a masked field listens to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum FieldEvent {
        /// The value of the element has been changed by the user.
        /// The element already holds the new value.
        Input,
        /// The element gained the input focus.
        Focus,
        /// The element lost the input focus.
        Blur,
    }

    impl FieldEvent {
        /// Host event name.
        pub fn name(&self) -> &'static str {
            match self {
                FieldEvent::Input => "input",
                FieldEvent::Focus => "focus",
                FieldEvent::Blur => "blur",
            }
        }

        /// Map a host event name. Unknown names are not handled.
        pub fn from_name(name: &str) -> Option<FieldEvent> {
            match name {
                "input" => Some(FieldEvent::Input),
                "focus" => Some(FieldEvent::Focus),
                "blur" => Some(FieldEvent::Blur),
                _ => None,
            }
        }
    }

    /// Result of event handling.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    pub enum MaskOutcome {
        /// The given event has not been used at all.
        #[default]
        Continue,
        /// The event has been recognized, but the result was nil.
        /// Further processing for this event may stop.
        Unchanged,
        /// The event has been recognized and there is some change
        /// due to it. The value itself is the same.
        Changed,
        /// The validated value has changed.
        ValueChanged,
        /// The validated value has changed and fills the whole mask.
        Completed,
    }

    impl ConsumedEvent for MaskOutcome {
        fn is_consumed(&self) -> bool {
            *self != MaskOutcome::Continue
        }
    }

    // Useful for converting most navigation/edit results.
    impl From<bool> for MaskOutcome {
        fn from(value: bool) -> Self {
            if value {
                MaskOutcome::Changed
            } else {
                MaskOutcome::Unchanged
            }
        }
    }

    /// Notification sent to the listeners of a field.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum MaskNotification {
        /// The validated value after an edit.
        /// Doesn't contain the placeholder rest.
        ValueChanged { value: String },
        /// The mask has been filled.
        Completed { value: String },
    }

    impl MaskNotification {
        /// Value carried by the notification.
        pub fn value(&self) -> &str {
            match self {
                MaskNotification::ValueChanged { value } => value.as_str(),
                MaskNotification::Completed { value } => value.as_str(),
            }
        }
    }

    /// Identifies a registered listener.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ListenerId(pub(crate) u32);
}

/// Errors while building a mask configuration.
///
/// Once a field is attached nothing fails anymore. Input that doesn't
/// fit the mask is dropped silently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskError {
    /// An option has the wrong type.
    InvalidOption {
        option: &'static str,
        expected: &'static str,
        found: String,
    },
    /// A custom mask symbol must be exactly one grapheme.
    InvalidSymbol(String),
    /// The validator of a custom mask symbol is not a valid regex.
    InvalidValidator { symbol: String, message: String },
    /// The list of custom symbols and the list of validators differ in length.
    CustomMaskMismatch { masks: usize, validators: usize },
    /// The placeholder glyphs are empty.
    EmptyPlaceholder,
}

impl Display for MaskError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MaskError::InvalidOption {
                option,
                expected,
                found,
            } => write!(
                f,
                "option '{}' expected type {}, found '{}'",
                option, expected, found
            ),
            MaskError::InvalidSymbol(s) => {
                write!(f, "mask symbol '{}' is not a single character", s)
            }
            MaskError::InvalidValidator { symbol, message } => {
                write!(f, "validator for mask symbol '{}': {}", symbol, message)
            }
            MaskError::CustomMaskMismatch { masks, validators } => write!(
                f,
                "{} custom masks but {} custom validators",
                masks, validators
            ),
            MaskError::EmptyPlaceholder => write!(f, "option 'charPlaceholder' is empty"),
        }
    }
}

impl Error for MaskError {}

/// Grapheme index type.
#[allow(non_camel_case_types)]
pub type upos_type = u32;

/// Length in graphemes.
#[inline]
pub(crate) fn grapheme_len(s: &str) -> upos_type {
    s.graphemes(true).count() as upos_type
}

mod _private {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct NonExhaustive;
}
