//! Input mask attached to an element.
//!
//! * Validates every edit of the element against the mask.
//! * Fills in the literals of the mask.
//! * Places the caret after each edit, and jumps over literals
//!   when deleting.
//! * Can show the mask as native placeholder while the field is empty,
//!   and the rest of the mask as inline placeholder while typing.
//! * Can clear an incomplete value when the field loses focus.
//!
//! ```rust
//! use rat_inputmask::event::FieldEvent;
//! use rat_inputmask::{handle_events, InputMaskState, LocalField, MaskOptions};
//!
//! let mut state = InputMaskState::attach(
//!     LocalField::new(),
//!     MaskOptions::new().input_mask("(999) 999-9999"),
//! )?;
//!
//! for c in "2025551234".chars() {
//!     if let Some(field) = state.element_mut() {
//!         field.type_char(c);
//!     }
//!     handle_events(&mut state, &FieldEvent::Input);
//! }
//! assert_eq!(state.value(), "(202) 555-1234");
//! assert!(state.is_completed());
//! # Ok::<(), rat_inputmask::MaskError>(())
//! ```
//!
//! The host feeds the events with [handle_events] and calls
//! [InputMaskState::run_deferred] after the focus event has been
//! processed completely.
//!

use crate::event::{
    FieldEvent, HandleEvent, ListenerId, MaskNotification, MaskOutcome, Regular,
};
use crate::element::MaskElement;
use crate::options::{MaskConfig, MaskOptions};
use crate::validate::{EditContext, Validated};
use crate::{grapheme_len, upos_type, MaskError};
use log::debug;
use std::fmt;
use std::fmt::{Debug, Formatter};

/// Class added to the element while the placeholder is uncovered.
pub const ACTIVE_CLASS: &str = "active";

/// Attribute for the native placeholder.
pub const PLACEHOLDER_ATTR: &str = "placeholder";

/// Visible state of the field.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    /// Empty, shows the mask as native placeholder.
    #[default]
    Uncovered,
    /// Mask is applied to the input.
    Editing,
    /// Every slot of the mask is filled.
    Completed,
}

/// Bookkeeping for one field.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FieldSession {
    /// Last value written to the field, with placeholder rest.
    pub previous_value: String,
    /// Validated part of the previous value.
    pub clean_value: String,
    /// Placeholder text. Either the mask with the glyphs or the
    /// initial value of the field.
    pub placeholder_text: String,
    /// No slot is filled.
    pub is_empty: bool,
    /// All slots are filled.
    pub is_completed: bool,
    /// Caret after the last edit.
    pub future_caret: upos_type,
    /// Caret waiting for the next turn.
    pub deferred_caret: Option<upos_type>,
    /// Visible state.
    pub state: FieldState,
}

type Listener = Box<dyn FnMut(&MaskNotification)>;

/// Input mask for one element.
pub struct InputMaskState<E: MaskElement> {
    /// None after dispose.
    element: Option<E>,
    config: MaskConfig,
    session: FieldSession,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u32,
}

impl<E: MaskElement> Debug for InputMaskState<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputMaskState")
            .field("element", &self.element)
            .field("config", &self.config)
            .field("session", &self.session)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<E: MaskElement> InputMaskState<E> {
    /// Attach a mask to the element.
    ///
    /// The options are read from the element attributes, the
    /// given options override them.
    pub fn attach(element: E, options: MaskOptions) -> Result<Self, MaskError> {
        let config = MaskOptions::from_element(&element)?
            .merge(options)
            .resolve()?;
        Ok(Self::with_config(element, config))
    }

    /// Attach a mask with a resolved configuration.
    /// The configuration can be shared between fields.
    pub fn with_config(element: E, config: MaskConfig) -> Self {
        let mut state = Self {
            element: Some(element),
            config,
            session: FieldSession {
                is_empty: true,
                ..Default::default()
            },
            listeners: Vec::new(),
            next_listener: 0,
        };
        state.init();
        state
    }

    fn init(&mut self) {
        let Some(element) = &self.element else {
            return;
        };
        debug!("attach mask '{}'", self.config.pattern());

        let initial = element.value().into_owned();
        if !initial.is_empty() {
            let caret = element.caret();
            self.session.placeholder_text = initial.clone();
            let ctx = EditContext {
                previous: "",
                placeholder_text: &initial,
                caret,
            };
            let v = self.config.validator().validate(&initial, &ctx);
            self.commit(v);
        } else if self.config.input_placeholder() {
            self.uncover();
        }
    }

    /// Detach from the element.
    ///
    /// Removes the active marker and returns the element.
    /// Any later events are ignored.
    pub fn dispose(&mut self) -> Option<E> {
        let mut element = self.element.take()?;
        debug!("dispose mask '{}'", self.config.pattern());
        element.remove_class(ACTIVE_CLASS);
        self.session = FieldSession {
            is_empty: true,
            ..Default::default()
        };
        self.listeners.clear();
        Some(element)
    }

    /// Still attached to the element.
    #[inline]
    pub fn is_bound(&self) -> bool {
        self.element.is_some()
    }

    #[inline]
    pub fn element(&self) -> Option<&E> {
        self.element.as_ref()
    }

    /// Access the element. Changes of the value should be followed by
    /// an [FieldEvent::Input].
    #[inline]
    pub fn element_mut(&mut self) -> Option<&mut E> {
        self.element.as_mut()
    }

    #[inline]
    pub fn config(&self) -> &MaskConfig {
        &self.config
    }

    #[inline]
    pub fn session(&self) -> &FieldSession {
        &self.session
    }

    #[inline]
    pub fn field_state(&self) -> FieldState {
        self.session.state
    }

    /// Validated value without placeholder rest.
    ///
    /// Deleting without the inline placeholder leaves the field as the
    /// user edited it. Then this is only the valid start of the field
    /// text and [display_value](Self::display_value) has the rest.
    #[inline]
    pub fn value(&self) -> &str {
        self.session.clean_value.as_str()
    }

    /// Value as shown in the field.
    #[inline]
    pub fn display_value(&self) -> &str {
        self.session.previous_value.as_str()
    }

    /// Only the graphemes typed into the slots.
    pub fn unmasked_value(&self) -> String {
        self.config.validator().unmask(&self.session.clean_value)
    }

    /// All slots filled.
    #[inline]
    pub fn is_completed(&self) -> bool {
        self.session.is_completed
    }

    /// No slot filled.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.session.is_empty
    }

    /// Register a listener for the notifications.
    pub fn add_listener(&mut self, listener: impl FnMut(&MaskNotification) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let len = self.listeners.len();
        self.listeners.retain(|(v, _)| *v != id);
        len != self.listeners.len()
    }

    /// Set the value.
    ///
    /// The value is run through the mask as if it had been typed,
    /// graphemes that don't fit are skipped. Both `(202) 555-1234` and
    /// `2025551234` give the same result for the mask `(999) 999-9999`.
    pub fn set_value(&mut self, value: &str) -> MaskOutcome {
        if self.element.is_none() {
            return MaskOutcome::Continue;
        }
        let v = self.config.validator().conform(value);
        self.commit(v)
    }

    /// Reset to empty.
    pub fn clear(&mut self) -> MaskOutcome {
        if self.element.is_none() {
            return MaskOutcome::Continue;
        }
        self.session.previous_value.clear();
        self.uncover();
        self.notify(MaskOutcome::ValueChanged, String::new());
        MaskOutcome::ValueChanged
    }

    /// Apply the caret position that waits for the end of the focus
    /// handling. Does nothing if there is none or the mask has been
    /// disposed in the meantime.
    pub fn run_deferred(&mut self) -> bool {
        let Some(pos) = self.session.deferred_caret.take() else {
            return false;
        };
        let Some(element) = self.element.as_mut() else {
            return false;
        };
        element.set_caret(pos);
        true
    }

    /// Caret waiting for [run_deferred](Self::run_deferred).
    #[inline]
    pub fn deferred_caret(&self) -> Option<upos_type> {
        self.session.deferred_caret
    }
}

impl<E: MaskElement> InputMaskState<E> {
    fn on_input(&mut self) -> MaskOutcome {
        let Some(element) = &self.element else {
            return MaskOutcome::Continue;
        };
        let value = element.value().into_owned();
        let caret = element.caret();

        if value.is_empty() {
            self.session.previous_value.clear();
            self.session.clean_value.clear();
            self.session.is_empty = true;
            self.session.is_completed = false;
            self.session.future_caret = 0;
            self.session.state = FieldState::Editing;
            self.notify(MaskOutcome::ValueChanged, String::new());
            return MaskOutcome::ValueChanged;
        }
        if value == self.session.previous_value {
            return MaskOutcome::Unchanged;
        }

        let ctx = EditContext {
            previous: &self.session.previous_value,
            placeholder_text: &self.session.placeholder_text,
            caret,
        };
        let v = self.config.validator().validate(&value, &ctx);

        if grapheme_len(&value) < grapheme_len(&self.session.previous_value)
            && !self.config.mask_placeholder()
        {
            // a plain shrink stays as is. only the flags follow.
            self.session.previous_value = value;
            self.session.future_caret = caret;
            self.update_flags(&v);
            self.notify(MaskOutcome::ValueChanged, v.clean);
            MaskOutcome::ValueChanged
        } else {
            self.commit(v)
        }
    }

    fn on_focus(&mut self) -> MaskOutcome {
        let Some(element) = self.element.as_mut() else {
            return MaskOutcome::Continue;
        };

        if !self.session.previous_value.is_empty() {
            element.set_value(&self.session.previous_value);
            self.session.deferred_caret = Some(self.session.future_caret);
            MaskOutcome::Changed
        } else if self.config.mask_placeholder() {
            let placeholder = self.config.placeholder();
            element.set_value(&placeholder);
            self.session.placeholder_text = placeholder;
            self.session.deferred_caret = Some(0);
            self.session.state = FieldState::Editing;
            MaskOutcome::Changed
        } else {
            MaskOutcome::Unchanged
        }
    }

    fn on_blur(&mut self) -> MaskOutcome {
        let Some(element) = &self.element else {
            return MaskOutcome::Continue;
        };

        let value_empty = element.value().is_empty();
        if (self.config.clear_incomplete() && !self.session.is_completed)
            || (self.config.input_placeholder() && (self.session.is_empty || value_empty))
        {
            debug!("blur resets '{}'", self.session.previous_value);
            self.session.previous_value.clear();
            self.uncover();
            MaskOutcome::Changed
        } else {
            MaskOutcome::Unchanged
        }
    }

    /// Clear the value and show the mask as native placeholder.
    fn uncover(&mut self) {
        let Some(element) = self.element.as_mut() else {
            return;
        };
        element.set_value("");
        element.add_class(ACTIVE_CLASS);
        element.set_attribute(PLACEHOLDER_ATTR, self.config.pattern().as_str());

        self.session.clean_value.clear();
        self.session.is_empty = true;
        self.session.is_completed = false;
        self.session.future_caret = 0;
        self.session.deferred_caret = None;
        self.session.state = FieldState::Uncovered;
    }

    /// Write the validated value to the element.
    fn commit(&mut self, v: Validated) -> MaskOutcome {
        let Some(element) = self.element.as_mut() else {
            return MaskOutcome::Continue;
        };
        element.set_value(&v.display);
        element.set_caret(v.caret);

        self.session.previous_value = v.display.clone();
        self.session.future_caret = v.caret;
        self.update_flags(&v);

        let clean = v.clean;
        if v.is_completed {
            self.notify(MaskOutcome::ValueChanged, clean.clone());
            self.notify(MaskOutcome::Completed, clean);
            MaskOutcome::Completed
        } else {
            self.notify(MaskOutcome::ValueChanged, clean);
            MaskOutcome::ValueChanged
        }
    }

    fn update_flags(&mut self, v: &Validated) {
        self.session.clean_value = v.clean.clone();
        self.session.is_empty = v.is_empty;
        self.session.is_completed = v.is_completed;
        self.session.state = if v.is_completed {
            FieldState::Completed
        } else {
            FieldState::Editing
        };
    }

    fn notify(&mut self, kind: MaskOutcome, value: String) {
        let n = match kind {
            MaskOutcome::Completed => MaskNotification::Completed { value },
            _ => MaskNotification::ValueChanged { value },
        };
        for (_, listener) in self.listeners.iter_mut() {
            listener(&n);
        }
    }
}

impl<E: MaskElement> HandleEvent<FieldEvent, Regular, MaskOutcome> for InputMaskState<E> {
    fn handle(&mut self, event: &FieldEvent, _qualifier: Regular) -> MaskOutcome {
        if !self.is_bound() {
            return MaskOutcome::Continue;
        }
        match event {
            FieldEvent::Input => self.on_input(),
            FieldEvent::Focus => self.on_focus(),
            FieldEvent::Blur => self.on_blur(),
        }
    }
}

/// Handle the events of the field.
pub fn handle_events<E: MaskElement>(
    state: &mut InputMaskState<E>,
    event: &FieldEvent,
) -> MaskOutcome {
    state.handle(event, Regular)
}
