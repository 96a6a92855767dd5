//!
//! Options and the resolved configuration of a masked field.
//!
//! [MaskOptions] is a partial set of options, as it comes from the
//! element attributes or from the application. Layers are combined
//! with [MaskOptions::merge] and turned into an immutable [MaskConfig]
//! with [MaskOptions::resolve].
//!
//! | Option             | Attribute                     | Type   | Default |
//! |--------------------|-------------------------------|--------|---------|
//! | `inputMask`        | `data-mdb-input-mask`         | string | ""      |
//! | `charPlaceholder`  | `data-mdb-char-placeholder`   | string | "_"     |
//! | `inputPlaceholder` | `data-mdb-input-placeholder`  | bool   | true    |
//! | `maskPlaceholder`  | `data-mdb-mask-placeholder`   | bool   | false   |
//! | `clearIncomplete`  | `data-mdb-clear-incomplete`   | bool   | true    |
//! | `customMask`       | `data-mdb-custom-mask`        | string | ""      |
//! | `customValidator`  | `data-mdb-custom-validator`   | string | ""      |
//!

use crate::definition::{parse_custom_masks, MaskRegistry};
use crate::element::MaskElement;
use crate::pattern::{CharPlaceholder, MaskPattern};
use crate::validate::MaskValidator;
use crate::MaskError;
use std::sync::Arc;

const INPUT_MASK: &str = "inputMask";
const CHAR_PLACEHOLDER: &str = "charPlaceholder";
const INPUT_PLACEHOLDER: &str = "inputPlaceholder";
const MASK_PLACEHOLDER: &str = "maskPlaceholder";
const CLEAR_INCOMPLETE: &str = "clearIncomplete";
const CUSTOM_MASK: &str = "customMask";
const CUSTOM_VALIDATOR: &str = "customValidator";

/// Prefix for option attributes.
pub const ATTR_PREFIX: &str = "data-mdb-";

// option name, attribute name
const OPTIONS: [(&str, &str); 7] = [
    (INPUT_MASK, "input-mask"),
    (CHAR_PLACEHOLDER, "char-placeholder"),
    (INPUT_PLACEHOLDER, "input-placeholder"),
    (MASK_PLACEHOLDER, "mask-placeholder"),
    (CLEAR_INCOMPLETE, "clear-incomplete"),
    (CUSTOM_MASK, "custom-mask"),
    (CUSTOM_VALIDATOR, "custom-validator"),
];

/// Partial options.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MaskOptions {
    pub input_mask: Option<String>,
    pub char_placeholder: Option<String>,
    pub input_placeholder: Option<bool>,
    pub mask_placeholder: Option<bool>,
    pub clear_incomplete: Option<bool>,
    pub custom_mask: Option<String>,
    pub custom_validator: Option<String>,
    /// Custom symbols given directly as (symbol, regex).
    /// These are added after the comma separated lists.
    pub custom_masks: Vec<(String, String)>,
}

impl MaskOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// The mask.
    pub fn input_mask(mut self, mask: impl Into<String>) -> Self {
        self.input_mask = Some(mask.into());
        self
    }

    /// Glyphs for empty slots.
    pub fn char_placeholder(mut self, glyphs: impl Into<String>) -> Self {
        self.char_placeholder = Some(glyphs.into());
        self
    }

    /// Show the mask as native placeholder while the field is empty.
    pub fn input_placeholder(mut self, show: bool) -> Self {
        self.input_placeholder = Some(show);
        self
    }

    /// Show the placeholder glyphs for the rest of the mask while typing.
    pub fn mask_placeholder(mut self, show: bool) -> Self {
        self.mask_placeholder = Some(show);
        self
    }

    /// Clear an incomplete value when the field loses focus.
    pub fn clear_incomplete(mut self, clear: bool) -> Self {
        self.clear_incomplete = Some(clear);
        self
    }

    /// Comma separated lists of custom symbols and their regex.
    pub fn custom(mut self, masks: impl Into<String>, validators: impl Into<String>) -> Self {
        self.custom_mask = Some(masks.into());
        self.custom_validator = Some(validators.into());
        self
    }

    /// Add one custom symbol.
    pub fn custom_masks(mut self, symbol: impl Into<String>, validator: impl Into<String>) -> Self {
        self.custom_masks.push((symbol.into(), validator.into()));
        self
    }

    /// Read the options from attributes.
    ///
    /// Accepts the attribute name `data-mdb-input-mask` as well as the
    /// option name `inputMask`. Unknown attributes are ignored.
    ///
    /// Boolean options accept `true` and `false`. An empty attribute
    /// counts as `true`.
    pub fn from_attributes<'a, I>(attributes: I) -> Result<Self, MaskError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut options = Self::default();
        for (name, value) in attributes {
            let option = if let Some(attr) = name.strip_prefix(ATTR_PREFIX) {
                OPTIONS.iter().find(|v| v.1 == attr).map(|v| v.0)
            } else {
                OPTIONS.iter().find(|v| v.0 == name).map(|v| v.0)
            };
            if let Some(option) = option {
                options.set(option, value)?;
            }
        }
        Ok(options)
    }

    /// Read the options from the attributes of the element.
    pub fn from_element<E: MaskElement + ?Sized>(element: &E) -> Result<Self, MaskError> {
        let mut options = Self::default();
        for (option, attr) in OPTIONS {
            if let Some(value) = element.attribute(&format!("{}{}", ATTR_PREFIX, attr)) {
                options.set(option, &value)?;
            }
        }
        Ok(options)
    }

    fn set(&mut self, option: &'static str, value: &str) -> Result<(), MaskError> {
        match option {
            INPUT_MASK => self.input_mask = Some(value.to_string()),
            CHAR_PLACEHOLDER => self.char_placeholder = Some(value.to_string()),
            INPUT_PLACEHOLDER => self.input_placeholder = Some(parse_bool(option, value)?),
            MASK_PLACEHOLDER => self.mask_placeholder = Some(parse_bool(option, value)?),
            CLEAR_INCOMPLETE => self.clear_incomplete = Some(parse_bool(option, value)?),
            CUSTOM_MASK => self.custom_mask = Some(value.to_string()),
            CUSTOM_VALIDATOR => self.custom_validator = Some(value.to_string()),
            _ => {}
        }
        Ok(())
    }

    /// Options set in `over` replace the ones in self.
    /// Directly given custom symbols are appended.
    ///
    /// This holds for `customMask` and `customValidator` too: lists
    /// given in code replace the lists from the element attributes,
    /// the same as every other option.
    pub fn merge(self, over: MaskOptions) -> MaskOptions {
        let mut custom_masks = self.custom_masks;
        custom_masks.extend(over.custom_masks);
        MaskOptions {
            input_mask: over.input_mask.or(self.input_mask),
            char_placeholder: over.char_placeholder.or(self.char_placeholder),
            input_placeholder: over.input_placeholder.or(self.input_placeholder),
            mask_placeholder: over.mask_placeholder.or(self.mask_placeholder),
            clear_incomplete: over.clear_incomplete.or(self.clear_incomplete),
            custom_mask: over.custom_mask.or(self.custom_mask),
            custom_validator: over.custom_validator.or(self.custom_validator),
            custom_masks,
        }
    }

    /// Fill in the defaults and build the configuration.
    pub fn resolve(&self) -> Result<MaskConfig, MaskError> {
        let mut custom = Vec::new();
        let masks = self.custom_mask.as_deref().unwrap_or_default();
        let validators = self.custom_validator.as_deref().unwrap_or_default();
        match (masks.is_empty(), validators.is_empty()) {
            (true, true) => {}
            (false, false) => custom.extend(parse_custom_masks(masks, validators)?),
            (false, true) => {
                return Err(MaskError::CustomMaskMismatch {
                    masks: masks.split(',').count(),
                    validators: 0,
                })
            }
            (true, false) => {
                return Err(MaskError::CustomMaskMismatch {
                    masks: 0,
                    validators: validators.split(',').count(),
                })
            }
        }
        custom.extend(self.custom_masks.iter().cloned());

        let registry = MaskRegistry::resolve(custom)?;
        let glyphs = CharPlaceholder::new(self.char_placeholder.as_deref().unwrap_or("_"))?;
        let pattern = MaskPattern::parse(self.input_mask.as_deref().unwrap_or_default(), &registry);

        Ok(MaskConfig {
            pattern,
            registry: Arc::new(registry),
            glyphs,
            input_placeholder: self.input_placeholder.unwrap_or(true),
            mask_placeholder: self.mask_placeholder.unwrap_or(false),
            clear_incomplete: self.clear_incomplete.unwrap_or(true),
        })
    }
}

fn parse_bool(option: &'static str, value: &str) -> Result<bool, MaskError> {
    match value {
        "true" | "" => Ok(true),
        "false" => Ok(false),
        _ => Err(MaskError::InvalidOption {
            option,
            expected: "boolean",
            found: value.to_string(),
        }),
    }
}

/// Resolved configuration.
///
/// Immutable after construction. Clones share the registry.
#[derive(Debug, Clone)]
pub struct MaskConfig {
    pattern: MaskPattern,
    registry: Arc<MaskRegistry>,
    glyphs: CharPlaceholder,
    input_placeholder: bool,
    mask_placeholder: bool,
    clear_incomplete: bool,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            pattern: Default::default(),
            registry: Arc::new(MaskRegistry::builtin()),
            glyphs: Default::default(),
            input_placeholder: true,
            mask_placeholder: false,
            clear_incomplete: true,
        }
    }
}

impl MaskConfig {
    /// Parsed mask.
    #[inline]
    pub fn pattern(&self) -> &MaskPattern {
        &self.pattern
    }

    /// Mask symbols.
    #[inline]
    pub fn registry(&self) -> &Arc<MaskRegistry> {
        &self.registry
    }

    /// Glyphs for empty slots.
    #[inline]
    pub fn glyphs(&self) -> &CharPlaceholder {
        &self.glyphs
    }

    #[inline]
    pub fn input_placeholder(&self) -> bool {
        self.input_placeholder
    }

    #[inline]
    pub fn mask_placeholder(&self) -> bool {
        self.mask_placeholder
    }

    #[inline]
    pub fn clear_incomplete(&self) -> bool {
        self.clear_incomplete
    }

    /// The mask with all slots replaced by the glyphs.
    pub fn placeholder(&self) -> String {
        self.pattern.placeholder(&self.glyphs)
    }

    /// Validator for this configuration.
    pub fn validator(&self) -> MaskValidator<'_> {
        MaskValidator {
            pattern: &self.pattern,
            registry: &self.registry,
            glyphs: &self.glyphs,
            mask_placeholder: self.mask_placeholder,
        }
    }
}
