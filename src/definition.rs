//!
//! Mask symbols and the validators behind them.
//!
//! Built-in symbols:
//!
//! * `9`: digit
//! * `a`: letter, including the polish letters `żźąćśńółę`, any case
//! * `*`: letter or digit
//!
//! Custom symbols carry a regular expression that is tested against
//! a single grapheme of the input. They replace a built-in with the
//! same symbol.
//!

use crate::MaskError;
use log::debug;
use regex::Regex;
use rustc_hash::FxHashMap;
use std::fmt;
use std::fmt::{Display, Formatter};
use unicode_segmentation::UnicodeSegmentation;

/// Letters accepted by `a` and `*` besides a-z.
const EXTRA_LETTERS: &str = "żźąćśńółę";

/// Test for one grapheme of the input.
#[derive(Debug, Clone)]
pub enum CharValidator {
    /// 0-9
    Digit,
    /// a-z and the polish letters, any case.
    Letter,
    /// Letter or digit.
    LetterOrDigit,
    /// Custom regex. Matches anywhere in the grapheme.
    Pattern(Regex),
}

impl Display for CharValidator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CharValidator::Digit => write!(f, "\\d"),
            CharValidator::Letter => write!(f, "[a-z{}]", EXTRA_LETTERS),
            CharValidator::LetterOrDigit => write!(f, "[a-z{}0-9]", EXTRA_LETTERS),
            CharValidator::Pattern(re) => write!(f, "{}", re.as_str()),
        }
    }
}

impl CharValidator {
    /// Compile a custom validator.
    pub fn pattern(symbol: &str, source: &str) -> Result<Self, MaskError> {
        match Regex::new(source) {
            Ok(re) => Ok(CharValidator::Pattern(re)),
            Err(e) => Err(MaskError::InvalidValidator {
                symbol: symbol.to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// Does the grapheme pass?
    ///
    /// An empty grapheme never passes, not even for a regex that
    /// would match the empty string.
    pub fn is_valid(&self, grapheme: &str) -> bool {
        if grapheme.is_empty() {
            return false;
        }
        match self {
            CharValidator::Digit => single_char(grapheme).is_some_and(|c| c.is_ascii_digit()),
            CharValidator::Letter => single_char(grapheme).is_some_and(is_letter),
            CharValidator::LetterOrDigit => {
                single_char(grapheme).is_some_and(|c| c.is_ascii_digit() || is_letter(c))
            }
            CharValidator::Pattern(re) => re.is_match(grapheme),
        }
    }

    /// Built-in or compiled from a regex?
    pub fn is_builtin(&self) -> bool {
        !matches!(self, CharValidator::Pattern(_))
    }
}

fn single_char(grapheme: &str) -> Option<char> {
    let mut it = grapheme.chars();
    match (it.next(), it.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn is_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || c.to_lowercase().all(|l| EXTRA_LETTERS.contains(l))
}

/// One mask symbol.
#[derive(Debug, Clone)]
pub struct MaskDefinition {
    /// Symbol as used in the mask.
    pub symbol: Box<str>,
    /// Test for the input at this position.
    pub validator: CharValidator,
}

/// All symbols that can be used as slots in a mask.
///
/// Built once from the built-ins and the custom definitions
/// and never changed afterward.
#[derive(Debug, Clone)]
pub struct MaskRegistry {
    defs: FxHashMap<Box<str>, MaskDefinition>,
}

impl Default for MaskRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl MaskRegistry {
    /// Only the built-in symbols.
    pub fn builtin() -> Self {
        let mut defs = FxHashMap::default();
        for (symbol, validator) in [
            ("9", CharValidator::Digit),
            ("a", CharValidator::Letter),
            ("*", CharValidator::LetterOrDigit),
        ] {
            defs.insert(
                Box::from(symbol),
                MaskDefinition {
                    symbol: Box::from(symbol),
                    validator,
                },
            );
        }
        Self { defs }
    }

    /// Built-ins plus the custom (symbol, regex) pairs.
    ///
    /// Custom symbols win over a built-in with the same symbol.
    pub fn resolve<I, S, P>(custom: I) -> Result<Self, MaskError>
    where
        I: IntoIterator<Item = (S, P)>,
        S: AsRef<str>,
        P: AsRef<str>,
    {
        let mut registry = Self::builtin();
        for (symbol, pattern) in custom {
            registry.define(symbol.as_ref(), pattern.as_ref())?;
        }
        Ok(registry)
    }

    fn define(&mut self, symbol: &str, pattern: &str) -> Result<(), MaskError> {
        if symbol.graphemes(true).count() != 1 {
            return Err(MaskError::InvalidSymbol(symbol.to_string()));
        }
        let validator = CharValidator::pattern(symbol, pattern)?;
        if self.defs.contains_key(symbol) {
            debug!("custom mask '{}' replaces the built-in", symbol);
        }
        self.defs.insert(
            Box::from(symbol),
            MaskDefinition {
                symbol: Box::from(symbol),
                validator,
            },
        );
        Ok(())
    }

    /// Is this grapheme a slot symbol?
    #[inline]
    pub fn is_slot(&self, grapheme: &str) -> bool {
        self.defs.contains_key(grapheme)
    }

    /// Validator for the symbol.
    #[inline]
    pub fn validator_for(&self, symbol: &str) -> Option<&CharValidator> {
        self.defs.get(symbol).map(|v| &v.validator)
    }

    /// Complete definition.
    #[inline]
    pub fn definition(&self, symbol: &str) -> Option<&MaskDefinition> {
        self.defs.get(symbol)
    }

    /// All symbols, in no particular order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> + '_ {
        self.defs.keys().map(|v| v.as_ref())
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Never true for a resolved registry.
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

/// Split the comma separated lists of custom symbols and validators
/// into pairs.
///
/// The validators are taken verbatim, so a regex can't contain a ','.
/// Use [MaskOptions::custom_masks](crate::MaskOptions::custom_masks)
/// for those.
pub fn parse_custom_masks(
    masks: &str,
    validators: &str,
) -> Result<Vec<(String, String)>, MaskError> {
    let masks = masks.split(',').collect::<Vec<_>>();
    let validators = validators.split(',').collect::<Vec<_>>();
    if masks.len() != validators.len() {
        return Err(MaskError::CustomMaskMismatch {
            masks: masks.len(),
            validators: validators.len(),
        });
    }
    Ok(masks
        .into_iter()
        .zip(validators)
        .map(|(m, v)| (m.to_string(), v.to_string()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin() {
        let r = MaskRegistry::builtin();
        assert_eq!(r.len(), 3);
        assert!(r.is_slot("9"));
        assert!(r.is_slot("a"));
        assert!(r.is_slot("*"));
        assert!(!r.is_slot("-"));
        assert!(!r.is_slot("A"));

        let d = r.validator_for("9").expect("digit");
        assert!(d.is_valid("0"));
        assert!(d.is_valid("9"));
        assert!(!d.is_valid("a"));
        assert!(!d.is_valid(""));
        assert!(!d.is_valid("12"));

        let l = r.validator_for("a").expect("letter");
        assert!(l.is_valid("x"));
        assert!(l.is_valid("X"));
        assert!(l.is_valid("ż"));
        assert!(l.is_valid("Ł"));
        assert!(l.is_valid("Ę"));
        assert!(!l.is_valid("ä"));
        assert!(!l.is_valid("1"));
        assert!(!l.is_valid("_"));

        let a = r.validator_for("*").expect("alnum");
        assert!(a.is_valid("x"));
        assert!(a.is_valid("7"));
        assert!(a.is_valid("ó"));
        assert!(!a.is_valid("-"));
        assert!(!a.is_valid(" "));
    }

    #[test]
    fn test_custom() {
        let r = MaskRegistry::resolve([("#", "[0-9a-fA-F]")]).expect("valid");
        assert_eq!(r.len(), 4);
        assert!(r.symbols().any(|v| v == "#"));
        assert!(r.definition("#").is_some_and(|v| v.symbol.as_ref() == "#"));
        let h = r.validator_for("#").expect("hex");
        assert!(!h.is_builtin());
        assert!(h.is_valid("a"));
        assert!(h.is_valid("F"));
        assert!(h.is_valid("0"));
        assert!(!h.is_valid("g"));
        assert_eq!(h.to_string(), "[0-9a-fA-F]");
    }

    #[test]
    fn test_override() {
        let r = MaskRegistry::resolve([("9", "[0-5]")]).expect("valid");
        assert_eq!(r.len(), 3);
        assert!(r.is_slot("9"));
        let d = r.validator_for("9").expect("digit");
        assert!(d.is_valid("5"));
        assert!(!d.is_valid("6"));
    }

    #[test]
    fn test_invalid() {
        assert_eq!(
            MaskRegistry::resolve([("##", "x")]).err(),
            Some(MaskError::InvalidSymbol("##".into()))
        );
        assert_eq!(
            MaskRegistry::resolve([("", "x")]).err(),
            Some(MaskError::InvalidSymbol("".into()))
        );
        assert!(matches!(
            MaskRegistry::resolve([("#", "[0-9")]),
            Err(MaskError::InvalidValidator { .. })
        ));
    }

    #[test]
    fn test_parse_custom() {
        assert_eq!(
            parse_custom_masks("#", "[0-9a-f]").expect("valid"),
            vec![("#".to_string(), "[0-9a-f]".to_string())]
        );
        assert_eq!(
            parse_custom_masks("#,x", "[0-9a-f],[xyz]").expect("valid"),
            vec![
                ("#".to_string(), "[0-9a-f]".to_string()),
                ("x".to_string(), "[xyz]".to_string())
            ]
        );
        assert_eq!(
            parse_custom_masks("#,x", "[0-9a-f]"),
            Err(MaskError::CustomMaskMismatch {
                masks: 2,
                validators: 1
            })
        );
    }
}
