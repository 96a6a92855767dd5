use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rat_inputmask::{EditContext, EditKind, MaskConfig, MaskOptions, MaskToken, Validated};
use unicode_segmentation::UnicodeSegmentation;

fn config(mask: &str, mask_placeholder: bool) -> MaskConfig {
    MaskOptions::new()
        .input_mask(mask)
        .mask_placeholder(mask_placeholder)
        .resolve()
        .expect("config")
}

fn edit(
    cfg: &MaskConfig,
    previous: &str,
    placeholder_text: &str,
    candidate: &str,
    caret: u32,
) -> Validated {
    cfg.validator().validate(
        candidate,
        &EditContext {
            previous,
            placeholder_text,
            caret,
        },
    )
}

fn glen(s: &str) -> u32 {
    s.graphemes(true).count() as u32
}

#[test]
fn test_phone() {
    let cfg = config("(999) 999-9999", false);

    let v = edit(&cfg, "", "", "2", 1);
    assert_eq!(v.clean, "(2");
    assert_eq!(v.display, "(2");
    assert_eq!(v.caret, 2);
    assert_eq!(v.edit, EditKind::Insert);
    assert!(!v.is_empty);
    assert!(!v.is_completed);

    let v = edit(&cfg, "(20", "", "(202", 4);
    assert_eq!(v.clean, "(202) ");
    assert_eq!(v.caret, 6);

    let v = edit(&cfg, "(202) 555-123", "", "(202) 555-1234", 14);
    assert_eq!(v.clean, "(202) 555-1234");
    assert_eq!(v.caret, 14);
    assert!(v.is_completed);

    let v = edit(&cfg, "(202) 555-1234", "", "(202) 555-12345", 15);
    assert_eq!(v.clean, "(202) 555-1234");
    assert!(v.is_completed);
}

#[test]
fn test_reject() {
    let cfg = config("(999) 999-9999", false);

    let v = edit(&cfg, "(20", "", "(20x", 4);
    assert_eq!(v.clean, "(20");
    assert_eq!(v.caret, 3);

    let v = edit(&cfg, "", "", "x", 1);
    assert_eq!(v.clean, "(");
    assert!(v.is_empty);
    assert!(!v.is_completed);

    // the rest after a rejected grapheme is gone too.
    let v = edit(&cfg, "(202) 5", "", "(2x02) 5", 3);
    assert_eq!(v.clean, "(2");
}

#[test]
fn test_delete() {
    let cfg = config("(999) 999-9999", false);

    let v = edit(&cfg, "(202) ", "", "(202)", 5);
    assert_eq!(v.edit, EditKind::Delete);
    assert_eq!(v.clean, "(202) ");
    assert_eq!(v.caret, 4);

    let v = edit(&cfg, "(202) 5", "", "(202) ", 6);
    assert_eq!(v.clean, "(202) ");
    assert_eq!(v.caret, 4);

    let v = edit(&cfg, "(2", "", "(", 1);
    assert_eq!(v.clean, "(");
    assert_eq!(v.caret, 1);
    assert!(v.is_empty);
}

#[test]
fn test_replace() {
    let cfg = config("9999", false);

    let v = edit(&cfg, "1234", "", "1x34", 2);
    assert_eq!(v.edit, EditKind::Replace);
    assert_eq!(v.clean, "1");
    assert_eq!(v.caret, 1);

    let v = edit(&cfg, "1234", "", "1534", 2);
    assert_eq!(v.clean, "1534");
    assert_eq!(v.caret, 2);
    assert!(v.is_completed);
}

#[test]
fn test_mask_placeholder() {
    let cfg = config("99/99", true);
    assert_eq!(cfg.placeholder(), "__/__");

    let v = edit(&cfg, "__/__", "__/__", "1__/__", 1);
    assert_eq!(v.clean, "1");
    assert_eq!(v.display, "1_/__");
    assert_eq!(v.caret, 1);

    let v = edit(&cfg, "1_/__", "__/__", "12_/__", 2);
    assert_eq!(v.clean, "12/");
    assert_eq!(v.display, "12/__");
    assert_eq!(v.caret, 3);

    // backspace over the literal
    let v = edit(&cfg, "12/__", "__/__", "12__", 2);
    assert_eq!(v.edit, EditKind::Delete);
    assert_eq!(v.clean, "12/");
    assert_eq!(v.display, "12/__");
    assert_eq!(v.caret, 2);

    let v = edit(&cfg, "12/__", "__/__", "1/__", 1);
    assert_eq!(v.clean, "1");
    assert_eq!(v.display, "1_/__");
    assert_eq!(v.caret, 1);
}

#[test]
fn test_mask_placeholder_prefix() {
    let cfg = config("+48 999", true);
    assert_eq!(cfg.placeholder(), "+48 ___");

    let v = edit(&cfg, "+48 ___", "+48 ___", "5+48 ___", 1);
    assert_eq!(v.clean, "+48 5");
    assert_eq!(v.display, "+48 5__");
    assert_eq!(v.caret, 5);
}

#[test]
fn test_delete_to_prefix() {
    let cfg = config("+48 999", true);

    let v = edit(&cfg, "+48 5__", "+48 ___", "+48 __", 4);
    assert_eq!(v.edit, EditKind::Delete);
    assert_eq!(v.clean, "+48 ");
    assert_eq!(v.display, "+48 ___");
    assert_eq!(v.caret, 4);
    assert!(v.is_empty);

    // typing at the first slot works without the prefix again.
    let v = edit(&cfg, "+48 ___", "+48 ___", "+48 7___", 5);
    assert_eq!(v.clean, "+48 7");
    assert_eq!(v.display, "+48 7__");
    assert_eq!(v.caret, 5);
}

#[test]
fn test_glyphs() {
    let cfg = MaskOptions::new()
        .input_mask("99/99/9999")
        .char_placeholder("dd/mm/yyyy")
        .mask_placeholder(true)
        .resolve()
        .expect("config");
    assert_eq!(cfg.placeholder(), "dd/mm/yyyy");

    let v = cfg.validator().conform("3112");
    assert_eq!(v.clean, "31/12/");
    assert_eq!(v.display, "31/12/yyyy");
}

#[test]
fn test_letters() {
    let cfg = config("aa-99", false);

    let v = edit(&cfg, "ż", "", "żó", 2);
    assert_eq!(v.clean, "żó-");
    assert_eq!(v.caret, 3);

    let v = edit(&cfg, "żó-", "", "żó-7", 4);
    assert_eq!(v.clean, "żó-7");

    let v = edit(&cfg, "", "", "ä", 1);
    assert_eq!(v.clean, "");
    assert!(v.is_empty);
}

#[test]
fn test_no_mask() {
    let cfg = config("", false);
    let v = edit(&cfg, "ab", "", "abc", 3);
    assert_eq!(v.clean, "abc");
    assert_eq!(v.display, "abc");
    assert_eq!(v.caret, 3);
    assert!(!v.is_completed);
}

#[test]
fn test_conform() {
    let cfg = config("(999) 999-9999", false);
    let v = cfg.validator();

    assert_eq!(v.conform("2025551234").clean, "(202) 555-1234");
    assert_eq!(v.conform("(202) 555-1234").clean, "(202) 555-1234");
    assert_eq!(v.conform("202-555-1234").clean, "(202) 555-1234");
    assert!(v.conform("2025551234").is_completed);
    assert_eq!(v.conform("2025551234").caret, 14);
    assert_eq!(v.conform("202555").clean, "(202) 555-");
    assert_eq!(v.conform("").clean, "");
    assert!(v.conform("").is_empty);

    assert_eq!(v.unmask("(202) 555-1234"), "2025551234");
    assert_eq!(v.unmask("(202) 5"), "2025");
}

#[test]
fn test_custom() {
    let cfg = MaskOptions::new()
        .input_mask("##:##")
        .custom("#", "[0-9a-f]")
        .resolve()
        .expect("config");

    assert_eq!(cfg.validator().conform("a1g2f").clean, "a1:2f");
    let v = edit(&cfg, "a1:", "", "a1:g", 4);
    assert_eq!(v.clean, "a1:");
    assert_eq!(v.caret, 3);
}

const MASKS: [&str; 6] = [
    "(999) 999-9999",
    "99/99",
    "aa-99",
    "**:**",
    "+48 999",
    "9a*",
];

const ALPHABET: [&str; 16] = [
    "0", "1", "5", "9", "a", "z", "ż", "X", "-", "/", "(", ")", " ", "_", "+", ":",
];

fn random_str(rng: &mut StdRng) -> String {
    let len = rng.gen_range(0..20);
    let mut buf = String::new();
    for _ in 0..len {
        buf.push_str(ALPHABET[rng.gen_range(0..ALPHABET.len())]);
    }
    buf
}

#[test]
fn test_random_values() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for mask in MASKS {
        for mask_placeholder in [false, true] {
            let cfg = config(mask, mask_placeholder);
            let pattern = cfg.pattern();

            for _ in 0..500 {
                let previous = random_str(&mut rng);
                let candidate = random_str(&mut rng);
                let caret = rng.gen_range(0..=glen(&candidate));
                let v = edit(&cfg, &previous, "", &candidate, caret);

                let len = glen(&v.clean);
                assert!(len <= pattern.len(), "{} {:?}", mask, v);
                assert!(v.caret <= len, "{} {:?}", mask, v);
                assert_eq!(v.is_completed, len == pattern.len());

                // every slot is valid, every literal is the literal.
                for (g, token) in v.clean.graphemes(true).zip(pattern.tokens()) {
                    match token {
                        MaskToken::Slot(symbol) => {
                            let valid = cfg.registry().validator_for(symbol).expect("symbol");
                            assert!(valid.is_valid(g), "{} {:?}", mask, v);
                        }
                        MaskToken::Literal(literal) => {
                            assert_eq!(g, literal.as_ref(), "{} {:?}", mask, v);
                        }
                    }
                }

                if mask_placeholder {
                    assert_eq!(glen(&v.display), pattern.len());
                    assert!(v.display.starts_with(&v.clean));
                } else {
                    assert_eq!(v.display, v.clean);
                }

                // the clean value is stable.
                let again = edit(&cfg, &v.clean, "", &v.clean, len);
                assert_eq!(again.clean, v.clean, "{} {:?}", mask, v);
            }
        }
    }
}

#[test]
fn test_random_deletes() {
    let mut rng = StdRng::seed_from_u64(0xde1);

    for mask in MASKS {
        let cfg = config(mask, false);
        for _ in 0..200 {
            let full = cfg.validator().conform(&random_str(&mut rng)).clean;
            let len = glen(&full);
            if len == 0 {
                continue;
            }
            let shorter = full.graphemes(true).take(len as usize - 1).collect::<String>();
            let v = edit(&cfg, &full, "", &shorter, len - 1);
            assert_eq!(v.edit, EditKind::Delete);

            // the caret stops at the first slot or right after a slot.
            let prefix = cfg.pattern().literal_prefix_len();
            assert!(v.caret >= prefix, "{} {:?}", mask, v);
            if v.caret > prefix {
                let before = cfg.pattern().token(v.caret - 1).expect("token");
                assert!(before.is_slot(), "{} {:?}", mask, v);
            }
        }
    }
}
