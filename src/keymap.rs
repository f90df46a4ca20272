use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// QWERTY physical key -> Dvorak character, including the shifted variants
/// the shift key already resolves before the event reaches us (`Shift+q`
/// arrives as `Q`, `Shift+,` arrives as `<`).
///
/// Digits are identity entries so the table stays total over the printable
/// main block. Shifted symbols with no Dvorak-specific target (`!`, `@`,
/// `{`, ...) are deliberately absent and fall through to identity.
const QWERTY_TO_DVORAK: &[(char, char)] = &[
    // Letter keys
    ('q', '\''),
    ('w', ','),
    ('e', '.'),
    ('r', 'p'),
    ('t', 'y'),
    ('y', 'f'),
    ('u', 'g'),
    ('i', 'c'),
    ('o', 'r'),
    ('p', 'l'),
    ('a', 'a'),
    ('s', 'o'),
    ('d', 'e'),
    ('f', 'u'),
    ('g', 'i'),
    ('h', 'd'),
    ('j', 'h'),
    ('k', 't'),
    ('l', 'n'),
    ('z', ';'),
    ('x', 'q'),
    ('c', 'j'),
    ('v', 'k'),
    ('b', 'x'),
    ('n', 'b'),
    ('m', 'm'),
    // Punctuation keys
    (';', 's'),
    ('\'', '-'),
    (',', 'w'),
    ('.', 'v'),
    ('/', 'z'),
    ('[', '/'),
    (']', '='),
    ('\\', '\\'),
    ('`', '`'),
    ('-', '['),
    ('=', ']'),
    // Digit row (unchanged on Dvorak)
    ('1', '1'),
    ('2', '2'),
    ('3', '3'),
    ('4', '4'),
    ('5', '5'),
    ('6', '6'),
    ('7', '7'),
    ('8', '8'),
    ('9', '9'),
    ('0', '0'),
    // Shifted letter keys
    ('Q', '"'),
    ('W', '<'),
    ('E', '>'),
    ('R', 'P'),
    ('T', 'Y'),
    ('Y', 'F'),
    ('U', 'G'),
    ('I', 'C'),
    ('O', 'R'),
    ('P', 'L'),
    ('A', 'A'),
    ('S', 'O'),
    ('D', 'E'),
    ('F', 'U'),
    ('G', 'I'),
    ('H', 'D'),
    ('J', 'H'),
    ('K', 'T'),
    ('L', 'N'),
    ('Z', ':'),
    ('X', 'Q'),
    ('C', 'J'),
    ('V', 'K'),
    ('B', 'X'),
    ('N', 'B'),
    ('M', 'M'),
    // Shifted punctuation keys
    ('<', 'W'),
    ('>', 'V'),
    ('?', 'Z'),
    (':', 'S'),
    ('"', '_'),
];

/// An immutable raw-symbol -> target-character substitution table.
///
/// The table is plain data so alternate target layouts can be swapped in
/// without touching the session code.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeyMapping {
    pub name: String,
    table: HashMap<char, char>,
}

impl KeyMapping {
    pub fn qwerty_to_dvorak() -> Self {
        Self::from_pairs("qwerty-to-dvorak", QWERTY_TO_DVORAK.iter().copied())
    }

    pub fn from_pairs(name: &str, pairs: impl IntoIterator<Item = (char, char)>) -> Self {
        Self {
            name: name.to_string(),
            table: pairs.into_iter().collect(),
        }
    }

    pub fn get(&self, raw: char) -> Option<char> {
        self.table.get(&raw).copied()
    }

    pub fn contains(&self, raw: char) -> bool {
        self.table.contains_key(&raw)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Default for KeyMapping {
    fn default() -> Self {
        Self::qwerty_to_dvorak()
    }
}

/// Translates raw input symbols into target-layout characters.
///
/// Translation must be disabled when the operating system already applies
/// the layout transform, otherwise both transforms compound. That choice
/// belongs to the user, so `enabled` is an explicit setting rather than
/// something inferred at runtime.
#[derive(Clone, Debug)]
pub struct KeyMapper {
    mapping: KeyMapping,
    enabled: bool,
}

impl KeyMapper {
    pub fn new(mapping: KeyMapping) -> Self {
        Self {
            mapping,
            enabled: true,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn mapping(&self) -> &KeyMapping {
        &self.mapping
    }

    /// Resolve a raw symbol to its target character.
    ///
    /// Direct table hits win. An uppercase letter missing from the table is
    /// derived by mapping its lowercase form and upper-casing the result.
    /// Anything else (control characters, symbols outside the source
    /// layout) passes through unchanged; there is no failure case.
    pub fn translate(&self, raw: char) -> char {
        if !self.enabled {
            return raw;
        }
        if let Some(mapped) = self.mapping.get(raw) {
            return mapped;
        }
        if raw.is_uppercase() {
            let lower = raw.to_lowercase().next().unwrap_or(raw);
            if let Some(mapped) = self.mapping.get(lower) {
                return mapped.to_uppercase().next().unwrap_or(mapped);
            }
        }
        raw
    }
}

impl Default for KeyMapper {
    fn default() -> Self {
        Self::new(KeyMapping::default())
    }
}
