//! Question label cleanup.
//!
//! AMC question identifiers may only hold ASCII letters, digits, spaces,
//! `:` and `-`. Moodle question names are free text, so names are folded to
//! ASCII before they are used as labels.
//!
//! # Examples
//!
//! ```rust
//! use quizconv::text::clean_q_name;
//!
//! assert_eq!(clean_q_name("Làbêl:a/b@[cœ]%"), "Label:a b coe");
//! ```
use phf::phf_map;

/// Accented Latin letters and their base letter.
///
/// Letters whose compatibility decomposition has no base letter (`ø`, `ł`,
/// `đ`) are not listed and survive accent removal.
static ACCENT_MAP: phf::Map<char, char> = phf_map! {
    // Latin-1 Supplement
    'À' => 'A', 'Á' => 'A', 'Â' => 'A', 'Ã' => 'A', 'Ä' => 'A', 'Å' => 'A',
    'Ç' => 'C',
    'È' => 'E', 'É' => 'E', 'Ê' => 'E', 'Ë' => 'E',
    'Ì' => 'I', 'Í' => 'I', 'Î' => 'I', 'Ï' => 'I',
    'Ñ' => 'N',
    'Ò' => 'O', 'Ó' => 'O', 'Ô' => 'O', 'Õ' => 'O', 'Ö' => 'O',
    'Ù' => 'U', 'Ú' => 'U', 'Û' => 'U', 'Ü' => 'U',
    'Ý' => 'Y',
    'à' => 'a', 'á' => 'a', 'â' => 'a', 'ã' => 'a', 'ä' => 'a', 'å' => 'a',
    'ç' => 'c',
    'è' => 'e', 'é' => 'e', 'ê' => 'e', 'ë' => 'e',
    'ì' => 'i', 'í' => 'i', 'î' => 'i', 'ï' => 'i',
    'ñ' => 'n',
    'ò' => 'o', 'ó' => 'o', 'ô' => 'o', 'õ' => 'o', 'ö' => 'o',
    'ù' => 'u', 'ú' => 'u', 'û' => 'u', 'ü' => 'u',
    'ý' => 'y', 'ÿ' => 'y',

    // Latin Extended-A
    'Ā' => 'A', 'ā' => 'a', 'Ă' => 'A', 'ă' => 'a', 'Ą' => 'A', 'ą' => 'a',
    'Ć' => 'C', 'ć' => 'c', 'Ĉ' => 'C', 'ĉ' => 'c', 'Ċ' => 'C', 'ċ' => 'c', 'Č' => 'C', 'č' => 'c',
    'Ď' => 'D', 'ď' => 'd',
    'Ē' => 'E', 'ē' => 'e', 'Ĕ' => 'E', 'ĕ' => 'e', 'Ė' => 'E', 'ė' => 'e', 'Ę' => 'E', 'ę' => 'e', 'Ě' => 'E', 'ě' => 'e',
    'Ĝ' => 'G', 'ĝ' => 'g', 'Ğ' => 'G', 'ğ' => 'g', 'Ġ' => 'G', 'ġ' => 'g', 'Ģ' => 'G', 'ģ' => 'g',
    'Ĥ' => 'H', 'ĥ' => 'h',
    'Ĩ' => 'I', 'ĩ' => 'i', 'Ī' => 'I', 'ī' => 'i', 'Ĭ' => 'I', 'ĭ' => 'i', 'Į' => 'I', 'į' => 'i', 'İ' => 'I',
    'Ĵ' => 'J', 'ĵ' => 'j',
    'Ķ' => 'K', 'ķ' => 'k',
    'Ĺ' => 'L', 'ĺ' => 'l', 'Ļ' => 'L', 'ļ' => 'l', 'Ľ' => 'L', 'ľ' => 'l',
    'Ń' => 'N', 'ń' => 'n', 'Ņ' => 'N', 'ņ' => 'n', 'Ň' => 'N', 'ň' => 'n',
    'Ō' => 'O', 'ō' => 'o', 'Ŏ' => 'O', 'ŏ' => 'o', 'Ő' => 'O', 'ő' => 'o',
    'Ŕ' => 'R', 'ŕ' => 'r', 'Ŗ' => 'R', 'ŗ' => 'r', 'Ř' => 'R', 'ř' => 'r',
    'Ś' => 'S', 'ś' => 's', 'Ŝ' => 'S', 'ŝ' => 's', 'Ş' => 'S', 'ş' => 's', 'Š' => 'S', 'š' => 's',
    'Ţ' => 'T', 'ţ' => 't', 'Ť' => 'T', 'ť' => 't',
    'Ũ' => 'U', 'ũ' => 'u', 'Ū' => 'U', 'ū' => 'u', 'Ŭ' => 'U', 'ŭ' => 'u', 'Ů' => 'U', 'ů' => 'u',
    'Ű' => 'U', 'ű' => 'u', 'Ų' => 'U', 'ų' => 'u',
    'Ŵ' => 'W', 'ŵ' => 'w',
    'Ŷ' => 'Y', 'ŷ' => 'y', 'Ÿ' => 'Y',
    'Ź' => 'Z', 'ź' => 'z', 'Ż' => 'Z', 'ż' => 'z', 'Ž' => 'Z', 'ž' => 'z',
};

/// European characters with an ASCII spelling.
static NON_ASCII_MAP: phf::Map<char, &'static str> = phf_map! {
    'œ' => "oe",
    'Œ' => "OE",
    'æ' => "ae",
    'Æ' => "AE",
    '€' => " Euros",
    'ß' => "ss",
    '¿' => "?",
};

/// Combining diacritical marks left over from decomposed input.
#[inline]
fn is_combining_mark(c: char) -> bool {
    matches!(c, '\u{0300}'..='\u{036F}')
}

/// Strip accents, keeping the base letter.
pub fn remove_accent(s: &str) -> String {
    s.chars()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| ACCENT_MAP.get(&c).copied().unwrap_or(c))
        .collect()
}

/// Spell out the few European characters that have an ASCII equivalent.
///
/// Other characters are kept.
pub fn remove_non_ascii(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match NON_ASCII_MAP.get(&c) {
            Some(replacement) => out.push_str(replacement),
            None => out.push(c),
        }
    }
    out
}

#[inline]
fn is_label_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == ':' || c == '-'
}

/// Replace every run of characters other than ASCII alphanumerics, `:` and
/// `-` with a single space.
pub fn remove_non_alphanum(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_run = false;
    for c in s.chars() {
        if is_label_char(c) {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push(' ');
            in_run = true;
        }
    }
    out
}

/// Turn a free-text question name into a valid AMC label.
pub fn clean_q_name(s: &str) -> String {
    let out = remove_non_alphanum(&remove_non_ascii(&remove_accent(s)));
    out.trim().to_string()
}
