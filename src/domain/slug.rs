//! URL slug helpers shared by categories and products.

use rand::Rng;
use unicode_normalization::char::{decompose_compatible, is_combining_mark};

/// Symbols used for the random category slug prefix.
const TOKEN_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Number of random symbols prefixed to generated category slugs.
pub const TOKEN_LEN: usize = 3;

/// Marker inserted between the random token and the category name.
pub const CATEGORY_SLUG_MARKER: &str = "-PickBetter";

/// Generate a random token of [`TOKEN_LEN`] lowercase ASCII letters and digits.
pub fn random_token<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..TOKEN_LEN)
        .map(|_| TOKEN_ALPHABET[rng.random_range(0..TOKEN_ALPHABET.len())] as char)
        .collect()
}

/// Build a randomized slug for a category named `name`.
///
/// The result is `slugify(token + CATEGORY_SLUG_MARKER + name)`, so two
/// categories with the same name will usually end up with different slugs.
/// Uniqueness is not guaranteed here; callers check it against the store.
pub fn category_slug<R: Rng + ?Sized>(rng: &mut R, name: &str) -> String {
    let token = random_token(rng);
    slugify(&format!("{token}{CATEGORY_SLUG_MARKER}{name}"))
}

/// Normalize arbitrary text into a lowercase, hyphen separated slug.
///
/// Cyrillic letters are transliterated and other letters are folded to ASCII
/// through NFKD decomposition, so `Crème brûlée` becomes `creme-brulee`.
/// ASCII letters, digits and underscores are kept, whitespace and hyphen runs
/// collapse into one `-` and all other characters are dropped.
pub fn slugify(input: &str) -> String {
    let folded = fold_to_ascii(input);
    let mut slug = String::with_capacity(folded.len());
    let mut pending_separator = false;

    for ch in folded.chars() {
        if ch.is_whitespace() || ch == '-' {
            pending_separator = true;
            continue;
        }
        if !(ch.is_ascii_alphanumeric() || ch == '_') {
            continue;
        }

        if pending_separator && !slug.is_empty() {
            slug.push('-');
        }
        pending_separator = false;
        slug.push(ch);
    }

    slug.trim_matches(|ch| ch == '-' || ch == '_').to_string()
}

/// Returns `true` when `value` is already in the form produced by [`slugify`].
pub fn is_valid_slug(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' || ch == '_')
        && !value.starts_with('-')
        && !value.ends_with('-')
        && !value.contains("--")
}

/// Lowercase `input`, transliterate Cyrillic and strip combining marks.
fn fold_to_ascii(input: &str) -> String {
    let mut folded = String::with_capacity(input.len());

    for ch in input.chars().flat_map(char::to_lowercase) {
        // Transliterate before decomposing: `й` would otherwise lose its breve.
        if let Some(latin) = transliterate(ch) {
            folded.push_str(latin);
            continue;
        }
        decompose_compatible(ch, |part| {
            if !is_combining_mark(part) {
                folded.push(part);
            }
        });
    }

    folded
}

fn transliterate(ch: char) -> Option<&'static str> {
    let latin = match ch {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' | 'ё' | 'э' => "e",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "y",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "kh",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "shch",
        'ы' => "y",
        'ю' => "yu",
        'я' => "ya",
        'ъ' | 'ь' => "",
        _ => return None,
    };
    Some(latin)
}
