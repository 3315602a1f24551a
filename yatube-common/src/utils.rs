/// Maximum length of a group slug
pub const SLUG_MAX_LENGTH: usize = 100;

/// Latin spelling of a lowercase Cyrillic letter, or `None` for anything else.
fn transliterate(c: char) -> Option<&'static str> {
    let latin = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' | 'ґ' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'є' => "ye",
        'ж' => "zh",
        'з' => "z",
        'и' | 'і' => "i",
        'ї' => "yi",
        'й' => "j",
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
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' | 'ь' => "",
        'ы' => "y",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    };
    Some(latin)
}

/// Turns a title into a lowercase, URL-safe slug.
///
/// Cyrillic letters are transliterated and ASCII letters and digits are kept.
/// Runs of whitespace, hyphens and underscores become a single hyphen, and
/// everything else is dropped. The result is at most [`SLUG_MAX_LENGTH`]
/// characters long and may be empty if nothing in the title survives.
pub fn slugify(title: &str) -> String {
    fn push(slug: &mut String, part: &str, separator: &mut bool) {
        if part.is_empty() {
            return;
        }
        if *separator && !slug.is_empty() {
            slug.push('-');
        }
        *separator = false;
        slug.push_str(part);
    }

    let mut slug = String::with_capacity(title.len());
    let mut separator = false;

    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            let mut buf = [0; 4];
            push(&mut slug, c.encode_utf8(&mut buf), &mut separator);
        } else if let Some(latin) = transliterate(c) {
            push(&mut slug, latin, &mut separator);
        } else if c.is_whitespace() || c == '-' || c == '_' {
            separator = true;
        }
    }

    // only ASCII is left at this point, so byte offsets are char offsets
    slug.truncate(SLUG_MAX_LENGTH);
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Checks that a user supplied slug only uses lowercase URL-safe characters.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= SLUG_MAX_LENGTH
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

/// Shortens a string to at most `max` characters, on a char boundary.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
