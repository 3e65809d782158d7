//! URL slugs for posts and tags

use rand::Rng;

const MAX_SLUG_LEN: usize = 80;

/// Lowercase ASCII slug: alphanumerics separated by single hyphens.
///
/// Non-ASCII letters are dropped, so a title made only of them yields an
/// empty string; callers fall back to a generated slug in that case.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len().min(MAX_SLUG_LEN));
    let mut pending_hyphen = false;

    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
        if slug.len() >= MAX_SLUG_LEN {
            break;
        }
    }

    slug
}

/// Append a short random suffix, used when a slug is already taken
pub fn with_random_suffix(base: &str) -> String {
    const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..6)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect();

    if base.is_empty() {
        format!("post-{suffix}")
    } else {
        format!("{base}-{suffix}")
    }
}
