//! URL slugification.
//!
//! Converts titles, file stems and taxonomy terms to URL-safe slugs.

use deunicode::deunicode;

/// Convert text to a URL-safe slug.
///
/// Transliterates unicode to ASCII, lowercases, and collapses every run of
/// non-alphanumeric characters into a single `-`.
///
/// | Input | Output |
/// |-------|--------|
/// | `Hello, World!` | `hello-world` |
/// | `PCA & t-SNE`   | `pca-t-sne`   |
/// | `你好世界`       | `ni-hao-shi-jie` |
pub fn slugify(text: &str) -> String {
    let ascii = deunicode(text);
    let mut slug = String::with_capacity(ascii.len());
    let mut prev_dash = true;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            prev_dash = false;
        } else if !prev_dash {
            slug.push('-');
            prev_dash = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Append a numeric suffix: `hello` + 2 → `hello-2`.
pub fn with_suffix(slug: &str, n: usize) -> String {
    format!("{slug}-{n}")
}
