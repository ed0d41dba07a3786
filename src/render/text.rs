use crate::foundation::core::Quad;

/// Characters that will be laid out for `text`: ASCII letters (uppercased) and
/// digits; everything else is dropped before columns are assigned.
pub fn drawable_chars(text: &str) -> Vec<char> {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// One column sub-quad per drawable character, left to right.
pub fn layout_columns(quad: &Quad, text: &str) -> Vec<(char, Quad)> {
    let chars = drawable_chars(text);
    let n = chars.len();
    chars
        .into_iter()
        .enumerate()
        .map(|(i, c)| (c, quad.column(i, n)))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
