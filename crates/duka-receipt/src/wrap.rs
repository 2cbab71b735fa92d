//! # Name Wrapping
//!
//! Product names on a receipt are word-wrapped to a fixed number of
//! characters so the quantity and price columns never collide with text.
//!
//! ```text
//! width = 20
//!
//! "Orthopedic Knee Brace with Hinged Support"
//!   ──►  "Orthopedic Knee"
//!        "Brace with Hinged"
//!        "Support"
//!
//! "Supercalifragilisticexpialidocious"
//!   ──►  "Supercalifragilistic"      (hard split, no space to break on)
//!        "expialidocious"
//! ```

/// Default wrap width in characters.
pub const DEFAULT_WRAP_WIDTH: usize = 35;

/// Wraps `name` into lines of at most `width` characters.
///
/// Always returns at least one line (empty for a blank name). Runs of
/// whitespace collapse to a single space.
pub fn wrap_name(name: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in name.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
        if needed > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word.iter());
        current_len += word.len();
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}
