//! Greedy word wrap

/// Break `text` into lines no wider than `max_width` where possible.
///
/// Tokens are whitespace-separated words joined by single spaces. A token is
/// never split, so a word wider than `max_width` sits alone on its own line.
/// The last line is always emitted. Blank text yields no lines.
pub fn wrap_lines<F>(text: &str, max_width: f32, mut measure: F) -> Vec<String>
where
    F: FnMut(&str) -> f32,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if measure(&candidate) > max_width && !current.is_empty() {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn chars(text: &str) -> f32 {
        text.chars().count() as f32
    }

    #[test]
    fn test_fits_on_one_line() {
        let lines = wrap_lines("Lumen Arc Smart Lamp", 100.0, chars);
        assert_eq!(lines, vec!["Lumen Arc Smart Lamp"]);
    }

    #[test]
    fn test_narrow_width_puts_each_token_on_its_own_line() {
        let lines = wrap_lines("Lumen Arc Smart Lamp", 1.0, chars);
        assert_eq!(lines, vec!["Lumen", "Arc", "Smart", "Lamp"]);
    }

    #[test]
    fn test_greedy_fill() {
        // "aa bb" = 5 fits, "aa bb cc" = 8 does not
        let lines = wrap_lines("aa bb cc dd ee", 5.0, chars);
        assert_eq!(lines, vec!["aa bb", "cc dd", "ee"]);
    }

    #[test]
    fn test_exact_width_is_not_wrapped() {
        let lines = wrap_lines("abc def", 7.0, chars);
        assert_eq!(lines, vec!["abc def"]);
    }

    #[test]
    fn test_whitespace_runs_collapse() {
        let lines = wrap_lines("  one \t two\nthree  ", 100.0, chars);
        assert_eq!(lines, vec!["one two three"]);
    }

    #[test]
    fn test_blank_text_has_no_lines() {
        assert!(wrap_lines("", 100.0, chars).is_empty());
        assert!(wrap_lines("   ", 100.0, chars).is_empty());
    }

    #[test]
    fn test_oversized_first_token_is_kept_whole() {
        let lines = wrap_lines("Uncompromising by design", 6.0, chars);
        assert_eq!(lines, vec!["Uncompromising", "by", "design"]);
    }
}
