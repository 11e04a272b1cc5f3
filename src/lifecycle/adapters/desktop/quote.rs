//! AppleScript string literal quoting.

/// Quotes a value as an AppleScript string literal.
///
/// Backslashes and double quotes are escaped; everything else, including
/// newlines and non-ASCII text, is kept as is.
#[must_use]
pub fn applescript_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        if matches!(ch, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::applescript_quote;

    #[test]
    fn quotes_empty_string() {
        assert_eq!(applescript_quote(""), "\"\"");
    }

    #[test]
    fn escapes_double_quotes() {
        assert_eq!(applescript_quote("say \"hi\""), "\"say \\\"hi\\\"\"");
    }

    #[test]
    fn escapes_backslashes() {
        assert_eq!(applescript_quote("a\\b"), "\"a\\\\b\"");
    }

    #[test]
    fn preserves_unicode_and_dollar() {
        assert_eq!(applescript_quote("repoA--修复$40"), "\"repoA--修复$40\"");
    }
}
