//! Text cleanup helpers shared by the prompt builder and artifact writers.

/// Replaces control characters with spaces and collapses whitespace runs.
///
/// `\n`, `\r`, and `\t` become single spaces; other control characters are
/// dropped outright. Applied to every string field of a profile before it is
/// embedded in the AI prompt payload, so upstream bios with embedded newlines
/// cannot break the serialized JSON message.
///
/// Idempotent: cleaning already-clean text is a no-op.
#[must_use]
pub fn clean_control_chars(input: &str) -> String {
    let mapped: String = input
        .chars()
        .filter_map(|c| {
            if matches!(c, '\n' | '\r' | '\t') {
                Some(' ')
            } else if c.is_control() {
                None
            } else {
                Some(c)
            }
        })
        .collect();
    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Reduces a nickname to a filesystem-safe file stem.
///
/// Alphanumeric characters (any script) are kept; everything else becomes
/// `_`. Empty input yields `"unknown"`.
#[must_use]
pub fn safe_file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    if stem.is_empty() {
        "unknown".to_string()
    } else {
        stem
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newlines_tabs_become_spaces() {
        assert_eq!(clean_control_chars("a\nb\tc"), "a b c");
    }

    #[test]
    fn cleaning_is_idempotent() {
        let once = clean_control_chars("a\nb\tc");
        assert_eq!(clean_control_chars(&once), once);
    }

    #[test]
    fn other_control_chars_are_dropped() {
        assert_eq!(clean_control_chars("a\u{0001}b\u{0008}c"), "abc");
    }

    #[test]
    fn whitespace_runs_collapse() {
        assert_eq!(clean_control_chars("a \r\n  b"), "a b");
    }

    #[test]
    fn non_ascii_text_is_preserved() {
        assert_eq!(clean_control_chars("旅行\n记录"), "旅行 记录");
    }

    #[test]
    fn file_stem_replaces_punctuation() {
        assert_eq!(safe_file_stem("user/name:1"), "user_name_1");
    }

    #[test]
    fn file_stem_keeps_cjk() {
        assert_eq!(safe_file_stem("小红书"), "小红书");
    }

    #[test]
    fn empty_name_falls_back() {
        assert_eq!(safe_file_stem(""), "unknown");
    }
}
