//! Char-cap truncation applied to assembled sections.

/// A section being accumulated for total-cap processing.
pub struct Section {
    pub name: String,
    pub content: String,
    pub raw_chars: usize,
    pub truncated: bool,
    pub truncated_total_cap: bool,
    pub placeholder: bool,
}

/// Largest index `<= max` that falls on a UTF-8 char boundary.
fn floor_boundary(s: &str, max: usize) -> usize {
    if max >= s.len() {
        return s.len();
    }
    let mut i = max;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Per-section truncation.
///
/// If `content` exceeds `max_chars`, truncate at a valid UTF-8 boundary
/// and append a visible `[truncated]` marker.
pub fn truncate_section(content: &str, max_chars: usize) -> (String, bool) {
    if content.len() <= max_chars {
        return (content.to_string(), false);
    }
    let boundary = floor_boundary(content, max_chars);
    let mut result = content[..boundary].to_string();
    result.push_str("\n[truncated]");
    (result, true)
}

/// Apply the total bundle cap across sections in order. Earlier sections
/// (persona, summary) win; later sections are cut down or dropped.
pub fn apply_total_cap(sections: &mut [Section], total_max_chars: usize) {
    let mut accumulated: usize = 0;

    for section in sections.iter_mut() {
        let len = section.content.len();

        if accumulated + len <= total_max_chars {
            accumulated += len;
        } else if accumulated < total_max_chars {
            let remaining = total_max_chars - accumulated;
            let boundary = floor_boundary(&section.content, remaining);
            section.content = format!("{}\n[truncated]", &section.content[..boundary]);
            section.truncated_total_cap = true;
            accumulated = total_max_chars;
        } else {
            section.content.clear();
            section.truncated_total_cap = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(name: &str, content: &str) -> Section {
        Section {
            name: name.into(),
            content: content.into(),
            raw_chars: content.len(),
            truncated: false,
            truncated_total_cap: false,
            placeholder: false,
        }
    }

    #[test]
    fn no_truncation_under_limit() {
        let (result, truncated) = truncate_section("hello world", 100);
        assert_eq!(result, "hello world");
        assert!(!truncated);
    }

    #[test]
    fn truncates_at_limit() {
        let (result, truncated) = truncate_section("abcdefghij", 5);
        assert!(truncated);
        assert!(result.starts_with("abcde"));
        assert!(result.contains("[truncated]"));
    }

    #[test]
    fn truncation_respects_utf8_boundaries() {
        // Multi-byte char straddling the cap must not split.
        let content = "ab\u{00e9}cd"; // é is 2 bytes, at byte offsets 2..4
        let (result, truncated) = truncate_section(content, 3);
        assert!(truncated);
        assert!(result.starts_with("ab"));
    }

    #[test]
    fn total_cap_cuts_later_sections_first() {
        let mut sections = vec![section("a", "aaaa"), section("b", "bbbb"), section("c", "cccc")];
        apply_total_cap(&mut sections, 6);
        assert_eq!(sections[0].content, "aaaa");
        assert!(sections[1].truncated_total_cap);
        assert!(sections[2].content.is_empty());
    }
}
