// src/core/html.rs
// Low-level HTML string helpers, deliberately naive but tailored to the
// history mirror's markup. Case-insensitive on ASCII tag/attribute names.

/// Find the section between an opening tag (with attributes) and its matching
/// closing tag, case-insensitive. Returns the HTML *inside* the tags.
///
/// Example:
/// ```text
/// let table_inner = slice_between_ci(doc, r#"<table class="table-striped""#, "</table>");
/// ```
pub fn slice_between_ci<'a>(s: &'a str, open_pat: &str, close_pat: &str) -> Option<&'a str> {
    let lc = to_lower(s);
    let open_lc = to_lower(open_pat);
    let close_lc = to_lower(close_pat);

    let open_idx = lc.find(&open_lc)?;
    // Jump past the '>' of the opening tag
    let after_open = s[open_idx..].find('>')? + open_idx + 1;
    let close_idx_rel = lc[after_open..].find(&close_lc)?;
    Some(&s[after_open..after_open + close_idx_rel])
}

/// Find the next complete tag block from `from` onwards, case-insensitive.
/// A block runs from the start of the opening tag to the end of the closing
/// tag, e.g. `<tr ...> ... </tr>`.
pub fn next_tag_block_ci(s: &str, open_tag: &str, close_tag: &str, from: usize) -> Option<(usize, usize)> {
    let lc = to_lower(s);
    let open_lc = to_lower(open_tag);
    let close_lc = to_lower(close_tag);

    let start = lc.get(from..)?.find(&open_lc)? + from;
    let open_end = s[start..].find('>')? + start + 1;
    let end_rel = lc[open_end..].find(&close_lc)?;
    let end = open_end + end_rel + close_tag.len();
    Some((start, end))
}

/// Given a complete tag block like `<td ...>INNER</td>`, return the INNER
/// text without the wrapping tags (may still contain nested tags).
pub fn inner_after_open_tag(block: &str) -> String {
    if let Some(open_end) = block.find('>') {
        if let Some(close_start) = block.rfind('<') {
            if close_start > open_end {
                return block[open_end + 1..close_start].to_string();
            }
        }
    }
    String::new()
}

/// Remove all HTML tags `<...>` from the string, then collapse whitespace.
pub fn strip_tags(s: String) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    crate::core::sanitize::normalize_ws(&out)
}

/// Fast ASCII-only lowercasing for tag/attribute matching.
pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_between_finds_table_inner() {
        let doc = r#"<body><TABLE class="table-striped"><tr><td>x</td></tr></TABLE></body>"#;
        let inner = slice_between_ci(doc, r#"<table class="table-striped""#, "</table>").unwrap();
        assert_eq!(inner, "<tr><td>x</td></tr>");
    }

    #[test]
    fn tag_blocks_walk_in_order() {
        let s = "<td>a</td><td>b</td>";
        let (s1, e1) = next_tag_block_ci(s, "<td", "</td>", 0).unwrap();
        assert_eq!(&s[s1..e1], "<td>a</td>");
        let (s2, e2) = next_tag_block_ci(s, "<td", "</td>", e1).unwrap();
        assert_eq!(&s[s2..e2], "<td>b</td>");
        assert!(next_tag_block_ci(s, "<td", "</td>", e2).is_none());
    }

    #[test]
    fn strip_tags_drops_markup_and_collapses_ws() {
        assert_eq!(strip_tags(s!("<b>Global  Alliance</b>\n&x")), "Global Alliance &x");
    }
}
