use std::collections::HashMap;

const OPENING_FENCE: &str = "---\n";
const CLOSING_FENCE: &str = "\n---\n";

/// Splits `content` into its frontmatter pairs and the remaining body.
///
/// This is intentionally not a YAML parser: every non-blank line containing
/// a `:` becomes one `key: value` pair, split at the first colon, with
/// surrounding quotes removed from the value. A document without a complete
/// `---` block comes back untouched with no pairs.
pub(crate) fn parse_frontmatter(content: &str) -> (HashMap<String, String>, &str) {
    let mut pairs = HashMap::new();

    if !content.starts_with(OPENING_FENCE) {
        return (pairs, content);
    }
    // search from the opening fence's own newline so `---\n---\n` closes at once
    let search_from = OPENING_FENCE.len() - 1;
    let Some(offset) = content[search_from..].find(CLOSING_FENCE) else {
        return (pairs, content);
    };
    let header_end = search_from + offset;
    let header = content.get(OPENING_FENCE.len()..header_end).unwrap_or("");
    let body = &content[header_end + CLOSING_FENCE.len()..];

    for line in header.split('\n') {
        let line = line.trim();
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim().trim_matches(|c| c == '\'' || c == '"');
        pairs.insert(key.trim().to_string(), value.to_string());
    }

    (pairs, body)
}
