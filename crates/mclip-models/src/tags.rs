//! Tag list editing.

/// Add a tag. Returns `false` when the trimmed tag is empty or already present.
pub fn add_tag(tags: &mut Vec<String>, raw: &str) -> bool {
    let tag = raw.trim();
    if tag.is_empty() || tags.iter().any(|t| t == tag) {
        return false;
    }
    tags.push(tag.to_string());
    true
}

/// Remove a tag. Returns `false` when it was not present.
pub fn remove_tag(tags: &mut Vec<String>, tag: &str) -> bool {
    let before = tags.len();
    tags.retain(|t| t != tag);
    tags.len() != before
}

/// Parse a comma-separated list, dropping blanks and duplicates.
pub fn parse_tag_list(input: &str) -> Vec<String> {
    let mut tags = Vec::new();
    for part in input.split(',') {
        add_tag(&mut tags, part);
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_tag_rejects_blank_and_duplicates() {
        let mut tags = vec![];
        assert!(add_tag(&mut tags, " sunset "));
        assert!(!add_tag(&mut tags, "sunset"));
        assert!(!add_tag(&mut tags, "   "));
        assert_eq!(tags, vec!["sunset"]);
    }

    #[test]
    fn test_remove_tag() {
        let mut tags = vec!["a".to_string(), "b".to_string()];
        assert!(remove_tag(&mut tags, "a"));
        assert!(!remove_tag(&mut tags, "a"));
        assert_eq!(tags, vec!["b"]);
    }

    #[test]
    fn test_parse_tag_list() {
        assert_eq!(parse_tag_list("a, b,,a"), vec!["a", "b"]);
        assert!(parse_tag_list("").is_empty());
    }
}
