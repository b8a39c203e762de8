//! Text change detection between two versions of the document text

/// A single contiguous edit, in characters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChange {
    /// Where the edit starts
    pub position: usize,
    /// Number of characters removed at `position`
    pub removed: usize,
    /// Text inserted at `position`
    pub inserted: String,
}

/// Smallest single edit turning `old` into `new`, or `None` when equal
pub fn text_change(old: &str, new: &str) -> Option<TextChange> {
    if old == new {
        return None;
    }
    let old: Vec<char> = old.chars().collect();
    let new: Vec<char> = new.chars().collect();

    let prefix = old.iter().zip(&new).take_while(|(a, b)| a == b).count();
    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    Some(TextChange {
        position: prefix,
        removed: old.len() - prefix - suffix,
        inserted: new[prefix..new.len() - suffix].iter().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_change() {
        assert_eq!(text_change("abc", "abc"), None);
    }

    #[test]
    fn test_removal() {
        assert_eq!(
            text_change("Capybaras", "Capybara"),
            Some(TextChange {
                position: 8,
                removed: 1,
                inserted: String::new(),
            })
        );
    }

    #[test]
    fn test_replacement_in_middle() {
        assert_eq!(
            text_change("baz bar foo", "baz qux foo"),
            Some(TextChange {
                position: 4,
                removed: 3,
                inserted: "qux".to_string(),
            })
        );
    }

    #[test]
    fn test_repeated_characters() {
        let change = text_change("aaa", "aaaa").unwrap();
        assert_eq!((change.position, change.removed, change.inserted.as_str()), (3, 0, "a"));
    }
}
