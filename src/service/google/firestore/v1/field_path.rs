//! Field paths as Firestore expects them on the wire.

/// Backquotes every segment of a dotted path that is not a simple name.
pub(crate) fn encode(path: &str) -> String {
    path.split('.')
        .map(quote_segment)
        .collect::<Vec<_>>()
        .join(".")
}

/// Field names outside `[A-Za-z_][A-Za-z_0-9]*` must be backquoted.
pub(crate) fn quote_segment(key: &str) -> String {
    let mut chars = key.chars();
    let simple = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if simple {
        return key.to_string();
    }
    let escaped = key.replace('\\', "\\\\").replace('`', "\\`");
    format!("`{}`", escaped)
}

#[cfg(test)]
mod tests {
    use super::{encode, quote_segment};

    #[test]
    fn quotes_segments() {
        assert_eq!(quote_segment("age"), "age");
        assert_eq!(quote_segment("_id2"), "_id2");
        assert_eq!(quote_segment("2fa"), "`2fa`");
        assert_eq!(quote_segment("first name"), "`first name`");
        assert_eq!(quote_segment("a`b"), "`a\\`b`");
        assert_eq!(quote_segment(""), "``");
    }

    #[test]
    fn encodes_dotted_paths() {
        assert_eq!(encode("address.city"), "address.city");
        assert_eq!(encode("address.zip code"), "address.`zip code`");
        assert_eq!(encode("__name__"), "__name__");
    }
}
