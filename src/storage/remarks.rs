//! Semicolon-delimited remark lists.
//!
//! Feedback fields travel as a single `"remark; remark; remark"` string on
//! the wire and in the database. This module is the only place that encoding
//! is applied or undone, so the rest of the crate works with `Vec<String>`.

/// Split a delimited string into trimmed, non-empty remarks, preserving order.
pub fn decode(encoded: &str) -> Vec<String> {
    encoded
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Join remarks back into the single-string form.
pub fn encode(remarks: &[String]) -> String {
    remarks.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_trims_and_drops_empties() {
        let remarks = decode("A; B ;A");
        assert_eq!(remarks, vec!["A", "B", "A"]);

        let remarks = decode("; only one ;;");
        assert_eq!(remarks, vec!["only one"]);

        assert!(decode("").is_empty());
        assert!(decode(" ; ; ").is_empty());
    }

    #[test]
    fn encode_joins_with_separator() {
        let remarks = vec!["first".to_string(), "second".to_string()];
        assert_eq!(encode(&remarks), "first; second");
        assert_eq!(encode(&[]), "");
    }

    #[test]
    fn decode_keeps_duplicates_and_order() {
        let remarks = decode("gap one;gap two; gap one");
        assert_eq!(remarks, vec!["gap one", "gap two", "gap one"]);
    }
}
