//! String helpers for form label synthesis

/// Capitalize a parameter name for display: first character uppercased,
/// the rest lowercased. The underlying name used for lookups is never
/// altered.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("name"), "Name");
        assert_eq!(capitalize("times"), "Times");
        assert_eq!(capitalize("TOPIC"), "Topic");
        assert_eq!(capitalize("x"), "X");
        assert_eq!(capitalize(""), "");
    }
}
