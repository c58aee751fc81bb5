//! Best-effort coercions for values that are not JSON encoded.

/// Infer a boolean from a loosely formatted string.
///
/// `"true"` and `"false"` map directly. Integers are true when positive.
/// Anything else is true when it starts with `t` or `y`, ignoring case.
///
/// ```
/// use structmapper::coerce::string_to_bool;
///
/// assert!(string_to_bool("99"));
/// assert!(string_to_bool("Yes"));
/// assert!(!string_to_bool("cheese"));
/// ```
pub fn string_to_bool(s: &str) -> bool {
    match s {
        "true" => return true,
        "false" | "" => return false,
        _ => {}
    }
    if let Ok(i) = s.parse::<i64>() {
        return i > 0;
    }
    s.chars()
        .next()
        .and_then(|c| c.to_lowercase().next())
        .is_some_and(|c| c == 't' || c == 'y')
}

/// Split a comma separated string into a list of strings.
///
/// `", "` is treated as a bare comma. An empty input yields one empty item.
pub fn string_to_list(s: &str) -> Vec<String> {
    s.replace(", ", ",").split(',').map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness() {
        let cases = [
            ("", false),
            ("0", false),
            ("-1", false),
            ("False", false),
            ("false", false),
            ("cheese", false),
            ("1", true),
            ("99", true),
            ("t", true),
            ("true", true),
            ("True", true),
            ("tonsils", true),
        ];

        for (input, expected) in cases {
            assert_eq!(string_to_bool(input), expected, "input {:?}", input);
        }
    }

    #[test]
    fn leading_y_is_true_and_empty_is_false() {
        assert!(string_to_bool("yxxxx"));
        assert!(string_to_bool("Yes"));
        assert!(string_to_bool("y"));
        assert!(!string_to_bool(""));
        assert!(!string_to_bool("no"));
    }

    #[test]
    fn out_of_range_integers_fall_through_to_letters() {
        assert!(!string_to_bool("99999999999999999999999"));
        assert!(string_to_bool("+5"));
    }

    #[test]
    fn list_splitting() {
        assert_eq!(string_to_list("hi,nice"), ["hi", "nice"]);
        assert_eq!(string_to_list("hi, nice"), ["hi", "nice"]);
        assert_eq!(string_to_list("hi"), ["hi"]);
        assert_eq!(string_to_list("a,,b"), ["a", "", "b"]);
    }

    #[test]
    fn empty_input_yields_one_empty_item() {
        assert_eq!(string_to_list(""), [""]);
    }
}
