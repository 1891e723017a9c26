use regex::Regex;

/// Clean free-text fields coming out of hand-maintained dataset files:
/// underscores become spaces, characters outside letters/digits/basic
/// punctuation are dropped, runs of whitespace collapse. Case is preserved.
pub fn sanitize(input: &str) -> String {
    let replace = Regex::new(r"[_]").unwrap();
    let mut s = replace.replace_all(input, " ").into_owned();

    let clean_re = Regex::new(r"[^A-Za-z0-9-&'., ]").unwrap();
    s = clean_re.replace_all(&s, "").into_owned();

    s = s.trim().to_string();

    let collapse = Regex::new(r" +").unwrap();
    collapse.replace_all(&s, " ").into_owned()
}

/// Derive a stable id from a display name for records that ship without one.
pub fn slugify(input: &str) -> String {
    let non_alnum = Regex::new(r"[^a-z0-9]+").unwrap();
    let slug = non_alnum
        .replace_all(&input.to_lowercase(), "-")
        .into_owned();

    slug.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::{sanitize, slugify};

    #[test]
    fn test_basic() {
        assert_eq!(sanitize("North_Beach Road"), "North Beach Road");
        assert_eq!(sanitize("St. Armands Circle"), "St. Armands Circle");
        assert_eq!(sanitize("Tony's  Bar & Grill!"), "Tony's Bar & Grill");
    }

    #[test]
    fn test_leading_trailing_spaces() {
        assert_eq!(sanitize("   Downtown   "), "Downtown");
        assert_eq!(sanitize("  multiple   spaces  "), "multiple spaces");
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize("     "), "");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Tony's Bar & Grill"), "tony-s-bar-grill");
        assert_eq!(slugify("  The Pier  "), "the-pier");
        assert_eq!(slugify("!!!"), "");
    }
}
