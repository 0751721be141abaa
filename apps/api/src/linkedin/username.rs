/// Extracts the profile (or company) slug from a LinkedIn URL.
///
/// ```text
/// https://linkedin.com/in/satyanadella        -> satyanadella
/// https://www.linkedin.com/in/jane-doe/?x=1   -> jane-doe
/// https://linkedin.com/company/acme           -> acme
/// jane-doe                                    -> jane-doe
/// ```
pub fn extract_username(linkedin_url: &str) -> String {
    let url = linkedin_url.trim();
    let url = url.split(['?', '#']).next().unwrap_or("");
    let url = url.trim_end_matches('/');
    if url.is_empty() {
        return String::new();
    }

    if !url.contains('/') {
        return url.to_string();
    }

    for marker in ["/in/", "/company/"] {
        if let Some(idx) = url.rfind(marker) {
            let rest = &url[idx + marker.len()..];
            return rest.split('/').next().unwrap_or("").to_string();
        }
    }

    url.rsplit('/').next().unwrap_or("").to_string()
}

/// Canonical profile URL for a username.
pub fn profile_url(username: &str) -> String {
    format!("https://linkedin.com/in/{username}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_username_variants() {
        let cases = [
            ("https://linkedin.com/in/satyanadella", "satyanadella"),
            ("https://www.linkedin.com/in/jane-doe/", "jane-doe"),
            ("https://www.linkedin.com/in/jane-doe/?utm=share", "jane-doe"),
            ("https://www.linkedin.com/in/jane-doe/recent-activity/", "jane-doe"),
            ("https://linkedin.com/company/acme", "acme"),
            ("jane-doe", "jane-doe"),
            ("  jane-doe/ ", "jane-doe"),
            ("https://example.com/people/bob", "bob"),
            ("", ""),
        ];
        for (input, expected) in cases {
            assert_eq!(extract_username(input), expected, "input: {input}");
        }
    }

    #[test]
    fn test_profile_url() {
        assert_eq!(profile_url("jane"), "https://linkedin.com/in/jane");
    }
}
