/// Turn a raw base URL into `scheme://host[/path]` with no trailing slash.
///
/// Missing or blank input gives an empty string. A value without an
/// `http://` or `https://` prefix is assumed to be `https://`.
pub fn normalize_base_url(raw: Option<&str>) -> String {
    let trimmed = match raw.map(trim_blank) {
        Some(value) if !value.is_empty() => value,
        _ => return String::new(),
    };

    let with_scheme = if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    with_scheme.trim_end_matches('/').to_string()
}

/// Where `GET /` should send people, given an already normalized base.
pub fn login_target(base: &str) -> String {
    if base.is_empty() {
        String::from("/")
    } else {
        format!("{base}/login/")
    }
}

// Byte order marks count as blank too.
fn trim_blank(value: &str) -> &str {
    value.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

fn has_scheme(value: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        value
            .get(..scheme.len())
            .map_or(false, |prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}
