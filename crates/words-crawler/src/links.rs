const ALLOWED_SCHEMES: [&str; 2] = ["http://", "https://"];

/// Whether a discovered link may be followed, ignoring case.
pub fn is_allowed(url: &str) -> bool {
    ALLOWED_SCHEMES.iter().any(|scheme| {
        url.get(..scheme.len())
            .map_or(false, |prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}
