// src/utils/template.rs

//! Username placeholder substitution for URL and payload templates.

/// Placeholder replaced by the username.
pub const PLACEHOLDER: &str = "{}";

/// Substitute `value` for every placeholder in `template`.
pub fn interpolate(template: &str, value: &str) -> String {
    template.replace(PLACEHOLDER, value)
}

/// Substitute a username into a URL template, encoding spaces as `%20`.
pub fn interpolate_url(template: &str, username: &str) -> String {
    interpolate(template, &username.replace(' ', "%20"))
}
