use std::sync::LazyLock;

use regex::Regex;

use crate::schema::RelayConfig;

/// `*`, or `scheme://host[:port]` with no path.
static ORIGIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\*|[a-zA-Z][a-zA-Z0-9+.\-]*://[^/\s:]+(:[0-9]{1,5})?)$").unwrap()
});

const KNOWN_METHODS: &[&str] = &[
    "GET", "HEAD", "POST", "PUT", "PATCH", "DELETE", "OPTIONS", "CONNECT", "TRACE",
];

pub(super) fn validate_cors(errors: &mut Vec<String>, config: &RelayConfig) {
    let origin = &config.cors.allowed_origin;
    if !ORIGIN_RE.is_match(origin) {
        errors.push(format!(
            "cors.allowed_origin = {origin:?} must be \"*\" or scheme://host[:port]"
        ));
    }

    let methods = &config.cors.allowed_methods;
    if methods.is_empty() {
        errors.push("cors.allowed_methods must not be empty".into());
        return;
    }
    for method in methods {
        if !KNOWN_METHODS.contains(&method.to_ascii_uppercase().as_str()) {
            errors.push(format!("cors.allowed_methods: unknown method {method:?}"));
        }
    }
    // The WebSocket upgrade is always a GET.
    if !methods.iter().any(|m| m.eq_ignore_ascii_case("GET")) {
        errors.push("cors.allowed_methods must include GET".into());
    }
}
