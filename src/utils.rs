use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, Duration, Utc};

/// Builds the value of the `Authorization` header used against the token endpoint.
pub fn basic_auth_header(client_id: &str, client_secret: &str) -> String {
    let credentials = STANDARD.encode(format!("{client_id}:{client_secret}"));
    format!("Basic {credentials}")
}

/// Joins the scope list with single spaces and percent-encodes it as one value.
pub fn encode_scopes<S: AsRef<str>>(scopes: &[S]) -> String {
    let joined = scopes
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(" ");
    urlencoding::encode(&joined).into_owned()
}

/// Absolute expiry for a token issued at `issued_at` with the given lifetime.
pub fn expiry_from(issued_at: DateTime<Utc>, expires_in: u64) -> DateTime<Utc> {
    let secs = i64::try_from(expires_in).unwrap_or(i64::MAX);
    issued_at
        .checked_add_signed(Duration::try_seconds(secs).unwrap_or(Duration::MAX))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Trims a provider body so it can be carried in a log line.
pub fn truncate_body(body: &str, max: usize) -> &str {
    match body.char_indices().nth(max) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
