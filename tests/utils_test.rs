use chrono::{Duration, TimeZone, Utc};
use spotgate::config::DEFAULT_SCOPES;
use spotgate::spotify::auth::{build_authorization_url, parse_token_response};
use spotgate::types::TokenPair;
use spotgate::utils::*;

fn pair_expiring_at(expires_at: chrono::DateTime<Utc>) -> TokenPair {
    TokenPair {
        access_token: "AT".to_string(),
        refresh_token: "RT".to_string(),
        expires_at,
        token_type: "Bearer".to_string(),
    }
}

#[test]
fn test_basic_auth_header() {
    assert_eq!(
        basic_auth_header("client", "secret"),
        "Basic Y2xpZW50OnNlY3JldA=="
    );
}

#[test]
fn test_encode_scopes_joins_with_encoded_spaces() {
    assert_eq!(
        encode_scopes(&["user-top-read", "streaming"]),
        "user-top-read%20streaming"
    );
    assert_eq!(encode_scopes::<&str>(&[]), "");
}

#[test]
fn test_build_authorization_url() {
    let url = build_authorization_url(
        "https://accounts.spotify.com/authorize",
        "abc123",
        "http://localhost:8080/spotify/callback",
        &DEFAULT_SCOPES,
    );

    assert_eq!(
        url,
        "https://accounts.spotify.com/authorize?client_id=abc123&response_type=code\
         &redirect_uri=http://localhost:8080/spotify/callback\
         &scope=user-read-playback-state%20user-modify-playback-state%20user-read-currently-playing\
         %20user-follow-read%20user-top-read%20streaming"
    );
}

#[test]
fn test_build_authorization_url_is_deterministic_and_passes_values_through() {
    let scopes = vec!["streaming".to_string()];
    let first = build_authorization_url("https://auth", "id with space", "not a uri", scopes.as_slice());
    let second = build_authorization_url("https://auth", "id with space", "not a uri", scopes.as_slice());

    assert_eq!(first, second);
    assert!(first.contains("client_id=id with space"));
    assert!(first.contains("redirect_uri=not a uri"));
}

#[test]
fn test_expiry_from() {
    let issued = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    assert_eq!(
        expiry_from(issued, 3600),
        Utc.with_ymd_and_hms(2024, 1, 1, 13, 0, 0).unwrap()
    );
    // absurd lifetimes saturate instead of panicking
    assert!(expiry_from(issued, u64::MAX) > issued);
}

#[test]
fn test_truncate_body() {
    assert_eq!(truncate_body("abcdef", 3), "abc");
    assert_eq!(truncate_body("ab", 3), "ab");
    assert_eq!(truncate_body("äöüß", 2), "äö");
}

#[test]
fn test_is_expired_honours_skew() {
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    let skew = Duration::seconds(60);

    assert!(pair_expiring_at(now - Duration::seconds(1)).is_expired_at(now, skew));
    assert!(pair_expiring_at(now + Duration::seconds(30)).is_expired_at(now, skew));
    assert!(pair_expiring_at(now + Duration::seconds(60)).is_expired_at(now, skew));
    assert!(!pair_expiring_at(now + Duration::seconds(61)).is_expired_at(now, skew));
}

#[test]
fn test_parse_token_response() {
    let parsed =
        parse_token_response(r#"{"access_token":"AT","token_type":"Bearer","expires_in":3600}"#)
            .unwrap();
    assert_eq!(parsed.access_token, "AT");
    assert_eq!(parsed.expires_in, 3600);
    assert!(parsed.refresh_token.is_none());

    assert!(parse_token_response(r#"{"access_token":"AT","expires_in":3600}"#).is_ok());
    assert!(parse_token_response(r#"{"access_token":"","expires_in":3600}"#).is_err());
    assert!(parse_token_response(r#"{"access_token":"AT","expires_in":-5}"#).is_err());
    assert!(parse_token_response(r#"{"access_token":"AT"}"#).is_err());
    assert!(
        parse_token_response(r#"{"access_token":"AT","token_type":"MAC","expires_in":1}"#)
            .is_err()
    );
}

#[test]
fn test_store_expiry_check_uses_wall_clock() {
    use spotgate::management::TokenStore;

    let skew = Duration::seconds(60);
    assert!(TokenStore::is_expired(&pair_expiring_at(Utc::now()), skew));
    assert!(!TokenStore::is_expired(
        &pair_expiring_at(Utc::now() + Duration::seconds(3600)),
        skew
    ));
}
