use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::Algorithm;

use super::*;
use crate::errors::TokenError;
use crate::services::token::TokenValidator;

fn validator() -> TokenValidator {
    TokenValidator::new(&test_config(), manual_clock())
}

fn now() -> i64 {
    start().timestamp()
}

fn with(mut claims: serde_json::Value, key: &str, value: serde_json::Value) -> serde_json::Value {
    claims[key] = value;
    claims
}

fn sign(claims: &serde_json::Value) -> String {
    sign_with(Algorithm::HS256, claims)
}

#[test]
fn test_valid_token_accepted() {
    let claims = validator().validate_access_token(&sign(&claims_at(now()))).unwrap();
    assert_eq!(claims.email, "test@x.com");
}

#[test]
fn test_expiry_boundary_with_skew() {
    let skew = 120;
    let v = validator();

    let expired = with(claims_at(now() - 3600), "exp", (now() - skew - 1).into());
    assert_eq!(v.validate_access_token(&sign(&expired)), Err(TokenError::TokenExpired));

    let within = with(claims_at(now() - 3600), "exp", (now() - skew + 1).into());
    assert!(v.validate_access_token(&sign(&within)).is_ok());

    let exact = with(claims_at(now() - 3600), "exp", (now() - skew).into());
    assert!(v.validate_access_token(&sign(&exact)).is_ok());
}

#[test]
fn test_not_before_boundary_with_skew() {
    let v = validator();

    let early = with(claims_at(now()), "nbf", (now() + 121).into());
    assert_eq!(v.validate_access_token(&sign(&early)), Err(TokenError::TokenNotBefore));

    let within = with(claims_at(now()), "nbf", (now() + 119).into());
    assert!(v.validate_access_token(&sign(&within)).is_ok());
}

#[test]
fn test_issuer_must_match_exactly() {
    let claims = with(claims_at(now()), "iss", "strive-api-2".into());
    assert_eq!(
        validator().validate_access_token(&sign(&claims)),
        Err(TokenError::InvalidIssuer)
    );
}

#[test]
fn test_audience_must_contain_configured_value() {
    let v = validator();

    let other = with(claims_at(now()), "aud", serde_json::json!(["other-app"]));
    assert_eq!(v.validate_access_token(&sign(&other)), Err(TokenError::InvalidAudience));

    let many = with(claims_at(now()), "aud", serde_json::json!(["other-app", "strive-app"]));
    assert!(v.validate_access_token(&sign(&many)).is_ok());

    let single = with(claims_at(now()), "aud", "strive-app".into());
    assert!(v.validate_access_token(&sign(&single)).is_ok());
}

#[test]
fn test_checks_run_in_order() {
    let v = validator();

    // Expired and wrong issuer: expiry wins
    let claims = with(
        with(claims_at(now() - 7200), "iss", "evil".into()),
        "aud",
        serde_json::json!(["evil"]),
    );
    assert_eq!(v.validate_access_token(&sign(&claims)), Err(TokenError::TokenExpired));

    // Not yet valid and wrong audience: nbf wins
    let claims = with(
        with(claims_at(now()), "nbf", (now() + 3600).into()),
        "aud",
        serde_json::json!(["evil"]),
    );
    assert_eq!(v.validate_access_token(&sign(&claims)), Err(TokenError::TokenNotBefore));

    // Wrong issuer and wrong audience: issuer wins
    let claims = with(
        with(claims_at(now()), "iss", "evil".into()),
        "aud",
        serde_json::json!(["evil"]),
    );
    assert_eq!(v.validate_access_token(&sign(&claims)), Err(TokenError::InvalidIssuer));
}

#[test]
fn test_signature_checked_before_claims() {
    let other_key = jsonwebtoken::EncodingKey::from_secret(b"a-completely-different-secret-value!!");
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::new(Algorithm::HS256),
        &claims_at(now() - 7200),
        &other_key,
    )
    .unwrap();

    assert_eq!(
        validator().validate_access_token(&token),
        Err(TokenError::InvalidSignature)
    );
}

#[test]
fn test_tampered_payload_rejected() {
    let token = sign(&claims_at(now()));
    let parts: Vec<&str> = token.split('.').collect();
    let forged = with(claims_at(now()), "email", "admin@x.com".into());
    let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged).unwrap());
    let tampered = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

    assert_eq!(
        validator().validate_access_token(&tampered),
        Err(TokenError::InvalidSignature)
    );
}

#[test]
fn test_other_algorithms_rejected() {
    let hs384 = sign_with(Algorithm::HS384, &claims_at(now()));
    assert_eq!(
        validator().validate_access_token(&hs384),
        Err(TokenError::InvalidSignature)
    );

    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims_at(now())).unwrap());
    let unsigned = format!("{}.{}.", header, payload);
    assert_eq!(
        validator().validate_access_token(&unsigned),
        Err(TokenError::InvalidSignature)
    );
}

#[test]
fn test_malformed_tokens() {
    let v = validator();
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);

    for token in [
        String::new(),
        "not-a-token".to_string(),
        "a.b".to_string(),
        "a.b.c.d".to_string(),
        "!!!.e30.sig".to_string(),
        format!("{}.{}.sig", URL_SAFE_NO_PAD.encode(b"not json"), "e30"),
        format!("{}..sig", header),
        format!("{}.{}.sig", URL_SAFE_NO_PAD.encode(br#"{"typ":"JWT"}"#), "e30"),
        // Structure is judged before the signature
        format!("{}.!!!not-base64!!!.c2ln", header),
        format!("{}.{}.c2ln", header, URL_SAFE_NO_PAD.encode(b"not json")),
    ] {
        assert_eq!(v.validate_access_token(&token), Err(TokenError::Malformed), "{token}");
    }
}

#[test]
fn test_missing_claims_are_malformed() {
    let mut claims = claims_at(now());
    claims.as_object_mut().unwrap().remove("email");
    assert_eq!(
        validator().validate_access_token(&sign(&claims)),
        Err(TokenError::Malformed)
    );
}
