use super::*;
use jsonwebtoken::{EncodingKey, Header, encode};
use std::env;

const SECRET: &str = "supersecretjwtsecretforunittesting123";

fn set_env_vars() {
    unsafe {
        env::set_var("JWT_SECRET", SECRET);
    }
}

fn make_token(sub: &str, exp: usize, secret: &str) -> String {
    let claims = Claims {
        sub: sub.to_string(),
        exp,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

#[test]
fn test_validate_token_success() {
    set_env_vars();
    let token = make_token("123e4567-e89b-12d3-a456-426614174000", 9999999999, SECRET);

    let claims = validate_token(&token).expect("Valid token should pass");
    assert_eq!(claims.sub, "123e4567-e89b-12d3-a456-426614174000");
}

#[test]
fn test_validate_token_expired() {
    set_env_vars();
    let token = make_token("123e4567-e89b-12d3-a456-426614174000", 1, SECRET);

    assert!(validate_token(&token).is_err());
}

#[test]
fn test_validate_token_wrong_secret() {
    set_env_vars();
    let token = make_token(
        "123e4567-e89b-12d3-a456-426614174000",
        9999999999,
        "a-completely-different-secret",
    );

    assert!(validate_token(&token).is_err());
}
