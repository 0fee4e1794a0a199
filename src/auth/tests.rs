use super::*;
use jsonwebtoken::{EncodingKey, Header, encode};
use std::env;

const TEST_SECRET: &str = "supersecretjwtsecretforunittesting123";

fn set_env_vars() {
    unsafe {
        env::set_var("SUPABASE_JWT_SECRET", TEST_SECRET);
    }
}

fn make_token(secret: &str, claims: &SupabaseClaims) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

#[test]
fn validates_a_well_formed_token() {
    set_env_vars();
    let my_claims = SupabaseClaims {
        sub: "123e4567-e89b-12d3-a456-426614174000".to_string(),
        aud: "authenticated".to_string(),
        role: "authenticated".to_string(),
        email: Some("pro@todoaca.ar".to_string()),
        exp: 9999999999,
    };

    let token = make_token(TEST_SECRET, &my_claims);

    let claims = validate_supabase_jwt(&token).expect("Valid token should pass");
    assert_eq!(claims.sub, my_claims.sub);
    assert_eq!(claims.email, my_claims.email);
}

#[test]
fn rejects_an_expired_token() {
    set_env_vars();
    let my_claims = SupabaseClaims {
        sub: "123e4567-e89b-12d3-a456-426614174000".to_string(),
        aud: "authenticated".to_string(),
        role: "authenticated".to_string(),
        email: None,
        exp: 1,
    };

    let token = make_token(TEST_SECRET, &my_claims);

    assert!(validate_supabase_jwt(&token).is_err());
}

#[test]
fn rejects_a_token_signed_with_the_wrong_secret() {
    set_env_vars();
    let my_claims = SupabaseClaims {
        sub: "123e4567-e89b-12d3-a456-426614174000".to_string(),
        aud: "authenticated".to_string(),
        role: "authenticated".to_string(),
        email: None,
        exp: 9999999999,
    };

    let token = make_token("wrongsecret", &my_claims);

    assert!(validate_supabase_jwt(&token).is_err());
}

#[test]
fn service_role_is_detected_from_the_role_claim() {
    let user = AuthUser {
        professional_id: Uuid::nil(),
        email: None,
        role: SERVICE_ROLE.to_string(),
    };
    assert!(user.is_service_role());

    let user = AuthUser {
        professional_id: Uuid::nil(),
        email: None,
        role: "authenticated".to_string(),
    };
    assert!(!user.is_service_role());
}
