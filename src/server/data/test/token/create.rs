use super::*;

/// Tests that only the hash of an issued token is stored.
///
/// Expected: a row keyed by the SHA-256 hex digest of the plaintext
#[tokio::test]
async fn stores_hash_not_plaintext() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_auth_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let token = IssuedToken {
        plaintext: "ABCDEFGHIJKLMNOPQRSTUVWXYZ".to_string(),
        user_id: user.id,
        expiry: Utc::now() + Duration::hours(24),
        scope: TokenScope::Authentication,
    };

    TokenRepository::new(db).create(&token).await?;

    let stored = entity::prelude::Token::find_by_id(token_hash(&token.plaintext))
        .one(db)
        .await?
        .unwrap();
    assert_eq!(stored.hash.len(), 64);
    assert_ne!(stored.hash, token.plaintext);
    assert_eq!(stored.scope, "authentication");

    Ok(())
}

/// Tests the hash matches the one the test factories store.
#[test]
fn hash_matches_factory_hash() {
    assert_eq!(
        token_hash("ABCDEFGHIJKLMNOPQRSTUVWXYZ"),
        test_utils::factory::helpers::token_hash("ABCDEFGHIJKLMNOPQRSTUVWXYZ")
    );
}
