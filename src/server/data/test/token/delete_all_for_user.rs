use super::*;

/// Tests deleting a user's tokens of one scope.
///
/// Expected: only that user's tokens in that scope are removed
#[tokio::test]
async fn deletes_only_matching_scope_and_user() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_auth_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let other = factory::create_user(db).await?;
    factory::token::TokenFactory::new(db, user.id)
        .scope("activation")
        .build()
        .await?;
    factory::token::TokenFactory::new(db, user.id)
        .scope("activation")
        .build()
        .await?;
    let (auth_plaintext, _) = factory::token::TokenFactory::new(db, user.id).build().await?;
    let (other_plaintext, _) = factory::token::TokenFactory::new(db, other.id)
        .scope("activation")
        .build()
        .await?;

    let repo = TokenRepository::new(db);
    let removed = repo
        .delete_all_for_user(TokenScope::Activation, user.id)
        .await?;

    assert_eq!(removed, 2);
    assert!(repo
        .find_user_for_token(TokenScope::Authentication, &auth_plaintext, Utc::now())
        .await?
        .is_some());
    assert!(repo
        .find_user_for_token(TokenScope::Activation, &other_plaintext, Utc::now())
        .await?
        .is_some());

    Ok(())
}
