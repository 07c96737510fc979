//! Permission factory for seeding permission codes and grants.

use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter,
};

/// Finds the permission row for `code`, inserting it if it does not exist yet.
///
/// # Arguments
/// - `db` - Database connection
/// - `code` - Permission code such as `movies:read`
///
/// # Returns
/// - `Ok(entity::permission::Model)` - Existing or newly created permission
/// - `Err(DbErr)` - Database error during lookup or insert
pub async fn find_or_create_permission(
    db: &DatabaseConnection,
    code: &str,
) -> Result<entity::permission::Model, DbErr> {
    if let Some(existing) = entity::prelude::Permission::find()
        .filter(entity::permission::Column::Code.eq(code))
        .one(db)
        .await?
    {
        return Ok(existing);
    }

    entity::permission::ActiveModel {
        code: ActiveValue::Set(code.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Grants `code` to the user, creating the permission row when needed.
///
/// # Returns
/// - `Ok(())` - Grant inserted
/// - `Err(DbErr)` - Database error during insert
pub async fn grant_permission(
    db: &DatabaseConnection,
    user_id: i64,
    code: &str,
) -> Result<(), DbErr> {
    let permission = find_or_create_permission(db, code).await?;

    entity::user_permission::ActiveModel {
        user_id: ActiveValue::Set(user_id),
        permission_id: ActiveValue::Set(permission.id),
    }
    .insert(db)
    .await?;

    Ok(())
}
