use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};

pub struct PermissionRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PermissionRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Permission codes granted to the user, in no particular order.
    pub async fn codes_for_user(&self, user_id: i64) -> Result<Vec<String>, DbErr> {
        let permission_ids: Vec<i64> = entity::prelude::UserPermission::find()
            .filter(entity::user_permission::Column::UserId.eq(user_id))
            .all(self.db)
            .await?
            .into_iter()
            .map(|grant| grant.permission_id)
            .collect();

        if permission_ids.is_empty() {
            return Ok(Vec::new());
        }

        let codes = entity::prelude::Permission::find()
            .filter(entity::permission::Column::Id.is_in(permission_ids))
            .all(self.db)
            .await?
            .into_iter()
            .map(|permission| permission.code)
            .collect();

        Ok(codes)
    }

    /// Grants the listed codes to the user. Codes with no permission row are skipped.
    pub async fn add_for_user(&self, user_id: i64, codes: &[&str]) -> Result<(), DbErr> {
        let permissions = entity::prelude::Permission::find()
            .filter(entity::permission::Column::Code.is_in(codes.iter().copied()))
            .all(self.db)
            .await?;

        if permissions.is_empty() {
            return Ok(());
        }

        let grants = permissions
            .into_iter()
            .map(|permission| entity::user_permission::ActiveModel {
                user_id: sea_orm::ActiveValue::Set(user_id),
                permission_id: sea_orm::ActiveValue::Set(permission.id),
            });

        entity::prelude::UserPermission::insert_many(grants)
            .exec(self.db)
            .await?;

        Ok(())
    }
}
