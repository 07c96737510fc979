pub use super::movie::Entity as Movie;
pub use super::permission::Entity as Permission;
pub use super::token::Entity as Token;
pub use super::user::Entity as User;
pub use super::user_permission::Entity as UserPermission;
