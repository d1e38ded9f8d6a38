use crate::core::Role;
use crate::infrastructure::viewer::Viewer;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub bio: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub confirmation_code: String,
}

impl User {
    /// Identity carried through the request once this user is authenticated.
    pub fn viewer(&self) -> Viewer {
        Viewer {
            user_id: self.id,
            username: self.username.clone(),
            role: role_of(self),
            is_staff: self.is_staff,
        }
    }
}

pub fn role_of(user: &User) -> Role {
    user.role
}

/// Fields for inserting a user row.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub role: Role,
    pub bio: String,
    pub first_name: String,
    pub last_name: String,
    pub confirmation_code: String,
}
