// Roles - access levels a user can hold

use serde::{Deserialize, Serialize};
use std::fmt;

/// Access level stored on every user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Moderator,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Admin rights come from the admin role or the staff flag.
pub fn grants_admin(role: Role, is_staff: bool) -> bool {
    role == Role::Admin || is_staff
}

/// Moderation rights: moderators, admins and staff.
pub fn grants_moderation(role: Role, is_staff: bool) -> bool {
    matches!(role, Role::Moderator | Role::Admin) || is_staff
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_flag_grants_admin() {
        assert!(grants_admin(Role::User, true));
        assert!(grants_admin(Role::Admin, false));
        assert!(!grants_admin(Role::Moderator, false));
    }

    #[test]
    fn test_moderation_rights() {
        assert!(grants_moderation(Role::Moderator, false));
        assert!(grants_moderation(Role::Admin, false));
        assert!(grants_moderation(Role::User, true));
        assert!(!grants_moderation(Role::User, false));
    }

    #[test]
    fn test_serde_uses_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Moderator).unwrap(), "\"moderator\"");
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
        assert!(serde_json::from_str::<Role>("\"superuser\"").is_err());
        assert_eq!(Role::Moderator.to_string(), "moderator");
    }
}
