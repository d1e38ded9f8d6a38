// Viewer Context - who is making the current request

use crate::core::{grants_admin, grants_moderation, Role};

/// Identity of an authenticated requester, resolved from the bearer token.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewer {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
    pub is_staff: bool,
}

/// Request-scoped context handed to every handler.
#[derive(Debug, Clone)]
pub struct ViewerContext {
    pub request_id: String,
    pub viewer: Option<Viewer>,
}

impl ViewerContext {
    pub fn anonymous(request_id: String) -> Self {
        Self {
            request_id,
            viewer: None,
        }
    }

    pub fn authenticated_user(viewer: Viewer, request_id: String) -> Self {
        Self {
            request_id,
            viewer: Some(viewer),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.viewer.is_some()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.viewer.as_ref().map(|v| v.user_id)
    }

    pub fn username(&self) -> Option<&str> {
        self.viewer.as_ref().map(|v| v.username.as_str())
    }

    pub fn is_admin(&self) -> bool {
        self.viewer
            .as_ref()
            .is_some_and(|v| grants_admin(v.role, v.is_staff))
    }

    pub fn is_moderator(&self) -> bool {
        self.viewer
            .as_ref()
            .is_some_and(|v| grants_moderation(v.role, v.is_staff))
    }

    pub fn is_author(&self, author_id: i64) -> bool {
        self.user_id() == Some(author_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewer(role: Role, is_staff: bool) -> ViewerContext {
        ViewerContext::authenticated_user(
            Viewer {
                user_id: 7,
                username: "kate".to_string(),
                role,
                is_staff,
            },
            "req-test".to_string(),
        )
    }

    #[test]
    fn test_anonymous_has_no_rights() {
        let vc = ViewerContext::anonymous("req-test".to_string());
        assert!(!vc.is_authenticated());
        assert!(!vc.is_admin());
        assert!(!vc.is_moderator());
        assert!(!vc.is_author(7));
    }

    #[test]
    fn test_role_derived_rights() {
        assert!(viewer(Role::Admin, false).is_admin());
        assert!(viewer(Role::User, true).is_admin());
        assert!(viewer(Role::Moderator, false).is_moderator());
        assert!(!viewer(Role::Moderator, false).is_admin());
        assert!(!viewer(Role::User, false).is_moderator());
        assert!(viewer(Role::User, false).is_author(7));
    }
}
