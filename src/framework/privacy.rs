// Privacy Rules - access control for handler operations
// Each handler declares a policy: a list of rules that must all allow.

use crate::{
    error::{AppError, AppResult},
    infrastructure::viewer::ViewerContext,
};

/// Operations a handler can perform on a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Retrieve,
    Create,
    Update,
    PartialUpdate,
    Destroy,
}

impl Operation {
    /// Read-only operations (GET/HEAD/OPTIONS).
    pub fn is_safe(self) -> bool {
        matches!(self, Operation::List | Operation::Retrieve)
    }
}

/// Trait for implementing privacy rules
pub trait PrivacyRule: Send + Sync {
    /// Get rule name for debugging
    fn name(&self) -> &'static str;

    /// Request-level check, before any object is loaded.
    fn has_permission(&self, _vc: &ViewerContext, _op: Operation) -> bool {
        true
    }

    /// Object-level check against the author of the loaded resource.
    fn has_object_permission(&self, _vc: &ViewerContext, _op: Operation, _author_id: i64) -> bool {
        true
    }
}

pub struct AllowAny;

impl PrivacyRule for AllowAny {
    fn name(&self) -> &'static str {
        "allow_any"
    }
}

pub struct IsAuthenticated;

impl PrivacyRule for IsAuthenticated {
    fn name(&self) -> &'static str {
        "is_authenticated"
    }

    fn has_permission(&self, vc: &ViewerContext, _op: Operation) -> bool {
        vc.is_authenticated()
    }
}

pub struct IsAuthenticatedOrReadOnly;

impl PrivacyRule for IsAuthenticatedOrReadOnly {
    fn name(&self) -> &'static str {
        "is_authenticated_or_read_only"
    }

    fn has_permission(&self, vc: &ViewerContext, op: Operation) -> bool {
        op.is_safe() || vc.is_authenticated()
    }
}

pub struct IsAdminOrReadOnly;

impl PrivacyRule for IsAdminOrReadOnly {
    fn name(&self) -> &'static str {
        "is_admin_or_read_only"
    }

    fn has_permission(&self, vc: &ViewerContext, op: Operation) -> bool {
        op.is_safe() || vc.is_admin()
    }

    fn has_object_permission(&self, vc: &ViewerContext, op: Operation, _author_id: i64) -> bool {
        op.is_safe() || vc.is_admin()
    }
}

pub struct IsModeratorOrAdminOrReadOnly;

impl PrivacyRule for IsModeratorOrAdminOrReadOnly {
    fn name(&self) -> &'static str {
        "is_moderator_or_admin_or_read_only"
    }

    fn has_object_permission(&self, vc: &ViewerContext, op: Operation, author_id: i64) -> bool {
        op.is_safe() || vc.is_author(author_id) || vc.is_moderator()
    }
}

pub struct IsAdmin;

impl PrivacyRule for IsAdmin {
    fn name(&self) -> &'static str {
        "is_admin"
    }

    fn has_permission(&self, vc: &ViewerContext, _op: Operation) -> bool {
        vc.is_admin()
    }

    fn has_object_permission(&self, vc: &ViewerContext, _op: Operation, _author_id: i64) -> bool {
        vc.is_admin()
    }
}

/// Rules combined with logical AND.
pub struct PrivacyPolicy {
    rules: &'static [&'static dyn PrivacyRule],
}

impl PrivacyPolicy {
    pub const fn new(rules: &'static [&'static dyn PrivacyRule]) -> Self {
        Self { rules }
    }

    pub fn check(&self, vc: &ViewerContext, op: Operation) -> AppResult<()> {
        match self.rules.iter().find(|rule| !rule.has_permission(vc, op)) {
            Some(rule) => Err(deny(vc, rule.name(), op)),
            None => Ok(()),
        }
    }

    pub fn check_object(&self, vc: &ViewerContext, op: Operation, author_id: i64) -> AppResult<()> {
        match self
            .rules
            .iter()
            .find(|rule| !rule.has_object_permission(vc, op, author_id))
        {
            Some(rule) => Err(deny(vc, rule.name(), op)),
            None => Ok(()),
        }
    }
}

fn deny(vc: &ViewerContext, rule: &str, op: Operation) -> AppError {
    tracing::debug!(request_id = %vc.request_id, rule, ?op, "permission denied");
    if vc.is_authenticated() {
        AppError::Forbidden("You do not have permission to perform this action".to_string())
    } else {
        AppError::Unauthorized("Authentication credentials were not provided".to_string())
    }
}

pub const PUBLIC: PrivacyPolicy = PrivacyPolicy::new(&[&AllowAny]);
pub const ADMIN_OR_READ_ONLY: PrivacyPolicy = PrivacyPolicy::new(&[&IsAdminOrReadOnly]);
pub const AUTHOR_OR_STAFF_OR_READ_ONLY: PrivacyPolicy =
    PrivacyPolicy::new(&[&IsAuthenticatedOrReadOnly, &IsModeratorOrAdminOrReadOnly]);
pub const AUTHENTICATED: PrivacyPolicy = PrivacyPolicy::new(&[&IsAuthenticated]);
pub const ADMIN_ONLY: PrivacyPolicy = PrivacyPolicy::new(&[&IsAuthenticated, &IsAdmin]);
