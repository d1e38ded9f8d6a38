use sqlx::{sqlite::SqlitePool, QueryBuilder, Row, Sqlite};

use super::model::{NewUser, User};
use crate::domains::shared::like_pattern;
use crate::error::{AppError, AppResult};
use crate::framework::Pager;

const USER_COLUMNS: &str =
    "id, username, email, role, bio, first_name, last_name, is_staff, confirmation_code";

#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::from_sqlx(e, &format!("Failed to get user {}", id)))
    }

    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE username = ?", USER_COLUMNS))
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::from_sqlx(e, "Failed to get user by username"))
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::from_sqlx(e, "Failed to get user by email"))
    }

    pub async fn find_by_username_and_email(
        &self,
        username: &str,
        email: &str,
    ) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE username = ? AND email = ?",
            USER_COLUMNS
        ))
        .bind(username)
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx(e, "Failed to get user"))
    }

    /// Insert a user. A taken username or email surfaces as `Conflict`.
    pub async fn create(&self, user: &NewUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, email, role, bio, first_name, last_name, confirmation_code) \
             VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.role)
        .bind(&user.bio)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.confirmation_code)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx(e, "User"))
    }

    /// Persist the profile fields of an existing user.
    pub async fn save(&self, user: &User) -> AppResult<User> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET username = ?, email = ?, role = ?, bio = ?, first_name = ?, last_name = ? \
             WHERE id = ? RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.role)
        .bind(&user.bio)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx(e, "User"))?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.username)))
    }

    pub async fn set_confirmation_code(&self, id: i64, code: &str) -> AppResult<()> {
        let result = sqlx::query("UPDATE users SET confirmation_code = ? WHERE id = ?")
            .bind(code)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from_sqlx(e, "Failed to store confirmation code"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }
        Ok(())
    }

    pub async fn delete_by_username(&self, username: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE username = ?")
            .bind(username)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from_sqlx(e, "Failed to delete user"))?;
        Ok(result.rows_affected() > 0)
    }

    /// One page of users, optionally filtered by a search term over
    /// username, first name, last name and role.
    pub async fn list(&self, search: Option<&str>, pager: &Pager) -> AppResult<(Vec<User>, i64)> {
        let mut count_qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) AS n FROM users");
        push_search(&mut count_qb, search);
        let count: i64 = count_qb
            .build()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::from_sqlx(e, "Failed to count users"))?
            .get("n");

        let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM users", USER_COLUMNS));
        push_search(&mut qb, search);
        qb.push(" ORDER BY username LIMIT ");
        qb.push_bind(pager.limit());
        qb.push(" OFFSET ");
        qb.push_bind(pager.offset());

        let users = qb
            .build_query_as::<User>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::from_sqlx(e, "Failed to list users"))?;

        Ok((users, count))
    }
}

fn push_search(qb: &mut QueryBuilder<'_, Sqlite>, search: Option<&str>) {
    let Some(term) = search.filter(|s| !s.is_empty()) else {
        return;
    };
    let pattern = like_pattern(term);
    qb.push(" WHERE (");
    for (i, column) in ["username", "first_name", "last_name", "role"].iter().enumerate() {
        if i > 0 {
            qb.push(" OR ");
        }
        qb.push(*column);
        qb.push(" LIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" ESCAPE '\\'");
    }
    qb.push(")");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Role;
    use crate::infrastructure::database::Database;

    async fn repo() -> UserRepository {
        let db = Database::in_memory().await.unwrap();
        UserRepository::new(db.pool().clone())
    }

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            ..NewUser::default()
        }
    }

    #[tokio::test]
    async fn test_create_defaults_to_user_role() {
        let repo = repo().await;
        let user = repo.create(&new_user("alice", "alice@x.io")).await.unwrap();
        assert_eq!(user.role, Role::User);
        assert!(!user.is_staff);
        assert_eq!(
            repo.find_by_username("alice").await.unwrap().unwrap().id,
            user.id
        );
    }

    #[tokio::test]
    async fn test_duplicate_username_or_email_conflicts() {
        let repo = repo().await;
        repo.create(&new_user("alice", "alice@x.io")).await.unwrap();
        assert!(matches!(
            repo.create(&new_user("alice", "other@x.io")).await,
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            repo.create(&new_user("bob", "alice@x.io")).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_search_and_paging() {
        let repo = repo().await;
        for name in ["anna", "boris", "annette"] {
            repo.create(&new_user(name, &format!("{}@x.io", name)))
                .await
                .unwrap();
        }

        let pager = Pager::new(None, 10).unwrap();
        let (users, count) = repo.list(Some("ann"), &pager).await.unwrap();
        assert_eq!(count, 2);
        assert_eq!(users[0].username, "anna");

        let pager = Pager::new(Some(2), 2).unwrap();
        let (users, count) = repo.list(None, &pager).await.unwrap();
        assert_eq!(count, 3);
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username, "boris");
    }

    #[tokio::test]
    async fn test_save_updates_profile() {
        let repo = repo().await;
        let mut user = repo.create(&new_user("alice", "alice@x.io")).await.unwrap();
        user.bio = "reads a lot".to_string();
        user.role = Role::Moderator;
        let saved = repo.save(&user).await.unwrap();
        assert_eq!(saved.bio, "reads a lot");
        assert_eq!(saved.role, Role::Moderator);
    }
}
