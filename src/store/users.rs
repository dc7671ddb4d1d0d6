use async_trait::async_trait;
use sqlx::{PgPool, SqlitePool};

use super::{StoreError, UserStore};
use crate::models::user::User;

const INSERT_USER: &str = r#"
    INSERT INTO users (id, email, username, password_hash, created_at)
    VALUES ($1, $2, $3, $4, $5)
"#;

const FIND_USER_BY_EMAIL: &str = r#"
    SELECT id, email, username, password_hash, created_at
    FROM users
    WHERE email = $1
"#;

macro_rules! sql_user_store {
    ($name:ident, $pool:ty) => {
        #[derive(Clone)]
        pub struct $name {
            pool: $pool,
        }

        impl $name {
            pub fn new(pool: $pool) -> Self {
                Self { pool }
            }
        }

        #[async_trait]
        impl UserStore for $name {
            async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
                sqlx::query(INSERT_USER)
                    .bind(&user.id)
                    .bind(&user.email)
                    .bind(&user.username)
                    .bind(&user.password_hash)
                    .bind(user.created_at)
                    .execute(&self.pool)
                    .await?;
                Ok(())
            }

            async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
                let user = sqlx::query_as::<_, User>(FIND_USER_BY_EMAIL)
                    .bind(email)
                    .fetch_optional(&self.pool)
                    .await?;
                Ok(user)
            }
        }
    };
}

sql_user_store!(PgUserStore, PgPool);
sql_user_store!(SqliteUserStore, SqlitePool);
