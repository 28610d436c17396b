//! User operations, addressed by username.

use super::rows::user_row;
use super::schema::USER_COLUMNS;
use super::sql::{build_in_clause, build_update};
use super::{BACKEND, SqliteStore, delete_one, execute, exists, expect_one, query_all, query_one};
use crate::filters::{QuerySpec, UpdateSpec};
use crate::models::User;
use crate::storage::OpContext;
use crate::storage::mapper::{ColumnValue, UserRow, user_diff};
use crate::storage::metrics::observe;
use crate::storage::prepare;
use crate::storage::traits::UserStore;
use crate::{Error, Result};
use chrono::Utc;
use rusqlite::{params, params_from_iter};

const ENTITY: &str = "user";

impl UserStore for SqliteStore {
    #[tracing::instrument(skip(self, ctx, user), fields(backend = BACKEND, username = %user.username))]
    fn store_user(&self, ctx: &OpContext, user: User) -> Result<User> {
        observe(BACKEND, "store_user", || {
            let user = prepare::user(user, Utc::now());
            let row = UserRow::from_domain(&user)?;
            self.write(ctx, "store_user", |conn| {
                let sql = format!(
                    "INSERT INTO users ({USER_COLUMNS}) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
                );
                let affected = execute(
                    conn,
                    "insert_user",
                    ENTITY,
                    &sql,
                    params![
                        row.id,
                        row.username,
                        row.password,
                        row.first_name,
                        row.last_name,
                        row.email_address,
                        row.avatar_url,
                        row.last_login,
                        row.created,
                        row.updated,
                        row.deleted
                    ],
                )?;
                expect_one("insert_user", affected)
            })?;
            Ok(user)
        })
    }

    #[tracing::instrument(skip(self, ctx), fields(backend = BACKEND))]
    fn get_user(&self, ctx: &OpContext, username: &str) -> Result<User> {
        observe(BACKEND, "get_user", || {
            self.read(ctx, "get_user", |conn| {
                let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1");
                query_one(conn, "get_user", ENTITY, &sql, [username], user_row)?
                    .ok_or_else(|| Error::not_found(ENTITY, username))?
                    .to_domain()
            })
        })
    }

    #[tracing::instrument(skip(self, ctx, query), fields(backend = BACKEND))]
    fn find_users(&self, ctx: &OpContext, query: &QuerySpec) -> Result<Vec<User>> {
        observe(BACKEND, "find_users", || {
            if query.has_status_predicate() {
                return Ok(Vec::new());
            }
            self.read(ctx, "find_users", |conn| {
                let (clause, params) = match query.names() {
                    Some(names) => {
                        let (clause, params, _) =
                            build_in_clause("username", names.into_iter().collect(), 1);
                        (format!(" WHERE {clause}"), params)
                    },
                    None => (String::new(), Vec::new()),
                };
                let sql = format!("SELECT {USER_COLUMNS} FROM users{clause} ORDER BY id");
                let rows = query_all(
                    conn,
                    ctx,
                    "find_users",
                    ENTITY,
                    &sql,
                    params_from_iter(params.iter()),
                    user_row,
                )?;
                rows.iter().map(UserRow::to_domain).collect()
            })
        })
    }

    #[tracing::instrument(skip(self, ctx, update), fields(backend = BACKEND))]
    fn update_user(&self, ctx: &OpContext, username: &str, update: &UpdateSpec) -> Result<()> {
        observe(BACKEND, "update_user", || {
            let diff = user_diff(update, Utc::now())?;
            self.write(ctx, "update_user", |conn| {
                if !exists(conn, "users", "username", username)? {
                    return Err(Error::not_found(ENTITY, username));
                }
                let (sql, mut params) = build_update("users", &diff, "username");
                params.push(ColumnValue::Text(username.to_string()));
                let affected = execute(conn, "update_user", ENTITY, &sql, params_from_iter(params.iter()))?;
                expect_one("update_user", affected)
            })
        })
    }

    #[tracing::instrument(skip(self, ctx), fields(backend = BACKEND))]
    fn delete_user(&self, ctx: &OpContext, username: &str) -> Result<()> {
        observe(BACKEND, "delete_user", || {
            self.write(ctx, "delete_user", |conn| {
                delete_one(conn, "delete_user", ENTITY, "users", "username", username)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::filters::update;
    use chrono::DateTime;

    #[test]
    fn test_last_login_roundtrip() {
        let store = SqliteStore::in_memory().unwrap();
        let ctx = OpContext::background();
        store.store_user(&ctx, User::new("alice", "hash")).unwrap();

        let at = DateTime::from_timestamp_nanos(1_700_000_000_123_456_789);
        let spec = UpdateSpec::build([update::with_last_login(at)]).unwrap();
        store.update_user(&ctx, "alice", &spec).unwrap();
        assert_eq!(store.get_user(&ctx, "alice").unwrap().last_login, Some(at));
    }

    #[test]
    fn test_delete_unknown_user() {
        let store = SqliteStore::in_memory().unwrap();
        let ctx = OpContext::background();
        let err = store.delete_user(&ctx, "ghost").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
