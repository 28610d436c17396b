//! User operations. Users are addressed by username through the
//! `user_names` index.

use super::tables::{
    Reader, USER_NAMES, USERS, claim_unique, ensure_absent, get_row, lookup_unique, put_row,
    remove, scan_rows,
};
use super::{BACKEND, MemDbStore};
use crate::filters::{QuerySpec, UpdateSpec};
use crate::models::User;
use crate::storage::OpContext;
use crate::storage::mapper::{ApplyDiff, UserRow, user_diff};
use crate::storage::metrics::observe;
use crate::storage::prepare;
use crate::storage::traits::UserStore;
use crate::{Error, Result};
use chrono::Utc;

const ENTITY: &str = "user";

fn load_by_username(reader: &impl Reader, username: &str) -> Result<UserRow> {
    let id = lookup_unique(reader, USER_NAMES, username)?
        .ok_or_else(|| Error::not_found(ENTITY, username))?;
    get_row(reader, USERS, ENTITY, &id)?.ok_or_else(|| Error::InvalidData {
        entity: ENTITY,
        reason: format!("index references missing user '{id}'"),
    })
}

impl UserStore for MemDbStore {
    #[tracing::instrument(skip(self, ctx, user), fields(backend = BACKEND, username = %user.username))]
    fn store_user(&self, ctx: &OpContext, user: User) -> Result<User> {
        observe(BACKEND, "store_user", || {
            let user = prepare::user(user, Utc::now());
            self.write(ctx, "store_user", |txn| {
                let row = UserRow::from_domain(&user)?;
                ensure_absent(txn, USERS, ENTITY, &row.id)?;
                claim_unique(txn, USER_NAMES, ENTITY, &row.username, &row.id)?;
                put_row(txn, USERS, &row.id, &row)
            })?;
            Ok(user)
        })
    }

    #[tracing::instrument(skip(self, ctx), fields(backend = BACKEND))]
    fn get_user(&self, ctx: &OpContext, username: &str) -> Result<User> {
        observe(BACKEND, "get_user", || {
            self.read(ctx, "get_user", |txn| load_by_username(txn, username)?.to_domain())
        })
    }

    #[tracing::instrument(skip(self, ctx, query), fields(backend = BACKEND))]
    fn find_users(&self, ctx: &OpContext, query: &QuerySpec) -> Result<Vec<User>> {
        observe(BACKEND, "find_users", || {
            if query.has_status_predicate() {
                return Ok(Vec::new());
            }
            self.read(ctx, "find_users", |txn| {
                let names = query.names();
                let rows: Vec<UserRow> = scan_rows(txn, ctx, "find_users", USERS, ENTITY)?;
                rows.iter()
                    .filter(|row| names.as_ref().is_none_or(|n| n.contains(&row.username)))
                    .map(UserRow::to_domain)
                    .collect()
            })
        })
    }

    #[tracing::instrument(skip(self, ctx, update), fields(backend = BACKEND))]
    fn update_user(&self, ctx: &OpContext, username: &str, update: &UpdateSpec) -> Result<()> {
        observe(BACKEND, "update_user", || {
            let diff = user_diff(update, Utc::now())?;
            self.write(ctx, "update_user", |txn| {
                let mut row = load_by_username(txn, username)?;
                row.apply(&diff)?;
                put_row(txn, USERS, &row.id, &row)
            })
        })
    }

    #[tracing::instrument(skip(self, ctx), fields(backend = BACKEND))]
    fn delete_user(&self, ctx: &OpContext, username: &str) -> Result<()> {
        observe(BACKEND, "delete_user", || {
            self.write(ctx, "delete_user", |txn| {
                let row = load_by_username(txn, username)?;
                remove(txn, USER_NAMES, &row.username)?;
                remove(txn, USERS, &row.id)?;
                Ok(())
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::filters::{query, update};

    #[test]
    fn test_username_unique() {
        let store = MemDbStore::new().unwrap();
        let ctx = OpContext::background();
        store.store_user(&ctx, User::new("alice", "h1")).unwrap();
        let err = store.store_user(&ctx, User::new("alice", "h2")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    }

    #[test]
    fn test_update_and_find_by_username() {
        let store = MemDbStore::new().unwrap();
        let ctx = OpContext::background();
        store.store_user(&ctx, User::new("alice", "h1")).unwrap();
        store.store_user(&ctx, User::new("bob", "h2")).unwrap();

        let spec = UpdateSpec::build([update::with_first_name("Alice")]).unwrap();
        store.update_user(&ctx, "alice", &spec).unwrap();
        assert_eq!(
            store.get_user(&ctx, "alice").unwrap().first_name.as_deref(),
            Some("Alice")
        );

        let q = QuerySpec::build([query::with_names(["bob"])]).unwrap();
        let found = store.find_users(&ctx, &q).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].username, "bob");
    }
}
