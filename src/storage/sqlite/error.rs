//! Classification of `rusqlite` failures into crate errors.

use crate::Error;
use rusqlite::ErrorCode;
use rusqlite::ffi;

/// What kind of statement failed; decides how a foreign-key violation reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Statement {
    /// Select: never trips a foreign key.
    Read,
    /// Insert or update: a dangling reference.
    Write,
    /// Delete: a row something else still points at.
    Delete,
}

/// Maps a driver error onto the crate taxonomy.
pub(super) fn classify(
    operation: &str,
    entity: &'static str,
    statement: Statement,
    err: rusqlite::Error,
) -> Error {
    match &err {
        rusqlite::Error::SqliteFailure(code, message) => {
            let detail = message.clone().unwrap_or_else(|| err.to_string());
            match code.code {
                ErrorCode::ConstraintViolation => match code.extended_code {
                    ffi::SQLITE_CONSTRAINT_FOREIGNKEY => match statement {
                        Statement::Write => Error::NotFound {
                            entity: "reference",
                            id: detail,
                        },
                        Statement::Delete => Error::InUse {
                            entity,
                            id: detail,
                        },
                        Statement::Read => unrecoverable(operation, &err),
                    },
                    ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                        Error::AlreadyExists { entity, detail }
                    },
                    _ => unrecoverable(operation, &err),
                },
                ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked | ErrorCode::CannotOpen => {
                    Error::StoreUnavailable {
                        operation: operation.to_string(),
                        cause: err.to_string(),
                    }
                },
                _ => unrecoverable(operation, &err),
            }
        },
        rusqlite::Error::FromSqlConversionFailure(..) | rusqlite::Error::InvalidColumnType(..) => {
            Error::InvalidData {
                entity,
                reason: err.to_string(),
            }
        },
        _ => unrecoverable(operation, &err),
    }
}

fn unrecoverable(operation: &str, err: &rusqlite::Error) -> Error {
    Error::Unrecoverable {
        operation: operation.to_string(),
        cause: err.to_string(),
    }
}
