//! Classification of sqlx/MySQL failures into [`StoreError`]s.

use once_cell::sync::Lazy;
use regex::Regex;
use sqlx::error::{DatabaseError, ErrorKind};
use sqlx::mysql::MySqlDatabaseError;
use um_core::errors::{StoreError, StoreErrorCode};

const ER_DUP_ENTRY: u16 = 1062;
const ER_ROW_IS_REFERENCED: u16 = 1451;
const ER_NO_REFERENCED_ROW: u16 = 1452;
const ER_BAD_NULL: u16 = 1048;
const ER_CHECK_CONSTRAINT_VIOLATED: u16 = 3819;

static DUPLICATE_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Duplicate entry '(?P<value>.*)' for key '(?:\w+\.)?(?P<key>\w+)'")
        .expect("valid duplicate entry pattern")
});

static FOREIGN_KEY_COLUMN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"FOREIGN KEY \(`(?P<column>\w+)`\)").expect("valid foreign key pattern")
});

static NULL_COLUMN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Column '(?P<column>\w+)' cannot be null").expect("valid null column pattern")
});

static CHECK_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Check constraint '(?P<name>\w+)' is violated").expect("valid check pattern")
});

/// Classify any sqlx error
pub fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::RowNotFound => StoreError::not_found("user"),
        sqlx::Error::Database(db_err) => map_database_error(&*db_err),
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::new(StoreErrorCode::Connection, err.to_string())
        }
        other => StoreError::new(StoreErrorCode::Other, other.to_string()),
    }
}

fn map_database_error(db_err: &dyn DatabaseError) -> StoreError {
    let number = db_err
        .try_downcast_ref::<MySqlDatabaseError>()
        .map(MySqlDatabaseError::number);
    let code = classify(db_err.kind(), number);
    let message = db_err.message();

    let mut error = StoreError::new(code, message);
    match code {
        StoreErrorCode::UniqueConstraint => {
            if let Some(caps) = DUPLICATE_ENTRY.captures(message) {
                error = error
                    .with_fields(vec![field_from_key(&caps["key"])])
                    .with_value(&caps["value"]);
            }
        }
        StoreErrorCode::ForeignKeyConstraint => {
            if let Some(caps) = FOREIGN_KEY_COLUMN.captures(message) {
                error = error.with_fields(vec![caps["column"].to_string()]);
            }
        }
        StoreErrorCode::NullConstraint => {
            if let Some(caps) = NULL_COLUMN.captures(message) {
                error = error.with_fields(vec![caps["column"].to_string()]);
            }
        }
        StoreErrorCode::CheckConstraint => {
            if let Some(caps) = CHECK_NAME.captures(message) {
                error = error.with_fields(vec![field_from_key(&caps["name"])]);
            }
        }
        _ => {}
    }
    error
}

fn classify(kind: ErrorKind, number: Option<u16>) -> StoreErrorCode {
    match kind {
        ErrorKind::UniqueViolation => return StoreErrorCode::UniqueConstraint,
        ErrorKind::ForeignKeyViolation => return StoreErrorCode::ForeignKeyConstraint,
        ErrorKind::NotNullViolation => return StoreErrorCode::NullConstraint,
        ErrorKind::CheckViolation => return StoreErrorCode::CheckConstraint,
        _ => {}
    }

    match number {
        Some(ER_DUP_ENTRY) => StoreErrorCode::UniqueConstraint,
        Some(ER_ROW_IS_REFERENCED) => StoreErrorCode::ForeignKeyConstraint,
        Some(ER_NO_REFERENCED_ROW) => StoreErrorCode::RelatedRecordNotFound,
        Some(ER_BAD_NULL) => StoreErrorCode::NullConstraint,
        Some(ER_CHECK_CONSTRAINT_VIOLATED) => StoreErrorCode::CheckConstraint,
        _ => StoreErrorCode::Other,
    }
}

/// Column name behind an index or constraint name like `users_email_key`
pub(crate) fn field_from_key(key: &str) -> String {
    let key = key.strip_prefix("users_").unwrap_or(key);
    let key = key
        .strip_suffix("_key")
        .or_else(|| key.strip_suffix("_unique"))
        .unwrap_or(key);
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_from_key() {
        assert_eq!(field_from_key("users_email_key"), "email");
        assert_eq!(field_from_key("email_unique"), "email");
        assert_eq!(field_from_key("PRIMARY"), "PRIMARY");
    }

    #[test]
    fn test_classify_prefers_kind() {
        assert_eq!(
            classify(ErrorKind::UniqueViolation, None),
            StoreErrorCode::UniqueConstraint
        );
        assert_eq!(
            classify(ErrorKind::CheckViolation, Some(ER_DUP_ENTRY)),
            StoreErrorCode::CheckConstraint
        );
    }

    #[test]
    fn test_classify_falls_back_to_error_number() {
        assert_eq!(
            classify(ErrorKind::Other, Some(ER_DUP_ENTRY)),
            StoreErrorCode::UniqueConstraint
        );
        assert_eq!(
            classify(ErrorKind::Other, Some(ER_NO_REFERENCED_ROW)),
            StoreErrorCode::RelatedRecordNotFound
        );
        assert_eq!(
            classify(ErrorKind::Other, Some(ER_BAD_NULL)),
            StoreErrorCode::NullConstraint
        );
        assert_eq!(classify(ErrorKind::Other, Some(1213)), StoreErrorCode::Other);
        assert_eq!(classify(ErrorKind::Other, None), StoreErrorCode::Other);
    }

    #[test]
    fn test_duplicate_entry_message_is_parsed() {
        let message = "Duplicate entry 'jon@example.com' for key 'users.users_email_key'";
        let caps = DUPLICATE_ENTRY.captures(message).unwrap();
        assert_eq!(&caps["value"], "jon@example.com");
        assert_eq!(field_from_key(&caps["key"]), "email");

        let older = "Duplicate entry 'jon@example.com' for key 'users_email_key'";
        let caps = DUPLICATE_ENTRY.captures(older).unwrap();
        assert_eq!(field_from_key(&caps["key"]), "email");
    }

    #[test]
    fn test_null_and_foreign_key_messages_are_parsed() {
        let caps = NULL_COLUMN.captures("Column 'name' cannot be null").unwrap();
        assert_eq!(&caps["column"], "name");

        let fk = "Cannot add or update a child row: a foreign key constraint fails \
                  (`db`.`posts`, CONSTRAINT `posts_author_fkey` FOREIGN KEY (`author_id`) \
                  REFERENCES `users` (`id`))";
        let caps = FOREIGN_KEY_COLUMN.captures(fk).unwrap();
        assert_eq!(&caps["column"], "author_id");
    }

    #[test]
    fn test_row_not_found_is_record_not_found() {
        let err = map_sqlx_error(sqlx::Error::RowNotFound);
        assert_eq!(err.code, StoreErrorCode::RecordNotFound);
    }

    #[test]
    fn test_pool_timeout_is_connection_error() {
        let err = map_sqlx_error(sqlx::Error::PoolTimedOut);
        assert_eq!(err.code, StoreErrorCode::Connection);
    }
}
