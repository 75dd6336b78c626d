//! Structured view of SQLite constraint failures.
//!
//! The category comes from the extended result code. SQLite appends the
//! offending `table.column` list (UNIQUE, NOT NULL) or the constraint name
//! (CHECK) after the first `": "` of its message; that detail is split out
//! here so callers match on fields, never on message text.

use rusqlite::{ErrorCode, ffi};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
  Unique { table: String, columns: Vec<String> },
  /// SQLite does not report which reference failed.
  ForeignKey,
  Check { constraint: String },
  NotNull { table: String, column: String },
}

impl Violation {
  /// Classify `err`, or `None` if it is not a recognised constraint failure.
  pub fn from_error(err: &rusqlite::Error) -> Option<Self> {
    let rusqlite::Error::SqliteFailure(failure, message) = err else {
      return None;
    };
    if failure.code != ErrorCode::ConstraintViolation {
      return None;
    }
    let detail = message.as_deref().and_then(|m| m.split_once(": ")).map(|(_, d)| d.trim());

    match failure.extended_code {
      ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
        let mut table = None;
        let mut columns = Vec::new();
        for qualified in detail?.split(", ") {
          let (t, column) = qualified.split_once('.')?;
          table.get_or_insert_with(|| t.to_owned());
          columns.push(column.to_owned());
        }
        Some(Violation::Unique { table: table?, columns })
      }
      ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Some(Violation::ForeignKey),
      ffi::SQLITE_CONSTRAINT_CHECK => {
        Some(Violation::Check { constraint: detail?.to_owned() })
      }
      ffi::SQLITE_CONSTRAINT_NOTNULL => {
        let (table, column) = detail?.split_once('.')?;
        Some(Violation::NotNull { table: table.to_owned(), column: column.to_owned() })
      }
      _ => None,
    }
  }

  /// Whether this is a UNIQUE failure on exactly `table.column`.
  pub fn is_unique(&self, table: &str, column: &str) -> bool {
    matches!(self, Violation::Unique { table: t, columns } if t == table && columns == &[column])
  }
}
