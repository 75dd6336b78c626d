//! The unit of work: one transaction per logical write.
//!
//! [`in_transaction`] is the only way the store opens a write transaction.
//! Whatever the closure does, the transaction is released exactly once:
//! committed when it returns `Ok`, rolled back when it returns `Err` or
//! panics.

use std::{
  any::Any,
  panic::{self, AssertUnwindSafe},
};

use rusqlite::{Connection, Transaction, TransactionBehavior};
use tracing::{error, warn};

use crate::{Error, Result};

/// Run `f` inside an immediate transaction on `conn`.
///
/// `operation` names the unit of work in logs and in the error returned when
/// `f` panics ([`Error::Aborted`]).
pub fn in_transaction<T>(
  conn: &mut Connection,
  operation: &str,
  f: impl FnOnce(&Transaction<'_>) -> Result<T>,
) -> Result<T> {
  let tx = conn
    .transaction_with_behavior(TransactionBehavior::Immediate)
    .map_err(|e| Error::statement("begin transaction", e))?;

  match panic::catch_unwind(AssertUnwindSafe(|| f(&tx))) {
    Ok(Ok(value)) => {
      tx.commit().map_err(|e| Error::statement("commit", e))?;
      Ok(value)
    }
    Ok(Err(err)) => {
      warn!(operation, error = %err, "rolling back");
      rollback(tx, operation);
      Err(err)
    }
    Err(payload) => {
      let message = panic_message(payload.as_ref());
      error!(operation, panic = %message, "unit of work panicked; rolling back");
      rollback(tx, operation);
      Err(Error::Aborted { operation: operation.to_owned(), message })
    }
  }
}

fn rollback(tx: Transaction<'_>, operation: &str) {
  if let Err(e) = tx.rollback() {
    error!(operation, error = %e, "rollback failed");
  }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
  if let Some(s) = payload.downcast_ref::<&str>() {
    (*s).to_owned()
  } else if let Some(s) = payload.downcast_ref::<String>() {
    s.clone()
  } else {
    "unknown panic".to_owned()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("CREATE TABLE t (v INTEGER NOT NULL)").unwrap();
    conn
  }

  fn count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM t", [], |r| r.get(0)).unwrap()
  }

  fn insert(tx: &Transaction<'_>, v: i64) -> Result<()> {
    tx.execute("INSERT INTO t (v) VALUES (?1)", [v])?;
    Ok(())
  }

  #[test]
  fn commits_on_ok() {
    let mut conn = conn();
    let out = in_transaction(&mut conn, "insert", |tx| {
      insert(tx, 1)?;
      insert(tx, 2)?;
      Ok("done")
    })
    .unwrap();
    assert_eq!(out, "done");
    assert_eq!(count(&conn), 2);
  }

  #[test]
  fn rolls_back_on_err() {
    let mut conn = conn();
    let err = in_transaction(&mut conn, "insert", |tx| {
      insert(tx, 1)?;
      Err::<(), _>(Error::DateParse("boom".into()))
    })
    .unwrap_err();
    assert!(matches!(err, Error::DateParse(_)));
    assert_eq!(count(&conn), 0);
  }

  #[test]
  fn rolls_back_on_panic() {
    let mut conn = conn();
    let err = in_transaction(&mut conn, "insert", |tx| -> Result<()> {
      insert(tx, 1)?;
      panic!("fault mid-sequence");
    })
    .unwrap_err();

    match err {
      Error::Aborted { operation, message } => {
        assert_eq!(operation, "insert");
        assert_eq!(message, "fault mid-sequence");
      }
      other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(count(&conn), 0);

    // The connection is still usable afterwards.
    in_transaction(&mut conn, "insert", |tx| insert(tx, 3)).unwrap();
    assert_eq!(count(&conn), 1);
  }
}
