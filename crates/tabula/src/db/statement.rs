use crate::Result;

use std::{mem, sync::Arc};
use tabula_core::{driver::Connection, stmt, Error};
use tracing::debug;

/// A statement prepared on a [`Session`](super::Session)'s connection.
///
/// Parameters are bound by 1-based position. Rows added with
/// [`add_batch`](Statement::add_batch) are sent together by
/// [`execute_batch`](Statement::execute_batch).
#[derive(Debug)]
pub struct Statement<'a> {
    conn: &'a mut dyn Connection,
    sql: Arc<str>,
    params: Vec<stmt::Value>,
    batch: Vec<Vec<stmt::Value>>,
}

impl<'a> Statement<'a> {
    pub(crate) fn new(conn: &'a mut dyn Connection, sql: Arc<str>) -> Statement<'a> {
        Statement {
            conn,
            sql,
            params: vec![],
            batch: vec![],
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Binds `value` to the parameter at `index`, counting from 1.
    pub fn bind(&mut self, index: usize, value: impl Into<stmt::Value>) -> Result<&mut Self> {
        if index == 0 {
            return Err(Error::invalid_argument("parameter indices start at 1"));
        }

        if self.params.len() < index {
            self.params.resize(index, stmt::Value::Null);
        }
        self.params[index - 1] = value.into();
        Ok(self)
    }

    /// Replaces all bound parameters.
    pub fn bind_all(&mut self, values: Vec<stmt::Value>) -> &mut Self {
        self.params = values;
        self
    }

    /// Moves the bound parameters into the pending batch.
    pub fn add_batch(&mut self) -> &mut Self {
        self.batch.push(mem::take(&mut self.params));
        self
    }

    /// Number of rows waiting in the batch.
    pub fn pending(&self) -> usize {
        self.batch.len()
    }

    /// Sends the pending batch. Returns the number of affected rows.
    pub fn execute_batch(&mut self) -> Result<u64> {
        let batch = mem::take(&mut self.batch);

        if batch.is_empty() {
            return Ok(0);
        }

        debug!("execute batch; rows={}; sql={}", batch.len(), self.sql);
        self.conn.exec_batch(&self.sql, &batch)
    }

    /// Runs the statement with the bound parameters. Returns the number of
    /// affected rows.
    pub fn execute(&mut self) -> Result<u64> {
        let params = mem::take(&mut self.params);

        debug!("execute; params={}; sql={}", params.len(), self.sql);
        self.conn.exec(&self.sql, &params)
    }

    /// Runs the statement with the bound parameters and returns the rows.
    pub fn query(&mut self) -> Result<Vec<stmt::Row>> {
        let params = mem::take(&mut self.params);

        debug!("query; params={}; sql={}", params.len(), self.sql);
        self.conn.query(&self.sql, &params)
    }
}
