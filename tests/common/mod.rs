#![allow(dead_code)]

use std::collections::HashMap;

use quill::binding::StatementHandle;
use quill::prelude::*;
use quill::types::DataTypeInfo;

pub mod helpers;

pub struct Users {
    pub table: Table,
    pub id: Field<i32>,
    pub name: Field<String>,
    pub email: Field<String>,
    pub age: Field<i32>,
}

impl Users {
    pub fn new() -> Self {
        Self::from_table(Table::new("users"))
    }

    /// Columns qualified by `alias`.
    pub fn aliased(alias: &str) -> Self {
        Self::from_table(Table::new("users").as_(alias))
    }

    fn from_table(table: Table) -> Self {
        Users {
            id: table.column("id"),
            name: table.column("name"),
            email: table.column("email"),
            age: table.column("age"),
            table,
        }
    }
}

pub struct Posts {
    pub table: Table,
    pub id: Field<i32>,
    pub author_id: Field<i32>,
    pub title: Field<String>,
}

impl Posts {
    pub fn new() -> Self {
        let table = Table::new("posts");
        Posts {
            id: table.qualified("id"),
            author_id: table.qualified("author_id"),
            title: table.qualified("title"),
            table,
        }
    }
}

pub fn render(dialect: Dialect, query: &impl ToStatement) -> RenderedQuery {
    DslContext::new(dialect)
        .render(query)
        .unwrap_or_else(|e| panic!("render failed for {dialect}: {e}"))
}

pub fn render_err(dialect: Dialect, query: &impl ToStatement) -> QuillError {
    match DslContext::new(dialect).render(query) {
        Ok(rendered) => panic!("expected an error for {dialect}, got {}", rendered.sql()),
        Err(e) => e,
    }
}

/// A statement handle that records what the binder sends it.
#[derive(Debug, Default)]
pub struct Recorder {
    pub calls: Vec<Recorded>,
    pub out_values: HashMap<usize, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    Value(usize, Value),
    Null(usize),
    Out(usize),
}

impl StatementHandle for Recorder {
    fn set_value(&mut self, index: usize, _: &DataTypeInfo, value: &Value) -> quill::Result<()> {
        self.calls.push(Recorded::Value(index, value.clone()));
        Ok(())
    }

    fn set_null(&mut self, index: usize, _: &DataTypeInfo) -> quill::Result<()> {
        self.calls.push(Recorded::Null(index));
        Ok(())
    }

    fn register_out_parameter(&mut self, index: usize, _: &DataTypeInfo) -> quill::Result<()> {
        self.calls.push(Recorded::Out(index));
        Ok(())
    }

    fn out_parameter(&self, index: usize) -> quill::Result<Value> {
        self.out_values
            .get(&index)
            .cloned()
            .ok_or_else(|| QuillError::Statement {
                index,
                message: "not an OUT parameter".into(),
            })
    }
}
