//! Table references: named tables, derived tables and joins.

use super::expr::{Expr, Field};
use crate::name::{Name, QualifiedName};
use crate::query::Select;
use crate::types::{DataType, SqlValue};
use crate::value::Value;

/// A named table, optionally schema-qualified and aliased.
///
/// Columns created from an aliased table are qualified by the alias; columns
/// of an unaliased table are unqualified unless requested through
/// [`Table::qualified`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Table {
    name: QualifiedName,
    alias: Option<Name>,
}

impl Table {
    pub fn new(name: impl Into<Name>) -> Self {
        Self {
            name: QualifiedName::from(name.into()),
            alias: None,
        }
    }

    pub fn with_schema(schema: impl Into<Name>, name: impl Into<Name>) -> Self {
        Self {
            name: QualifiedName::new([schema.into(), name.into()]),
            alias: None,
        }
    }

    #[must_use]
    pub fn as_(&self, alias: impl Into<Name>) -> Table {
        Table {
            name: self.name.clone(),
            alias: Some(alias.into()),
        }
    }

    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    pub fn alias(&self) -> Option<&Name> {
        self.alias.as_ref()
    }

    /// Qualifier columns of this table should use: the alias if any.
    fn qualifier(&self) -> QualifiedName {
        match &self.alias {
            Some(alias) => QualifiedName::from(alias.clone()),
            None => self.name.clone(),
        }
    }

    /// Column with `T`'s native data type.
    pub fn column<T: SqlValue>(&self, name: impl Into<Name>) -> Field<T> {
        self.field_of(name, T::data_type())
    }

    /// Column with an explicit data type.
    pub fn field_of<T: 'static>(&self, name: impl Into<Name>, data_type: DataType<T>) -> Field<T> {
        let expr = match &self.alias {
            Some(alias) => Expr::qualified_column(alias.clone(), name),
            None => Expr::column(name),
        };
        Field::new(expr, data_type)
    }

    /// Column always qualified by the table name or alias.
    pub fn qualified<T: SqlValue>(&self, name: impl Into<Name>) -> Field<T> {
        Field::new(
            Expr::qualified_column(self.qualifier(), name),
            T::data_type(),
        )
    }

    /// `<table>.*`.
    pub fn asterisk(&self) -> Field<Value> {
        Field::new(
            Expr::Asterisk(Some(self.qualifier())),
            crate::types::sql_data_type::other(),
        )
    }
}

/// A select used as a table: `(select ..) as <alias>(<columns>)`.
#[derive(Debug, Clone)]
pub struct DerivedTable {
    query: Box<Select>,
    alias: Name,
    columns: Vec<Name>,
}

impl DerivedTable {
    pub fn new(query: Select, alias: impl Into<Name>) -> Self {
        Self {
            query: Box::new(query),
            alias: alias.into(),
            columns: Vec::new(),
        }
    }

    /// Rename the derived columns.
    #[must_use]
    pub fn with_columns<I, N>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Name>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn alias(&self) -> &Name {
        &self.alias
    }

    /// Column of the derived table, qualified by its alias.
    pub fn column<T: SqlValue>(&self, name: impl Into<Name>) -> Field<T> {
        Field::new(
            Expr::qualified_column(self.alias.clone(), name),
            T::data_type(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            JoinKind::Inner => "join",
            JoinKind::Left => "left outer join",
            JoinKind::Right => "right outer join",
            JoinKind::Full => "full outer join",
            JoinKind::Cross => "cross join",
        }
    }
}

#[derive(Debug, Clone)]
pub enum JoinConstraint {
    None,
    On(Expr),
    Using(Vec<Name>),
}

#[derive(Debug, Clone)]
pub struct Join {
    pub left: TableRef,
    pub kind: JoinKind,
    pub right: TableRef,
    pub constraint: JoinConstraint,
}

/// A FROM item.
#[derive(Debug, Clone)]
pub enum TableRef {
    Named {
        name: QualifiedName,
        alias: Option<Name>,
    },
    Derived {
        query: Box<Select>,
        alias: Name,
        columns: Vec<Name>,
    },
    Join(Box<Join>),
}

impl TableRef {
    /// `self <kind> right <constraint>`.
    pub fn join(self, kind: JoinKind, right: impl Into<TableRef>, constraint: JoinConstraint) -> TableRef {
        TableRef::Join(Box::new(Join {
            left: self,
            kind,
            right: right.into(),
            constraint,
        }))
    }

    /// Name the table is referenced by in the enclosing query.
    pub fn reference_name(&self) -> Option<&Name> {
        match self {
            TableRef::Named { name, alias } => alias.as_ref().or(name.last()),
            TableRef::Derived { alias, .. } => Some(alias),
            TableRef::Join(_) => None,
        }
    }

    /// Name of a plain table reference.
    pub fn table_name(&self) -> Option<&QualifiedName> {
        match self {
            TableRef::Named { name, .. } => Some(name),
            _ => None,
        }
    }
}

impl From<Table> for TableRef {
    fn from(table: Table) -> Self {
        TableRef::Named {
            name: table.name,
            alias: table.alias,
        }
    }
}

impl From<&Table> for TableRef {
    fn from(table: &Table) -> Self {
        table.clone().into()
    }
}

impl From<DerivedTable> for TableRef {
    fn from(table: DerivedTable) -> Self {
        TableRef::Derived {
            query: table.query,
            alias: table.alias,
            columns: table.columns,
        }
    }
}

impl From<&DerivedTable> for TableRef {
    fn from(table: &DerivedTable) -> Self {
        table.clone().into()
    }
}

impl From<&str> for TableRef {
    fn from(name: &str) -> Self {
        TableRef::Named {
            name: QualifiedName::from(name),
            alias: None,
        }
    }
}
