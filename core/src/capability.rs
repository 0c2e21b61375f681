//! Dialect capability registry.
//!
//! A pure lookup `(Operation, Dialect) -> Support`. The renderer consults it
//! before emitting any dialect-sensitive construct and either renders the
//! native syntax, renders a documented emulation, or fails with
//! [`QuillError::UnsupportedDialect`](crate::QuillError::UnsupportedDialect).

use core::fmt;

use quill_types::Dialect;

use crate::error::{QuillError, Result};

/// How a dialect handles an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Support {
    /// Rendered with native syntax
    Supported,
    /// Rendered through an equivalent rewrite
    Emulated,
    /// Rendering fails with `UnsupportedDialect`
    Unsupported,
}

/// Dialect-sensitive operations known to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    Merge,
    Returning,
    OnConflict,
    NamedParameters,
    Offset,
    FullOuterJoin,
    WindowFunctions,
    WindowClause,
    AggregateFilter,
    ILike,
    IsDistinctFrom,
    QuantifiedComparison,
    ForUpdate,
    SkipLocked,
    Intersect,
    Except,
    CommonTableExpressions,
    NullsOrdering,
    BetweenSymmetric,
    DistinctOn,
    BooleanLiterals,
    ProcedureCall,
    ArrayLiterals,
    BitwiseOperations,
    BitwiseXor,
    MultiRowInsert,
    UpdateFrom,
    DeleteUsing,
}

impl Operation {
    pub const ALL: [Operation; 28] = [
        Operation::Merge,
        Operation::Returning,
        Operation::OnConflict,
        Operation::NamedParameters,
        Operation::Offset,
        Operation::FullOuterJoin,
        Operation::WindowFunctions,
        Operation::WindowClause,
        Operation::AggregateFilter,
        Operation::ILike,
        Operation::IsDistinctFrom,
        Operation::QuantifiedComparison,
        Operation::ForUpdate,
        Operation::SkipLocked,
        Operation::Intersect,
        Operation::Except,
        Operation::CommonTableExpressions,
        Operation::NullsOrdering,
        Operation::BetweenSymmetric,
        Operation::DistinctOn,
        Operation::BooleanLiterals,
        Operation::ProcedureCall,
        Operation::ArrayLiterals,
        Operation::BitwiseOperations,
        Operation::BitwiseXor,
        Operation::MultiRowInsert,
        Operation::UpdateFrom,
        Operation::DeleteUsing,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Operation::Merge => "MERGE",
            Operation::Returning => "RETURNING",
            Operation::OnConflict => "ON CONFLICT",
            Operation::NamedParameters => "named parameters",
            Operation::Offset => "OFFSET",
            Operation::FullOuterJoin => "FULL OUTER JOIN",
            Operation::WindowFunctions => "window functions",
            Operation::WindowClause => "WINDOW clause",
            Operation::AggregateFilter => "aggregate FILTER",
            Operation::ILike => "ILIKE",
            Operation::IsDistinctFrom => "IS DISTINCT FROM",
            Operation::QuantifiedComparison => "quantified comparison",
            Operation::ForUpdate => "FOR UPDATE",
            Operation::SkipLocked => "SKIP LOCKED",
            Operation::Intersect => "INTERSECT",
            Operation::Except => "EXCEPT",
            Operation::CommonTableExpressions => "common table expressions",
            Operation::NullsOrdering => "NULLS FIRST/LAST",
            Operation::BetweenSymmetric => "BETWEEN SYMMETRIC",
            Operation::DistinctOn => "DISTINCT ON",
            Operation::BooleanLiterals => "boolean literals",
            Operation::ProcedureCall => "procedure call",
            Operation::ArrayLiterals => "array literals",
            Operation::BitwiseOperations => "bitwise operations",
            Operation::BitwiseXor => "bitwise XOR",
            Operation::MultiRowInsert => "multi-row INSERT",
            Operation::UpdateFrom => "UPDATE .. FROM",
            Operation::DeleteUsing => "DELETE .. USING",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Look up how `dialect` handles `operation`.
#[must_use]
pub const fn support(operation: Operation, dialect: Dialect) -> Support {
    use Dialect as D;
    use Operation as O;
    use Support::{Emulated, Supported, Unsupported};

    match operation {
        O::Merge => match dialect {
            D::MySQL | D::MariaDB | D::SQLite | D::CockroachDB | D::DuckDB => Emulated,
            D::ClickHouse => Unsupported,
            _ => Supported,
        },
        O::Returning => match dialect {
            D::PostgreSQL
            | D::CockroachDB
            | D::SQLite
            | D::MariaDB
            | D::DuckDB
            | D::Firebird => Supported,
            D::SqlServer => Emulated,
            _ => Unsupported,
        },
        O::OnConflict => match dialect {
            D::PostgreSQL | D::CockroachDB | D::SQLite | D::DuckDB => Supported,
            D::ClickHouse => Unsupported,
            _ => Emulated,
        },
        O::NamedParameters => match dialect {
            D::Oracle
            | D::SQLite
            | D::H2
            | D::Db2
            | D::Informix
            | D::DuckDB
            | D::Hsqldb
            | D::Default => Supported,
            _ => Emulated,
        },
        O::Offset => match dialect {
            D::Teradata => Emulated,
            D::Sybase => Unsupported,
            _ => Supported,
        },
        O::FullOuterJoin => match dialect {
            D::MySQL | D::MariaDB | D::Cubrid | D::Derby => Unsupported,
            _ => Supported,
        },
        O::WindowFunctions => match dialect {
            D::Derby | D::Sybase => Unsupported,
            _ => Supported,
        },
        O::WindowClause => match dialect {
            D::Default
            | D::PostgreSQL
            | D::CockroachDB
            | D::MySQL
            | D::MariaDB
            | D::SQLite
            | D::H2
            | D::DuckDB
            | D::Trino
            | D::BigQuery
            | D::ClickHouse => Supported,
            D::Derby | D::Sybase => Unsupported,
            _ => Emulated,
        },
        O::AggregateFilter => match dialect {
            D::Default
            | D::PostgreSQL
            | D::CockroachDB
            | D::SQLite
            | D::DuckDB
            | D::H2
            | D::Hsqldb
            | D::Trino => Supported,
            _ => Emulated,
        },
        O::ILike => match dialect {
            D::PostgreSQL
            | D::CockroachDB
            | D::Redshift
            | D::DuckDB
            | D::H2
            | D::Snowflake
            | D::ClickHouse => Supported,
            _ => Emulated,
        },
        O::IsDistinctFrom => match dialect {
            D::MySQL
            | D::MariaDB
            | D::SQLite
            | D::Oracle
            | D::Sybase
            | D::Teradata
            | D::Informix
            | D::Cubrid
            | D::Derby
            | D::ClickHouse => Emulated,
            _ => Supported,
        },
        O::QuantifiedComparison => match dialect {
            D::SQLite => Emulated,
            D::ClickHouse => Unsupported,
            _ => Supported,
        },
        O::ForUpdate => match dialect {
            D::SQLite
            | D::SqlServer
            | D::ClickHouse
            | D::BigQuery
            | D::Redshift
            | D::Snowflake
            | D::Trino
            | D::DuckDB
            | D::Teradata => Unsupported,
            _ => Supported,
        },
        O::SkipLocked => match dialect {
            D::PostgreSQL | D::MySQL | D::MariaDB | D::Oracle | D::CockroachDB => Supported,
            _ => Unsupported,
        },
        O::Intersect => match dialect {
            D::Sybase => Unsupported,
            _ => Supported,
        },
        O::Except => match dialect {
            D::Oracle => Emulated,
            D::Sybase => Unsupported,
            _ => Supported,
        },
        O::CommonTableExpressions => match dialect {
            D::Sybase => Unsupported,
            _ => Supported,
        },
        O::NullsOrdering => match dialect {
            D::MySQL | D::MariaDB | D::SqlServer | D::Sybase | D::Teradata | D::Cubrid => {
                Emulated
            }
            _ => Supported,
        },
        O::BetweenSymmetric => match dialect {
            D::Default | D::PostgreSQL | D::CockroachDB | D::Hsqldb => Supported,
            _ => Emulated,
        },
        O::DistinctOn => match dialect {
            D::PostgreSQL | D::CockroachDB | D::DuckDB => Supported,
            _ => Unsupported,
        },
        O::BooleanLiterals => match dialect {
            D::Oracle | D::SqlServer | D::Sybase | D::Teradata | D::Informix | D::Cubrid => {
                Emulated
            }
            _ => Supported,
        },
        O::ProcedureCall => match dialect {
            D::SQLite | D::ClickHouse | D::DuckDB => Unsupported,
            _ => Supported,
        },
        O::ArrayLiterals => match dialect {
            D::PostgreSQL
            | D::CockroachDB
            | D::DuckDB
            | D::H2
            | D::Hsqldb
            | D::Trino
            | D::BigQuery
            | D::ClickHouse
            | D::Snowflake => Supported,
            _ => Unsupported,
        },
        O::BitwiseOperations => match dialect {
            D::Oracle | D::Firebird | D::Db2 | D::Hsqldb | D::H2 | D::Teradata => Emulated,
            D::Derby => Unsupported,
            _ => Supported,
        },
        O::BitwiseXor => match dialect {
            D::Oracle
            | D::SQLite
            | D::Firebird
            | D::Db2
            | D::Hsqldb
            | D::H2
            | D::Teradata => Emulated,
            D::Derby => Unsupported,
            _ => Supported,
        },
        O::MultiRowInsert => match dialect {
            D::Oracle | D::Firebird | D::Sybase | D::Informix | D::Teradata => Emulated,
            _ => Supported,
        },
        O::UpdateFrom => match dialect {
            D::PostgreSQL
            | D::CockroachDB
            | D::Redshift
            | D::SQLite
            | D::DuckDB
            | D::SqlServer
            | D::Snowflake => Supported,
            _ => Unsupported,
        },
        O::DeleteUsing => match dialect {
            D::PostgreSQL | D::CockroachDB | D::Redshift | D::DuckDB | D::Snowflake => Supported,
            D::MySQL | D::MariaDB | D::SqlServer => Emulated,
            _ => Unsupported,
        },
    }
}

/// Fails with `UnsupportedDialect` unless `operation` is supported or emulated.
pub fn require(operation: Operation, dialect: Dialect) -> Result<Support> {
    match support(operation, dialect) {
        Support::Unsupported => Err(QuillError::unsupported(operation, dialect)),
        other => Ok(other),
    }
}

/// Capability listing of a single dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    dialect: Dialect,
}

impl Capabilities {
    #[must_use]
    pub const fn of(dialect: Dialect) -> Self {
        Self { dialect }
    }

    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    #[must_use]
    pub const fn support(&self, operation: Operation) -> Support {
        support(operation, self.dialect)
    }

    /// Operations rendered natively or through an emulation.
    pub fn renderable(&self) -> impl Iterator<Item = Operation> + '_ {
        self.with(|s| s != Support::Unsupported)
    }

    pub fn supported(&self) -> impl Iterator<Item = Operation> + '_ {
        self.with(|s| s == Support::Supported)
    }

    pub fn emulated(&self) -> impl Iterator<Item = Operation> + '_ {
        self.with(|s| s == Support::Emulated)
    }

    pub fn unsupported(&self) -> impl Iterator<Item = Operation> + '_ {
        self.with(|s| s == Support::Unsupported)
    }

    fn with(&self, pred: impl Fn(Support) -> bool + 'static) -> impl Iterator<Item = Operation> + '_ {
        Operation::ALL
            .into_iter()
            .filter(move |op| pred(support(*op, self.dialect)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_is_total() {
        for dialect in Dialect::ALL {
            let caps = Capabilities::of(dialect);
            let total = caps.supported().count() + caps.emulated().count() + caps.unsupported().count();
            assert_eq!(total, Operation::ALL.len(), "{dialect}");
        }
    }

    #[test]
    fn require_reports_operation_and_dialect() {
        let err = require(Operation::DistinctOn, Dialect::MySQL).unwrap_err();
        assert_eq!(
            err.to_string(),
            "DISTINCT ON is not supported by dialect mysql"
        );
        assert_eq!(
            require(Operation::Merge, Dialect::SQLite).unwrap(),
            Support::Emulated
        );
    }

    #[test]
    fn postgres_profile() {
        let caps = Capabilities::of(Dialect::PostgreSQL);
        assert_eq!(caps.support(Operation::Returning), Support::Supported);
        assert_eq!(caps.support(Operation::OnConflict), Support::Supported);
        assert_eq!(caps.support(Operation::DistinctOn), Support::Supported);
        assert_eq!(caps.support(Operation::BitwiseXor), Support::Supported);
    }
}
