//! Unified SQL dialect enum
//!
//! This module is the single source of truth for dialect identification and for
//! the handful of purely syntactic properties (quoting, limit clause style,
//! dummy tables) that do not depend on capability lookups.

/// SQL dialect for database-specific rendering.
///
/// Each dialect has different identifier quoting, limit syntax and a different
/// set of supported operations. Operation support lives in the capability
/// registry of `quill-core`; this enum only knows syntax.
///
/// # Examples
///
/// ```
/// use quill_types::Dialect;
///
/// let dialect = Dialect::PostgreSQL;
/// assert!(dialect.is_postgres_family());
/// assert_eq!(Dialect::parse("mssql"), Some(Dialect::SqlServer));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Dialect {
    /// ISO/IEC 9075 SQL without vendor extensions
    #[default]
    Default,
    BigQuery,
    ClickHouse,
    CockroachDB,
    Cubrid,
    Db2,
    Derby,
    DuckDB,
    Firebird,
    H2,
    Hsqldb,
    Informix,
    MariaDB,
    MySQL,
    Oracle,
    PostgreSQL,
    Redshift,
    Snowflake,
    SQLite,
    SqlServer,
    Sybase,
    Teradata,
    Trino,
}

/// How a dialect expresses row limiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitStyle {
    /// `limit ? offset ?`
    LimitOffset,
    /// `offset ? rows fetch next ? rows only`
    OffsetFetch,
    /// `select top n ...`, no native offset
    Top,
    /// `select skip ? first ? ...`
    SkipFirst,
}

/// Identifier delimiters used by a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteStyle {
    /// `"name"`
    DoubleQuote,
    /// `` `name` ``
    Backtick,
    /// `[name]`
    Bracket,
}

impl QuoteStyle {
    /// Opening and closing delimiter characters.
    #[inline]
    #[must_use]
    pub const fn delimiters(self) -> (char, char) {
        match self {
            QuoteStyle::DoubleQuote => ('"', '"'),
            QuoteStyle::Backtick => ('`', '`'),
            QuoteStyle::Bracket => ('[', ']'),
        }
    }
}

impl Dialect {
    /// Every supported dialect, in declaration order.
    pub const ALL: [Dialect; 23] = [
        Dialect::Default,
        Dialect::BigQuery,
        Dialect::ClickHouse,
        Dialect::CockroachDB,
        Dialect::Cubrid,
        Dialect::Db2,
        Dialect::Derby,
        Dialect::DuckDB,
        Dialect::Firebird,
        Dialect::H2,
        Dialect::Hsqldb,
        Dialect::Informix,
        Dialect::MariaDB,
        Dialect::MySQL,
        Dialect::Oracle,
        Dialect::PostgreSQL,
        Dialect::Redshift,
        Dialect::Snowflake,
        Dialect::SQLite,
        Dialect::SqlServer,
        Dialect::Sybase,
        Dialect::Teradata,
        Dialect::Trino,
    ];

    /// Parse a dialect from a string (case-insensitive)
    ///
    /// Supports common aliases such as `pg`, `postgres`, `mssql` and `sqlserver`.
    ///
    /// ```
    /// use quill_types::Dialect;
    ///
    /// assert_eq!(Dialect::parse("sqlite"), Some(Dialect::SQLite));
    /// assert_eq!(Dialect::parse("pg"), Some(Dialect::PostgreSQL));
    /// assert_eq!(Dialect::parse("unknown"), None);
    /// ```
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        const ALIASES: &[(&str, Dialect)] = &[
            ("default", Dialect::Default),
            ("sql", Dialect::Default),
            ("bigquery", Dialect::BigQuery),
            ("clickhouse", Dialect::ClickHouse),
            ("cockroachdb", Dialect::CockroachDB),
            ("cockroach", Dialect::CockroachDB),
            ("cubrid", Dialect::Cubrid),
            ("db2", Dialect::Db2),
            ("derby", Dialect::Derby),
            ("duckdb", Dialect::DuckDB),
            ("firebird", Dialect::Firebird),
            ("h2", Dialect::H2),
            ("hsqldb", Dialect::Hsqldb),
            ("informix", Dialect::Informix),
            ("mariadb", Dialect::MariaDB),
            ("mysql", Dialect::MySQL),
            ("oracle", Dialect::Oracle),
            ("postgresql", Dialect::PostgreSQL),
            ("postgres", Dialect::PostgreSQL),
            ("pg", Dialect::PostgreSQL),
            ("redshift", Dialect::Redshift),
            ("snowflake", Dialect::Snowflake),
            ("sqlite", Dialect::SQLite),
            ("sqlserver", Dialect::SqlServer),
            ("mssql", Dialect::SqlServer),
            ("sybase", Dialect::Sybase),
            ("ase", Dialect::Sybase),
            ("teradata", Dialect::Teradata),
            ("trino", Dialect::Trino),
        ];

        ALIASES
            .iter()
            .find(|(alias, _)| s.eq_ignore_ascii_case(alias))
            .map(|(_, dialect)| *dialect)
    }

    /// Get the dialect name as a lowercase string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Dialect::Default => "default",
            Dialect::BigQuery => "bigquery",
            Dialect::ClickHouse => "clickhouse",
            Dialect::CockroachDB => "cockroachdb",
            Dialect::Cubrid => "cubrid",
            Dialect::Db2 => "db2",
            Dialect::Derby => "derby",
            Dialect::DuckDB => "duckdb",
            Dialect::Firebird => "firebird",
            Dialect::H2 => "h2",
            Dialect::Hsqldb => "hsqldb",
            Dialect::Informix => "informix",
            Dialect::MariaDB => "mariadb",
            Dialect::MySQL => "mysql",
            Dialect::Oracle => "oracle",
            Dialect::PostgreSQL => "postgresql",
            Dialect::Redshift => "redshift",
            Dialect::Snowflake => "snowflake",
            Dialect::SQLite => "sqlite",
            Dialect::SqlServer => "sqlserver",
            Dialect::Sybase => "sybase",
            Dialect::Teradata => "teradata",
            Dialect::Trino => "trino",
        }
    }

    /// PostgreSQL and the dialects that speak its wire syntax.
    #[inline]
    #[must_use]
    pub const fn is_postgres_family(&self) -> bool {
        matches!(
            self,
            Dialect::PostgreSQL | Dialect::CockroachDB | Dialect::Redshift
        )
    }

    /// MySQL and MariaDB.
    #[inline]
    #[must_use]
    pub const fn is_mysql_family(&self) -> bool {
        matches!(self, Dialect::MySQL | Dialect::MariaDB)
    }

    /// Dialect whose rendering rules this dialect shares.
    #[must_use]
    pub const fn family(&self) -> Dialect {
        if self.is_postgres_family() {
            Dialect::PostgreSQL
        } else if self.is_mysql_family() {
            Dialect::MySQL
        } else {
            *self
        }
    }

    /// Identifier delimiters.
    #[must_use]
    pub const fn quote_style(&self) -> QuoteStyle {
        match self {
            Dialect::MySQL | Dialect::MariaDB | Dialect::BigQuery => QuoteStyle::Backtick,
            Dialect::SqlServer | Dialect::Sybase => QuoteStyle::Bracket,
            _ => QuoteStyle::DoubleQuote,
        }
    }

    /// Row limiting syntax.
    #[must_use]
    pub const fn limit_style(&self) -> LimitStyle {
        match self {
            Dialect::Default
            | Dialect::Oracle
            | Dialect::Db2
            | Dialect::Derby
            | Dialect::SqlServer
            | Dialect::Firebird
            | Dialect::Trino => LimitStyle::OffsetFetch,
            Dialect::Sybase | Dialect::Teradata => LimitStyle::Top,
            Dialect::Informix => LimitStyle::SkipFirst,
            _ => LimitStyle::LimitOffset,
        }
    }

    /// Whether `OFFSET .. FETCH` requires an `ORDER BY` clause.
    #[inline]
    #[must_use]
    pub const fn offset_requires_order_by(&self) -> bool {
        matches!(self, Dialect::SqlServer)
    }

    /// Whether table aliases may be introduced with `AS`.
    #[inline]
    #[must_use]
    pub const fn supports_table_alias_as(&self) -> bool {
        !matches!(self, Dialect::Oracle)
    }

    /// Table to select from when a query has no FROM clause, if the dialect
    /// requires one.
    #[must_use]
    pub const fn dummy_table(&self) -> Option<&'static str> {
        match self {
            Dialect::Oracle => Some("dual"),
            Dialect::Db2 | Dialect::Derby => Some("sysibm.sysdummy1"),
            Dialect::Firebird => Some("rdb$database"),
            Dialect::Hsqldb => Some("(values (0))"),
            Dialect::Informix => Some("(select 1 as dual from systables where tabid = 1)"),
            Dialect::Cubrid => Some("db_root"),
            _ => None,
        }
    }

    /// Largest number of elements the dialect accepts in one IN list.
    #[must_use]
    pub const fn max_in_list_size(&self) -> Option<usize> {
        match self {
            Dialect::Oracle => Some(1000),
            _ => None,
        }
    }

    /// Whether recursive common table expressions need `with recursive`.
    #[must_use]
    pub const fn requires_recursive_keyword(&self) -> bool {
        !matches!(
            self,
            Dialect::Oracle
                | Dialect::SqlServer
                | Dialect::Db2
                | Dialect::Sybase
                | Dialect::Informix
        )
    }

    /// Renders a numbered placeholder for the given 1-based index.
    ///
    /// - PostgreSQL family and DuckDB: `$1`, `$2`, ...
    /// - SQLite: `?1`, `?2`, ...
    /// - Oracle: `:1`, `:2`, ...
    /// - everything else: `?`
    #[must_use]
    pub fn numbered_placeholder(&self, index: usize) -> String {
        match self {
            Dialect::PostgreSQL | Dialect::CockroachDB | Dialect::Redshift | Dialect::DuckDB => {
                format!("${index}")
            }
            Dialect::SQLite => format!("?{index}"),
            Dialect::Oracle => format!(":{index}"),
            _ => "?".to_string(),
        }
    }
}

impl core::fmt::Display for Dialect {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for Dialect {
    type Err = DialectParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dialect::parse(s).ok_or(DialectParseError)
    }
}

/// Error returned when parsing an unknown dialect string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialectParseError;

impl core::fmt::Display for DialectParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("unknown dialect")
    }
}

impl std::error::Error for DialectParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_parse() {
        assert_eq!(Dialect::parse("sqlite"), Some(Dialect::SQLite));
        assert_eq!(Dialect::parse("SQLite"), Some(Dialect::SQLite));
        assert_eq!(Dialect::parse("postgresql"), Some(Dialect::PostgreSQL));
        assert_eq!(Dialect::parse("postgres"), Some(Dialect::PostgreSQL));
        assert_eq!(Dialect::parse("PG"), Some(Dialect::PostgreSQL));
        assert_eq!(Dialect::parse("mssql"), Some(Dialect::SqlServer));
        assert_eq!(Dialect::parse("MySQL"), Some(Dialect::MySQL));
        assert_eq!(Dialect::parse("unknown"), None);
        assert_eq!(Dialect::parse(""), None);
    }

    #[test]
    fn test_as_str_round_trips() {
        for dialect in Dialect::ALL {
            assert_eq!(Dialect::parse(dialect.as_str()), Some(dialect));
            assert_eq!(dialect.to_string().parse::<Dialect>(), Ok(dialect));
        }
    }

    #[test]
    fn test_all_is_exhaustive_and_unique() {
        let mut seen = Dialect::ALL.to_vec();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), Dialect::ALL.len());
    }

    #[test]
    fn test_syntax_properties() {
        assert_eq!(Dialect::MySQL.quote_style(), QuoteStyle::Backtick);
        assert_eq!(Dialect::SqlServer.quote_style().delimiters(), ('[', ']'));
        assert_eq!(Dialect::PostgreSQL.limit_style(), LimitStyle::LimitOffset);
        assert_eq!(Dialect::Oracle.limit_style(), LimitStyle::OffsetFetch);
        assert_eq!(Dialect::Sybase.limit_style(), LimitStyle::Top);
        assert_eq!(Dialect::Oracle.dummy_table(), Some("dual"));
        assert_eq!(Dialect::PostgreSQL.dummy_table(), None);
        assert_eq!(Dialect::Oracle.max_in_list_size(), Some(1000));
    }

    #[test]
    fn test_family() {
        assert_eq!(Dialect::Redshift.family(), Dialect::PostgreSQL);
        assert_eq!(Dialect::MariaDB.family(), Dialect::MySQL);
        assert_eq!(Dialect::Oracle.family(), Dialect::Oracle);
    }

    #[test]
    fn test_numbered_placeholders() {
        assert_eq!(Dialect::PostgreSQL.numbered_placeholder(3), "$3");
        assert_eq!(Dialect::SQLite.numbered_placeholder(2), "?2");
        assert_eq!(Dialect::Oracle.numbered_placeholder(1), ":1");
        assert_eq!(Dialect::MySQL.numbered_placeholder(7), "?");
    }
}
