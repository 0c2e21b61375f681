//! Inline literal rendering.
//!
//! Used when a value is inlined instead of bound: by settings
//! (`ParamType::Inlined`, static statements), by [`inline`](crate::expr::inline)
//! parameters, and by bindings calling
//! [`BindingSqlContext::render_inline`](crate::binding::BindingSqlContext::render_inline).

use quill_types::Dialect;

use crate::capability::{self, Operation, Support};
use crate::error::Result;
use crate::types::DataTypeInfo;
use crate::value::{DATE_FORMAT, TIME_FORMAT, TIMESTAMP_FORMAT, Value, hex};

/// `'text'` with embedded quotes doubled. MySQL and MariaDB also treat `\`
/// as an escape character, so it is doubled there too.
pub(crate) fn quote_string(out: &mut String, s: &str, dialect: Dialect) {
    let backslash_escapes = matches!(dialect, Dialect::MySQL | Dialect::MariaDB);
    out.reserve(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\'' || (c == '\\' && backslash_escapes) {
            out.push(c);
        }
        out.push(c);
    }
    out.push('\'');
}

/// Standard literal for `value` in `dialect`.
pub fn render_literal(value: &Value, data_type: &DataTypeInfo, dialect: Dialect) -> Result<String> {
    let mut out = String::new();
    write_literal(&mut out, value, data_type, dialect)?;
    Ok(out)
}

fn write_literal(
    out: &mut String,
    value: &Value,
    data_type: &DataTypeInfo,
    dialect: Dialect,
) -> Result<()> {
    let plain_temporal = matches!(
        dialect,
        Dialect::SQLite | Dialect::SqlServer | Dialect::Sybase | Dialect::MySQL | Dialect::MariaDB
    );

    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => match capability::support(Operation::BooleanLiterals, dialect) {
            Support::Supported => out.push_str(if *b { "true" } else { "false" }),
            _ => out.push_str(if *b { "1" } else { "0" }),
        },
        Value::SmallInt(v) => out.push_str(&v.to_string()),
        Value::Int(v) => out.push_str(&v.to_string()),
        Value::BigInt(v) => out.push_str(&v.to_string()),
        Value::Real(v) => float(out, f64::from(*v), data_type, dialect),
        Value::Double(v) => float(out, *v, data_type, dialect),
        Value::Decimal(v) => out.push_str(&v.to_string()),
        Value::Text(s) | Value::Enum(s) | Value::Json(s) => {
            if matches!(dialect, Dialect::SqlServer | Dialect::Sybase) && !s.is_ascii() {
                out.push('N');
            }
            quote_string(out, s, dialect);
        }
        Value::Bytes(b) => match dialect {
            Dialect::PostgreSQL | Dialect::CockroachDB | Dialect::Redshift => {
                out.push_str("decode('");
                out.push_str(&hex(b));
                out.push_str("', 'hex')");
            }
            Dialect::SqlServer | Dialect::Sybase => {
                out.push_str("0x");
                out.push_str(&hex(b));
            }
            Dialect::Oracle => {
                out.push_str("hextoraw('");
                out.push_str(&hex(b));
                out.push_str("')");
            }
            _ => {
                out.push_str("X'");
                out.push_str(&hex(b));
                out.push('\'');
            }
        },
        Value::Date(d) => {
            if !plain_temporal {
                out.push_str("date ");
            }
            quote_string(out, &d.format(DATE_FORMAT).to_string(), dialect);
        }
        Value::Time(t) => {
            if !plain_temporal {
                out.push_str("time ");
            }
            quote_string(out, &t.format(TIME_FORMAT).to_string(), dialect);
        }
        Value::Timestamp(ts) => {
            if !plain_temporal {
                out.push_str("timestamp ");
            }
            quote_string(out, &ts.format(TIMESTAMP_FORMAT).to_string(), dialect);
        }
        Value::TimestampTz(ts) => {
            if !plain_temporal {
                out.push_str("timestamp with time zone ");
            }
            quote_string(out, &ts.format("%Y-%m-%d %H:%M:%S%.f%:z").to_string(), dialect);
        }
        Value::Interval(d) => {
            let seconds = d.num_milliseconds() as f64 / 1000.0;
            if dialect.is_postgres_family() {
                quote_string(out, &format!("{seconds} seconds"), dialect);
                out.push_str("::interval");
            } else {
                out.push_str("interval ");
                quote_string(out, &seconds.to_string(), dialect);
                out.push_str(" second");
            }
        }
        #[cfg(feature = "uuid")]
        Value::Uuid(u) => {
            let text = u.hyphenated().to_string();
            if dialect.is_postgres_family() {
                out.push_str("cast(");
                quote_string(out, &text, dialect);
                out.push_str(" as uuid)");
            } else {
                quote_string(out, &text, dialect);
            }
        }
        Value::Array(items) => {
            capability::require(Operation::ArrayLiterals, dialect)?;
            let element = data_type.element().cloned().unwrap_or_else(|| data_type.clone());
            out.push_str("array[");
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_literal(out, item, &element, dialect)?;
            }
            out.push(']');
        }
    }
    Ok(())
}

fn float(out: &mut String, v: f64, data_type: &DataTypeInfo, dialect: Dialect) {
    if v.is_finite() {
        let text = v.to_string();
        out.push_str(&text);
        // Distinguish from integer literals
        if !text.contains(['.', 'e', 'E']) {
            out.push_str(".0");
        }
    } else {
        let text = if v.is_nan() {
            "NaN"
        } else if v > 0.0 {
            "Infinity"
        } else {
            "-Infinity"
        };
        out.push_str("cast(");
        quote_string(out, text, dialect);
        out.push_str(" as ");
        out.push_str(&data_type.cast_type_name(dialect));
        out.push(')');
    }
}
