/// Render `$query` for `$dialect` and compare the SQL text.
///
/// Evaluates to the rendered query so binds can be inspected afterwards.
#[macro_export]
macro_rules! assert_sql {
    ($dialect:expr, $query:expr, $expected:expr) => {{
        let rendered = crate::common::render($dialect, &$query);
        assert_eq!(rendered.sql(), $expected, "dialect {}", $dialect);
        rendered
    }};
}

/// Assert that rendering `$query` for `$dialect` fails because `$operation`
/// is unsupported.
#[macro_export]
macro_rules! assert_unsupported {
    ($dialect:expr, $query:expr, $operation:expr) => {{
        match crate::common::render_err($dialect, &$query) {
            quill::QuillError::UnsupportedDialect { operation, dialect } => {
                assert_eq!(operation, $operation);
                assert_eq!(dialect, $dialect);
            }
            other => panic!("expected UnsupportedDialect, got {other:?}"),
        }
    }};
}

/// Values of the bind list, in marker order.
#[macro_export]
macro_rules! bind_values {
    ($rendered:expr) => {
        $rendered
            .binds()
            .iter()
            .map(|b| b.value.clone())
            .collect::<Vec<quill::value::Value>>()
    };
}
