//! Tracing utilities for statement rendering.
//!
//! Enable the `tracing` feature to emit events via the `tracing` crate.
//! These macros no-op when the feature is disabled, and every event is
//! additionally gated on `Settings::execute_logging` of the context that
//! rendered the statement.

/// Emit a debug-level event with the rendered SQL text and bind count.
///
/// ```ignore
/// quill_trace_render!(settings, dialect, &sql, binds.len());
/// ```
#[macro_export]
macro_rules! quill_trace_render {
    ($settings:expr, $dialect:expr, $sql:expr, $bind_count:expr) => {
        #[cfg(feature = "tracing")]
        if $settings.execute_logging {
            tracing::debug!(
                dialect = %$dialect,
                sql = %$sql,
                binds = $bind_count,
                "quill.render"
            );
        }
    };
}

/// Emit a debug-level event when an operation is rendered through an emulation.
///
/// ```ignore
/// quill_trace_emulation!(settings, Operation::Merge, dialect);
/// ```
#[macro_export]
macro_rules! quill_trace_emulation {
    ($settings:expr, $operation:expr, $dialect:expr) => {
        #[cfg(feature = "tracing")]
        if $settings.execute_logging {
            tracing::debug!(
                operation = %$operation,
                dialect = %$dialect,
                "quill.emulation"
            );
        }
    };
}

/// Emit a trace-level event for every parameter handed to a statement.
///
/// ```ignore
/// quill_trace_bind!(settings, index, "set");
/// ```
#[macro_export]
macro_rules! quill_trace_bind {
    ($settings:expr, $index:expr, $action:literal) => {
        #[cfg(feature = "tracing")]
        if $settings.execute_logging {
            tracing::trace!(index = $index, action = $action, "quill.bind");
        }
    };
}
