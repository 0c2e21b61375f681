//! Replaying a rendered bind list onto a prepared statement.

use crate::binding::StatementHandle;
use crate::error::Result;
use crate::render::{BindValue, OutParameter, RenderedQuery};

/// Hand every marker of `query` to `statement`, in marker order.
///
/// Input values go through [`Binding::set`](crate::binding::Binding::set);
/// OUT and INOUT markers are registered through
/// [`Binding::register`](crate::binding::Binding::register). Inline values
/// have no marker and are never seen here.
///
/// # Panics
///
/// When the bind list does not describe markers `1..=marker_count` exactly
/// once each, in increasing order. A rendered query always does; a mismatch
/// is a defect in a custom binding or listener.
pub fn bind(query: &RenderedQuery, statement: &mut dyn StatementHandle) -> Result<()> {
    let mut binds = query.binds().iter().peekable();
    let mut outs = query.out_parameters().iter().peekable();

    for index in 1..=query.marker_count() {
        let out = outs.next_if(|o| o.index == index);
        let input = binds.next_if(|b| b.index == index);

        if out.is_none() && input.is_none() {
            panic!(
                "marker {index} of {} has neither a bind value nor an OUT registration",
                query.marker_count()
            );
        }
        if let Some(out) = out {
            register(query, statement, out)?;
        }
        if let Some(input) = input {
            set(query, statement, input)?;
        }
    }

    if let Some(extra) = binds.next() {
        panic!(
            "bind value for marker {} does not match the {} rendered markers",
            extra.index,
            query.marker_count()
        );
    }
    if let Some(extra) = outs.next() {
        panic!(
            "OUT parameter for marker {} does not match the {} rendered markers",
            extra.index,
            query.marker_count()
        );
    }
    Ok(())
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn set(query: &RenderedQuery, statement: &mut dyn StatementHandle, bind: &BindValue) -> Result<()> {
    crate::quill_trace_bind!(query, bind.index, "set");
    bind.data_type
        .binding()
        .set(statement, bind.index, &bind.data_type, &bind.value)
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn register(
    query: &RenderedQuery,
    statement: &mut dyn StatementHandle,
    out: &OutParameter,
) -> Result<()> {
    crate::quill_trace_bind!(query, out.index, "register");
    out.data_type
        .binding()
        .register(statement, out.index, &out.data_type)
}
