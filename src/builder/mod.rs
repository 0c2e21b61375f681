//! Typestate step builders.
//!
//! Every builder carries a state marker type parameter. Methods are only
//! implemented for the states in which the clause is legal, so an illegal
//! sequence such as a `where_` directly after `join` does not compile:
//!
//! ```compile_fail
//! use quill::prelude::*;
//!
//! let users = Table::new("users");
//! let posts = Table::new("posts");
//! let id: Field<i32> = users.column("id");
//!
//! // a join must be constrained with `on` or `using` first
//! let _ = select(&id).from(&users).join(&posts).where_(id.eq(1));
//! ```
//!
//! Finished builders convert into the immutable statement nodes of
//! [`quill_core::query`]; only states marked [`ExecutableState`] do.

use std::fmt::Debug;

use quill_core::expr::{AggregateFunction, Condition, Expr, Field, IntoField, SortField};
use quill_core::query::Statement;
use quill_core::types::DataType;

pub mod call;
pub mod cte;
pub mod delete;
pub mod insert;
pub mod merge;
pub mod select;
pub mod update;

pub use call::CallBuilder;
pub use cte::{CteBuilder, WithBuilder};
pub use delete::{DeleteBuilder, DeleteInitial, DeleteReturningSet, DeleteUsingSet, DeleteWhereSet};
pub use insert::{
    InsertBuilder, InsertColumnsSet, InsertConflictPending, InsertDoUpdatePending,
    InsertDoUpdateSet, InsertInitial, InsertOnConflictSet, InsertReturningSet, InsertSourceSet,
    InsertValuesSet,
};
pub use merge::{
    MergeBuilder, MergeClauseSet, MergeInitial, MergeOnSet, MergeUpdatePending, MergeUpdateSet,
    MergeUsingSet,
};
pub use select::{
    SelectBuilder, SelectFromSet, SelectGroupSet, SelectHavingSet, SelectInitial,
    SelectJoinPending, SelectJoinSet, SelectLimitSet, SelectLockSet, SelectOffsetSet,
    SelectOrderSet, SelectSetOpSet, SelectWhereSet, SelectWindowSet,
};
pub use update::{UpdateBuilder, UpdateFromSet, UpdateInitial, UpdateReturningSet, UpdateSetClauseSet, UpdateWhereSet};

/// Marker trait for builder states that describe a complete statement.
pub trait ExecutableState {}

/// Anything that can produce a statement node for rendering.
pub trait ToStatement {
    fn to_statement(&self) -> Statement;
}

impl ToStatement for Statement {
    fn to_statement(&self) -> Statement {
        self.clone()
    }
}

macro_rules! impl_to_statement {
    ($($node:ident),*) => {
        $(
            impl ToStatement for quill_core::query::$node {
                fn to_statement(&self) -> Statement {
                    Statement::from(self.clone())
                }
            }
        )*
    };
}

impl_to_statement!(Select, Insert, Update, Delete, Merge, Call);

//------------------------------------------------------------------------------
// Row shapes
//------------------------------------------------------------------------------

/// A phantom row type: `()` for `select *`, otherwise a tuple of the
/// selected fields' value types.
pub trait Row {
    /// One [`DataType`] per column.
    type Types: Clone + Debug;
}

impl Row for () {
    type Types = ();
}

/// A projection accepted by [`select`](crate::dsl::select) and friends.
///
/// Implemented for single fields, aggregates, conditions, `()` (all
/// columns) and tuples of up to twelve [`IntoField`] items.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be used as a select list",
    label = "expected a field, an aggregate, `()` or a tuple of up to twelve fields"
)]
pub trait SelectFields {
    type Row: Row;

    fn into_fields(self) -> (Vec<Expr>, <Self::Row as Row>::Types);
}

impl SelectFields for () {
    type Row = ();

    fn into_fields(self) -> (Vec<Expr>, ()) {
        (Vec::new(), ())
    }
}

macro_rules! impl_single_select_field {
    ($($ty:ty),*) => {
        $(
            impl<T: 'static> SelectFields for $ty {
                type Row = (T,);

                fn into_fields(self) -> (Vec<Expr>, (DataType<T>,)) {
                    let field = self.into_field();
                    let data_type = field.data_type().clone();
                    (vec![field.into_expr()], (data_type,))
                }
            }
        )*
    };
}

impl_single_select_field!(Field<T>, &Field<T>, AggregateFunction<T>, &AggregateFunction<T>);

impl SelectFields for Condition {
    type Row = (bool,);

    fn into_fields(self) -> (Vec<Expr>, (DataType<bool>,)) {
        let field = self.into_field();
        let data_type = field.data_type().clone();
        (vec![field.into_expr()], (data_type,))
    }
}

macro_rules! impl_tuple_rows {
    ($($T:ident),+) => {
        impl<$($T: 'static),+> Row for ($($T,)+) {
            type Types = ($(DataType<$T>,)+);
        }

        impl<$($T: IntoField),+> SelectFields for ($($T,)+) {
            type Row = ($($T::Type,)+);

            #[allow(non_snake_case)]
            fn into_fields(self) -> (Vec<Expr>, <Self::Row as Row>::Types) {
                let ($($T,)+) = self;
                $(let $T = $T.into_field();)+
                let types = ($($T.data_type().clone(),)+);
                (vec![$($T.into_expr()),+], types)
            }
        }
    };
}

impl_tuple_rows!(A);
impl_tuple_rows!(A, B);
impl_tuple_rows!(A, B, C);
impl_tuple_rows!(A, B, C, D);
impl_tuple_rows!(A, B, C, D, E);
impl_tuple_rows!(A, B, C, D, E, F);
impl_tuple_rows!(A, B, C, D, E, F, G);
impl_tuple_rows!(A, B, C, D, E, F, G, H);
impl_tuple_rows!(A, B, C, D, E, F, G, H, I);
impl_tuple_rows!(A, B, C, D, E, F, G, H, I, J);
impl_tuple_rows!(A, B, C, D, E, F, G, H, I, J, K);
impl_tuple_rows!(A, B, C, D, E, F, G, H, I, J, K, L);

//------------------------------------------------------------------------------
// Sort lists
//------------------------------------------------------------------------------

/// An ORDER BY list: a sort field, a field (default order), or a tuple,
/// array or vector of them.
pub trait SortFields {
    fn into_sort_fields(self) -> Vec<SortField>;
}

impl SortFields for SortField {
    fn into_sort_fields(self) -> Vec<SortField> {
        vec![self]
    }
}

impl<T> SortFields for Field<T> {
    fn into_sort_fields(self) -> Vec<SortField> {
        vec![self.into()]
    }
}

impl<T> SortFields for &Field<T> {
    fn into_sort_fields(self) -> Vec<SortField> {
        vec![self.into()]
    }
}

impl SortFields for Vec<SortField> {
    fn into_sort_fields(self) -> Vec<SortField> {
        self
    }
}

impl<const N: usize> SortFields for [SortField; N] {
    fn into_sort_fields(self) -> Vec<SortField> {
        self.into()
    }
}

macro_rules! impl_tuple_sorts {
    ($($T:ident),+) => {
        impl<$($T: Into<SortField>),+> SortFields for ($($T,)+) {
            #[allow(non_snake_case)]
            fn into_sort_fields(self) -> Vec<SortField> {
                let ($($T,)+) = self;
                vec![$($T.into()),+]
            }
        }
    };
}

impl_tuple_sorts!(A);
impl_tuple_sorts!(A, B);
impl_tuple_sorts!(A, B, C);
impl_tuple_sorts!(A, B, C, D);
impl_tuple_sorts!(A, B, C, D, E);
impl_tuple_sorts!(A, B, C, D, E, F);

//------------------------------------------------------------------------------
// Column lists
//------------------------------------------------------------------------------

/// Target columns of an INSERT or a MERGE insert branch.
///
/// Implemented for a single field and tuples of up to twelve fields. The
/// column names are taken from the fields; a field that is neither a column
/// reference nor aliased fails at render time.
pub trait InsertColumns {
    type Row: Row;

    fn into_columns(self) -> (Vec<quill_core::Name>, <Self::Row as Row>::Types);
}

pub(crate) fn column_name<T: 'static>(field: &Field<T>) -> quill_core::Name {
    field
        .name()
        .cloned()
        .unwrap_or_else(|| quill_core::Name::new(""))
}

impl<T: 'static> InsertColumns for Field<T> {
    type Row = (T,);

    fn into_columns(self) -> (Vec<quill_core::Name>, (DataType<T>,)) {
        (vec![column_name(&self)], (self.data_type().clone(),))
    }
}

impl<T: 'static> InsertColumns for &Field<T> {
    type Row = (T,);

    fn into_columns(self) -> (Vec<quill_core::Name>, (DataType<T>,)) {
        (vec![column_name(self)], (self.data_type().clone(),))
    }
}

/// One row of values matching the column types `Types`.
pub trait InsertRow<Types> {
    fn into_row(self, types: &Types) -> Vec<Expr>;
}

macro_rules! impl_tuple_columns {
    ($(($T:ident, $V:ident, $idx:tt)),+) => {
        impl<$($T: IntoField),+> InsertColumns for ($($T,)+) {
            type Row = ($($T::Type,)+);

            #[allow(non_snake_case)]
            fn into_columns(self) -> (Vec<quill_core::Name>, <Self::Row as Row>::Types) {
                let ($($T,)+) = self;
                $(let $T = $T.into_field();)+
                (vec![$(column_name(&$T)),+], ($($T.data_type().clone(),)+))
            }
        }

        impl<$($T: 'static,)+ $($V: quill_core::expr::Operand<$T>),+> InsertRow<($(DataType<$T>,)+)> for ($($V,)+) {
            fn into_row(self, types: &($(DataType<$T>,)+)) -> Vec<Expr> {
                vec![$(self.$idx.into_operand(&types.$idx)),+]
            }
        }
    };
}

impl_tuple_columns!((A, VA, 0));
impl_tuple_columns!((A, VA, 0), (B, VB, 1));
impl_tuple_columns!((A, VA, 0), (B, VB, 1), (C, VC, 2));
impl_tuple_columns!((A, VA, 0), (B, VB, 1), (C, VC, 2), (D, VD, 3));
impl_tuple_columns!((A, VA, 0), (B, VB, 1), (C, VC, 2), (D, VD, 3), (E, VE, 4));
impl_tuple_columns!((A, VA, 0), (B, VB, 1), (C, VC, 2), (D, VD, 3), (E, VE, 4), (F, VF, 5));
impl_tuple_columns!(
    (A, VA, 0), (B, VB, 1), (C, VC, 2), (D, VD, 3), (E, VE, 4), (F, VF, 5), (G, VG, 6)
);
impl_tuple_columns!(
    (A, VA, 0), (B, VB, 1), (C, VC, 2), (D, VD, 3), (E, VE, 4), (F, VF, 5), (G, VG, 6),
    (H, VH, 7)
);
impl_tuple_columns!(
    (A, VA, 0), (B, VB, 1), (C, VC, 2), (D, VD, 3), (E, VE, 4), (F, VF, 5), (G, VG, 6),
    (H, VH, 7), (I, VI, 8)
);
impl_tuple_columns!(
    (A, VA, 0), (B, VB, 1), (C, VC, 2), (D, VD, 3), (E, VE, 4), (F, VF, 5), (G, VG, 6),
    (H, VH, 7), (I, VI, 8), (J, VJ, 9)
);
impl_tuple_columns!(
    (A, VA, 0), (B, VB, 1), (C, VC, 2), (D, VD, 3), (E, VE, 4), (F, VF, 5), (G, VG, 6),
    (H, VH, 7), (I, VI, 8), (J, VJ, 9), (K, VK, 10)
);
impl_tuple_columns!(
    (A, VA, 0), (B, VB, 1), (C, VC, 2), (D, VD, 3), (E, VE, 4), (F, VF, 5), (G, VG, 6),
    (H, VH, 7), (I, VI, 8), (J, VJ, 9), (K, VK, 10), (L, VL, 11)
);
