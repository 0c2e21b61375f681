use super::{Expr, Field};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    /// No direction keyword
    #[default]
    Default,
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NullsOrder {
    First,
    Last,
}

/// An ORDER BY item.
#[derive(Debug, Clone)]
pub struct SortField {
    pub expr: Expr,
    pub order: SortOrder,
    pub nulls: Option<NullsOrder>,
}

impl SortField {
    pub fn new(expr: impl Into<Expr>, order: SortOrder) -> Self {
        Self {
            expr: expr.into().unaliased(),
            order,
            nulls: None,
        }
    }

    /// `nulls first`, or a CASE sort key where unsupported.
    #[must_use]
    pub fn nulls_first(mut self) -> Self {
        self.nulls = Some(NullsOrder::First);
        self
    }

    #[must_use]
    pub fn nulls_last(mut self) -> Self {
        self.nulls = Some(NullsOrder::Last);
        self
    }
}

impl<T: 'static> Field<T> {
    pub fn asc(&self) -> SortField {
        SortField::new(self, SortOrder::Asc)
    }

    pub fn desc(&self) -> SortField {
        SortField::new(self, SortOrder::Desc)
    }

    /// Sort without a direction keyword.
    pub fn sort_default(&self) -> SortField {
        SortField::new(self, SortOrder::Default)
    }
}

impl<T> From<Field<T>> for SortField {
    fn from(field: Field<T>) -> Self {
        SortField::new(field, SortOrder::Default)
    }
}

impl<T> From<&Field<T>> for SortField {
    fn from(field: &Field<T>) -> Self {
        SortField::new(field, SortOrder::Default)
    }
}
