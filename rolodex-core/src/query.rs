//! Query construction for document stores.
//!
//! This module provides type-safe query construction with filtering, sorting,
//! result limits, field projection, and a visitor pattern for query execution
//! across different backends.
//!
//! # Query Building
//!
//! Queries are constructed with the fluent builder API; filters start from a
//! [`Field`]:
//!
//! ```ignore
//! use rolodex_core::query::{Query, Field, SortDirection, Projection};
//!
//! let query = Query::builder()
//!     .filter(Field::new("favorite_foods").contains("burrito"))
//!     .sort("name", SortDirection::Asc)
//!     .limit(2)
//!     .project(Projection::exclude(["age"]))
//!     .build();
//! ```

use bson::Bson;

use crate::error::StoreError;

/// Sort direction for query results.
#[derive(Debug, Clone, PartialEq)]
pub enum SortDirection {
    /// Ascending order (A to Z, 0 to 9).
    Asc,
    /// Descending order (Z to A, 9 to 0).
    Desc,
}

/// Sort specification: which field to sort by and in which direction.
#[derive(Debug, Clone, PartialEq)]
pub struct Sort {
    /// The field name to sort by.
    pub field: String,
    /// The sort direction.
    pub direction: SortDirection,
}

/// Field comparison operators for filter expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOp {
    /// Equal to (exact match).
    Eq,
    /// Not equal to.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal to.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal to.
    Lte,
    /// Array membership: the array field has an element equal to the value.
    /// For string fields this degrades to substring containment.
    Contains,
}

/// A filter expression describing which documents an operation targets.
///
/// Expressions combine with the logical operators `And`, `Or`, and `Not` to
/// build compound predicates.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Logical AND of multiple expressions (all must match).
    And(Vec<Expr>),
    /// Logical OR of multiple expressions (any must match).
    Or(Vec<Expr>),
    /// Logical NOT of an expression (inverts the result).
    Not(Box<Expr>),
    /// Field comparison expression.
    Field {
        /// The field name to compare.
        field: String,
        /// The comparison operator.
        op: FieldOp,
        /// The value to compare against.
        value: Bson,
    },
}

impl Expr {
    /// Creates a field comparison expression.
    pub fn field(field: String, op: FieldOp, value: Bson) -> Self {
        Expr::Field { field, op, value }
    }

    /// Combines this expression with another using logical AND.
    ///
    /// If this expression is already an AND, the other expression is appended
    /// to its list. Otherwise a new AND expression is created.
    pub fn and(self, other: Expr) -> Self {
        match self {
            Expr::And(mut list) => {
                list.push(other);
                Expr::And(list)
            }
            _ => Expr::And(vec![self, other]),
        }
    }

    /// Combines this expression with another using logical OR.
    ///
    /// If this expression is already an OR, the other expression is appended
    /// to its list. Otherwise a new OR expression is created.
    pub fn or(self, other: Expr) -> Self {
        match self {
            Expr::Or(mut list) => {
                list.push(other);
                Expr::Or(list)
            }
            _ => Expr::Or(vec![self, other]),
        }
    }

    /// Negates this expression (logical NOT).
    pub fn not(self) -> Self {
        Expr::Not(Box::new(self))
    }
}

/// Entry point for building field comparison expressions.
///
/// ```ignore
/// use rolodex_core::query::Field;
///
/// let adults_named_alice = Field::new("name")
///     .eq("Alice")
///     .and(Field::new("age").gte(18));
/// ```
#[derive(Debug, Clone)]
pub struct Field(String);

impl Field {
    /// Names the field the comparison applies to.
    pub fn new(name: impl Into<String>) -> Self {
        Field(name.into())
    }

    /// Matches documents where the field equals the value.
    pub fn eq(self, value: impl Into<Bson>) -> Expr {
        Expr::field(self.0, FieldOp::Eq, value.into())
    }

    /// Matches documents where the field does not equal the value.
    pub fn ne(self, value: impl Into<Bson>) -> Expr {
        Expr::field(self.0, FieldOp::Ne, value.into())
    }

    /// Matches documents where the field is greater than the value.
    pub fn gt(self, value: impl Into<Bson>) -> Expr {
        Expr::field(self.0, FieldOp::Gt, value.into())
    }

    /// Matches documents where the field is greater than or equal to the value.
    pub fn gte(self, value: impl Into<Bson>) -> Expr {
        Expr::field(self.0, FieldOp::Gte, value.into())
    }

    /// Matches documents where the field is less than the value.
    pub fn lt(self, value: impl Into<Bson>) -> Expr {
        Expr::field(self.0, FieldOp::Lt, value.into())
    }

    /// Matches documents where the field is less than or equal to the value.
    pub fn lte(self, value: impl Into<Bson>) -> Expr {
        Expr::field(self.0, FieldOp::Lte, value.into())
    }

    /// Matches documents where the array field contains the value as an
    /// element. Membership is positional-order-independent.
    pub fn contains(self, value: impl Into<Bson>) -> Expr {
        Expr::field(self.0, FieldOp::Contains, value.into())
    }
}

/// Field projection: which fields a query's returned documents carry.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// Return only the listed fields.
    Include(Vec<String>),
    /// Return everything except the listed fields.
    Exclude(Vec<String>),
}

impl Projection {
    /// Builds an inclusion projection from the listed field names.
    pub fn include<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Projection::Include(fields.into_iter().map(Into::into).collect())
    }

    /// Builds an exclusion projection from the listed field names.
    pub fn exclude<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Projection::Exclude(fields.into_iter().map(Into::into).collect())
    }

    /// Whether a field with the given name survives this projection.
    pub fn retains(&self, field: &str) -> bool {
        match self {
            Projection::Include(fields) => fields.iter().any(|f| f == field),
            Projection::Exclude(fields) => !fields.iter().any(|f| f == field),
        }
    }
}

/// A structured query: filter, sort, offset/limit, and projection.
///
/// Use [`QueryBuilder`] for ergonomic construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    /// Optional filter expression to match documents.
    pub filter: Option<Expr>,
    /// Maximum number of documents to return.
    pub limit: Option<usize>,
    /// Number of documents to skip.
    pub offset: Option<usize>,
    /// Sort specification for results.
    pub sort: Option<Sort>,
    /// Field projection applied to each returned document.
    pub projection: Option<Projection>,
}

impl Query {
    /// Creates a new empty query with no filter, limits, or projection.
    pub fn new() -> Self {
        Query::default()
    }

    /// Creates a new query builder for fluent construction.
    pub fn builder() -> QueryBuilder {
        QueryBuilder::new()
    }
}

/// Fluent builder for [`Query`].
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    query: Query,
}

impl QueryBuilder {
    /// Creates a new query builder.
    pub fn new() -> Self {
        QueryBuilder { query: Query::default() }
    }

    /// Sets the filter expression for this query.
    pub fn filter(mut self, filter: Expr) -> Self {
        self.query.filter = Some(filter);
        self
    }

    /// Sets the maximum number of documents to return.
    pub fn limit(mut self, limit: usize) -> Self {
        self.query.limit = Some(limit);
        self
    }

    /// Sets the number of documents to skip.
    pub fn offset(mut self, offset: usize) -> Self {
        self.query.offset = Some(offset);
        self
    }

    /// Sets the sort specification for the query results.
    pub fn sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.query.sort = Some(Sort { field: field.into(), direction });
        self
    }

    /// Sets the field projection applied to each returned document.
    pub fn project(mut self, projection: Projection) -> Self {
        self.query.projection = Some(projection);
        self
    }

    /// Builds and returns the final query.
    pub fn build(self) -> Query {
        self.query
    }
}

/// Visitor over filter expressions, used by backends to translate or
/// evaluate the abstract filter algebra.
pub trait QueryVisitor {
    type Output;
    type Error: Into<StoreError>;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error>;
    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error>;
    fn visit_not(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error>;
    fn visit_field(
        &mut self,
        field: &str,
        op: &FieldOp,
        value: &Bson,
    ) -> Result<Self::Output, Self::Error>;

    fn visit_expr(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        match expr {
            Expr::And(exprs) => self.visit_and(exprs),
            Expr::Or(exprs) => self.visit_or(exprs),
            Expr::Not(expr) => self.visit_not(expr),
            Expr::Field { field, op, value } => self.visit_field(field, op, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use bson::Bson;

    use super::*;

    #[test]
    fn field_builds_comparison_exprs() {
        assert_eq!(
            Field::new("name").eq("Alice"),
            Expr::Field {
                field: "name".to_string(),
                op: FieldOp::Eq,
                value: Bson::String("Alice".to_string()),
            }
        );
        assert_eq!(
            Field::new("favorite_foods").contains("burrito"),
            Expr::Field {
                field: "favorite_foods".to_string(),
                op: FieldOp::Contains,
                value: Bson::String("burrito".to_string()),
            }
        );
    }

    #[test]
    fn and_flattens_into_existing_conjunction() {
        let expr = Field::new("name")
            .eq("Alice")
            .and(Field::new("age").gte(18))
            .and(Field::new("age").lt(65));

        match expr {
            Expr::And(list) => assert_eq!(list.len(), 3),
            other => panic!("expected And, got {other:?}"),
        }
    }

    #[test]
    fn builder_collects_all_parts() {
        let query = Query::builder()
            .filter(Field::new("favorite_foods").contains("burrito"))
            .sort("name", SortDirection::Asc)
            .limit(2)
            .project(Projection::exclude(["age"]))
            .build();

        assert!(query.filter.is_some());
        assert_eq!(query.limit, Some(2));
        assert_eq!(query.offset, None);
        assert_eq!(
            query.sort,
            Some(Sort { field: "name".to_string(), direction: SortDirection::Asc })
        );
        assert_eq!(query.projection, Some(Projection::Exclude(vec!["age".to_string()])));
    }

    #[test]
    fn projection_retains() {
        let exclude = Projection::exclude(["age"]);
        assert!(exclude.retains("name"));
        assert!(!exclude.retains("age"));

        let include = Projection::include(["name"]);
        assert!(include.retains("name"));
        assert!(!include.retains("age"));
    }
}
