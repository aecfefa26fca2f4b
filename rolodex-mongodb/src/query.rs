//! Query translation from the abstract filter algebra to MongoDB syntax.

use bson::{Bson, Document, doc};

use rolodex_core::{
    error::StoreError,
    query::{Expr, FieldOp, QueryVisitor},
};

/// Translates filter expressions into MongoDB query documents.
pub(crate) struct MongoQueryTranslator;

impl QueryVisitor for MongoQueryTranslator {
    type Output = Document;
    type Error = StoreError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            "$and": exprs
                .iter()
                .map(|expr| self.visit_expr(expr))
                .collect::<Result<Vec<_>, _>>()?,
        })
    }

    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            "$or": exprs
                .iter()
                .map(|expr| self.visit_expr(expr))
                .collect::<Result<Vec<_>, _>>()?,
        })
    }

    fn visit_not(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            "$not": self.visit_expr(expr)?,
        })
    }

    fn visit_field(
        &mut self,
        field: &str,
        op: &FieldOp,
        value: &Bson,
    ) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            field: match op {
                FieldOp::Eq => doc! { "$eq": value },
                FieldOp::Ne => doc! { "$ne": value },
                FieldOp::Gt => doc! { "$gt": value },
                FieldOp::Gte => doc! { "$gte": value },
                FieldOp::Lt => doc! { "$lt": value },
                FieldOp::Lte => doc! { "$lte": value },
                // Membership on array fields; no substring fallback on the
                // server side.
                FieldOp::Contains => doc! { "$elemMatch": { "$eq": value } },
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use bson::doc;

    use rolodex_core::query::Field;

    use super::*;

    #[test]
    fn translates_eq_filter() {
        let translated = MongoQueryTranslator
            .visit_expr(&Field::new("name").eq("Alice"))
            .unwrap();

        assert_eq!(translated, doc! { "name": { "$eq": "Alice" } });
    }

    #[test]
    fn translates_contains_to_elem_match() {
        let translated = MongoQueryTranslator
            .visit_expr(&Field::new("favorite_foods").contains("burrito"))
            .unwrap();

        assert_eq!(
            translated,
            doc! { "favorite_foods": { "$elemMatch": { "$eq": "burrito" } } }
        );
    }

    #[test]
    fn translates_conjunction() {
        let expr = Field::new("name")
            .eq("Alice")
            .and(Field::new("age").gte(18));

        let translated = MongoQueryTranslator.visit_expr(&expr).unwrap();
        assert_eq!(
            translated,
            doc! { "$and": [
                { "name": { "$eq": "Alice" } },
                { "age": { "$gte": 18 } },
            ] }
        );
    }
}
