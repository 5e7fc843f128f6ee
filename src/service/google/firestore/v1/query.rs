use super::{convert::value_to_proto, field_path};
use crate::operation::{Direction, Filter, FilterOp, Query};
use crate::proto::google::firestore::v1::{
    structured_query::{
        composite_filter, field_filter, filter::FilterType, unary_filter, CollectionSelector,
        CompositeFilter, Direction as ProtoDirection, FieldFilter, FieldReference, Filter as ProtoFilter,
        Order, Projection, UnaryFilter,
    },
    StructuredQuery,
};

pub(crate) fn structured_query(collection_id: &str, query: Query) -> StructuredQuery {
    let mut filters: Vec<ProtoFilter> = query.filters.into_iter().map(filter).collect();
    let r#where = match filters.len() {
        0 => None,
        1 => filters.pop(),
        _ => Some(ProtoFilter {
            filter_type: Some(FilterType::CompositeFilter(CompositeFilter {
                op: composite_filter::Operator::And as i32,
                filters,
            })),
        }),
    };

    StructuredQuery {
        select: query.select.map(|paths| Projection {
            fields: paths.into_iter().map(field_reference).collect(),
        }),
        from: vec![CollectionSelector {
            collection_id: collection_id.to_string(),
            all_descendants: false,
        }],
        r#where,
        order_by: query
            .order_by
            .into_iter()
            .map(|order| Order {
                field: Some(field_reference(order.field)),
                direction: match order.direction {
                    Direction::Ascending => ProtoDirection::Ascending as i32,
                    Direction::Descending => ProtoDirection::Descending as i32,
                },
            })
            .collect(),
        offset: query.offset.map(clamp).unwrap_or(0),
        limit: query.limit.map(clamp),
    }
}

/// Existence check for a single collection: one document, no fields.
pub(crate) fn probe(collection_id: &str) -> StructuredQuery {
    structured_query(
        collection_id,
        Query::new().select(vec!["__name__"]).limit(1),
    )
}

fn clamp(n: u32) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

fn field_reference(path: impl AsRef<str>) -> FieldReference {
    FieldReference {
        field_path: field_path::encode(path.as_ref()),
    }
}

fn filter(filter: Filter) -> ProtoFilter {
    let unary = |op: unary_filter::Operator, field: String| UnaryFilter {
        op: op as i32,
        operand_type: Some(unary_filter::OperandType::Field(field_reference(field))),
    };
    let filter_type = match filter.op {
        FilterOp::IsNull => FilterType::UnaryFilter(unary(unary_filter::Operator::IsNull, filter.field)),
        FilterOp::IsNotNull => {
            FilterType::UnaryFilter(unary(unary_filter::Operator::IsNotNull, filter.field))
        }
        op => FilterType::FieldFilter(FieldFilter {
            field: Some(field_reference(filter.field)),
            op: field_operator(op) as i32,
            value: Some(value_to_proto(filter.value)),
        }),
    };
    ProtoFilter {
        filter_type: Some(filter_type),
    }
}

fn field_operator(op: FilterOp) -> field_filter::Operator {
    use field_filter::Operator;
    match op {
        FilterOp::LessThan => Operator::LessThan,
        FilterOp::LessThanOrEqual => Operator::LessThanOrEqual,
        FilterOp::GreaterThan => Operator::GreaterThan,
        FilterOp::GreaterThanOrEqual => Operator::GreaterThanOrEqual,
        FilterOp::Equal => Operator::Equal,
        FilterOp::NotEqual => Operator::NotEqual,
        FilterOp::ArrayContains => Operator::ArrayContains,
        FilterOp::In => Operator::In,
        FilterOp::ArrayContainsAny => Operator::ArrayContainsAny,
        FilterOp::NotIn => Operator::NotIn,
        FilterOp::IsNull | FilterOp::IsNotNull => Operator::Unspecified,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{proto::google::firestore::v1::value::ValueType, Value};

    #[test]
    fn single_filter_is_not_wrapped() {
        let query = Query::new().filter("age", FilterOp::GreaterThan, 21);
        let structured = structured_query("users", query);
        assert_eq!(structured.from[0].collection_id, "users");
        match structured.r#where.unwrap().filter_type.unwrap() {
            FilterType::FieldFilter(f) => {
                assert_eq!(f.field.unwrap().field_path, "age");
                assert_eq!(f.op, field_filter::Operator::GreaterThan as i32);
                assert_eq!(f.value.unwrap().value_type, Some(ValueType::IntegerValue(21)));
            }
            other => panic!("unexpected filter {:?}", other),
        }
    }

    #[test]
    fn several_filters_become_a_conjunction() {
        let query = Query::new()
            .filter("age", FilterOp::GreaterThanOrEqual, 18)
            .filter("tags", FilterOp::ArrayContainsAny, Value::array(vec![Value::from("a")]))
            .is_null("deleted_at")
            .order_by("age", Direction::Descending)
            .offset(5)
            .limit(10)
            .select(vec!["name"]);
        let structured = structured_query("users", query);

        match structured.r#where.unwrap().filter_type.unwrap() {
            FilterType::CompositeFilter(composite) => {
                assert_eq!(composite.op, composite_filter::Operator::And as i32);
                assert_eq!(composite.filters.len(), 3);
                match composite.filters[2].filter_type.as_ref().unwrap() {
                    FilterType::UnaryFilter(unary) => {
                        assert_eq!(unary.op, unary_filter::Operator::IsNull as i32)
                    }
                    other => panic!("unexpected filter {:?}", other),
                }
            }
            other => panic!("unexpected filter {:?}", other),
        }
        assert_eq!(structured.order_by[0].direction, ProtoDirection::Descending as i32);
        assert_eq!(structured.offset, 5);
        assert_eq!(structured.limit, Some(10));
        assert_eq!(structured.select.unwrap().fields[0].field_path, "name");
    }

    #[test]
    fn probe_fetches_one_name() {
        let structured = probe("users");
        assert_eq!(structured.limit, Some(1));
        assert_eq!(structured.select.unwrap().fields[0].field_path, "__name__");
        assert!(structured.r#where.is_none());
    }

    #[test]
    fn field_paths_are_quoted() {
        let query = Query::new()
            .filter("first name", FilterOp::Equal, 1)
            .order_by("address.zip code", Direction::Ascending)
            .select(vec!["2fa"]);
        let structured = structured_query("users", query);
        match structured.r#where.unwrap().filter_type.unwrap() {
            FilterType::FieldFilter(f) => assert_eq!(f.field.unwrap().field_path, "`first name`"),
            other => panic!("unexpected filter {:?}", other),
        }
        assert_eq!(
            structured.order_by[0].field.as_ref().unwrap().field_path,
            "address.`zip code`"
        );
        assert_eq!(structured.select.unwrap().fields[0].field_path, "`2fa`");
    }
}
