use super::ordering::{compare, equals, is_nan, same_type_class};
use crate::operation::{Direction, Filter, FilterOp, OrderBy, Query};
use crate::value::{insert_path, lookup};
use crate::{Document, Fields, Value};
use std::cmp::Ordering;

/// Applies `query` to `documents`, which must already be sorted by id.
pub(crate) fn run<'a>(documents: impl Iterator<Item = &'a Document>, query: &Query) -> Vec<Document> {
    let orders = effective_order(query);
    let mut matched: Vec<&Document> = documents
        .filter(|document| query.filters.iter().all(|f| matches(document, f)))
        .filter(|document| orders.iter().all(|order| document.get(&order.field).is_some()))
        .collect();

    let id_direction = orders
        .last()
        .map(|order| order.direction)
        .unwrap_or_default();
    matched.sort_by(|a, b| {
        for order in &orders {
            let ordering = match (a.get(&order.field), b.get(&order.field)) {
                (Some(x), Some(y)) => compare(x, y),
                _ => Ordering::Equal,
            };
            let ordering = directed(ordering, order.direction);
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        directed(a.id.cmp(&b.id), id_direction)
    });

    let offset = query.offset.unwrap_or(0) as usize;
    let limit = query.limit.map(|n| n as usize).unwrap_or(usize::MAX);
    matched
        .into_iter()
        .skip(offset)
        .take(limit)
        .map(|document| project(document, query.select.as_deref()))
        .collect()
}

/// Explicit orders followed by an implicit order on every inequality field
/// they leave out, in field-path order and in the last explicit direction.
fn effective_order(query: &Query) -> Vec<OrderBy> {
    let mut orders = query.order_by.clone();
    let direction = orders.last().map(|order| order.direction).unwrap_or_default();
    let mut fields: Vec<&str> = query
        .filters
        .iter()
        .filter(|filter| filter.op.is_inequality())
        .map(|filter| filter.field.as_str())
        .collect();
    fields.sort_unstable();
    fields.dedup();
    for field in fields {
        if !orders.iter().any(|order| order.field == field) {
            orders.push(OrderBy {
                field: field.to_string(),
                direction,
            });
        }
    }
    orders
}

fn directed(ordering: Ordering, direction: Direction) -> Ordering {
    match direction {
        Direction::Ascending => ordering,
        Direction::Descending => ordering.reverse(),
    }
}

fn project(document: &Document, select: Option<&[String]>) -> Document {
    let paths = match select {
        None => return document.clone(),
        Some(paths) => paths,
    };
    let mut fields = Fields::new();
    for path in paths {
        if let Some(value) = document.get(path) {
            insert_path(&mut fields, path, value.clone());
        }
    }
    Document {
        fields,
        ..document.clone()
    }
}

fn matches(document: &Document, filter: &Filter) -> bool {
    let field = lookup(&document.fields, &filter.field);
    let expected = &filter.value;
    match filter.op {
        FilterOp::IsNull => matches!(field, Some(Value::Null)),
        FilterOp::IsNotNull => matches!(field, Some(value) if !value.is_null()),
        op => match field {
            None => false,
            Some(value) => matches_value(value, op, expected),
        },
    }
}

fn matches_value(value: &Value, op: FilterOp, expected: &Value) -> bool {
    let candidates = expected.as_array().unwrap_or_default();
    match op {
        FilterOp::Equal => equals(value, expected),
        FilterOp::NotEqual => !value.is_null() && !equals(value, expected),
        FilterOp::LessThan
        | FilterOp::LessThanOrEqual
        | FilterOp::GreaterThan
        | FilterOp::GreaterThanOrEqual => {
            if !same_type_class(value, expected) || is_nan(value) || is_nan(expected) {
                return false;
            }
            let ordering = compare(value, expected);
            match op {
                FilterOp::LessThan => ordering == Ordering::Less,
                FilterOp::LessThanOrEqual => ordering != Ordering::Greater,
                FilterOp::GreaterThan => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            }
        }
        FilterOp::ArrayContains => value
            .as_array()
            .map(|values| values.iter().any(|v| equals(v, expected)))
            .unwrap_or(false),
        FilterOp::ArrayContainsAny => value
            .as_array()
            .map(|values| values.iter().any(|v| candidates.iter().any(|c| equals(v, c))))
            .unwrap_or(false),
        FilterOp::In => candidates.iter().any(|c| equals(value, c)),
        FilterOp::NotIn => !value.is_null() && !candidates.iter().any(|c| equals(value, c)),
        FilterOp::IsNull | FilterOp::IsNotNull => false,
    }
}
