use crate::Value;
use std::cmp::Ordering;

/// Firestore sorts values of different types by type first.
fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Boolean(_) => 1,
        Value::Integer(_) | Value::Double(_) => 2,
        Value::Timestamp(_) => 3,
        Value::String(_) => 4,
        Value::Bytes(_) => 5,
        Value::Reference(_) => 6,
        Value::GeoPoint(_) => 7,
        Value::Array(_) => 8,
        Value::Map(_) => 9,
    }
}

pub(crate) fn same_type_class(a: &Value, b: &Value) -> bool {
    type_rank(a) == type_rank(b)
}

pub(crate) fn is_nan(value: &Value) -> bool {
    matches!(value, Value::Double(d) if d.is_nan())
}

/// Total order over values; integers and doubles compare numerically and NaN sorts first.
pub(crate) fn compare(a: &Value, b: &Value) -> Ordering {
    let rank = type_rank(a).cmp(&type_rank(b));
    if rank != Ordering::Equal {
        return rank;
    }
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Boolean(x), Value::Boolean(y)) => x.cmp(y),
        (Value::Integer(x), Value::Integer(y)) => x.cmp(y),
        (Value::Timestamp(x), Value::Timestamp(y)) => x.cmp(y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bytes(x), Value::Bytes(y)) => x.cmp(y),
        (Value::Reference(x), Value::Reference(y)) => x.split('/').cmp(y.split('/')),
        (Value::GeoPoint(x), Value::GeoPoint(y)) => compare_f64(x.latitude, y.latitude)
            .then_with(|| compare_f64(x.longitude, y.longitude)),
        (Value::Array(x), Value::Array(y)) => compare_arrays(x, y),
        (Value::Map(x), Value::Map(y)) => {
            let mut x: Vec<_> = x.iter().collect();
            let mut y: Vec<_> = y.iter().collect();
            x.sort_by(|a, b| a.0.cmp(b.0));
            y.sort_by(|a, b| a.0.cmp(b.0));
            for ((xk, xv), (yk, yv)) in x.iter().zip(y.iter()) {
                let ordering = xk.cmp(yk).then_with(|| compare(xv, yv));
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            x.len().cmp(&y.len())
        }
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => compare_f64(x, y),
            _ => Ordering::Equal,
        },
    }
}

pub(crate) fn equals(a: &Value, b: &Value) -> bool {
    compare(a, b) == Ordering::Equal
}

fn compare_arrays(x: &[Value], y: &[Value]) -> Ordering {
    for (a, b) in x.iter().zip(y.iter()) {
        let ordering = compare(a, b);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    x.len().cmp(&y.len())
}

fn compare_f64(x: f64, y: f64) -> Ordering {
    match (x.is_nan(), y.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GeoPoint, Timestamp};

    #[test]
    fn orders_across_types() {
        let ascending = vec![
            Value::Null,
            Value::from(false),
            Value::from(true),
            Value::Double(f64::NAN),
            Value::from(-1.5),
            Value::from(1),
            Value::Timestamp(Timestamp::new(0, 0)),
            Value::from(""),
            Value::from("a"),
            Value::Bytes(vec![0]),
            Value::Reference("projects/p/databases/d/documents/a/b".into()),
            Value::GeoPoint(GeoPoint::new(0.0, 0.0)),
            Value::array(vec![]),
            Value::map(vec![("a", Value::from(1))]),
        ];
        for pair in ascending.windows(2) {
            assert_eq!(compare(&pair[0], &pair[1]), Ordering::Less, "{} < {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn numbers_compare_across_integer_and_double() {
        assert!(equals(&Value::from(2), &Value::from(2.0)));
        assert_eq!(compare(&Value::from(2), &Value::from(2.5)), Ordering::Less);
        assert!(same_type_class(&Value::from(1), &Value::from(1.0)));
        assert!(!same_type_class(&Value::from(1), &Value::from("1")));
    }

    #[test]
    fn arrays_and_maps_compare_elementwise() {
        let short = Value::array(vec![Value::from(1)]);
        let long = Value::array(vec![Value::from(1), Value::from(0)]);
        assert_eq!(compare(&short, &long), Ordering::Less);

        let a = Value::map(vec![("a", Value::from(2))]);
        let b = Value::map(vec![("b", Value::from(1))]);
        assert_eq!(compare(&a, &b), Ordering::Less);
        assert!(equals(
            &Value::map(vec![("x", Value::from(1)), ("y", Value::from(2))]),
            &Value::map(vec![("y", Value::from(2.0)), ("x", Value::from(1))]),
        ));
    }
}
