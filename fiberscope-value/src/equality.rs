use crate::{Value, ValueId};

/// Structural equality with host-like leaf semantics.
///
/// Containers are equal when they have the same shape and pairwise-equal
/// children (records compare keys regardless of order). Functions compare by
/// source text, dates by instant, regexps and errors by their parts, numbers
/// with `NaN == NaN`. Promises are equal only to themselves. A pair already
/// being compared further up counts as equal, so cycles terminate.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    let mut stack = Vec::new();
    equal(a, b, &mut stack)
}

fn equal(a: &Value, b: &Value, stack: &mut Vec<(ValueId, ValueId)>) -> bool {
    if a.same_value_zero(b) {
        return true;
    }

    if let (Some(ia), Some(ib)) = (a.id(), b.id()) {
        if stack.contains(&(ia, ib)) {
            return true;
        }
        stack.push((ia, ib));
        let result = equal_references(a, b, stack);
        stack.pop();
        return result;
    }

    false
}

fn equal_references(a: &Value, b: &Value, stack: &mut Vec<(ValueId, ValueId)>) -> bool {
    match (a, b) {
        (Value::Date(x), Value::Date(y)) => x.time == y.time,
        (Value::RegExp(x), Value::RegExp(y)) => x == y,
        (Value::Error(x), Value::Error(y)) => x == y,
        (Value::Function(x), Value::Function(y)) => x.source == y.source,
        (Value::Buffer(x), Value::Buffer(y)) => match (x.read(), y.read()) {
            (Some(x), Some(y)) => *x == *y,
            _ => false,
        },
        (Value::BufferView(x), Value::BufferView(y)) => x.kind == y.kind && x.bytes() == y.bytes(),
        (Value::Array(x), Value::Array(y)) => {
            let (Some(x), Some(y)) = (x.read(), y.read()) else {
                return false;
            };
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(x, y)| equal(x, y, stack))
        }
        (Value::Record(x), Value::Record(y)) => {
            let (Some(x), Some(y)) = (x.read(), y.read()) else {
                return false;
            };
            x.len() == y.len()
                && x.iter()
                    .all(|(k, xv)| y.get(k).is_some_and(|yv| equal(xv, yv, stack)))
        }
        (Value::Map(x), Value::Map(y)) => {
            let (Some(x), Some(y)) = (x.read(), y.read()) else {
                return false;
            };
            x.len() == y.len()
                && x.iter()
                    .all(|(k, xv)| y.get(k).is_some_and(|yv| equal(xv, yv, stack)))
        }
        (Value::Set(x), Value::Set(y)) => {
            let (Some(x), Some(y)) = (x.read(), y.read()) else {
                return false;
            };
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(x, y)| equal(x, y, stack))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_ignore_key_order() {
        let a = Value::record([("x", Value::from(1)), ("y", Value::from("two"))]);
        let b = Value::record([("y", Value::from("two")), ("x", Value::from(1))]);
        assert!(deep_equal(&a, &b));
    }

    #[test]
    fn functions_compare_by_source() {
        let a = Value::function("f", "() => 1");
        let b = Value::function("g", "() => 1");
        assert!(deep_equal(&a, &b));
        assert!(!deep_equal(&a, &Value::function("f", "() => 2")));
    }

    #[test]
    fn cycles_terminate() {
        let a = Value::record([("n", Value::from(1))]);
        let b = Value::record([("n", Value::from(1))]);
        if let (Value::Record(ra), Value::Record(rb)) = (&a, &b) {
            ra.try_borrow_mut().unwrap().insert("self".into(), a.clone());
            rb.try_borrow_mut().unwrap().insert("self".into(), b.clone());
        }
        assert!(deep_equal(&a, &b));
    }

    #[test]
    fn distinct_promises_differ() {
        assert!(!deep_equal(&Value::promise(), &Value::promise()));
        let p = Value::promise();
        assert!(deep_equal(&p, &p.clone()));
    }

    #[test]
    fn mismatched_shapes_differ() {
        assert!(!deep_equal(&Value::array([]), &Value::record::<&str>([])));
        assert!(!deep_equal(&Value::from(1), &Value::from("1")));
    }
}
