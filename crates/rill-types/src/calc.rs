//! Subsumption and common-supertype calculation.
//!
//! These are the two primitives the inference engine builds its type algebra
//! on: [`assignable`] answers "is every value of `b` a value of `a`", and
//! [`common_type`] computes the narrowest common supertype of two types of
//! the same kind (bounds hulls for numbers, recursive merges for
//! collections).

use std::mem;

use crate::ty::Ty;

/// Whether every value described by `b` is also described by `a`.
pub fn assignable(a: &Ty, b: &Ty) -> bool {
    if a == b {
        return true;
    }
    // A variant source is accepted only if all of its alternatives are.
    if let Ty::Variant(members) = b {
        return members.iter().all(|m| assignable(a, m));
    }
    // An optional source is its inner type or undef.
    if let Ty::Optional(inner) = b {
        return assignable(a, &Ty::Undef) && assignable(a, inner);
    }
    match a {
        Ty::Data => data_accepts(b),
        Ty::Optional(inner) => matches!(b, Ty::Undef) || assignable(inner, b),
        Ty::Variant(members) => members.iter().any(|m| assignable(m, b)),
        Ty::Integer { bounds } => {
            matches!(b, Ty::Integer { bounds: other } if range_contains(bounds, other))
        }
        Ty::Float { bounds } => {
            matches!(b, Ty::Float { bounds: other } if float_range_contains(bounds, other))
        }
        Ty::Regexp { pattern: None } => matches!(b, Ty::Regexp { .. }),
        Ty::Array { element, size } => match b {
            Ty::Array {
                element: other_element,
                size: other_size,
            } => assignable(element, other_element) && range_contains(size, other_size),
            _ => false,
        },
        Ty::Hash { entry: None } => match b {
            Ty::Hash { entry: Some(entry) } => {
                data_accepts(&entry.0) && data_accepts(&entry.1)
            }
            _ => false,
        },
        Ty::Hash { entry: Some(entry) } => match b {
            Ty::Hash {
                entry: Some(other),
            } => assignable(&entry.0, &other.0) && assignable(&entry.1, &other.1),
            _ => false,
        },
        Ty::Resource { type_name: None } => matches!(b, Ty::Resource { .. }),
        // Undef, Boolean, Str, refined Regexp, named Resource: only exact
        // matches, which the equality check above already answered.
        _ => false,
    }
}

/// Whether `Data` describes all values of `b`.
fn data_accepts(b: &Ty) -> bool {
    match b {
        Ty::Undef
        | Ty::Boolean
        | Ty::Str
        | Ty::Data
        | Ty::Integer { .. }
        | Ty::Float { .. } => true,
        Ty::Array { element, .. } => data_accepts(element),
        Ty::Hash { entry: None } => true,
        Ty::Hash { entry: Some(entry) } => data_accepts(&entry.0) && data_accepts(&entry.1),
        Ty::Optional(inner) => data_accepts(inner),
        Ty::Variant(members) => members.iter().all(data_accepts),
        Ty::Regexp { .. } | Ty::Resource { .. } => false,
    }
}

/// The narrowest common supertype of two types of the same kind.
///
/// Callers are expected to pair types of matching kinds (both integers, both
/// arrays, ...); mismatched kinds fall back to a variant of the two.
pub fn common_type(a: &Ty, b: &Ty) -> Ty {
    match (a, b) {
        (Ty::Integer { bounds: x }, Ty::Integer { bounds: y }) => Ty::Integer {
            bounds: hull(x, y),
        },
        (Ty::Float { bounds: x }, Ty::Float { bounds: y }) => Ty::Float {
            bounds: float_hull(x, y),
        },
        (Ty::Regexp { pattern: x }, Ty::Regexp { pattern: y }) => Ty::Regexp {
            pattern: if x == y { x.clone() } else { None },
        },
        (
            Ty::Array {
                element: ae,
                size: asz,
            },
            Ty::Array {
                element: be,
                size: bsz,
            },
        ) => Ty::Array {
            element: Box::new(widen(ae, be)),
            size: hull(asz, bsz),
        },
        (Ty::Hash { entry: Some(x) }, Ty::Hash { entry: Some(y) }) => {
            Ty::hash_of(widen(&x.0, &y.0), widen(&x.1, &y.1))
        }
        (Ty::Hash { .. }, Ty::Hash { .. }) => Ty::hash_of_data(),
        (Ty::Optional(x), Ty::Optional(y)) => Ty::optional(widen(x, y)),
        (Ty::Variant(xs), Ty::Variant(ys)) => {
            let mut members = xs.clone();
            for member in ys {
                if !members.contains(member) {
                    members.push(member.clone());
                }
            }
            Ty::Variant(members)
        }
        (Ty::Resource { type_name: x }, Ty::Resource { type_name: y }) => Ty::Resource {
            type_name: if x == y { x.clone() } else { None },
        },
        _ if mem::discriminant(a) == mem::discriminant(b) => a.clone(),
        _ => Ty::variant(vec![a.clone(), b.clone()]),
    }
}

/// Merge two arbitrary types: the narrower of the two when one subsumes the
/// other, their common supertype when kinds match, a variant otherwise.
/// Used for the recursive element/value positions of `common_type`.
fn widen(a: &Ty, b: &Ty) -> Ty {
    if assignable(a, b) {
        a.clone()
    } else if assignable(b, a) {
        b.clone()
    } else if mem::discriminant(a) == mem::discriminant(b) {
        common_type(a, b)
    } else {
        Ty::variant(vec![a.clone(), b.clone()])
    }
}

fn range_contains(outer: &Option<(i64, i64)>, inner: &Option<(i64, i64)>) -> bool {
    match (outer, inner) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some((of, ot)), Some((inf, int))) => of <= inf && int <= ot,
    }
}

fn float_range_contains(outer: &Option<(f64, f64)>, inner: &Option<(f64, f64)>) -> bool {
    match (outer, inner) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some((of, ot)), Some((inf, int))) => of <= inf && int <= ot,
    }
}

fn hull(x: &Option<(i64, i64)>, y: &Option<(i64, i64)>) -> Option<(i64, i64)> {
    match (x, y) {
        (Some((xf, xt)), Some((yf, yt))) => Some(((*xf).min(*yf), (*xt).max(*yt))),
        _ => None,
    }
}

fn float_hull(x: &Option<(f64, f64)>, y: &Option<(f64, f64)>) -> Option<(f64, f64)> {
    match (x, y) {
        (Some((xf, xt)), Some((yf, yt))) => Some((xf.min(*yf), xt.max(*yt))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignable_is_reflexive() {
        for ty in [
            Ty::integer_range(1, 5),
            Ty::string(),
            Ty::hash_of(Ty::string(), Ty::integer()),
            Ty::optional(Ty::float()),
            Ty::variant(vec![Ty::string(), Ty::integer()]),
        ] {
            assert!(assignable(&ty, &ty), "{ty} should be assignable to itself");
        }
    }

    #[test]
    fn integer_range_containment() {
        assert!(assignable(&Ty::integer(), &Ty::integer_range(1, 1)));
        assert!(assignable(&Ty::integer_range(0, 10), &Ty::integer_range(1, 5)));
        assert!(!assignable(&Ty::integer_range(1, 5), &Ty::integer_range(0, 10)));
        assert!(!assignable(&Ty::integer_range(1, 5), &Ty::integer()));
    }

    #[test]
    fn string_does_not_accept_integer() {
        assert!(!assignable(&Ty::string(), &Ty::integer_range(1, 1)));
    }

    #[test]
    fn data_accepts_scalars_and_data_collections() {
        assert!(assignable(&Ty::data(), &Ty::integer_range(1, 1)));
        assert!(assignable(&Ty::data(), &Ty::string()));
        assert!(assignable(&Ty::data(), &Ty::undef()));
        assert!(assignable(&Ty::data(), &Ty::sized_array(Ty::Data, 0, 0)));
        assert!(assignable(&Ty::data(), &Ty::hash_of(Ty::string(), Ty::integer())));
        assert!(!assignable(&Ty::data(), &Ty::resource("notify")));
    }

    #[test]
    fn optional_accepts_undef_and_inner() {
        let opt = Ty::optional(Ty::integer_range(1, 1));
        assert!(assignable(&opt, &Ty::undef()));
        assert!(assignable(&opt, &Ty::integer_range(1, 1)));
        assert!(!assignable(&opt, &Ty::string()));
    }

    #[test]
    fn variant_target_accepts_any_member() {
        let var = Ty::variant(vec![Ty::string(), Ty::integer()]);
        assert!(assignable(&var, &Ty::string()));
        assert!(assignable(&var, &Ty::integer_range(3, 3)));
        assert!(!assignable(&var, &Ty::float()));
    }

    #[test]
    fn variant_source_needs_all_members_accepted() {
        let source = Ty::variant(vec![Ty::integer_range(1, 1), Ty::integer_range(5, 5)]);
        assert!(assignable(&Ty::integer_range(0, 10), &source));
        assert!(!assignable(&Ty::integer_range(0, 3), &source));
    }

    #[test]
    fn generic_hash_accepts_data_hashes() {
        assert!(assignable(
            &Ty::hash_of_data(),
            &Ty::hash_of(Ty::string(), Ty::integer_range(1, 1))
        ));
        assert!(!assignable(
            &Ty::hash_of(Ty::string(), Ty::integer()),
            &Ty::hash_of_data()
        ));
    }

    #[test]
    fn array_covariance_with_sizes() {
        let outer = Ty::array_of(Ty::integer());
        let inner = Ty::sized_array(Ty::integer_range(1, 1), 1, 1);
        assert!(assignable(&outer, &inner));
        assert!(!assignable(&inner, &outer));
    }

    #[test]
    fn common_type_merges_integer_bounds() {
        assert_eq!(
            common_type(&Ty::integer_range(1, 1), &Ty::integer_range(2, 2)),
            Ty::integer_range(1, 2)
        );
        assert_eq!(
            common_type(&Ty::integer(), &Ty::integer_range(2, 2)),
            Ty::integer()
        );
    }

    #[test]
    fn common_type_merges_float_bounds() {
        assert_eq!(
            common_type(&Ty::float_range(1.0, 2.0), &Ty::float_range(3.0, 4.0)),
            Ty::float_range(1.0, 4.0)
        );
    }

    #[test]
    fn common_type_merges_resources_by_name() {
        assert_eq!(
            common_type(&Ty::resource("notify"), &Ty::resource("notify")),
            Ty::resource("notify")
        );
        assert_eq!(
            common_type(&Ty::resource("notify"), &Ty::resource("file")),
            Ty::Resource { type_name: None }
        );
    }

    #[test]
    fn common_type_merges_arrays_recursively() {
        let merged = common_type(
            &Ty::sized_array(Ty::integer_range(1, 1), 1, 1),
            &Ty::sized_array(Ty::integer_range(2, 2), 2, 2),
        );
        assert_eq!(merged, Ty::sized_array(Ty::integer_range(1, 2), 1, 2));
    }
}
