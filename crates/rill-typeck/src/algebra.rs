//! The type algebra the inference rules lean on.
//!
//! `covering_type` picks the narrowest type describing the values of two
//! types; `union_type` folds it over a collection. Both stay as tight as the
//! inputs allow: a variant only appears when neither subsumption nor a
//! same-kind merge applies.

use std::mem;

use rill_types::{assignable, common_type, Ty};

/// The narrowest type covering the values of both `a` and `b`.
pub fn covering_type(a: &Ty, b: &Ty) -> Ty {
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

/// The covering type of every type in `types`, or `None` when empty.
pub fn union_type<'a>(types: impl IntoIterator<Item = &'a Ty>) -> Option<Ty> {
    let mut iter = types.into_iter();
    let first = iter.next()?.clone();
    Some(iter.fold(first, |acc, ty| covering_type(&acc, ty)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covering_prefers_the_subsuming_side() {
        assert_eq!(
            covering_type(&Ty::integer(), &Ty::integer_range(1, 1)),
            Ty::integer()
        );
        assert_eq!(
            covering_type(&Ty::integer_range(1, 1), &Ty::integer()),
            Ty::integer()
        );
    }

    #[test]
    fn covering_merges_same_kind() {
        assert_eq!(
            covering_type(&Ty::integer_range(1, 1), &Ty::integer_range(2, 2)),
            Ty::integer_range(1, 2)
        );
    }

    #[test]
    fn covering_falls_back_to_variant() {
        assert_eq!(
            covering_type(&Ty::integer_range(1, 1), &Ty::float_range(2.0, 2.0)),
            Ty::variant(vec![Ty::integer_range(1, 1), Ty::float_range(2.0, 2.0)])
        );
        assert_eq!(
            covering_type(&Ty::integer_range(1, 1), &Ty::undef()),
            Ty::variant(vec![Ty::integer_range(1, 1), Ty::undef()])
        );
    }

    #[test]
    fn covering_is_idempotent() {
        for ty in [
            Ty::integer_range(1, 5),
            Ty::string(),
            Ty::hash_of(Ty::string(), Ty::integer()),
            Ty::variant(vec![Ty::string(), Ty::undef()]),
        ] {
            assert_eq!(covering_type(&ty, &ty), ty);
        }
    }

    #[test]
    fn covering_is_commutative_on_disjoint_ranges() {
        let a = Ty::integer_range(0, 3);
        let b = Ty::integer_range(7, 9);
        assert_eq!(covering_type(&a, &b), covering_type(&b, &a));
    }

    #[test]
    fn union_of_nothing_is_none() {
        assert_eq!(union_type([]), None);
    }

    #[test]
    fn union_folds_left_to_right() {
        let types = [
            Ty::integer_range(1, 1),
            Ty::integer_range(5, 5),
            Ty::integer_range(3, 3),
        ];
        assert_eq!(union_type(&types), Some(Ty::integer_range(1, 5)));
    }

    #[test]
    fn union_of_mixed_kinds_is_a_variant() {
        let types = [Ty::integer_range(1, 1), Ty::float_range(2.0, 2.0)];
        assert_eq!(
            union_type(&types),
            Some(Ty::variant(vec![
                Ty::integer_range(1, 1),
                Ty::float_range(2.0, 2.0),
            ]))
        );
    }
}
