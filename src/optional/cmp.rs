use core::{
    cmp::Ordering,
    hash::{Hash, Hasher},
};

use crate::Nullopt;

use super::Optional;

/// The hash written for every disengaged [`Optional`]. It is arbitrary, and chosen so that common
/// values are unlikely to hash to the same thing.
pub const DISENGAGED_HASH: usize = -3333_isize as usize;

// comparisons against bare values. these cannot be trait impls, since `PartialEq<U>` for all `U`
// would overlap with the impls against other optionals.
impl<T> Optional<T> {
    /// Whether `self` holds a value equal to `other`. A disengaged `Optional` equals no value.
    pub fn eq_value<U: ?Sized>(&self, other: &U) -> bool
    where
        T: PartialEq<U>,
    {
        match self.as_ref() {
            Some(value) => value == other,
            None => false,
        }
    }

    /// Compare `self` against a bare value. A disengaged `Optional` is less than every value.
    /// To compare with the value on the left, reverse the result.
    ///
    /// ## Example
    /// ```
    /// # use optional::Optional;
    /// # use core::cmp::Ordering;
    /// assert_eq!(Some(Ordering::Less), Optional::<i32>::new().partial_cmp_value(&i32::MIN));
    /// assert_eq!(Some(Ordering::Greater), Optional::some(5).partial_cmp_value(&3));
    /// ```
    pub fn partial_cmp_value<U: ?Sized>(&self, other: &U) -> Option<Ordering>
    where
        T: PartialOrd<U>,
    {
        match self.as_ref() {
            Some(value) => value.partial_cmp(other),
            None => Some(Ordering::Less),
        }
    }

    /// Totally ordered version of [`Optional::partial_cmp_value`]. To compare with the value on the
    /// left, use `opt.cmp_value(&value).reverse()`.
    pub fn cmp_value(&self, other: &T) -> Ordering
    where
        T: Ord,
    {
        match self.as_ref() {
            Some(value) => value.cmp(other),
            None => Ordering::Less,
        }
    }
}

impl<T, U> PartialEq<Optional<U>> for Optional<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &Optional<U>) -> bool {
        match (self.as_ref(), other.as_ref()) {
            (Some(a), Some(b)) => a == b,
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: Eq> Eq for Optional<T> {}

// a disengaged optional sorts before every engaged one
impl<T, U> PartialOrd<Optional<U>> for Optional<T>
where
    T: PartialOrd<U>,
{
    fn partial_cmp(&self, other: &Optional<U>) -> Option<Ordering> {
        match (self.as_ref(), other.as_ref()) {
            (Some(a), Some(b)) => a.partial_cmp(b),
            _ => Some(self.has_value().cmp(&other.has_value())),
        }
    }
}

impl<T: Ord> Ord for Optional<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.as_ref(), other.as_ref()) {
            (Some(a), Some(b)) => a.cmp(b),
            _ => self.has_value().cmp(&other.has_value()),
        }
    }
}

impl<T> PartialEq<Nullopt> for Optional<T> {
    fn eq(&self, _: &Nullopt) -> bool {
        !self.has_value()
    }
}

impl<T> PartialOrd<Nullopt> for Optional<T> {
    fn partial_cmp(&self, _: &Nullopt) -> Option<Ordering> {
        Some(if self.has_value() {
            Ordering::Greater
        } else {
            Ordering::Equal
        })
    }
}

impl<T> PartialEq<Optional<T>> for Nullopt {
    fn eq(&self, other: &Optional<T>) -> bool {
        !other.has_value()
    }
}

impl<T> PartialOrd<Optional<T>> for Nullopt {
    fn partial_cmp(&self, other: &Optional<T>) -> Option<Ordering> {
        PartialOrd::<Nullopt>::partial_cmp(other, self).map(Ordering::reverse)
    }
}

impl<T: Hash> Hash for Optional<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.as_ref() {
            Some(value) => value.hash(state),
            None => state.write_usize(DISENGAGED_HASH),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NULLOPT;
    use std::collections::{hash_map::DefaultHasher, HashSet};

    fn hash_of<H: Hash + ?Sized>(value: &H) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn equality() {
        assert_eq!(Optional::<i32>::new(), Optional::<i32>::new());
        assert_eq!(Optional::some(1), Optional::some(1));
        assert_ne!(Optional::some(1), Optional::some(2));
        assert_ne!(Optional::some(1), Optional::<i32>::new());
        assert_ne!(Optional::<i32>::new(), Optional::some(1));
    }

    #[test]
    fn equality_across_types() {
        assert!(Optional::some(String::from("a")) == Optional::some("a"));
        assert!(Optional::<String>::new() == Optional::<&str>::new());
        assert!(Optional::some(String::from("a")) != Optional::<&str>::new());
    }

    #[test]
    fn disengaged_sorts_first() {
        let empty = Optional::<i32>::new();
        let low = Optional::some(i32::MIN);
        let high = Optional::some(7);
        assert!(empty < low);
        assert!(low < high);
        assert!(high > empty);
        assert_eq!(Ordering::Equal, empty.cmp(&Optional::new()));
        assert_eq!(Some(Ordering::Less), empty.partial_cmp(&low));
    }

    #[test]
    fn sorting() {
        let mut slots = vec![
            Optional::some(3),
            Optional::new(),
            Optional::some(1),
            Optional::new(),
        ];
        slots.sort();
        assert_eq!(
            vec![
                Optional::new(),
                Optional::new(),
                Optional::some(1),
                Optional::some(3),
            ],
            slots
        );
    }

    #[test]
    fn partial_order_propagates_incomparable_values() {
        assert_eq!(None, Optional::some(f64::NAN).partial_cmp(&Optional::some(1.0)));
        assert_eq!(
            Some(Ordering::Less),
            Optional::<f64>::new().partial_cmp(&Optional::some(f64::NAN))
        );
    }

    #[test]
    fn bare_value_comparison() {
        assert!(Optional::some(4).eq_value(&4));
        assert!(!Optional::<i32>::new().eq_value(&4));
        assert!(Optional::some(String::from("x")).eq_value("x"));
        assert_eq!(Ordering::Less, Optional::<u8>::new().cmp_value(&0));
        assert_eq!(Ordering::Equal, Optional::some(9_u8).cmp_value(&9));
        assert_eq!(Ordering::Less, Optional::some(1_u8).cmp_value(&9));
        assert_eq!(Ordering::Greater, Optional::<u8>::new().cmp_value(&0).reverse());
    }

    #[test]
    fn nullopt_comparison() {
        assert!(Optional::<i32>::new() == NULLOPT);
        assert!(NULLOPT == Optional::<i32>::new());
        assert!(Optional::some(0) != NULLOPT);
        assert!(Optional::some(0) > NULLOPT);
        assert!(NULLOPT < Optional::some(0));
        assert!(NULLOPT <= Optional::<i32>::new());
        assert_eq!(Some(Ordering::Equal), Optional::<i32>::new().partial_cmp(&NULLOPT));
    }

    #[test]
    fn engaged_hash_matches_value_hash() {
        assert_eq!(hash_of(&42_u32), hash_of(&Optional::some(42_u32)));
        assert_eq!(hash_of("text"), hash_of(&Optional::some("text")));
    }

    #[test]
    fn disengaged_hash_is_sentinel() {
        let mut hasher = DefaultHasher::new();
        hasher.write_usize(DISENGAGED_HASH);
        let sentinel = hasher.finish();
        assert_eq!(sentinel, hash_of(&Optional::<u8>::new()));
        assert_eq!(sentinel, hash_of(&Optional::<String>::new()));
        assert_ne!(sentinel, hash_of(&Optional::some(0_u8)));
    }

    #[test]
    fn usable_as_set_key() {
        let mut set = HashSet::new();
        assert!(set.insert(Optional::<i32>::new()));
        assert!(set.insert(Optional::some(1)));
        assert!(!set.insert(Optional::new()));
        assert!(!set.insert(Optional::some(1)));
        assert_eq!(2, set.len());
    }
}
