//! Associative combination with an identity, for `fold_monoid`.
//!
//! A [`Semigroup`] combines two values associatively; a [`Monoid`] adds the
//! identity element. Numeric types have two reasonable monoids, so they are
//! reached through the [`Sum`] and [`Product`] wrappers rather than directly.

use std::ops::{Add, Mul};

pub trait Semigroup: Sized {
    /// Must be associative: `a.combine(b).combine(c) == a.combine(b.combine(c))`.
    fn combine(self, other: Self) -> Self;
}

pub trait Monoid: Semigroup {
    /// Identity for [`Semigroup::combine`].
    fn empty() -> Self;
}

impl Semigroup for String {
    fn combine(mut self, other: Self) -> Self {
        self.push_str(&other);
        self
    }
}

impl Monoid for String {
    fn empty() -> Self {
        String::new()
    }
}

impl<T> Semigroup for Vec<T> {
    fn combine(mut self, mut other: Self) -> Self {
        self.append(&mut other);
        self
    }
}

impl<T> Monoid for Vec<T> {
    fn empty() -> Self {
        Vec::new()
    }
}

impl Semigroup for () {
    fn combine(self, _other: Self) -> Self {}
}

impl Monoid for () {
    fn empty() -> Self {}
}

/// `None` is the identity; two `Some`s combine their contents.
impl<T: Semigroup> Semigroup for Option<T> {
    fn combine(self, other: Self) -> Self {
        match (self, other) {
            (Some(a), Some(b)) => Some(a.combine(b)),
            (a, None) => a,
            (None, b) => b,
        }
    }
}

impl<T: Semigroup> Monoid for Option<T> {
    fn empty() -> Self {
        None
    }
}

impl<A: Semigroup, B: Semigroup> Semigroup for (A, B) {
    fn combine(self, other: Self) -> Self {
        (self.0.combine(other.0), self.1.combine(other.1))
    }
}

impl<A: Monoid, B: Monoid> Monoid for (A, B) {
    fn empty() -> Self {
        (A::empty(), B::empty())
    }
}

// ================================
// Wrappers
// ================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Sum<T>(pub T);

impl<T: Add<Output = T>> Semigroup for Sum<T> {
    fn combine(self, other: Self) -> Self {
        Sum(self.0 + other.0)
    }
}

impl<T: Add<Output = T> + std::iter::Sum> Monoid for Sum<T> {
    fn empty() -> Self {
        Sum(std::iter::empty::<T>().sum())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Product<T>(pub T);

impl<T: Mul<Output = T>> Semigroup for Product<T> {
    fn combine(self, other: Self) -> Self {
        Product(self.0 * other.0)
    }
}

impl<T: Mul<Output = T> + std::iter::Product> Monoid for Product<T> {
    fn empty() -> Self {
        Product(std::iter::empty::<T>().product())
    }
}

/// Logical or; identity `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Any(pub bool);

impl Semigroup for Any {
    fn combine(self, other: Self) -> Self {
        Any(self.0 || other.0)
    }
}

impl Monoid for Any {
    fn empty() -> Self {
        Any(false)
    }
}

/// Logical and; identity `true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct All(pub bool);

impl Semigroup for All {
    fn combine(self, other: Self) -> Self {
        All(self.0 && other.0)
    }
}

impl Monoid for All {
    fn empty() -> Self {
        All(true)
    }
}

/// Keeps the leftmost value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct First<T>(pub T);

impl<T> Semigroup for First<T> {
    fn combine(self, _other: Self) -> Self {
        self
    }
}

/// Keeps the rightmost value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Last<T>(pub T);

impl<T> Semigroup for Last<T> {
    fn combine(self, other: Self) -> Self {
        other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identities() {
        assert_eq!(Sum::<i64>::empty(), Sum(0));
        assert_eq!(Product::<i64>::empty(), Product(1));
        assert_eq!(All::empty().combine(All(true)), All(true));
        assert_eq!(Any::empty().combine(Any(false)), Any(false));
        assert_eq!(String::empty().combine("ab".to_string()), "ab");
    }

    #[test]
    fn option_lifts_a_semigroup() {
        let firsts: Option<First<u8>> = Some(First(1)).combine(None).combine(Some(First(3)));
        assert_eq!(firsts, Some(First(1)));
        let lasts: Option<Last<u8>> = None.combine(Some(Last(2))).combine(Some(Last(5)));
        assert_eq!(lasts, Some(Last(5)));
    }
}
