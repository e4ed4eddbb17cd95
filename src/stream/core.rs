//! Core step protocol and trait definitions for rs2-step.
//!
//! A stream is a pull-driven state machine. Every pull reports exactly one of
//! three outcomes: an element together with the continuation ([`Step::Yield`]),
//! a bookkeeping step with no element ([`Step::Skip`]), or termination
//! ([`Step::Done`]). Combinators are plain generic structs whose private fields
//! are their state, so a chain of combinators monomorphizes into a single state
//! machine with no intermediate per-element containers.
//!
//! The effect context is the pair `Future` + `Result`: a step may suspend
//! (`Poll::Pending`) exactly when the producer underneath suspends, and may fail
//! with the stream's `Error` type. Combinators never catch, replace or reorder
//! either.
//!
//! A single stream value must only be pulled by one caller at a time, and must
//! not be pulled again once it reported `Done` or an error.

use futures_core::ready;
use std::convert::Infallible;
use std::fmt::Debug;
use std::future::Future;
use std::ops::{Add, DerefMut, Mul};
use std::pin::Pin;
use std::task::{Context, Poll};

use super::constructors::Iter;
use super::drain;
use super::elementwise::{
    Enumerate, Fallible, Filter, FilterMap, Inspect, Map, MapEffect, MapErr, RunEffects, ScanLeft,
    Traced,
};
use super::interop;
use super::nested::{ConcatMap, Cycle};
use super::structural::{
    Append, Cons, DropN, DropWhile, Init, Intersperse, Snoc, Tail, Take, TakeWhile,
};
use super::zip::{Zip, Zip3, ZipWith, ZipWith3};
use crate::monoid::Monoid;
use crate::stream_configuration::{CollectConfig, TraceConfig};

// ================================
// Step
// ================================

/// Outcome of pulling a stream once.
///
/// `S` is the continuation state. Collaborators that hand the crate a step
/// function ([`from_fn`](super::constructors::from_fn)) return the next state
/// explicitly; inside a [`Stream`] the state lives in the pinned combinator and
/// `S` is `()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step<A, S = ()> {
    /// One element is available; continue from the state.
    Yield(A, S),
    /// No element this call; continue from the state.
    Skip(S),
    /// Terminal. The producer is never invoked again on this path.
    Done,
}

impl<A, S> Step<A, S> {
    /// Transform the element, leaving the state untouched.
    #[inline]
    pub fn map<B, F>(self, f: F) -> Step<B, S>
    where
        F: FnOnce(A) -> B,
    {
        match self {
            Step::Yield(a, s) => Step::Yield(f(a), s),
            Step::Skip(s) => Step::Skip(s),
            Step::Done => Step::Done,
        }
    }

    /// Transform the continuation state, leaving the element untouched.
    #[inline]
    pub fn map_state<T, F>(self, f: F) -> Step<A, T>
    where
        F: FnOnce(S) -> T,
    {
        match self {
            Step::Yield(a, s) => Step::Yield(a, f(s)),
            Step::Skip(s) => Step::Skip(f(s)),
            Step::Done => Step::Done,
        }
    }

    /// Separate the outcome from its continuation state.
    #[inline]
    pub fn split(self) -> (Step<A>, Option<S>) {
        match self {
            Step::Yield(a, s) => (Step::Yield(a, ()), Some(s)),
            Step::Skip(s) => (Step::Skip(()), Some(s)),
            Step::Done => (Step::Done, None),
        }
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        matches!(self, Step::Done)
    }

    /// The yielded element, if any.
    #[inline]
    pub fn into_item(self) -> Option<A> {
        match self {
            Step::Yield(a, _) => Some(a),
            _ => None,
        }
    }
}

// ================================
// Stream trait
// ================================

/// A lazy, pull-based producer of elements.
pub trait Stream {
    type Item;
    type Error;

    /// Advance the state machine by one step.
    ///
    /// Returns `Poll::Pending` only when an effect underneath is pending, in
    /// which case the waker in `cx` is registered by that effect.
    fn poll_step(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>>;
}

impl<S> Stream for &mut S
where
    S: Stream + Unpin + ?Sized,
{
    type Item = S::Item;
    type Error = S::Error;

    fn poll_step(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        S::poll_step(Pin::new(&mut **self), cx)
    }
}

impl<P> Stream for Pin<P>
where
    P: DerefMut + Unpin,
    P::Target: Stream,
{
    type Item = <P::Target as Stream>::Item;
    type Error = <P::Target as Stream>::Error;

    fn poll_step(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        self.get_mut().as_mut().poll_step(cx)
    }
}

/// A type-erased, heap-allocated stream. The combinator chain (and so every
/// private state shape inside it) is hidden behind one external type.
pub type BoxedStream<'a, A, E = Infallible> = Pin<Box<dyn Stream<Item = A, Error = E> + Send + 'a>>;

/// [`BoxedStream`] without the `Send` requirement.
pub type LocalBoxedStream<'a, A, E = Infallible> = Pin<Box<dyn Stream<Item = A, Error = E> + 'a>>;

// ================================
// Counts
// ================================

/// Element counts accepted by `take`, `drop` and `replicate`.
///
/// Any primitive integer works; negative counts clamp to zero.
pub trait Count: Copy {
    fn to_count(self) -> usize;
}

macro_rules! impl_count_unsigned {
    ($($t:ty),*) => {$(
        impl Count for $t {
            #[inline]
            fn to_count(self) -> usize {
                usize::try_from(self).unwrap_or(usize::MAX)
            }
        }
    )*};
}

macro_rules! impl_count_signed {
    ($($t:ty),*) => {$(
        impl Count for $t {
            #[inline]
            fn to_count(self) -> usize {
                if self <= 0 {
                    0
                } else {
                    usize::try_from(self).unwrap_or(usize::MAX)
                }
            }
        }
    )*};
}

impl_count_unsigned!(u8, u16, u32, u64, u128, usize);
impl_count_signed!(i8, i16, i32, i64, i128, isize);

// ================================
// Single pulls
// ================================

/// Future for [`StreamExt::step`].
#[must_use = "futures do nothing unless you `.await` or poll them"]
#[derive(Debug)]
pub struct StepOnce<'a, S: ?Sized> {
    stream: &'a mut S,
}

impl<S> Future for StepOnce<'_, S>
where
    S: Stream + Unpin + ?Sized,
{
    type Output = Result<Step<S::Item>, S::Error>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut *self.stream).poll_step(cx)
    }
}

/// Future for [`StreamExt::next`].
#[must_use = "futures do nothing unless you `.await` or poll them"]
#[derive(Debug)]
pub struct Next<'a, S: ?Sized> {
    stream: &'a mut S,
}

impl<S> Future for Next<'_, S>
where
    S: Stream + Unpin + ?Sized,
{
    type Output = Result<Option<S::Item>, S::Error>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut stream = Pin::new(&mut *self.stream);
        loop {
            match ready!(stream.as_mut().poll_step(cx))? {
                Step::Yield(item, ()) => return Poll::Ready(Ok(Some(item))),
                Step::Skip(()) => continue,
                Step::Done => return Poll::Ready(Ok(None)),
            }
        }
    }
}

// ================================
// Extension trait
// ================================

/// Combinators and drains available on every [`Stream`].
///
/// Structural combinators take `self` by value and return a new stream that
/// owns the old one; nothing runs until a drain starts pulling. Drains return
/// a future resolving to `Result<_, Self::Error>`, stopping at the first error.
pub trait StreamExt: Stream + Sized {
    // ---- pulling ----

    /// Pull exactly one step, `Skip`s included.
    fn step(&mut self) -> StepOnce<'_, Self>
    where
        Self: Unpin,
    {
        StepOnce { stream: self }
    }

    /// Pull until the next element, passing over `Skip`s. `Ok(None)` once done.
    fn next(&mut self) -> Next<'_, Self>
    where
        Self: Unpin,
    {
        Next { stream: self }
    }

    // ---- erasure ----

    /// Erase the concrete combinator type.
    fn boxed<'a>(self) -> BoxedStream<'a, Self::Item, Self::Error>
    where
        Self: Send + 'a,
    {
        Box::pin(self)
    }

    fn boxed_local<'a>(self) -> LocalBoxedStream<'a, Self::Item, Self::Error>
    where
        Self: 'a,
    {
        Box::pin(self)
    }

    // ---- elementwise ----

    fn map<B, F>(self, f: F) -> Map<Self, F>
    where
        F: FnMut(Self::Item) -> B,
    {
        Map::new(self, f)
    }

    fn filter<P>(self, predicate: P) -> Filter<Self, P>
    where
        P: FnMut(&Self::Item) -> bool,
    {
        Filter::new(self, predicate)
    }

    /// Keep the `Some` results of `f`, dropping elements mapped to `None`.
    fn filter_map<B, F>(self, f: F) -> FilterMap<Self, F>
    where
        F: FnMut(Self::Item) -> Option<B>,
    {
        FilterMap::new(self, f)
    }

    /// Map through an effect. The source's effect for an element always
    /// completes before `f`'s effect for that element starts, and `f`'s effect
    /// completes before the source is pulled again.
    fn map_effect<B, F, Fut>(self, f: F) -> MapEffect<Self, F, Fut>
    where
        F: FnMut(Self::Item) -> Fut,
        Fut: Future<Output = Result<B, Self::Error>>,
    {
        MapEffect::new(self, f)
    }

    fn inspect<F>(self, f: F) -> Inspect<Self, F>
    where
        F: FnMut(&Self::Item),
    {
        Inspect::new(self, f)
    }

    /// Pair each element with its zero-based index.
    fn enumerate(self) -> Enumerate<Self> {
        Enumerate::new(self)
    }

    /// Running left fold: emits each accumulator after the seed.
    fn scan_left<B, F>(self, init: B, f: F) -> ScanLeft<Self, B, F>
    where
        B: Clone,
        F: FnMut(B, Self::Item) -> B,
    {
        ScanLeft::new(self, init, f)
    }

    /// Log every step outcome through the `log` facade.
    fn traced(self, config: TraceConfig) -> Traced<Self>
    where
        Self::Item: Debug,
    {
        Traced::new(self, config)
    }

    /// Lift an infallible stream into the error type `E`.
    fn fallible<E>(self) -> Fallible<Self, E>
    where
        Self: Stream<Error = Infallible>,
    {
        Fallible::new(self)
    }

    fn map_err<E, F>(self, f: F) -> MapErr<Self, F>
    where
        F: FnMut(Self::Error) -> E,
    {
        MapErr::new(self, f)
    }

    /// Run `f`'s effect for every element, as a stream that emits a single
    /// `()` once the source is exhausted.
    fn run_effects<F, Fut>(self, f: F) -> RunEffects<Self, F, Fut>
    where
        F: FnMut(Self::Item) -> Fut,
        Fut: Future<Output = Result<(), Self::Error>>,
    {
        RunEffects::new(self, f)
    }

    // ---- structural ----

    /// All of `self`, then all of `other`.
    fn append<S2>(self, other: S2) -> Append<Self, S2>
    where
        S2: Stream<Item = Self::Item, Error = Self::Error>,
    {
        Append::new(self, other)
    }

    /// Prepend one element.
    fn cons(self, item: Self::Item) -> Cons<Self> {
        Cons::new(item, self)
    }

    /// Append one element, emitted after `self` finishes.
    fn snoc(self, item: Self::Item) -> Snoc<Self> {
        Snoc::new(self, item)
    }

    /// Everything but the first element. Empty stays empty.
    fn tail(self) -> Tail<Self> {
        Tail::new(self)
    }

    /// Everything but the last element. Empty stays empty.
    fn init(self) -> Init<Self> {
        Init::new(self)
    }

    /// Insert `sep` between consecutive elements.
    fn intersperse(self, sep: Self::Item) -> Intersperse<Self>
    where
        Self::Item: Clone,
    {
        Intersperse::new(self, sep)
    }

    fn take<N: Count>(self, n: N) -> Take<Self> {
        Take::new(self, n.to_count())
    }

    fn drop<N: Count>(self, n: N) -> DropN<Self> {
        DropN::new(self, n.to_count())
    }

    /// Stop (discarding the failing element) at the first element for which
    /// `predicate` is false.
    fn take_while<P>(self, predicate: P) -> TakeWhile<Self, P>
    where
        P: FnMut(&Self::Item) -> bool,
    {
        TakeWhile::new(self, predicate)
    }

    fn drop_while<P>(self, predicate: P) -> DropWhile<Self, P>
    where
        P: FnMut(&Self::Item) -> bool,
    {
        DropWhile::new(self, predicate)
    }

    fn zip<S2>(self, other: S2) -> Zip<Self, S2>
    where
        S2: Stream<Error = Self::Error>,
    {
        Zip::new(self, other)
    }

    fn zip_with<S2, C, F>(self, other: S2, f: F) -> ZipWith<Self, S2, F>
    where
        S2: Stream<Error = Self::Error>,
        F: FnMut(Self::Item, S2::Item) -> C,
    {
        ZipWith::new(self, other, f)
    }

    fn zip3<S2, S3>(self, second: S2, third: S3) -> Zip3<Self, S2, S3>
    where
        S2: Stream<Error = Self::Error>,
        S3: Stream<Error = Self::Error>,
    {
        Zip3::new(self, second, third)
    }

    fn zip_with3<S2, S3, D, F>(self, second: S2, third: S3, f: F) -> ZipWith3<Self, S2, S3, F>
    where
        S2: Stream<Error = Self::Error>,
        S3: Stream<Error = Self::Error>,
        F: FnMut(Self::Item, S2::Item, S3::Item) -> D,
    {
        ZipWith3::new(self, second, third, f)
    }

    /// Replace every element with the stream `f` builds from it, flattened
    /// in order.
    fn concat_map<U, F>(self, f: F) -> ConcatMap<Self, U, F>
    where
        F: FnMut(Self::Item) -> U,
        U: Stream<Error = Self::Error>,
    {
        ConcatMap::new(self, f)
    }

    /// Repeat the stream forever. An empty stream stays empty.
    fn cycle(self) -> Cycle<Self>
    where
        Self: Clone,
    {
        Cycle::new(self)
    }

    // ---- interop ----

    /// Convert into a `futures::Stream` of `Result`s. `Skip`s are absorbed; the
    /// stream ends after the first error.
    fn into_futures(self) -> impl futures_core::Stream<Item = Result<Self::Item, Self::Error>> {
        interop::into_futures(self)
    }

    // ---- drains ----

    fn to_vec(self) -> impl Future<Output = Result<Vec<Self::Item>, Self::Error>> {
        drain::to_vec(self, CollectConfig::default())
    }

    fn to_vec_with(
        self,
        config: CollectConfig,
    ) -> impl Future<Output = Result<Vec<Self::Item>, Self::Error>> {
        drain::to_vec(self, config)
    }

    fn collect<C>(self) -> impl Future<Output = Result<C, Self::Error>>
    where
        C: Default + Extend<Self::Item>,
    {
        drain::collect(self)
    }

    fn head(self) -> impl Future<Output = Result<Option<Self::Item>, Self::Error>> {
        drain::head(self)
    }

    fn last(self) -> impl Future<Output = Result<Option<Self::Item>, Self::Error>> {
        drain::last(self)
    }

    fn length(self) -> impl Future<Output = Result<usize, Self::Error>> {
        drain::length(self)
    }

    /// `true` if the stream has no elements. Stops at the first element.
    fn null(self) -> impl Future<Output = Result<bool, Self::Error>> {
        drain::null(self)
    }

    /// Element at zero-based `index`, if the stream is that long.
    fn nth(self, index: usize) -> impl Future<Output = Result<Option<Self::Item>, Self::Error>> {
        drain::nth(self, index)
    }

    fn find<P>(self, predicate: P) -> impl Future<Output = Result<Option<Self::Item>, Self::Error>>
    where
        P: FnMut(&Self::Item) -> bool,
    {
        drain::find(self, predicate)
    }

    fn position<P>(self, predicate: P) -> impl Future<Output = Result<Option<usize>, Self::Error>>
    where
        P: FnMut(&Self::Item) -> bool,
    {
        drain::position(self, predicate)
    }

    fn contains(self, item: &Self::Item) -> impl Future<Output = Result<bool, Self::Error>>
    where
        Self::Item: PartialEq,
    {
        drain::any(self, move |x| x == item)
    }

    fn any<P>(self, predicate: P) -> impl Future<Output = Result<bool, Self::Error>>
    where
        P: FnMut(&Self::Item) -> bool,
    {
        drain::any(self, predicate)
    }

    fn all<P>(self, predicate: P) -> impl Future<Output = Result<bool, Self::Error>>
    where
        P: FnMut(&Self::Item) -> bool,
    {
        drain::all(self, predicate)
    }

    fn and(self) -> impl Future<Output = Result<bool, Self::Error>>
    where
        Self: Stream<Item = bool>,
    {
        drain::all(self, |b| *b)
    }

    fn or(self) -> impl Future<Output = Result<bool, Self::Error>>
    where
        Self: Stream<Item = bool>,
    {
        drain::any(self, |b| *b)
    }

    /// Sum starting from the additive identity (`0` for an empty stream).
    fn sum(self) -> impl Future<Output = Result<Self::Item, Self::Error>>
    where
        Self::Item: std::iter::Sum + Add<Output = Self::Item>,
    {
        let zero = std::iter::empty::<Self::Item>().sum::<Self::Item>();
        drain::fold_left(self, zero, |acc, x| acc + x)
    }

    /// Product starting from the multiplicative identity (`1` for an empty
    /// stream).
    fn product(self) -> impl Future<Output = Result<Self::Item, Self::Error>>
    where
        Self::Item: std::iter::Product + Mul<Output = Self::Item>,
    {
        let one = std::iter::empty::<Self::Item>().product::<Self::Item>();
        drain::fold_left(self, one, |acc, x| acc * x)
    }

    fn max(self) -> impl Future<Output = Result<Option<Self::Item>, Self::Error>>
    where
        Self::Item: Ord,
    {
        drain::reduce(self, |a, b| if b >= a { b } else { a })
    }

    fn min(self) -> impl Future<Output = Result<Option<Self::Item>, Self::Error>>
    where
        Self::Item: Ord,
    {
        drain::reduce(self, |a, b| if b < a { b } else { a })
    }

    fn fold_left<B, F>(self, init: B, f: F) -> impl Future<Output = Result<B, Self::Error>>
    where
        F: FnMut(B, Self::Item) -> B,
    {
        drain::fold_left(self, init, f)
    }

    /// Left fold whose accumulator is evaluated at every step. Rust values are
    /// never deferred, so this is [`fold_left`](StreamExt::fold_left) under the
    /// name long-stream callers look for.
    fn fold_left_strict<B, F>(self, init: B, f: F) -> impl Future<Output = Result<B, Self::Error>>
    where
        F: FnMut(B, Self::Item) -> B,
    {
        drain::fold_left(self, init, f)
    }

    /// Right-associative fold: `f(x1, f(x2, ... f(xn, init)))`.
    ///
    /// The source is pulled once, front to back, and its elements are buffered;
    /// `f` is then applied from the last element towards the first.
    fn fold_right<B, F>(self, init: B, f: F) -> impl Future<Output = Result<B, Self::Error>>
    where
        F: FnMut(Self::Item, B) -> B,
    {
        drain::fold_right(self, init, f)
    }

    /// Left fold whose step runs in the effect context; each accumulator
    /// effect completes before the next pull.
    fn fold_effect<B, F, Fut>(self, init: B, f: F) -> impl Future<Output = Result<B, Self::Error>>
    where
        F: FnMut(B, Self::Item) -> Fut,
        Fut: Future<Output = Result<B, Self::Error>>,
    {
        drain::fold_effect(self, init, f)
    }

    /// Map every element into a monoid and combine left to right, starting
    /// from [`Monoid::empty`].
    fn fold_monoid<M, F>(self, f: F) -> impl Future<Output = Result<M, Self::Error>>
    where
        M: Monoid,
        F: FnMut(Self::Item) -> M,
    {
        drain::fold_monoid(self, f)
    }

    /// Fold with the first element as the seed. `None` for an empty stream.
    fn reduce<F>(self, f: F) -> impl Future<Output = Result<Option<Self::Item>, Self::Error>>
    where
        F: FnMut(Self::Item, Self::Item) -> Self::Item,
    {
        drain::reduce(self, f)
    }

    fn for_each<F>(self, f: F) -> impl Future<Output = Result<(), Self::Error>>
    where
        F: FnMut(Self::Item),
    {
        drain::for_each(self, f)
    }

    fn for_each_effect<F, Fut>(self, f: F) -> impl Future<Output = Result<(), Self::Error>>
    where
        F: FnMut(Self::Item) -> Fut,
        Fut: Future<Output = Result<(), Self::Error>>,
    {
        drain::head_unit(self.run_effects(f))
    }

    /// Flatten a stream of sequences into one vector.
    fn concat<T>(self) -> impl Future<Output = Result<Vec<T>, Self::Error>>
    where
        Self::Item: IntoIterator<Item = T>,
    {
        drain::concat(self)
    }

    /// Split a stream of pairs into two index-aligned vectors.
    fn unzip<A, B>(self) -> impl Future<Output = Result<(Vec<A>, Vec<B>), Self::Error>>
    where
        Self: Stream<Item = (A, B)>,
    {
        drain::unzip(self)
    }
}

impl<S: Stream> StreamExt for S {}

/// Turn an in-memory sequence into a stream. Shorthand for
/// [`from_iter`](super::constructors::from_iter) at the conversion boundary.
pub fn from_sequence<I>(items: I) -> Iter<I::IntoIter>
where
    I: IntoIterator,
{
    super::constructors::from_iter(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_map_and_split() {
        let step: Step<i32, &str> = Step::Yield(2, "next");
        assert_eq!(step.map(|x| x * 10), Step::Yield(20, "next"));
        assert_eq!(step.map_state(str::len), Step::Yield(2, 4));
        assert_eq!(step.split(), (Step::Yield(2, ()), Some("next")));
        assert_eq!(Step::<i32, &str>::Skip("s").split(), (Step::Skip(()), Some("s")));
        assert_eq!(Step::<i32, &str>::Done.split(), (Step::Done, None));
        assert!(Step::<i32, ()>::Done.is_done());
        assert_eq!(Step::<i32, ()>::Skip(()).into_item(), None);
    }

    #[test]
    fn counts_clamp_negative_to_zero() {
        assert_eq!((-3i32).to_count(), 0);
        assert_eq!(0i64.to_count(), 0);
        assert_eq!(7u8.to_count(), 7);
        assert_eq!(5isize.to_count(), 5);
        assert_eq!(u128::MAX.to_count(), usize::MAX);
    }
}
