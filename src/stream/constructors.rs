//! Stream constructors: from_iter, empty, once, repeat, replicate, iterate,
//! generate, range, unfold, unfold_effect and the collaborator adapter from_fn.
use log::debug;
use pin_project_lite::pin_project;
use std::convert::Infallible;
use std::future::Future;
use std::marker::PhantomData;
use std::ops::Range;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::ready;

use super::core::{Count, Step, Stream};

// ================================
// Sequence-backed constructors
// ================================

pin_project! {
    /// Stream over the remaining suffix of an in-memory sequence.
    #[derive(Debug, Clone)]
    #[must_use = "streams do nothing unless drained"]
    pub struct Iter<I> {
        pub(crate) iter: I,
    }
}

impl<I> Stream for Iter<I>
where
    I: Iterator,
{
    type Item = I::Item;
    type Error = Infallible;

    #[inline]
    fn poll_step(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        let this = self.project();
        Poll::Ready(Ok(match this.iter.next() {
            Some(item) => Step::Yield(item, ()),
            None => Step::Done,
        }))
    }
}

pub fn from_iter<I>(items: I) -> Iter<I::IntoIter>
where
    I: IntoIterator,
{
    Iter {
        iter: items.into_iter(),
    }
}

pub fn from_vec<A>(items: Vec<A>) -> Iter<std::vec::IntoIter<A>> {
    from_iter(items)
}

/// Half-open `[lo, hi)` enumeration.
pub fn range<A>(lo: A, hi: A) -> Iter<Range<A>>
where
    Range<A>: Iterator<Item = A>,
{
    Iter { iter: lo..hi }
}

// ================================
// Basic generators
// ================================

#[derive(Debug, Clone)]
#[must_use = "streams do nothing unless drained"]
pub struct Empty<A> {
    _phantom: PhantomData<fn() -> A>,
}

impl<A> Stream for Empty<A> {
    type Item = A;
    type Error = Infallible;

    fn poll_step(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        Poll::Ready(Ok(Step::Done))
    }
}

pub fn empty<A>() -> Empty<A> {
    Empty {
        _phantom: PhantomData,
    }
}

pin_project! {
    #[derive(Debug, Clone)]
    #[must_use = "streams do nothing unless drained"]
    pub struct Once<A> {
        pub(crate) value: Option<A>,
    }
}

impl<A> Stream for Once<A> {
    type Item = A;
    type Error = Infallible;

    fn poll_step(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        let this = self.project();
        Poll::Ready(Ok(match this.value.take() {
            Some(value) => Step::Yield(value, ()),
            None => Step::Done,
        }))
    }
}

/// A stream of exactly one element.
pub fn once<A>(value: A) -> Once<A> {
    Once { value: Some(value) }
}

pin_project! {
    #[derive(Debug, Clone)]
    #[must_use = "streams do nothing unless drained"]
    pub struct Repeat<A> {
        pub(crate) value: A,
    }
}

impl<A: Clone> Stream for Repeat<A> {
    type Item = A;
    type Error = Infallible;

    #[inline]
    fn poll_step(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        let this = self.project();
        Poll::Ready(Ok(Step::Yield(this.value.clone(), ())))
    }
}

/// `value` forever.
pub fn repeat<A: Clone>(value: A) -> Repeat<A> {
    Repeat { value }
}

pin_project! {
    #[derive(Debug, Clone)]
    #[must_use = "streams do nothing unless drained"]
    pub struct Replicate<A> {
        pub(crate) value: A,
        pub(crate) remaining: usize,
    }
}

impl<A: Clone> Stream for Replicate<A> {
    type Item = A;
    type Error = Infallible;

    fn poll_step(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        let this = self.project();
        if *this.remaining == 0 {
            return Poll::Ready(Ok(Step::Done));
        }
        *this.remaining -= 1;
        Poll::Ready(Ok(Step::Yield(this.value.clone(), ())))
    }
}

/// `value`, `n` times. A non-positive `n` gives an empty stream.
pub fn replicate<N: Count, A: Clone>(n: N, value: A) -> Replicate<A> {
    Replicate {
        value,
        remaining: n.to_count(),
    }
}

pin_project! {
    #[derive(Debug, Clone)]
    #[must_use = "streams do nothing unless drained"]
    pub struct Iterate<A, F> {
        pub(crate) seed: A,
        pub(crate) started: bool,
        pub(crate) f: F,
    }
}

impl<A, F> Stream for Iterate<A, F>
where
    A: Clone,
    F: FnMut(&A) -> A,
{
    type Item = A;
    type Error = Infallible;

    fn poll_step(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        let this = self.project();
        // `f` runs only once the element after the seed is actually pulled.
        if *this.started {
            *this.seed = (this.f)(&*this.seed);
        } else {
            *this.started = true;
        }
        Poll::Ready(Ok(Step::Yield(this.seed.clone(), ())))
    }
}

/// `x0, f(x0), f(f(x0)), …` forever.
///
/// `f` is applied lazily: taking `n` elements calls it `n - 1` times.
pub fn iterate<A, F>(x0: A, f: F) -> Iterate<A, F>
where
    A: Clone,
    F: FnMut(&A) -> A,
{
    Iterate {
        seed: x0,
        started: false,
        f,
    }
}

pin_project! {
    #[derive(Debug, Clone)]
    #[must_use = "streams do nothing unless drained"]
    pub struct Generate<F> {
        pub(crate) index: usize,
        pub(crate) len: usize,
        pub(crate) f: F,
    }
}

impl<A, F> Stream for Generate<F>
where
    F: FnMut(usize) -> A,
{
    type Item = A;
    type Error = Infallible;

    fn poll_step(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        let this = self.project();
        if *this.index >= *this.len {
            return Poll::Ready(Ok(Step::Done));
        }
        let item = (this.f)(*this.index);
        *this.index += 1;
        Poll::Ready(Ok(Step::Yield(item, ())))
    }
}

/// `f(0), f(1), …, f(n - 1)`.
pub fn generate<N: Count, A, F>(n: N, f: F) -> Generate<F>
where
    F: FnMut(usize) -> A,
{
    Generate {
        index: 0,
        len: n.to_count(),
        f,
    }
}

// ================================
// Unfolds
// ================================

pin_project! {
    #[derive(Debug, Clone)]
    #[must_use = "streams do nothing unless drained"]
    pub struct Unfold<S, F> {
        pub(crate) seed: Option<S>,
        pub(crate) f: F,
    }
}

impl<S, A, F> Stream for Unfold<S, F>
where
    F: FnMut(S) -> Option<(A, S)>,
{
    type Item = A;
    type Error = Infallible;

    fn poll_step(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        let this = self.project();
        let Some(seed) = this.seed.take() else {
            return Poll::Ready(Ok(Step::Done));
        };
        Poll::Ready(Ok(match (this.f)(seed) {
            Some((item, next)) => {
                *this.seed = Some(next);
                Step::Yield(item, ())
            }
            None => Step::Done,
        }))
    }
}

/// Build a stream from a seed: `f` returns the next element and seed, or
/// `None` to finish.
///
/// # Examples
/// ```
/// use rs2_step::stream::*;
///
/// # futures::executor::block_on(async {
/// let fib = unfold((0u64, 1u64), |(a, b)| Some((a, (b, a + b))));
/// let first = fib.take(10).to_vec().await.unwrap();
/// assert_eq!(first, vec![0, 1, 1, 2, 3, 5, 8, 13, 21, 34]);
/// # });
/// ```
pub fn unfold<S, A, F>(seed: S, f: F) -> Unfold<S, F>
where
    F: FnMut(S) -> Option<(A, S)>,
{
    Unfold {
        seed: Some(seed),
        f,
    }
}

/// Results a collaborator's step function may produce.
pub trait IntoStep {
    type Item;
    type State;

    fn into_step(self) -> Step<Self::Item, Self::State>;
}

impl<A, S> IntoStep for Step<A, S> {
    type Item = A;
    type State = S;

    #[inline]
    fn into_step(self) -> Step<A, S> {
        self
    }
}

impl<A, S> IntoStep for Option<(A, S)> {
    type Item = A;
    type State = S;

    #[inline]
    fn into_step(self) -> Step<A, S> {
        match self {
            Some((item, next)) => Step::Yield(item, next),
            None => Step::Done,
        }
    }
}

pin_project! {
    /// Stream driven by an external state type and step function.
    ///
    /// The initial state is awaited on the first pull only. After `Done` or an
    /// error the step function is never called again.
    #[derive(Clone)]
    #[must_use = "streams do nothing unless drained"]
    pub struct FromFn<Init, S, F, Fut> {
        #[pin]
        init: Option<Init>,
        state: Option<S>,
        step: F,
        #[pin]
        pending: Option<Fut>,
    }
}

impl<Init, S, F, Fut, T, E> Stream for FromFn<Init, S, F, Fut>
where
    Init: Future<Output = Result<S, E>>,
    F: FnMut(S) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    T: IntoStep<State = S>,
{
    type Item = T::Item;
    type Error = E;

    fn poll_step(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        let mut this = self.project();
        loop {
            if let Some(fut) = this.pending.as_mut().as_pin_mut() {
                let out = ready!(fut.poll(cx));
                this.pending.set(None);
                let (step, next) = out?.into_step().split();
                *this.state = next;
                return Poll::Ready(Ok(step));
            }

            if let Some(init) = this.init.as_mut().as_pin_mut() {
                let state = ready!(init.poll(cx));
                this.init.set(None);
                debug!("step stream: initial state acquired");
                *this.state = Some(state?);
            }

            match this.state.take() {
                Some(state) => this.pending.set(Some((this.step)(state))),
                None => return Poll::Ready(Ok(Step::Done)),
            }
        }
    }
}

/// Wrap an external producer: an effectful initial state and a step
/// function from state to the next [`Step`].
pub fn from_fn<Init, S, F, Fut, T, E>(init: Init, step: F) -> FromFn<Init, S, F, Fut>
where
    Init: Future<Output = Result<S, E>>,
    F: FnMut(S) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    T: IntoStep<State = S>,
{
    FromFn {
        init: Some(init),
        state: None,
        step,
        pending: None,
    }
}

/// Effectful [`unfold`]: the seed itself comes from an effect, and `f` runs in
/// the effect context.
pub fn unfold_effect<Init, S, A, F, Fut, E>(seed: Init, f: F) -> FromFn<Init, S, F, Fut>
where
    Init: Future<Output = Result<S, E>>,
    F: FnMut(S) -> Fut,
    Fut: Future<Output = Result<Option<(A, S)>, E>>,
{
    from_fn(seed, f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::StreamExt;
    use futures::executor::block_on;
    use std::future::ready;

    #[test]
    fn iter_walks_suffix_then_finishes() {
        let mut s = from_iter(vec![1, 2]);
        block_on(async {
            assert_eq!(s.step().await, Ok(Step::Yield(1, ())));
            assert_eq!(s.step().await, Ok(Step::Yield(2, ())));
            assert_eq!(s.step().await, Ok(Step::Done));
        });
    }

    #[test]
    fn from_fn_passes_skips_through() {
        let s = from_fn(ready(Ok::<_, Infallible>(0u32)), |n| {
            ready(Ok(match n {
                n if n >= 6 => Step::Done,
                n if n % 2 == 1 => Step::Skip(n + 1),
                n => Step::Yield(n, n + 1),
            }))
        });
        let mut s = Box::pin(s);
        block_on(async {
            assert_eq!(s.step().await, Ok(Step::Yield(0, ())));
            assert_eq!(s.step().await, Ok(Step::Skip(())));
            assert_eq!(s.step().await, Ok(Step::Yield(2, ())));
            assert_eq!(s.to_vec().await, Ok(vec![4]));
        });
    }

    #[test]
    fn replicate_and_generate_bounds() {
        block_on(async {
            assert_eq!(replicate(-2, 'x').to_vec().await, Ok(vec![]));
            assert_eq!(replicate(3, 'x').to_vec().await, Ok(vec!['x', 'x', 'x']));
            assert_eq!(generate(4, |i| i * i).to_vec().await, Ok(vec![0, 1, 4, 9]));
            assert_eq!(range(3, 6).to_vec().await, Ok(vec![3, 4, 5]));
        });
    }

    #[test]
    fn iterate_applies_f_only_for_pulled_elements() {
        let mut calls = 0;
        let taken = block_on(
            iterate(0u32, |x| {
                calls += 1;
                x + 1
            })
            .take(3)
            .to_vec(),
        );
        assert_eq!(taken, Ok(vec![0, 1, 2]));
        assert_eq!(calls, 2);
    }

    #[test]
    fn iterate_stops_before_overflowing() {
        let all = block_on(iterate(1u8, |x| x + 1).take(255).to_vec());
        let expected: Vec<u8> = (1..=255).collect();
        assert_eq!(all, Ok(expected));
    }
}
