//! Lockstep combinators: zip, zip_with, zip3, zip_with3.
//!
//! Sides are pulled strictly left to right. An element pulled from an earlier
//! side waits in a one-slot buffer until every later side has produced one;
//! the first side to finish finishes the whole zip.
use futures_core::ready;
use pin_project_lite::pin_project;
use std::mem;
use std::pin::Pin;
use std::task::{Context, Poll};

use super::core::{Step, Stream};

// ================================
// ZipWith
// ================================

pin_project! {
    #[derive(Debug, Clone)]
    #[must_use = "streams do nothing unless drained"]
    pub struct ZipWith<S1: Stream, S2, F> {
        #[pin]
        left: S1,
        #[pin]
        right: S2,
        f: F,
        pending_left: Option<S1::Item>,
    }
}

impl<S1: Stream, S2, F> ZipWith<S1, S2, F> {
    pub(crate) fn new(left: S1, right: S2, f: F) -> Self {
        ZipWith {
            left,
            right,
            f,
            pending_left: None,
        }
    }
}

impl<S1, S2, C, F> Stream for ZipWith<S1, S2, F>
where
    S1: Stream,
    S2: Stream<Error = S1::Error>,
    F: FnMut(S1::Item, S2::Item) -> C,
{
    type Item = C;
    type Error = S1::Error;

    fn poll_step(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        let mut this = self.project();
        let left_item = match this.pending_left.take() {
            Some(item) => item,
            None => match ready!(this.left.as_mut().poll_step(cx))? {
                Step::Yield(item, ()) => item,
                Step::Skip(()) => return Poll::Ready(Ok(Step::Skip(()))),
                Step::Done => return Poll::Ready(Ok(Step::Done)),
            },
        };

        match this.right.as_mut().poll_step(cx) {
            Poll::Ready(Ok(Step::Yield(right_item, ()))) => {
                Poll::Ready(Ok(Step::Yield((this.f)(left_item, right_item), ())))
            }
            Poll::Ready(Ok(Step::Skip(()))) => {
                *this.pending_left = Some(left_item);
                Poll::Ready(Ok(Step::Skip(())))
            }
            Poll::Ready(Ok(Step::Done)) => Poll::Ready(Ok(Step::Done)),
            Poll::Ready(Err(e)) => Poll::Ready(Err(e)),
            Poll::Pending => {
                *this.pending_left = Some(left_item);
                Poll::Pending
            }
        }
    }
}

type Pair<A, B> = fn(A, B) -> (A, B);

fn pair<A, B>(a: A, b: B) -> (A, B) {
    (a, b)
}

pin_project! {
    #[derive(Debug, Clone)]
    #[must_use = "streams do nothing unless drained"]
    pub struct Zip<S1: Stream, S2: Stream> {
        #[pin]
        inner: ZipWith<S1, S2, Pair<S1::Item, S2::Item>>,
    }
}

impl<S1: Stream, S2: Stream> Zip<S1, S2> {
    pub(crate) fn new(left: S1, right: S2) -> Self {
        Zip {
            inner: ZipWith::new(left, right, pair as Pair<S1::Item, S2::Item>),
        }
    }
}

impl<S1, S2> Stream for Zip<S1, S2>
where
    S1: Stream,
    S2: Stream<Error = S1::Error>,
{
    type Item = (S1::Item, S2::Item);
    type Error = S1::Error;

    #[inline]
    fn poll_step(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        self.project().inner.poll_step(cx)
    }
}

// ================================
// ZipWith3
// ================================

#[derive(Debug, Clone)]
enum Buffered<A, B> {
    Empty,
    First(A),
    Both(A, B),
}

pin_project! {
    #[derive(Debug, Clone)]
    #[must_use = "streams do nothing unless drained"]
    pub struct ZipWith3<S1: Stream, S2: Stream, S3, F> {
        #[pin]
        first: S1,
        #[pin]
        second: S2,
        #[pin]
        third: S3,
        f: F,
        buffered: Buffered<S1::Item, S2::Item>,
    }
}

impl<S1: Stream, S2: Stream, S3, F> ZipWith3<S1, S2, S3, F> {
    pub(crate) fn new(first: S1, second: S2, third: S3, f: F) -> Self {
        ZipWith3 {
            first,
            second,
            third,
            f,
            buffered: Buffered::Empty,
        }
    }
}

impl<S1, S2, S3, D, F> Stream for ZipWith3<S1, S2, S3, F>
where
    S1: Stream,
    S2: Stream<Error = S1::Error>,
    S3: Stream<Error = S1::Error>,
    F: FnMut(S1::Item, S2::Item, S3::Item) -> D,
{
    type Item = D;
    type Error = S1::Error;

    fn poll_step(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        let mut this = self.project();
        loop {
            match mem::replace(this.buffered, Buffered::Empty) {
                Buffered::Empty => match ready!(this.first.as_mut().poll_step(cx))? {
                    Step::Yield(a, ()) => *this.buffered = Buffered::First(a),
                    Step::Skip(()) => return Poll::Ready(Ok(Step::Skip(()))),
                    Step::Done => return Poll::Ready(Ok(Step::Done)),
                },
                Buffered::First(a) => match this.second.as_mut().poll_step(cx) {
                    Poll::Ready(Ok(Step::Yield(b, ()))) => *this.buffered = Buffered::Both(a, b),
                    Poll::Ready(Ok(Step::Skip(()))) => {
                        *this.buffered = Buffered::First(a);
                        return Poll::Ready(Ok(Step::Skip(())));
                    }
                    Poll::Ready(Ok(Step::Done)) => return Poll::Ready(Ok(Step::Done)),
                    Poll::Ready(Err(e)) => return Poll::Ready(Err(e)),
                    Poll::Pending => {
                        *this.buffered = Buffered::First(a);
                        return Poll::Pending;
                    }
                },
                Buffered::Both(a, b) => {
                    return match this.third.as_mut().poll_step(cx) {
                        Poll::Ready(Ok(Step::Yield(c, ()))) => {
                            Poll::Ready(Ok(Step::Yield((this.f)(a, b, c), ())))
                        }
                        Poll::Ready(Ok(Step::Skip(()))) => {
                            *this.buffered = Buffered::Both(a, b);
                            Poll::Ready(Ok(Step::Skip(())))
                        }
                        Poll::Ready(Ok(Step::Done)) => Poll::Ready(Ok(Step::Done)),
                        Poll::Ready(Err(e)) => Poll::Ready(Err(e)),
                        Poll::Pending => {
                            *this.buffered = Buffered::Both(a, b);
                            Poll::Pending
                        }
                    }
                }
            }
        }
    }
}

type Triple<A, B, C> = fn(A, B, C) -> (A, B, C);

fn triple<A, B, C>(a: A, b: B, c: C) -> (A, B, C) {
    (a, b, c)
}

pin_project! {
    #[derive(Debug, Clone)]
    #[must_use = "streams do nothing unless drained"]
    pub struct Zip3<S1: Stream, S2: Stream, S3: Stream> {
        #[pin]
        inner: ZipWith3<S1, S2, S3, Triple<S1::Item, S2::Item, S3::Item>>,
    }
}

impl<S1: Stream, S2: Stream, S3: Stream> Zip3<S1, S2, S3> {
    pub(crate) fn new(first: S1, second: S2, third: S3) -> Self {
        Zip3 {
            inner: ZipWith3::new(
                first,
                second,
                third,
                triple as Triple<S1::Item, S2::Item, S3::Item>,
            ),
        }
    }
}

impl<S1, S2, S3> Stream for Zip3<S1, S2, S3>
where
    S1: Stream,
    S2: Stream<Error = S1::Error>,
    S3: Stream<Error = S1::Error>,
{
    type Item = (S1::Item, S2::Item, S3::Item);
    type Error = S1::Error;

    #[inline]
    fn poll_step(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        self.project().inner.poll_step(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{from_iter, repeat, StreamExt};
    use futures::executor::block_on;

    #[test]
    fn zip_with_stops_at_the_shorter_side() {
        let sums = block_on(
            from_iter(vec![1, 2, 3])
                .zip_with(from_iter(vec![10, 20]), |a, b| a + b)
                .to_vec(),
        );
        assert_eq!(sums, Ok(vec![11, 22]));
    }

    #[test]
    fn zip_keeps_left_buffered_across_right_skips() {
        let right = from_iter(vec![1, 2, 3, 4]).filter(|x| x % 2 == 0);
        let pairs = block_on(from_iter(vec!['a', 'b', 'c']).zip(right).to_vec());
        assert_eq!(pairs, Ok(vec![('a', 2), ('b', 4)]));
    }

    #[test]
    fn zip3_with_an_infinite_side() {
        let out = block_on(
            from_iter(vec![1, 2])
                .zip3(repeat("x"), from_iter(vec![true, false, true]))
                .to_vec(),
        );
        assert_eq!(out, Ok(vec![(1, "x", true), (2, "x", false)]));
    }
}
