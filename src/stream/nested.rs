//! Combinators that own a second stream next to their source: concat_map
//! (outer + current inner stream) and cycle (pristine copy + current pass).
use futures_core::ready;
use log::debug;
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};

use super::core::{Step, Stream};

// ================================
// ConcatMap
// ================================

pin_project! {
    #[derive(Debug, Clone)]
    #[must_use = "streams do nothing unless drained"]
    pub struct ConcatMap<S, U, F> {
        #[pin]
        outer: S,
        f: F,
        #[pin]
        inner: Option<U>,
    }
}

impl<S, U, F> ConcatMap<S, U, F> {
    pub(crate) fn new(outer: S, f: F) -> Self {
        ConcatMap {
            outer,
            f,
            inner: None,
        }
    }
}

impl<S, U, F> Stream for ConcatMap<S, U, F>
where
    S: Stream,
    F: FnMut(S::Item) -> U,
    U: Stream<Error = S::Error>,
{
    type Item = U::Item;
    type Error = S::Error;

    fn poll_step(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        let mut this = self.project();

        if let Some(inner) = this.inner.as_mut().as_pin_mut() {
            return Poll::Ready(Ok(match ready!(inner.poll_step(cx))? {
                Step::Done => {
                    this.inner.set(None);
                    Step::Skip(())
                }
                step => step,
            }));
        }

        Poll::Ready(Ok(match ready!(this.outer.poll_step(cx))? {
            Step::Yield(item, ()) => {
                this.inner.set(Some((this.f)(item)));
                Step::Skip(())
            }
            Step::Skip(()) => Step::Skip(()),
            Step::Done => Step::Done,
        }))
    }
}

// ================================
// Cycle
// ================================

pin_project! {
    /// Replays the wrapped stream from a pristine copy each time it finishes.
    #[derive(Debug, Clone)]
    #[must_use = "streams do nothing unless drained"]
    pub struct Cycle<S> {
        original: S,
        #[pin]
        current: S,
        emitted_this_pass: bool,
        pass: u64,
    }
}

impl<S: Clone> Cycle<S> {
    pub(crate) fn new(stream: S) -> Self {
        Cycle {
            current: stream.clone(),
            original: stream,
            emitted_this_pass: false,
            pass: 0,
        }
    }
}

impl<S> Stream for Cycle<S>
where
    S: Stream + Clone,
{
    type Item = S::Item;
    type Error = S::Error;

    fn poll_step(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        let mut this = self.project();
        Poll::Ready(Ok(match ready!(this.current.as_mut().poll_step(cx))? {
            Step::Yield(item, ()) => {
                *this.emitted_this_pass = true;
                Step::Yield(item, ())
            }
            Step::Skip(()) => Step::Skip(()),
            Step::Done if *this.emitted_this_pass => {
                *this.pass += 1;
                debug!("cycle: restarting source, pass {}", *this.pass);
                this.current.set(this.original.clone());
                *this.emitted_this_pass = false;
                Step::Skip(())
            }
            // A pass without a single element would repeat forever.
            Step::Done => Step::Done,
        }))
    }
}
