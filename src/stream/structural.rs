//! Structural combinators with auxiliary state: append, cons, snoc, tail,
//! init, intersperse, take, drop, take_while and drop_while.
use futures_core::ready;
use pin_project_lite::pin_project;
use std::mem;
use std::pin::Pin;
use std::task::{Context, Poll};

use super::core::{Step, Stream};

// ================================
// Append
// ================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AppendPhase {
    First,
    Second,
}

pin_project! {
    #[derive(Debug, Clone)]
    #[must_use = "streams do nothing unless drained"]
    pub struct Append<S1, S2> {
        #[pin]
        first: S1,
        #[pin]
        second: S2,
        phase: AppendPhase,
    }
}

impl<S1, S2> Append<S1, S2> {
    pub(crate) fn new(first: S1, second: S2) -> Self {
        Append {
            first,
            second,
            phase: AppendPhase::First,
        }
    }
}

impl<S1, S2> Stream for Append<S1, S2>
where
    S1: Stream,
    S2: Stream<Item = S1::Item, Error = S1::Error>,
{
    type Item = S1::Item;
    type Error = S1::Error;

    fn poll_step(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        let this = self.project();
        match this.phase {
            AppendPhase::First => Poll::Ready(Ok(match ready!(this.first.poll_step(cx))? {
                Step::Done => {
                    *this.phase = AppendPhase::Second;
                    Step::Skip(())
                }
                step => step,
            })),
            AppendPhase::Second => this.second.poll_step(cx),
        }
    }
}

// ================================
// Cons / Snoc
// ================================

pin_project! {
    #[derive(Debug, Clone)]
    #[must_use = "streams do nothing unless drained"]
    pub struct Cons<S: Stream> {
        // `Some` until the prepended element has been emitted.
        head: Option<S::Item>,
        #[pin]
        stream: S,
    }
}

impl<S: Stream> Cons<S> {
    pub(crate) fn new(head: S::Item, stream: S) -> Self {
        Cons {
            head: Some(head),
            stream,
        }
    }
}

impl<S: Stream> Stream for Cons<S> {
    type Item = S::Item;
    type Error = S::Error;

    fn poll_step(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        let this = self.project();
        match this.head.take() {
            Some(head) => Poll::Ready(Ok(Step::Yield(head, ()))),
            None => this.stream.poll_step(cx),
        }
    }
}

pin_project! {
    #[derive(Debug, Clone)]
    #[must_use = "streams do nothing unless drained"]
    pub struct Snoc<S: Stream> {
        #[pin]
        stream: S,
        last: Option<S::Item>,
        stream_done: bool,
    }
}

impl<S: Stream> Snoc<S> {
    pub(crate) fn new(stream: S, last: S::Item) -> Self {
        Snoc {
            stream,
            last: Some(last),
            stream_done: false,
        }
    }
}

impl<S: Stream> Stream for Snoc<S> {
    type Item = S::Item;
    type Error = S::Error;

    fn poll_step(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        let this = self.project();
        if *this.stream_done {
            return Poll::Ready(Ok(Step::Done));
        }
        Poll::Ready(Ok(match ready!(this.stream.poll_step(cx))? {
            Step::Done => {
                *this.stream_done = true;
                match this.last.take() {
                    Some(last) => Step::Yield(last, ()),
                    None => Step::Done,
                }
            }
            step => step,
        }))
    }
}

// ================================
// Tail / Init
// ================================

pin_project! {
    #[derive(Debug, Clone)]
    #[must_use = "streams do nothing unless drained"]
    pub struct Tail<S> {
        #[pin]
        stream: S,
        dropped_first: bool,
    }
}

impl<S> Tail<S> {
    pub(crate) fn new(stream: S) -> Self {
        Tail {
            stream,
            dropped_first: false,
        }
    }
}

impl<S: Stream> Stream for Tail<S> {
    type Item = S::Item;
    type Error = S::Error;

    fn poll_step(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        let this = self.project();
        Poll::Ready(Ok(match ready!(this.stream.poll_step(cx))? {
            Step::Yield(_, ()) if !*this.dropped_first => {
                *this.dropped_first = true;
                Step::Skip(())
            }
            step => step,
        }))
    }
}

pin_project! {
    /// Holds back one element so the last one can be dropped.
    #[derive(Debug, Clone)]
    #[must_use = "streams do nothing unless drained"]
    pub struct Init<S: Stream> {
        #[pin]
        stream: S,
        held: Option<S::Item>,
    }
}

impl<S: Stream> Init<S> {
    pub(crate) fn new(stream: S) -> Self {
        Init { stream, held: None }
    }
}

impl<S: Stream> Stream for Init<S> {
    type Item = S::Item;
    type Error = S::Error;

    fn poll_step(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        let this = self.project();
        Poll::Ready(Ok(match ready!(this.stream.poll_step(cx))? {
            Step::Yield(item, ()) => match this.held.replace(item) {
                Some(previous) => Step::Yield(previous, ()),
                None => Step::Skip(()),
            },
            Step::Skip(()) => Step::Skip(()),
            Step::Done => {
                this.held.take();
                Step::Done
            }
        }))
    }
}

// ================================
// Intersperse
// ================================

#[derive(Debug, Clone)]
enum IntersperseState<A> {
    // Nothing emitted yet; the next element goes out as is.
    Start,
    // The last emission was an element; the next element needs a separator first.
    Between,
    // A separator was just emitted for this element.
    Pending(A),
}

pin_project! {
    #[derive(Debug, Clone)]
    #[must_use = "streams do nothing unless drained"]
    pub struct Intersperse<S: Stream> {
        #[pin]
        stream: S,
        sep: S::Item,
        state: IntersperseState<S::Item>,
    }
}

impl<S: Stream> Intersperse<S> {
    pub(crate) fn new(stream: S, sep: S::Item) -> Self {
        Intersperse {
            stream,
            sep,
            state: IntersperseState::Start,
        }
    }
}

impl<S> Stream for Intersperse<S>
where
    S: Stream,
    S::Item: Clone,
{
    type Item = S::Item;
    type Error = S::Error;

    fn poll_step(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        let this = self.project();
        match mem::replace(this.state, IntersperseState::Between) {
            IntersperseState::Pending(item) => return Poll::Ready(Ok(Step::Yield(item, ()))),
            previous => *this.state = previous,
        }

        Poll::Ready(Ok(match ready!(this.stream.poll_step(cx))? {
            Step::Yield(item, ()) => match this.state {
                IntersperseState::Start => {
                    *this.state = IntersperseState::Between;
                    Step::Yield(item, ())
                }
                _ => {
                    *this.state = IntersperseState::Pending(item);
                    Step::Yield(this.sep.clone(), ())
                }
            },
            step => step,
        }))
    }
}

// ================================
// Take / Drop
// ================================

pin_project! {
    #[derive(Debug, Clone)]
    #[must_use = "streams do nothing unless drained"]
    pub struct Take<S> {
        #[pin]
        stream: S,
        remaining: usize,
    }
}

impl<S> Take<S> {
    pub(crate) fn new(stream: S, n: usize) -> Self {
        Take {
            stream,
            remaining: n,
        }
    }
}

impl<S: Stream> Stream for Take<S> {
    type Item = S::Item;
    type Error = S::Error;

    fn poll_step(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        let this = self.project();
        if *this.remaining == 0 {
            return Poll::Ready(Ok(Step::Done));
        }
        let step = ready!(this.stream.poll_step(cx))?;
        if let Step::Yield(..) = step {
            *this.remaining -= 1;
        }
        Poll::Ready(Ok(step))
    }
}

pin_project! {
    #[derive(Debug, Clone)]
    #[must_use = "streams do nothing unless drained"]
    pub struct DropN<S> {
        #[pin]
        stream: S,
        remaining: usize,
    }
}

impl<S> DropN<S> {
    pub(crate) fn new(stream: S, n: usize) -> Self {
        DropN {
            stream,
            remaining: n,
        }
    }
}

impl<S: Stream> Stream for DropN<S> {
    type Item = S::Item;
    type Error = S::Error;

    fn poll_step(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        let this = self.project();
        let step = ready!(this.stream.poll_step(cx))?;
        Poll::Ready(Ok(match step {
            Step::Yield(_, ()) if *this.remaining > 0 => {
                *this.remaining -= 1;
                Step::Skip(())
            }
            step => step,
        }))
    }
}

// ================================
// TakeWhile / DropWhile
// ================================

pin_project! {
    #[derive(Debug, Clone)]
    #[must_use = "streams do nothing unless drained"]
    pub struct TakeWhile<S, P> {
        #[pin]
        stream: S,
        predicate: P,
        finished: bool,
    }
}

impl<S, P> TakeWhile<S, P> {
    pub(crate) fn new(stream: S, predicate: P) -> Self {
        TakeWhile {
            stream,
            predicate,
            finished: false,
        }
    }
}

impl<S, P> Stream for TakeWhile<S, P>
where
    S: Stream,
    P: FnMut(&S::Item) -> bool,
{
    type Item = S::Item;
    type Error = S::Error;

    fn poll_step(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        let this = self.project();
        if *this.finished {
            return Poll::Ready(Ok(Step::Done));
        }
        Poll::Ready(Ok(match ready!(this.stream.poll_step(cx))? {
            Step::Yield(item, ()) => {
                if (this.predicate)(&item) {
                    Step::Yield(item, ())
                } else {
                    *this.finished = true;
                    Step::Done
                }
            }
            step => step,
        }))
    }
}

pin_project! {
    #[derive(Debug, Clone)]
    #[must_use = "streams do nothing unless drained"]
    pub struct DropWhile<S, P> {
        #[pin]
        stream: S,
        predicate: P,
        dropping: bool,
    }
}

impl<S, P> DropWhile<S, P> {
    pub(crate) fn new(stream: S, predicate: P) -> Self {
        DropWhile {
            stream,
            predicate,
            dropping: true,
        }
    }
}

impl<S, P> Stream for DropWhile<S, P>
where
    S: Stream,
    P: FnMut(&S::Item) -> bool,
{
    type Item = S::Item;
    type Error = S::Error;

    fn poll_step(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        let this = self.project();
        let step = ready!(this.stream.poll_step(cx))?;
        if !*this.dropping {
            return Poll::Ready(Ok(step));
        }
        Poll::Ready(Ok(match step {
            Step::Yield(item, ()) => {
                if (this.predicate)(&item) {
                    Step::Skip(())
                } else {
                    *this.dropping = false;
                    Step::Yield(item, ())
                }
            }
            step => step,
        }))
    }
}
