//! Elementwise combinators: map, filter, filter_map, map_effect, inspect,
//! enumerate, scan_left, traced, error adapters and run_effects.
//!
//! None of these hold more than the element currently being transformed.
use futures_core::ready;
use log::log;
use pin_project_lite::pin_project;
use std::convert::Infallible;
use std::fmt::Debug;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll};

use super::core::{Step, Stream};
use crate::stream_configuration::TraceConfig;

// ================================
// Map
// ================================

pin_project! {
    #[derive(Debug, Clone)]
    #[must_use = "streams do nothing unless drained"]
    pub struct Map<S, F> {
        #[pin]
        stream: S,
        f: F,
    }
}

impl<S, F> Map<S, F> {
    pub(crate) fn new(stream: S, f: F) -> Self {
        Map { stream, f }
    }
}

impl<S, B, F> Stream for Map<S, F>
where
    S: Stream,
    F: FnMut(S::Item) -> B,
{
    type Item = B;
    type Error = S::Error;

    #[inline]
    fn poll_step(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        let this = self.project();
        this.stream.poll_step(cx).map_ok(|step| step.map(this.f))
    }
}

// ================================
// Filter
// ================================

pin_project! {
    #[derive(Debug, Clone)]
    #[must_use = "streams do nothing unless drained"]
    pub struct Filter<S, P> {
        #[pin]
        stream: S,
        predicate: P,
    }
}

impl<S, P> Filter<S, P> {
    pub(crate) fn new(stream: S, predicate: P) -> Self {
        Filter { stream, predicate }
    }
}

impl<S, P> Stream for Filter<S, P>
where
    S: Stream,
    P: FnMut(&S::Item) -> bool,
{
    type Item = S::Item;
    type Error = S::Error;

    #[inline]
    fn poll_step(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        let this = self.project();
        Poll::Ready(Ok(match ready!(this.stream.poll_step(cx))? {
            Step::Yield(item, ()) => {
                if (this.predicate)(&item) {
                    Step::Yield(item, ())
                } else {
                    Step::Skip(())
                }
            }
            other => other,
        }))
    }
}

pin_project! {
    #[derive(Debug, Clone)]
    #[must_use = "streams do nothing unless drained"]
    pub struct FilterMap<S, F> {
        #[pin]
        stream: S,
        f: F,
    }
}

impl<S, F> FilterMap<S, F> {
    pub(crate) fn new(stream: S, f: F) -> Self {
        FilterMap { stream, f }
    }
}

impl<S, B, F> Stream for FilterMap<S, F>
where
    S: Stream,
    F: FnMut(S::Item) -> Option<B>,
{
    type Item = B;
    type Error = S::Error;

    fn poll_step(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        let this = self.project();
        Poll::Ready(Ok(match ready!(this.stream.poll_step(cx))? {
            Step::Yield(item, ()) => match (this.f)(item) {
                Some(mapped) => Step::Yield(mapped, ()),
                None => Step::Skip(()),
            },
            Step::Skip(()) => Step::Skip(()),
            Step::Done => Step::Done,
        }))
    }
}

// ================================
// MapEffect
// ================================

pin_project! {
    #[derive(Clone)]
    #[must_use = "streams do nothing unless drained"]
    pub struct MapEffect<S, F, Fut> {
        #[pin]
        stream: S,
        f: F,
        #[pin]
        pending: Option<Fut>,
    }
}

impl<S, F, Fut> MapEffect<S, F, Fut> {
    pub(crate) fn new(stream: S, f: F) -> Self {
        MapEffect {
            stream,
            f,
            pending: None,
        }
    }
}

impl<S, B, F, Fut> Stream for MapEffect<S, F, Fut>
where
    S: Stream,
    F: FnMut(S::Item) -> Fut,
    Fut: Future<Output = Result<B, S::Error>>,
{
    type Item = B;
    type Error = S::Error;

    fn poll_step(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        let mut this = self.project();
        loop {
            if let Some(fut) = this.pending.as_mut().as_pin_mut() {
                let out = ready!(fut.poll(cx));
                this.pending.set(None);
                return Poll::Ready(out.map(|mapped| Step::Yield(mapped, ())));
            }

            match ready!(this.stream.as_mut().poll_step(cx))? {
                Step::Yield(item, ()) => this.pending.set(Some((this.f)(item))),
                Step::Skip(()) => return Poll::Ready(Ok(Step::Skip(()))),
                Step::Done => return Poll::Ready(Ok(Step::Done)),
            }
        }
    }
}

// ================================
// Inspect / Enumerate / ScanLeft
// ================================

pin_project! {
    #[derive(Debug, Clone)]
    #[must_use = "streams do nothing unless drained"]
    pub struct Inspect<S, F> {
        #[pin]
        stream: S,
        f: F,
    }
}

impl<S, F> Inspect<S, F> {
    pub(crate) fn new(stream: S, f: F) -> Self {
        Inspect { stream, f }
    }
}

impl<S, F> Stream for Inspect<S, F>
where
    S: Stream,
    F: FnMut(&S::Item),
{
    type Item = S::Item;
    type Error = S::Error;

    fn poll_step(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        let this = self.project();
        let step = ready!(this.stream.poll_step(cx))?;
        if let Step::Yield(item, ()) = &step {
            (this.f)(item);
        }
        Poll::Ready(Ok(step))
    }
}

pin_project! {
    #[derive(Debug, Clone)]
    #[must_use = "streams do nothing unless drained"]
    pub struct Enumerate<S> {
        #[pin]
        stream: S,
        index: usize,
    }
}

impl<S> Enumerate<S> {
    pub(crate) fn new(stream: S) -> Self {
        Enumerate { stream, index: 0 }
    }
}

impl<S: Stream> Stream for Enumerate<S> {
    type Item = (usize, S::Item);
    type Error = S::Error;

    fn poll_step(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        let this = self.project();
        let step = ready!(this.stream.poll_step(cx))?;
        Poll::Ready(Ok(step.map(|item| {
            let index = *this.index;
            *this.index += 1;
            (index, item)
        })))
    }
}

pin_project! {
    #[derive(Debug, Clone)]
    #[must_use = "streams do nothing unless drained"]
    pub struct ScanLeft<S, B, F> {
        #[pin]
        stream: S,
        acc: B,
        f: F,
    }
}

impl<S, B, F> ScanLeft<S, B, F> {
    pub(crate) fn new(stream: S, init: B, f: F) -> Self {
        ScanLeft {
            stream,
            acc: init,
            f,
        }
    }
}

impl<S, B, F> Stream for ScanLeft<S, B, F>
where
    S: Stream,
    B: Clone,
    F: FnMut(B, S::Item) -> B,
{
    type Item = B;
    type Error = S::Error;

    fn poll_step(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        let this = self.project();
        let step = ready!(this.stream.poll_step(cx))?;
        Poll::Ready(Ok(step.map(|item| {
            let next = (this.f)(this.acc.clone(), item);
            *this.acc = next.clone();
            next
        })))
    }
}

// ================================
// Traced
// ================================

pin_project! {
    /// Logs each step outcome through the `log` facade.
    #[derive(Debug)]
    #[must_use = "streams do nothing unless drained"]
    pub struct Traced<S> {
        #[pin]
        stream: S,
        config: TraceConfig,
        yielded: u64,
    }
}

impl<S> Traced<S> {
    pub(crate) fn new(stream: S, config: TraceConfig) -> Self {
        Traced {
            stream,
            config,
            yielded: 0,
        }
    }
}

impl<S> Stream for Traced<S>
where
    S: Stream,
    S::Item: Debug,
{
    type Item = S::Item;
    type Error = S::Error;

    fn poll_step(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        let this = self.project();
        let out = ready!(this.stream.poll_step(cx));
        let level = this.config.level;
        let label = &this.config.label;
        match &out {
            Ok(Step::Yield(item, ())) => {
                *this.yielded += 1;
                log!(level, "[{}] yield #{}: {:?}", label, this.yielded, item);
            }
            Ok(Step::Skip(())) => {
                if this.config.log_skips {
                    log!(level, "[{}] skip", label);
                }
            }
            Ok(Step::Done) => log!(level, "[{}] done after {} elements", label, this.yielded),
            Err(_) => log!(level, "[{}] failed after {} elements", label, this.yielded),
        }
        Poll::Ready(out)
    }
}

// ================================
// Error adapters
// ================================

pin_project! {
    #[derive(Debug, Clone)]
    #[must_use = "streams do nothing unless drained"]
    pub struct Fallible<S, E> {
        #[pin]
        stream: S,
        _error: PhantomData<fn() -> E>,
    }
}

impl<S, E> Fallible<S, E> {
    pub(crate) fn new(stream: S) -> Self {
        Fallible {
            stream,
            _error: PhantomData,
        }
    }
}

impl<S, E> Stream for Fallible<S, E>
where
    S: Stream<Error = Infallible>,
{
    type Item = S::Item;
    type Error = E;

    #[inline]
    fn poll_step(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        self.project()
            .stream
            .poll_step(cx)
            .map_err(|never| match never {})
    }
}

pin_project! {
    #[derive(Debug, Clone)]
    #[must_use = "streams do nothing unless drained"]
    pub struct MapErr<S, F> {
        #[pin]
        stream: S,
        f: F,
    }
}

impl<S, F> MapErr<S, F> {
    pub(crate) fn new(stream: S, f: F) -> Self {
        MapErr { stream, f }
    }
}

impl<S, E, F> Stream for MapErr<S, F>
where
    S: Stream,
    F: FnMut(S::Error) -> E,
{
    type Item = S::Item;
    type Error = E;

    fn poll_step(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        let this = self.project();
        this.stream.poll_step(cx).map_err(this.f)
    }
}

// ================================
// RunEffects
// ================================

pin_project! {
    /// One-shot stream: runs an effect per source element, then emits a
    /// single `()`.
    #[derive(Clone)]
    #[must_use = "streams do nothing unless drained"]
    pub struct RunEffects<S, F, Fut> {
        #[pin]
        stream: S,
        f: F,
        #[pin]
        pending: Option<Fut>,
        finished: bool,
    }
}

impl<S, F, Fut> RunEffects<S, F, Fut> {
    pub(crate) fn new(stream: S, f: F) -> Self {
        RunEffects {
            stream,
            f,
            pending: None,
            finished: false,
        }
    }
}

impl<S, F, Fut> Stream for RunEffects<S, F, Fut>
where
    S: Stream,
    F: FnMut(S::Item) -> Fut,
    Fut: Future<Output = Result<(), S::Error>>,
{
    type Item = ();
    type Error = S::Error;

    fn poll_step(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        let mut this = self.project();
        if *this.finished {
            return Poll::Ready(Ok(Step::Done));
        }
        loop {
            if let Some(fut) = this.pending.as_mut().as_pin_mut() {
                let out = ready!(fut.poll(cx));
                this.pending.set(None);
                return Poll::Ready(out.map(|()| Step::Skip(())));
            }

            match ready!(this.stream.as_mut().poll_step(cx))? {
                Step::Yield(item, ()) => this.pending.set(Some((this.f)(item))),
                Step::Skip(()) => return Poll::Ready(Ok(Step::Skip(()))),
                Step::Done => {
                    *this.finished = true;
                    return Poll::Ready(Ok(Step::Yield((), ())));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{from_iter, StreamExt};
    use futures::executor::block_on;

    #[test]
    fn filter_turns_rejections_into_skips() {
        let mut s = from_iter(vec![1, 2, 3]).filter(|x| x % 2 == 1);
        block_on(async {
            assert_eq!(s.step().await, Ok(Step::Yield(1, ())));
            assert_eq!(s.step().await, Ok(Step::Skip(())));
            assert_eq!(s.step().await, Ok(Step::Yield(3, ())));
            assert_eq!(s.step().await, Ok(Step::Done));
        });
    }

    #[test]
    fn scan_left_emits_running_totals() {
        let totals = block_on(from_iter(vec![1, 2, 3, 4]).scan_left(0, |a, x| a + x).to_vec());
        assert_eq!(totals, Ok(vec![1, 3, 6, 10]));
    }

    #[test]
    fn run_effects_is_one_shot() {
        let mut seen = Vec::new();
        let units = block_on(
            from_iter(vec![1, 2, 3])
                .run_effects(|x| {
                    seen.push(x);
                    async { Ok(()) }
                })
                .to_vec(),
        );
        assert_eq!(units, Ok(vec![()]));
        assert_eq!(seen, vec![1, 2, 3]);
    }
}
