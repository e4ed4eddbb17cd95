//! Boundary with the `futures` ecosystem: wrap a `futures::Stream` /
//! `TryStream` as a step stream, or expose a step stream as a
//! `futures::Stream` of `Result`s.
use async_stream::stream;
use futures_core::{ready, TryStream};
use futures_util::pin_mut;
use pin_project_lite::pin_project;
use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};

use super::core::{Step, Stream, StreamExt};

pin_project! {
    #[derive(Debug, Clone)]
    #[must_use = "streams do nothing unless drained"]
    pub struct FromFutures<St> {
        #[pin]
        stream: St,
    }
}

impl<St> Stream for FromFutures<St>
where
    St: futures_core::Stream,
{
    type Item = St::Item;
    type Error = Infallible;

    fn poll_step(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        let this = self.project();
        Poll::Ready(Ok(match ready!(this.stream.poll_next(cx)) {
            Some(item) => Step::Yield(item, ()),
            None => Step::Done,
        }))
    }
}

/// Wrap any `futures::Stream` (a `BoxStream`, a channel
/// receiver, …) as an infallible step stream.
pub fn from_futures<St>(stream: St) -> FromFutures<St>
where
    St: futures_core::Stream,
{
    FromFutures { stream }
}

pin_project! {
    #[derive(Debug, Clone)]
    #[must_use = "streams do nothing unless drained"]
    pub struct FromTryFutures<St> {
        #[pin]
        stream: St,
    }
}

impl<St> Stream for FromTryFutures<St>
where
    St: TryStream,
{
    type Item = St::Ok;
    type Error = St::Error;

    fn poll_step(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        let this = self.project();
        Poll::Ready(match ready!(this.stream.try_poll_next(cx)) {
            Some(Ok(item)) => Ok(Step::Yield(item, ())),
            Some(Err(e)) => Err(e),
            None => Ok(Step::Done),
        })
    }
}

/// Wrap a `futures::Stream` of `Result`s; the first `Err` becomes the step
/// stream's failure.
pub fn from_try_futures<St>(stream: St) -> FromTryFutures<St>
where
    St: TryStream,
{
    FromTryFutures { stream }
}

pub(crate) fn into_futures<S: Stream>(
    source: S,
) -> impl futures_core::Stream<Item = Result<S::Item, S::Error>> {
    stream! {
        pin_mut!(source);
        loop {
            match source.next().await {
                Ok(Some(item)) => yield Ok(item),
                Ok(None) => break,
                Err(e) => {
                    yield Err(e);
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use futures_util::stream::{self as fstream, StreamExt as _};

    #[test]
    fn futures_round_trip() {
        let wrapped = from_futures(fstream::iter(vec![1, 2, 3])).map(|x| x * 2);
        let back: Vec<Result<i32, Infallible>> = block_on(wrapped.into_futures().collect());
        assert_eq!(back, vec![Ok(2), Ok(4), Ok(6)]);
    }

    #[test]
    fn try_stream_error_surfaces() {
        let source = fstream::iter(vec![Ok(1), Err("boom"), Ok(3)]);
        let drained = block_on(from_try_futures(source).to_vec());
        assert_eq!(drained, Err("boom"));
    }
}
