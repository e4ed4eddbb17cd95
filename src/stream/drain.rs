//! Drains: run a stream (fully, or until a short-circuit) inside the effect
//! context and produce one result.
//!
//! Every drain is an explicit loop over single pulls, so stack depth stays
//! constant however long the stream is. The first error ends the drain.
use futures_util::pin_mut;
use log::trace;

use super::core::{Stream, StreamExt};
use crate::monoid::{Monoid, Semigroup};
use crate::stream_configuration::CollectConfig;

pub(crate) async fn to_vec<S: Stream>(
    stream: S,
    config: CollectConfig,
) -> Result<Vec<S::Item>, S::Error> {
    pin_mut!(stream);
    let mut items = Vec::with_capacity(config.initial_capacity);
    while let Some(item) = stream.next().await? {
        items.push(item);
    }
    trace!("to_vec: drained {} elements", items.len());
    Ok(items)
}

pub(crate) async fn collect<S, C>(stream: S) -> Result<C, S::Error>
where
    S: Stream,
    C: Default + Extend<S::Item>,
{
    pin_mut!(stream);
    let mut collection = C::default();
    while let Some(item) = stream.next().await? {
        collection.extend(Some(item));
    }
    Ok(collection)
}

pub(crate) async fn head<S: Stream>(stream: S) -> Result<Option<S::Item>, S::Error> {
    pin_mut!(stream);
    stream.next().await
}

pub(crate) async fn head_unit<S: Stream<Item = ()>>(stream: S) -> Result<(), S::Error> {
    head(stream).await.map(|_| ())
}

pub(crate) async fn last<S: Stream>(stream: S) -> Result<Option<S::Item>, S::Error> {
    pin_mut!(stream);
    let mut last = None;
    while let Some(item) = stream.next().await? {
        last = Some(item);
    }
    Ok(last)
}

pub(crate) async fn length<S: Stream>(stream: S) -> Result<usize, S::Error> {
    pin_mut!(stream);
    let mut count = 0usize;
    while stream.next().await?.is_some() {
        count += 1;
    }
    trace!("length: counted {} elements", count);
    Ok(count)
}

pub(crate) async fn null<S: Stream>(stream: S) -> Result<bool, S::Error> {
    pin_mut!(stream);
    Ok(stream.next().await?.is_none())
}

pub(crate) async fn nth<S: Stream>(stream: S, index: usize) -> Result<Option<S::Item>, S::Error> {
    pin_mut!(stream);
    let mut current = 0usize;
    while let Some(item) = stream.next().await? {
        if current == index {
            return Ok(Some(item));
        }
        current += 1;
    }
    Ok(None)
}

pub(crate) async fn find<S, P>(stream: S, mut predicate: P) -> Result<Option<S::Item>, S::Error>
where
    S: Stream,
    P: FnMut(&S::Item) -> bool,
{
    pin_mut!(stream);
    while let Some(item) = stream.next().await? {
        if predicate(&item) {
            return Ok(Some(item));
        }
    }
    Ok(None)
}

pub(crate) async fn position<S, P>(stream: S, mut predicate: P) -> Result<Option<usize>, S::Error>
where
    S: Stream,
    P: FnMut(&S::Item) -> bool,
{
    pin_mut!(stream);
    let mut index = 0usize;
    while let Some(item) = stream.next().await? {
        if predicate(&item) {
            return Ok(Some(index));
        }
        index += 1;
    }
    Ok(None)
}

pub(crate) async fn any<S, P>(stream: S, mut predicate: P) -> Result<bool, S::Error>
where
    S: Stream,
    P: FnMut(&S::Item) -> bool,
{
    pin_mut!(stream);
    while let Some(item) = stream.next().await? {
        if predicate(&item) {
            return Ok(true);
        }
    }
    Ok(false)
}

pub(crate) async fn all<S, P>(stream: S, mut predicate: P) -> Result<bool, S::Error>
where
    S: Stream,
    P: FnMut(&S::Item) -> bool,
{
    pin_mut!(stream);
    while let Some(item) = stream.next().await? {
        if !predicate(&item) {
            return Ok(false);
        }
    }
    Ok(true)
}

pub(crate) async fn fold_left<S, B, F>(stream: S, init: B, mut f: F) -> Result<B, S::Error>
where
    S: Stream,
    F: FnMut(B, S::Item) -> B,
{
    pin_mut!(stream);
    let mut acc = init;
    let mut steps = 0u64;
    while let Some(item) = stream.next().await? {
        acc = f(acc, item);
        steps += 1;
    }
    trace!("fold_left: folded {} elements", steps);
    Ok(acc)
}

pub(crate) async fn fold_right<S, B, F>(stream: S, init: B, mut f: F) -> Result<B, S::Error>
where
    S: Stream,
    F: FnMut(S::Item, B) -> B,
{
    let items = to_vec(stream, CollectConfig::default()).await?;
    Ok(items.into_iter().rev().fold(init, |acc, item| f(item, acc)))
}

pub(crate) async fn fold_effect<S, B, F, Fut>(stream: S, init: B, mut f: F) -> Result<B, S::Error>
where
    S: Stream,
    F: FnMut(B, S::Item) -> Fut,
    Fut: std::future::Future<Output = Result<B, S::Error>>,
{
    pin_mut!(stream);
    let mut acc = init;
    while let Some(item) = stream.next().await? {
        acc = f(acc, item).await?;
    }
    Ok(acc)
}

pub(crate) async fn fold_monoid<S, M, F>(stream: S, mut f: F) -> Result<M, S::Error>
where
    S: Stream,
    M: Monoid,
    F: FnMut(S::Item) -> M,
{
    fold_left(stream, M::empty(), |acc, item| acc.combine(f(item))).await
}

pub(crate) async fn reduce<S, F>(stream: S, mut f: F) -> Result<Option<S::Item>, S::Error>
where
    S: Stream,
    F: FnMut(S::Item, S::Item) -> S::Item,
{
    pin_mut!(stream);
    let Some(mut acc) = stream.next().await? else {
        return Ok(None);
    };
    while let Some(item) = stream.next().await? {
        acc = f(acc, item);
    }
    Ok(Some(acc))
}

pub(crate) async fn for_each<S, F>(stream: S, mut f: F) -> Result<(), S::Error>
where
    S: Stream,
    F: FnMut(S::Item),
{
    pin_mut!(stream);
    while let Some(item) = stream.next().await? {
        f(item);
    }
    Ok(())
}

pub(crate) async fn concat<S, T>(stream: S) -> Result<Vec<T>, S::Error>
where
    S: Stream,
    S::Item: IntoIterator<Item = T>,
{
    pin_mut!(stream);
    let mut flat = Vec::new();
    while let Some(chunk) = stream.next().await? {
        flat.extend(chunk);
    }
    Ok(flat)
}

pub(crate) async fn unzip<S, A, B>(stream: S) -> Result<(Vec<A>, Vec<B>), S::Error>
where
    S: Stream<Item = (A, B)>,
{
    pin_mut!(stream);
    let mut left = Vec::new();
    let mut right = Vec::new();
    while let Some((a, b)) = stream.next().await? {
        left.push(a);
        right.push(b);
    }
    Ok((left, right))
}
