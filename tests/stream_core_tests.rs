use futures::executor::block_on;
use rs2_step::stream::{
    empty, from_iter, from_vec, iterate, once, range, repeat, replicate, Step, Stream, StreamExt,
};
use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};

// Hand-written stream that interleaves a Skip before every element
struct SkippyStream {
    values: Vec<i32>,
    index: usize,
    skipped: bool,
}

impl SkippyStream {
    fn new(values: Vec<i32>) -> Self {
        Self {
            values,
            index: 0,
            skipped: false,
        }
    }
}

impl Stream for SkippyStream {
    type Item = i32;
    type Error = Infallible;

    fn poll_step(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Result<Step<Self::Item>, Self::Error>> {
        if self.index >= self.values.len() {
            return Poll::Ready(Ok(Step::Done));
        }
        if !self.skipped {
            self.skipped = true;
            return Poll::Ready(Ok(Step::Skip(())));
        }
        let value = self.values[self.index];
        self.index += 1;
        self.skipped = false;
        Poll::Ready(Ok(Step::Yield(value, ())))
    }
}

#[tokio::test]
async fn test_round_trip() {
    let xs = vec![3, 1, 4, 1, 5, 9, 2, 6];
    assert_eq!(from_vec(xs.clone()).to_vec().await, Ok(xs));
    assert_eq!(empty::<i32>().to_vec().await, Ok(vec![]));
}

#[tokio::test]
async fn test_custom_stream_skips_are_invisible_to_drains() {
    let result = SkippyStream::new(vec![1, 2, 3]).to_vec().await;
    assert_eq!(result, Ok(vec![1, 2, 3]));
    assert_eq!(SkippyStream::new(vec![1, 2, 3]).length().await, Ok(3));
}

#[tokio::test]
async fn test_single_steps_expose_skips() {
    let mut stream = SkippyStream::new(vec![7]);
    assert_eq!(stream.step().await, Ok(Step::Skip(())));
    assert_eq!(stream.step().await, Ok(Step::Yield(7, ())));
    assert_eq!(stream.step().await, Ok(Step::Done));
}

#[tokio::test]
async fn test_map_matches_iterator_map() {
    let xs = vec![1, 2, 3, 4, 5];
    let expected: Vec<i32> = xs.iter().map(|x| x * 2).collect();
    assert_eq!(from_iter(xs).map(|x| x * 2).to_vec().await, Ok(expected));
}

#[tokio::test]
async fn test_filter_keeps_order() {
    let evens = from_iter(1..=10).filter(|x| x % 2 == 0).to_vec().await;
    assert_eq!(evens, Ok(vec![2, 4, 6, 8, 10]));
}

#[tokio::test]
async fn test_empty_stream_queries() {
    assert_eq!(empty::<i32>().head().await, Ok(None));
    assert_eq!(empty::<i32>().last().await, Ok(None));
    assert_eq!(empty::<i32>().find(|_| true).await, Ok(None));
    assert_eq!(empty::<i32>().null().await, Ok(true));
    assert_eq!(once(1).null().await, Ok(false));
}

#[tokio::test]
async fn test_tail_init_cycle_on_empty() {
    assert_eq!(empty::<i32>().tail().to_vec().await, Ok(vec![]));
    assert_eq!(empty::<i32>().init().to_vec().await, Ok(vec![]));
    assert_eq!(empty::<i32>().cycle().to_vec().await, Ok(vec![]));
}

#[tokio::test]
async fn test_tail_and_init() {
    assert_eq!(from_iter(vec![1, 2, 3]).tail().to_vec().await, Ok(vec![2, 3]));
    assert_eq!(from_iter(vec![1, 2, 3]).init().to_vec().await, Ok(vec![1, 2]));
}

#[tokio::test]
async fn test_take_length_is_min() {
    for n in [-3i32, 0, 2, 5, 9] {
        let expected = (n.max(0) as usize).min(5);
        let taken = from_iter(vec![1, 2, 3, 4, 5]).take(n).length().await;
        assert_eq!(taken, Ok(expected), "take({})", n);
    }
}

#[tokio::test]
async fn test_drop_with_negative_count_is_identity() {
    assert_eq!(from_iter(vec![1, 2, 3]).drop(-1).to_vec().await, Ok(vec![1, 2, 3]));
    assert_eq!(from_iter(vec![1, 2, 3]).drop(2u8).to_vec().await, Ok(vec![3]));
    assert_eq!(from_iter(vec![1, 2, 3]).drop(10).to_vec().await, Ok(vec![]));
}

#[tokio::test]
async fn test_zip_with_lengths() {
    let sums = from_iter(vec![1, 2, 3])
        .zip_with(from_iter(vec![10, 20]), |x, y| x + y)
        .to_vec()
        .await;
    assert_eq!(sums, Ok(vec![11, 22]));
}

#[tokio::test]
async fn test_concat_map_flattens() {
    let flat = from_iter(vec![1, 2])
        .concat_map(|n| replicate(n, n))
        .to_vec()
        .await;
    assert_eq!(flat, Ok(vec![1, 2, 2]));
}

#[tokio::test]
async fn test_numeric_folds() {
    assert_eq!(from_iter(vec![1, 2, 3, 4]).fold_left_strict(0, |acc, x| acc + x).await, Ok(10));
    assert_eq!(empty::<i64>().product().await, Ok(1));
    assert_eq!(empty::<i64>().sum().await, Ok(0));
    assert_eq!(range(1, 5).product().await, Ok(24));
}

#[tokio::test]
async fn test_any_short_circuits_at_first_match() {
    let mut pulled = Vec::new();
    let found = from_iter(vec![1, 3, 5, 6, 7])
        .inspect(|x| pulled.push(*x))
        .any(|x| x % 2 == 0)
        .await;
    assert_eq!(found, Ok(true));
    assert_eq!(pulled, vec![1, 3, 5, 6]);
    assert_eq!(empty::<i32>().all(|_| false).await, Ok(true));
}

#[tokio::test]
async fn test_boolean_folds() {
    assert_eq!(from_iter(vec![true, true]).and().await, Ok(true));
    assert_eq!(from_iter(vec![false, true]).or().await, Ok(true));
    assert_eq!(empty::<bool>().and().await, Ok(true));
    assert_eq!(empty::<bool>().or().await, Ok(false));
}

#[tokio::test]
async fn test_append_cons_snoc() {
    let joined = from_iter(vec![1, 2]).append(from_iter(vec![3, 4])).to_vec().await;
    assert_eq!(joined, Ok(vec![1, 2, 3, 4]));
    let wrapped = from_iter(vec![2]).cons(1).snoc(3).to_vec().await;
    assert_eq!(wrapped, Ok(vec![1, 2, 3]));
}

#[tokio::test]
async fn test_intersperse() {
    let out = from_iter(vec!["a", "b", "c"]).intersperse(",").to_vec().await;
    assert_eq!(out, Ok(vec!["a", ",", "b", ",", "c"]));
    assert_eq!(once("a").intersperse(",").to_vec().await, Ok(vec!["a"]));
}

#[tokio::test]
async fn test_early_abandonment_of_infinite_sources() {
    assert_eq!(repeat(1).find(|x| *x == 1).await, Ok(Some(1)));
    assert_eq!(iterate(1u64, |x| x * 3).find(|x| *x > 100).await, Ok(Some(243)));
    assert_eq!(repeat('x').take(3).to_vec().await, Ok(vec!['x', 'x', 'x']));
}

#[tokio::test]
async fn test_fold_right_order() {
    let digits = from_iter(vec![1, 2, 3])
        .fold_right(Vec::new(), |x, mut acc| {
            acc.push(x);
            acc
        })
        .await;
    // innermost application sees the last element first
    assert_eq!(digits, Ok(vec![3, 2, 1]));
}

#[tokio::test]
async fn test_concat_and_unzip() {
    let flat = from_iter(vec![vec![1, 2], vec![], vec![3]]).concat().await;
    assert_eq!(flat, Ok(vec![1, 2, 3]));
    let (left, right) = from_iter(vec![(1, 'a'), (2, 'b')]).unzip().await.unwrap();
    assert_eq!(left, vec![1, 2]);
    assert_eq!(right, vec!['a', 'b']);
}

#[tokio::test]
async fn test_boxed_streams_share_one_type() {
    let streams: Vec<rs2_step::BoxedStream<'static, i32>> = vec![
        from_iter(vec![1, 2]).boxed(),
        range(0, 10).filter(|x| x % 5 == 0).boxed(),
        empty().boxed(),
        once(3).map(|x| x * 10).boxed(),
    ];
    let mut lengths = Vec::new();
    for stream in streams {
        lengths.push(stream.length().await.unwrap());
    }
    assert_eq!(lengths, vec![2, 2, 0, 1]);
}

#[test]
fn test_pure_streams_drain_without_a_runtime() {
    let result = block_on(from_iter(vec![1, 2, 3]).map(|x| x + 1).to_vec());
    assert_eq!(result, Ok(vec![2, 3, 4]));
}
