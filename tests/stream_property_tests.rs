use futures::executor::block_on;
use quickcheck::{quickcheck, TestResult};
use rs2_step::monoid::{Product, Sum};
use rs2_step::stream::{from_vec, replicate, StreamExt};

fn drain<S>(stream: S) -> Vec<S::Item>
where
    S: StreamExt<Error = std::convert::Infallible>,
{
    match block_on(stream.to_vec()) {
        Ok(items) => items,
        Err(never) => match never {},
    }
}

quickcheck! {
    fn prop_round_trip(xs: Vec<i32>) -> bool {
        drain(from_vec(xs.clone())) == xs
    }

    fn prop_map_is_pointwise(xs: Vec<i32>) -> bool {
        let expected: Vec<i64> = xs.iter().map(|x| *x as i64 * 3).collect();
        drain(from_vec(xs).map(|x| x as i64 * 3)) == expected
    }

    fn prop_filter_preserves_order(xs: Vec<u16>) -> bool {
        let expected: Vec<u16> = xs.iter().copied().filter(|x| x % 3 == 0).collect();
        drain(from_vec(xs).filter(|x| x % 3 == 0)) == expected
    }

    fn prop_take_length_is_min(xs: Vec<u8>, n: i8) -> bool {
        let len = xs.len();
        let taken = block_on(from_vec(xs).take(n).length());
        taken == Ok((n.max(0) as usize).min(len))
    }

    fn prop_take_then_drop_recombine(xs: Vec<u8>, n: u8) -> bool {
        let mut rebuilt = drain(from_vec(xs.clone()).take(n));
        rebuilt.extend(drain(from_vec(xs.clone()).drop(n)));
        rebuilt == xs
    }

    fn prop_zip_with_length_is_min(xs: Vec<i32>, ys: Vec<i32>) -> bool {
        let expected = xs.len().min(ys.len());
        drain(from_vec(xs).zip_with(from_vec(ys), |a, b| a.wrapping_add(b))).len() == expected
    }

    fn prop_concat_map_flattens(xs: Vec<u8>) -> TestResult {
        if xs.iter().any(|x| *x > 20) {
            return TestResult::discard();
        }
        let expected: Vec<u8> = xs.iter().flat_map(|n| vec![*n; *n as usize]).collect();
        TestResult::from_bool(drain(from_vec(xs).concat_map(|n| replicate(n, n))) == expected)
    }

    fn prop_intersperse_length(xs: Vec<u8>) -> bool {
        let expected = if xs.is_empty() { 0 } else { xs.len() * 2 - 1 };
        drain(from_vec(xs).intersperse(0)).len() == expected
    }

    fn prop_fold_monoid_agrees_with_sum(xs: Vec<i16>) -> bool {
        let wide: Vec<i64> = xs.iter().map(|x| *x as i64).collect();
        let expected: i64 = wide.iter().sum();
        block_on(from_vec(wide).fold_monoid(Sum)) == Ok(Sum(expected))
    }

    fn prop_scan_left_last_is_fold(xs: Vec<i32>) -> bool {
        let folded = block_on(from_vec(xs.clone()).fold_left(0i64, |acc, x| acc + x as i64));
        let scanned = block_on(from_vec(xs).scan_left(0i64, |acc, x| acc + x as i64).last());
        match (folded, scanned) {
            (Ok(total), Ok(Some(last))) => total == last,
            (Ok(0), Ok(None)) => true,
            _ => false,
        }
    }
}

#[test]
fn product_monoid_of_empty_is_one() {
    let product = block_on(from_vec(Vec::<u32>::new()).fold_monoid(Product));
    assert_eq!(product, Ok(Product(1)));
}
