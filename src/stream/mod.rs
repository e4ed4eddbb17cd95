//! Lazy pull-based streams built on a three-way step protocol.
//!
//! Every combinator here is a plain struct over its source, so a chain of
//! them monomorphizes into a single state machine. Erase the type with
//! [`StreamExt::boxed`] when a chain has to be stored or returned.

pub mod core;
pub mod constructors;
pub mod elementwise;
pub mod structural;
pub mod zip;
pub mod nested;
pub mod interop;
pub(crate) mod drain;

// Re-export core types
pub use self::core::{
    from_sequence, BoxedStream, Count, LocalBoxedStream, Next, Step, StepOnce, Stream, StreamExt,
};

// Re-export constructors
pub use constructors::{
    empty, from_fn, from_iter, from_vec, generate, iterate, once, range, repeat, replicate,
    unfold, unfold_effect, Empty, FromFn, Generate, IntoStep, Iter, Iterate, Once, Repeat,
    Replicate, Unfold,
};

// Re-export elementwise combinators
pub use elementwise::{
    Enumerate, Fallible, Filter, FilterMap, Inspect, Map, MapEffect, MapErr, RunEffects,
    ScanLeft, Traced,
};

// Re-export structural combinators
pub use structural::{
    Append, Cons, DropN, DropWhile, Init, Intersperse, Snoc, Tail, Take, TakeWhile,
};

pub use nested::{ConcatMap, Cycle};
pub use zip::{Zip, Zip3, ZipWith, ZipWith3};

// Re-export futures interop
pub use interop::{from_futures, from_try_futures, FromFutures, FromTryFutures};
