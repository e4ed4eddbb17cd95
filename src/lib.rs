//! Fused, lazy, pull-based streams.
//!
//! A stream is a state machine that, when pulled, answers with one of three
//! steps: an element ([`Step::Yield`]), nothing yet ([`Step::Skip`]), or the
//! end ([`Step::Done`]). Structural combinators wrap a source without running
//! it; drains such as [`StreamExt::to_vec`] or [`StreamExt::fold_left`] run the
//! pipeline inside the async effect context and return one result.
//!
//! ```
//! use futures::executor::block_on;
//! use rs2_step::*;
//!
//! let total = block_on(
//!     range(1, 11)
//!         .filter(|x| x % 2 == 0)
//!         .map(|x| x * x)
//!         .sum(),
//! );
//! assert_eq!(total, Ok(220));
//! ```

pub mod error;
pub mod monoid;
pub mod stream;
pub mod stream_configuration;

// Re-export all items from the stream module at the crate root
pub use error::{StreamError, StreamResult};
pub use monoid::{Monoid, Semigroup};
pub use stream::*;
pub use stream_configuration::{CollectConfig, TraceConfig};
