//! Delayed wrappers that restructure a matrix without copying its data
//!
//! - Cast: element type conversion
//! - Transpose: swapping rows and columns
//! - Bind: concatenation along rows or columns
//! - Subset: arbitrary or contiguous selection of rows/columns

pub mod bind;
pub mod cast;
pub mod subset;
pub mod subset_block;
pub mod transpose;

pub use bind::{make_delayed_bind, DelayedBind};
pub use cast::DelayedCast;
pub use subset::{make_delayed_subset, DelayedSubset};
pub use subset_block::{make_delayed_subset_block, DelayedSubsetBlock};
pub use transpose::DelayedTranspose;
