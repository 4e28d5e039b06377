//! Pack overlay resolution.
//!
//! Pack sources are registered with the [`OverlayResolver`], which keeps one ranked list of
//! contributions per asset identity and publishes the winners as an immutable
//! [`MergedView`] after every change.

pub mod overlay;
pub mod view;

pub use overlay::{OverlayResolver, SourceId, SourceInfo};
pub use view::{diff, MergedView};
