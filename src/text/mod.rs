//! Rich text components and their legacy and JSON representations.
//!
//! Pack descriptions and language entries are authored as [`TextComponent`] trees and
//! emitted either as legacy formatting-code strings ([`LegacySerializer`]) or as JSON
//! components ([`json`]).

pub mod component;
pub mod json;
pub mod legacy;
pub mod style;

pub use component::{NodeId, TextComponent, TextNode};
pub use legacy::{HexMode, LegacySerializer, AMPERSAND_CHAR, SECTION_CHAR};
pub use style::{Decoration, NamedColor, ResolvedStyle, Style, TextColor};
