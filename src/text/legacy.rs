//! Legacy formatting-code text (`§cRed §lbold`).
//!
//! The legacy format is flat: a marker character followed by one code character sets a
//! color, turns on a decoration, or resets everything. A color code also clears all
//! decorations. Hex colors use the `§x§R§R§G§G§B§B` form when enabled.

use super::component::TextComponent;
use super::style::{Decoration, NamedColor, ResolvedStyle, Style, TextColor};
use crate::error::TextError;
use std::ops::Range;

/// The vanilla section-sign marker.
pub const SECTION_CHAR: char = '§';
/// The marker most plugin configs use instead of the section sign.
pub const AMPERSAND_CHAR: char = '&';

const RESET_CODE: char = 'r';
const HEX_CODE: char = 'x';

/// How hex colors are written to legacy text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HexMode {
    /// Replace hex colors with the nearest named color.
    #[default]
    Downsample,
    /// Write `§x§R§R§G§G§B§B`.
    Bungee,
}

/// One decoded format code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LegacyCode {
    Color(TextColor),
    Decoration(Decoration),
    Reset,
}

/// The formatting the output stream has most recently switched to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Emitted {
    color: Option<TextColor>,
    decorations: [bool; 5],
}

/// Converts between [`TextComponent`] trees and legacy text.
#[derive(Debug, Clone)]
pub struct LegacySerializer {
    marker: char,
    hex_mode: HexMode,
    strict_fonts: bool,
}

impl Default for LegacySerializer {
    fn default() -> Self {
        Self {
            marker: SECTION_CHAR,
            hex_mode: HexMode::Downsample,
            strict_fonts: false,
        }
    }
}

impl LegacySerializer {
    /// Serializer using `§`.
    pub fn section() -> Self {
        Self::default()
    }

    /// Serializer using `&`.
    pub fn ampersand() -> Self {
        Self::default().with_marker(AMPERSAND_CHAR)
    }

    pub fn with_marker(mut self, marker: char) -> Self {
        self.marker = marker;
        self
    }

    pub fn with_hex_mode(mut self, hex_mode: HexMode) -> Self {
        self.hex_mode = hex_mode;
        self
    }

    /// Reject components using a non-default font instead of dropping the font.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict_fonts = strict;
        self
    }

    pub fn marker(&self) -> char {
        self.marker
    }

    pub fn hex_mode(&self) -> HexMode {
        self.hex_mode
    }

    /// Flatten a component tree into legacy text.
    ///
    /// A style escape is written only when the resolved style of a non-empty node differs
    /// from what was last written. When the change only adds decorations, only the added
    /// codes are written; otherwise a color (or reset) code is followed by every active
    /// decoration.
    ///
    /// Fails with [`TextError::EmbeddedFormatCode`] when a node's content, or the text formed
    /// where adjacent nodes meet, would read back as a format code.
    pub fn serialize(&self, component: &TextComponent) -> Result<String, TextError> {
        let resolved = component.resolved_styles();
        let mut out = String::new();
        let mut escapes: Vec<Range<usize>> = Vec::new();
        let mut emitted = Emitted::default();

        for (id, node) in component.preorder() {
            let content = node.content();
            if content.is_empty() {
                continue;
            }
            self.check_content(content)?;

            let style = &resolved[id.index()];
            if self.strict_fonts {
                if let Some(font) = &style.font {
                    if !is_default_font(font) {
                        return Err(TextError::UnrepresentableFont(font.to_string()));
                    }
                }
            }

            let target = self.target(style);
            if target != emitted {
                let start = out.len();
                self.write_transition(&mut out, &emitted, &target);
                escapes.push(start..out.len());
                emitted = target;
            }
            out.push_str(content);
        }

        self.check_joins(&out, &escapes)?;
        Ok(out)
    }

    /// Parse legacy text into an empty root whose children are the styled text runs.
    ///
    /// Never fails: unknown codes, incomplete hex sequences and a trailing marker are kept
    /// as literal text.
    pub fn deserialize(&self, input: &str) -> TextComponent {
        let chars: Vec<char> = input.chars().collect();
        let mut component = TextComponent::empty();
        let root = component.root();

        let mut style = Style::default();
        let mut run = String::new();
        let mut run_style = Style::default();

        let mut i = 0;
        while i < chars.len() {
            if let Some((code, consumed)) = self.code_at(&chars, i) {
                apply_code(&mut style, code);
                i += consumed;
                continue;
            }

            if !run.is_empty() && style != run_style {
                component.push_child(root, std::mem::take(&mut run), run_style.clone());
            }
            if run.is_empty() {
                run_style = style.clone();
            }
            run.push(chars[i]);
            i += 1;
        }

        if !run.is_empty() {
            component.push_child(root, run, run_style);
        }
        component
    }

    /// Remove every recognized format code, keeping only the text.
    pub fn strip(&self, input: &str) -> String {
        self.deserialize(input).plain_text()
    }

    fn target(&self, style: &ResolvedStyle) -> Emitted {
        let color = style.color.map(|color| match (color, self.hex_mode) {
            (TextColor::Hex(_), HexMode::Downsample) => TextColor::Named(color.nearest_named()),
            _ => color,
        });
        let mut decorations = [false; 5];
        for (i, decoration) in Decoration::ALL.iter().enumerate() {
            decorations[i] = style.decoration(*decoration);
        }
        Emitted { color, decorations }
    }

    fn write_transition(&self, out: &mut String, from: &Emitted, to: &Emitted) {
        let only_additions = from.color == to.color
            && from
                .decorations
                .iter()
                .zip(to.decorations.iter())
                .all(|(was, now)| !*was || *now);

        if only_additions {
            for (i, decoration) in Decoration::ALL.iter().enumerate() {
                if to.decorations[i] && !from.decorations[i] {
                    self.write_code(out, decoration.code());
                }
            }
            return;
        }

        match to.color {
            Some(TextColor::Named(named)) => self.write_code(out, named.code()),
            Some(TextColor::Hex(value)) => {
                self.write_code(out, HEX_CODE);
                for digit in format!("{:06x}", value).chars() {
                    self.write_code(out, digit);
                }
            }
            None => self.write_code(out, RESET_CODE),
        }
        for (i, decoration) in Decoration::ALL.iter().enumerate() {
            if to.decorations[i] {
                self.write_code(out, decoration.code());
            }
        }
    }

    fn write_code(&self, out: &mut String, code: char) {
        out.push(self.marker);
        out.push(code);
    }

    /// Decode the code starting at `chars[i]`, returning it and the number of chars used.
    fn code_at(&self, chars: &[char], i: usize) -> Option<(LegacyCode, usize)> {
        if chars.get(i) != Some(&self.marker) {
            return None;
        }
        let code = chars.get(i + 1)?.to_ascii_lowercase();

        if code == HEX_CODE {
            return self.hex_at(chars, i).map(|value| (LegacyCode::Color(TextColor::Hex(value)), 14));
        }
        if code == RESET_CODE {
            return Some((LegacyCode::Reset, 2));
        }
        if let Some(color) = NamedColor::from_code(code) {
            return Some((LegacyCode::Color(TextColor::Named(color)), 2));
        }
        Decoration::from_code(code).map(|d| (LegacyCode::Decoration(d), 2))
    }

    /// `§x` followed by six `§<hex digit>` pairs.
    fn hex_at(&self, chars: &[char], i: usize) -> Option<u32> {
        let mut value = 0u32;
        for pair in 0..6 {
            let at = i + 2 + pair * 2;
            if chars.get(at) != Some(&self.marker) {
                return None;
            }
            let digit = chars.get(at + 1)?.to_digit(16)?;
            value = (value << 4) | digit;
        }
        Some(value)
    }

    /// Content must not contain something the deserializer would read as a code.
    fn check_content(&self, content: &str) -> Result<(), TextError> {
        let chars: Vec<char> = content.chars().collect();
        let mut offset = 0;
        for (i, c) in chars.iter().enumerate() {
            if self.code_at(&chars, i).is_some() {
                return Err(TextError::EmbeddedFormatCode {
                    marker: self.marker,
                    code: chars[i + 1],
                    offset,
                });
            }
            offset += c.len_utf8();
        }
        Ok(())
    }

    /// Scan `out` the way [`deserialize`](Self::deserialize) would. Only the escapes written
    /// by the serializer, at the byte ranges in `escapes`, may decode as codes.
    fn check_joins(&self, out: &str, escapes: &[Range<usize>]) -> Result<(), TextError> {
        let chars: Vec<char> = out.chars().collect();
        let mut escapes = escapes.iter().peekable();
        let mut offset = 0;
        let mut i = 0;
        while i < chars.len() {
            if let Some(escape) = escapes.next_if(|escape| escape.start == offset) {
                i += out[escape.clone()].chars().count();
                offset = escape.end;
                continue;
            }
            if self.code_at(&chars, i).is_some() {
                return Err(TextError::EmbeddedFormatCode {
                    marker: self.marker,
                    code: chars[i + 1],
                    offset,
                });
            }
            offset += chars[i].len_utf8();
            i += 1;
        }
        Ok(())
    }
}

fn apply_code(style: &mut Style, code: LegacyCode) {
    match code {
        LegacyCode::Color(color) => {
            *style = Style {
                color: Some(color),
                ..Style::default()
            };
        }
        LegacyCode::Decoration(decoration) => style.set_decoration(decoration, Some(true)),
        LegacyCode::Reset => *style = Style::default(),
    }
}

fn is_default_font(font: &crate::key::ResourceKey) -> bool {
    font.is_default_namespace() && font.path() == "default"
}
