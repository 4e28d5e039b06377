//! Text colors, decorations and style attributes.

use crate::key::ResourceKey;
use std::fmt;

/// The sixteen legacy chat colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NamedColor {
    Black,
    DarkBlue,
    DarkGreen,
    DarkAqua,
    DarkRed,
    DarkPurple,
    Gold,
    Gray,
    DarkGray,
    Blue,
    Green,
    Aqua,
    Red,
    LightPurple,
    Yellow,
    White,
}

impl NamedColor {
    /// All colors in legacy code order (`0`..`f`).
    pub const ALL: [NamedColor; 16] = [
        NamedColor::Black,
        NamedColor::DarkBlue,
        NamedColor::DarkGreen,
        NamedColor::DarkAqua,
        NamedColor::DarkRed,
        NamedColor::DarkPurple,
        NamedColor::Gold,
        NamedColor::Gray,
        NamedColor::DarkGray,
        NamedColor::Blue,
        NamedColor::Green,
        NamedColor::Aqua,
        NamedColor::Red,
        NamedColor::LightPurple,
        NamedColor::Yellow,
        NamedColor::White,
    ];

    /// Legacy code character (`0`-`9`, `a`-`f`).
    pub fn code(self) -> char {
        let index = self as u32;
        std::char::from_digit(index, 16).unwrap_or('f')
    }

    /// Look up a color by code character, case-insensitive.
    pub fn from_code(code: char) -> Option<Self> {
        let index = code.to_digit(16)?;
        Self::ALL.get(index as usize).copied()
    }

    /// Name used by the JSON component format.
    pub fn name(self) -> &'static str {
        match self {
            NamedColor::Black => "black",
            NamedColor::DarkBlue => "dark_blue",
            NamedColor::DarkGreen => "dark_green",
            NamedColor::DarkAqua => "dark_aqua",
            NamedColor::DarkRed => "dark_red",
            NamedColor::DarkPurple => "dark_purple",
            NamedColor::Gold => "gold",
            NamedColor::Gray => "gray",
            NamedColor::DarkGray => "dark_gray",
            NamedColor::Blue => "blue",
            NamedColor::Green => "green",
            NamedColor::Aqua => "aqua",
            NamedColor::Red => "red",
            NamedColor::LightPurple => "light_purple",
            NamedColor::Yellow => "yellow",
            NamedColor::White => "white",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.name() == name)
    }

    /// RGB value as rendered by the vanilla client.
    pub fn rgb(self) -> [u8; 3] {
        match self {
            NamedColor::Black => [0, 0, 0],
            NamedColor::DarkBlue => [0, 0, 170],
            NamedColor::DarkGreen => [0, 170, 0],
            NamedColor::DarkAqua => [0, 170, 170],
            NamedColor::DarkRed => [170, 0, 0],
            NamedColor::DarkPurple => [170, 0, 170],
            NamedColor::Gold => [255, 170, 0],
            NamedColor::Gray => [170, 170, 170],
            NamedColor::DarkGray => [85, 85, 85],
            NamedColor::Blue => [85, 85, 255],
            NamedColor::Green => [85, 255, 85],
            NamedColor::Aqua => [85, 255, 255],
            NamedColor::Red => [255, 85, 85],
            NamedColor::LightPurple => [255, 85, 255],
            NamedColor::Yellow => [255, 255, 85],
            NamedColor::White => [255, 255, 255],
        }
    }
}

/// A text color: one of the named colors or an arbitrary 24-bit value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextColor {
    Named(NamedColor),
    /// `0xRRGGBB`.
    Hex(u32),
}

impl TextColor {
    pub fn rgb(self) -> [u8; 3] {
        match self {
            TextColor::Named(named) => named.rgb(),
            TextColor::Hex(value) => [(value >> 16) as u8, (value >> 8) as u8, value as u8],
        }
    }

    /// Closest named color by squared RGB distance. Named colors map to themselves.
    pub fn nearest_named(self) -> NamedColor {
        if let TextColor::Named(named) = self {
            return named;
        }
        let [r, g, b] = self.rgb();
        let distance = |c: &NamedColor| {
            let [cr, cg, cb] = c.rgb();
            let dr = r as i32 - cr as i32;
            let dg = g as i32 - cg as i32;
            let db = b as i32 - cb as i32;
            dr * dr + dg * dg + db * db
        };
        NamedColor::ALL
            .iter()
            .min_by_key(|c| distance(c))
            .copied()
            .unwrap_or(NamedColor::White)
    }

    /// Parse a color name (`"red"`) or hex literal (`"#ff5555"`).
    pub fn parse(raw: &str) -> Option<Self> {
        if let Some(hex) = raw.strip_prefix('#') {
            if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return None;
            }
            return u32::from_str_radix(hex, 16).ok().map(TextColor::Hex);
        }
        NamedColor::from_name(raw).map(TextColor::Named)
    }
}

impl From<NamedColor> for TextColor {
    fn from(named: NamedColor) -> Self {
        TextColor::Named(named)
    }
}

impl fmt::Display for TextColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextColor::Named(named) => f.write_str(named.name()),
            TextColor::Hex(value) => write!(f, "#{:06x}", value),
        }
    }
}

/// Boolean text decorations, in legacy code order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decoration {
    Obfuscated,
    Bold,
    Strikethrough,
    Underlined,
    Italic,
}

impl Decoration {
    pub const ALL: [Decoration; 5] = [
        Decoration::Obfuscated,
        Decoration::Bold,
        Decoration::Strikethrough,
        Decoration::Underlined,
        Decoration::Italic,
    ];

    pub fn code(self) -> char {
        match self {
            Decoration::Obfuscated => 'k',
            Decoration::Bold => 'l',
            Decoration::Strikethrough => 'm',
            Decoration::Underlined => 'n',
            Decoration::Italic => 'o',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        let code = code.to_ascii_lowercase();
        Self::ALL.iter().copied().find(|d| d.code() == code)
    }

    /// Field name in the JSON component format.
    pub fn name(self) -> &'static str {
        match self {
            Decoration::Obfuscated => "obfuscated",
            Decoration::Bold => "bold",
            Decoration::Strikethrough => "strikethrough",
            Decoration::Underlined => "underlined",
            Decoration::Italic => "italic",
        }
    }
}

/// Style attributes of one component. `None` means inherit from the parent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    pub color: Option<TextColor>,
    pub obfuscated: Option<bool>,
    pub bold: Option<bool>,
    pub strikethrough: Option<bool>,
    pub underlined: Option<bool>,
    pub italic: Option<bool>,
    pub font: Option<ResourceKey>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn decoration(&self, decoration: Decoration) -> Option<bool> {
        match decoration {
            Decoration::Obfuscated => self.obfuscated,
            Decoration::Bold => self.bold,
            Decoration::Strikethrough => self.strikethrough,
            Decoration::Underlined => self.underlined,
            Decoration::Italic => self.italic,
        }
    }

    pub fn set_decoration(&mut self, decoration: Decoration, value: Option<bool>) {
        let slot = match decoration {
            Decoration::Obfuscated => &mut self.obfuscated,
            Decoration::Bold => &mut self.bold,
            Decoration::Strikethrough => &mut self.strikethrough,
            Decoration::Underlined => &mut self.underlined,
            Decoration::Italic => &mut self.italic,
        };
        *slot = value;
    }

    pub fn with_color(mut self, color: impl Into<TextColor>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_decoration(mut self, decoration: Decoration, value: bool) -> Self {
        self.set_decoration(decoration, Some(value));
        self
    }

    pub fn with_font(mut self, font: ResourceKey) -> Self {
        self.font = Some(font);
        self
    }

    /// Fill unset attributes from the parent's resolved style.
    pub fn resolve(&self, parent: &ResolvedStyle) -> ResolvedStyle {
        let mut resolved = ResolvedStyle {
            color: self.color.or(parent.color),
            font: self.font.clone().or_else(|| parent.font.clone()),
            decorations: parent.decorations,
        };
        for (i, decoration) in Decoration::ALL.iter().enumerate() {
            if let Some(value) = self.decoration(*decoration) {
                resolved.decorations[i] = value;
            }
        }
        resolved
    }
}

/// Fully inherited style: every attribute has a concrete value.
///
/// `color: None` and `font: None` stand for the client defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedStyle {
    pub color: Option<TextColor>,
    pub font: Option<ResourceKey>,
    decorations: [bool; 5],
}

impl ResolvedStyle {
    pub fn decoration(&self, decoration: Decoration) -> bool {
        self.decorations[decoration_index(decoration)]
    }

    pub fn set_decoration(&mut self, decoration: Decoration, value: bool) {
        self.decorations[decoration_index(decoration)] = value;
    }
}

fn decoration_index(decoration: Decoration) -> usize {
    match decoration {
        Decoration::Obfuscated => 0,
        Decoration::Bold => 1,
        Decoration::Strikethrough => 2,
        Decoration::Underlined => 3,
        Decoration::Italic => 4,
    }
}
