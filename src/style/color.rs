use std::fmt;

use super::ToCss;

/// A colour as stored in LRF attribute tags.
///
/// The on-disk dword packs the channels as `0xBBGGRRAA`, with `a` the
/// transparency byte: `0xFF` means "not set".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn from_dword(value: u32) -> Self {
        Self {
            a: value as u8,
            r: (value >> 8) as u8,
            g: (value >> 16) as u8,
            b: (value >> 24) as u8,
        }
    }

    pub const fn to_dword(self) -> u32 {
        (self.a as u32) | (self.r as u32) << 8 | (self.g as u32) << 16 | (self.b as u32) << 24
    }

    /// Whether the colour should be painted at all.
    pub const fn is_visible(self) -> bool {
        self.a < 0xFF
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02x}{:02x}{:02x}{:02x}", self.a, self.r, self.g, self.b)
    }
}

impl ToCss for Color {
    fn to_css(&self, buf: &mut String) {
        use std::fmt::Write;
        let _ = write!(buf, "rgb({}, {}, {})", self.r, self.g, self.b);
    }
}
