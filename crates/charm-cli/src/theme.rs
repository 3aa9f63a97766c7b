use crossterm::style::Color;

/// Colors used by the report
#[derive(Debug, Clone)]
pub struct Theme {
    /// Emit ANSI escapes at all
    pub ansi: bool,
    /// Stat that reached its cap
    pub capped: Color,
    /// Stat below its cap, pointing the right way
    pub normal: Color,
    /// Stat pointing the wrong way
    pub negative: Color,
    /// Secondary text (separators, zero stats, trace output)
    pub muted: Color,
    /// Version and algorithm names
    pub accent: Color,
    /// Numbers
    pub value: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Default terminal theme
    pub fn dark() -> Self {
        Self {
            ansi: true,
            capped: rgb(0xe49b20),
            normal: rgb(0x4ac2e5),
            negative: rgb(0xd02e28),
            muted: Color::Rgb { r: 128, g: 128, b: 128 },
            accent: Color::Rgb { r: 229, g: 158, b: 103 },
            value: Color::Rgb { r: 107, g: 176, b: 93 },
        }
    }

    /// Same layout without any escape codes, for output read by programs
    pub fn plain() -> Self {
        Self {
            ansi: false,
            ..Self::dark()
        }
    }
}

/// Convert a packed 24-bit `0xRRGGBB` value to a terminal color.
pub fn rgb(packed: u32) -> Color {
    Color::Rgb {
        r: (packed >> 16) as u8,
        g: (packed >> 8) as u8,
        b: packed as u8,
    }
}
