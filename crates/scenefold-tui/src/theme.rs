use ratatui::style::Color;

/// Runtime theme colors (Gruvbox Material dark)
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg0: Color,
    pub bg1: Color,
    pub bg2: Color,

    pub fg0: Color,
    pub grey0: Color,
    pub grey2: Color,

    pub yellow: Color,
    pub green: Color,

    pub accent: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg0: Color::Rgb(0x28, 0x28, 0x28),
            bg1: Color::Rgb(0x32, 0x30, 0x2f),
            bg2: Color::Rgb(0x45, 0x40, 0x3d),
            fg0: Color::Rgb(0xd4, 0xbe, 0x98),
            grey0: Color::Rgb(0x7c, 0x6f, 0x64),
            grey2: Color::Rgb(0xa8, 0x99, 0x84),
            yellow: Color::Rgb(0xd8, 0xa6, 0x57),
            green: Color::Rgb(0xa9, 0xb6, 0x65),
            accent: Color::Rgb(0x89, 0xb4, 0x82),
        }
    }
}

/// Mix `fg` over `bg` at `opacity` (0.0 = bg, 1.0 = fg)
///
/// Terminals have no alpha channel; non-RGB colors switch over at half opacity.
pub fn blend(fg: Color, bg: Color, opacity: f64) -> Color {
    let t = opacity.clamp(0.0, 1.0);
    match (fg, bg) {
        (Color::Rgb(fr, fg_, fb), Color::Rgb(br, bg_, bb)) => {
            let mix = |f: u8, b: u8| (b as f64 + (f as f64 - b as f64) * t).round() as u8;
            Color::Rgb(mix(fr, br), mix(fg_, bg_), mix(fb, bb))
        }
        _ if t >= 0.5 => fg,
        _ => bg,
    }
}
