use colored::Color;

pub const PRIMARY: Color = Color::TrueColor { r: 94, g: 234, b: 212 };
pub const ACCENT: Color = Color::TrueColor { r: 250, g: 204, b: 21 };
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::TrueColor { r: 226, g: 232, b: 240 };
