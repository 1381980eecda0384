// Color palette for the terminal UI
use ratatui::style::Color;

pub const BG_DARK: Color = Color::Rgb(18, 18, 24);
pub const TEXT_PRIMARY: Color = Color::Rgb(222, 222, 227);
pub const TEXT_SECONDARY: Color = Color::Rgb(138, 138, 150);
/// Destructive actions (delete folder, errors)
pub const ACCENT_PRIMARY: Color = Color::Rgb(229, 104, 104);
/// Positive actions (moves, confirmations)
pub const ACCENT_SECONDARY: Color = Color::Rgb(122, 199, 127);
/// Selection and hotkey labels
pub const ACCENT_HIGHLIGHT: Color = Color::Rgb(247, 180, 86);
pub const BORDER_COLOR: Color = Color::Rgb(92, 92, 112);
