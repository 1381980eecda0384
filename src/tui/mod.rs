// TUI module for rendering the terminal interface
pub mod colors;
pub mod helpers;
pub mod input;

// Re-exports
pub use colors::*;
pub use helpers::format_file_size;
pub use input::{
    handle_capture_input, handle_confirm_input, handle_key_event, handle_text_input,
    CaptureAction, ConfirmAction, KeyAction, TextAction,
};

use crate::controller::Sorter;
use crate::hotkeys::KeyToken;
use image::RgbaImage;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

const HEADER_HEIGHT: u16 = 3;
const FOOTER_HEIGHT: u16 = 4;
const SIDEBAR_WIDTH: u16 = 26;

/// UI view state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// Main triage view
    Browsing,
    /// Help overlay visible
    Help,
    /// Waiting for a key press to bind to the selected folder
    KeyCapture,
    /// The captured key is held by another folder; asking to take it
    ConfirmRebind { key: KeyToken, holder: String },
    /// Typing a name for a new folder
    NewFolder { input: String },
    /// Typing a new name for the selected folder
    RenameFolder { input: String },
    /// Asking before deleting the selected folder
    ConfirmDelete,
}

/// Mutable UI state next to the controller: which view is active and
/// which sidebar folder is selected.
#[derive(Debug)]
pub struct UiState {
    pub view: ViewState,
    pub selected: usize,
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

impl UiState {
    pub fn new() -> Self {
        Self {
            view: ViewState::Browsing,
            selected: 0,
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self, folder_count: usize) {
        if self.selected + 1 < folder_count {
            self.selected += 1;
        }
    }

    /// Keeps the selection valid after the folder list shrinks.
    pub fn clamp_selection(&mut self, folder_count: usize) {
        if folder_count == 0 {
            self.selected = 0;
        } else if self.selected >= folder_count {
            self.selected = folder_count - 1;
        }
    }
}

/// The image-area size in pixels for a given terminal size. Half-block
/// rendering packs two pixel rows into every terminal row.
pub fn image_viewport(area: Rect) -> (u32, u32) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(area);
    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(SIDEBAR_WIDTH)])
        .split(chunks[1]);
    let inner = content[0].inner(Margin {
        horizontal: 1,
        vertical: 1,
    });
    (u32::from(inner.width), u32::from(inner.height) * 2)
}

/// Renders the full frame: header, image, sidebar, footer, plus any
/// overlay for the active view.
pub fn render(frame: &mut Frame, sorter: &Sorter, ui: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(frame.area());

    render_header(frame, chunks[0], sorter);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(SIDEBAR_WIDTH)])
        .split(chunks[1]);

    render_image(frame, content[0], sorter);
    render_sidebar(frame, content[1], sorter, ui);
    render_footer(frame, chunks[2], sorter);

    let selected_folder = sorter
        .folders()
        .get(ui.selected)
        .map(String::as_str)
        .unwrap_or("");
    match &ui.view {
        ViewState::Browsing => {}
        ViewState::Help => render_help_overlay(frame),
        ViewState::KeyCapture => render_capture_overlay(frame, selected_folder),
        ViewState::ConfirmRebind { key, holder } => {
            render_confirm_rebind_overlay(frame, selected_folder, key, holder)
        }
        ViewState::NewFolder { input } => {
            render_text_entry_overlay(frame, " New Folder ", input)
        }
        ViewState::RenameFolder { input } => {
            render_text_entry_overlay(frame, " Rename Folder ", input)
        }
        ViewState::ConfirmDelete => render_confirm_delete_overlay(frame, selected_folder),
    }
}

fn render_header(frame: &mut Frame, area: Rect, sorter: &Sorter) {
    let info = match (sorter.current_file_info(), sorter.position()) {
        (Some(info), Some(pos)) => Line::from(vec![
            Span::styled(
                format!(" Image {}/{} ", pos + 1, sorter.remaining()),
                Style::default()
                    .fg(ACCENT_HIGHLIGHT)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                info.name,
                Style::default()
                    .fg(TEXT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ({})", format_file_size(info.bytes)),
                Style::default().fg(TEXT_SECONDARY),
            ),
        ]),
        _ => Line::from(Span::styled(
            " No images to sort ",
            Style::default().fg(TEXT_SECONDARY),
        )),
    };

    let header = Paragraph::new(info).block(
        Block::default()
            .title(" snapsort ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER_COLOR)),
    );
    frame.render_widget(header, area);
}

fn render_image(frame: &mut Frame, area: Rect, sorter: &Sorter) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR));

    let paragraph = match sorter.display() {
        Some(bitmap) => Paragraph::new(bitmap_to_halfblock_lines(bitmap))
            .block(block)
            .alignment(Alignment::Center),
        None if sorter.remaining() == 0 => Paragraph::new(vec![
            Line::from(""),
            Line::from(""),
            Line::from(Span::styled(
                "All done",
                Style::default()
                    .fg(ACCENT_SECONDARY)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Every image has been sorted. Press q to quit.",
                Style::default().fg(TEXT_SECONDARY),
            )),
        ])
        .block(block)
        .alignment(Alignment::Center),
        None => Paragraph::new("").block(block),
    };

    frame.render_widget(paragraph, area);
}

fn render_sidebar(frame: &mut Frame, area: Rect, sorter: &Sorter, ui: &UiState) {
    let mut lines: Vec<Line> = Vec::with_capacity(sorter.folders().len() + 3);
    for (i, folder) in sorter.folders().iter().enumerate() {
        let marker = if i == ui.selected { "▸ " } else { "  " };
        let label = match sorter.key_for(folder) {
            Some(key) => format!("[{}] ", key),
            None => "[ ] ".to_string(),
        };
        let name_style = if i == ui.selected {
            Style::default()
                .fg(TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_PRIMARY)
        };
        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(ACCENT_HIGHLIGHT)),
            Span::styled(label, Style::default().fg(ACCENT_HIGHLIGHT)),
            Span::styled(folder.clone(), name_style),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Sorted: ", Style::default().fg(TEXT_SECONDARY)),
        Span::styled(
            format!("{}/{}", sorter.processed(), sorter.total()),
            Style::default().fg(ACCENT_SECONDARY),
        ),
    ]));

    let sidebar = Paragraph::new(lines).block(
        Block::default()
            .title(" Folders ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER_COLOR)),
    );
    frame.render_widget(sidebar, area);
}

fn render_footer(frame: &mut Frame, area: Rect, sorter: &Sorter) {
    let status = Line::from(Span::styled(
        format!(" {}", sorter.status()),
        Style::default().fg(TEXT_PRIMARY),
    ));
    let controls = Line::from(vec![
        Span::styled(" ←/→ ", Style::default().fg(ACCENT_HIGHLIGHT)),
        Span::styled("navigate", Style::default().fg(TEXT_SECONDARY)),
        Span::raw("  │  "),
        Span::styled("↑↓+Enter ", Style::default().fg(ACCENT_HIGHLIGHT)),
        Span::styled("sort", Style::default().fg(TEXT_SECONDARY)),
        Span::raw("  │  "),
        Span::styled("b ", Style::default().fg(ACCENT_HIGHLIGHT)),
        Span::styled("bind key", Style::default().fg(TEXT_SECONDARY)),
        Span::raw("  │  "),
        Span::styled("a ", Style::default().fg(ACCENT_HIGHLIGHT)),
        Span::styled("new", Style::default().fg(TEXT_SECONDARY)),
        Span::raw("  │  "),
        Span::styled("Ctrl+Z ", Style::default().fg(ACCENT_HIGHLIGHT)),
        Span::styled("undo", Style::default().fg(TEXT_SECONDARY)),
        Span::raw("  │  "),
        Span::styled("? ", Style::default().fg(TEXT_SECONDARY)),
        Span::styled("help", Style::default().fg(TEXT_SECONDARY)),
        Span::raw("  │  "),
        Span::styled("q ", Style::default().fg(TEXT_SECONDARY)),
        Span::styled("quit", Style::default().fg(TEXT_SECONDARY)),
    ]);

    let footer = Paragraph::new(vec![status, controls]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER_COLOR)),
    );
    frame.render_widget(footer, area);
}

/// Converts a scaled bitmap into half-block lines: the upper half block
/// (▀) shows one pixel in its foreground color and the pixel below it
/// in its background color, two image rows per terminal row.
pub fn bitmap_to_halfblock_lines(img: &RgbaImage) -> Vec<Line<'static>> {
    let width = img.width();
    let height = img.height();
    let term_rows = height.div_ceil(2);

    let mut lines = Vec::with_capacity(term_rows as usize);
    for row in 0..term_rows {
        let upper_y = row * 2;
        let lower_y = upper_y + 1;

        let mut spans = Vec::with_capacity(width as usize);
        for x in 0..width {
            let upper = img.get_pixel(x, upper_y);
            let lower = if lower_y < height {
                img.get_pixel(x, lower_y)
            } else {
                upper
            };
            let style = Style::default()
                .fg(Color::Rgb(upper[0], upper[1], upper[2]))
                .bg(Color::Rgb(lower[0], lower[1], lower[2]));
            spans.push(Span::styled("▀", style));
        }
        lines.push(Line::from(spans));
    }
    lines
}

/// Renders the help overlay
pub fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect(55, 70, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Help ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
        .style(Style::default().bg(BG_DARK));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let entry = |key: &str, text: &str| {
        Line::from(vec![
            Span::styled(
                format!("  {:<10}", key),
                Style::default().fg(ACCENT_HIGHLIGHT),
            ),
            Span::styled(text.to_string(), Style::default().fg(TEXT_PRIMARY)),
        ])
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        entry("<hotkey>", "Move the image into the bound folder"),
        entry("1-9, 0", "Move into the folder at that position"),
        Line::from(""),
        entry("← / →", "Previous / next image"),
        entry("Space", "Skip forward"),
        entry("↑ / ↓", "Select a folder"),
        entry("Enter", "Move into the selected folder"),
        Line::from(""),
        entry("b", "Bind a key to the selected folder"),
        entry("a", "Create a new folder"),
        entry("r", "Rename the selected folder"),
        entry("x", "Delete the selected folder"),
        Line::from(""),
        entry("Ctrl+Z", "Undo the last move"),
        entry("q / Esc", "Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press ? or Esc to close",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];

    let paragraph = Paragraph::new(lines).alignment(Alignment::Left);
    frame.render_widget(paragraph, inner);
}

/// Renders the key-capture overlay
pub fn render_capture_overlay(frame: &mut Frame, folder: &str) {
    let area = centered_rect(50, 30, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Bind Key ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
        .style(Style::default().bg(BG_DARK));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("Press a key to bind to ", Style::default().fg(TEXT_PRIMARY)),
            Span::styled(
                folder.to_string(),
                Style::default()
                    .fg(ACCENT_HIGHLIGHT)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Esc cancels",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        inner,
    );
}

/// Renders the rebind confirmation overlay
pub fn render_confirm_rebind_overlay(frame: &mut Frame, folder: &str, key: &KeyToken, holder: &str) {
    let area = centered_rect(55, 35, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Key In Use ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_PRIMARY))
        .style(Style::default().bg(BG_DARK));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("[{}]", key),
                Style::default()
                    .fg(ACCENT_HIGHLIGHT)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" is already bound to ", Style::default().fg(TEXT_PRIMARY)),
            Span::styled(
                holder.to_string(),
                Style::default()
                    .fg(TEXT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Move it to ", Style::default().fg(TEXT_PRIMARY)),
            Span::styled(
                folder.to_string(),
                Style::default()
                    .fg(ACCENT_HIGHLIGHT)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("?", Style::default().fg(TEXT_PRIMARY)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("[Y]", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw("es  "),
            Span::styled("[N]", Style::default().fg(ACCENT_PRIMARY)),
            Span::raw("o"),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        inner,
    );
}

/// Renders a one-line text entry overlay (new folder, rename)
pub fn render_text_entry_overlay(frame: &mut Frame, title: &str, input: &str) {
    let area = centered_rect(50, 25, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(title.to_string())
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
        .style(Style::default().bg(BG_DARK));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  > ", Style::default().fg(ACCENT_HIGHLIGHT)),
            Span::styled(
                input.to_string(),
                Style::default()
                    .fg(TEXT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("_", Style::default().fg(TEXT_SECONDARY)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "  Enter confirms, Esc cancels",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

/// Renders the delete confirmation overlay
pub fn render_confirm_delete_overlay(frame: &mut Frame, folder: &str) {
    let area = centered_rect(55, 30, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Confirm Delete ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_PRIMARY))
        .style(Style::default().bg(BG_DARK));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("Delete ", Style::default().fg(TEXT_PRIMARY)),
            Span::styled(
                folder.to_string(),
                Style::default()
                    .fg(ACCENT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" and everything in it?", Style::default().fg(TEXT_PRIMARY)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "This cannot be undone.",
            Style::default().fg(TEXT_SECONDARY),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("[Y]", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw("es  "),
            Span::styled("[N]", Style::default().fg(ACCENT_PRIMARY)),
            Span::raw("o"),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        inner,
    );
}

/// Helper to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use ratatui::{backend::TestBackend, Terminal};
    use std::fs;
    use std::time::Instant;
    use tempfile::TempDir;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn setup_sorter(with_images: bool) -> (TempDir, Sorter) {
        let dir = TempDir::new().unwrap();
        if with_images {
            RgbaImage::from_pixel(8, 8, Rgba([200, 60, 60, 255]))
                .save(dir.path().join("sunset.png"))
                .unwrap();
        }
        fs::create_dir(dir.path().join("Cats")).unwrap();
        fs::create_dir(dir.path().join("Dogs")).unwrap();

        let mut sorter = Sorter::new(dir.path().to_path_buf(), None).unwrap();
        sorter.viewport_resized(40, 40, Instant::now());
        (dir, sorter)
    }

    mod layout_tests {
        use super::*;

        #[test]
        fn test_render_with_image() {
            let (_dir, sorter) = setup_sorter(true);
            let ui = UiState::new();
            let backend = TestBackend::new(80, 24);
            let mut terminal = Terminal::new(backend).unwrap();

            terminal.draw(|frame| render(frame, &sorter, &ui)).unwrap();

            let text = buffer_text(&terminal);
            assert!(text.contains("sunset.png"));
            assert!(text.contains("Cats"));
            assert!(text.contains("Dogs"));
            assert!(text.contains("▀"), "expected half-block image cells");
        }

        #[test]
        fn test_render_empty_directory() {
            let (_dir, sorter) = setup_sorter(false);
            let ui = UiState::new();
            let backend = TestBackend::new(80, 24);
            let mut terminal = Terminal::new(backend).unwrap();

            terminal.draw(|frame| render(frame, &sorter, &ui)).unwrap();

            let text = buffer_text(&terminal);
            assert!(text.contains("No images"));
        }

        #[test]
        fn test_render_footer_controls() {
            let (_dir, sorter) = setup_sorter(true);
            let ui = UiState::new();
            let backend = TestBackend::new(80, 24);
            let mut terminal = Terminal::new(backend).unwrap();

            terminal.draw(|frame| render(frame, &sorter, &ui)).unwrap();

            let text = buffer_text(&terminal);
            assert!(text.contains("navigate"));
            assert!(text.contains("undo"));
            assert!(text.contains("quit"));
        }

        #[test]
        fn test_render_sidebar_shows_bindings() {
            let (_dir, mut sorter) = setup_sorter(true);
            sorter.bind("Cats", KeyToken::from_char('c')).unwrap();
            let ui = UiState::new();
            let backend = TestBackend::new(80, 24);
            let mut terminal = Terminal::new(backend).unwrap();

            terminal.draw(|frame| render(frame, &sorter, &ui)).unwrap();

            let text = buffer_text(&terminal);
            assert!(text.contains("[c]"));
        }

        #[test]
        fn test_render_overlays() {
            let (_dir, sorter) = setup_sorter(true);
            let backend = TestBackend::new(80, 30);
            let mut terminal = Terminal::new(backend).unwrap();

            let mut ui = UiState::new();
            ui.view = ViewState::KeyCapture;
            terminal.draw(|frame| render(frame, &sorter, &ui)).unwrap();
            assert!(buffer_text(&terminal).contains("Press a key"));

            ui.view = ViewState::ConfirmRebind {
                key: KeyToken::from_char('c'),
                holder: "Dogs".to_string(),
            };
            terminal.draw(|frame| render(frame, &sorter, &ui)).unwrap();
            assert!(buffer_text(&terminal).contains("already bound"));

            ui.view = ViewState::NewFolder {
                input: "Bir".to_string(),
            };
            terminal.draw(|frame| render(frame, &sorter, &ui)).unwrap();
            assert!(buffer_text(&terminal).contains("Bir"));

            ui.view = ViewState::ConfirmDelete;
            terminal.draw(|frame| render(frame, &sorter, &ui)).unwrap();
            assert!(buffer_text(&terminal).contains("cannot be undone"));

            ui.view = ViewState::Help;
            terminal.draw(|frame| render(frame, &sorter, &ui)).unwrap();
            assert!(buffer_text(&terminal).contains("Keyboard Shortcuts"));
        }
    }

    mod halfblock_tests {
        use super::*;

        #[test]
        fn test_two_pixel_rows_per_line() {
            let img = RgbaImage::from_pixel(5, 6, Rgba([10, 20, 30, 255]));
            let lines = bitmap_to_halfblock_lines(&img);
            assert_eq!(lines.len(), 3);
            for line in &lines {
                assert_eq!(line.spans.len(), 5);
            }
        }

        #[test]
        fn test_odd_height_duplicates_last_row() {
            let img = RgbaImage::from_pixel(4, 5, Rgba([10, 20, 30, 255]));
            let lines = bitmap_to_halfblock_lines(&img);
            assert_eq!(lines.len(), 3);
        }

        #[test]
        fn test_pixel_colors_map_to_fg_and_bg() {
            let mut img = RgbaImage::new(1, 2);
            img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
            img.put_pixel(0, 1, Rgba([0, 0, 255, 255]));

            let lines = bitmap_to_halfblock_lines(&img);
            let style = lines[0].spans[0].style;
            assert_eq!(style.fg, Some(Color::Rgb(255, 0, 0)));
            assert_eq!(style.bg, Some(Color::Rgb(0, 0, 255)));
        }
    }

    mod viewport_tests {
        use super::*;

        #[test]
        fn test_image_viewport_accounts_for_chrome() {
            let area = Rect::new(0, 0, 80, 24);
            let (w, h) = image_viewport(area);
            // 80 cols minus sidebar (26) minus borders (2).
            assert_eq!(w, 52);
            // 24 rows minus header (3) and footer (4) leaves 17, minus
            // borders (2) leaves 15 text rows of two pixels each.
            assert_eq!(h, 30);
        }

        #[test]
        fn test_image_viewport_tiny_terminal_stays_bounded() {
            let area = Rect::new(0, 0, 10, 5);
            let (w, h) = image_viewport(area);
            assert!(w <= 10);
            assert!(h <= 10);
        }
    }

    mod ui_state_tests {
        use super::*;

        #[test]
        fn test_selection_clamps() {
            let mut ui = UiState::new();
            ui.select_prev();
            assert_eq!(ui.selected, 0);

            ui.select_next(3);
            ui.select_next(3);
            ui.select_next(3);
            assert_eq!(ui.selected, 2);

            ui.clamp_selection(2);
            assert_eq!(ui.selected, 1);
            ui.clamp_selection(0);
            assert_eq!(ui.selected, 0);
        }
    }
}
