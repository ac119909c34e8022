use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Paragraph, Widget},
};

use lightsout::board::{Board, COLUMNS, LAMPS_PER_COLUMN};
use lightsout::config::Theme;
use lightsout::game::JUMP_START_TEXT;

use crate::App;

const COLUMN_WIDTH: u16 = 7;
const COLUMN_GAP: u16 = 2;
const BOARD_HEIGHT: u16 = LAMPS_PER_COLUMN as u16 + 2;
const THEME_BUTTON_WIDTH: u16 = 9;
const LAMP: &str = "███";

struct Palette {
    background: Color,
    text: Color,
    dim: Color,
    housing: Color,
    lamp_off: Color,
    lamp_on: Color,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Dark => Palette {
            background: Color::Black,
            text: Color::White,
            dim: Color::Gray,
            housing: Color::DarkGray,
            lamp_off: Color::Rgb(34, 34, 34),
            lamp_on: Color::Red,
        },
        Theme::Light => Palette {
            background: Color::White,
            text: Color::Black,
            dim: Color::DarkGray,
            housing: Color::Black,
            lamp_off: Color::Rgb(51, 51, 51),
            lamp_on: Color::Red,
        },
    }
}

/// Top-right region holding the theme toggle
pub fn theme_button_area(area: Rect) -> Rect {
    let width = THEME_BUTTON_WIDTH.min(area.width);
    Rect::new(
        area.x + area.width - width,
        area.y,
        width,
        area.height.min(1),
    )
}

pub fn hit(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

/// The button offers the theme you would switch to
fn theme_button_label(theme: Theme) -> &'static str {
    match theme {
        Theme::Dark => "[ Light ]",
        Theme::Light => "[ Dark ]",
    }
}

fn render_board(board: &Board, palette: &Palette, area: Rect, buf: &mut Buffer) {
    let columns = Layout::horizontal([Constraint::Length(COLUMN_WIDTH); COLUMNS])
        .spacing(COLUMN_GAP)
        .flex(Flex::Center)
        .split(area);

    for (idx, rect) in columns.iter().enumerate() {
        let housing = Block::bordered()
            .border_type(BorderType::Rounded)
            .style(Style::default().fg(palette.housing).bg(palette.background));
        let inner = housing.inner(*rect);
        housing.render(*rect, buf);

        for row in 0..LAMPS_PER_COLUMN {
            if row as u16 >= inner.height {
                break;
            }
            let lamp_color = if board.is_lamp_lit(idx + 1, row) {
                palette.lamp_on
            } else {
                palette.lamp_off
            };
            let lamp_area = Rect::new(inner.x, inner.y + row as u16, inner.width, 1);
            Paragraph::new(Span::styled(LAMP, Style::default().fg(lamp_color)))
                .alignment(Alignment::Center)
                .render(lamp_area, buf);
        }
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let palette = palette(self.theme);
        let board = self.game.renderer();

        let base_style = Style::default().fg(palette.text).bg(palette.background);
        let bold_style = base_style.add_modifier(Modifier::BOLD);
        let dim_style = Style::default().fg(palette.dim).bg(palette.background);

        Block::default().style(base_style).render(area, buf);

        let [_, _, board_row, _, message_row, _, timer_row, _, best_row, _, legend_row] =
            Layout::vertical([
                Constraint::Length(1), // theme button
                Constraint::Fill(1),
                Constraint::Length(BOARD_HEIGHT),
                Constraint::Length(1),
                Constraint::Length(1), // message
                Constraint::Length(1),
                Constraint::Length(1), // timer
                Constraint::Length(1),
                Constraint::Length(1), // best
                Constraint::Fill(1),
                Constraint::Length(1), // legend
            ])
            .areas(area);

        Paragraph::new(Span::styled(
            theme_button_label(self.theme),
            bold_style.add_modifier(Modifier::REVERSED),
        ))
        .alignment(Alignment::Right)
        .render(theme_button_area(area), buf);

        render_board(board, &palette, board_row, buf);

        Paragraph::new(Span::styled(board.message_text.as_str(), dim_style))
            .alignment(Alignment::Center)
            .render(message_row, buf);

        let timer_style = if board.timer_text == JUMP_START_TEXT {
            bold_style.fg(Color::Red)
        } else {
            bold_style
        };
        Paragraph::new(Span::styled(board.timer_text.as_str(), timer_style))
            .alignment(Alignment::Center)
            .render(timer_row, buf);

        Paragraph::new(Span::styled(
            format!("Your best: {}", board.best_time_text),
            base_style,
        ))
        .alignment(Alignment::Center)
        .render(best_row, buf);

        Paragraph::new(Span::styled(
            format!(
                "({}) react / (t)heme / (esc)ape",
                self.input.action_key().to_string().to_lowercase()
            ),
            dim_style.add_modifier(Modifier::ITALIC),
        ))
        .render(legend_row, buf);
    }
}
