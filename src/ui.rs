use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::{
    display::WordFlow,
    session::{Outcome, WordLayout},
    App,
};

pub(crate) const HORIZONTAL_MARGIN: u16 = 5;
pub(crate) const VERTICAL_MARGIN: u16 = 1;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let display = &self.display;
        // styles
        let bold_style = Style::default().add_modifier(Modifier::BOLD);

        let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
        let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);

        let dim_bold_style = Style::default()
            .patch(bold_style)
            .add_modifier(Modifier::DIM);

        let underlined_bold_style = Style::default()
            .patch(bold_style)
            .add_modifier(Modifier::UNDERLINED);

        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // metrics header
                Constraint::Length(1), // hint
                Constraint::Length(1), // padding
                Constraint::Min(1),    // word panel
                Constraint::Length(1), // padding
                Constraint::Length(1), // input line
                Constraint::Length(1), // legend
            ])
            .split(area);

        let header = Paragraph::new(Span::styled(
            format!(
                "{} wpm   {} cpm   {}s",
                display.wpm_text, display.cpm_text, display.timer_text
            ),
            bold_style,
        ))
        .alignment(Alignment::Center);
        header.render(chunks[0], buf);

        let hint = Paragraph::new(Span::styled(display.hint, italic_style))
            .alignment(Alignment::Center);
        hint.render(chunks[1], buf);

        let words = self.session.words.words();
        let flow = WordFlow::new(words, chunks[3].width, display.zoom);
        let mut lines: Vec<Line> = Vec::new();
        for (row, group) in &words
            .iter()
            .enumerate()
            .chunk_by(|(idx, _)| flow.row_of(*idx).unwrap_or(0))
        {
            if row < display.scroll_rows {
                continue;
            }
            let mut spans: Vec<Span> = Vec::new();
            for (idx, word) in group {
                let style = match display.marks.get(idx).copied().flatten() {
                    Some(Outcome::Correct) => green_bold_style,
                    Some(Outcome::Incorrect) => red_bold_style,
                    None if idx == display.active => underlined_bold_style,
                    None => dim_bold_style,
                };
                spans.push(Span::styled(word.as_str(), style));
                spans.push(Span::raw(" "));
            }
            lines.push(Line::from(spans));
        }
        Paragraph::new(lines).render(chunks[3], buf);

        let input_line = Line::from(vec![
            Span::styled("> ", dim_bold_style),
            Span::styled(display.buffer.as_str(), bold_style),
        ]);
        Paragraph::new(input_line).render(chunks[5], buf);

        let legend = Paragraph::new(Span::styled(
            if self.session.has_finished() {
                "(r)estart / (esc)ape"
            } else {
                "(esc)ape"
            },
            italic_style,
        ));
        legend.render(chunks[6], buf);

        if let Some(score) = &display.final_score {
            let dialog_area = centered_rect(area, 70, 7);
            Clear.render(dialog_area, buf);
            let block = Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" time is up ", bold_style));
            let inner = block.inner(dialog_area);
            block.render(dialog_area, buf);

            let text = format!("{}\n\n(r)estart / (esc)ape", score.message_text);
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .render(inner, buf);
        }
    }
}

fn centered_rect(r: Rect, percent_x: u16, height: u16) -> Rect {
    let width = (r.width * percent_x / 100).max(1);
    let x = r.x + r.width.saturating_sub(width) / 2;
    let y = r.y + r.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height.min(r.height))
}
