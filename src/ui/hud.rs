use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::config::Theme;
use crate::round::RoundState;

const HUD_MARGIN_X: u16 = 1;
const SEPARATOR: &str = " │ ";

/// Values shown in the HUD row.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct HudStats {
    pub score: u32,
    pub speed: u32,
    pub length: usize,
}

impl From<&RoundState> for HudStats {
    fn from(state: &RoundState) -> Self {
        Self {
            score: state.score,
            speed: state.speed,
            length: state.length(),
        }
    }
}

/// Splits `area` into the play area and a one-line HUD below it, renders the
/// HUD, and returns the play area.
#[must_use]
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, stats: HudStats, theme: &Theme) -> Rect {
    let [play_area, hud_area] = hud_layout(area);
    let hud_area = inset_horizontal(hud_area, HUD_MARGIN_X);

    frame.render_widget(
        Paragraph::new(info_line(stats, usize::from(hud_area.width), theme))
            .alignment(Alignment::Right),
        hud_area,
    );

    play_area
}

/// Returns `[play_area, hud_row]` for a full-frame `area`.
#[must_use]
pub fn hud_layout(area: Rect) -> [Rect; 2] {
    Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area)
}

fn info_line(stats: HudStats, available_width: usize, theme: &Theme) -> Line<'static> {
    let score = stats.score.to_string();
    let speed = stats.speed.to_string();
    let length = stats.length.to_string();

    let full = [("Score", score), ("Speed", speed), ("Length", length)];
    let labels: [&str; 3] = if line_width(&full) <= available_width {
        ["Score", "Speed", "Length"]
    } else {
        ["S", "V", "L"]
    };

    let label_style = Style::default().fg(theme.hud_label);
    let value_style = Style::default()
        .fg(theme.hud_value)
        .add_modifier(Modifier::BOLD);

    let mut spans = Vec::with_capacity(full.len() * 3);
    for (index, ((_, value), label)) in full.into_iter().zip(labels).enumerate() {
        if index > 0 {
            spans.push(Span::styled(SEPARATOR, label_style));
        }
        spans.push(Span::styled(format!("{label}: "), label_style));
        spans.push(Span::styled(value, value_style));
    }

    Line::from(spans)
}

fn line_width(fields: &[(&str, String)]) -> usize {
    let separators = SEPARATOR.width() * fields.len().saturating_sub(1);
    fields
        .iter()
        .map(|(label, value)| label.width() + 2 + value.width())
        .sum::<usize>()
        + separators
}

fn inset_horizontal(area: Rect, margin: u16) -> Rect {
    let total_margin = margin.saturating_mul(2);
    Rect {
        x: area.x.saturating_add(margin),
        y: area.y,
        width: area.width.saturating_sub(total_margin),
        height: area.height,
    }
}

#[cfg(test)]
mod tests {
    use ratatui::layout::Rect;

    use crate::config::THEME_ARCADE;

    use super::{hud_layout, info_line, line_width, HudStats};

    #[test]
    fn hud_takes_bottom_row() {
        let [play, hud] = hud_layout(Rect::new(0, 0, 40, 20));

        assert_eq!(play, Rect::new(0, 0, 40, 19));
        assert_eq!(hud, Rect::new(0, 19, 40, 1));
    }

    #[test]
    fn separator_counts_as_three_columns() {
        let width = line_width(&[("Score", "12".to_owned()), ("Speed", "6".to_owned())]);

        // "Score: 12" + " │ " + "Speed: 6"
        assert_eq!(width, 9 + 3 + 8);
    }

    #[test]
    fn narrow_hud_falls_back_to_short_labels() {
        let stats = HudStats {
            score: 120,
            speed: 9,
            length: 42,
        };

        let wide: String = info_line(stats, 80, &THEME_ARCADE)
            .spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect();
        let narrow: String = info_line(stats, 20, &THEME_ARCADE)
            .spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect();

        assert_eq!(wide, "Score: 120 │ Speed: 9 │ Length: 42");
        assert_eq!(narrow, "S: 120 │ V: 9 │ L: 42");
    }
}
