use rand::Rng;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Block;
use ratatui::Frame;

use crate::config::{Theme, TERMINAL_TILE};
use crate::grid::{GridSize, Viewport};
use crate::round::{RoundController, RoundState, RoundStatus};
use crate::snake::Position;
use crate::ui::hud::{hud_layout, render_hud, HudStats};
use crate::ui::menu::{render_game_over_menu, render_pause_menu, render_start_menu};

const GLYPH_SEGMENT: &str = "██";

/// Renders the full game frame from immutable state.
pub fn render<R: Rng>(frame: &mut Frame<'_>, controller: &RoundController<R>, theme: &Theme) {
    let area = frame.area();
    let state = controller.state();
    let play_area = render_hud(frame, area, HudStats::from(state), theme);

    let block = Block::bordered().border_style(Style::new().fg(theme.border_fg).bg(theme.play_bg));
    let inner = block.inner(play_area);
    frame.render_widget(block, play_area);

    render_items(frame, inner, state, controller.bounds(), theme);
    render_snake(frame, inner, state, controller.bounds(), theme);

    match controller.status() {
        RoundStatus::NotStarted => render_start_menu(frame, play_area, theme),
        RoundStatus::Paused => render_pause_menu(frame, play_area),
        RoundStatus::GameOver => {
            render_game_over_menu(frame, play_area, state.score, state.end_cause);
        }
        RoundStatus::Running => {}
    }
}

/// Computes the grid that fits inside the bordered play area of `area`.
#[must_use]
pub fn grid_for_area(area: Rect) -> GridSize {
    let [play_area, _] = hud_layout(area);
    let inner = Block::bordered().inner(play_area);
    GridSize::from_viewport(
        Viewport {
            width: inner.width,
            height: inner.height,
        },
        TERMINAL_TILE,
    )
}

fn render_items(
    frame: &mut Frame<'_>,
    inner: Rect,
    state: &RoundState,
    bounds: GridSize,
    theme: &Theme,
) {
    let style = Style::new()
        .fg(theme.item_fg)
        .bg(theme.item_bg)
        .add_modifier(Modifier::BOLD);

    let buffer = frame.buffer_mut();
    for item in state.items.iter() {
        let Some((x, y)) = logical_to_terminal(inner, bounds, item.position) else {
            continue;
        };
        buffer.set_string(x, y, format!("{:>2}", item.value), style);
    }
}

fn render_snake(
    frame: &mut Frame<'_>,
    inner: Rect,
    state: &RoundState,
    bounds: GridSize,
    theme: &Theme,
) {
    let head = state.snake.head();

    let buffer = frame.buffer_mut();
    for segment in state.snake.segments() {
        let Some((x, y)) = logical_to_terminal(inner, bounds, *segment) else {
            continue;
        };

        let color = if Some(*segment) == head {
            theme.snake_head
        } else {
            theme.snake_body
        };
        buffer.set_string(x, y, GLYPH_SEGMENT, Style::new().fg(color));
    }
}

fn logical_to_terminal(inner: Rect, bounds: GridSize, position: Position) -> Option<(u16, u16)> {
    if !position.is_within_bounds(bounds) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?.checked_mul(TERMINAL_TILE.width)?;
    let y_offset = u16::try_from(position.y).ok()?.checked_mul(TERMINAL_TILE.height)?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(TERMINAL_TILE.width) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;
    use ratatui::Terminal;

    use crate::config::{GameConfig, THEME_ARCADE};
    use crate::grid::GridSize;
    use crate::items::{Item, ItemSet};
    use crate::round::RoundController;
    use crate::snake::Position;

    use super::{grid_for_area, logical_to_terminal, render};

    #[test]
    fn grid_fits_inside_border_and_hud() {
        let grid = grid_for_area(Rect::new(0, 0, 42, 20));

        // 40 inner columns in 2-wide tiles, 20 rows minus HUD and border.
        assert_eq!(
            grid,
            GridSize {
                width: 20,
                height: 17,
            }
        );
    }

    #[test]
    fn cells_map_to_two_column_tiles() {
        let inner = Rect::new(1, 1, 10, 5);
        let bounds = GridSize {
            width: 5,
            height: 5,
        };

        assert_eq!(
            logical_to_terminal(inner, bounds, Position { x: 2, y: 3 }),
            Some((5, 4))
        );
        assert_eq!(
            logical_to_terminal(inner, bounds, Position { x: 5, y: 0 }),
            None
        );
    }

    #[test]
    fn frame_shows_hud_and_items() {
        let area = Rect::new(0, 0, 42, 20);
        let bounds = grid_for_area(area);
        let mut controller = RoundController::with_seed(GameConfig::default(), bounds, 2);
        controller.start_round();
        controller.state_mut().items = ItemSet::new();
        controller
            .state_mut()
            .items
            .place(Item::new(Position { x: 1, y: 1 }, 10));

        let mut terminal =
            Terminal::new(TestBackend::new(area.width, area.height)).expect("test terminal");
        terminal
            .draw(|frame| render(frame, &controller, &THEME_ARCADE))
            .expect("draw should succeed");

        let buffer = terminal.backend().buffer();
        let hud_row: String = (0..area.width)
            .map(|x| buffer[(x, area.height - 1)].symbol().to_owned())
            .collect();

        assert!(hud_row.contains("Score: 0"));
        assert!(hud_row.contains("Length: 5"));
        // Inner area starts at (1, 1); item cell (1, 1) spans columns 3 and 4.
        assert_eq!(buffer[(3, 2)].symbol(), "1");
        assert_eq!(buffer[(4, 2)].symbol(), "0");
    }
}
