#![warn(clippy::all, clippy::pedantic)]

#[cfg(test)]
mod tests {
    use crate::app::{App, Button};
    use crate::components::{GameState, PlayArea};
    use crate::systems;
    use crate::tests::test_utils::{place_square, start_quiet};
    use crate::ui::{self, Viewport, centered_rect};
    use ratatui::{backend::TestBackend, buffer::Cell, layout::Rect, prelude::*};

    // Helper function to create a test terminal
    fn create_test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
        let backend = TestBackend::new(width, height);
        Terminal::new(backend).unwrap()
    }

    fn render(app: &mut App, width: u16, height: u16) -> Vec<Cell> {
        let mut terminal = create_test_terminal(width, height);
        terminal.draw(|f| ui::render(f, app)).unwrap();
        terminal.backend().buffer().content().to_vec()
    }

    fn text(cells: &[Cell]) -> String {
        cells.iter().map(Cell::symbol).collect()
    }

    fn has_button(app: &App, wanted: Button) -> bool {
        app.buttons.iter().any(|(_, button)| *button == wanted)
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 100);
        let centered = centered_rect(50, 40, area);

        assert_eq!(centered.width, 50);
        assert_eq!(centered.height, 40);
        assert_eq!(centered.x, 25);
        assert_eq!(centered.y, 30);
    }

    #[test]
    fn test_viewport_to_logical() {
        let viewport = Viewport::new(Rect::new(1, 1, 80, 24), PlayArea::default());

        assert_eq!(viewport.cell_size(), (10.0, 20.0));
        assert_eq!(viewport.to_logical(1, 1), Some((5.0, 10.0)));
        assert_eq!(viewport.to_logical(80, 24), Some((795.0, 470.0)));
        assert_eq!(viewport.to_logical(0, 0), None);
        assert_eq!(viewport.to_logical(81, 5), None);
    }

    #[test]
    fn test_viewport_to_cell_clamps() {
        let viewport = Viewport::new(Rect::new(1, 1, 80, 24), PlayArea::default());

        assert_eq!(viewport.to_cell(0.0, 0.0), (1, 1));
        assert_eq!(viewport.to_cell(795.0, 475.0), (80, 24));
        assert_eq!(viewport.to_cell(-50.0, -50.0), (1, 1));
        assert_eq!(viewport.to_cell(5000.0, 5000.0), (80, 24));
    }

    #[test]
    fn test_render_start_screen() {
        let mut app = App::default();
        let cells = render(&mut app, 100, 40);
        let screen = text(&cells);

        assert!(screen.contains("REACTION SPEED"));
        assert!(screen.contains("Best: 0"));
        assert!(has_button(&app, Button::Start));
        assert!(app.viewport.is_none());
    }

    #[test]
    fn test_render_get_ready() {
        let mut app = App::default();
        systems::start_game(&mut app.world);
        let screen = text(&render(&mut app, 100, 40));

        assert!(screen.contains("Get Ready..."));
        assert!(screen.contains("Time: 5.0"));
    }

    #[test]
    fn test_render_game_screen() {
        let mut app = App::default();
        start_quiet(&mut app.world);
        place_square(&mut app.world, 100.0, 100.0);

        let screen = text(&render(&mut app, 100, 40));

        assert!(screen.contains("Score: 0"));
        assert!(screen.contains("Level: 1"));
        assert!(screen.contains("Time: 5.0"));
        assert!(screen.contains('█'));
        assert!(has_button(&app, Button::Pause));
        assert!(app.viewport.is_some());
    }

    #[test]
    fn test_timer_turns_red_when_low() {
        let mut app = App::default();
        start_quiet(&mut app.world);
        app.world.resource_mut::<GameState>().time_left_tenths = 10;

        let cells = render(&mut app, 100, 40);
        let start = cells
            .windows(3)
            .position(|w| w[0].symbol() == "1" && w[1].symbol() == "." && w[2].symbol() == "0")
            .expect("time should be drawn");
        assert_eq!(cells[start].fg, Color::Red);

        app.world.resource_mut::<GameState>().time_left_tenths = 11;
        let cells = render(&mut app, 100, 40);
        let start = cells
            .windows(3)
            .position(|w| w[0].symbol() == "1" && w[1].symbol() == "." && w[2].symbol() == "1")
            .expect("time should be drawn");
        assert_ne!(cells[start].fg, Color::Red);
    }

    #[test]
    fn test_render_pause_overlay() {
        let mut app = App::default();
        start_quiet(&mut app.world);
        systems::toggle_pause(&mut app.world);

        let screen = text(&render(&mut app, 100, 40));

        assert!(screen.contains("PAUSED"));
        assert!(has_button(&app, Button::Resume));
        assert!(has_button(&app, Button::Menu));
        assert!(!has_button(&app, Button::Pause));
        // Clicks must not reach targets under the overlay
        assert!(app.viewport.is_none());
    }

    #[test]
    fn test_render_game_over() {
        let mut app = App::default();
        start_quiet(&mut app.world);
        {
            let mut game_state = app.world.resource_mut::<GameState>();
            game_state.score = 30;
            game_state.hits = 3;
            game_state.misses = 2;
        }
        systems::game_over(&mut app.world);

        let screen = text(&render(&mut app, 100, 40));

        assert!(screen.contains("GAME OVER"));
        assert!(screen.contains("Final score: 30"));
        assert!(screen.contains("Best: 30"));
        assert!(screen.contains("Hits: 3   Misses: 2"));
        assert!(screen.contains("NEW RECORD!"));
        assert!(has_button(&app, Button::Restart));
        assert!(has_button(&app, Button::Menu));
    }

    #[test]
    fn test_game_over_without_record() {
        let mut app = App::default();
        start_quiet(&mut app.world);
        systems::game_over(&mut app.world);

        let screen = text(&render(&mut app, 100, 40));

        assert!(screen.contains("Final score: 0"));
        assert!(!screen.contains("NEW RECORD!"));
    }

    #[test]
    fn test_terminal_too_small() {
        let mut app = App::default();
        start_quiet(&mut app.world);

        let screen = text(&render(&mut app, 30, 10));

        assert!(screen.contains("Terminal too small!"));
        assert!(app.buttons.is_empty());
        assert!(app.viewport.is_none());
    }
}
