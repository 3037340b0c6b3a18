#![warn(clippy::all, clippy::pedantic)]

#[cfg(test)]
mod tests {
    use ratatui::style::Color;

    use crate::components::{
        GameState, PlayArea, Position, Shape, Target, TRIANGLE_COLOR, darken, parse_hex_color,
    };

    #[test]
    fn test_square_contains_whole_box() {
        assert!(Shape::Square.contains_unit(0.0, 0.0));
        assert!(Shape::Square.contains_unit(1.0, 1.0));
        assert!(!Shape::Square.contains_unit(1.1, 0.5));
        assert!(!Shape::Square.contains_unit(0.5, -0.1));
    }

    #[test]
    fn test_circle_excludes_corners() {
        assert!(Shape::Circle.contains_unit(0.5, 0.5));
        assert!(Shape::Circle.contains_unit(0.5, 0.01));
        assert!(!Shape::Circle.contains_unit(0.05, 0.05));
        assert!(!Shape::Circle.contains_unit(0.95, 0.95));
    }

    #[test]
    fn test_triangle_points_up() {
        assert!(Shape::Triangle.contains_unit(0.5, 0.1));
        assert!(Shape::Triangle.contains_unit(0.05, 0.95));
        assert!(!Shape::Triangle.contains_unit(0.1, 0.1));
        assert!(!Shape::Triangle.contains_unit(0.9, 0.3));
    }

    #[test]
    fn test_target_contains_uses_position() {
        let target = Target::new(Shape::Square, 40.0, None, 0);
        let position = Position { x: 100.0, y: 50.0 };

        assert!(target.contains(position, 120.0, 70.0));
        assert!(!target.contains(position, 90.0, 70.0));
        assert!(!target.contains(position, 120.0, 95.0));
    }

    #[test]
    fn test_random_targets() {
        for serial in 0..500 {
            let target = Target::random(serial);
            assert!(target.size >= 40.0 && target.size < 70.0);
            assert!(target.is_live());
            assert!(target.auto_miss.is_none());
            if target.shape == Shape::Triangle {
                assert_eq!(target.color, None);
                assert_eq!(target.fill_color(), TRIANGLE_COLOR);
            } else {
                assert!(matches!(target.color, Some(Color::Rgb(..))));
            }
        }
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ff6b6b"), Some(Color::Rgb(255, 107, 107)));
        assert_eq!(parse_hex_color("45b7d1"), Some(Color::Rgb(0x45, 0xb7, 0xd1)));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }

    #[test]
    fn test_darken() {
        // 20% of 255 is 51
        assert_eq!(darken(Color::Rgb(255, 107, 107), 20), Color::Rgb(204, 56, 56));
        assert_eq!(darken(Color::Rgb(30, 60, 90), 20), Color::Rgb(0, 9, 39));
        assert_eq!(darken(Color::Rgb(10, 20, 30), 0), Color::Rgb(10, 20, 30));
        assert_eq!(darken(Color::Red, 50), Color::Red);
    }

    #[test]
    fn test_edge_color_is_darker_fill() {
        let target = Target::new(Shape::Circle, 50.0, Some(Color::Rgb(0xf9, 0xca, 0x24)), 0);
        assert_eq!(target.edge_color(), Color::Rgb(198, 151, 0));
    }

    #[test]
    fn test_random_position_stays_inside() {
        let area = PlayArea {
            width: 200.0,
            height: 100.0,
        };
        for _ in 0..500 {
            let position = area.random_position(60.0);
            assert!(position.x >= 0.0 && position.x <= 140.0);
            assert!(position.y >= 0.0 && position.y <= 40.0);
        }

        // Target bigger than the area sticks to the corner
        let position = area.random_position(300.0);
        assert_eq!(position, Position { x: 0.0, y: 0.0 });
    }

    #[test]
    fn test_game_state_defaults() {
        let game_state = GameState::default();
        assert_eq!(game_state.score, 0);
        assert_eq!(game_state.level, 1);
        assert!((game_state.time_left() - 5.0).abs() < f32::EPSILON);
        assert!(!game_state.active);
        assert!(!game_state.paused);
        assert!(!game_state.is_running());
    }
}
