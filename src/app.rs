#![warn(clippy::all, clippy::pedantic)]

use bevy_ecs::prelude::*;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use log::{debug, trace};
use ratatui::layout::Rect;
use std::error;

use crate::components::{GameState, PlayArea, Screen};
use crate::config::Config;
use crate::events::GameEvents;
use crate::sound::{AudioState, sound_for_event};
use crate::store::{BestScore, MemoryStore};
use crate::systems;
use crate::ui::Viewport;

pub type AppResult<T> = std::result::Result<T, Box<dyn error::Error>>;

const VOLUME_STEP: f32 = 0.1;

/// Clickable controls drawn by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Start,
    Restart,
    Menu,
    Pause,
    Resume,
}

impl Button {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Button::Start => "Start",
            Button::Restart => "Play Again",
            Button::Menu => "Menu",
            Button::Pause => "Pause",
            Button::Resume => "Resume",
        }
    }
}

pub struct App {
    pub world: World,
    pub should_quit: bool,
    // Filled in by the renderer each frame
    pub buttons: Vec<(Rect, Button)>,
    pub viewport: Option<Viewport>,
}

impl App {
    pub fn new(best_score: BestScore, play_area: PlayArea, audio: AudioState) -> Self {
        let mut world = World::new();
        systems::init_resources(&mut world, best_score, play_area);
        world.insert_resource(audio);

        Self {
            world,
            should_quit: false,
            buttons: Vec::new(),
            viewport: None,
        }
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        *self.world.resource::<Screen>()
    }

    #[must_use]
    pub fn game_state(&self) -> &GameState {
        self.world.resource::<GameState>()
    }

    #[must_use]
    pub fn best_score(&self) -> u32 {
        self.world.resource::<BestScore>().value()
    }

    /// Advances timers by `elapsed_ms` and plays sounds for whatever happened.
    pub fn on_tick(&mut self, elapsed_ms: u64) {
        systems::run_timers(&mut self.world, elapsed_ms);
        self.dispatch_events();
    }

    fn dispatch_events(&mut self) {
        let events = self.world.resource_mut::<GameEvents>().drain();
        let audio = self.world.resource::<AudioState>();
        for event in &events {
            trace!("Event: {event:?}");
            if let Some(effect) = sound_for_event(event) {
                audio.play_sound(effect);
            }
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        debug!("Key event: {key:?}");

        let active = self.game_state().active;
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char(' ') if !active => systems::start_game(&mut self.world),
            KeyCode::Esc if active => systems::toggle_pause(&mut self.world),
            KeyCode::Char('m') if matches!(self.screen(), Screen::Paused | Screen::GameOver) => {
                systems::show_menu(&mut self.world);
            }
            KeyCode::Char('s') => self.toggle_sound(),
            KeyCode::Char('+' | '=') => self.change_volume(VOLUME_STEP),
            KeyCode::Char('-') => self.change_volume(-VOLUME_STEP),
            _ => {}
        }
    }

    // Sound settings are mirrored into the config so they are saved on exit
    fn toggle_sound(&mut self) {
        let mut audio_state = self.world.resource_mut::<AudioState>();
        audio_state.toggle_sound();
        let enabled = audio_state.is_sound_enabled();
        Config::update(|config| config.audio.sound_enabled = enabled);
        debug!("Sound enabled: {enabled}");
    }

    fn change_volume(&mut self, step: f32) {
        let mut audio_state = self.world.resource_mut::<AudioState>();
        let volume = audio_state.get_volume() + step;
        audio_state.set_volume(volume);
        let volume = audio_state.get_volume();
        Config::update(|config| config.audio.volume = volume);
        debug!("Volume: {volume:.1}");
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let (column, row) = (mouse.column, mouse.row);

        let pressed = self
            .buttons
            .iter()
            .find(|(area, _)| rect_contains(*area, column, row))
            .map(|(_, button)| *button);
        if let Some(button) = pressed {
            self.press_button(button);
            return;
        }

        if self.screen() != Screen::Playing {
            return;
        }
        if let Some((x, y)) = self.viewport.and_then(|v| v.to_logical(column, row)) {
            systems::click_at(&mut self.world, x, y);
        }
    }

    pub fn press_button(&mut self, button: Button) {
        debug!("Button pressed: {button:?}");
        match button {
            Button::Start | Button::Restart => systems::start_game(&mut self.world),
            Button::Menu => systems::show_menu(&mut self.world),
            Button::Pause | Button::Resume => systems::toggle_pause(&mut self.world),
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(
            BestScore::load(Box::new(MemoryStore::new())),
            PlayArea::default(),
            AudioState::silent(),
        )
    }
}

#[must_use]
pub fn rect_contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}
