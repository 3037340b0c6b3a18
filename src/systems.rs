#![warn(clippy::all, clippy::pedantic)]

use bevy_ecs::prelude::*;
use log::{debug, info, trace};

use crate::components::{
    GameState, GameTimers, PlayArea, Popup, Position, Screen, Target, TargetStatus,
};
use crate::events::{GameEvent, GameEvents};
use crate::game::{
    GET_READY_TEXT, HIT_BONUS_TENTHS, HIT_REMOVAL_DELAY_MS, LEVEL_POPUP_OFFSET, MAX_TIME_TENTHS,
    MISS_PENALTY_TENTHS, MISS_REMOVAL_DELAY_MS, POPUP_LIFETIME_MS, READY_DELAY_MS,
    TICK_INTERVAL_MS, TICK_TENTHS, auto_miss_delay_ms, level_ups_between, points_for_hit,
    spawn_delay_ms,
};
use crate::scheduler::{Scheduler, TimerHandle, TimerKind};
use crate::store::BestScore;

/// Inserts every resource the controller relies on.
pub fn init_resources(world: &mut World, best_score: BestScore, play_area: PlayArea) {
    world.insert_resource(GameState::default());
    world.insert_resource(Screen::default());
    world.insert_resource(Scheduler::new());
    world.insert_resource(GameEvents::default());
    world.insert_resource(best_score);
    world.insert_resource(play_area);
}

fn push_event(world: &mut World, event: GameEvent) {
    world.resource_mut::<GameEvents>().push(event);
}

fn set_screen(world: &mut World, screen: Screen) {
    *world.resource_mut::<Screen>() = screen;
}

fn cancel_timers(world: &mut World, timers: GameTimers) {
    let mut scheduler = world.resource_mut::<Scheduler>();
    for handle in [timers.ready, timers.countdown, timers.spawn]
        .into_iter()
        .flatten()
    {
        scheduler.cancel(handle);
    }
}

/// Resets everything and shows "Get Ready" until the main loop kicks in.
///
/// Any game in progress is thrown away, including its pending timers.
pub fn start_game(world: &mut World) {
    world.resource_mut::<Scheduler>().clear();
    despawn_targets(world);
    despawn_popups(world);

    let ready = world
        .resource_mut::<Scheduler>()
        .schedule_once(READY_DELAY_MS, TimerKind::ReadyElapsed);

    {
        let mut game_state = world.resource_mut::<GameState>();
        game_state.reset();
        game_state.active = true;
        game_state.instruction = Some(GET_READY_TEXT);
        game_state.timers.ready = Some(ready);
    }

    set_screen(world, Screen::Playing);
    push_event(world, GameEvent::Started);
    info!("Game started");
}

/// Starts the countdown ticker and the spawn loop.
pub fn begin_main_loop(world: &mut World) {
    let previous = {
        let game_state = world.resource::<GameState>();
        if !game_state.active {
            return;
        }
        game_state.timers.countdown
    };

    let countdown = {
        let mut scheduler = world.resource_mut::<Scheduler>();
        if let Some(handle) = previous {
            scheduler.cancel(handle);
        }
        scheduler.schedule_repeating(TICK_INTERVAL_MS, TimerKind::CountdownTick)
    };

    {
        let mut game_state = world.resource_mut::<GameState>();
        game_state.instruction = None;
        game_state.timers.ready = None;
        game_state.timers.countdown = Some(countdown);
    }

    debug!("Main loop running");
    spawn_target(world);
}

/// One 100ms countdown step. Does nothing while paused or inactive.
pub fn countdown_tick(world: &mut World) {
    let expired = {
        let mut game_state = world.resource_mut::<GameState>();
        if !game_state.is_running() {
            return;
        }
        game_state.time_left_tenths -= TICK_TENTHS;
        game_state.time_left_tenths <= 0
    };

    if expired {
        game_over(world);
    }
}

/// Runs one step of the spawn loop and re-arms it.
///
/// While paused the loop stays scheduled but creates nothing. Once the game
/// is inactive the loop stops.
pub fn spawn_target(world: &mut World) -> Option<Entity> {
    let (paused, level, serial, previous) = {
        let game_state = world.resource::<GameState>();
        if !game_state.active {
            return None;
        }
        (
            game_state.paused,
            game_state.level,
            game_state.spawned,
            game_state.timers.spawn,
        )
    };

    let next = {
        let mut scheduler = world.resource_mut::<Scheduler>();
        if let Some(handle) = previous {
            scheduler.cancel(handle);
        }
        scheduler.schedule_once(spawn_delay_ms(level), TimerKind::Spawn)
    };
    world.resource_mut::<GameState>().timers.spawn = Some(next);

    if paused {
        trace!("Spawn skipped while paused");
        return None;
    }

    let target = Target::random(serial);
    let position = world.resource::<PlayArea>().random_position(target.size);
    Some(place_target(world, target, position))
}

/// Puts `target` on the play area and arms its auto-miss timer.
pub fn place_target(world: &mut World, mut target: Target, position: Position) -> Entity {
    let level = {
        let mut game_state = world.resource_mut::<GameState>();
        target.serial = game_state.spawned;
        game_state.spawned += 1;
        game_state.level
    };

    let entity = world.spawn((target, position)).id();
    let auto_miss = world
        .resource_mut::<Scheduler>()
        .schedule_once(auto_miss_delay_ms(level), TimerKind::AutoMiss(entity));
    if let Some(mut target) = world.get_mut::<Target>(entity) {
        target.auto_miss = Some(auto_miss);
    }

    trace!("Spawned target {entity:?} at ({:.0}, {:.0})", position.x, position.y);
    push_event(world, GameEvent::TargetSpawned(entity));
    entity
}

/// Auto-miss timer fired for `entity`.
fn auto_miss_check(world: &mut World, entity: Entity) {
    match world.get::<Target>(entity) {
        Some(target) if target.is_live() => {}
        _ => return,
    }

    let (active, paused) = {
        let game_state = world.resource::<GameState>();
        (game_state.active, game_state.paused)
    };
    if !active {
        return;
    }

    if paused {
        // Check again one tick later so a paused player is never penalised
        let retry = world
            .resource_mut::<Scheduler>()
            .schedule_once(TICK_INTERVAL_MS, TimerKind::AutoMiss(entity));
        if let Some(mut target) = world.get_mut::<Target>(entity) {
            target.auto_miss = Some(retry);
        }
        return;
    }

    miss_target(world, entity);
}

/// Player hit `entity`. Returns `false` when the hit was ignored.
pub fn hit_target(world: &mut World, entity: Entity) -> bool {
    if !world.resource::<GameState>().is_running() {
        return false;
    }

    let auto_miss = {
        let Some(mut target) = world.get_mut::<Target>(entity) else {
            return false;
        };
        if !target.is_live() {
            return false;
        }
        target.status = TargetStatus::Hit;
        target.auto_miss.take()
    };
    if let Some(handle) = auto_miss {
        world.resource_mut::<Scheduler>().cancel(handle);
    }

    let (points, level, level_ups) = {
        let mut game_state = world.resource_mut::<GameState>();
        let points = points_for_hit(game_state.level);
        let before = game_state.score;
        game_state.score = game_state.score.saturating_add(points);
        game_state.time_left_tenths =
            (game_state.time_left_tenths + HIT_BONUS_TENTHS).min(MAX_TIME_TENTHS);
        let level_ups = level_ups_between(before, game_state.score);
        game_state.level += level_ups;
        game_state.hits += 1;
        (points, game_state.level, level_ups)
    };

    let position = world.get::<Position>(entity).copied();
    if let Some(position) = position {
        spawn_popup(world, format!("+{points}"), position);
        if level_ups > 0 {
            let above = Position {
                x: position.x,
                y: (position.y - LEVEL_POPUP_OFFSET).max(0.0),
            };
            spawn_popup(world, format!("LEVEL {level}!"), above);
        }
    }

    push_event(
        world,
        GameEvent::TargetHit {
            target: entity,
            points,
        },
    );
    if level_ups > 0 {
        info!("Level up: {level}");
        push_event(world, GameEvent::LevelUp(level));
    }

    world
        .resource_mut::<Scheduler>()
        .schedule_once(HIT_REMOVAL_DELAY_MS, TimerKind::RemoveTarget(entity));
    true
}

/// Target timed out. Returns `false` when it was already gone or resolved.
pub fn miss_target(world: &mut World, entity: Entity) -> bool {
    let auto_miss = {
        let Some(mut target) = world.get_mut::<Target>(entity) else {
            return false;
        };
        if !target.is_live() {
            return false;
        }
        target.status = TargetStatus::Missed;
        target.auto_miss.take()
    };

    {
        let mut scheduler = world.resource_mut::<Scheduler>();
        if let Some(handle) = auto_miss {
            scheduler.cancel(handle);
        }
        scheduler.schedule_once(MISS_REMOVAL_DELAY_MS, TimerKind::RemoveTarget(entity));
    }

    {
        let mut game_state = world.resource_mut::<GameState>();
        game_state.time_left_tenths -= MISS_PENALTY_TENTHS;
        game_state.misses += 1;
    }

    trace!("Target {entity:?} missed");
    push_event(world, GameEvent::TargetMissed(entity));
    true
}

/// Takes a resolved target off the play area.
pub fn remove_target(world: &mut World, entity: Entity) {
    let auto_miss = match world.get::<Target>(entity) {
        Some(target) => target.auto_miss,
        None => return,
    };
    if let Some(handle) = auto_miss {
        world.resource_mut::<Scheduler>().cancel(handle);
    }
    world.despawn(entity);
    push_event(world, GameEvent::TargetRemoved(entity));
}

fn spawn_popup(world: &mut World, text: String, position: Position) {
    let entity = world.spawn((Popup { text }, position)).id();
    world
        .resource_mut::<Scheduler>()
        .schedule_once(POPUP_LIFETIME_MS, TimerKind::RemovePopup(entity));
}

fn remove_popup(world: &mut World, entity: Entity) {
    if world.get::<Popup>(entity).is_some() {
        world.despawn(entity);
    }
}

/// Removes every target, cancelling their auto-miss timers.
pub fn despawn_targets(world: &mut World) {
    let targets: Vec<(Entity, Option<TimerHandle>)> = world
        .query::<(Entity, &Target)>()
        .iter(world)
        .map(|(entity, target)| (entity, target.auto_miss))
        .collect();

    for (entity, auto_miss) in targets {
        if let Some(handle) = auto_miss {
            world.resource_mut::<Scheduler>().cancel(handle);
        }
        world.despawn(entity);
    }
}

pub fn despawn_popups(world: &mut World) {
    let popups: Vec<Entity> = world
        .query_filtered::<Entity, With<Popup>>()
        .iter(world)
        .collect();
    for entity in popups {
        world.despawn(entity);
    }
}

/// Flips between playing and paused. Ignored when no game is running.
pub fn toggle_pause(world: &mut World) {
    let paused = {
        let mut game_state = world.resource_mut::<GameState>();
        if !game_state.active {
            return;
        }
        game_state.paused = !game_state.paused;
        game_state.paused
    };

    if paused {
        set_screen(world, Screen::Paused);
        push_event(world, GameEvent::Paused);
    } else {
        set_screen(world, Screen::Playing);
        push_event(world, GameEvent::Resumed);
    }
    debug!("Paused: {paused}");
}

/// Ends the game, clears the play area and settles the best score.
pub fn game_over(world: &mut World) {
    let (timers, score) = {
        let mut game_state = world.resource_mut::<GameState>();
        if !game_state.active {
            return;
        }
        game_state.active = false;
        game_state.paused = false;
        (std::mem::take(&mut game_state.timers), game_state.score)
    };

    cancel_timers(world, timers);
    despawn_targets(world);

    let new_record = world.resource_mut::<BestScore>().record(score);
    world.resource_mut::<GameState>().new_record = new_record;

    set_screen(world, Screen::GameOver);
    push_event(world, GameEvent::GameOver { score, new_record });
    info!("Game over: score {score}, new record: {new_record}");
}

/// Abandons any game and returns to the start screen.
pub fn show_menu(world: &mut World) {
    if *world.resource::<Screen>() == Screen::Start {
        return;
    }

    let timers = {
        let mut game_state = world.resource_mut::<GameState>();
        game_state.active = false;
        game_state.paused = false;
        game_state.instruction = None;
        std::mem::take(&mut game_state.timers)
    };

    cancel_timers(world, timers);
    despawn_targets(world);
    despawn_popups(world);

    set_screen(world, Screen::Start);
    push_event(world, GameEvent::Menu);
    debug!("Returned to menu");
}

/// Topmost live target under the point, in play-area coordinates.
#[must_use]
pub fn target_at(world: &mut World, x: f32, y: f32) -> Option<Entity> {
    world
        .query::<(Entity, &Target, &Position)>()
        .iter(world)
        .filter(|(_, target, position)| target.is_live() && target.contains(**position, x, y))
        .max_by_key(|(_, target, _)| target.serial)
        .map(|(entity, _, _)| entity)
}

/// Click at a play-area point. Returns whether it landed a hit.
pub fn click_at(world: &mut World, x: f32, y: f32) -> bool {
    match target_at(world, x, y) {
        Some(entity) => hit_target(world, entity),
        None => false,
    }
}

fn dispatch_timer(world: &mut World, kind: TimerKind) {
    match kind {
        TimerKind::ReadyElapsed => begin_main_loop(world),
        TimerKind::CountdownTick => countdown_tick(world),
        TimerKind::Spawn => {
            spawn_target(world);
        }
        TimerKind::AutoMiss(entity) => auto_miss_check(world, entity),
        TimerKind::RemoveTarget(entity) => remove_target(world, entity),
        TimerKind::RemovePopup(entity) => remove_popup(world, entity),
    }
}

/// Advances the game clock by `elapsed_ms`, firing every timer that comes due.
pub fn run_timers(world: &mut World, elapsed_ms: u64) {
    let until = world
        .resource::<Scheduler>()
        .now_ms()
        .saturating_add(elapsed_ms);

    loop {
        let next = world.resource_mut::<Scheduler>().pop_due(until);
        let Some((_, kind)) = next else {
            break;
        };
        dispatch_timer(world, kind);
    }

    world.resource_mut::<Scheduler>().advance_to(until);
}
