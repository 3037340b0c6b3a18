use anyhow::Result;
use bevy_ecs::prelude::Resource;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample};
use crossbeam_channel::{Receiver, Sender, bounded};
use fundsp::hacker32::*;
use log::{debug, error};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crate::config::AudioConfig;
use crate::events::GameEvent;

// Sound effects types that can be played
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    Spawn,
    Hit,
    Miss,
    LevelUp,
    Pause,
    GameOver,
    NewRecord,
}

impl SoundEffect {
    /// Seconds the effect keeps a voice busy.
    #[must_use]
    pub fn duration(self) -> f64 {
        match self {
            SoundEffect::Spawn => 0.05,
            SoundEffect::Hit | SoundEffect::Miss | SoundEffect::Pause => 0.2,
            SoundEffect::LevelUp | SoundEffect::NewRecord => 1.0,
            SoundEffect::GameOver => 2.0,
        }
    }
}

/// Which effect, if any, accompanies a game event.
#[must_use]
pub fn sound_for_event(event: &GameEvent) -> Option<SoundEffect> {
    match event {
        GameEvent::TargetSpawned(_) => Some(SoundEffect::Spawn),
        GameEvent::TargetHit { .. } => Some(SoundEffect::Hit),
        GameEvent::TargetMissed(_) => Some(SoundEffect::Miss),
        GameEvent::LevelUp(_) => Some(SoundEffect::LevelUp),
        GameEvent::Paused | GameEvent::Resumed => Some(SoundEffect::Pause),
        GameEvent::GameOver { new_record, .. } => Some(if *new_record {
            SoundEffect::NewRecord
        } else {
            SoundEffect::GameOver
        }),
        GameEvent::Started | GameEvent::TargetRemoved(_) | GameEvent::Menu => None,
    }
}

// Command to control the audio thread
enum AudioCommand {
    PlaySound(SoundEffect),
    SetVolume(f32), // 0.0 to 1.0
}

#[derive(Resource)]
pub struct AudioState {
    sender: Option<Sender<AudioCommand>>,
    available: Arc<AtomicBool>,
    sound_enabled: bool,
    volume: f32,
}

impl AudioState {
    /// Starts the audio thread. Without an output device the game stays silent.
    pub fn new(volume: f32) -> Self {
        let (sender, receiver) = bounded(64);
        let available = Arc::new(AtomicBool::new(true));
        let volume = volume.clamp(0.0, 1.0);

        let thread_available = Arc::clone(&available);
        thread::spawn(move || {
            if let Err(e) = run_audio_thread(receiver, volume) {
                error!("Audio thread error: {e}");
            }
            thread_available.store(false, Ordering::Relaxed);
        });

        Self {
            sender: Some(sender),
            available,
            sound_enabled: true,
            volume,
        }
    }

    /// No audio thread at all.
    #[must_use]
    pub fn silent() -> Self {
        Self {
            sender: None,
            available: Arc::new(AtomicBool::new(false)),
            sound_enabled: false,
            volume: 0.0,
        }
    }

    /// The audio thread always starts so sound can be switched on mid-game.
    #[must_use]
    pub fn from_config(config: &AudioConfig) -> Self {
        let mut audio_state = Self::new(config.volume);
        if !config.sound_enabled {
            debug!("Sound disabled by configuration");
            audio_state.sound_enabled = false;
        }
        audio_state
    }

    pub fn play_sound(&self, effect: SoundEffect) -> bool {
        if !self.sound_enabled {
            return false;
        }
        if let Some(sender) = &self.sender {
            let _ = sender.try_send(AudioCommand::PlaySound(effect));
        }
        true
    }

    pub fn is_sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn is_audio_available(&self) -> bool {
        self.sender.is_some() && self.available.load(Ordering::Relaxed)
    }

    pub fn toggle_sound(&mut self) {
        self.sound_enabled = !self.sound_enabled;
    }

    pub fn get_volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        // Clamp volume between 0.0 and 1.0
        self.volume = volume.clamp(0.0, 1.0);

        if let Some(sender) = &self.sender {
            let _ = sender.try_send(AudioCommand::SetVolume(self.volume));
        }
    }
}

fn run_audio_thread(receiver: Receiver<AudioCommand>, initial_volume: f32) -> Result<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| anyhow::anyhow!("No audio output device found"))?;
    let config = device.default_output_config()?;

    let (sound_sender, sound_receiver) = bounded::<SoundEffect>(64);
    let (volume_sender, volume_receiver) = bounded::<f32>(16);

    let _stream = match config.sample_format() {
        cpal::SampleFormat::F32 => run_audio_stream::<f32>(
            &device,
            &config.into(),
            sound_receiver,
            volume_receiver,
            initial_volume,
        )?,
        cpal::SampleFormat::I16 => run_audio_stream::<i16>(
            &device,
            &config.into(),
            sound_receiver,
            volume_receiver,
            initial_volume,
        )?,
        cpal::SampleFormat::U16 => run_audio_stream::<u16>(
            &device,
            &config.into(),
            sound_receiver,
            volume_receiver,
            initial_volume,
        )?,
        _ => return Err(anyhow::anyhow!("Unsupported audio format")),
    };

    // Keep the thread (and the stream) alive until the game drops its sender
    while let Ok(command) = receiver.recv() {
        match command {
            AudioCommand::PlaySound(effect) => {
                let _ = sound_sender.try_send(effect);
            }
            AudioCommand::SetVolume(volume) => {
                let _ = volume_sender.try_send(volume);
            }
        }
    }

    Ok(())
}

fn run_audio_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    sound_receiver: Receiver<SoundEffect>,
    volume_receiver: Receiver<f32>,
    initial_volume: f32,
) -> Result<cpal::Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let sample_rate = f64::from(config.sample_rate.0);
    let channels = config.channels as usize;
    let mut volume = initial_volume;

    // Playing effects and their remaining time in seconds
    let mut voices: Vec<(Box<dyn AudioUnit>, f64)> = Vec::new();

    let mut next_value = move || {
        while let Ok(new_volume) = volume_receiver.try_recv() {
            volume = new_volume;
        }

        while let Ok(effect) = sound_receiver.try_recv() {
            let mut unit = create_sound_effect(effect);
            unit.set_sample_rate(sample_rate);
            voices.push((unit, effect.duration()));
        }

        let mut left = 0.0f32;
        let mut right = 0.0f32;
        for (unit, remaining) in &mut voices {
            let (l, r) = unit.get_stereo();
            left += l;
            right += r;
            *remaining -= 1.0 / sample_rate;
        }
        voices.retain(|(_, remaining)| *remaining > 0.0);

        (
            (left * volume).clamp(-1.0, 1.0),
            (right * volume).clamp(-1.0, 1.0),
        )
    };

    let err_fn = |err| error!("Error in audio stream: {err}");

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            for frame in data.chunks_mut(channels) {
                let sample = next_value();
                let left = T::from_sample(sample.0);
                let right = T::from_sample(sample.1);

                for (channel, sample) in frame.iter_mut().enumerate() {
                    if channel & 1 == 0 {
                        *sample = left;
                    } else {
                        *sample = right;
                    }
                }
            }
        },
        err_fn,
        None,
    )?;

    stream.play()?;

    Ok(stream)
}

// Short high blip when a target appears
fn create_spawn_blip() -> Box<dyn AudioUnit> {
    Box::new(sine_hz(660.0) * envelope(|t| if t < 0.03 { 1.0 } else { 0.0 }) * 0.1 >> pan(0.0))
}

// Bright ping with a fast decay
fn create_hit() -> Box<dyn AudioUnit> {
    Box::new(sine_hz(880.0) * envelope(|t| (0.15 - t).max(0.0) * 6.0) * 0.3 >> pan(0.0))
}

// Low buzz for a missed target
fn create_miss() -> Box<dyn AudioUnit> {
    Box::new(sine_hz(110.0) * envelope(|t| if t < 0.15 { 1.0 } else { 0.0 }) * 0.3 >> pan(-0.2))
}

fn create_pause_click() -> Box<dyn AudioUnit> {
    Box::new(sine_hz(440.0) * envelope(|t| if t < 0.05 { 1.0 } else { 0.0 }) * 0.2 >> pan(0.0))
}

// Ascending arpeggio
fn create_level_up() -> Box<dyn AudioUnit> {
    let note = |freq, t_start, t_end| {
        let env = envelope(move |t| if t >= t_start && t < t_end { 1.0 } else { 0.0 });
        sine_hz(freq) * env
    };

    let node = (note(330.0, 0.0, 0.2)
        + note(392.0, 0.2, 0.4)
        + note(494.0, 0.4, 0.6)
        + note(659.0, 0.6, 1.0))
        * 0.3;
    Box::new(node >> pan(0.0))
}

// Descending pitch
fn create_game_over() -> Box<dyn AudioUnit> {
    let sweep = envelope(|t| lerp11(600.0, 200.0, t)) >> sine();

    let node = sweep * envelope(|t| (2.0 - t).max(0.0) * 0.5) * 0.4;
    Box::new(node >> pan(0.0))
}

// Four-note fanfare
fn create_new_record() -> Box<dyn AudioUnit> {
    let note = |freq, t_start, t_end| {
        let env = envelope(move |t| if t >= t_start && t < t_end { 0.4 } else { 0.0 });
        sine_hz(freq) * env
    };

    let node = (note(440.0, 0.0, 0.25)
        + note(554.0, 0.25, 0.5)
        + note(659.0, 0.5, 0.75)
        + note(880.0, 0.75, 1.0))
        * 0.4;
    Box::new(node >> pan(0.0))
}

fn create_sound_effect(effect: SoundEffect) -> Box<dyn AudioUnit> {
    match effect {
        SoundEffect::Spawn => create_spawn_blip(),
        SoundEffect::Hit => create_hit(),
        SoundEffect::Miss => create_miss(),
        SoundEffect::Pause => create_pause_click(),
        SoundEffect::LevelUp => create_level_up(),
        SoundEffect::GameOver => create_game_over(),
        SoundEffect::NewRecord => create_new_record(),
    }
}
