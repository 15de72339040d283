//! Procedural sound effects and music.
//!
//! Like the sprites, audio ships no asset files: each cue is synthesized as
//! an in-memory 16-bit mono WAV and registered in `Assets<AudioSource>`.
//! Playback is fire-and-forget: no gameplay logic depends on a sound
//! finishing.  The background loop is the one exception: it carries a
//! [`MusicChannel`] marker so the collision engine can stop it on game-over.

use std::sync::Arc;

use bevy::audio::{AudioSource, Volume};
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::GameConfig;

/// Synthesis sample rate (Hz).
const SAMPLE_RATE: u32 = 44_100;

// ── Handle registry ───────────────────────────────────────────────────────────

/// Handles to every synthesized audio cue.
#[derive(Resource, Default)]
pub struct GameAudio {
    pub music: Handle<AudioSource>,
    pub laser: Handle<AudioSource>,
    pub explosion: Handle<AudioSource>,
}

/// Marker for the looping background-music entity.
#[derive(Component)]
pub struct MusicChannel;

/// Startup system: synthesize all cues, register them, and start the
/// background loop at its configured volume.
pub fn setup_audio(
    mut commands: Commands,
    mut sources: ResMut<Assets<AudioSource>>,
    config: Res<GameConfig>,
) {
    let music = sources.add(wav_source(&music_wave()));
    let laser = sources.add(wav_source(&laser_wave()));
    let explosion = sources.add(wav_source(&explosion_wave()));

    commands.spawn((
        AudioBundle {
            source: music.clone(),
            settings: PlaybackSettings::LOOP.with_volume(Volume::new(config.music_volume)),
        },
        MusicChannel,
    ));

    commands.insert_resource(GameAudio {
        music,
        laser,
        explosion,
    });
    info!("audio cues synthesized; background loop started");
}

/// Spawn a one-shot playback of `source` that despawns itself when done.
pub fn play_sound(commands: &mut Commands, source: Handle<AudioSource>, volume: f32) {
    commands.spawn(AudioBundle {
        source,
        settings: PlaybackSettings::DESPAWN.with_volume(Volume::new(volume)),
    });
}

// ── WAV encoding ──────────────────────────────────────────────────────────────

/// Wrap raw PCM samples in a canonical 44-byte RIFF/WAVE header.
pub fn wav_bytes(samples: &[i16], sample_rate: u32) -> Vec<u8> {
    let data_len = (samples.len() * 2) as u32;
    let mut out = Vec::with_capacity(44 + data_len as usize);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes()); // PCM chunk size
    out.extend_from_slice(&1u16.to_le_bytes()); // format: linear PCM
    out.extend_from_slice(&1u16.to_le_bytes()); // channels: mono
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&(sample_rate * 2).to_le_bytes()); // byte rate
    out.extend_from_slice(&2u16.to_le_bytes()); // block align
    out.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    for s in samples {
        out.extend_from_slice(&s.to_le_bytes());
    }
    out
}

fn wav_source(samples: &[i16]) -> AudioSource {
    AudioSource {
        bytes: Arc::from(wav_bytes(samples, SAMPLE_RATE)),
    }
}

// ── Synthesizers ──────────────────────────────────────────────────────────────

/// Laser: short square-wave chirp sweeping down from 1050 Hz to 260 Hz.
pub fn laser_wave() -> Vec<i16> {
    let len = (SAMPLE_RATE as f32 * 0.18) as usize;
    let mut phase = 0.0_f32;
    (0..len)
        .map(|i| {
            let t = i as f32 / len as f32;
            let freq = 1050.0 - 790.0 * t;
            phase = (phase + freq / SAMPLE_RATE as f32).fract();
            let square = if phase < 0.5 { 1.0 } else { -1.0 };
            (square * (1.0 - t) * 0.5 * i16::MAX as f32) as i16
        })
        .collect()
}

/// Explosion: low-passed noise burst with a quadratic decay tail.
pub fn explosion_wave() -> Vec<i16> {
    let len = (SAMPLE_RATE as f32 * 0.6) as usize;
    let mut rng = StdRng::seed_from_u64(0x4d45_5445_4f52); // stable across runs
    let mut smoothed = 0.0_f32;
    (0..len)
        .map(|i| {
            let t = i as f32 / len as f32;
            let noise: f32 = rng.gen_range(-1.0..1.0);
            // One-pole low-pass keeps the rumble and drops the hiss.
            smoothed += 0.18 * (noise - smoothed);
            let envelope = (1.0 - t) * (1.0 - t);
            (smoothed * envelope * 0.9 * i16::MAX as f32) as i16
        })
        .collect()
}

/// Background loop: a slow A-minor arpeggio, square lead over a sine sub.
pub fn music_wave() -> Vec<i16> {
    const NOTES: [f32; 8] = [110.0, 130.81, 164.81, 220.0, 164.81, 130.81, 146.83, 164.81];
    const NOTE_SECS: f32 = 0.3;

    let note_len = (SAMPLE_RATE as f32 * NOTE_SECS) as usize;
    let mut out = Vec::with_capacity(note_len * NOTES.len());
    for &freq in &NOTES {
        for i in 0..note_len {
            let t = i as f32 / SAMPLE_RATE as f32;
            let fade = 1.0 - (i as f32 / note_len as f32) * 0.35;
            let lead = if (t * freq).fract() < 0.5 { 0.22 } else { -0.22 };
            let sub = (std::f32::consts::TAU * freq / 2.0 * t).sin() * 0.28;
            out.push(((lead + sub) * fade * i16::MAX as f32) as i16);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wav_header_is_canonical_riff() {
        let bytes = wav_bytes(&[0, 1, -1], SAMPLE_RATE);
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(&bytes[12..16], b"fmt ");
        assert_eq!(&bytes[36..40], b"data");
        assert_eq!(bytes.len(), 44 + 3 * 2);
    }

    #[test]
    fn wav_data_length_matches_sample_count() {
        let samples = vec![42_i16; 1000];
        let bytes = wav_bytes(&samples, SAMPLE_RATE);
        let data_len = u32::from_le_bytes(bytes[40..44].try_into().unwrap());
        assert_eq!(data_len, 2000);
        let riff_len = u32::from_le_bytes(bytes[4..8].try_into().unwrap());
        assert_eq!(riff_len, 36 + 2000);
    }

    #[test]
    fn cues_are_non_silent_and_non_empty() {
        for (name, wave) in [
            ("laser", laser_wave()),
            ("explosion", explosion_wave()),
            ("music", music_wave()),
        ] {
            assert!(!wave.is_empty(), "{name} should have samples");
            assert!(
                wave.iter().any(|&s| s != 0),
                "{name} should not be pure silence"
            );
        }
    }

    #[test]
    fn laser_amplitude_decays_to_quiet() {
        let wave = laser_wave();
        let tail = &wave[wave.len() - 100..];
        assert!(
            tail.iter().all(|&s| s.unsigned_abs() < 3000),
            "chirp should fade out by the end"
        );
    }

    #[test]
    fn music_loop_covers_all_notes() {
        let wave = music_wave();
        let expected = (SAMPLE_RATE as f32 * 0.3) as usize * 8;
        assert_eq!(wave.len(), expected);
    }
}
