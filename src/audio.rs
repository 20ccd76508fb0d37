use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source, source::Buffered};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, warn};

use crate::round::Cue;

type Sound = Buffered<Decoder<BufReader<File>>>;

/// The four notes of the marching fleet, played in turn
const FLEET_NOTES: [&str; 4] = ["fleet0.wav", "fleet1.wav", "fleet2.wav", "fleet3.wav"];

/// File and volume for a cue. `note` picks the fleet note for formation steps.
pub fn cue_sound(cue: Cue, note: usize) -> (&'static str, f32) {
    match cue {
        Cue::PlayerShot => ("shoot.wav", 0.2),
        Cue::EnemyKilled => ("invaderkilled.wav", 0.3),
        Cue::MysteryKilled => ("mysterykilled.wav", 0.3),
        Cue::ShipDestroyed => ("shipexplosion.wav", 0.4),
        Cue::FormationStep => (FLEET_NOTES[note % FLEET_NOTES.len()], 0.3),
    }
}

/// Plays sound effects for simulation cues. Any sound that fails to load,
/// or a missing output device, just means silence.
pub struct AudioManager {
    /// Stream must stay alive for the handle to play
    output: Option<(OutputStream, OutputStreamHandle)>,
    sounds: HashMap<&'static str, Sound>,
    next_note: usize,
}

impl AudioManager {
    pub fn new(assets_dir: &Path) -> Self {
        let output = match OutputStream::try_default() {
            Ok(output) => Some(output),
            Err(e) => {
                warn!(error = %e, "no audio output, continuing without sound");
                None
            }
        };

        let mut sounds = HashMap::new();
        if output.is_some() {
            let names = ["shoot.wav", "invaderkilled.wav", "mysterykilled.wav", "shipexplosion.wav"]
                .into_iter()
                .chain(FLEET_NOTES);
            for name in names {
                match load(&assets_dir.join("sounds").join(name)) {
                    Ok(sound) => {
                        sounds.insert(name, sound);
                    }
                    Err(e) => debug!(sound = name, error = %e, "sound not loaded"),
                }
            }
        }

        Self {
            output,
            sounds,
            next_note: 0,
        }
    }

    /// Plays every cue, in order
    pub fn play_cues(&mut self, cues: &[Cue]) {
        for &cue in cues {
            let (name, volume) = cue_sound(cue, self.next_note);
            if cue == Cue::FormationStep {
                self.next_note = (self.next_note + 1) % FLEET_NOTES.len();
            }
            self.play(name, volume);
        }
    }

    fn play(&self, name: &str, volume: f32) {
        let (Some((_, handle)), Some(sound)) = (&self.output, self.sounds.get(name)) else {
            return;
        };
        // Playback errors are not worth stopping the game for
        if let Ok(sink) = Sink::try_new(handle) {
            sink.set_volume(volume);
            sink.append(sound.clone());
            sink.detach();
        }
    }
}

fn load(path: &Path) -> Result<Sound, Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    let source = Decoder::new(BufReader::new(file))?;
    Ok(source.buffered())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fleet_notes_cycle() {
        let notes: Vec<_> = (0..5).map(|n| cue_sound(Cue::FormationStep, n).0).collect();
        assert_eq!(
            notes,
            vec!["fleet0.wav", "fleet1.wav", "fleet2.wav", "fleet3.wav", "fleet0.wav"]
        );
    }

    #[test]
    fn test_each_cue_has_a_sound() {
        for cue in [
            Cue::PlayerShot,
            Cue::EnemyKilled,
            Cue::MysteryKilled,
            Cue::ShipDestroyed,
        ] {
            let (name, volume) = cue_sound(cue, 0);
            assert!(name.ends_with(".wav"));
            assert!(volume > 0.0 && volume <= 1.0);
        }
    }
}
