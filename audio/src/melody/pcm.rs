//! PCM audio generation for melodies.

use std::convert::Infallible;
use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::player::{DEFAULT_PAUSE_MS, PlaybackState, Step, ToneSink};
use super::types::Melody;
use crate::pcm::{Chunk, DataChunk, Format};

/// Default audio format for rendered melodies.
pub const DEFAULT_FORMAT: Format = Format::L16Mono16K;

/// Attack and release ramp applied to each tone, in milliseconds.
const RAMP_MS: u32 = 2;

/// Shape of the generated tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    /// What a piezo buzzer on a timer pin produces.
    #[default]
    Square,
    Sine,
}

/// Rendering options for melodies.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Audio format (default: L16Mono16K)
    pub format: Format,
    /// Volume 0.0-1.0 (default: 0.5)
    pub volume: f64,
    /// Tone shape (default: square)
    pub waveform: Waveform,
    /// Silence after each note in milliseconds
    pub pause: u16,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            format: DEFAULT_FORMAT,
            volume: 0.5,
            waveform: Waveform::Square,
            pause: DEFAULT_PAUSE_MS,
        }
    }
}

impl RenderOptions {
    /// Sets the audio format.
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Sets the volume (0.0-1.0).
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }

    /// Sets the tone shape.
    pub fn with_waveform(mut self, waveform: Waveform) -> Self {
        self.waveform = waveform;
        self
    }

    /// Sets the silence after each note in milliseconds.
    pub fn with_pause(mut self, pause: u16) -> Self {
        self.pause = pause;
        self
    }

    fn amplitude(&self) -> f64 {
        self.volume.clamp(0.0, 1.0) * i16::MAX as f64 * 0.85
    }
}

/// Calculates the number of samples for a given duration in ms.
pub fn duration_samples(dur_ms: u32, sample_rate: u32) -> usize {
    (sample_rate as u64 * dur_ms as u64 / 1000) as usize
}

/// Generates a 50% duty square wave.
pub fn generate_square_wave(freq: u32, samples: usize, sample_rate: u32, amplitude: f64) -> Vec<i16> {
    let high = amplitude as i16;
    let half_periods = |i: usize| i as u64 * freq as u64 * 2 / sample_rate as u64;
    (0..samples)
        .map(|i| if half_periods(i) % 2 == 0 { high } else { -high })
        .collect()
}

/// Generates a pure sine wave.
pub fn generate_sine_wave(freq: u32, samples: usize, sample_rate: u32, amplitude: f64) -> Vec<i16> {
    (0..samples)
        .map(|i| {
            let t = i as f64 / sample_rate as f64;
            ((2.0 * PI * freq as f64 * t).sin() * amplitude) as i16
        })
        .collect()
}

/// Fades the first and last `ramp` samples to avoid clicks.
fn apply_ramp(samples: &mut [i16], ramp: usize) {
    let ramp = ramp.min(samples.len() / 2);
    if ramp == 0 {
        return;
    }
    let len = samples.len();
    for i in 0..ramp {
        let gain = i as f64 / ramp as f64;
        samples[i] = (samples[i] as f64 * gain) as i16;
        samples[len - 1 - i] = (samples[len - 1 - i] as f64 * gain) as i16;
    }
}

/// A [`ToneSink`] that synthesizes tones into a PCM buffer.
///
/// The caller moves the clock with [`advance_to`](PcmSink::advance_to);
/// gaps are filled with silence and a new tone cuts off the previous one,
/// like a single timer output would.
#[derive(Debug, Clone)]
pub struct PcmSink {
    chunk: DataChunk,
    waveform: Waveform,
    amplitude: f64,
    cursor: usize,
}

impl PcmSink {
    pub fn new(opts: &RenderOptions) -> Self {
        Self {
            chunk: DataChunk::new(opts.format),
            waveform: opts.waveform,
            amplitude: opts.amplitude(),
            cursor: 0,
        }
    }

    fn sample_rate(&self) -> u32 {
        self.chunk.format().sample_rate()
    }

    /// Moves the clock to `ms` after the start of the buffer.
    pub fn advance_to(&mut self, ms: u32) {
        let target = duration_samples(ms, self.sample_rate());
        let len = self.chunk.samples().len();
        if target > len {
            self.chunk.extend_silence(target - len);
        }
        self.cursor = target;
    }

    pub fn into_chunk(self) -> DataChunk {
        self.chunk
    }
}

impl ToneSink for PcmSink {
    type Error = Infallible;

    fn tone(&mut self, frequency_hz: u32, duration_ms: u32) -> Result<(), Infallible> {
        let rate = self.sample_rate();
        let samples = duration_samples(duration_ms, rate);
        let mut data = match self.waveform {
            Waveform::Square => generate_square_wave(frequency_hz, samples, rate, self.amplitude),
            Waveform::Sine => generate_sine_wave(frequency_hz, samples, rate, self.amplitude),
        };
        apply_ramp(&mut data, duration_samples(RAMP_MS, rate));

        self.chunk.truncate(self.cursor);
        self.chunk.extend_silence(self.cursor - self.chunk.samples().len());
        self.chunk.extend_from_slice(&data);
        Ok(())
    }

    fn no_tone(&mut self) -> Result<(), Infallible> {
        self.chunk.truncate(self.cursor);
        Ok(())
    }
}

impl Melody {
    /// Renders the melody by running the playback scheduler on a virtual
    /// clock, so the audio has exactly the timing a device would play.
    pub fn render(&self, opts: &RenderOptions) -> DataChunk {
        let mut sink = PcmSink::new(opts);
        let mut state = PlaybackState::new(self).with_pause(opts.pause);
        let mut now = 0;
        state.play(now);

        loop {
            sink.advance_to(now);
            let step = match state.tick(now, &mut sink) {
                Ok(step) => step,
                Err(never) => match never {},
            };
            match step {
                Step::Note(..) | Step::Waiting => now = state.next_call,
                Step::Finished | Step::Idle => break,
            }
        }

        sink.into_chunk()
    }

    /// Renders the melody to little-endian 16-bit PCM bytes.
    pub fn render_bytes(&self, opts: &RenderOptions) -> Vec<u8> {
        self.render(opts).to_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::melody::catalog::{MELODY_BUTTON_PUSH, MELODY_NEW_MAIL};
    use crate::melody::pitch::Pitch;
    use crate::melody::types::Note;

    #[test]
    fn test_duration_samples() {
        assert_eq!(duration_samples(100, 16000), 1600);
        assert_eq!(duration_samples(30, 8000), 240);
        assert_eq!(duration_samples(0, 48000), 0);
    }

    #[test]
    fn test_generate_square_wave() {
        // 1 kHz at 8 kHz: 4 samples high, 4 samples low.
        let data = generate_square_wave(1000, 16, 8000, 1000.0);
        assert_eq!(&data[..8], &[1000, 1000, 1000, 1000, -1000, -1000, -1000, -1000]);
        assert_eq!(&data[8..], &data[..8]);
    }

    #[test]
    fn test_generate_sine_wave() {
        let data = generate_sine_wave(440, 1600, 16000, 16000.0);
        assert_eq!(data.len(), 1600);
        assert_eq!(data[0], 0);
        assert!(data.iter().any(|&s| s > 15000));
        assert!(data.iter().any(|&s| s < -15000));
    }

    #[test]
    fn test_apply_ramp() {
        let mut data = vec![100i16; 10];
        apply_ramp(&mut data, 2);
        assert_eq!(data, vec![0, 50, 100, 100, 100, 100, 100, 100, 50, 0]);

        let mut short = vec![100i16; 1];
        apply_ramp(&mut short, 5);
        assert_eq!(short, vec![100]);
    }

    #[test]
    fn test_render_length_matches_schedule() {
        for melody in [&MELODY_NEW_MAIL, &MELODY_BUTTON_PUSH] {
            let opts = RenderOptions::default().with_pause(25);
            let chunk = melody.render(&opts);
            let expected = duration_samples(melody.duration_with_pause(25), 16000);
            assert_eq!(chunk.samples().len(), expected, "melody {}", melody.id);
        }
    }

    #[test]
    fn test_render_places_tones_and_gaps() {
        let opts = RenderOptions::default()
            .with_format(Format::L16Mono8K)
            .with_pause(50)
            .with_volume(1.0);
        let chunk = MELODY_BUTTON_PUSH.render(&opts);
        let samples = chunk.samples();

        // B5 for 100ms, 50ms gap, E6 for 200ms, 50ms gap.
        assert_eq!(samples.len(), 8 * 400);
        assert!(samples[16..784].iter().all(|&s| s != 0));
        assert!(samples[800..1200].iter().all(|&s| s == 0));
        assert!(samples[1216..2784].iter().all(|&s| s != 0));
        assert!(samples[2800..].iter().all(|&s| s == 0));
    }

    #[test]
    fn test_render_volume_zero_is_silent() {
        let opts = RenderOptions::default().with_volume(0.0);
        let chunk = MELODY_BUTTON_PUSH.render(&opts);
        assert!(!chunk.samples().is_empty());
        assert!(chunk.samples().iter().all(|&s| s == 0));
    }

    #[test]
    fn test_render_bytes() {
        let opts = RenderOptions::default().with_waveform(Waveform::Sine);
        let data = MELODY_BUTTON_PUSH.render_bytes(&opts);
        assert_eq!(data.len(), duration_samples(360, 16000) * 2);
        let non_zero = data.iter().filter(|&&b| b != 0).count();
        assert!(non_zero > data.len() / 2, "Should have significant audio content");
    }

    #[test]
    fn test_pcm_sink_new_tone_cuts_previous() {
        let opts = RenderOptions::default().with_format(Format::L16Mono8K);
        let mut sink = PcmSink::new(&opts);
        sink.advance_to(0);
        sink.tone(Pitch::A4.frequency() as u32, 100).unwrap();
        sink.advance_to(50);
        sink.tone(Pitch::A5.frequency() as u32, 10).unwrap();
        assert_eq!(sink.clone().into_chunk().samples().len(), 400 + 80);

        sink.advance_to(55);
        sink.no_tone().unwrap();
        assert_eq!(sink.into_chunk().samples().len(), 440);
    }

    #[test]
    fn test_render_custom_melody() {
        let melody = Melody::new("blip", "", vec![Note::new(Pitch::C6, 40)]).unwrap();
        let opts = RenderOptions::default().with_pause(0);
        assert_eq!(melody.render(&opts).samples().len(), 640);
    }
}
