use fireworks_core::{Feedback, FeedbackSink};
use js_sys::Math::random;
use wasm_bindgen::JsValue;
use web_sys::{AudioContext, OscillatorType};

/// C5, E5, G5, C6
const WIN_NOTES: [f32; 4] = [523.25, 659.25, 783.99, 1046.50];

/// Web Audio synthesizer for the end-of-game cues. The context is created on first use, since
/// browsers only allow audio after a user gesture.
#[derive(Default)]
pub(crate) struct WebAudio {
    context: Option<AudioContext>,
}

impl WebAudio {
    fn context(&mut self) -> Result<&AudioContext, JsValue> {
        let context = match self.context.take() {
            Some(context) => context,
            None => AudioContext::new()?,
        };
        let context: &AudioContext = self.context.insert(context);
        Ok(context)
    }
}

impl FeedbackSink for WebAudio {
    type Error = JsValue;

    fn play(&mut self, feedback: Feedback) -> Result<(), JsValue> {
        let context = self.context()?;
        let now = context.current_time();
        match feedback {
            Feedback::Won => win_chime(context, now),
            Feedback::Lost => {
                fireworks_burst(context, now)?;
                fireworks_burst(context, now + 0.1)
            }
        }
    }
}

#[derive(Copy, Clone, Debug)]
struct Tone {
    frequency: f32,
    kind: OscillatorType,
    gain: f32,
    start: f64,
    duration: f64,
}

fn play_tone(context: &AudioContext, tone: Tone) -> Result<(), JsValue> {
    let oscillator = context.create_oscillator()?;
    let gain = context.create_gain()?;

    oscillator.connect_with_audio_node(&gain)?;
    gain.connect_with_audio_node(&context.destination())?;

    oscillator.set_type(tone.kind);
    oscillator.frequency().set_value(tone.frequency);

    gain.gain().set_value_at_time(tone.gain, tone.start)?;
    gain.gain()
        .exponential_ramp_to_value_at_time(0.01, tone.start + tone.duration)?;

    oscillator.start_with_when(tone.start)?;
    oscillator.stop_with_when(tone.start + tone.duration)?;
    Ok(())
}

/// `base + random() * spread`
fn jitter(base: f32, spread: f32) -> f32 {
    base + (random() as f32) * spread
}

/// Low crack, a few pops, a crackle of high rustles and a fading rumble.
fn fireworks_burst(context: &AudioContext, now: f64) -> Result<(), JsValue> {
    play_tone(
        context,
        Tone {
            frequency: jitter(60., 30.),
            kind: OscillatorType::Sawtooth,
            gain: 0.5,
            start: now,
            duration: 0.08,
        },
    )?;

    let pops = 2 + (random() * 2.) as u32;
    for pop in 0..pops {
        play_tone(
            context,
            Tone {
                frequency: jitter(150., 80.),
                kind: OscillatorType::Square,
                gain: 0.35,
                start: now + 0.05 + f64::from(pop) * 0.08,
                duration: 0.12,
            },
        )?;
    }

    let rustles = 5 + (random() * 4.) as u32;
    for rustle in 0..rustles {
        play_tone(
            context,
            Tone {
                frequency: jitter(1000., 2000.),
                kind: OscillatorType::Sawtooth,
                gain: 0.12,
                start: now + 0.1 + f64::from(rustle) * (0.04 + random() * 0.03),
                duration: 0.05,
            },
        )?;
    }

    play_tone(
        context,
        Tone {
            frequency: jitter(1500., 1000.),
            kind: OscillatorType::Sine,
            gain: 0.08,
            start: now + 0.15,
            duration: 0.35,
        },
    )?;

    play_tone(
        context,
        Tone {
            frequency: jitter(80., 40.),
            kind: OscillatorType::Triangle,
            gain: 0.15,
            start: now + 0.4,
            duration: 0.3,
        },
    )
}

fn win_chime(context: &AudioContext, now: f64) -> Result<(), JsValue> {
    for (index, frequency) in WIN_NOTES.into_iter().enumerate() {
        play_tone(
            context,
            Tone {
                frequency,
                kind: OscillatorType::Sine,
                gain: 0.2,
                start: now + index as f64 * 0.15,
                duration: 0.3,
            },
        )?;
    }
    Ok(())
}
