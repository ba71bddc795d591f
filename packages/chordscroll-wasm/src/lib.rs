use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use chordscroll::{
    Clock, EngineConfig, EngineEvent, FrameScheduler, ParsedSong, PlaybackState, ScrollEngine,
    ScrollError,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[derive(Serialize)]
struct ErrorPayload {
    message: String,
    kind: &'static str,
}

fn error_to_js(e: ScrollError) -> JsValue {
    let kind = match e {
        ScrollError::InvalidTempo(_) => "invalidTempo",
        ScrollError::InvalidBeatsPerChord(_) => "invalidBeatsPerChord",
        ScrollError::LineOutOfRange { .. } => "lineOutOfRange",
        ScrollError::MetadataError(_) => "metadata",
    };
    let payload = ErrorPayload {
        message: e.to_string(),
        kind,
    };
    let json = serde_json::to_string(&payload).unwrap_or_else(|_| e.to_string());
    JsValue::from_str(&json)
}

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // A logger was already installed by the host page
    }
}

/// Parse song text; non-string input yields an empty song with `error` set
#[wasm_bindgen]
pub fn parse_song(text: JsValue) -> Result<JsValue, JsValue> {
    let song = match text.as_string() {
        Some(text) => chordscroll::parse(&text),
        None => ParsedSong::failed("song body is not a string"),
    };
    Ok(serde_wasm_bindgen::to_value(&song)?)
}

/// Parse song text including its `---` settings block
#[wasm_bindgen]
pub fn load_song(text: &str) -> Result<JsValue, JsValue> {
    let song = chordscroll::load_song(text).map_err(error_to_js)?;
    Ok(serde_wasm_bindgen::to_value(&song)?)
}

/// Duration of one line in ms (beats per chord defaults to 4)
#[wasm_bindgen]
pub fn line_duration_ms(bpm: f64, chord_count: usize, beats_per_chord: Option<f64>) -> Result<f64, JsValue> {
    let beats = beats_per_chord.unwrap_or(chordscroll::DEFAULT_BEATS_PER_CHORD);
    chordscroll::line_duration_ms(bpm, chord_count, beats).map_err(error_to_js)
}

/// Parse song text and move every chord by `semitones`
#[wasm_bindgen]
pub fn transpose(text: &str, semitones: i32) -> Result<JsValue, JsValue> {
    let song = chordscroll::transpose_song(&chordscroll::parse(text), semitones);
    Ok(serde_wasm_bindgen::to_value(&song)?)
}

/// `performance.now()` clock
struct PerformanceClock {
    performance: web_sys::Performance,
}

impl Clock for PerformanceClock {
    fn now_ms(&self) -> f64 {
        self.performance.now()
    }
}

type Engine = ScrollEngine<PerformanceClock>;

/// Ticks the engine from `requestAnimationFrame`
struct AnimationFrames {
    window: web_sys::Window,
    callback: Closure<dyn FnMut(f64)>,
    handle: Option<i32>,
}

impl FrameScheduler for AnimationFrames {
    fn request_frame(&mut self) {
        match self
            .window
            .request_animation_frame(self.callback.as_ref().unchecked_ref())
        {
            Ok(handle) => self.handle = Some(handle),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
    }

    fn cancel_frame(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = self.window.cancel_animation_frame(handle) {
                log::warn!("cancelAnimationFrame failed: {:?}", e);
            }
        }
    }
}

/// Engine output waiting to be delivered to JS
enum Pending {
    State(PlaybackState),
    Event(EngineEvent),
}

type Queue = Rc<RefCell<VecDeque<Pending>>>;

/// Player internals shared with the animation frame callback
struct Shared {
    engine: RefCell<Engine>,
    queue: Queue,
    listeners: RefCell<Vec<(u32, js_sys::Function)>>,
    trace: RefCell<Option<js_sys::Function>>,
    next_id: Cell<u32>,
    flushing: Cell<bool>,
}

impl Shared {
    /// Run `f` against the engine, then deliver whatever it queued.
    ///
    /// JS callbacks only ever run after the engine borrow is released, so a
    /// subscriber may call back into the player.
    fn with_engine<R>(&self, f: impl FnOnce(&mut Engine) -> R) -> Result<R, JsValue> {
        let result = {
            let mut engine = self
                .engine
                .try_borrow_mut()
                .map_err(|_| JsValue::from_str("player is busy"))?;
            f(&mut engine)
        };
        self.flush();
        Ok(result)
    }

    fn read_engine<R>(&self, f: impl FnOnce(&Engine) -> R) -> Result<R, JsValue> {
        let engine = self
            .engine
            .try_borrow()
            .map_err(|_| JsValue::from_str("player is busy"))?;
        Ok(f(&engine))
    }

    /// Deliver queued states and events. Re-entrant calls return at once;
    /// the outermost flush drains everything queued meanwhile.
    fn flush(&self) {
        if self.flushing.replace(true) {
            return;
        }
        loop {
            let next = self.queue.borrow_mut().pop_front();
            match next {
                Some(Pending::State(state)) => self.notify_listeners(&state),
                Some(Pending::Event(event)) => self.notify_trace(&event),
                None => break,
            }
        }
        self.flushing.set(false);
    }

    fn notify_listeners(&self, state: &PlaybackState) {
        let value = match serde_wasm_bindgen::to_value(state) {
            Ok(value) => value,
            Err(e) => {
                log::error!("failed to serialize state: {}", e);
                return;
            }
        };
        let snapshot: Vec<(u32, js_sys::Function)> = self.listeners.borrow().clone();
        for (id, callback) in snapshot {
            // Skip listeners removed by an earlier callback in this round
            if !self.listeners.borrow().iter().any(|(other, _)| *other == id) {
                continue;
            }
            if let Err(e) = callback.call1(&JsValue::NULL, &value) {
                log::error!("subscriber failed: {:?}", e);
            }
        }
    }

    fn notify_trace(&self, event: &EngineEvent) {
        let Some(callback) = self.trace.borrow().clone() else {
            return;
        };
        let result = serde_wasm_bindgen::to_value(event)
            .map_err(JsValue::from)
            .and_then(|value| callback.call1(&JsValue::NULL, &value));
        if let Err(e) = result {
            log::error!("trace hook failed: {:?}", e);
        }
    }
}

/// Auto-scroll player for one song
#[wasm_bindgen]
pub struct ScrollPlayer {
    shared: Rc<Shared>,
}

#[wasm_bindgen]
impl ScrollPlayer {
    /// Tempo and beats per chord fall back to the song's settings block,
    /// then to 120 BPM and 4 beats per chord.
    #[wasm_bindgen(constructor)]
    pub fn new(text: &str, bpm: Option<f64>, beats_per_chord: Option<f64>) -> Result<ScrollPlayer, JsValue> {
        let song = chordscroll::load_song(text).map_err(error_to_js)?;
        let defaults = song.engine_config();
        let config = EngineConfig {
            initial_bpm: bpm.unwrap_or(defaults.initial_bpm),
            beats_per_chord: beats_per_chord.unwrap_or(defaults.beats_per_chord),
        };

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window available"))?;
        let performance = window
            .performance()
            .ok_or_else(|| JsValue::from_str("performance.now() is not available"))?;

        let mut engine = ScrollEngine::with_clock(song.parsed, config, PerformanceClock { performance })
            .map_err(error_to_js)?;

        // The engine only queues; JS sees the states after the borrow ends
        let queue: Queue = Rc::new(RefCell::new(VecDeque::new()));
        let sink = queue.clone();
        // Lives as long as the engine
        let _forward = engine.subscribe(move |state| {
            sink.borrow_mut().push_back(Pending::State(*state));
        });

        let shared = Rc::new(Shared {
            engine: RefCell::new(engine),
            queue,
            listeners: RefCell::new(Vec::new()),
            trace: RefCell::new(None),
            next_id: Cell::new(0),
            flushing: Cell::new(false),
        });

        let weak = Rc::downgrade(&shared);
        let callback = Closure::<dyn FnMut(f64)>::new(move |_timestamp: f64| {
            if let Some(shared) = weak.upgrade() {
                if let Err(e) = shared.with_engine(|engine| engine.tick()) {
                    log::warn!("skipping frame: {:?}", e);
                }
            }
        });
        shared.with_engine(|engine| {
            engine.set_frame_scheduler(Box::new(AnimationFrames {
                window,
                callback,
                handle: None,
            }))
        })?;

        Ok(ScrollPlayer { shared })
    }

    pub fn start(&self) -> Result<(), JsValue> {
        self.shared.with_engine(|engine| engine.start())
    }

    pub fn stop(&self) -> Result<(), JsValue> {
        self.shared.with_engine(|engine| engine.stop())
    }

    pub fn pause(&self) -> Result<(), JsValue> {
        self.shared.with_engine(|engine| engine.pause())
    }

    pub fn resume(&self) -> Result<(), JsValue> {
        self.shared.with_engine(|engine| engine.resume())
    }

    #[wasm_bindgen(js_name = setBpm)]
    pub fn set_bpm(&self, bpm: f64) -> Result<bool, JsValue> {
        self.shared.with_engine(|engine| engine.set_bpm(bpm))
    }

    #[wasm_bindgen(js_name = adjustBpm)]
    pub fn adjust_bpm(&self, delta: f64) -> Result<bool, JsValue> {
        self.shared.with_engine(|engine| engine.adjust_bpm(delta))
    }

    #[wasm_bindgen(js_name = jumpToLine)]
    pub fn jump_to_line(&self, index: usize) -> Result<(), JsValue> {
        self.shared
            .with_engine(|engine| engine.jump_to_line(index))?
            .map_err(error_to_js)
    }

    pub fn state(&self) -> Result<JsValue, JsValue> {
        let state = self.shared.read_engine(|engine| engine.state())?;
        Ok(serde_wasm_bindgen::to_value(&state)?)
    }

    pub fn song(&self) -> Result<JsValue, JsValue> {
        self.shared
            .read_engine(|engine| serde_wasm_bindgen::to_value(engine.song()))?
            .map_err(JsValue::from)
    }

    #[wasm_bindgen(js_name = elapsedMs)]
    pub fn elapsed_ms(&self) -> Result<f64, JsValue> {
        self.shared.read_engine(|engine| engine.elapsed_ms())
    }

    #[wasm_bindgen(js_name = totalDurationMs)]
    pub fn total_duration_ms(&self) -> Result<f64, JsValue> {
        self.shared.read_engine(|engine| engine.total_duration_ms())
    }

    /// Call `callback(state)` on every change; returns an id for `unsubscribe`
    pub fn subscribe(&self, callback: js_sys::Function) -> u32 {
        let id = self.shared.next_id.get() + 1;
        self.shared.next_id.set(id);
        self.shared.listeners.borrow_mut().push((id, callback));
        id
    }

    /// Safe to call from inside a subscriber
    pub fn unsubscribe(&self, id: u32) -> bool {
        let mut listeners = self.shared.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(other, _)| *other != id);
        listeners.len() != before
    }

    /// Receive every engine transition as `{event, ...}`; pass nothing to clear
    #[wasm_bindgen(js_name = setTrace)]
    pub fn set_trace(&self, callback: Option<js_sys::Function>) -> Result<(), JsValue> {
        let sink = self.shared.queue.clone();
        let enabled = callback.is_some();
        *self.shared.trace.borrow_mut() = callback;
        self.shared.with_engine(|engine| {
            if enabled {
                engine.set_trace_hook(move |event| {
                    sink.borrow_mut().push_back(Pending::Event(event.clone()));
                });
            } else {
                engine.clear_trace_hook();
            }
        })
    }
}
