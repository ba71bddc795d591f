//! Tempo scroll engine
//!
//! Walks a parsed song line by line and chord by chord at a given tempo.
//!
//! The engine keeps an anchor: a clock reading paired with the elapsed song
//! time at that reading. Every tick recomputes
//! `elapsed = anchor_elapsed + (now - anchor_clock)` and looks the position
//! up in the duration table, so a late or skipped frame never accumulates
//! into drift. Pausing stores the elapsed time and resuming re-anchors at the
//! current clock reading; tempo changes and seeks re-anchor the same way.
//! Re-anchoring stores the elapsed value unchanged, so a seek to a line
//! start reads back exactly that start on the next tick.

use crate::error::ScrollError;
use crate::song::ParsedSong;
use crate::timing::DurationTable;

use super::clock::{Clock, MonotonicClock};
use super::frames::{FrameScheduler, PolledFrames};
use super::observer::{Subscribers, Subscription, TraceHook};
use super::types::{EngineConfig, EngineEvent, PlaybackState, PlaybackStatus};

/// Tempo-synchronized auto-scroll engine.
///
/// # Example
/// ```rust
/// use chordscroll::{parse, EngineConfig, ManualClock, ScrollEngine};
///
/// let song = parse("[C]Hello [G]world\n[F]bye");
/// let clock = ManualClock::new();
/// let mut engine = ScrollEngine::with_clock(song, EngineConfig::with_bpm(120.0), clock.clone())?;
///
/// engine.start();
/// clock.advance(2500.0);
/// engine.tick();
///
/// let state = engine.state();
/// assert_eq!((state.active_line_index, state.active_chord_index), (0, 1));
/// # Ok::<(), chordscroll::ScrollError>(())
/// ```
pub struct ScrollEngine<C: Clock = MonotonicClock> {
    song: ParsedSong,
    beats_per_chord: f64,
    bpm: f64,
    table: DurationTable,
    clock: C,
    status: PlaybackStatus,
    /// Clock reading at the last anchor (valid while playing)
    anchor_clock_ms: f64,
    /// Elapsed song time at the anchor; the held position while paused or
    /// the seek target while stopped
    carried_ms: f64,
    line: usize,
    chord: usize,
    frames: Box<dyn FrameScheduler>,
    frame_pending: bool,
    subscribers: Subscribers,
    trace: Option<TraceHook>,
}

impl ScrollEngine<MonotonicClock> {
    /// Engine at `bpm` with the default beats-per-chord.
    pub fn new(song: ParsedSong, bpm: f64) -> Result<Self, ScrollError> {
        Self::with_config(song, EngineConfig::with_bpm(bpm))
    }

    pub fn with_config(song: ParsedSong, config: EngineConfig) -> Result<Self, ScrollError> {
        Self::with_clock(song, config, MonotonicClock::new())
    }
}

impl<C: Clock> ScrollEngine<C> {
    /// Build an engine reading time from `clock`.
    ///
    /// # Errors
    /// [`ScrollError::InvalidTempo`] or [`ScrollError::InvalidBeatsPerChord`]
    /// when the configuration is not finite and positive.
    pub fn with_clock(song: ParsedSong, config: EngineConfig, clock: C) -> Result<Self, ScrollError> {
        config.validate()?;
        let table = DurationTable::build(&song, config.initial_bpm, config.beats_per_chord)?;

        Ok(Self {
            song,
            beats_per_chord: config.beats_per_chord,
            bpm: config.initial_bpm,
            table,
            clock,
            status: PlaybackStatus::Stopped,
            anchor_clock_ms: 0.0,
            carried_ms: 0.0,
            line: 0,
            chord: 0,
            frames: Box::new(PolledFrames),
            frame_pending: false,
            subscribers: Subscribers::default(),
            trace: None,
        })
    }

    /// Use `frames` to schedule ticks instead of host polling.
    pub fn with_frames(mut self, frames: impl FrameScheduler + 'static) -> Self {
        self.set_frame_scheduler(Box::new(frames));
        self
    }

    /// Swap the frame scheduler, moving any pending frame over to the new one.
    pub fn set_frame_scheduler(&mut self, frames: Box<dyn FrameScheduler>) {
        let was_pending = self.frame_pending;
        self.cancel_frame();
        self.frames = frames;
        if was_pending {
            self.request_frame();
        }
    }

    /// Install a hook that receives every [`EngineEvent`].
    pub fn set_trace_hook(&mut self, hook: impl FnMut(&EngineEvent) + 'static) {
        self.trace = Some(Box::new(hook));
    }

    pub fn clear_trace_hook(&mut self) {
        self.trace = None;
    }

    /// Register a callback for state changes.
    pub fn subscribe(&mut self, callback: impl FnMut(&PlaybackState) + 'static) -> Subscription {
        self.subscribers.subscribe(Box::new(callback))
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn song(&self) -> &ParsedSong {
        &self.song
    }

    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            is_active: self.status != PlaybackStatus::Stopped,
            is_paused: self.status == PlaybackStatus::Paused,
            current_bpm: self.bpm,
            active_line_index: self.line,
            active_chord_index: self.chord,
        }
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    pub fn beats_per_chord(&self) -> f64 {
        self.beats_per_chord
    }

    pub fn total_duration_ms(&self) -> f64 {
        self.table.total_ms()
    }

    /// Playback time covered so far at the current tempo.
    pub fn elapsed_ms(&self) -> f64 {
        match self.status {
            PlaybackStatus::Playing => {
                self.carried_ms + (self.clock.now_ms() - self.anchor_clock_ms).max(0.0)
            }
            PlaybackStatus::Paused | PlaybackStatus::Stopped => self.carried_ms,
        }
    }

    /// Begin playback. No-op while already playing; resumes when paused.
    pub fn start(&mut self) {
        match self.status {
            PlaybackStatus::Playing => return,
            PlaybackStatus::Paused => return self.resume(),
            PlaybackStatus::Stopped => {}
        }

        let before = self.state();
        self.anchor_clock_ms = self.clock.now_ms();
        self.status = PlaybackStatus::Playing;
        self.request_frame();

        self.emit(EngineEvent::Started {
            elapsed_ms: self.carried_ms,
        });
        self.notify_if_changed(before);
    }

    /// Freeze the playhead. No-op unless playing.
    pub fn pause(&mut self) {
        if self.status != PlaybackStatus::Playing {
            return;
        }

        let before = self.state();
        self.carried_ms = self.elapsed_ms();
        self.status = PlaybackStatus::Paused;
        self.cancel_frame();

        self.emit(EngineEvent::Paused {
            elapsed_ms: self.carried_ms,
        });
        self.notify_if_changed(before);
    }

    /// Continue from the paused position. No-op unless paused.
    pub fn resume(&mut self) {
        if self.status != PlaybackStatus::Paused {
            return;
        }

        let before = self.state();
        self.anchor_clock_ms = self.clock.now_ms();
        self.status = PlaybackStatus::Playing;
        self.request_frame();

        self.emit(EngineEvent::Resumed {
            elapsed_ms: self.carried_ms,
        });
        self.notify_if_changed(before);
    }

    /// Halt and rewind to the first line. Idempotent.
    pub fn stop(&mut self) {
        let before = self.state();
        let was_stopped = self.status == PlaybackStatus::Stopped;
        self.reset();
        if !was_stopped {
            self.emit(EngineEvent::Stopped);
        }
        self.notify_if_changed(before);
    }

    /// Change tempo without moving the playhead.
    ///
    /// Returns `false` (and changes nothing) for non-finite or non-positive
    /// values.
    pub fn set_bpm(&mut self, bpm: f64) -> bool {
        if !(bpm.is_finite() && bpm > 0.0) {
            log::debug!(target: "chordscroll::engine", "ignoring tempo change to {}", bpm);
            return false;
        }

        let table = match DurationTable::build(&self.song, bpm, self.beats_per_chord) {
            Ok(table) => table,
            Err(e) => {
                log::debug!(target: "chordscroll::engine", "ignoring tempo change: {}", e);
                return false;
            }
        };

        // Carry the logical position (line + progress) over to the new table
        let elapsed = self.elapsed_ms();
        let new_elapsed = match self.table.locate(elapsed) {
            Some(pos) => table.elapsed_at(pos.line, pos.progress),
            None => elapsed * self.bpm / bpm,
        };

        let before = self.state();
        let from_bpm = self.bpm;
        self.table = table;
        self.bpm = bpm;
        self.anchor(new_elapsed);

        self.emit(EngineEvent::TempoChanged {
            from_bpm,
            to_bpm: bpm,
        });
        self.notify_if_changed(before);
        true
    }

    /// Nudge the tempo by `delta` BPM (the +/- controls).
    pub fn adjust_bpm(&mut self, delta: f64) -> bool {
        self.set_bpm(self.bpm + delta)
    }

    /// Move the playhead to the start of `index`.
    ///
    /// While playing, later ticks continue from there at the current tempo;
    /// while paused or stopped, the next `resume`/`start` does.
    ///
    /// # Errors
    /// [`ScrollError::LineOutOfRange`] when `index` is past the last line.
    pub fn jump_to_line(&mut self, index: usize) -> Result<(), ScrollError> {
        let line_count = self.song.lines.len();
        if index >= line_count {
            return Err(ScrollError::LineOutOfRange { index, line_count });
        }

        let before = self.state();
        self.anchor(self.table.line_start_ms(index));
        self.line = index;
        self.chord = 0;

        self.emit(EngineEvent::Seeked { line: index });
        self.notify_if_changed(before);
        Ok(())
    }

    /// Recompute the playhead from the clock.
    ///
    /// Called once per frame by the host. Does nothing unless playing.
    /// Returns `true` when the visible state changed.
    pub fn tick(&mut self) -> bool {
        // The frame that called us has been consumed
        self.frame_pending = false;

        if self.status != PlaybackStatus::Playing {
            return false;
        }

        let elapsed = self.elapsed_ms();
        let Some(pos) = self.table.locate(elapsed) else {
            let before = self.state();
            self.reset();
            self.emit(EngineEvent::Finished { elapsed_ms: elapsed });
            self.notify_if_changed(before);
            return true;
        };

        self.request_frame();

        if pos.line == self.line && pos.chord == self.chord {
            return false;
        }

        self.line = pos.line;
        self.chord = pos.chord;
        self.emit(EngineEvent::PositionChanged {
            line: pos.line,
            chord: pos.chord,
        });
        self.subscribers.notify(&self.state());
        true
    }

    /// Point the timeline at `elapsed` ms without changing status.
    fn anchor(&mut self, elapsed: f64) {
        self.carried_ms = elapsed;
        if self.status == PlaybackStatus::Playing {
            self.anchor_clock_ms = self.clock.now_ms();
        }
    }

    fn reset(&mut self) {
        self.cancel_frame();
        self.status = PlaybackStatus::Stopped;
        self.anchor_clock_ms = 0.0;
        self.carried_ms = 0.0;
        self.line = 0;
        self.chord = 0;
    }

    fn request_frame(&mut self) {
        if !self.frame_pending {
            self.frame_pending = true;
            self.frames.request_frame();
        }
    }

    fn cancel_frame(&mut self) {
        if self.frame_pending {
            self.frame_pending = false;
            self.frames.cancel_frame();
        }
    }

    fn notify_if_changed(&self, before: PlaybackState) {
        let after = self.state();
        if after != before {
            self.subscribers.notify(&after);
        }
    }

    fn emit(&mut self, event: EngineEvent) {
        match &event {
            EngineEvent::PositionChanged { line, chord } => {
                log::trace!(target: "chordscroll::engine", "line {} chord {}", line, chord);
            }
            other => log::debug!(target: "chordscroll::engine", "{:?}", other),
        }
        if let Some(hook) = self.trace.as_mut() {
            hook(&event);
        }
    }
}

impl<C: Clock> Drop for ScrollEngine<C> {
    fn drop(&mut self) {
        self.cancel_frame();
    }
}

impl<C: Clock> std::fmt::Debug for ScrollEngine<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollEngine")
            .field("status", &self.status)
            .field("bpm", &self.bpm)
            .field("beats_per_chord", &self.beats_per_chord)
            .field("line", &self.line)
            .field("chord", &self.chord)
            .field("lines", &self.song.lines.len())
            .finish()
    }
}
