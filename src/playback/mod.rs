//! # Playback Module
//!
//! Drives a parsed song forward in time for auto-scroll and chord highlighting.
//!
//! ## Purpose
//! Given a [`ParsedSong`](crate::ParsedSong) and a tempo, the engine answers
//! "which line and which chord are active right now" on every display frame,
//! and supports pause, resume, stop, seeking and tempo changes while playing.
//!
//! ## Sub-modules
//! - `types` - PlaybackState, PlaybackStatus, EngineConfig, EngineEvent
//! - `engine` - The ScrollEngine state machine
//! - `clock` - Monotonic and manual time sources
//! - `frames` - Frame scheduling seam (requestAnimationFrame style)
//! - `observer` - Subscriber list and trace hook
//!
//! ## State Machine
//!
//! ```text
//!            start()              pause()
//! Stopped ───────────▶ Playing ───────────▶ Paused
//!    ▲                  │  ▲                  │
//!    │ stop() / end     │  └──── resume() ────┘
//!    └──────────────────┘
//! ```
//!
//! `stop()` works from any state and rewinds to line 0, chord 0.
//!
//! ## Self-Correcting Timing
//!
//! Position is never incremented per tick. Each tick computes elapsed time
//! from an anchor (a clock reading plus the song time at that reading) and
//! the monotonic clock, then looks the line up in the cumulative duration
//! table. A dropped or late frame only delays one
//! redraw; it cannot shift the rest of the song.
//!
//! ## Example
//! ```rust
//! use chordscroll::{parse, EngineConfig, ManualClock, ScrollEngine};
//!
//! let clock = ManualClock::new();
//! let song = parse("[C]one [G]two\n[F]three");
//! let mut engine = ScrollEngine::with_clock(song, EngineConfig::default(), clock.clone())?;
//!
//! let _sub = engine.subscribe(|state| {
//!     println!("line {} chord {}", state.active_line_index, state.active_chord_index);
//! });
//!
//! engine.start();
//! clock.advance(4000.0);
//! engine.tick();
//! assert_eq!(engine.state().active_line_index, 1);
//! # Ok::<(), chordscroll::ScrollError>(())
//! ```

mod clock;
mod engine;
mod frames;
mod observer;
mod types;


pub use clock::{Clock, ManualClock, MonotonicClock};
pub use engine::ScrollEngine;
pub use frames::{FrameScheduler, PolledFrames};
pub use observer::{Subscription, TraceHook};
pub use types::{EngineConfig, EngineEvent, PlaybackState, PlaybackStatus};
