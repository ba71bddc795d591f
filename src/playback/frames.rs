//! Frame scheduling seam.
//!
//! The engine does not own a timer. A host registers one frame callback at a
//! time (in a browser, `requestAnimationFrame`) and calls
//! [`ScrollEngine::tick`](super::ScrollEngine::tick) when it fires. The engine
//! asks for the next frame after each tick that leaves it playing, and cancels
//! the outstanding one on pause, stop and end of song so no tick can land on
//! an idle engine.

/// One-shot frame registration, in the style of `requestAnimationFrame`
pub trait FrameScheduler {
    /// Register a single upcoming frame.
    fn request_frame(&mut self);

    /// Drop the registered frame, if any.
    fn cancel_frame(&mut self);
}

/// Scheduler for hosts that call `tick()` on every frame themselves
#[derive(Debug, Clone, Copy, Default)]
pub struct PolledFrames;

impl FrameScheduler for PolledFrames {
    fn request_frame(&mut self) {}

    fn cancel_frame(&mut self) {}
}
