//! Start/stop contract shared by every concrete effect.
//!
//! An [`EffectLifecycle`] wraps one [`SeasonalEffect`] and drives it through
//! `Idle -> Running -> Stopped`. A stopped lifecycle is spent; hosts create a
//! new one instead of restarting it.

use std::fmt;
use std::time::Duration;

use crate::effect::{EffectConfig, EffectType};
use crate::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("effect '{0}' was stopped and cannot be restarted")]
    Stopped(EffectType),
}

/// A resizable 2D drawing target owned by the host.
pub trait DrawingSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn resize(&mut self, width: u32, height: u32);
    /// Erases everything drawn so far.
    fn clear(&mut self);
}

impl<T: DrawingSurface + ?Sized> DrawingSurface for &mut T {
    fn width(&self) -> u32 {
        (**self).width()
    }

    fn height(&self) -> u32 {
        (**self).height()
    }

    fn resize(&mut self, width: u32, height: u32) {
        (**self).resize(width, height);
    }

    fn clear(&mut self) {
        (**self).clear();
    }
}

/// Identifies one pending frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display(fmt = "frame#{_0}")]
pub struct FrameHandle(pub u64);

/// The host's frame-pacing primitive.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// What the embedding platform reports about itself.
pub trait HostEnvironment {
    /// False for headless or server-side contexts where nothing is drawn.
    fn is_interactive(&self) -> bool;
    fn prefers_reduced_motion(&self) -> bool;
}

/// A host whose answers are fixed at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StaticHost {
    pub interactive: bool,
    pub reduced_motion: bool,
}

impl StaticHost {
    /// Interactive, no reduced-motion preference.
    pub const fn interactive() -> Self {
        Self {
            interactive: true,
            reduced_motion: false,
        }
    }

    /// Nothing is drawn, e.g. during server-side rendering.
    pub const fn headless() -> Self {
        Self {
            interactive: false,
            reduced_motion: false,
        }
    }
}

impl HostEnvironment for StaticHost {
    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }
}

/// Hooks a concrete effect implements. The lifecycle guarantees `on_frame`
/// and `on_resize` only run between `on_start` and `on_stop`.
pub trait SeasonalEffect {
    fn id(&self) -> EffectType;

    /// Seeds particles for the surface's current size.
    fn on_start(&mut self, surface: &mut dyn DrawingSurface, config: &EffectConfig);

    /// Advances and draws one frame.
    fn on_frame(&mut self, surface: &mut dyn DrawingSurface, elapsed: Duration);

    /// Releases effect-owned state. Also called when start was suppressed
    /// for reduced motion, so it must tolerate a missing `on_start`.
    fn on_stop(&mut self);

    /// Called after the surface was resized; may re-seed particles.
    fn on_resize(&mut self, _surface: &mut dyn DrawingSurface) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum LifecycleState {
    #[display(fmt = "idle")]
    Idle,
    #[display(fmt = "running")]
    Running,
    /// Occupies the slot but never animates.
    #[display(fmt = "reduced-motion")]
    ReducedMotion,
    #[display(fmt = "stopped")]
    Stopped,
}

/// One mounted effect together with its surface and frame loop.
/// Dropping it stops the effect.
pub struct EffectLifecycle<S: DrawingSurface, F: FrameScheduler> {
    effect: Box<dyn SeasonalEffect>,
    scheduler: F,
    surface: Option<S>,
    config: Option<EffectConfig>,
    frame: Option<FrameHandle>,
    state: LifecycleState,
}

impl<S: DrawingSurface, F: FrameScheduler> EffectLifecycle<S, F> {
    pub fn new(effect: Box<dyn SeasonalEffect>, scheduler: F) -> Self {
        Self {
            effect,
            scheduler,
            surface: None,
            config: None,
            frame: None,
            state: LifecycleState::Idle,
        }
    }

    /// Takes ownership of `surface` and begins animating, unless the host
    /// prefers reduced motion and `config` respects that. Starting a running
    /// effect tears it down first.
    ///
    /// # Errors
    /// Returns `LifecycleError::Stopped` once [`EffectLifecycle::stop`] has run.
    pub fn start(
        &mut self,
        surface: S,
        config: EffectConfig,
        host: &dyn HostEnvironment,
    ) -> Result<(), LifecycleError> {
        match self.state {
            LifecycleState::Stopped => return Err(LifecycleError::Stopped(self.effect.id())),
            LifecycleState::Running | LifecycleState::ReducedMotion => {
                log::debug!("restarting {} effect", self.effect.id());
                self.teardown();
            }
            LifecycleState::Idle => {}
        }

        let suppressed = config.respect_reduced_motion && host.prefers_reduced_motion();
        let surface = self.surface.insert(surface);
        let config = self.config.insert(config);

        if suppressed {
            log::debug!(
                "{} effect holds its slot without animating (reduced motion)",
                self.effect.id()
            );
            self.state = LifecycleState::ReducedMotion;
            return Ok(());
        }

        self.effect.on_start(surface, config);
        self.frame = Some(self.scheduler.request_frame());
        self.state = LifecycleState::Running;
        Ok(())
    }

    /// Stops the effect and releases its surface. Safe to call at any time
    /// and any number of times.
    pub fn stop(&mut self) {
        if !self.is_running() {
            return;
        }
        self.teardown();
        self.state = LifecycleState::Stopped;
    }

    /// Runs one frame if one is pending, then schedules the next.
    /// Returns whether a frame was drawn.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        if self.state != LifecycleState::Running || self.frame.take().is_none() {
            return false;
        }
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        self.effect.on_frame(surface, elapsed);
        self.frame = Some(self.scheduler.request_frame());
        true
    }

    /// Resizes the held surface and lets an animating effect adapt.
    pub fn resize(&mut self, width: u32, height: u32) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        surface.resize(width, height);
        if self.state == LifecycleState::Running {
            self.effect.on_resize(surface);
        }
    }

    /// True while the slot is occupied, whether or not it animates.
    pub fn is_running(&self) -> bool {
        matches!(
            self.state,
            LifecycleState::Running | LifecycleState::ReducedMotion
        )
    }

    pub fn is_animating(&self) -> bool {
        self.state == LifecycleState::Running
    }

    pub const fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn effect_id(&self) -> EffectType {
        self.effect.id()
    }

    pub const fn pending_frame(&self) -> Option<FrameHandle> {
        self.frame
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub const fn config(&self) -> Option<&EffectConfig> {
        self.config.as_ref()
    }

    /// Intensity multiplier of the active configuration, 1.0 when idle.
    pub fn intensity_multiplier(&self) -> f64 {
        self.config
            .as_ref()
            .map_or(1.0, |config| config.intensity.multiplier())
    }

    fn teardown(&mut self) {
        self.effect.on_stop();
        if let Some(handle) = self.frame.take() {
            log::debug!("cancelling {handle} of {} effect", self.effect.id());
            self.scheduler.cancel_frame(handle);
        }
        if let Some(mut surface) = self.surface.take() {
            surface.clear();
        }
        self.config = None;
    }
}

impl<S: DrawingSurface, F: FrameScheduler> fmt::Debug for EffectLifecycle<S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectLifecycle")
            .field("effect", &self.effect.id())
            .field("state", &self.state)
            .field("frame", &self.frame)
            .finish_non_exhaustive()
    }
}

impl<S: DrawingSurface, F: FrameScheduler> Drop for EffectLifecycle<S, F> {
    fn drop(&mut self) {
        self.stop();
    }
}
