use std::collections::HashMap;
use std::fmt;

use crate::effect::EffectType;
use crate::lifecycle::{DrawingSurface, EffectLifecycle, FrameScheduler, SeasonalEffect};

/// Builds a fresh effect instance.
pub type EffectFactory = Box<dyn Fn() -> Box<dyn SeasonalEffect>>;

/// Resolves effect identifiers to new effect instances.
#[derive(Default)]
pub struct EffectRegistry {
    factories: HashMap<EffectType, EffectFactory>,
}

impl EffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or replaces the factory for `effect`.
    pub fn register<F>(&mut self, effect: EffectType, factory: F)
    where
        F: Fn() -> Box<dyn SeasonalEffect> + 'static,
    {
        if self.factories.insert(effect, Box::new(factory)).is_some() {
            log::debug!("replaced factory for {effect} effect");
        }
    }

    /// A new instance of `effect`, or `None` if nothing is registered for it.
    pub fn create(&self, effect: EffectType) -> Option<Box<dyn SeasonalEffect>> {
        match self.factories.get(&effect) {
            Some(factory) => Some(factory()),
            None if effect.is_none() => None,
            None => {
                log::warn!("no effect registered for '{effect}'; nothing will be shown");
                None
            }
        }
    }

    /// Wraps a new instance of `effect` in an idle lifecycle.
    pub fn create_lifecycle<S, F>(&self, effect: EffectType, scheduler: F) -> Option<EffectLifecycle<S, F>>
    where
        S: DrawingSurface,
        F: FrameScheduler,
    {
        self.create(effect)
            .map(|instance| EffectLifecycle::new(instance, scheduler))
    }

    pub fn has(&self, effect: EffectType) -> bool {
        self.factories.contains_key(&effect)
    }

    /// Registered identifiers in declaration order of [`EffectType`].
    pub fn registered_types(&self) -> Vec<EffectType> {
        let mut types: Vec<EffectType> = self.factories.keys().copied().collect();
        types.sort_unstable();
        types
    }
}

impl fmt::Debug for EffectRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectRegistry")
            .field("types", &self.registered_types())
            .finish()
    }
}
