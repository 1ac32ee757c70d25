//=========================================================================
// Scene Registry
//=========================================================================
//
// Name-keyed storage for scenes with lazy, memoized construction.
//
// Every entry is normalized to a lazy cell: an optional factory plus an
// optional cached instance. Scenes registered as instances start out
// materialized; factory entries are built on first resolve and reused
// afterwards until the entry is explicitly reset.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{panic_message, Scene, SceneError, SceneKey};
use crate::core::context::SceneContext;

//=== Scene Source ========================================================

/// Zero-argument scene constructor receiving the shared context.
pub type SceneFactory<S> = Box<dyn FnMut(&mut SceneContext<S>) -> Box<dyn Scene<S>>>;

/// What a host registers under a scene identifier.
pub enum SceneSource<S: SceneKey> {
    /// Built on the first transition that targets the identifier.
    Factory(SceneFactory<S>),

    /// Already constructed.
    Instance(Box<dyn Scene<S>>),
}

impl<S: SceneKey> SceneSource<S> {
    /// Wraps a constructor closure.
    pub fn factory<F, T>(mut build: F) -> Self
    where
        F: FnMut(&mut SceneContext<S>) -> T + 'static,
        T: Scene<S> + 'static,
    {
        Self::Factory(Box::new(
            move |ctx: &mut SceneContext<S>| -> Box<dyn Scene<S>> { Box::new(build(ctx)) },
        ))
    }

    /// Wraps a constructed scene.
    pub fn instance<T>(scene: T) -> Self
    where
        T: Scene<S> + 'static,
    {
        Self::Instance(Box::new(scene))
    }
}

//=== Registry Entry ======================================================

struct SceneEntry<S: SceneKey> {
    factory: Option<SceneFactory<S>>,
    instance: Option<Box<dyn Scene<S>>>,
}

impl<S: SceneKey> From<SceneSource<S>> for SceneEntry<S> {
    fn from(source: SceneSource<S>) -> Self {
        match source {
            SceneSource::Factory(factory) => Self {
                factory: Some(factory),
                instance: None,
            },
            SceneSource::Instance(scene) => Self {
                factory: None,
                instance: Some(scene),
            },
        }
    }
}

//=== Scene Registry ======================================================

/// Lazy, memoizing map from scene identifier to scene.
pub struct SceneRegistry<S: SceneKey> {
    entries: HashMap<S, SceneEntry<S>>,
}

impl<S: SceneKey> SceneRegistry<S> {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    //--- Registration -----------------------------------------------------

    /// Inserts or replaces the entry for `key`.
    ///
    /// Replacing an entry is allowed (last writer wins); the previous
    /// instance, if any, is dropped.
    pub fn register(&mut self, key: S, source: SceneSource<S>) -> Result<(), SceneError> {
        if !key.is_valid() {
            return Err(SceneError::InvalidId);
        }

        if self.entries.insert(key.clone(), source.into()).is_some() {
            warn!("Scene {:?} was already registered and has been replaced", key);
        } else {
            debug!("Registered scene {:?}", key);
        }
        Ok(())
    }

    //--- Lookup -----------------------------------------------------------

    /// Returns the scene for `key`, materializing it on first access.
    ///
    /// The factory runs at most once per materialization. A factory that
    /// panics leaves the entry unmaterialized and reports
    /// [`SceneError::FactoryFailure`].
    pub fn resolve(
        &mut self,
        key: &S,
        ctx: &mut SceneContext<S>,
    ) -> Result<&mut dyn Scene<S>, SceneError> {
        let entry = self
            .entries
            .get_mut(key)
            .ok_or_else(|| SceneError::not_found(key))?;

        if entry.instance.is_none() {
            let Some(factory) = entry.factory.as_mut() else {
                return Err(SceneError::not_found(key));
            };

            debug!("Materializing scene {:?}", key);
            let built = panic::catch_unwind(AssertUnwindSafe(|| (factory)(ctx))).map_err(
                |payload| SceneError::FactoryFailure {
                    scene: format!("{:?}", key),
                    reason: panic_message(&*payload),
                },
            )?;
            entry.instance = Some(built);
        }

        match entry.instance.as_mut() {
            Some(scene) => Ok(&mut **scene),
            None => Err(SceneError::not_found(key)),
        }
    }

    /// Returns the materialized scene for `key` without constructing it.
    pub fn get_mut(&mut self, key: &S) -> Option<&mut dyn Scene<S>> {
        match self.entries.get_mut(key)?.instance.as_mut() {
            Some(scene) => Some(&mut **scene),
            None => None,
        }
    }

    pub fn contains(&self, key: &S) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_materialized(&self, key: &S) -> bool {
        self.entries
            .get(key)
            .map(|entry| entry.instance.is_some())
            .unwrap_or(false)
    }

    pub fn ids(&self) -> impl Iterator<Item = &S> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    //--- Reset ------------------------------------------------------------

    /// Drops the cached instance of a factory entry.
    ///
    /// The next resolve rebuilds it. Returns `Ok(false)` when there was
    /// nothing to drop or the entry was registered as an instance (which
    /// cannot be rebuilt and is kept).
    pub fn reset(&mut self, key: &S) -> Result<bool, SceneError> {
        let entry = self
            .entries
            .get_mut(key)
            .ok_or_else(|| SceneError::not_found(key))?;

        if entry.factory.is_none() {
            warn!("Scene {:?} was registered as an instance and cannot be rebuilt", key);
            return Ok(false);
        }

        let dropped = entry.instance.take().is_some();
        if dropped {
            debug!("Reset scene {:?}", key);
        }
        Ok(dropped)
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        debug!("Clearing {} registered scenes", self.entries.len());
        self.entries.clear();
    }
}

impl<S: SceneKey> Default for SceneRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::{Camera, HeadlessRenderer, SceneRoot};
    use std::cell::Cell;
    use std::rc::Rc;

    //--- Test Helpers -----------------------------------------------------

    struct Stub {
        root: SceneRoot,
    }

    impl Stub {
        fn new(label: &str) -> Self {
            Self {
                root: SceneRoot::new(label),
            }
        }
    }

    impl Scene<&'static str> for Stub {
        fn root(&self) -> &SceneRoot {
            &self.root
        }
    }

    fn context() -> SceneContext<&'static str> {
        SceneContext::new(Box::new(HeadlessRenderer::new()), Camera::new())
    }

    fn counting_factory(label: &'static str, calls: &Rc<Cell<u32>>) -> SceneSource<&'static str> {
        let calls = Rc::clone(calls);
        SceneSource::factory(move |_ctx| {
            calls.set(calls.get() + 1);
            Stub::new(label)
        })
    }

    //--- Registration Tests -----------------------------------------------

    #[test]
    fn empty_identifier_is_rejected() {
        let mut registry = SceneRegistry::new();
        let result = registry.register("", SceneSource::instance(Stub::new("x")));
        assert_eq!(result, Err(SceneError::InvalidId));
        assert!(registry.is_empty());
    }

    #[test]
    fn last_registration_wins() {
        let mut registry = SceneRegistry::new();
        let mut ctx = context();
        registry.register("intro", SceneSource::instance(Stub::new("first"))).unwrap();
        registry.register("intro", SceneSource::instance(Stub::new("second"))).unwrap();

        assert_eq!(registry.len(), 1);
        let scene = registry.resolve(&"intro", &mut ctx).unwrap();
        assert_eq!(scene.root().label(), "second");
    }

    //--- Resolve Tests ----------------------------------------------------

    #[test]
    fn factory_runs_once() {
        let calls = Rc::new(Cell::new(0));
        let mut registry = SceneRegistry::new();
        let mut ctx = context();
        registry.register("intro", counting_factory("intro", &calls)).unwrap();

        assert!(!registry.is_materialized(&"intro"));
        assert!(registry.get_mut(&"intro").is_none());
        assert_eq!(calls.get(), 0);

        registry.resolve(&"intro", &mut ctx).unwrap();
        registry.resolve(&"intro", &mut ctx).unwrap();

        assert_eq!(calls.get(), 1);
        assert!(registry.is_materialized(&"intro"));
        assert!(registry.get_mut(&"intro").is_some());
    }

    #[test]
    fn unknown_identifier_is_not_found() {
        let mut registry: SceneRegistry<&'static str> = SceneRegistry::new();
        let mut ctx = context();
        let result = registry.resolve(&"nonexistent", &mut ctx).map(|_| ());
        assert_eq!(result, Err(SceneError::NotFound("\"nonexistent\"".to_owned())));
    }

    #[test]
    fn instance_is_returned_without_factory() {
        let mut registry = SceneRegistry::new();
        let mut ctx = context();
        registry.register("booth", SceneSource::instance(Stub::new("booth"))).unwrap();

        assert!(registry.is_materialized(&"booth"));
        assert_eq!(registry.resolve(&"booth", &mut ctx).unwrap().root().label(), "booth");
    }

    #[test]
    fn factory_receives_shared_context() {
        let mut registry = SceneRegistry::new();
        let mut ctx = context();
        registry
            .register(
                "tvCount",
                SceneSource::factory(|ctx: &mut SceneContext<&'static str>| {
                    ctx.camera.set_position(0.0, 2.0, -10.0);
                    Stub::new("tv")
                }),
            )
            .unwrap();

        registry.resolve(&"tvCount", &mut ctx).unwrap();
        assert_eq!(ctx.camera.position.z, -10.0);
    }

    #[test]
    fn panicking_factory_can_be_retried() {
        let attempts = Rc::new(Cell::new(0));
        let counter = Rc::clone(&attempts);
        let mut registry = SceneRegistry::new();
        let mut ctx = context();
        registry
            .register(
                "ending",
                SceneSource::factory(move |_ctx| {
                    counter.set(counter.get() + 1);
                    if counter.get() == 1 {
                        panic!("assets not ready");
                    }
                    Stub::new("ending")
                }),
            )
            .unwrap();

        let first = registry.resolve(&"ending", &mut ctx).map(|_| ());
        assert!(matches!(
            first,
            Err(SceneError::FactoryFailure { ref reason, .. }) if reason == "assets not ready"
        ));
        assert!(!registry.is_materialized(&"ending"));

        assert!(registry.resolve(&"ending", &mut ctx).is_ok());
        assert_eq!(attempts.get(), 2);
    }

    //--- Reset Tests ------------------------------------------------------

    #[test]
    fn reset_rebuilds_factory_entries() {
        let calls = Rc::new(Cell::new(0));
        let mut registry = SceneRegistry::new();
        let mut ctx = context();
        registry.register("intro", counting_factory("intro", &calls)).unwrap();
        registry.resolve(&"intro", &mut ctx).unwrap();

        assert_eq!(registry.reset(&"intro"), Ok(true));
        assert_eq!(registry.reset(&"intro"), Ok(false));
        registry.resolve(&"intro", &mut ctx).unwrap();

        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn reset_keeps_instance_entries() {
        let mut registry = SceneRegistry::new();
        registry.register("booth", SceneSource::instance(Stub::new("booth"))).unwrap();

        assert_eq!(registry.reset(&"booth"), Ok(false));
        assert!(registry.is_materialized(&"booth"));
        assert!(matches!(registry.reset(&"missing"), Err(SceneError::NotFound(_))));
    }

    #[test]
    fn clear_removes_everything() {
        let mut registry = SceneRegistry::new();
        registry.register("a", SceneSource::instance(Stub::new("a"))).unwrap();
        registry.register("b", SceneSource::instance(Stub::new("b"))).unwrap();
        assert_eq!(registry.ids().count(), 2);

        registry.clear();
        assert!(registry.is_empty());
        assert!(!registry.contains(&"a"));
    }
}
