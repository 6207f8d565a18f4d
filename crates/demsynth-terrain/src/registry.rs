//! Name to strategy lookup.

use crate::strategy::{
    DiamondSquareStrategy, FlatStrategy, GenerationStrategy, PerlinNoiseStrategy, RandomStrategy,
    ValueNoiseStrategy,
};
use crate::{Result, TerrainError};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Table of generation strategies keyed by case-insensitive name.
///
/// Adding an algorithm means registering one more key; [`crate::Terrain`]
/// only ever asks the registry to resolve a name.
///
/// # Example
///
/// ```
/// use demsynth_terrain::StrategyRegistry;
///
/// let registry = StrategyRegistry::global();
/// let strategy = registry.resolve("PerlinNoise")?;
/// assert_eq!(strategy.name(), "perlinnoise");
/// assert!(registry.resolve("nonsense").is_err());
/// # Ok::<(), demsynth_terrain::TerrainError>(())
/// ```
#[derive(Clone, Default)]
pub struct StrategyRegistry {
    strategies: HashMap<String, Arc<dyn GenerationStrategy>>,
}

impl StrategyRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in strategies.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        let flat: Arc<dyn GenerationStrategy> = Arc::new(FlatStrategy::default());
        registry.register_shared(FlatStrategy::NAME, flat.clone());
        registry.register_shared("uniform", flat);
        registry.register(RandomStrategy::NAME, RandomStrategy::default());
        registry.register(ValueNoiseStrategy::NAME, ValueNoiseStrategy::default());
        registry.register(PerlinNoiseStrategy::NAME, PerlinNoiseStrategy::default());
        registry.register(DiamondSquareStrategy::NAME, DiamondSquareStrategy::default());
        registry
    }

    /// Create a registry of built-ins where every seedable strategy uses `seed`.
    pub fn with_seed(seed: u64) -> Self {
        let mut registry = Self::with_builtins();
        registry.register(RandomStrategy::NAME, RandomStrategy::seeded(seed));
        registry.register(
            ValueNoiseStrategy::NAME,
            ValueNoiseStrategy {
                seed: Some(seed),
                ..Default::default()
            },
        );
        registry.register(
            PerlinNoiseStrategy::NAME,
            PerlinNoiseStrategy::with_seed(PerlinNoiseStrategy::fold_seed(seed)),
        );
        registry.register(DiamondSquareStrategy::NAME, DiamondSquareStrategy::seeded(seed));
        registry
    }

    /// Process-wide registry of the built-in strategies, initialized once.
    pub fn global() -> &'static StrategyRegistry {
        Self::global_shared()
    }

    /// Shared handle to [`StrategyRegistry::global`].
    pub fn global_shared() -> &'static Arc<StrategyRegistry> {
        static GLOBAL: OnceLock<Arc<StrategyRegistry>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(StrategyRegistry::with_builtins()))
    }

    /// Register `strategy` under `name`, replacing any previous entry.
    pub fn register<S>(&mut self, name: &str, strategy: S)
    where
        S: GenerationStrategy + 'static,
    {
        self.register_shared(name, Arc::new(strategy));
    }

    /// Register an already shared strategy under `name`.
    pub fn register_shared(&mut self, name: &str, strategy: Arc<dyn GenerationStrategy>) {
        self.strategies.insert(normalize_key(name), strategy);
    }

    /// Look up a strategy by name, ignoring case and surrounding whitespace.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn GenerationStrategy>> {
        self.resolve_entry(name).map(|(_, strategy)| strategy)
    }

    /// Look up a strategy and the normalized key it is registered under.
    pub fn resolve_entry(&self, name: &str) -> Result<(String, Arc<dyn GenerationStrategy>)> {
        let key = normalize_key(name);
        match self.strategies.get(&key) {
            Some(strategy) => Ok((key, strategy.clone())),
            None => Err(TerrainError::UnknownStrategy(name.to_string())),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.strategies.contains_key(&normalize_key(name))
    }

    /// Registered keys in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.strategies.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("names", &self.names())
            .finish()
    }
}

fn normalize_key(name: &str) -> String {
    name.trim().to_lowercase()
}
