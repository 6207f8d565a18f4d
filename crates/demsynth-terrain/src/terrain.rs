//! Terrain: grid geometry, strategy selection and generation.

use crate::strategy::GenerationStrategy;
use crate::{Extent, Grid, Result, StrategyRegistry};
use std::sync::Arc;
use tracing::{debug, warn};

/// Projection used when none is given: EPSG:3857, pseudo-Mercator in meters.
pub const DEFAULT_PROJECTION: &str = "EPSG:3857";

/// Strategy used when none is given.
pub const DEFAULT_METHOD: &str = "perlinnoise";

/// Side length in cells of a terrain built from a strategy name only.
pub const DEFAULT_SIZE: usize = 256;

/// Column count targeted when the cell size is derived from an imported extent.
pub const DEFAULT_TARGET_COLUMNS: f64 = 1000.0;

/// Extent and projection read from a geographic source file.
pub trait GeoMetadata {
    /// Bounding box of the source in its projection units.
    fn extent(&self) -> Extent;

    /// Projection identifier of the source, e.g. `"EPSG:4326"`.
    fn projection_name(&self) -> &str;
}

/// A procedurally generated digital elevation model.
///
/// The terrain owns its elevation grid. Generation mutates it in place
/// through `&mut self`; exporters borrow it through [`Terrain::grid`].
///
/// # Example
///
/// ```
/// use demsynth_terrain::{Extent, Terrain};
///
/// let mut terrain = Terrain::new(Extent::new(0.0, 0.0, 100.0, 50.0), 1.0)?;
/// terrain.set_altitude_factor(1200.0);
/// terrain.generate()?;
///
/// assert_eq!(terrain.grid().dimensions(), (50, 100));
/// let (_, max) = terrain.grid().min_max().unwrap();
/// assert!(max <= 1200.0);
/// # Ok::<(), demsynth_terrain::TerrainError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Terrain {
    /// Bounding box in projection units.
    extent: Extent,
    /// Size of a cell along X and Y, in projection units.
    cell_size: f64,
    /// Name of the projection system, e.g. "EPSG:4326".
    projection_name: String,
    /// Multiplier applied to the normalized strategy output; the highest
    /// altitude wanted.
    altitude_factor: f64,
    /// Active generation algorithm.
    strategy: Arc<dyn GenerationStrategy>,
    /// Registry key the active strategy was selected by.
    method: String,
    /// Registry that method names are resolved against.
    registry: Arc<StrategyRegistry>,
    /// Elevation matrix.
    grid: Grid,
}

impl Terrain {
    /// Terrain over `extent` with the default projection and strategy.
    pub fn new(extent: Extent, cell_size: f64) -> Result<Self> {
        TerrainBuilder::new()
            .extent(extent)
            .cell_size(cell_size)
            .build()
    }

    /// Terrain over `extent` in the given projection.
    pub fn with_projection(
        projection: impl Into<String>,
        extent: Extent,
        cell_size: f64,
    ) -> Result<Self> {
        TerrainBuilder::new()
            .projection(projection)
            .extent(extent)
            .cell_size(cell_size)
            .build()
    }

    /// 256x256 terrain with unit cells generated by the named strategy.
    pub fn from_method(method: &str) -> Result<Self> {
        Self::from_method_with_size(method, DEFAULT_SIZE, DEFAULT_SIZE)
    }

    /// `nrows x ncols` terrain with unit cells generated by the named strategy.
    pub fn from_method_with_size(method: &str, nrows: usize, ncols: usize) -> Result<Self> {
        TerrainBuilder::new()
            .method(method)
            .extent(Extent::from_size(nrows, ncols))
            .cell_size(1.0)
            .build()
    }

    /// Terrain covering an imported source.
    ///
    /// The cell size is chosen so that the grid is 1000 columns wide.
    pub fn from_metadata<M: GeoMetadata + ?Sized>(source: &M) -> Result<Self> {
        let extent = source.extent();
        TerrainBuilder::new()
            .extent(extent)
            .cell_size(extent.width() / DEFAULT_TARGET_COLUMNS)
            .projection(source.projection_name())
            .build()
    }

    /// Start a builder with all defaults.
    pub fn builder() -> TerrainBuilder {
        TerrainBuilder::new()
    }

    // Accessors ------------------------------------------------------------

    /// The elevation grid. This is the live matrix, not a copy.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable access to the elevation grid.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn strategy(&self) -> &Arc<dyn GenerationStrategy> {
        &self.strategy
    }

    /// Registry key of the active strategy.
    ///
    /// A strategy installed with [`Terrain::set_strategy`] reports its own
    /// [`GenerationStrategy::name`].
    pub fn method_name(&self) -> &str {
        &self.method
    }

    /// Registry used by [`Terrain::set_generation_method`].
    pub fn registry(&self) -> &Arc<StrategyRegistry> {
        &self.registry
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn x_min(&self) -> f64 {
        self.extent.x_min
    }

    pub fn y_min(&self) -> f64 {
        self.extent.y_min
    }

    pub fn x_max(&self) -> f64 {
        self.extent.x_max
    }

    pub fn y_max(&self) -> f64 {
        self.extent.y_max
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn projection_name(&self) -> &str {
        &self.projection_name
    }

    pub fn altitude_factor(&self) -> f64 {
        self.altitude_factor
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    /// Projection coordinates of the centre of a cell.
    ///
    /// Row 0 lies along the northern edge (`y_max`).
    pub fn cell_center(&self, row: usize, col: usize) -> (f64, f64) {
        let x = self.extent.x_min + (col as f64 + 0.5) * self.cell_size;
        let y = self.extent.y_max - (row as f64 + 0.5) * self.cell_size;
        (x, y)
    }

    // Mutators -------------------------------------------------------------

    /// Set the multiplier applied to the normalized strategy output.
    ///
    /// The value is not validated; a negative factor inverts the terrain.
    pub fn set_altitude_factor(&mut self, altitude_factor: f64) {
        self.altitude_factor = altitude_factor;
    }

    /// Switch to the strategy registered under `method`.
    ///
    /// Names are resolved against the registry the terrain was built with.
    /// Returns `false` and keeps the current strategy if the name is unknown.
    pub fn set_generation_method(&mut self, method: &str) -> bool {
        match self.try_set_generation_method(method) {
            Ok(()) => true,
            Err(e) => {
                warn!("{}; keeping generation method {:?}", e, self.method);
                false
            }
        }
    }

    /// Switch to the strategy registered under `method`, failing on unknown names.
    pub fn try_set_generation_method(&mut self, method: &str) -> Result<()> {
        let (key, strategy) = self.registry.resolve_entry(method)?;
        self.method = key;
        self.strategy = strategy;
        Ok(())
    }

    /// Install an explicit strategy.
    pub fn set_strategy(&mut self, strategy: Arc<dyn GenerationStrategy>) {
        self.method = strategy.name().to_string();
        self.strategy = strategy;
    }

    /// Generate the terrain with the active strategy and apply the altitude factor.
    ///
    /// Each call starts from a zeroed grid. On failure the previous
    /// elevations are left untouched.
    pub fn generate(&mut self) -> Result<()> {
        debug!(
            method = %self.method,
            rows = self.grid.rows(),
            cols = self.grid.cols(),
            altitude_factor = self.altitude_factor,
            "generating terrain"
        );

        let mut grid = Grid::new(self.grid.rows(), self.grid.cols());
        self.strategy.generate(&mut grid)?;
        grid.scale(self.altitude_factor);
        self.grid = grid;
        Ok(())
    }
}

impl GeoMetadata for Terrain {
    fn extent(&self) -> Extent {
        self.extent
    }

    fn projection_name(&self) -> &str {
        &self.projection_name
    }
}

/// Builder for [`Terrain`].
///
/// The strategy is resolved before geometry is validated or the grid is
/// allocated, so an unknown method name fails without side effects.
#[derive(Debug, Clone)]
pub struct TerrainBuilder {
    extent: Extent,
    cell_size: f64,
    projection_name: String,
    altitude_factor: f64,
    method: String,
    strategy: Option<Arc<dyn GenerationStrategy>>,
    registry: Option<Arc<StrategyRegistry>>,
}

impl Default for TerrainBuilder {
    fn default() -> Self {
        Self {
            extent: Extent::from_size(DEFAULT_SIZE, DEFAULT_SIZE),
            cell_size: 1.0,
            projection_name: DEFAULT_PROJECTION.to_string(),
            altitude_factor: 1.0,
            method: DEFAULT_METHOD.to_string(),
            strategy: None,
            registry: None,
        }
    }
}

impl TerrainBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extent(mut self, extent: Extent) -> Self {
        self.extent = extent;
        self
    }

    pub fn cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = cell_size;
        self
    }

    pub fn projection(mut self, projection: impl Into<String>) -> Self {
        self.projection_name = projection.into();
        self
    }

    pub fn altitude_factor(mut self, altitude_factor: f64) -> Self {
        self.altitude_factor = altitude_factor;
        self
    }

    /// Strategy name to resolve at build time.
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self.strategy = None;
        self
    }

    /// Explicit strategy; takes precedence over [`TerrainBuilder::method`].
    pub fn strategy(mut self, strategy: Arc<dyn GenerationStrategy>) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Registry used instead of the global one, both at build time and by
    /// [`Terrain::set_generation_method`] afterwards.
    pub fn registry(mut self, registry: impl Into<Arc<StrategyRegistry>>) -> Self {
        self.registry = Some(registry.into());
        self
    }

    pub fn build(self) -> Result<Terrain> {
        let registry = self
            .registry
            .unwrap_or_else(|| Arc::clone(StrategyRegistry::global_shared()));
        let (method, strategy) = match self.strategy {
            Some(strategy) => (strategy.name().to_string(), strategy),
            None => registry.resolve_entry(&self.method)?,
        };

        let (rows, cols) = self.extent.grid_dimensions(self.cell_size)?;
        debug!(
            rows,
            cols,
            cell_size = self.cell_size,
            projection = %self.projection_name,
            method = %method,
            "allocating terrain grid"
        );

        Ok(Terrain {
            extent: self.extent,
            cell_size: self.cell_size,
            projection_name: self.projection_name,
            altitude_factor: self.altitude_factor,
            strategy,
            method,
            registry,
            grid: Grid::new(rows, cols),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{DiamondSquareStrategy, FlatStrategy, RandomStrategy, SizePolicy};
    use crate::TerrainError;
    use approx::assert_relative_eq;

    struct Source;

    impl GeoMetadata for Source {
        fn extent(&self) -> Extent {
            Extent::new(500_000.0, 4_000_000.0, 520_000.0, 4_010_000.0)
        }

        fn projection_name(&self) -> &str {
            "EPSG:32631"
        }
    }

    #[test]
    fn test_explicit_extent_defaults() {
        let terrain = Terrain::new(Extent::new(0.0, 0.0, 10.0, 20.0), 2.0).unwrap();
        assert_eq!(terrain.rows(), 10);
        assert_eq!(terrain.cols(), 5);
        assert_eq!(terrain.projection_name(), DEFAULT_PROJECTION);
        assert_eq!(terrain.method_name(), "perlinnoise");
        assert_eq!(terrain.altitude_factor(), 1.0);
    }

    #[test]
    fn test_with_projection() {
        let terrain =
            Terrain::with_projection("EPSG:4326", Extent::new(-1.0, 40.0, 1.0, 41.0), 0.01)
                .unwrap();
        assert_eq!(terrain.projection_name(), "EPSG:4326");
        assert_eq!(terrain.grid().dimensions(), (100, 200));
    }

    #[test]
    fn test_from_method_with_size() {
        let terrain = Terrain::from_method_with_size("Random", 12, 34).unwrap();
        assert_eq!(terrain.grid().dimensions(), (12, 34));
        assert_eq!(terrain.extent(), Extent::new(0.0, 0.0, 34.0, 12.0));
        assert_eq!(terrain.cell_size(), 1.0);
    }

    #[test]
    fn test_from_metadata_targets_thousand_columns() {
        let terrain = Terrain::from_metadata(&Source).unwrap();
        assert_relative_eq!(terrain.cell_size(), 20.0);
        assert_eq!(terrain.cols(), 1000);
        assert_eq!(terrain.rows(), 500);
        assert_eq!(terrain.projection_name(), "EPSG:32631");
        assert_eq!(terrain.method_name(), "perlinnoise");
    }

    #[test]
    fn test_unknown_method_is_fatal_at_construction() {
        let err = Terrain::from_method("nonsense").unwrap_err();
        assert!(matches!(err, TerrainError::UnknownStrategy(ref n) if n == "nonsense"));
    }

    #[test]
    fn test_unknown_method_checked_before_geometry() {
        let err = Terrain::builder()
            .method("nonsense")
            .cell_size(-1.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, TerrainError::UnknownStrategy(_)));
    }

    #[test]
    fn test_set_generation_method_soft_failure() {
        let mut terrain = Terrain::from_method_with_size("random", 4, 4).unwrap();
        assert!(!terrain.set_generation_method("nonsense"));
        assert_eq!(terrain.method_name(), "random");
        assert!(terrain.try_set_generation_method("nonsense").is_err());

        assert!(terrain.set_generation_method("DiamondSquare"));
        assert_eq!(terrain.method_name(), "diamondsquare");
    }

    #[test]
    fn test_generate_applies_altitude_factor() {
        let mut terrain = Terrain::builder()
            .extent(Extent::from_size(5, 5))
            .strategy(Arc::new(FlatStrategy::new(0.5)))
            .altitude_factor(300.0)
            .build()
            .unwrap();
        terrain.generate().unwrap();
        assert!(terrain.grid().as_slice().iter().all(|&v| v == 150.0));
    }

    #[test]
    fn test_generate_starts_from_scratch() {
        let mut terrain = Terrain::builder()
            .extent(Extent::from_size(8, 8))
            .strategy(Arc::new(RandomStrategy::seeded(11)))
            .altitude_factor(2.0)
            .build()
            .unwrap();
        terrain.generate().unwrap();
        let first = terrain.grid().clone();
        terrain.generate().unwrap();
        assert_eq!(&first, terrain.grid());
    }

    #[test]
    fn test_grid_mut_is_live() {
        let mut terrain = Terrain::from_method_with_size("flat", 2, 2).unwrap();
        terrain.grid_mut().set(0, 0, 42.0);
        assert_eq!(terrain.grid().get(0, 0), Some(42.0));
    }

    #[test]
    fn test_custom_registry() {
        let mut registry = StrategyRegistry::new();
        registry.register("plateau", FlatStrategy::new(1.0));
        let registry = Arc::new(registry);
        let terrain = Terrain::builder()
            .registry(registry.clone())
            .method("Plateau")
            .extent(Extent::from_size(3, 3))
            .build()
            .unwrap();
        assert_eq!(terrain.method_name(), "plateau");
        assert_eq!(terrain.strategy().name(), "flat");
        assert!(Arc::ptr_eq(terrain.registry(), &registry));

        let err = Terrain::builder().registry(registry).build().unwrap_err();
        assert!(matches!(err, TerrainError::UnknownStrategy(_)));
    }

    #[test]
    fn test_switch_method_within_custom_registry() {
        let mut registry = StrategyRegistry::with_builtins();
        registry.register("plateau", FlatStrategy::new(1.0));
        let mut terrain = Terrain::builder()
            .registry(registry)
            .method("random")
            .extent(Extent::from_size(3, 3))
            .build()
            .unwrap();

        assert!(terrain.set_generation_method("Plateau"));
        assert_eq!(terrain.method_name(), "plateau");
        terrain.generate().unwrap();
        assert!(terrain.grid().as_slice().iter().all(|&v| v == 1.0));

        // Names only known to the global registry stay unknown here
        let mut registry = StrategyRegistry::new();
        registry.register("plateau", FlatStrategy::new(1.0));
        let mut terrain = Terrain::builder()
            .registry(registry)
            .method("plateau")
            .build()
            .unwrap();
        assert!(!terrain.set_generation_method("perlinnoise"));
        assert_eq!(terrain.method_name(), "plateau");
    }

    #[test]
    fn test_switch_method_keeps_registry_seed() {
        let mut terrain = Terrain::builder()
            .registry(StrategyRegistry::with_seed(5))
            .method("flat")
            .extent(Extent::from_size(6, 6))
            .build()
            .unwrap();
        assert!(terrain.set_generation_method("random"));
        assert!(terrain.strategy().is_deterministic());

        terrain.generate().unwrap();
        let first = terrain.grid().clone();
        terrain.set_generation_method("random");
        terrain.generate().unwrap();
        assert_eq!(&first, terrain.grid());
    }

    #[test]
    fn test_default_registry_is_global() {
        let terrain = Terrain::from_method_with_size("flat", 2, 2).unwrap();
        assert!(Arc::ptr_eq(
            terrain.registry(),
            StrategyRegistry::global_shared()
        ));
    }

    #[test]
    fn test_set_strategy_reports_strategy_name() {
        let mut terrain = Terrain::from_method_with_size("uniform", 2, 2).unwrap();
        assert_eq!(terrain.method_name(), "uniform");
        terrain.set_strategy(Arc::new(RandomStrategy::seeded(1)));
        assert_eq!(terrain.method_name(), "random");
    }

    #[test]
    fn test_failed_generation_keeps_previous_grid() {
        let mut terrain = Terrain::builder()
            .extent(Extent::from_size(6, 6))
            .strategy(Arc::new(FlatStrategy::new(0.25)))
            .build()
            .unwrap();
        terrain.generate().unwrap();

        terrain.set_strategy(Arc::new(DiamondSquareStrategy {
            size_policy: SizePolicy::Reject,
            ..DiamondSquareStrategy::seeded(3)
        }));
        let err = terrain.generate().unwrap_err();
        assert!(matches!(err, TerrainError::IncompatibleGridSize { .. }));
        assert!(terrain.grid().as_slice().iter().all(|&v| v == 0.25));
    }

    #[test]
    fn test_cell_center() {
        let terrain = Terrain::new(Extent::new(100.0, 200.0, 110.0, 210.0), 1.0).unwrap();
        assert_eq!(terrain.cell_center(0, 0), (100.5, 209.5));
        assert_eq!(terrain.cell_center(9, 9), (109.5, 200.5));
    }
}
