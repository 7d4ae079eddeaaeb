use crate::state::{Product, Profession, Task};

/// Static production data for a single product.
///
/// Requirements are listed per unit produced. Durations are in simulation
/// time units.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Recipe {
    pub requirements: Vec<Task>,
    pub production_time: f32,
    pub move_factor: f32,
    /// Time a worker spends extracting one unit (resources only).
    pub gather_time: f32,
    /// Structure cannot start production until a builder arrives.
    pub builder_required: bool,
    /// Profession that staffs the structure once completed.
    pub staffed_by: Option<Profession>,
}

impl Recipe {
    pub const DEFAULT_MOVE_FACTOR: f32 = 1.0;

    pub fn new() -> Self {
        Self {
            requirements: Vec::new(),
            production_time: 0.0,
            move_factor: Self::DEFAULT_MOVE_FACTOR,
            gather_time: 0.0,
            builder_required: false,
            staffed_by: None,
        }
    }

    #[must_use]
    pub fn requires(mut self, product: impl Into<Product>, amount: u32) -> Self {
        self.requirements.push(Task::new(product, amount));
        self
    }

    #[must_use]
    pub fn production_time(mut self, production_time: f32) -> Self {
        self.production_time = production_time;
        self
    }

    #[must_use]
    pub fn move_factor(mut self, move_factor: f32) -> Self {
        self.move_factor = move_factor;
        self
    }

    #[must_use]
    pub fn gather_time(mut self, gather_time: f32) -> Self {
        self.gather_time = gather_time;
        self
    }

    #[must_use]
    pub fn built_by_builder(mut self) -> Self {
        self.builder_required = true;
        self
    }

    #[must_use]
    pub fn staffed_by(mut self, profession: Profession) -> Self {
        self.staffed_by = Some(profession);
        self
    }
}

impl Default for Recipe {
    fn default() -> Self {
        Self::new()
    }
}

/// Static production table: prerequisites and timings per product.
pub trait RecipeOracle: Send + Sync {
    fn recipe(&self, product: Product) -> Option<&Recipe>;

    /// Prerequisites of `product`, empty when it has no recipe.
    fn requirements(&self, product: Product) -> &[Task] {
        self.recipe(product)
            .map(|recipe| recipe.requirements.as_slice())
            .unwrap_or_default()
    }

    fn production_time(&self, product: Product) -> f32 {
        self.recipe(product)
            .map(|recipe| recipe.production_time)
            .unwrap_or_default()
    }

    fn move_factor(&self, product: Product) -> f32 {
        self.recipe(product)
            .map(|recipe| recipe.move_factor)
            .unwrap_or(Recipe::DEFAULT_MOVE_FACTOR)
    }

    fn gather_time(&self, product: Product) -> f32 {
        self.recipe(product)
            .map(|recipe| recipe.gather_time)
            .unwrap_or_default()
    }
}
