//! Production countdown.
use super::EntityContext;

/// Waits out the production time, then spawns the entity exactly once.
#[derive(Clone, Debug, Default)]
pub struct Produced {
    elapsed: f32,
    fired: bool,
}

impl Produced {
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub(super) fn enter(&mut self) {
        *self = Self::default();
    }

    pub(super) fn execute(&mut self, ctx: &mut EntityContext<'_>) {
        if self.fired {
            return;
        }
        self.elapsed += ctx.dt();
        let duration = ctx.world.recipes.production_time(ctx.entity.kind.product());
        if self.elapsed >= duration {
            self.fired = true;
            crate::agent::spawn(ctx);
        }
    }
}
