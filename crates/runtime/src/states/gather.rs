//! Worker gathering cycle: Done → Traversing → Gathering → Delivering → Done.
use game_core::{Path, Position, Product, ResourceKind};
use tracing::{debug, trace};

use super::EntityContext;
use crate::agent::{Message, MessageKind, PathPurpose};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GatherStage {
    #[default]
    Done,
    Traversing,
    Gathering,
    Delivering,
}

#[derive(Clone, Debug, Default)]
pub struct Gather {
    stage: GatherStage,
    finding_path: bool,
    progress: f32,
    complete: bool,
    /// Deposit the worker is walking to.
    heading: Option<(Position, ResourceKind)>,
    /// Unit claimed on arrival, released on deduction or exit.
    occupied: Option<(Position, ResourceKind)>,
}

impl Gather {
    pub fn stage(&self) -> GatherStage {
        self.stage
    }

    pub fn is_finding_path(&self) -> bool {
        self.finding_path
    }

    pub fn occupied(&self) -> Option<(Position, ResourceKind)> {
        self.occupied
    }

    /// Home and not waiting for a search: can be pulled off without losing work.
    pub fn is_between_trips(&self) -> bool {
        self.stage == GatherStage::Done && !self.finding_path
    }

    pub(super) fn enter(&mut self, ctx: &mut EntityContext<'_>) {
        *self = Self::default();
        if ctx.entity.carried.is_some() {
            // Cargo from an earlier activation still has to go home.
            self.stage = GatherStage::Gathering;
            self.complete = true;
        }
    }

    pub(super) fn execute(&mut self, ctx: &mut EntityContext<'_>) {
        match self.stage {
            GatherStage::Done => self.seek(ctx),
            GatherStage::Gathering => self.gather(ctx),
            GatherStage::Traversing | GatherStage::Delivering => {}
        }
    }

    pub(super) fn exit(&mut self, ctx: &mut EntityContext<'_>) {
        if let Some((position, kind)) = self.occupied.take() {
            ctx.world.terrain.release_resource(position, kind);
        }
        self.finding_path = false;
        ctx.entity.stop();
    }

    fn seek(&mut self, ctx: &mut EntityContext<'_>) {
        if self.finding_path {
            return;
        }
        let Some(kind) = ctx.world.target_resource else {
            return;
        };
        let Some(target) = ctx.world.nearest_free_resource(kind, ctx.entity.location) else {
            trace!(entity = %ctx.id(), %kind, "no free resource known");
            return;
        };

        self.heading = Some((target, kind));
        self.finding_path = true;
        ctx.request_path(target, PathPurpose::Traverse, true);
    }

    fn gather(&mut self, ctx: &mut EntityContext<'_>) {
        if self.complete {
            if !self.finding_path {
                self.finding_path = true;
                let home = ctx.world.start_position;
                ctx.request_path(home, PathPurpose::Deliver, true);
            }
            return;
        }

        let Some((_, kind)) = self.occupied else {
            self.stage = GatherStage::Done;
            return;
        };
        self.progress += ctx.dt();
        if self.progress >= ctx.world.recipes.gather_time(Product::Resource(kind)) {
            self.complete = true;
        }
    }

    pub(super) fn resume_path(
        &mut self,
        ctx: &mut EntityContext<'_>,
        purpose: PathPurpose,
        path: Option<Path>,
    ) {
        self.finding_path = false;
        let Some(path) = path else {
            debug!(entity = %ctx.id(), ?purpose, stage = ?self.stage, "gather path not found");
            if purpose == PathPurpose::Traverse {
                self.heading = None;
            }
            return;
        };

        match (purpose, self.stage) {
            (PathPurpose::Traverse, GatherStage::Done) => {
                self.stage = GatherStage::Traversing;
                ctx.follow(path);
            }
            (PathPurpose::Deliver, GatherStage::Gathering) if self.complete => {
                self.progress = 0.0;
                self.complete = false;
                if let Some((position, kind)) = self.occupied.take() {
                    ctx.world.collect_resource(position, kind);
                    ctx.entity.carried = Some(kind);
                }
                self.stage = GatherStage::Delivering;
                ctx.follow(path);
            }
            (purpose, stage) => {
                trace!(entity = %ctx.id(), ?purpose, ?stage, "unexpected gather path dropped");
            }
        }
    }

    pub(super) fn on_message(&mut self, ctx: &mut EntityContext<'_>, message: &Message) -> bool {
        if message.kind != MessageKind::ArrivedAtGoal {
            return false;
        }

        match self.stage {
            GatherStage::Traversing => {
                let claimed = self.heading.take().filter(|(position, kind)| {
                    *position == ctx.entity.location
                        && ctx.world.terrain.occupy_resource(*position, *kind)
                });
                match claimed {
                    Some(claim) => {
                        self.occupied = Some(claim);
                        self.progress = 0.0;
                        self.stage = GatherStage::Gathering;
                    }
                    None => self.stage = GatherStage::Done,
                }
                debug!(entity = %ctx.id(), stage = ?self.stage, "gatherer arrived at deposit");
                true
            }
            GatherStage::Delivering => {
                if let Some(kind) = ctx.entity.carried.take() {
                    ctx.world.deposit(kind, 1);
                }
                self.stage = GatherStage::Done;
                true
            }
            GatherStage::Done | GatherStage::Gathering => false,
        }
    }
}
