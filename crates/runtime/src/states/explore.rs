//! Explorer wandering: Done → Traversing → Done.
use game_core::Path;
use tracing::trace;

use super::EntityContext;
use crate::agent::{Message, MessageKind, PathPurpose};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExploreStage {
    #[default]
    Done,
    Traversing,
}

#[derive(Clone, Debug, Default)]
pub struct Explore {
    stage: ExploreStage,
    finding_path: bool,
}

impl Explore {
    pub fn stage(&self) -> ExploreStage {
        self.stage
    }

    pub fn is_finding_path(&self) -> bool {
        self.finding_path
    }

    pub(super) fn enter(&mut self) {
        *self = Self::default();
    }

    pub(super) fn execute(&mut self, ctx: &mut EntityContext<'_>) {
        if self.stage != ExploreStage::Done || self.finding_path {
            return;
        }
        let goal = ctx.world.random_tile();
        self.finding_path = true;
        trace!(entity = %ctx.id(), %goal, "explorer picked a destination");
        ctx.request_path(goal, PathPurpose::Traverse, false);
    }

    pub(super) fn resume_path(&mut self, ctx: &mut EntityContext<'_>, path: Option<Path>) {
        self.finding_path = false;
        match path {
            Some(path) if self.stage == ExploreStage::Done => {
                self.stage = ExploreStage::Traversing;
                ctx.follow(path);
            }
            Some(_) => {}
            None => trace!(entity = %ctx.id(), "exploration target unreachable"),
        }
    }

    pub(super) fn on_message(&mut self, message: &Message) -> bool {
        match (message.kind, self.stage) {
            (MessageKind::ArrivedAtGoal, ExploreStage::Traversing) => {
                self.stage = ExploreStage::Done;
                true
            }
            _ => false,
        }
    }
}
