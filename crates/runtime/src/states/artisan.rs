//! Artisan assignment: structures waiting for a professional and the
//! artisans walking to them.
use game_core::{EntityId, Path, Profession, Task, UnitKind};
use tracing::{debug, trace};

use super::{Cooldown, EntityContext, EntityState, EntityStateKind};
use crate::agent::{Message, MessageKind, PathPurpose};

/// Structure state: periodically recruits an artisan of `profession`.
#[derive(Clone, Debug)]
pub struct WaitForArtisan {
    profession: Profession,
    cooldown: Cooldown,
}

impl WaitForArtisan {
    pub fn new(profession: Profession) -> Self {
        Self {
            profession,
            cooldown: Cooldown::default(),
        }
    }

    pub fn profession(&self) -> Profession {
        self.profession
    }

    pub(super) fn enter(&mut self, ctx: &mut EntityContext<'_>) {
        self.cooldown = Cooldown::new(ctx.world.config.artisan_scan_interval);
        ctx.entity.artisan_required = Some(self.profession);
    }

    pub(super) fn execute(&mut self, ctx: &mut EntityContext<'_>) {
        if self.cooldown.tick(ctx.dt()) {
            self.scan(ctx);
        }
    }

    fn scan(&mut self, ctx: &mut EntityContext<'_>) {
        let artisans: Vec<_> = ctx
            .world
            .entities
            .units(UnitKind::Artisan)
            // Locked artisans are committed to another structure.
            .filter(|artisan| artisan.is_visible() && !artisan.is_in_state(EntityStateKind::Locked))
            .map(|artisan| {
                let available = matches!(
                    artisan.state(),
                    Some(EntityState::Artisan(state)) if state.is_available()
                );
                (artisan.id, artisan.profession, available)
            })
            .collect();

        let assigned: Vec<_> = artisans
            .iter()
            .filter(|(_, profession, _)| *profession == self.profession)
            .collect();
        let free = artisans
            .iter()
            .find(|(_, profession, _)| *profession == Profession::Free);

        let config = &ctx.world.config;
        let (target, cap) = (config.artisans_per_structure, config.max_artisans);
        if (assigned.len() as u32) < target {
            if let Some(&(artisan, _, _)) = free {
                if let Some(entity) = ctx.world.entities.get_mut(artisan) {
                    entity.profession = self.profession;
                }
                debug!(
                    structure = %ctx.id(),
                    %artisan,
                    profession = %self.profession,
                    "assigned free artisan"
                );
                ctx.world.change_state(artisan, EntityState::artisan());
            } else if ctx.world.unit_count(UnitKind::Artisan) < cap {
                ctx.world.prepend_task(Task::new(UnitKind::Artisan, cap));
            }
        }

        if let Some(&&(artisan, _, _)) = assigned.iter().find(|(_, _, available)| *available) {
            ctx.send(artisan, MessageKind::ArtisanNeeded);
        }
    }

    pub(super) fn on_message(&mut self, ctx: &mut EntityContext<'_>, message: &Message) -> bool {
        if message.kind != MessageKind::ArtisanArrived {
            return false;
        }
        let Some(artisan) = message.sender.entity() else {
            return false;
        };
        let matches = ctx
            .world
            .entities
            .get(artisan)
            .is_some_and(|entity| entity.profession == self.profession);
        if !matches {
            return false;
        }

        ctx.entity.artisan = Some(artisan);
        ctx.world.change_state(artisan, EntityState::Locked);
        debug!(structure = %ctx.id(), %artisan, profession = %self.profession, "artisan arrived");

        if self.profession == Profession::Builder {
            ctx.change_state(EntityState::produced());
        } else {
            ctx.change_state(EntityState::Idle);
        }
        true
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ArtisanStage {
    #[default]
    Waiting,
    Traversing,
}

/// Artisan state: answers `ArtisanNeeded` by walking to the structure.
#[derive(Clone, Debug, Default)]
pub struct ArtisanState {
    stage: ArtisanStage,
    finding_path: bool,
    target: Option<EntityId>,
}

impl ArtisanState {
    pub fn stage(&self) -> ArtisanStage {
        self.stage
    }

    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    /// Waiting for a call and not searching.
    pub fn is_available(&self) -> bool {
        self.stage == ArtisanStage::Waiting && !self.finding_path && self.target.is_none()
    }

    pub(super) fn enter(&mut self) {
        *self = Self::default();
    }

    /// Retries the walk when the previous search failed.
    pub(super) fn execute(&mut self, ctx: &mut EntityContext<'_>) {
        if self.stage == ArtisanStage::Waiting && !self.finding_path && self.target.is_some() {
            self.walk_to_target(ctx);
        }
    }

    fn walk_to_target(&mut self, ctx: &mut EntityContext<'_>) {
        let destination = self
            .target
            .and_then(|target| ctx.world.entities.get(target))
            .map(|structure| structure.location);
        match destination {
            Some(destination) => {
                self.finding_path = true;
                ctx.request_path(destination, PathPurpose::Traverse, true);
            }
            None => self.target = None,
        }
    }

    pub(super) fn resume_path(&mut self, ctx: &mut EntityContext<'_>, path: Option<Path>) {
        self.finding_path = false;
        match path {
            Some(path) if self.target.is_some() => {
                self.stage = ArtisanStage::Traversing;
                ctx.follow(path);
            }
            Some(_) => {}
            None => trace!(entity = %ctx.id(), target = ?self.target, "artisan path not found"),
        }
    }

    pub(super) fn on_message(&mut self, ctx: &mut EntityContext<'_>, message: &Message) -> bool {
        match message.kind {
            MessageKind::ArtisanNeeded => {
                if self.is_available() {
                    self.target = message.sender.entity();
                    self.walk_to_target(ctx);
                }
                true
            }
            MessageKind::ArrivedAtGoal if self.stage == ArtisanStage::Traversing => {
                if let Some(target) = self.target.take() {
                    ctx.send(target, MessageKind::ArtisanArrived);
                }
                self.stage = ArtisanStage::Waiting;
                true
            }
            _ => false,
        }
    }
}
