//! Goal expansion and per-tick task execution.
//!
//! A goal is expanded depth-first into the tasks that produce its
//! prerequisites, followed by the goal itself. The agent resolves the front
//! task before popping the next; tasks that cannot be satisfied yet stay
//! current and are retried every tick.
use std::collections::VecDeque;

use game_core::{
    EntityId, GameError, PlannerError, Position, Product, ProductCategory, Profession, Task,
    UnitKind,
};
use rand::seq::IndexedRandom;
use tracing::{debug, info, trace, warn};

use super::entity::{Entity, EntityKind};
use super::world::World;
use crate::events::{EntityEvent, PlannerEvent};
use crate::states::{AiState, EntityState};

/// Recipe chains deeper than this are treated as cyclic.
const MAX_PLAN_DEPTH: usize = 16;

impl World {
    /// Replaces the goal and rebuilds the queue from it.
    pub fn set_goal(&mut self, goal: Task) {
        info!(%goal, "goal set");
        self.goal = Some(goal);
        self.update_task_list();
        self.publish(PlannerEvent::GoalSet {
            goal,
            queued: self.tasks.len(),
        });
    }

    /// Clears the queue and the current task and re-expands the goal.
    pub fn update_task_list(&mut self) {
        let Some(goal) = self.goal else {
            return;
        };
        let mut tasks = VecDeque::new();
        self.queue_requirements(goal.product, goal.amount, &mut tasks);
        tasks.push_back(goal);

        debug!(%goal, queued = tasks.len(), "task list rebuilt");
        self.tasks = tasks;
        self.current_task = None;
    }

    /// Appends the prerequisites of `amount` × `product` to `queue`,
    /// prerequisites of prerequisites first. Structure requirements are never
    /// multiplied.
    pub fn queue_requirements(&self, product: Product, amount: u32, queue: &mut VecDeque<Task>) {
        self.expand(product, amount, queue, 0);
    }

    fn expand(&self, product: Product, amount: u32, queue: &mut VecDeque<Task>, depth: usize) {
        if depth >= MAX_PLAN_DEPTH {
            warn!(%product, depth, "recipe chain too deep, expansion stopped");
            return;
        }
        for requirement in self.recipes.requirements(product) {
            let amount = match requirement.category() {
                ProductCategory::Structure => requirement.amount,
                _ => requirement.amount * amount,
            };
            self.expand(requirement.product, amount, queue, depth + 1);
            queue.push_back(Task::new(requirement.product, amount));
        }
    }

    /// Puts `task` and its prerequisites in front of the queue, pushing the
    /// current task back behind them.
    ///
    /// Returns `false` when the task is already current or queued.
    pub fn prepend_task(&mut self, task: Task) -> bool {
        if self.current_task == Some(task) || self.tasks.contains(&task) {
            return false;
        }

        let mut plan = VecDeque::new();
        self.queue_requirements(task.product, task.amount, &mut plan);
        plan.push_back(task);

        if let Some(current) = self.current_task.take() {
            self.tasks.push_front(current);
        }
        for planned in plan.into_iter().rev() {
            self.tasks.push_front(planned);
        }

        debug!(%task, "urgent task prepended");
        self.publish(PlannerEvent::TaskPrepended { task });
        true
    }

    /// Pops the next task when none is current.
    pub(crate) fn advance_task(&mut self) {
        if self.current_task.is_some() {
            return;
        }
        if let Some(task) = self.tasks.pop_front() {
            debug!(%task, remaining = self.tasks.len(), "task started");
            self.current_task = Some(task);
            self.publish(PlannerEvent::TaskStarted { task });
        }
    }

    /// Resolves, advances or retries the current task.
    pub fn check_current_task(&mut self) {
        let Some(task) = self.current_task else {
            return;
        };

        match task.product {
            Product::Exploration(kind) => {
                if self.resource_map.has_found(kind) {
                    self.target_resource = Some(kind);
                    self.switch_agent_state(AiState::gather());
                    self.resolve_current_task(task);
                } else {
                    self.switch_agent_state(AiState::explore());
                }
            }
            Product::Resource(kind) => {
                if self.resources.has(kind, task.amount) {
                    self.resolve_current_task(task);
                } else {
                    self.target_resource = Some(kind);
                }
            }
            Product::Unit(kind) if self.has_unit(kind, task.amount) => {
                self.resolve_current_task(task);
            }
            Product::Structure(kind) if self.structure_count(kind) >= task.amount.max(1) => {
                self.resolve_current_task(task);
            }
            Product::Unit(_) | Product::Structure(_) => self.try_create(task.product),
        }
    }

    fn resolve_current_task(&mut self, task: Task) {
        info!(%task, "task resolved");
        self.current_task = None;
        self.publish(PlannerEvent::TaskResolved { task });
    }

    fn try_create(&mut self, product: Product) {
        let created = self
            .can_create_entity(product)
            .and_then(|()| self.create_entity(product));

        match created {
            Ok(id) => info!(%product, entity = %id, "production started"),
            Err(PlannerError::Infeasible(_)) => {
                trace!(%product, "requirements not met");
                self.recall_gatherers_for(product);
            }
            Err(error) => {
                warn!(
                    %product,
                    code = error.error_code(),
                    severity = error.severity().as_str(),
                    %error,
                    "production could not start"
                );
                self.publish(PlannerEvent::ProductionFailed {
                    product,
                    error: error.to_string(),
                });
            }
        }
    }

    /// Checks every prerequisite of `product` against what the agent holds.
    pub fn can_create_entity(&self, product: Product) -> Result<(), PlannerError> {
        let recipe = self
            .recipes
            .recipe(product)
            .ok_or(PlannerError::MissingRecipe(product))?;

        let satisfied = recipe.requirements.iter().all(|requirement| {
            match requirement.product {
                Product::Resource(kind) => self.resources.has(kind, requirement.amount),
                Product::Structure(kind) => {
                    self.has_available_structure(kind, requirement.amount)
                }
                Product::Unit(kind) => self.has_available_unit(kind, requirement.amount),
                Product::Exploration(kind) => self.resource_map.has_found(kind),
            }
        });

        if satisfied {
            Ok(())
        } else {
            Err(PlannerError::Infeasible(product))
        }
    }

    /// Creates the entity for `product` and starts its production.
    ///
    /// Resources are withdrawn and prerequisite entities locked immediately;
    /// callers check [`World::can_create_entity`] first.
    pub fn create_entity(&mut self, product: Product) -> Result<EntityId, PlannerError> {
        let kind = EntityKind::from_product(product).ok_or(PlannerError::Infeasible(product))?;
        let recipe = self
            .recipes
            .recipe(product)
            .cloned()
            .ok_or(PlannerError::MissingRecipe(product))?;

        let location = match kind {
            EntityKind::Unit(_) => self.start_position,
            EntityKind::Structure(_) => {
                self.choose_buildable_tile()
                    .ok_or(PlannerError::NoBuildableTile {
                        product,
                        origin: self.start_position,
                        radius: self.config.buildable_radius,
                    })?
            }
        };

        let mut locked_structures = Vec::new();
        let mut consumed_units = Vec::new();
        for requirement in &recipe.requirements {
            let amount = requirement.amount as usize;
            match requirement.product {
                Product::Resource(resource) => {
                    self.withdraw(resource, requirement.amount);
                }
                Product::Structure(structure) => {
                    let claimed: Vec<_> = self
                        .idle_structures(structure)
                        .map(|entity| entity.id)
                        .filter(|id| !locked_structures.contains(id))
                        .take(amount.max(1))
                        .collect();
                    locked_structures.extend(claimed);
                }
                Product::Unit(unit) => {
                    let claimed: Vec<_> = self
                        .idle_units(unit)
                        .map(|entity| entity.id)
                        .filter(|id| !consumed_units.contains(id))
                        .take(amount)
                        .collect();
                    consumed_units.extend(claimed);
                }
                Product::Exploration(_) => {}
            }
        }
        for &id in locked_structures.iter().chain(&consumed_units) {
            self.change_state(id, EntityState::Locked);
        }

        let initial = match kind {
            EntityKind::Structure(_) if recipe.builder_required => {
                EntityState::wait_for_artisan(Profession::Builder)
            }
            _ => EntityState::produced(),
        };

        let id = self.entities.allocate_id();
        let mut entity = Entity::new(id, kind, location, initial);
        entity.move_factor = recipe.move_factor;
        entity.locked_structures = locked_structures;
        entity.consumed_units = consumed_units;
        self.entities.insert(entity);

        self.publish(EntityEvent::Created { entity: id, kind });
        Ok(id)
    }

    /// Random passable tile within the buildable radius of the start
    /// position holding neither a structure nor a deposit.
    fn choose_buildable_tile(&mut self) -> Option<Position> {
        let radius = self.config.buildable_radius as i32;
        let start = self.start_position;
        let candidates: Vec<Position> = (-radius..=radius)
            .flat_map(|dy| (-radius..=radius).map(move |dx| start.offset(dx, dy)))
            .filter(|tile| {
                *tile != start
                    && self.map.is_passable(*tile)
                    && !self.terrain.has_deposit(*tile)
                    && !self.is_structure_at(*tile)
            })
            .collect();
        candidates.choose(&mut self.rng).copied()
    }

    /// Idle units of `kind` the current task will consume when it starts.
    pub fn idle_units_reserved(&self, kind: UnitKind) -> u32 {
        let Some(task) = self.current_task else {
            return 0;
        };
        if !matches!(task.product, Product::Unit(_) | Product::Structure(_)) {
            return 0;
        }
        self.recipes
            .requirements(task.product)
            .iter()
            .filter(|requirement| requirement.product == Product::Unit(kind))
            .map(|requirement| requirement.amount)
            .sum()
    }

    /// Pulls gatherers that are between trips back to Idle when `product`
    /// lacks idle units of their kind.
    fn recall_gatherers_for(&mut self, product: Product) {
        let requirements = self.recipes.requirements(product).to_vec();
        for requirement in requirements {
            let Product::Unit(kind) = requirement.product else {
                continue;
            };
            let idle = self.idle_units(kind).count() as u32;
            let shortfall = requirement.amount.saturating_sub(idle) as usize;
            if shortfall == 0 {
                continue;
            }

            let recalled: Vec<_> = self
                .entities
                .units(kind)
                .filter(|unit| {
                    matches!(unit.state(), Some(EntityState::Gather(gather)) if gather.is_between_trips())
                })
                .map(|unit| unit.id)
                .take(shortfall)
                .collect();
            for &id in &recalled {
                self.change_state(id, EntityState::Idle);
            }
            if !recalled.is_empty() {
                debug!(%product, recalled = recalled.len(), "gatherers recalled for production");
            }
        }
    }
}
