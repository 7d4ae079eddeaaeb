//! End-to-end behavior of the player agent, driven tick by tick.
//!
//! Every test settles outstanding path searches after each tick, so a search
//! issued on tick N is delivered at the start of tick N + 1.
use game_core::{
    GameConfig, InitialDeposit, Position, Profession, ResourceKind, StructureKind, Task, UnitKind,
};
use runtime::states::{ArtisanStage, ExploreStage};
use runtime::{
    EntityKind, EntityState, EntityStateKind, Event, EventBus, MapOracleImpl, OracleManager,
    PlannerEvent, PlayerAi, RecipeOracleImpl, Topic,
};

const HOME: Position = Position::new(4, 4);

/// Routes agent logs through the test harness; filter with `RUST_LOG`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn agent_on(map: MapOracleImpl, config: GameConfig, events: EventBus) -> PlayerAi {
    init_tracing();
    let start = map.start_position();
    let oracles = OracleManager::with_astar(map, RecipeOracleImpl::standard());
    PlayerAi::new(config, &oracles, start, 7, events).expect("start is on the map")
}

fn agent() -> PlayerAi {
    agent_on(
        MapOracleImpl::test_map(16, 16),
        GameConfig::default(),
        EventBus::new(),
    )
}

async fn run(ai: &mut PlayerAi, ticks: u32) {
    for _ in 0..ticks {
        ai.update(1.0);
        ai.settle().await;
    }
}

fn state_of(ai: &PlayerAi, id: game_core::EntityId) -> Option<EntityStateKind> {
    ai.world().entity(id).and_then(|entity| entity.state_kind())
}

#[tokio::test]
async fn worker_gathers_and_delivers_known_resource() {
    let deposit = Position::new(6, 4);
    let map = MapOracleImpl::test_map(16, 16).with_deposit(InitialDeposit::new(
        deposit,
        ResourceKind::Tree,
        3,
    ));
    let mut ai = agent_on(map, GameConfig::default(), EventBus::new());
    let worker = ai.spawn_entity(EntityKind::Unit(UnitKind::Worker), HOME);
    ai.set_goal(Task::new(ResourceKind::Tree, 1));

    run(&mut ai, 12).await;

    assert_eq!(state_of(&ai, worker), Some(EntityStateKind::Gather));
    assert_eq!(ai.world().resources().count(ResourceKind::Tree), 1);
    assert_eq!(ai.world().target_resource(), Some(ResourceKind::Tree));

    let remaining = ai.world().terrain().deposits_at(deposit);
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].amount, 2);
}

#[tokio::test]
async fn explorer_keeps_one_search_in_flight() {
    let mut ai = agent();
    let explorer = ai.spawn_entity(EntityKind::Unit(UnitKind::Explorer), HOME);
    ai.change_entity_state(explorer, EntityState::explore());

    ai.update(1.0);
    assert_eq!(ai.in_flight_paths(), 1);
    for _ in 0..5 {
        ai.update(1.0);
        assert!(ai.in_flight_paths() <= 1);
    }

    ai.settle().await;
    assert_eq!(ai.in_flight_paths(), 0);

    ai.update(1.0);
    let Some(EntityState::Explore(explore)) = ai.world().entity(explorer).and_then(|e| e.state())
    else {
        panic!("explorer left the Explore state");
    };
    // A finished search either moved the explorer out or was re-issued.
    assert!(explore.stage() == ExploreStage::Traversing || explore.is_finding_path());
}

#[tokio::test]
async fn stale_completion_is_dropped() {
    let mut ai = agent();
    let explorer = ai.spawn_entity(EntityKind::Unit(UnitKind::Explorer), HOME);
    ai.change_entity_state(explorer, EntityState::explore());

    ai.update(1.0);
    assert_eq!(ai.in_flight_paths(), 1);

    ai.change_entity_state(explorer, EntityState::Idle);
    ai.settle().await;
    ai.update(1.0);

    let entity = ai.world().entity(explorer).expect("explorer exists");
    assert_eq!(entity.state_kind(), Some(EntityStateKind::Idle));
    assert!(entity.path().is_none());
    assert_eq!(entity.location(), HOME);
}

#[tokio::test]
async fn free_artisan_is_recruited_and_locked_on_arrival() {
    let config = GameConfig {
        artisan_scan_interval: 0.0,
        ..GameConfig::default()
    };
    let mut ai = agent_on(MapOracleImpl::test_map(16, 16), config, EventBus::new());
    let smithy = ai.spawn_entity(
        EntityKind::Structure(StructureKind::Smithy),
        Position::new(6, 4),
    );
    let artisan = ai.spawn_entity(EntityKind::Unit(UnitKind::Artisan), HOME);
    ai.change_entity_state(smithy, EntityState::wait_for_artisan(Profession::Smith));

    // Tick 1 assigns the profession, tick 2 calls the artisan over.
    run(&mut ai, 2).await;
    let called = ai.world().entity(artisan).expect("artisan exists");
    assert_eq!(called.profession(), Profession::Smith);
    match called.state() {
        Some(EntityState::Artisan(state)) => {
            assert_eq!(state.target(), Some(smithy));
            assert_eq!(state.stage(), ArtisanStage::Waiting);
        }
        other => panic!("unexpected artisan state {other:?}"),
    }

    run(&mut ai, 4).await;

    assert_eq!(state_of(&ai, artisan), Some(EntityStateKind::Locked));
    assert_eq!(state_of(&ai, smithy), Some(EntityStateKind::Idle));
    let smithy = ai.world().entity(smithy).expect("smithy exists");
    assert_eq!(smithy.artisan(), Some(artisan));
    assert_eq!(
        ai.world().entity(artisan).map(|a| a.location()),
        Some(smithy.location())
    );
}

#[tokio::test]
async fn contended_deposit_is_gathered_by_one_worker() {
    let deposit = Position::new(6, 4);
    let map = MapOracleImpl::test_map(16, 16).with_deposit(InitialDeposit::new(
        deposit,
        ResourceKind::Tree,
        1,
    ));
    let mut ai = agent_on(map, GameConfig::default(), EventBus::new());
    let workers = [
        ai.spawn_entity(EntityKind::Unit(UnitKind::Worker), HOME),
        ai.spawn_entity(EntityKind::Unit(UnitKind::Worker), HOME),
    ];
    ai.set_goal(Task::new(ResourceKind::Tree, 1));

    for _ in 0..16 {
        run(&mut ai, 1).await;

        let claims = workers
            .iter()
            .filter_map(|&id| ai.world().entity(id).and_then(|e| e.state()))
            .filter(|state| matches!(state, EntityState::Gather(g) if g.occupied().is_some()))
            .count();
        assert!(claims <= 1, "{claims} workers hold the single unit");
        for stack in ai.world().terrain().deposits_at(deposit) {
            assert!(stack.occupied <= stack.amount);
        }
    }

    assert_eq!(ai.world().resources().count(ResourceKind::Tree), 1);
    assert!(!ai.world().terrain().has_deposit(deposit));
}

#[tokio::test]
async fn one_free_artisan_is_assigned_per_scan() {
    let config = GameConfig {
        artisan_scan_interval: 0.0,
        ..GameConfig::default()
    };
    let mut ai = agent_on(MapOracleImpl::test_map(16, 16), config, EventBus::new());
    let smithy = ai.spawn_entity(
        EntityKind::Structure(StructureKind::Smithy),
        Position::new(6, 4),
    );
    let artisans = [
        ai.spawn_entity(EntityKind::Unit(UnitKind::Artisan), HOME),
        ai.spawn_entity(EntityKind::Unit(UnitKind::Artisan), HOME),
    ];
    ai.change_entity_state(smithy, EntityState::wait_for_artisan(Profession::Smith));

    let smiths = |ai: &PlayerAi| {
        artisans
            .iter()
            .filter(|&&id| {
                ai.world()
                    .entity(id)
                    .is_some_and(|a| a.profession() == Profession::Smith)
            })
            .count()
    };

    run(&mut ai, 1).await;
    assert_eq!(smiths(&ai), 1);

    run(&mut ai, 2).await;
    assert_eq!(smiths(&ai), 1);
    let free = artisans
        .iter()
        .filter(|&&id| ai.world().entity(id).map(|a| a.profession()) == Some(Profession::Free))
        .count();
    assert_eq!(free, 1);
}

#[tokio::test]
async fn builder_constructs_then_structure_waits_for_staff() {
    let config = GameConfig {
        artisan_scan_interval: 0.0,
        ..GameConfig::default()
    };
    let mut ai = agent_on(MapOracleImpl::test_map(16, 16), config, EventBus::new());
    let smelter = ai.spawn_entity(
        EntityKind::Structure(StructureKind::Smelter),
        Position::new(6, 4),
    );
    let builder = ai.spawn_entity(EntityKind::Unit(UnitKind::Artisan), HOME);
    ai.change_entity_state(smelter, EntityState::wait_for_artisan(Profession::Builder));

    run(&mut ai, 6).await;
    assert_eq!(state_of(&ai, smelter), Some(EntityStateKind::Produced));
    assert_eq!(state_of(&ai, builder), Some(EntityStateKind::Locked));
    assert_eq!(
        ai.world().entity(smelter).and_then(|s| s.artisan()),
        Some(builder)
    );

    let mut ticks = 0;
    while state_of(&ai, smelter) == Some(EntityStateKind::Produced) {
        assert!(ticks < 30, "construction never finished");
        run(&mut ai, 1).await;
        ticks += 1;
    }

    let structure = ai.world().entity(smelter).expect("smelter exists");
    match structure.state() {
        Some(EntityState::WaitForArtisan(wait)) => {
            assert_eq!(wait.profession(), Profession::Smelter)
        }
        other => panic!("unexpected smelter state {other:?}"),
    }
    assert_eq!(structure.artisan(), None);
    assert_eq!(structure.artisan_required(), None);

    let released = ai.world().entity(builder).expect("builder exists");
    assert_eq!(released.profession(), Profession::Builder);
    assert_eq!(released.state_kind(), Some(EntityStateKind::Artisan));
}

#[tokio::test]
async fn unstaffed_structure_requests_artisans_once() {
    let events = EventBus::new();
    let mut planner_rx = events.subscribe(Topic::Planner);
    let config = GameConfig {
        artisan_scan_interval: 0.0,
        ..GameConfig::default()
    };
    let cap = config.max_artisans;
    let mut ai = agent_on(MapOracleImpl::test_map(16, 16), config, events);
    let smithy = ai.spawn_entity(
        EntityKind::Structure(StructureKind::Smithy),
        Position::new(6, 4),
    );
    ai.change_entity_state(smithy, EntityState::wait_for_artisan(Profession::Smith));

    run(&mut ai, 3).await;

    let mut prepended = Vec::new();
    while let Ok(event) = planner_rx.try_recv() {
        if let Event::Planner(PlannerEvent::TaskPrepended { task }) = event {
            prepended.push(task);
        }
    }
    assert_eq!(prepended, [Task::new(UnitKind::Artisan, cap)]);
    assert!(
        ai.world()
            .tasks()
            .any(|task| *task == Task::new(UnitKind::Artisan, cap))
    );
    assert_eq!(state_of(&ai, smithy), Some(EntityStateKind::WaitForArtisan));
}

#[tokio::test]
async fn worker_goal_builds_camp_then_trains_worker() {
    let events = EventBus::new();
    let mut planner_rx = events.subscribe(Topic::Planner);
    let mut ai = agent_on(MapOracleImpl::test_map(16, 16), GameConfig::default(), events);

    ai.set_goal(Task::new(UnitKind::Worker, 1));
    let queued: Vec<_> = ai.world().tasks().copied().collect();
    assert_eq!(
        queued,
        [
            Task::new(StructureKind::Camp, 1),
            Task::new(UnitKind::Worker, 1)
        ]
    );

    run(&mut ai, 14).await;

    let snapshot = ai.snapshot();
    assert_eq!(snapshot.visible(EntityKind::Structure(StructureKind::Camp)), 1);
    assert_eq!(snapshot.visible(EntityKind::Unit(UnitKind::Worker)), 1);
    assert!(snapshot.tasks.is_empty());
    assert_eq!(snapshot.current_task, None);

    let camp = ai
        .world()
        .entities()
        .structures(StructureKind::Camp)
        .next()
        .expect("camp built");
    let worker = ai
        .world()
        .entities()
        .units(UnitKind::Worker)
        .next()
        .expect("worker trained");
    assert_eq!(camp.location().chebyshev_distance(HOME), 1);
    assert_eq!(worker.location(), camp.location());
    assert_eq!(camp.state_kind(), Some(EntityStateKind::Idle));
    assert_eq!(worker.state_kind(), Some(EntityStateKind::Idle));

    let mut resolved = Vec::new();
    while let Ok(event) = planner_rx.try_recv() {
        if let Event::Planner(PlannerEvent::TaskResolved { task }) = event {
            resolved.push(task);
        }
    }
    assert_eq!(
        resolved,
        [
            Task::new(StructureKind::Camp, 1),
            Task::new(UnitKind::Worker, 1)
        ]
    );
}

#[tokio::test]
async fn explorer_consumes_a_worker() {
    let mut ai = agent();
    let camp = ai.spawn_entity(EntityKind::Structure(StructureKind::Camp), Position::new(5, 5));
    let worker = ai.spawn_entity(EntityKind::Unit(UnitKind::Worker), HOME);
    ai.set_goal(Task::new(UnitKind::Explorer, 1));

    run(&mut ai, 4).await;

    assert!(ai.world().entity(worker).is_none());
    assert_eq!(state_of(&ai, camp), Some(EntityStateKind::Idle));
    let explorer = ai
        .world()
        .entities()
        .units(UnitKind::Explorer)
        .next()
        .expect("explorer trained");
    assert!(explorer.is_visible());
    assert_eq!(explorer.location(), HOME);
}

#[tokio::test]
async fn exploration_task_switches_agent_into_explore_mode() {
    let mut ai = agent();
    ai.spawn_entity(EntityKind::Unit(UnitKind::Explorer), HOME);
    ai.set_goal(Task::new(ResourceKind::Coal, 1));

    ai.update(1.0);
    assert_eq!(ai.state_kind(), runtime::AiStateKind::Explore);
    assert_eq!(
        ai.world().current_task(),
        Some(Task::new(game_core::Product::Exploration(ResourceKind::Coal), 1))
    );
}

#[test]
fn start_must_be_passable() {
    let map = MapOracleImpl::test_map(8, 8)
        .with_terrain(Position::new(2, 2), game_core::TerrainKind::Water);
    let oracles = OracleManager::with_astar(map, RecipeOracleImpl::standard());
    let result = PlayerAi::new(
        GameConfig::default(),
        &oracles,
        Position::new(2, 2),
        0,
        EventBus::new(),
    );
    assert!(matches!(result, Err(runtime::RuntimeError::StartOutOfBounds(_))));
}
