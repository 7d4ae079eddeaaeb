use game_core::{Position, StructureKind, Task, UnitKind};
use runtime::{EntityEvent, EntityKind, Event, OracleManager, Runtime, RuntimeConfig, Topic};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[tokio::test]
async fn handle_drives_the_agent_through_the_worker() {
    init_tracing();
    let runtime = Runtime::builder()
        .config(RuntimeConfig::default())
        .oracles(OracleManager::test_map(16, 16))
        .seed(3)
        .entity(EntityKind::Unit(UnitKind::Worker), Position::new(4, 4))
        .build()
        .await
        .expect("runtime builds");
    let handle = runtime.handle();
    let mut entity_rx = handle.subscribe(Topic::Entities);

    handle
        .set_goal(Task::new(StructureKind::Camp, 1))
        .await
        .expect("goal accepted");
    runtime.run_for(12, 1.0).await.expect("ticks run");

    let snapshot = handle.snapshot().await.expect("snapshot");
    assert_eq!(snapshot.goal, Some(Task::new(StructureKind::Camp, 1)));
    assert_eq!(snapshot.visible(EntityKind::Structure(StructureKind::Camp)), 1);
    assert_eq!(snapshot.visible(EntityKind::Unit(UnitKind::Worker)), 1);
    assert!(snapshot.tasks.is_empty());

    let mut spawned = Vec::new();
    while let Ok(event) = entity_rx.try_recv() {
        if let Event::Entity(EntityEvent::Spawned { kind, .. }) = event {
            spawned.push(kind);
        }
    }
    assert_eq!(spawned, [EntityKind::Structure(StructureKind::Camp)]);

    drop(handle);
    runtime.shutdown().await.expect("worker joins");
}

#[tokio::test]
async fn builder_requires_oracles() {
    let result = Runtime::builder().build().await;
    assert!(matches!(result, Err(runtime::RuntimeError::MissingOracles)));
}
