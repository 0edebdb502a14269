use autoscale_core::{
    tick_interval, Addon, ButtonAction, EventResponse, Host, HostEvent, InMemoryScene,
    InteractionMode, MonitorRegistry, MonitorState, ObjectId, ObjectType, PointerButton,
    ReportLevel, SceneObject, SettingChange, StartOutcome, Vec3,
};

fn id(name: &str) -> ObjectId {
    ObjectId::new(name)
}

fn release() -> HostEvent {
    HostEvent::GESTURE_RELEASE
}

fn cube_scene() -> InMemoryScene {
    let mut scene = InMemoryScene::new("scene.blend");
    scene.add(SceneObject::new("Cube", ObjectType::Mesh).selected());
    scene.set_active(Some("Cube"));
    scene
}

fn started(scene: &mut InMemoryScene) -> MonitorRegistry {
    let mut registry = MonitorRegistry::new();
    assert_eq!(registry.start(scene).unwrap(), StartOutcome::Started);
    registry
}

#[test]
fn test_start_twice_keeps_one_instance() {
    let mut scene = cube_scene();
    let mut registry = started(&mut scene);
    assert_eq!(
        registry.start(&mut scene).unwrap(),
        StartOutcome::AlreadyRunning
    );
    assert_eq!(scene.timers().len(), 1);
}

#[test]
fn test_start_registers_selection_sized_interval() {
    let mut scene = cube_scene();
    for name in ["A", "B", "C"] {
        scene.add(SceneObject::new(name, ObjectType::Mesh).selected());
    }
    let registry = started(&mut scene);

    let expected = tick_interval(4);
    assert_eq!(scene.timers()[0].1, expected);
    assert!(matches!(
        registry.monitor(&scene.document_id()).unwrap().state(),
        MonitorState::Running { interval, .. } if interval == expected
    ));
}

#[test]
fn test_release_with_apply_scale_off_only_rebaselines() {
    let mut scene = cube_scene();
    let mut registry = started(&mut scene);

    scene.set_setting(SettingChange::ApplyScale(false));
    scene.set_scale(&id("Cube"), Vec3::new(2.0, 1.0, 1.0));
    assert_eq!(
        registry.dispatch(&mut scene, &release()),
        EventResponse::PassThrough
    );

    assert!(scene.apply_log().is_empty());
    assert_eq!(
        scene.object(&id("Cube")).unwrap().scale,
        Vec3::new(2.0, 1.0, 1.0)
    );
    let monitor = registry.monitor(&scene.document_id()).unwrap();
    assert!(monitor.is_running());
    assert_eq!(
        monitor.cache().get(&id("Cube")),
        Some(Vec3::new(2.0, 1.0, 1.0))
    );
    assert_eq!(monitor.stats().applied, 0);
}

#[test]
fn test_scale_then_release_applies() {
    let mut scene = cube_scene();
    let mut registry = started(&mut scene);

    scene.set_scale(&id("Cube"), Vec3::new(2.0, 1.0, 1.0));
    assert_eq!(
        registry.dispatch(&mut scene, &release()),
        EventResponse::PassThrough
    );

    let cube = scene.object(&id("Cube")).unwrap();
    assert_eq!(cube.scale, Vec3::ONE);
    assert_eq!(cube.geometry_scale, Vec3::new(2.0, 1.0, 1.0));

    let monitor = registry.monitor(&scene.document_id()).unwrap();
    // Baseline keeps the pre-apply scale
    assert_eq!(
        monitor.cache().get(&id("Cube")),
        Some(Vec3::new(2.0, 1.0, 1.0))
    );
    assert_eq!(monitor.stats().applied, 1);
}

#[test]
fn test_identity_after_apply_is_not_reapplied() {
    let mut scene = cube_scene();
    let mut registry = started(&mut scene);

    scene.set_scale(&id("Cube"), Vec3::new(2.0, 1.0, 1.0));
    registry.dispatch(&mut scene, &release());
    assert_eq!(scene.apply_log().len(), 1);

    // The object is now (1,1,1) against a (2,1,1) baseline
    registry.dispatch(&mut scene, &release());
    assert_eq!(scene.apply_log().len(), 1);
    assert_eq!(
        registry
            .monitor(&scene.document_id())
            .unwrap()
            .cache()
            .get(&id("Cube")),
        Some(Vec3::ONE)
    );
}

#[test]
fn test_small_change_is_ignored() {
    let mut scene = cube_scene();
    let mut registry = started(&mut scene);

    scene.set_scale(&id("Cube"), Vec3::new(1.00005, 1.0, 1.0));
    registry.dispatch(&mut scene, &release());
    assert!(scene.apply_log().is_empty());
}

#[test]
fn test_disabled_type_is_never_applied() {
    let mut scene = cube_scene();
    scene.add(SceneObject::new("Curve", ObjectType::Curve).selected());
    let mut registry = started(&mut scene);

    scene.set_scale(&id("Curve"), Vec3::splat(3.0));
    registry.dispatch(&mut scene, &HostEvent::Timer);
    registry.dispatch(&mut scene, &release());

    assert!(scene.apply_log().is_empty());
    assert_eq!(scene.object(&id("Curve")).unwrap().scale, Vec3::splat(3.0));
}

#[test]
fn test_disabling_type_prunes_tracked_objects() {
    let mut scene = cube_scene();
    scene.add(SceneObject::new("Curve", ObjectType::Curve).selected());
    scene.set_setting(SettingChange::ObjectType(ObjectType::Curve, true));
    let mut registry = started(&mut scene);
    let doc = scene.document_id();
    assert!(registry.monitor(&doc).unwrap().cache().contains(&id("Curve")));

    scene.set_setting(SettingChange::ObjectType(ObjectType::Curve, false));
    scene.set_scale(&id("Curve"), Vec3::splat(3.0));
    registry.dispatch(&mut scene, &release());

    assert!(!registry.monitor(&doc).unwrap().cache().contains(&id("Curve")));
    assert!(scene.apply_log().is_empty());
}

#[test]
fn test_master_switch_stops_on_next_event() {
    let mut scene = cube_scene();
    let mut registry = started(&mut scene);

    scene.settings_mut().enabled = false;
    assert!(registry.is_running(&scene.document_id()));

    scene.set_scale(&id("Cube"), Vec3::splat(2.0));
    assert_eq!(
        registry.dispatch(&mut scene, &release()),
        EventResponse::Cancelled
    );
    assert!(!registry.is_running(&scene.document_id()));
    assert!(scene.timers().is_empty());
    assert!(scene.apply_log().is_empty());
}

#[test]
fn test_exact_identity_is_never_applied() {
    let mut scene = InMemoryScene::new("scene.blend");
    scene.add(
        SceneObject::new("Cube", ObjectType::Mesh)
            .with_scale(Vec3::splat(2.0))
            .selected(),
    );
    let mut registry = started(&mut scene);

    scene.set_scale(&id("Cube"), Vec3::ONE);
    registry.dispatch(&mut scene, &release());
    assert!(scene.apply_log().is_empty());
}

#[test]
fn test_non_object_mode_pauses_loop() {
    let mut scene = cube_scene();
    let mut registry = started(&mut scene);

    scene.set_mode(InteractionMode::Edit);
    scene.set_scale(&id("Cube"), Vec3::splat(2.0));
    assert_eq!(
        registry.dispatch(&mut scene, &release()),
        EventResponse::PassThrough
    );
    assert!(registry.is_running(&scene.document_id()));
    assert!(scene.apply_log().is_empty());

    scene.set_mode(InteractionMode::Object);
    registry.dispatch(&mut scene, &release());
    assert_eq!(scene.apply_log().len(), 1);
}

#[test]
fn test_other_events_pass_through() {
    let mut scene = cube_scene();
    let mut registry = started(&mut scene);
    scene.set_scale(&id("Cube"), Vec3::splat(2.0));

    let events = [
        HostEvent::Key("G".to_string()),
        HostEvent::Other,
        HostEvent::Pointer {
            button: PointerButton::Left,
            action: ButtonAction::Press,
        },
        HostEvent::Pointer {
            button: PointerButton::Right,
            action: ButtonAction::Release,
        },
    ];
    for event in &events {
        assert_eq!(
            registry.dispatch(&mut scene, event),
            EventResponse::PassThrough
        );
    }
    assert!(scene.apply_log().is_empty());

    let stats = registry.monitor(&scene.document_id()).unwrap().stats();
    assert_eq!(stats.ticks, 0);
    assert_eq!(stats.releases, 0);
}

#[test]
fn test_deleted_object_is_pruned() {
    let mut scene = cube_scene();
    scene.add(SceneObject::new("Sphere", ObjectType::Mesh).selected());
    let mut registry = started(&mut scene);
    let doc = scene.document_id();
    assert_eq!(registry.monitor(&doc).unwrap().cache().len(), 2);

    scene.remove(&id("Sphere"));
    registry.dispatch(&mut scene, &HostEvent::Timer);

    let cache = registry.monitor(&doc).unwrap().cache();
    assert!(!cache.contains(&id("Sphere")));
    assert!(cache.contains(&id("Cube")));
}

#[test]
fn test_tick_baselines_new_selection() {
    let mut scene = cube_scene();
    scene.add(SceneObject::new("Sphere", ObjectType::Mesh));
    let mut registry = started(&mut scene);

    scene.select(&["Cube", "Sphere"]);
    registry.dispatch(&mut scene, &HostEvent::Timer);

    scene.set_scale(&id("Sphere"), Vec3::splat(0.5));
    registry.dispatch(&mut scene, &release());

    assert_eq!(scene.apply_log().len(), 1);
    assert_eq!(scene.apply_log()[0].object, id("Sphere"));
}

#[test]
fn test_unavailable_scene_on_release_is_reported() {
    let mut scene = cube_scene();
    let mut registry = started(&mut scene);

    scene.set_unavailable(Some("file is loading".to_string()));
    assert_eq!(
        registry.dispatch(&mut scene, &release()),
        EventResponse::PassThrough
    );
    let errors = scene.reports_at(ReportLevel::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("Auto apply scale error:"));
    assert!(registry.is_running(&scene.document_id()));

    scene.set_unavailable(None);
    scene.set_scale(&id("Cube"), Vec3::splat(2.0));
    registry.dispatch(&mut scene, &release());
    assert_eq!(scene.apply_log().len(), 1);
}

#[test]
fn test_unavailable_scene_on_tick_is_silent() {
    let mut scene = cube_scene();
    let mut registry = started(&mut scene);

    scene.set_unavailable(Some("file is loading".to_string()));
    registry.dispatch(&mut scene, &HostEvent::Timer);
    assert!(scene.reports().is_empty());
    assert!(registry.is_running(&scene.document_id()));
}

#[test]
fn test_addon_full_session() {
    let mut addon = Addon::register();
    let mut scene = cube_scene();

    addon.auto_start(&mut scene).unwrap();
    scene.set_scale(&id("Cube"), Vec3::new(1.0, 2.0, 3.0));
    addon.handle_event(&mut scene, &release());
    assert_eq!(scene.apply_log().len(), 1);

    scene.set_setting(SettingChange::Enabled(false));
    addon
        .on_setting_changed(&mut scene, SettingChange::Enabled(false))
        .unwrap();
    assert_eq!(
        addon.handle_event(&mut scene, &HostEvent::Timer),
        EventResponse::Cancelled
    );

    scene.set_setting(SettingChange::Enabled(true));
    assert_eq!(
        addon
            .on_setting_changed(&mut scene, SettingChange::Enabled(true))
            .unwrap(),
        Some(StartOutcome::Started)
    );
    assert_eq!(scene.timers().len(), 1);

    addon.unregister(&mut scene);
    assert!(scene.timers().is_empty());
}
