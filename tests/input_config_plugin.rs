use bevy::prelude::*;
use bevy_input_mode_stack::prelude::*;

#[derive(Resource, Default)]
struct Received {
    changed: Vec<InputConfigChanged>,
    enqueued: Vec<InputConfigEnqueued>,
}

fn collect_messages(
    mut changed: MessageReader<InputConfigChanged>,
    mut enqueued: MessageReader<InputConfigEnqueued>,
    mut received: ResMut<Received>,
) {
    received.changed.extend(changed.read().copied());
    received.enqueued.extend(enqueued.read().copied());
}

fn app() -> App {
    let mut app = App::new();
    app.add_plugins(InputConfigPlugin::new(Last));
    app.init_resource::<Received>();
    app.add_systems(Last, collect_messages.after(InputConfigSystems));
    app
}

fn spawn_player(app: &mut App) -> (Entity, RecordingInputBackend) {
    let backend = RecordingInputBackend::new();
    let player = app
        .world_mut()
        .spawn(InputConfigSubsystem::new(backend.clone()))
        .id();
    (player, backend)
}

fn subsystem(app: &mut App, player: Entity) -> Mut<'_, InputConfigSubsystem> {
    app.world_mut()
        .get_mut::<InputConfigSubsystem>(player)
        .unwrap()
}

fn count_mode_changes(commands: &[InputCommand]) -> usize {
    commands
        .iter()
        .filter(|c| matches!(c, InputCommand::SetInputMode(_) | InputCommand::RouteInput(_)))
        .count()
}

#[test]
fn test_changes_wait_for_the_tick() {
    let mut app = app();
    let (player, backend) = spawn_player(&mut app);

    let handle = subsystem(&mut app, player).push_input_config(InputModeConfig::ui_only());
    assert!(backend.commands().is_empty());
    assert_eq!(subsystem(&mut app, player).current_input_config_handle(), None);

    app.update();
    assert_eq!(
        subsystem(&mut app, player).current_input_config_handle(),
        Some(handle)
    );
    assert_eq!(count_mode_changes(&backend.commands()), 1);
}

#[test]
fn test_many_changes_in_one_tick_apply_once() {
    let mut app = app();
    let (player, backend) = spawn_player(&mut app);

    {
        let mut subsystem = subsystem(&mut app, player);
        subsystem.push_input_config(InputModeConfig::game_only());
        let b = subsystem.push_input_config(InputModeConfig::game_and_ui());
        subsystem.push_input_config(InputModeConfig::ui_only());
        subsystem.pop_input_config(b);
    }
    app.update();

    assert_eq!(count_mode_changes(&backend.commands()), 1);
    let received = app.world().resource::<Received>();
    assert_eq!(received.changed.len(), 1);
    assert_eq!(received.enqueued.len(), 2);

    backend.drain();
    app.update();
    app.update();
    assert!(backend.commands().is_empty());
    assert_eq!(app.world().resource::<Received>().changed.len(), 1);
}

#[test]
fn test_push_then_pop_in_one_tick_has_no_effect() {
    let mut app = app();
    let (player, backend) = spawn_player(&mut app);

    {
        let mut subsystem = subsystem(&mut app, player);
        let handle = subsystem.push_input_config(InputModeConfig::ui_only());
        subsystem.pop_input_config(handle);
    }
    app.update();

    assert!(backend.commands().is_empty());
    let received = app.world().resource::<Received>();
    assert!(received.changed.is_empty());
    assert!(received.enqueued.is_empty());
}

#[test]
fn test_widget_scenario() {
    let mut app = app();
    let (player, backend) = spawn_player(&mut app);
    let widget = app.world_mut().spawn_empty().id();

    let (h1, h2) = {
        let mut subsystem = subsystem(&mut app, player);
        let h1 =
            subsystem.push_input_config(InputModeConfig::game_only().with_flush_input(true));
        let h2 = subsystem.push_input_config(
            InputModeConfig::ui_only()
                .with_show_mouse_cursor(true)
                .with_widget_to_focus(widget),
        );
        (h1, h2)
    };
    app.update();

    let folded = subsystem(&mut app, player).input_config_from_stack().unwrap();
    assert_eq!(folded.input_mode, InputMode::UIOnly);
    assert_eq!(folded.widget_to_focus, Some(widget));
    assert!(backend.drain().contains(&InputCommand::SetInputMode(
        InputModeRequest::UIOnly {
            widget_to_focus: Some(widget),
            mouse_lock_mode: MouseLockMode::LockAlways,
            flush_input: true,
        }
    )));

    subsystem(&mut app, player).pop_input_config(h2);
    app.update();

    let folded = subsystem(&mut app, player).input_config_from_stack().unwrap();
    assert_eq!(folded.input_mode, InputMode::GameOnly);
    assert_eq!(folded.widget_to_focus, None);
    assert_eq!(
        backend.drain(),
        vec![
            InputCommand::SetInputMode(InputModeRequest::GameOnly { flush_input: true }),
            InputCommand::SetShowMouseCursor(false),
            InputCommand::SetIgnoreAllInput(false),
        ]
    );

    let received = app.world().resource::<Received>();
    assert_eq!(
        received.changed,
        vec![
            InputConfigChanged {
                player,
                previous: None,
                current: Some(h2),
            },
            InputConfigChanged {
                player,
                previous: Some(h2),
                current: Some(h1),
            },
        ]
    );
}

#[test]
fn test_players_are_independent() {
    let mut app = app();
    let (first, first_backend) = spawn_player(&mut app);
    let (second, second_backend) = spawn_player(&mut app);

    subsystem(&mut app, first).push_input_config(InputModeConfig::ui_only());
    app.update();

    assert!(!first_backend.commands().is_empty());
    assert!(second_backend.commands().is_empty());
    assert_eq!(
        subsystem(&mut app, second).peek_input_config_stack(),
        None
    );
}

#[test]
fn test_state_task_lifecycle() {
    let mut app = app();
    let (player, backend) = spawn_player(&mut app);
    app.world_mut()
        .resource_mut::<InputConfigPresets>()
        .insert(
            "pause_menu",
            InputConfigPreset::new("Pause Menu", InputModeConfig::ui_only()),
        );

    subsystem(&mut app, player).push_input_config(InputModeConfig::game_only());
    app.update();
    backend.drain();

    let state = app
        .world_mut()
        .spawn(ChangeInputConfigTask::from_preset(player, "pause_menu"))
        .id();
    app.update();
    assert_eq!(
        subsystem(&mut app, player)
            .current_input_config()
            .map(|c| c.input_mode),
        Some(InputMode::UIOnly)
    );
    assert!(backend.drain().contains(&InputCommand::SetIgnoreAllInput(true)));

    app.world_mut().despawn(state);
    app.update();
    assert_eq!(
        subsystem(&mut app, player)
            .current_input_config()
            .map(|c| c.input_mode),
        Some(InputMode::GameOnly)
    );
    assert!(backend.drain().contains(&InputCommand::SetIgnoreAllInput(false)));
}

#[test]
fn test_missing_controller_retries_on_next_change() {
    let mut app = app();
    let (player, backend) = spawn_player(&mut app);
    backend.set_ready(false);

    let first = subsystem(&mut app, player).push_input_config(InputModeConfig::game_and_ui());
    app.update();
    assert!(backend.commands().is_empty());
    assert!(app.world().resource::<Received>().enqueued.is_empty());

    backend.set_ready(true);
    app.update();
    assert!(backend.commands().is_empty());

    let second = subsystem(&mut app, player).push_input_config(InputModeConfig::ui_only());
    app.update();
    assert_eq!(count_mode_changes(&backend.commands()), 1);
    let enqueued: Vec<_> = app
        .world()
        .resource::<Received>()
        .enqueued
        .iter()
        .map(|e| e.handle)
        .collect();
    assert_eq!(enqueued, vec![first, second]);
}

#[test]
fn test_teardown_clears_stack() {
    let mut app = app();
    let (player, backend) = spawn_player(&mut app);
    subsystem(&mut app, player).push_input_config(InputModeConfig::ui_only());

    let removed = app
        .world_mut()
        .entity_mut(player)
        .take::<InputConfigSubsystem>()
        .unwrap();
    assert!(removed.stack().is_empty());
    assert!(!removed.is_update_scheduled());

    app.update();
    assert!(backend.commands().is_empty());
}
