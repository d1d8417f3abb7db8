use bevy::{
    ecs::{lifecycle::HookContext, world::DeferredWorld},
    prelude::*,
};

use crate::{
    error::InputConfigError,
    handle::InputConfigHandle,
    input_mode::InputModeConfig,
    preset::InputConfigPresets,
    subsystem::InputConfigSubsystem,
};

/// Where a [`ChangeInputConfigTask`] gets its config from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputConfigSource {
    Inline(InputModeConfig),
    /// Name of an entry in [`InputConfigPresets`].
    Preset(String),
}

impl Default for InputConfigSource {
    fn default() -> Self {
        Self::Inline(InputModeConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputConfigTaskStatus {
    /// Not pushed yet, or already popped.
    #[default]
    Pending,
    Running,
    /// The player had no [`InputConfigSubsystem`].
    Failed,
}

/// 切换输入配置的状态任务
///
/// Change input config task
/// # 作用\Purpose
/// * 插入时把配置推入玩家的输入配置栈 (进入状态)
/// - Pushes its config onto the player's stack when inserted (entering the state)
/// * 替换或移除时把配置移出栈 (退出状态)
/// - Removes it again when replaced or removed (exiting the state)
///
/// # 示例\Example
/// ```
/// # use bevy::prelude::*;
/// # use bevy_input_mode_stack::prelude::*;
/// # fn foo(mut commands: Commands, player: Entity) {
/// commands.spawn(ChangeInputConfigTask::new(player, InputModeConfig::ui_only()));
/// # }
/// ```
#[derive(Component, Debug, Clone, PartialEq, Eq)]
#[component(on_insert = Self::on_insert, on_replace = Self::on_replace)]
pub struct ChangeInputConfigTask {
    /// Entity holding the [`InputConfigSubsystem`].
    pub player: Entity,
    pub source: InputConfigSource,
    handle: Option<InputConfigHandle>,
    status: InputConfigTaskStatus,
}

impl ChangeInputConfigTask {
    pub fn new(player: Entity, config: InputModeConfig) -> Self {
        Self {
            player,
            source: InputConfigSource::Inline(config),
            handle: None,
            status: InputConfigTaskStatus::Pending,
        }
    }

    pub fn from_preset(player: Entity, preset: impl Into<String>) -> Self {
        Self {
            player,
            source: InputConfigSource::Preset(preset.into()),
            handle: None,
            status: InputConfigTaskStatus::Pending,
        }
    }

    /// Handle of the pushed config while the task runs.
    pub fn handle(&self) -> Option<InputConfigHandle> {
        self.handle
    }

    pub fn status(&self) -> InputConfigTaskStatus {
        self.status
    }

    pub fn resolve_input_config(
        &self,
        presets: Option<&InputConfigPresets>,
    ) -> Result<InputModeConfig, InputConfigError> {
        match &self.source {
            InputConfigSource::Inline(config) => Ok(config.clone()),
            InputConfigSource::Preset(name) => presets
                .and_then(|presets| presets.get(name.as_str()))
                .map(|preset| preset.input_config.clone())
                .ok_or_else(|| InputConfigError::MissingPreset(name.clone())),
        }
    }

    /// Checks ahead of time that a referenced preset is registered.
    pub fn validate(&self, presets: &InputConfigPresets) -> Result<(), InputConfigError> {
        self.resolve_input_config(Some(presets)).map(|_| ())
    }

    fn on_insert(mut world: DeferredWorld, HookContext { entity, .. }: HookContext) {
        let Some(task) = world.get::<ChangeInputConfigTask>(entity) else {
            return;
        };
        let player = task.player;
        if task.handle.is_some() {
            warn!("ChangeInputConfigTask<{}> entered while still holding a handle", entity);
        }
        let config = match task.resolve_input_config(world.get_resource::<InputConfigPresets>()) {
            Ok(config) => config,
            Err(e) => {
                error!("ChangeInputConfigTask<{}>: {}", entity, e);
                InputModeConfig::default()
            }
        };

        let handle = match world.get_mut::<InputConfigSubsystem>(player) {
            Some(mut subsystem) => Some(subsystem.push_input_config(config)),
            None => {
                error!(
                    "ChangeInputConfigTask<{}>: {}",
                    entity,
                    InputConfigError::MissingSubsystem(player)
                );
                None
            }
        };

        let Some(mut task) = world.get_mut::<ChangeInputConfigTask>(entity) else {
            return;
        };
        task.handle = handle;
        task.status = match handle {
            Some(_) => InputConfigTaskStatus::Running,
            None => InputConfigTaskStatus::Failed,
        };
    }

    fn on_replace(mut world: DeferredWorld, HookContext { entity, .. }: HookContext) {
        let (player, handle) = {
            let Some(mut task) = world.get_mut::<ChangeInputConfigTask>(entity) else {
                return;
            };
            task.status = InputConfigTaskStatus::Pending;
            let Some(handle) = task.handle.take() else {
                return;
            };
            (task.player, handle)
        };

        let Some(mut subsystem) = world.get_mut::<InputConfigSubsystem>(player) else {
            return;
        };
        if let Err(e) = subsystem.try_pop_input_config(handle) {
            warn!("ChangeInputConfigTask<{}>: {}", entity, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        backend::RecordingInputBackend,
        input_mode::InputMode,
        preset::InputConfigPreset,
    };

    use super::*;

    #[test]
    fn test_task_pushes_and_pops() {
        let mut world = World::new();
        let player = world
            .spawn(InputConfigSubsystem::new(RecordingInputBackend::new()))
            .id();
        let task = world
            .spawn(ChangeInputConfigTask::new(player, InputModeConfig::ui_only()))
            .id();

        let handle = world.get::<ChangeInputConfigTask>(task).unwrap().handle();
        assert!(handle.is_some());
        assert_eq!(
            world.get::<ChangeInputConfigTask>(task).unwrap().status(),
            InputConfigTaskStatus::Running
        );
        let subsystem = world.get::<InputConfigSubsystem>(player).unwrap();
        assert_eq!(subsystem.peek_input_config_stack(), handle);

        world.entity_mut(task).remove::<ChangeInputConfigTask>();
        let subsystem = world.get::<InputConfigSubsystem>(player).unwrap();
        assert_eq!(subsystem.peek_input_config_stack(), None);
        assert!(subsystem.is_update_scheduled());
    }

    #[test]
    fn test_task_replace_swaps_config() {
        let mut world = World::new();
        let player = world
            .spawn(InputConfigSubsystem::new(RecordingInputBackend::new()))
            .id();
        let task = world
            .spawn(ChangeInputConfigTask::new(player, InputModeConfig::ui_only()))
            .id();
        world
            .entity_mut(task)
            .insert(ChangeInputConfigTask::new(player, InputModeConfig::game_and_ui()));

        let subsystem = world.get::<InputConfigSubsystem>(player).unwrap();
        assert_eq!(subsystem.stack().len(), 1);
        assert_eq!(
            subsystem
                .get_input_config(subsystem.peek_input_config_stack())
                .map(|c| c.input_mode),
            Some(InputMode::GameAndUI)
        );
    }

    #[test]
    fn test_task_without_subsystem_fails() {
        let mut world = World::new();
        let player = world.spawn_empty().id();
        let task = world
            .spawn(ChangeInputConfigTask::new(player, InputModeConfig::ui_only()))
            .id();

        let task = world.get::<ChangeInputConfigTask>(task).unwrap();
        assert_eq!(task.status(), InputConfigTaskStatus::Failed);
        assert_eq!(task.handle(), None);
    }

    #[test]
    fn test_task_from_preset() {
        let mut world = World::new();
        let mut presets = InputConfigPresets::new();
        presets.insert(
            "menu",
            InputConfigPreset::new("Menu", InputModeConfig::ui_only()),
        );
        world.insert_resource(presets);
        let player = world
            .spawn(InputConfigSubsystem::new(RecordingInputBackend::new()))
            .id();
        world.spawn(ChangeInputConfigTask::from_preset(player, "menu"));

        let subsystem = world.get::<InputConfigSubsystem>(player).unwrap();
        assert_eq!(
            subsystem
                .input_config_from_stack()
                .map(|c| c.input_mode),
            Some(InputMode::UIOnly)
        );
    }

    #[test]
    fn test_task_missing_preset_pushes_default() {
        let mut world = World::new();
        world.init_resource::<InputConfigPresets>();
        let player = world
            .spawn(InputConfigSubsystem::new(RecordingInputBackend::new()))
            .id();
        let task = world
            .spawn(ChangeInputConfigTask::from_preset(player, "missing"))
            .id();

        let task = world.get::<ChangeInputConfigTask>(task).unwrap();
        assert_eq!(task.status(), InputConfigTaskStatus::Running);
        assert_eq!(
            task.validate(world.resource::<InputConfigPresets>()),
            Err(InputConfigError::MissingPreset("missing".to_string()))
        );
        let subsystem = world.get::<InputConfigSubsystem>(player).unwrap();
        assert_eq!(
            subsystem.input_config_from_stack(),
            Some(InputModeConfig::default())
        );
    }

    #[test]
    fn test_task_outlives_subsystem() {
        let mut world = World::new();
        let player = world
            .spawn(InputConfigSubsystem::new(RecordingInputBackend::new()))
            .id();
        let task = world
            .spawn(ChangeInputConfigTask::new(player, InputModeConfig::ui_only()))
            .id();
        world.despawn(player);
        world.despawn(task);
        assert!(world.get_entity(task).is_err());
    }
}
