use std::fmt::Debug;

use bevy::{
    ecs::{lifecycle::HookContext, world::DeferredWorld},
    prelude::*,
};
use smallvec::SmallVec;

use crate::{
    applier::AppliedInputState,
    backend::{InputModeBackend, LoggingInputBackend},
    config_stack::InputConfigStack,
    error::InputConfigError,
    handle::InputConfigHandle,
    input_mode::InputModeConfig,
    scheduler::UpdateScheduler,
};

/// 一个配置已入队并被处理
///
/// A pushed config was picked up by an update.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputConfigEnqueued {
    pub player: Entity,
    pub handle: InputConfigHandle,
}

/// 当前应用的配置已改变
///
/// The applied stack entry changed. `current` is `None` once the stack empties.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputConfigChanged {
    pub player: Entity,
    pub previous: Option<InputConfigHandle>,
    pub current: Option<InputConfigHandle>,
}

/// Outcome of one [`InputConfigSubsystem::update`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputConfigUpdate {
    pub previous: Option<InputConfigHandle>,
    pub current: Option<InputConfigHandle>,
    /// Whether any platform command was executed.
    pub applied: bool,
    /// Handles pushed since the previous update, in push order.
    pub enqueued: SmallVec<[InputConfigHandle; 4]>,
}

impl InputConfigUpdate {
    pub fn changed(&self) -> bool {
        self.previous != self.current
    }
}

/// 输入配置子系统
///
/// Input config subsystem
/// # 作用\Purpose
/// * 为一个本地玩家管理输入配置栈
/// - Manages the input config stack of one local player
/// * 每帧最多合并并应用一次
/// - Folds and applies the stack at most once per frame
///
/// Lives on the local player entity. Pushes and pops take effect at the next
/// run of the plugin's update schedule, never synchronously.
///
/// # 示例\Example
/// ```
/// # use bevy::prelude::*;
/// # use bevy_input_mode_stack::prelude::*;
/// # fn foo(mut commands: Commands) {
/// commands.spawn(InputConfigSubsystem::new(LoggingInputBackend));
/// # }
/// ```
#[derive(Component)]
#[component(on_remove = Self::on_remove)]
pub struct InputConfigSubsystem {
    stack: InputConfigStack,
    applied: AppliedInputState,
    scheduler: UpdateScheduler,
    backend: Box<dyn InputModeBackend>,
}

impl Default for InputConfigSubsystem {
    fn default() -> Self {
        Self::new(LoggingInputBackend)
    }
}

impl Debug for InputConfigSubsystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputConfigSubsystem")
            .field("stack", &self.stack)
            .field("applied", &self.applied)
            .field("scheduler", &self.scheduler)
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl InputConfigSubsystem {
    pub fn new(backend: impl InputModeBackend) -> Self {
        Self {
            stack: InputConfigStack::new(),
            applied: AppliedInputState::default(),
            scheduler: UpdateScheduler::default(),
            backend: Box::new(backend),
        }
    }

    /// 推入一个输入配置
    ///
    /// Pushes a config onto the stack and schedules an update.
    pub fn push_input_config(&mut self, config: InputModeConfig) -> InputConfigHandle {
        let handle = self.stack.push(config);
        trace!(
            "push input config: {} {}",
            self.stack.describe_handle(Some(handle)),
            handle
        );
        self.schedule_update();
        handle
    }

    /// 移除一个输入配置
    ///
    /// Removes a config wherever it sits in the stack and schedules an update.
    /// Not really a pop: a state further down the tree may exit before its
    /// ancestor.
    ///
    /// Popping a handle that is not on the stack is a bug in the caller. It
    /// trips a debug assertion and is otherwise ignored.
    pub fn pop_input_config(&mut self, handle: InputConfigHandle) {
        debug_assert!(
            self.stack.contains(handle),
            "popped input config {handle} is not on the stack"
        );
        if let Err(e) = self.try_pop_input_config(handle) {
            warn!("pop input config: {}", e);
        }
    }

    /// Like [`Self::pop_input_config`] but reports an unknown handle instead of asserting.
    pub fn try_pop_input_config(
        &mut self,
        handle: InputConfigHandle,
    ) -> Result<InputModeConfig, InputConfigError> {
        trace!(
            "pop input config: {}",
            self.stack.describe_handle(Some(handle))
        );
        let config = self.stack.remove(handle)?;
        self.schedule_update();
        Ok(config)
    }

    pub fn get_input_config(&self, handle: Option<InputConfigHandle>) -> Option<&InputModeConfig> {
        self.stack.get(handle)
    }

    /// Config of the entry the platform state was last built from.
    pub fn current_input_config(&self) -> Option<&InputModeConfig> {
        self.stack.get(self.applied.handle)
    }

    pub fn current_input_config_handle(&self) -> Option<InputConfigHandle> {
        self.applied.handle
    }

    pub fn peek_input_config_stack(&self) -> Option<InputConfigHandle> {
        self.stack.peek()
    }

    /// The effective config of the whole stack, see [`InputConfigStack::fold`].
    pub fn input_config_from_stack(&self) -> Option<InputModeConfig> {
        self.stack.fold()
    }

    pub fn describe_handle(&self, handle: Option<InputConfigHandle>) -> String {
        self.stack.describe_handle(handle)
    }

    pub fn stack(&self) -> &InputConfigStack {
        &self.stack
    }

    pub fn applied_state(&self) -> &AppliedInputState {
        &self.applied
    }

    pub fn backend(&self) -> &dyn InputModeBackend {
        self.backend.as_ref()
    }

    pub fn schedule_update(&mut self) {
        if self.scheduler.schedule() {
            trace!("input config update scheduled");
        }
    }

    #[inline]
    pub fn is_update_scheduled(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// 应用栈顶配置
    ///
    /// Applies the stack to the backend if its top changed since the last
    /// update, then drains the enqueued handles.
    ///
    /// `is_alive` decides whether the focus widget still exists.
    pub fn update(&mut self, is_alive: impl Fn(Entity) -> bool) -> InputConfigUpdate {
        self.scheduler.take();
        let previous = self.applied.handle;

        if !self.backend.is_ready() {
            warn!(
                "input config update skipped: {} has no player controller",
                self.backend.name()
            );
            return InputConfigUpdate {
                previous,
                current: previous,
                ..default()
            };
        }

        let candidate = self.stack.peek();
        let applied = candidate != previous && self.apply(previous, candidate, is_alive);
        debug_assert_eq!(self.applied.handle, self.stack.peek());

        let enqueued = self.stack.take_enqueued();
        debug_assert!(candidate.is_some() || enqueued.is_empty());
        InputConfigUpdate {
            previous,
            current: self.applied.handle,
            applied,
            enqueued,
        }
    }

    fn apply(
        &mut self,
        previous: Option<InputConfigHandle>,
        candidate: Option<InputConfigHandle>,
        is_alive: impl Fn(Entity) -> bool,
    ) -> bool {
        debug!(
            "changing input config: {} <- {}",
            self.stack.describe_handle(candidate),
            self.stack.describe_handle(previous)
        );
        self.applied.handle = candidate;
        if self.stack.get(candidate).is_none() {
            info!("input config stack is empty, nothing to apply");
            let commands = self.applied.release();
            for command in &commands {
                self.backend.execute(command);
            }
            return !commands.is_empty();
        }
        let Some(mut config) = self.stack.fold() else {
            return false;
        };
        if let Some(widget) = config.widget_to_focus
            && !is_alive(widget)
        {
            debug!("widget to focus {} no longer exists", widget);
            config.widget_to_focus = None;
        }
        trace!("applying input config: {:?}", config);

        let commands = self.applied.plan(
            &config,
            previous.is_some(),
            self.backend.is_exclusive_fullscreen(),
        );
        for command in &commands {
            self.backend.execute(command);
        }
        true
    }

    /// 清空子系统
    ///
    /// Drops every config and cancels the pending update. Runs when the
    /// component is removed from the player.
    pub fn deinitialize(&mut self) {
        self.scheduler.cancel();
        self.stack.clear();
        self.applied.reset();
    }

    fn on_remove(mut world: DeferredWorld, HookContext { entity, .. }: HookContext) {
        let Some(mut subsystem) = world.get_mut::<InputConfigSubsystem>(entity) else {
            return;
        };
        debug!(
            "input config subsystem of {} torn down with {} configs",
            entity,
            subsystem.stack.len()
        );
        subsystem.deinitialize();
    }
}

/// Runs the pending update of every player that has one.
pub fn update_input_config_subsystems(
    mut subsystems: Query<(Entity, &mut InputConfigSubsystem)>,
    alive: Query<()>,
    mut changed_messages: MessageWriter<InputConfigChanged>,
    mut enqueued_messages: MessageWriter<InputConfigEnqueued>,
) {
    for (player, mut subsystem) in &mut subsystems {
        if !subsystem.is_update_scheduled() {
            continue;
        }
        let update = subsystem.update(|entity| alive.contains(entity));
        if update.changed() {
            changed_messages.write(InputConfigChanged {
                player,
                previous: update.previous,
                current: update.current,
            });
        }
        for handle in update.enqueued {
            enqueued_messages.write(InputConfigEnqueued { player, handle });
        }
    }
}

pub fn any_input_config_update_scheduled(subsystems: Query<&InputConfigSubsystem>) -> bool {
    subsystems.iter().any(InputConfigSubsystem::is_update_scheduled)
}
