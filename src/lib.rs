//! # Bevy Input Mode Stack
//!
//! 一个基于 Bevy 引擎的按玩家输入模式栈。
//!
//! ## 功能特性
//!
//! - 每个本地玩家拥有一个输入配置栈, 可按任意顺序推入和移除
//! - 按字段合并整个栈, 移除栈顶会恢复下层配置的覆盖项
//! - 同一帧内的多次修改只在帧边界应用一次
//! - 支持随状态进入/退出自动推入和移除的任务组件
//! -------------------------------------------------------
//! # Bevy Input Mode Stack
//!
//! A per-player input mode stack for the Bevy engine.
//!
//! ## Features
//!
//! - Every local player owns a stack of input configs that can be pushed and removed in any order
//! - The stack is merged field by field, so removing the top reveals the overrides below it
//! - Any number of changes within a frame are applied once, at the frame boundary
//! - A task component pushes and removes a config as a state is entered and exited

pub mod applier;
pub mod backend;
pub mod config_stack;
pub mod error;
pub mod handle;
pub mod input_mode;
pub mod preset;
pub mod scheduler;
pub mod subsystem;
pub mod task;

use bevy::{ecs::schedule::ScheduleLabel, prelude::*};

use crate::{
    preset::InputConfigPresets,
    subsystem::{
        InputConfigChanged, InputConfigEnqueued, any_input_config_update_scheduled,
        update_input_config_subsystems,
    },
};

/// Systems that apply pending input config updates.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct InputConfigSystems;

/// # 示例\Example
/// ```
/// # use bevy::prelude::*;
/// # use bevy_input_mode_stack::prelude::*;
/// App::new().add_plugins(InputConfigPlugin::new(Last));
/// ```
#[derive(Debug, Default)]
pub struct InputConfigPlugin<T: ScheduleLabel = Last> {
    /// 应用输入配置的调度器
    ///
    /// Schedule the pending updates are applied in. Defaults to [`Last`], the
    /// boundary after all of the frame's gameplay systems.
    update_schedule: T,
}

impl<T: ScheduleLabel + Clone> InputConfigPlugin<T> {
    pub fn new(update_schedule: T) -> Self {
        Self { update_schedule }
    }
}

impl<T: ScheduleLabel + Clone> Plugin for InputConfigPlugin<T> {
    fn build(&self, app: &mut App) {
        app.init_resource::<InputConfigPresets>();
        app.add_message::<InputConfigEnqueued>();
        app.add_message::<InputConfigChanged>();

        app.add_systems(
            self.update_schedule.clone(),
            update_input_config_subsystems
                .in_set(InputConfigSystems)
                .run_if(any_input_config_update_scheduled),
        );
    }
}

pub mod prelude {
    pub use crate::{
        InputConfigPlugin, InputConfigSystems,
        applier::AppliedInputState,
        backend::{
            InputCommand, InputModeBackend, InputModeRequest, LoggingInputBackend,
            RecordingInputBackend,
        },
        config_stack::InputConfigStack,
        error::InputConfigError,
        handle::InputConfigHandle,
        input_mode::{
            IgnoreInputConfig, InputMode, InputModeConfig, MouseCaptureMode, MouseCursor,
            MouseLockMode,
        },
        preset::{InputConfigPreset, InputConfigPresets},
        subsystem::{
            InputConfigChanged, InputConfigEnqueued, InputConfigSubsystem, InputConfigUpdate,
        },
        task::{ChangeInputConfigTask, InputConfigSource, InputConfigTaskStatus},
    };
}
