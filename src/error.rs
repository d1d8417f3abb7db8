use bevy::prelude::Entity;
use thiserror::Error;

use crate::handle::InputConfigHandle;

/// 输入配置栈的错误
///
/// Errors reported by the input config stack.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputConfigError {
    #[error("input config handle {0} is not on the stack")]
    HandleNotOnStack(InputConfigHandle),
    #[error("unknown input mode value {0}")]
    UnknownInputMode(u8),
    #[error("input config preset `{0}` is not registered")]
    MissingPreset(String),
    #[error("entity {0} has no InputConfigSubsystem")]
    MissingSubsystem(Entity),
}
