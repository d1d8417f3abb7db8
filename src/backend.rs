use std::{
    any::type_name,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
};

use bevy::prelude::*;

use crate::input_mode::{InputMode, MouseCaptureMode, MouseCursor, MouseLockMode};

/// 输入模式的平台默认设置
///
/// An input mode with the platform's default cursor handling for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputModeRequest {
    GameOnly {
        flush_input: bool,
    },
    GameAndUI {
        widget_to_focus: Option<Entity>,
        mouse_lock_mode: MouseLockMode,
        hide_cursor_during_capture: bool,
    },
    UIOnly {
        widget_to_focus: Option<Entity>,
        mouse_lock_mode: MouseLockMode,
        flush_input: bool,
    },
}

/// 发送给平台输入层的命令
///
/// A single call into the host's input, cursor or focus layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCommand {
    /// Switch modes and let the platform pick the cursor defaults.
    SetInputMode(InputModeRequest),
    /// Switch routing only, leaving cursor state to the commands that follow.
    RouteInput(InputMode),
    /// Keyboard and mouse focus. `None` focuses the game viewport.
    SetUserFocus(Option<Entity>),
    SetMouseLockedToViewport(bool),
    SetShowMouseCursor(bool),
    SetMouseCursor(MouseCursor),
    SetMouseLockMode(MouseLockMode),
    SetMouseCaptureMode(MouseCaptureMode),
    SetHideCursorDuringCapture(bool),
    CenterMouseCursor,
    FlushInput,
    SetIgnoreMoveInput(bool),
    SetIgnoreLookInput(bool),
    /// Viewport-wide ignore, used while the UI owns all input.
    SetIgnoreAllInput(bool),
}

/// 平台输入层
///
/// The host's per-player input layer.
///
/// One backend is handed to each [`InputConfigSubsystem`](crate::subsystem::InputConfigSubsystem)
/// when it is created.
pub trait InputModeBackend: Send + Sync + 'static {
    /// Whether the player controller exists. Nothing is applied while it doesn't.
    fn is_ready(&self) -> bool {
        true
    }

    fn is_exclusive_fullscreen(&self) -> bool {
        false
    }

    fn execute(&mut self, command: &InputCommand);

    fn name(&self) -> &'static str {
        type_name::<Self>()
    }
}

/// Traces every command instead of touching a platform.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingInputBackend;

impl InputModeBackend for LoggingInputBackend {
    fn execute(&mut self, command: &InputCommand) {
        debug!("input command: {:?}", command);
    }
}

/// 记录命令的输入层
///
/// Records every command into a log shared between clones, so a copy kept
/// outside the ECS can inspect what was applied.
#[derive(Debug, Clone)]
pub struct RecordingInputBackend {
    commands: Arc<Mutex<Vec<InputCommand>>>,
    ready: Arc<AtomicBool>,
    exclusive_fullscreen: Arc<AtomicBool>,
}

impl Default for RecordingInputBackend {
    fn default() -> Self {
        Self {
            commands: Arc::default(),
            ready: Arc::new(AtomicBool::new(true)),
            exclusive_fullscreen: Arc::default(),
        }
    }
}

impl RecordingInputBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Relaxed);
    }

    pub fn set_exclusive_fullscreen(&self, fullscreen: bool) {
        self.exclusive_fullscreen.store(fullscreen, Ordering::Relaxed);
    }

    /// Everything executed so far.
    pub fn commands(&self) -> Vec<InputCommand> {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Takes everything executed so far, leaving the log empty.
    pub fn drain(&self) -> Vec<InputCommand> {
        std::mem::take(&mut *self.commands.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl InputModeBackend for RecordingInputBackend {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Relaxed)
    }

    fn is_exclusive_fullscreen(&self) -> bool {
        self.exclusive_fullscreen.load(Ordering::Relaxed)
    }

    fn execute(&mut self, command: &InputCommand) {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(*command);
    }
}
