use smallvec::SmallVec;

use crate::{
    backend::{InputCommand, InputModeRequest},
    handle::InputConfigHandle,
    input_mode::{InputMode, InputModeConfig, MouseLockMode},
};

pub type InputCommands = SmallVec<[InputCommand; 12]>;

/// 已应用的输入状态
///
/// What was last pushed to the platform, used to skip redundant calls.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AppliedInputState {
    /// Stack entry the platform state was built from.
    pub handle: Option<InputConfigHandle>,
    pub ignoring_move_input: bool,
    pub ignoring_look_input: bool,
    pub ignoring_all_input: bool,
}

impl AppliedInputState {
    /// 为有效配置生成平台命令
    ///
    /// Builds the commands that apply `config`, updating the tracked
    /// ignore-input flags.
    ///
    /// Ignore-input commands are edge triggered: they are only emitted when
    /// the value changes, or unconditionally when `had_config` is false since
    /// the platform state is then unknown.
    pub fn plan(
        &mut self,
        config: &InputModeConfig,
        had_config: bool,
        exclusive_fullscreen: bool,
    ) -> InputCommands {
        let mut commands = InputCommands::new();

        if config.override_input_mode_default {
            plan_overridden_mode(config, exclusive_fullscreen, &mut commands);
        } else {
            plan_default_mode(config, &mut commands);
        }

        if config.overrides_ignore_look_input() {
            let ignore = config.ignores_look_input();
            if !had_config || self.ignoring_look_input != ignore {
                self.ignoring_look_input = ignore;
                commands.push(InputCommand::SetIgnoreLookInput(ignore));
            }
        }
        if config.overrides_ignore_move_input() {
            let ignore = config.ignores_move_input();
            if !had_config || self.ignoring_move_input != ignore {
                self.ignoring_move_input = ignore;
                commands.push(InputCommand::SetIgnoreMoveInput(ignore));
            }
        }

        let ignore_all = config.input_mode.is_ui_only()
            && !config.overrides_ignore_look_input()
            && !config.overrides_ignore_move_input();
        if !had_config || self.ignoring_all_input != ignore_all {
            self.ignoring_all_input = ignore_all;
            commands.push(InputCommand::SetIgnoreAllInput(ignore_all));
        }

        commands
    }

    /// Forgets everything, as if nothing had ever been applied.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// 撤销仍在生效的忽略输入
    ///
    /// Resets the state and returns the commands that stop ignoring whatever
    /// input the platform still ignores. Used when the stack empties.
    pub fn release(&mut self) -> InputCommands {
        let mut commands = InputCommands::new();
        if self.ignoring_look_input {
            commands.push(InputCommand::SetIgnoreLookInput(false));
        }
        if self.ignoring_move_input {
            commands.push(InputCommand::SetIgnoreMoveInput(false));
        }
        if self.ignoring_all_input {
            commands.push(InputCommand::SetIgnoreAllInput(false));
        }
        self.reset();
        commands
    }
}

fn plan_default_mode(config: &InputModeConfig, commands: &mut InputCommands) {
    match config.input_mode {
        InputMode::GameOnly => {
            commands.push(InputCommand::SetInputMode(InputModeRequest::GameOnly {
                flush_input: config.flush_input,
            }));
            commands.push(InputCommand::SetShowMouseCursor(false));
        }
        InputMode::GameAndUI => {
            commands.push(InputCommand::SetInputMode(InputModeRequest::GameAndUI {
                widget_to_focus: config.focus_widget(),
                mouse_lock_mode: config.mouse_lock_mode,
                hide_cursor_during_capture: config.hides_cursor_during_capture(),
            }));
            plan_cursor_visibility(config, commands);
        }
        InputMode::UIOnly => {
            commands.push(InputCommand::SetInputMode(InputModeRequest::UIOnly {
                widget_to_focus: config.focus_widget(),
                mouse_lock_mode: config.mouse_lock_mode,
                flush_input: config.flush_input,
            }));
            plan_cursor_visibility(config, commands);
        }
    }
}

fn plan_cursor_visibility(config: &InputModeConfig, commands: &mut InputCommands) {
    if config.overrides_mouse_cursor() {
        commands.push(InputCommand::SetMouseCursor(config.mouse_cursor));
    }
    commands.push(InputCommand::SetShowMouseCursor(config.show_mouse_cursor()));
}

fn plan_overridden_mode(
    config: &InputModeConfig,
    exclusive_fullscreen: bool,
    commands: &mut InputCommands,
) {
    commands.push(InputCommand::RouteInput(config.input_mode));
    match config.input_mode {
        InputMode::GameOnly => {
            commands.push(InputCommand::SetUserFocus(None));
            commands.push(InputCommand::SetMouseLockedToViewport(true));
        }
        InputMode::GameAndUI | InputMode::UIOnly => {
            let lock_to_viewport = match config.mouse_lock_mode {
                MouseLockMode::LockAlways => true,
                MouseLockMode::LockInFullscreen => exclusive_fullscreen,
                MouseLockMode::DoNotLock | MouseLockMode::LockOnCapture => false,
            };
            commands.push(InputCommand::SetMouseLockedToViewport(lock_to_viewport));
            commands.push(InputCommand::SetUserFocus(config.focus_widget()));
        }
    }

    if config.overrides_mouse_cursor() {
        commands.push(InputCommand::SetMouseCursor(config.mouse_cursor));
    }
    if config.overrides_mouse_lock_and_capture() {
        commands.push(InputCommand::SetMouseLockMode(config.mouse_lock_mode));
        commands.push(InputCommand::SetHideCursorDuringCapture(
            config.hides_cursor_during_capture(),
        ));
        commands.push(InputCommand::SetMouseCaptureMode(config.mouse_capture_mode));
    }
    if config.sets_show_mouse_cursor() {
        commands.push(InputCommand::SetShowMouseCursor(config.show_mouse_cursor()));
    }
    if config.centers_cursor_on_apply() {
        commands.push(InputCommand::CenterMouseCursor);
    }
    if config.flush_input {
        commands.push(InputCommand::FlushInput);
    }
}
