use std::fmt::Display;

use bevy::prelude::*;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

use crate::error::InputConfigError;

/// 玩家控制器的输入模式
///
/// Input modes that can be set up for a player controller.
#[derive(Debug, Clone, Copy, Default, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum InputMode {
    /// Only gameplay responds to user input.
    #[default]
    GameOnly = 0,
    /// The UI responds first; gameplay gets whatever the UI leaves unhandled.
    GameAndUI = 1,
    /// Only the UI responds to user input.
    UIOnly = 2,
}

impl InputMode {
    pub const fn display_name(&self) -> &'static str {
        match self {
            InputMode::GameOnly => "Game Only",
            InputMode::GameAndUI => "Game And UI",
            InputMode::UIOnly => "UI Only",
        }
    }

    #[inline]
    pub const fn is_game_only(&self) -> bool {
        matches!(self, Self::GameOnly)
    }

    #[inline]
    pub const fn is_ui_only(&self) -> bool {
        matches!(self, Self::UIOnly)
    }
}

impl Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl TryFrom<u8> for InputMode {
    type Error = InputConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::GameOnly),
            1 => Ok(Self::GameAndUI),
            2 => Ok(Self::UIOnly),
            other => Err(InputConfigError::UnknownInputMode(other)),
        }
    }
}

/// 硬件鼠标光标样式
///
/// Hardware mouse cursor glyphs.
#[derive(Debug, Clone, Copy, Default, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum MouseCursor {
    /// No cursor is visible.
    None,
    /// Arrow.
    #[default]
    Default,
    TextEditBeam,
    ResizeLeftRight,
    ResizeUpDown,
    ResizeSouthEast,
    ResizeSouthWest,
    CardinalCross,
    Crosshairs,
    Hand,
    GrabHand,
    GrabHandClosed,
    SlashedCircle,
    EyeDropper,
    /// Platform specific shape. Behaves like `None` when the platform has none set.
    Custom,
}

/// When the mouse is locked to the game viewport.
#[derive(Debug, Clone, Copy, Default, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum MouseLockMode {
    DoNotLock,
    LockOnCapture,
    #[default]
    LockAlways,
    LockInFullscreen,
}

/// When the game viewport captures the mouse.
#[derive(Debug, Clone, Copy, Default, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum MouseCaptureMode {
    NoCapture,
    #[default]
    CapturePermanently,
    CapturePermanentlyIncludingInitialMouseDown,
    CaptureDuringMouseDown,
    CaptureDuringRightMouseDown,
}

/// 忽略移动/视角输入的配置
///
/// Whether to ignore the player's move and look input. Each value only counts
/// when its override flag is set.
#[derive(Debug, Clone, Copy, Default, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct IgnoreInputConfig {
    pub override_ignore_move_input: bool,
    pub ignore_move_input: bool,
    pub override_ignore_look_input: bool,
    pub ignore_look_input: bool,
}

impl IgnoreInputConfig {
    pub const fn ignores_move_input(&self) -> bool {
        self.override_ignore_move_input && self.ignore_move_input
    }

    pub const fn ignores_look_input(&self) -> bool {
        self.override_ignore_look_input && self.ignore_look_input
    }
}

/// 输入模式及其相关配置
///
/// Player input mode and the cursor behaviour that goes with it.
///
/// Read the gated getters rather than the raw fields: with
/// `override_input_mode_default` unset, the cursor fields mean nothing for
/// [`InputMode::GameOnly`] and the ignore-input fields mean nothing for
/// [`InputMode::UIOnly`].
///
/// # 示例\Example
/// ```
/// # use bevy::prelude::*;
/// # use bevy_input_mode_stack::prelude::*;
/// let config = InputModeConfig::ui_only()
///     .with_mouse_cursor(MouseCursor::Hand)
///     .with_flush_input(false);
/// assert!(config.overrides_mouse_cursor());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct InputModeConfig {
    pub input_mode: InputMode,
    /// When false the platform defaults of `input_mode` apply and most of the
    /// fields below are ignored.
    pub override_input_mode_default: bool,
    pub flush_input: bool,
    pub ignore_input: IgnoreInputConfig,
    pub show_mouse_cursor: bool,
    /// Warp the cursor to the middle of the viewport when applied.
    pub center_cursor_on_apply: bool,
    pub override_mouse_cursor: bool,
    pub mouse_cursor: MouseCursor,
    pub override_mouse_lock_and_capture: bool,
    pub mouse_lock_mode: MouseLockMode,
    pub mouse_capture_mode: MouseCaptureMode,
    pub hide_cursor_during_capture: bool,
    /// Not owned. Checked for liveness when the config is applied.
    #[cfg_attr(feature = "serialize", serde(skip))]
    pub widget_to_focus: Option<Entity>,
}

impl Default for InputModeConfig {
    fn default() -> Self {
        Self {
            input_mode: InputMode::GameOnly,
            override_input_mode_default: false,
            flush_input: true,
            ignore_input: IgnoreInputConfig::default(),
            show_mouse_cursor: true,
            center_cursor_on_apply: false,
            override_mouse_cursor: false,
            mouse_cursor: MouseCursor::Default,
            override_mouse_lock_and_capture: false,
            mouse_lock_mode: MouseLockMode::LockAlways,
            mouse_capture_mode: MouseCaptureMode::CapturePermanently,
            hide_cursor_during_capture: false,
            widget_to_focus: None,
        }
    }
}

impl InputModeConfig {
    pub fn new(input_mode: InputMode) -> Self {
        Self {
            input_mode,
            ..default()
        }
    }

    pub fn game_only() -> Self {
        Self::new(InputMode::GameOnly)
    }

    pub fn game_and_ui() -> Self {
        Self::new(InputMode::GameAndUI)
    }

    pub fn ui_only() -> Self {
        Self::new(InputMode::UIOnly)
    }

    pub fn with_override_input_mode_default(mut self, value: bool) -> Self {
        self.override_input_mode_default = value;
        self
    }

    pub fn with_flush_input(mut self, value: bool) -> Self {
        self.flush_input = value;
        self
    }

    pub fn with_show_mouse_cursor(mut self, value: bool) -> Self {
        self.show_mouse_cursor = value;
        self
    }

    pub fn with_center_cursor_on_apply(mut self, value: bool) -> Self {
        self.center_cursor_on_apply = value;
        self
    }

    /// Sets the cursor glyph and turns on its override.
    pub fn with_mouse_cursor(mut self, cursor: MouseCursor) -> Self {
        self.override_mouse_cursor = true;
        self.mouse_cursor = cursor;
        self
    }

    /// Sets lock, capture and hide-during-capture and turns on their override.
    pub fn with_mouse_lock_and_capture(
        mut self,
        lock_mode: MouseLockMode,
        capture_mode: MouseCaptureMode,
        hide_cursor_during_capture: bool,
    ) -> Self {
        self.override_mouse_lock_and_capture = true;
        self.mouse_lock_mode = lock_mode;
        self.mouse_capture_mode = capture_mode;
        self.hide_cursor_during_capture = hide_cursor_during_capture;
        self
    }

    pub fn with_ignore_move_input(mut self, ignore: bool) -> Self {
        self.ignore_input.override_ignore_move_input = true;
        self.ignore_input.ignore_move_input = ignore;
        self
    }

    pub fn with_ignore_look_input(mut self, ignore: bool) -> Self {
        self.ignore_input.override_ignore_look_input = true;
        self.ignore_input.ignore_look_input = ignore;
        self
    }

    pub fn with_widget_to_focus(mut self, widget: Entity) -> Self {
        self.widget_to_focus = Some(widget);
        self
    }

    /// GameOnly keeps its platform cursor defaults unless overridden.
    #[inline]
    fn uses_game_only_defaults(&self) -> bool {
        !self.override_input_mode_default && self.input_mode.is_game_only()
    }

    /// UIOnly ignores gameplay input wholesale unless overridden.
    #[inline]
    fn uses_ui_only_defaults(&self) -> bool {
        !self.override_input_mode_default && self.input_mode.is_ui_only()
    }

    /// Whether this config has an opinion on cursor visibility at all.
    pub fn sets_show_mouse_cursor(&self) -> bool {
        !self.uses_game_only_defaults()
    }

    pub fn show_mouse_cursor(&self) -> bool {
        self.sets_show_mouse_cursor() && self.show_mouse_cursor
    }

    pub fn centers_cursor_on_apply(&self) -> bool {
        self.sets_show_mouse_cursor() && self.center_cursor_on_apply
    }

    /// A glyph only applies to a visible cursor.
    pub fn overrides_mouse_cursor(&self) -> bool {
        self.show_mouse_cursor() && self.override_mouse_cursor
    }

    pub fn overrides_mouse_lock_and_capture(&self) -> bool {
        !self.uses_game_only_defaults() && self.override_mouse_lock_and_capture
    }

    pub fn hides_cursor_during_capture(&self) -> bool {
        !self.uses_game_only_defaults() && self.hide_cursor_during_capture
    }

    pub fn overrides_ignore_move_input(&self) -> bool {
        !self.uses_ui_only_defaults() && self.ignore_input.override_ignore_move_input
    }

    pub fn ignores_move_input(&self) -> bool {
        self.overrides_ignore_move_input() && self.ignore_input.ignores_move_input()
    }

    pub fn overrides_ignore_look_input(&self) -> bool {
        !self.uses_ui_only_defaults() && self.ignore_input.override_ignore_look_input
    }

    pub fn ignores_look_input(&self) -> bool {
        self.overrides_ignore_look_input() && self.ignore_input.ignores_look_input()
    }

    /// The widget to focus, which GameOnly never has.
    pub fn focus_widget(&self) -> Option<Entity> {
        if self.input_mode.is_game_only() {
            return None;
        }
        self.widget_to_focus
    }

    /// 将更新的配置合并进当前配置
    ///
    /// Merges a newer stack entry into this accumulated config.
    ///
    /// Fields `newer` does not set are inherited from `self`, so removing the
    /// top of a stack reveals the overrides of the entries below it.
    pub fn merge_from(&mut self, newer: &InputModeConfig) {
        self.input_mode = newer.input_mode;
        self.override_input_mode_default = newer.override_input_mode_default;
        self.flush_input = newer.flush_input;

        if newer.overrides_ignore_look_input() {
            self.ignore_input.override_ignore_look_input = true;
            self.ignore_input.ignore_look_input = newer.ignores_look_input();
        }
        if newer.overrides_ignore_move_input() {
            self.ignore_input.override_ignore_move_input = true;
            self.ignore_input.ignore_move_input = newer.ignores_move_input();
        }

        if newer.sets_show_mouse_cursor() {
            self.show_mouse_cursor = newer.show_mouse_cursor();
            self.center_cursor_on_apply = newer.center_cursor_on_apply;
        }
        if newer.overrides_mouse_cursor() {
            self.override_mouse_cursor = true;
            self.mouse_cursor = newer.mouse_cursor;
        }
        if newer.overrides_mouse_lock_and_capture() {
            self.override_mouse_lock_and_capture = true;
            self.mouse_lock_mode = newer.mouse_lock_mode;
            self.mouse_capture_mode = newer.mouse_capture_mode;
            self.hide_cursor_during_capture = newer.hides_cursor_during_capture();
        }

        if !newer.input_mode.is_game_only() {
            self.widget_to_focus = newer.widget_to_focus;
        }
    }
}
