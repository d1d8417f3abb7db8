use std::hash::Hash;

use bevy::{
    platform::collections::{Equivalent, HashMap},
    prelude::*,
};
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

use crate::input_mode::InputModeConfig;

/// 输入配置预设
///
/// A named, reusable input config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct InputConfigPreset {
    pub debug_name: String,
    pub debug_description: String,
    pub input_config: InputModeConfig,
}

impl InputConfigPreset {
    pub fn new(debug_name: impl Into<String>, input_config: InputModeConfig) -> Self {
        Self {
            debug_name: debug_name.into(),
            debug_description: String::new(),
            input_config,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.debug_description = description.into();
        self
    }
}

/// 注册输入配置预设
///
/// Register input config presets by name
/// # 示例\Example
/// ```
/// # use bevy::prelude::*;
/// # use bevy_input_mode_stack::prelude::*;
/// # fn foo(mut presets: ResMut<InputConfigPresets>) {
/// presets.insert("menu", InputConfigPreset::new("Menu", InputModeConfig::ui_only()));
/// # }
/// ```
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct InputConfigPresets(HashMap<String, InputConfigPreset>);

impl InputConfigPresets {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// 插入一个预设
    ///
    /// Insert a preset
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        preset: InputConfigPreset,
    ) -> Option<InputConfigPreset> {
        self.0.insert(name.into(), preset)
    }

    /// 获取一个预设
    ///
    /// Get a preset
    pub fn get<Q>(&self, name: &Q) -> Option<&InputConfigPreset>
    where
        Q: Hash + Equivalent<String> + ?Sized,
    {
        self.0.get(name)
    }

    /// 移除一个预设
    ///
    /// Remove a preset
    pub fn remove<Q>(&mut self, name: &Q) -> Option<InputConfigPreset>
    where
        Q: Hash + Equivalent<String> + ?Sized,
    {
        self.0.remove(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
