use bevy::{platform::collections::HashMap, prelude::*};
use smallvec::SmallVec;

use crate::{error::InputConfigError, handle::InputConfigHandle, input_mode::InputModeConfig};

/// 输入配置栈
///
/// Input config stack
/// # 作用\Purpose
/// * 按推入顺序保存句柄, 并保存每个句柄对应的配置
/// - Keeps handles in push order along with the config each one refers to
/// * 记录自上次更新以来推入的句柄
/// - Tracks the handles pushed since the last update
///
/// Every handle on the stack has exactly one config in the store.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputConfigStack {
    /// Push order, most recent last.
    handles: SmallVec<[InputConfigHandle; 8]>,
    configs: HashMap<InputConfigHandle, InputModeConfig>,
    /// Pushed since the last update, in push order.
    enqueued: SmallVec<[InputConfigHandle; 4]>,
}

impl InputConfigStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// 推入一个配置
    ///
    /// Pushes a config and returns its fresh handle. The handle is marked as enqueued.
    pub fn push(&mut self, config: InputModeConfig) -> InputConfigHandle {
        let mut handle = InputConfigHandle::generate();
        while self.configs.contains_key(&handle) {
            handle = InputConfigHandle::generate();
        }
        self.handles.push(handle);
        self.configs.insert(handle, config);
        self.enqueued.push(handle);
        handle
    }

    /// 移除一个配置
    ///
    /// Removes `handle` wherever it sits in the stack.
    pub fn remove(
        &mut self,
        handle: InputConfigHandle,
    ) -> Result<InputModeConfig, InputConfigError> {
        let Some(index) = self.index_of(handle) else {
            return Err(InputConfigError::HandleNotOnStack(handle));
        };
        self.handles.remove(index);
        self.enqueued.retain(|h| *h != handle);
        self.configs
            .remove(&handle)
            .ok_or(InputConfigError::HandleNotOnStack(handle))
    }

    /// The most recently pushed handle.
    pub fn peek(&self) -> Option<InputConfigHandle> {
        self.handles.last().copied()
    }

    pub fn get(&self, handle: Option<InputConfigHandle>) -> Option<&InputModeConfig> {
        let handle = handle?;
        let config = self.configs.get(&handle);
        if config.is_none() {
            debug_assert!(!self.handles.contains(&handle));
            debug_assert!(!self.enqueued.contains(&handle));
            trace!("No input config for handle {}", handle);
        }
        config
    }

    pub fn contains(&self, handle: InputConfigHandle) -> bool {
        self.handles.contains(&handle)
    }

    pub fn index_of(&self, handle: InputConfigHandle) -> Option<usize> {
        self.handles.iter().position(|h| *h == handle)
    }

    pub fn handles(&self) -> &[InputConfigHandle] {
        self.handles.as_slice()
    }

    pub fn enqueued(&self) -> &[InputConfigHandle] {
        self.enqueued.as_slice()
    }

    pub fn is_enqueued(&self, handle: InputConfigHandle) -> bool {
        self.enqueued.contains(&handle)
    }

    /// Drains the handles pushed since the last call.
    pub fn take_enqueued(&mut self) -> SmallVec<[InputConfigHandle; 4]> {
        std::mem::take(&mut self.enqueued)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn clear(&mut self) {
        self.handles.clear();
        self.configs.clear();
        self.enqueued.clear();
    }

    /// 从栈构建有效配置
    ///
    /// Folds the stack, oldest to newest, into the effective config.
    ///
    /// e.g. with a stack of `[A, B, C]` where A and C set a mouse cursor but B
    /// does not, removing C reveals A's cursor instead of keeping C's.
    ///
    /// Every entry is merged into a default config, the oldest included, so a
    /// field its own mode switches off never leaks into the result.
    pub fn fold(&self) -> Option<InputModeConfig> {
        if self.handles.is_empty() {
            return None;
        }
        let mut folded = InputModeConfig::default();
        for config in self.handles.iter().filter_map(|h| self.configs.get(h)) {
            folded.merge_from(config);
        }
        Some(folded)
    }

    /// `"{index}:{short id} {mode}"`, or `"None"` for an unknown handle.
    pub fn describe_handle(&self, handle: Option<InputConfigHandle>) -> String {
        let Some(handle) = handle else {
            return "None".to_string();
        };
        let (Some(config), Some(index)) = (self.configs.get(&handle), self.index_of(handle))
        else {
            return "None".to_string();
        };
        format!(
            "{}:{} {}",
            index,
            handle.short_id(self.handles.iter()),
            config.input_mode
        )
    }
}
