use std::fmt::Display;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Shortest prefix [`InputConfigHandle::short_id`] will hand out.
const MIN_SHORT_ID_LEN: usize = 4;

/// 输入配置句柄
///
/// Opaque 128-bit token identifying one pushed input config.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct InputConfigHandle(Uuid);

impl InputConfigHandle {
    /// A fresh random handle.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }

    pub const fn as_u128(&self) -> u128 {
        self.0.as_u128()
    }

    pub const fn uuid(&self) -> Uuid {
        self.0
    }

    /// Shortest hex prefix of this handle that no other handle in `among` shares.
    ///
    /// Never shorter than four characters. `among` may contain `self`.
    pub fn short_id<'a>(&self, among: impl IntoIterator<Item = &'a InputConfigHandle>) -> String {
        let hex = self.0.simple().to_string();
        let longest_shared = among
            .into_iter()
            .filter(|other| *other != self)
            .map(|other| {
                let other_hex = other.0.simple().to_string();
                hex.bytes()
                    .zip(other_hex.bytes())
                    .take_while(|(a, b)| a == b)
                    .count()
            })
            .max()
            .unwrap_or(0);
        let len = (longest_shared + 1).clamp(MIN_SHORT_ID_LEN, hex.len());
        hex[..len].to_string()
    }
}

impl Display for InputConfigHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl From<Uuid> for InputConfigHandle {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}
