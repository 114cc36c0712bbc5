//! QueryKey - スナップショットの識別子

use std::fmt;

/// QueryKey はキャッシュ上のスナップショットを識別するパス
///
/// 例: `["tasks"]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    /// タスク一覧のキー
    pub fn tasks() -> Self {
        Self::new(["tasks"])
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tasks_key() {
        assert_eq!(QueryKey::tasks(), QueryKey::new(vec!["tasks".to_string()]));
        assert_eq!(QueryKey::tasks().to_string(), "[tasks]");
    }
}
