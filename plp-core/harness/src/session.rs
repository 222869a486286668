//! 会话标识
//!
//! 每次执行生成一个会话 ID，运行期间所有步骤复用同一个 ID，
//! 运行结束即丢弃，不做持久化。

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// 路径/请求体模板中的会话占位符
pub const SESSION_PLACEHOLDER: &str = "{session_id}";

/// 会话标识
///
/// 不透明字符串，目标系统用它关联一次运行中的全部请求。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// 生成新的会话 ID (前缀 + Unix 时间戳，保证跨运行唯一)
    pub fn generate(prefix: &str) -> Self {
        Self(format!("{}-{}", prefix, Utc::now().timestamp()))
    }

    /// 使用固定值构造会话 ID
    pub fn fixed(id: &str) -> Self {
        Self(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 将会话 ID 代入模板，替换所有 `{session_id}` 占位符
    ///
    /// 纯函数: 相同模板重复渲染产生逐字节相同的结果。
    pub fn render(&self, template: &str) -> String {
        template.replace(SESSION_PLACEHOLDER, &self.0)
    }

    /// 将会话 ID 代入 JSON 值中的所有字符串字段
    pub fn render_json(&self, value: &serde_json::Value) -> serde_json::Value {
        match value {
            serde_json::Value::String(s) => serde_json::Value::String(self.render(s)),
            serde_json::Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(|v| self.render_json(v)).collect())
            }
            serde_json::Value::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), self.render_json(v)))
                    .collect(),
            ),
            other => other.clone(),
        }
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
