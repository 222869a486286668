//! 探测序列定义
//!
//! 将待执行的 HTTP 探测步骤表示为数据而非代码，
//! 使得替换步骤序列无需修改执行器。

use serde::{Deserialize, Serialize};
use std::path::Path;

/// HTTP 方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// 探测步骤
///
/// 路径与请求体模板中可使用 `{session_id}` 占位符，
/// 执行时代入本次运行的会话 ID。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeStep {
    /// 步骤名称
    pub name: String,

    /// HTTP 方法
    #[serde(default)]
    pub method: HttpMethod,

    /// 目标路径模板
    pub path: String,

    /// JSON 请求体模板 (可选)
    #[serde(default)]
    pub body: Option<serde_json::Value>,

    /// 期望状态码集合 (可选; 未声明时任意响应都算成功)
    #[serde(default)]
    pub expect_status: Option<Vec<u16>>,

    /// 超时时间（秒，可选; 未声明时使用执行器默认值）
    #[serde(default)]
    pub timeout: Option<u64>,
}

/// 探测序列
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeSequence {
    /// 序列名称
    pub name: String,

    /// 序列描述
    pub description: Option<String>,

    /// 探测步骤 (严格按声明顺序执行)
    pub steps: Vec<ProbeStep>,

    /// 标签
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ProbeSequence {
    /// 从 YAML 文件加载序列
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// 从 YAML 字符串加载序列
    pub fn from_yaml_str(yaml: &str) -> crate::Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| crate::HarnessError::SequenceLoadFailed(e.to_string()))
    }

    /// 从 JSON 文件加载序列
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// 从 JSON 字符串加载序列
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| crate::HarnessError::SequenceLoadFailed(e.to_string()))
    }

    /// 导出为 YAML
    pub fn to_yaml(&self) -> crate::Result<String> {
        serde_yaml::to_string(self).map_err(|e| crate::HarnessError::SerdeError(e.to_string()))
    }

    /// 导出为 JSON
    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| crate::HarnessError::SerdeError(e.to_string()))
    }

    /// 内置序列: API Gateway 端到端会话流程
    ///
    /// 创建会话并执行动作 → 查询会话状态 → 复用会话再次执行，
    /// 第二次执行用于确认路由仍命中同一 Pod。
    /// 前两类调用不声明期望状态码 (尽力而为探测)。
    pub fn gateway_flow() -> Self {
        Self {
            name: "gateway-e2e-flow".to_string(),
            description: Some("API Gateway 端到端会话生命周期探测".to_string()),
            steps: vec![
                ProbeStep {
                    name: "创建会话并执行动作".to_string(),
                    method: HttpMethod::Post,
                    path: "/api/v1/session/{session_id}/execute".to_string(),
                    body: Some(serde_json::json!({"action": "test", "data": "hello"})),
                    expect_status: None,
                    timeout: Some(30),
                },
                ProbeStep {
                    name: "查询会话状态".to_string(),
                    method: HttpMethod::Get,
                    path: "/api/v1/session/{session_id}/status".to_string(),
                    body: None,
                    expect_status: None,
                    timeout: Some(10),
                },
                ProbeStep {
                    name: "复用会话再次执行".to_string(),
                    method: HttpMethod::Post,
                    path: "/api/v1/session/{session_id}/execute".to_string(),
                    body: Some(serde_json::json!({"action": "test2", "data": "world"})),
                    expect_status: None,
                    timeout: Some(10),
                },
            ],
            tags: vec!["gateway".to_string(), "e2e".to_string()],
        }
    }

    /// 内置序列: 负载均衡器健康检查与会话创建
    pub fn balancer_flow() -> Self {
        Self {
            name: "lb-session-flow".to_string(),
            description: Some("负载均衡器健康检查与显式会话创建".to_string()),
            steps: vec![
                ProbeStep {
                    name: "健康检查".to_string(),
                    method: HttpMethod::Get,
                    path: "/health".to_string(),
                    body: None,
                    expect_status: Some(vec![200]),
                    timeout: Some(10),
                },
                ProbeStep {
                    name: "创建会话".to_string(),
                    method: HttpMethod::Post,
                    path: "/sessions".to_string(),
                    body: Some(serde_json::json!({"session_id": "{session_id}"})),
                    expect_status: Some(vec![201]),
                    timeout: Some(30),
                },
            ],
            tags: vec!["balancer".to_string()],
        }
    }
}
