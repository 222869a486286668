//! 网关接口数据模型

use serde::{Deserialize, Serialize};

/// 会话执行请求体 (POST /api/v1/session/{id}/execute)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteRequest {
    /// 动作名称
    pub action: String,

    /// 动作数据 (自由格式)
    pub data: serde_json::Value,
}

/// 会话创建请求体 (POST /sessions)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    /// 会话 ID
    pub session_id: String,
}

/// 网关响应
///
/// 保留原始状态码与响应体，不在客户端层做状态码判定。
#[derive(Debug, Clone)]
pub struct GatewayResponse {
    /// HTTP 状态码
    pub status: u16,

    /// 响应体原文
    pub body: String,
}

impl GatewayResponse {
    /// 状态码是否为 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 尝试将响应体解析为 JSON
    pub fn json(&self) -> Option<serde_json::Value> {
        serde_json::from_str(&self.body).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execute_request_serialization() {
        let req = ExecuteRequest {
            action: "test".to_string(),
            data: serde_json::json!("hello"),
        };

        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"action\":\"test\""));
        assert!(json.contains("\"data\":\"hello\""));
    }

    #[test]
    fn test_create_session_request_serialization() {
        let req = CreateSessionRequest {
            session_id: "probe-1700000000".to_string(),
        };

        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"session_id\":\"probe-1700000000\""));
    }

    #[test]
    fn test_gateway_response_is_success() {
        let ok = GatewayResponse {
            status: 201,
            body: String::new(),
        };
        assert!(ok.is_success());

        let err = GatewayResponse {
            status: 500,
            body: String::new(),
        };
        assert!(!err.is_success());
    }

    #[test]
    fn test_gateway_response_json() {
        let resp = GatewayResponse {
            status: 200,
            body: r#"{"status":"healthy"}"#.to_string(),
        };
        let json = resp.json().unwrap();
        assert_eq!(json["status"], "healthy");

        let not_json = GatewayResponse {
            status: 200,
            body: "plain text".to_string(),
        };
        assert!(not_json.json().is_none());
    }
}
