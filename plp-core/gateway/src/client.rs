//! 网关客户端核心实现

use std::time::Duration;

use reqwest::{Client, Method};
use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{GatewayError, Result};
use crate::models::{CreateSessionRequest, ExecuteRequest, GatewayResponse};

/// 网关客户端配置
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// 连接超时（秒）
    pub connect_timeout: u64,

    /// 请求超时（秒）
    pub request_timeout: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            connect_timeout: 10,
            request_timeout: 30,
        }
    }
}

/// Pod 生命周期服务网关客户端
///
/// 同时覆盖 API Gateway 与负载均衡器两类入口，所有请求共享一个
/// reqwest 连接池，由单个顺序调用方使用。
pub struct GatewayClient {
    /// API 基础 URL
    base_url: String,

    /// HTTP 客户端
    http_client: Client,
}

impl GatewayClient {
    /// 创建新的网关客户端
    pub fn new(base_url: &str, config: GatewayConfig) -> Result<Self> {
        if base_url.is_empty() {
            return Err(GatewayError::Config("基础 URL 不能为空".to_string()));
        }

        Url::parse(base_url)
            .map_err(|e| GatewayError::Config(format!("基础 URL 无效 ({}): {}", base_url, e)))?;

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .build()
            .map_err(|e| GatewayError::Http(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    /// 获取基础 URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 在会话内执行动作 (会话不存在时由服务端隐式创建)
    pub async fn execute(
        &self,
        session_id: &str,
        action: &str,
        data: serde_json::Value,
    ) -> Result<GatewayResponse> {
        info!("会话执行: {} action={}", session_id, action);
        let body = ExecuteRequest {
            action: action.to_string(),
            data,
        };
        self.send(
            Method::POST,
            &format!("/api/v1/session/{}/execute", session_id),
            Some(body),
            None,
        )
        .await
    }

    /// 查询会话状态
    pub async fn session_status(&self, session_id: &str) -> Result<GatewayResponse> {
        info!("查询会话状态: {}", session_id);
        self.send(
            Method::GET,
            &format!("/api/v1/session/{}/status", session_id),
            None::<()>,
            None,
        )
        .await
    }

    /// 负载均衡器健康检查
    pub async fn health(&self) -> Result<GatewayResponse> {
        info!("健康检查");
        self.send(Method::GET, "/health", None::<()>, None).await
    }

    /// 显式创建会话 (负载均衡器入口)
    pub async fn create_session(&self, session_id: &str) -> Result<GatewayResponse> {
        info!("创建会话: {}", session_id);
        let body = CreateSessionRequest {
            session_id: session_id.to_string(),
        };
        self.send(Method::POST, "/sessions", Some(body), None).await
    }

    /// 发送 HTTP 请求
    ///
    /// 任意状态码的响应都原样返回，状态码判定由调用方负责；
    /// `timeout` 为单次请求超时，覆盖客户端级别的默认值。
    pub async fn send<T: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<T>,
        timeout: Option<Duration>,
    ) -> Result<GatewayResponse> {
        let url = format!("{}{}", self.base_url, path);
        debug!("网关请求: {} {}", method, url);

        let mut request = self.http_client.request(method.clone(), &url);

        if let Some(body) = body {
            request = request.json(&body);
        }

        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(GatewayError::from)?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Parse(e.to_string()))?;

        if status >= 400 {
            warn!("网关响应异常状态: {} {} - {}", method, url, status);
        }

        Ok(GatewayResponse { status, body })
    }
}
