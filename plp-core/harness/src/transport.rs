//! 探测传输层
//!
//! 执行器通过 `ProbeTransport` trait 发送请求: 生产实现封装网关客户端，
//! 测试中注入记录型实现即可在不发起真实网络调用的情况下验证执行语义。

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use plp_gateway::{GatewayClient, GatewayError};

use crate::sequence::HttpMethod;

/// 渲染完成、可直接发送的探测请求
#[derive(Debug, Clone)]
pub struct ProbeRequest {
    /// HTTP 方法
    pub method: HttpMethod,

    /// 目标路径 (会话 ID 已代入)
    pub path: String,

    /// JSON 请求体 (会话 ID 已代入)
    pub body: Option<serde_json::Value>,

    /// 本次请求超时
    pub timeout: Duration,
}

/// 探测响应
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    /// HTTP 状态码
    pub status: u16,

    /// 响应体原文
    pub body: String,
}

/// 传输层错误
///
/// 传输边界只区分超时/连接/其他三类；
/// 状态码不符属于执行器策略，不在此层出现。
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("请求超时: {0}")]
    Timeout(String),

    #[error("连接失败: {0}")]
    Connection(String),

    #[error("请求失败: {0}")]
    Other(String),
}

impl From<GatewayError> for TransportError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Timeout(msg) => TransportError::Timeout(msg),
            GatewayError::Connection(msg) => TransportError::Connection(msg),
            other => TransportError::Other(other.to_string()),
        }
    }
}

/// 探测传输接口
#[async_trait]
pub trait ProbeTransport: Send + Sync {
    /// 发送单个探测请求，阻塞至响应、超时或连接失败
    async fn send(&self, request: &ProbeRequest) -> Result<ProbeResponse, TransportError>;
}

/// 基于网关客户端的生产传输实现
pub struct GatewayTransport {
    client: GatewayClient,
}

impl GatewayTransport {
    pub fn new(client: GatewayClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProbeTransport for GatewayTransport {
    async fn send(&self, request: &ProbeRequest) -> Result<ProbeResponse, TransportError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let response = self
            .client
            .send(
                method,
                &request.path,
                request.body.clone(),
                Some(request.timeout),
            )
            .await
            .map_err(TransportError::from)?;

        Ok(ProbeResponse {
            status: response.status,
            body: response.body,
        })
    }
}
