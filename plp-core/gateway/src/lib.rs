//! Pod 生命周期服务网关客户端
//!
//! 提供与动态 Pod 生命周期管理服务 HTTP 接口交互的客户端实现。
//!
//! # 功能
//!
//! - **会话执行**: 通过 API Gateway 在指定会话内执行动作
//! - **会话状态**: 查询会话的生命周期/亲和性状态
//! - **健康检查**: 负载均衡器存活探测
//! - **会话创建**: 通过负载均衡器入口显式创建会话
//!
//! # 示例
//!
//! ```ignore
//! use plp_gateway::{GatewayClient, GatewayConfig};
//!
//! let client = GatewayClient::new("http://api-gateway:8000", GatewayConfig::default())?;
//!
//! // 在会话内执行动作
//! let resp = client.execute("probe-1700000000", "test", "hello".into()).await?;
//! println!("status = {}", resp.status);
//!
//! // 查询会话状态
//! let resp = client.session_status("probe-1700000000").await?;
//! ```

pub mod client;
pub mod error;
pub mod models;

pub use client::{GatewayClient, GatewayConfig};
pub use error::{GatewayError, Result};
pub use models::{CreateSessionRequest, ExecuteRequest, GatewayResponse};
