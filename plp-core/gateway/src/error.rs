//! 网关客户端错误定义

use thiserror::Error;

/// 网关客户端错误类型
///
/// 传输层故障在此处完成分类，状态码策略由上层执行器决定。
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("请求超时: {0}")]
    Timeout(String),

    #[error("连接失败: {0}")]
    Connection(String),

    #[error("HTTP 错误: {0}")]
    Http(String),

    #[error("解析错误: {0}")]
    Parse(String),

    #[error("配置错误: {0}")]
    Config(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        // 分类顺序: 超时优先于连接错误 (reqwest 连接超时两者同时为真)
        if err.is_timeout() {
            GatewayError::Timeout(err.to_string())
        } else if err.is_connect() {
            GatewayError::Connection(err.to_string())
        } else {
            GatewayError::Http(err.to_string())
        }
    }
}

/// 网关客户端结果类型
pub type Result<T> = std::result::Result<T, GatewayError>;
