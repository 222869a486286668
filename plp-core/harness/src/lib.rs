//! PLP 执行器
//!
//! 会话探测序列执行引擎

pub mod runner;
pub mod sequence;
pub mod session;
pub mod transport;

pub use runner::{FailureKind, ProbeRunner, RunReport, StepReport, StepStatus};
pub use sequence::{HttpMethod, ProbeSequence, ProbeStep};
pub use session::SessionId;
pub use transport::{GatewayTransport, ProbeRequest, ProbeResponse, ProbeTransport, TransportError};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("探测序列加载失败: {0}")]
    SequenceLoadFailed(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("序列化错误: {0}")]
    SerdeError(String),
}

pub type Result<T> = std::result::Result<T, HarnessError>;
