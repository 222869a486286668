//! 探测序列执行器
//!
//! 严格按声明顺序执行步骤，首个失败即停止 (fail-fast):
//! 会话创建失败后，"第二次请求路由到同一 Pod" 之类的后续步骤
//! 只会产生噪音而非信号。

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::{error, info};

use crate::sequence::{ProbeSequence, ProbeStep};
use crate::session::SessionId;
use crate::transport::{ProbeRequest, ProbeTransport, TransportError};
use crate::{HarnessError, Result};

/// 失败类别
///
/// 封闭枚举，OtherError 仅用于真正无法归类的故障，
/// 不得用于可预期的情况。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// 请求超时
    Timeout,
    /// 传输层连接失败 (DNS/拒绝/重置)
    ConnectionError,
    /// 收到响应但状态码不在期望集合内
    UnexpectedStatus,
    /// 其他未归类故障
    OtherError,
}

impl FailureKind {
    /// 人类可读标签
    pub fn label(&self) -> &'static str {
        match self {
            FailureKind::Timeout => "超时",
            FailureKind::ConnectionError => "连接失败",
            FailureKind::UnexpectedStatus => "状态码不符",
            FailureKind::OtherError => "其他错误",
        }
    }
}

/// 步骤状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    Success,
    Failed,
    Skipped,
}

/// 步骤报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepReport {
    /// 步骤索引
    pub step_index: usize,

    /// 步骤名称
    pub name: String,

    /// 步骤状态
    pub status: StepStatus,

    /// 收到的 HTTP 状态码 (有响应时)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,

    /// 失败类别 (失败时)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,

    /// 错误信息
    pub error: Option<String>,

    /// 耗时（毫秒）
    pub duration_ms: u64,

    /// 响应体原文
    pub output: Option<String>,
}

impl StepReport {
    pub fn success(index: usize, name: &str, http_status: u16) -> Self {
        Self {
            step_index: index,
            name: name.to_string(),
            status: StepStatus::Success,
            http_status: Some(http_status),
            failure: None,
            error: None,
            duration_ms: 0,
            output: None,
        }
    }

    pub fn failed(index: usize, name: &str, kind: FailureKind, error: &str) -> Self {
        Self {
            step_index: index,
            name: name.to_string(),
            status: StepStatus::Failed,
            http_status: None,
            failure: Some(kind),
            error: Some(error.to_string()),
            duration_ms: 0,
            output: None,
        }
    }

    pub fn skipped(index: usize, name: &str) -> Self {
        Self {
            step_index: index,
            name: name.to_string(),
            status: StepStatus::Skipped,
            http_status: None,
            failure: None,
            error: None,
            duration_ms: 0,
            output: None,
        }
    }

    /// 记录响应体
    pub fn with_output(mut self, output: &str) -> Self {
        self.output = Some(output.to_string());
        self
    }

    /// 记录收到的状态码
    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }
}

/// 执行报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// 序列名称
    pub sequence_name: String,

    /// 序列描述
    pub description: Option<String>,

    /// 本次运行的会话 ID
    pub session_id: String,

    /// 标签
    pub tags: Vec<String>,

    /// 是否通过
    pub passed: bool,

    /// 实际发起的步骤数 (不含跳过)
    pub steps_executed: usize,

    /// 通过的步骤数
    pub passed_count: usize,

    /// 失败的步骤数
    pub failed_count: usize,

    /// 跳过的步骤数
    pub skipped_count: usize,

    /// 总耗时（毫秒）
    pub duration_ms: u64,

    /// 步骤报告列表
    pub steps: Vec<StepReport>,
}

impl RunReport {
    pub fn new(sequence_name: &str, session_id: &str) -> Self {
        Self {
            sequence_name: sequence_name.to_string(),
            description: None,
            session_id: session_id.to_string(),
            tags: Vec::new(),
            passed: true,
            steps_executed: 0,
            passed_count: 0,
            failed_count: 0,
            skipped_count: 0,
            duration_ms: 0,
            steps: Vec::new(),
        }
    }

    pub fn add_step(&mut self, step: StepReport) {
        match step.status {
            StepStatus::Success => {
                self.steps_executed += 1;
                self.passed_count += 1;
            }
            StepStatus::Failed => {
                self.steps_executed += 1;
                self.failed_count += 1;
                self.passed = false;
            }
            StepStatus::Skipped => self.skipped_count += 1,
        }

        self.steps.push(step);
    }

    /// 首个失败步骤
    pub fn first_failure(&self) -> Option<&StepReport> {
        self.steps.iter().find(|s| s.status == StepStatus::Failed)
    }

    /// 导出为 JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// 导出为 YAML
    pub fn to_yaml(&self) -> serde_yaml::Result<String> {
        serde_yaml::to_string(self)
    }
}

/// 探测序列执行器
pub struct ProbeRunner {
    /// 传输实现
    transport: Arc<dyn ProbeTransport>,

    /// 默认步骤超时
    default_timeout: Duration,

    /// 会话 ID 前缀
    session_prefix: String,
}

impl ProbeRunner {
    /// 创建新的执行器
    pub fn new(transport: Arc<dyn ProbeTransport>) -> Self {
        Self {
            transport,
            default_timeout: Duration::from_secs(30),
            session_prefix: "probe".to_string(),
        }
    }

    /// 设置默认步骤超时
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// 设置会话 ID 前缀
    pub fn with_session_prefix(mut self, prefix: &str) -> Self {
        self.session_prefix = prefix.to_string();
        self
    }

    /// 执行探测序列
    ///
    /// 每次调用生成一个新的会话 ID 并在所有步骤间复用；
    /// 步骤 N 的请求只会在步骤 N-1 的结果记录之后发出。
    /// 单次调用一次性完成，不支持续跑。
    pub async fn run(&self, sequence: &ProbeSequence) -> Result<RunReport> {
        if sequence.steps.is_empty() {
            return Err(HarnessError::ConfigError("探测序列不能为空".to_string()));
        }

        let session_id = SessionId::generate(&self.session_prefix);
        info!("开始执行探测序列: {} (会话: {})", sequence.name, session_id);

        let start_time = Instant::now();
        let mut report = RunReport::new(&sequence.name, session_id.as_str());
        report.description = sequence.description.clone();
        report.tags = sequence.tags.clone();

        let total = sequence.steps.len();
        let mut halted_at = None;

        for (index, step) in sequence.steps.iter().enumerate() {
            info!("执行步骤 {}/{}: {}", index + 1, total, step.name);

            let step_report = self.execute_step(index, step, &session_id).await;

            match step_report.status {
                StepStatus::Success => {
                    info!(
                        "步骤 {} 完成: {} (状态码 {})",
                        index + 1,
                        step.name,
                        step_report.http_status.unwrap_or(0)
                    );
                    report.add_step(step_report);
                }
                _ => {
                    error!(
                        "步骤 {} 失败: {} - {}",
                        index + 1,
                        step.name,
                        step_report.error.as_deref().unwrap_or("未知错误")
                    );
                    report.add_step(step_report);
                    halted_at = Some(index);
                    break; // 失败后停止执行
                }
            }
        }

        // 失败之后的步骤记为跳过，不再发起请求
        if let Some(failed_index) = halted_at {
            for (index, step) in sequence.steps.iter().enumerate().skip(failed_index + 1) {
                report.add_step(StepReport::skipped(index, &step.name));
            }
        }

        report.duration_ms = start_time.elapsed().as_millis() as u64;

        info!(
            "探测序列执行完成: {} - {}/{} 步骤成功",
            sequence.name, report.passed_count, report.steps_executed
        );

        Ok(report)
    }

    /// 执行单个步骤
    async fn execute_step(
        &self,
        index: usize,
        step: &ProbeStep,
        session_id: &SessionId,
    ) -> StepReport {
        let request = ProbeRequest {
            method: step.method,
            path: session_id.render(&step.path),
            body: step.body.as_ref().map(|b| session_id.render_json(b)),
            timeout: step
                .timeout
                .map(Duration::from_secs)
                .unwrap_or(self.default_timeout),
        };

        // 执行器层面兜底超时: 无论传输实现如何，步骤阻塞时长不超过其超时设置
        let step_start = Instant::now();
        let result = match timeout(request.timeout, self.transport.send(&request)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(format!(
                "步骤在 {} 秒内未完成",
                request.timeout.as_secs()
            ))),
        };
        let duration_ms = step_start.elapsed().as_millis() as u64;

        let mut report = match result {
            Ok(response) => match &step.expect_status {
                Some(expected) if !expected.contains(&response.status) => StepReport::failed(
                    index,
                    &step.name,
                    FailureKind::UnexpectedStatus,
                    &format!("期望状态码 {:?}, 实际收到 {}", expected, response.status),
                )
                .with_http_status(response.status)
                .with_output(&response.body),
                _ => StepReport::success(index, &step.name, response.status)
                    .with_output(&response.body),
            },
            Err(err) => {
                let kind = match &err {
                    TransportError::Timeout(_) => FailureKind::Timeout,
                    TransportError::Connection(_) => FailureKind::ConnectionError,
                    TransportError::Other(_) => FailureKind::OtherError,
                };
                StepReport::failed(index, &step.name, kind, &err.to_string())
            }
        };

        report.duration_ms = duration_ms;
        report
    }
}
