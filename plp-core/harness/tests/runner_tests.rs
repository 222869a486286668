//! 执行器行为测试
//!
//! 通过记录型传输实现验证顺序执行、fail-fast 与错误分类语义，
//! 不发起真实网络调用。

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use plp_harness::{
    FailureKind, HarnessError, HttpMethod, ProbeRequest, ProbeResponse, ProbeRunner,
    ProbeSequence, ProbeStep, ProbeTransport, StepStatus, TransportError,
};

/// 脚本化应答
enum Reply {
    /// 返回指定状态码与响应体
    Status(u16, &'static str),
    /// 模拟请求超时
    Timeout,
    /// 模拟连接拒绝
    Refused,
    /// 模拟未归类故障
    Fault,
}

/// 记录型传输实现: 按脚本应答并记录每次请求
struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<ProbeRequest>>,
}

impl MockTransport {
    fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<ProbeRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProbeTransport for MockTransport {
    async fn send(&self, request: &ProbeRequest) -> Result<ProbeResponse, TransportError> {
        self.calls.lock().unwrap().push(request.clone());

        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Status(status, body)) => Ok(ProbeResponse {
                status,
                body: body.to_string(),
            }),
            Some(Reply::Timeout) => Err(TransportError::Timeout("deadline exceeded".to_string())),
            Some(Reply::Refused) => {
                Err(TransportError::Connection("connection refused".to_string()))
            }
            Some(Reply::Fault) => Err(TransportError::Other("request build failed".to_string())),
            None => Err(TransportError::Other("脚本应答已耗尽".to_string())),
        }
    }
}

fn step(name: &str, method: HttpMethod, path: &str) -> ProbeStep {
    ProbeStep {
        name: name.to_string(),
        method,
        path: path.to_string(),
        body: None,
        expect_status: None,
        timeout: None,
    }
}

fn sequence(name: &str, steps: Vec<ProbeStep>) -> ProbeSequence {
    ProbeSequence {
        name: name.to_string(),
        description: None,
        steps,
        tags: vec![],
    }
}

#[tokio::test]
async fn test_all_steps_pass_in_declared_order() {
    let mock = Arc::new(MockTransport::new(vec![
        Reply::Status(200, "{}"),
        Reply::Status(200, "{}"),
        Reply::Status(200, "{}"),
    ]));
    let runner = ProbeRunner::new(mock.clone());

    let report = runner.run(&ProbeSequence::gateway_flow()).await.unwrap();

    assert!(report.passed);
    assert_eq!(report.steps_executed, 3);
    assert_eq!(report.passed_count, 3);
    assert_eq!(report.failed_count, 0);

    // 请求按声明顺序发出
    let calls = mock.calls();
    assert_eq!(calls.len(), 3);
    assert!(calls[0].path.ends_with("/execute"));
    assert!(calls[1].path.ends_with("/status"));
    assert!(calls[2].path.ends_with("/execute"));
}

#[tokio::test]
async fn test_session_id_reused_across_all_steps() {
    let mock = Arc::new(MockTransport::new(vec![
        Reply::Status(200, "{}"),
        Reply::Status(200, "{}"),
        Reply::Status(200, "{}"),
    ]));
    let runner = ProbeRunner::new(mock.clone()).with_session_prefix("e2e");

    let report = runner.run(&ProbeSequence::gateway_flow()).await.unwrap();

    assert!(report.session_id.starts_with("e2e-"));

    // 整个运行期间所有路径命中同一个会话 ID
    let expected = format!("/api/v1/session/{}/execute", report.session_id);
    let calls = mock.calls();
    assert_eq!(calls[0].path, expected);
    assert_eq!(calls[2].path, expected);
    assert_eq!(
        calls[1].path,
        format!("/api/v1/session/{}/status", report.session_id)
    );
}

#[tokio::test]
async fn test_session_id_rendered_into_body() {
    let mock = Arc::new(MockTransport::new(vec![
        Reply::Status(200, "{\"status\":\"healthy\"}"),
        Reply::Status(201, "{}"),
    ]));
    let runner = ProbeRunner::new(mock.clone());

    let report = runner.run(&ProbeSequence::balancer_flow()).await.unwrap();

    assert!(report.passed);

    let calls = mock.calls();
    let body = calls[1].body.as_ref().unwrap();
    assert_eq!(body["session_id"], report.session_id.as_str());
}

#[tokio::test]
async fn test_fail_fast_skips_remaining_steps() {
    let mock = Arc::new(MockTransport::new(vec![
        Reply::Status(200, "{}"),
        Reply::Refused,
        // 第三个应答不应被消费
        Reply::Status(200, "{}"),
    ]));
    let runner = ProbeRunner::new(mock.clone());

    let report = runner.run(&ProbeSequence::gateway_flow()).await.unwrap();

    assert!(!report.passed);
    assert_eq!(report.steps_executed, 2);
    assert_eq!(report.failed_count, 1);
    assert_eq!(report.skipped_count, 1);
    assert_eq!(report.steps[2].status, StepStatus::Skipped);

    // 失败之后不再发起任何请求
    assert_eq!(mock.calls().len(), 2);
}

#[tokio::test]
async fn test_timeout_reported_as_timeout_kind() {
    let mock = Arc::new(MockTransport::new(vec![Reply::Timeout]));
    let runner = ProbeRunner::new(mock);

    let seq = sequence(
        "timeout-probe",
        vec![step("健康检查", HttpMethod::Get, "/health")],
    );
    let report = runner.run(&seq).await.unwrap();

    // 超时必须归类为 Timeout，而非 OtherError
    let failure = report.first_failure().unwrap();
    assert_eq!(failure.failure, Some(FailureKind::Timeout));
}

#[tokio::test]
async fn test_connection_refused_reported_as_connection_kind() {
    let mock = Arc::new(MockTransport::new(vec![Reply::Refused]));
    let runner = ProbeRunner::new(mock);

    let seq = sequence(
        "refused-probe",
        vec![step("健康检查", HttpMethod::Get, "/health")],
    );
    let report = runner.run(&seq).await.unwrap();

    let failure = report.first_failure().unwrap();
    assert_eq!(failure.failure, Some(FailureKind::ConnectionError));
}

#[tokio::test]
async fn test_unclassified_fault_reported_as_other_kind() {
    let mock = Arc::new(MockTransport::new(vec![Reply::Fault]));
    let runner = ProbeRunner::new(mock);

    let seq = sequence(
        "fault-probe",
        vec![step("健康检查", HttpMethod::Get, "/health")],
    );
    let report = runner.run(&seq).await.unwrap();

    let failure = report.first_failure().unwrap();
    assert_eq!(failure.failure, Some(FailureKind::OtherError));
}

#[tokio::test]
async fn test_create_session_with_expected_status_passes() {
    let mock = Arc::new(MockTransport::new(vec![Reply::Status(
        201,
        "{\"session_id\":\"s1\"}",
    )]));
    let runner = ProbeRunner::new(mock);

    let mut create = step("创建会话", HttpMethod::Post, "/sessions");
    create.body = Some(serde_json::json!({"session_id": "s1"}));
    create.expect_status = Some(vec![201]);

    let report = runner.run(&sequence("create-session", vec![create])).await.unwrap();

    assert!(report.passed);
    assert_eq!(report.steps[0].http_status, Some(201));
}

#[tokio::test]
async fn test_health_down_halts_balancer_flow() {
    let mock = Arc::new(MockTransport::new(vec![Reply::Refused]));
    let runner = ProbeRunner::new(mock.clone());

    let report = runner.run(&ProbeSequence::balancer_flow()).await.unwrap();

    assert!(!report.passed);
    let failure = report.first_failure().unwrap();
    assert_eq!(failure.step_index, 0);
    assert_eq!(failure.failure, Some(FailureKind::ConnectionError));

    // 健康检查失败后不再尝试创建会话
    assert_eq!(mock.calls().len(), 1);
    assert_eq!(report.skipped_count, 1);
}

#[tokio::test]
async fn test_unexpected_status_detail_contains_received_code() {
    let mock = Arc::new(MockTransport::new(vec![
        Reply::Status(200, "{\"status\":\"healthy\"}"),
        Reply::Status(500, "internal error"),
    ]));
    let runner = ProbeRunner::new(mock);

    let report = runner.run(&ProbeSequence::balancer_flow()).await.unwrap();

    assert!(!report.passed);
    let failure = report.first_failure().unwrap();
    assert_eq!(failure.failure, Some(FailureKind::UnexpectedStatus));
    assert_eq!(failure.http_status, Some(500));
    assert!(failure.error.as_ref().unwrap().contains("500"));
}

#[tokio::test]
async fn test_timeout_mid_sequence_records_prior_success() {
    let mock = Arc::new(MockTransport::new(vec![
        Reply::Status(200, "{\"status\":\"healthy\"}"),
        Reply::Timeout,
    ]));
    let runner = ProbeRunner::new(mock.clone());

    let report = runner.run(&ProbeSequence::balancer_flow()).await.unwrap();

    // 步骤 1 的成功结果已记录
    assert_eq!(report.steps[0].status, StepStatus::Success);
    assert_eq!(report.steps[0].http_status, Some(200));

    // 步骤 2 归类为超时，总计恰好两次调用
    assert_eq!(report.steps[1].status, StepStatus::Failed);
    assert_eq!(report.steps[1].failure, Some(FailureKind::Timeout));
    assert!(!report.passed);
    assert_eq!(mock.calls().len(), 2);
}

#[tokio::test]
async fn test_step_without_expectation_accepts_any_status() {
    let mock = Arc::new(MockTransport::new(vec![Reply::Status(404, "not found")]));
    let runner = ProbeRunner::new(mock);

    // 未声明期望状态码: 收到响应即算成功
    let seq = sequence(
        "best-effort",
        vec![step("查询会话状态", HttpMethod::Get, "/api/v1/session/{session_id}/status")],
    );
    let report = runner.run(&seq).await.unwrap();

    assert!(report.passed);
    assert_eq!(report.steps[0].http_status, Some(404));
}

#[tokio::test]
async fn test_step_timeout_overrides_runner_default() {
    let mock = Arc::new(MockTransport::new(vec![
        Reply::Status(200, "{}"),
        Reply::Status(200, "{}"),
    ]));
    let runner = ProbeRunner::new(mock.clone()).with_timeout(Duration::from_secs(5));

    let mut first = step("健康检查", HttpMethod::Get, "/health");
    first.timeout = Some(30);
    let second = step("查询会话状态", HttpMethod::Get, "/status");

    let report = runner
        .run(&sequence("timeouts", vec![first, second]))
        .await
        .unwrap();
    assert!(report.passed);

    let calls = mock.calls();
    assert_eq!(calls[0].timeout, Duration::from_secs(30));
    assert_eq!(calls[1].timeout, Duration::from_secs(5));
}

#[tokio::test]
async fn test_hanging_transport_bounded_by_step_timeout() {
    // 只挂起、不应答的传输实现
    struct HangingTransport;

    #[async_trait]
    impl ProbeTransport for HangingTransport {
        async fn send(&self, _request: &ProbeRequest) -> Result<ProbeResponse, TransportError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            unreachable!()
        }
    }

    let runner =
        ProbeRunner::new(Arc::new(HangingTransport)).with_timeout(Duration::from_millis(50));

    let seq = sequence(
        "hanging-probe",
        vec![step("健康检查", HttpMethod::Get, "/health")],
    );
    let report = runner.run(&seq).await.unwrap();

    // 执行器在步骤超时处兜底，并归类为 Timeout
    let failure = report.first_failure().unwrap();
    assert_eq!(failure.failure, Some(FailureKind::Timeout));
}

#[tokio::test]
async fn test_empty_sequence_rejected() {
    let mock = Arc::new(MockTransport::new(vec![]));
    let runner = ProbeRunner::new(mock.clone());

    let result = runner.run(&sequence("empty", vec![])).await;
    assert!(matches!(result, Err(HarnessError::ConfigError(_))));

    // 校验失败时不发起任何请求
    assert_eq!(mock.calls().len(), 0);
}
