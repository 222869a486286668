//! 命令公共逻辑
//!
//! 探测执行与报告渲染在各子命令间共享。

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;

use plp_gateway::{GatewayClient, GatewayConfig};
use plp_harness::{GatewayTransport, ProbeRunner, ProbeSequence, RunReport, StepStatus};

/// 解析后的探测选项 (命令行参数优先于配置文件)
pub struct ProbeOptions {
    pub base_url: String,
    pub timeout_per_step: u64,
    pub session_prefix: String,
}

/// 执行探测序列并渲染报告
///
/// 任何步骤失败时返回错误，使进程以非零状态码退出。
pub async fn execute(sequence: &ProbeSequence, options: &ProbeOptions) -> Result<()> {
    println!("目标地址: {}", options.base_url.cyan());
    println!("步骤数: {}", sequence.steps.len().to_string().yellow());
    if let Some(desc) = &sequence.description {
        println!("描述: {}", desc.bright_black());
    }
    println!();

    let client = GatewayClient::new(
        &options.base_url,
        GatewayConfig {
            request_timeout: options.timeout_per_step,
            ..GatewayConfig::default()
        },
    )?;
    let transport = GatewayTransport::new(client);

    let runner = ProbeRunner::new(Arc::new(transport))
        .with_timeout(Duration::from_secs(options.timeout_per_step))
        .with_session_prefix(&options.session_prefix);

    println!("{}\n", "开始执行探测序列...".bold());

    let report = runner.run(sequence).await?;

    render_report(&report);

    if !report.passed {
        anyhow::bail!("探测序列执行失败");
    }

    Ok(())
}

/// 渲染执行报告
pub fn render_report(report: &RunReport) {
    println!("\n{}", "=".repeat(60));
    println!("{}", "执行报告".bold());
    println!("{}", "=".repeat(60));
    println!();

    println!("序列名称: {}", report.sequence_name.cyan().bold());
    if let Some(desc) = &report.description {
        println!("序列描述: {}", desc.bright_black());
    }
    println!("会话 ID: {}", report.session_id.yellow());
    println!("执行时间: {} ms", report.duration_ms.to_string().yellow());
    println!();

    println!("步骤统计:");
    println!("  已执行: {}", report.steps_executed.to_string().bright_blue());
    println!("  成功:   {}", report.passed_count.to_string().green());
    println!("  失败:   {}", report.failed_count.to_string().red());
    println!("  跳过:   {}", report.skipped_count.to_string().yellow());
    println!();

    // 步骤详情
    if !report.steps.is_empty() {
        println!("步骤详情:");
        println!();

        for step in &report.steps {
            let status_icon = match step.status {
                StepStatus::Success => "✓".green(),
                StepStatus::Failed => "✗".red(),
                StepStatus::Skipped => "⊘".yellow(),
            };

            println!(
                "{} 步骤 {}: {}",
                status_icon.bold(),
                (step.step_index + 1).to_string().bright_black(),
                step.name
            );

            if let Some(status) = step.http_status {
                println!("   状态码: {}", status.to_string().bright_black());
            }

            if let Some(kind) = step.failure {
                println!("   失败类别: {}", kind.label().red());
            }

            if let Some(error) = &step.error {
                println!("   错误: {}", error.red());
            }

            if let Some(output) = &step.output {
                if !output.is_empty() {
                    println!("   响应: {}", format_body(output).bright_black());
                }
            }

            if step.status != StepStatus::Skipped {
                println!("   耗时: {} ms", step.duration_ms.to_string().bright_black());
            }

            println!();
        }
    }

    // 总结
    println!("{}", "=".repeat(60));
    let status = if report.passed {
        format!("{} 探测序列执行成功", "✓".green().bold())
    } else {
        format!("{} 探测序列执行失败", "✗".red().bold())
    };
    println!("{}", status);
    println!("{}", "=".repeat(60));
}

/// 格式化响应体: 合法 JSON 缩进展示，超长文本按字符截断
fn format_body(body: &str) -> String {
    let formatted = match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| body.to_string()),
        Err(_) => body.to_string(),
    };

    if formatted.chars().count() > 300 {
        let truncated: String = formatted.chars().take(300).collect();
        format!("{}... (已截断)", truncated)
    } else {
        formatted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_body_pretty_prints_json() {
        let formatted = format_body(r#"{"status":"healthy"}"#);
        assert!(formatted.contains("\"status\": \"healthy\""));
    }

    #[test]
    fn test_format_body_keeps_plain_text() {
        assert_eq!(format_body("plain text"), "plain text");
    }

    #[test]
    fn test_format_body_truncates_long_output() {
        let long = "x".repeat(500);
        let formatted = format_body(&long);
        assert!(formatted.ends_with("(已截断)"));
        assert!(formatted.chars().count() < 400);
    }
}
