//! PLP CLI 应用

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, Level};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "plp")]
#[command(about = "OCloudView PLP - 动态 Pod 生命周期探测工具", long_about = None)]
#[command(version)]
struct Cli {
    /// 日志级别
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 探测序列管理
    Sequence {
        #[command(subcommand)]
        action: SequenceAction,
    },

    /// 网关端到端会话探测 (执行 → 状态 → 再次执行)
    Flow {
        /// API Gateway 基础 URL (默认读取配置文件)
        #[arg(long)]
        base_url: Option<String>,

        /// 默认步骤超时（秒）
        #[arg(long)]
        timeout: Option<u64>,

        /// 会话 ID 前缀
        #[arg(long)]
        session_prefix: Option<String>,
    },

    /// 负载均衡器健康检查与会话创建探测
    Balancer {
        /// 负载均衡器基础 URL (默认读取配置文件)
        #[arg(long)]
        base_url: Option<String>,

        /// 默认步骤超时（秒）
        #[arg(long)]
        timeout: Option<u64>,

        /// 会话 ID 前缀
        #[arg(long)]
        session_prefix: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum SequenceAction {
    /// 运行序列文件
    Run {
        /// 序列文件路径 (.yaml/.yml/.json)
        file: String,

        /// 目标基础 URL (默认使用配置的网关地址)
        #[arg(long)]
        base_url: Option<String>,

        /// 默认步骤超时（秒）
        #[arg(long)]
        timeout: Option<u64>,

        /// 会话 ID 前缀
        #[arg(long)]
        session_prefix: Option<String>,
    },

    /// 列出序列文件
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt().with_max_level(log_level).init();

    info!("PLP CLI 启动");

    // 处理命令; 任意失败经由 anyhow 以非零状态码退出，供流水线判定
    match cli.command {
        Commands::Sequence { action } => commands::sequence::handle(action).await?,
        Commands::Flow {
            base_url,
            timeout,
            session_prefix,
        } => commands::flow::handle(base_url, timeout, session_prefix).await?,
        Commands::Balancer {
            base_url,
            timeout,
            session_prefix,
        } => commands::balancer::handle(base_url, timeout, session_prefix).await?,
    }

    Ok(())
}
