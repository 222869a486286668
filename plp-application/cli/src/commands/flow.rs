//! Flow 命令处理 (网关端到端会话探测)

use anyhow::Result;
use colored::Colorize;

use plp_harness::ProbeSequence;

use crate::commands::common::{self, ProbeOptions};
use crate::config::CliConfig;

pub async fn handle(
    base_url: Option<String>,
    timeout: Option<u64>,
    session_prefix: Option<String>,
) -> Result<()> {
    let config = CliConfig::load()?;

    let options = ProbeOptions {
        base_url: base_url.unwrap_or(config.gateway_url),
        timeout_per_step: timeout.unwrap_or(config.timeout_per_step),
        session_prefix: session_prefix.unwrap_or(config.session_id_prefix),
    };

    println!("{}", "=== 网关端到端会话探测 ===".bold());
    common::execute(&ProbeSequence::gateway_flow(), &options).await
}
