//! CLI 配置管理
//!
//! **数据存储方式**: TOML 文件 (~/.config/plp/config.toml)
//!
//! 默认值复刻两条内置探测流程的目标端点，保证 `plp flow` /
//! `plp balancer` 无参数即可运行；所有键均可被命令行参数覆盖。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// CLI 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// API Gateway 地址 (内置 flow 探测的目标)
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,

    /// 负载均衡器地址 (内置 balancer 探测的目标)
    #[serde(default = "default_balancer_url")]
    pub balancer_url: String,

    /// 默认步骤超时（秒）
    #[serde(default = "default_timeout_per_step")]
    pub timeout_per_step: u64,

    /// 会话 ID 前缀
    #[serde(default = "default_session_id_prefix")]
    pub session_id_prefix: String,

    /// 序列文件目录
    pub sequence_dir: Option<String>,

    /// 配置版本
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_gateway_url() -> String {
    "http://api-gateway.sessions.svc.cluster.local:8000".to_string()
}

fn default_balancer_url() -> String {
    "http://ad171b9bedd35460890473e6baf67a42-b4ef754c96f0229e.elb.ap-south-1.amazonaws.com"
        .to_string()
}

fn default_timeout_per_step() -> u64 {
    30
}

fn default_session_id_prefix() -> String {
    "probe".to_string()
}

fn default_version() -> String {
    "1.0".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            gateway_url: default_gateway_url(),
            balancer_url: default_balancer_url(),
            timeout_per_step: default_timeout_per_step(),
            session_id_prefix: default_session_id_prefix(),
            sequence_dir: Some("./sequences".to_string()),
            version: default_version(),
        }
    }
}

impl CliConfig {
    /// 获取配置文件路径
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("无法获取用户主目录")?;
        Ok(home.join(".config").join("plp").join("config.toml"))
    }

    /// 加载配置
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("读取配置文件失败: {:?}", path))?;

        toml::from_str(&content)
            .with_context(|| format!("解析配置文件失败: {:?}", path))
    }

    /// 保存配置
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        // 确保目录存在
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("创建配置目录失败: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self)
            .context("序列化配置失败")?;

        fs::write(&path, content)
            .with_context(|| format!("写入配置文件失败: {:?}", path))?;

        Ok(())
    }

    /// 获取序列目录
    pub fn get_sequence_dir(&self) -> PathBuf {
        PathBuf::from(self.sequence_dir.as_deref().unwrap_or("./sequences"))
    }
}
