//! 日志系统模块
//!
//! 基于 `tracing` 的结构化日志。控制台始终输出，文件输出可选并按天滚动。
//! 设置了 `RUST_LOG` 时以环境变量为准，否则使用配置中的级别，
//! 并把 wgpu/naga 等图形库的日志压到 warn，避免刷屏。
//!
//! # 使用示例
//!
//! ```no_run
//! use mesh_viewer::core::{config::LogLevel, log};
//!
//! log::init_logger(LogLevel::Info, false, None);
//! tracing::info!(width = 800, height = 600, "Window created");
//! ```

use std::path::{Path, PathBuf};

use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use super::config::LogLevel;

/// 未指定路径时的日志文件名
const DEFAULT_LOG_FILE: &str = "mesh_viewer.log";

/// 输出过多的依赖库
const NOISY_CRATES: &[&str] = &["wgpu_core", "wgpu_hal", "naga", "egui_wgpu"];

/// 初始化日志系统
///
/// 必须在程序开始时调用一次。
///
/// # 参数
///
/// * `level` - 日志级别
/// * `file_output` - 是否同时输出到文件
/// * `log_file_path` - 日志文件路径，缺省为 `mesh_viewer.log`
pub fn init_logger(level: LogLevel, file_output: bool, log_file_path: Option<&str>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_directives(level)));

    let console_layer = fmt::layer().with_target(true).with_ansi(true);

    let file_layer = file_output.then(|| {
        let (directory, filename) = split_log_path(log_file_path.unwrap_or(DEFAULT_LOG_FILE));
        let appender = RollingFileAppender::new(Rotation::DAILY, directory, filename);

        fmt::layer().with_target(true).with_ansi(false).with_writer(appender)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// 全局级别加上依赖库的降级指令，如 `info,naga=warn`
fn filter_directives(level: LogLevel) -> String {
    let global = level_name(level);
    let quiet = match level {
        LogLevel::Error => "error",
        _ => "warn",
    };

    std::iter::once(global.to_string())
        .chain(NOISY_CRATES.iter().map(|name| format!("{}={}", name, quiet)))
        .collect::<Vec<_>>()
        .join(",")
}

fn level_name(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Trace => "trace",
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    }
}

/// 把日志路径拆成目录和文件名，目录缺省为当前目录
fn split_log_path(path: &str) -> (PathBuf, String) {
    let path = Path::new(path);
    let directory = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(DEFAULT_LOG_FILE);

    (directory.to_path_buf(), filename.to_string())
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}
