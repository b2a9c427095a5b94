//! 日志模块：env_logger（控制台彩色输出 + 文件镜像 + 按大小轮转）
use env_logger::fmt::Formatter;
use env_logger::{Builder, Target, WriteStyle};
use log::{Level, LevelFilter, Record};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once};

const DEFAULT_LOG_DIR: &str = "logs";
const DEFAULT_LOG_FILE: &str = "marketplace-tx.log";
const LOG_MAX_SIZE_MB: u64 = 10;
const LOG_MAX_ROTATIONS: usize = 5;

static INIT_LOGGER: Once = Once::new();
static FILE_WRITER: Mutex<Option<File>> = Mutex::new(None);

/// 从环境变量读取的日志设置
#[derive(Debug, Clone)]
pub struct LogSettings {
    pub level: LevelFilter,
    pub dir: PathBuf,
    pub file_name: String,
    /// LOG_TO_FILE=false 时只输出到控制台
    pub to_file: bool,
}

impl LogSettings {
    pub fn from_env() -> Self {
        let raw_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string());
        Self {
            level: parse_level(&raw_level),
            dir: std::env::var("LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_LOG_DIR)),
            file_name: std::env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string()),
            to_file: std::env::var("LOG_TO_FILE")
                .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "no"))
                .unwrap_or(true),
        }
    }

    fn file_path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

fn parse_level(raw: &str) -> LevelFilter {
    match raw.trim().to_uppercase().as_str() {
        "TRACE" => LevelFilter::Trace,
        "DEBUG" => LevelFilter::Debug,
        "INFO" => LevelFilter::Info,
        "WARN" => LevelFilter::Warn,
        "ERROR" => LevelFilter::Error,
        "OFF" => LevelFilter::Off,
        other => {
            eprintln!("⚠️ 无效日志级别「{}」，使用默认 INFO", other);
            LevelFilter::Info
        }
    }
}

/// 初始化日志系统（全局只生效一次）
pub fn init_logger() {
    init_logger_with(LogSettings::from_env());
}

pub fn init_logger_with(settings: LogSettings) {
    INIT_LOGGER.call_once(|| {
        let file_enabled = settings.to_file && open_log_file(&settings);

        let mut builder = Builder::from_default_env();
        builder
            .filter(None, settings.level)
            .filter(Some("ethers_providers"), LevelFilter::Warn)
            .filter(Some("reqwest"), LevelFilter::Warn)
            .filter(Some("hyper"), LevelFilter::Warn)
            .write_style(WriteStyle::Auto)
            .format(move |f: &mut Formatter, record: &Record| {
                let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S.%3f");
                let module = record.module_path().unwrap_or("unknown");

                let written = writeln!(
                    f,
                    "[{}] [{}{:>5}\x1b[0m] [\x1b[31m{}\x1b[0m] - {}",
                    now,
                    level_color(record.level()),
                    record.level(),
                    module,
                    record.args()
                );

                if file_enabled {
                    let line = format!(
                        "[{}] [线程: {}] [模块: {}] [级别: {}] - {}\n",
                        now,
                        std::thread::current().name().unwrap_or("unknown"),
                        module,
                        record.level(),
                        record.args()
                    );
                    // 文件写失败不影响控制台输出
                    if let Ok(mut writer) = FILE_WRITER.lock() {
                        if let Some(file) = writer.as_mut() {
                            let _ = file.write_all(line.as_bytes());
                        }
                    }
                }

                written
            })
            .target(Target::Stdout);

        match builder.try_init() {
            Ok(()) => log::info!(
                "✅ 日志系统初始化完成 | 级别: {} | 文件: {}",
                settings.level,
                if file_enabled {
                    settings.file_path().display().to_string()
                } else {
                    "disabled".to_string()
                }
            ),
            Err(e) => eprintln!("❌ 日志初始化失败: {}", e),
        }
    });
}

fn level_color(level: Level) -> &'static str {
    match level {
        Level::Error => "\x1b[91m",
        Level::Warn => "\x1b[93m",
        Level::Info => "\x1b[92m",
        Level::Debug => "\x1b[96m",
        Level::Trace => "\x1b[95m",
    }
}

fn open_log_file(settings: &LogSettings) -> bool {
    if let Err(e) = fs::create_dir_all(&settings.dir) {
        eprintln!("❌ 创建日志目录失败: {}", e);
        return false;
    }
    if let Err(e) = rotate_logs(&settings.dir, &settings.file_name) {
        eprintln!("⚠️ 日志轮转失败: {}", e);
    }
    match fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(settings.file_path())
    {
        Ok(file) => {
            if let Ok(mut writer) = FILE_WRITER.lock() {
                *writer = Some(file);
            }
            true
        }
        Err(e) => {
            eprintln!("❌ 创建日志文件失败: {}", e);
            false
        }
    }
}

/// 超过阈值时 a.log → a.log.1 → a.log.2 …，最多保留 LOG_MAX_ROTATIONS 份
fn rotate_logs(dir: &Path, file_name: &str) -> io::Result<()> {
    let current = dir.join(file_name);
    if !current.exists() {
        return Ok(());
    }

    let size_mb = fs::metadata(&current)?.len() / (1024 * 1024);
    if size_mb < LOG_MAX_SIZE_MB {
        return Ok(());
    }

    for i in (1..LOG_MAX_ROTATIONS).rev() {
        let src = dir.join(format!("{}.{}", file_name, i));
        if src.exists() {
            fs::rename(&src, dir.join(format!("{}.{}", file_name, i + 1)))?;
        }
    }
    fs::rename(&current, dir.join(format!("{}.1", file_name)))
}

// ==================== 便捷日志宏 ====================
#[macro_export]
macro_rules! log_trace { ($($arg:tt)*) => { log::trace!($($arg)*) }; }
#[macro_export]
macro_rules! log_debug { ($($arg:tt)*) => { log::debug!($($arg)*) }; }
#[macro_export]
macro_rules! log_info  { ($($arg:tt)*) => { log::info!($($arg)*) }; }
#[macro_export]
macro_rules! log_warn  { ($($arg:tt)*) => { log::warn!($($arg)*) }; }
#[macro_export]
macro_rules! log_error { ($($arg:tt)*) => { log::error!($($arg)*) }; }
