//! 错误处理模块
//!
//! 定义了查看器中使用的统一错误类型。
//!
//! # 设计原则
//!
//! - 为每种错误类型提供清晰的上下文信息
//! - 支持错误链（error source）
//! - 易于模式匹配和错误处理
//!
//! 导入失败（`ImportError`）总是中止整个加载过程，不会暴露部分导入的子网格。

use std::fmt;
use std::path::PathBuf;

/// 统一的 Result 类型
///
/// 所有可能返回错误的函数都应该使用这个类型。
pub type Result<T> = std::result::Result<T, ViewerError>;

/// 查看器的错误类型
#[derive(Debug)]
pub enum ViewerError {
    /// 配置错误
    Config(ConfigError),

    /// 图形 API 错误
    Graphics(GraphicsError),

    /// 模型导入错误
    Import(ImportError),

    /// IO 错误
    Io(std::io::Error),

    /// 初始化错误
    Initialization(String),
}

/// 配置相关的错误
#[derive(Debug)]
pub enum ConfigError {
    /// 配置文件未找到
    FileNotFound(String),

    /// 配置文件解析失败
    ParseError(String),

    /// 配置值无效
    InvalidValue { field: String, reason: String },
}

/// 图形 API 相关的错误
#[derive(Debug)]
pub enum GraphicsError {
    /// 设备创建失败
    DeviceCreation(String),

    /// 交换链错误
    SwapchainError(String),

    /// 资源创建失败
    ResourceCreation(String),

    /// 纹理解码或上传失败
    TextureLoad { path: PathBuf, reason: String },
}

/// 模型导入相关的错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// 外部解析器无法打开或解析文件，携带解析器的诊断信息
    ParseFailure(String),

    /// 解析出的场景不包含任何网格
    NoMeshes,

    /// 网格缺少必需的属性（位置、面索引或法线）
    MissingAttribute { mesh: usize, attribute: &'static str },

    /// 网格包含非三角形图元
    UnsupportedPrimitive { mesh: usize, arity: u32 },

    /// 属性数组长度不一致或索引越界
    InvalidAttribute { mesh: usize, reason: String },

    /// 不支持的文件格式
    UnsupportedFormat(String),
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewerError::Config(e) => write!(f, "Configuration error: {}", e),
            ViewerError::Graphics(e) => write!(f, "Graphics error: {}", e),
            ViewerError::Import(e) => write!(f, "Import error: {}", e),
            ViewerError::Io(e) => write!(f, "IO error: {}", e),
            ViewerError::Initialization(msg) => write!(f, "Initialization error: {}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {}", path),
            ConfigError::ParseError(msg) => write!(f, "Failed to parse config: {}", msg),
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl fmt::Display for GraphicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphicsError::DeviceCreation(msg) => write!(f, "Device creation failed: {}", msg),
            GraphicsError::SwapchainError(msg) => write!(f, "Swapchain error: {}", msg),
            GraphicsError::ResourceCreation(msg) => write!(f, "Resource creation failed: {}", msg),
            GraphicsError::TextureLoad { path, reason } => {
                write!(f, "Failed to load texture '{}': {}", path.display(), reason)
            }
        }
    }
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::ParseFailure(msg) => write!(f, "Failed to parse model: {}", msg),
            ImportError::NoMeshes => write!(f, "Mesh not found in file"),
            ImportError::MissingAttribute { mesh, attribute } => {
                write!(f, "Mesh {} is missing required attribute '{}'", mesh, attribute)
            }
            ImportError::UnsupportedPrimitive { mesh, arity } => write!(
                f,
                "Mesh {} contains a {}-vertex primitive, only triangles are supported",
                mesh, arity
            ),
            ImportError::InvalidAttribute { mesh, reason } => {
                write!(f, "Mesh {} has inconsistent attributes: {}", mesh, reason)
            }
            ImportError::UnsupportedFormat(msg) => write!(f, "Unsupported model format: {}", msg),
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewerError::Io(e) => Some(e),
            ViewerError::Import(e) => Some(e),
            ViewerError::Config(e) => Some(e),
            ViewerError::Graphics(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for ConfigError {}
impl std::error::Error for GraphicsError {}
impl std::error::Error for ImportError {}

// 实现 From trait 以便于错误转换
impl From<std::io::Error> for ViewerError {
    fn from(err: std::io::Error) -> Self {
        ViewerError::Io(err)
    }
}

impl From<ConfigError> for ViewerError {
    fn from(err: ConfigError) -> Self {
        ViewerError::Config(err)
    }
}

impl From<GraphicsError> for ViewerError {
    fn from(err: GraphicsError) -> Self {
        ViewerError::Graphics(err)
    }
}

impl From<ImportError> for ViewerError {
    fn from(err: ImportError) -> Self {
        ViewerError::Import(err)
    }
}
