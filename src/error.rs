use std::fmt::Display;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BenchError {
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),
    #[error("文件未找到: {0}")]
    FileNotFound(String),
    #[error("编码错误 ({format}): {message}")]
    Encode {
        format: &'static str,
        message: String,
    },
    #[error("解码错误 ({format}): {message}")]
    Decode {
        format: &'static str,
        message: String,
    },
    #[error("Schema 错误: {0}")]
    Schema(String),
    #[error("扩展名不匹配: 期望 {expected}, 路径 {path}")]
    ExtensionMismatch { expected: &'static str, path: String },
    #[error("路径错误: {0}")]
    PathError(String),
}

impl BenchError {
    pub fn encode(format: &'static str, err: impl Display) -> Self {
        BenchError::Encode {
            format,
            message: err.to_string(),
        }
    }

    pub fn decode(format: &'static str, err: impl Display) -> Self {
        BenchError::Decode {
            format,
            message: err.to_string(),
        }
    }

    /// 打开文件失败时区分"不存在"和其它 IO 错误
    pub fn from_open(err: std::io::Error, path: &Path) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            BenchError::FileNotFound(path.display().to_string())
        } else {
            BenchError::Io(err)
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, BenchError::FileNotFound(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, BenchError::Decode { .. })
    }
}

pub type Result<T> = std::result::Result<T, BenchError>;
