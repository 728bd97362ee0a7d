//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_becanizado_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum BecanizadoError {
            $($variant(String),)*
        }

        impl BecanizadoError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(BecanizadoError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(BecanizadoError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(BecanizadoError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl BecanizadoError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        BecanizadoError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_becanizado_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    Upstream("E010", "Upstream Service Error"),
    Authentication("E011", "Authentication Error"),
    Authorization("E012", "Authorization Error"),
}

impl BecanizadoError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for BecanizadoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for BecanizadoError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for BecanizadoError {
    fn from(err: sea_orm::DbErr) -> Self {
        BecanizadoError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for BecanizadoError {
    fn from(err: std::io::Error) -> Self {
        BecanizadoError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for BecanizadoError {
    fn from(err: serde_json::Error) -> Self {
        BecanizadoError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for BecanizadoError {
    fn from(err: reqwest::Error) -> Self {
        BecanizadoError::Upstream(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BecanizadoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(BecanizadoError::cache_connection("test").code(), "E001");
        assert_eq!(BecanizadoError::database_config("test").code(), "E003");
        assert_eq!(BecanizadoError::validation("test").code(), "E007");
        assert_eq!(BecanizadoError::upstream("test").code(), "E010");
        assert_eq!(BecanizadoError::authorization("test").code(), "E012");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            BecanizadoError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(
            BecanizadoError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = BecanizadoError::not_found("exercise 42");
        assert_eq!(err.message(), "exercise 42");
    }

    #[test]
    fn test_from_serde_error() {
        let err: BecanizadoError = serde_json::from_str::<Vec<i64>>("not json")
            .unwrap_err()
            .into();
        assert_eq!(err.code(), "E009");
    }

    #[test]
    fn test_format_simple() {
        let err = BecanizadoError::validation("Title is required");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Title is required"));
    }
}
