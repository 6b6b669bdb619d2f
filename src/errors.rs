//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。
//! 工作流核心的错误分类（NotFound / Unauthorized / InvalidTransition /
//! PreconditionFailed / StorageFailure）与基础设施错误共用同一个枚举。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_internhub_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum InternHubError {
            $($variant(String),)*
        }

        impl InternHubError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(InternHubError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(InternHubError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(InternHubError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl InternHubError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        InternHubError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_internhub_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    DateParse("E010", "Date Parse Error"),
    Authentication("E011", "Authentication Error"),
    Unauthorized("E012", "Unauthorized"),
    InvalidTransition("E013", "Invalid Status Transition"),
    PreconditionFailed("E014", "Precondition Failed"),
    StorageFailure("E015", "File Storage Failure"),
    Conflict("E016", "Concurrent Modification"),
}

impl InternHubError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 是否为业务规则拒绝（而非基础设施故障）
    pub fn is_business_rejection(&self) -> bool {
        matches!(
            self,
            InternHubError::NotFound(_)
                | InternHubError::Unauthorized(_)
                | InternHubError::InvalidTransition(_)
                | InternHubError::PreconditionFailed(_)
                | InternHubError::Validation(_)
        )
    }
}

impl fmt::Display for InternHubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for InternHubError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for InternHubError {
    fn from(err: sea_orm::DbErr) -> Self {
        InternHubError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for InternHubError {
    fn from(err: std::io::Error) -> Self {
        InternHubError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for InternHubError {
    fn from(err: serde_json::Error) -> Self {
        InternHubError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for InternHubError {
    fn from(err: chrono::ParseError) -> Self {
        InternHubError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, InternHubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(InternHubError::cache_connection("test").code(), "E001");
        assert_eq!(InternHubError::database_config("test").code(), "E003");
        assert_eq!(InternHubError::validation("test").code(), "E007");
        assert_eq!(InternHubError::unauthorized("test").code(), "E012");
        assert_eq!(InternHubError::invalid_transition("test").code(), "E013");
        assert_eq!(InternHubError::storage_failure("test").code(), "E015");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            InternHubError::precondition_failed("test").error_type(),
            "Precondition Failed"
        );
        assert_eq!(
            InternHubError::invalid_transition("test").error_type(),
            "Invalid Status Transition"
        );
    }

    #[test]
    fn test_format_simple() {
        let err = InternHubError::precondition_failed("invalid URL");
        let formatted = err.format_simple();
        assert!(formatted.contains("Precondition Failed"));
        assert!(formatted.contains("invalid URL"));
    }

    #[test]
    fn test_business_rejection_split() {
        assert!(InternHubError::not_found("x").is_business_rejection());
        assert!(InternHubError::precondition_failed("x").is_business_rejection());
        assert!(!InternHubError::storage_failure("x").is_business_rejection());
        assert!(!InternHubError::conflict("x").is_business_rejection());
        assert!(!InternHubError::database_operation("x").is_business_rejection());
    }
}
