use std::fmt;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// API 调用错误
    Api(ApiError),
    /// 会话/令牌错误
    Session(SessionError),
    /// 选题状态错误（契约违规）
    Selection(SelectionError),
    /// 配置错误
    Config(ConfigError),
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Api(e) => write!(f, "API错误: {}", e),
            AppError::Session(e) => write!(f, "会话错误: {}", e),
            AppError::Selection(e) => write!(f, "选题错误: {}", e),
            AppError::Config(e) => write!(f, "配置错误: {}", e),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Api(e) => Some(e),
            AppError::Session(e) => Some(e),
            AppError::Selection(e) => Some(e),
            AppError::Config(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// API 调用错误
///
/// 两类来源：网络请求本身失败，或服务器返回了非 2xx 响应。
/// 服务器返回的 message 字段原样展示，没有则使用通用提示。
#[derive(Debug)]
pub enum ApiError {
    /// 网络请求失败
    RequestFailed {
        endpoint: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// API 返回错误响应
    BadResponse {
        endpoint: String,
        status: u16,
        message: Option<String>,
    },
    /// JSON 解析失败
    JsonParseFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::RequestFailed { endpoint, source } => {
                write!(f, "API请求失败 ({}): {}", endpoint, source)
            }
            ApiError::BadResponse {
                endpoint,
                status,
                message,
            } => match message {
                // 服务器自带的错误信息原样展示
                Some(msg) => write!(f, "{} (接口: {}, 状态码: {})", msg, endpoint, status),
                None => write!(f, "请求失败 (接口: {}, 状态码: {})", endpoint, status),
            },
            ApiError::JsonParseFailed { source } => {
                write!(f, "JSON解析失败: {}", source)
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::RequestFailed { source, .. } | ApiError::JsonParseFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 会话/令牌错误
#[derive(Debug)]
pub enum SessionError {
    /// 未登录（本地没有令牌）
    NotLoggedIn,
    /// 读取令牌文件失败
    ReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入令牌文件失败
    WriteFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NotLoggedIn => write!(f, "尚未登录，请先执行 login"),
            SessionError::ReadFailed { path, source } => {
                write!(f, "读取令牌文件失败 ({}): {}", path, source)
            }
            SessionError::WriteFailed { path, source } => {
                write!(f, "写入令牌文件失败 ({}): {}", path, source)
            }
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::ReadFailed { source, .. } | SessionError::WriteFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 选题状态错误
///
/// 只在违反调用契约时出现，正常的界面操作不会触发。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionError {
    /// 重排索引超出范围
    IndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionError::IndexOutOfRange { index, len } => {
                write!(f, "索引 {} 超出范围 [0, {})", index, len)
            }
        }
    }
}

impl std::error::Error for SelectionError {}

/// 配置错误
#[derive(Debug)]
pub enum ConfigError {
    /// 配置文件解析失败
    FileParseFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileParseFailed { path, source } => {
                write!(f, "配置文件解析失败 ({}): {}", path, source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::FileParseFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
        }
    }
}

// ========== 从常见错误类型转换 ==========

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Api(ApiError::JsonParseFailed {
            source: Box::new(err),
        })
    }
}

impl From<SelectionError> for AppError {
    fn from(err: SelectionError) -> Self {
        AppError::Selection(err)
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建API请求失败错误
    pub fn api_request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Api(ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        })
    }

    /// 创建API错误响应错误
    pub fn api_bad_response(
        endpoint: impl Into<String>,
        status: u16,
        message: Option<String>,
    ) -> Self {
        AppError::Api(ApiError::BadResponse {
            endpoint: endpoint.into(),
            status,
            message,
        })
    }

    /// 创建令牌文件读取错误
    pub fn session_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Session(SessionError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建令牌文件写入错误
    pub fn session_write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Session(SessionError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_response_shows_server_message_verbatim() {
        let err =
            AppError::api_bad_response("/auth/login", 401, Some("Invalid credentials".into()));
        let text = err.to_string();
        assert!(text.contains("Invalid credentials"), "服务器消息应原样展示");
    }

    #[test]
    fn bad_response_without_message_uses_fallback() {
        let err = AppError::api_bad_response("/api/v1/tests", 500, None);
        let text = err.to_string();
        assert!(text.contains("请求失败"), "缺少服务器消息时应使用通用提示");
        assert!(text.contains("500"));
    }

    #[test]
    fn selection_error_reports_range() {
        let err = SelectionError::IndexOutOfRange { index: 5, len: 3 };
        assert_eq!(err.to_string(), "索引 5 超出范围 [0, 3)");
    }
}
