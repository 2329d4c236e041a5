use serde::{Deserialize, Serialize};

/// 用户角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Teacher,
    Student,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Role::Admin => "管理员",
            Role::Teacher => "教师",
            Role::Student => "学生",
        };
        write!(f, "{}", label)
    }
}

/// 用户记录
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

impl User {
    /// 显示名（优先昵称，退回邮箱）
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }

    pub fn is_student(&self) -> bool {
        self.role == Some(Role::Student)
    }
}

/// 登录凭据
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// 注册请求
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// 登录响应（令牌进入本地会话槽位）
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// 资料更新（只发送填写过的字段）
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_to_email() {
        let user: User =
            serde_json::from_str(r#"{"id": 1, "email": "a@b.com", "role": "student"}"#).unwrap();
        assert_eq!(user.display_name(), "a@b.com");
        assert!(user.is_student());
    }

    #[test]
    fn profile_update_omits_empty_fields() {
        let update = ProfileUpdate {
            name: Some("张三".to_string()),
            password: None,
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["name"], "张三");
        assert!(value.get("password").is_none());
    }
}
