use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 用户角色
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/profile.ts")]
pub enum ProfileRole {
    Student,   // 学生
    Professor, // 教师
}

impl ProfileRole {
    pub const STUDENT: &'static str = "student";
    pub const PROFESSOR: &'static str = "professor";

    pub fn professor_roles() -> &'static [&'static ProfileRole] {
        &[&Self::Professor]
    }
    pub fn student_roles() -> &'static [&'static ProfileRole] {
        &[&Self::Student]
    }
    pub fn all_roles() -> &'static [&'static ProfileRole] {
        &[&Self::Student, &Self::Professor]
    }

    pub fn is_professor(&self) -> bool {
        matches!(self, ProfileRole::Professor)
    }
}

impl<'de> Deserialize<'de> for ProfileRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户角色: '{s}'. 支持的角色: student, professor"
            ))
        })
    }
}

impl std::fmt::Display for ProfileRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileRole::Student => write!(f, "{}", ProfileRole::STUDENT),
            ProfileRole::Professor => write!(f, "{}", ProfileRole::PROFESSOR),
        }
    }
}

impl std::str::FromStr for ProfileRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ProfileRole::STUDENT => Ok(ProfileRole::Student),
            ProfileRole::PROFESSOR => Ok(ProfileRole::Professor),
            _ => Err(format!("Invalid profile role: {s}")),
        }
    }
}

/// 用户资料
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/profile.ts")]
pub struct Profile {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    #[ts(skip)]
    pub password_hash: String,
    pub full_name: String,
    pub role: ProfileRole,
    pub youtube_channel: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Profile {
    pub fn is_professor(&self) -> bool {
        self.role.is_professor()
    }

    /// 当前角色在界面上可以执行的操作
    pub fn capabilities(&self) -> Capabilities {
        let professor = self.is_professor();
        Capabilities {
            can_create_exercise: professor,
            can_give_feedback: professor,
            can_review_responses: professor,
            can_submit: !professor,
        }
    }

    pub fn summary(&self) -> ProfileSummary {
        ProfileSummary {
            id: self.id,
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            youtube_channel: self.youtube_channel.clone(),
        }
    }

    pub fn generate_token_pair(
        &self,
        refresh_token_expiry: Option<chrono::TimeDelta>,
    ) -> Result<crate::utils::jwt::TokenPair, String> {
        crate::utils::jwt::JwtUtils::generate_token_pair(self.id, self.role, refresh_token_expiry)
            .map_err(|e| format!("生成 token 对失败: {e}"))
    }
}

/// 嵌入在练习和答案中的作者信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/profile.ts")]
pub struct ProfileSummary {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub youtube_channel: Option<String>,
}

/// 角色能力
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/profile.ts")]
pub struct Capabilities {
    pub can_create_exercise: bool,
    pub can_give_feedback: bool,
    pub can_review_responses: bool,
    pub can_submit: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(role: ProfileRole) -> Profile {
        Profile {
            id: 1,
            email: "ana@example.com".to_string(),
            password_hash: String::new(),
            full_name: "Ana".to_string(),
            role,
            youtube_channel: None,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_role_parse_and_display() {
        assert_eq!("student".parse::<ProfileRole>(), Ok(ProfileRole::Student));
        assert_eq!("professor".parse::<ProfileRole>(), Ok(ProfileRole::Professor));
        assert!("admin".parse::<ProfileRole>().is_err());
        assert_eq!(ProfileRole::Professor.to_string(), "professor");
    }

    #[test]
    fn test_role_deserialize_rejects_unknown() {
        let role: ProfileRole = serde_json::from_str("\"student\"").unwrap();
        assert_eq!(role, ProfileRole::Student);
        assert!(serde_json::from_str::<ProfileRole>("\"teacher\"").is_err());
    }

    #[test]
    fn test_professor_capabilities() {
        let caps = profile(ProfileRole::Professor).capabilities();
        assert!(caps.can_create_exercise);
        assert!(caps.can_give_feedback);
        assert!(caps.can_review_responses);
        assert!(!caps.can_submit);
    }

    #[test]
    fn test_student_capabilities() {
        let caps = profile(ProfileRole::Student).capabilities();
        assert!(!caps.can_create_exercise);
        assert!(!caps.can_give_feedback);
        assert!(!caps.can_review_responses);
        assert!(caps.can_submit);
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let mut p = profile(ProfileRole::Student);
        p.password_hash = "secret".to_string();
        let json = serde_json::to_string(&p).unwrap();
        assert!(!json.contains("secret"));
        assert!(!json.contains("password_hash"));
    }
}
