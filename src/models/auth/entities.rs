use serde::{Deserialize, Serialize};

use crate::models::admins::entities::Admin;
use crate::models::teachers::entities::Teacher;

// 角色
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Teacher,   // 教师
    Inspector, // 检查员（按地区审核）
    Admin,     // 管理员
}

impl UserRole {
    pub const TEACHER: &'static str = "teacher";
    pub const INSPECTOR: &'static str = "inspector";
    pub const ADMIN: &'static str = "admin";

    pub fn admin_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin]
    }
    pub fn staff_roles() -> &'static [&'static UserRole] {
        &[&Self::Inspector, &Self::Admin]
    }
    pub fn teacher_roles() -> &'static [&'static UserRole] {
        &[&Self::Teacher]
    }

    /// 管理员表中允许的角色
    pub fn is_staff(&self) -> bool {
        matches!(self, UserRole::Inspector | UserRole::Admin)
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<UserRole>().map_err(|_| {
            serde::de::Error::custom(format!(
                "Invalid role: '{s}'. Supported roles: teacher, inspector, admin"
            ))
        })
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Teacher => write!(f, "{}", UserRole::TEACHER),
            UserRole::Inspector => write!(f, "{}", UserRole::INSPECTOR),
            UserRole::Admin => write!(f, "{}", UserRole::ADMIN),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            UserRole::TEACHER => Ok(UserRole::Teacher),
            UserRole::INSPECTOR => Ok(UserRole::Inspector),
            UserRole::ADMIN => Ok(UserRole::Admin),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

/// 经过 JWT 校验的登录主体
///
/// 教师与管理员分表存储，令牌中的 `role` 决定从哪张表解析。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "profile", rename_all = "snake_case")]
pub enum Principal {
    Teacher(Teacher),
    Admin(Admin),
}

impl Principal {
    pub fn id(&self) -> i64 {
        match self {
            Principal::Teacher(t) => t.id,
            Principal::Admin(a) => a.id,
        }
    }

    pub fn role(&self) -> UserRole {
        match self {
            Principal::Teacher(_) => UserRole::Teacher,
            Principal::Admin(a) => a.role,
        }
    }

    pub fn is_staff(&self) -> bool {
        self.role().is_staff()
    }

    pub fn is_admin(&self) -> bool {
        self.role() == UserRole::Admin
    }

    pub fn as_teacher(&self) -> Option<&Teacher> {
        match self {
            Principal::Teacher(t) => Some(t),
            Principal::Admin(_) => None,
        }
    }

    pub fn as_admin(&self) -> Option<&Admin> {
        match self {
            Principal::Admin(a) => Some(a),
            Principal::Teacher(_) => None,
        }
    }

    /// 教师本人或任一审核人员
    pub fn can_view_teacher(&self, teacher_id: i64) -> bool {
        self.is_staff() || self.as_teacher().is_some_and(|t| t.id == teacher_id)
    }

    /// 教师本人或管理员
    pub fn can_manage_teacher(&self, teacher_id: i64) -> bool {
        self.is_admin() || self.as_teacher().is_some_and(|t| t.id == teacher_id)
    }

    /// 检查员的审核地区；管理员和未分配地区的检查员不受限制
    pub fn review_region(&self) -> Option<&str> {
        match self {
            Principal::Admin(a) if a.role == UserRole::Inspector => a.region.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn teacher(id: i64) -> Principal {
        Principal::Teacher(Teacher {
            id,
            first_name: "Aziza".to_string(),
            last_name: "Karimova".to_string(),
            phone: "+998901234567".to_string(),
            password_hash: String::new(),
            profile_image: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    fn staff(id: i64, role: UserRole, region: Option<&str>) -> Principal {
        Principal::Admin(Admin {
            id,
            username: "inspector1".to_string(),
            password_hash: String::new(),
            role,
            region: region.map(str::to_string),
            last_login: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    #[test]
    fn test_role_round_trip() {
        for role in [UserRole::Teacher, UserRole::Inspector, UserRole::Admin] {
            assert_eq!(role.to_string().parse::<UserRole>().unwrap(), role);
        }
        assert!("root".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_teacher_permissions() {
        let p = teacher(7);
        assert!(p.can_view_teacher(7));
        assert!(!p.can_view_teacher(8));
        assert!(p.can_manage_teacher(7));
        assert!(!p.is_staff());
    }

    #[test]
    fn test_inspector_permissions() {
        let p = staff(1, UserRole::Inspector, Some("Samarkand"));
        assert!(p.can_view_teacher(42));
        assert!(!p.can_manage_teacher(42));
        assert_eq!(p.review_region(), Some("Samarkand"));
    }

    #[test]
    fn test_admin_region_is_unrestricted() {
        let p = staff(1, UserRole::Admin, Some("Tashkent"));
        assert!(p.can_manage_teacher(42));
        assert_eq!(p.review_region(), None);
    }

    #[test]
    fn test_principal_survives_cache_round_trip() {
        let json = serde_json::to_string(&teacher(3)).unwrap();
        let back: Principal = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id(), 3);
        assert_eq!(back.role(), UserRole::Teacher);
    }
}
