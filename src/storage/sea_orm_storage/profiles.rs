//! 用户资料存储操作

use super::SeaOrmStorage;
use crate::entity::profiles::{ActiveModel, Column, Entity as Profiles};
use crate::errors::{BecanizadoError, Result};
use crate::models::profiles::{
    entities::{Profile, ProfileRole},
    requests::CreateProfileRequest,
};
use crate::models::profiles::entities::ProfileSummary;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use std::collections::{HashMap, HashSet};

impl SeaOrmStorage {
    /// 创建用户资料
    pub async fn create_profile_impl(&self, req: CreateProfileRequest) -> Result<Profile> {
        let model = ActiveModel {
            email: Set(req.email),
            password_hash: Set(req.password),
            full_name: Set(req.full_name),
            role: Set(req.role.unwrap_or(ProfileRole::Student).to_string()),
            youtube_channel: Set(req.youtube_channel),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| BecanizadoError::database_operation(format!("创建用户资料失败: {e}")))?;

        Ok(result.into_profile())
    }

    /// 通过 ID 获取用户资料
    pub async fn get_profile_by_id_impl(&self, id: i64) -> Result<Option<Profile>> {
        let result = Profiles::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| BecanizadoError::database_operation(format!("查询用户资料失败: {e}")))?;

        Ok(result.map(|m| m.into_profile()))
    }

    /// 通过邮箱获取用户资料
    pub async fn get_profile_by_email_impl(&self, email: &str) -> Result<Option<Profile>> {
        let result = Profiles::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| BecanizadoError::database_operation(format!("查询用户资料失败: {e}")))?;

        Ok(result.map(|m| m.into_profile()))
    }

    /// 批量查询作者信息
    pub(super) async fn profile_summaries(
        &self,
        ids: impl IntoIterator<Item = i64>,
    ) -> Result<HashMap<i64, ProfileSummary>> {
        let ids: Vec<i64> = ids.into_iter().collect::<HashSet<_>>().into_iter().collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let profiles = Profiles::find()
            .filter(Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(|e| BecanizadoError::database_operation(format!("查询用户信息失败: {e}")))?;

        Ok(profiles.iter().map(|p| (p.id, p.to_summary())).collect())
    }

    /// 统计用户数量
    pub async fn count_profiles_impl(&self) -> Result<u64> {
        Profiles::find()
            .count(&self.db)
            .await
            .map_err(|e| BecanizadoError::database_operation(format!("统计用户数量失败: {e}")))
    }
}
