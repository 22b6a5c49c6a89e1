//! 小组存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::group_members::{
    ActiveModel as GroupMemberActiveModel, Column as GroupMemberColumn, Entity as GroupMembers,
};
use crate::entity::groups::{ActiveModel, Column, Entity as Groups};
use crate::errors::{GradebookError, Result};
use crate::models::groups::{
    entities::{Group, GroupMember},
    requests::CreateGroupRequest,
};
use crate::storage::AddMemberOutcome;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr,
};

impl SeaOrmStorage {
    /// 在作业下创建小组
    pub async fn create_group_impl(
        &self,
        assignment_id: i64,
        group: CreateGroupRequest,
    ) -> Result<Group> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            assignment_id: Set(assignment_id),
            name: Set(group.name),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("创建小组失败: {e}")))?;

        Ok(result.into_group())
    }

    /// 添加小组成员
    pub async fn add_group_member_impl(
        &self,
        group_id: i64,
        student_id: i64,
    ) -> Result<AddMemberOutcome> {
        let group = Groups::find_by_id(group_id)
            .one(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询小组失败: {e}")))?;

        if group.is_none() {
            return Ok(AddMemberOutcome::GroupNotFound);
        }

        let model = GroupMemberActiveModel {
            group_id: Set(group_id),
            student_id: Set(student_id),
            joined_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        match model.insert(&self.db).await {
            Ok(result) => Ok(AddMemberOutcome::Added(result.into_group_member())),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Ok(AddMemberOutcome::Duplicate)
            }
            Err(e) => Err(GradebookError::database_operation(format!(
                "添加小组成员失败: {e}"
            ))),
        }
    }

    /// 获取小组及其成员
    pub async fn get_group_with_members_impl(&self, group_id: i64) -> Result<Option<Group>> {
        let group = Groups::find_by_id(group_id)
            .one(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询小组失败: {e}")))?;

        let Some(group) = group else {
            return Ok(None);
        };

        let members = GroupMembers::find()
            .filter(GroupMemberColumn::GroupId.eq(group_id))
            .order_by_asc(GroupMemberColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询小组成员失败: {e}")))?;

        let mut group = group.into_group();
        group.members = members.into_iter().map(|m| m.into_group_member()).collect();
        Ok(Some(group))
    }

    /// 列出作业下的小组（含成员）
    pub async fn list_groups_by_assignment_impl(&self, assignment_id: i64) -> Result<Vec<Group>> {
        let groups = Groups::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询小组列表失败: {e}")))?;

        if groups.is_empty() {
            return Ok(vec![]);
        }

        let group_ids: Vec<i64> = groups.iter().map(|g| g.id).collect();
        let members = GroupMembers::find()
            .filter(GroupMemberColumn::GroupId.is_in(group_ids))
            .order_by_asc(GroupMemberColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询小组成员失败: {e}")))?;

        let mut by_group: HashMap<i64, Vec<GroupMember>> = HashMap::new();
        for member in members {
            by_group
                .entry(member.group_id)
                .or_default()
                .push(member.into_group_member());
        }

        Ok(groups
            .into_iter()
            .map(|g| {
                let mut group = g.into_group();
                group.members = by_group.remove(&group.id).unwrap_or_default();
                group
            })
            .collect())
    }
}
