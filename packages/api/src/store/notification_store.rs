use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};
use storefront_types::create_id;
use utoipa::ToSchema;

use super::{DatabaseStore, NotificationStore, StoreResult};
use crate::entity::{notification, sea_orm_active_enums::NotificationType};
use crate::error::CommerceError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub notification_type: NotificationType,
    pub message: String,
    pub order_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NotificationQuery {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub unread_only: Option<bool>,
}

impl Default for NotificationQuery {
    fn default() -> Self {
        Self {
            limit: Some(20),
            offset: None,
            unread_only: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationCounts {
    pub notifications_count: u64,
    pub unread_count: u64,
}

#[async_trait::async_trait]
impl NotificationStore for DatabaseStore {
    async fn create_notification(
        &self,
        new_notification: NewNotification,
    ) -> StoreResult<notification::Model> {
        let model = notification::ActiveModel {
            id: Set(create_id()),
            notification_type: Set(new_notification.notification_type),
            message: Set(new_notification.message),
            order_id: Set(new_notification.order_id),
            read: Set(false),
            created_at: Set(chrono::Utc::now().naive_utc()),
            read_at: Set(None),
        };
        Ok(model.insert(&self.db).await?)
    }

    async fn list_notifications(
        &self,
        query: NotificationQuery,
    ) -> StoreResult<Vec<notification::Model>> {
        let limit = query.limit.unwrap_or(20).min(100);
        let offset = query.offset.unwrap_or(0);

        let mut select = notification::Entity::find()
            .order_by_desc(notification::Column::CreatedAt)
            .order_by_desc(notification::Column::Id);

        if query.unread_only.unwrap_or(false) {
            select = select.filter(notification::Column::Read.eq(false));
        }

        Ok(select.limit(limit).offset(offset).all(&self.db).await?)
    }

    async fn notifications_for_order(
        &self,
        order_id: &str,
    ) -> StoreResult<Vec<notification::Model>> {
        Ok(notification::Entity::find()
            .filter(notification::Column::OrderId.eq(order_id))
            .all(&self.db)
            .await?)
    }

    async fn notification_counts(&self) -> StoreResult<NotificationCounts> {
        let notifications_count = notification::Entity::find().count(&self.db).await?;
        let unread_count = notification::Entity::find()
            .filter(notification::Column::Read.eq(false))
            .count(&self.db)
            .await?;

        Ok(NotificationCounts {
            notifications_count,
            unread_count,
        })
    }

    async fn mark_read(&self, notification_id: &str) -> StoreResult<notification::Model> {
        let model = notification::Entity::find_by_id(notification_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CommerceError::NotFound(format!("notification {}", notification_id)))?;

        if model.read {
            return Ok(model);
        }

        let mut active: notification::ActiveModel = model.into();
        active.read = Set(true);
        active.read_at = Set(Some(chrono::Utc::now().naive_utc()));
        Ok(active.update(&self.db).await?)
    }

    async fn mark_all_read(&self) -> StoreResult<u64> {
        let result = notification::Entity::update_many()
            .col_expr(
                notification::Column::Read,
                sea_orm::sea_query::Expr::value(true),
            )
            .col_expr(
                notification::Column::ReadAt,
                sea_orm::sea_query::Expr::value(chrono::Utc::now().naive_utc()),
            )
            .filter(notification::Column::Read.eq(false))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
