use sea_orm::{ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter};
use storefront_types::create_id;

use super::{AdminStore, CustomerStore, DatabaseStore, StoreResult, is_unique_violation};
use crate::entity::{admin_user, customer};
use crate::error::CommerceError;

/// Admin account to insert. The password must already be hashed.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub username: String,
    pub password_hash: String,
    pub permissions: Vec<String>,
    pub is_super_admin: bool,
}

/// Customer account to insert. The password must already be hashed.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub email: String,
    pub name: Option<String>,
    pub password_hash: String,
}

#[async_trait::async_trait]
impl AdminStore for DatabaseStore {
    async fn find_admin(&self, username: &str) -> StoreResult<Option<admin_user::Model>> {
        Ok(admin_user::Entity::find_by_id(username)
            .one(&self.db)
            .await?)
    }

    async fn create_admin(&self, admin: NewAdmin) -> StoreResult<admin_user::Model> {
        let model = admin_user::ActiveModel {
            username: Set(admin.username.clone()),
            password_hash: Set(admin.password_hash),
            permissions: Set(admin.permissions.join(",")),
            is_super_admin: Set(admin.is_super_admin),
            created_at: Set(chrono::Utc::now().naive_utc()),
        };

        model.insert(&self.db).await.map_err(|err| {
            if is_unique_violation(&err) {
                CommerceError::Conflict(format!("admin {} already exists", admin.username))
            } else {
                err.into()
            }
        })
    }
}

#[async_trait::async_trait]
impl CustomerStore for DatabaseStore {
    #[tracing::instrument(name = "CustomerStore::create_customer", skip(self, new_customer))]
    async fn create_customer(&self, new_customer: NewCustomer) -> StoreResult<customer::Model> {
        let email = new_customer.email.trim().to_lowercase();

        let existing = customer::Entity::find()
            .filter(customer::Column::Email.eq(&email))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(CommerceError::Conflict(format!(
                "email {} is already registered",
                email
            )));
        }

        let model = customer::ActiveModel {
            id: Set(create_id()),
            email: Set(email.clone()),
            name: Set(new_customer.name),
            password_hash: Set(new_customer.password_hash),
            created_at: Set(chrono::Utc::now().naive_utc()),
        };

        model.insert(&self.db).await.map_err(|err| {
            if is_unique_violation(&err) {
                CommerceError::Conflict(format!("email {} is already registered", email))
            } else {
                err.into()
            }
        })
    }
}
