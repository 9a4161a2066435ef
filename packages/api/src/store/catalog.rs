use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ConnectionTrait, EntityTrait, QueryOrder,
    TransactionTrait,
};
use serde::{Deserialize, Deserializer};
use storefront_types::create_id;
use utoipa::ToSchema;

use super::{CatalogStore, DatabaseStore, StoreResult};
use crate::entity::product;
use crate::error::CommerceError;

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub currency: String,
    #[serde(default)]
    pub stock: i32,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Distinguishes an absent field from an explicit `null`.
fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Partial product update. Absent fields are left untouched.
///
/// `description: null` clears the description, leaving it out keeps it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub price_cents: Option<i64>,
    pub currency: Option<String>,
    pub stock: Option<i32>,
    pub active: Option<bool>,
}

fn validate_currency(currency: &str) -> Result<(), CommerceError> {
    if currency.len() == 3 && currency.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(CommerceError::Validation(format!(
            "invalid currency code: {:?}",
            currency
        )))
    }
}

impl NewProduct {
    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.name.trim().is_empty() {
            return Err(CommerceError::Validation("product name is empty".into()));
        }
        if self.price_cents < 0 {
            return Err(CommerceError::Validation("price must not be negative".into()));
        }
        if self.stock < 0 {
            return Err(CommerceError::Validation("stock must not be negative".into()));
        }
        validate_currency(&self.currency)
    }
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self == &ProductPatch::default()
    }

    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.is_empty() {
            return Err(CommerceError::Validation("patch does not change anything".into()));
        }
        if let Some(name) = &self.name
            && name.trim().is_empty()
        {
            return Err(CommerceError::Validation("product name is empty".into()));
        }
        if let Some(price) = self.price_cents
            && price < 0
        {
            return Err(CommerceError::Validation("price must not be negative".into()));
        }
        if let Some(stock) = self.stock
            && stock < 0
        {
            return Err(CommerceError::Validation("stock must not be negative".into()));
        }
        if let Some(currency) = &self.currency {
            validate_currency(currency)?;
        }
        Ok(())
    }

    fn apply(self, active: &mut product::ActiveModel) {
        if let Some(name) = self.name {
            active.name = Set(name);
        }
        if let Some(description) = self.description {
            active.description = Set(description);
        }
        if let Some(price) = self.price_cents {
            active.price_cents = Set(price);
        }
        if let Some(currency) = self.currency {
            active.currency = Set(currency.to_lowercase());
        }
        if let Some(stock) = self.stock {
            active.stock = Set(stock);
        }
        if let Some(flag) = self.active {
            active.active = Set(flag);
        }
        active.updated_at = Set(chrono::Utc::now().naive_utc());
    }
}

async fn patch_one<C: ConnectionTrait>(
    conn: &C,
    product_id: &str,
    patch: ProductPatch,
) -> StoreResult<product::Model> {
    let model = product::Entity::find_by_id(product_id)
        .one(conn)
        .await?
        .ok_or_else(|| CommerceError::NotFound(format!("product {}", product_id)))?;

    let mut active: product::ActiveModel = model.into();
    patch.apply(&mut active);
    Ok(active.update(conn).await?)
}

#[async_trait::async_trait]
impl CatalogStore for DatabaseStore {
    async fn list_products(&self) -> StoreResult<Vec<product::Model>> {
        Ok(product::Entity::find()
            .order_by_asc(product::Column::Name)
            .all(&self.db)
            .await?)
    }

    async fn get_product(&self, product_id: &str) -> StoreResult<product::Model> {
        product::Entity::find_by_id(product_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CommerceError::NotFound(format!("product {}", product_id)))
    }

    async fn create_product(&self, new_product: NewProduct) -> StoreResult<product::Model> {
        new_product.validate()?;
        let now = chrono::Utc::now().naive_utc();
        let model = product::ActiveModel {
            id: Set(create_id()),
            name: Set(new_product.name.trim().to_string()),
            description: Set(new_product.description),
            price_cents: Set(new_product.price_cents),
            currency: Set(new_product.currency.to_lowercase()),
            stock: Set(new_product.stock),
            active: Set(new_product.active),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(model.insert(&self.db).await?)
    }

    async fn patch_product(
        &self,
        product_id: &str,
        patch: ProductPatch,
    ) -> StoreResult<product::Model> {
        patch.validate()?;
        patch_one(&self.db, product_id, patch).await
    }

    #[tracing::instrument(name = "CatalogStore::bulk_patch_products", skip_all, fields(count = patches.len()))]
    async fn bulk_patch_products(
        &self,
        patches: Vec<(String, ProductPatch)>,
    ) -> StoreResult<Vec<product::Model>> {
        for (_, patch) in &patches {
            patch.validate()?;
        }

        let txn = self.db.begin().await?;
        let mut updated = Vec::with_capacity(patches.len());
        for (product_id, patch) in patches {
            // Dropping the transaction on error rolls back earlier patches.
            updated.push(patch_one(&txn, &product_id, patch).await?);
        }
        txn.commit().await?;

        Ok(updated)
    }

    async fn delete_product(&self, product_id: &str) -> StoreResult<()> {
        let result = product::Entity::delete_by_id(product_id)
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(CommerceError::NotFound(format!("product {}", product_id)));
        }
        Ok(())
    }
}
