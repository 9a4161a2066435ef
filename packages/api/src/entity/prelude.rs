pub use super::admin_user::Entity as AdminUser;
pub use super::customer::Entity as Customer;
pub use super::notification::Entity as Notification;
pub use super::order::Entity as Order;
pub use super::order_item::Entity as OrderItem;
pub use super::product::Entity as Product;
