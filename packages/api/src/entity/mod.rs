pub mod prelude;

pub mod admin_user;
pub mod customer;
pub mod notification;
pub mod order;
pub mod order_item;
pub mod product;
pub mod sea_orm_active_enums;
