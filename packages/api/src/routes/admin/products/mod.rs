pub mod bulk_patch;
pub mod create_product;
pub mod delete_product;
pub mod list_products;
pub mod patch_product;
