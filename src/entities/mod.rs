//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod invoice;
pub mod invoice_item;
pub mod product;
pub mod store;

// Re-export specific types to avoid conflicts
pub use invoice::{
    Column as InvoiceColumn, Entity as Invoice, Model as InvoiceModel, PaymentMethod,
};
pub use invoice_item::{
    Column as InvoiceItemColumn, Entity as InvoiceItem, Model as InvoiceItemModel,
};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use store::{Column as StoreColumn, Entity as Store, Model as StoreModel};
