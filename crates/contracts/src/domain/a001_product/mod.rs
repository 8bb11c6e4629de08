pub mod aggregate;

pub use aggregate::{Product, ProductFormData, ProductId, REMOTE_ID_PREFIX};
