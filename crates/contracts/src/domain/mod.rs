pub mod a001_product;
pub mod common;
