//! Общие типы каталога: агрегат товара, настройки представления
//! и чистая функция, превращающая их в отображаемую страницу.

pub mod domain;
pub mod projections;
