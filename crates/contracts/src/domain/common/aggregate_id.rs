use serde::{de::DeserializeOwned, Serialize};
use std::hash::Hash;

/// Трейт для типов идентификаторов агрегатов
pub trait AggregateId:
    Clone + PartialEq + Eq + Hash + Serialize + DeserializeOwned + std::fmt::Debug
{
    /// Преобразовать ID в строку
    fn as_string(&self) -> String;

    /// Создать ID из строки
    fn from_string(s: &str) -> Result<Self, String>;
}

