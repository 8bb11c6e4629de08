use async_trait::async_trait;
use chrono::{DateTime, Utc};
use contracts::domain::a001_product::aggregate::format_timestamp;
use contracts::domain::a001_product::{Product, ProductId};
use contracts::domain::common::Origin;
use gloo_net::http::Request;
use rand::Rng;
use serde::Deserialize;

use crate::shared::api_utils::seed_url;
use crate::shared::config::SeedConfig;
use crate::shared::error::FetchError;

/// Сообщение, которое видит пользователь при неудачной загрузке
pub const SEED_FAILURE_MESSAGE: &str = "Failed to fetch products";

/// Запись удалённого источника (формат `/posts`)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RemotePost {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub body: String,
}

/// Источник начальных данных
#[async_trait(?Send)]
pub trait SeedSource {
    async fn fetch_posts(&self) -> Result<Vec<RemotePost>, FetchError>;
}

/// HTTP-источник: `GET <base_url>/posts?_limit=<limit>`
#[derive(Debug, Clone)]
pub struct HttpSeedSource {
    url: String,
}

impl HttpSeedSource {
    pub fn new(config: &SeedConfig) -> Self {
        Self {
            url: seed_url(&config.base_url, config.limit),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait(?Send)]
impl SeedSource for HttpSeedSource {
    async fn fetch_posts(&self) -> Result<Vec<RemotePost>, FetchError> {
        let response = Request::get(&self.url)
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        if !response.ok() {
            return Err(FetchError::Status(response.status()));
        }

        let data: Vec<RemotePost> = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        Ok(data)
    }
}

/// Преобразовать записи источника в товары каталога
pub fn map_posts(
    posts: Vec<RemotePost>,
    config: &SeedConfig,
    rng: &mut impl Rng,
    now: DateTime<Utc>,
) -> Vec<Product> {
    let created_at = format_timestamp(now);
    posts
        .into_iter()
        .map(|post| Product {
            id: ProductId::remote(post.id),
            title: post.title,
            description: post.body,
            image: format!("https://picsum.photos/300/200?random={}", post.id),
            price: f64::from(rng.gen_range(config.price_min..config.price_max)),
            is_favorite: false,
            created_at: created_at.clone(),
            category: None,
            source: Origin::Api,
        })
        .collect()
}

/// Загрузить начальную партию товаров
pub async fn fetch_products<S>(source: &S, config: &SeedConfig) -> Result<Vec<Product>, FetchError>
where
    S: SeedSource + ?Sized,
{
    let posts = source.fetch_posts().await?;
    log::info!("Seed source returned {} records", posts.len());
    Ok(map_posts(posts, config, &mut rand::thread_rng(), Utc::now()))
}
