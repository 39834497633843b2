//! Client for the hosted data store's row-level REST interface.
//!
//! Filtering on the server is limited to equality and ordering
//! (`column=eq.value`, `order=column.desc`); everything richer happens in
//! `pipeline`. Calls are made once, never retried: a failure becomes
//! `AppError::Remote` and the UI shows its generic message.

use crate::blog::BlogPost;
use crate::coach::{normalize_records, Coach, CoachId};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::messages::{Message, NewMessage};
use crate::reviews::{NewReview, Review};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct StoreClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl StoreClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.backend_url, &config.backend_anon_key)
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn request(&self, method: reqwest::Method, table: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.table_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> AppResult<Vec<T>> {
        let response = self
            .request(reqwest::Method::GET, table)
            .query(&[("select", "*")])
            .query(query)
            .send()
            .await?;

        let response = ensure_success(response, table).await?;
        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| AppError::Remote(format!("Failed to parse {} rows: {}", table, e)))
    }

    async fn insert<B: Serialize, T: DeserializeOwned>(
        &self,
        table: &str,
        body: &B,
        prefer: &str,
        query: &[(&str, &str)],
    ) -> AppResult<T> {
        let response = self
            .request(reqwest::Method::POST, table)
            .header("Prefer", prefer)
            .query(query)
            .json(body)
            .send()
            .await?;

        let response = ensure_success(response, table).await?;
        let mut rows: Vec<T> = response
            .json()
            .await
            .map_err(|e| AppError::Remote(format!("Failed to parse {} insert: {}", table, e)))?;

        if rows.is_empty() {
            return Err(AppError::Remote(format!("{} insert returned no row", table)));
        }
        Ok(rows.swap_remove(0))
    }

    // ==================== Coaches ====================

    /// All coaches, newest first, normalized at this boundary.
    pub async fn fetch_coaches(&self) -> AppResult<Vec<Coach>> {
        let rows: Vec<serde_json::Value> = self
            .select("coaches", &[("order", "created_at.desc".to_string())])
            .await?;
        let coaches = normalize_records(rows);
        info!("Fetched {} coaches", coaches.len());
        Ok(coaches)
    }

    pub async fn fetch_coach(&self, id: &CoachId) -> AppResult<Option<Coach>> {
        let rows: Vec<serde_json::Value> = self
            .select("coaches", &[("id", format!("eq.{}", id)), ("limit", "1".to_string())])
            .await?;
        Ok(normalize_records(rows).into_iter().next())
    }

    // ==================== Reviews ====================

    pub async fn fetch_reviews(&self, coach_id: &CoachId) -> AppResult<Vec<Review>> {
        self.select(
            "reviews",
            &[
                ("coach_id", format!("eq.{}", coach_id)),
                ("order", "created_at.desc".to_string()),
            ],
        )
        .await
    }

    /// Validates before sending; invalid input never reaches the network.
    pub async fn insert_review(&self, review: &NewReview) -> AppResult<Review> {
        review.validate()?;
        let created: Review = self
            .insert("reviews", review, "return=representation", &[])
            .await?;
        info!("Review saved for coach {}", review.coach_id);
        Ok(created)
    }

    // ==================== Messages ====================

    /// Messages in a conversation at or after `since`, oldest first.
    pub async fn fetch_messages_since(
        &self,
        conversation_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<Message>> {
        let mut query = vec![
            ("conversation_id", format!("eq.{}", conversation_id)),
            ("order", "created_at.asc".to_string()),
        ];
        if let Some(since) = since {
            query.push((
                "created_at",
                format!("gte.{}", since.to_rfc3339_opts(SecondsFormat::Micros, true)),
            ));
        }

        let messages: Vec<Message> = self.select("messages", &query).await?;
        debug!(
            "Fetched {} messages for conversation {}",
            messages.len(),
            conversation_id
        );
        Ok(messages)
    }

    pub async fn send_message(&self, message: &NewMessage) -> AppResult<Message> {
        message.validate()?;
        self.insert("messages", message, "return=representation", &[])
            .await
    }

    // ==================== Blog ====================

    pub async fn fetch_published_posts(&self) -> AppResult<Vec<BlogPost>> {
        self.select(
            "blog_posts",
            &[
                ("published", "eq.true".to_string()),
                ("order", "published_at.desc".to_string()),
            ],
        )
        .await
    }

    pub async fn fetch_post_by_slug(&self, slug: &str) -> AppResult<Option<BlogPost>> {
        let posts: Vec<BlogPost> = self
            .select(
                "blog_posts",
                &[
                    ("slug", format!("eq.{}", slug)),
                    ("published", "eq.true".to_string()),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        Ok(posts.into_iter().next())
    }

    /// Insert or update by slug (admin editor save).
    pub async fn upsert_post(&self, post: &BlogPost) -> AppResult<BlogPost> {
        let saved: BlogPost = self
            .insert(
                "blog_posts",
                post,
                "resolution=merge-duplicates,return=representation",
                &[("on_conflict", "slug")],
            )
            .await?;
        info!("Blog post '{}' saved", saved.slug);
        Ok(saved)
    }
}

async fn ensure_success(response: reqwest::Response, table: &str) -> AppResult<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    warn!("Store request on '{}' failed ({}): {}", table, status, body);
    Err(AppError::Remote(format!("{} ({}): {}", table, status, body)))
}
