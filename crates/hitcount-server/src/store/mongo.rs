//! MongoDB-backed counter store.
//!
//! Documents keep the `{_id, referer, count}` layout of the existing
//! `counts` collection. Increments go through a single
//! `findOneAndUpdate` with `upsert` and `$inc`, so the returned count is the
//! value this call produced.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::error::ErrorKind;
use mongodb::options::{ClientOptions, FindOneAndUpdateOptions, IndexOptions, ReturnDocument};
use mongodb::{Client, Collection, IndexModel};
use serde::{Deserialize, Serialize};

use hitcount_core::error::{HitCountError, Result};
use hitcount_core::CounterRecord;

use super::CounterStore;
use crate::config::StorageSection;

const REFERER_FIELD: &str = "referer";
/// Server codes for a unique-index violation.
const DUPLICATE_KEY_CODES: [i32; 2] = [11000, 11001];

#[derive(Debug, Serialize, Deserialize)]
struct CountDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    referer: String,
    count: i64,
}

impl From<CountDocument> for CounterRecord {
    fn from(d: CountDocument) -> Self {
        CounterRecord {
            id: d.id.to_hex(),
            referrer: d.referer,
            count: d.count,
        }
    }
}

fn referer_filter(referrer: &str) -> Document {
    doc! { REFERER_FIELD: referrer }
}

fn increment_update() -> Document {
    doc! { "$inc": { "count": 1_i64 } }
}

fn upsert_options() -> FindOneAndUpdateOptions {
    FindOneAndUpdateOptions::builder()
        .upsert(true)
        .return_document(ReturnDocument::After)
        .build()
}

/// True when the server refused a write or index build over duplicate keys.
fn is_duplicate_key(e: &mongodb::error::Error) -> bool {
    match e.kind.as_ref() {
        ErrorKind::Command(c) => DUPLICATE_KEY_CODES.contains(&c.code),
        _ => false,
    }
}

fn storage_err(op: &str) -> impl FnOnce(mongodb::error::Error) -> HitCountError + '_ {
    move |e| HitCountError::Storage(format!("{op} failed: {e}"))
}

/// Store over one long-lived driver client; the driver pools connections.
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    counts: Collection<CountDocument>,
}

impl MongoStore {
    pub async fn connect(cfg: &StorageSection) -> Result<Self> {
        let mut opts = ClientOptions::parse(&cfg.uri)
            .await
            .map_err(storage_err("parse uri"))?;
        opts.app_name = Some("hitcount".into());

        let client = Client::with_options(opts).map_err(storage_err("client init"))?;
        let counts = client
            .database(&cfg.database)
            .collection::<CountDocument>(&cfg.collection);

        let store = Self { client, counts };
        if cfg.unique_index {
            store.ensure_unique_index().await?;
        }
        Ok(store)
    }

    /// Without this index two first-time upserts racing on one referrer
    /// can insert two documents.
    ///
    /// Collections written by older deployments may already hold duplicate
    /// referrers; the index cannot be built then and the store runs without it.
    async fn ensure_unique_index(&self) -> Result<()> {
        let index = IndexModel::builder()
            .keys(doc! { REFERER_FIELD: 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        match self.counts.create_index(index, None).await {
            Ok(_) => {
                tracing::debug!(field = REFERER_FIELD, "unique index ensured");
                Ok(())
            }
            Err(e) if is_duplicate_key(&e) => {
                tracing::warn!(
                    field = REFERER_FIELD,
                    error = %e,
                    "duplicate referrers in collection, continuing without unique index"
                );
                Ok(())
            }
            Err(e) => Err(storage_err("create index")(e)),
        }
    }
}

#[async_trait]
impl CounterStore for MongoStore {
    async fn increment(&self, referrer: &str) -> Result<CounterRecord> {
        let updated = self
            .counts
            .find_one_and_update(referer_filter(referrer), increment_update(), upsert_options())
            .await
            .map_err(storage_err("upsert"))?
            .ok_or_else(|| HitCountError::Internal("upsert returned no document".into()))?;

        Ok(updated.into())
    }

    async fn get(&self, referrer: &str) -> Result<Option<CounterRecord>> {
        let found = self
            .counts
            .find_one(referer_filter(referrer), None)
            .await
            .map_err(storage_err("find"))?;
        Ok(found.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<CounterRecord>> {
        let cursor = self
            .counts
            .find(doc! { REFERER_FIELD: { "$ne": null } }, None)
            .await
            .map_err(storage_err("find"))?;
        let docs: Vec<CountDocument> = cursor.try_collect().await.map_err(storage_err("cursor"))?;
        Ok(docs.into_iter().map(Into::into).collect())
    }

    async fn ping(&self) -> Result<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(storage_err("ping"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_maps_to_record_with_hex_id() {
        let id = ObjectId::new();
        let rec: CounterRecord = CountDocument {
            id,
            referer: "https://example.com".into(),
            count: 3,
        }
        .into();

        assert_eq!(rec.id, id.to_hex());
        assert_eq!(rec.referrer, "https://example.com");
        assert_eq!(rec.count, 3);
    }

    #[test]
    fn increment_is_an_exact_match_upsert_of_one() {
        assert_eq!(referer_filter("https://A.test/"), doc! { "referer": "https://A.test/" });
        assert_eq!(increment_update(), doc! { "$inc": { "count": 1_i64 } });

        let opts = upsert_options();
        assert_eq!(opts.upsert, Some(true));
        assert!(matches!(opts.return_document, Some(ReturnDocument::After)));
    }

    fn command_error(code: i32) -> mongodb::error::Error {
        let cmd: mongodb::error::CommandError = mongodb::bson::from_document(doc! {
            "code": code,
            "codeName": "SomeError",
            "errmsg": "E11000 duplicate key error collection: phocks.counts index: referer_1",
        })
        .unwrap();
        ErrorKind::Command(cmd).into()
    }

    #[test]
    fn duplicate_key_index_failures_are_recognised() {
        assert!(is_duplicate_key(&command_error(11000)));
        assert!(is_duplicate_key(&command_error(11001)));
        assert!(!is_duplicate_key(&command_error(13)));
    }

    #[test]
    fn other_index_failures_stay_storage_errors() {
        let e = storage_err("create index")(command_error(13));
        assert_eq!(e.client_code().as_str(), "STORAGE");
        assert!(e.to_string().contains("create index failed"));
    }
}
