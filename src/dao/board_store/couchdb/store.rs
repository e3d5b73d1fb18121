use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Method, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::from_value;

use crate::dao::board_store::BoardStore;
use crate::dao::models::{
    PublicProfileEntity, RelationKind, RelationRecordEntity, UserSettingsEntity,
};
use crate::dao::storage::StorageResult;
use crate::state::board::Board;

use super::{
    config::CouchConfig,
    error::{CouchDaoError, CouchResult},
    models::{
        AllDocsResponse, CouchBoardDocument, CouchProfileDocument, CouchRelationDocument,
        CouchSettingsDocument, END_SUFFIX, PROFILE_PREFIX, board_doc_id, profile_doc_id,
        relation_doc_id, relation_list_prefix, settings_doc_id,
    },
};

/// [`BoardStore`] backed by a CouchDB database over HTTP.
#[derive(Clone)]
pub struct CouchBoardStore {
    client: Client,
    base_url: Arc<str>,
    database: Arc<str>,
    auth: Option<(Arc<str>, Arc<str>)>,
}

impl CouchBoardStore {
    /// Establish a connection to CouchDB and ensure the database exists.
    pub async fn connect(config: CouchConfig) -> CouchResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| CouchDaoError::ClientBuilder { source })?;

        let base_url = Arc::<str>::from(config.base_url.trim_end_matches('/'));
        let database = Arc::<str>::from(config.database);
        let auth = config
            .username
            .zip(config.password)
            .map(|(u, p)| (Arc::<str>::from(u), Arc::<str>::from(p)));

        let store = Self {
            client,
            base_url,
            database,
            auth,
        };

        store.ensure_database().await?;
        Ok(store)
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}/{}", self.base_url, self.database, path);
        let builder = self.client.request(method, url);
        if let Some((ref user, ref pass)) = self.auth {
            builder.basic_auth(user.as_ref(), Some(pass.as_ref()))
        } else {
            builder
        }
    }

    async fn ensure_database(&self) -> CouchResult<()> {
        let database = self.database.to_string();
        let url = format!("{}/{}", self.base_url, self.database);
        let mut builder = self.client.get(&url);
        if let Some((ref user, ref pass)) = self.auth {
            builder = builder.basic_auth(user.as_ref(), Some(pass.as_ref()));
        }

        let response = builder
            .send()
            .await
            .map_err(|source| CouchDaoError::DatabaseQuery {
                database: database.clone(),
                source,
            })?;

        match response.status() {
            StatusCode::OK => Ok(()),
            StatusCode::NOT_FOUND => {
                let mut builder = self.client.put(&url);
                if let Some((ref user, ref pass)) = self.auth {
                    builder = builder.basic_auth(user.as_ref(), Some(pass.as_ref()));
                }
                let create =
                    builder
                        .send()
                        .await
                        .map_err(|source| CouchDaoError::DatabaseCreate {
                            database: database.clone(),
                            source,
                        })?;
                if create.status().is_success() {
                    Ok(())
                } else {
                    Err(CouchDaoError::DatabaseStatus {
                        database,
                        status: create.status(),
                    })
                }
            }
            other => Err(CouchDaoError::DatabaseStatus {
                database,
                status: other,
            }),
        }
    }

    async fn get_document<T>(&self, doc_id: &str) -> CouchResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::GET, doc_id)
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: doc_id.to_string(),
                source,
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                response.json::<T>().await.map(Some).map_err(|source| {
                    CouchDaoError::DecodeResponse {
                        path: doc_id.to_string(),
                        source,
                    }
                })
            }
            other => Err(CouchDaoError::RequestStatus {
                path: doc_id.to_string(),
                status: other,
            }),
        }
    }

    async fn put_document<T>(&self, doc_id: &str, document: &T) -> CouchResult<()>
    where
        T: ?Sized + Serialize,
    {
        let response = self
            .request(Method::PUT, doc_id)
            .json(document)
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: doc_id.to_string(),
                source,
            })?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::CONFLICT => Err(CouchDaoError::RevisionConflict {
                path: doc_id.to_string(),
            }),
            other => Err(CouchDaoError::RequestStatus {
                path: doc_id.to_string(),
                status: other,
            }),
        }
    }

    /// Delete a document by first fetching its current revision. A missing
    /// document is treated as already deleted.
    async fn delete_document(&self, doc_id: &str) -> CouchResult<()> {
        #[derive(serde::Deserialize)]
        struct RevProbe {
            #[serde(rename = "_rev")]
            rev: String,
        }

        let Some(RevProbe { rev }) = self.get_document::<RevProbe>(doc_id).await? else {
            return Ok(());
        };

        let response = self
            .request(Method::DELETE, doc_id)
            .query(&[("rev", rev)])
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: doc_id.to_string(),
                source,
            })?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Ok(()),
            StatusCode::CONFLICT => Err(CouchDaoError::RevisionConflict {
                path: doc_id.to_string(),
            }),
            other => Err(CouchDaoError::RequestStatus {
                path: doc_id.to_string(),
                status: other,
            }),
        }
    }

    async fn list_documents<T>(&self, prefix: &str) -> CouchResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        const ALL_DOCS: &str = "_all_docs";
        let query = [
            ("include_docs", "true".to_string()),
            ("startkey", format!("\"{}\"", prefix)),
            ("endkey", format!("\"{}{}\"", prefix, END_SUFFIX)),
        ];

        let response = self
            .request(Method::GET, ALL_DOCS)
            .query(&query)
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: ALL_DOCS.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(CouchDaoError::RequestStatus {
                path: ALL_DOCS.to_string(),
                status: response.status(),
            });
        }

        let payload = response.json::<AllDocsResponse>().await.map_err(|source| {
            CouchDaoError::DecodeResponse {
                path: ALL_DOCS.to_string(),
                source,
            }
        })?;

        let mut documents = Vec::new();
        for row in payload.rows {
            if let Some(doc) = row.doc {
                let parsed = from_value(doc).map_err(|source| CouchDaoError::DeserializeValue {
                    path: ALL_DOCS.to_string(),
                    source,
                })?;
                documents.push(parsed);
            }
        }

        Ok(documents)
    }
}

impl BoardStore for CouchBoardStore {
    fn load_board(&self, uid: String) -> BoxFuture<'static, StorageResult<Option<Board>>> {
        let store = self.clone();
        Box::pin(async move {
            let doc_id = board_doc_id(&uid);
            let maybe_doc = store.get_document::<CouchBoardDocument>(&doc_id).await?;
            Ok(maybe_doc.map(|doc| doc.board))
        })
    }

    fn save_board(&self, uid: String, board: Board) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let doc_id = board_doc_id(&uid);
            let mut doc = CouchBoardDocument::from_board(&uid, board);
            if let Some(existing) = store.get_document::<CouchBoardDocument>(&doc_id).await? {
                doc.rev = existing.rev;
            }
            store.put_document(&doc_id, &doc).await.map_err(Into::into)
        })
    }

    fn load_settings(
        &self,
        uid: String,
    ) -> BoxFuture<'static, StorageResult<Option<UserSettingsEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let doc_id = settings_doc_id(&uid);
            let maybe_doc = store.get_document::<CouchSettingsDocument>(&doc_id).await?;
            Ok(maybe_doc.map(|doc| doc.settings))
        })
    }

    fn save_settings(
        &self,
        uid: String,
        settings: UserSettingsEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let doc_id = settings_doc_id(&uid);
            let mut doc = CouchSettingsDocument::from_settings(&uid, settings);
            if let Some(existing) = store.get_document::<CouchSettingsDocument>(&doc_id).await? {
                doc.rev = existing.rev;
            }
            store.put_document(&doc_id, &doc).await.map_err(Into::into)
        })
    }

    fn get_public_profile(
        &self,
        uid: String,
    ) -> BoxFuture<'static, StorageResult<Option<PublicProfileEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let doc_id = profile_doc_id(&uid);
            let maybe_doc = store.get_document::<CouchProfileDocument>(&doc_id).await?;
            Ok(maybe_doc.map(|doc| doc.profile))
        })
    }

    fn put_public_profile(
        &self,
        profile: PublicProfileEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let doc_id = profile_doc_id(&profile.uid);
            let mut doc = CouchProfileDocument::from_profile(profile);
            if let Some(existing) = store.get_document::<CouchProfileDocument>(&doc_id).await? {
                doc.rev = existing.rev;
            }
            store.put_document(&doc_id, &doc).await.map_err(Into::into)
        })
    }

    fn delete_public_profile(&self, uid: String) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let doc_id = profile_doc_id(&uid);
            store.delete_document(&doc_id).await.map_err(Into::into)
        })
    }

    fn list_public_profiles(&self) -> BoxFuture<'static, StorageResult<Vec<PublicProfileEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let docs = store
                .list_documents::<CouchProfileDocument>(PROFILE_PREFIX)
                .await?;
            Ok(docs.into_iter().map(|doc| doc.profile).collect())
        })
    }

    fn get_relation(
        &self,
        owner: String,
        kind: RelationKind,
        uid: String,
    ) -> BoxFuture<'static, StorageResult<Option<RelationRecordEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let doc_id = relation_doc_id(&owner, kind, &uid);
            let maybe_doc = store.get_document::<CouchRelationDocument>(&doc_id).await?;
            Ok(maybe_doc.map(|doc| doc.record))
        })
    }

    fn put_relation(
        &self,
        owner: String,
        kind: RelationKind,
        record: RelationRecordEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let doc_id = relation_doc_id(&owner, kind, &record.uid);
            let mut doc = CouchRelationDocument::from_record(&owner, kind, record);
            if let Some(existing) = store.get_document::<CouchRelationDocument>(&doc_id).await? {
                doc.rev = existing.rev;
            }
            store.put_document(&doc_id, &doc).await.map_err(Into::into)
        })
    }

    fn delete_relation(
        &self,
        owner: String,
        kind: RelationKind,
        uid: String,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let doc_id = relation_doc_id(&owner, kind, &uid);
            store.delete_document(&doc_id).await.map_err(Into::into)
        })
    }

    fn list_relations(
        &self,
        owner: String,
        kind: RelationKind,
    ) -> BoxFuture<'static, StorageResult<Vec<RelationRecordEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let prefix = relation_list_prefix(&owner, kind);
            let docs = store
                .list_documents::<CouchRelationDocument>(&prefix)
                .await?;
            Ok(docs.into_iter().map(|doc| doc.record).collect())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let url = format!("{}/{}", store.base_url, store.database);
            let mut builder = store.client.get(&url);
            if let Some((ref user, ref pass)) = store.auth {
                builder = builder.basic_auth(user.as_ref(), Some(pass.as_ref()));
            }

            let response = builder
                .send()
                .await
                .map_err(|source| CouchDaoError::RequestSend {
                    path: url.clone(),
                    source,
                })?;

            if response.status().is_success() {
                Ok(())
            } else {
                Err(CouchDaoError::RequestStatus {
                    path: url,
                    status: response.status(),
                }
                .into())
            }
        })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ensure_database().await.map_err(Into::into) })
    }
}
