//! Join-like expansion of an entity's references.
//!
//! Algorithm, per source document and per declared reference:
//! 1. The store's lookup joins the stored value against the target `_id`.
//!    A structured id either matches here or the reference is dangling.
//! 2. If the join found nothing and the stored value is a string, the
//!    reference is retried best-effort: decoded as an id first, then as the
//!    raw string key. First hit wins.
//! 3. Otherwise the expansion is `None`.
//!
//! Results come back as a lazy stream in the store's natural order. Callers
//! collect it fully before answering a request.

use std::sync::Arc;

use bson::{oid::ObjectId, Bson, Document};
use futures_util::{StreamExt, TryStreamExt};
use futures_util::stream::BoxStream;

use crate::db::{DocumentStore, Join, StoreError};
use crate::models::kinds::{EntityKind, ReferenceField};
use crate::models::reference::{lookup_candidates, LookupKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    All,
    One(ObjectId),
}

/// A reference together with whatever it resolved to.
#[derive(Debug, Clone)]
pub struct Expansion {
    pub reference: &'static ReferenceField,
    pub target: Option<Document>,
}

/// A source document with its references expanded.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub kind: EntityKind,
    pub document: Document,
    pub expansions: Vec<Expansion>,
}

impl Resolved {
    /// A document whose references were not (or could not be) resolved.
    pub fn unresolved(kind: EntityKind, document: Document) -> Self {
        let expansions = kind
            .references()
            .iter()
            .map(|reference| Expansion {
                reference,
                target: None,
            })
            .collect();
        Self {
            kind,
            document,
            expansions,
        }
    }

    pub fn id(&self) -> Option<ObjectId> {
        self.document.get_object_id("_id").ok()
    }

    /// The resolved target of the reference stored under `stored`.
    pub fn target(&self, stored: &str) -> Option<&Document> {
        self.expansions
            .iter()
            .find(|e| e.reference.stored == stored)
            .and_then(|e| e.target.as_ref())
    }
}

pub type ResolvedStream = BoxStream<'static, Result<Resolved, StoreError>>;

/// Key under which the store attaches join matches; never a stored attribute.
fn join_alias(reference: &ReferenceField) -> String {
    format!("__joined_{}", reference.stored)
}

/// Streams resolved documents of `kind` within `scope`.
pub async fn resolve(
    store: Arc<dyn DocumentStore>,
    kind: EntityKind,
    scope: Scope,
) -> Result<ResolvedStream, StoreError> {
    let joins: Vec<Join> = kind
        .references()
        .iter()
        .map(|reference| Join {
            from: reference.target.collection(),
            local_field: reference.stored,
            as_field: join_alias(reference),
        })
        .collect();

    let filter = match scope {
        Scope::All => None,
        Scope::One(id) => Some(id),
    };

    let source = store.lookup(kind.collection(), filter, &joins).await?;

    Ok(source
        .and_then(move |document| {
            let store = Arc::clone(&store);
            async move { expand(store.as_ref(), kind, document).await }
        })
        .boxed())
}

/// Collects every resolved document of `kind`.
pub async fn resolve_all(
    store: Arc<dyn DocumentStore>,
    kind: EntityKind,
) -> Result<Vec<Resolved>, StoreError> {
    resolve(store, kind, Scope::All).await?.try_collect().await
}

/// Resolves a single document, `None` if it does not exist.
pub async fn resolve_one(
    store: Arc<dyn DocumentStore>,
    kind: EntityKind,
    id: ObjectId,
) -> Result<Option<Resolved>, StoreError> {
    let mut stream = resolve(store, kind, Scope::One(id)).await?;
    stream.try_next().await
}

/// Tries each key in order against `kind`'s collection.
pub async fn find_first(
    store: &dyn DocumentStore,
    kind: EntityKind,
    candidates: &[LookupKey],
) -> Result<Option<Document>, StoreError> {
    for key in candidates {
        if let Some(found) = store.find_by_key(kind.collection(), &key.to_bson()).await? {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

async fn expand(
    store: &dyn DocumentStore,
    kind: EntityKind,
    mut document: Document,
) -> Result<Resolved, StoreError> {
    let mut expansions = Vec::with_capacity(kind.references().len());

    for reference in kind.references() {
        let joined = take_first_match(&mut document, &join_alias(reference));
        let target = match joined {
            Some(found) => Some(found),
            None => fallback(store, reference, document.get(reference.stored)).await?,
        };
        expansions.push(Expansion { reference, target });
    }

    Ok(Resolved {
        kind,
        document,
        expansions,
    })
}

/// Second stage for string-typed references the join could not match.
async fn fallback(
    store: &dyn DocumentStore,
    reference: &ReferenceField,
    stored: Option<&Bson>,
) -> Result<Option<Document>, StoreError> {
    // A structured id was already tried by the join.
    if !matches!(stored, Some(Bson::String(_))) {
        return Ok(None);
    }
    find_first(store, reference.target, &lookup_candidates(stored)).await
}

fn take_first_match(document: &mut Document, alias: &str) -> Option<Document> {
    match document.remove(alias) {
        Some(Bson::Array(matches)) => matches.into_iter().find_map(|m| match m {
            Bson::Document(found) => Some(found),
            _ => None,
        }),
        _ => None,
    }
}
