// server/src/store/postgres.rs

//! PostgreSQL backend. Each collection is a table of `(id UUID, doc JSONB)`;
//! equality filters become JSONB containment and updates are single statements.

use super::{with_id, Collection, DeleteOutcome, DocumentStore, Filter, InsertOutcome, Sort, Update, UpdateOutcome};
use crate::errors::{AppError, Result};
use crate::models::{Document, ID_FIELD};
use async_trait::async_trait;
use futures_util::TryStreamExt;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

#[derive(Debug, FromRow)]
struct DocumentRow {
  id: Uuid,
  doc: Json<Document>,
}

impl DocumentRow {
  fn into_document(self) -> Document {
    with_id(self.id, self.doc.0)
  }
}

#[derive(Debug, Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  #[instrument(name = "pg_store::connect", skip(url))]
  pub async fn connect(url: &str, max_connections: u32, timeout: Duration) -> Result<Self> {
    let connecting = PgPoolOptions::new()
      .max_connections(max_connections)
      .acquire_timeout(timeout)
      .connect(url);

    let pool = tokio::time::timeout(timeout, connecting)
      .await
      .map_err(|_| AppError::Internal(format!("Timed out after {:?} connecting to the database", timeout)))?
      .map_err(|e| {
        error!(error = %e, "Failed to connect to the database.");
        AppError::Sqlx(e)
      })?;

    Ok(Self { pool })
  }

  pub async fn migrate(&self) -> Result<()> {
    sqlx::migrate!("./migrations").run(&self.pool).await?;
    info!("Database migrations applied.");
    Ok(())
  }
}

fn select_statement(collection: Collection, sort: Option<Sort>, limit_one: bool) -> String {
  let order_by = match sort {
    Some(Sort::NewestFirst) => "(doc ->> 'createdAt')::timestamptz DESC NULLS LAST, created_at DESC",
    None => "created_at ASC, id ASC",
  };
  let limit = if limit_one { " LIMIT 1" } else { "" };
  format!(
    "SELECT id, doc FROM {} WHERE doc @> $1 ORDER BY {}{}",
    collection.name(),
    order_by,
    limit
  )
}

/// `$1` id, `$2` fields to merge, and with a push `$3` array field and `$4` element.
/// The CTE keeps the pre-image so the statement can report whether anything changed.
fn update_statement(collection: Collection, with_push: bool) -> String {
  let table = collection.name();
  let merged = format!("{table}.doc || $2");
  let new_doc = if with_push {
    format!(
      "jsonb_set({merged}, ARRAY[$3::text], COALESCE(({merged}) -> $3::text, '[]'::jsonb) || jsonb_build_array($4::jsonb))"
    )
  } else {
    merged
  };
  format!(
    "WITH target AS (SELECT id, doc FROM {table} WHERE id = $1 FOR UPDATE) \
     UPDATE {table} SET doc = {new_doc} FROM target WHERE {table}.id = target.id \
     RETURNING target.doc IS DISTINCT FROM {table}.doc AS modified"
  )
}

#[async_trait]
impl DocumentStore for PgStore {
  #[instrument(name = "pg_store::insert", skip(self, doc), fields(collection = %collection))]
  async fn insert(&self, collection: Collection, mut doc: Document) -> Result<InsertOutcome> {
    doc.remove(ID_FIELD);
    let id = Uuid::new_v4();
    let sql = format!("INSERT INTO {} (id, doc) VALUES ($1, $2)", collection.name());
    sqlx::query(&sql).bind(id).bind(Json(doc)).execute(&self.pool).await?;
    debug!(%id, "Document inserted.");
    Ok(InsertOutcome {
      acknowledged: true,
      inserted_id: id,
    })
  }

  #[instrument(name = "pg_store::find_one", skip(self), fields(collection = %collection, %id))]
  async fn find_one(&self, collection: Collection, id: Uuid) -> Result<Option<Document>> {
    let sql = format!("SELECT id, doc FROM {} WHERE id = $1", collection.name());
    let row = sqlx::query_as::<_, DocumentRow>(&sql)
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(row.map(DocumentRow::into_document))
  }

  #[instrument(name = "pg_store::find_first", skip(self, filter), fields(collection = %collection))]
  async fn find_first(&self, collection: Collection, filter: &Filter) -> Result<Option<Document>> {
    let sql = select_statement(collection, None, true);
    let row = sqlx::query_as::<_, DocumentRow>(&sql)
      .bind(Json(filter.conditions().clone()))
      .fetch_optional(&self.pool)
      .await?;
    Ok(row.map(DocumentRow::into_document))
  }

  #[instrument(name = "pg_store::find", skip(self, filter), fields(collection = %collection, ?sort))]
  async fn find(&self, collection: Collection, filter: &Filter, sort: Option<Sort>) -> Result<Vec<Document>> {
    let sql = select_statement(collection, sort, false);
    let docs: Vec<Document> = sqlx::query_as::<_, DocumentRow>(&sql)
      .bind(Json(filter.conditions().clone()))
      .fetch(&self.pool)
      .map_ok(DocumentRow::into_document)
      .try_collect()
      .await?;
    debug!(count = docs.len(), "Documents fetched.");
    Ok(docs)
  }

  #[instrument(name = "pg_store::update_one", skip(self, update), fields(collection = %collection, %id))]
  async fn update_one(&self, collection: Collection, id: Uuid, update: &Update) -> Result<UpdateOutcome> {
    let pushed = update.pushed();
    let sql = update_statement(collection, pushed.is_some());
    let mut query = sqlx::query_scalar::<_, bool>(&sql)
      .bind(id)
      .bind(Json(update.fields().clone()));
    if let Some((field, value)) = pushed {
      query = query.bind(field.to_string()).bind(Json(value.clone()));
    }

    let outcome = match query.fetch_optional(&self.pool).await? {
      Some(modified) => UpdateOutcome {
        acknowledged: true,
        matched_count: 1,
        modified_count: u64::from(modified),
      },
      None => {
        debug!("No document matched update.");
        UpdateOutcome {
          acknowledged: true,
          matched_count: 0,
          modified_count: 0,
        }
      }
    };
    Ok(outcome)
  }

  #[instrument(name = "pg_store::delete_one", skip(self), fields(collection = %collection, %id))]
  async fn delete_one(&self, collection: Collection, id: Uuid) -> Result<DeleteOutcome> {
    let sql = format!("DELETE FROM {} WHERE id = $1", collection.name());
    let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
    Ok(DeleteOutcome {
      acknowledged: true,
      deleted_count: result.rows_affected(),
    })
  }

  async fn ping(&self) -> Result<()> {
    sqlx::query("SELECT 1").execute(&self.pool).await?;
    Ok(())
  }

  fn backend_name(&self) -> &'static str {
    "postgres"
  }
}
