//! LanceDB-backed similarity backend: one table per collection under `db_dir`.
use async_trait::async_trait;
use futures::TryStreamExt;
use lancedb::{connect, Connection, DistanceType, Table};
use lancedb::query::{ExecutableQuery, QueryBase};
use arrow_array::{Array, RecordBatch, RecordBatchIterator, Int32Array, FixedSizeListArray, Float32Array, StringArray};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use docseek_core::traits::{Embedder, SimilarityBackend};
use docseek_core::types::{ChunkRecord, Neighbor};
use docseek_core::{Error, Result};

use crate::schema::build_chunk_schema;
use super::embed_blocking;

pub struct LanceBackend { db: Connection, embedder: Arc<dyn Embedder> }

impl LanceBackend {
	pub async fn open(db_path: &Path, embedder: Arc<dyn Embedder>) -> Result<Self> {
		std::fs::create_dir_all(db_path)?;
		let db = connect(db_path.to_string_lossy().as_ref()).execute().await.map_err(Error::index_unavailable)?;
		debug!(path = %db_path.display(), "lancedb connected");
		Ok(Self { db, embedder })
	}

	async fn has_table(&self, name: &str) -> Result<bool> {
		let names = self.db.table_names().execute().await.map_err(Error::index_unavailable)?;
		Ok(names.iter().any(|n| n == name))
	}

	async fn open_table(&self, name: &str) -> Result<Table> {
		self.db.open_table(name).execute().await.map_err(Error::index_unavailable)
	}

	fn records_to_batch(&self, records: &[ChunkRecord], vectors: Vec<Vec<f32>>) -> Result<RecordBatch> {
		let dim = self.embedder.dim() as i32;
		let mut ids = Vec::new(); let mut doc_paths = Vec::new(); let mut chunk_indices = Vec::new(); let mut contents = Vec::new(); let mut vecs: Vec<Option<Vec<Option<f32>>>> = Vec::new();
		for (rec, v) in records.iter().zip(vectors) {
			if v.len() != dim as usize { return Err(Error::IndexUnavailable(format!("dim mismatch: got {} expected {}", v.len(), dim))); }
			ids.push(rec.id.clone()); doc_paths.push(rec.doc_path.clone()); chunk_indices.push(rec.chunk_index as i32); contents.push(rec.content.clone());
			vecs.push(Some(v.into_iter().map(Some).collect()));
		}
		RecordBatch::try_new(build_chunk_schema(dim), vec![
			Arc::new(StringArray::from(ids)),
			Arc::new(StringArray::from(doc_paths)),
			Arc::new(Int32Array::from(chunk_indices)),
			Arc::new(StringArray::from(contents)),
			Arc::new(FixedSizeListArray::from_iter_primitive::<arrow_array::types::Float32Type, _, _>(vecs.into_iter(), dim)),
		]).map_err(Error::index_unavailable)
	}
}

#[async_trait]
impl SimilarityBackend for LanceBackend {
	async fn upsert(&self, collection: &str, records: &[ChunkRecord]) -> Result<()> {
		let texts: Vec<String> = records.iter().map(|r| r.content.clone()).collect();
		let vectors = embed_blocking(&self.embedder, texts).await?;
		let batch = self.records_to_batch(records, vectors)?;
		let schema = batch.schema();
		let reader = Box::new(RecordBatchIterator::new(vec![Ok(batch)].into_iter(), schema));
		if self.has_table(collection).await? {
			let table = self.open_table(collection).await?;
			let mut mi = table.merge_insert(&["id"]);
			mi.when_matched_update_all(None).when_not_matched_insert_all();
			mi.execute(reader).await.map_err(Error::index_unavailable)?;
			table.delete(&format!("chunk_index >= {}", records.len())).await.map_err(Error::index_unavailable)?;
		} else {
			self.db.create_table(collection, reader).execute().await.map_err(Error::index_unavailable)?;
		}
		debug!(collection, rows = records.len(), "lance upsert");
		Ok(())
	}

	async fn nearest(&self, collection: &str, query: &str, n: usize) -> Result<Vec<Neighbor>> {
		if !self.has_table(collection).await? { return Err(Error::IndexUnavailable(format!("no such collection: {collection}"))); }
		let table = self.open_table(collection).await?;
		let q = embed_blocking(&self.embedder, vec![query.to_string()]).await?.into_iter().next()
			.ok_or_else(|| Error::IndexUnavailable("embedder returned no vector".into()))?;
		// A zero vector has no direction: every chunk sits at cosine distance 1.
		let directionless = q.iter().all(|x| *x == 0.0);
		let mut stream = if directionless {
			debug!(collection, "query embeds to a zero vector");
			table.query().limit(n).execute().await.map_err(Error::index_unavailable)?
		} else {
			table.vector_search(q).map_err(Error::index_unavailable)?
				.distance_type(DistanceType::Cosine).limit(n)
				.execute().await.map_err(Error::index_unavailable)?
		};
		let mut hits = Vec::new();
		while let Some(batch) = stream.try_next().await.map_err(Error::index_unavailable)? {
			let content = batch.column_by_name("content").and_then(|c| c.as_any().downcast_ref::<StringArray>())
				.ok_or_else(|| Error::IndexUnavailable("missing content column".into()))?;
			let distance = if directionless { None } else {
				Some(batch.column_by_name("_distance").and_then(|c| c.as_any().downcast_ref::<Float32Array>())
					.ok_or_else(|| Error::IndexUnavailable("missing _distance column".into()))?)
			};
			for i in 0..batch.num_rows() {
				let d = match distance {
					None => 1.0,
					Some(col) if col.is_valid(i) => { let v = col.value(i); if v.is_nan() { 1.0 } else { v } }
					Some(_) => f32::INFINITY,
				};
				hits.push(Neighbor { content: content.value(i).to_string(), distance: d });
			}
		}
		hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
		hits.truncate(n);
		Ok(hits)
	}
}
