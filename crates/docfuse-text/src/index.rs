use std::path::Path;

use anyhow::Result;
use tantivy::collector::TopDocs;
use tantivy::directory::MmapDirectory;
use tantivy::query::QueryParser;
use tantivy::schema::Value;
use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};
use tracing::{debug, warn};

use docfuse_core::traits::TextIndexer;
use docfuse_core::types::{Chunk, Metadata, ScoredDocument};

use crate::tantivy_utils::{build_schema, register_tokenizer, ChunkFields};

const WRITER_MEMORY_BUDGET: usize = 50_000_000;

/// Keyword channel backed by a BM25-ranked tantivy index of chunks.
pub struct TantivyIndex {
	index: Index,
	reader: IndexReader,
	fields: ChunkFields,
}

impl TantivyIndex {
	pub fn in_memory() -> Result<Self> {
		Self::from_index(Index::create_in_ram(build_schema()))
	}

	/// Opens the index stored in `index_dir`, creating it when absent.
	pub fn open_in_dir(index_dir: &Path) -> Result<Self> {
		std::fs::create_dir_all(index_dir)?;
		let directory = MmapDirectory::open(index_dir)?;
		Self::from_index(Index::open_or_create(directory, build_schema())?)
	}

	fn from_index(index: Index) -> Result<Self> {
		register_tokenizer(&index);
		let fields = ChunkFields::from_schema(&index.schema())?;
		let reader = index.reader_builder().reload_policy(ReloadPolicy::Manual).try_into()?;
		Ok(Self { index, reader, fields })
	}

	pub fn num_chunks(&self) -> u64 { self.reader.searcher().num_docs() }

	fn writer(&self) -> Result<IndexWriter> { Ok(self.index.writer(WRITER_MEMORY_BUDGET)?) }

	fn commit(&self, mut writer: IndexWriter) -> Result<()> {
		writer.commit()?;
		self.reader.reload()?;
		Ok(())
	}

	fn to_scored(&self, doc: &TantivyDocument, rank: usize, score: f32) -> ScoredDocument {
		let text_of = |field: tantivy::schema::Field| doc.get_first(field).and_then(|v| v.as_str()).unwrap_or("").to_string();
		let metadata = doc
			.get_first(self.fields.metadata)
			.and_then(|v| v.as_str())
			.and_then(|raw| serde_json::from_str::<Metadata>(raw).ok())
			.unwrap_or_default();
		ScoredDocument { id: text_of(self.fields.id), content: text_of(self.fields.text), metadata, rank, score: Some(score) }
	}
}

impl TextIndexer for TantivyIndex {
	fn index(&self, chunks: &[Chunk]) -> Result<()> {
		let writer = self.writer()?;
		for c in chunks {
			// Re-indexing a chunk id replaces the stored copy.
			writer.delete_term(Term::from_field_text(self.fields.id, &c.id));
			let doc = doc!(
				self.fields.id => c.id.clone(),
				self.fields.document_id => c.document_id.clone(),
				self.fields.text => c.content.clone(),
				self.fields.metadata => serde_json::to_string(&c.metadata)?,
			);
			writer.add_document(doc)?;
		}
		self.commit(writer)?;
		debug!(chunks = chunks.len(), "indexed chunks into tantivy");
		Ok(())
	}

	fn delete_document(&self, document_id: &str) -> Result<()> {
		let writer = self.writer()?;
		writer.delete_term(Term::from_field_text(self.fields.document_id, document_id));
		self.commit(writer)
	}

	fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredDocument>> {
		if k == 0 { return Ok(vec![]); }
		let searcher = self.reader.searcher();
		let qp = QueryParser::for_index(&self.index, vec![self.fields.text]);
		let (q, errors) = qp.parse_query_lenient(query);
		if !errors.is_empty() {
			warn!(query, errors = errors.len(), "query parsed leniently");
		}
		let top_docs = searcher.search(&q, &TopDocs::with_limit(k))?;
		let mut hits = Vec::with_capacity(top_docs.len());
		for (rank, (score, addr)) in top_docs.into_iter().enumerate() {
			let doc: TantivyDocument = searcher.doc(addr)?;
			hits.push(self.to_scored(&doc, rank, score));
		}
		Ok(hits)
	}
}
