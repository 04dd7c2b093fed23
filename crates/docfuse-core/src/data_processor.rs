//! Plain-text extraction and directory ingestion.
//!
//! `TextProcessor` covers the text-like formats. Binary formats plug in as
//! further `DocumentProcessor`s on a `ProcessorRegistry`; the first processor
//! that accepts a path wins.
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::chunker::DocumentChunker;
use crate::error::{Error, Result};
use crate::split::TextSplitter;
use crate::traits::{DocumentProcessor, Splitter};
use crate::types::{Chunk, Document, Metadata};

const TEXT_EXTENSIONS: &[&str] = &["txt", "md", "csv", "json", "xml", "html"];

#[derive(Debug, Default, Clone, Copy)]
pub struct TextProcessor;

impl TextProcessor {
    fn read_file_content(&self, bytes: Vec<u8>) -> String {
        match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        }
    }

    fn file_metadata(&self, path: &Path, file_size: usize) -> Metadata {
        let mut meta = Metadata::new();
        let filename = path.file_name().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
        let extension = path.extension().map(|s| format!(".{}", s.to_string_lossy())).unwrap_or_default();
        meta.insert("filename".into(), Value::from(filename));
        meta.insert("file_extension".into(), Value::from(extension));
        meta.insert("file_size".into(), Value::from(file_size));
        meta
    }
}

impl DocumentProcessor for TextProcessor {
    fn can_process(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| TEXT_EXTENSIONS.iter().any(|known| known.eq_ignore_ascii_case(ext)))
    }

    fn process(&self, path: &Path, metadata: &Metadata) -> Result<Document> {
        let bytes = fs::read(path)?;
        let id = document_id_for(&bytes);
        let mut meta = self.file_metadata(path, bytes.len());
        meta.extend(metadata.iter().map(|(k, v)| (k.clone(), v.clone())));

        let content = self.read_file_content(bytes);
        meta.insert("total_lines".into(), Value::from(content.split('\n').count()));
        meta.insert("total_words".into(), Value::from(content.split_whitespace().count()));
        meta.insert("total_characters".into(), Value::from(content.chars().count()));
        meta.insert("document_type".into(), Value::from("text"));

        Ok(Document { id, content, metadata: meta, source_file: Some(path.to_string_lossy().to_string()) })
    }
}

/// Content-addressed id: `doc_` plus the first 16 hex digits of the blake3 hash.
pub fn document_id_for(bytes: &[u8]) -> String {
    let hash = blake3::hash(bytes).to_hex();
    format!("doc_{}", &hash[..16])
}

/// Ordered list of processors, first match wins.
pub struct ProcessorRegistry {
    processors: Vec<Box<dyn DocumentProcessor>>,
}

impl ProcessorRegistry {
    pub fn new() -> Self { Self { processors: Vec::new() } }

    pub fn with_processor(mut self, processor: impl DocumentProcessor + 'static) -> Self {
        self.processors.push(Box::new(processor));
        self
    }

    pub fn get_processor(&self, path: &Path) -> Option<&dyn DocumentProcessor> {
        self.processors.iter().find(|p| p.can_process(path)).map(|p| &**p)
    }

    pub fn can_process(&self, path: &Path) -> bool { self.get_processor(path).is_some() }

    pub fn process(&self, path: &Path, metadata: &Metadata) -> Result<Document> {
        let processor = self.get_processor(path).ok_or_else(|| {
            let ext = path.extension().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
            Error::UnsupportedFileType(format!(".{ext}"))
        })?;
        processor.process(path, metadata)
    }
}

impl Default for ProcessorRegistry {
    fn default() -> Self { Self::new().with_processor(TextProcessor) }
}

/// Walks a directory, extracts every supported file and chunks the result.
pub struct DataProcessor<S = TextSplitter> {
    registry: ProcessorRegistry,
    chunker: DocumentChunker<S>,
}

impl Default for DataProcessor<TextSplitter> {
    fn default() -> Self { Self::new(ProcessorRegistry::default(), DocumentChunker::new(TextSplitter::default())) }
}

impl<S: Splitter> DataProcessor<S> {
    pub fn new(registry: ProcessorRegistry, chunker: DocumentChunker<S>) -> Self { Self { registry, chunker } }

    pub fn chunker(&self) -> &DocumentChunker<S> { &self.chunker }

    pub fn load_directory(&self, data_dir: &Path) -> Result<Vec<Document>> {
        self.load_directory_limited(data_dir, usize::MAX)
    }

    /// Loads at most `limit` supported files. Files that fail to load are
    /// logged and skipped.
    pub fn load_directory_limited(&self, data_dir: &Path, limit: usize) -> Result<Vec<Document>> {
        if !data_dir.is_dir() {
            return Err(Error::NotFound(format!("not a directory: {}", data_dir.display())));
        }
        let mut files = self.list_supported_files(data_dir);
        if files.is_empty() {
            info!(dir = %data_dir.display(), "no supported files found");
            return Ok(vec![]);
        }
        if files.len() > limit {
            files.truncate(limit);
            info!(limit, "limited to first files");
        }
        let mut documents = Vec::with_capacity(files.len());
        for (file_index, file_path) in files.iter().enumerate() {
            debug!(file = %file_path.display(), "processing file {}/{}", file_index + 1, files.len());
            let metadata = self.facet_metadata(file_path, data_dir);
            match self.registry.process(file_path, &metadata) {
                Ok(doc) => documents.push(doc),
                Err(e) => warn!(file = %file_path.display(), error = %e, "skipping file"),
            }
        }
        Ok(documents)
    }

    pub fn process_directory(&self, data_dir: &Path) -> Result<Vec<Chunk>> {
        self.process_directory_limited(data_dir, usize::MAX)
    }

    pub fn process_directory_limited(&self, data_dir: &Path, limit: usize) -> Result<Vec<Chunk>> {
        let documents = self.load_directory_limited(data_dir, limit)?;
        let chunks: Vec<Chunk> = documents.iter().flat_map(|doc| self.chunker.chunk(doc)).collect();
        info!(files = documents.len(), chunks = chunks.len(), "processed directory");
        Ok(chunks)
    }

    /// Relative parent directory as a `category`, `misc` at the root.
    fn facet_metadata(&self, file_path: &Path, data_dir: &Path) -> Metadata {
        let relative_path = file_path.strip_prefix(data_dir).unwrap_or(file_path);
        let category = relative_path
            .parent()
            .and_then(|p| p.to_str())
            .filter(|p| !p.is_empty())
            .unwrap_or("misc")
            .to_string();
        let mut meta = Metadata::new();
        meta.insert("category".into(), Value::from(category));
        meta
    }

    fn list_supported_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && self.registry.can_process(e.path()))
            .map(|e| e.path().to_path_buf())
            .collect();
        files.sort();
        files
    }
}
