//! [`AnnotationStore`] backed by JSON canvas documents.
//!
//! Each repository key maps to one `.canvas` file. Unknown node and edge
//! fields are preserved when the document is written back.

use crate::lifecycle::{
    domain::{CardColour, Marker},
    ports::{AnnotationError, AnnotationResult, AnnotationStore},
};
use crate::storage::{DocumentPath, run_blocking_with};
use async_trait::async_trait;
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

const NODE_WIDTH: i64 = 250;
const NODE_HEIGHT: i64 = 60;
const NODE_GAP: i64 = 40;
const NODE_ID_LEN: usize = 16;

/// Canvas-backed annotation store.
#[derive(Debug, Clone, Default)]
pub struct CanvasAnnotationStore {
    canvases: BTreeMap<String, Utf8PathBuf>,
}

impl CanvasAnnotationStore {
    /// Creates a store over a repository to canvas path table.
    #[must_use]
    pub const fn new(canvases: BTreeMap<String, Utf8PathBuf>) -> Self {
        Self { canvases }
    }

    fn document(&self, repository: &str) -> AnnotationResult<DocumentPath> {
        let path = self
            .canvases
            .get(repository)
            .ok_or_else(|| AnnotationError::UnknownRepository(repository.to_owned()))?;
        DocumentPath::new(path).map_err(AnnotationError::persistence)
    }
}

/// In-memory view of a JSON canvas document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    #[serde(default)]
    nodes: Vec<Map<String, Value>>,
    #[serde(default)]
    edges: Vec<Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Canvas {
    /// Parses canvas JSON.
    ///
    /// # Errors
    ///
    /// Returns [`AnnotationError::Format`] when the text is not a canvas.
    pub fn parse(text: &str) -> AnnotationResult<Self> {
        serde_json::from_str(text).map_err(|err| AnnotationError::Format(err.to_string()))
    }

    /// Serialises the canvas with tab indentation like the editor does.
    ///
    /// # Errors
    ///
    /// Returns [`AnnotationError::Format`] when serialisation fails.
    pub fn render(&self) -> AnnotationResult<String> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut serializer)
            .map_err(|err| AnnotationError::Format(err.to_string()))?;
        String::from_utf8(out).map_err(|err| AnnotationError::Format(err.to_string()))
    }

    /// Returns the text of every text node, in document order.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter_map(|node| node.get("text").and_then(Value::as_str))
            .collect()
    }

    /// Returns the colour of the first node whose text mentions `needle`.
    #[must_use]
    pub fn colour_of(&self, needle: &str) -> Option<&str> {
        self.nodes
            .iter()
            .find(|node| node_mentions(node, needle))
            .and_then(|node| node.get("color"))
            .and_then(Value::as_str)
    }

    /// Colours the first node mentioning `title`, appending `note` if given.
    ///
    /// Returns `false` when no node matches.
    pub fn mark(&mut self, title: &str, colour: CardColour, note: Option<&str>) -> bool {
        let Some(node) = self.nodes.iter_mut().find(|node| node_mentions(node, title)) else {
            return false;
        };
        node.insert("color".to_owned(), Value::String(colour.to_string()));
        if let Some(extra) = note {
            let text = node
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or_default();
            let appended = format!("{text}\n{extra}");
            node.insert("text".to_owned(), Value::String(appended));
        }
        true
    }

    /// Appends a text node below the existing ones.
    pub fn add_node(&mut self, text: &str, colour: CardColour) {
        let bottom = self
            .nodes
            .iter()
            .filter_map(|node| {
                let y = node.get("y").and_then(Value::as_i64)?;
                let height = node.get("height").and_then(Value::as_i64).unwrap_or(0);
                Some(y.saturating_add(height))
            })
            .max();
        let y = bottom.map_or(0, |edge| edge.saturating_add(NODE_GAP));
        let node = json!({
            "id": node_id(),
            "type": "text",
            "text": text,
            "x": 0,
            "y": y,
            "width": NODE_WIDTH,
            "height": NODE_HEIGHT,
            "color": colour.to_string(),
        });
        if let Value::Object(fields) = node {
            self.nodes.push(fields);
        }
    }
}

fn node_mentions(node: &Map<String, Value>, needle: &str) -> bool {
    node.get("text")
        .and_then(Value::as_str)
        .is_some_and(|text| text.contains(needle))
}

fn node_id() -> String {
    uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(NODE_ID_LEN)
        .collect()
}

fn join_error(err: tokio::task::JoinError) -> AnnotationError {
    AnnotationError::persistence(std::io::Error::other(err.to_string()))
}

fn update_canvas<F>(document: &DocumentPath, edit: F) -> AnnotationResult<()>
where
    F: FnOnce(&mut Canvas) -> AnnotationResult<()>,
{
    let text = document.read().map_err(AnnotationError::persistence)?;
    let mut canvas = Canvas::parse(&text)?;
    edit(&mut canvas)?;
    document
        .write(&canvas.render()?)
        .map_err(AnnotationError::persistence)
}

#[async_trait]
impl AnnotationStore for CanvasAnnotationStore {
    async fn annotate(
        &self,
        repository: &str,
        title: &str,
        marker: Marker,
        note: Option<&str>,
    ) -> AnnotationResult<()> {
        let document = self.document(repository)?;
        let repository_key = repository.to_owned();
        let title_text = title.to_owned();
        let note_text = note.map(str::to_owned);
        run_blocking_with(
            move || {
                update_canvas(&document, |canvas| {
                    if canvas.mark(&title_text, marker.colour(), note_text.as_deref()) {
                        Ok(())
                    } else {
                        Err(AnnotationError::TitleNotFound {
                            repository: repository_key,
                            title: title_text.clone(),
                        })
                    }
                })
            },
            join_error,
        )
        .await?;
        tracing::info!(repository, title, %marker, "canvas card annotated");
        Ok(())
    }

    async fn add_card(
        &self,
        repository: &str,
        text: &str,
        colour: CardColour,
    ) -> AnnotationResult<()> {
        let document = self.document(repository)?;
        let card = text.to_owned();
        run_blocking_with(
            move || {
                update_canvas(&document, |canvas| {
                    canvas.add_node(&card, colour);
                    Ok(())
                })
            },
            join_error,
        )
        .await?;
        tracing::info!(repository, %colour, "canvas card added");
        Ok(())
    }
}
