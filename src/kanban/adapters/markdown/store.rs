//! Markdown-backed [`BoardStore`] implementation.

use super::document::KanbanDocument;
use crate::kanban::{
    domain::Board,
    ports::{BoardRevision, BoardSnapshot, BoardStore, BoardStoreError, BoardStoreResult},
};
use crate::storage::{DocumentPath, fingerprint, run_blocking_with};
use async_trait::async_trait;
use camino::Utf8Path;
use std::io;

const NEW_DOCUMENT: &str = "---\n\nkanban-plugin: basic\n\n---\n\n";
const ABSENT_REVISION: &str = "absent";

/// Board store reading and writing a single markdown note.
///
/// The revision is the SHA-256 of the note contents. A missing note loads
/// as an empty board and is created on first persist.
#[derive(Debug, Clone)]
pub struct MarkdownBoardStore {
    document: DocumentPath,
}

impl MarkdownBoardStore {
    /// Creates a store for the note at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::Persistence`] when `path` has no file name.
    pub fn new(path: &Utf8Path) -> BoardStoreResult<Self> {
        let document = DocumentPath::new(path).map_err(BoardStoreError::persistence)?;
        Ok(Self { document })
    }

    /// Returns the note path.
    #[must_use]
    pub fn path(&self) -> camino::Utf8PathBuf {
        self.document.path()
    }
}

fn read_existing(document: &DocumentPath) -> BoardStoreResult<Option<String>> {
    match document.read() {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(BoardStoreError::persistence(err)),
    }
}

fn revision_of(contents: Option<&str>) -> BoardRevision {
    contents.map_or_else(
        || BoardRevision::new(ABSENT_REVISION),
        |text| BoardRevision::new(fingerprint(text)),
    )
}

fn join_error(err: tokio::task::JoinError) -> BoardStoreError {
    BoardStoreError::persistence(io::Error::other(err.to_string()))
}

fn load_blocking(document: &DocumentPath) -> BoardStoreResult<BoardSnapshot> {
    let contents = read_existing(document)?;
    let revision = revision_of(contents.as_deref());
    let board = match contents {
        Some(text) => KanbanDocument::parse(&text)
            .to_board()
            .map_err(|err| BoardStoreError::Format(err.to_string()))?,
        None => Board::new(),
    };
    Ok(BoardSnapshot { board, revision })
}

fn persist_blocking(
    document: &DocumentPath,
    board: &Board,
    expected: &BoardRevision,
) -> BoardStoreResult<BoardRevision> {
    let current = read_existing(document)?;
    let found = revision_of(current.as_deref());
    if &found != expected {
        return Err(BoardStoreError::Conflict {
            expected: expected.clone(),
            found,
        });
    }
    let mut parsed = KanbanDocument::parse(current.as_deref().unwrap_or(NEW_DOCUMENT));
    parsed.apply(board);
    let rendered = parsed.render();
    document
        .write(&rendered)
        .map_err(BoardStoreError::persistence)?;
    Ok(BoardRevision::new(fingerprint(&rendered)))
}

#[async_trait]
impl BoardStore for MarkdownBoardStore {
    async fn load(&self) -> BoardStoreResult<BoardSnapshot> {
        let document = self.document.clone();
        run_blocking_with(move || load_blocking(&document), join_error).await
    }

    async fn persist(
        &self,
        board: &Board,
        expected: &BoardRevision,
    ) -> BoardStoreResult<BoardRevision> {
        let document = self.document.clone();
        let board = board.clone();
        let expected = expected.clone();
        run_blocking_with(
            move || persist_blocking(&document, &board, &expected),
            join_error,
        )
        .await
    }
}
