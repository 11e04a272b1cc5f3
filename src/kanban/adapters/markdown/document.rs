//! Parser and renderer for kanban-plugin markdown boards.
//!
//! A board document is a sequence of `## <heading>` lanes holding
//! `- [ ] item` lines, framed by front matter and a `%% kanban:settings`
//! block. Lanes whose heading names a [`Pool`] are mapped onto the board;
//! every other line is carried through verbatim.

use crate::kanban::domain::{Board, KanbanDomainError, Pool};

const HEADING_PREFIX: &str = "## ";
const SETTINGS_PREFIX: &str = "%%";
const OPEN_ITEM: &str = "- [ ] ";
const CHECKED_ITEMS: [&str; 3] = ["- [ ] ", "- [x] ", "- [X] "];
const DONE_ITEM: &str = "- [x] ";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Lane {
    heading: String,
    pool: Pool,
    preamble: Vec<String>,
    items: Vec<String>,
}

impl Lane {
    fn empty(pool: Pool) -> Self {
        Self {
            heading: format!("{HEADING_PREFIX}{}", pool.heading()),
            pool,
            preamble: Vec::new(),
            items: Vec::new(),
        }
    }

    fn push_line(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        if let Some(text) = CHECKED_ITEMS
            .iter()
            .find_map(|marker| line.strip_prefix(marker))
        {
            self.items.push(text.trim().to_owned());
            return;
        }
        let is_continuation = line.starts_with(char::is_whitespace);
        match self.items.last_mut() {
            Some(last) if is_continuation => {
                last.push('\n');
                last.push_str(line.trim_end());
            }
            _ => self.preamble.push(line.to_owned()),
        }
    }

    fn render(&self, out: &mut Vec<String>) {
        out.push(self.heading.clone());
        out.push(String::new());
        out.extend(self.preamble.iter().cloned());
        let marker = if self.pool == Pool::Done {
            DONE_ITEM
        } else {
            OPEN_ITEM
        };
        for item in &self.items {
            let mut lines = item.lines();
            if let Some(first) = lines.next() {
                out.push(format!("{marker}{first}"));
            }
            out.extend(lines.map(str::to_owned));
        }
        out.push(String::new());
        out.push(String::new());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Block {
    Verbatim(Vec<String>),
    Lane(Lane),
}

/// Parsed kanban markdown document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KanbanDocument {
    blocks: Vec<Block>,
}

/// Errors raised while interpreting a document as a board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    /// Two lanes carry the same pool heading.
    #[error("duplicate lane for {0}")]
    DuplicateLane(Pool),
    /// Lane contents violate a board invariant.
    #[error(transparent)]
    Board(#[from] KanbanDomainError),
}

impl KanbanDocument {
    /// Parses markdown text.
    #[must_use]
    pub fn parse(contents: &str) -> Self {
        let mut blocks = Vec::new();
        let mut verbatim: Vec<String> = Vec::new();
        let mut lane: Option<Lane> = None;

        for line in contents.lines() {
            if let Some(heading) = line.strip_prefix(HEADING_PREFIX) {
                flush(&mut blocks, &mut verbatim, &mut lane);
                match Pool::try_from(heading) {
                    Ok(pool) => {
                        lane = Some(Lane {
                            heading: line.to_owned(),
                            pool,
                            preamble: Vec::new(),
                            items: Vec::new(),
                        });
                    }
                    Err(_) => verbatim.push(line.to_owned()),
                }
                continue;
            }
            if line.starts_with(SETTINGS_PREFIX) {
                flush(&mut blocks, &mut verbatim, &mut lane);
                verbatim.push(line.to_owned());
                continue;
            }
            match lane.as_mut() {
                Some(current) => current.push_line(line),
                None => verbatim.push(line.to_owned()),
            }
        }
        flush(&mut blocks, &mut verbatim, &mut lane);
        Self { blocks }
    }

    /// Builds the board held by the pool lanes.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`] for duplicate lanes, items that appear in
    /// two lanes, or items repeated inside a lane other than done.
    pub fn to_board(&self) -> Result<Board, DocumentError> {
        let mut seen = Vec::new();
        let mut board = Board::new();
        for lane in self.lanes() {
            if seen.contains(&lane.pool) {
                return Err(DocumentError::DuplicateLane(lane.pool));
            }
            seen.push(lane.pool);
            for item in &lane.items {
                board.insert(item, lane.pool)?;
            }
        }
        Ok(board)
    }

    /// Replaces lane contents with the pools of `board`.
    ///
    /// Pools without a lane get a new lane placed before the settings block.
    pub fn apply(&mut self, board: &Board) {
        for pool in Pool::ALL {
            let items = board.get_tasks_in(pool).to_vec();
            if let Some(lane) = self.lane_mut(pool) {
                lane.items = items;
                continue;
            }
            if items.is_empty() {
                continue;
            }
            let mut lane = Lane::empty(pool);
            lane.items = items;
            let position = self
                .blocks
                .iter()
                .position(is_settings_block)
                .unwrap_or(self.blocks.len());
            self.blocks.insert(position, Block::Lane(lane));
        }
    }

    /// Renders the document back to markdown.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = Vec::new();
        for block in &self.blocks {
            match block {
                Block::Verbatim(lines) => out.extend(lines.iter().cloned()),
                Block::Lane(lane) => lane.render(&mut out),
            }
        }
        let mut text = out.join("\n");
        text.push('\n');
        text
    }

    fn lanes(&self) -> impl Iterator<Item = &Lane> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Lane(lane) => Some(lane),
            Block::Verbatim(_) => None,
        })
    }

    fn lane_mut(&mut self, pool: Pool) -> Option<&mut Lane> {
        self.blocks.iter_mut().find_map(|block| match block {
            Block::Lane(lane) if lane.pool == pool => Some(lane),
            _ => None,
        })
    }
}

fn flush(blocks: &mut Vec<Block>, verbatim: &mut Vec<String>, lane: &mut Option<Lane>) {
    if let Some(current) = lane.take() {
        blocks.push(Block::Lane(current));
    }
    if !verbatim.is_empty() {
        blocks.push(Block::Verbatim(std::mem::take(verbatim)));
    }
}

fn is_settings_block(block: &Block) -> bool {
    matches!(block, Block::Verbatim(lines)
        if lines.first().is_some_and(|line| line.starts_with(SETTINGS_PREFIX)))
}
