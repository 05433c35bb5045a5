use serde::{Deserialize, Serialize};

/// Display budget for one chunk, counted over the chunk's lines without the
/// newlines that join them.
pub const MAX_CHUNK_LENGTH: usize = 150;

/// One delivered piece of a response plus whatever the client still has to
/// ask for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkedResponse {
    pub chunk: String,
    pub has_more: bool,
    pub remaining_chunks: Vec<String>,
}

impl ChunkedResponse {
    pub fn empty() -> Self {
        Self {
            chunk: String::new(),
            has_more: false,
            remaining_chunks: Vec::new(),
        }
    }

    /// Delivers the head of `chunks` and hands the tail back to the caller.
    pub fn from_chunks(chunks: Vec<String>) -> Self {
        let mut chunks = chunks.into_iter();
        match chunks.next() {
            Some(chunk) => {
                let remaining_chunks: Vec<String> = chunks.collect();
                Self {
                    chunk,
                    has_more: !remaining_chunks.is_empty(),
                    remaining_chunks,
                }
            }
            None => Self::empty(),
        }
    }
}

/// Pops the next chunk off a client-held remainder. Keeps no server state.
pub fn next_chunk(remaining_chunks: Vec<String>) -> ChunkedResponse {
    ChunkedResponse::from_chunks(remaining_chunks)
}

/// Splits a response into groups of consecutive non-blank lines whose
/// combined length stays within [`MAX_CHUNK_LENGTH`]. A single line longer
/// than the budget still gets a chunk of its own; lines are never split.
pub fn chunk_response(response: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current_chunk: Vec<&str> = Vec::new();
    let mut current_length = 0;

    for line in response.lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }

        let line_length = line.chars().count();
        if current_length + line_length > MAX_CHUNK_LENGTH && !current_chunk.is_empty() {
            chunks.push(current_chunk.join("\n"));
            current_chunk.clear();
            current_length = 0;
        }

        current_chunk.push(line);
        current_length += line_length;
    }

    if !current_chunk.is_empty() {
        chunks.push(current_chunk.join("\n"));
    }

    chunks
}
