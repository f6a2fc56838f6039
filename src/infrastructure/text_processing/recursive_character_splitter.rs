use std::collections::VecDeque;

use async_trait::async_trait;

use crate::application::ports::{TextSplitter, TextSplitterError};
use crate::domain::Chunk;

/// Paragraph, line and word boundaries, then single characters.
pub const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Splits text on the coarsest separator present, recursing into pieces that
/// are still too long, and merges the pieces back into overlapping windows.
/// All sizes are measured in characters.
pub struct RecursiveCharacterSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl RecursiveCharacterSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self, TextSplitterError> {
        Self::with_separators(chunk_size, chunk_overlap, &DEFAULT_SEPARATORS)
    }

    pub fn with_separators(
        chunk_size: usize,
        chunk_overlap: usize,
        separators: &[&str],
    ) -> Result<Self, TextSplitterError> {
        if chunk_size == 0 {
            return Err(TextSplitterError::InvalidConfiguration(
                "chunk size must be greater than zero".to_string(),
            ));
        }
        if chunk_overlap >= chunk_size {
            return Err(TextSplitterError::InvalidConfiguration(format!(
                "chunk overlap ({chunk_overlap}) must be smaller than chunk size ({chunk_size})"
            )));
        }

        let mut separators: Vec<String> = separators.iter().map(|s| s.to_string()).collect();
        if separators.last().is_none_or(|s| !s.is_empty()) {
            separators.push(String::new());
        }

        Ok(Self {
            chunk_size,
            chunk_overlap,
            separators,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    fn split_recursive(
        &self,
        text: &str,
        base: usize,
        separators: &[String],
        out: &mut Vec<(usize, String)>,
    ) {
        let (separator, remaining) = pick_separator(text, separators);
        let mut buffered: Vec<Piece<'_>> = Vec::new();
        let mut start = base;

        for piece in split_keeping_separator(text, separator) {
            let piece_start = start;
            start += piece.len();

            let len = char_len(piece);
            if len < self.chunk_size {
                buffered.push(Piece {
                    start: piece_start,
                    text: piece,
                    len,
                });
                continue;
            }

            if !buffered.is_empty() {
                self.merge(&buffered, out);
                buffered.clear();
            }

            if remaining.is_empty() {
                push_trimmed(piece_start, piece, out);
            } else {
                self.split_recursive(piece, piece_start, remaining, out);
            }
        }

        if !buffered.is_empty() {
            self.merge(&buffered, out);
        }
    }

    fn merge(&self, pieces: &[Piece<'_>], out: &mut Vec<(usize, String)>) {
        let mut window: VecDeque<&Piece<'_>> = VecDeque::new();
        let mut total = 0;

        for piece in pieces {
            if total + piece.len > self.chunk_size && !window.is_empty() {
                emit_window(&window, out);

                while total > self.chunk_overlap
                    || (total + piece.len > self.chunk_size && total > 0)
                {
                    match window.pop_front() {
                        Some(front) => total -= front.len,
                        None => break,
                    }
                }
            }

            window.push_back(piece);
            total += piece.len;
        }

        if !window.is_empty() {
            emit_window(&window, out);
        }
    }
}

#[async_trait]
impl TextSplitter for RecursiveCharacterSplitter {
    async fn split(&self, text: &str) -> Result<Vec<Chunk>, TextSplitterError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut pieces = Vec::new();
        self.split_recursive(text, 0, &self.separators, &mut pieces);

        to_chunks(text, pieces)
    }
}

/// A slice of the source text together with its byte position in it.
struct Piece<'a> {
    start: usize,
    text: &'a str,
    len: usize,
}

/// The first separator that occurs in `text`, plus the finer separators left
/// for recursion. The empty separator always matches and ends recursion.
fn pick_separator<'s>(text: &str, separators: &'s [String]) -> (&'s str, &'s [String]) {
    for (index, separator) in separators.iter().enumerate() {
        if separator.is_empty() {
            return ("", &[]);
        }
        if text.contains(separator.as_str()) {
            return (separator.as_str(), &separators[index + 1..]);
        }
    }
    ("", &[])
}

/// Splits on `separator`, attaching each separator to the start of the piece
/// that follows it so that concatenating the pieces restores the input.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (index, _) in text.match_indices(separator) {
        pieces.push(&text[start..index]);
        start = index;
    }
    pieces.push(&text[start..]);

    pieces.retain(|p| !p.is_empty());
    pieces
}

/// Window pieces are contiguous in the source, so the chunk starts where the
/// first piece does.
fn emit_window(window: &VecDeque<&Piece<'_>>, out: &mut Vec<(usize, String)>) {
    let Some(first) = window.front() else {
        return;
    };
    let joined: String = window.iter().map(|p| p.text).collect();
    push_trimmed(first.start, &joined, out);
}

fn push_trimmed(start: usize, text: &str, out: &mut Vec<(usize, String)>) {
    let without_leading = text.trim_start();
    let trimmed = without_leading.trim_end();
    if !trimmed.is_empty() {
        let leading = text.len() - without_leading.len();
        out.push((start + leading, trimmed.to_string()));
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Converts byte positions into character offsets.
fn to_chunks(text: &str, pieces: Vec<(usize, String)>) -> Result<Vec<Chunk>, TextSplitterError> {
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(byte, _)| byte)
        .chain(std::iter::once(text.len()))
        .collect();

    pieces
        .into_iter()
        .map(|(byte, piece)| {
            let offset = boundaries.binary_search(&byte).map_err(|_| {
                TextSplitterError::SplittingFailed(format!(
                    "chunk start {byte} is not on a character boundary"
                ))
            })?;
            Ok(Chunk::new(piece, offset))
        })
        .collect()
}
