/// A contiguous slice of the source text handed to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
    /// Character offset of the chunk's first character in the source text.
    pub offset: usize,
}

impl Chunk {
    pub fn new(text: String, offset: usize) -> Self {
        Self { text, offset }
    }

    /// Length in characters, which is the unit every size limit is expressed in.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

pub fn total_char_len(chunks: &[Chunk]) -> usize {
    chunks.iter().map(Chunk::char_len).sum()
}
