use std::fmt;

use super::{Id, Op};

/// Bit position of the word count in an instruction's header word; the low
/// half holds the opcode.
pub const WORD_COUNT_SHIFT: u32 = 16;

/// A single instruction: an opcode, optional result and type ids, and an
/// ordered list of 32-bit operand words.
///
/// Operands added as ids and as raw immediates are stored uniformly as
/// words; which is which is known only to the caller that appended them.
/// The opcode and the result/type ids are fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    op: Op,
    result: Option<Id>,
    ty: Option<Id>,
    operands: Vec<u32>,
    // Packed words of the string literal, if any; the original text is kept
    // alongside for read-back.
    string_words: Vec<u32>,
    string: Option<String>,
}

impl Instruction {
    #[must_use]
    pub fn new(op: Op, result: Option<Id>, ty: Option<Id>) -> Self {
        Self {
            op,
            result,
            ty,
            operands: Vec::new(),
            string_words: Vec::new(),
            string: None,
        }
    }

    #[must_use]
    pub fn op(&self) -> Op {
        self.op
    }

    #[must_use]
    pub fn result(&self) -> Option<Id> {
        self.result
    }

    #[must_use]
    pub fn type_id(&self) -> Option<Id> {
        self.ty
    }

    pub fn add_id_operand(&mut self, id: Id) {
        self.operands.push(id.0);
    }

    pub fn add_immediate_operand(&mut self, value: u32) {
        self.operands.push(value);
    }

    /// Packs `text` four bytes per little-endian word, zero-padding the
    /// final partial word. Text whose byte length is an exact multiple of
    /// four packs with no extra terminator word; the zero padding of a
    /// partial word doubles as the terminator.
    pub fn add_string_operand(&mut self, text: &str) {
        debug_assert!(
            !text.bytes().any(|b| b == 0),
            "string operand contains an interior NUL"
        );
        for chunk in text.as_bytes().chunks(4) {
            let mut word = [0u8; 4];
            word[..chunk.len()].copy_from_slice(chunk);
            self.string_words.push(u32::from_le_bytes(word));
        }
        self.string = Some(text.to_owned());
    }

    #[must_use]
    pub fn operand_count(&self) -> usize {
        self.operands.len()
    }

    #[must_use]
    pub fn id_operand(&self, index: usize) -> Id {
        Id(self.operands[index])
    }

    #[must_use]
    pub fn immediate_operand(&self, index: usize) -> u32 {
        self.operands[index]
    }

    #[must_use]
    pub fn string_operand(&self) -> Option<&str> {
        self.string.as_deref()
    }

    /// Replaces the operand at `index` with `new` if it currently equals
    /// `old`.
    pub fn rewrite_operand(&mut self, old: Id, new: Id, index: usize) {
        if self.operands[index] == old.0 {
            self.operands[index] = new.0;
        }
    }

    /// Replaces every occurrence of `old` among the operands with `new`.
    pub fn rewrite_operands(&mut self, old: Id, new: Id) {
        for index in 0..self.operands.len() {
            self.rewrite_operand(old, new, index);
        }
    }

    /// Total emitted size in words, header included.
    #[must_use]
    pub fn word_count(&self) -> u32 {
        1 + u32::from(self.ty.is_some())
            + u32::from(self.result.is_some())
            + self.operands.len() as u32
            + self.string_words.len() as u32
    }

    /// Appends the binary form: the header word (word count in the high
    /// half, opcode in the low half), then the type id, the result id, the
    /// operand words, and the string words.
    pub fn dump(&self, out: &mut Vec<u32>) {
        out.push((self.word_count() << WORD_COUNT_SHIFT) | u32::from(self.op as u16));
        if let Some(ty) = self.ty {
            out.push(ty.0);
        }
        if let Some(result) = self.result {
            out.push(result.0);
        }
        out.extend_from_slice(&self.operands);
        out.extend_from_slice(&self.string_words);
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(result) = self.result {
            write!(f, "{result} = ")?;
        }
        write!(f, "{:?}", self.op)?;
        if let Some(ty) = self.ty {
            write!(f, " {ty}")?;
        }
        for word in &self.operands {
            write!(f, " {word}")?;
        }
        if let Some(text) = &self.string {
            write!(f, " \"{text}\"")?;
        }
        Ok(())
    }
}
