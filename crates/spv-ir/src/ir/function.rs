use super::{Block, Id, InstrRef, Instruction, Module, Op};

/// Handle to a function in a [`Module`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FuncRef(pub(crate) u32);

impl FuncRef {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One callable unit: its defining `OpFunction` instruction, the
/// synthesized `OpFunctionParameter` instructions, and the blocks of its
/// CFG, entry block first.
#[derive(Debug)]
pub struct Function {
    id: Id,
    def: InstrRef,
    params: Vec<InstrRef>,
    blocks: Vec<Block>,
}

impl Function {
    pub(crate) fn new(id: Id, def: InstrRef, params: Vec<InstrRef>) -> Self {
        Self {
            id,
            def,
            params,
            blocks: Vec::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> Id {
        self.id
    }

    /// The defining `OpFunction` instruction.
    #[must_use]
    pub fn def(&self) -> InstrRef {
        self.def
    }

    #[must_use]
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    #[must_use]
    pub fn params(&self) -> &[InstrRef] {
        &self.params
    }

    #[must_use]
    pub fn param_id(&self, index: usize, module: &Module) -> Id {
        module[self.params[index]]
            .result()
            .expect("parameter instructions always carry a result id")
    }

    #[must_use]
    pub fn return_type(&self, module: &Module) -> Option<Id> {
        module[self.def].type_id()
    }

    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Detaches and returns the most recently added block, without touching
    /// the instruction pool: the block's label id stays mapped and its
    /// instructions stay alive. The caller either re-attaches the block
    /// later or drops it, accepting that its instructions are then never
    /// emitted. Used to back out of speculative block creation.
    pub fn pop_block(&mut self) -> Option<Block> {
        self.blocks.pop()
    }

    #[must_use]
    pub fn entry_block(&self) -> &Block {
        &self.blocks[0]
    }

    pub fn entry_block_mut(&mut self) -> &mut Block {
        &mut self.blocks[0]
    }

    #[must_use]
    pub fn last_block(&self) -> &Block {
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn last_block_mut(&mut self) -> &mut Block {
        let last = self.blocks.len() - 1;
        &mut self.blocks[last]
    }

    #[must_use]
    pub fn block(&self, index: usize) -> &Block {
        &self.blocks[index]
    }

    pub fn block_mut(&mut self, index: usize) -> &mut Block {
        &mut self.blocks[index]
    }

    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Emits the definition, the parameters, every block in order, and a
    /// closing `OpFunctionEnd`.
    pub fn dump(&self, module: &Module, out: &mut Vec<u32>) {
        module[self.def].dump(out);
        for &param in &self.params {
            module[param].dump(out);
        }
        for block in &self.blocks {
            block.dump(module, out);
        }
        Instruction::new(Op::FunctionEnd, None, None).dump(out);
    }
}
