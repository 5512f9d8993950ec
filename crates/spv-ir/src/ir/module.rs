use std::ops::{Index, IndexMut};

use crate::error::{Error, Result};

use super::{
    Block, FUNCTION_CONTROL_NONE, FuncRef, Function, Id, InstrRef, Instruction, Op, StorageClass,
};

/// Extra slots allocated past the highest id whenever the index grows, so
/// registering ids in increasing order does not reallocate per id.
const ID_MAP_SLACK: usize = 16;

/// The compilation unit.
///
/// Owns every instruction in an append-only pool and every function; blocks
/// and functions refer into the pool by [`InstrRef`]. The module also keeps
/// the index from result id to producing instruction that the whole
/// hierarchy registers into as instructions are created.
///
/// One logical writer (the builder) mutates the module; once `dump` starts
/// the module is treated as read-only.
#[derive(Debug, Default)]
pub struct Module {
    pool: Vec<Instruction>,
    id_map: Vec<Option<InstrRef>>,
    functions: Vec<Function>,
}

impl Module {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `inst` to the pool. If it carries a result id, the id is
    /// registered immediately, so lookups see the instruction before it is
    /// placed anywhere (or even if it never is, as with global type and
    /// constant instructions the builder keeps outside any function).
    pub fn alloc_instruction(&mut self, inst: Instruction) -> InstrRef {
        let r = InstrRef(self.pool.len() as u32);
        self.pool.push(inst);
        self.map_instruction(r);
        r
    }

    /// Registers the instruction's result id in the index, growing the
    /// index in chunks. Re-mapping an id overwrites the previous entry;
    /// rewrite passes that deliberately reuse ids rely on that.
    /// Instructions without a result id are ignored.
    pub fn map_instruction(&mut self, inst: InstrRef) {
        let Some(result) = self[inst].result() else {
            return;
        };
        let index = result.index();
        if index >= self.id_map.len() {
            self.id_map.resize(index + ID_MAP_SLACK, None);
        }
        self.id_map[index] = Some(inst);
    }

    /// Looks up the instruction that produced `id`, if any was registered.
    #[must_use]
    pub fn lookup(&self, id: Id) -> Option<InstrRef> {
        self.id_map.get(id.index()).copied().flatten()
    }

    /// The instruction that produced `id`.
    ///
    /// # Panics
    /// If `id` was never registered; querying such an id is a builder bug.
    #[must_use]
    pub fn instruction(&self, id: Id) -> &Instruction {
        match self.lookup(id) {
            Some(r) => &self[r],
            None => panic!("{id} is not mapped in the module"),
        }
    }

    /// Mutable access to the instruction that produced `id`, for rewrite
    /// passes.
    ///
    /// # Panics
    /// If `id` was never registered.
    pub fn instruction_mut(&mut self, id: Id) -> &mut Instruction {
        match self.lookup(id) {
            Some(r) => &mut self.pool[r.index()],
            None => panic!("{id} is not mapped in the module"),
        }
    }

    /// The type id of the value produced by `result_id`.
    ///
    /// # Panics
    /// If `result_id` was never registered.
    #[must_use]
    pub fn type_id(&self, result_id: Id) -> Option<Id> {
        self.instruction(result_id).type_id()
    }

    /// The storage class of a pointer or variable type instruction, read
    /// from its first immediate operand.
    ///
    /// # Panics
    /// If `type_id` is unregistered or its first operand is not a storage
    /// class; both are caller bugs.
    #[must_use]
    pub fn storage_class(&self, type_id: Id) -> StorageClass {
        let word = self.instruction(type_id).immediate_operand(0);
        match StorageClass::from_word(word) {
            Some(class) => class,
            None => panic!("operand {word:#x} of {type_id} is not a storage class"),
        }
    }

    /// Appends an already-built function and returns its handle.
    pub fn add_function(&mut self, function: Function) -> FuncRef {
        let r = FuncRef(self.functions.len() as u32);
        self.functions.push(function);
        r
    }

    /// Builds a function: its `OpFunction` instruction (a function-control
    /// mask and a reference to `function_type`) plus one
    /// `OpFunctionParameter` per parameter type that the registered
    /// function-type instruction lists after its return type, with
    /// contiguous ids starting at `first_param`. Every synthesized
    /// instruction is registered with the module.
    ///
    /// # Errors
    /// `function_type` must already be registered, and must name an
    /// `OpTypeFunction` instruction.
    pub fn new_function(
        &mut self,
        id: Id,
        result_type: Id,
        function_type: Id,
        first_param: Id,
    ) -> Result<FuncRef> {
        let Some(type_ref) = self.lookup(function_type) else {
            return Err(Error::UnregisteredType(function_type));
        };
        if self[type_ref].op() != Op::TypeFunction {
            return Err(Error::NotAFunctionType(function_type));
        }

        let mut def = Instruction::new(Op::Function, Some(id), Some(result_type));
        def.add_immediate_operand(FUNCTION_CONTROL_NONE);
        def.add_id_operand(function_type);
        let def = self.alloc_instruction(def);

        // The function type's operands are the return type followed by one
        // type per parameter.
        let operand_count = self[type_ref].operand_count();
        debug_assert!(operand_count >= 1, "function type without a return type");
        let param_count = operand_count.saturating_sub(1);
        let mut params = Vec::with_capacity(param_count);
        for p in 0..param_count {
            let param_type = self[type_ref].id_operand(p + 1);
            let param = Instruction::new(
                Op::FunctionParameter,
                Some(Id(first_param.0 + p as u32)),
                Some(param_type),
            );
            params.push(self.alloc_instruction(param));
        }

        Ok(self.add_function(Function::new(id, def, params)))
    }

    #[must_use]
    pub fn function(&self, func: FuncRef) -> &Function {
        &self.functions[func.index()]
    }

    pub fn function_mut(&mut self, func: FuncRef) -> &mut Function {
        &mut self.functions[func.index()]
    }

    #[must_use]
    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    /// Starts a new block in `func`: allocates its `OpLabel` instruction,
    /// registers the label id eagerly so the block is immediately findable
    /// by id, and appends the block to the function. Returns the block's
    /// index within the function.
    pub fn new_block(&mut self, func: FuncRef, id: Id) -> usize {
        let label = self.alloc_instruction(Instruction::new(Op::Label, Some(id), None));
        let function = self.function_mut(func);
        function.add_block(Block::new(id, label));
        function.blocks().len() - 1
    }

    /// Appends `inst` to the end of a block, registering its result id.
    /// Appending past a terminator is a caller bug; use
    /// [`Module::insert_before_terminal`] for that.
    pub fn add_instruction(&mut self, func: FuncRef, block: usize, inst: Instruction) -> InstrRef {
        debug_assert!(
            !self.functions[func.index()].block(block).is_terminated(self),
            "appending to a terminated block"
        );
        let r = self.alloc_instruction(inst);
        self.function_mut(func).block_mut(block).push(r);
        r
    }

    /// Inserts `inst` immediately after the block's label. Inserting
    /// another label this way is a caller bug.
    pub fn add_instruction_at_front(
        &mut self,
        func: FuncRef,
        block: usize,
        inst: Instruction,
    ) -> InstrRef {
        debug_assert!(inst.op() != Op::Label, "a block has exactly one label");
        let r = self.alloc_instruction(inst);
        self.function_mut(func).block_mut(block).insert(1, r);
        r
    }

    /// Inserts `inst` as late as possible while keeping the block's
    /// terminator last and any structured merge instruction immediately
    /// before its branch, as the binary format requires:
    /// - before the merge instruction preceding a conditional branch or
    ///   switch;
    /// - before a loop merge preceding an unconditional branch, or directly
    ///   before the branch when no loop merge precedes it;
    /// - directly before a kill or return;
    /// - at the end of a block with no terminator yet.
    pub fn insert_before_terminal(
        &mut self,
        func: FuncRef,
        block: usize,
        inst: Instruction,
    ) -> InstrRef {
        let position = {
            let insts = self.functions[func.index()].block(block).instructions();
            let len = insts.len();
            match self[insts[len - 1]].op() {
                Op::BranchConditional | Op::Switch => len - 2,
                Op::Branch => {
                    if len > 1 && self[insts[len - 2]].op() == Op::LoopMerge {
                        len - 2
                    } else {
                        len - 1
                    }
                }
                Op::Kill | Op::Return | Op::ReturnValue => len - 1,
                _ => len,
            }
        };
        let r = self.alloc_instruction(inst);
        self.function_mut(func).block_mut(block).insert(position, r);
        r
    }

    /// Registers a function-local declaration: the instruction lands in the
    /// entry block's hoisted side list and is emitted right after the entry
    /// label, as the binary format requires of local declarations.
    pub fn add_local_variable(&mut self, func: FuncRef, inst: Instruction) -> InstrRef {
        let r = self.alloc_instruction(inst);
        self.function_mut(func).entry_block_mut().add_local_variable(r);
        r
    }

    /// Emits every function in order into `out` as one flat word stream.
    pub fn dump(&self, out: &mut Vec<u32>) {
        let start = out.len();
        for function in &self.functions {
            function.dump(self, out);
        }
        tracing::debug!(
            "dumped {} functions, {} words",
            self.functions.len(),
            out.len() - start
        );
    }
}

impl Index<InstrRef> for Module {
    type Output = Instruction;

    fn index(&self, r: InstrRef) -> &Instruction {
        &self.pool[r.index()]
    }
}

impl IndexMut<InstrRef> for Module {
    fn index_mut(&mut self, r: InstrRef) -> &mut Instruction {
        &mut self.pool[r.index()]
    }
}
