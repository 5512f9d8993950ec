use super::{Id, InstrRef, Module};

/// A basic block: a label instruction followed by the block's body, plus
/// the CFG edges the builder has recorded about it.
///
/// The first entry of the sequence is always the `OpLabel` carrying the
/// block's id. Predecessor and successor lists hold block label ids and
/// exist for graph queries only; they never carry ownership.
#[derive(Debug)]
pub struct Block {
    id: Id,
    insts: Vec<InstrRef>,
    predecessors: Vec<Id>,
    successors: Vec<Id>,
    local_variables: Vec<InstrRef>,
    unreachable: bool,
}

impl Block {
    pub(crate) fn new(id: Id, label: InstrRef) -> Self {
        Self {
            id,
            insts: vec![label],
            predecessors: Vec::new(),
            successors: Vec::new(),
            local_variables: Vec::new(),
            unreachable: false,
        }
    }

    /// The block's id, equal to the result id of its label instruction.
    #[must_use]
    pub fn id(&self) -> Id {
        self.id
    }

    #[must_use]
    pub fn instructions(&self) -> &[InstrRef] {
        &self.insts
    }

    #[must_use]
    pub fn instruction_count(&self) -> usize {
        self.insts.len()
    }

    #[must_use]
    pub fn local_variables(&self) -> &[InstrRef] {
        &self.local_variables
    }

    pub fn add_predecessor(&mut self, pred: Id) {
        self.predecessors.push(pred);
    }

    pub fn add_successor(&mut self, succ: Id) {
        self.successors.push(succ);
    }

    #[must_use]
    pub fn predecessor_count(&self) -> usize {
        self.predecessors.len()
    }

    #[must_use]
    pub fn successor_count(&self) -> usize {
        self.successors.len()
    }

    #[must_use]
    pub fn successors(&self) -> &[Id] {
        &self.successors
    }

    #[must_use]
    pub fn successor(&self, index: usize) -> Id {
        self.successors[index]
    }

    /// Linear membership test; blocks have few predecessors in practice.
    #[must_use]
    pub fn has_predecessor(&self, block: Id) -> bool {
        self.predecessors.contains(&block)
    }

    #[must_use]
    pub fn is_predecessor_of(&self, other: &Block) -> bool {
        other.has_predecessor(self.id)
    }

    /// Flags the block as known-dead. Set by the builder for the degenerate
    /// blocks it introduces itself; no reachability is ever computed here.
    pub fn set_unreachable(&mut self) {
        self.unreachable = true;
    }

    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        self.unreachable
    }

    /// Stores a hoisted function-local declaration. These are emitted as a
    /// contiguous run right after the label, before the main sequence.
    pub fn add_local_variable(&mut self, inst: InstrRef) {
        self.local_variables.push(inst);
    }

    /// Whether the block already ends in a control-transfer instruction.
    #[must_use]
    pub fn is_terminated(&self, module: &Module) -> bool {
        self.insts
            .last()
            .is_some_and(|&last| module[last].op().is_terminating())
    }

    pub(crate) fn push(&mut self, inst: InstrRef) {
        self.insts.push(inst);
    }

    pub(crate) fn insert(&mut self, index: usize, inst: InstrRef) {
        self.insts.insert(index, inst);
    }

    /// Emits the label, then the hoisted local variables, then the rest of
    /// the main sequence.
    ///
    /// Blocks flagged unreachable are dropped entirely when they hold at
    /// most the label plus one synthetic instruction. The bound is
    /// deliberate: larger flagged blocks are still emitted in case other
    /// instructions reference their contents, and the output must stay
    /// byte-compatible with that policy.
    pub fn dump(&self, module: &Module, out: &mut Vec<u32>) {
        if self.unreachable && self.insts.len() <= 2 {
            tracing::trace!("skipping degenerate unreachable block {}", self.id);
            return;
        }

        module[self.insts[0]].dump(out);
        for &var in &self.local_variables {
            module[var].dump(out);
        }
        for &inst in &self.insts[1..] {
            module[inst].dump(out);
        }
    }
}
