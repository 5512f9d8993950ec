//! Placement rules for instruction insertion: plain append, front
//! insertion, and the terminator-aware insertion that must keep structured
//! merge instructions glued to their branch.

use spv_ir::{FuncRef, Id, Instruction, Module, Op};

/// A void function with one empty block (label %5). Returns the function
/// handle and the block index.
fn void_function(module: &mut Module) -> (FuncRef, usize) {
    module.alloc_instruction(Instruction::new(Op::TypeVoid, Some(Id(1)), None));
    let mut fn_ty = Instruction::new(Op::TypeFunction, Some(Id(2)), None);
    fn_ty.add_id_operand(Id(1));
    module.alloc_instruction(fn_ty);
    let func = module
        .new_function(Id(3), Id(1), Id(2), Id(4))
        .expect("function type is registered");
    let block = module.new_block(func, Id(5));
    (func, block)
}

fn ops(module: &Module, func: FuncRef, block: usize) -> Vec<Op> {
    module
        .function(func)
        .block(block)
        .instructions()
        .iter()
        .map(|&r| module[r].op())
        .collect()
}

fn store(a: u32, b: u32) -> Instruction {
    let mut inst = Instruction::new(Op::Store, None, None);
    inst.add_id_operand(Id(a));
    inst.add_id_operand(Id(b));
    inst
}

#[test]
fn insert_into_unterminated_block_appends() {
    let mut module = Module::new();
    let (func, block) = void_function(&mut module);
    module.add_instruction(func, block, Instruction::new(Op::Nop, None, None));

    module.insert_before_terminal(func, block, store(10, 11));

    assert_eq!(ops(&module, func, block), [Op::Label, Op::Nop, Op::Store]);
}

#[test]
fn insert_lands_before_return() {
    let mut module = Module::new();
    let (func, block) = void_function(&mut module);
    module.add_instruction(func, block, Instruction::new(Op::Return, None, None));

    module.insert_before_terminal(func, block, store(10, 11));

    assert_eq!(ops(&module, func, block), [Op::Label, Op::Store, Op::Return]);
}

#[test]
fn insert_lands_before_return_value() {
    let mut module = Module::new();
    let (func, block) = void_function(&mut module);
    let mut ret = Instruction::new(Op::ReturnValue, None, None);
    ret.add_id_operand(Id(9));
    module.add_instruction(func, block, ret);

    module.insert_before_terminal(func, block, store(10, 11));

    assert_eq!(
        ops(&module, func, block),
        [Op::Label, Op::Store, Op::ReturnValue]
    );
}

#[test]
fn insert_lands_before_kill() {
    let mut module = Module::new();
    let (func, block) = void_function(&mut module);
    module.add_instruction(func, block, Instruction::new(Op::Kill, None, None));

    module.insert_before_terminal(func, block, store(10, 11));

    assert_eq!(ops(&module, func, block), [Op::Label, Op::Store, Op::Kill]);
}

#[test]
fn insert_keeps_selection_merge_before_conditional_branch() {
    let mut module = Module::new();
    let (func, block) = void_function(&mut module);
    let mut merge = Instruction::new(Op::SelectionMerge, None, None);
    merge.add_id_operand(Id(20));
    merge.add_immediate_operand(0);
    module.add_instruction(func, block, merge);
    let mut branch = Instruction::new(Op::BranchConditional, None, None);
    branch.add_id_operand(Id(9));
    branch.add_id_operand(Id(21));
    branch.add_id_operand(Id(22));
    module.add_instruction(func, block, branch);

    module.insert_before_terminal(func, block, store(10, 11));

    assert_eq!(
        ops(&module, func, block),
        [Op::Label, Op::Store, Op::SelectionMerge, Op::BranchConditional]
    );
}

#[test]
fn insert_keeps_selection_merge_before_switch() {
    let mut module = Module::new();
    let (func, block) = void_function(&mut module);
    let mut merge = Instruction::new(Op::SelectionMerge, None, None);
    merge.add_id_operand(Id(20));
    merge.add_immediate_operand(0);
    module.add_instruction(func, block, merge);
    let mut switch = Instruction::new(Op::Switch, None, None);
    switch.add_id_operand(Id(9));
    switch.add_id_operand(Id(20));
    module.add_instruction(func, block, switch);

    module.insert_before_terminal(func, block, store(10, 11));

    assert_eq!(
        ops(&module, func, block),
        [Op::Label, Op::Store, Op::SelectionMerge, Op::Switch]
    );
}

#[test]
fn insert_keeps_loop_merge_before_branch() {
    let mut module = Module::new();
    let (func, block) = void_function(&mut module);
    let mut merge = Instruction::new(Op::LoopMerge, None, None);
    merge.add_id_operand(Id(20));
    merge.add_id_operand(Id(21));
    merge.add_immediate_operand(0);
    module.add_instruction(func, block, merge);
    let mut branch = Instruction::new(Op::Branch, None, None);
    branch.add_id_operand(Id(22));
    module.add_instruction(func, block, branch);

    module.insert_before_terminal(func, block, store(10, 11));

    assert_eq!(
        ops(&module, func, block),
        [Op::Label, Op::Store, Op::LoopMerge, Op::Branch]
    );
}

#[test]
fn insert_lands_directly_before_a_plain_branch() {
    let mut module = Module::new();
    let (func, block) = void_function(&mut module);
    let mut branch = Instruction::new(Op::Branch, None, None);
    branch.add_id_operand(Id(22));
    module.add_instruction(func, block, branch);

    module.insert_before_terminal(func, block, store(10, 11));

    assert_eq!(ops(&module, func, block), [Op::Label, Op::Store, Op::Branch]);
}

#[test]
fn front_insertion_lands_right_after_the_label() {
    let mut module = Module::new();
    let (func, block) = void_function(&mut module);
    module.add_instruction(func, block, Instruction::new(Op::Nop, None, None));
    module.add_instruction(func, block, Instruction::new(Op::Return, None, None));

    module.add_instruction_at_front(func, block, store(10, 11));

    assert_eq!(
        ops(&module, func, block),
        [Op::Label, Op::Store, Op::Nop, Op::Return]
    );
}

#[test]
fn termination_tracks_the_last_instruction() {
    let mut module = Module::new();
    let (func, block) = void_function(&mut module);
    assert!(!module.function(func).block(block).is_terminated(&module));

    module.add_instruction(func, block, Instruction::new(Op::Return, None, None));
    assert!(module.function(func).block(block).is_terminated(&module));
}

#[test]
fn popped_block_stays_alive_and_mapped() {
    let mut module = Module::new();
    let (func, first) = void_function(&mut module);
    module.add_instruction(func, first, Instruction::new(Op::Return, None, None));
    module.new_block(func, Id(6));

    let popped = module
        .function_mut(func)
        .pop_block()
        .expect("two blocks were attached");
    assert_eq!(popped.id(), Id(6));
    // Detaching does not unregister the label.
    assert!(module.lookup(Id(6)).is_some());
    assert_eq!(module.function(func).blocks().len(), 1);

    // Re-attaching restores the block as the last one.
    module.function_mut(func).add_block(popped);
    assert_eq!(module.function(func).last_block().id(), Id(6));
}

#[test]
fn edge_lists_answer_membership_queries() {
    let mut module = Module::new();
    let (func, first) = void_function(&mut module);
    module.add_instruction(func, first, Instruction::new(Op::Return, None, None));
    let second = module.new_block(func, Id(6));

    module.function_mut(func).block_mut(second).add_predecessor(Id(5));
    module.function_mut(func).block_mut(first).add_successor(Id(6));

    let function = module.function(func);
    assert!(function.block(second).has_predecessor(Id(5)));
    assert!(!function.block(second).has_predecessor(Id(6)));
    assert!(function.block(first).is_predecessor_of(function.block(second)));
    assert!(!function.block(second).is_predecessor_of(function.block(first)));
    assert_eq!(function.block(first).successor(0), Id(6));
    assert_eq!(function.block(first).successor_count(), 1);
    assert_eq!(function.block(second).predecessor_count(), 1);
}
