//! Property-based tests for cells, stacks, and the interpreter.
use forth_vm::vm::*;
use proptest::prelude::*;

/// Cells that are either a registered opcode or a small value.
fn program_cell() -> impl Strategy<Value = i64> {
    prop_oneof![
        prop::sample::select(Op::ALL.iter().map(Op::cell).collect::<Vec<_>>()),
        -20i64..20,
    ]
}

proptest! {
    /// Any value already in range reads back unchanged.
    #[test]
    fn prop_cell_round_trip(bits in 1u32..=64, value in any::<i64>()) {
        let mut cell = Cell::new(bits);
        let value = wrap(value as i128, bits);
        cell.write(value);
        prop_assert_eq!(cell.read(), value);
    }

    /// Writing wraps into range and stays congruent modulo 2^bits.
    #[test]
    fn prop_cell_wraps(bits in 1u32..=64, value in any::<i64>()) {
        let mut cell = Cell::new(bits);
        cell.write(value);
        let stored = cell.read();

        prop_assert!(cell.min() <= stored && stored <= cell.max());
        let modulus = 1i128 << bits;
        prop_assert_eq!((value as i128 - stored as i128).rem_euclid(modulus), 0);
    }

    /// Values come back off a stack in reverse order.
    #[test]
    fn prop_stack_lifo(values in prop::collection::vec(any::<i32>(), 0..20)) {
        let mut stack = Stack::new(StackKind::Data, 20, 32);
        for value in &values {
            stack.push(*value).unwrap();
        }

        let mut popped = vec![];
        while let Ok(value) = stack.pop() {
            popped.push(value as i32);
        }
        popped.reverse();
        prop_assert_eq!(popped, values);
        prop_assert_eq!(stack.stack_pointer(), -1);
    }

    /// A stack holds exactly its capacity.
    #[test]
    fn prop_stack_capacity(capacity in 0usize..32) {
        let mut stack = Stack::new(StackKind::Return, capacity, 16);
        for i in 0..capacity {
            prop_assert!(stack.push(i as i64).is_ok());
        }
        prop_assert_eq!(stack.push(0), Err(Error::StackOverflow(StackKind::Return)));
        prop_assert_eq!(stack.depth(), capacity);
    }

    /// DS_ADD, DS_SUB and DS_MUL agree with wrapped integer arithmetic.
    #[test]
    fn prop_arithmetic_wraps(bits in 8u32..=64, a in any::<i64>(), b in any::<i64>()) {
        let program = Program::new()
            .lit(b).lit(a).op(Op::DsAdd)
            .lit(b).lit(a).op(Op::DsSub)
            .lit(b).lit(a).op(Op::DsMul);
        let config = MachineConfig::default()
            .with_bits_per_cell(bits)
            .with_program_offset(0)
            .with_memory_size(program.len());
        let mut vm = VirtualMachine::new(config).unwrap();
        vm.load(&program).unwrap();

        // Operands are wrapped when the program is loaded.
        let (a, b) = (wrap(a as i128, bits) as i128, wrap(b as i128, bits) as i128);
        prop_assert_eq!(vm.run(), Ok(Halt::EndOfProgram));
        prop_assert_eq!(
            vm.data_stack().values(),
            vec![wrap(b + a, bits), wrap(b - a, bits), wrap(b * a, bits)]
        );
    }

    /// A failing instruction leaves the machine exactly as it found it.
    #[test]
    fn prop_fault_leaves_state(cells in prop::collection::vec(program_cell(), 1..16)) {
        let config = MachineConfig::default()
            .with_stack_depth(4)
            .with_program_offset(0)
            .with_memory_size(16);
        let mut vm = VirtualMachine::new(config).unwrap();
        vm.load(&Program(cells)).unwrap();

        for _ in 0..64 {
            let before = vm.state().clone();
            match vm.step() {
                Ok(Step::Continue) => {}
                Ok(Step::Halt(_)) => break,
                Err(_) => {
                    prop_assert_eq!(vm.state(), &before);
                    break;
                }
            }
        }
    }
}
