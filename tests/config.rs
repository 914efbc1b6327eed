use forth_vm::vm::*;

#[test]
fn test_partial_config() {
    let config: MachineConfig = serde_json::from_str(r#"{"memory_size": 64}"#).unwrap();

    assert_eq!(config, MachineConfig::default().with_memory_size(64));
    assert_eq!(config.bits_per_cell, DEFAULT_BITS_PER_CELL);
    assert_eq!(config.stack_depth, DEFAULT_STACK_DEPTH);
    assert_eq!(config.max_steps, None);
    // The default program offset does not fit in 64 cells.
    assert!(matches!(
        VirtualMachine::new(config),
        Err(Error::InvalidConfig(_))
    ));
}

#[test]
fn test_config_from_json() {
    let config: MachineConfig = serde_json::from_str(
        r#"{
            "bits_per_cell": 16,
            "memory_size": 64,
            "program_offset": 10,
            "max_steps": 100
        }"#,
    )
    .unwrap();

    assert_eq!(
        config,
        MachineConfig::default()
            .with_bits_per_cell(16)
            .with_memory_size(64)
            .with_program_offset(10)
            .with_max_steps(100)
    );
    let vm = VirtualMachine::new(config.clone()).unwrap();
    assert_eq!(vm.pc(), 10);

    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(serde_json::from_str::<MachineConfig>(&json).unwrap(), config);
}

#[test]
fn test_program_json() {
    let program = Program::new().lit(-3).op(Op::DsNot);
    let json = serde_json::to_string(&program).unwrap();

    assert_eq!(json, "[5,-3,23]");
    assert_eq!(serde_json::from_str::<Program>(&json).unwrap(), program);
    assert_eq!(serde_json::to_string(&Op::DsAdd).unwrap(), r#""DsAdd""#);
}

#[test]
fn test_dump_json() {
    let mut memory = Memory::new(4, 32);
    memory.write(1, 123).unwrap();
    memory.write(2, -4).unwrap();
    let dump = memory.dump(1, 2).unwrap();
    let json = serde_json::to_string(&dump).unwrap();

    assert_eq!(json, "[[1,123],[2,-4]]");
    assert_eq!(serde_json::from_str::<Dump>(&json).unwrap(), dump);
}
