use forth_vm::{parse::*, vm::*};
use std::{
    fs::{read_dir, read_to_string},
    path::PathBuf,
};

#[test]
fn test_demos() {
    let mut ran = 0;
    for entry in read_dir("demos/").unwrap() {
        let path = entry.unwrap().path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("fasm") {
            continue;
        }
        eprintln!("Starting test for `{path:?}`");

        let correct_output_path = PathBuf::from("demos/output")
            .join(path.file_name().unwrap())
            .with_extension("txt");
        let correct_output = match read_to_string(&correct_output_path) {
            Ok(contents) => contents
                .split_whitespace()
                .map(|word| word.parse::<i64>().unwrap())
                .collect::<Vec<_>>(),
            Err(_) => {
                eprintln!("WARNING: Could not read output text file `{correct_output_path:?}` to compare against. Skipping this test.");
                continue;
            }
        };

        let code = read_to_string(&path).unwrap();
        let program = match parse_program(&code) {
            Ok(program) => program,
            Err(e) => panic!("{}", format_error(&path.to_string_lossy(), &strip_comments(&code), &e)),
        };

        let mut vm = VirtualMachine::default();
        vm.load(&program).unwrap();
        assert_eq!(vm.run(), Ok(Halt::EndOfProgram), "{path:?}");
        assert_eq!(vm.data_stack().values(), correct_output, "{path:?}");
        ran += 1;
    }
    assert!(ran > 0);
}
