use clap::*;
use codespan_reporting::{
    files::SimpleFile,
    term::{
        self,
        termcolor::{ColorChoice, StandardStream},
    },
};
use forth_vm::{parse::*, vm::*};
use std::{fmt, fs::read_to_string};

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// The program to load and run.
    #[clap(value_parser)]
    input: String,

    /// The width of every cell, in bits.
    #[clap(short, long, value_parser, default_value_t = DEFAULT_BITS_PER_CELL)]
    bits: u32,

    /// The number of cells in each stack.
    #[clap(short, long, value_parser, default_value_t = DEFAULT_STACK_DEPTH)]
    stack_depth: usize,

    /// The number of cells in memory.
    #[clap(short, long, value_parser, default_value_t = DEFAULT_MEMORY_SIZE)]
    memory_size: usize,

    /// The address the program is loaded at.
    #[clap(short, long, value_parser)]
    program_offset: Option<usize>,

    /// Stop after executing this many instructions.
    #[clap(long, value_parser)]
    max_steps: Option<u64>,

    /// Values to push onto the data stack before running (comma separated).
    #[clap(long, value_parser, value_delimiter = ',', allow_negative_numbers = true)]
    push: Vec<i64>,

    /// Print a range of memory after the run.
    #[clap(long, value_parser, num_args = 2, value_names = ["START", "COUNT"])]
    dump: Option<Vec<usize>>,

    /// Print the disassembled program instead of running it.
    #[clap(long)]
    disassemble: bool,

    /// The level of log output.
    #[clap(short, long, value_parser, default_value = "warn")]
    debug: LogLevel,
}

enum Error {
    IO(std::io::Error),
    Load(LoadError),
    Machine(forth_vm::vm::Error),
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::IO(e) => write!(f, "IO error: {:?}", e),
            Error::Load(e) => write!(f, "Load error: {}", e),
            Error::Machine(e) => write!(f, "Machine error: {}", e),
        }
    }
}

impl From<forth_vm::vm::Error> for Error {
    fn from(e: forth_vm::vm::Error) -> Self {
        Self::Machine(e)
    }
}

fn read_file(name: &str) -> Result<String, Error> {
    read_to_string(name).map_err(Error::IO)
}

fn report_load_error(name: &str, code: &str, err: &LoadError) {
    let file = SimpleFile::new(name, code);
    let writer = StandardStream::stderr(ColorChoice::Auto);
    let config = term::Config::default();
    if term::emit(&mut writer.lock(), &config, &file, &err.to_diagnostic()).is_err() {
        eprintln!("{}", format_error(name, code, err));
    }
}

fn main() -> Result<(), Error> {
    let args = Args::parse();

    let mut builder = env_logger::Builder::from_default_env();
    builder.format_timestamp(None);
    builder.filter(None, args.debug.into());
    builder.init();

    let code = strip_comments(read_file(&args.input)?);
    let program = parse_program(&code).map_err(|e| {
        report_load_error(&args.input, &code, &e);
        Error::Load(e)
    })?;

    if args.disassemble {
        print!("{program:#}");
        return Ok(());
    }

    let mut config = MachineConfig::default()
        .with_bits_per_cell(args.bits)
        .with_stack_depth(args.stack_depth)
        .with_memory_size(args.memory_size);
    if let Some(offset) = args.program_offset {
        config = config.with_program_offset(offset);
    }
    config.max_steps = args.max_steps;

    let mut vm = VirtualMachine::new(config)?;
    vm.load(&program)?;
    for value in &args.push {
        vm.state_mut().data_stack.push(*value)?;
    }

    let result = vm.run();
    match &result {
        Ok(halt) => println!("{halt}"),
        Err(e) => eprintln!("error: {e}"),
    }
    println!("{vm}");

    if let Some(range) = &args.dump {
        print!("{}", vm.memory().dump(range[0], range[1])?);
    }

    result?;
    Ok(())
}
