use std::process::ExitCode;

fn main() -> ExitCode {
    peelcheck::main()
}
