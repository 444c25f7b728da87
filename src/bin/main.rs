use std::env;
use std::io;
use std::process;
use value_semantics::cli;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let stdout = io::stdout();
    let stderr = io::stderr();
    let code = cli::main_with(env::args_os(), &mut stdout.lock(), &mut stderr.lock());
    process::exit(code);
}
