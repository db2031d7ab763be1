use clap::Parser;
use minimal_basic::{interpreter::BANNER, Console, Interpreter, Outcome, StdConsole};

/// Minimal BASIC interpreter
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Start with line tracing on (same as typing TRON)
    #[arg(long)]
    trace: bool,

    /// Don't print the banner
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();
    let mut console = StdConsole::new();
    let mut interpreter = Interpreter::new().with_trace(cli.trace);

    if !cli.quiet {
        println!("{}", BANNER);
    }

    loop {
        let line = match console.read_line("") {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                eprintln!("Error: {}", e);
                break;
            }
        };

        match interpreter.process_line(&line, &mut console) {
            Ok(Outcome::Continue) => {}
            Ok(Outcome::Quit) => break,
            Err(e) => eprintln!("Error: {}", e),
        }
    }
}
