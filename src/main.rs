use clap::Parser;
use glls::Options;
use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
    process,
};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Solve a linear system described by a document of coefficient rows and
/// conditions.
#[derive(Debug, Parser)]
#[command(name = "glls", version)]
struct Args {
    /// The document to read (stdin when omitted or "-")
    file: Option<PathBuf>,
    /// Coefficient rows have no trailing constant column
    #[arg(long)]
    homogeneous: bool,
    /// Log more detail to stderr (may be repeated)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    fn read_input(&self) -> io::Result<String> {
        match &self.file {
            Some(path) if path.as_os_str() != "-" => fs::read_to_string(path),
            _ => {
                let mut src = String::new();
                io::stdin().read_to_string(&mut src)?;
                Ok(src)
            },
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level())
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let src = args.read_input()?;
    let options = Options {
        homogeneous: args.homogeneous,
    };

    match glls::glls(&src, options) {
        Ok(solution) => {
            let values: Vec<_> =
                solution.iter().map(ToString::to_string).collect();
            println!("{}", values.join(" "));
            Ok(())
        },
        Err(e) => {
            eprintln!("{}", report(&e));
            process::exit(1);
        },
    }
}

/// The message printed for an error, using its `Display` form.
fn report(error: &glls::Error) -> String {
    match error.line() {
        Some(line) => format!("Error on input line {}: {}", line, error),
        None => format!("Error: {}", error),
    }
}
