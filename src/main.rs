use std::env;
use std::io;
use std::path::Path;
use std::process;

use colored::Colorize;
use tracing::info;

use structural_patterns::{demo, logging, DemoConfig, DemoError};

fn load_config() -> Result<DemoConfig, DemoError> {
    match env::args().nth(1) {
        Some(path) => {
            info!(path = %path, "loading demo config");
            Ok(DemoConfig::load(Path::new(&path))?)
        }
        None => Ok(DemoConfig::default()),
    }
}

fn main() {
    logging::init_logging();

    let result = load_config().and_then(|config| {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        demo::run(&config, &mut out)
    });

    if let Err(err) = result {
        eprintln!("{} {err}", "error:".red().bold());
        process::exit(1);
    }
}
