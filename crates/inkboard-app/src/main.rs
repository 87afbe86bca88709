//! Headless entry point: replay a script and write the drawing as PNG.

use inkboard_app::{AppError, AppResult, Script, ShortcutRegistry, export_to_file};
use std::path::Path;

const USAGE: &str = "inkboard <script.json> <out.png> | inkboard --shortcuts";

fn main() {
    env_logger::init();
    log::info!("Starting Inkboard");

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run(&args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> AppResult<()> {
    match args {
        [flag] if flag == "--shortcuts" => {
            ShortcutRegistry::print_all();
            Ok(())
        }
        [script, out] => {
            let script = Script::load(Path::new(script))?;
            let mut board = script.run()?;
            export_to_file(&mut board, Path::new(out))?;
            Ok(())
        }
        _ => Err(AppError::Usage(USAGE.to_string())),
    }
}
