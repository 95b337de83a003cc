mod cli;
mod engine;

use std::process::exit;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use clap::error::ErrorKind;
use clap::CommandFactory;
use clap::Parser;
use env_logger::Builder;
use env_logger::Env;
use log::error;
use uclient::bootstrap::prepare;
use uclient::session::LaunchRequest;
use uclient::session::SessionLauncher;

use crate::cli::Args;
use crate::cli::BinResult;
use crate::engine::EngineHandoff;

// uclient -t -S -u alice -w secret turn.example.org
// uclient -y -m 10 -n 100 turn.example.org
fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            exit(code);
        }
    };
    Builder::from_env(Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }))
        .format_target(cfg!(debug_assertions))
        .init();

    let Some(target) = args.target.clone() else {
        eprintln!("{}", Args::command().render_long_help());
        exit(255);
    };

    if let Err(e) = run(target, args) {
        error!("{e}");
        exit(255);
    }
}

fn run(target: String, args: Args) -> BinResult<()> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let config = prepare(args.into_raw(), now)?;
    let request = LaunchRequest::new(&target, &config);
    EngineHandoff::default().launch(request, &config)?;
    Ok(())
}
