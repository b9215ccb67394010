#![forbid(unsafe_code)]

//! evchan demo binary entry point.

use evchan_demo::cli;
use evchan_demo::events::EventContext;
use evchan_demo::logging;

fn main() {
    let opts = cli::Opts::parse();

    if let Err(e) = logging::init(&opts) {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(1);
    }

    let context = EventContext::with_dispatch_logging(opts.trace_dispatch);
    let log = evchan_demo::run_scripted(&context);
    for action in log.entries() {
        println!("{action}");
    }
    println!("done");
}
