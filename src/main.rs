use clap::Parser;
use cript_ingest::cli::Cli;
use miette::Result;

/// Logs are off unless --verbose is given; RUST_LOG refines them under --verbose
fn init_tracing(cli: &Cli) {
    let filter = if cli.global.verbose && !cli.global.quiet {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "cript_ingest=info".into())
    } else {
        tracing_subscriber::EnvFilter::new("off")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior so piping `--template` into `head` exits quietly.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    init_tracing(&cli);

    if cli.template {
        return cript_ingest::cli::commands::template::run();
    }
    cript_ingest::cli::commands::upload::run(&cli)
}
