//! redwire CLI Client
//!
//! Runs a single command against a Redis server and prints the reply.

use std::process::ExitCode;

use clap::Parser;
use redwire::{with_connection_config, Arg, CommandRegistry, Config, StringMode};
use tracing_subscriber::{fmt, EnvFilter};

/// redwire CLI
#[derive(Parser, Debug)]
#[command(name = "redwire-cli")]
#[command(about = "Send one command to a Redis server")]
#[command(version)]
struct Args {
    /// Server host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(short, long, default_value = "6379")]
    port: u16,

    /// Password sent with AUTH after connecting
    #[arg(short = 'a', long)]
    password: Option<String>,

    /// Database index
    #[arg(short = 'n', long, default_value = "0")]
    db: u32,

    /// Connect timeout in milliseconds
    #[arg(long, default_value = "5000")]
    connect_timeout_ms: u64,

    /// Read timeout in milliseconds (0 = wait forever)
    #[arg(long, default_value = "0")]
    read_timeout_ms: u64,

    /// Keep bulk replies as raw bytes instead of text
    #[arg(long)]
    binary: bool,

    /// List the built-in commands and exit
    #[arg(long)]
    list: bool,

    /// Command name followed by its arguments
    #[arg(trailing_var_arg = true)]
    command: Vec<String>,
}

fn main() -> ExitCode {
    // Logs go to stderr so replies on stdout stay clean
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let registry = CommandRegistry::with_builtin_commands();

    if args.list {
        for name in registry.names() {
            println!("{}", name);
        }
        return ExitCode::SUCCESS;
    }

    let Some((name, rest)) = args.command.split_first() else {
        eprintln!("no command given (try --list)");
        return ExitCode::FAILURE;
    };

    let mut builder = Config::builder()
        .host(&args.host)
        .port(args.port)
        .db(args.db)
        .connect_timeout_ms(args.connect_timeout_ms)
        .read_timeout_ms(args.read_timeout_ms);
    if let Some(password) = &args.password {
        builder = builder.password(password);
    }
    if args.binary {
        builder = builder.string_mode(StringMode::Binary);
    }
    let config = builder.build();

    tracing::info!("Connecting to {}", config.addr());

    let command_args: Vec<Arg> = rest.iter().map(Arg::from).collect();
    match with_connection_config(&config, |conn| registry.call(conn, name, &command_args)) {
        Ok(value) => {
            println!("{}", value);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Command failed: {}", e);
            eprintln!("(error) {}", e);
            ExitCode::FAILURE
        }
    }
}
