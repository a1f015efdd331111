//! Audio Stego - hide text in WAV files.
//!
//! Works directly on container files, or replays a script of chat events
//! through the same state machine a chat bot would run.

use anyhow::Context;
use audio_stego_store::bot::{
    ConsoleReplier, Consumer, JsonLinesSource, PassthroughResolver, Processor,
};
use audio_stego_store::encoding::{capacity_for, embed, extract, extract_strict, Container};
use audio_stego_store::storage::{AutoSource, FileSource, HttpSource};
use audio_stego_store::{BotConfig, FileStore};
use clap::{Parser, Subcommand};
use log::info;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "audio-stego")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Hide short text messages in WAV files",
    long_about = "Hides text in the least significant bits of WAV sample data and reads it back."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hide a message in a WAV file
    Hide {
        /// Input WAV file
        input: PathBuf,

        /// Text to hide
        message: String,

        /// Output file (default: <input>-hidden.wav)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Read the message hidden in a WAV file
    Extract {
        /// Input WAV file
        input: PathBuf,

        /// Fail if no terminator is found
        #[arg(long)]
        strict: bool,
    },

    /// Show how many bytes of text a WAV file can hold
    Capacity {
        /// Input WAV file
        input: PathBuf,
    },

    /// Replay a JSON-lines script of chat events through the bot
    Replay {
        /// Event script, one JSON event per line
        script: PathBuf,

        #[command(flatten)]
        store: StoreArgs,

        /// Directory receiving delivered audio files
        #[arg(long)]
        outbox: Option<PathBuf>,

        /// Keep waiting for hide text after a delivered file
        #[arg(long)]
        keep_session: bool,
    },

    /// List users that have an uploaded audio file
    Users {
        #[command(flatten)]
        store: StoreArgs,
    },
}

#[derive(clap::Args)]
struct StoreArgs {
    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Storage root (overrides the configuration file)
    #[arg(long)]
    root: Option<PathBuf>,
}

impl StoreArgs {
    fn load(&self) -> anyhow::Result<BotConfig> {
        let mut config = match &self.config {
            Some(path) => BotConfig::load(path)
                .with_context(|| format!("can't load config {}", path.display()))?,
            None => BotConfig::default(),
        };
        if let Some(root) = &self.root {
            config.store.root = root.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Hide {
            input,
            message,
            output,
        } => cmd_hide(&input, &message, output),

        Commands::Extract { input, strict } => cmd_extract(&input, strict),

        Commands::Capacity { input } => cmd_capacity(&input),

        Commands::Replay {
            script,
            store,
            outbox,
            keep_session,
        } => cmd_replay(&script, &store, outbox, keep_session),

        Commands::Users { store } => cmd_users(&store),
    }
}

fn read_container(path: &Path) -> anyhow::Result<Container> {
    let bytes = std::fs::read(path).with_context(|| format!("can't read {}", path.display()))?;
    Ok(Container::parse(&bytes)?)
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "audio".to_string());
    input.with_file_name(format!("{}-hidden.wav", stem))
}

fn cmd_hide(input: &Path, message: &str, output: Option<PathBuf>) -> anyhow::Result<()> {
    let container = read_container(input)?;
    let payload = embed(&container.payload, message.as_bytes())?;
    let output = output.unwrap_or_else(|| default_output(input));

    let hidden = Container::from_parts(container.header, payload);
    std::fs::write(&output, hidden.to_bytes())
        .with_context(|| format!("can't write {}", output.display()))?;

    println!("Hid {} bytes in {}", message.len(), output.display());
    Ok(())
}

fn cmd_extract(input: &Path, strict: bool) -> anyhow::Result<()> {
    let container = read_container(input)?;
    let message = if strict {
        extract_strict(&container.payload)?
    } else {
        extract(&container.payload)
    };

    let mut stdout = io::stdout();
    stdout.write_all(&message)?;
    writeln!(stdout)?;
    Ok(())
}

fn cmd_capacity(input: &Path) -> anyhow::Result<()> {
    let container = read_container(input)?;

    println!("Payload:  {} bytes", container.payload.len());
    println!("Capacity: {} bytes of text", capacity_for(container.payload.len()));
    Ok(())
}

fn cmd_replay(
    script: &Path,
    args: &StoreArgs,
    outbox: Option<PathBuf>,
    keep_session: bool,
) -> anyhow::Result<()> {
    let config = args.load()?;
    let store = FileStore::new(config.store.clone())?;

    let replier = match outbox {
        Some(dir) => ConsoleReplier::with_outbox(dir),
        None => ConsoleReplier::new(),
    };
    let base = script
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let processor = Processor::new(
        store,
        Box::new(replier),
        Box::new(PassthroughResolver),
        Box::new(AutoSource::new(
            HttpSource::new(config.download_timeout())?,
            FileSource::with_base(base),
        )),
    )
    .with_reset_after_delivery(config.reset_after_delivery && !keep_session);

    let source = JsonLinesSource::open(script)
        .with_context(|| format!("can't read script {}", script.display()))?;

    let mut consumer = Consumer::new(
        source,
        processor,
        config.batch_size,
        config.poll_interval(),
    );
    let processed = consumer.drain()?;

    info!("replayed {} events", processed);
    Ok(())
}

fn cmd_users(args: &StoreArgs) -> anyhow::Result<()> {
    let config = args.load()?;
    let store = FileStore::new(config.store)?;

    let users = store.stored_identities()?;
    if users.is_empty() {
        println!("(empty)");
    } else {
        for user in users {
            let capacity = store.capacity(&user).unwrap_or(0);
            println!("{:<24} {:>10} bytes free", user, capacity);
        }
    }
    Ok(())
}
