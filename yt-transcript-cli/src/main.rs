use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;
use yt_transcript::{Envelope, FetchOptions, TranscriptSource, YouTubeClient};

const PROGRAM: &str = "fetch-transcript";

#[derive(Parser)]
#[command(
    name = PROGRAM,
    about = "Fetch a YouTube transcript and print it as JSON",
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Cli {
    /// YouTube video id.
    video_id: String,
}

/// The video id, or `None` unless exactly one argument was given.
///
/// Arity is taken from the raw argument list. The single argument is then
/// handed to clap behind a `--`, so `--`, `--help` and other hyphenated
/// values come through as the id itself.
fn video_id_from_args<I, T>(args: I) -> Option<String>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::into);
    let program = args.next().unwrap_or_else(|| PROGRAM.into());
    let [arg] = <[OsString; 1]>::try_from(args.collect::<Vec<_>>()).ok()?;
    let cli = Cli::try_parse_from([program, OsString::from("--"), arg]).ok()?;
    Some(cli.video_id)
}

/// Validate the arguments, then fetch through the source `connect` builds.
///
/// `connect` only runs once the arguments are known to be valid, so a usage
/// error never touches the network.
async fn run<I, T, S, F>(args: I, connect: F) -> Envelope
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
    S: TranscriptSource,
    F: FnOnce() -> yt_transcript::Result<S>,
{
    let Some(video_id) = video_id_from_args(args) else {
        return Envelope::usage(PROGRAM);
    };
    match connect() {
        Ok(source) => Envelope::from_result(source.fetch(&video_id).await),
        Err(e) => Envelope::from_error(&e),
    }
}

fn emit(envelope: &Envelope) -> ExitCode {
    let (json, success) = match envelope.to_json() {
        Ok(json) => (json, envelope.is_success()),
        Err(e) => match Envelope::from_error(&e).to_json() {
            Ok(json) => (json, false),
            Err(_) => return ExitCode::FAILURE,
        },
    };
    let mut stdout = std::io::stdout().lock();
    let written = writeln!(stdout, "{json}").and_then(|()| stdout.flush());
    if written.is_ok() && success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Silent unless RUST_LOG asks for output; stdout carries only the envelope.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::OFF.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let envelope = run(std::env::args_os(), || {
        YouTubeClient::new(FetchOptions::default())
    })
    .await;
    emit(&envelope)
}
