//! sovits-cli — GPT-SoVITS 服务的命令行客户端
//!
//! Usage:
//!   sovits-cli tts --text <t> --text-lang <l> --ref <path> --prompt-lang <l> [options]
//!   sovits-cli control <restart|exit> [--get]
//!   sovits-cli set-gpt-weights <path> [--get]
//!   sovits-cli set-sovits-weights <path> [--get]

use gpt_sovits_client::{
    ControlCommand, Error, ErrorContext, MediaType, SynthesisClient, SynthesisRequest,
    WeightsTarget,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let result = match args[1].as_str() {
        "tts" => cmd_tts(&args[2..]).await,
        "control" => cmd_control(&args[2..]).await,
        "set-gpt-weights" => cmd_weights(WeightsTarget::Gpt, &args[2..]).await,
        "set-sovits-weights" => cmd_weights(WeightsTarget::Sovits, &args[2..]).await,
        "version" | "--version" | "-V" => {
            println!("sovits-cli {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"sovits-cli — GPT-SoVITS 命令行客户端

USAGE:
    sovits-cli <COMMAND> [OPTIONS]

COMMANDS:
    tts                         Synthesize speech and write the audio to a file
        --text <text>               Text to synthesize (required)
        --text-lang <lang>          Language of the text (required)
        --ref <path>                Reference audio path on the server (required)
        --prompt-lang <lang>        Language of the prompt text (required)
        --prompt-text <text>        Transcript of the reference audio
        --media-type <type>         wav | raw | ogg | aac (default wav)
        --speed <factor>            Speed factor (default 1.0)
        --seed <n>                  Random seed (default -1)
        --out <file>                Output file (default out.<ext>)
        --get                       Use the GET form of /tts
    control <restart|exit>      Send a control command
    set-gpt-weights <path>      Load GPT weights on the server
    set-sovits-weights <path>   Load SoVITS weights on the server
    version                     Show version information
    help                        Show this help message

GLOBAL OPTIONS:
    --base-url <url>            Server address (default http://127.0.0.1:9880)
    --get                       Use GET instead of POST

ENVIRONMENT:
    GPT_SOVITS_BASE_URL         Server address
    GPT_SOVITS_TIMEOUT_SECS     Per-request timeout (default 60)
    GPT_SOVITS_PROXY_URL        HTTP proxy
    RUST_LOG                    Log filter (default warn)"#
    );
}

fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|a| a == name)
}

fn required<'a>(args: &'a [String], name: &str) -> Result<&'a str, Error> {
    flag_value(args, name).ok_or_else(|| {
        Error::validation_with_context(
            format!("missing required option {name}"),
            ErrorContext::new().with_field_path(name).with_source("cli"),
        )
    })
}

fn parse_number<T: std::str::FromStr>(args: &[String], name: &str) -> Result<Option<T>, Error> {
    match flag_value(args, name) {
        None => Ok(None),
        Some(raw) => raw.parse::<T>().map(Some).map_err(|_| {
            Error::validation_with_context(
                format!("invalid value '{raw}' for {name}"),
                ErrorContext::new().with_field_path(name).with_source("cli"),
            )
        }),
    }
}

/// First argument that is neither a flag nor a flag's value.
fn positional(args: &[String]) -> Option<&str> {
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if arg == "--base-url" {
            skip_next = true;
            continue;
        }
        if arg.starts_with("--") {
            continue;
        }
        return Some(arg);
    }
    None
}

fn client(args: &[String]) -> Result<SynthesisClient, Error> {
    let mut builder = SynthesisClient::builder();
    if let Some(url) = flag_value(args, "--base-url") {
        builder = builder.base_url(url);
    }
    builder.build()
}

async fn cmd_tts(args: &[String]) -> Result<(), Error> {
    let media_type = match flag_value(args, "--media-type") {
        Some(raw) => raw.parse::<MediaType>()?,
        None => MediaType::Wav,
    };
    let mut request = SynthesisRequest::new(
        required(args, "--text")?,
        required(args, "--text-lang")?,
        required(args, "--ref")?,
        required(args, "--prompt-lang")?,
    )
    .with_prompt_text(flag_value(args, "--prompt-text").unwrap_or_default())
    .with_media_type(media_type);
    if let Some(speed) = parse_number::<f64>(args, "--speed")? {
        request = request.with_speed_factor(speed);
    }
    if let Some(seed) = parse_number::<i64>(args, "--seed")? {
        request = request.with_seed(seed);
    }

    let client = client(args)?;
    let result = if has_flag(args, "--get") {
        client.synthesize_via_get(&request).await?
    } else {
        client.synthesize(&request).await?
    };
    let audio = result.into_audio()?;

    let out = flag_value(args, "--out")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(format!("out.{}", media_type.extension())));
    std::fs::write(&out, &audio)?;
    println!(
        "Wrote {} bytes of {} to {}",
        audio.len(),
        media_type.mime_type(),
        out.display()
    );
    Ok(())
}

async fn cmd_control(args: &[String]) -> Result<(), Error> {
    let command: ControlCommand = positional(args)
        .ok_or_else(|| {
            Error::validation_with_context(
                "control requires a command (restart or exit)",
                ErrorContext::new().with_field_path("command").with_source("cli"),
            )
        })?
        .parse()?;
    let client = client(args)?;
    if has_flag(args, "--get") {
        client.send_control_command_via_get(command).await?;
    } else {
        client.send_control_command(command).await?;
    }
    println!("Sent {command}");
    Ok(())
}

async fn cmd_weights(target: WeightsTarget, args: &[String]) -> Result<(), Error> {
    let path = positional(args).ok_or_else(|| {
        Error::validation_with_context(
            "a weights path is required",
            ErrorContext::new().with_field_path("weights_path").with_source("cli"),
        )
    })?;
    let client = client(args)?;
    if has_flag(args, "--get") {
        client.update_weights_via_get(target, path).await?;
    } else {
        client.update_weights(target, path).await?;
    }
    println!("{} weights set to {path}", target.label());
    Ok(())
}
