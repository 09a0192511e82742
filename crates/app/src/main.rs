use anyhow::{Context, Result};
use assistant::Assistant;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::{Parser, Subcommand};
use shared::settings::{config_path, load_settings_or_default, save_settings};
use shared::surface::SurfaceKind;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "assistant")]
#[command(about = "Armin AI - Persian multi-tool assistant on Gemini")]
struct Args {
    /// Settings file (default: <config dir>/armin_assistant/settings.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the current settings to the settings file
    Init,
    /// Interactive chat (/reset starts over, /exit quits)
    Chat,
    /// Ask questions about a file (/file <path> swaps it, /remove drops it)
    Ask { file: PathBuf },
    /// Summarize text from a file, or from stdin
    Summarize {
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Generate an image
    Image {
        prompt: String,
        #[arg(long, default_value = "image.jpg")]
        out: PathBuf,
    },
    /// Generate a presentation outline and export it as .pptx
    Present {
        topic: String,
        #[arg(long)]
        slides: Option<u32>,
        #[arg(long)]
        tone: Option<String>,
        /// Defaults to the configured download folder
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let args = Args::parse();
    let settings = load_settings_or_default(args.config.as_deref());

    if let Command::Init = args.command {
        let path = args
            .config
            .or_else(config_path)
            .context("no config directory on this platform; pass --config")?;
        save_settings(&settings, &path).with_context(|| format!("writing {}", path.display()))?;
        println!("{}", path.display());
        return Ok(());
    }
    let assistant = Assistant::from_env(settings);

    if let Some(fault) = assistant.credential_fault() {
        eprintln!("{}", fault.user_message());
        std::process::exit(1);
    }

    match args.command {
        Command::Init => Ok(()),
        Command::Chat => run_chat(&assistant).await,
        Command::Ask { file } => run_ask(&assistant, &file).await,
        Command::Summarize { file } => run_summarize(&assistant, file.as_deref()).await,
        Command::Image { prompt, out } => run_image(&assistant, &prompt, &out).await,
        Command::Present {
            topic,
            slides,
            tone,
            out_dir,
        } => run_present(&assistant, &topic, slides, tone.as_deref(), out_dir).await,
    }
}

fn banner(kind: SurfaceKind) {
    println!("== Armin AI | {} ==", kind.display_name());
}

async fn run_chat(assistant: &Assistant) -> Result<()> {
    banner(SurfaceKind::Chat);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "/exit" | "/quit" => break,
            "/reset" => {
                assistant.chat.reset();
                continue;
            }
            _ => {}
        }
        if assistant.chat.submit(&line).await {
            if let Some(reply) = assistant.chat.snapshot().conversation.last() {
                println!("{}\n", reply.text);
            }
        }
    }
    Ok(())
}

async fn run_ask(assistant: &Assistant, file: &Path) -> Result<()> {
    banner(SurfaceKind::FileQna);
    let surface = &assistant.file_qna;
    if !surface.load_file(file).await {
        if let Some(err) = surface.snapshot().file_error {
            eprintln!("{}", err);
        }
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line == "/exit" || line == "/quit" {
            break;
        }
        if line == "/remove" {
            surface.remove_file();
            continue;
        }
        if let Some(path) = line.strip_prefix("/file ") {
            if !surface.load_file(Path::new(path.trim())).await {
                if let Some(err) = surface.snapshot().file_error {
                    eprintln!("{}", err);
                }
            }
            continue;
        }

        if surface.submit(line).await {
            if let Some(reply) = surface.snapshot().conversation.last() {
                println!("{}\n", reply.text);
            }
        } else if surface.snapshot().attachment.is_none() {
            eprintln!("no file attached; use /file <path>");
        }
    }
    Ok(())
}

async fn run_summarize(assistant: &Assistant, file: Option<&Path>) -> Result<()> {
    let source = match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        }
    };

    assistant.summarizer.submit(&source).await;
    let state = assistant.summarizer.snapshot();
    if let Some(summary) = state.summary {
        println!("{}", summary);
    } else if let Some(err) = state.error {
        eprintln!("{}", err);
    }
    Ok(())
}

async fn run_image(assistant: &Assistant, prompt: &str, out: &Path) -> Result<()> {
    assistant.image.submit(prompt).await;
    let state = assistant.image.snapshot();
    if let Some(image) = state.image {
        let bytes = STANDARD
            .decode(&image.base64)
            .context("image payload is not valid base64")?;
        tokio::fs::write(out, bytes)
            .await
            .with_context(|| format!("writing {}", out.display()))?;
        println!("{}", out.display());
    } else if let Some(err) = state.error {
        eprintln!("{}", err);
    }
    Ok(())
}

async fn run_present(
    assistant: &Assistant,
    topic: &str,
    slides: Option<u32>,
    tone: Option<&str>,
    out_dir: Option<PathBuf>,
) -> Result<()> {
    let surface = &assistant.presentation;
    if let Some(count) = slides {
        if !surface.set_slide_count(count) {
            eprintln!("slide count must be at least 2; keeping {}", surface.snapshot().slide_count);
        }
    }
    if let Some(tone) = tone {
        surface.set_tone(tone);
    }

    let mut rx = surface.subscribe();
    let progress = tokio::spawn(async move {
        let mut shown = None;
        while rx.changed().await.is_ok() {
            let message = rx.borrow_and_update().loading_message;
            if let Some(text) = message.filter(|m| shown != Some(*m)) {
                eprintln!("{}", text);
            }
            shown = message;
        }
    });
    surface.submit(topic).await;
    progress.abort();

    let state = surface.snapshot();
    let Some(outline) = state.outline else {
        if let Some(err) = state.error {
            eprintln!("{}", err);
        }
        return Ok(());
    };

    println!("# {}", outline.title);
    for slide in &outline.slides {
        println!("\n## {}", slide.title);
        for point in &slide.content {
            println!("- {}", point);
        }
    }

    let dir = out_dir.unwrap_or_else(|| assistant.settings().export_dir());
    if let Some(path) = surface.export(&dir)? {
        println!("\n{}", path.display());
    }
    Ok(())
}
