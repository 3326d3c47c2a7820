use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use genui_core::{
    render_buffer, Block, RenderNode, RenderedSegment, Renderer, SegmentKind, StreamRenderer,
};
use genui_html::{page, segments_to_html, RenderConfig, Theme};
use std::io::Read;
use std::path::PathBuf;
use tracing::info;

/// Render an assistant message containing fenced UI blocks.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Transcript file. Reads stdin when omitted or "-".
    input: Option<PathBuf>,

    #[arg(long, env = "GENUI_CONFIG", help = "YAML render config.")]
    config: Option<PathBuf>,

    #[arg(long, help = "Fence info string that marks UI blocks (default: ui).")]
    fence_tag: Option<String>,

    #[arg(long, help = "Maximum nesting depth of rendered trees.")]
    max_depth: Option<usize>,

    #[arg(long, help = "Page title for --format page.")]
    title: Option<String>,

    #[arg(long, value_enum, default_value_t = Format::Page)]
    format: Format,

    #[arg(
        long,
        help = "Replay the transcript in chunks of N bytes and print one frame per chunk."
    )]
    chunk_size: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// HTML fragment.
    Html,
    /// Standalone HTML document.
    Page,
    /// Rendered segments as JSON.
    Tree,
    /// One summary line per segment.
    Segments,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => RenderConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => RenderConfig::default(),
    };
    if let Some(tag) = &cli.fence_tag {
        config.fence_tag = tag.clone();
    }
    if let Some(max_depth) = cli.max_depth {
        config.max_depth = max_depth;
    }
    if let Some(title) = &cli.title {
        config.title = title.clone();
    }
    config.validate().context("Invalid render settings")?;

    let transcript = read_input(cli.input.as_ref())?;
    let segmenter = config.segmenter()?;
    let registry = config.registry()?;
    let renderer = Renderer::new(&registry).with_max_depth(config.max_depth);

    match cli.chunk_size {
        Some(0) => bail!("--chunk-size must be at least 1"),
        Some(chunk_size) => {
            let mut stream = StreamRenderer::new(segmenter, renderer);
            let mut start = 0;
            let mut frame = 0;
            while start < transcript.len() {
                let mut end = (start + chunk_size).min(transcript.len());
                while !transcript.is_char_boundary(end) {
                    end += 1;
                }
                let segments = stream.push(&transcript[start..end]);
                frame += 1;
                println!("--- frame {} ({} bytes) ---", frame, end);
                print_segments(&segments, cli.format, &config)?;
                start = end;
            }
            info!(frames = frame, "replay finished");
        }
        None => {
            let segments = render_buffer(&transcript, &segmenter, &renderer);
            let issues: usize = segments.iter().map(|s| s.issues.len()).sum();
            info!(segments = segments.len(), issues, "rendered transcript");
            print_segments(&segments, cli.format, &config)?;
        }
    }
    Ok(())
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn print_segments(segments: &[RenderedSegment], format: Format, config: &RenderConfig) -> Result<()> {
    match format {
        Format::Html => println!("{}", body(segments, &config.theme)?),
        Format::Page => print!("{}", page(&config.title, &body(segments, &config.theme)?)?),
        Format::Tree => println!("{}", serde_json::to_string_pretty(segments)?),
        Format::Segments => {
            for (index, rendered) in segments.iter().enumerate() {
                println!("{}", summary_line(index, rendered));
            }
        }
    }
    Ok(())
}

fn body(segments: &[RenderedSegment], theme: &Theme) -> Result<String> {
    Ok(segments_to_html(segments, theme)?)
}

fn summary_line(index: usize, rendered: &RenderedSegment) -> String {
    let segment = &rendered.segment;
    let kind = match segment.kind {
        SegmentKind::Text => "text",
        SegmentKind::Ui if segment.closed => "ui",
        SegmentKind::Ui => "ui (open)",
    };
    let state = match &rendered.block {
        Block::Text(text) => format!("{} chars", text.chars().count()),
        Block::Widget(tree) => format!("widget {}", widget_name(tree)),
        Block::Loading => "loading".to_string(),
        Block::Omitted => "omitted".to_string(),
    };
    let mut line = format!(
        "{:>3} {:<9} {:>5}..{:<5} {}",
        index, kind, segment.span.start, segment.span.end, state
    );
    for issue in &rendered.issues {
        line.push_str(&format!("\n      ! {}", issue));
    }
    line
}

fn widget_name(tree: &RenderNode) -> String {
    match tree {
        RenderNode::Text { .. } => "text".to_string(),
        RenderNode::Element { tag, .. } => tag.to_string(),
        RenderNode::Component { kind, .. } => kind.to_string(),
    }
}
