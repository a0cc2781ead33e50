use crate::config::{Config, load_config, merge_init_config};
use crate::parser::parse_hierarchy;
#[cfg(feature = "png")]
use crate::render::write_output_png;
use crate::render::{render_svg, write_output_svg};
use crate::snapshot::write_snapshot;
use crate::workspace::compute_workspace;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "hierviz", version, about = "Group hierarchy visualiser in Rust")]
pub struct Args {
    /// Input file (.hv), markdown with ```hierarchy blocks, or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file; SVG goes to stdout when omitted
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (theme variables and layout overrides)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Width
    #[arg(short = 'w', long = "width", default_value_t = 1200.0)]
    pub width: f32,

    /// Height
    #[arg(short = 'H', long = "height", default_value_t = 800.0)]
    pub height: f32,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
            OutputFormat::Json => "json",
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut base_config = load_config(args.config.as_deref())?;
    base_config.render.width = args.width;
    base_config.render.height = args.height;

    let source = read_source(args.input.as_deref())?;
    let scripts = match source {
        Source::Script(text) => vec![text],
        Source::Markdown(text) => extract_hierarchy_blocks(&text),
    };

    match scripts.len() {
        0 => Err(anyhow::anyhow!("No hierarchy scripts found in input")),
        1 => render_one(
            &scripts[0],
            &base_config,
            args.output.as_deref(),
            args.output_format,
        ),
        count => {
            // Markdown input with several fenced scripts gets numbered outputs.
            let outputs = numbered_outputs(args.output.as_deref(), args.output_format, count)?;
            for (script, output) in scripts.iter().zip(&outputs) {
                render_one(script, &base_config, Some(output.as_path()), args.output_format)?;
            }
            Ok(())
        }
    }
}

fn render_one(
    source: &str,
    base_config: &Config,
    output: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let parsed = parse_hierarchy(source)?;
    let mut config = base_config.clone();
    if let Some(init_config) = parsed.init_config {
        config = merge_init_config(config, init_config);
    }
    let workspace = compute_workspace(&parsed.hierarchy, &config.layout)?;

    match format {
        OutputFormat::Svg => {
            let svg = render_svg(&workspace, &config.theme, &config.layout);
            write_output_svg(&svg, output)?;
        }
        OutputFormat::Png => {
            #[cfg(feature = "png")]
            {
                let svg = render_svg(&workspace, &config.theme, &config.layout);
                let output = output
                    .ok_or_else(|| anyhow::anyhow!("Output path required for png output"))?;
                write_output_png(&svg, output, &config.render)?;
            }
            #[cfg(not(feature = "png"))]
            {
                return Err(anyhow::anyhow!(
                    "PNG output requires building with the 'png' feature"
                ));
            }
        }
        OutputFormat::Json => {
            let output =
                output.ok_or_else(|| anyhow::anyhow!("Output path required for json output"))?;
            write_snapshot(output, &workspace)?;
        }
    }
    Ok(())
}

enum Source {
    Script(String),
    Markdown(String),
}

fn read_source(path: Option<&Path>) -> Result<Source> {
    let Some(path) = path.filter(|p| *p != Path::new("-")) else {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(Source::Script(buf));
    };

    let content = std::fs::read_to_string(path)?;
    let markdown = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("md") | Some("markdown")
    );
    Ok(if markdown {
        Source::Markdown(content)
    } else {
        Source::Script(content)
    })
}

// Collects the bodies of ```hierarchy / ~~~hierarchy fenced blocks.
fn extract_hierarchy_blocks(input: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut open_fence: Option<&str> = None;
    let mut body = String::new();

    for line in input.lines() {
        let trimmed = line.trim();
        match open_fence {
            None => {
                open_fence = ["```", "~~~"].into_iter().find(|fence| {
                    trimmed
                        .strip_prefix(fence)
                        .is_some_and(|rest| rest.trim_start().starts_with("hierarchy"))
                });
            }
            Some(fence) if trimmed == fence => {
                blocks.push(std::mem::take(&mut body));
                open_fence = None;
            }
            Some(_) => {
                if !body.is_empty() {
                    body.push('\n');
                }
                body.push_str(line);
            }
        }
    }

    blocks
}

fn numbered_outputs(
    output: Option<&Path>,
    format: OutputFormat,
    count: usize,
) -> Result<Vec<PathBuf>> {
    let ext = format.extension();
    let base = output.ok_or_else(|| anyhow::anyhow!("Output path required for markdown input"))?;

    if base.is_dir() {
        return Ok((1..=count)
            .map(|n| base.join(format!("hierarchy-{n}.{ext}")))
            .collect());
    }

    let stem = base
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("hierarchy");
    let dir = base.parent().unwrap_or_else(|| Path::new("."));
    Ok((1..=count)
        .map(|n| dir.join(format!("{stem}-{n}.{ext}")))
        .collect())
}
