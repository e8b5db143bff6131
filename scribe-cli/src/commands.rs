//! CLI subcommand handlers.

use crate::Commands;
use crate::ConfigAction;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use serde_json::{Map, Value};
use tracing::{debug, info};

use scribe_core::{
    LocalStore, OpenAiVisionAnalyzer, Project, RawAnalysis, StructuredContent, Whiteboard,
    WhiteboardProcessor,
};
use scribe_export::{ExportFormat, ExportRecord, Exporter, ProjectMeta};

/// Handle a CLI subcommand.
pub async fn handle_command(command: Commands, workspace: &Path) -> anyhow::Result<()> {
    match command {
        Commands::Structure { input, output } => handle_structure(&input, output.as_deref()),
        Commands::Tasks { input } => handle_tasks(input.as_deref()),
        Commands::Concepts { input } => handle_concepts(input.as_deref()),
        Commands::Cluster { input } => handle_cluster(&input),
        Commands::Analyze {
            image,
            mime,
            output,
        } => handle_analyze(&image, mime, output.as_deref(), workspace).await,
        Commands::Export {
            format,
            title,
            description,
            options,
            contents,
            output,
        } => {
            let request = ExportRequest {
                format,
                title,
                description,
                options: options.into_iter().collect(),
                contents,
                output,
            };
            handle_export(request, workspace).map(|_| ())
        }
        Commands::Formats => handle_formats(),
        Commands::Config { action } => handle_config(action, workspace),
    }
}

/// Parse `key=value`; the value is read as JSON when it parses, else as a string.
pub fn parse_option(s: &str) -> Result<(String, Value), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing option name in '{s}'"));
    }
    let value = serde_json::from_str(value.trim())
        .unwrap_or_else(|_| Value::String(value.trim().to_string()));
    Ok((key.to_string(), value))
}

fn read_input(input: Option<&Path>) -> anyhow::Result<String> {
    match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => Ok(std::io::read_to_string(std::io::stdin())?),
    }
}

fn write_output(text: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "Wrote output");
        }
        None => println!("{text}"),
    }
    Ok(())
}

/// Load a document that is either structured content or a raw analysis.
fn load_content(path: &Path) -> anyhow::Result<StructuredContent> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;

    if value.get("hierarchy").is_some() {
        debug!(path = %path.display(), "Loading structured content");
        return Ok(serde_json::from_value(value)?);
    }
    debug!(path = %path.display(), "Structuring raw analysis");
    let raw: RawAnalysis = serde_json::from_value(value)?;
    Ok(scribe_core::structure_content(&raw))
}

fn handle_structure(input: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let raw = RawAnalysis::from_json(&text)
        .with_context(|| format!("{} is not a valid analysis", input.display()))?;
    let content = scribe_core::structure_content(&raw);
    write_output(&serde_json::to_string_pretty(&content)?, output)
}

fn handle_tasks(input: Option<&Path>) -> anyhow::Result<()> {
    let text = read_input(input)?;
    let tasks = scribe_core::extract_tasks(&text);
    println!("{}", serde_json::to_string_pretty(&tasks)?);
    Ok(())
}

fn handle_concepts(input: Option<&Path>) -> anyhow::Result<()> {
    let text = read_input(input)?;
    let concepts = scribe_core::concepts::extract_concepts(&text);
    println!("{}", serde_json::to_string_pretty(&concepts)?);
    Ok(())
}

fn handle_cluster(input: &Path) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    // Both raw and structured documents carry `sections`.
    let raw = RawAnalysis::from_json(&text)?;
    let clusters = scribe_core::cluster_sections(&raw.sections);
    println!("{}", serde_json::to_string_pretty(&clusters)?);
    Ok(())
}

fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("tif" | "tiff") => "image/tiff",
        _ => "image/jpeg",
    }
}

async fn handle_analyze(
    image: &Path,
    mime: Option<String>,
    output: Option<&Path>,
    workspace: &Path,
) -> anyhow::Result<()> {
    let config = scribe_core::config::load_config(Some(workspace), None)
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
    let bytes = std::fs::read(image).with_context(|| format!("Failed to read {}", image.display()))?;

    let analyzer = OpenAiVisionAnalyzer::new(&config.vision)?;
    let processor = WhiteboardProcessor::new(Arc::new(analyzer), &config.vision);

    let filename = image
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "whiteboard".to_string());
    let mime = mime.unwrap_or_else(|| guess_mime(image).to_string());
    let mut whiteboard = Whiteboard::new("cli", filename, mime);

    let content = processor.process(&mut whiteboard, &bytes).await?;
    write_output(&serde_json::to_string_pretty(&content)?, output)
}

/// Arguments of `scribe export`.
struct ExportRequest {
    format: Option<String>,
    title: Option<String>,
    description: Option<String>,
    options: Map<String, Value>,
    contents: Vec<PathBuf>,
    output: Option<PathBuf>,
}

/// Render and store an export; returns the record of the stored artifact.
fn handle_export(request: ExportRequest, workspace: &Path) -> anyhow::Result<ExportRecord> {
    let config = scribe_core::config::load_config(Some(workspace), None)
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    let format_id = request.format.unwrap_or(config.export.default_format);
    let format: ExportFormat = format_id.parse()?;

    let contents = request
        .contents
        .iter()
        .map(|path| load_content(path))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let project = Project::new(request.title, request.description);
    let meta = ProjectMeta::from(&project);

    let root = request.output.unwrap_or(config.storage.root);
    let root = if root.is_absolute() {
        root
    } else {
        workspace.join(root)
    };
    let store = LocalStore::new(&root);

    let mut record = ExportRecord::new(&project.id, format, request.options);
    let artifact = Exporter::new().export_to_store(&mut record, &contents, &meta, &store)?;

    let locator = record.locator.clone().unwrap_or_default();
    println!(
        "{} ({} bytes) -> {}",
        artifact.filename,
        artifact.size(),
        root.join(&locator).display()
    );
    Ok(record)
}

fn handle_formats() -> anyhow::Result<()> {
    for info in scribe_export::format_catalog() {
        println!(
            "{:<11} {:<11} .{:<6} {}",
            info.id.as_str(),
            info.name,
            info.extension,
            info.description
        );
        for option in &info.options {
            let choices = if option.options.is_empty() {
                String::new()
            } else {
                format!(" [{}]", option.options.join("|"))
            };
            println!("    {} = {}{}", option.key, option.default, choices);
        }
    }
    Ok(())
}

fn handle_config(action: ConfigAction, workspace: &Path) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let config_dir = workspace.join(".scribe");
            std::fs::create_dir_all(&config_dir)?;

            let config_path = config_dir.join("config.toml");
            if config_path.exists() {
                println!(
                    "Configuration file already exists at: {}",
                    config_path.display()
                );
                return Ok(());
            }

            let default_config = scribe_core::ScribeConfig::default();
            let toml_str = toml::to_string_pretty(&default_config)?;
            std::fs::write(&config_path, &toml_str)?;
            println!(
                "Created default configuration at: {}",
                config_path.display()
            );
            Ok(())
        }
        ConfigAction::Show => {
            let config = scribe_core::config::load_config(Some(workspace), None)
                .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
            let toml_str = toml::to_string_pretty(&config)?;
            println!("{}", toml_str);
            Ok(())
        }
    }
}
