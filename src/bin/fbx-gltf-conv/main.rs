//! FBX-glTF-conv CLI - convert and inspect binary FBX files.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use fbx_gltf_conv::fbx::{FbxImporter, FbxNode, FbxScene, FbxStream};
use fbx_gltf_conv::util::is_data_uri;
use fbx_gltf_conv::{ConvertOptions, Converter, FileWriter, HierarchyConverter};

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("FBX_GLTF_CONV_BUILD_DATE"), ")");

#[derive(Parser, Debug)]
#[command(name = "fbx-gltf-conv", version = VERSION, about = "Convert binary FBX scenes to glTF 2.0")]
struct Cli {
    /// More output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Errors only
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert an FBX file to a .gltf document
    #[command(visible_alias = "c")]
    Convert {
        input: PathBuf,

        /// Output document (default: input with a .gltf extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Embed every buffer as a data URI
        #[arg(long)]
        inline_buffers: bool,

        /// Directory with extracted embedded media
        #[arg(long, value_name = "DIR")]
        fbm_dir: Option<PathBuf>,

        /// Embed buffers smaller than N bytes instead of writing .bin files
        #[arg(long, value_name = "N", default_value_t = 0)]
        min_external_size: usize,

        /// Resolve buffers on a worker pool
        #[arg(long)]
        parallel: bool,

        /// Worker pool size
        #[arg(long, value_name = "N", requires = "parallel")]
        threads: Option<usize>,
    },

    /// Show a file summary
    #[command(visible_alias = "i")]
    Info { file: PathBuf },

    /// Show the record hierarchy
    #[command(visible_alias = "t")]
    Tree {
        file: PathBuf,

        /// Maximum depth to print
        #[arg(short, long)]
        depth: Option<usize>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Command::Convert {
            input,
            output,
            inline_buffers,
            fbm_dir,
            min_external_size,
            parallel,
            threads,
        } => {
            let output = output.unwrap_or_else(|| input.with_extension("gltf"));
            let mut options = ConvertOptions::new()
                .with_verbose(cli.verbose > 0)
                .with_inline_buffers(inline_buffers)
                .with_parallel_buffers(parallel);
            if let Some(dir) = fbm_dir {
                options = options.with_fbm_dir(dir);
            }
            if let Some(n) = threads {
                options = options.with_threads(n);
            }
            cmd_convert(&input, &output, options, min_external_size)
        }
        Command::Info { file } => cmd_info(&file),
        Command::Tree { file, depth } => cmd_tree(&file, depth),
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_convert(input: &Path, output: &Path, options: ConvertOptions, min_external_size: usize) -> anyhow::Result<()> {
    if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    let writer = Arc::new(FileWriter::for_output(output).with_min_size(min_external_size));
    let options = if options.use_inline_encoding_for_buffers {
        options
    } else {
        options.with_shared_writer(writer.clone())
    };

    let mut converter = Converter::new(options, FbxImporter::new(), HierarchyConverter::new())?;
    let json = converter
        .convert(input)
        .with_context(|| format!("converting {}", input.display()))?;

    let text = serde_json::to_string_pretty(&json)?;
    fs::write(output, text).with_context(|| format!("writing {}", output.display()))?;

    for path in writer.written() {
        debug!(path = %path.display(), "external buffer");
    }
    let inline_bytes = inline_byte_count(&json);
    info!(
        output = %output.display(),
        external_buffers = writer.written().len(),
        inline_bytes,
        "conversion done"
    );
    Ok(())
}

/// Total `byteLength` of the buffers embedded as data URIs.
fn inline_byte_count(json: &serde_json::Value) -> u64 {
    json["buffers"]
        .as_array()
        .into_iter()
        .flatten()
        .filter(|b| b["uri"].as_str().is_some_and(is_data_uri))
        .filter_map(|b| b["byteLength"].as_u64())
        .sum()
}

fn load(path: &Path) -> anyhow::Result<FbxScene> {
    let stream = FbxStream::open(path).with_context(|| format!("opening {}", path.display()))?;
    let nodes = stream
        .read_nodes()
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(FbxScene::new(stream.version(), nodes))
}

fn cmd_info(path: &Path) -> anyhow::Result<()> {
    let scene = load(path)?;

    let mut classes: BTreeMap<&str, usize> = BTreeMap::new();
    let objects = scene.objects();
    for object in &objects {
        *classes.entry(object.class).or_default() += 1;
    }
    let records: usize = scene.nodes().iter().map(FbxNode::count).sum();

    println!("File: {}", path.display());
    println!("Version: {} ({})", scene.version_string(), scene.version());
    if let Some(name) = scene.document_name() {
        println!("Document: {}", name);
    }
    println!("Records: {}", records);
    let sections: Vec<&str> = scene.nodes().iter().map(|n| n.name.as_str()).collect();
    println!("Sections: {}", sections.join(", "));
    println!();
    println!("Objects:");
    for (class, count) in &classes {
        println!("  {:<16} {}", class, count);
    }
    println!();
    println!("Total objects: {}", objects.len());
    println!("Connections: {}", scene.connections().len());
    Ok(())
}

fn cmd_tree(path: &Path, depth: Option<usize>) -> anyhow::Result<()> {
    let scene = load(path)?;

    println!("File: {}", path.display());
    println!();
    for node in scene.nodes() {
        print_tree(node, 0, depth.unwrap_or(usize::MAX));
    }
    Ok(())
}

fn print_tree(node: &FbxNode, level: usize, max_depth: usize) {
    let props: Vec<String> = node.properties.iter().map(|p| p.summary()).collect();
    println!("{}{}: {}", "  ".repeat(level), node.name, props.join(", "));

    if level + 1 >= max_depth {
        if !node.children.is_empty() {
            println!("{}... {} more", "  ".repeat(level + 1), node.count() - 1);
        }
        return;
    }
    for child in &node.children {
        print_tree(child, level + 1, max_depth);
    }
}
