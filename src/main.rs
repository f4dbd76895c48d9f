//! pwgraph CLI - PipeWire graph consolidation and layout
//!
//! Reads graph snapshots from a file or the graph endpoint and prints the
//! consolidated, laid-out result.

use anyhow::{bail, Context, Result};
use pwgraph::prelude::*;
use std::time::Duration;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        return Ok(());
    }

    let options = Options::parse(&args[2..])?;

    match args[1].as_str() {
        "layout" => layout(&options),
        "check" => check(&options),
        "columns" => columns(&options),
        "watch" => watch(&options),
        "help" | "--help" | "-h" => {
            print_usage(&args[0]);
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage(&args[0]);
            Ok(())
        }
    }
}

fn print_usage(program: &str) {
    println!("pwgraph v{} - PipeWire graph consolidation and layout", pwgraph::VERSION);
    println!();
    println!("Usage: {} <command> [source] [options]", program);
    println!();
    println!("Commands:");
    println!("  layout <source>   Print the render model as JSON");
    println!("  check <source>    Report merges, dropped items and invariant checks");
    println!("  columns <source>  List nodes per stage column");
    println!("  watch [source]    Refresh periodically and log every change");
    println!("  help              Show this help message");
    println!();
    println!("<source> is a snapshot file or an http(s) URL of the graph endpoint.");
    println!();
    println!("Options:");
    println!("  --config <file>   TOML configuration (layout metrics, refresh settings)");
    println!("  --compact         Print compact JSON (layout)");
    println!();
    println!("Set RUST_LOG=debug to see individual merges.");
}

/// Command-line options shared by all commands.
struct Options {
    source: Option<String>,
    config: Config,
    compact: bool,
}

impl Options {
    fn parse(args: &[String]) -> Result<Self> {
        let mut source = None;
        let mut config = Config::default();
        let mut compact = false;

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--config" if i + 1 < args.len() => {
                    let path = &args[i + 1];
                    config = Config::load(path)
                        .with_context(|| format!("loading configuration from {}", path))?;
                    i += 2;
                }
                "--config" => bail!("--config needs a file argument"),
                "--compact" => {
                    compact = true;
                    i += 1;
                }
                arg if arg.starts_with("--") => {
                    eprintln!("Unknown option: {}", arg);
                    i += 1;
                }
                arg => {
                    source = Some(arg.to_string());
                    i += 1;
                }
            }
        }

        Ok(Self {
            source,
            config,
            compact,
        })
    }

    /// Source from the command line, falling back to the configured one.
    fn source(&self) -> Result<Box<dyn SnapshotSource>> {
        let location = self
            .source
            .as_deref()
            .or(self.config.refresh.source.as_deref())
            .context("no snapshot source given (pass a file or URL, or set refresh.source)")?;
        Ok(source_for(location))
    }
}

fn load_view(options: &Options) -> Result<GraphView> {
    let source = options.source()?;
    let mut view = GraphView::new(options.config.clone());
    view.refresh(source.as_ref())
        .with_context(|| format!("fetching snapshot from {}", source.describe()))?;
    Ok(view)
}

fn layout(options: &Options) -> Result<()> {
    let view = load_view(options)?;
    let model = view.render_model().context("no graph loaded")?;
    let json = if options.compact {
        serde_json::to_string(&model)?
    } else {
        model.to_json()?
    };
    println!("{}", json);
    Ok(())
}

fn check(options: &Options) -> Result<()> {
    let view = load_view(options)?;
    let scene = view.scene().context("no graph loaded")?;

    println!("Consolidation: {}", scene.report.summary());
    for merge in &scene.report.merges {
        println!("  • {} → {} ({})", merge.child_name, merge.parent, merge.rule);
    }
    println!();

    let report = ValidationPipeline::default().validate(&scene.graph);
    println!("{}", report.summary());
    for error in &report.errors {
        println!("  ✗ {}", error);
    }
    for warning in &report.warnings {
        println!("  ⚠ {}", warning.message);
    }

    if !report.success {
        bail!("{} invariant violation(s)", report.errors.len());
    }
    Ok(())
}

fn columns(options: &Options) -> Result<()> {
    let view = load_view(options)?;
    let scene = view.scene().context("no graph loaded")?;

    for stage in Stage::ALL {
        let ids = scene.layout.column(stage.column());
        println!("{} ({})", stage, ids.len());
        for id in ids {
            let node = scene.graph.get_node(*id)?;
            let meta = node.meta_text();
            if meta.is_empty() {
                println!("  {:>5}  {}", id.0, node.title());
            } else {
                println!("  {:>5}  {}  [{}]", id.0, node.title(), meta);
            }
        }
    }
    Ok(())
}

fn watch(options: &Options) -> Result<()> {
    let source = options.source()?;
    let interval = Duration::from_secs(options.config.refresh.interval_secs);
    let mut view = GraphView::new(options.config.clone());

    println!("Watching {} every {}s (Ctrl-C to stop)", source.describe(), interval.as_secs());

    loop {
        match view.refresh(source.as_ref()) {
            Ok(RefreshOutcome::Applied { nodes, links }) => {
                println!("{} nodes, {} links", nodes, links);
            }
            Ok(RefreshOutcome::Stale) => {}
            // Failures are logged by the view; keep polling.
            Err(e) => eprintln!("refresh failed: {}", e),
        }
        std::thread::sleep(interval);
    }
}
