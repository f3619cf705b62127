//! Anchorframe CLI
//!
//! Reads a TOML scene description, runs a layout pass, and prints the
//! resolved frame of every view as an indented tree.

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;

use anchorframe::{Layout, Scene, ViewId, ViewTree};

#[derive(Parser)]
#[command(name = "anchorframe")]
#[command(about = "Constraint-based layout for TOML scene descriptions")]
struct Cli {
    /// Scene file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Log when a scene's constraints cannot be resolved
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::builder()
            .filter_level(log::LevelFilter::Info)
            .init();
    } else {
        env_logger::init();
    }

    let source = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            if io::stdin().is_terminal() {
                eprintln!("Usage: anchorframe [OPTIONS] [FILE]  (or pipe a scene to stdin)");
                std::process::exit(2);
            }
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let scene = match Scene::from_str(&source) {
        Ok(scene) => scene,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let mut tree = match scene.build() {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut layout = Layout::new(scene.config());
    let report = layout.process(&mut tree);

    print_tree(&tree, tree.root(), 0);

    if !report.converged() {
        eprintln!("Error: layout did not converge after {} iterations", report.iterations);
        std::process::exit(1);
    }
}

fn print_tree(tree: &ViewTree, view: ViewId, depth: usize) {
    let frame = tree.frame(view);
    println!(
        "{:indent$}{}: x={} y={} width={} height={}",
        "",
        tree.display_name(view),
        frame.x,
        frame.y,
        frame.width,
        frame.height,
        indent = depth * 2
    );
    for &child in tree.children(view) {
        print_tree(tree, child, depth + 1);
    }
}
