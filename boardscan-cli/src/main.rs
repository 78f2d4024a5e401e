//! Boardscan CLI - inspect KiCad PCB board files from the command line.

use boardscan::{Board, LayerRef, NetRef, Track};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "boardscan")]
#[command(about = "KiCad PCB board file inspector", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a .kicad_pcb file
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable summary
    Summary,
    /// Full model as JSON
    Json,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let board = match boardscan::load_board(&cli.file) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    match cli.format {
        OutputFormat::Summary => print_summary(&cli.file, &board),
        OutputFormat::Json => print_json(&board),
    }
}

fn print_summary(file: &PathBuf, board: &Board) {
    println!("File: {}", file.display());
    println!("{}", "─".repeat(60));
    println!(
        "  Format version {} ({} {})",
        board.header.version, board.header.generator, board.header.generator_version
    );
    println!("  Board thickness: {} mm", board.general.thickness);

    println!("\n  Layers ({}):", board.layers.len());
    for layer in &board.layers {
        let stackup = if layer.stackup.is_some() {
            " [stackup]"
        } else {
            ""
        };
        println!(
            "    {:>3}  {:<12} {:?}{}",
            layer.ordinal, layer.canonical_name, layer.layer_type, stackup
        );
    }

    println!("\n  Nets ({}):", board.nets.len());
    for net in &board.nets {
        println!("    {:>3}  {}", net.ordinal, net.name);
    }

    println!("\n  Footprints ({}):", board.footprints.len());
    for footprint in &board.footprints {
        println!(
            "    {} at ({}, {}) with {} pads",
            footprint.library_link,
            footprint.at.x,
            footprint.at.y,
            footprint.pads.len()
        );
    }

    let vias = board
        .tracks
        .iter()
        .filter(|t| matches!(t, Track::Via(_)))
        .count();
    let segments = board
        .tracks
        .iter()
        .filter(|t| matches!(t, Track::Segment(_)))
        .count();
    let arcs = board
        .tracks
        .iter()
        .filter(|t| matches!(t, Track::Arc(_)))
        .count();
    println!("\n  Tracks: {segments} segments, {vias} vias, {arcs} arcs");
    println!("  Zones: {}", board.zones.len());

    let unresolved = count_unresolved(board);
    if unresolved > 0 {
        println!("\n  Unresolved references: {unresolved}");
    }
}

/// Pad/track/zone references that named a layer or net the file never
/// declared. The parser keeps them as written; strict consumers check this.
fn count_unresolved(board: &Board) -> usize {
    let mut count = 0;
    let layer_unresolved =
        |layer: &Option<LayerRef>| matches!(layer, Some(LayerRef::Unresolved(_)));
    let net_unresolved = |net: &Option<NetRef>| matches!(net, Some(NetRef::Unresolved(_)));

    for footprint in &board.footprints {
        count += usize::from(layer_unresolved(&footprint.layer));
        for pad in &footprint.pads {
            count += pad
                .layers
                .iter()
                .filter(|l| matches!(l, LayerRef::Unresolved(_)))
                .count();
            count += usize::from(net_unresolved(&pad.net));
        }
    }
    for track in &board.tracks {
        count += match track {
            Track::Via(via) => {
                via.layers
                    .iter()
                    .filter(|l| matches!(l, LayerRef::Unresolved(_)))
                    .count()
                    + usize::from(net_unresolved(&via.net))
            }
            Track::Segment(s) => {
                usize::from(layer_unresolved(&s.layer)) + usize::from(net_unresolved(&s.net))
            }
            Track::Arc(a) => {
                usize::from(layer_unresolved(&a.layer)) + usize::from(net_unresolved(&a.net))
            }
        };
    }
    for zone in &board.zones {
        count += usize::from(layer_unresolved(&zone.layer));
        count += usize::from(net_unresolved(&zone.net));
    }
    count
}

fn print_json(board: &Board) {
    println!("{}", serde_json::to_string_pretty(board).unwrap());
}
