use clap::{Parser, Subcommand};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use map_analyzer::{analyze_map, astar, astar_with_teleport, AnalysisReport, MapFile};

/// Map Analyzer
///
/// Static terrain analysis and weighted-grid pathfinding for tile maps.
/// Maps are produced by the `map_generator` tool or exported by a bot.
#[derive(Parser, Debug)]
#[command(version, about = "Analyze tile maps and find paths on them")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full terrain analysis on a map file
    Analyze {
        /// Map file (.ron or .json)
        map: String,

        /// Write a JSON report next to the console summary
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Find a path between two cells of a map
    Path {
        /// Map file (.ron or .json)
        map: String,

        /// Start cell as row,col
        #[arg(short, long)]
        start: String,

        /// Goal cell as row,col
        #[arg(short, long)]
        goal: String,

        /// Use the large-unit movement policy
        #[arg(long)]
        large: bool,

        /// Smooth the raw grid path
        #[arg(long)]
        smooth: bool,

        /// Teleport cell index; pass twice or more to enable the overlay
        #[arg(long = "teleport")]
        teleports: Vec<usize>,
    },
}

fn parse_cell(text: &str, width: usize) -> Option<usize> {
    let (row, col) = text.split_once(',')?;
    let row: usize = row.trim().parse().ok()?;
    let col: usize = col.trim().parse().ok()?;
    Some(row * width + col)
}

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Command::Analyze { map, output } => run_analyze(&map, output.as_deref()),
        Command::Path {
            map,
            start,
            goal,
            large,
            smooth,
            teleports,
        } => run_path(&map, &start, &goal, large, smooth, &teleports),
    }
}

fn run_analyze(map_path: &str, output: Option<&str>) {
    let map = load_map(map_path);

    let start_time = Instant::now();
    let analysis = match analyze_map(
        &map.walkable,
        &map.heights,
        map.height,
        map.width,
        map.play_area.y_start,
        map.play_area.y_end,
        map.play_area.x_start,
        map.play_area.x_end,
    ) {
        Ok(analysis) => analysis,
        Err(e) => {
            eprintln!("Analysis failed: {}", e);
            std::process::exit(1);
        }
    };
    let duration = start_time.elapsed();

    let climbable_cells = analysis.climber_grid.iter().filter(|&&v| v > 0.0).count();

    println!("Analysis of '{}' ({}x{})", map.name, map.height, map.width);
    println!("  Climber cells:  {}", climbable_cells);
    println!("  Overlord spots: {}", analysis.overlord_spots.len());
    println!("  Chokes:         {}", analysis.chokes.len());
    for (i, choke) in analysis.chokes.iter().enumerate() {
        let ((r0, c0), (r1, c1)) = choke.main_line;
        println!(
            "    #{}: ({:.1},{:.1}) -> ({:.1},{:.1}), {} lines, min length {:.2}",
            i,
            r0,
            c0,
            r1,
            c1,
            choke.lines.len(),
            choke.min_length
        );
    }
    println!("  Time: {:?}", duration);

    if let Some(path) = output {
        let report = AnalysisReport::new(&map, analysis);
        if let Err(e) = report.save(path) {
            eprintln!("Failed to write report '{}': {}", path, e);
            std::process::exit(1);
        }
        println!("  Report: {}", path);
    }
}

fn run_path(
    map_path: &str,
    start_text: &str,
    goal_text: &str,
    large: bool,
    smooth: bool,
    teleports: &[usize],
) {
    let map = load_map(map_path);
    let weights = map.weight_grid();

    let start = parse_cell(start_text, map.width).unwrap_or_else(|| {
        eprintln!("Invalid start cell '{}', expected row,col", start_text);
        std::process::exit(1);
    });
    let goal = parse_cell(goal_text, map.width).unwrap_or_else(|| {
        eprintln!("Invalid goal cell '{}', expected row,col", goal_text);
        std::process::exit(1);
    });

    let start_time = Instant::now();

    let segments = if teleports.len() >= 2 {
        astar_with_teleport(
            &weights, map.height, map.width, teleports, start, goal, large, smooth,
        )
    } else {
        astar(&weights, map.height, map.width, start, goal, large, smooth)
            .map(|path| path.map(|p| vec![p]))
    };

    let duration = start_time.elapsed();

    match segments {
        Ok(Some(segments)) => {
            let total: usize = segments.iter().map(Vec::len).sum();
            println!("Path found: {} cells in {:?}", total, duration);
            for (i, segment) in segments.iter().enumerate() {
                if segments.len() > 1 {
                    println!("  Segment {}:", i + 1);
                }
                for (row, col) in segment {
                    println!("    {},{}", row, col);
                }
            }
        }
        Ok(None) => {
            println!("No path from {} to {}", start_text, goal_text);
        }
        Err(e) => {
            eprintln!("Pathfinding failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn load_map(path: &str) -> MapFile {
    match MapFile::load(path) {
        Ok(map) => map,
        Err(e) => {
            eprintln!("Failed to load map '{}': {}", path, e);
            std::process::exit(1);
        }
    }
}
