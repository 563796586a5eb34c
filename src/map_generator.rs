use clap::Parser;
use noise::{NoiseFn, Perlin};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use std::fs;
use std::time::Instant;

use map_analyzer::{MapFile, PlayArea, LEVEL_DIFFERENCE};

/// Map Generator for the Map Analyzer
///
/// A standalone tool to generate terraced test maps and save them to files.
/// The generated maps can then be fed to the analyzer and the pathfinder.
#[derive(Parser, Debug)]
#[command(version, about = "Generate terraced tile maps for the analyzer")]
struct Args {
    /// Name of the map to generate
    #[arg(short, long, default_value = "generated_map")]
    name: String,

    /// Seed for map generation (random if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Map width in cells
    #[arg(long, default_value = "128")]
    width: usize,

    /// Map height in cells
    #[arg(long, default_value = "128")]
    height: usize,

    /// Noise frequency; lower values make wider terraces
    #[arg(short, long, default_value = "0.04")]
    frequency: f64,

    /// Output directory for generated maps
    #[arg(short, long, default_value = "maps")]
    output_dir: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Terrace count above the water line
const TERRACES: i32 = 4;
/// Noise values below this become unpathable water
const WATER_CUTOFF: f64 = 0.18;
/// Base height of the lowest terrace
const BASE_HEIGHT: i32 = 2 * LEVEL_DIFFERENCE;

fn main() {
    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(|| {
        let random_seed = rand::random::<u64>();
        if args.verbose {
            println!("Using random seed: {}", random_seed);
        }
        random_seed
    });

    if args.verbose {
        println!("Generating map: {}", args.name);
        println!("Seed: {}", seed);
        println!("Size: {}x{}", args.height, args.width);
        println!("Output: {}", args.output_dir);
    }

    let start_time = Instant::now();

    if let Err(e) = fs::create_dir_all(&args.output_dir) {
        eprintln!(
            "Failed to create output directory '{}': {}",
            args.output_dir, e
        );
        std::process::exit(1);
    }

    let map = generate_map(&args, seed);

    let file_path = format!("{}/{}.ron", args.output_dir, args.name);
    println!("Saving map to: {}", file_path);
    if let Err(e) = map.save(&file_path) {
        eprintln!("Failed to save map: {}", e);
        std::process::exit(1);
    }

    let duration = start_time.elapsed();
    let ground = map.walkable.iter().filter(|&&c| c == 1).count();

    println!("\nGeneration Summary:");
    println!("  Map file: {}", file_path);
    println!("  Size: {}x{} cells", args.height, args.width);
    println!(
        "  Walkable: {} cells ({}%)",
        ground,
        ground * 100 / (args.width * args.height)
    );
    println!("  Seed: {}", seed);
    println!("  Time: {:?}", duration);
}

fn generate_map(args: &Args, seed: u64) -> MapFile {
    let (w, h) = (args.width, args.height);
    let perlin = Perlin::new(seed as u32);
    let mut rng = Pcg64::seed_from_u64(seed);

    let mut heights = vec![0u8; w * h];
    let mut walkable = vec![0u8; w * h];

    // Terraced heightfield: noise quantized to full level steps
    for y in 0..h {
        for x in 0..w {
            let n = perlin.get([x as f64 * args.frequency, y as f64 * args.frequency]);
            let t = (n + 1.0) / 2.0;

            let k = y * w + x;
            if t < WATER_CUTOFF {
                heights[k] = LEVEL_DIFFERENCE as u8;
                walkable[k] = 0;
            } else {
                let terrace = ((t - WATER_CUTOFF) / (1.0 - WATER_CUTOFF) * TERRACES as f64)
                    .min((TERRACES - 1) as f64) as i32;
                heights[k] = (BASE_HEIGHT + terrace * LEVEL_DIFFERENCE) as u8;
                walkable[k] = 1;
            }
        }
    }

    // Terrace seams become unpathable cliff faces
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let k = y * w + x;
            if walkable[k] == 0 {
                continue;
            }
            let own = heights[k];
            let cliff = [k - 1, k + 1, k - w, k + w]
                .iter()
                .any(|&nbr| walkable[nbr] == 1 && heights[nbr] < own);
            if cliff {
                walkable[k] = 0;
            }
        }
    }

    // Scatter a few rock patches so open terraces are not featureless
    let patches = (w * h) / 2048;
    for _ in 0..patches {
        let cx = rng.gen_range(4..w.saturating_sub(4).max(5));
        let cy = rng.gen_range(4..h.saturating_sub(4).max(5));
        let radius = rng.gen_range(1..3usize);
        for y in cy.saturating_sub(radius)..(cy + radius + 1).min(h) {
            for x in cx.saturating_sub(radius)..(cx + radius + 1).min(w) {
                walkable[y * w + x] = 0;
            }
        }
    }

    MapFile {
        name: args.name.clone(),
        width: w,
        height: h,
        play_area: PlayArea {
            x_start: 2,
            x_end: w as i32 - 2,
            y_start: 2,
            y_end: h as i32 - 2,
        },
        walkable,
        heights,
    }
}
