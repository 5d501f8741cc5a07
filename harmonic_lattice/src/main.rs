// Harmonic lattice explorer: CLI entry point.
//
// Lists the simplest intervals of a subgroup in order of harmonic distance,
// with their size in cents (tempered size too when a temperament is
// configured) and their name when the interval library knows one. With
// `--solve`, prints the coordinates of one interval over the subgroup
// instead.
//
// Usage:
//   explore [OPTIONS]
//     --config <PATH>         JSON config (see config.rs); flags override it
//     --metric <NAME>         Barlow, Euler, Tenney, Euclidean, Simple:k, Epimoric:k
//     --normalize             Scale distances so that 81/80 is 1
//     --subgroup <TEXT>       Generators, e.g. "2.3.7/5 (7/5)" (default: 2.3.5)
//     --count <N>             Max intervals listed (default: 50)
//     --dimensions <N>        Max generators used at once
//     --distance <X>          Max harmonic distance
//     --range <LOW> <HIGH>    Only intervals between LOW and HIGH, inclusive
//     --solve <TEXT>          Coordinates of TEXT over the subgroup
//
// Logging goes to stderr and is controlled by RUST_LOG (default: warn).

use std::path::PathBuf;

use harmonic_lattice::config::ExplorerConfig;
use harmonic_lattice::generator::{AcceptAll, RationalHandler};
use harmonic_lattice::library::default_library;
use harmonic_lattice::notation::format_cents;
use harmonic_lattice::{Rational, Subgroup};
use tracing_subscriber::EnvFilter;

#[derive(Default)]
struct Args {
    config_path: Option<PathBuf>,
    metric: Option<String>,
    normalize: bool,
    subgroup: Option<String>,
    count: Option<usize>,
    dimensions: Option<usize>,
    distance: Option<f64>,
    range: Option<(Rational, Rational)>,
    solve: Option<Rational>,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args();
    let config = build_config(&args);

    let subgroup = config.build_subgroup().unwrap_or_else(|e| {
        eprintln!("Bad subgroup: {e}");
        std::process::exit(1);
    });
    if let Some(msg) = subgroup.error() {
        eprintln!("{msg}");
    }

    if let Some(target) = &args.solve {
        print_solution(&subgroup, target);
        return;
    }

    let generator = config.build_generator(&subgroup).unwrap_or_else(|e| {
        eprintln!("Bad metric: {e}");
        std::process::exit(1);
    });
    let (temperament, temperament_errors) =
        config.build_temperament(&subgroup).unwrap_or_else(|e| {
            eprintln!("Bad temperament: {e}");
            std::process::exit(1);
        });
    for (entry, error) in config.temperament.iter().zip(&temperament_errors) {
        if let Some(error) = error {
            eprintln!("Temperament entry {entry:?} ignored: {error}");
        }
    }

    let mut range = config.build_range();
    let mut accept_all = AcceptAll;
    let handler: &mut dyn RationalHandler = match range.as_mut() {
        Some(r) => r,
        None => &mut accept_all,
    };
    let items = generator.collect_with(handler);

    let library = default_library();
    println!("Subgroup: {subgroup}");
    println!("Metric: {}", generator.metric());
    println!();
    for item in &items {
        let mut line = format!(
            "{:>14}  {:>9.4}  {:>12}",
            item.rational.to_string(),
            item.distance,
            format_cents(item.rational.cents())
        );
        if temperament.is_set() {
            let tempered = format_cents(temperament.measured_cents(&item.rational));
            line.push_str(&format!("  {tempered:>12}"));
        }
        if let Some(name) = library.find_name(&item.rational) {
            line.push_str("  ");
            line.push_str(name);
        }
        println!("{}", line.trim_end());
    }
    println!();
    println!("{} intervals", items.len());
}

/// Load the config file if one was given, then apply flag overrides.
fn build_config(args: &Args) -> ExplorerConfig {
    let mut config = match &args.config_path {
        Some(path) => ExplorerConfig::load(path).unwrap_or_else(|e| {
            eprintln!("Failed to load {}: {e}", path.display());
            std::process::exit(1);
        }),
        None => ExplorerConfig::default(),
    };
    if let Some(metric) = &args.metric {
        config.harmonicity = metric.clone();
    }
    if args.normalize {
        config.normalize = true;
    }
    if let Some(subgroup) = &args.subgroup {
        config.subgroup = subgroup.clone();
    }
    if args.count.is_some() {
        config.max_count = args.count;
    }
    if args.dimensions.is_some() {
        config.max_dimensions = args.dimensions;
    }
    if args.distance.is_some() {
        config.max_distance = args.distance;
    }
    if args.range.is_some() {
        config.range = args.range.clone();
    }
    config
}

fn print_solution(subgroup: &Subgroup, target: &Rational) {
    match subgroup.coordinates(target) {
        Some(coords) => {
            let terms: Vec<String> = subgroup
                .items()
                .iter()
                .zip(&coords)
                .filter(|(_, c)| **c != 0)
                .map(|(item, c)| format!("{item}^{c}"))
                .collect();
            let product = if terms.is_empty() {
                "1".to_string()
            } else {
                terms.join(" * ")
            };
            println!("{target} = {product}");
            println!("coordinates: {coords:?}");
        }
        None => println!("{target} is not in subgroup {subgroup}"),
    }
}

/// Parse command-line arguments. Plain `std::env::args()` matching.
fn parse_args() -> Args {
    let mut parsed = Args::default();
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                parsed.config_path = Some(args.get(i).map(PathBuf::from).unwrap_or_else(|| {
                    eprintln!("--config requires a path");
                    std::process::exit(1);
                }));
            }
            "--metric" => {
                i += 1;
                parsed.metric = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--metric requires a name");
                    std::process::exit(1);
                }));
            }
            "--normalize" => parsed.normalize = true,
            "--subgroup" => {
                i += 1;
                parsed.subgroup = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--subgroup requires a value");
                    std::process::exit(1);
                }));
            }
            "--count" => {
                i += 1;
                parsed.count = Some(args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--count requires a valid number");
                    std::process::exit(1);
                }));
            }
            "--dimensions" => {
                i += 1;
                parsed.dimensions =
                    Some(args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                        eprintln!("--dimensions requires a valid number");
                        std::process::exit(1);
                    }));
            }
            "--distance" => {
                i += 1;
                parsed.distance =
                    Some(args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                        eprintln!("--distance requires a valid number");
                        std::process::exit(1);
                    }));
            }
            "--range" => {
                let low = args.get(i + 1).and_then(|s| Rational::parse(s));
                let high = args.get(i + 2).and_then(|s| Rational::parse(s));
                i += 2;
                match (low, high) {
                    (Some(low), Some(high)) => parsed.range = Some((low, high)),
                    _ => {
                        eprintln!("--range requires two intervals");
                        std::process::exit(1);
                    }
                }
            }
            "--solve" => {
                i += 1;
                parsed.solve = Some(args.get(i).and_then(|s| Rational::parse(s)).unwrap_or_else(|| {
                    eprintln!("--solve requires an interval such as 81/80");
                    std::process::exit(1);
                }));
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    parsed
}

fn print_usage() {
    println!("Usage: explore [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --config <PATH>         JSON config; flags override it");
    println!("  --metric <NAME>         Barlow, Euler, Tenney, Euclidean, Simple:k, Epimoric:k");
    println!("  --normalize             Scale distances so that 81/80 is 1");
    println!("  --subgroup <TEXT>       Generators, e.g. \"2.3.7/5 (7/5)\" (default: 2.3.5)");
    println!("  --count <N>             Max intervals listed (default: 50)");
    println!("  --dimensions <N>        Max generators used at once");
    println!("  --distance <X>          Max harmonic distance");
    println!("  --range <LOW> <HIGH>    Only intervals between LOW and HIGH, inclusive");
    println!("  --solve <TEXT>          Coordinates of TEXT over the subgroup");
    println!("  --help, -h              Show this help");
}
