//! Plan a multi-leg drive tour from the terminal.
//!
//! Usage:
//!   cargo run -p tour-cli --bin tour-plan -- --origin "Hamamatsu Station"
//!   cargo run -p tour-cli --bin tour-plan -- --origin "34.71, 137.73" --auto --seed 7

use anyhow::{bail, Context};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tour_cli::{
    describe_event, format_candidates, format_summary, parse_choice, recovery_for, Choice,
    Recovery,
};
use tour_core::{
    summarize, CandidatePool, EmptyPoolPolicy, PlannerConfig, PlannerError, PlannerState,
    RoutePlanner, TravelMode,
};
use tour_providers::{
    loader_for, HttpSettings, NominatimGeocoder, OsrmRouter, DEFAULT_DATASET_URL,
    DEFAULT_NOMINATIM_URL, DEFAULT_OSRM_URL,
};

/// Pick destinations leg by leg and print the resulting route
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Starting point: a place name or "lat, lon"
    #[arg(long)]
    origin: String,

    /// Travel mode (driving, cycling, walking)
    #[arg(long, default_value = "driving")]
    mode: TravelMode,

    /// Number of destinations to choose
    #[arg(long, default_value_t = 3)]
    legs: usize,

    /// Candidates offered per step
    #[arg(long, default_value_t = 3)]
    candidates: usize,

    /// Offer the nearest municipalities when none fall inside the band
    #[arg(long)]
    fallback: bool,

    /// Choose candidates at random instead of prompting
    #[arg(long)]
    auto: bool,

    /// Seed for reproducible offers and automatic choices
    #[arg(long)]
    seed: Option<u64>,

    /// Municipality dataset, URL or file path
    #[arg(long, default_value = DEFAULT_DATASET_URL)]
    dataset: String,

    /// Nominatim base URL
    #[arg(long, default_value = DEFAULT_NOMINATIM_URL)]
    nominatim_url: String,

    /// OSRM base URL
    #[arg(long, default_value = DEFAULT_OSRM_URL)]
    osrm_url: String,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout: u64,
}

fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

fn print_events(planner: &mut RoutePlanner) {
    for event in planner.take_events() {
        if let Some(line) = describe_event(&event) {
            println!("{}", line);
        }
    }
}

/// Report a failed step. `Ok(false)` ends the run with the legs so far.
fn keep_going(
    planner: &mut RoutePlanner,
    err: PlannerError,
    auto: bool,
) -> anyhow::Result<bool> {
    match recovery_for(err, auto) {
        Recovery::Finish => {
            print_events(planner);
            println!(
                "Stopping at step {}; keeping the legs routed so far.",
                planner.plan().step
            );
            Ok(false)
        }
        Recovery::Retry => {
            print_events(planner);
            println!("Pick another candidate.");
            Ok(true)
        }
        Recovery::Abort(err) => Err(err.into()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("tour_providers=info".parse()?))
        .init();

    let args = Args::parse();

    let config = PlannerConfig {
        leg_count: args.legs,
        candidate_count: args.candidates,
        empty_pool_policy: if args.fallback {
            EmptyPoolPolicy::NearestFallback
        } else {
            EmptyPoolPolicy::Strict
        },
        ..PlannerConfig::default()
    };
    config.validate()?;

    let settings = HttpSettings {
        timeout: Duration::from_secs(args.timeout),
        ..HttpSettings::default()
    };

    println!("Loading municipalities from {}...", args.dataset);
    let municipalities = loader_for(&args.dataset, &settings)?
        .load()
        .await
        .with_context(|| format!("loading dataset from {}", args.dataset))?;
    let pool = Arc::new(CandidatePool::new(municipalities)?);
    println!("{} municipalities loaded.", pool.len());

    let geocoder = Arc::new(NominatimGeocoder::new(&args.nominatim_url, &settings)?);
    let router = Arc::new(OsrmRouter::new(&args.osrm_url, &settings)?);
    let mut planner =
        RoutePlanner::with_rng(geocoder, router, pool, config, rng_for(args.seed))?;
    let mut chooser = rng_for(args.seed.map(|s| s.wrapping_add(1)));

    planner
        .start(&args.origin)
        .await
        .with_context(|| format!("resolving origin '{}'", args.origin))?;
    print_events(&mut planner);

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if matches!(planner.state(), PlannerState::Complete) {
            break;
        }
        if matches!(planner.state(), PlannerState::Proposing { .. }) {
            let proposed = planner.propose().map(|_| ());
            if let Err(err) = proposed {
                if !keep_going(&mut planner, err, args.auto)? {
                    break;
                }
                continue;
            }
        }
        let (step, offered, relaxed) = match planner.state() {
            PlannerState::AwaitingSelection {
                step,
                candidates,
                relaxed,
            } => (*step, candidates.clone(), *relaxed),
            other => bail!("unexpected planner state: {}", other),
        };
        print_events(&mut planner);
        print!("{}", format_candidates(step, &offered, relaxed));

        let index = if args.auto {
            let index = chooser.random_range(0..offered.len());
            println!("Choosing {}", offered[index].municipality.name);
            index
        } else {
            print!("Choose [1-{}, r, q]: ", offered.len());
            std::io::stdout().flush()?;
            let Some(line) = stdin.next_line().await? else {
                bail!("input closed before the plan was complete");
            };
            match parse_choice(&line, offered.len()) {
                Ok(Choice::Pick(index)) => index,
                Ok(Choice::Redraw) => {
                    let proposed = planner.propose().map(|_| ());
                    if let Err(err) = proposed {
                        if !keep_going(&mut planner, err, args.auto)? {
                            break;
                        }
                    }
                    continue;
                }
                Ok(Choice::Quit) => {
                    println!("Stopped before the last leg.");
                    break;
                }
                Err(message) => {
                    eprintln!("{}", message);
                    continue;
                }
            }
        };

        match planner.choose_index(index, args.mode).await {
            Ok(_) => print_events(&mut planner),
            Err(err) => {
                if !keep_going(&mut planner, err, args.auto)? {
                    break;
                }
            }
        }
    }

    if !planner.plan().segments.is_empty() {
        println!();
        print!("{}", format_summary(&summarize(planner.plan())));
    }
    Ok(())
}
