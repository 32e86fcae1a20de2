use std::error::Error;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use blackjack_advisor::tools::{self, ToolCall, TOOLS};
use blackjack_advisor_drivers::{
    default_config_path, parse_config_from_file, parse_seen_cards, Config,
};
use clap::{Parser, Subcommand};
use log::debug;

#[derive(Debug, Parser)]
#[command(author, about = "Recommends HIT or STAND by simulating blackjack hands", long_about = None)]
struct CommandLineArgs {
    /// The path of the config file. Defaults to ~/.blackjack_advisor.yml if it exists
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for reproducible simulations
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Worker threads for simulations, 0 uses every core
    #[arg(long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Total and softness of a hand, e.g. `parse-hand A 6`
    ParseHand {
        #[arg(required = true)]
        cards: Vec<String>,
    },
    /// Best total of card values where 11 is an Ace, e.g. `hand-value 11 11 9`
    HandValue {
        #[arg(required = true)]
        values: Vec<u8>,
    },
    /// Simulate HIT vs STAND from an infinite deck
    Simulate {
        /// The dealer's up card
        #[arg(short, long)]
        dealer: String,
        /// Games per move
        #[arg(short, long)]
        num_simulations: Option<u32>,
        #[arg(required = true)]
        cards: Vec<String>,
    },
    /// Simulate HIT vs STAND from a single deck minus the seen cards
    SimulateSeen {
        /// The dealer's up card
        #[arg(short, long)]
        dealer: String,
        /// A seen card count as RANK=COUNT, may be repeated
        #[arg(short, long = "seen")]
        seen: Vec<String>,
        /// Games per move
        #[arg(short, long)]
        num_simulations: Option<u32>,
        #[arg(required = true)]
        cards: Vec<String>,
    },
    /// Print the available tools and their descriptions as JSON
    Tools,
    /// Run a JSON tool call, read from the argument or from stdin
    Call { json: Option<String> },
}

fn load_config(path: Option<PathBuf>) -> Result<Config, Box<dyn Error>> {
    let path = match path {
        Some(path) => path,
        None => match default_config_path() {
            Some(path) => path,
            None => return Ok(Config::default()),
        },
    };
    debug!("Reading config from {}", path.display());
    Ok(parse_config_from_file(&path)?)
}

fn run(args: CommandLineArgs) -> Result<String, Box<dyn Error>> {
    let mut config = load_config(args.config)?;
    if let Some(seed) = args.seed {
        config.simulation.seed = Some(seed);
    }
    if let Some(threads) = args.threads {
        config.simulation.number_of_threads = threads;
    }
    let simulation = &config.simulation;

    let output = match args.command {
        Command::ParseHand { cards } => {
            let (total, is_soft) = tools::parse_hand(&cards)?;
            format!("({}, {})", total, is_soft)
        }
        Command::HandValue { values } => tools::hand_value(&values).to_string(),
        Command::Simulate {
            dealer,
            num_simulations,
            cards,
        } => {
            let trials = num_simulations.unwrap_or(simulation.default_simulations);
            tools::simulate_best_decision(&cards, &dealer, &simulation.options(trials))?
        }
        Command::SimulateSeen {
            dealer,
            seen,
            num_simulations,
            cards,
        } => {
            let seen = parse_seen_cards(&seen)?;
            let trials = num_simulations.unwrap_or(simulation.default_simulations_with_seen);
            tools::simulate_best_decision_with_seen(
                &cards,
                &dealer,
                &seen,
                &simulation.options(trials),
            )?
        }
        Command::Tools => serde_json::to_string_pretty(&TOOLS)?,
        Command::Call { json } => {
            let json = match json {
                Some(json) => json,
                None => {
                    let mut buffer = String::new();
                    std::io::stdin().read_to_string(&mut buffer)?;
                    buffer
                }
            };
            let call: ToolCall = serde_json::from_str(&json)?;
            debug!("Invoking tool {}", call.spec().name);
            // The call carries its own trial count.
            call.invoke(&simulation.options(simulation.default_simulations))?
                .to_string()
        }
    };
    Ok(output)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = CommandLineArgs::parse();
    match run(args) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
