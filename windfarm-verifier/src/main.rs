use anyhow::{anyhow, Result};
use clap::{arg, ArgMatches, Command};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde_json::json;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};
use windfarm_challenge::{
    check, judge, render_text, verdict, Instance, InstanceSize, SolutionFile,
};
use windfarm_structs::config::{JudgeConfig, OutputFormat};
use windfarm_utils::{dejsonify, jsonify, save_json};

fn judge_args(cmd: Command) -> Command {
    cmd.arg(arg!(<INSTANCE> "Path to the instance json file").value_parser(clap::value_parser!(PathBuf)))
        .arg(arg!(<SOLUTION> "Path to the solution json file").value_parser(clap::value_parser!(PathBuf)))
        .arg(
            arg!(--config [CONFIG] "Judge config json string or path to json file")
                .value_parser(clap::value_parser!(String)),
        )
        .arg(arg!(--json "Print the verdict as json"))
        .arg(arg!(--"no-clean-keys" "Do not strip whitespace around keys"))
        .arg(
            arg!(--output [OUTPUT] "Also save the verdict as json to this path")
                .value_parser(clap::value_parser!(PathBuf)),
        )
}

fn cli() -> Command {
    Command::new("windfarm-verifier")
        .about("Checks and scores solutions of the wind farm cabling problem")
        .arg_required_else_help(true)
        .arg(arg!(-v --verbose "Log every judging pass").global(true))
        .subcommand(judge_args(
            Command::new("judge").about("Checks a solution and prints its score"),
        ))
        .subcommand(judge_args(
            Command::new("check").about("Checks a solution without scoring it"),
        ))
        .subcommand(
            Command::new("random_solution")
                .about("Writes a random feasible solution for an instance")
                .arg(arg!(<INSTANCE> "Path to the instance json file").value_parser(clap::value_parser!(PathBuf)))
                .arg(arg!(--seed [SEED] "Random seed").value_parser(clap::value_parser!(u64)))
                .arg(
                    arg!(--output [OUTPUT] "Path of the solution file, stdout if absent")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("generate_instance")
                .about("Writes a random instance")
                .arg(
                    arg!(<SIZE> "Sites, turbines, substation types, cable types, scenarios, e.g. 10,50,3,3,5")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(arg!(--seed [SEED] "Random seed").value_parser(clap::value_parser!(u64)))
                .arg(
                    arg!(--output [OUTPUT] "Path of the instance file, stdout if absent")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
}

fn main() {
    let matches = cli().get_matches();
    init_logging(matches.get_flag("verbose"));

    if let Err(e) = match matches.subcommand() {
        Some(("judge", sub_m)) => run_judge(sub_m, true),
        Some(("check", sub_m)) => run_judge(sub_m, false),
        Some(("random_solution", sub_m)) => random_solution(
            sub_m.get_one::<PathBuf>("INSTANCE").cloned(),
            sub_m.get_one::<u64>("seed").copied().unwrap_or(0),
            sub_m.get_one::<PathBuf>("output").cloned(),
        ),
        Some(("generate_instance", sub_m)) => generate_instance(
            sub_m.get_one::<String>("SIZE").cloned(),
            sub_m.get_one::<u64>("seed").copied().unwrap_or(0),
            sub_m.get_one::<PathBuf>("output").cloned(),
        ),
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_judge(sub_m: &ArgMatches, score: bool) -> Result<()> {
    let mut config = match sub_m.get_one::<String>("config") {
        Some(config) => load_config(config)?,
        None => JudgeConfig::default(),
    };
    if sub_m.get_flag("json") {
        config.output = OutputFormat::Json;
    }
    if sub_m.get_flag("no-clean-keys") {
        config.clean_keys = false;
    }
    let instance_path = required_path(sub_m, "INSTANCE")?;
    let solution_path = required_path(sub_m, "SOLUTION")?;
    info!(
        "Judging {} against {}",
        solution_path.display(),
        instance_path.display()
    );

    if !score {
        return run_check(sub_m, &instance_path, &solution_path, &config);
    }

    let result = judge(&instance_path, &solution_path, &config);
    let verdict = verdict(&result, &config);
    match config.output {
        OutputFormat::Json => println!("{}", verdict.to_json()?),
        OutputFormat::Text => println!("{}", render_text(&result, &config)),
    }
    if let Some(output) = sub_m.get_one::<PathBuf>("output") {
        save_json(&verdict, output)?;
    }
    if !verdict.is_valid() {
        std::process::exit(1);
    }
    Ok(())
}

fn run_check(
    sub_m: &ArgMatches,
    instance_path: &Path,
    solution_path: &Path,
    config: &JudgeConfig,
) -> Result<()> {
    let result = check(instance_path, solution_path, config);
    let report = json!({
        "valid": result.is_ok(),
        "errors": result.as_ref().err().map(|e| e.problems()).unwrap_or_default(),
    });
    match (config.output, &result) {
        (OutputFormat::Json, _) => println!("{}", jsonify(&report)?),
        (OutputFormat::Text, Ok(_)) => println!("Solution is valid"),
        (OutputFormat::Text, Err(e)) => println!("{}", e.to_string().trim_end()),
    }
    if let Some(output) = sub_m.get_one::<PathBuf>("output") {
        save_json(&report, output)?;
    }
    if result.is_err() {
        std::process::exit(1);
    }
    Ok(())
}

fn required_path(sub_m: &ArgMatches, name: &str) -> Result<PathBuf> {
    sub_m
        .get_one::<PathBuf>(name)
        .cloned()
        .ok_or_else(|| anyhow!("Missing argument {}", name))
}

fn seed_from(seed: u64) -> [u8; 32] {
    StdRng::seed_from_u64(seed).gen()
}

fn random_solution(instance_path: Option<PathBuf>, seed: u64, output: Option<PathBuf>) -> Result<()> {
    let instance_path = instance_path.ok_or_else(|| anyhow!("Missing argument INSTANCE"))?;
    let config = JudgeConfig::default();
    let instance = Instance::from_value(&windfarm_challenge::load_document(&instance_path, &config)?)?;
    let solution = SolutionFile::random(&instance, &seed_from(seed))?;
    write_or_print(&solution, output)
}

fn generate_instance(size: Option<String>, seed: u64, output: Option<PathBuf>) -> Result<()> {
    let size = size.ok_or_else(|| anyhow!("Missing argument SIZE"))?;
    let size = size
        .split(',')
        .map(|s| s.trim().parse::<i32>())
        .collect::<Result<Vec<i32>, _>>()
        .map_err(|e| anyhow!("Invalid size '{}': {}", size, e))?;
    let instance = Instance::generate(&seed_from(seed), &InstanceSize::try_from(size)?)?;
    write_or_print(&instance.to_document()?, output)
}

fn write_or_print<T: serde::Serialize>(obj: &T, output: Option<PathBuf>) -> Result<()> {
    match output {
        Some(path) => save_json(obj, &path)?,
        None => println!("{}", serde_json::to_string_pretty(obj)?),
    }
    Ok(())
}

fn load_config(config: &str) -> Result<JudgeConfig> {
    let config = if config.ends_with(".json") {
        fs::read_to_string(config)
            .map_err(|e| anyhow!("Failed to read config file {}: {}", config, e))?
    } else {
        config.to_string()
    };

    dejsonify::<JudgeConfig>(&config).map_err(|e| anyhow!("Failed to parse config: {}", e))
}
