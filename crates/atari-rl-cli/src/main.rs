//! Atari-RL episode runner
//!
//! Drives one ROM for a number of episodes with a random or fixed policy,
//! logging rewards, optionally dumping frames, and writing a JSON run
//! summary.

use ale_bridge::AtariSession;
use anyhow::{Context, Result, bail};
use atari_rl_core::Action;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

const USAGE: &str = "usage: atari-play <rom> [options]

options:
  --episodes N       episodes to play (default 1)
  --policy P         'random' or an action name like player_a_left (default random)
  --seed S           seed for the random policy (default 0)
  --frame-dir DIR    save a PNG frame every K steps into DIR
  --frame-every K    frame save interval in steps (default 60)
  --summary FILE     write a JSON run summary to FILE
  --max-steps N      per-episode step limit (default 100000)";

#[derive(Debug, Clone)]
enum Policy {
    Random,
    Fixed(Action),
}

#[derive(Debug, Clone)]
struct RunConfig {
    rom: PathBuf,
    episodes: u32,
    policy: Policy,
    seed: u64,
    frame_dir: Option<PathBuf>,
    frame_every: u64,
    summary: Option<PathBuf>,
    max_steps: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            rom: PathBuf::new(),
            episodes: 1,
            policy: Policy::Random,
            seed: 0,
            frame_dir: None,
            frame_every: 60,
            summary: None,
            max_steps: 100_000,
        }
    }
}

#[derive(Debug, Serialize)]
struct EpisodeSummary {
    episode: u32,
    steps: u64,
    reward: i64,
    frames_saved: u32,
}

#[derive(Debug, Serialize)]
struct RunSummary {
    rom: String,
    width: u32,
    height: u32,
    legal_actions: Vec<Action>,
    episodes: Vec<EpisodeSummary>,
    total_reward: i64,
}

fn value_of(flag: &str, args: &mut impl Iterator<Item = String>) -> Result<String> {
    args.next().with_context(|| format!("{flag} requires a value"))
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<RunConfig> {
    let mut config = RunConfig::default();
    let mut rom = None;
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--episodes" => {
                config.episodes = value_of(&arg, &mut args)?.parse().context("--episodes")?
            }
            "--policy" => {
                let value = value_of(&arg, &mut args)?;
                config.policy = if value == "random" {
                    Policy::Random
                } else {
                    Policy::Fixed(value.parse().context("--policy")?)
                };
            }
            "--seed" => config.seed = value_of(&arg, &mut args)?.parse().context("--seed")?,
            "--frame-dir" => config.frame_dir = Some(PathBuf::from(value_of(&arg, &mut args)?)),
            "--frame-every" => {
                config.frame_every = value_of(&arg, &mut args)?.parse().context("--frame-every")?
            }
            "--summary" => config.summary = Some(PathBuf::from(value_of(&arg, &mut args)?)),
            "--max-steps" => {
                config.max_steps = value_of(&arg, &mut args)?.parse().context("--max-steps")?
            }
            "--help" | "-h" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other if !other.starts_with('-') && rom.is_none() => {
                rom = Some(PathBuf::from(other));
            }
            other => bail!("unrecognized argument: {other}\n{USAGE}"),
        }
    }
    config.rom = rom.with_context(|| USAGE.to_string())?;
    if config.frame_every == 0 {
        bail!("--frame-every must be at least 1");
    }
    Ok(config)
}

fn run(config: &RunConfig) -> Result<RunSummary> {
    let mut session = AtariSession::new(&config.rom)?;
    let dim = session.screen_size();
    let legal = session.legal_actions();
    if legal.is_empty() {
        bail!("engine reported an empty legal action set for {}", config.rom.display());
    }
    info!(
        actions = legal.len(),
        width = dim.width,
        height = dim.height,
        "session open"
    );

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut episodes = Vec::with_capacity(config.episodes as usize);
    let mut total_reward = 0i64;

    for episode in 0..config.episodes {
        if episode > 0 {
            session.reset();
        }
        let mut reward = 0i64;
        let mut steps = 0u64;
        let mut frames_saved = 0u32;

        while !session.is_over() {
            if steps >= config.max_steps {
                warn!(steps, episode, "step limit reached, abandoning episode");
                break;
            }
            let action = match &config.policy {
                Policy::Fixed(action) => *action,
                Policy::Random => legal[rng.gen_range(0..legal.len())],
            };
            reward += i64::from(session.send(action));
            steps += 1;

            if let Some(dir) = &config.frame_dir {
                if steps % config.frame_every == 0 {
                    let path = dir.join(format!("ep{episode:03}_step{steps:06}.png"));
                    session.save_frame(&path)?;
                    frames_saved += 1;
                }
            }
        }

        info!(episode, steps, reward, frames_saved, "episode finished");
        total_reward += reward;
        episodes.push(EpisodeSummary { episode, steps, reward, frames_saved });
    }

    Ok(RunSummary {
        rom: config.rom.display().to_string(),
        width: dim.width,
        height: dim.height,
        legal_actions: legal,
        episodes,
        total_reward,
    })
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = parse_args(std::env::args().skip(1))?;
    let summary = run(&config)?;

    match &config.summary {
        Some(path) => {
            std::fs::write(path, serde_json::to_string_pretty(&summary)?)
                .with_context(|| format!("writing summary to {}", path.display()))?;
            info!(path = %path.display(), "summary written");
        }
        None => println!("{}", serde_json::to_string(&summary)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_rom_and_defaults() {
        let config = parse_args(args(&["pong.bin"])).unwrap();
        assert_eq!(config.rom, PathBuf::from("pong.bin"));
        assert_eq!(config.episodes, 1);
        assert!(matches!(config.policy, Policy::Random));
    }

    #[test]
    fn parses_fixed_policy_and_knobs() {
        let config = parse_args(args(&[
            "pong.bin",
            "--episodes",
            "3",
            "--policy",
            "player_a_left",
            "--seed",
            "7",
            "--frame-every",
            "10",
        ]))
        .unwrap();
        assert_eq!(config.episodes, 3);
        assert_eq!(config.seed, 7);
        assert_eq!(config.frame_every, 10);
        assert!(matches!(config.policy, Policy::Fixed(Action::PlayerALeft)));
    }

    #[test]
    fn rejects_missing_rom_and_bad_flags() {
        assert!(parse_args(args(&[])).is_err());
        assert!(parse_args(args(&["pong.bin", "--bogus"])).is_err());
        assert!(parse_args(args(&["pong.bin", "--policy", "player_c_fire"])).is_err());
        assert!(parse_args(args(&["pong.bin", "--frame-every", "0"])).is_err());
    }
}
