use crate::error::{ArcadeError, Result};
use std::env;
use std::path::PathBuf;

const DEFAULT_COUNTDOWN: u32 = 3;
const MAX_COUNTDOWN: u32 = 10;
const DATA_DIR_ENV: &str = "ARCADE_DATA_DIR";
const APP_DIR: &str = "minigame-arcade";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty
{
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty
{
    pub fn parse(value: &str) -> Result<Self>
    {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(ArcadeError::Config(format!(
                "Difficulty must be easy, medium or hard (got '{other}')"
            ))),
        }
    }

    pub fn label(self) -> &'static str
    {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// Settings handed to every new session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings
{
    pub countdown_secs: u32,
    pub difficulty: Difficulty,
}

impl Default for SessionSettings
{
    fn default() -> Self
    {
        Self {
            countdown_secs: DEFAULT_COUNTDOWN,
            difficulty: Difficulty::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArcadeConfig
{
    pub session: SessionSettings,
    pub seed: Option<u64>,
    pub data_dir: PathBuf,
}

impl ArcadeConfig
{
    /// Parses `--countdown=N`, `--difficulty=LEVEL`, `--seed=N` and
    /// `--data-dir=PATH` (each also accepted as two arguments). Anything else
    /// is returned untouched as positional arguments.
    pub fn from_args(args: &[String]) -> Result<(Self, Vec<String>)>
    {
        let mut countdown: Option<u32> = None;
        let mut difficulty: Option<Difficulty> = None;
        let mut seed: Option<u64> = None;
        let mut data_dir: Option<PathBuf> = None;
        let mut rest = Vec::new();

        let mut iter = args.iter().peekable();
        while let Some(arg) = iter.next() {
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) if flag.starts_with("--") => (flag, Some(value.to_string())),
                _ => (arg.as_str(), None),
            };
            let known = matches!(flag, "--countdown" | "--difficulty" | "--seed" | "--data-dir");
            if !known {
                rest.push(arg.clone());
                continue;
            }
            let value = match inline {
                Some(value) => value,
                None => iter
                    .next()
                    .cloned()
                    .ok_or_else(|| ArcadeError::Config(format!("Expected value after {flag}")))?,
            };
            match flag {
                "--countdown" => countdown = Some(parse_countdown(&value)?),
                "--difficulty" => difficulty = Some(Difficulty::parse(&value)?),
                "--seed" => seed = Some(parse_seed(&value)?),
                _ => data_dir = Some(PathBuf::from(value)),
            }
        }

        let data_dir = match data_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        let config = Self {
            session: SessionSettings {
                countdown_secs: countdown.unwrap_or(DEFAULT_COUNTDOWN),
                difficulty: difficulty.unwrap_or_default(),
            },
            seed,
            data_dir,
        };
        Ok((config, rest))
    }

    pub fn log_file(&self) -> PathBuf
    {
        self.data_dir.join("arcade.log")
    }
}

fn parse_countdown(value: &str) -> Result<u32>
{
    let parsed = value
        .parse::<u32>()
        .map_err(|_| ArcadeError::Config("Countdown must be a whole number of seconds".to_string()))?;
    Ok(parsed.min(MAX_COUNTDOWN))
}

fn parse_seed(value: &str) -> Result<u64>
{
    value
        .parse::<u64>()
        .map_err(|_| ArcadeError::Config("Seed must be a non-negative integer".to_string()))
}

fn default_data_dir() -> Result<PathBuf>
{
    if let Ok(dir) = env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let base = dirs::data_dir()
        .ok_or_else(|| ArcadeError::Config("Could not determine data directory".to_string()))?;
    Ok(base.join(APP_DIR))
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn args(list: &[&str]) -> Vec<String>
    {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn flags_accept_inline_and_separate_values()
    {
        let (config, rest) = ArcadeConfig::from_args(&args(&[
            "play",
            "--countdown=5",
            "--difficulty",
            "hard",
            "--data-dir=/tmp/arcade",
            "tapper",
        ]))
        .unwrap();

        assert_eq!(rest, args(&["play", "tapper"]));
        assert_eq!(config.session.countdown_secs, 5);
        assert_eq!(config.session.difficulty, Difficulty::Hard);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/arcade"));
        assert_eq!(config.log_file(), PathBuf::from("/tmp/arcade/arcade.log"));
    }

    #[test]
    fn countdown_is_clamped_and_validated()
    {
        let (config, _) =
            ArcadeConfig::from_args(&args(&["--countdown=99", "--data-dir=/tmp/x"])).unwrap();
        assert_eq!(config.session.countdown_secs, MAX_COUNTDOWN);

        let err = ArcadeConfig::from_args(&args(&["--countdown=soon", "--data-dir=/tmp/x"]));
        assert!(matches!(err, Err(ArcadeError::Config(_))));
    }

    #[test]
    fn missing_value_is_a_config_error()
    {
        let err = ArcadeConfig::from_args(&args(&["--seed"]));
        assert!(matches!(err, Err(ArcadeError::Config(_))));
    }

    #[test]
    fn difficulty_parsing_is_case_insensitive()
    {
        assert_eq!(Difficulty::parse(" Easy ").unwrap(), Difficulty::Easy);
        assert!(Difficulty::parse("nightmare").is_err());
    }
}
