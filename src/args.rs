use clap::Parser;
use clap::Subcommand;
use secrecy::SecretString;
use std::path::PathBuf;
use std::{
    fmt::{Debug, Display},
    str::FromStr,
};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Display debugging information
    #[clap(long, global = true)]
    pub debug: bool,

    /// API OAuth access token
    #[clap(short, long, env, global = true)]
    pub api_token: Option<SecretString>,

    /// Repository API URL
    #[clap(long, env, global = true, default_value = "https://api.github.com")]
    pub api_url: String,

    /// Directory receiving the exported files
    #[clap(short, long, env, global = true, default_value = "Exports", parse(from_os_str))]
    pub output_dir: PathBuf,

    /// Items requested per page
    #[clap(long, env, global = true, default_value_t = 100, parse(try_from_str=per_page_in_range))]
    pub per_page: u32,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Export the accounts followed by users
    Following {
        #[clap(flatten)]
        seeds: Seeds,

        /// Also export the accounts followed by every followed account
        #[clap(short, long)]
        extended: bool,
    },
    /// Export the repositories starred by users
    Starred {
        #[clap(flatten)]
        seeds: Seeds,
    },
    /// Export the repositories owned by users
    Repos {
        #[clap(flatten)]
        seeds: Seeds,
    },
}

impl Command {
    pub fn seeds(&self) -> &Seeds {
        match self {
            Command::Following { seeds, .. } | Command::Starred { seeds } | Command::Repos { seeds } => seeds,
        }
    }
}

#[derive(clap::Args, Debug, Default)]
pub struct Seeds {
    /// Users to search (separated by comma). Defaults to the authenticated user
    #[clap(short, long)]
    pub user: Option<String>,

    /// File containing the users (one by line)
    #[clap(short, long, parse(from_os_str))]
    pub file: Option<PathBuf>,
}

impl Seeds {
    /// Users given on the command line followed by those of the file, in order.
    pub fn read(&self) -> std::io::Result<Vec<String>> {
        let mut users = split_users(self.user.as_deref().unwrap_or_default(), ',');
        if let Some(file) = &self.file {
            users.extend(split_users(&std::fs::read_to_string(file)?, '\n'));
        }
        Ok(users)
    }
}

fn split_users(users: &str, separator: char) -> Vec<String> {
    users
        .split(separator)
        .map(str::trim)
        .filter(|user| !user.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn per_page_in_range(value: &str) -> clap::Result<u32, String> {
    number_in_range(value, 1, 100, "per_page".to_string())
}

fn number_in_range<T>(value: &str, min: T, max: T, name: String) -> clap::Result<T, String>
where
    T: FromStr + PartialOrd + Display,
    <T as FromStr>::Err: Display,
{
    value.parse::<T>().map_err(|err| format!("{}", err)).and_then(|value| {
        if value < min || value > max {
            return Err(format!("{} is not in range {} .. {}.", name, min, max));
        }
        Ok(value)
    })
}

#[test]
fn per_page_in_range_test() {
    assert_eq!(per_page_in_range("100"), Ok(100));
    assert_eq!(per_page_in_range("1"), Ok(1));
    assert!(per_page_in_range("0").is_err());
    assert!(per_page_in_range("101").is_err());
    assert!(per_page_in_range("ten").is_err());
}

#[test]
fn split_users_test() {
    assert_eq!(split_users("alice, bob,,carol ", ','), vec!["alice", "bob", "carol"]);
    assert_eq!(split_users("alice\r\n\nbob\n", '\n'), vec!["alice", "bob"]);
    assert!(split_users("", ',').is_empty());
}

#[test]
fn parse_following_test() {
    let args = Args::try_parse_from(["github_export", "--debug", "following", "-u", "alice,bob", "-e"]).unwrap();
    assert!(args.debug);
    assert_eq!(args.per_page, 100);
    assert_eq!(args.output_dir, PathBuf::from("Exports"));
    match args.command {
        Command::Following { seeds, extended } => {
            assert!(extended);
            assert_eq!(seeds.read().unwrap(), vec!["alice", "bob"]);
        }
        command => panic!("Unexpected command {:?}", command),
    }
}

#[test]
fn options_after_subcommand_test() {
    let args = Args::try_parse_from([
        "github_export",
        "repos",
        "-u",
        "alice",
        "-o",
        "out",
        "--per-page",
        "50",
        "--api-url",
        "http://localhost:8080",
        "--api-token",
        "t0ken",
    ])
    .unwrap();
    assert_eq!(args.output_dir, PathBuf::from("out"));
    assert_eq!(args.per_page, 50);
    assert_eq!(args.api_url, "http://localhost:8080");
    assert!(args.api_token.is_some());
    assert!(matches!(args.command, Command::Repos { .. }));
}
