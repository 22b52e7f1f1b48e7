//! A CLI tool for loading a set of categories and questions into the trivia
//! database. IDs are allocated through the same counters the server uses, so
//! seeded data and data created through the API never collide.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::BufReader;

use clap::{Arg, ArgAction, ArgMatches, Command};
use mongodb::{Client, Database};
use rocket::serde::json::serde_json;
use serde::Deserialize;

use trivia_backend::config::setup_database;
use trivia_backend::model::{
    common::CategoryId,
    db::{Category, Question, QuestionCore},
    mongodb::{Coll, Counter},
};

const PROGRAM_NAME: &str = "trivia-seed";

const ABOUT_TEXT: &str = "Load trivia categories and questions into the database.

EXIT CODES:
     0: Data imported.
     1: Invalid data or IO error; nothing was written.
     2: Database error.";

const DATA_PATH: &str = "DATA_PATH";
const DATA_PATH_HELP: &str = "The path to a JSON file of categories and questions";
const DEFAULT_DATA_PATH: &str = "seed/trivia.json";

const DB_URI: &str = "db-uri";
const DB_URI_HELP: &str = "MongoDB connection string [default: `db_uri` from Rocket.toml]";

const DATABASE: &str = "database";
const DATABASE_HELP: &str = "Name of the database to seed";
const DEFAULT_DATABASE: &str = "trivia";

const DROP: &str = "drop";
const DROP_HELP: &str = "Drop the database before seeding";

/// Construct the CLI configuration.
fn cli() -> Command {
    // Make the build dirty when the toml changes.
    include_str!("../Cargo.toml");

    clap::command!(PROGRAM_NAME)
        .about(ABOUT_TEXT)
        .arg(
            Arg::new(DATA_PATH)
                .help(DATA_PATH_HELP)
                .action(ArgAction::Set)
                .default_value(DEFAULT_DATA_PATH),
        )
        .arg(
            Arg::new(DB_URI)
                .long(DB_URI)
                .help(DB_URI_HELP)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new(DATABASE)
                .long(DATABASE)
                .help(DATABASE_HELP)
                .action(ArgAction::Set)
                .default_value(DEFAULT_DATABASE),
        )
        .arg(
            Arg::new(DROP)
                .long(DROP)
                .help(DROP_HELP)
                .action(ArgAction::SetTrue),
        )
}

/// Errors that this program may produce.
#[derive(Debug, Eq, PartialEq)]
enum Error {
    /// IO error described by the inner message.
    IO(String),
    /// Failed to decode the JSON file.
    Format(String),
    /// The file decoded, but its contents are unusable.
    Invalid(String),
    /// Failed to talk to the database.
    Db(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::IO(msg) => write!(f, "IO error: {msg}"),
            Error::Format(msg) => write!(f, "Invalid JSON: {msg}"),
            Error::Invalid(msg) => write!(f, "Invalid seed data: {msg}"),
            Error::Db(msg) => write!(f, "Database error: {msg}"),
        }
    }
}

impl From<mongodb::error::Error> for Error {
    fn from(err: mongodb::error::Error) -> Self {
        Error::Db(err.to_string())
    }
}

impl From<trivia_backend::error::Error> for Error {
    fn from(err: trivia_backend::error::Error) -> Self {
        Error::Db(err.to_string())
    }
}

/// The contents of a seed file.
#[derive(Debug, Deserialize)]
struct SeedData {
    categories: Vec<SeedCategory>,
    #[serde(default)]
    questions: Vec<SeedQuestion>,
}

#[derive(Debug, Deserialize)]
struct SeedCategory {
    #[serde(rename = "type")]
    name: String,
}

/// A question whose category is referred to by name, since IDs are only
/// known once categories have been inserted.
#[derive(Debug, Deserialize)]
struct SeedQuestion {
    question: String,
    answer: String,
    category: String,
    difficulty: u8,
}

impl SeedQuestion {
    fn with_category(&self, category: CategoryId) -> QuestionCore {
        QuestionCore {
            question: self.question.clone(),
            answer: self.answer.clone(),
            category,
            difficulty: self.difficulty,
        }
    }
}

impl SeedData {
    /// Check everything that can be checked before touching the database.
    fn validate(&self) -> Result<(), Error> {
        let mut names = HashMap::new();
        for (position, category) in self.categories.iter().enumerate() {
            let name = category.name.trim();
            if name.is_empty() {
                return Err(Error::Invalid(format!("category {position} has no name")));
            }
            if names.insert(name, position).is_some() {
                return Err(Error::Invalid(format!("category {name:?} is listed twice")));
            }
        }

        for (position, question) in self.questions.iter().enumerate() {
            if !names.contains_key(question.category.trim()) {
                return Err(Error::Invalid(format!(
                    "question {position} is in unknown category {:?}",
                    question.category
                )));
            }
            // The real ID isn't known yet; any will do for validation.
            question
                .with_category(CategoryId::MAX)
                .validate()
                .map_err(|err| Error::Invalid(format!("question {position}: {err}")))?;
        }
        Ok(())
    }
}

/// Read and validate a seed file.
fn load(path: &str) -> Result<SeedData, Error> {
    let file = BufReader::new(File::open(path).map_err(|e| Error::IO(e.to_string()))?);
    let data: SeedData =
        serde_json::from_reader(file).map_err(|e| Error::Format(e.to_string()))?;
    data.validate()?;
    Ok(data)
}

/// Counts of what was imported.
#[derive(Debug, Eq, PartialEq)]
struct Imported {
    categories: usize,
    questions: usize,
}

/// Write validated data into the given database.
async fn import(db: &Database, data: &SeedData, drop: bool) -> Result<Imported, Error> {
    if drop {
        db.drop(None).await?;
    }
    setup_database(db).await?;

    let categories = Coll::<Category>::from_db(db);
    let questions = Coll::<Question>::from_db(db);
    let counters = Coll::<Counter>::from_db(db);

    let mut ids = HashMap::with_capacity(data.categories.len());
    for category in &data.categories {
        let inserted = Category::insert(category.name.clone(), &categories, &counters).await?;
        ids.insert(inserted.name, inserted.id);
    }
    for question in &data.questions {
        // Validation guarantees every category is present.
        let category = ids[question.category.trim()];
        Question::insert(question.with_category(category), &questions, &counters).await?;
    }

    Ok(Imported {
        categories: data.categories.len(),
        questions: data.questions.len(),
    })
}

/// Work out which database server to connect to.
fn db_uri(args: &ArgMatches) -> Result<String, Error> {
    match args.get_one::<String>(DB_URI) {
        Some(uri) => Ok(uri.clone()),
        None => rocket::Config::figment()
            .extract_inner::<String>("db_uri")
            .map_err(|e| Error::Db(format!("no database configured: {e}"))),
    }
}

/// Run the import, report the result, and return the exit code.
async fn run(args: &ArgMatches) -> u8 {
    let path: &String = args.get_one(DATA_PATH).unwrap(); // Has a default.
    let database: &String = args.get_one(DATABASE).unwrap(); // Has a default.
    let drop = args.get_flag(DROP);

    let data = match load(path) {
        Ok(data) => data,
        Err(err) => {
            println!("{err}");
            return 1;
        }
    };

    let result: Result<Imported, Error> = async {
        let client = Client::with_uri_str(db_uri(args)?).await?;
        import(&client.database(database), &data, drop).await
    }
    .await;

    match result {
        Ok(Imported {
            categories,
            questions,
        }) => {
            println!("Imported {categories} categories and {questions} questions into {database}.");
            0
        }
        Err(err) => {
            println!("{err}");
            2
        }
    }
}

#[rocket::main]
async fn main() {
    let args = cli().get_matches();
    let exit_code = run(&args).await;
    std::process::exit(exit_code.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> SeedData {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn shipped_data_is_valid() {
        // This test enters backend code, so enable logging.
        log4rs_test_utils::test_logging::init_logging_once_for(["trivia_backend"], None, None);

        let data = load(DEFAULT_DATA_PATH).unwrap();
        assert_eq!(data.categories.len(), 6);
        assert!(!data.questions.is_empty());
        for category in &data.categories {
            assert!(
                data.questions
                    .iter()
                    .any(|question| question.category == category.name),
                "{} has no questions",
                category.name
            );
        }
    }

    #[test]
    fn invalid_data() {
        let unknown_category = parse(
            r#"{
                "categories": [{"type": "Science"}],
                "questions": [{"question": "Q?", "answer": "A", "category": "Art", "difficulty": 1}]
            }"#,
        );
        assert!(matches!(unknown_category.validate(), Err(Error::Invalid(_))));

        let duplicate_category = parse(r#"{"categories": [{"type": "Art"}, {"type": " Art"}]}"#);
        assert!(matches!(duplicate_category.validate(), Err(Error::Invalid(_))));

        let blank_category = parse(r#"{"categories": [{"type": ""}]}"#);
        assert!(matches!(blank_category.validate(), Err(Error::Invalid(_))));

        let too_hard = parse(
            r#"{
                "categories": [{"type": "Science"}],
                "questions": [{"question": "Q?", "answer": "A", "category": "Science", "difficulty": 6}]
            }"#,
        );
        assert!(matches!(too_hard.validate(), Err(Error::Invalid(_))));

        let blank_answer = parse(
            r#"{
                "categories": [{"type": "Science"}],
                "questions": [{"question": "Q?", "answer": " ", "category": "Science", "difficulty": 2}]
            }"#,
        );
        assert!(matches!(blank_answer.validate(), Err(Error::Invalid(_))));

        let categories_only = parse(r#"{"categories": [{"type": "Science"}]}"#);
        assert_eq!(categories_only.validate(), Ok(()));
    }

    #[test]
    fn unreadable_files() {
        assert!(matches!(load("not a real file"), Err(Error::IO(_))));
        assert!(matches!(load("Cargo.toml"), Err(Error::Format(_))));
    }

    #[test]
    fn correct_cli_usage() {
        let args = cli().try_get_matches_from([PROGRAM_NAME]).unwrap();
        assert_eq!(args.get_one::<String>(DATA_PATH).unwrap(), DEFAULT_DATA_PATH);
        assert_eq!(args.get_one::<String>(DATABASE).unwrap(), DEFAULT_DATABASE);
        assert!(!args.get_flag(DROP));
        assert_eq!(args.get_one::<String>(DB_URI), None);

        let command_line = [
            PROGRAM_NAME,
            "other.json",
            "--db-uri",
            "mongodb://db:27017",
            "--database",
            "staging",
            "--drop",
        ];
        let args = cli().try_get_matches_from(command_line).unwrap();
        assert_eq!(args.get_one::<String>(DATA_PATH).unwrap(), "other.json");
        assert_eq!(db_uri(&args), Ok("mongodb://db:27017".to_string()));
        assert_eq!(args.get_one::<String>(DATABASE).unwrap(), "staging");
        assert!(args.get_flag(DROP));
    }

    #[test]
    fn bad_cli_usage() {
        let command_line = [PROGRAM_NAME, "this", "invocation", "is", "incorrect"];
        cli().try_get_matches_from(command_line).unwrap_err();

        let command_line = [PROGRAM_NAME, "--drop=yes"];
        cli().try_get_matches_from(command_line).unwrap_err();
    }
}
