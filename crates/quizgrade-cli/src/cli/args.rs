use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "quizgrade",
    version,
    about = "Extract multiple-choice questions from documents and grade descriptive answers"
)]
pub struct Cli {
    /// Debug-level logging (overrides RUST_LOG)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Extract questions from a text document (one line per paragraph)
    Extract(ExtractArgs),
    /// Check question records (JSON) for structural problems
    Validate(ValidateArgs),
    /// Grade a descriptive answer
    Evaluate(EvaluateArgs),
    /// Pre-submission checks on a descriptive answer
    CheckAnswer(CheckAnswerArgs),
    Version,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
pub struct ExtractArgs {
    /// Document lines; `-` reads stdin
    pub input: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[arg(long)]
    pub output: Option<PathBuf>,

    /// List records dropped during repair
    #[arg(long)]
    pub show_dropped: bool,
}

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// JSON array of `{stem, options: [{text, is_correct}]}`; `-` reads stdin
    pub input: PathBuf,

    /// Repair records before validating
    #[arg(long)]
    pub repair: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct EvaluateArgs {
    /// Evaluator config (YAML). Defaults to ./quizgrade.yaml when present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, required_unless_present = "batch")]
    pub question: Option<String>,

    /// Submission text
    #[arg(long, conflicts_with = "answer_file")]
    pub answer: Option<String>,

    #[arg(long)]
    pub answer_file: Option<PathBuf>,

    /// Reference answer text
    #[arg(long, conflicts_with = "reference_file")]
    pub reference: Option<String>,

    #[arg(long)]
    pub reference_file: Option<PathBuf>,

    #[arg(long, default_value_t = 100.0)]
    pub max_score: f64,

    /// JSON array of `{question, submission, reference?, max_score?}`
    #[arg(long, conflicts_with_all = ["question", "answer", "answer_file"])]
    pub batch: Option<PathBuf>,

    /// Override the configured model
    #[arg(long)]
    pub model: Option<String>,

    /// Grade even when the submission fails the pre-check
    #[arg(long)]
    pub skip_precheck: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct CheckAnswerArgs {
    #[arg(long, conflicts_with = "answer_file", required_unless_present = "answer_file")]
    pub answer: Option<String>,

    #[arg(long)]
    pub answer_file: Option<PathBuf>,

    /// Recommended word limit
    #[arg(long)]
    pub word_limit: Option<usize>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn evaluate_requires_question_or_batch() {
        assert!(Cli::try_parse_from(["quizgrade", "evaluate", "--answer", "x"]).is_err());
        assert!(Cli::try_parse_from(["quizgrade", "evaluate", "--batch", "b.json"]).is_ok());
        let cli = Cli::try_parse_from([
            "quizgrade", "-v", "evaluate", "--question", "Q?", "--answer", "A", "--max-score", "10",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.cmd {
            Command::Evaluate(args) => assert_eq!(args.max_score, 10.0),
            _ => panic!("expected evaluate"),
        }
    }
}
