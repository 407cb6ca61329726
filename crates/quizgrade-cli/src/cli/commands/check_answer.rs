use quizgrade_core::answer_check::check_answer;

use super::io::inline_or_file;
use crate::cli::args::{CheckAnswerArgs, OutputFormat};
use crate::exit_codes;

pub fn run(args: CheckAnswerArgs) -> anyhow::Result<i32> {
    let text = match inline_or_file(args.answer.as_deref(), args.answer_file.as_deref()) {
        Ok(t) => t.unwrap_or_default(),
        Err(e) => {
            eprintln!("error: {:#}", e);
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    let check = check_answer(&text, args.word_limit);
    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&check)?),
        OutputFormat::Text => {
            eprintln!(
                "{} ({} words)",
                if check.should_evaluate {
                    "✔ Ready for grading"
                } else {
                    "✖ Not gradable"
                },
                check.word_count
            );
            for e in &check.errors {
                eprintln!("  error: {}", e);
            }
            for w in &check.warnings {
                eprintln!("  warning: {}", w);
            }
        }
    }

    Ok(if check.should_evaluate {
        exit_codes::SUCCESS
    } else {
        exit_codes::FAILED
    })
}
