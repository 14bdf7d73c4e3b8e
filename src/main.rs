use log::{debug, error, info};
use rustyline::{error::ReadlineError, DefaultEditor};

use multicalc::convert::Converter;
use multicalc::history::History;
use multicalc::session::Session;
use multicalc::settings::{Settings, SETTINGS_FILE};
use multicalc::{evaluate, plot};

const HISTORY_FILE: &str = "multicalc_history.txt";

type DynResult = Result<(), Box<dyn std::error::Error>>;

fn main() -> DynResult {
    if let Err(e) = dotenvy::dotenv() {
        println!("dotenvy load with error {}", e);
    }
    env_logger::init();

    let args = std::env::args().collect::<Vec<String>>();
    let mode = args.get(1).map(String::as_str).unwrap_or("-i");
    debug!("{:?}", mode);

    match mode {
        "-i" => repl(),
        "-e" => evaluate_once(args.get(2).expect("must provide an expression")),
        "-p" => plot_once(&args[2..]),
        "-c" => convert_once(&args[2..]),
        _ => panic!("expect a mode: -i | -e | -p | -c"),
    }
}

fn evaluate_once(input: &str) -> DynResult {
    match evaluate(input) {
        Ok(value) => println!("{}", value),
        Err(e) => {
            error!("{}: {}", e.kind(), e);
            println!("Error");
        }
    }
    Ok(())
}

fn plot_once(args: &[String]) -> DynResult {
    let [expression, x_min, x_max] = args else {
        panic!("expect: -p <expression> <x_min> <x_max>");
    };
    let x_min: f64 = x_min.parse()?;
    let x_max: f64 = x_max.parse()?;

    match plot::sample_default(expression, x_min, x_max) {
        Ok(points) => {
            for (x, y) in points {
                println!("{}\t{}", x, y);
            }
        }
        Err(e) => {
            error!("{}: {}", e.kind(), e);
            println!("invalid function");
        }
    }
    Ok(())
}

fn convert_once(args: &[String]) -> DynResult {
    let [category, from, to, value] = args else {
        panic!("expect: -c <category> <from> <to> <value>");
    };
    let value: f64 = value.parse()?;

    match Converter::new().convert(category, from, to, value) {
        Ok(result) => println!("{}", result),
        Err(e) => {
            error!("{}", e);
            println!("Error");
        }
    }
    Ok(())
}

fn repl() -> DynResult {
    info!("Running in REPL mode");

    let settings = Settings::load(SETTINGS_FILE)?;
    debug!("{:?}", settings);

    let history = History::load(HISTORY_FILE)?;
    let mut session = Session::new(history);
    let mut rl = DefaultEditor::new()?;

    loop {
        match rl.readline("> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line)?;
                if line == ":quit" {
                    break;
                }
                run_line(line, &mut session);
            }
            Err(ReadlineError::Eof) => break,
            Err(ReadlineError::Interrupted) => break,
            Err(err) => {
                return Err(Box::new(err));
            }
        }
    }

    Ok(())
}

// on any error the expression buffer is dropped and a generic indicator
// shown, matching the calculator's display policy
fn run_line(line: &str, session: &mut Session) {
    let outcome = dispatch(line, session);
    match outcome {
        Ok(Some(text)) => println!("{}", text),
        Ok(None) => {}
        Err(e) => {
            error!("{}", e);
            println!("Error");
        }
    }
}

fn dispatch(
    line: &str,
    session: &mut Session,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let Some(command) = line.strip_prefix(':') else {
        let value = session.evaluate(line)?;
        return Ok(Some(value.to_string()));
    };

    let (command, rest) = match command.split_once(' ') {
        Some((c, r)) => (c, r.trim()),
        None => (command, ""),
    };

    match command {
        "frac" => Ok(Some(session.fraction(rest)?.to_string())),
        "inv" => Ok(Some(session.reciprocal(rest)?.to_string())),
        "pct" => Ok(Some(session.percent(rest)?.to_string())),
        "ans" => Ok(Some(session.last_result().to_string())),
        "m+" => Ok(Some(session.memory_add(rest)?.to_string())),
        "m-" => Ok(Some(session.memory_subtract(rest)?.to_string())),
        "mr" => Ok(Some(session.memory_recall().to_string())),
        "mc" => {
            session.memory_clear();
            Ok(None)
        }
        "history" => {
            for entry in session.history().sorted() {
                println!("{}", entry);
            }
            Ok(None)
        }
        "search" => {
            for entry in session.history().search(rest) {
                println!("{}", entry);
            }
            Ok(None)
        }
        "sort" => {
            session.history_mut().toggle_sort();
            Ok(None)
        }
        "clear" => {
            session.history_mut().clear()?;
            Ok(None)
        }
        "csv" => {
            session.history().export_csv(rest)?;
            Ok(Some(format!("exported to {}", rest)))
        }
        other => {
            // a named function button, e.g. `:sin 90`
            Ok(Some(session.apply_function(other, rest)?.to_string()))
        }
    }
}
