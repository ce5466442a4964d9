use clap::Parser;
use mtex_box as mb;
use mtex_lang as ml;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// mtex: a CLI for inspecting math text in plot labels
#[derive(Parser)]
#[clap(version)]
struct Cli {
    /// Log debug output. `RUST_LOG` overrides this.
    #[clap(short, long, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    sub_command: SubCommand,
}

#[derive(Parser)]
enum SubCommand {
    Lex(Lex),
    Parse(Parse),
    Check(Check),
    Hpack(Hpack),
}

fn main() {
    let args: Cli = Cli::parse();
    init_logging(args.verbose);
    let result = match args.sub_command {
        SubCommand::Lex(lex) => lex.run(),
        SubCommand::Parse(parse) => parse.run(),
        SubCommand::Check(check) => check.run(),
        SubCommand::Hpack(hpack) => hpack.run(),
    };
    if let Err(err) = result {
        println!["{err}"];
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Options shared by the commands that parse.
#[derive(clap::Args)]
struct ParseOptions {
    /// Fail on macros that are not in the built-in table.
    #[clap(long)]
    reject_unknown: bool,
}

impl ParseOptions {
    fn parse<'a>(&self, text: &'a str) -> Result<ml::ast::List<'a>, ml::Error> {
        let unknown_macros = if self.reject_unknown {
            ml::UnknownMacros::Reject
        } else {
            ml::UnknownMacros::Accept
        };
        ml::Parser::new(text).unknown_macros(unknown_macros).parse()
    }
}

fn report(err: &ml::Error, name: &str, text: &str) -> Result<(), String> {
    err.ariadne_report(name)
        .eprint((name, ariadne::Source::from(text)))
        .map_err(|io_err| format!["failed to print the report for {name}: {io_err}"])
}

/// Print the tokens of a formula.
#[derive(Parser)]
struct Lex {
    /// The formula, like `$x^2$`.
    formula: String,
}

impl Lex {
    fn run(self) -> Result<(), String> {
        let source = ml::Source::new("formula", &self.formula);
        for token in ml::tokenize(&self.formula) {
            println!(
                "{}\t{:?}\t{:?}",
                source.position(token.pos),
                token.kind,
                token.text
            );
        }
        Ok(())
    }
}

/// Print the syntax tree of a formula.
#[derive(Parser)]
struct Parse {
    /// The formula, like `$x^2$`.
    formula: String,

    #[clap(flatten)]
    options: ParseOptions,
}

impl Parse {
    fn run(self) -> Result<(), String> {
        match self.options.parse(&self.formula) {
            Ok(list) => {
                println!("{list}");
                Ok(())
            }
            Err(err) => {
                report(&err, "formula", &self.formula)?;
                Err(format!["{:?} error", err.class()])
            }
        }
    }
}

/// Check that every line of a file is a valid formula.
#[derive(Parser)]
struct Check {
    /// Path to the file of formulas, one per line.
    path: PathBuf,

    #[clap(flatten)]
    options: ParseOptions,
}

impl Check {
    fn run(self) -> Result<(), String> {
        let source = match fs::read_to_string(&self.path) {
            Ok(source) => source,
            Err(err) => {
                return Err(format!["failed to open file {:?}: {err}", &self.path]);
            }
        };
        let path = self.path.to_string_lossy();
        let mut num_errors = 0_usize;
        for (i, line) in source.lines().enumerate() {
            if let Err(err) = self.options.parse(line) {
                let name = format!["{path}:{}", i + 1];
                tracing::debug!(line = i + 1, class = ?err.class(), "formula failed to parse");
                report(&err, &name, line)?;
                num_errors += 1;
            }
        }
        if num_errors > 0 {
            return Err(format!("Input file had {num_errors} errors"));
        }
        Ok(())
    }
}

/// Pack a horizontal list and print how its glue is set.
///
/// Items are `box:<width>`, `kern:<width>`, or the name of a glue kind
///     (`fil`, `fill`, `filll`, `neg_fil`, `neg_fill`, `neg_filll`, `empty`, `ss`).
#[derive(Parser)]
struct Hpack {
    /// Width of the box.
    #[clap(long, default_value_t = 0.0)]
    width: f64,

    /// Add the width to the natural width instead of using it as is.
    #[clap(long)]
    additional: bool,

    items: Vec<String>,
}

impl Hpack {
    fn run(self) -> Result<(), String> {
        let children = self
            .items
            .iter()
            .map(String::as_str)
            .map(hpack_item)
            .collect::<Result<Vec<_>, _>>()?;
        let mut list = mb::HList::new(children);
        let fit = list.hpack(self.width, self.additional);
        println!("fit: {fit:?}");
        println!(
            "width: {}, height: {}, depth: {}",
            list.width, list.height, list.depth
        );
        let glue = list.glue;
        println!(
            "glue: {:?} {} ratio {} (set {})",
            glue.sign, glue.order, glue.ratio, glue.set
        );
        Ok(())
    }
}

fn hpack_item(item: &str) -> Result<mb::Horizontal, String> {
    let width = |s: &str| {
        s.parse::<f64>()
            .map_err(|err| format!["invalid width in `{item}`: {err}"])
    };
    Ok(match item.split_once(':') {
        Some(("box", w)) => mb::HBox::new(width(w)?).into(),
        Some(("kern", w)) => mb::Kern::new(width(w)?).into(),
        Some(_) => return Err(format!["unknown item `{item}`"]),
        None => mb::Glue::named(item).map_err(|err| err.to_string())?.into(),
    })
}
