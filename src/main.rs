// docverify CLI - chat, single JSON turns, and verification tooling
use anyhow::{bail, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde_json::json;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use docverify::app;
use docverify::config::Settings;
use docverify::conversation::{ConversationContext, ConversationState, TurnRequest, TurnResponse};
use docverify::storage::{seed_database, DocumentPartitions, FlatFileRecords, SearchCriterion};
use docverify::DocumentVerifier;

#[derive(Parser, Debug)]
#[command(author, version, about = "Student document verification assistant")]
struct Args {
    /// TOML settings file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Student record file (overrides config and environment)
    #[arg(long, global = true)]
    database: Option<PathBuf>,
    /// Root directory holding one folder per document category
    #[arg(long, global = true)]
    documents: Option<PathBuf>,
    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive conversation on the terminal
    Chat,
    /// Read one JSON turn request from stdin and print the response
    Turn,
    /// Verify the documents of one student
    Verify { identity_number: String },
    /// Print the text recovered from a PDF
    Extract { pdf_file: PathBuf },
    /// Look up students
    Search(SearchArgs),
    /// Create the record file and document folders
    Init,
}

#[derive(ClapArgs, Debug)]
#[group(required = true, multiple = false)]
struct SearchArgs {
    #[arg(long)]
    id: Option<String>,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    code: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut settings = Settings::load(args.config.as_deref()).context("loading settings")?;
    if let Some(database) = args.database {
        settings.database_path = database;
    }
    if let Some(documents) = args.documents {
        settings.documents_dir = documents;
    }

    match args.command {
        Command::Chat => run_chat(&settings),
        Command::Turn => run_turn(&settings),
        Command::Verify { identity_number } => run_verify(&settings, &identity_number),
        Command::Extract { pdf_file } => run_extract(&settings, &pdf_file),
        Command::Search(search) => run_search(&settings, search),
        Command::Init => run_init(&settings),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "docverify=debug" } else { "docverify=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_chat(settings: &Settings) -> Result<()> {
    let engine = app::build_engine(settings, app::build_ocr(settings));
    let mut state = ConversationState::Start;
    let mut context = ConversationContext::default();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    writeln!(stdout, "Asistente SENA - escribe 'salir' para terminar.")?;
    prompt(&mut stdout)?;

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().eq_ignore_ascii_case("salir") {
            break;
        }

        let response = engine.handle_turn(TurnRequest {
            state,
            message: line,
            context,
        });
        print_response(&mut stdout, &response)?;
        state = response.state;
        context = response.context;
        prompt(&mut stdout)?;
    }
    Ok(())
}

fn prompt(out: &mut impl Write) -> Result<()> {
    write!(out, "> ")?;
    out.flush()?;
    Ok(())
}

fn print_response(out: &mut impl Write, response: &TurnResponse) -> Result<()> {
    if let Some(trace) = &response.trace {
        for step in trace {
            writeln!(out, "  · {}", step)?;
        }
    }
    writeln!(out, "{}", render_markup(&response.message))?;
    Ok(())
}

/// Terminal rendering of the inline markup the web client interprets.
fn render_markup(message: &str) -> String {
    message.replace("<br>", "\n").replace("<b>", "").replace("</b>", "")
}

fn run_turn(settings: &Settings) -> Result<()> {
    let mut raw = String::new();
    io::stdin().read_to_string(&mut raw)?;
    let request: TurnRequest = if raw.trim().is_empty() {
        TurnRequest::default()
    } else {
        serde_json::from_str(&raw).context("parsing turn request")?
    };

    let engine = app::build_engine(settings, app::build_ocr(settings));
    let response = engine.handle_turn(request);
    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}

fn run_verify(settings: &Settings, identity_number: &str) -> Result<()> {
    let records = FlatFileRecords::new(&settings.database_path).snapshot();
    let Some(record) = records.get(identity_number.trim()) else {
        bail!("identity {} not found in {}", identity_number, settings.database_path.display());
    };

    let orchestrator = app::build_orchestrator(settings, app::build_ocr(settings));
    let result = orchestrator.verify(&record.identity_number, &record.full_name());
    let report = json!({
        "student": record,
        "all_present": result.all_present(),
        "missing": result.missing(),
        "result": result,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_extract(settings: &Settings, pdf_file: &Path) -> Result<()> {
    if !pdf_file.exists() {
        bail!("{} does not exist", pdf_file.display());
    }
    let extractor = app::build_extractor(settings, app::build_ocr(settings));
    let outcome = extractor.extract_detailed(pdf_file);

    println!(
        "⚙️  Method: {:?} | OCR pages: {} | Time: {}ms | Chars: {}",
        outcome.method,
        outcome.ocr_pages,
        outcome.extraction_time_ms,
        outcome.text.trim().chars().count()
    );
    println!("{}", outcome.text.trim());
    Ok(())
}

fn run_search(settings: &Settings, search: SearchArgs) -> Result<()> {
    let criterion = match (search.id, search.name, search.code) {
        (Some(id), _, _) => SearchCriterion::Identity(id),
        (_, Some(name), _) => SearchCriterion::Name(name),
        (_, _, Some(code)) => SearchCriterion::ProgramCode(code),
        _ => bail!("one of --id, --name or --code is required"),
    };

    let records = FlatFileRecords::new(&settings.database_path).snapshot();
    let results = records.search(&criterion);
    if results.is_empty() {
        println!("No students found.");
    }
    for record in results {
        println!(
            "{} {}  {}  {} (Ficha {})",
            record.document_type,
            record.identity_number,
            record.full_name(),
            record.program_name,
            record.cohort
        );
    }
    Ok(())
}

fn run_init(settings: &Settings) -> Result<()> {
    let created = seed_database(&settings.database_path)
        .with_context(|| format!("seeding {}", settings.database_path.display()))?;
    let partitions = DocumentPartitions::new(&settings.documents_dir);
    partitions.ensure_dirs().context("creating document folders")?;

    println!("📂 Initialized:");
    println!(
        "- Records: {}{}",
        settings.database_path.display(),
        if created { " (created)" } else { "" }
    );
    println!("- Documents: {}", partitions.root().display());
    Ok(())
}
