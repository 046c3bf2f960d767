use std::{
    fs,
    io::{Read, Write, stderr, stdin, stdout},
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering},
    },
    time::Instant,
};

use clap::{
    ArgAction, ArgGroup, Args, ColorChoice, CommandFactory, FromArgMatches, Parser, Subcommand,
    builder::styling::{AnsiColor, Color, Style, Styles},
};
use mimalloc::MiMalloc;
use rayon::{ThreadPoolBuilder, prelude::*};
use regex::Regex;
use serde::Serialize;

use masst::{
    ArtifactPreference, LibrarySearchRequest, MasstConfig, MasstVariant, QueryInput,
    SearchParams, SearchRequest, Spectrum, mirror_plot_links, read_matches, reduce_peak_text,
    search_library, submit,
};
use masst::results::database_usi;
use serde_json::Value;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const ANSI_RESET: &str = "\x1b[0m";
const ANSI_GREEN: &str = "\x1b[1;32m";
const ANSI_YELLOW: &str = "\x1b[1;33m";
const ANSI_RED: &str = "\x1b[1;31m";
const ANSI_BLUE: &str = "\x1b[1;34m";

const PEAK_LIST_EXTS: [&str; 3] = ["txt", "tsv", "csv"];

const AFTER_HELP: &str = "
\x1b[1;33mQUICK REFERENCE\x1b[0m (full flags are in `masst <command> --help`)

\x1b[1;32mUSAGE:\x1b[0m
  \x1b[96mmasst reduce\x1b[0m PATH [--max-peaks N]
  \x1b[96mmasst reduce\x1b[0m -i, --input-path DIR -o, --output-path DIR [--max-peaks N] [--cores C]
  \x1b[96mmasst mgf\x1b[0m --peaks FILE --precursor-mz MZ [--charge Z] [--max-peaks N] [-o FILE]
  \x1b[96mmasst resolve\x1b[0m --variant V --task ID [--analog] [--json]
  \x1b[96mmasst search\x1b[0m --variant V (--usi USI | --peaks FILE --precursor-mz MZ) [options]
  \x1b[96mmasst library\x1b[0m (--usi USI | --peaks FILE --precursor-mz MZ) [--max-peaks N] [--analog] [--json]
  \x1b[96mmasst matches\x1b[0m PATH [--usi USI]

\x1b[1;32mOPTIONS:\x1b[0m
  \x1b[96m-c\x1b[0m, \x1b[96m--config\x1b[0m FILE   JSON configuration
  \x1b[96m-h\x1b[0m, \x1b[96m--help\x1b[0m
  \x1b[96m-v\x1b[0m, \x1b[96m--version\x1b[0m

\x1b[1;32mEXAMPLES:\x1b[0m
  \x1b[96mmasst reduce\x1b[0m peaks.tsv --max-peaks 20
  \x1b[96mmasst search\x1b[0m --variant plant --usi mzspec:GNPS:GNPS-LIBRARY:accession:CCMSLIB00000085687
  \x1b[96mmasst library\x1b[0m --usi CCMSLIB00005435899 --analog
  \x1b[96mmasst resolve\x1b[0m --variant plant --task 0f8e2c1d9b7a4e6f8a0b1c2d3e4f5a6b --analog
";

fn cli_styles() -> Styles {
    Styles::styled().literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
}

#[derive(Parser)]
#[command(
    name = "masst",
    version = VERSION,
    arg_required_else_help = true,
    disable_help_subcommand = true,
    disable_version_flag = true
)]
struct Cli {
    #[arg(short = 'v', long = "version", action = ArgAction::SetTrue, global = true)]
    version: bool,

    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Option<Cmd>,
}

#[derive(Subcommand)]
enum Cmd {
    Reduce(ReduceArgs),
    Mgf(MgfArgs),
    Resolve(ResolveArgs),
    Search(SearchArgs),
    Library(LibraryArgs),
    Matches(MatchesArgs),
}

#[derive(Args)]
#[command(
    group(
        ArgGroup::new("reduce_mode")
            .args(["file_path", "input_path"])
            .required(true)
            .multiple(false)
    ),
    group(
        ArgGroup::new("pattern_mode")
            .args(["pattern", "pattern_exact", "regex"])
            .multiple(false)
    )
)]
struct ReduceArgs {
    /// Peak list file, or `-` for stdin
    #[arg(value_name = "PATH")]
    file_path: Option<PathBuf>,

    #[arg(short = 'i', long = "input-path", requires = "output_path")]
    input_path: Option<PathBuf>,

    #[arg(short = 'o', long = "output-path")]
    output_path: Option<PathBuf>,

    /// Keep only the N most intense peaks (one per rounded m/z)
    #[arg(short = 'n', long = "max-peaks", allow_negative_numbers = true)]
    max_peaks: Option<i64>,

    #[arg(long, default_value_t = false, action = ArgAction::SetTrue)]
    overwrite: bool,

    /// Batch mode: only files whose name contains this, ignoring case
    #[arg(long = "pattern")]
    pattern: Option<String>,

    /// Batch mode: only files whose name contains this exactly
    #[arg(long = "pattern-exact")]
    pattern_exact: Option<String>,

    /// Batch mode: only files whose name matches this regex
    #[arg(long = "regex")]
    regex: Option<String>,

    #[arg(
        long = "cores",
        default_value_t = 1u16,
        value_parser = clap::value_parser!(u16).range(1..=1024)
    )]
    cores: u16,
}

#[derive(Args)]
struct MgfArgs {
    #[arg(short = 'p', long = "peaks", required = true)]
    peaks: PathBuf,

    #[arg(long = "precursor-mz", required = true)]
    precursor_mz: f64,

    #[arg(long = "charge", value_parser = clap::value_parser!(u32).range(1..=40))]
    charge: Option<u32>,

    #[arg(short = 'n', long = "max-peaks", allow_negative_numbers = true)]
    max_peaks: Option<i64>,

    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct ResolveArgs {
    #[arg(long = "variant", value_parser = parse_variant, required = true)]
    variant: MasstVariant,

    #[arg(short = 't', long = "task", required = true)]
    task: String,

    #[arg(long, action = ArgAction::SetTrue)]
    analog: bool,

    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,
}

#[derive(Args)]
#[command(group(
    ArgGroup::new("query")
        .args(["usi", "peaks"])
        .required(true)
        .multiple(false)
))]
struct SearchArgs {
    #[arg(long = "variant", value_parser = parse_variant, required = true)]
    variant: MasstVariant,

    #[arg(long = "usi")]
    usi: Option<String>,

    #[arg(short = 'p', long = "peaks", requires = "precursor_mz")]
    peaks: Option<PathBuf>,

    #[arg(long = "precursor-mz")]
    precursor_mz: Option<f64>,

    #[arg(long = "charge", value_parser = clap::value_parser!(u32).range(1..=40))]
    charge: Option<u32>,

    #[arg(short = 'n', long = "max-peaks", allow_negative_numbers = true)]
    max_peaks: Option<i64>,

    #[command(flatten)]
    tuning: SearchTuning,

    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,
}

/// Overrides for the configured search defaults.
#[derive(Args)]
struct SearchTuning {
    #[arg(long = "pm-tolerance")]
    pm_tolerance: Option<f64>,

    #[arg(long = "fragment-tolerance")]
    fragment_tolerance: Option<f64>,

    #[arg(long = "min-cos")]
    min_cos: Option<f64>,

    #[arg(long = "min-matched-peaks")]
    min_matched_peaks: Option<u32>,

    #[arg(long, action = ArgAction::SetTrue)]
    analog: bool,

    #[arg(long = "delta-mass-below")]
    delta_mass_below: Option<f64>,

    #[arg(long = "delta-mass-above")]
    delta_mass_above: Option<f64>,
}

#[derive(Args)]
#[command(group(
    ArgGroup::new("query")
        .args(["usi", "peaks"])
        .required(true)
        .multiple(false)
))]
struct LibraryArgs {
    /// USI or bare library id (CCMSLIB...)
    #[arg(long = "usi")]
    usi: Option<String>,

    #[arg(short = 'p', long = "peaks", requires = "precursor_mz")]
    peaks: Option<PathBuf>,

    #[arg(long = "precursor-mz")]
    precursor_mz: Option<f64>,

    #[arg(long = "charge", value_parser = clap::value_parser!(u32).range(1..=40))]
    charge: Option<u32>,

    #[arg(short = 'n', long = "max-peaks", allow_negative_numbers = true)]
    max_peaks: Option<i64>,

    #[arg(long, action = ArgAction::SetTrue)]
    analog: bool,

    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,
}

#[derive(Args)]
struct MatchesArgs {
    #[arg(value_name = "PATH")]
    file_path: PathBuf,

    /// Query USI; adds mirror plot links to every match
    #[arg(long = "usi")]
    usi: Option<String>,
}

fn parse_variant(s: &str) -> Result<MasstVariant, String> {
    s.parse()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut cmd = Cli::command();
    cmd = cmd
        .styles(cli_styles())
        .color(ColorChoice::Auto)
        .after_help(AFTER_HELP);

    let matches = cmd.get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    if cli.version {
        println!("{VERSION}");
        return Ok(());
    }

    let config = load_config(cli.config.as_deref())?;

    match cli.cmd {
        Some(Cmd::Reduce(cmd)) => reduce(cmd).map_err(|e| e.into()),
        Some(Cmd::Mgf(cmd)) => mgf(cmd).map_err(|e| e.into()),
        Some(Cmd::Resolve(cmd)) => resolve(&config, cmd).map_err(|e| e.into()),
        Some(Cmd::Search(cmd)) => search(&config, cmd).map_err(|e| e.into()),
        Some(Cmd::Library(cmd)) => library(&config, cmd).map_err(|e| e.into()),
        Some(Cmd::Matches(cmd)) => matches_table(&config, cmd).map_err(|e| e.into()),
        None => Ok(()),
    }
}

fn load_config(path: Option<&Path>) -> Result<MasstConfig, String> {
    let Some(path) = path else {
        return Ok(MasstConfig::default());
    };
    let cwd = std::env::current_dir().map_err(|e| format!("get current dir failed: {e}"))?;
    let path = resolve_user_path(&cwd, path);
    MasstConfig::load(&path).map_err(|e| format!("load config {} failed: {e}", path.display()))
}

fn print_json_full<T: Serialize>(v: &T) -> Result<(), String> {
    let s = serde_json::to_string_pretty(v).map_err(|e| format!("json failed: {e}"))?;
    println!("{s}");
    Ok(())
}

fn read_text_arg(cwd: &Path, p: &Path) -> Result<String, String> {
    if p == Path::new("-") {
        let mut s = String::new();
        stdin()
            .read_to_string(&mut s)
            .map_err(|e| format!("read stdin failed: {e}"))?;
        return Ok(s);
    }
    let path = resolve_user_path(cwd, p);
    fs::read_to_string(&path).map_err(|e| format!("read {} failed: {e}", path.display()))
}

fn reduce(cmd: ReduceArgs) -> Result<(), String> {
    let cwd = std::env::current_dir().map_err(|e| format!("get current dir failed: {e}"))?;

    if let Some(file_path) = cmd.file_path.as_deref() {
        let text = read_text_arg(&cwd, file_path)?;
        let out = reduce_peak_text(&text, cmd.max_peaks).map_err(|e| e.to_string())?;
        if !out.is_empty() {
            println!("{out}");
        }
        return Ok(());
    }

    let (Some(input_path), Some(output_path)) =
        (cmd.input_path.as_deref(), cmd.output_path.as_deref())
    else {
        return Err("batch mode needs both --input-path and --output-path".to_string());
    };
    reduce_batch(&cwd, input_path, output_path, &cmd)
}

fn reduce_batch(
    cwd: &Path,
    input_path: &Path,
    output_path: &Path,
    cmd: &ReduceArgs,
) -> Result<(), String> {
    let input_root = resolve_user_path(cwd, input_path);
    let output_root = resolve_user_path(cwd, output_path);

    fs::create_dir_all(&output_root).map_err(|e| format!("create output dir failed: {e}"))?;

    let filter = build_name_filter(
        cmd.pattern.as_deref(),
        cmd.pattern_exact.as_deref(),
        cmd.regex.as_deref(),
    )?;

    let files = collect_files_with_exts(&input_root, &PEAK_LIST_EXTS, filter.as_deref())?;
    if files.is_empty() {
        return Err(format!(
            "no matching peak list files found under {}",
            input_root.display()
        ));
    }

    let pool = ThreadPoolBuilder::new()
        .num_threads(cmd.cores as usize)
        .build()
        .map_err(|e| format!("rayon thread pool init failed: {e}"))?;

    let t_all = Instant::now();
    let total = files.len();

    let print_lock = Arc::new(Mutex::new(()));
    let done = Arc::new(AtomicUsize::new(0));
    let ok = Arc::new(AtomicU32::new(0));
    let failed = Arc::new(AtomicU32::new(0));
    let skipped = Arc::new(AtomicU32::new(0));
    let had_failed = Arc::new(AtomicBool::new(false));

    let report_error = |name: &str, msg: String| {
        had_failed.store(true, Ordering::Relaxed);
        failed.fetch_add(1, Ordering::Relaxed);
        let n = done.fetch_add(1, Ordering::Relaxed) + 1;
        let _g = print_lock.lock().unwrap_or_else(|e| e.into_inner());
        eprintln!("{ANSI_RED}[error]{ANSI_RESET} [{n}/{total}] {name}: {msg}");
        let _ = stderr().flush();
    };

    pool.install(|| {
        files.par_iter().for_each(|in_path| {
            let rel = match in_path.strip_prefix(&input_root) {
                Ok(v) => v,
                Err(_) => {
                    report_error(&basename(in_path), "cannot make relative path".to_string());
                    return;
                }
            };

            let out_dir = output_root.join(rel.parent().unwrap_or_else(|| Path::new("")));
            let out_path = out_dir.join(out_name_for_peak_file(in_path));

            if !cmd.overwrite {
                if let Ok(m) = fs::metadata(&out_path) {
                    if m.is_file() && m.len() > 0 {
                        skipped.fetch_add(1, Ordering::Relaxed);
                        let n = done.fetch_add(1, Ordering::Relaxed) + 1;
                        let name = basename(&out_path);
                        let _g = print_lock.lock().unwrap_or_else(|e| e.into_inner());
                        println!("{ANSI_YELLOW}[skip]{ANSI_RESET} [{n}/{total}] {name}");
                        let _ = stdout().flush();
                        return;
                    }
                }
            }

            if let Err(e) = fs::create_dir_all(&out_dir) {
                report_error(&basename(&out_dir), format!("create output dir failed: {e}"));
                return;
            }

            let t0 = Instant::now();

            let text = match fs::read_to_string(in_path) {
                Ok(v) => v,
                Err(e) => {
                    report_error(&basename(in_path), format!("read failed: {e}"));
                    return;
                }
            };

            let reduced = match reduce_peak_text(&text, cmd.max_peaks) {
                Ok(v) => v,
                Err(e) => {
                    report_error(&basename(in_path), e.to_string());
                    return;
                }
            };

            let in_peaks = text.lines().filter(|l| !l.trim().is_empty()).count();
            let out_peaks = reduced.lines().count();

            if let Err(e) = fs::write(&out_path, reduced_file_contents(&reduced)) {
                report_error(&basename(&out_path), format!("write failed: {e}"));
                return;
            }

            ok.fetch_add(1, Ordering::Relaxed);
            let n = done.fetch_add(1, Ordering::Relaxed) + 1;
            let elapsed_s = t0.elapsed().as_secs_f64();

            let (tag, color) = if out_peaks < in_peaks {
                ("[reduced]", ANSI_BLUE)
            } else {
                ("[ok]", ANSI_GREEN)
            };
            let name = basename(&out_path);

            let _g = print_lock.lock().unwrap_or_else(|e| e.into_inner());
            println!(
                "{color}{tag}{ANSI_RESET} [{n}/{total}] output: {name}  peaks={in_peaks}->{out_peaks}, time={elapsed_s:.3}s"
            );
            let _ = stdout().flush();
        })
    });

    let ok = ok.load(Ordering::Relaxed);
    let failed = failed.load(Ordering::Relaxed);
    let skipped = skipped.load(Ordering::Relaxed);

    let total_secs = t_all.elapsed().as_secs();
    let h = total_secs / 3600;
    let m = (total_secs % 3600) / 60;
    let s = total_secs % 60;

    println!(
        "reduced_ok={ok} reduced_failed={failed} reduced_skipped={skipped} total_time={h:02}:{m:02}:{s:02}"
    );

    if had_failed.load(Ordering::Relaxed) {
        return Err("some files failed".to_string());
    }
    Ok(())
}

fn mgf(cmd: MgfArgs) -> Result<(), String> {
    let cwd = std::env::current_dir().map_err(|e| format!("get current dir failed: {e}"))?;
    let text = read_text_arg(&cwd, &cmd.peaks)?;
    let spectrum = Spectrum::from_peak_text(&text, cmd.precursor_mz, cmd.charge, cmd.max_peaks)
        .map_err(|e| e.to_string())?;

    match cmd.output {
        Some(out) => {
            let out = resolve_user_path(&cwd, &out);
            fs::write(&out, spectrum.to_mgf())
                .map_err(|e| format!("write {} failed: {e}", out.display()))?;
            println!(
                "{ANSI_GREEN}[ok]{ANSI_RESET} output: {}  peaks={}",
                basename(&out),
                spectrum.peaks.len()
            );
        }
        None => print!("{}", spectrum.to_mgf()),
    }
    Ok(())
}

fn resolve(config: &MasstConfig, cmd: ResolveArgs) -> Result<(), String> {
    let layout = config.layout(cmd.variant);
    let resolution = layout
        .resolve(&cmd.task, ArtifactPreference::from_analog(cmd.analog))
        .map_err(|e| e.to_string())?;

    if cmd.json {
        return print_json_full(&resolution);
    }
    println!("{}\t{}", resolution.state, resolution.path.display());
    Ok(())
}

fn reduced_file_contents(reduced: &str) -> String {
    if reduced.is_empty() {
        String::new()
    } else {
        format!("{reduced}\n")
    }
}

fn query_input(
    usi: Option<String>,
    peaks: Option<&Path>,
    precursor_mz: Option<f64>,
    charge: Option<u32>,
) -> Result<QueryInput, String> {
    match (usi, peaks) {
        (Some(usi), _) => Ok(QueryInput::Usi(usi)),
        (None, Some(peaks)) => {
            let Some(precursor_mz) = precursor_mz else {
                return Err("--peaks needs --precursor-mz".to_string());
            };
            let cwd =
                std::env::current_dir().map_err(|e| format!("get current dir failed: {e}"))?;
            let text = read_text_arg(&cwd, peaks)?;
            // the cap is applied by the library so USI and peak queries share one path
            let spectrum = Spectrum::from_peak_text(&text, precursor_mz, charge, None)
                .map_err(|e| e.to_string())?;
            Ok(QueryInput::Spectrum(spectrum))
        }
        (None, None) => Err("either --usi or --peaks is required".to_string()),
    }
}

fn search(config: &MasstConfig, cmd: SearchArgs) -> Result<(), String> {
    let input = query_input(cmd.usi, cmd.peaks.as_deref(), cmd.precursor_mz, cmd.charge)?;

    let request = SearchRequest {
        input,
        max_peaks: cmd.max_peaks,
        params: apply_tuning(&config.search, &cmd.tuning),
    };

    let t0 = Instant::now();
    let outcome = submit(config, cmd.variant, &request).map_err(|e| e.to_string())?;

    if cmd.json {
        return print_json_full(&outcome);
    }

    let color = match outcome.resolution.state {
        masst::ResultState::SuccessWithResults => ANSI_GREEN,
        masst::ResultState::SuccessNoMatches => ANSI_YELLOW,
        masst::ResultState::Error => ANSI_RED,
    };
    println!(
        "{color}[{}]{ANSI_RESET} task={} output: {}  time={:.3}s",
        outcome.resolution.state,
        outcome.job_id,
        outcome.resolution.path.display(),
        t0.elapsed().as_secs_f64()
    );
    Ok(())
}

fn apply_tuning(defaults: &SearchParams, t: &SearchTuning) -> SearchParams {
    SearchParams {
        precursor_mz_tol: t.pm_tolerance.unwrap_or(defaults.precursor_mz_tol),
        mz_tol: t.fragment_tolerance.unwrap_or(defaults.mz_tol),
        min_cos: t.min_cos.unwrap_or(defaults.min_cos),
        min_matched_signals: t.min_matched_peaks.unwrap_or(defaults.min_matched_signals),
        analog: t.analog || defaults.analog,
        analog_mass_below: t.delta_mass_below.unwrap_or(defaults.analog_mass_below),
        analog_mass_above: t.delta_mass_above.unwrap_or(defaults.analog_mass_above),
    }
}

fn library(config: &MasstConfig, cmd: LibraryArgs) -> Result<(), String> {
    let input = query_input(cmd.usi, cmd.peaks.as_deref(), cmd.precursor_mz, cmd.charge)?;
    let request = LibrarySearchRequest {
        input,
        max_peaks: cmd.max_peaks,
        analog: cmd.analog,
    };

    let t0 = Instant::now();
    let found = search_library(config, &request).map_err(|e| e.to_string())?;

    if cmd.json {
        return print_json_full(&found);
    }

    let (tag, color) = if found.matches.is_empty() {
        ("[no matches]", ANSI_YELLOW)
    } else {
        ("[ok]", ANSI_GREEN)
    };
    println!(
        "{color}{tag}{ANSI_RESET} task={} matches={}  time={:.3}s",
        found.job_id,
        found.matches.len(),
        t0.elapsed().as_secs_f64()
    );
    for record in &found.matches {
        let line = serde_json::to_string(record).map_err(|e| format!("json failed: {e}"))?;
        println!("{line}");
    }
    Ok(())
}

fn matches_table(config: &MasstConfig, cmd: MatchesArgs) -> Result<(), String> {
    let cwd = std::env::current_dir().map_err(|e| format!("get current dir failed: {e}"))?;
    let path = resolve_user_path(&cwd, &cmd.file_path);
    let mut records =
        read_matches(&path).map_err(|e| format!("read {} failed: {e}", path.display()))?;

    if let Some(usi) = cmd.usi.as_deref() {
        add_mirror_links(&config.usi_resolver_url, usi, &mut records)?;
    }
    print_json_full(&records)
}

/// Adds a `Mirror Plot` object to each record, or null for rows that do not name
/// a database spectrum.
fn add_mirror_links(
    resolver_url: &str,
    query_usi: &str,
    records: &mut [masst::MatchRecord],
) -> Result<(), String> {
    for record in records.iter_mut() {
        let links = if database_usi(record).is_ok() {
            let links =
                mirror_plot_links(resolver_url, query_usi, record).map_err(|e| e.to_string())?;
            serde_json::to_value(links).map_err(|e| format!("json failed: {e}"))?
        } else {
            Value::Null
        };
        record.insert("Mirror Plot".to_string(), links);
    }
    Ok(())
}

fn file_ext_lower(path: &Path) -> String {
    path.extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

fn out_name_for_peak_file(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_else(|| basename(path));
    format!("{stem}.reduced.txt")
}

fn build_name_filter(
    pattern: Option<&str>,
    pattern_exact: Option<&str>,
    regex: Option<&str>,
) -> Result<Option<Box<dyn Fn(&str) -> bool + Send + Sync>>, String> {
    if let Some(p) = pattern {
        let needle = p.to_lowercase();
        return Ok(Some(Box::new(move |name: &str| {
            name.to_lowercase().contains(&needle)
        })));
    }

    if let Some(p) = pattern_exact {
        let needle = p.to_string();
        return Ok(Some(Box::new(move |name: &str| name.contains(&needle))));
    }

    if let Some(r) = regex {
        let re = Regex::new(r).map_err(|e| format!("invalid regex: {e}"))?;
        return Ok(Some(Box::new(move |name: &str| re.is_match(name))));
    }

    Ok(None)
}

fn collect_files_with_exts(
    input_root: &Path,
    exts: &[&str],
    name_filter: Option<&(dyn Fn(&str) -> bool + Send + Sync)>,
) -> Result<Vec<PathBuf>, String> {
    let mut out = Vec::new();
    let mut stack = vec![input_root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let entries = fs::read_dir(&dir).map_err(|e| format!("read dir failed: {e}"))?;
        for entry in entries {
            let entry = entry.map_err(|e| format!("read dir entry failed: {e}"))?;
            let p = entry.path();
            if p.is_dir() {
                stack.push(p);
                continue;
            }
            if !p.is_file() {
                continue;
            }
            let ext = file_ext_lower(&p);
            if !exts.iter().any(|want| ext == *want) {
                continue;
            }
            let name = p.file_name().and_then(|s| s.to_str()).unwrap_or("");
            // skip our own output when it lands under the input tree
            if name.ends_with(".reduced.txt") {
                continue;
            }
            if let Some(f) = name_filter {
                if !f(name) {
                    continue;
                }
            }
            out.push(p);
        }
    }

    out.sort();
    Ok(out)
}

fn resolve_user_path(cwd: &Path, p: &Path) -> PathBuf {
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        cwd.join(p)
    }
}

#[inline]
fn basename(p: &Path) -> std::borrow::Cow<'_, str> {
    p.file_name()
        .unwrap_or_else(|| p.as_os_str())
        .to_string_lossy()
}

#[cfg(test)]
mod tests;
