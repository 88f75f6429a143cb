use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use drivescore_core::config::Config;
use drivescore_core::grade::SafetyGrade;
use drivescore_core::report::{write_vehicle_csv, Report};
use drivescore_core::types::Severity;
use drivescore_core::{analyze_path, vehicle_detail, AnalyzeOptions};

#[derive(Parser, Debug)]
#[command(
    name = "drivescore",
    version,
    about = "Fleet eco-driving report: risk grades, fuel savings and CO2 (estimated)"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a vehicle CSV file or a directory of them
    #[command(alias = "analyse")]
    Analyze {
        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        strict: bool,

        /// Exit with code 2 when more vehicles than this grade as danger
        #[arg(long)]
        max_danger: Option<usize>,

        #[arg(long, default_value = "drivescore-out")]
        out: PathBuf,

        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, default_value = "json")]
        output_format: OutputFormat,
    },
    /// Print the drill-down for one vehicle as JSON
    Detail {
        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        vehicle: String,

        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Markdown,
    Csv,
    All,
}

struct Style {
    bold: &'static str,
    dim: &'static str,
    red: &'static str,
    green: &'static str,
    yellow: &'static str,
    reset: &'static str,
}

const COLOR: Style = Style {
    bold: "\x1b[1m",
    dim: "\x1b[2m",
    red: "\x1b[31m",
    green: "\x1b[32m",
    yellow: "\x1b[33m",
    reset: "\x1b[0m",
};

const PLAIN: Style = Style {
    bold: "",
    dim: "",
    red: "",
    green: "",
    yellow: "",
    reset: "",
};

fn style() -> &'static Style {
    if std::env::var_os("NO_COLOR").is_some() {
        &PLAIN
    } else {
        &COLOR
    }
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let res = match cli.cmd {
        Commands::Analyze {
            input,
            strict,
            max_danger,
            out,
            config,
            output_format,
        } => {
            let cfg = load_config(config.as_deref());
            init_logging(&cfg);
            let opts = AnalyzeOptions {
                strict: strict || cfg.strict.unwrap_or(false),
                max_danger: max_danger.or(cfg.max_danger),
                model: cfg.model,
                ..AnalyzeOptions::default()
            };
            run_analyze(&input, opts, &out, &output_format)
        }
        Commands::Detail {
            input,
            vehicle,
            config,
        } => {
            let cfg = load_config(config.as_deref());
            init_logging(&cfg);
            let opts = AnalyzeOptions {
                strict: cfg.strict.unwrap_or(false),
                model: cfg.model,
                ..AnalyzeOptions::default()
            };
            run_detail(&input, &vehicle, opts)
        }
    };

    match res {
        Ok(code) => code,
        Err(e) => {
            let s = style();
            eprintln!(
                "{}{red}error:{reset} {:#}",
                s.bold,
                e,
                red = s.red,
                reset = s.reset
            );
            std::process::ExitCode::from(1)
        }
    }
}

fn init_logging(cfg: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(cfg.log_level.as_deref().unwrap_or("warn"))
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_ansi(std::env::var_os("NO_COLOR").is_none())
        .try_init();
}

fn print_banner() {
    let s = style();
    eprintln!(
        "\n  {bold}drive{reset}{green}|{reset}{dim}score{reset}  {dim}fleet eco-driving report{reset}\n",
        bold = s.bold,
        green = s.green,
        dim = s.dim,
        reset = s.reset,
    );
}

fn grade_color(grade: SafetyGrade) -> &'static str {
    let s = style();
    match grade {
        SafetyGrade::Danger => s.red,
        SafetyGrade::Warning => s.yellow,
        SafetyGrade::Safe => s.green,
    }
}

fn severity_color(sev: &Severity) -> &'static str {
    let s = style();
    match sev {
        Severity::High => s.red,
        Severity::Medium => s.yellow,
        Severity::Low => s.dim,
    }
}

fn commas(n: u64) -> String {
    let s = n.to_string();
    let bytes = s.as_bytes();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, &b) in bytes.iter().enumerate() {
        if i > 0 && (bytes.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(b as char);
    }
    result
}

fn print_report(report: &Report, written: &[PathBuf]) {
    let s = style();
    let ins = &report.insights;
    let gc = grade_color(report.fleet_grade);

    eprintln!(
        "  {dim}fleet_grade           {reset}{gc}{bold}{}{reset}",
        report.fleet_grade.label(),
        dim = s.dim,
        gc = gc,
        bold = s.bold,
        reset = s.reset
    );
    eprintln!(
        "  {dim}vehicles              {reset}{bold}{}{reset}  {red}{} danger{reset}  {yellow}{} warning{reset}",
        ins.total_count,
        ins.danger_count,
        ins.warning_count,
        dim = s.dim,
        bold = s.bold,
        red = s.red,
        yellow = s.yellow,
        reset = s.reset
    );
    eprintln!(
        "  {dim}total_saving          {reset}{bold}{}{reset}  {dim}({} / month){reset}",
        commas(ins.total_saving),
        commas(report.monthly_saving),
        dim = s.dim,
        bold = s.bold,
        reset = s.reset
    );
    eprintln!(
        "  {dim}total_co2_kg          {reset}{bold}{}{reset}",
        commas(ins.total_co2_kg),
        dim = s.dim,
        bold = s.bold,
        reset = s.reset
    );
    eprintln!(
        "  {dim}avg_efficiency        {reset}{bold}{:.1}{reset} {dim}km/L{reset}",
        ins.average_current_efficiency,
        dim = s.dim,
        bold = s.bold,
        reset = s.reset
    );
    if !report.inputs.truncated_sources.is_empty() {
        eprintln!(
            "  {yellow}scan limit reached{reset}  {dim}{} file(s) not read{reset}",
            report.inputs.truncated_sources.len(),
            yellow = s.yellow,
            dim = s.dim,
            reset = s.reset
        );
    }

    if !ins.top3.is_empty() {
        eprintln!();
        for (i, v) in ins.top3.iter().enumerate() {
            eprintln!(
                "  {}. {gc}{}{reset}  {dim}risk {} / saving {}{reset}",
                i + 1,
                v.record.vehicle_id,
                v.risk_score,
                commas(v.estimated_saving_amount),
                gc = grade_color(v.safety_grade),
                dim = s.dim,
                reset = s.reset
            );
        }
    }

    if !report.findings.is_empty() {
        eprintln!();
        for f in &report.findings {
            let sc = severity_color(&f.severity);
            eprintln!(
                "  {sc}{:?}{reset}  {}",
                f.severity,
                f.id,
                sc = sc,
                reset = s.reset
            );
        }
    }

    eprintln!();
    for path in written {
        eprintln!(
            "  {dim}\u{2192} {}{reset}",
            path.display(),
            dim = s.dim,
            reset = s.reset
        );
    }
    eprintln!();
}

fn load_config(path: Option<&Path>) -> Config {
    let loaded = match path {
        Some(p) => Config::load(p)
            .map(Some)
            .with_context(|| format!("failed to load config {}", p.display())),
        None => Config::discover().context("failed to load discovered config"),
    };
    loaded
        .unwrap_or_else(|e| {
            let s = style();
            eprintln!("{}{}warning:{} {:#}", s.bold, s.yellow, s.reset, e);
            None
        })
        .unwrap_or_default()
}

fn run_analyze(
    input: &Path,
    opts: AnalyzeOptions,
    out: &Path,
    output_format: &OutputFormat,
) -> anyhow::Result<std::process::ExitCode> {
    let s = style();

    print_banner();

    let report = analyze_path(input, opts)?;

    std::fs::create_dir_all(out).with_context(|| format!("create out dir {}", out.display()))?;

    let write_json = matches!(output_format, OutputFormat::Json | OutputFormat::All);
    let write_md = matches!(output_format, OutputFormat::Markdown | OutputFormat::All);
    let write_csv = matches!(output_format, OutputFormat::Csv | OutputFormat::All);

    let mut written = Vec::new();

    if write_json {
        let json_path = out.join("report.json");
        let json = serde_json::to_vec_pretty(&report).context("serialize report json")?;
        std::fs::write(&json_path, json)
            .with_context(|| format!("write {}", json_path.display()))?;
        written.push(json_path);
    }

    if write_md {
        let md_path = out.join("report.md");
        std::fs::write(&md_path, report.to_markdown())
            .with_context(|| format!("write {}", md_path.display()))?;
        written.push(md_path);
    }

    if write_csv {
        let csv_path = out.join("vehicles.csv");
        let f = std::fs::File::create(&csv_path)
            .with_context(|| format!("create {}", csv_path.display()))?;
        write_vehicle_csv(f, &report.vehicles)
            .with_context(|| format!("write {}", csv_path.display()))?;
        written.push(csv_path);
    }

    debug!(files = written.len(), out = %out.display(), "reports written");

    // Machine-parseable line on stdout
    println!(
        "vehicles={} danger={} warning={} total_saving={} total_co2_kg={}",
        report.insights.total_count,
        report.insights.danger_count,
        report.insights.warning_count,
        report.insights.total_saving,
        report.insights.total_co2_kg
    );

    // Human-readable output on stderr
    print_report(&report, &written);

    let exit = match &report.gate {
        Some(g) if !g.pass => {
            eprintln!(
                "  {red}{bold}DANGER GATE FAILED{reset}  {dim}({} > {} allowed){reset}",
                g.danger_count,
                g.max_danger,
                red = s.red,
                bold = s.bold,
                dim = s.dim,
                reset = s.reset,
            );
            std::process::ExitCode::from(2)
        }
        _ => {
            eprintln!(
                "  {green}{bold}PASS{reset}",
                green = s.green,
                bold = s.bold,
                reset = s.reset
            );
            std::process::ExitCode::from(0)
        }
    };

    eprintln!();

    Ok(exit)
}

fn run_detail(
    input: &Path,
    vehicle: &str,
    opts: AnalyzeOptions,
) -> anyhow::Result<std::process::ExitCode> {
    let model = opts.model;
    let report = analyze_path(input, opts)?;

    let analysis = report
        .vehicles
        .iter()
        .find(|v| v.record.vehicle_id == vehicle)
        .with_context(|| format!("vehicle {} not found in {}", vehicle, input.display()))?;

    let detail = vehicle_detail(analysis, &model);
    let json = serde_json::to_string_pretty(&detail).context("serialize vehicle detail")?;
    println!("{}", json);

    Ok(std::process::ExitCode::from(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn commas_formats_numbers() {
        assert_eq!(commas(0), "0");
        assert_eq!(commas(1000), "1,000");
        assert_eq!(commas(1234567), "1,234,567");
    }

    #[test]
    #[serial]
    fn grade_color_follows_grade() {
        assert_eq!(grade_color(SafetyGrade::Safe), style().green);
        assert_eq!(grade_color(SafetyGrade::Warning), style().yellow);
        assert_eq!(grade_color(SafetyGrade::Danger), style().red);
    }

    #[test]
    #[serial]
    fn severity_color_thresholds() {
        assert_eq!(severity_color(&Severity::High), style().red);
        assert_eq!(severity_color(&Severity::Medium), style().yellow);
        assert_eq!(severity_color(&Severity::Low), style().dim);
    }

    #[test]
    #[serial]
    fn style_respects_no_color() {
        std::env::set_var("NO_COLOR", "1");
        assert_eq!(style().bold, "");
        std::env::remove_var("NO_COLOR");
        assert_ne!(style().bold, "");
    }

    #[test]
    #[serial]
    fn missing_config_file_falls_back_to_defaults() {
        let cfg = load_config(Some(Path::new("does-not-exist.toml")));
        assert_eq!(cfg.strict, None);
        assert_eq!(cfg.model.economics.fuel_price_per_l, 1600.0);
    }
}
