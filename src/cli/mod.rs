//! Construction cost CLI module
//!
//! Command-line interface for training, inspecting and querying the model.

use clap::{Args, Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::dataset::DEFAULT_DATASET_PATH;
use crate::error::CostError;
use crate::explainability::FeatureContribution;
use crate::export::{ModelArtifact, DEFAULT_ARTIFACT_PATH};
use crate::inference::{
    EconomicCondition, FeatureRole, ManualField, Prediction, PredictionRequest, Predictor,
    PredictorConfig, ProjectInput,
};
use crate::training::{TrainEngine, TrainingConfig, TrainingStage};

// ─── Styling helpers ───────────────────────────────────────────────────────────

const W: usize = 58; // box inner width
const BAR_WIDTH: usize = 28;

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }
fn bad(s: &str) -> ColoredString    { s.truecolor(235, 110, 110) }

fn line_box_top()    { println!("  {}", dim("┌──────────────────────────────────────────────────────────┐")); }
fn line_box_bottom() { println!("  {}", dim("└──────────────────────────────────────────────────────────┘")); }
fn line_box_sep()    { println!("  {}", dim("├──────────────────────────────────────────────────────────┤")); }

fn line_box(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let pad = W.saturating_sub(visible_len);
    println!("  {} {}{}{}", dim("│"), content, " ".repeat(pad.saturating_sub(1)), dim("│"));
}

fn line_box_center(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let total_pad = W.saturating_sub(visible_len);
    let left = total_pad / 2;
    let right = total_pad - left;
    println!("  {}{}{}{}{}", dim("│"), " ".repeat(left), content, " ".repeat(right), dim("│"));
}

fn line_box_empty() { line_box(""); }

fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut in_escape = false;
    for c in s.chars() {
        if c == '\x1b' { in_escape = true; continue; }
        if in_escape { if c == 'm' { in_escape = false; } continue; }
        out.push(c);
    }
    out
}

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(key), val.white())
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

/// Styled message for a missing dataset or artifact
pub fn print_missing_input(err: &CostError) {
    let hint = match err {
        CostError::DatasetNotFound(_) => "place the CSV in the working directory or pass --data",
        CostError::ArtifactNotFound(_) => "run `construction-cost train` first or pass --model",
        _ => "",
    };
    println!();
    println!("  {} {}", bad("✗"), err.to_string().white());
    if !hint.is_empty() {
        println!("    {}", dim(hint));
    }
    println!();
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "construction-cost")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Train and query a residential construction cost model")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Train the model and write the artifact
    Train {
        /// Input CSV (one banner row above the header)
        #[arg(short, long, default_value = DEFAULT_DATASET_PATH)]
        data: PathBuf,

        /// Output artifact file
        #[arg(short, long, default_value = DEFAULT_ARTIFACT_PATH)]
        output: PathBuf,

        /// Seed for the split and the synthetic samples
        #[arg(long, default_value = "42")]
        seed: u64,
    },

    /// Estimate the cost of one project
    Predict(PredictArgs),

    /// Show artifact metadata and coefficients
    Inspect {
        /// Trained artifact file
        #[arg(short, long, default_value = DEFAULT_ARTIFACT_PATH)]
        model: PathBuf,
    },

    /// Start the web server
    Serve {
        /// Server port
        #[arg(short, long, env = "API_PORT", default_value = "8080")]
        port: u16,

        /// Server host
        #[arg(long, env = "API_HOST", default_value = "0.0.0.0")]
        host: String,

        /// Trained artifact file
        #[arg(short, long, env = "MODEL_PATH", default_value = DEFAULT_ARTIFACT_PATH)]
        model: PathBuf,
    },
}

/// Manual fields for `predict`; omitted ones fall back to the training means
#[derive(Args, Debug, Clone)]
pub struct PredictArgs {
    /// Trained artifact file
    #[arg(short, long, default_value = DEFAULT_ARTIFACT_PATH)]
    pub model: PathBuf,

    #[arg(long)]
    pub total_floor_area: Option<f64>,

    #[arg(long)]
    pub lot_area: Option<f64>,

    #[arg(long)]
    pub prelim_est_unit_cost: Option<f64>,

    #[arg(long)]
    pub unit_price_start: Option<f64>,

    /// Duration in months
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=36))]
    pub duration: Option<u32>,

    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=20))]
    pub locality: Option<u32>,

    /// recession, stable or inflationary
    #[arg(long, default_value = "stable")]
    pub economy: EconomicCondition,

    /// Multiplier from model units to the display currency
    #[arg(long, default_value = "1.0")]
    pub currency_rate: f64,
}

impl PredictArgs {
    fn overrides(&self) -> [(ManualField, Option<f64>); 6] {
        [
            (ManualField::TotalFloorArea, self.total_floor_area),
            (ManualField::LotArea, self.lot_area),
            (ManualField::PrelimEstUnitCost, self.prelim_est_unit_cost),
            (ManualField::UnitPriceStart, self.unit_price_start),
            (ManualField::Duration, self.duration.map(f64::from)),
            (ManualField::ProjectLocality, self.locality.map(f64::from)),
        ]
    }

    /// Stored defaults with every given flag applied
    pub fn to_input(&self, defaults: ProjectInput) -> ProjectInput {
        let mut input = defaults;
        for (field, value) in self.overrides() {
            if let Some(value) = value {
                input.set(field, value);
            }
        }
        input
    }
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_train(data_path: &Path, output: &Path, seed: u64) -> anyhow::Result<()> {
    section("Train");

    let config = TrainingConfig::new()
        .with_data_path(data_path)
        .with_artifact_path(output)
        .with_random_seed(seed);
    let mut engine = TrainEngine::new(config);

    let mut current: Option<Instant> = None;
    let result = engine.fit_with_progress(|stage: TrainingStage| {
        if let Some(started) = current.take() {
            step_done(&format!("{:.2?}", started.elapsed()));
        }
        step_run(stage.description());
        current = Some(Instant::now());
    });
    match (&result, current) {
        (Ok(_), Some(started)) => step_done(&format!("{:.2?}", started.elapsed())),
        (Err(_), Some(_)) => println!("{}", bad("failed")),
        _ => {}
    }
    result?;

    step_run(&format!("Saving → {}", output.display()));
    engine.save()?;
    step_done("");

    if let Some(report) = engine.report() {
        println!();
        println!("  {:<16} {}", muted("Test R²"), format!("{:.4}", report.test_r2).white().bold());
        println!("  {:<16} {}", muted("Alpha"), format!("{}", report.alpha).white());
        println!("  {:<16} {}", muted("CV R²"), format!("{:.4}", report.cv_r2).white());
        println!(
            "  {:<16} {}",
            muted("Rows"),
            format!("{} train + {} synthetic, {} test", report.n_train, report.n_synthetic, report.n_test).white()
        );
        println!("  {:<16} {}", muted("Time"), format!("{:.3}s", report.training_time_secs).white());
        println!();
    }

    Ok(())
}

pub fn cmd_predict(args: &PredictArgs) -> anyhow::Result<()> {
    let config = PredictorConfig::new().with_currency_rate(args.currency_rate);
    config.validate()?;
    let predictor = Predictor::load(&args.model)?.with_config(config);

    let input = args.to_input(predictor.default_input()?);
    let request = PredictionRequest::new(input).with_economy(args.economy);
    let prediction = predictor.predict(&request)?;

    section("Estimate");
    print_prediction(&prediction);
    Ok(())
}

fn print_prediction(prediction: &Prediction) {
    println!("  {:<16} {}", muted("Predicted cost"), prediction.formatted_cost.white().bold());
    println!("  {:<16} {}", muted("Model output"), format!("{:.2}", prediction.raw_prediction).white());
    println!(
        "  {:<16} {}",
        muted("Economy"),
        format!("{} (×{})", prediction.economy, prediction.multiplier).white()
    );
    if prediction.currency_rate != 1.0 {
        println!("  {:<16} {}", muted("Currency rate"), format!("{}", prediction.currency_rate).white());
    }

    section("Top contributions");
    let top = prediction.top_contributions();
    let max_abs = top
        .iter()
        .map(|c| c.contribution.abs())
        .fold(0.0_f64, f64::max)
        .max(f64::MIN_POSITIVE);

    for c in top {
        let len = ((c.contribution.abs() / max_abs) * BAR_WIDTH as f64).round() as usize;
        let bar = "█".repeat(len.max(1));
        let bar = if c.contribution >= 0.0 { accent(&bar) } else { bad(&bar) };
        println!(
            "  {:<22} {:<width$} {}",
            c.feature_name,
            bar,
            dim(&format!("{:+.2}", c.contribution)),
            width = BAR_WIDTH
        );
    }

    let explanation = &prediction.explanation;
    println!();
    println!(
        "  {:<16} {}",
        muted("Base + features"),
        format!("{:.2} {:+.2}", explanation.base_value, explanation.sum_contributions()).white()
    );
    println!("  {:<16} {}", muted("Raises cost"), drivers_line(explanation.positive_contributors()));
    println!("  {:<16} {}", muted("Lowers cost"), drivers_line(explanation.negative_contributors()));
    println!();
}

/// Total of a set of contributions and the names of its three largest members
fn drivers_line(mut drivers: Vec<&FeatureContribution>) -> String {
    if drivers.is_empty() {
        return "none".to_string();
    }
    let total: f64 = drivers.iter().map(|c| c.contribution).sum();
    drivers.sort_by(|a, b| b.contribution.abs().total_cmp(&a.contribution.abs()));
    let names: Vec<&str> = drivers.iter().take(3).map(|c| c.feature_name.as_str()).collect();
    let more = drivers.len().saturating_sub(names.len());
    let suffix = if more > 0 { format!(" +{} more", more) } else { String::new() };
    format!("{:+.2} ({}{})", total, names.join(", "), suffix)
}

pub fn cmd_inspect(model_path: &Path) -> anyhow::Result<()> {
    let artifact = ModelArtifact::load(model_path)?;
    let meta = &artifact.metadata;

    section("Model");
    println!("  {:<16} {}", muted("File"), model_path.display());
    println!("  {:<16} {}", muted("Trained"), meta.trained_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("  {:<16} v{} (format {})", muted("Version"), meta.crate_version, meta.format_version);
    println!("  {:<16} {}", muted("Test R²"), format!("{:.4}", meta.test_r2).white().bold());
    println!("  {:<16} {} {}", muted("Alpha"), meta.alpha, dim(&format!("cv R² {:.4}", meta.cv_r2)));
    println!(
        "  {:<16} {} train + {} synthetic, {} test {}",
        muted("Rows"),
        meta.n_train,
        meta.n_synthetic,
        meta.n_test,
        dim(&format!("seed {}", meta.random_seed))
    );

    let manual: Vec<&str> = artifact
        .feature_names
        .iter()
        .zip(&artifact.feature_roles)
        .filter(|(_, role)| role.is_manual())
        .map(|(name, _)| name.as_str())
        .collect();
    let adjusted = artifact
        .feature_roles
        .iter()
        .filter(|role| matches!(role, FeatureRole::Adjusted))
        .count();

    section("Features");
    println!("  {:<16} {}", muted("Total"), artifact.n_features());
    println!("  {:<16} {}", muted("Manual"), manual.join(", "));
    println!("  {:<16} {} {}", muted("Adjusted"), adjusted, dim("scaled by the economic multiplier"));

    section("Largest coefficients");
    let coefficients = artifact.coefficients()?;
    let mut ranked: Vec<(&str, f64)> = artifact
        .feature_names
        .iter()
        .map(String::as_str)
        .zip(coefficients.iter().copied())
        .collect();
    ranked.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
    for (name, coef) in ranked.into_iter().take(PredictorConfig::default().top_k) {
        println!("  {:<22} {:>14.4}", name, coef);
    }
    println!("  {:<22} {:>14.4}", muted("intercept"), artifact.intercept()?);
    println!();

    Ok(())
}

// ─── Serve ─────────────────────────────────────────────────────────────────────

pub async fn cmd_serve(host: &str, port: u16, model_path: &Path) -> anyhow::Result<()> {
    use crate::server::{run_server, ServerConfig};

    println!();
    line_box_top();
    line_box_empty();
    line_box_center(&format!("{}", "Construction Cost Estimator".white().bold()));
    line_box_center(&format!("{}", dim(&format!("v{}", env!("CARGO_PKG_VERSION")))));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box(&kv("Web UI ", &format!("http://{}:{}", host, port)));
    line_box(&kv("Health ", &format!("http://{}:{}/api/health", host, port)));
    line_box(&kv("Model  ", &model_path.display().to_string()));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box_center(&format!("{}", dim("ctrl+c to stop")));
    line_box_empty();
    line_box_bottom();
    println!();

    let config = ServerConfig::default()
        .with_host(host)
        .with_port(port)
        .with_model_path(model_path);

    run_server(config).await
}

// ─── Interactive mode ──────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("       {}", "Construction Cost Estimator".truecolor(120, 170, 255).bold());
    println!("       {}", dim(&format!("ridge regression  ·  v{}  ·  rust", env!("CARGO_PKG_VERSION"))));
    println!();
}

fn theme() -> dialoguer::theme::ColorfulTheme {
    dialoguer::theme::ColorfulTheme {
        active_item_prefix: dialoguer::console::style("  ›".to_string()).for_stderr().cyan(),
        active_item_style: dialoguer::console::Style::new().for_stderr().white().bold(),
        inactive_item_prefix: dialoguer::console::style("   ".to_string()).for_stderr(),
        inactive_item_style: dialoguer::console::Style::new().for_stderr().color256(245),
        prompt_prefix: dialoguer::console::style("  ?".to_string()).for_stderr().color256(111),
        prompt_style: dialoguer::console::Style::new().for_stderr().white().bold(),
        ..dialoguer::theme::ColorfulTheme::default()
    }
}

fn clamp_round(value: f64, lo: u32, hi: u32) -> u32 {
    if value.is_finite() {
        (value.round() as i64).clamp(i64::from(lo), i64::from(hi)) as u32
    } else {
        lo
    }
}

fn prompt_f64(theme: &dialoguer::theme::ColorfulTheme, label: &str, default: f64) -> anyhow::Result<f64> {
    let value = dialoguer::Input::<f64>::with_theme(theme)
        .with_prompt(label)
        .default(default)
        .validate_with(|v: &f64| if v.is_finite() { Ok(()) } else { Err("enter a number") })
        .interact_text()?;
    Ok(value)
}

fn prompt_request(
    theme: &dialoguer::theme::ColorfulTheme,
    defaults: &ProjectInput,
    last_rate: f64,
) -> anyhow::Result<PredictionRequest> {
    use dialoguer::{Input, Select};

    let mut input = defaults.clone();
    for field in [
        ManualField::TotalFloorArea,
        ManualField::LotArea,
        ManualField::PrelimEstUnitCost,
        ManualField::UnitPriceStart,
    ] {
        input.set(field, prompt_f64(theme, field.label(), defaults.get(field))?);
    }

    let duration = Input::<u32>::with_theme(theme)
        .with_prompt(ManualField::Duration.label())
        .default(clamp_round(defaults.duration, 1, 36))
        .validate_with(|v: &u32| if (1..=36).contains(v) { Ok(()) } else { Err("between 1 and 36") })
        .interact_text()?;
    input.set(ManualField::Duration, f64::from(duration));

    let localities: Vec<String> = (1..=20).map(|n| n.to_string()).collect();
    let locality = Select::with_theme(theme)
        .with_prompt(ManualField::ProjectLocality.label())
        .items(&localities)
        .default(clamp_round(defaults.project_locality, 1, 20) as usize - 1)
        .interact()?;
    input.set(ManualField::ProjectLocality, (locality + 1) as f64);

    let economies: Vec<String> = EconomicCondition::ALL
        .iter()
        .map(|c| format!("{:<14} ×{}", c.label(), c.multiplier()))
        .collect();
    let economy = Select::with_theme(theme)
        .with_prompt("Economic condition")
        .items(&economies)
        .default(1)
        .interact()?;

    let rate = Input::<f64>::with_theme(theme)
        .with_prompt("Currency rate")
        .default(last_rate)
        .validate_with(|v: &f64| if v.is_finite() && *v > 0.0 { Ok(()) } else { Err("must be positive") })
        .interact_text()?;

    Ok(PredictionRequest::new(input)
        .with_economy(EconomicCondition::ALL[economy])
        .with_currency_rate(rate))
}

pub fn cmd_interactive(model_path: &Path) -> anyhow::Result<()> {
    use dialoguer::Confirm;

    print_banner();

    let predictor = Predictor::load(model_path)?;
    let defaults = predictor.default_input()?;
    println!(
        "  {} {} {}",
        ok("✓"),
        "Loaded model".white(),
        dim(&format!("test R² {:.4}", predictor.artifact().metadata.test_r2))
    );

    let theme = theme();
    let mut rate = predictor.config().currency_rate;
    loop {
        println!();
        let request = prompt_request(&theme, &defaults, rate)?;
        rate = request.currency_rate.unwrap_or(rate);

        let prediction = predictor.predict(&request)?;
        section("Estimate");
        print_prediction(&prediction);

        let again = Confirm::with_theme(&theme)
            .with_prompt("Estimate another project")
            .default(true)
            .interact()?;
        if !again {
            println!("  {}", dim("goodbye"));
            println!();
            break;
        }
    }

    Ok(())
}
