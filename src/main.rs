//! Command line shell around the evaluation engine.
//!
//! All logic lives in the library; this binary only parses arguments,
//! loads the policy document and breach list, and renders the verdict.

use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

use passgauge::{
    BreachIndex, FALLBACK_POLICY_NAME, PolicyStore, RatingTier, RequirementCheck, Threshold,
    Verdict, default_breach_path, default_policy_path, evaluate_password,
};

#[derive(Parser)]
#[command(
    name = "passgauge",
    version,
    about = "Password strength and policy compliance checker"
)]
struct Cli {
    /// Password to evaluate; read from stdin when omitted
    #[arg(short = 'w', long)]
    password: Option<String>,

    /// Policy framework to evaluate against (document default when omitted)
    #[arg(short, long)]
    policy: Option<String>,

    /// Path to the policy frameworks document
    #[arg(long, value_name = "FILE")]
    policies: Option<PathBuf>,

    /// Path to the breach list (flat JSON array of strings)
    #[arg(long, value_name = "FILE")]
    breach_list: Option<PathBuf>,

    /// Print the verdict as JSON instead of text
    #[arg(long)]
    json: bool,

    /// List available policy frameworks and exit
    #[arg(long)]
    list: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let policy_path = cli.policies.clone().unwrap_or_else(default_policy_path);
    let policies = PolicyStore::from_path(&policy_path);
    if let Some(reason) = policies.fallback_reason() {
        eprintln!(
            "{} {reason}; using the built-in {FALLBACK_POLICY_NAME} policy",
            "warning:".yellow().bold()
        );
    }

    if cli.list {
        for name in policies.names() {
            let policy = policies.resolve(name);
            let marker = if name == policies.default_name() { "*" } else { " " };
            println!("{marker} {name}: {}", policy.description);
        }
        return Ok(());
    }

    let breach_path = cli.breach_list.clone().unwrap_or_else(default_breach_path);
    let breaches = match BreachIndex::from_path(&breach_path) {
        Ok(index) => index,
        Err(err) => {
            eprintln!(
                "{} {err}; breach checking disabled",
                "warning:".yellow().bold()
            );
            BreachIndex::default()
        }
    };

    let password = match cli.password {
        Some(pwd) => SecretString::new(pwd.into()),
        None => read_password_from_stdin()?,
    };

    let policy_name = cli.policy.as_deref().unwrap_or("");
    let verdict = evaluate_password(&password, policy_name, &policies, &breaches);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&verdict)?);
    } else {
        print_report(&verdict);
    }

    Ok(())
}

fn read_password_from_stdin() -> anyhow::Result<SecretString> {
    eprint!("Password: ");
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    let trimmed = line.trim_end_matches(['\r', '\n']);
    Ok(SecretString::new(trimmed.to_string().into()))
}

fn print_report(verdict: &Verdict) {
    let rating = match verdict.rating {
        RatingTier::VeryWeak | RatingTier::Weak => verdict.rating.label().red(),
        RatingTier::Fair => verdict.rating.label().yellow(),
        RatingTier::Strong | RatingTier::VeryStrong => verdict.rating.label().green(),
    };

    println!("Policy: {}", verdict.compliance.policy_name);
    println!("Length: {}", verdict.metrics.length);
    println!("Pool size: {}", verdict.metrics.pool_size);
    println!("Entropy: {:.2} bits", verdict.metrics.entropy_bits);
    println!("Rating: {}", rating.bold());

    if verdict.breach.is_breached {
        println!("Breach list: {}", "(!) found in known breaches".red().bold());
    } else {
        println!("Breach list: {}", "not found".green());
    }

    let checks: Vec<String> = verdict
        .compliance
        .checks
        .iter()
        .map(|check| {
            let mark = if check.met { "✓".green() } else { "✗".red() };
            format!("{mark} {}", requirement_label(check))
        })
        .collect();
    println!("Requirements: {}", checks.join(", "));

    let status = if verdict.compliance.overall_pass {
        "passed".green().bold()
    } else {
        "failed".red().bold()
    };
    println!("Compliance: {status}");
}

fn requirement_label(check: &RequirementCheck) -> String {
    match check.required {
        Threshold::Chars(n) => format!("{}>={n}", check.requirement.label()),
        Threshold::Bits(bits) => format!("{}>={bits:.0}", check.requirement.label()),
        Threshold::Flag(_) => check.requirement.label().to_string(),
    }
}
