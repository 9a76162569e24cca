use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use towerfeed::chronicle::{load_chronicles, LoadError};
use towerfeed::config::Config;
use towerfeed::dial::{
    dial_label, recommend, Archetype, Audience, Creativity, Culture, Degree, Industry, Role,
    Scenario,
};
use towerfeed::feed::{collect_items, render_feed, validate_series, write_feed};

#[derive(Parser, Debug)]
#[command(
    name = "towerfeed",
    about = "Generates the Dreaming Tower Archives RSS feed from the chronicles index"
)]
struct Args {
    /// Configuration file (missing file = built-in defaults)
    #[arg(long, value_name = "FILE", default_value = "towerfeed.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the RSS feed (the default)
    Build {
        /// Chronicles index JSON (overrides chronicles_path)
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Output file (overrides output_path)
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Print the feed to stdout instead of writing the output file
        #[arg(long)]
        stdout: bool,
    },
    /// Score an audience on the Mythology Dial
    Dial {
        #[arg(long, value_enum)]
        industry: Option<Industry>,

        /// Audience role (repeatable)
        #[arg(long = "role", value_enum)]
        roles: Vec<Role>,

        #[arg(long, value_enum)]
        culture: Option<Culture>,

        #[arg(long = "risk", value_enum)]
        risk_tolerance: Option<Degree>,

        #[arg(long, value_enum)]
        creativity: Option<Creativity>,

        #[arg(long, value_enum)]
        archetype: Option<Archetype>,

        #[arg(long, value_enum)]
        urgency: Option<Degree>,

        #[arg(long, value_enum)]
        complexity: Option<Degree>,

        #[arg(long, value_enum)]
        stakes: Option<Degree>,

        /// Print the recommendation as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command.unwrap_or(Command::Build {
        input: None,
        output: None,
        stdout: false,
    }) {
        Command::Build {
            input,
            output,
            stdout,
        } => {
            let mut config = Config::load(&args.config)
                .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
            if let Some(input) = input {
                config.chronicles_path = input;
            }
            if let Some(output) = output {
                config.output_path = output;
            }
            build(&config, stdout)
        }
        Command::Dial {
            industry,
            roles,
            culture,
            risk_tolerance,
            creativity,
            archetype,
            urgency,
            complexity,
            stakes,
            json,
        } => {
            let audience = Audience {
                industry,
                roles,
                culture,
                risk_tolerance,
                creativity,
            };
            let scenario = Scenario {
                archetype,
                urgency,
                complexity,
                stakes,
            };
            dial(&audience, &scenario, json)
        }
    }
}

fn build(config: &Config, to_stdout: bool) -> Result<()> {
    if !to_stdout {
        println!("Reading chronicles index...");
    }

    let records = match load_chronicles(&config.chronicles_path) {
        Ok(records) => records,
        Err(LoadError::MissingInput(path)) => {
            eprintln!("Error: Could not find {}", path.display());
            eprintln!();
            eprintln!("Make sure you're running this from your project root, or point at the index:");
            eprintln!("  towerfeed build --input /path/to/chronicles.index.json");
            std::process::exit(1);
        }
        Err(e) => return Err(e).context("Failed to load chronicles index"),
    };

    validate_series(&records);

    let items = collect_items(&records, &config.site_url);
    if items.is_empty() {
        tracing::warn!("No released chronicles found, feed will be empty");
    }
    for item in &items {
        tracing::info!(
            title = %item.title,
            theme = item.vendor.theme.as_deref().unwrap_or(""),
            threat = item.vendor.threat.as_deref().unwrap_or(""),
            featuring = item.vendor.featuring.as_deref().unwrap_or(""),
            read_time = item.vendor.read_time.as_deref().unwrap_or(""),
            serial = item.is_serial(),
            "Feed item"
        );
    }

    let xml = render_feed(&items, config, Utc::now()).context("Failed to generate RSS feed")?;

    if to_stdout {
        print!("{}", xml);
        return Ok(());
    }

    write_feed(&xml, &config.output_path).with_context(|| {
        format!(
            "Failed to write RSS feed to {}",
            config.output_path.display()
        )
    })?;

    println!("Found {} released chronicle(s)", items.len());
    println!("RSS feed generated: {}", config.output_path.display());
    println!(
        "Custom fields: tower:theme, tower:threat, tower:featuring, tower:readTime, \
         tower:hasAnalysis, tower:lorekeeperNote, tower:isSerial"
    );
    Ok(())
}

fn dial(audience: &Audience, scenario: &Scenario, json: bool) -> Result<()> {
    let rec = recommend(audience, scenario);

    if json {
        let out = serde_json::to_string_pretty(&rec).context("Failed to serialize recommendation")?;
        println!("{}", out);
        return Ok(());
    }

    let guidance = rec.level.guidance();
    if let Some(industry) = audience.industry {
        println!("Industry: {}", industry.label());
    }
    if !audience.roles.is_empty() {
        let roles: Vec<&str> = audience.roles.iter().map(|r| r.label()).collect();
        println!("Audience: {}", roles.join(", "));
    }
    println!(
        "Dial: {:.0}% ({})",
        rec.dial_position,
        dial_label(rec.dial_position)
    );
    if let Some(archetype) = scenario.archetype {
        println!("Story: {} ({})", archetype.label(), archetype.use_case());
    }
    println!();
    println!("{}", guidance.title);
    println!("{}", guidance.description);
    println!();
    for technique in guidance.techniques {
        println!("  - {}", technique);
    }
    println!();
    println!("Example opening: \"{}\"", guidance.example_opening);
    Ok(())
}
