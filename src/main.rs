use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::{
    Result,
    eyre::{WrapErr, eyre},
};
use practice_compiler::{
    config::{CompilerSettings, SettingsValidator, load_policy_document, load_settings},
    policy::{
        AssetIdentity, JsonArchive, LogTrigger, Loadable, Mode, PracticeSpec, Vocabulary,
        compile_access_control, compile_practice,
        sections::{LogTriggerSection, ProtectionsSection},
    },
    tracing_setup,
};
use serde::Serialize;

#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    #[clap(subcommand)]
    command: Commands,

    /// Settings file (TOML, YAML or JSON)
    #[clap(short, long, global = true)]
    settings: Option<PathBuf>,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Compile a practice document into engine sections
    Compile {
        /// Practice document (JSON)
        policy: PathBuf,

        #[clap(long, default_value = "Any")]
        asset_name: String,

        #[clap(long, default_value = "Any")]
        asset_id: String,

        #[clap(long, default_value = "")]
        practice_id: String,

        #[clap(long, default_value = "")]
        source_identifier: String,

        /// Asset-level mode, overrides the settings file
        #[clap(long)]
        default_mode: Option<String>,

        /// Converted Snort signature documents to attach
        #[clap(long = "snort-protections")]
        snort_protections: Vec<PathBuf>,

        /// Write to this file instead of stdout
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
    /// Load a practice document and report whether it compiles
    Validate {
        /// Practice document (JSON)
        policy: PathBuf,
    },
    /// Compile an access control practice into a rate-limit rulebase
    RateLimit {
        /// Access control practice document (JSON)
        practice: PathBuf,

        /// Log trigger document referenced by the rules
        #[clap(long)]
        trigger: Option<PathBuf>,

        #[clap(long, default_value = "Any")]
        asset_name: String,

        #[clap(long, default_value = "Any")]
        url: String,

        #[clap(long, default_value = "Any")]
        uri: String,

        #[clap(long, default_value = "")]
        practice_id: String,

        /// Asset-level mode, overrides the settings file
        #[clap(long)]
        default_mode: Option<String>,

        #[clap(short, long)]
        output: Option<PathBuf>,
    },
    /// Compile a log trigger document into its trigger section
    Trigger {
        /// Log trigger document (JSON)
        trigger: PathBuf,

        #[clap(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    let settings = load_settings(args.settings.as_deref())?;
    SettingsValidator::validate(&settings).wrap_err("Invalid compiler settings")?;
    tracing_setup::init_tracing_with_config(&settings.log_level, settings.json_logs, true)?;

    match args.command {
        Commands::Compile {
            policy,
            asset_name,
            asset_id,
            practice_id,
            source_identifier,
            default_mode,
            snort_protections,
            output,
        } => {
            let identity = AssetIdentity::new(asset_name, asset_id)
                .with_practice(String::new(), practice_id)
                .with_source_identifier(source_identifier);
            let default_mode = resolve_default_mode(default_mode.as_deref(), &settings)?;
            compile_command(
                &policy,
                &identity,
                default_mode,
                &snort_protections,
                output.as_deref(),
                &settings,
            )
        }
        Commands::RateLimit {
            practice,
            trigger,
            asset_name,
            url,
            uri,
            practice_id,
            default_mode,
            output,
        } => {
            let identity = AssetIdentity::new(asset_name, format!("{url}{uri}"))
                .with_practice(String::new(), practice_id);
            let default_mode = resolve_default_mode(default_mode.as_deref(), &settings)?;
            rate_limit_command(
                &practice,
                trigger.as_deref(),
                &identity,
                (&url, &uri),
                default_mode,
                output.as_deref(),
                &settings,
            )
        }
        Commands::Validate { policy } => validate_command(&policy),
        Commands::Trigger { trigger, output } => {
            trigger_command(&trigger, output.as_deref(), &settings)
        }
    }
}

fn resolve_default_mode(flag: Option<&str>, settings: &CompilerSettings) -> Result<Mode> {
    match flag {
        Some(token) => Mode::parse(token).ok_or_else(|| {
            eyre!(
                "Invalid default mode '{token}', expected one of {}",
                Mode::TOKENS.join(", ")
            )
        }),
        None => settings
            .default_mode()
            .ok_or_else(|| eyre!("Invalid default mode '{}'", settings.default_mode)),
    }
}

fn compile_command(
    policy_path: &Path,
    identity: &AssetIdentity,
    default_mode: Mode,
    snort_protections: &[PathBuf],
    output: Option<&Path>,
    settings: &CompilerSettings,
) -> Result<()> {
    let span = tracing_setup::create_compile_span(
        &policy_path.display().to_string(),
        &identity.asset_name,
    );
    let _guard = span.enter();

    let document = load_policy_document(policy_path)?;
    let mut policy = compile_practice(&document, identity, default_mode)
        .wrap_err_with(|| format!("Failed to compile {}", policy_path.display()))?;

    for path in snort_protections {
        let document = load_policy_document(path)?;
        let protections = ProtectionsSection::from_document(&document)
            .wrap_err_with(|| format!("Failed to read Snort protections {}", path.display()))?;
        policy.add_snort_protections(protections);
    }

    let sections = policy.ips().protections().len()
        + policy.file_security().protections().len()
        + policy.snort().snort_protections().len()
        + policy.web_application().sections().len();
    span.record("sections", sections);
    write_output(&policy, output, settings.pretty_output)
}

fn rate_limit_command(
    practice_path: &Path,
    trigger_path: Option<&Path>,
    identity: &AssetIdentity,
    (url, uri): (&str, &str),
    default_mode: Mode,
    output: Option<&Path>,
    settings: &CompilerSettings,
) -> Result<()> {
    let span = tracing_setup::create_compile_span(
        &practice_path.display().to_string(),
        &identity.asset_name,
    );
    let _guard = span.enter();

    let practice = load_policy_document(practice_path)?;
    let trigger = trigger_path.map(load_policy_document).transpose()?;
    let rulebase =
        compile_access_control(&practice, trigger.as_ref(), identity, url, uri, default_mode)
            .wrap_err_with(|| format!("Failed to compile {}", practice_path.display()))?;

    span.record("sections", rulebase.rate_limit().len());
    write_output(&rulebase, output, settings.pretty_output)
}

fn validate_command(policy_path: &Path) -> Result<()> {
    println!("🔍 Validating practice document: {}", policy_path.display());

    let document = load_policy_document(policy_path)?;
    match PracticeSpec::from_document(&document) {
        Ok(spec) => {
            println!("✅ Practice document: OK");
            println!();
            println!("📋 Practice Summary:");
            println!("   • Name: {}", spec.name());
            println!("   • Web Attacks: {}", spec.web_attacks().is_some());
            println!("   • Anti-Bot: {}", spec.anti_bot().is_some());
            println!("   • Intrusion Prevention: {}", spec.intrusion_prevention().is_some());
            println!("   • File Security: {}", spec.file_security().is_some());
            println!("   • Snort Signatures: {}", spec.snort_signatures().is_some());
            println!("   • Schema Validation: {}", spec.schema_validation().is_some());
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Practice document is invalid:");
            eprintln!("   {e}");
            std::process::exit(1);
        }
    }
}

fn trigger_command(
    trigger_path: &Path,
    output: Option<&Path>,
    settings: &CompilerSettings,
) -> Result<()> {
    let document = load_policy_document(trigger_path)?;
    let trigger = JsonArchive::from_value(&document, "")
        .and_then(|archive| LogTrigger::load(&archive))
        .wrap_err_with(|| format!("Failed to load log trigger {}", trigger_path.display()))?;

    write_output(&LogTriggerSection::new(&trigger), output, settings.pretty_output)
}

fn write_output<T: Serialize>(value: &T, output: Option<&Path>, pretty: bool) -> Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .wrap_err("Failed to serialize compiled policy")?;

    match output {
        Some(path) => std::fs::write(path, rendered)
            .wrap_err_with(|| format!("Failed to write {}", path.display())),
        None => {
            println!("{rendered}");
            Ok(())
        }
    }
}
