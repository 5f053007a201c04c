// PainNavi CLI - questionnaire in, five-section self-care advice out
// Commands: advise, options, profile, history

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use painnavi_lib::config::AppConfig;
use painnavi_lib::models::{
    symptom_type_options, Answers, BodyPart, SymptomRecord, DETAIL_LEVEL_DEFAULT,
    DIURNAL_OPTIONS, FACTOR_OPTIONS, INTENSITY_OPTIONS, ONSET_OPTIONS,
};
use painnavi_lib::pipeline::generation::OpenAiClient;
use painnavi_lib::pipeline::safety::ManualFlags;
use painnavi_lib::pipeline::session::{run_session, Backend, SessionContext, SessionOutcome};
use painnavi_lib::profile::{load_reference, ProfileStore};
use painnavi_lib::session_log::{SessionLog, SessionRecord};

#[derive(Parser)]
#[command(name = "painnavi")]
#[command(version, about = "PainNavi - self-care guidance (not a diagnosis)")]
struct Cli {
    /// Data directory (profile and logs). Overrides PAINNAVI_DATA_DIR
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate advice for one questionnaire
    Advise(AdviseArgs),

    /// List questionnaire options
    Options {
        /// Only list symptom types for this body part
        #[arg(long)]
        part: Option<String>,
    },

    /// Show or save the practitioner profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Show condensed recent sessions
    History {
        /// Number of records (default: 3)
        #[arg(short, long)]
        count: Option<usize>,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Print the saved profile
    Show,
    /// Save a new profile
    Save {
        /// Profile text
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,
        /// Read profile text from a file
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct AdviseArgs {
    /// Body part (label such as 腰, or alias such as lower-back)
    #[arg(long)]
    part: String,
    /// Symptom type (default: first option for the body part)
    #[arg(long = "type")]
    symptom_type: Option<String>,
    /// Pain intensity (default: 4〜6（中等度）)
    #[arg(long)]
    intensity: Option<String>,
    /// Time since onset (default: 亜急性（6〜12週間）)
    #[arg(long)]
    onset: Option<String>,
    /// Time of day when it is worst (default: 変わらない)
    #[arg(long)]
    diurnal: Option<String>,
    /// Aggravating factor or background (default: none given)
    #[arg(long)]
    factor: Option<String>,
    /// Free-text description
    #[arg(long, default_value = "")]
    free_text: String,
    /// Detail level 1-5
    #[arg(long, default_value_t = DETAIL_LEVEL_DEFAULT)]
    detail: u8,

    /// Recent major trauma
    #[arg(long)]
    trauma: bool,
    /// Fever or chills
    #[arg(long)]
    fever: bool,
    /// Bladder/bowel dysfunction or saddle numbness
    #[arg(long)]
    cauda_equina: bool,
    /// Progressive weakness
    #[arg(long)]
    progressive_weakness: bool,
    /// Proceed past a red flag with caution (seeking care is assumed)
    #[arg(long)]
    proceed: bool,

    /// Use the local engine only
    #[arg(long)]
    demo: bool,
    /// Feed recent sessions to the remote backend
    #[arg(long)]
    use_history: bool,
    /// Reference document (.txt or .md)
    #[arg(long)]
    reference: Option<PathBuf>,
    /// API key. Overrides OPENAI_API_KEY
    #[arg(long)]
    api_key: Option<String>,
    /// Model name. Overrides PAINNAVI_MODEL
    #[arg(long)]
    model: Option<String>,
    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    painnavi_lib::init_tracing();
    let cli = Cli::parse();

    let mut config = AppConfig::from_env();
    if let Some(dir) = cli.data_dir {
        config = config.with_data_dir(dir);
    }

    match cli.command {
        Commands::Advise(args) => advise(&config, args),
        Commands::Options { part } => {
            print_options(part.as_deref());
            Ok(())
        }
        Commands::Profile { action } => profile(&config, action),
        Commands::History { count } => {
            let log = SessionLog::new(config.log_dir());
            let history = log.recent_history(count.unwrap_or(config.history_count));
            if history.is_empty() {
                println!("（履歴はありません）");
            } else {
                println!("{history}");
            }
            Ok(())
        }
    }
}

fn advise(config: &AppConfig, args: AdviseArgs) -> Result<()> {
    let answers = Answers {
        symptom_type: args.symptom_type.as_deref(),
        intensity: args.intensity.as_deref(),
        onset: args.onset.as_deref(),
        diurnal_pattern: args.diurnal.as_deref(),
        aggravating_factor: args.factor.as_deref(),
    };
    let record = SymptomRecord::from_answers(
        BodyPart::parse(&args.part),
        &answers,
        &args.free_text,
        args.detail,
    );
    let flags = ManualFlags {
        trauma: args.trauma,
        fever: args.fever,
        cauda_equina: args.cauda_equina,
        progressive_weakness: args.progressive_weakness,
    };

    let profile = ProfileStore::new(config.profile_path())
        .load()
        .context("Failed to read profile")?;
    let reference = match &args.reference {
        Some(path) => load_reference(path)
            .with_context(|| format!("Failed to read reference {}", path.display()))?,
        None => String::new(),
    };
    let log = SessionLog::new(config.log_dir());
    let history = if args.use_history {
        log.recent_history(config.history_count)
    } else {
        String::new()
    };
    let context = SessionContext {
        profile,
        reference,
        history,
    };

    let remote = if args.demo {
        None
    } else {
        let api_key = args.api_key.clone().or_else(|| config.api_key.clone());
        let Some(api_key) = api_key else {
            bail!("APIキーを指定するか（--api-key / OPENAI_API_KEY）、--demo を付けてください");
        };
        let model = args.model.as_deref().unwrap_or(&config.model);
        Some(
            OpenAiClient::new(&config.base_url, &api_key, model, config.timeout_secs)?
                .with_temperature(config.temperature),
        )
    };
    let backend = match &remote {
        Some(client) => Backend::Remote(client),
        None => Backend::Local,
    };

    let outcome = run_session(&record, flags, args.proceed, &context, backend);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    }

    let advice = match outcome {
        SessionOutcome::Halted { warning, .. } => {
            if !args.json {
                println!("{warning}");
                println!("受診を最優先してください。受診を前提に軽い注意点だけ確認する場合は --proceed を付けて再実行してください。");
            }
            return Ok(());
        }
        SessionOutcome::Advice(advice) => advice,
    };

    if !args.json {
        if let Some(warning) = &advice.warning {
            println!("{warning}\n");
        }
        println!("{}", advice.markdown);
    }
    if advice.fell_back {
        eprintln!("API呼び出しに失敗したため、ローカル生成に切り替えました。");
    }

    let entry = SessionRecord::new(
        &record,
        &advice,
        !context.profile.is_empty(),
        args.use_history,
        chrono::Local::now().naive_local(),
    );
    let path = log.append(&entry).context("Failed to write session log")?;
    eprintln!("ログ保存完了: {}", path.display());
    Ok(())
}

fn print_options(part: Option<&str>) {
    if let Some(part) = part {
        let part = BodyPart::parse(part);
        println!("{}: {}", part.label(), symptom_type_options(&part).join(" / "));
        return;
    }

    println!("部位と症状のタイプ:");
    for region in BodyPart::REGIONS {
        println!("  {}: {}", region.label(), symptom_type_options(&region).join(" / "));
    }
    let other = BodyPart::Other(String::new());
    println!("  その他: {}", symptom_type_options(&other).join(" / "));
    println!("痛みの強さ: {}", INTENSITY_OPTIONS.join(" / "));
    println!("発症からの期間: {}", ONSET_OPTIONS.join(" / "));
    println!("強くなるタイミング: {}", DIURNAL_OPTIONS.join(" / "));
    println!("増悪因子/背景: {}", FACTOR_OPTIONS.join(" / "));
}

fn profile(config: &AppConfig, action: ProfileAction) -> Result<()> {
    let store = ProfileStore::new(config.profile_path());
    match action {
        ProfileAction::Show => {
            let text = store.load().context("Failed to read profile")?;
            if text.is_empty() {
                println!("（プロファイルは未保存です: {}）", store.path().display());
            } else {
                println!("{text}");
            }
        }
        ProfileAction::Save { text, file } => {
            let text = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                (None, None) => bail!("--text か --file を指定してください"),
            };
            store.save(&text).context("Failed to save profile")?;
            println!("保存しました: {}", store.path().display());
        }
    }
    Ok(())
}
