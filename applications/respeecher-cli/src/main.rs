/// respeecher - command line access to the Respeecher API
use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use respeecher_client::{AudioUpload, ClientConfig, FileCredentialStore, RespeecherClient};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "respeecher")]
#[command(about = "Respeecher voice conversion API client", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        /// Account email
        #[arg(short, long, env = "RESPEECHER_EMAIL")]
        email: String,
        /// Password
        #[arg(short, long, env = "RESPEECHER_PASSWORD")]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show whether a session is stored
    Status,
    /// List projects
    Projects,
    /// List the phrases of a project
    Phrases { project_id: String },
    /// List the recordings of a phrase
    Recordings { phrase_id: String },
    /// List voice models with their preview clips
    Models,
    /// List text-to-speech voices
    Voices,
    /// Upload an audio file as a new take of a phrase
    Upload { phrase_id: String, file: PathBuf },
    /// Download a recording of a phrase
    Download {
        phrase_id: String,
        recording_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "respeecher=info,respeecher_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = ClientConfig::load(cli.config.as_deref())?;
    let store = Arc::new(FileCredentialStore::new(config.credentials_path.clone()));
    let client = RespeecherClient::with_store(config, store).await?;

    match cli.command {
        Commands::Login { email, password } => {
            let user = client.login(&email, &password).await?;
            println!("Logged in as {} <{}>", user.username, user.email);
        }
        Commands::Logout => {
            if client.logout().await {
                println!("Logged out");
            } else {
                println!("Not logged in");
            }
        }
        Commands::Status => {
            if client.is_authenticated().await {
                println!("Session stored for {}", client.config().base_url);
            } else {
                println!("Not logged in");
            }
        }
        Commands::Projects => {
            for project in client.fetch_projects(None).await? {
                println!("{}\t{}", project.id, project.name);
            }
        }
        Commands::Phrases { project_id } => {
            for phrase in client.fetch_phrases(&project_id).await? {
                println!("{}\t{}", phrase.id, phrase.text);
            }
        }
        Commands::Recordings { phrase_id } => {
            for recording in client.fetch_recordings(&phrase_id).await? {
                println!("{}\t{}", recording.id, recording.display_name());
            }
        }
        Commands::Models => {
            for model in client.fetch_models().await? {
                println!(
                    "{}\t{}\t{}",
                    model.id,
                    model.name,
                    client.model_preview_url(&model)
                );
            }
        }
        Commands::Voices => {
            let response = client.fetch_tts_voices().await?;
            for voice in response.voices {
                println!(
                    "{}\t{}",
                    voice.api_code.as_deref().unwrap_or(&voice.code),
                    voice.display_name()
                );
            }
        }
        Commands::Upload { phrase_id, file } => {
            upload(&client, &phrase_id, file).await?;
        }
        Commands::Download {
            phrase_id,
            recording_id,
        } => {
            download(&client, &phrase_id, &recording_id).await?;
        }
    }

    Ok(())
}

async fn upload(client: &RespeecherClient, phrase_id: &str, file: PathBuf) -> anyhow::Result<()> {
    let upload = AudioUpload::from_path(&file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    if !upload.is_supported() {
        return Err(anyhow!(
            "Unsupported file type, expected one of: {}",
            respeecher_client::SUPPORTED_EXTENSIONS.join(", ")
        ));
    }

    let recording = client
        .create_recording(phrase_id, upload, |p| {
            eprint!("\rUploading... {:>3.0}%", p * 100.0);
        })
        .await?;
    eprintln!();

    println!("{}\t{}", recording.id, recording.display_name());
    Ok(())
}

async fn download(
    client: &RespeecherClient,
    phrase_id: &str,
    recording_id: &str,
) -> anyhow::Result<()> {
    let recording = client
        .fetch_recordings(phrase_id)
        .await?
        .into_iter()
        .find(|r| r.id == recording_id)
        .ok_or_else(|| anyhow!("Recording {} not found in phrase {}", recording_id, phrase_id))?;

    let dest = client
        .download_recording(&recording, |p| {
            eprint!("\rDownloading... {:>3.0}%", p * 100.0);
        })
        .await?;
    eprintln!();

    println!("{}", dest.display());
    Ok(())
}
