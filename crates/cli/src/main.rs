//! `fieldtask` -- field service task capture client.
//!
//! Wires the capture pipeline end-to-end: camera frames into the image
//! buffer, the validated draft into a multipart submission, and
//! listing/search over previously submitted tasks.
//!
//! # Environment variables
//!
//! | Variable            | Required | Default                  | Description                     |
//! |---------------------|----------|--------------------------|---------------------------------|
//! | `FIELDTASK_API_URL` | no       | `http://localhost:3100`  | Backend base URL                |
//! | `FIELDTASK_TOKEN`   | yes      | --                       | Bearer token issued at login    |

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fieldtask_capture::device::CaptureDevice;
use fieldtask_capture::ffmpeg::FfmpegSource;
use fieldtask_client::encoder;
use fieldtask_client::query::{SortOrder, TaskQuery};
use fieldtask_client::submit::SubmissionClient;
use fieldtask_core::session::AuthSession;
use fieldtask_core::task::TaskDraft;

const DEFAULT_API_URL: &str = "http://localhost:3100";

#[derive(Parser)]
#[command(name = "fieldtask")]
#[command(about = "Capture service-visit evidence and submit task records")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Capture evidence and submit a task record.
    Submit(SubmitArgs),
    /// List and search previously submitted tasks.
    Tasks(TasksArgs),
}

#[derive(Args)]
struct SubmitArgs {
    #[arg(long, default_value = "")]
    organization_name: String,
    #[arg(long, default_value = "")]
    product_name: String,
    #[arg(long, default_value = "")]
    additional_info: String,
    #[arg(long, default_value = "")]
    remarks: String,
    #[arg(long, default_value = "")]
    machine_name: String,
    #[arg(long, default_value = "")]
    machine_manufacturer: String,
    #[arg(long, default_value = "")]
    machine_serial_number: String,
    #[arg(long, default_value = "")]
    machine_model: String,
    #[arg(long, default_value = "")]
    contact_person_name: String,
    #[arg(long, default_value = "")]
    contact_person_mobile_number: String,
    #[arg(long, default_value = "")]
    company_address: String,
    #[arg(long, default_value = "")]
    ticket_number: String,
    #[arg(long, default_value = "")]
    customer_details: String,
    #[arg(long, default_value = "")]
    job_started_date_time: String,
    #[arg(long, default_value = "")]
    job_closed_date_time: String,

    /// Attach a JPEG file as captured evidence (repeatable).
    #[arg(long = "image", value_name = "PATH")]
    images: Vec<PathBuf>,

    /// Capture frames from this camera input (e.g. /dev/video0).
    #[arg(long, value_name = "DEVICE")]
    camera: Option<String>,

    /// Number of frames to capture from the camera.
    #[arg(long, default_value_t = 1)]
    frames: usize,
}

#[derive(Args)]
struct TasksArgs {
    /// Filter by organization name (case-insensitive substring).
    #[arg(long)]
    search: Option<String>,

    /// Listing order by creation time.
    #[arg(long, value_enum, default_value_t = OrderArg::Newest)]
    order: OrderArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OrderArg {
    Newest,
    Oldest,
}

impl From<OrderArg> for SortOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Newest => SortOrder::Newest,
            OrderArg::Oldest => SortOrder::Oldest,
        }
    }
}

/// Backend connection settings loaded from the environment.
struct Config {
    api_url: String,
    token: String,
}

impl Config {
    fn from_env() -> anyhow::Result<Self> {
        let api_url =
            std::env::var("FIELDTASK_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let Ok(token) = std::env::var("FIELDTASK_TOKEN") else {
            bail!("FIELDTASK_TOKEN environment variable is required (issued at login)");
        };
        Ok(Self { api_url, token })
    }
}

// The whole pipeline is cooperative and single-threaded; a
// current-thread runtime is all it needs.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fieldtask=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let session = AuthSession::new(config.token);

    match cli.command {
        Command::Submit(args) => run_submit(args, &config.api_url, &session).await,
        Command::Tasks(args) => run_tasks(args, &config.api_url, &session).await,
    }
}

async fn run_submit(args: SubmitArgs, api_url: &str, session: &AuthSession) -> anyhow::Result<()> {
    let mut draft = draft_from_args(&args);

    if let Some(camera) = &args.camera {
        capture_frames(camera, args.frames, &mut draft).await?;
    }

    for path in &args.images {
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read image {}", path.display()))?;
        if draft.images.append(data).is_none() {
            tracing::warn!(path = %path.display(), "Image buffer full, skipping attachment");
        }
    }

    // Local validation gates the network: the first blocking condition
    // is what the operator sees.
    let violations = draft.validate();
    if let Some(first) = violations.first() {
        bail!("{first}");
    }

    let client = SubmissionClient::new(api_url);
    match client.submit(encoder::encode(&draft), session).await {
        Ok(submission) => {
            if submission.server_assigned {
                println!("Task submitted with ID: {}", submission.task_id);
            } else {
                println!(
                    "Task submitted; backend returned no ID (local reference: {})",
                    submission.task_id
                );
            }
            // Successful submission consumes the draft.
            draft.reset();
            Ok(())
        }
        Err(e) => bail!("{}", e.operator_message()),
    }
}

/// Open the camera, capture `frames` stills into the draft, and close
/// the device on every exit path. Ctrl-C while the camera is still
/// warming up cancels the pending open and releases the device.
async fn capture_frames(
    camera: &str,
    frames: usize,
    draft: &mut TaskDraft,
) -> anyhow::Result<()> {
    let mut device = CaptureDevice::new(FfmpegSource::new(camera));

    let cancel = device.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    if let Err(e) = device.open().await {
        device.close().await;
        bail!("{e}");
    }

    for _ in 0..frames {
        match device.capture_into(&mut draft.images).await {
            Ok(Some(ordinal)) => {
                println!("Captured image {} ({}/10)", ordinal + 1, draft.images.len());
            }
            Ok(None) => {
                tracing::warn!("Image buffer full, stopping capture");
                break;
            }
            Err(e) => {
                device.close().await;
                bail!("{e}");
            }
        }
    }

    device.close().await;
    Ok(())
}

async fn run_tasks(args: TasksArgs, api_url: &str, session: &AuthSession) -> anyhow::Result<()> {
    let query = TaskQuery::new(api_url);
    let mut view = match query.fetch_all(session).await {
        Ok(view) => view,
        Err(e) => bail!("{}", e.operator_message()),
    };

    if let Some(term) = &args.search {
        view.set_filter(term.clone());
    }
    view.set_order(args.order.into());

    let visible = view.visible();
    println!("Showing {} of {} tasks", visible.len(), view.total_count());
    for task in visible {
        println!(
            "{}  {}  {}  ({} image{})",
            task.created_at.format("%Y-%m-%d %H:%M"),
            task.id,
            task.organization_name,
            task.images.len(),
            if task.images.len() == 1 { "" } else { "s" },
        );
    }
    Ok(())
}

fn draft_from_args(args: &SubmitArgs) -> TaskDraft {
    TaskDraft {
        organization_name: args.organization_name.clone(),
        product_name: args.product_name.clone(),
        additional_info: args.additional_info.clone(),
        remarks: args.remarks.clone(),
        machine_name: args.machine_name.clone(),
        machine_manufacturer: args.machine_manufacturer.clone(),
        machine_serial_number: args.machine_serial_number.clone(),
        machine_model: args.machine_model.clone(),
        contact_person_name: args.contact_person_name.clone(),
        contact_person_mobile_number: args.contact_person_mobile_number.clone(),
        company_address: args.company_address.clone(),
        ticket_number: args.ticket_number.clone(),
        customer_details: args.customer_details.clone(),
        job_started_date_time: args.job_started_date_time.clone(),
        job_closed_date_time: args.job_closed_date_time.clone(),
        images: Default::default(),
    }
}
