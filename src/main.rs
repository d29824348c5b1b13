//! # rx
//!
//! Terminal front end for the prescription dashboard.
//!
//! Every protected command checks the stored session first and sends the user to
//! `rx login` when it is missing, expired, or rejected by the backend.

mod terminal;

use anyhow::bail;
use chrono::Utc;
use clap::{Parser, Subcommand};
use rx_api::{ApiClient, ApiError, AuthService, PrescriptionApi, PrescriptionService};
use rx_core::{
    ClientConfig, Field, LoginForm, PrescriptionReceipt, SessionContext, ValidationErrors,
    map_backend_to_display_status,
};
use rx_dashboard::history::EMPTY_MESSAGE;
use rx_dashboard::{
    AppShell, HistoryView, Notice, PrescriptionForm, PrescriptionHistory, Route, SubmitOutcome,
};
use rx_storage::Storage;
use std::sync::Arc;
use terminal::{TerminalNavigator, TerminalNotifier};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "rx")]
#[command(about = "Prescription dashboard terminal client")]
struct Cli {
    /// Disable coloured output (also honoured via NO_COLOR)
    #[arg(long, global = true)]
    no_color: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session
    Login {
        #[arg(long, env = "RX_EMAIL")]
        email: String,
        #[arg(long, env = "RX_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and clear all stored state
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List the medicines available for prescribing
    Medicines,
    /// Show the sample patient used for prefill
    Patient,
    /// Issue a new prescription
    Issue {
        /// Fill patient fields from the sample patient first
        #[arg(long)]
        prefill: bool,
        #[arg(long)]
        patient_name: Option<String>,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: Option<String>,
        #[arg(long)]
        address: Option<String>,
        /// Medicine display name, as listed by `rx medicines`
        #[arg(long)]
        medication: Option<String>,
        #[arg(long)]
        dosage: Option<String>,
        /// "Pickup from Pharmacy", "Home Delivery" or "Express Delivery"
        #[arg(long)]
        delivery: Option<String>,
    },
    /// Show the prescription history table
    History {
        /// Print rows as JSON
        #[arg(long)]
        json: bool,
        /// Extra attempts after a failed fetch
        #[arg(long, default_value_t = 0)]
        retries: u32,
    },
    /// Poll the status of a prescription
    Status {
        /// Prescription record ID
        id: String,
    },
    /// Show a single prescription
    Show { id: String },
    /// Change the status of a prescription
    UpdateStatus { id: String, status: String },
    /// Delete a prescription
    Delete { id: String },
}

struct App {
    client: ApiClient,
    service: Arc<PrescriptionService>,
    shell: AppShell,
    navigator: Arc<TerminalNavigator>,
    color: bool,
}

impl App {
    fn from_env(color: bool) -> anyhow::Result<Self> {
        let config = ClientConfig::from_env_values(
            std::env::var("RX_BACKEND_URI").ok(),
            std::env::var("RX_DATA_DIR").ok(),
            std::env::var("RX_HTTP_TIMEOUT_SECS").ok(),
        )?;
        Self::new(config, color)
    }

    fn new(config: ClientConfig, color: bool) -> anyhow::Result<Self> {
        tracing::debug!("backend {}", config.backend_uri());

        let storage = Arc::new(Storage::open(config.storage_path()));
        let session = SessionContext::new(storage);
        let client = ApiClient::new(Arc::new(config), session.clone())?;
        let service = Arc::new(PrescriptionService::new(client.clone()));
        let navigator = Arc::new(TerminalNavigator::default());
        let shell = AppShell::new(
            session,
            navigator.clone(),
            Arc::new(TerminalNotifier::new(color)),
        );

        Ok(Self {
            client,
            service,
            shell,
            navigator,
            color,
        })
    }

    fn require_session(&self) -> anyhow::Result<()> {
        match self.shell.entry_route(Utc::now()) {
            Route::Dashboard => Ok(()),
            Route::Login => {
                self.shell.navigate(Route::Login);
                bail!("not signed in");
            }
        }
    }

    /// Whether a view sent the user to login while this command ran.
    fn redirected(&self) -> bool {
        self.navigator.last_route() == Some(Route::Login)
    }

    fn print_receipt(&self, receipt: &PrescriptionReceipt) {
        let status = map_backend_to_display_status(&receipt.status);
        println!("Prescription {}", receipt.prescription_id);
        println!("  ID:      {}", receipt.id);
        println!("  Status:  {}", terminal::status_chip(status, self.color));
        if !receipt.prescription_url.is_empty() {
            println!("  URL:     {}", receipt.prescription_url);
        }
        println!("  Updated: {}", receipt.updated_at);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("rx=warn".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let color = !cli.no_color && std::env::var_os("NO_COLOR").is_none();

    let Some(command) = cli.command else {
        println!("Use 'rx --help' for commands");
        return Ok(());
    };
    let signing_out = matches!(command, Commands::Logout);

    let app = App::from_env(color)?;
    let result = run(&app, command).await;

    if !signing_out && app.redirected() {
        eprintln!("Sign in with `rx login` to continue.");
    }
    result
}

async fn run(app: &App, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Login { email, password } => {
            let auth = AuthService::new(app.client.clone());
            match auth.login(&LoginForm { email, password }).await {
                Ok(user) => {
                    println!(
                        "Signed in as {} ({}, {})",
                        user.name, user.role, user.department
                    );
                }
                Err(ApiError::Validation(errors)) => {
                    print_field_errors(&errors);
                    bail!("login form is invalid");
                }
                Err(ApiError::Rejected(message)) => bail!("login failed: {message}"),
                Err(e) => return Err(e.into()),
            }
        }
        Commands::Logout => app.shell.logout(),
        Commands::Whoami => {
            app.require_session()?;
            println!("{}", app.shell.header_name());
            if let Some(user) = app.shell.header_profile() {
                println!("  {}", user.email);
                println!("  {}, {}", user.role, user.department);
            }
            let expiry = app
                .shell
                .session()
                .token_claims()
                .and_then(|claims| claims.exp)
                .and_then(|exp| chrono::DateTime::from_timestamp(exp, 0));
            if let Some(at) = expiry {
                println!(
                    "  session expires {}",
                    at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M")
                );
            }
        }
        Commands::Medicines => {
            app.require_session()?;
            let form = PrescriptionForm::new(app.service.clone(), app.shell.clone());
            form.load_medicines().await;
            if app.redirected() {
                bail!("session rejected by backend");
            }
            for medicine in form.medicines() {
                println!("{:>12}  {}", medicine.snomed_id, medicine.display_name);
            }
        }
        Commands::Patient => {
            app.require_session()?;
            let response = app.shell.guard(app.service.get_mock_patient().await)?;
            let message = response.message.clone();
            let Some(patient) = response.into_success() else {
                bail!("sample patient unavailable: {message}");
            };
            println!("{}", patient.full_name());
            println!("  DOB:     {}", patient.birth_date().unwrap_or_default());
            println!("  Address: {}", patient.single_line_address());
            if !patient.email.is_empty() {
                println!("  Email:   {}", patient.email);
            }
        }
        Commands::Issue {
            prefill,
            patient_name,
            dob,
            address,
            medication,
            dosage,
            delivery,
        } => {
            app.require_session()?;
            let form = PrescriptionForm::new(app.service.clone(), app.shell.clone());
            form.load_medicines().await;
            if app.redirected() {
                bail!("session rejected by backend");
            }
            if prefill {
                match form.prefill_sample_patient().await {
                    Ok(patient) => app.shell.notify(Notice::info(format!(
                        "Patient details prefilled for {}",
                        patient.full_name()
                    ))),
                    Err(e) if e.is_unauthorized() => return Err(e.into()),
                    Err(e) => eprintln!("Could not prefill patient: {e}"),
                }
            }
            form.edit(|draft| {
                let fields = [
                    (&mut draft.patient_name, patient_name),
                    (&mut draft.dob, dob),
                    (&mut draft.address, address),
                    (&mut draft.medication, medication),
                    (&mut draft.dosage, dosage),
                    (&mut draft.delivery_type, delivery),
                ];
                for (slot, value) in fields {
                    if let Some(value) = value {
                        *slot = value;
                    }
                }
            });

            match form.submit().await {
                SubmitOutcome::Submitted(receipt) => app.print_receipt(&receipt),
                SubmitOutcome::Invalid(errors) => {
                    print_field_errors(&errors);
                    if errors.get(Field::DeliveryType).is_some() {
                        let options: Vec<&str> =
                            form.delivery_options().iter().map(|o| o.label()).collect();
                        eprintln!("  delivery options: {}", options.join(", "));
                    }
                    bail!("prescription not submitted");
                }
                SubmitOutcome::Rejected(message) => {
                    bail!("backend rejected prescription: {message}")
                }
                SubmitOutcome::Failed(e) => return Err(e.into()),
                SubmitOutcome::Busy => bail!("a submission is already in flight"),
            }
        }
        Commands::History { json, retries } => {
            app.require_session()?;
            let history = PrescriptionHistory::new(app.service.clone(), app.shell.clone());
            history.refresh().await;
            let mut attempts = 0;
            while history.error().is_some()
                && attempts < retries
                && !app.redirected()
            {
                attempts += 1;
                tracing::info!("retrying history fetch ({attempts}/{retries})");
                history.retry().await;
            }

            match history.view() {
                HistoryView::Rows(rows) if json => {
                    println!("{}", serde_json::to_string_pretty(&rows)?);
                }
                HistoryView::Rows(rows) => {
                    print!("{}", terminal::render_history(&rows, app.color));
                    if let Some(at) = history.last_updated() {
                        println!(
                            "\nLast updated: {}",
                            at.with_timezone(&chrono::Local).format("%H:%M:%S")
                        );
                    }
                }
                HistoryView::Empty if json => println!("[]"),
                HistoryView::Empty => println!("No prescriptions yet. {EMPTY_MESSAGE}"),
                HistoryView::Failed {
                    message,
                    retry_label,
                } => {
                    bail!("{message} ({retry_label}: rerun with --retries)");
                }
                HistoryView::Loading => println!("{}", history.refresh_label()),
            }
        }
        Commands::Status { id } => {
            app.require_session()?;
            let response = app
                .shell
                .guard(app.service.get_prescription_status(&id).await)?;
            let message = response.message.clone();
            let Some(receipt) = response.into_success() else {
                bail!("status unavailable: {message}");
            };
            app.print_receipt(&receipt);
        }
        Commands::Show { id } => {
            app.require_session()?;
            let response = app
                .shell
                .guard(app.service.get_prescription_by_id(&id).await)?;
            if let Some(receipt) = response.into_success() {
                app.print_receipt(&receipt);
            }
        }
        Commands::UpdateStatus { id, status } => {
            app.require_session()?;
            let response = app
                .shell
                .guard(app.service.update_prescription_status(&id, &status).await)?;
            if let Some(receipt) = response.into_success() {
                app.print_receipt(&receipt);
            }
        }
        Commands::Delete { id } => {
            app.require_session()?;
            app.shell.guard(app.service.delete_prescription(&id).await)?;
            println!("Deleted {id}");
        }
    }

    Ok(())
}

fn print_field_errors(errors: &ValidationErrors) {
    for error in errors.iter() {
        eprintln!("  {}: {}", error.field.name(), error.message);
    }
}
