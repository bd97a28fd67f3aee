
mod http;
mod manifest;
mod notify;

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use portal::api::ApiError;
use portal::auth::{RegisterForm, validate_login, validate_otp, validate_profile};
use portal::listing::{DEFAULT_PAGE_SIZE, DEFAULT_SORT_COLUMN, ListQuery, SortOrder};
use portal::payment::{
    BankDepositForm, Carrier, MobileMoneyForm, PaymentError, PaymentSelection, WireTransferForm, format_amount,
};
use portal::submit::{SubmissionReport, SubmitError, Submitter};
use portal::types::{OtpRequest, PortalSettings, ProfileUpdate};
use portal::{Notifier, PortalApi};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::http::{FileTokenStore, HttpPortalApi};
use crate::manifest::{Manifest, read_attachment};
use crate::notify::StderrNotifier;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Submit(#[from] SubmitError),
    #[error(transparent)]
    Payment(#[from] PaymentError),
    #[error("{0}")]
    Validation(String),
    #[error("cannot read {}: {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("the manifest lists no equipment")]
    EmptyManifest,
    #[error("dossier {dossier_id}: {failed} equipment entries still failing")]
    Incomplete { dossier_id: String, failed: usize },
    #[error("dossier {0} has no payment due")]
    NothingDue(String),
    #[error("cancelled")]
    Declined,
    #[error("health check failed: HTTP {0}")]
    Unhealthy(u16),
}

#[derive(Parser, Debug)]
#[command(name = "portal-cli", about = "Homologation portal command-line client")]
struct Cli {
    #[arg(long, env = "PORTAL_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[arg(long, env = "PORTAL_TOKEN_FILE", default_value = ".portal_token")]
    token_file: PathBuf,

    /// Log requests and submission progress to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Answer yes to every confirmation.
    #[arg(long, short = 'y', global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Ping,
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "PORTAL_PASSWORD")]
        password: String,
    },
    Logout,
    Register(RegisterArgs),
    /// Confirm an account with the emailed one-time code.
    Verify {
        #[arg(long)]
        email: String,
        #[arg(long)]
        code: String,
    },
    ResendOtp {
        #[arg(long)]
        email: String,
    },
    Me,
    Profile(ProfileArgs),
    Overview,
    Recent,
    List(ListArgs),
    Show {
        dossier_id: String,
    },
    /// Create a dossier from a JSON manifest and post its equipment.
    Submit(SubmitArgs),
    Pay(PayArgs),
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[arg(long)]
    company_name: String,
    #[arg(long)]
    niu: String,
    #[arg(long)]
    contact_name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    address: Option<String>,
    #[arg(long, env = "PORTAL_PASSWORD")]
    password: String,
}

#[derive(Args, Debug, Default)]
struct ProfileArgs {
    #[arg(long)]
    company_name: Option<String>,
    #[arg(long)]
    contact_name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    address: Option<String>,
}

#[derive(Args, Debug)]
struct ListArgs {
    #[arg(long, default_value_t = 1)]
    page: u32,
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: u32,
    #[arg(long, default_value = "")]
    search: String,
    #[arg(long, default_value = DEFAULT_SORT_COLUMN)]
    sort_by: String,
    #[arg(long, default_value = "desc", value_parser = ["asc", "desc"])]
    order: String,
}

#[derive(Args, Debug)]
struct SubmitArgs {
    manifest: PathBuf,

    /// Extra attempts for equipment that failed to post.
    #[arg(long, default_value_t = 2)]
    retries: u32,

    #[arg(long, default_value_t = 2000)]
    retry_delay_ms: u64,
}

#[derive(Args, Debug)]
struct PayArgs {
    dossier_id: String,
    #[command(subcommand)]
    method: PayMethod,
}

#[derive(Subcommand, Debug)]
enum PayMethod {
    Mobile {
        #[arg(long, value_parser = parse_carrier)]
        carrier: Carrier,
        #[arg(long)]
        phone: String,
    },
    Deposit {
        #[arg(long)]
        receipt: PathBuf,
    },
    Wire {
        #[arg(long)]
        reference: String,
        #[arg(long)]
        proof: PathBuf,
    },
}

fn parse_carrier(raw: &str) -> Result<Carrier, String> {
    Carrier::parse(raw).ok_or_else(|| format!("unknown carrier `{raw}` (expected mtn or airtel)"))
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let http = reqwest::Client::builder().timeout(Duration::from_secs(60)).build()?;
    let api = HttpPortalApi::new(http.clone(), &cli.base_url, FileTokenStore::new(&cli.token_file));
    let notifier = StderrNotifier::new(cli.yes);

    match cli.command {
        Command::Ping => run_ping(&http, &api).await,
        Command::Login { email, password } => run_login(&api, &email, &password).await,
        Command::Logout => {
            api.session().sign_out();
            println!("signed out");
            Ok(())
        }
        Command::Register(args) => run_register(&api, args).await,
        Command::Verify { email, code } => run_verify(&api, email, &code).await,
        Command::ResendOtp { email } => {
            let ack = api.resend_otp(email.trim()).await?;
            println!("{}", ack.message.unwrap_or_else(|| "code sent".to_owned()));
            Ok(())
        }
        Command::Me => print_json(&api.current_user().await?),
        Command::Profile(args) => run_profile(&api, args).await,
        Command::Overview => print_json(&api.overview().await?),
        Command::Recent => print_json(&api.recent_dossiers().await?),
        Command::List(args) => {
            let page = api.list_dossiers(&list_query(&args)).await?;
            eprintln!("page {} of {}", page.page, page.total_pages.max(1));
            print_json(&page)
        }
        Command::Show { dossier_id } => print_json(&api.dossier(&dossier_id).await?),
        Command::Submit(args) => {
            let report = run_submit(&api, &notifier, &args).await?;
            println!("{}", report.dossier_id);
            Ok(())
        }
        Command::Pay(args) => run_pay(&http, &api, &notifier, args).await,
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

async fn run_ping(http: &reqwest::Client, api: &HttpPortalApi) -> Result<(), CliError> {
    let response = http.get(api.url("/healthz")).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::Unhealthy(status.as_u16()));
    }
    println!("ok");
    Ok(())
}

async fn run_login(api: &HttpPortalApi, email: &str, password: &str) -> Result<(), CliError> {
    let request = validate_login(email, password).map_err(|msg| CliError::Validation(msg.to_owned()))?;
    let response = match api.login(&request).await {
        Ok(response) => response,
        Err(ApiError::Status { status: 403, message }) => {
            eprintln!("account not verified; run `portal-cli verify --email {}`", request.email);
            return Err(CliError::Api(ApiError::Status { status: 403, message }));
        }
        Err(err) => return Err(err.into()),
    };
    let user = match response.user {
        Some(user) => user,
        None => api.current_user().await?,
    };
    eprintln!("signed in as {}", user.email);
    print_json(&user)
}

async fn run_register(api: &HttpPortalApi, args: RegisterArgs) -> Result<(), CliError> {
    let form = RegisterForm {
        company_name: args.company_name,
        niu: args.niu,
        contact_name: args.contact_name,
        email: args.email,
        phone: args.phone,
        address: args.address.unwrap_or_default(),
        password_confirmation: args.password.clone(),
        password: args.password,
    };
    let report = form.validate();
    if !report.is_valid() {
        return Err(CliError::Validation(report.alert_message()));
    }
    let request = form.to_request();
    let ack = api.register(&request).await?;
    println!("{}", ack.message.unwrap_or_else(|| format!("verification code sent to {}", request.email)));
    Ok(())
}

async fn run_verify(api: &HttpPortalApi, email: String, code: &str) -> Result<(), CliError> {
    let code = validate_otp(code).map_err(|msg| CliError::Validation(msg.to_owned()))?;
    let ack = api.verify_otp(&OtpRequest { email: email.trim().to_owned(), code }).await?;
    if api.session().is_authenticated() {
        let user = api.current_user().await?;
        eprintln!("verified and signed in as {}", user.email);
    } else {
        println!("{}", ack.message.unwrap_or_else(|| "verified; run `portal-cli login`".to_owned()));
    }
    Ok(())
}

/// Overlay the given fields on the current profile.
fn apply_profile(mut profile: ProfileUpdate, args: ProfileArgs) -> ProfileUpdate {
    if let Some(value) = args.company_name {
        profile.company_name = value;
    }
    if let Some(value) = args.contact_name {
        profile.contact_name = value;
    }
    if let Some(value) = args.email {
        profile.email = value;
    }
    if let Some(value) = args.phone {
        profile.phone = value;
    }
    if let Some(value) = args.address {
        let value = value.trim();
        profile.address = (!value.is_empty()).then(|| value.to_owned());
    }
    profile
}

async fn run_profile(api: &HttpPortalApi, args: ProfileArgs) -> Result<(), CliError> {
    let current = api.current_user().await?;
    let profile = apply_profile(ProfileUpdate::from(&current), args);
    let report = validate_profile(&profile);
    if !report.is_valid() {
        return Err(CliError::Validation(report.alert_message()));
    }
    print_json(&api.update_profile(&profile).await?)
}

fn list_query(args: &ListArgs) -> ListQuery {
    ListQuery {
        page: args.page.max(1),
        page_size: args.page_size.max(1),
        search: args.search.clone(),
        sort_by: args.sort_by.clone(),
        order: if args.order == "asc" { SortOrder::Asc } else { SortOrder::Desc },
    }
}

/// Submit the manifest, re-posting failed equipment up to `retries` times
/// against the same dossier.
async fn run_submit<A, N>(api: &A, notifier: &N, args: &SubmitArgs) -> Result<SubmissionReport, CliError>
where
    A: PortalApi + ?Sized,
    N: Notifier + ?Sized,
{
    let base_dir = args.manifest.parent().unwrap_or_else(|| Path::new(""));
    let mut store = Manifest::load(&args.manifest)?.into_store(base_dir)?;
    let mut submitter = Submitter::new();

    let mut report = submitter.submit(api, notifier, &mut store).await?;
    let mut attempt = 0;
    while !report.is_complete() && attempt < args.retries {
        attempt += 1;
        print_failures(&report);
        tracing::info!(attempt, dossier_id = %report.dossier_id, "retrying failed equipment");
        tokio::time::sleep(Duration::from_millis(args.retry_delay_ms)).await;
        report = submitter.retry_failed(api, notifier, &mut store).await?;
    }

    if !report.is_complete() {
        print_failures(&report);
        return Err(CliError::Incomplete { dossier_id: report.dossier_id, failed: report.failed.len() });
    }
    Ok(report)
}

fn print_failures(report: &SubmissionReport) {
    for failure in &report.failed {
        eprintln!("  {}: {}", failure.label, failure.error.user_message());
    }
}

/// The payment form for `method`, with any receipt or proof loaded from disk.
fn selection_for(method: PayMethod) -> Result<PaymentSelection, CliError> {
    Ok(match method {
        PayMethod::Mobile { carrier, phone } => {
            let mut form = MobileMoneyForm::default();
            form.select_carrier(carrier);
            form.set_phone(&phone);
            PaymentSelection::MobileMoney(form)
        }
        PayMethod::Deposit { receipt } => {
            PaymentSelection::BankDeposit(BankDepositForm { receipt: Some(read_attachment(&receipt)?) })
        }
        PayMethod::Wire { reference, proof } => {
            PaymentSelection::WireTransfer(WireTransferForm { reference, proof: Some(read_attachment(&proof)?) })
        }
    })
}

async fn fetch_settings(http: &reqwest::Client, api: &HttpPortalApi) -> Option<PortalSettings> {
    let response = http.get(api.url("/portal/config.json")).send().await.ok()?;
    if !response.status().is_success() {
        return None;
    }
    response.json().await.ok()
}

async fn run_pay(
    http: &reqwest::Client,
    api: &HttpPortalApi,
    notifier: &StderrNotifier,
    args: PayArgs,
) -> Result<(), CliError> {
    let detail = api.dossier(&args.dossier_id).await?;
    let amount = match detail.amount_due {
        Some(amount) if detail.status.requires_payment() => amount,
        _ => return Err(CliError::NothingDue(args.dossier_id)),
    };

    let selection = selection_for(args.method)?;
    match &selection {
        PaymentSelection::MobileMoney(form) => {
            form.validate()?;
            if !notifier.confirm(&form.confirmation_text(amount)) {
                return Err(CliError::Declined);
            }
        }
        PaymentSelection::WireTransfer(form) => {
            if let Some(settings) = fetch_settings(http, api).await {
                if form.reference_mismatch(&settings.bank.account_reference) {
                    notifier.warning("The reference differs from the published account; interbank fees may apply.");
                }
            }
        }
        PaymentSelection::BankDeposit(_) => {}
    }

    let submission = selection.finalize(amount)?;
    let fees = selection.fees(amount);
    let ack = api.submit_payment(&args.dossier_id, &submission).await?;
    if !ack.success {
        return Err(CliError::Api(ApiError::Status {
            status: 200,
            message: ack.message.unwrap_or_else(|| "payment rejected".to_owned()),
        }));
    }
    notifier.success(&format!("{} paid by {}", format_amount(fees.total), selection.mode().label()));
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
