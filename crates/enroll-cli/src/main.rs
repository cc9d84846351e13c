use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::debug;

use enroll_db::Store;
use enroll_db::repository::Repository;
use enroll_engine::{Engine, EngineConfig, SessionManager};
use enroll_types::api::RedirectTarget;
use enroll_types::catalog;
use enroll_types::models::{DonorProfile, NewAccount, Role, TeacherProfile};

#[derive(Parser)]
#[command(name = "enroll", version, about = "Teacher and donor registration directory")]
struct Cli {
    /// Path of the local store
    #[arg(long, env = "ENROLL_DB_PATH", default_value = "enroll.db", global = true)]
    db_path: PathBuf,

    /// Simulated network latency in milliseconds
    #[arg(long, env = "ENROLL_NETWORK_DELAY_MS", default_value_t = 1000, global = true)]
    network_delay_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a teacher or donor account
    SignUp {
        #[command(subcommand)]
        role: SignUpRole,
    },
    /// Sign in with email and password
    SignIn {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Submit the verification code for a pending account
    Verify {
        #[arg(long)]
        email: String,
        #[arg(long, value_enum)]
        role: RoleArg,
        #[arg(long)]
        code: String,
    },
    /// Request a password-reset code
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
    /// Complete a password reset
    ResetPassword {
        #[arg(long)]
        email: String,
        #[arg(long)]
        code: String,
        #[arg(long)]
        new_password: String,
    },
    /// Print a role directory
    List {
        #[arg(value_enum)]
        role: RoleArg,
    },
    /// Print the option lists backing the sign-up forms
    Catalog {
        #[arg(value_enum)]
        kind: CatalogKind,
    },
    /// Show the current session
    Whoami,
    /// Close the current session
    Logout,
}

#[derive(Subcommand)]
enum SignUpRole {
    Teacher(TeacherArgs),
    Donor(DonorArgs),
}

#[derive(Args)]
struct BaseArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone_number: String,
    #[arg(long)]
    password: String,
}

#[derive(Args)]
struct TeacherArgs {
    #[command(flatten)]
    base: BaseArgs,
    #[arg(long)]
    region: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    school: String,
    #[arg(long)]
    grade: String,
}

#[derive(Args)]
struct DonorArgs {
    #[command(flatten)]
    base: BaseArgs,
    #[arg(long)]
    country: String,
    #[arg(long)]
    region: String,
    #[arg(long)]
    city: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RoleArg {
    Teacher,
    Donor,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Teacher => Role::Teacher,
            RoleArg::Donor => Role::Donor,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CatalogKind {
    Regions,
    Cities,
    Schools,
    Grades,
    Countries,
}

impl TeacherArgs {
    fn into_account(self) -> NewAccount<TeacherProfile> {
        NewAccount {
            first_name: self.base.first_name,
            last_name: self.base.last_name,
            email: self.base.email,
            phone_number: self.base.phone_number,
            password: self.base.password,
            profile: TeacherProfile {
                region: self.region,
                city: self.city,
                school: self.school,
                grade: self.grade,
            },
        }
    }
}

impl DonorArgs {
    fn into_account(self) -> NewAccount<DonorProfile> {
        NewAccount {
            first_name: self.base.first_name,
            last_name: self.base.last_name,
            email: self.base.email,
            phone_number: self.base.phone_number,
            password: self.base.password,
            profile: DonorProfile {
                country: self.country,
                region: self.region,
                city: self.city,
            },
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging; flow messages go to stdout, logs stay opt-in.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "enroll=warn".into()),
        )
        .init();

    let cli = Cli::parse();
    debug!("using store at {}", cli.db_path.display());

    let store = Arc::new(Store::open(&cli.db_path)?);
    let engine = Engine::with_config(
        store.clone(),
        EngineConfig {
            network_delay: Duration::from_millis(cli.network_delay_ms),
        },
    );
    let sessions = SessionManager::new(store.clone());

    match cli.command {
        Command::SignUp { role } => match role {
            SignUpRole::Teacher(args) => {
                let outcome = engine.register(args.into_account()).await;
                println!("{}", outcome.message);
                report_redirect(outcome.redirect_to);
            }
            SignUpRole::Donor(args) => {
                let outcome = engine.register(args.into_account()).await;
                println!("{}", outcome.message);
                report_redirect(outcome.redirect_to);
            }
        },
        Command::SignIn { email, password } => {
            let outcome = engine.sign_in(&email, &password).await;
            println!("{}", outcome.message);
            if outcome.success {
                if let Some(role) = outcome.role {
                    sessions.login(role, &email)?;
                }
            } else if let Some(code) = &outcome.verification_code {
                println!("Your verification code is {code}");
            }
        }
        Command::Verify { email, role, code } => {
            let outcome = engine.verify(&email, role.into(), &code).await;
            println!("{}", outcome.message);
            report_redirect(outcome.redirect_to);
        }
        Command::ForgotPassword { email } => {
            let outcome = engine.request_password_reset(&email).await;
            println!("{}", outcome.message);
        }
        Command::ResetPassword {
            email,
            code,
            new_password,
        } => {
            let outcome = engine.reset_password(&email, &code, &new_password).await;
            println!("{}", outcome.message);
        }
        Command::List { role } => match role {
            RoleArg::Teacher => list_teachers(&store)?,
            RoleArg::Donor => list_donors(&store)?,
        },
        Command::Catalog { kind } => print_catalog(kind),
        Command::Whoami => match sessions.current_session()? {
            Some(session) => println!(
                "{} {} (signed in at {})",
                session.role.display_name(),
                session.email,
                session.signed_in_at
            ),
            None => println!("Not signed in"),
        },
        Command::Logout => {
            sessions.logout()?;
            println!("Signed out");
        }
    }

    Ok(())
}

fn report_redirect(target: Option<RedirectTarget>) {
    if let Some(target) = target {
        println!("Continue at {}", target.path());
    }
}

fn list_teachers(store: &Store) -> anyhow::Result<()> {
    let records = Repository::<TeacherProfile>::new(store).load()?;
    println!(
        "{:<24} {:<28} {:<16} {:<10} {:<10} {:<10} {:<8}",
        "NAME", "EMAIL", "PHONE", "REGION", "CITY", "SCHOOL", "GRADE"
    );
    for r in &records {
        println!(
            "{:<24} {:<28} {:<16} {:<10} {:<10} {:<10} {:<8}",
            format!("{} {}", r.first_name, r.last_name),
            r.email,
            r.phone_number,
            r.profile.region,
            r.profile.city,
            r.profile.school,
            r.profile.grade
        );
    }
    println!("{} teachers registered", records.len());
    Ok(())
}

fn list_donors(store: &Store) -> anyhow::Result<()> {
    let records = Repository::<DonorProfile>::new(store).load()?;
    println!(
        "{:<24} {:<28} {:<16} {:<10} {:<10} {:<10}",
        "NAME", "EMAIL", "PHONE", "COUNTRY", "REGION", "CITY"
    );
    for r in &records {
        println!(
            "{:<24} {:<28} {:<16} {:<10} {:<10} {:<10}",
            format!("{} {}", r.first_name, r.last_name),
            r.email,
            r.phone_number,
            r.profile.country,
            r.profile.region,
            r.profile.city
        );
    }
    println!("{} donors registered", records.len());
    Ok(())
}

fn print_catalog(kind: CatalogKind) {
    let options = match kind {
        CatalogKind::Regions => catalog::REGIONS,
        CatalogKind::Cities => catalog::CITIES,
        CatalogKind::Schools => catalog::SCHOOLS,
        CatalogKind::Grades => catalog::GRADES,
        CatalogKind::Countries => catalog::COUNTRIES,
    };
    for option in options {
        println!("{:<10} {}", option.value, option.label);
    }
}
