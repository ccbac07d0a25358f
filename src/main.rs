//! DermaCare CLI - terminal client for the DermaCare skincare platform

mod api;
mod config;
mod guard;
mod models;
mod realtime;
mod session;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::ApiClient;
use models::{Role, SkinConcern, SkinType};

#[derive(Parser)]
#[command(name = "derm-cli")]
#[command(about = "Lightweight CLI client for the DermaCare skincare platform", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with email and password
    Login {
        email: String,
        password: String,
    },

    /// Register a new account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        phone: String,
        /// Account role: user or dermatologist
        #[arg(long, default_value = "user")]
        role: String,
    },

    /// Log out and clear the stored session
    Logout,

    /// Show current session status
    Status,

    /// Fetch and show the current user's profile
    Whoami,

    /// Update the current user's profile
    UpdateProfile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        /// Path to a new profile image
        #[arg(long)]
        image: Option<std::path::PathBuf>,
    },

    /// Delete the current account (requires password)
    DeleteAccount {
        #[arg(long)]
        password: String,
    },

    /// Browse the product catalog
    Products {
        #[command(subcommand)]
        action: ProductCommands,
    },

    /// Manage skincare routines
    Routines {
        #[command(subcommand)]
        action: RoutineCommands,
    },

    /// Track skin progress
    Progress {
        #[command(subcommand)]
        action: ProgressCommands,
    },

    /// Skin profile and assessment
    Skin {
        #[command(subcommand)]
        action: SkinCommands,
    },

    /// Manage appointments
    Appointments {
        #[command(subcommand)]
        action: AppointmentCommands,
    },

    /// List conversations
    Chats,

    /// Read a conversation's history
    Read {
        /// Conversation ID (from `chats` output)
        chat_id: String,
    },

    /// Open a conversation for live messaging
    Open {
        /// Conversation ID (from `chats` output)
        chat_id: String,
    },

    /// Start (or resume) a conversation with a dermatologist
    ChatWith {
        /// Dermatologist ID (from `dermatologists` output)
        dermatologist_id: String,
    },

    /// List registered dermatologists
    Dermatologists,

    /// Notifications
    Notifications {
        #[command(subcommand)]
        action: NotificationCommands,
    },

    /// Dermatologist workspace
    Derm {
        #[command(subcommand)]
        action: DermCommands,
    },

    /// Platform administration
    Admin {
        #[command(subcommand)]
        action: AdminCommands,
    },

    /// AI skincare recommendations
    Recommend,

    /// Show or change client configuration
    Config {
        /// Set the backend base URL
        #[arg(long)]
        base_url: Option<String>,
    },
}

#[derive(Subcommand)]
enum ProductCommands {
    /// List products, optionally filtered
    List {
        #[arg(long)]
        skin_type: Option<String>,
        /// Concern filter, repeatable
        #[arg(long)]
        concern: Vec<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show one product
    Show { id: String },
    /// Products recommended for your skin profile
    Recommended,
    /// Create a product (admin)
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        brand: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        ingredients: String,
        #[arg(long)]
        sustainability_score: f64,
        #[arg(long)]
        allergens: Option<String>,
        #[arg(long)]
        image: Option<std::path::PathBuf>,
    },
    /// Update a product (admin)
    Update {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        brand: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        ingredients: String,
        #[arg(long)]
        sustainability_score: f64,
        #[arg(long)]
        allergens: Option<String>,
        #[arg(long)]
        image: Option<std::path::PathBuf>,
    },
    /// Delete a product (admin)
    Delete { id: String },
}

#[derive(Subcommand)]
enum RoutineCommands {
    /// List your routines
    List,
    /// Show one routine
    Show { id: String },
    /// Create a routine
    Create {
        #[arg(long)]
        name: String,
        /// Routine type, e.g. MORNING or EVENING
        #[arg(long = "type")]
        routine_type: String,
    },
    /// Update a routine
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "type")]
        routine_type: Option<String>,
    },
    /// Delete a routine
    Delete { id: String },
    /// Add a product step to a routine
    AddStep {
        routine_id: String,
        product_id: String,
        #[arg(long)]
        order: u32,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Remove a step
    DeleteStep { step_id: String },
}

#[derive(Subcommand)]
enum ProgressCommands {
    /// List progress log entries
    List,
    /// Add a progress log entry
    Log {
        /// Concern this entry tracks, e.g. ACNE
        #[arg(long)]
        concern: String,
        /// Rating 1-5
        #[arg(long)]
        rating: u8,
        #[arg(long)]
        notes: Option<String>,
        /// Path to a progress photo
        #[arg(long)]
        image: Option<std::path::PathBuf>,
    },
    /// Delete a progress log entry
    Delete { id: String },
    /// Compare progress between two dates
    Compare {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
}

#[derive(Subcommand)]
enum SkinCommands {
    /// Show your skin profile
    Show,
    /// Create your skin profile from an assessment
    Assess {
        /// Skin type: dry, oily, combination, normal, sensitive
        #[arg(long)]
        skin_type: String,
        /// Concerns, repeatable: acne, aging, pigmentation, ...
        #[arg(long)]
        concern: Vec<String>,
        #[arg(long)]
        allergies: Option<String>,
        #[arg(long)]
        goals: Option<String>,
    },
    /// Update your skin profile
    Update {
        #[arg(long)]
        skin_type: String,
        #[arg(long)]
        concern: Vec<String>,
        #[arg(long)]
        allergies: Option<String>,
        #[arg(long)]
        goals: Option<String>,
    },
}

#[derive(Subcommand)]
enum AppointmentCommands {
    /// List your appointments
    List,
    /// Book an appointment
    Book {
        dermatologist_id: String,
        /// ISO date-time, e.g. 2026-03-01T10:00:00Z
        #[arg(long)]
        date: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Update an appointment's status (dermatologist)
    Status {
        id: String,
        /// New status, e.g. CONFIRMED, COMPLETED, CANCELLED
        status: String,
    },
    /// Cancel an appointment
    Cancel { id: String },
}

#[derive(Subcommand)]
enum NotificationCommands {
    /// List notifications
    List,
    /// Mark one notification as read
    Read { id: String },
    /// Mark all notifications as read
    ReadAll,
    /// Delete a notification
    Delete { id: String },
}

#[derive(Subcommand)]
enum DermCommands {
    /// Dashboard summary and recent activity
    Dashboard,
    /// List your patients
    Patients,
    /// Show one patient
    Patient { id: String },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Platform statistics
    Stats,
    /// List all users
    Users,
    /// Delete a user
    DeleteUser { id: String },
    /// Change a user's role
    SetRole {
        id: String,
        /// New role: user, dermatologist, admin
        role: String,
    },
    /// List dermatologists awaiting approval
    Pending,
    /// Approve or reject a pending dermatologist
    Approve {
        id: String,
        /// APPROVED or REJECTED
        #[arg(default_value = "APPROVED")]
        status: String,
    },
}

/// Check the role guard before a gated command; a denial prints the view the
/// user would have been redirected to.
fn ensure_access(client: &ApiClient, view: &guard::View) -> Result<()> {
    let session = client.session().lock().unwrap();
    let user = session.user();
    let access = guard::check(user.as_ref(), session.is_authenticated(), view);
    match access {
        guard::Access::Grant => Ok(()),
        guard::Access::RedirectLogin => {
            bail!("Not logged in. Run 'derm-cli login'.")
        }
        guard::Access::RedirectHome(_) => bail!(
            "Your role does not permit {}; your landing view is {}",
            view.path,
            access.redirect_target().unwrap_or(guard::LOGIN_VIEW),
        ),
    }
}

/// The chat view appropriate for the current role.
fn chat_view(client: &ApiClient) -> guard::View {
    let role = client.session().lock().unwrap().user().map(|u| u.role);
    match role {
        Some(Role::Dermatologist) => guard::DERMATOLOGIST_CHAT,
        _ => guard::USER_CHAT,
    }
}

fn parse_skin_type(s: &str) -> Result<SkinType> {
    serde_json::from_value(serde_json::Value::String(s.to_uppercase()))
        .with_context(|| format!("Unknown skin type '{}'", s))
}

fn parse_concern(s: &str) -> Result<SkinConcern> {
    serde_json::from_value(serde_json::Value::String(s.to_uppercase().replace('-', "_")))
        .with_context(|| format!("Unknown concern '{}'", s))
}

fn parse_concerns(concerns: &[String]) -> Result<Vec<SkinConcern>> {
    concerns.iter().map(|c| parse_concern(c)).collect()
}

fn parse_role(s: &str) -> Result<Role> {
    Role::parse(s).with_context(|| format!("Unknown role '{}'", s))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let client = api::client::connect().await?;

    match cli.command {
        Commands::Login { email, password } => {
            api::auth::login(&client, &email, &password).await?;
        }
        Commands::Register {
            name,
            email,
            password,
            phone,
            role,
        } => {
            let req = api::auth::RegisterRequest {
                name,
                email,
                password,
                phone,
                role: parse_role(&role)?,
            };
            api::auth::register(&client, &req).await?;
        }
        Commands::Logout => {
            api::auth::logout(&client)?;
        }
        Commands::Status => {
            api::auth::status(&client);
        }
        Commands::Whoami => {
            api::users::whoami(&client).await?;
        }
        Commands::UpdateProfile { name, phone, image } => {
            let req = api::users::UpdateProfileRequest { name, phone, image };
            api::users::update_profile(&client, req).await?;
        }
        Commands::DeleteAccount { password } => {
            api::users::delete_profile(&client, &password).await?;
        }
        Commands::Products { action } => match action {
            ProductCommands::List {
                skin_type,
                concern,
                page,
                limit,
            } => {
                let query = api::products::ProductQuery {
                    skin_type: skin_type.map(|s| s.to_uppercase()),
                    concerns: concern.iter().map(|c| c.to_uppercase()).collect(),
                    page,
                    limit,
                };
                api::products::list_products(&client, &query).await?;
            }
            ProductCommands::Show { id } => {
                api::products::show_product(&client, &id).await?;
            }
            ProductCommands::Recommended => {
                api::products::recommended_products(&client).await?;
            }
            ProductCommands::Create {
                name,
                brand,
                description,
                ingredients,
                sustainability_score,
                allergens,
                image,
            } => {
                ensure_access(&client, &guard::ADMIN_DASHBOARD)?;
                let product = api::products::ProductUpsert {
                    name,
                    brand,
                    description,
                    ingredients,
                    sustainability_score,
                    allergens,
                    image,
                };
                api::products::create_product(&client, product).await?;
            }
            ProductCommands::Update {
                id,
                name,
                brand,
                description,
                ingredients,
                sustainability_score,
                allergens,
                image,
            } => {
                ensure_access(&client, &guard::ADMIN_DASHBOARD)?;
                let product = api::products::ProductUpsert {
                    name,
                    brand,
                    description,
                    ingredients,
                    sustainability_score,
                    allergens,
                    image,
                };
                api::products::update_product(&client, &id, product).await?;
            }
            ProductCommands::Delete { id } => {
                ensure_access(&client, &guard::ADMIN_DASHBOARD)?;
                api::products::delete_product(&client, &id).await?;
            }
        },
        Commands::Routines { action } => match action {
            RoutineCommands::List => api::routines::list_routines(&client).await?,
            RoutineCommands::Show { id } => api::routines::show_routine(&client, &id).await?,
            RoutineCommands::Create { name, routine_type } => {
                api::routines::create_routine(&client, &name, &routine_type).await?;
            }
            RoutineCommands::Update {
                id,
                name,
                routine_type,
            } => {
                api::routines::update_routine(
                    &client,
                    &id,
                    name.as_deref(),
                    routine_type.as_deref(),
                )
                .await?;
            }
            RoutineCommands::Delete { id } => {
                api::routines::delete_routine(&client, &id).await?;
            }
            RoutineCommands::AddStep {
                routine_id,
                product_id,
                order,
                notes,
            } => {
                api::routines::add_step(&client, &routine_id, &product_id, order, notes.as_deref())
                    .await?;
            }
            RoutineCommands::DeleteStep { step_id } => {
                api::routines::delete_step(&client, &step_id).await?;
            }
        },
        Commands::Progress { action } => match action {
            ProgressCommands::List => api::progress::list_logs(&client).await?,
            ProgressCommands::Log {
                concern,
                rating,
                notes,
                image,
            } => {
                if !(1..=5).contains(&rating) {
                    bail!("Rating must be between 1 and 5");
                }
                let log = api::progress::NewProgressLog {
                    image,
                    notes,
                    concern: parse_concern(&concern)?,
                    rating,
                };
                api::progress::create_log(&client, log).await?;
            }
            ProgressCommands::Delete { id } => {
                api::progress::delete_log(&client, &id).await?;
            }
            ProgressCommands::Compare { from, to } => {
                api::progress::comparison(&client, &from, &to).await?;
            }
        },
        Commands::Skin { action } => match action {
            SkinCommands::Show => api::skin::show_profile(&client).await?,
            SkinCommands::Assess {
                skin_type,
                concern,
                allergies,
                goals,
            } => {
                let assessment = api::skin::SkinAssessment {
                    skin_type: parse_skin_type(&skin_type)?,
                    concerns: parse_concerns(&concern)?,
                    allergies,
                    goals,
                };
                api::skin::create_profile(&client, assessment).await?;
            }
            SkinCommands::Update {
                skin_type,
                concern,
                allergies,
                goals,
            } => {
                let assessment = api::skin::SkinAssessment {
                    skin_type: parse_skin_type(&skin_type)?,
                    concerns: parse_concerns(&concern)?,
                    allergies,
                    goals,
                };
                api::skin::update_profile(&client, assessment).await?;
            }
        },
        Commands::Appointments { action } => match action {
            AppointmentCommands::List => api::appointments::list_appointments(&client).await?,
            AppointmentCommands::Book {
                dermatologist_id,
                date,
                notes,
            } => {
                api::appointments::create_appointment(
                    &client,
                    &dermatologist_id,
                    &date,
                    notes.as_deref(),
                )
                .await?;
            }
            AppointmentCommands::Status { id, status } => {
                api::appointments::update_status(&client, &id, &status.to_uppercase()).await?;
            }
            AppointmentCommands::Cancel { id } => {
                api::appointments::delete_appointment(&client, &id).await?;
            }
        },
        Commands::Chats => {
            api::chat::list_chats(&client).await?;
        }
        Commands::Read { chat_id } => {
            api::chat::read_messages(&client, &chat_id).await?;
        }
        Commands::Open { chat_id } => {
            ensure_access(&client, &chat_view(&client))?;
            realtime::open_conversation(&client, &chat_id).await?;
        }
        Commands::ChatWith { dermatologist_id } => {
            ensure_access(&client, &chat_view(&client))?;
            api::chat::create_chat(&client, &dermatologist_id).await?;
        }
        Commands::Dermatologists => {
            api::users::list_dermatologists(&client).await?;
        }
        Commands::Notifications { action } => match action {
            NotificationCommands::List => api::notifications::list_notifications(&client).await?,
            NotificationCommands::Read { id } => {
                api::notifications::mark_read(&client, &id).await?;
            }
            NotificationCommands::ReadAll => {
                api::notifications::mark_all_read(&client).await?;
            }
            NotificationCommands::Delete { id } => {
                api::notifications::delete_notification(&client, &id).await?;
            }
        },
        Commands::Derm { action } => match action {
            DermCommands::Dashboard => {
                ensure_access(&client, &guard::DERMATOLOGIST_DASHBOARD)?;
                api::dermatologist::dashboard(&client).await?;
            }
            DermCommands::Patients => {
                ensure_access(&client, &guard::DERMATOLOGIST_PATIENTS)?;
                api::dermatologist::list_patients(&client).await?;
            }
            DermCommands::Patient { id } => {
                ensure_access(&client, &guard::DERMATOLOGIST_PATIENTS)?;
                api::dermatologist::show_patient(&client, &id).await?;
            }
        },
        Commands::Admin { action } => {
            ensure_access(&client, &guard::ADMIN_DASHBOARD)?;
            match action {
                AdminCommands::Stats => api::admin::stats(&client).await?,
                AdminCommands::Users => api::admin::list_users(&client).await?,
                AdminCommands::DeleteUser { id } => {
                    api::admin::delete_user(&client, &id).await?;
                }
                AdminCommands::SetRole { id, role } => {
                    api::admin::update_user_role(&client, &id, parse_role(&role)?).await?;
                }
                AdminCommands::Pending => api::admin::pending_dermatologists(&client).await?,
                AdminCommands::Approve { id, status } => {
                    api::admin::approve_dermatologist(&client, &id, &status.to_uppercase()).await?;
                }
            }
        }
        Commands::Recommend => {
            api::ai::recommendations(&client).await?;
        }
        Commands::Config { base_url } => match base_url {
            Some(url) => {
                let mut cfg = config::Config::load()?;
                cfg.base_url = url.trim_end_matches('/').to_string();
                cfg.save()?;
                println!("Backend set to {}", cfg.base_url);
            }
            None => {
                println!("Backend: {}", client.base_url());
            }
        },
    }

    Ok(())
}
