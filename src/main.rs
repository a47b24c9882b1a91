use bank_operations::{
    config::Config,
    ledger::{InMemoryFeedbackStore, InMemoryLedger},
    validation::validate_date,
    Cookie, FeedbackRecord, FeedbackService, RequestContext, TransferRequest, TransferService,
    User,
};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// One line of input
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Command {
    Transfer {
        user: String,
        #[serde(default)]
        cookies: Vec<Cookie>,
        #[serde(flatten)]
        request: TransferRequest,
    },
    Feedback {
        name: String,
        email: String,
        subject: String,
        comments: String,
    },
    ValidateDate {
        date: String,
        format: Option<String>,
    },
}

/// One line of output
#[derive(Debug, Serialize)]
struct Reply {
    ok: bool,
    message: String,
}

impl Reply {
    fn succeeded(message: String) -> Self {
        Self { ok: true, message }
    }

    fn failed(message: String) -> Self {
        Self { ok: false, message }
    }
}

/// Everything a command needs, wired from the configuration
struct Bank {
    users: Vec<User>,
    transfers: TransferService<InMemoryLedger>,
    feedback: FeedbackService<InMemoryFeedbackStore>,
    date_format: String,
}

impl Bank {
    fn new(config: &Config) -> Self {
        let users = config.seeded_users();
        let ledger = InMemoryLedger::with_users(&users);

        Self {
            users,
            transfers: TransferService::new(ledger, config.accounts.clone()),
            feedback: FeedbackService::new(InMemoryFeedbackStore::new()),
            date_format: config.validation.date_format.clone(),
        }
    }

    async fn handle(&self, line: &str) -> Reply {
        let command: Command = match serde_json::from_str(line) {
            Ok(command) => command,
            Err(e) => {
                warn!("Malformed command: {}", e);
                return Reply::failed(format!("ERROR: malformed command: {e}"));
            }
        };

        match command {
            Command::Transfer {
                user,
                cookies,
                request,
            } => {
                // Stands in for the session lookup of the authenticated user
                let Some(user) = self.users.iter().find(|known| known.username == user) else {
                    return Reply::failed(format!("ERROR: unknown user {user}"));
                };
                let ctx = RequestContext {
                    user: user.clone(),
                    cookies,
                };

                let outcome = self
                    .transfers
                    .transfer_from_request(&ctx, request.to, &request.from, request.amount)
                    .await;
                Reply {
                    ok: outcome.is_success(),
                    message: outcome.message(),
                }
            }
            Command::Feedback {
                name,
                email,
                subject,
                comments,
            } => {
                let form = FeedbackRecord {
                    name,
                    email,
                    subject,
                    comments,
                };
                match self.feedback.submit_form(&form).await {
                    Ok(id) => Reply::succeeded(format!("Thank you. Your feedback was stored as {id}.")),
                    Err(e) => Reply::failed(format!("ERROR: {e}")),
                }
            }
            Command::ValidateDate { date, format } => {
                let format = format.unwrap_or_else(|| self.date_format.clone());
                if validate_date(&date, &format) {
                    Reply::succeeded(format!("{date} is a valid {format} date"))
                } else {
                    Reply::failed(format!("{date} is not a valid {format} date"))
                }
            }
        }
    }
}

/// The main entry point for the bank operations helper.
///
/// Loads the configuration, initializes logging on stderr, seeds the
/// in-memory collaborators and then answers one JSON command per stdin line
/// with one JSON reply per stdout line.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/default.toml".to_string());
    let config = Config::load(&path)?;

    // RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!(
        "Bank operations starting from {} with {} users, account source {:?}",
        path,
        config.users.len(),
        config.accounts.source
    );

    let bank = Bank::new(&config);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let reply = bank.handle(&line).await;
        let mut encoded = serde_json::to_string(&reply)?;
        encoded.push('\n');
        stdout.write_all(encoded.as_bytes()).await?;
        stdout.flush().await?;
    }

    info!("Input closed, shutting down");
    Ok(())
}
