use crate::client::{build_http_client, CloudinaryClient, ListingApiClient};
use crate::form::FormController;
use crate::model::{FieldId, InputValue, ListingType};
use crate::session::{self, CurrentUser};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Output line routing for stdout/stderr writer.
enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Spawn a blocking writer for stdout/stderr to avoid blocking async tasks.
fn spawn_output_writer() -> (
    mpsc::UnboundedSender<OutputLine>,
    tokio::task::JoinHandle<()>,
) {
    let (tx, mut rx) = mpsc::unbounded_channel::<OutputLine>();
    let handle = tokio::task::spawn_blocking(move || {
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        let mut out = std::io::LineWriter::new(stdout.lock());
        let mut err = std::io::LineWriter::new(stderr.lock());

        while let Some(line) = rx.blocking_recv() {
            match line {
                OutputLine::Stdout(msg) => {
                    let _ = writeln!(out, "{}", msg);
                }
                OutputLine::Stderr(msg) => {
                    let _ = writeln!(err, "{}", msg);
                }
            }
        }

        let _ = out.flush();
        let _ = err.flush();
    });
    (tx, handle)
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "create-listing",
    version,
    about = "Create a real-estate listing, with an interactive form or from flags"
)]
pub struct Cli {
    /// Base URL of the estate site (API and listing pages)
    #[arg(long, env = "LISTING_API_URL", default_value = "http://localhost:3000")]
    pub api_base_url: String,

    /// Id of the signed-in user the listing belongs to
    #[arg(long, env = "LISTING_USER_ID")]
    pub user_id: Option<String>,

    /// Session token sent as the access_token cookie
    #[arg(long, env = "LISTING_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Session file to read the signed-in user from
    #[arg(long)]
    pub session_file: Option<PathBuf>,

    /// Save the resolved user to the session file
    #[arg(long)]
    pub remember: bool,

    /// Print a JSON result and exit (no TUI)
    #[arg(long)]
    pub json: bool,

    /// Print a text summary and exit (no TUI)
    #[arg(long)]
    pub text: bool,

    /// Write logs to this file (the TUI logs nowhere otherwise)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Listing name
    #[arg(long)]
    pub name: Option<String>,

    /// Listing description
    #[arg(long)]
    pub description: Option<String>,

    /// Street address
    #[arg(long)]
    pub address: Option<String>,

    /// sale or rent
    #[arg(long = "type", value_name = "sale|rent")]
    pub listing_type: Option<String>,

    /// Number of bedrooms
    #[arg(long)]
    pub bedrooms: Option<String>,

    /// Number of bathrooms
    #[arg(long)]
    pub bathrooms: Option<String>,

    /// Regular price
    #[arg(long)]
    pub regular_price: Option<String>,

    /// Discounted price (must not exceed the regular price)
    #[arg(long)]
    pub discount_price: Option<String>,

    /// Mark the listing as an offer
    #[arg(long)]
    pub offer: bool,

    /// Parking spot included
    #[arg(long)]
    pub parking: bool,

    /// Furnished
    #[arg(long)]
    pub furnished: bool,

    /// Image to upload (repeat for more, max 6)
    #[arg(long = "image", value_name = "PATH")]
    pub images: Vec<PathBuf>,
}

impl Cli {
    pub fn is_interactive(&self) -> bool {
        !self.json && !self.text
    }

    /// Field values given on the command line, as raw form input.
    pub fn field_inputs(&self) -> Result<Vec<(FieldId, InputValue)>> {
        let mut inputs = Vec::new();
        let text_fields = [
            (FieldId::Name, &self.name),
            (FieldId::Description, &self.description),
            (FieldId::Address, &self.address),
            (FieldId::Bedrooms, &self.bedrooms),
            (FieldId::Bathrooms, &self.bathrooms),
            (FieldId::RegularPrice, &self.regular_price),
            (FieldId::DiscountPrice, &self.discount_price),
        ];
        for (field, value) in text_fields {
            if let Some(v) = value {
                inputs.push((field, InputValue::Text(v.clone())));
            }
        }
        if let Some(t) = self.listing_type.as_deref() {
            let field = match t.parse::<ListingType>()? {
                ListingType::Sale => FieldId::Sale,
                ListingType::Rent => FieldId::Rent,
            };
            inputs.push((field, InputValue::Checked(true)));
        }
        for (field, on) in [
            (FieldId::Offer, self.offer),
            (FieldId::Parking, self.parking),
            (FieldId::Furnished, self.furnished),
        ] {
            if on {
                inputs.push((field, InputValue::Checked(true)));
            }
        }
        Ok(inputs)
    }
}

/// Everything a front end needs to drive the form.
pub struct AppContext {
    pub user: CurrentUser,
    pub host: Arc<CloudinaryClient>,
    pub api: Arc<ListingApiClient>,
}

/// Resolve the user and build both HTTP clients.
pub fn build_context(args: &Cli) -> Result<AppContext> {
    let session_path = args
        .session_file
        .clone()
        .unwrap_or_else(session::default_session_path);
    let user = session::resolve_user(
        args.user_id.as_deref(),
        args.access_token.as_deref(),
        &session_path,
    )?;
    if args.remember {
        session::save_session(&session_path, &user).context("failed to save session")?;
    }

    let http = build_http_client()?;
    let host = Arc::new(CloudinaryClient::new(http.clone()));
    let api = Arc::new(ListingApiClient::new(
        http,
        &args.api_base_url,
        user.access_token.clone(),
    ));
    Ok(AppContext { user, host, api })
}

pub async fn run(args: Cli) -> Result<()> {
    let ctx = build_context(&args)?;

    if args.is_interactive() {
        #[cfg(feature = "tui")]
        {
            return crate::tui::run(args, ctx).await;
        }
        #[cfg(not(feature = "tui"))]
        {
            // Fallback when built without TUI support.
            return run_text(args, ctx).await;
        }
    }

    run_text(args, ctx).await
}

/// Fill the form from flags, upload the images as one batch, submit and print the result.
async fn run_text(args: Cli, ctx: AppContext) -> Result<()> {
    let (out_tx, out_handle) = spawn_output_writer();
    let res = run_form(&args, ctx, &out_tx).await;
    drop(out_tx);
    let _ = out_handle.await;
    res
}

async fn run_form(
    args: &Cli,
    ctx: AppContext,
    out_tx: &mpsc::UnboundedSender<OutputLine>,
) -> Result<()> {
    let mut form = FormController::new(ctx.host, ctx.api, ctx.user);

    for (field, input) in args.field_inputs()? {
        form.change(field, input)?;
    }

    if !args.images.is_empty() {
        let _ = out_tx.send(OutputLine::Stderr(format!(
            "Uploading {} image(s)...",
            args.images.len()
        )));
        form.upload_image_paths(args.images.clone()).await?;
    }

    if !args.json {
        let summary = crate::summary::build_draft_summary(form.state().draft());
        for line in summary.lines {
            let _ = out_tx.send(OutputLine::Stderr(line));
        }
    }

    let _ = out_tx.send(OutputLine::Stderr("Creating...".into()));
    let route = form.submit().await?;
    let url = crate::summary::listing_url(&args.api_base_url, &route);

    if args.json {
        let id = route.trim_start_matches("/listing/");
        let out = serde_json::to_string_pretty(&serde_json::json!({
            "id": id,
            "route": route,
            "url": url,
            "listing": form.state().created_listing(),
        }))?;
        let _ = out_tx.send(OutputLine::Stdout(out));
    } else {
        let _ = out_tx.send(OutputLine::Stdout(url));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_become_field_inputs() {
        let args = Cli::parse_from([
            "create-listing",
            "--text",
            "--name",
            "Loft",
            "--type",
            "sale",
            "--regular-price",
            "120",
            "--parking",
            "--image",
            "a.jpg",
            "--image",
            "b.jpg",
        ]);
        assert!(!args.is_interactive());
        assert_eq!(args.images.len(), 2);
        let inputs = args.field_inputs().unwrap();
        assert!(inputs.contains(&(FieldId::Name, InputValue::Text("Loft".into()))));
        assert!(inputs.contains(&(FieldId::Sale, InputValue::Checked(true))));
        assert!(inputs.contains(&(FieldId::RegularPrice, InputValue::Text("120".into()))));
        assert!(inputs.contains(&(FieldId::Parking, InputValue::Checked(true))));
        assert!(!inputs.iter().any(|(f, _)| *f == FieldId::Offer));
    }

    #[test]
    fn unknown_type_is_rejected() {
        let args = Cli::parse_from(["create-listing", "--json", "--type", "lease"]);
        assert!(args.field_inputs().is_err());
    }
}
