#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Compose an email from the command line and print or send it

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use mail_composer::{
    domain::communication::{content::BodyPart, message::MessageBuilder},
    infrastructure::email::smtp::{Session, SmtpConfig},
};
use tracing::info;

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
#[command(about = "Compose an email and print it, or hand it to an SMTP server")]
pub struct Args {
    /// The sender address
    #[arg(long)]
    pub from: String,

    /// Display name for the sender
    #[arg(long)]
    pub from_name: Option<String>,

    /// Recipient addresses
    #[arg(long)]
    pub to: Vec<String>,

    /// Carbon-copy addresses
    #[arg(long)]
    pub cc: Vec<String>,

    /// Blind carbon-copy addresses
    #[arg(long)]
    pub bcc: Vec<String>,

    /// Reply-To addresses
    #[arg(long)]
    pub reply_to: Vec<String>,

    /// The subject
    #[arg(long)]
    pub subject: Option<String>,

    /// The message body
    #[arg(long)]
    pub body: Option<String>,

    /// MIME type of the body
    #[arg(long)]
    pub content_type: Option<String>,

    /// Custom header as NAME=VALUE
    #[arg(long = "header", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Send the message instead of printing it
    #[arg(long)]
    pub send: bool,

    /// The SMTP configuration
    #[clap(flatten)]
    pub smtp: SmtpConfig,
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .ok_or_else(|| format!("expected NAME=VALUE, got `{raw}`"))
}

fn compose(args: &Args) -> Result<MessageBuilder> {
    let mut builder = MessageBuilder::new();

    builder.set_mail_session(Session::new(&args.smtp)?);

    match &args.from_name {
        Some(name) => builder.set_from_named(&args.from, name)?,
        None => builder.set_from(&args.from)?,
    }

    if !args.to.is_empty() {
        builder.add_to(&args.to)?;
    }
    if !args.cc.is_empty() {
        builder.add_cc(&args.cc)?;
    }
    if !args.bcc.is_empty() {
        builder.add_bcc(&args.bcc)?;
    }
    if !args.reply_to.is_empty() {
        builder.add_reply_to(&args.reply_to)?;
    }

    if let Some(subject) = &args.subject {
        builder.set_subject(subject.clone());
    }

    for (name, value) in &args.headers {
        builder
            .add_header(name, value)
            .with_context(|| format!("invalid header `{name}`"))?;
    }

    if let Some(body) = &args.body {
        let part = BodyPart::text(body.clone());

        match &args.content_type {
            Some(content_type) => builder.set_content_with_type(part, content_type),
            None => builder.set_content(part),
        }
    }

    Ok(builder)
}

#[mutants::skip]
fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let args = Args::parse();

    let mut builder = compose(&args)?;

    if args.send {
        let message = builder.send()?;

        info!(host = message.session().host(), "message sent");
    } else {
        let message = builder.build()?;

        io::stdout().write_all(&message.formatted()?)?;
    }

    Ok(())
}
