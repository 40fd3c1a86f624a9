//! Send one message to a Telegram user by username

use std::io::{self, BufRead, Write};

use tracing::{debug, info};

use crate::auth::{authorize, Authenticator, Prompter};
use crate::config::{normalize_username, Config};
use crate::error::{Error, Result};
use crate::session::TelegramClient;

/// What the send flow needs from a connected client.
#[allow(async_fn_in_trait)]
pub trait Messenger {
    /// Resolve `username` and send `text` to it once.
    async fn send_text(&self, username: &str, text: &str) -> Result<()>;

    /// Release the connection.
    async fn disconnect(self);
}

impl Messenger for TelegramClient {
    async fn send_text(&self, username: &str, text: &str) -> Result<()> {
        let peer = self
            .client
            .resolve_username(username)
            .await?
            .ok_or_else(|| Error::RecipientNotFound(username.to_string()))?;
        debug!(%username, "recipient resolved");

        self.client.send_message(&peer, text).await?;
        Ok(())
    }

    async fn disconnect(self) {
        TelegramClient::disconnect(self).await
    }
}

/// Line printed after a successful send.
pub fn confirmation(recipient: &str, message: &str) -> String {
    format!("sent to @{}: {}", normalize_username(recipient), message)
}

/// Send `message` to `recipient`, then disconnect whether or not the send
/// succeeded. Returns the confirmation line.
pub async fn deliver<M: Messenger>(messenger: M, recipient: &str, message: &str) -> Result<String> {
    let recipient = normalize_username(recipient);
    let outcome = messenger.send_text(recipient, message).await;
    messenger.disconnect().await;

    outcome?;
    info!(%recipient, chars = message.chars().count(), "message sent");
    Ok(confirmation(recipient, message))
}

/// Sign in if needed, then deliver. The client is disconnected on every path.
pub async fn sign_in_and_deliver<C, R, W>(
    client: C,
    prompter: &mut Prompter<R, W>,
    recipient: &str,
    message: &str,
) -> Result<String>
where
    C: Authenticator + Messenger,
    R: BufRead,
    W: Write,
{
    if let Err(e) = authorize(&client, prompter).await {
        client.disconnect().await;
        return Err(e);
    }
    deliver(client, recipient, message).await
}

/// Connect, sign in if needed, send and write the confirmation to `out`.
pub async fn run_with<R, W, O>(config: &Config, prompter: &mut Prompter<R, W>, out: &mut O) -> Result<()>
where
    R: BufRead,
    W: Write,
    O: Write,
{
    let client = TelegramClient::connect(config).await?;
    let line = sign_in_and_deliver(client, prompter, &config.recipient, &config.message).await?;
    writeln!(out, "{}", line)?;
    Ok(())
}

/// CLI entry point
pub async fn run(config: &Config) -> Result<()> {
    let mut prompter = Prompter::new(io::stdin().lock(), io::stdout());
    run_with(config, &mut prompter, &mut io::stdout()).await
}
