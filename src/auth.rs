//! Interactive sign-in for sessions that are not yet authorized
//!
//! Asks for a phone number (or a bot token), the login code and, when the
//! account has two-step verification enabled, the password.

use std::io::{BufRead, Write};

use grammers_client::types::{LoginToken, PasswordToken};
use grammers_client::SignInError;
use tracing::info;

use crate::error::{Error, Result};
use crate::session::TelegramClient;

pub const PHONE_PROMPT: &str = "Please enter your phone (or bot token): ";
pub const CODE_PROMPT: &str = "Please enter the code you received: ";
pub const PASSWORD_PROMPT: &str = "Please enter your password: ";

/// Result of submitting a login code.
#[derive(Debug)]
pub enum SignInStep<P> {
    Done,
    PasswordRequired { token: P, hint: Option<String> },
}

/// The authentication calls the sign-in flow needs from a client.
#[allow(async_fn_in_trait)]
pub trait Authenticator {
    type LoginToken;
    type PasswordToken;

    async fn is_authorized(&self) -> Result<bool>;
    async fn request_code(&self, phone: &str) -> Result<Self::LoginToken>;
    async fn submit_code(
        &self,
        token: &Self::LoginToken,
        code: &str,
    ) -> Result<SignInStep<Self::PasswordToken>>;
    async fn submit_password(&self, token: Self::PasswordToken, password: &str) -> Result<()>;
    async fn bot_sign_in(&self, bot_token: &str) -> Result<()>;
}

/// Line-based prompts over any reader/writer pair.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `label`, read one line and return it trimmed. Empty answers
    /// and end of input are rejected.
    pub fn ask(&mut self, label: &str) -> Result<String> {
        self.output.write_all(label.as_bytes())?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line)?;
        let answer = line.trim();
        if read == 0 || answer.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "no answer given to \"{}\"",
                label.trim_end_matches([' ', ':'])
            )));
        }
        Ok(answer.to_string())
    }

    pub fn note(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

/// Bot tokens look like `123456:ABC-DEF...`; phone numbers never contain `:`.
pub fn is_bot_token(input: &str) -> bool {
    input.contains(':')
}

/// Make sure the client is signed in, prompting for credentials if needed.
pub async fn authorize<A, R, W>(auth: &A, prompter: &mut Prompter<R, W>) -> Result<()>
where
    A: Authenticator,
    R: BufRead,
    W: Write,
{
    if auth.is_authorized().await? {
        info!("session already authorized");
        return Ok(());
    }

    let identity = prompter.ask(PHONE_PROMPT)?;
    if is_bot_token(&identity) {
        auth.bot_sign_in(&identity).await?;
        info!("signed in as bot");
        return Ok(());
    }

    let token = auth.request_code(&identity).await?;
    let code = prompter.ask(CODE_PROMPT)?;

    match auth.submit_code(&token, &code).await? {
        SignInStep::Done => {}
        SignInStep::PasswordRequired { token, hint } => {
            if let Some(hint) = hint {
                prompter.note(&format!("Password hint: {}", hint))?;
            }
            let password = prompter.ask(PASSWORD_PROMPT)?;
            auth.submit_password(token, &password).await?;
        }
    }

    info!("signed in");
    Ok(())
}

impl Authenticator for TelegramClient {
    type LoginToken = LoginToken;
    type PasswordToken = PasswordToken;

    async fn is_authorized(&self) -> Result<bool> {
        Ok(self.client.is_authorized().await?)
    }

    async fn request_code(&self, phone: &str) -> Result<LoginToken> {
        self.client
            .request_login_code(phone, self.api_hash())
            .await
            .map_err(|e| Error::SignIn(format!("failed to request code: {}", e)))
    }

    async fn submit_code(
        &self,
        token: &LoginToken,
        code: &str,
    ) -> Result<SignInStep<PasswordToken>> {
        match self.client.sign_in(token, code).await {
            Ok(_) => Ok(SignInStep::Done),
            Err(SignInError::PasswordRequired(token)) => {
                let hint = token.hint().map(str::to_string);
                Ok(SignInStep::PasswordRequired { token, hint })
            }
            Err(e) => Err(Error::SignIn(e.to_string())),
        }
    }

    async fn submit_password(&self, token: PasswordToken, password: &str) -> Result<()> {
        self.client
            .check_password(token, password)
            .await
            .map(|_| ())
            .map_err(|e| Error::SignIn(e.to_string()))
    }

    async fn bot_sign_in(&self, bot_token: &str) -> Result<()> {
        self.client
            .bot_sign_in(bot_token, self.api_hash())
            .await
            .map(|_| ())
            .map_err(|e| Error::SignIn(e.to_string()))
    }
}
