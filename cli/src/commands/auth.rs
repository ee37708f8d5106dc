use pdfkit_cli::{CLIError, CLISession, Result};
use pdfkit_link::{PdfLinkError, RegisterRequest};
use std::io::{self, Write};

fn prompt_line(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout()
        .flush()
        .map_err(|e| CLIError::InputError(format!("Failed to flush prompt: {}", e)))?;
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|e| CLIError::InputError(format!("Failed to read input: {}", e)))?;
    Ok(input.trim().to_string())
}

/// Use the given password or ask for it without echo
pub fn password_or_prompt(password: Option<String>, label: &str) -> Result<String> {
    match password {
        Some(pass) => Ok(pass),
        None => rpassword::prompt_password(label)
            .map_err(|e| CLIError::InputError(format!("Failed to read password: {}", e))),
    }
}

pub async fn login(
    session: &CLISession,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let email = match email {
        Some(email) => email,
        None => prompt_line("Email: ")?,
    };
    let password = password_or_prompt(password, "Password: ")?;

    let auth = session.client().login(&email, &password).await?;

    if session.is_json() {
        session.print(&session.formatter().format_user(&auth.user)?);
    } else {
        session.success(&format!("Logged in as {}", auth.user.display_name()));
    }
    Ok(())
}

pub async fn register(
    session: &CLISession,
    email: String,
    first_name: String,
    last_name: String,
    password: Option<String>,
) -> Result<()> {
    let password = match password {
        Some(pass) => pass,
        None => {
            let first = password_or_prompt(None, "Password: ")?;
            let confirm = password_or_prompt(None, "Confirm password: ")?;
            if first != confirm {
                return Err(PdfLinkError::ValidationError("Passwords do not match".into()).into());
            }
            first
        }
    };

    let auth = session
        .client()
        .register(RegisterRequest {
            email,
            password,
            first_name,
            last_name,
        })
        .await?;

    if session.is_json() {
        session.print(&session.formatter().format_user(&auth.user)?);
    } else {
        session.success(&format!("Account created, logged in as {}", auth.user.display_name()));
    }
    Ok(())
}

pub async fn logout(session: &CLISession) -> Result<()> {
    if !session.client().auth_store().is_authenticated() {
        session.success("Not logged in");
        return Ok(());
    }
    session.client().logout().await?;
    session.success("Logged out");
    Ok(())
}

pub fn whoami(session: &CLISession) -> Result<()> {
    match session.client().auth_store().user() {
        Some(user) => {
            session.print(&session.formatter().format_user(&user)?);
            Ok(())
        }
        None => Err(PdfLinkError::AuthenticationError("Not logged in".into()).into()),
    }
}
