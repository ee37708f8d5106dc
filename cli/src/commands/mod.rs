pub mod auth;
pub mod files;
pub mod jobs;
pub mod tools;

use crate::args::Command;
use pdfkit_cli::{CLISession, Result};

/// Run one subcommand against a connected session
pub async fn dispatch(session: &CLISession, command: Command) -> Result<()> {
    match command {
        Command::Login { email, password } => auth::login(session, email, password).await,
        Command::Register {
            email,
            first_name,
            last_name,
            password,
        } => auth::register(session, email, first_name, last_name, password).await,
        Command::Logout => auth::logout(session).await,
        Command::Whoami => auth::whoami(session),

        Command::Upload {
            path,
            temporary,
            content_type,
        } => files::upload(session, &path, temporary, content_type).await,
        Command::Download { file_id, output } => files::download(session, &file_id, &output).await,
        Command::Files { page, size } => files::list(session, page, size).await,
        Command::FileInfo { file_id } => files::info(session, &file_id).await,
        Command::DeleteFile { file_id } => files::delete(session, &file_id).await,
        Command::Usage => files::usage(session).await,

        Command::Jobs { page, size } => jobs::list(session, page, size).await,
        Command::Job {
            job_id,
            wait,
            output,
        } => jobs::show(session, &job_id, wait, output.as_deref()).await,

        Command::Merge { inputs, output } => tools::merge(session, &inputs, output).await,
        Command::Split {
            input,
            pages,
            output,
        } => tools::split(session, &input, &pages, output).await,
        Command::Compress {
            input,
            level,
            output,
        } => tools::compress(session, &input, level, output).await,
        Command::Watermark {
            input,
            text,
            position,
            output,
        } => tools::watermark(session, &input, &text, position, output).await,
        Command::Protect {
            input,
            user_password,
            owner_password,
            output,
        } => tools::protect(session, &input, user_password, owner_password, output).await,
        Command::Unlock {
            input,
            password,
            output,
        } => tools::unlock(session, &input, password, output).await,
        Command::Rotate {
            input,
            angle,
            pages,
            output,
        } => tools::rotate(session, &input, angle, pages, output).await,
    }
}
