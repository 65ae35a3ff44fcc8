use clap::{Args as ClapArgs, Subcommand};
use console::style;
use dialoguer::Password;
use study_aid_core::domain::SessionState;

use crate::{error::AppError, state::AppState};

#[derive(ClapArgs)]
pub struct Args {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Subcommand)]
pub enum AuthCommand {
    /// Create an account
    Register {
        email: String,
        /// Read from a prompt when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Log in; the session only outlives this process with --remember
    Login {
        email: String,
        #[arg(long)]
        password: Option<String>,
        /// Keep the session in local storage
        #[arg(long)]
        remember: bool,
    },

    /// Log out and clear any stored session
    Logout,

    /// Show the current session
    Whoami,
}

pub async fn execute(state: &mut AppState, args: Args) -> Result<(), AppError> {
    match args.command {
        AuthCommand::Register { email, password } => {
            let password = match password {
                Some(password) => password,
                None => Password::new()
                    .with_prompt("Password")
                    .with_confirmation("Confirm password", "Passwords do not match")
                    .interact()?,
            };
            state.store.register(&email, &password).await?;
            println!("{} Registered {}. You can log in now.", style("✓").green(), email);
        }
        AuthCommand::Login {
            email,
            password,
            remember,
        } => {
            let password = match password {
                Some(password) => password,
                None => Password::new().with_prompt("Password").interact()?,
            };
            let user = state.store.login(&email, &password, remember).await?;
            println!("{} Logged in as {}.", style("✓").green(), user.email);
            if !remember {
                println!("{}", style("Session not remembered; it ends with this command.").dim());
            }
        }
        AuthCommand::Logout => {
            state.store.logout();
            println!("Logged out.");
        }
        AuthCommand::Whoami => match state.store.session_state() {
            SessionState::LoggedOut => println!("Not logged in (using the anonymous workspace)."),
            SessionState::LoggedIn { persisted } => println!(
                "{}{}",
                state.user_key(),
                if persisted { " (remembered)" } else { "" }
            ),
        },
    }
    Ok(())
}
