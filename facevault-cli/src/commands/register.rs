//! Register command - enroll a new account

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use dialoguer::Input;

use crate::output;

pub async fn run(image: &Path, name: Option<String>, email: Option<String>) -> Result<()> {
    let capture = super::get_capture(image);
    let ctx = super::get_context(capture)?;

    let name = match name {
        Some(n) => n,
        None => Input::new().with_prompt("Full name").interact_text()?,
    };
    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };

    ctx.registration.submit_identity(&name, &email).await?;
    output::info("A one-time code has been sent to your email.");

    // Wrong codes can be re-entered; any other failure aborts enrollment.
    loop {
        let otp: String = Input::new().with_prompt("One-time code").interact_text()?;
        match ctx.registration.submit_otp(otp.trim()).await {
            Ok(()) => break,
            Err(e @ facevault_core::Error::Server(_)) => output::error(&e.to_string()),
            Err(e) => return Err(e.into()),
        }
    }

    output::info("Code verified. Capturing your face for enrollment...");
    let issued = ctx.registration.submit_biometric().await?;

    println!();
    println!("{} Account created", "Success!".green());
    let mut table = output::create_table();
    table.add_row(vec!["Account number", &issued.account_number]);
    table.add_row(vec!["PIN", &issued.pin]);
    println!("{}", table);
    output::warning("Store these credentials safely; they are shown only once.");
    println!("Run 'fv login' to sign in.");

    Ok(())
}
