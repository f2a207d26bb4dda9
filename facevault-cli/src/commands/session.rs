//! Login command - sign in and run the session dashboard
//!
//! After login the security monitor runs alongside the menu loop. The menu
//! polls the monitor between actions; a forced logout ends the session
//! immediately, whatever the user was about to do.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use dialoguer::{Input, Password, Select};
use rust_decimal::Decimal;

use facevault_core::{FacevaultContext, MonitorHandle};

use crate::output;

pub async fn run(image: &Path, account: Option<String>) -> Result<()> {
    let capture = super::get_capture(image);
    let ctx = super::get_context(capture.clone())?;

    let account_number = match account {
        Some(a) => a,
        None => Input::new().with_prompt("Account number").interact_text()?,
    };
    let pin: String = Password::new().with_prompt("PIN").interact()?;

    output::info("Capturing your face for verification...");
    let mut camera = capture.acquire().await?;
    let frame = camera.snapshot()?;
    drop(camera);

    let session = ctx.login.login(account_number.trim(), pin.trim(), &frame).await?;
    println!("{} Logged in as {}", "Success!".green(), session.account_number);

    // The monitor needs the enrolled email for its alerts.
    let info = ctx.account.account_info().await?;
    let monitor = ctx.start_monitor(info.email.clone());

    println!("Welcome, {}", info.name.bold());
    if let Some(balance) = info.balance {
        println!("Balance: {}", output::format_amount(balance));
    }

    let result = dashboard(&ctx, &monitor).await;
    monitor.shutdown();
    ctx.logout();
    result
}

/// Check whether the monitor tore the session down
fn forced_out(monitor: &MonitorHandle) -> Option<String> {
    monitor
        .notices()
        .borrow()
        .as_ref()
        .map(|notice| format!("[{}] {}", notice.at.format("%H:%M:%S UTC"), notice.message))
}

fn session_ended(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<facevault_core::Error>(),
        Some(facevault_core::Error::NoSession)
    )
}

async fn dashboard(ctx: &FacevaultContext, monitor: &MonitorHandle) -> Result<()> {
    let actions = [
        "Transfer funds",
        "Transaction history",
        "Account info",
        "Change PIN",
        "Verify presence",
        "Logout",
    ];

    loop {
        if let Some(message) = forced_out(monitor) {
            output::error(&message);
            return Ok(());
        }

        println!();
        let choice = Select::new()
            .with_prompt("Action")
            .items(&actions)
            .default(0)
            .interact()?;

        // The prompt may have been open across a monitor tick.
        if let Some(message) = forced_out(monitor) {
            output::error(&message);
            return Ok(());
        }

        let outcome = match choice {
            0 => transfer(ctx).await,
            1 => transactions(ctx).await,
            2 => account_info(ctx).await,
            3 => change_pin(ctx).await,
            4 => verify_presence(ctx).await,
            _ => {
                output::info("Logged out.");
                return Ok(());
            }
        };

        if let Err(e) = outcome {
            if session_ended(&e) {
                // The session ended underneath the action.
                if let Some(message) = forced_out(monitor) {
                    output::error(&message);
                } else {
                    output::error("Session ended.");
                }
                return Ok(());
            }
            output::error(&e.to_string());
        }
    }
}

async fn transfer(ctx: &FacevaultContext) -> Result<()> {
    let to_account: String = Input::new()
        .with_prompt("Destination account")
        .interact_text()?;
    let amount: String = Input::new().with_prompt("Amount").interact_text()?;
    let amount: Decimal = amount
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("Amount must be a number"))?;

    output::info("Capturing your face to authorize the transfer...");
    ctx.transfer.capture_step_up().await?;

    let receipt = ctx.transfer.request_transfer(to_account.trim(), amount).await?;
    output::success(&receipt.message);

    if let Some(account) = receipt.account {
        if let Some(balance) = account.balance {
            println!("New balance: {}", output::format_amount(balance));
        }
    }
    if let Some(history) = receipt.history {
        if let Some(latest) = history.sent.first() {
            println!(
                "Latest sent: {} to {} at {}",
                output::format_amount(latest.amount),
                latest.to_account.as_deref().unwrap_or("-"),
                latest.timestamp
            );
        }
    }
    Ok(())
}

async fn transactions(ctx: &FacevaultContext) -> Result<()> {
    let history = ctx.account.transactions().await?;

    if history.sent.is_empty() && history.received.is_empty() {
        output::info("No transactions yet.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Direction", "Counterparty", "Amount", "Timestamp"]);
    for tx in &history.sent {
        table.add_row(vec![
            "Sent",
            tx.to_account.as_deref().unwrap_or("-"),
            &output::format_amount(tx.amount),
            &tx.timestamp,
        ]);
    }
    for tx in &history.received {
        table.add_row(vec![
            "Received",
            tx.from_account.as_deref().unwrap_or("-"),
            &output::format_amount(tx.amount),
            &tx.timestamp,
        ]);
    }
    println!("{}", table);
    Ok(())
}

async fn account_info(ctx: &FacevaultContext) -> Result<()> {
    let info = ctx.account.account_info().await?;

    let mut table = output::create_table();
    table.add_row(vec!["Name", &info.name]);
    table.add_row(vec!["Email", &info.email]);
    if let Some(balance) = info.balance {
        table.add_row(vec!["Balance", &output::format_amount(balance)]);
    }
    println!("{}", table);
    Ok(())
}

async fn change_pin(ctx: &FacevaultContext) -> Result<()> {
    let new_pin: String = Password::new()
        .with_prompt("New PIN (at least 4 digits)")
        .with_confirmation("Confirm new PIN", "PINs do not match")
        .interact()?;

    let message = ctx.account.change_pin(new_pin.trim()).await?;
    output::success(&message);
    Ok(())
}

async fn verify_presence(ctx: &FacevaultContext) -> Result<()> {
    output::info("Capturing your face...");
    let message = ctx.account.verify_presence().await?;
    output::success(&message);
    Ok(())
}
