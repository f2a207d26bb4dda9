//! Config command - show or update settings

use anyhow::Result;

use facevault_core::config::Config;

use crate::output;

pub fn run(api_url: Option<String>, poll_secs: Option<u64>) -> Result<()> {
    let facevault_dir = super::get_facevault_dir();
    let mut config = Config::load(&facevault_dir)?;

    if api_url.is_none() && poll_secs.is_none() {
        let mut table = output::create_table();
        table.add_row(vec![
            "API URL",
            if config.api_base_url.is_empty() {
                "(not set)"
            } else {
                &config.api_base_url
            },
        ]);
        table.add_row(vec!["IP echo URL", &config.ip_echo_url]);
        table.add_row(vec!["Poll interval", &format!("{}s", config.security_poll_secs)]);
        table.add_row(vec![
            "Request timeout",
            &format!("{}s", config.request_timeout_secs),
        ]);
        println!("{}", table);
        return Ok(());
    }

    if let Some(url) = api_url {
        if !url.starts_with("https://") {
            anyhow::bail!("API URL must use https");
        }
        config.api_base_url = url;
    }
    if let Some(secs) = poll_secs {
        if secs == 0 {
            anyhow::bail!("Poll interval must be at least 1 second");
        }
        config.security_poll_secs = secs;
    }

    config.save(&facevault_dir)?;
    output::success("Configuration updated");
    Ok(())
}
